use thiserror::Error;

/// Failures surfaced by the API client and the list controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("request failed with status {status}")]
    Network { status: u16 },
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("no session: login has not completed")]
    NoSession,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed payload: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl ClientError {
    /// HTTP status carried by a `Network` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Network { status } => Some(*status),
            _ => None,
        }
    }
}
