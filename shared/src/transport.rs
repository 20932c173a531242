use crate::error::ClientError;
use crate::request::ApiRequest;

/// Raw outcome of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends request descriptors somewhere.
///
/// The browser build goes through `fetch`; its futures are not `Send`, so the
/// trait makes no `Send` promise either. An error means no response was
/// received at all. Non-2xx statuses come back as `Ok`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}
