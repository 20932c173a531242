use serde::{Deserialize, Serialize};

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod request;
pub mod transport;

pub use client::TodoApi;
pub use config::ClientConfig;
pub use controller::ListController;
pub use error::ClientError;
pub use request::{build_request, ApiRequest, Endpoint, Method};
pub use transport::{ApiResponse, Transport};

/// Priority assigned when the caller does not pick one.
pub const DEFAULT_PRIORITY: i64 = 1;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

/// A to-do item as stored by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub value: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub checked: bool,
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    pub value: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
}

/// Body of the login request: the list name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

impl Task {
    pub fn new(id: String, input: TaskInput) -> Self {
        Self {
            id,
            value: input.value,
            priority: input.priority,
            checked: false,
        }
    }
}

impl TaskInput {
    pub fn new(value: impl Into<String>, priority: i64) -> Self {
        Self {
            value: value.into(),
            priority,
        }
    }
}
