//! Typed calls against the remote to-do service.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::request::{bearer, build_request, ApiRequest, Endpoint, Method};
use crate::transport::Transport;
use crate::{Credentials, LoginResponse, Task, TaskInput};

pub struct TodoApi<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> TodoApi<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exchanges a list name for a bearer token. This is the only call that
    /// goes out without an `Authorization` header.
    pub async fn login(&self, name: &str) -> Result<String, ClientError> {
        let credentials = Credentials {
            value: name.to_string(),
        };
        let request = build_request(
            Method::Post,
            Endpoint::Login.url(&self.base_url),
            Some(&credentials),
            None,
        )?;
        let response: LoginResponse = self.json(request).await?;
        Ok(response.access_token)
    }

    pub async fn list(&self, token: &str) -> Result<Vec<Task>, ClientError> {
        let request = self.authorized::<()>(Method::Get, Endpoint::Todos, None, token)?;
        self.json(request).await
    }

    pub async fn fetch(&self, token: &str, id: &str) -> Result<Task, ClientError> {
        let request =
            self.authorized::<()>(Method::Get, Endpoint::Todo(id.to_string()), None, token)?;
        self.json(request).await
    }

    pub async fn create(&self, token: &str, input: &TaskInput) -> Result<Task, ClientError> {
        let request = self.authorized(Method::Post, Endpoint::Todos, Some(input), token)?;
        self.json(request).await
    }

    pub async fn update(
        &self,
        token: &str,
        id: &str,
        input: &TaskInput,
    ) -> Result<(), ClientError> {
        let request =
            self.authorized(Method::Put, Endpoint::Todo(id.to_string()), Some(input), token)?;
        self.exchange(request).await.map(drop)
    }

    pub async fn toggle(&self, token: &str, id: &str) -> Result<(), ClientError> {
        let request =
            self.authorized::<()>(Method::Put, Endpoint::Toggle(id.to_string()), None, token)?;
        self.exchange(request).await.map(drop)
    }

    pub async fn remove(&self, token: &str, id: &str) -> Result<(), ClientError> {
        let request =
            self.authorized::<()>(Method::Delete, Endpoint::Todo(id.to_string()), None, token)?;
        self.exchange(request).await.map(drop)
    }

    fn authorized<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: Endpoint,
        body: Option<&B>,
        token: &str,
    ) -> Result<ApiRequest, ClientError> {
        build_request(method, endpoint.url(&self.base_url), body, Some(&bearer(token)))
    }

    async fn json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ClientError> {
        let body = self.exchange(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn exchange(&self, request: ApiRequest) -> Result<String, ClientError> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "sending request");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            tracing::debug!(%method, %url, status = response.status, "request rejected");
            return Err(ClientError::Network {
                status: response.status,
            });
        }
        Ok(response.body)
    }
}
