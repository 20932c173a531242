//! Request descriptors for the remote to-do API.
//!
//! A descriptor is plain data: method, absolute URL, headers and an optional
//! JSON body. Transports turn it into a real HTTP call.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ClientError;

pub const CONTENT_TYPE: &str = "content-type";
pub const AUTHORIZATION: &str = "Authorization";
pub const JSON_MIME: &str = "application/json";

pub type HeaderMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote resources, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Todos,
    Todo(String),
    Toggle(String),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/auth/login".to_string(),
            Endpoint::Todos => "/todo".to_string(),
            Endpoint::Todo(id) => format!("/todo/{id}"),
            Endpoint::Toggle(id) => format!("/todo/{id}/toggle"),
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Assembles a descriptor. The content type is always JSON; `body` and
/// `headers` are left out entirely when not given.
pub fn build_request<B: Serialize + ?Sized>(
    method: Method,
    url: impl Into<String>,
    body: Option<&B>,
    headers: Option<&HeaderMap>,
) -> Result<ApiRequest, ClientError> {
    let mut all_headers = HeaderMap::new();
    all_headers.insert(CONTENT_TYPE.to_string(), JSON_MIME.to_string());
    if let Some(extra) = headers {
        all_headers.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let body = body.map(serde_json::to_string).transpose()?;

    Ok(ApiRequest {
        method,
        url: url.into(),
        headers: all_headers,
        body,
    })
}

/// Header map carrying a bearer token.
pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskInput;

    #[test]
    fn endpoint_urls() {
        let base = "https://todo.hillel.it/";
        assert_eq!(Endpoint::Login.url(base), "https://todo.hillel.it/auth/login");
        assert_eq!(Endpoint::Todos.url(base), "https://todo.hillel.it/todo");
        assert_eq!(
            Endpoint::Todo("t1".into()).url(base),
            "https://todo.hillel.it/todo/t1"
        );
        assert_eq!(
            Endpoint::Toggle("t1".into()).url(base),
            "https://todo.hillel.it/todo/t1/toggle"
        );
    }

    #[test]
    fn bare_request_only_has_content_type() {
        let request = build_request::<()>(Method::Get, "/todo", None, None).unwrap();
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("Content-Type"), Some(JSON_MIME));
        assert!(request.body.is_none());
    }

    #[test]
    fn body_and_headers_are_merged() {
        let input = TaskInput::new("Buy milk", 1);
        let request =
            build_request(Method::Post, "/todo", Some(&input), Some(&bearer("abc"))).unwrap();

        assert_eq!(request.header("authorization"), Some("Bearer abc"));
        assert_eq!(request.header(CONTENT_TYPE), Some(JSON_MIME));
        assert_eq!(
            request.body.as_deref(),
            Some(r#"{"value":"Buy milk","priority":1}"#)
        );
    }
}
