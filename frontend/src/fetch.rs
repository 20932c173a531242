use shared::{ApiRequest, ApiResponse, ClientError, Transport};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// `Transport` backed by the browser's `fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        if let Some(body) = &request.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let http_request =
            Request::new_with_str_and_init(&request.url, &opts).map_err(js_failure)?;
        for (name, value) in &request.headers {
            http_request
                .headers()
                .set(name, value)
                .map_err(js_failure)?;
        }

        let window = web_sys::window()
            .ok_or_else(|| ClientError::Transport("no window available".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&http_request))
            .await
            .map_err(js_failure)?
            .into();

        let status = response.status();
        let text_promise = response.text().map_err(js_failure)?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(js_failure)?
            .as_string()
            .unwrap_or_default();

        Ok(ApiResponse { status, body })
    }
}

fn js_failure(value: JsValue) -> ClientError {
    ClientError::Transport(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}
