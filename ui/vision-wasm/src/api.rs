//! HTTP API client.
//!
//! Wraps `fetch` for JSON requests to the vision-service backend.

use serde::de::DeserializeOwned;
use vp_api_types::ErrorResponse;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::dom;

/// Determine the API base URL.
///
/// Priority: user-supplied `#baseUrl` input → Codespace auto-detect → same host on `:8080`.
pub fn base_url() -> String {
    if let Some(input) = dom::by_id_typed::<web_sys::HtmlInputElement>("baseUrl") {
        let v = input.value().trim().to_string();
        if !v.is_empty() {
            return v.trim_end_matches('/').to_string();
        }
    }

    let loc = dom::window().location();
    let host = loc.hostname().unwrap_or_default();
    let protocol = loc.protocol().unwrap_or_else(|_| "http:".into());

    if host.contains(".app.github.dev") {
        let base = host.replace(".app.github.dev", "");
        let parts: Vec<&str> = base.rsplitn(2, '-').collect();
        let prefix = if parts.len() == 2 { parts[1] } else { &base };
        return format!("https://{}-8080.app.github.dev", prefix);
    }

    format!("{}//{}:8080", protocol, host)
}

/// Turns a failed response into the message shown to the user.
///
/// The service answers errors with `{"error": "..."}`; anything else is shown raw.
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => err.error,
        Err(_) if body.trim().is_empty() => format!("request failed with status {}", status),
        Err(_) => format!("{}: {}", status, body),
    }
}

/// Perform a fetch request, returning the parsed JSON as `serde_json::Value`.
pub async fn request(path: &str, method: &str, body: Option<String>) -> Result<serde_json::Value, String> {
    let url = format!("{}{}", base_url(), path);

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);

    let headers = Headers::new().map_err(|e| format!("{:?}", e))?;

    if let Some(ref b) = body {
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| format!("{:?}", e))?;
        opts.set_body(&JsValue::from_str(b));
    }

    opts.set_headers(&headers);

    let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| format!("{:?}", e))?;

    let resp_value = JsFuture::from(dom::window().fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch error: {:?}", e))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "response is not a Response".to_string())?;

    let text = JsFuture::from(resp.text().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("text error: {:?}", e))?;

    let text_str = text.as_string().unwrap_or_default();

    if !resp.ok() {
        return Err(error_message(resp.status(), &text_str));
    }

    serde_json::from_str(&text_str).map_err(|e| format!("JSON parse error: {}", e))
}

/// Like [`request`] but decodes into a typed response body.
pub async fn request_as<T: DeserializeOwned>(path: &str, method: &str, body: Option<String>) -> Result<T, String> {
    let value = request(path, method, body).await?;
    serde_json::from_value(value).map_err(|e| format!("unexpected response from {}: {}", path, e))
}
