//! API utilities for frontend-backend communication
//!
//! Every request carries the session cookie (`credentials: include`).
//! Error bodies look like `{"error": "..."}`; the message is surfaced as-is.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use web_sys::RequestCredentials;

/// Get the base URL for API requests
///
/// The backend listens on port 3000 of the same host that served the page.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Append a serialized query (`page=0&q=...`) to a path
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> String {
    match serde_qs::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("{}?{}", path, qs),
        _ => path.to_string(),
    }
}

fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder.credentials(RequestCredentials::Include)
}

/// Message from an error response, falling back to the status line
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<serde_json::Value>().await {
        Ok(body) => body["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status)),
        Err(_) => format!("HTTP {}", status),
    }
}

async fn send(request: Request) -> Result<Response, String> {
    let response = request
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    Ok(response)
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let request = with_credentials(Request::get(&api_url(path)))
        .build()
        .map_err(|e| format!("Failed to build request: {}", e))?;
    parse(send(request).await?).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    let request = with_credentials(Request::post(&api_url(path)))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    parse(send(request).await?).await
}

/// POST whose response body is not needed
pub async fn post_empty<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let request = with_credentials(Request::post(&api_url(path)))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    send(request).await.map(|_| ())
}

pub async fn put_json<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let request = with_credentials(Request::put(&api_url(path)))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    send(request).await.map(|_| ())
}

pub async fn delete(path: &str) -> Result<(), String> {
    let request = with_credentials(Request::delete(&api_url(path)))
        .build()
        .map_err(|e| format!("Failed to build request: {}", e))?;
    send(request).await.map(|_| ())
}

/// Id returned by upsert endpoints (`{"id": "..."}`)
pub async fn upsert<B: Serialize>(path: &str, body: &B) -> Result<String, String> {
    let result: serde_json::Value = post_json(path, body).await?;
    Ok(result["id"].as_str().unwrap_or_default().to_string())
}

/// Browser confirm dialog; false when no window is available
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|win| win.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::list::ListQuery;

    #[test]
    fn test_with_query_skips_empty_fields() {
        let query = ListQuery {
            page: Some(2),
            page_size: None,
            q: Some("hoja".into()),
        };
        let url = with_query("/api/material/list", &query);
        assert!(url.starts_with("/api/material/list?"));
        assert!(url.contains("page=2"));
        assert!(url.contains("q=hoja"));
    }
}
