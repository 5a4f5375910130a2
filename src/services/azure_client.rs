//! Authenticated HTTP client for the Azure DevOps test-management REST API.
//!
//! Every call is a bare GET/PATCH/POST against a path relative to the organization URL.
//! There is no retry, backoff or rate limiting.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{AUTH_PRINCIPAL, Config, defaults};
use crate::error::{SyncError, SyncResult};

/// HTTP total timeout for every remote call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS);

/// Client bound to one organization URL and access token.
#[derive(Clone)]
pub struct AzureClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl AzureClient {
    /// Build a client authenticating as the fixed principal with the given access token.
    pub fn new(config: &Config, access_token: &SecretString) -> SyncResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, basic_auth_header(access_token)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_url(""),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a path and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SyncResult<T> {
        debug!("GET {}", path);
        let body = send(self.http_client.get(self.url(path))).await?;
        decode(body)
    }

    /// PATCH a path with a JSON body and return the raw JSON response.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SyncResult<serde_json::Value> {
        debug!("PATCH {}", path);
        send(self.http_client.patch(self.url(path)).json(body)).await
    }

    /// POST a path with a JSON body and return the raw JSON response.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SyncResult<serde_json::Value> {
        debug!("POST {}", path);
        send(self.http_client.post(self.url(path)).json(body)).await
    }
}

/// Build the `Authorization: Basic` header from the fixed principal and token.
fn basic_auth_header(access_token: &SecretString) -> SyncResult<HeaderValue> {
    let credentials = STANDARD.encode(format!(
        "{}:{}",
        AUTH_PRINCIPAL,
        access_token.expose_secret()
    ));
    let mut value = HeaderValue::from_str(&format!("Basic {}", credentials))
        .map_err(|e| SyncError::Http(format!("Invalid authorization header: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Send a request and classify the response by status.
async fn send(request: reqwest::RequestBuilder) -> SyncResult<serde_json::Value> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        return serde_json::from_str(&text)
            .map_err(|e| SyncError::InvalidResponse(format!("Failed to parse body: {}", e)));
    }

    if status == StatusCode::NOT_FOUND {
        return Err(SyncError::NotFound(server_message(&text)));
    }

    Err(SyncError::UnexpectedStatus {
        status: status.as_u16(),
        body: text,
    })
}

/// Number of entries the service echoed back in a batch response's `value` array.
///
/// Falls back to `sent` when the body carries no `value` array.
pub fn acknowledged_count(response: &serde_json::Value, sent: usize) -> usize {
    response
        .get("value")
        .and_then(|v| v.as_array())
        .map_or(sent, |items| items.len())
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> SyncResult<T> {
    serde_json::from_value(body)
        .map_err(|e| SyncError::InvalidResponse(format!("Unexpected response shape: {}", e)))
}

/// Extract the `message` field of an error body, falling back to the raw text.
fn server_message(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| text.to_string())
}
