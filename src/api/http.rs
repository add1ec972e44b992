//! `BubbleApi` over HTTP with `reqwest`.
//!
//! Thin wrapper around the three JSON endpoints. Status and body handling
//! is done by the pure `decode_response` for testability.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{ApiError, BubbleApi};
use crate::model::{BubbleCollection, BubbleEnvelope, ErrorBody, FetchQuery, FormFields};

const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct HttpBubbleApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBubbleApi {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode_response(status, &text)
    }
}

#[async_trait::async_trait]
impl BubbleApi for HttpBubbleApi {
    async fn list_bubbles(&self) -> Result<BubbleCollection, ApiError> {
        self.send(self.http.get(self.url("/api/bubbles"))).await
    }

    async fn create_bubble(&self, fields: &FormFields) -> Result<BubbleEnvelope, ApiError> {
        self.send(self.http.post(self.url("/api/bubbles")).json(fields))
            .await
    }

    async fn fetch_resources(&self, bubble_id: i64, query: &str) -> Result<BubbleEnvelope, ApiError> {
        let body = FetchQuery { query: query.to_string() };
        self.send(self.http.post(self.url(&fetch_path(bubble_id))).json(&body))
            .await
    }
}

pub(crate) fn fetch_path(bubble_id: i64) -> String {
    format!("/api/bubbles/{bubble_id}/fetch")
}

/// Map a status and body to the expected payload or an `ApiError`.
pub(crate) fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body).ok().map(|e| e.error);
        return Err(ApiError::Status { status, message });
    }
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
