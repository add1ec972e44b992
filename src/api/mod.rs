//! Client side of the `/api/bubbles` endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `BubbleView` talks to the backend only through `BubbleApi`, so the view
//! can be driven against a live server (`http::HttpBubbleApi`) or an
//! in-memory double in tests.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx statuses and undecodable bodies are kept
//! apart in `ApiError`; the view collapses them into one toast message.

pub mod http;

use crate::model::{BubbleCollection, BubbleEnvelope, FormFields};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-2xx status. `message` is the body's `error` field when present.
    #[error("server returned status {status}{}", status_suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// A 2xx body that is not the expected JSON.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Toast text: the server-provided message if any, else `fallback`.
    #[must_use]
    pub fn toast_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Status { message: Some(message), .. } if !message.is_empty() => message,
            _ => fallback,
        }
    }
}

fn status_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Backend operations consumed by the view.
#[async_trait::async_trait]
pub trait BubbleApi: Send + Sync {
    /// `GET /api/bubbles`.
    async fn list_bubbles(&self) -> Result<BubbleCollection, ApiError>;

    /// `POST /api/bubbles` with the create-form fields as a JSON object.
    async fn create_bubble(&self, fields: &FormFields) -> Result<BubbleEnvelope, ApiError>;

    /// `POST /api/bubbles/{id}/fetch` with `{ query }`.
    async fn fetch_resources(&self, bubble_id: i64, query: &str) -> Result<BubbleEnvelope, ApiError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
