//! Bubble records and the JSON envelopes exchanged over `/api/bubbles`.
//!
//! DESIGN
//! ======
//! The same types are used by the server handlers, the JSON file store and
//! the HTTP client, so the wire shape is defined exactly once. Optional
//! fields default on decode because stored files and older servers may omit
//! them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

// =============================================================================
// RECORDS
// =============================================================================

/// A user idea with the resources collected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: i64,
    pub title: String,
    pub idea: String,
    /// UTC creation time, `YYYY-MM-DDTHH:MM:SS.ffffff` without offset.
    #[serde(default = "timestamp_now")]
    pub created_at: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A search-result-like record attached to a bubble.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Resource {
    #[must_use]
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, url: impl Into<String>) -> Self {
        Self { title: Some(title.into()), snippet: Some(snippet.into()), url: Some(url.into()) }
    }
}

/// Ordered bubble list as returned by `GET /api/bubbles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleCollection {
    #[serde(default)]
    pub bubbles: Vec<Bubble>,
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Success body of the create and fetch endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleEnvelope {
    pub bubble: Bubble,
    /// Resources produced by this fetch only. Absent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `POST /api/bubbles/{id}/fetch`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchQuery {
    #[serde(default)]
    pub query: String,
}

/// Create-form payload: one value per field name.
pub type FormFields = BTreeMap<String, String>;

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Current UTC time in the stored `created_at` format.
#[must_use]
pub fn timestamp_now() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Format a timestamp the way `created_at` is stored.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");
    at.format(&format).unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Parse a stored `created_at` value.
///
/// Accepts RFC 3339 with an offset, or the offset-less form (with or
/// without fractional seconds) which is read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(at) = OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339) {
        return Some(at);
    }
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    time::PrimitiveDateTime::parse(raw, &format)
        .ok()
        .map(time::PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
