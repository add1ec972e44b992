//! Bubble JSON routes — list, create, fetch resources, health.
//!
//! Request bodies are parsed leniently: anything that is not a JSON object
//! counts as an empty object, so a bad body surfaces as the blank-field
//! `400` rather than a rejection.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::Value;
use tracing::{error, info};

use crate::messages::{Messages, Notice};
use crate::model::{Bubble, BubbleCollection, BubbleEnvelope, ErrorBody, Resource};
use crate::services::store::StoreError;
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

/// Handler failure rendered as `{ "error": ... }` with a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    status: StatusCode,
    notice: Notice,
    message: &'static str,
}

impl ApiFailure {
    fn new(status: StatusCode, notice: Notice, messages: &Messages) -> Self {
        Self { status, notice, message: messages.notice(notice) }
    }

    pub(crate) fn bad_request(notice: Notice, messages: &Messages) -> Self {
        Self::new(StatusCode::BAD_REQUEST, notice, messages)
    }

    pub(crate) fn not_found(notice: Notice, messages: &Messages) -> Self {
        Self::new(StatusCode::NOT_FOUND, notice, messages)
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn notice(&self) -> Notice {
        self.notice
    }

    pub(crate) fn message(&self) -> &'static str {
        self.message
    }

    fn store(err: StoreError, messages: &Messages) -> Self {
        error!(error = %err, "bubble store write failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Notice::InternalError, messages)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.message().to_string() })).into_response()
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Validate and store a new bubble.
pub(crate) async fn create(state: &AppState, title: &str, idea: &str) -> Result<Bubble, ApiFailure> {
    let (title, idea) = (title.trim(), idea.trim());
    if title.is_empty() || idea.is_empty() {
        return Err(ApiFailure::bad_request(Notice::TitleAndIdeaRequired, state.messages));
    }
    state
        .store
        .create(title, idea)
        .await
        .map_err(|e| ApiFailure::store(e, state.messages))
}

/// Look up resources for `query` and append them to the bubble.
pub(crate) async fn fetch(state: &AppState, raw_id: &str, query: &str) -> Result<(Bubble, Vec<Resource>), ApiFailure> {
    let not_found = ApiFailure::not_found(Notice::BubbleNotFound, state.messages);
    let id = raw_id.parse::<i64>().map_err(|_| not_found.clone())?;
    if state.store.find(id).await.is_none() {
        return Err(not_found);
    }

    let query = query.trim();
    if query.is_empty() {
        return Err(ApiFailure::bad_request(Notice::QueryRequired, state.messages));
    }

    let resources = state.search.search(query).await;
    let bubble = state
        .store
        .attach_resources(id, resources.clone())
        .await
        .map_err(|e| ApiFailure::store(e, state.messages))?
        .ok_or(not_found)?;

    info!(id, query, count = resources.len(), "resources fetched");
    Ok((bubble, resources))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/bubbles` — every bubble in insertion order.
pub async fn list_bubbles(State(state): State<AppState>) -> Json<BubbleCollection> {
    Json(BubbleCollection { bubbles: state.store.list().await })
}

/// `POST /api/bubbles` — create from `{ title, idea }`.
pub async fn create_bubble(State(state): State<AppState>, body: Bytes) -> Result<Json<BubbleEnvelope>, ApiFailure> {
    let body = lenient_json(&body);
    let bubble = create(&state, &string_field(&body, "title"), &string_field(&body, "idea")).await?;
    Ok(Json(BubbleEnvelope { bubble, resources: None }))
}

/// `POST /api/bubbles/:id/fetch` — attach resources for `{ query }`.
pub async fn fetch_resources(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<BubbleEnvelope>, ApiFailure> {
    let body = lenient_json(&body);
    let (bubble, resources) = fetch(&state, &id, &string_field(&body, "query")).await?;
    Ok(Json(BubbleEnvelope { bubble, resources: Some(resources) }))
}

/// `GET /api/health` — liveness plus bubble count.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({ "status": "ok", "count": state.store.count().await }))
}

/// Fallback for unknown routes.
pub async fn not_found(State(state): State<AppState>) -> ApiFailure {
    ApiFailure::not_found(Notice::RouteNotFound, state.messages)
}

fn lenient_json(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(serde_json::Map::new()),
    }
}

/// String value of `key`, or empty when absent or not a string.
fn string_field(body: &Value, key: &str) -> String {
    body.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[cfg(test)]
#[path = "bubbles_test.rs"]
mod tests;
