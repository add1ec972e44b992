//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the JSON API consumed by `BubbleView`, the server-rendered page and
//! its form fallbacks under a single Axum router. Unknown paths answer with
//! a JSON `404`.

pub mod bubbles;
pub mod pages;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::index))
        .route("/bubbles", post(pages::create_form))
        .route("/bubbles/{id}/fetch", post(pages::fetch_form))
        .route("/api/health", get(bubbles::health))
        .route("/api/bubbles", get(bubbles::list_bubbles).post(bubbles::create_bubble))
        .route("/api/bubbles/{id}/fetch", post(bubbles::fetch_resources))
        .fallback(bubbles::not_found)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
