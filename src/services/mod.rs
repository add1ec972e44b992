//! Backend domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own persistence and outbound lookups so route handlers
//! stay focused on request validation and response shaping.

pub mod search;
pub mod store;
