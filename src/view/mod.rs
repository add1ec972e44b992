//! Bubble view — cards, create form and toast driven by `BubbleApi`.
//!
//! DESIGN
//! ======
//! `BubbleView` is an explicitly constructed object: it owns the rendered
//! list, the create-form fields and the toast, and reaches the backend only
//! through the injected `BubbleApi`. Renderers (`html`, `text`) draw a
//! `PageView` snapshot, so the same state backs the served page and the CLI.
//!
//! Locks are held only for short synchronous updates, never across an
//! `.await`, so queries on different cards run concurrently.
//!
//! ORDERING
//! ========
//! Every query takes a number from a view-wide counter and records it on its
//! card. A response is applied only while its number is still the card's
//! latest, so a slow older response never overwrites a newer one, and
//! responses for cards dropped by a reload are discarded.

pub mod html;
pub mod model;
pub mod text;
pub mod toast;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::api::BubbleApi;
use crate::messages::Messages;
use crate::model::{BubbleCollection, FormFields};
use model::{CardView, ListView, PageView};
use toast::Toast;

/// Result of a view operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The response was received and rendered.
    Applied,
    /// The request failed; a toast explains why.
    Failed,
    /// Nothing was sent, or the response was stale and dropped.
    Skipped,
}

pub struct BubbleView {
    api: Arc<dyn BubbleApi>,
    messages: &'static Messages,
    list: Mutex<ListView>,
    create_form: Mutex<FormFields>,
    toast: Toast,
    query_seq: AtomicU64,
}

impl BubbleView {
    #[must_use]
    pub fn new(api: Arc<dyn BubbleApi>, messages: &'static Messages) -> Self {
        Self {
            api,
            messages,
            list: Mutex::new(ListView::default()),
            create_form: Mutex::new(FormFields::new()),
            toast: Toast::default(),
            query_seq: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    /// Current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> PageView {
        PageView {
            list: lock(&self.list).clone(),
            toast: self.toast.snapshot(),
            create_form: lock(&self.create_form).clone(),
        }
    }

    // =========================================================================
    // LIST
    // =========================================================================

    /// Fetch the full collection and replace the rendered list.
    ///
    /// On failure the current list is kept and a toast is shown.
    pub async fn load(&self) -> Outcome {
        match self.api.list_bubbles().await {
            Ok(collection) => {
                debug!(count = collection.bubbles.len(), "bubbles loaded");
                self.render_list(&collection);
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "bubble list load failed");
                self.show_toast(self.messages.load_failed);
                Outcome::Failed
            }
        }
    }

    /// Replace every card with one built from `collection`.
    pub fn render_list(&self, collection: &BubbleCollection) {
        *lock(&self.list) = model::render_list(collection, self.messages);
    }

    #[must_use]
    pub fn card(&self, bubble_id: i64) -> Option<CardView> {
        lock(&self.list).card(bubble_id).cloned()
    }

    // =========================================================================
    // RESOURCE QUERY
    // =========================================================================

    /// Ask the backend for resources matching `query` and re-render only
    /// that bubble's resource list.
    ///
    /// Whitespace-only queries and queries for cards that are not rendered
    /// send nothing. The card's submit control is disabled while the request
    /// is in flight and re-enabled when the card's latest query ends, whatever
    /// the outcome. A superseded response, success or failure, is dropped
    /// without touching the card or the toast.
    pub async fn submit_query(&self, bubble_id: i64, query: &str) -> Outcome {
        let query = query.trim();
        if query.is_empty() {
            return Outcome::Skipped;
        }
        let Some(seq) = self.begin_query(bubble_id) else {
            debug!(bubble_id, "query for a card that is not rendered");
            return Outcome::Skipped;
        };
        let _enable = SubmitGuard { list: &self.list, bubble_id, seq };

        let result = self.api.fetch_resources(bubble_id, query).await;
        let mut list = lock(&self.list);
        let Some(card) = list.card_mut(bubble_id).filter(|card| card.query_form.seq == seq) else {
            debug!(bubble_id, seq, "dropping stale resource response");
            return Outcome::Skipped;
        };
        match result {
            Ok(envelope) => {
                card.resources = model::render_resources(&envelope.bubble.resources, self.messages);
                drop(list);
                self.show_toast(self.messages.resources_updated);
                Outcome::Applied
            }
            Err(e) => {
                drop(list);
                warn!(error = %e, bubble_id, "resource fetch failed");
                self.show_toast(e.toast_message(self.messages.request_failed));
                Outcome::Failed
            }
        }
    }

    fn begin_query(&self, bubble_id: i64) -> Option<u64> {
        let mut list = lock(&self.list);
        let card = list.card_mut(bubble_id)?;
        let seq = self.query_seq.fetch_add(1, Ordering::Relaxed) + 1;
        card.query_form.seq = seq;
        card.query_form.submit_enabled = false;
        Some(seq)
    }

    // =========================================================================
    // CREATE FORM
    // =========================================================================

    /// Set a create-form field. A later value for the same name wins.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<String>) {
        lock(&self.create_form).insert(name.into(), value.into());
    }

    /// Submit the create form. On success the form is reset and the list is
    /// reloaded; on failure the form is left as it was.
    pub async fn submit_create(&self) -> Outcome {
        let fields = lock(&self.create_form).clone();
        match self.api.create_bubble(&fields).await {
            Ok(envelope) => {
                info!(id = envelope.bubble.id, "bubble created");
                lock(&self.create_form).clear();
                self.show_toast(self.messages.created);
                self.load().await;
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "bubble create failed");
                self.show_toast(e.toast_message(self.messages.create_failed));
                Outcome::Failed
            }
        }
    }

    // =========================================================================
    // TOAST
    // =========================================================================

    pub fn show_toast(&self, message: &str) {
        self.toast.show(message);
    }
}

/// Re-enables a card's submit control when its latest query finishes or is
/// dropped. Superseded queries leave the control to the newer one.
struct SubmitGuard<'a> {
    list: &'a Mutex<ListView>,
    bubble_id: i64,
    seq: u64,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut list = lock(self.list);
        if let Some(card) = list.card_mut(self.bubble_id).filter(|card| card.query_form.seq == self.seq) {
            card.query_form.submit_enabled = true;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
