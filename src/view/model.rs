//! View-model for the bubble page and the pure builders that produce it.
//!
//! DESIGN
//! ======
//! Cards, resource lists and the toast are plain data. Builders here only
//! translate records into display strings (localized placeholders, dates);
//! escaping belongs to the renderers.

use crate::messages::Messages;
use crate::model::{Bubble, BubbleCollection, FormFields, Resource, parse_timestamp};

/// Everything a renderer needs to draw the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageView {
    pub list: ListView,
    pub toast: ToastView,
    pub create_form: FormFields,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListView {
    pub cards: Vec<CardView>,
    pub empty_visible: bool,
}

impl Default for ListView {
    fn default() -> Self {
        Self { cards: Vec::new(), empty_visible: true }
    }
}

impl ListView {
    #[must_use]
    pub fn card(&self, bubble_id: i64) -> Option<&CardView> {
        self.cards.iter().find(|c| c.bubble_id == bubble_id)
    }

    pub fn card_mut(&mut self, bubble_id: i64) -> Option<&mut CardView> {
        self.cards.iter_mut().find(|c| c.bubble_id == bubble_id)
    }
}

/// One rendered bubble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub bubble_id: i64,
    /// `Bubble #<id>`.
    pub heading: String,
    pub title: String,
    pub date: String,
    pub idea: String,
    pub resources: ResourceListView,
    pub query_form: QueryFormView,
}

/// Per-card query form state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryFormView {
    pub submit_enabled: bool,
    /// Sequence number of the latest query issued from this card.
    pub seq: u64,
}

impl Default for QueryFormView {
    fn default() -> Self {
        Self { submit_enabled: true, seq: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceListView {
    Placeholder(String),
    Items(Vec<ResourceView>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceView {
    pub title: String,
    pub snippet: String,
    /// Present only when the resource carries a non-empty URL.
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub visible: bool,
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Build the list for a fetched collection, preserving server order.
#[must_use]
pub fn render_list(collection: &BubbleCollection, messages: &Messages) -> ListView {
    ListView {
        cards: collection.bubbles.iter().map(|b| build_card(b, messages)).collect(),
        empty_visible: collection.bubbles.is_empty(),
    }
}

#[must_use]
pub fn build_card(bubble: &Bubble, messages: &Messages) -> CardView {
    CardView {
        bubble_id: bubble.id,
        heading: format!("Bubble #{}", bubble.id),
        title: bubble.title.clone(),
        date: localized_date(&bubble.created_at, messages),
        idea: bubble.idea.clone(),
        resources: render_resources(&bubble.resources, messages),
        query_form: QueryFormView::default(),
    }
}

/// Placeholder for an empty list, one block per resource otherwise.
#[must_use]
pub fn render_resources(resources: &[Resource], messages: &Messages) -> ResourceListView {
    if resources.is_empty() {
        return ResourceListView::Placeholder(messages.no_resources.to_string());
    }
    ResourceListView::Items(resources.iter().map(|r| resource_view(r, messages)).collect())
}

fn resource_view(resource: &Resource, messages: &Messages) -> ResourceView {
    ResourceView {
        title: non_empty(resource.title.as_deref()).unwrap_or(messages.untitled).to_string(),
        snippet: resource.snippet.clone().unwrap_or_default(),
        url: non_empty(resource.url.as_deref()).map(str::to_string),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Display form of `created_at`; the raw value when it cannot be parsed.
#[must_use]
pub fn localized_date(raw: &str, messages: &Messages) -> String {
    parse_timestamp(raw)
        .and_then(|at| messages.format_date(at))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
