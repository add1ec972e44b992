//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the bubble store, the resource fetcher and the message table used
//! for error bodies and the rendered page.

use std::sync::Arc;

use crate::messages::Messages;
use crate::services::search::ResourceSearch;
use crate::services::store::BubbleStore;

/// Clone is required by Axum; all inner fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: BubbleStore,
    pub search: Arc<dyn ResourceSearch>,
    pub messages: &'static Messages,
}

impl AppState {
    #[must_use]
    pub fn new(store: BubbleStore, search: Arc<dyn ResourceSearch>, messages: &'static Messages) -> Self {
        Self { store, search, messages }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::messages::Lang;
    use crate::model::Resource;
    use std::sync::Mutex;

    /// Fetcher returning canned resources and recording queries.
    pub struct MockSearch {
        pub resources: Vec<Resource>,
        pub queries: Mutex<Vec<String>>,
    }

    impl MockSearch {
        #[must_use]
        pub fn new(resources: Vec<Resource>) -> Self {
            Self { resources, queries: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl ResourceSearch for MockSearch {
        async fn search(&self, query: &str) -> Vec<Resource> {
            self.queries.lock().unwrap().push(query.to_string());
            self.resources.clone()
        }
    }

    /// Create an `AppState` backed by a fresh store in `dir`.
    pub async fn test_app_state(dir: &tempfile::TempDir, search: Arc<MockSearch>) -> AppState {
        let store = BubbleStore::open(dir.path().join("bubbles.json")).await.unwrap();
        AppState::new(store, search, Lang::En.messages())
    }
}
