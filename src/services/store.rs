//! Bubble store — in-memory list persisted to a JSON file.
//!
//! DESIGN
//! ======
//! The whole collection lives behind one `RwLock`. Mutations build the next
//! list, write it to disk, and only then replace the in-memory copy, so a
//! failed write leaves both the file and memory at the previous state.
//! Writes go to a sibling temp file followed by a rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::model::{Bubble, Resource, timestamp_now};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no bubble id left after {0}")]
    IdsExhausted(i64),
}

/// Shared handle to the bubble collection. Clones share the same state.
#[derive(Clone)]
pub struct BubbleStore {
    path: PathBuf,
    bubbles: Arc<RwLock<Vec<Bubble>>>,
}

impl BubbleStore {
    /// Open the store at `path`, loading existing bubbles if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let bubbles = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Vec<Bubble>>(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        info!(path = %path.display(), count = bubbles.len(), "bubble store loaded");
        Ok(Self { path, bubbles: Arc::new(RwLock::new(bubbles)) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All bubbles in insertion order.
    pub async fn list(&self) -> Vec<Bubble> {
        self.bubbles.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.bubbles.read().await.len()
    }

    pub async fn find(&self, id: i64) -> Option<Bubble> {
        self.bubbles.read().await.iter().find(|b| b.id == id).cloned()
    }

    /// Append a new bubble with the next free id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be written or the highest
    /// stored id is already `i64::MAX`.
    pub async fn create(&self, title: &str, idea: &str) -> Result<Bubble, StoreError> {
        let mut bubbles = self.bubbles.write().await;
        let bubble = Bubble {
            id: next_id(&bubbles)?,
            title: title.to_string(),
            idea: idea.to_string(),
            created_at: timestamp_now(),
            resources: Vec::new(),
        };

        let mut next = bubbles.clone();
        next.push(bubble.clone());
        self.save(&next).await?;
        *bubbles = next;

        info!(id = bubble.id, "bubble created");
        Ok(bubble)
    }

    /// Append `resources` to a bubble's stored list. Returns the updated
    /// bubble, or `None` if no bubble has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be written.
    pub async fn attach_resources(&self, id: i64, resources: Vec<Resource>) -> Result<Option<Bubble>, StoreError> {
        let mut bubbles = self.bubbles.write().await;
        let Some(index) = bubbles.iter().position(|b| b.id == id) else {
            return Ok(None);
        };

        let added = resources.len();
        let mut next = bubbles.clone();
        next[index].resources.extend(resources);
        let updated = next[index].clone();
        self.save(&next).await?;
        *bubbles = next;

        info!(id, added, total = updated.resources.len(), "resources attached");
        Ok(Some(updated))
    }

    async fn save(&self, bubbles: &[Bubble]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(bubbles)?;
        let tmp = temp_path(&self.path);

        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;

        debug!(path = %self.path.display(), count = bubbles.len(), "bubble store saved");
        Ok(())
    }
}

fn next_id(bubbles: &[Bubble]) -> Result<i64, StoreError> {
    let max = bubbles.iter().map(|b| b.id).max().unwrap_or(0);
    max.checked_add(1).ok_or(StoreError::IdsExhausted(max))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
