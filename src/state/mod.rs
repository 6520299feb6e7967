//! Process-wide holder of the current document.
//!
//! Readers get a cheap `Arc` snapshot. Writers hand in a whole new
//! document; an unchanged value is not stored or saved again. Only the swap
//! and the local write are serialized; remote pushes happen after the
//! writer lock is released.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::errors::AppError;
use crate::models::Document;
use crate::sync::{PersistenceCoordinator, SaveReport};

/// Outcome of a commit that changed the document.
#[derive(Debug, Clone)]
pub struct Committed {
    pub document: Arc<Document>,
    pub report: SaveReport,
}

pub struct DocumentStore {
    current: RwLock<Arc<Document>>,
    // Serializes swap + local write so the local store sees revisions in order.
    writer: Mutex<()>,
}

impl DocumentStore {
    pub fn new(document: Document) -> Self {
        Self {
            current: RwLock::new(Arc::new(document)),
            writer: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> Arc<Document> {
        self.current.read().await.clone()
    }

    pub async fn revision(&self) -> i64 {
        self.current.read().await.revision
    }

    /// Store `next` and save it, unless it equals the current document.
    pub async fn commit(
        &self,
        next: Document,
        coordinator: &PersistenceCoordinator,
    ) -> Option<Committed> {
        let stored = {
            let _writer = self.writer.lock().await;
            self.swap_and_store(next, coordinator).await
        };
        Self::publish(stored, coordinator).await
    }

    /// Derive a new document from the current one and commit it.
    pub async fn modify<F>(
        &self,
        coordinator: &PersistenceCoordinator,
        change: F,
    ) -> Result<Option<Committed>, AppError>
    where
        F: FnOnce(&Document) -> Result<Document, AppError>,
    {
        let stored = {
            let _writer = self.writer.lock().await;
            let next = change(&*self.snapshot().await)?;
            self.swap_and_store(next, coordinator).await
        };
        Ok(Self::publish(stored, coordinator).await)
    }

    /// Swap in `next` and write it locally. `None` when nothing changed.
    async fn swap_and_store(
        &self,
        next: Document,
        coordinator: &PersistenceCoordinator,
    ) -> Option<(Arc<Document>, bool)> {
        let document = {
            let mut current = self.current.write().await;
            if same_content(&current, &next) {
                debug!("document unchanged; skipping save");
                return None;
            }
            let mut next = next;
            next.revision = current.revision + 1;
            let document = Arc::new(next);
            *current = document.clone();
            document
        };

        let local_saved = coordinator.save_local(&document).await;
        Some((document, local_saved))
    }

    async fn publish(
        stored: Option<(Arc<Document>, bool)>,
        coordinator: &PersistenceCoordinator,
    ) -> Option<Committed> {
        let (document, local_saved) = stored?;
        let report = coordinator.sync_remote(&document, local_saved).await;
        Some(Committed { document, report })
    }
}

/// Equality ignoring the revision counter, which drafts may carry stale.
fn same_content(current: &Document, next: &Document) -> bool {
    if current.revision == next.revision {
        return current == next;
    }
    let mut aligned = next.clone();
    aligned.revision = current.revision;
    aligned == *current
}
