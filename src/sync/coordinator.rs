//! Persistence coordinator.
//!
//! Load prefers the remote copy and falls back to the local store, then to
//! the compiled-in default. Save always writes locally first, then pushes
//! to the remote with a bounded, linearly backed-off retry. The remote
//! outcome is reported to the caller and kept for status queries.
//!
//! The two save phases are separate calls so a caller can release its own
//! locks between them: a hung remote only delays the push.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use super::RemoteClient;
use crate::db::LocalStore;
use crate::models::{initial_document, Document};

/// Fraction of the payload ceiling at which a warning is logged.
const PAYLOAD_WARN_RATIO: f64 = 0.9;

/// Durability of the last save as far as the remote copy is concerned.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SyncStatus {
    /// Remote accepted the document.
    Synced,
    /// Offline or no remote configured; only the local copy was written.
    LocalOnly,
    /// Remote push was attempted and every attempt failed.
    Failed,
}

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LoadSource {
    Remote,
    Local,
    Default,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub document: Document,
    pub source: LoadSource,
}

/// Result of one save.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub local_saved: bool,
    pub remote: SyncStatus,
    pub payload_chars: usize,
}

/// Last observed sync state, exposed to the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub online: bool,
    pub remote_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<SyncStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub payload_limit: usize,
}

/// Retry settings for remote pushes.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Default)]
struct LastSync {
    status: Option<SyncStatus>,
    at: Option<String>,
    error: Option<String>,
}

/// Reconciles the remote copy with the local cache.
pub struct PersistenceCoordinator {
    local: LocalStore,
    remote: Option<RemoteClient>,
    online: AtomicBool,
    retry: RetryPolicy,
    payload_limit: usize,
    last: RwLock<LastSync>,
    // Pushes run one at a time; a revision older than the last pushed one is dropped.
    push_gate: Mutex<()>,
    pushed_revision: AtomicI64,
}

impl PersistenceCoordinator {
    pub fn new(
        local: LocalStore,
        remote: Option<RemoteClient>,
        online: bool,
        retry: RetryPolicy,
        payload_limit: usize,
    ) -> Self {
        Self {
            local,
            remote,
            online: AtomicBool::new(online),
            retry,
            payload_limit,
            last: RwLock::new(LastSync::default()),
            push_gate: Mutex::new(()),
            pushed_revision: AtomicI64::new(i64::MIN),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        info!(online, "connectivity changed");
    }

    fn active_remote(&self) -> Option<&RemoteClient> {
        if self.is_online() {
            self.remote.as_ref()
        } else {
            None
        }
    }

    /// Load the document: remote first, then local, then the default.
    pub async fn load(&self) -> LoadOutcome {
        if let Some(remote) = self.active_remote() {
            match remote.fetch().await {
                Ok(document) if document.has_presence_marker() => {
                    info!(revision = document.revision, "document loaded from remote");
                    return LoadOutcome {
                        document,
                        source: LoadSource::Remote,
                    };
                }
                Ok(_) => warn!("remote returned a placeholder document; using local copy"),
                Err(e) => warn!(error = %e, "remote unavailable; using local copy"),
            }
        }

        match self.local.get_document().await {
            Ok(Some(document)) => {
                info!(revision = document.revision, "document loaded from local store");
                LoadOutcome {
                    document,
                    source: LoadSource::Local,
                }
            }
            Ok(None) => {
                info!("no stored document; using defaults");
                LoadOutcome {
                    document: initial_document(),
                    source: LoadSource::Default,
                }
            }
            Err(e) => {
                warn!(error = %e, "local store unreadable; using defaults");
                LoadOutcome {
                    document: initial_document(),
                    source: LoadSource::Default,
                }
            }
        }
    }

    /// Save locally, then push to the remote when online.
    pub async fn save(&self, document: &Document) -> SaveReport {
        let local_saved = self.save_local(document).await;
        self.sync_remote(document, local_saved).await
    }

    /// Write the document to the local store. Never touches the network.
    pub async fn save_local(&self, document: &Document) -> bool {
        match self.local.put_document(document).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "local save failed");
                false
            }
        }
    }

    /// Push an already saved document to the remote when online.
    ///
    /// Pushes are serialized. If a newer revision reached the remote while
    /// this one waited, the push is skipped and the newer outcome reported.
    pub async fn sync_remote(&self, document: &Document, local_saved: bool) -> SaveReport {
        let body = match serde_json::to_string(document) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "failed to serialize document for remote push");
                let report = SaveReport {
                    local_saved,
                    remote: SyncStatus::Failed,
                    payload_chars: 0,
                };
                self.record(report.remote, Some(e.to_string())).await;
                return report;
            }
        };
        let payload_chars = body.chars().count();

        let Some(client) = self.active_remote() else {
            self.record(SyncStatus::LocalOnly, None).await;
            return SaveReport {
                local_saved,
                remote: SyncStatus::LocalOnly,
                payload_chars,
            };
        };

        let _gate = self.push_gate.lock().await;
        if self.pushed_revision.load(Ordering::SeqCst) > document.revision {
            debug!(revision = document.revision, "newer revision already pushed; skipping");
            let remote = self.last.read().await.status.unwrap_or(SyncStatus::Failed);
            return SaveReport {
                local_saved,
                remote,
                payload_chars,
            };
        }

        self.check_payload(payload_chars);
        let (remote, last_error) = self.push_with_retry(client, body).await;
        self.pushed_revision.store(document.revision, Ordering::SeqCst);
        self.record(remote, last_error).await;

        SaveReport {
            local_saved,
            remote,
            payload_chars,
        }
    }

    fn check_payload(&self, payload_chars: usize) {
        let limit = self.payload_limit;
        if payload_chars > limit {
            warn!(
                payload_chars,
                limit, "document exceeds the remote payload ceiling; cloud sync will likely fail"
            );
        } else if payload_chars as f64 >= limit as f64 * PAYLOAD_WARN_RATIO {
            warn!(
                payload_chars,
                limit, "document is approaching the remote payload ceiling"
            );
        }
    }

    async fn push_with_retry(
        &self,
        client: &RemoteClient,
        body: String,
    ) -> (SyncStatus, Option<String>) {
        let attempts = self.retry.attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match client.push(body.clone()).await {
                Ok(()) => {
                    info!(attempt, "document pushed to remote");
                    return (SyncStatus::Synced, None);
                }
                Err(e) if attempt < attempts => {
                    warn!(error = %e, attempt, total = attempts, "remote push failed; retrying");
                    last_error = Some(e.to_string());
                    let delay = self
                        .retry
                        .base_delay
                        .checked_mul(attempt as u32)
                        .unwrap_or(Duration::MAX);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(error = %e, attempts, "remote push failed after retries");
                    last_error = Some(e.to_string());
                }
            }
        }

        (SyncStatus::Failed, last_error)
    }

    async fn record(&self, status: SyncStatus, error: Option<String>) {
        let mut last = self.last.write().await;
        last.status = Some(status);
        last.at = Some(Utc::now().to_rfc3339());
        last.error = error;
    }

    /// Current connectivity and last save outcome.
    pub async fn snapshot(&self) -> SyncSnapshot {
        let last = self.last.read().await;
        SyncSnapshot {
            online: self.is_online(),
            remote_configured: self.remote.is_some(),
            last_status: last.status,
            last_attempt_at: last.at.clone(),
            last_error: last.error.clone(),
            payload_limit: self.payload_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{initial_document, GalleryItem};
    use crate::sync::mock_remote::MockRemote;
    use tempfile::TempDir;

    const FAST_RETRY: RetryPolicy = RetryPolicy {
        attempts: 3,
        base_delay: Duration::from_millis(1),
    };

    async fn local_store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("sync.sqlite"))
            .await
            .unwrap();
        (LocalStore::new(pool), temp_dir)
    }

    fn remote(url: String) -> Option<RemoteClient> {
        Some(RemoteClient::new(url, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_offline_save_then_load_round_trip() {
        let (local, _dir) = local_store().await;
        let coordinator = PersistenceCoordinator::new(local, None, false, FAST_RETRY, 50_000);

        let mut doc = initial_document();
        doc.school_name = "Round Trip High".to_string();

        let report = coordinator.save(&doc).await;
        assert!(report.local_saved);
        assert_eq!(report.remote, SyncStatus::LocalOnly);

        let loaded = coordinator.load().await;
        assert_eq!(loaded.source, LoadSource::Local);
        assert_eq!(loaded.document, doc);
    }

    #[tokio::test]
    async fn test_double_save_keeps_exact_document() {
        let (local, _dir) = local_store().await;
        let coordinator =
            PersistenceCoordinator::new(local.clone(), None, false, FAST_RETRY, 50_000);

        let first = initial_document();
        let mut second = initial_document();
        second.notices.clear();

        coordinator.save(&first).await;
        coordinator.save(&second).await;

        assert_eq!(local.get_document().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_load_defaults_when_everything_empty() {
        let (local, _dir) = local_store().await;
        let coordinator = PersistenceCoordinator::new(local, None, true, FAST_RETRY, 50_000);

        let loaded = coordinator.load().await;
        assert_eq!(loaded.source, LoadSource::Default);
        assert_eq!(loaded.document, initial_document());
    }

    #[tokio::test]
    async fn test_load_prefers_remote() {
        let (local, _dir) = local_store().await;
        local.put_document(&initial_document()).await.unwrap();

        let mut remote_doc = initial_document();
        remote_doc.revision = 9;
        let mock = MockRemote::default();
        mock.set_body(&serde_json::to_string(&remote_doc).unwrap());
        let url = mock.spawn().await;

        let coordinator =
            PersistenceCoordinator::new(local, remote(url), true, FAST_RETRY, 50_000);
        let loaded = coordinator.load().await;

        assert_eq!(loaded.source, LoadSource::Remote);
        assert_eq!(loaded.document.revision, 9);
    }

    #[tokio::test]
    async fn test_remote_document_matching_default_name_is_accepted() {
        let (local, _dir) = local_store().await;
        let remote_doc = initial_document();
        let mock = MockRemote::default();
        mock.set_body(&serde_json::to_string(&remote_doc).unwrap());
        let url = mock.spawn().await;

        let coordinator =
            PersistenceCoordinator::new(local, remote(url), true, FAST_RETRY, 50_000);
        assert_eq!(coordinator.load().await.source, LoadSource::Remote);
    }

    #[tokio::test]
    async fn test_placeholder_remote_falls_back_to_local() {
        let (local, _dir) = local_store().await;
        let mut local_doc = initial_document();
        local_doc.motto = "Local motto".to_string();
        local.put_document(&local_doc).await.unwrap();

        let mock = MockRemote::default();
        mock.set_body(r#"{"schoolName":"Unmarked"}"#);
        let url = mock.spawn().await;

        let coordinator =
            PersistenceCoordinator::new(local, remote(url), true, FAST_RETRY, 50_000);
        let loaded = coordinator.load().await;

        assert_eq!(loaded.source, LoadSource::Local);
        assert_eq!(loaded.document.motto, "Local motto");
    }

    #[tokio::test]
    async fn test_offline_skips_remote() {
        let (local, _dir) = local_store().await;
        let mock = MockRemote::default();
        let url = mock.spawn().await;

        let coordinator =
            PersistenceCoordinator::new(local, remote(url), false, FAST_RETRY, 50_000);
        let report = coordinator.save(&initial_document()).await;

        assert_eq!(report.remote, SyncStatus::LocalOnly);
        assert_eq!(mock.post_count(), 0);
    }

    #[tokio::test]
    async fn test_save_pushes_and_reports_synced() {
        let (local, _dir) = local_store().await;
        let mock = MockRemote::default();
        let url = mock.spawn().await;

        let coordinator =
            PersistenceCoordinator::new(local, remote(url), true, FAST_RETRY, 50_000);
        let doc = initial_document();
        let report = coordinator.save(&doc).await;

        assert!(report.local_saved);
        assert_eq!(report.remote, SyncStatus::Synced);
        let pushed: Document = serde_json::from_str(&mock.body().unwrap()).unwrap();
        assert_eq!(pushed, doc);
        assert_eq!(
            coordinator.snapshot().await.last_status,
            Some(SyncStatus::Synced)
        );
    }

    #[tokio::test]
    async fn test_transient_remote_failure_is_retried() {
        let (local, _dir) = local_store().await;
        let mock = MockRemote::default();
        mock.fail_next_posts(2);
        let url = mock.spawn().await;

        let coordinator =
            PersistenceCoordinator::new(local, remote(url), true, FAST_RETRY, 50_000);
        let report = coordinator.save(&initial_document()).await;

        assert_eq!(report.remote, SyncStatus::Synced);
        assert_eq!(mock.post_count(), 3);
    }

    #[tokio::test]
    async fn test_oversized_document_saves_locally_but_fails_remote() {
        let (local, _dir) = local_store().await;
        let limit = 50_000;
        let mock = MockRemote::with_limit(limit);
        let url = mock.spawn().await;

        let mut doc = initial_document();
        doc.gallery.push(GalleryItem {
            id: "big".to_string(),
            url: format!("data:image/png;base64,{}", "A".repeat(limit + 1)),
            ..GalleryItem::default()
        });

        let coordinator =
            PersistenceCoordinator::new(local.clone(), remote(url), true, FAST_RETRY, limit);
        let report = coordinator.save(&doc).await;

        assert!(report.local_saved);
        assert!(report.payload_chars > limit);
        assert_eq!(report.remote, SyncStatus::Failed);
        assert_eq!(mock.post_count(), FAST_RETRY.attempts);
        assert_eq!(local.get_document().await.unwrap(), Some(doc));

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.last_status, Some(SyncStatus::Failed));
        assert!(snapshot.last_error.is_some());
    }

    #[tokio::test]
    async fn test_stale_revision_is_not_pushed_over_newer() {
        let (local, _dir) = local_store().await;
        let mock = MockRemote::default();
        let url = mock.spawn().await;
        let coordinator =
            PersistenceCoordinator::new(local, remote(url), true, FAST_RETRY, 50_000);

        let mut newer = initial_document();
        newer.revision = 2;
        newer.motto = "newer".to_string();
        let mut older = initial_document();
        older.revision = 1;
        older.motto = "older".to_string();

        assert_eq!(coordinator.save(&newer).await.remote, SyncStatus::Synced);
        let report = coordinator.save(&older).await;

        assert!(report.local_saved);
        assert_eq!(report.remote, SyncStatus::Synced);
        assert_eq!(mock.post_count(), 1);
        let pushed: Document = serde_json::from_str(&mock.body().unwrap()).unwrap();
        assert_eq!(pushed.motto, "newer");
    }

    #[tokio::test]
    async fn test_save_local_does_not_touch_remote() {
        let (local, _dir) = local_store().await;
        let mock = MockRemote::default();
        let url = mock.spawn().await;
        let coordinator =
            PersistenceCoordinator::new(local.clone(), remote(url), true, FAST_RETRY, 50_000);

        let doc = initial_document();
        assert!(coordinator.save_local(&doc).await);

        assert_eq!(mock.post_count(), 0);
        assert_eq!(local.get_document().await.unwrap(), Some(doc));
        assert!(coordinator.snapshot().await.last_status.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_on_load() {
        let (local, _dir) = local_store().await;
        let coordinator = PersistenceCoordinator::new(
            local,
            remote("http://127.0.0.1:9/exec".to_string()),
            true,
            FAST_RETRY,
            50_000,
        );

        let loaded = coordinator.load().await;
        assert_eq!(loaded.source, LoadSource::Default);
    }
}
