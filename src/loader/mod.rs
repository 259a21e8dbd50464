//! Document loader with primary/fallback sources
//!
//! A paginated resource may name two locations for the same document: a
//! primary (typically a remote release asset) and a fallback (a bundled local
//! copy). The loader tries the primary first, bounded by a timeout, and
//! falls back to the local copy on failure.
//!
//! Successful loads are recorded per resource id. The record is observational
//! only: every `load` call re-attempts the sources regardless of it.

mod error;
mod types;

pub use error::LoadError;
pub use types::{LoadAttemptRecord, LoaderStats, RecentLoad, SourceKind};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::Instrument;

use crate::config::LoaderConfig;
use crate::document::{DocumentError, DocumentHandle, DocumentOpener, DocumentResult, OpenOptions};
use crate::resource::ResourceDescriptor;

/// Loads paginated documents, preferring the primary location
#[derive(Clone)]
pub struct ResourceLoader {
    inner: Arc<LoaderInner>,
}

struct LoaderInner {
    opener: Arc<dyn DocumentOpener>,
    config: LoaderConfig,
    primary_first: AtomicBool,
    records: RwLock<HashMap<String, LoadAttemptRecord>>,
}

impl ResourceLoader {
    pub fn new(opener: Arc<dyn DocumentOpener>, config: LoaderConfig) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                opener,
                primary_first: AtomicBool::new(config.primary_first),
                config,
                records: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Load the document for `resource`.
    ///
    /// Fails only when every attempted location fails; no partial handle is
    /// returned.
    pub async fn load(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Arc<dyn DocumentHandle>, LoadError> {
        let span = tracing::info_span!("load", resource_id = %resource.id);
        self.load_sources(resource).instrument(span).await
    }

    async fn load_sources(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Arc<dyn DocumentHandle>, LoadError> {
        let mut tried = Vec::new();
        let mut last_error: Option<DocumentError> = None;

        let primary = resource
            .primary_location
            .as_deref()
            .filter(|_| self.primary_first());

        if let Some(uri) = primary {
            tried.push(SourceKind::Primary);
            match self.load_from(uri).await {
                Ok(handle) => {
                    tracing::info!("Loaded '{}' from primary source", resource.title);
                    self.record(&resource.id, SourceKind::Primary, uri).await;
                    return Ok(handle);
                }
                Err(e) => {
                    tracing::warn!("Primary source failed for '{}': {}", resource.title, e);
                    last_error = Some(e);
                }
            }
        }

        if let Some(uri) = resource.location.as_deref() {
            tried.push(SourceKind::Fallback);
            match self.load_from(uri).await {
                Ok(handle) => {
                    tracing::info!("Loaded '{}' from fallback source", resource.title);
                    self.record(&resource.id, SourceKind::Fallback, uri).await;
                    return Ok(handle);
                }
                Err(e) => {
                    tracing::error!("Fallback source failed for '{}': {}", resource.title, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(LoadError::AllSourcesFailed {
                resource_id: resource.id.clone(),
                tried,
                last_error: e.to_string(),
            }),
            None => Err(LoadError::NoLocation {
                resource_id: resource.id.clone(),
            }),
        }
    }

    /// Open a single location, bounded by the load timeout.
    ///
    /// When the timer wins the race the open future is dropped and its
    /// result is never observed.
    pub async fn load_from(&self, uri: &str) -> DocumentResult<Arc<dyn DocumentHandle>> {
        let limit = self.inner.config.timeout;
        let options = OpenOptions {
            max_bytes: Some(self.inner.config.max_document_bytes),
        };

        tracing::debug!("Opening {}", uri);
        match timeout(limit, self.inner.opener.open(uri, &options)).await {
            Ok(result) => result,
            Err(_) => Err(DocumentError::Timeout(limit.as_millis() as u64)),
        }
    }

    /// Check whether `uri` is reachable. Never fails; errors and timeouts
    /// report `false`.
    pub async fn check_available(&self, uri: &str) -> bool {
        match timeout(self.inner.config.probe_timeout, self.inner.opener.exists(uri)).await {
            Ok(Ok(available)) => available,
            Ok(Err(e)) => {
                tracing::warn!("Availability check failed for {}: {}", uri, e);
                false
            }
            Err(_) => {
                tracing::warn!("Availability check timed out for {}", uri);
                false
            }
        }
    }

    /// Switch between primary-first and fallback-only loading
    pub fn set_primary_first(&self, enabled: bool) {
        self.inner.primary_first.store(enabled, Ordering::Relaxed);
        tracing::info!(
            "Load order set to {}",
            if enabled { "primary first" } else { "fallback only" }
        );
    }

    pub fn primary_first(&self) -> bool {
        self.inner.primary_first.load(Ordering::Relaxed)
    }

    async fn record(&self, resource_id: &str, source: SourceKind, uri: &str) {
        let mut records = self.inner.records.write().await;
        records.insert(
            resource_id.to_string(),
            LoadAttemptRecord {
                source,
                resolved_location: uri.to_string(),
                timestamp: Utc::now(),
            },
        );
    }

    /// Last successful load of a resource
    pub async fn attempt(&self, resource_id: &str) -> Option<LoadAttemptRecord> {
        self.inner.records.read().await.get(resource_id).cloned()
    }

    /// Summarize recorded loads
    pub async fn stats(&self) -> LoaderStats {
        let records = self.inner.records.read().await;

        let mut stats = LoaderStats {
            total: records.len(),
            ..Default::default()
        };
        for (id, record) in records.iter() {
            match record.source {
                SourceKind::Primary => stats.by_primary += 1,
                SourceKind::Fallback => stats.by_fallback += 1,
            }
            stats.recent_successes.push(RecentLoad {
                id: id.clone(),
                source: record.source,
                time: record.timestamp,
            });
        }
        stats
            .recent_successes
            .sort_by(|a, b| b.time.cmp(&a.time).then_with(|| a.id.cmp(&b.id)));
        stats
    }

    pub async fn clear_cache(&self) {
        tracing::info!("Clearing document load records");
        self.inner.records.write().await.clear();
    }

    /// Warm the first few paginated documents in the background.
    ///
    /// Returns immediately. Failures are logged and otherwise ignored.
    pub fn preload(&self, resources: &[ResourceDescriptor]) -> Vec<JoinHandle<()>> {
        let targets: Vec<ResourceDescriptor> = resources
            .iter()
            .filter(|r| r.is_paginated())
            .take(self.inner.config.preload_limit)
            .cloned()
            .collect();

        tracing::info!("Preloading {} documents", targets.len());

        targets
            .into_iter()
            .map(|resource| {
                let loader = self.clone();
                tokio::spawn(async move {
                    match loader.load(&resource).await {
                        Ok(_) => tracing::debug!("Preloaded '{}'", resource.title),
                        Err(e) => tracing::warn!("Preload failed for '{}': {}", resource.title, e),
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::resource::ResourceKind;
    use crate::testing::{pdf, pdf_with_primary, resource, Behavior, FakeOpener};

    fn loader_with(opener: Arc<FakeOpener>) -> ResourceLoader {
        ResourceLoader::new(opener, LoaderConfig::default())
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let res = pdf_with_primary("intro", "beginner");
        let primary = res.primary_location.clone().unwrap();
        let opener = FakeOpener::new()
            .with(&primary, Behavior::Pages(4))
            .with("intro.loc", Behavior::Pages(4));
        let loader = loader_with(opener.clone());

        let handle = loader.load(&res).await.unwrap();
        assert_eq!(handle.page_count(), 4);
        assert_eq!(opener.calls(), vec![primary.clone()]);

        let record = loader.attempt("intro").await.unwrap();
        assert_eq!(record.source, SourceKind::Primary);
        assert_eq!(record.resolved_location, primary);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let res = pdf_with_primary("intro", "beginner");
        let primary = res.primary_location.clone().unwrap();
        let opener = FakeOpener::new()
            .with(&primary, Behavior::Fail("release asset missing".into()))
            .with("intro.loc", Behavior::Pages(2));
        let loader = loader_with(opener.clone());

        let handle = loader.load(&res).await.unwrap();
        assert_eq!(handle.page_count(), 2);

        let record = loader.attempt("intro").await.unwrap();
        assert_eq!(record.source, SourceKind::Fallback);
        assert_eq!(record.resolved_location, "intro.loc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_primary_times_out() {
        let res = pdf_with_primary("intro", "beginner");
        let primary = res.primary_location.clone().unwrap();
        let opener = FakeOpener::new()
            .with(&primary, Behavior::Hang)
            .with("intro.loc", Behavior::Delay(Duration::from_secs(2), 3));
        let loader = loader_with(opener);

        let start = tokio::time::Instant::now();
        let handle = loader.load(&res).await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(handle.page_count(), 3);
        assert!(elapsed >= Duration::from_secs(15));
        assert!(elapsed <= Duration::from_secs(17) + Duration::from_millis(100));
        assert_eq!(
            loader.attempt("intro").await.unwrap().source,
            SourceKind::Fallback
        );
    }

    #[tokio::test]
    async fn test_both_sources_fail() {
        let res = pdf_with_primary("intro", "beginner");
        let primary = res.primary_location.clone().unwrap();
        let opener = FakeOpener::new()
            .with(&primary, Behavior::Fail("primary down".into()))
            .with("intro.loc", Behavior::Fail("local copy corrupt".into()));
        let loader = loader_with(opener);

        match loader.load(&res).await {
            Err(LoadError::AllSourcesFailed { tried, last_error, .. }) => {
                assert_eq!(tried, vec![SourceKind::Primary, SourceKind::Fallback]);
                assert!(last_error.contains("local copy corrupt"));
            }
            _ => panic!("expected AllSourcesFailed"),
        }
        assert!(loader.attempt("intro").await.is_none());
    }

    #[tokio::test]
    async fn test_fallback_only_failure() {
        let loader = loader_with(FakeOpener::new().with("solo.loc", Behavior::Fail("gone".into())));

        match loader.load(&pdf("solo", "tools")).await {
            Err(LoadError::AllSourcesFailed { tried, .. }) => {
                assert_eq!(tried, vec![SourceKind::Fallback])
            }
            _ => panic!("expected AllSourcesFailed"),
        }

        let mut nowhere = pdf("nowhere", "tools");
        nowhere.location = None;
        assert!(matches!(
            loader.load(&nowhere).await,
            Err(LoadError::NoLocation { .. })
        ));
    }

    #[tokio::test]
    async fn test_primary_first_disabled() {
        let res = pdf_with_primary("intro", "beginner");
        let primary = res.primary_location.clone().unwrap();
        let opener = FakeOpener::new()
            .with(&primary, Behavior::Pages(9))
            .with("intro.loc", Behavior::Pages(1));
        let loader = loader_with(opener.clone());

        loader.set_primary_first(false);
        assert!(!loader.primary_first());

        loader.load(&res).await.unwrap();
        assert_eq!(opener.call_count(&primary), 0);
        assert_eq!(loader.attempt("intro").await.unwrap().source, SourceKind::Fallback);
    }

    #[tokio::test]
    async fn test_every_load_reattempts() {
        let res = pdf_with_primary("intro", "beginner");
        let primary = res.primary_location.clone().unwrap();
        let opener = FakeOpener::new().with(&primary, Behavior::Pages(1));
        let loader = loader_with(opener.clone());

        loader.load(&res).await.unwrap();
        loader.load(&res).await.unwrap();
        assert_eq!(opener.call_count(&primary), 2);
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let a = pdf_with_primary("a", "x");
        let b = pdf_with_primary("b", "x");
        let c = pdf("c", "x");
        let opener = FakeOpener::new()
            .with(a.primary_location.as_deref().unwrap(), Behavior::Pages(1))
            .with(b.primary_location.as_deref().unwrap(), Behavior::Fail("down".into()))
            .with("b.loc", Behavior::Pages(1))
            .with("c.loc", Behavior::Pages(1));
        let loader = loader_with(opener);

        for res in [&a, &b, &c] {
            loader.load(res).await.unwrap();
        }

        let stats = loader.stats().await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_primary, 1);
        assert_eq!(stats.by_fallback, 2);
        assert_eq!(stats.recent_successes.len(), 3);

        loader.clear_cache().await;
        assert_eq!(loader.stats().await, LoaderStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_available_never_fails() {
        let opener = FakeOpener::new()
            .with("up.pdf", Behavior::Pages(1))
            .with("broken.pdf", Behavior::Fail("boom".into()))
            .with("slow.pdf", Behavior::Hang);
        let loader = loader_with(opener);

        assert!(loader.check_available("up.pdf").await);
        assert!(!loader.check_available("missing.pdf").await);
        assert!(!loader.check_available("broken.pdf").await);

        let start = tokio::time::Instant::now();
        assert!(!loader.check_available("slow.pdf").await);
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_preload_first_three_documents() {
        let resources = vec![
            resource("video", ResourceKind::EmbeddedVideo, "x"),
            pdf("p1", "x"),
            pdf("p2", "x"),
            pdf("p3", "x"),
            pdf("p4", "x"),
        ];
        let opener = FakeOpener::new()
            .with("p1.loc", Behavior::Pages(1))
            .with("p2.loc", Behavior::Fail("unreachable".into()))
            .with("p3.loc", Behavior::Pages(1))
            .with("p4.loc", Behavior::Pages(1));
        let loader = loader_with(opener.clone());

        let handles = loader.preload(&resources);
        assert_eq!(handles.len(), 3);
        for result in futures::future::join_all(handles).await {
            assert!(result.is_ok());
        }

        assert_eq!(opener.call_count("p4.loc"), 0);
        assert_eq!(opener.call_count("video.loc"), 0);
        assert_eq!(loader.stats().await.total, 2);
    }
}
