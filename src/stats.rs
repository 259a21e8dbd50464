//! View and like counters
//!
//! Counters for every resource are stored together as one JSON object under
//! the stats key, `{ "<id>": { "views", "likes", "lastViewed" } }`, and are
//! rewritten in full on every change. A separate key holds the number of
//! page visits.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::ResourceDescriptor;
use crate::storage::{KeyValueStore, Result};

/// Persisted counters for one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterRecord {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(rename = "lastViewed", default, skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<DateTime<Utc>>,
}

/// Platform-wide totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub views: u64,
    pub likes: u64,
}

/// Reads and writes counters through a key-value store
#[derive(Clone)]
pub struct CounterStore {
    store: Arc<dyn KeyValueStore>,
    stats_key: String,
    page_visits_key: String,
}

impl CounterStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        stats_key: impl Into<String>,
        page_visits_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            stats_key: stats_key.into(),
            page_visits_key: page_visits_key.into(),
        }
    }

    /// Load all persisted counters; a missing key yields an empty map
    pub async fn load(&self) -> Result<HashMap<String, CounterRecord>> {
        match self.store.get(&self.stats_key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(HashMap::new()),
        }
    }

    /// Overwrite the persisted counters with the values in `resources`
    pub async fn save(
        &self,
        resources: &[ResourceDescriptor],
        last_viewed: &HashMap<String, DateTime<Utc>>,
    ) -> Result<()> {
        let records: HashMap<&str, CounterRecord> = resources
            .iter()
            .map(|r| {
                (
                    r.id.as_str(),
                    CounterRecord {
                        views: r.views,
                        likes: r.likes,
                        last_viewed: last_viewed.get(&r.id).copied(),
                    },
                )
            })
            .collect();

        let raw = serde_json::to_string(&records)?;
        self.store.set(&self.stats_key, &raw).await
    }

    /// Increment the page-visit counter and return the new value
    pub async fn record_page_visit(&self) -> Result<u64> {
        let current = self
            .store
            .get(&self.page_visits_key)
            .await?
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let next = current + 1;
        self.store
            .set(&self.page_visits_key, &next.to_string())
            .await?;
        Ok(next)
    }
}

/// Copy persisted counters onto `resources`; resources without a record
/// start at zero
pub fn merge_counters(
    resources: &mut [ResourceDescriptor],
    counters: &HashMap<String, CounterRecord>,
) {
    for resource in resources.iter_mut() {
        let record = counters.get(&resource.id).cloned().unwrap_or_default();
        resource.views = record.views;
        resource.likes = record.likes;
    }
}

pub fn totals(resources: &[ResourceDescriptor]) -> Totals {
    resources.iter().fold(Totals::default(), |acc, r| Totals {
        views: acc.views + r.views,
        likes: acc.likes + r.likes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::pdf;

    fn counter_store() -> (Arc<MemoryStore>, CounterStore) {
        let memory = Arc::new(MemoryStore::new());
        let counters = CounterStore::new(memory.clone(), "ai_stats", "views_content_viewer");
        (memory, counters)
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let (_, counters) = counter_store();
        assert!(counters.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_merge() {
        let (memory, counters) = counter_store();

        let mut resources = vec![pdf("a", "x"), pdf("b", "x")];
        resources[0].views = 3;
        resources[1].likes = 2;

        let viewed_at = Utc::now();
        let last_viewed = HashMap::from([("a".to_string(), viewed_at)]);
        counters.save(&resources, &last_viewed).await.unwrap();

        let raw = memory.get("ai_stats").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["a"]["views"], 3);
        assert_eq!(value["b"]["likes"], 2);
        assert!(value["a"]["lastViewed"].is_string());
        assert!(value["b"].get("lastViewed").is_none());

        let loaded = counters.load().await.unwrap();
        let mut fresh = vec![pdf("a", "x"), pdf("b", "x"), pdf("c", "x")];
        fresh[2].views = 99;
        merge_counters(&mut fresh, &loaded);

        assert_eq!(fresh[0].views, 3);
        assert_eq!(fresh[1].likes, 2);
        assert_eq!(fresh[2].views, 0);
        assert_eq!(totals(&fresh), Totals { views: 3, likes: 2 });
    }

    #[tokio::test]
    async fn test_corrupt_counters_error() {
        let (memory, counters) = counter_store();
        memory.set("ai_stats", "not json").await.unwrap();
        assert!(counters.load().await.is_err());
    }

    #[tokio::test]
    async fn test_page_visits() {
        let (memory, counters) = counter_store();
        memory.set("views_content_viewer", "garbage").await.unwrap();
        assert_eq!(counters.record_page_visit().await.unwrap(), 1);
        assert_eq!(counters.record_page_visit().await.unwrap(), 2);
        assert_eq!(memory.get("views_content_viewer").await.unwrap().as_deref(), Some("2"));
    }
}
