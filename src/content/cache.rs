//! Process-lifetime memoization of content loads.
//!
//! Caches by call-argument identity; no eviction, no size bound.
//! Entries live until process restart. Failed loads are not cached, so a
//! transient store failure is retried on the next call.

use super::{ContentBundle, ContentStore, SectionItem};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Memoizing wrapper around a [`ContentStore`].
pub struct ContentCache {
    store: Arc<dyn ContentStore>,
    history: RwLock<Option<Arc<ContentBundle>>>,
    sections: RwLock<HashMap<String, Arc<Vec<SectionItem>>>>,
}

impl ContentCache {
    /// Wrap a content store with a memoizing cache.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            history: RwLock::new(None),
            sections: RwLock::new(HashMap::new()),
        }
    }

    /// History content, loading it on first access.
    pub async fn history(&self) -> Result<Arc<ContentBundle>> {
        if let Some(bundle) = self.history.read().await.as_ref() {
            return Ok(bundle.clone());
        }

        // Write lock held across the load so concurrent callers wait for
        // one fetch instead of issuing their own.
        let mut slot = self.history.write().await;
        if let Some(bundle) = slot.as_ref() {
            return Ok(bundle.clone());
        }

        debug!("History cache miss, loading from store");
        let bundle = Arc::new(self.store.load_history().await?);
        *slot = Some(bundle.clone());
        Ok(bundle)
    }

    /// Section items, loading them on first access per section name.
    pub async fn section(&self, section: &str) -> Result<Arc<Vec<SectionItem>>> {
        if let Some(items) = self.sections.read().await.get(section) {
            return Ok(items.clone());
        }

        let mut map = self.sections.write().await;
        if let Some(items) = map.get(section) {
            return Ok(items.clone());
        }

        debug!("Section cache miss for {}", section);
        let items = Arc::new(self.store.load_section(section).await?);
        map.insert(section.to_string(), items.clone());
        Ok(items)
    }

    /// Drop all cached entries.
    pub async fn invalidate(&self) {
        *self.history.write().await = None;
        self.sections.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaddockError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        history_loads: AtomicUsize,
        section_loads: AtomicUsize,
        fail_first: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                history_loads: AtomicUsize::new(0),
                section_loads: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
            }
        }

        fn failing_once() -> Self {
            let store = Self::new();
            store.fail_first.store(1, Ordering::SeqCst);
            store
        }
    }

    #[async_trait]
    impl ContentStore for CountingStore {
        async fn load_history(&self) -> Result<ContentBundle> {
            self.history_loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_first.swap(0, Ordering::SeqCst) > 0 {
                return Err(PaddockError::Content("unreachable".to_string()));
            }
            Ok(ContentBundle {
                text: "Seventy-five years of racing.".to_string(),
                images: Vec::new(),
            })
        }

        async fn load_section(&self, _section: &str) -> Result<Vec<SectionItem>> {
            self.section_loads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![SectionItem {
                name: "Monza".to_string(),
                content: Some("Temple of speed.".to_string()),
                image: None,
            }])
        }
    }

    #[tokio::test]
    async fn test_history_loaded_once() {
        let store = Arc::new(CountingStore::new());
        let cache = ContentCache::new(store.clone());

        let first = cache.history().await.unwrap();
        let second = cache.history().await.unwrap();

        assert_eq!(first.text, second.text);
        assert_eq!(store.history_loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sections_cached_per_name() {
        let store = Arc::new(CountingStore::new());
        let cache = ContentCache::new(store.clone());

        cache.section("Tracks").await.unwrap();
        cache.section("Tracks").await.unwrap();
        cache.section("Drivers").await.unwrap();

        assert_eq!(store.section_loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let store = Arc::new(CountingStore::failing_once());
        let cache = ContentCache::new(store.clone());

        assert!(cache.history().await.is_err());
        assert!(cache.history().await.is_ok());
        assert_eq!(store.history_loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_reloads() {
        let store = Arc::new(CountingStore::new());
        let cache = ContentCache::new(store.clone());

        cache.history().await.unwrap();
        cache.invalidate().await;
        cache.history().await.unwrap();

        assert_eq!(store.history_loads.load(Ordering::SeqCst), 2);
    }
}
