use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::shared::AppError;

/// Searchable projection of a stored room
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    pub create_time: DateTime<Utc>,
}

/// Exact-match query on the `name` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    pub name: String,
}

impl NameQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn matches(&self, entry: &IndexEntry) -> bool {
        entry.name == self.name
    }
}

impl fmt::Display for NameQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}", self.name)
    }
}

/// Fully materialized result of an index query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Number of matches the index reports
    pub count: usize,
    /// Matching room ids in index iteration order
    pub ids: Vec<String>,
}

impl SearchResults {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            count: ids.len(),
            ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Trait for the full-text index that mirrors the room store
#[async_trait]
pub trait RoomIndex {
    /// Writes or replaces the entry stored under `entry.id`
    async fn put_entry(&self, entry: &IndexEntry) -> Result<(), AppError>;
    async fn search(&self, query: &NameQuery) -> Result<SearchResults, AppError>;
}

struct PendingEntry {
    entry: IndexEntry,
    visible_at: Instant,
}

/// In-memory index with asynchronous-looking visibility
///
/// Entries become searchable only after `visibility_delay` has elapsed since
/// they were written, the way a managed search service applies writes in the
/// background. A zero delay gives read-your-writes behaviour.
pub struct InMemoryRoomIndex {
    entries: Mutex<Vec<PendingEntry>>,
    visibility_delay: Duration,
}

impl Default for InMemoryRoomIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomIndex {
    /// Creates an index where writes are visible immediately
    pub fn new() -> Self {
        Self::with_visibility_delay(Duration::ZERO)
    }

    pub fn with_visibility_delay(visibility_delay: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            visibility_delay,
        }
    }

    pub fn visibility_delay(&self) -> Duration {
        self.visibility_delay
    }

    /// Number of entries written, visible or not
    pub fn entry_count(&self) -> usize {
        self.entries.lock().expect("room index lock poisoned").len()
    }
}

#[async_trait]
impl RoomIndex for InMemoryRoomIndex {
    #[instrument(skip(self, entry), fields(room_id = %entry.id))]
    async fn put_entry(&self, entry: &IndexEntry) -> Result<(), AppError> {
        let visible_at = Instant::now() + self.visibility_delay;
        let mut entries = self.entries.lock().map_err(|_| AppError::Internal)?;

        match entries.iter_mut().find(|pending| pending.entry.id == entry.id) {
            Some(existing) => {
                debug!(name = %entry.name, "Replacing index entry");
                existing.entry = entry.clone();
                existing.visible_at = visible_at;
            }
            None => {
                debug!(name = %entry.name, "Adding index entry");
                entries.push(PendingEntry {
                    entry: entry.clone(),
                    visible_at,
                });
            }
        }

        Ok(())
    }

    #[instrument(skip(self, query), fields(query = %query))]
    async fn search(&self, query: &NameQuery) -> Result<SearchResults, AppError> {
        let now = Instant::now();
        let entries = self.entries.lock().map_err(|_| AppError::Internal)?;

        let mut pending = 0usize;
        let ids = entries
            .iter()
            .filter(|candidate| query.matches(&candidate.entry))
            .filter(|candidate| {
                let visible = candidate.visible_at <= now;
                if !visible {
                    pending += 1;
                }
                visible
            })
            .map(|candidate| candidate.entry.id.clone())
            .collect::<Vec<_>>();

        debug!(matches = ids.len(), pending, "Index search finished");
        Ok(SearchResults::new(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    fn entry(id: &str, name: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            name: name.to_string(),
            create_time: Utc::now(),
        }
    }

    #[test]
    fn test_query_display() {
        assert_eq!(NameQuery::new("aardvark").to_string(), "Name: aardvark");
    }

    #[tokio::test]
    async fn test_search_exact_name() {
        let index = InMemoryRoomIndex::new();
        index.put_entry(&entry("1", "aardvark")).await.unwrap();
        index.put_entry(&entry("2", "aardwolf")).await.unwrap();
        index.put_entry(&entry("3", "aardvark")).await.unwrap();

        let results = index.search(&NameQuery::new("aardvark")).await.unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(results.ids, vec!["1".to_string(), "3".to_string()]);
    }

    #[tokio::test]
    async fn test_search_does_not_match_prefix_or_case() {
        let index = InMemoryRoomIndex::new();
        index.put_entry(&entry("1", "aardvark")).await.unwrap();

        for name in ["aard", "Aardvark", "aardvark "] {
            let results = index.search(&NameQuery::new(name)).await.unwrap();
            assert!(results.is_empty(), "{name:?} should not match");
        }
    }

    #[tokio::test]
    async fn test_search_unknown_name_is_empty() {
        let index = InMemoryRoomIndex::new();
        index.put_entry(&entry("1", "aardvark")).await.unwrap();

        let results = index.search(&NameQuery::new("zebra")).await.unwrap();
        assert_eq!(results, SearchResults::default());
    }

    #[tokio::test]
    async fn test_put_replaces_entry_in_place() {
        let index = InMemoryRoomIndex::new();
        index.put_entry(&entry("1", "old")).await.unwrap();
        index.put_entry(&entry("2", "new")).await.unwrap();
        index.put_entry(&entry("1", "new")).await.unwrap();

        assert_eq!(index.entry_count(), 2);
        assert!(index.search(&NameQuery::new("old")).await.unwrap().is_empty());

        let results = index.search(&NameQuery::new("new")).await.unwrap();
        assert_eq!(results.ids, vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_hidden_until_delay_elapses() {
        let index = InMemoryRoomIndex::with_visibility_delay(Duration::from_millis(500));
        index.put_entry(&entry("1", "aardvark")).await.unwrap();

        let query = NameQuery::new("aardvark");
        assert_eq!(index.search(&query).await.unwrap().count, 0);

        tokio::time::advance(Duration::from_millis(499)).await;
        assert_eq!(index.search(&query).await.unwrap().count, 0);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(index.visibility_delay(), Duration::from_millis(500));
        let results = index.search(&query).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.ids, vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_not_reported_as_empty() {
        let index = Arc::new(InMemoryRoomIndex::new());
        index.put_entry(&entry("1", "aardvark")).await.unwrap();

        let poisoned = Arc::clone(&index);
        let _ = std::thread::spawn(move || {
            let _guard = poisoned.entries.lock().unwrap();
            panic!("poisoning room index lock");
        })
        .join();

        let count = panic::catch_unwind(AssertUnwindSafe(|| index.entry_count()));
        assert!(count.is_err());

        let result = index.search(&NameQuery::new("aardvark")).await;
        assert!(matches!(result, Err(AppError::Internal)));
    }
}
