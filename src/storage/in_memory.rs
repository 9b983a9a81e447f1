//! In-memory implementation of DataService for tests and local development

use crate::core::entity::{Content, Document};
use crate::core::error::StorageError;
use crate::core::query::{DateRange, FindQuery};
use crate::core::service::{DataService, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// A stored document plus its insertion sequence.
///
/// The sequence breaks ties between documents created within the same clock tick.
#[derive(Clone)]
struct Slot<T> {
    seq: u64,
    document: Document<T>,
}

struct Collection<T> {
    next_seq: u64,
    slots: HashMap<Uuid, Slot<T>>,
}

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    collection: Arc<RwLock<Collection<T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new, empty in-memory collection
    pub fn new() -> Self {
        Self {
            collection: Arc::new(RwLock::new(Collection {
                next_seq: 0,
                slots: HashMap::new(),
            })),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Lock(e.to_string())
}

impl<T: Content> InMemoryDataService<T> {
    /// Matching documents, newest-created first.
    fn sorted_matches(&self, range: &DateRange) -> StorageResult<Vec<Slot<T>>> {
        let collection = self.collection.read().map_err(lock_error)?;

        let mut matches: Vec<Slot<T>> = collection
            .slots
            .values()
            .filter(|slot| range.contains(slot.document.date()))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            b.document
                .created_at
                .cmp(&a.document.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        Ok(matches)
    }
}

#[async_trait]
impl<T: Content> DataService<T> for InMemoryDataService<T> {
    async fn insert(&self, document: Document<T>) -> StorageResult<Document<T>> {
        let mut collection = self.collection.write().map_err(lock_error)?;

        let seq = collection.next_seq;
        collection.next_seq += 1;
        collection.slots.insert(
            document.id,
            Slot {
                seq,
                document: document.clone(),
            },
        );

        Ok(document)
    }

    async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<Document<T>>> {
        let collection = self.collection.read().map_err(lock_error)?;
        Ok(collection.slots.get(id).map(|slot| slot.document.clone()))
    }

    async fn find_many(&self, query: &FindQuery) -> StorageResult<Vec<Document<T>>> {
        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(self
            .sorted_matches(&query.range)?
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|slot| slot.document)
            .collect())
    }

    async fn count(&self, range: &DateRange) -> StorageResult<u64> {
        let collection = self.collection.read().map_err(lock_error)?;
        Ok(collection
            .slots
            .values()
            .filter(|slot| range.contains(slot.document.date()))
            .count() as u64)
    }

    async fn update_by_id(&self, id: &Uuid, content: T) -> StorageResult<Option<Document<T>>> {
        let mut collection = self.collection.write().map_err(lock_error)?;

        Ok(collection.slots.get_mut(id).map(|slot| {
            slot.document.replace(content);
            slot.document.clone()
        }))
    }

    async fn delete_by_id(&self, id: &Uuid) -> StorageResult<bool> {
        let mut collection = self.collection.write().map_err(lock_error)?;
        Ok(collection.slots.remove(id).is_some())
    }
}
