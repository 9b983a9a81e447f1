//! Storage trait behind the CRUD handlers

use crate::core::entity::{Content, Document};
use crate::core::error::StorageError;
use crate::core::query::{DateRange, FindQuery};
use async_trait::async_trait;
use uuid::Uuid;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Service trait for persisting one content type
///
/// Implementations provide single-document operations for a specific
/// content type. The CRUD handlers are agnostic to the underlying storage
/// mechanism; each call maps to one backend operation.
#[async_trait]
pub trait DataService<T: Content>: Send + Sync {
    /// Persist a new document as given
    async fn insert(&self, document: Document<T>) -> StorageResult<Document<T>>;

    /// Get a document by ID
    async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<Document<T>>>;

    /// Documents matching the query's range, newest-created first,
    /// after skipping `skip` and keeping at most `limit`
    async fn find_many(&self, query: &FindQuery) -> StorageResult<Vec<Document<T>>>;

    /// Number of documents inside the range
    async fn count(&self, range: &DateRange) -> StorageResult<u64>;

    /// Replace a document's content and bump its `updated_at`
    ///
    /// Returns `None` when no document has this ID.
    async fn update_by_id(&self, id: &Uuid, content: T) -> StorageResult<Option<Document<T>>>;

    /// Delete a document; returns whether it existed
    async fn delete_by_id(&self, id: &Uuid) -> StorageResult<bool>;
}
