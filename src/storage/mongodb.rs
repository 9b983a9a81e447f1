//! MongoDB storage backend using the official MongoDB async driver.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! One collection per content type, named by `T::resource_name()`
//! ("sermons", "devotions", "gallery").
//!
//! # Serialization strategy
//!
//! Documents go through `serde_json::Value` and are then converted to BSON.
//! The identifier is kept as a UUID string under `_id`. `createdAt`,
//! `updatedAt` and the semantic date field are stored as BSON dates so
//! range filters and sorting happen in the database.

use crate::core::dates;
use crate::core::entity::{Content, Document};
use crate::core::error::StorageError;
use crate::core::query::{DateRange, FindQuery};
use crate::core::service::{DataService, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database, IndexModel};
use uuid::Uuid;

/// Timestamp keys managed by the server
const TIMESTAMP_KEYS: [&str; 2] = ["createdAt", "updatedAt"];

/// Open a client and select a database.
pub async fn connect(uri: &str, database: &str) -> StorageResult<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| StorageError::backend("connect", e))?;
    Ok(client.database(database))
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn to_bson_date(date: DateTime<Utc>) -> Bson {
    Bson::DateTime(bson::DateTime::from_millis(date.timestamp_millis()))
}

fn from_bson_date(date: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(date.timestamp_millis())
}

/// Keys whose values are stored as BSON dates for content type `T`.
fn date_keys<T: Content>() -> impl Iterator<Item = &'static str> {
    TIMESTAMP_KEYS.into_iter().chain(T::date_field())
}

/// Serialize a value and convert its date strings to BSON dates.
fn to_bson_document<T: Content>(value: &impl serde::Serialize) -> StorageResult<bson::Document> {
    let json = serde_json::to_value(value)?;
    let mut doc = match bson::to_bson(&json).map_err(|e| StorageError::Serialization(e.to_string()))? {
        Bson::Document(d) => d,
        _ => {
            return Err(StorageError::Serialization(
                "expected a document, got a non-object".to_string(),
            ));
        }
    };

    for key in date_keys::<T>() {
        let parsed = match doc.get(key) {
            Some(Bson::String(raw)) => dates::parse_datetime(raw),
            _ => None,
        };
        if let Some(date) = parsed {
            doc.insert(key, to_bson_date(date));
        }
    }

    Ok(doc)
}

/// Convert a stored BSON document back into a typed document.
fn from_bson_document<T: Content>(mut doc: bson::Document) -> StorageResult<Document<T>> {
    for key in date_keys::<T>() {
        let formatted = match doc.get(key) {
            Some(Bson::DateTime(date)) => from_bson_date(*date).map(dates::format_utc_millis),
            _ => None,
        };
        if let Some(formatted) = formatted {
            doc.insert(key, Bson::String(formatted));
        }
    }

    let json = Bson::Document(doc).into_relaxed_extjson();
    Ok(serde_json::from_value(json)?)
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Filter selecting documents whose date lies in the range.
///
/// Returns `None` when no document can match (an active range on undated content).
fn range_filter<T: Content>(range: &DateRange) -> Option<bson::Document> {
    if range.is_unbounded() {
        return Some(doc! {});
    }
    let field = T::date_field()?;

    let mut bounds = bson::Document::new();
    if let Some(from) = range.from {
        bounds.insert("$gte", to_bson_date(from));
    }
    if let Some(to) = range.to {
        bounds.insert("$lte", to_bson_date(to));
    }
    Some(doc! { field: bounds })
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Data service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// let db = pulpit::storage::mongodb::connect("mongodb://localhost:27017", "pulpit").await?;
/// let service = MongoDataService::<Sermon>::new(db);
/// service.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    /// Create a new `MongoDataService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Content> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<bson::Document> {
        self.database.collection(T::resource_name())
    }

    /// Create the indexes backing listing and range filters.
    pub async fn ensure_indexes(&self) -> StorageResult<()> {
        let mut indexes = vec![IndexModel::builder().keys(doc! { "createdAt": -1 }).build()];
        if let Some(field) = T::date_field() {
            indexes.push(IndexModel::builder().keys(doc! { field: 1 }).build());
        }

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| StorageError::backend("create indexes", e))?;
        Ok(())
    }
}

#[async_trait]
impl<T: Content> DataService<T> for MongoDataService<T> {
    async fn insert(&self, document: Document<T>) -> StorageResult<Document<T>> {
        let doc = to_bson_document::<T>(&document)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| StorageError::backend("insert", e))?;

        Ok(document)
    }

    async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<Document<T>>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| StorageError::backend("find", e))?;

        doc.map(from_bson_document).transpose()
    }

    async fn find_many(&self, query: &FindQuery) -> StorageResult<Vec<Document<T>>> {
        let Some(filter) = range_filter::<T>(&query.range) else {
            return Ok(Vec::new());
        };

        let collection = self.collection();
        let mut find = collection
            .find(filter)
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .skip(query.skip);
        if let Some(limit) = query.limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let docs: Vec<bson::Document> = find
            .await
            .map_err(|e| StorageError::backend("find", e))?
            .try_collect()
            .await
            .map_err(|e| StorageError::backend("find", e))?;

        docs.into_iter().map(from_bson_document).collect()
    }

    async fn count(&self, range: &DateRange) -> StorageResult<u64> {
        let Some(filter) = range_filter::<T>(range) else {
            return Ok(0);
        };

        self.collection()
            .count_documents(filter)
            .await
            .map_err(|e| StorageError::backend("count", e))
    }

    async fn update_by_id(&self, id: &Uuid, content: T) -> StorageResult<Option<Document<T>>> {
        let mut set = to_bson_document::<T>(&content)?;
        set.insert("updatedAt", to_bson_date(Utc::now()));

        let mut unset = bson::Document::new();
        for field in T::field_names() {
            if !set.contains_key(*field) {
                unset.insert(*field, "");
            }
        }

        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }

        let doc = self
            .collection()
            .find_one_and_update(doc! { "_id": uuid_bson(id) }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| StorageError::backend("update", e))?;

        doc.map(from_bson_document).transpose()
    }

    async fn delete_by_id(&self, id: &Uuid) -> StorageResult<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| StorageError::backend("delete", e))?;

        Ok(result.deleted_count > 0)
    }
}
