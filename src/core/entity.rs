//! Content traits and the stored document envelope
//!
//! A content type (sermon, devotion, gallery image) is the set of fields a
//! client may set. The server wraps it in a [`Document`] that adds the
//! identifier and the persistence timestamps, none of which a client can set.

use crate::core::dates;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Trait implemented by every client-settable content type.
///
/// Implementations are normally generated with [`impl_content!`](crate::impl_content).
pub trait Content:
    Serialize + DeserializeOwned + Validate + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// The plural resource name used in URLs and as the collection name (e.g. "sermons")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g. "sermon")
    fn resource_name_singular() -> &'static str;

    /// Every serialized field name, optional ones included.
    fn field_names() -> &'static [&'static str];

    /// Name of the semantic date field, if this content type has one.
    fn date_field() -> Option<&'static str> {
        None
    }

    /// The semantic date used by range filters.
    fn date(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Canonicalize user input before validation (trimming and the like).
    fn normalize(&mut self) {}
}

/// A persisted content item.
///
/// Serializes flat: `{"_id": ..., <content fields>, "createdAt": ..., "updatedAt": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Document<T> {
    /// Server-assigned identifier
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Client-settable fields
    #[serde(flatten)]
    pub content: T,

    /// When this document was first written
    #[serde(rename = "createdAt", with = "dates::timestamp")]
    pub created_at: DateTime<Utc>,

    /// When this document was last written
    #[serde(rename = "updatedAt", with = "dates::timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Keys a client can never set; stripped from incoming payloads.
pub const IMMUTABLE_KEYS: &[&str] = &["_id", "id", "createdAt", "updatedAt"];

impl<T: Content> Document<T> {
    /// Wrap new content with a fresh identifier and timestamps.
    pub fn new(content: T) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the content and bump `updated_at`.
    pub fn replace(&mut self, content: T) {
        self.content = content;
        self.touch();
    }

    /// Update the updated_at timestamp to now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// The semantic date of the wrapped content.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.content.date()
    }
}
