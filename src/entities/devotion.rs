//! Devotion content type

use crate::core::dates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A short devotional reading. `content` is Markdown and may carry inline HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Devotion {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,

    /// Scripture reference, e.g. "John 3:16"
    #[validate(length(min = 1, max = 200, message = "verse is required"))]
    pub verse: String,

    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,

    #[serde(with = "dates::flexible")]
    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2048))]
    pub cover_image_url: Option<String>,
}

impl_content!(
    Devotion,
    "devotions",
    "devotion",
    fields: ["title", "verse", "content", "date", "coverImageUrl"],
    date: date,
    trim: [title, verse],
    trim_optional: [cover_image_url],
);
