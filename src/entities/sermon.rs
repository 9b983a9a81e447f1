//! Sermon content type

use crate::core::dates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A recorded or scheduled sermon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Sermon {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 120, message = "speaker is required"))]
    pub speaker: String,

    /// Day the sermon was preached
    #[serde(with = "dates::flexible")]
    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2048))]
    pub video_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2048))]
    pub thumbnail_url: Option<String>,
}

impl_content!(
    Sermon,
    "sermons",
    "sermon",
    fields: ["title", "speaker", "date", "durationMinutes", "videoUrl", "thumbnailUrl"],
    date: date,
    trim: [title, speaker],
    trim_optional: [video_url, thumbnail_url],
);
