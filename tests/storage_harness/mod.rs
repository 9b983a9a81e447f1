//! Shared test harness for storage backend testing
//!
//! Provides fixtures for the dated (`Sermon`) and undated (`GalleryImage`)
//! content types, plus documents with deterministic, millisecond-exact
//! timestamps so every backend round-trips them unchanged.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use pulpit::core::entity::{Content, Document};
use pulpit::entities::{GalleryImage, Sermon};
use uuid::Uuid;

/// Creation time of the first document in a batch
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// UTC instant at `hour:minute` on the given day
pub fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, hour, minute, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sermon(title: &str, date: DateTime<Utc>) -> Sermon {
    Sermon {
        title: title.to_string(),
        speaker: "J. Doe".to_string(),
        date,
        duration_minutes: Some(35),
        video_url: Some("https://youtu.be/abc123".to_string()),
        thumbnail_url: None,
    }
}

pub fn image(url: &str) -> GalleryImage {
    GalleryImage {
        url: url.to_string(),
        caption: "Sunday service".to_string(),
    }
}

/// A document created `seq` seconds after [`base_time`]
pub fn stamped<T: Content>(content: T, seq: i64) -> Document<T> {
    let created = base_time() + Duration::seconds(seq);
    Document {
        id: Uuid::new_v4(),
        content,
        created_at: created,
        updated_at: created,
    }
}

/// `n` sermons created in order, all dated 2024-01-07
pub fn sermon_batch(n: usize) -> Vec<Document<Sermon>> {
    (0..n)
        .map(|i| stamped(sermon(&format!("Sermon {}", i), at(2024, 1, 7, 10, 0)), i as i64))
        .collect()
}

/// Titles in order, for readable ordering assertions
pub fn titles(documents: &[Document<Sermon>]) -> Vec<String> {
    documents.iter().map(|d| d.content.title.clone()).collect()
}
