//! Core module containing fundamental traits and types for the content API

pub mod dates;
pub mod entity;
pub mod error;
pub mod query;
pub mod service;
pub mod validation;

pub use entity::{Content, Document, IMMUTABLE_KEYS};
pub use error::{ApiError, ApiResult, ErrorBody, StorageError};
pub use query::{DateRange, FindQuery, ListParams, ListResponse, Page, Pagination};
pub use service::{DataService, StorageResult};
pub use validation::{JsonObject, ValidatedJson};
