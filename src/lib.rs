//! # Pulpit
//!
//! Content API and client data layer for a church website: sermons,
//! devotions and gallery images, all served through one generic CRUD
//! contract.
//!
//! ## Features
//!
//! - **Generic CRUD**: one set of handlers instantiated per content type
//! - **Lenient listing**: optional date-range filter and pagination
//! - **Pluggable storage**: in-memory or MongoDB behind [`DataService`](core::DataService)
//! - **Uploads**: multipart upload endpoints with static file serving
//! - **Client**: a typed HTTP client plus the state behind the site's views
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pulpit::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .register::<Sermon>(InMemoryDataService::new())
//!     .register::<Devotion>(InMemoryDataService::new())
//!     .register::<GalleryImage>(InMemoryDataService::new())
//!     .with_upload_dir("uploads")
//!     .build()?;
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, ApiResult, Content, DataService, DateRange, Document, FindQuery, ListParams,
        ListResponse, Page, Pagination, StorageError, ValidatedJson,
    };

    // === Macros ===
    pub use crate::impl_content;

    // === Content types ===
    pub use crate::entities::{Devotion, GalleryImage, Sermon};

    // === Storage ===
    pub use crate::storage::InMemoryDataService;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;

    // === Config ===
    pub use crate::config::{ClientConfig, ServerConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === Client ===
    pub use crate::client::{ApiClient, ClientError, ListQuery, LoadState};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
