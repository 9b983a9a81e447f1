//! Server module for building HTTP servers with auto-registered routes
//!
//! This module provides a `ServerBuilder` that mounts:
//! - CRUD routes for every registered content type
//! - the upload endpoints and the static `/uploads` file service
//! - a health check

pub mod builder;
pub mod crud;
pub mod entity_registry;
pub mod upload;

pub use builder::{DEFAULT_API_PREFIX, ServerBuilder};
pub use crud::{CrudState, crud_routes};
pub use entity_registry::{ContentDescriptor, EntityDescriptor, EntityRegistry};
pub use upload::{BulkUploadResponse, UploadResponse};
