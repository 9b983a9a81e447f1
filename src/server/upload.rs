//! File upload endpoints
//!
//! Files are written to the upload directory under a generated name and
//! served back by the static `/uploads` route.

use crate::core::error::{ApiError, ApiResult, StorageError};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::Field},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Public path under which uploaded files are served
pub const UPLOADS_PATH: &str = "/uploads";

/// Largest accepted multipart body
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUploadResponse {
    pub urls: Vec<String>,
}

#[derive(Clone)]
struct UploadState {
    dir: Arc<PathBuf>,
}

/// `POST /upload` (field `file`) and `POST /upload/bulk` (fields `files`)
pub fn upload_routes(dir: PathBuf) -> Router {
    Router::new()
        .route("/upload", post(upload_single))
        .route("/upload/bulk", post(upload_bulk))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(UploadState { dir: Arc::new(dir) })
}

/// Extension of the client file name, kept only when it is short and alphanumeric.
fn sanitized_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn multipart_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::validation(format!("invalid multipart body: {err}"))
}

/// Write one multipart field to disk; `None` when the field carries no data.
async fn store_field(dir: &Path, field: Field<'_>) -> ApiResult<Option<String>> {
    let extension = sanitized_extension(field.file_name());
    let bytes = field.bytes().await.map_err(multipart_error)?;
    if bytes.is_empty() {
        return Ok(None);
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::backend("create upload dir", e))?;

    let name = format!("{}{}", Uuid::new_v4().simple(), extension);
    tokio::fs::write(dir.join(&name), &bytes)
        .await
        .map_err(|e| StorageError::backend("write upload", e))?;

    tracing::debug!(file = %name, size = bytes.len(), "Stored upload");

    Ok(Some(format!("{UPLOADS_PATH}/{name}")))
}

/// Store every non-empty field named `field_name`.
async fn store_fields(dir: &Path, mut multipart: Multipart, field_name: &str) -> ApiResult<Vec<String>> {
    let mut urls = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }
        if let Some(url) = store_field(dir, field).await? {
            urls.push(url);
        }
    }

    Ok(urls)
}

async fn upload_single(
    State(state): State<UploadState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let urls = store_fields(&state.dir, multipart, "file").await?;

    urls.into_iter()
        .next()
        .map(|url| Json(UploadResponse { url }))
        .ok_or_else(|| ApiError::validation("no file uploaded"))
}

async fn upload_bulk(
    State(state): State<UploadState>,
    multipart: Multipart,
) -> ApiResult<Json<BulkUploadResponse>> {
    let urls = store_fields(&state.dir, multipart, "files").await?;

    if urls.is_empty() {
        return Err(ApiError::validation("no files uploaded"));
    }

    tracing::info!(count = urls.len(), "Stored bulk upload");

    Ok(Json(BulkUploadResponse { urls }))
}
