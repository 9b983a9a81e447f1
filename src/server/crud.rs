//! Generic CRUD handlers, instantiated once per content type

use crate::core::entity::{Content, Document};
use crate::core::error::{ApiError, ApiResult};
use crate::core::query::{FindQuery, ListResponse, Page};
use crate::core::service::DataService;
use crate::core::validation::{JsonObject, LenientQuery, ValidatedJson, merge_content};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use uuid::Uuid;

/// State shared by the handlers of one content type
pub struct CrudState<T: Content> {
    pub service: Arc<dyn DataService<T>>,
}

impl<T: Content> Clone for CrudState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Routes for one content type, relative to the API prefix:
///
/// - `GET|POST /{plural}`
/// - `GET|PUT|DELETE /{plural}/{id}`
pub fn crud_routes<T: Content>(service: Arc<dyn DataService<T>>) -> Router {
    let plural = T::resource_name();

    Router::new()
        .route(&format!("/{plural}"), get(list::<T>).post(create::<T>))
        .route(
            &format!("/{plural}/{{id}}"),
            get(get_one::<T>).put(update::<T>).delete(remove::<T>),
        )
        .with_state(CrudState { service })
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// POST /{plural}
pub async fn create<T: Content>(
    State(state): State<CrudState<T>>,
    ValidatedJson(content): ValidatedJson<T>,
) -> ApiResult<(StatusCode, Json<Document<T>>)> {
    let document = state.service.insert(Document::new(content)).await?;

    tracing::info!(
        entity = T::resource_name_singular(),
        id = %document.id,
        "Created document"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /{plural}?from=&to=&page=&limit=
///
/// Returns a bare array unless `page` or `limit` is given.
pub async fn list<T: Content>(
    State(state): State<CrudState<T>>,
    LenientQuery(params): LenientQuery,
) -> ApiResult<Json<ListResponse<Document<T>>>> {
    let range = params.date_range();

    let response = match params.pagination() {
        None => ListResponse::All(state.service.find_many(&FindQuery::all(range)).await?),
        Some(pagination) => {
            let total = state.service.count(&range).await?;
            let items = state
                .service
                .find_many(&FindQuery::page(range, pagination))
                .await?;
            ListResponse::Paged(Page::new(items, total, pagination))
        }
    };

    Ok(Json(response))
}

/// GET /{plural}/{id}
pub async fn get_one<T: Content>(
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Document<T>>> {
    let id = parse_id(&id)?;

    state
        .service
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound {
            entity: T::resource_name_singular(),
            id,
        })
}

/// PUT /{plural}/{id}
///
/// Top-level keys of the body override the stored values; the merged
/// content is validated as a whole.
pub async fn update<T: Content>(
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
    JsonObject(patch): JsonObject,
) -> ApiResult<Json<Document<T>>> {
    let id = parse_id(&id)?;
    let not_found = || ApiError::NotFound {
        entity: T::resource_name_singular(),
        id,
    };

    let existing = state.service.find_by_id(&id).await?.ok_or_else(not_found)?;
    let content = merge_content(&existing.content, patch)?;

    let updated = state
        .service
        .update_by_id(&id, content)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(entity = T::resource_name_singular(), id = %id, "Updated document");

    Ok(Json(updated))
}

/// DELETE /{plural}/{id}
pub async fn remove<T: Content>(
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    if !state.service.delete_by_id(&id).await? {
        return Err(ApiError::NotFound {
            entity: T::resource_name_singular(),
            id,
        });
    }

    tracing::info!(entity = T::resource_name_singular(), id = %id, "Deleted document");

    Ok(StatusCode::NO_CONTENT)
}
