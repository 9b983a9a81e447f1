//! Axum extractors for content payloads and list queries
//!
//! Body extractors reject with [`ApiError::Validation`] so malformed bodies
//! share the JSON error shape of every other failure. The list query
//! extractor never rejects.

use super::payload::parse_content;
use crate::core::entity::Content;
use crate::core::error::ApiError;
use crate::core::query::ListParams;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde_json::{Map, Value};
use std::convert::Infallible;

/// A JSON object body, not yet interpreted.
///
/// Used by update, which must merge the patch with the stored document
/// before it can validate anything.
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;

        match payload {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(ApiError::validation("request body must be a JSON object")),
        }
    }
}

/// Content parsed, normalized and validated from the request body
///
/// # Usage
///
/// ```rust,ignore
/// async fn create(ValidatedJson(sermon): ValidatedJson<Sermon>) -> ApiResult<...> {
///     // sermon is trimmed and valid
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Content,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonObject(object) = JsonObject::from_request(req, state).await?;
        parse_content(object).map(ValidatedJson)
    }
}

/// List query parameters, read leniently from the query string.
///
/// Repeated keys keep their first value and unknown keys are ignored; a
/// query string that cannot be decoded at all yields the defaults.
pub struct LenientQuery(pub ListParams);

impl<S> FromRequestParts<S> for LenientQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => ListParams::from_pairs(pairs),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Ignoring undecodable list query");
                ListParams::default()
            }
        };

        Ok(LenientQuery(params))
    }
}
