//! Turning raw JSON payloads into validated content

use crate::core::entity::{Content, IMMUTABLE_KEYS};
use crate::core::error::ApiError;
use serde_json::{Map, Value};
use validator::ValidationErrors;

/// Remove every key a client is not allowed to set.
pub fn strip_immutable(object: &mut Map<String, Value>) {
    for key in IMMUTABLE_KEYS {
        object.remove(*key);
    }
}

/// Parse, normalize and validate a create payload.
pub fn parse_content<T: Content>(mut object: Map<String, Value>) -> Result<T, ApiError> {
    strip_immutable(&mut object);

    let mut content: T = serde_json::from_value(Value::Object(object))
        .map_err(|e| ApiError::validation(e.to_string()))?;
    content.normalize();
    content
        .validate()
        .map_err(|errors| ApiError::validation(format_errors(&errors)))?;

    Ok(content)
}

/// Overlay the top-level keys of `patch` onto `existing`, then validate the result.
///
/// Keys absent from the patch keep their stored value; a `null` clears an
/// optional field and fails for a required one.
pub fn merge_content<T: Content>(existing: &T, mut patch: Map<String, Value>) -> Result<T, ApiError> {
    strip_immutable(&mut patch);

    let mut merged = match serde_json::to_value(existing) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => return Err(ApiError::Storage(e.into())),
    };
    merged.extend(patch);

    parse_content(merged)
}

/// Render validator errors as `field: message` pairs, sorted by field name.
pub fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: invalid ({})", err.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}
