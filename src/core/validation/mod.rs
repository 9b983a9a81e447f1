//! Payload validation
//!
//! Incoming bodies are stripped of server-owned keys, deserialized into the
//! content type, normalized and validated before they reach a handler.

pub mod extractor;
pub mod payload;

pub use extractor::{JsonObject, LenientQuery, ValidatedJson};
pub use payload::{format_errors, merge_content, parse_content, strip_immutable};
