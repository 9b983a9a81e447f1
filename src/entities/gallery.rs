//! Gallery image content type

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// One image in the photo gallery.
///
/// `url` is either absolute or a server-relative `/uploads/...` path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[validate(length(min = 1, max = 2048, message = "url is required"))]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(max = 500))]
    pub caption: String,
}

/// A `null` caption is the same as no caption
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl_content!(
    GalleryImage,
    "gallery",
    "gallery image",
    fields: ["url", "caption"],
    trim: [url, caption],
    trim_optional: [],
);
