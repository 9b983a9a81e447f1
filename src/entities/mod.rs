//! The three content types served by the API

#[macro_use]
pub mod macros;

pub mod devotion;
pub mod gallery;
pub mod sermon;

pub use devotion::Devotion;
pub use gallery::GalleryImage;
pub use sermon::Sermon;
