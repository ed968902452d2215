//! Validation modules

pub mod fields;
pub mod images;

pub use fields::missing_required_fields;
pub use images::{validate_batch, validate_image, ImageLimits};
