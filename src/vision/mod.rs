//! Image input handling for the analysis route.
//!
//! Images arrive as `data:` URLs and are forwarded to the provider as-is;
//! this module only checks their shape and extracts metadata for logging.
//!
//! # Submodules
//!
//! - `models`: Known image formats.
//! - `data_url`: Data URL shape validation.

pub mod data_url;
pub mod models;

pub use data_url::{parse_image_data_url, require_image_data_url, ImageDataUrl};
pub use models::ImageFormat;
