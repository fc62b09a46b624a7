// Data URL validation

use super::models::{estimated_decoded_len, ImageFormat};
use crate::error::{RelayError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `data:image/<letters>;base64,` prefix. The payload is not decoded.
    static ref IMAGE_DATA_URL: Regex =
        Regex::new(r"^data:image/([a-zA-Z]+);base64,").unwrap();
}

const INVALID_IMAGE: &str = "Missing or invalid image data URL";

/// Metadata of a validated image data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUrl<'a> {
    /// The full URL, forwarded unchanged.
    pub url: &'a str,
    /// MIME type declared by the URL (e.g. `image/png`).
    pub mime_type: String,
    /// Length of the base64 payload after the comma.
    pub payload_len: usize,
}

impl ImageDataUrl<'_> {
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime_type)
    }

    pub fn approx_bytes(&self) -> usize {
        estimated_decoded_len(self.payload_len)
    }
}

/// Check that `url` is a base64 data URL with an image MIME type.
pub fn parse_image_data_url(url: &str) -> Result<ImageDataUrl<'_>> {
    let caps = IMAGE_DATA_URL
        .captures(url)
        .ok_or_else(|| RelayError::InvalidRequest(INVALID_IMAGE.to_string()))?;

    let prefix_len = caps.get(0).map_or(0, |m| m.end());
    let subtype = caps.get(1).map_or("", |m| m.as_str());

    Ok(ImageDataUrl {
        url,
        mime_type: format!("image/{}", subtype.to_lowercase()),
        payload_len: url.len() - prefix_len,
    })
}

/// Validate the optional `imageDataUrl` field of an analyze request.
///
/// Absent and empty values are rejected the same way as malformed ones.
pub fn require_image_data_url(field: Option<&str>) -> Result<ImageDataUrl<'_>> {
    match field {
        Some(url) if !url.is_empty() => parse_image_data_url(url),
        _ => Err(RelayError::InvalidRequest(INVALID_IMAGE.to_string())),
    }
}
