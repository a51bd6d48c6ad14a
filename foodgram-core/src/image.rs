//! Decoding and validation of images submitted as base64 data URLs.
//!
//! Clients send recipe images and avatars as `data:image/png;base64,...`.
//! The declared MIME type is ignored; the format is detected from the bytes.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, ImageReader};

use crate::error::ImageError;

/// Allowed image formats for recipe images and avatars.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded image size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    /// Detected content type, e.g. "image/png".
    pub content_type: String,
}

/// Decode a `data:<mime>;base64,<payload>` string and validate the image inside.
pub fn decode_data_url(input: &str) -> Result<DecodedImage, ImageError> {
    let rest = input
        .trim()
        .strip_prefix("data:")
        .ok_or(ImageError::NotDataUrl)?;
    let (_, payload) = rest
        .split_once(";base64,")
        .ok_or(ImageError::NotDataUrl)?;

    // Upper bound on decoded size, checked before allocating.
    let estimated = payload.len() / 4 * 3;
    if estimated > MAX_FILE_SIZE + 3 {
        return Err(ImageError::TooLarge {
            size: estimated,
            max: MAX_FILE_SIZE,
        });
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| ImageError::InvalidBase64)?;

    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let content_type = validate_image(&data)?;
    Ok(DecodedImage { data, content_type })
}

/// Check the format is allowed and the header is readable.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, ImageError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    let format = reader.format().ok_or(ImageError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
    }

    reader
        .into_dimensions()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    Ok(format.to_mime_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_png_data_url() {
        let url = format!("data:image/png;base64,{}", PIXEL_PNG);
        let image = decode_data_url(&url).unwrap();
        assert_eq!(image.content_type, "image/png");
        assert!(!image.data.is_empty());
    }

    #[test]
    fn test_declared_type_is_ignored() {
        let url = format!("data:image/jpeg;base64,{}", PIXEL_PNG);
        assert_eq!(decode_data_url(&url).unwrap().content_type, "image/png");
    }

    #[test]
    fn test_not_a_data_url() {
        assert_eq!(
            decode_data_url("https://example.com/cake.png"),
            Err(ImageError::NotDataUrl)
        );
        assert_eq!(
            decode_data_url("data:image/png,rawbytes"),
            Err(ImageError::NotDataUrl)
        );
    }

    #[test]
    fn test_invalid_base64() {
        assert_eq!(
            decode_data_url("data:image/png;base64,@@@@"),
            Err(ImageError::InvalidBase64)
        );
    }

    #[test]
    fn test_validate_invalid_format() {
        let invalid_data = b"not an image";
        assert!(validate_image(invalid_data).is_err());
    }

    #[test]
    fn test_truncated_jpeg_rejected() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0];
        assert!(validate_image(&jpeg_header).is_err());
    }
}
