//! Image preparation for diagnosis attachments.
//!
//! Photos are decoded, capped at [`MAX_IMAGE_DIMENSION`] on their longer side,
//! re-encoded as JPEG and base64-encoded without line wrapping. Failures are
//! never fatal: callers get `None` and send the request without an image.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};

use crate::constants::{JPEG_MEDIA_TYPE, JPEG_QUALITY, MAX_IMAGE_DIMENSION};
use crate::error::ImageError;

/// A photo ready to be attached to a diagnosis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Base64 (standard alphabet, no wrapping) of the JPEG bytes.
    pub base64: String,
    pub media_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Load, downscale and encode the image at `path`.
pub fn prepare_image(path: &Path) -> Option<PreparedImage> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read image, continuing without it");
            return None;
        }
    };
    prepare_image_bytes(&bytes)
}

/// Same as [`prepare_image`] for bytes already in memory.
pub fn prepare_image_bytes(bytes: &[u8]) -> Option<PreparedImage> {
    match encode_for_upload(bytes) {
        Ok(prepared) => {
            tracing::debug!(
                width = prepared.width,
                height = prepared.height,
                encoded_len = prepared.base64.len(),
                "image prepared"
            );
            Some(prepared)
        }
        Err(e) => {
            tracing::warn!(error = %e, "image preparation failed, continuing without it");
            None
        }
    }
}

/// Target size for a `width`×`height` image so neither side exceeds `max`.
///
/// Uses the smaller of the two axis ratios and truncates, matching what a
/// bitmap scaler does; images already within bounds are returned unchanged.
pub fn scaled_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let ratio = f32::min(max as f32 / width as f32, max as f32 / height as f32);
    let scaled_w = ((width as f32 * ratio) as u32).max(1);
    let scaled_h = ((height as f32 * ratio) as u32).max(1);
    (scaled_w, scaled_h)
}

fn encode_for_upload(bytes: &[u8]) -> Result<PreparedImage, ImageError> {
    // Each decoded buffer is owned by this scope and dropped before the
    // base64 step, whether or not scaling happened.
    let (jpeg, width, height) = {
        let original = image::load_from_memory(bytes)?;
        if original.width() == 0 || original.height() == 0 {
            return Err(ImageError::Empty);
        }
        let rgb = downscale(original).to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
            rgb.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        )?;
        (jpeg, width, height)
    };

    Ok(PreparedImage {
        base64: BASE64_STANDARD.encode(&jpeg),
        media_type: JPEG_MEDIA_TYPE,
        width,
        height,
    })
}

fn downscale(img: DynamicImage) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let (target_w, target_h) = scaled_dimensions(w, h, MAX_IMAGE_DIMENSION);
    if (target_w, target_h) == (w, h) {
        return img;
    }
    img.resize_exact(target_w, target_h, FilterType::Triangle)
}
