// ABOUTME: Avatar image ingestion for the carousel-slides application
// ABOUTME: Downscales a picture, re-encodes it as JPEG and wraps it in a data URI

use crate::errors::{CarouselError, Result};
use crate::utils::validate_file_exists;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ColorType;
use log::info;
use std::fs;
use std::path::Path;

/// Size limits applied to an ingested avatar
#[derive(Debug, Clone, Copy)]
pub struct AvatarLimits {
    /// Longest edge in pixels
    pub max_edge: u32,
    /// Encoded size in bytes
    pub max_bytes: usize,
    pub jpeg_quality: u8,
}

impl Default for AvatarLimits {
    fn default() -> Self {
        Self {
            max_edge: 96,
            max_bytes: 100 * 1024, // 100KB
            jpeg_quality: 50,
        }
    }
}

/// Decode an image, shrink it to fit the limits and return a JPEG data URI.
/// Images already within `max_edge` keep their size.
pub fn ingest_avatar(bytes: &[u8], limits: &AvatarLimits) -> Result<String> {
    let mut img = image::load_from_memory(bytes)?;

    let (width, height) = (img.width(), img.height());
    if width.max(height) > limits.max_edge {
        // resize keeps the aspect ratio inside the bounding box
        img = img.resize(limits.max_edge, limits.max_edge, FilterType::Triangle);
        info!(
            "Resized avatar from {}x{} to {}x{}",
            width,
            height,
            img.width(),
            img.height()
        );
    }

    let rgb = img.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, limits.jpeg_quality).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;

    if encoded.len() > limits.max_bytes {
        return Err(CarouselError::ImageTooLarge {
            size: encoded.len(),
            limit: limits.max_bytes,
        });
    }

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&encoded)))
}

/// Read an image file and ingest it as an avatar
pub fn ingest_avatar_file(path: &Path, limits: &AvatarLimits) -> Result<String> {
    validate_file_exists(path)?;
    let bytes = fs::read(path)?;
    ingest_avatar(&bytes, limits)
}
