use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use thiserror::Error;

use patra_core::ImageLocator;

/// Longest-edge target matching the model's input optimization.
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

/// Ceiling on the source file before any re-encoding.
pub const MAX_SOURCE_BYTES: usize = 4 * 1024 * 1024;

const JPEG_QUALITY: u8 = 85;

/// 1×1 transparent PNG used only for connectivity verification.
const PROBE_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to encode optimized image: {0}")]
    Encode(String),
    #[error("Source image is {0} bytes, over the {MAX_SOURCE_BYTES}-byte ceiling")]
    TooLarge(usize),
}

/// Bounded-size encoded payload ready for transmission to the recognition
/// and extraction collaborators. Owned by a single pipeline run and
/// discarded once the model call completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub mime_type: String,
    /// Base64-encoded payload bytes.
    pub data: String,
    pub source_width: u32,
    pub source_height: u32,
    pub width: u32,
    pub height: u32,
    /// True only for the connectivity-probe placeholder.
    pub degraded: bool,
}

impl NormalizedImage {
    /// Minimal placeholder payload for verifying model connectivity when
    /// native image optimization is unavailable. Must never stand in for a
    /// real document image in a production result; the `degraded` flag and
    /// the warning make the substitution visible.
    pub fn connectivity_probe() -> Self {
        tracing::warn!("using connectivity-probe payload; output is not document data");
        Self {
            mime_type: "image/png".to_string(),
            data: PROBE_PNG_BASE64.to_string(),
            source_width: 1,
            source_height: 1,
            width: 1,
            height: 1,
            degraded: true,
        }
    }

    pub fn payload_len(&self) -> usize {
        self.data.len()
    }
}

/// Read the image behind `locator` and produce a normalized payload.
pub async fn normalize(
    locator: &ImageLocator,
    max_dimension: u32,
) -> Result<NormalizedImage, NormalizeError> {
    let bytes = tokio::fs::read(locator.as_path()).await?;
    normalize_bytes(&bytes, max_dimension)
}

/// Decode, downscale so the longer edge equals `max_dimension` when the
/// source exceeds it (never upscale), and re-encode as JPEG at fixed
/// quality.
pub fn normalize_bytes(
    data: &[u8],
    max_dimension: u32,
) -> Result<NormalizedImage, NormalizeError> {
    if data.len() > MAX_SOURCE_BYTES {
        return Err(NormalizeError::TooLarge(data.len()));
    }

    let img = image::load_from_memory(data)?;
    let (source_width, source_height) = (img.width(), img.height());

    let img = if source_width > max_dimension || source_height > max_dimension {
        img.resize(max_dimension, max_dimension, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel; flatten before encoding.
    let img = DynamicImage::ImageRgb8(img.to_rgb8());
    let jpeg = encode_jpeg(&img)?;

    tracing::debug!(
        source_width,
        source_height,
        width = img.width(),
        height = img.height(),
        payload_bytes = jpeg.len(),
        "image normalized",
    );

    Ok(NormalizedImage {
        mime_type: "image/jpeg".to_string(),
        data: BASE64.encode(&jpeg),
        source_width,
        source_height,
        width: img.width(),
        height: img.height(),
        degraded: false,
    })
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, NormalizeError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    img.write_with_encoder(encoder).map_err(|e| NormalizeError::Encode(e.to_string()))?;
    Ok(buf)
}
