//! Image encoding: `DynamicImage` → base64 PNG ready for a data URL.
//!
//! Vision APIs accept images as base64 data URLs embedded in the JSON
//! request body. PNG is chosen over JPEG because it is lossless — room
//! labels and surface figures on a plan are small print, and JPEG artefacts
//! on rendered text measurably degrade what the model can read.

use crate::error::ExtractError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// A PNG-encoded page, base64-wrapped.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Base64 of the PNG bytes, without the data-URL prefix.
    pub base64: String,
    /// Always `image/png`.
    pub mime_type: &'static str,
}

impl EncodedImage {
    /// Render as a `data:` URL for the chat-completions image content part.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Encode a rasterised page as a base64 PNG.
pub fn encode_page(img: &DynamicImage) -> Result<EncodedImage, ExtractError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExtractError::ImageEncodingFailed {
            detail: e.to_string(),
        })?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded page → {} bytes base64", b64.len());

    Ok(EncodedImage {
        base64: b64,
        mime_type: "image/png",
    })
}
