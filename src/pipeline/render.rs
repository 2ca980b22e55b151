//! PDF access: rasterise page 1 or pull the text layer via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, preventing the Tokio worker
//! threads from stalling while a plan renders.
//!
//! ## Why cap pixels, not DPI?
//!
//! Plan sheets vary wildly: an A0 sheet at 150 DPI would produce a
//! 12,000 × 17,000 px image. `max_rendered_pixels` caps the longest edge
//! regardless of physical size, keeping memory bounded and matching the
//! image-size sweet spot for GPT-4-class vision models (around
//! 1,024–2,048 px).

use crate::error::ExtractError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Rasterise the first page of a PDF.
///
/// Floor-plan extraction only ever looks at page 1: marketing plan PDFs are
/// single-sheet documents, and when they are not, the plan is the cover.
pub async fn render_first_page(
    pdf_path: &Path,
    max_pixels: u32,
) -> Result<DynamicImage, ExtractError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || render_first_page_blocking(&path, max_pixels))
        .await
        .map_err(|e| ExtractError::Internal(format!("Render task panicked: {}", e)))?
}

fn render_first_page_blocking(
    pdf_path: &Path,
    max_pixels: u32,
) -> Result<DynamicImage, ExtractError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ExtractError::EmptyOrCorruptPdf {
                detail: format!("{:?}", e),
            })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    if total_pages == 0 {
        return Err(ExtractError::EmptyOrCorruptPdf {
            detail: "document has no pages".to_string(),
        });
    }
    info!("PDF loaded: {} pages", total_pages);

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let page = pages.get(0).map_err(|e| ExtractError::RasterisationFailed {
        detail: format!("{:?}", e),
    })?;

    let bitmap =
        page.render_with_config(&render_config)
            .map_err(|e| ExtractError::RasterisationFailed {
                detail: format!("{:?}", e),
            })?;

    let image = bitmap.as_image();
    debug!("Rendered page 1 → {}x{} px", image.width(), image.height());

    Ok(image)
}

/// Extract the embedded text layer of every page, newline-joined.
///
/// Pages are concatenated in order. A plan whose text layer is empty (a
/// scanned sheet, or pure vector art) is rejected rather than silently
/// sending an empty document to the model.
pub async fn extract_text(pdf_path: &Path) -> Result<String, ExtractError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || extract_text_blocking(&path))
        .await
        .map_err(|e| ExtractError::Internal(format!("Text extraction task panicked: {}", e)))?
}

fn extract_text_blocking(pdf_path: &Path) -> Result<String, ExtractError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ExtractError::EmptyOrCorruptPdf {
                detail: format!("{:?}", e),
            })?;

    let pages = document.pages();
    let mut chunks = Vec::with_capacity(pages.len() as usize);

    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| ExtractError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        chunks.push(text);
    }

    let joined = chunks.join("\n");
    if joined.trim().is_empty() {
        warn!("PDF has no extractable text layer: {}", pdf_path.display());
        return Err(ExtractError::EmptyOrCorruptPdf {
            detail: "no extractable text layer".to_string(),
        });
    }

    debug!(
        "Extracted {} chars of text from {} pages",
        joined.len(),
        chunks.len()
    );

    Ok(joined)
}
