//! Extraction entry point: one uploaded plan in, one [`ExtractedData`] out.
//!
//! ## Why a single function?
//!
//! The HTTP layer stays a thin shim over [`extract_plan`] so the whole
//! pipeline is callable without axum: from the CLI, from tests with a
//! scripted provider, or embedded in another service. Everything
//! request-shaped (multipart, status codes, CORS) lives in [`crate::api`];
//! everything plan-shaped lives here and below.

use crate::config::{ExtractionStrategy, ServiceConfig};
use crate::error::ExtractError;
use crate::normalize::normalize;
use crate::pipeline::{encode, ingest, render};
use crate::provider::{PlanContent, PlanProvider};
use crate::schema::ExtractedData;
use std::time::Instant;
use tracing::{debug, info};

/// Run the full extraction pipeline on an uploaded PDF.
///
/// # Arguments
/// * `filename` — client-supplied filename, used only for validation
/// * `bytes` — the raw upload body
/// * `provider` — the model backend to consult
/// * `config` — service configuration (strategy, timeout, render cap)
///
/// # Errors
/// * [`ExtractError::NotAPdf`] / [`ExtractError::EmptyOrCorruptPdf`] for
///   unusable uploads
/// * [`ExtractError::ProviderTimeout`] when the model call exceeds
///   `config.request_timeout_secs`
/// * provider and pipeline variants for everything downstream
///
/// Normalisation itself never fails: once the provider returns an object,
/// the result is `Ok` even if every field of the reply was junk.
pub async fn extract_plan(
    filename: &str,
    bytes: &[u8],
    provider: &dyn PlanProvider,
    config: &ServiceConfig,
) -> Result<ExtractedData, ExtractError> {
    let total_start = Instant::now();
    info!(
        "Starting extraction: '{}' ({} bytes, strategy {})",
        filename,
        bytes.len(),
        config.strategy
    );

    // ── Step 1: Validate and stage the upload ────────────────────────────
    let stored = ingest::store_upload(filename, bytes).await?;

    // ── Step 2: Read the plan (raster or text layer) ─────────────────────
    let content = match config.strategy {
        ExtractionStrategy::Vision => {
            let image = render::render_first_page(stored.path(), config.max_rendered_pixels).await?;
            PlanContent::Image(encode::encode_page(&image)?)
        }
        ExtractionStrategy::Text => {
            let text = render::extract_text(stored.path()).await?;
            PlanContent::Text(text)
        }
    };

    // ── Step 3: Ask the model, under a hard time bound ───────────────────
    // The provider's HTTP client carries the same timeout, but the outer
    // bound also covers queueing and reply parsing.
    let raw = tokio::time::timeout(config.request_timeout(), provider.extract(&content))
        .await
        .map_err(|_| ExtractError::ProviderTimeout {
            secs: config.request_timeout_secs,
        })??;
    debug!("Provider '{}' returned {} keys", provider.name(), raw.len());

    // ── Step 4: Normalise the untrusted reply ────────────────────────────
    let data = normalize(&raw);

    info!(
        "Extraction complete: {} rooms, {} m² total, {:?}",
        data.surfaces.rooms.len(),
        data.surfaces.total_area,
        total_start.elapsed()
    );

    Ok(data)
}
