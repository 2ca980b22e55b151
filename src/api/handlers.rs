//! API request handlers.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::ExtractError;
use crate::extract::extract_plan;
use crate::schema::ExtractedData;

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse},
};

/// Extract endpoint handler.
///
/// POST /extract
///
/// Accepts multipart form data with:
/// - `file`: the floor-plan PDF
///
/// Unknown fields are ignored; when `file` appears more than once the last
/// occurrence wins. Returns the normalised extraction as JSON.
///
/// # Size Limits
///
/// Request body size is enforced at the router layer via `DefaultBodyLimit`
/// and `RequestBodyLimitLayer` (default 20 MiB, see
/// `ServiceConfig::max_upload_bytes`). Oversize requests are rejected with
/// HTTP 413 before this handler runs.
pub async fn extract_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractedData>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ExtractError::InvalidMultipart {
            detail: e.to_string(),
        })?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ExtractError::InvalidMultipart {
                        detail: e.to_string(),
                    })?;
                upload = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, bytes) = upload.ok_or(ExtractError::MissingFile)?;

    let data = extract_plan(&filename, &bytes, state.provider.as_ref(), &state.config).await?;
    Ok(Json(data))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
