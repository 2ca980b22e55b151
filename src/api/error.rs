//! HTTP error mapping.
//!
//! [`ApiError`] is a thin newtype over [`ExtractError`] that exists only to
//! implement axum's `IntoResponse`. The status code comes from
//! [`ExtractError::kind`], the body is always `{"detail": "..."}`, and the
//! full error chain goes to the logs rather than the client.

use crate::api::types::ErrorResponse;
use crate::error::{ErrorKind, ExtractError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

/// An [`ExtractError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ExtractError);

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::ProviderFailure => StatusCode::INTERNAL_SERVER_ERROR,
            // Configuration errors abort startup; one reaching a request
            // handler is a bug, but still answer with a 500.
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.0.to_string();

        if status.is_server_error() {
            error!("Request failed ({}): {}", status.as_u16(), source_chain(&self.0));
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Render the error with its source chain for the logs.
fn source_chain(err: &ExtractError) -> String {
    use std::error::Error as _;
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn status_of(err: ExtractError) -> StatusCode {
        ApiError(err).status()
    }

    #[test]
    fn invalid_uploads_are_400() {
        assert_eq!(status_of(ExtractError::MissingFile), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ExtractError::NotAPdf {
                filename: "a.txt".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ExtractError::EmptyOrCorruptPdf {
                detail: "bad magic".into()
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn timeouts_are_504() {
        assert_eq!(
            status_of(ExtractError::ProviderTimeout { secs: 30 }),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn provider_and_pipeline_failures_are_500() {
        assert_eq!(
            status_of(ExtractError::EmptyReply),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ExtractError::RasterisationFailed {
                detail: "x".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn body_is_a_detail_object() {
        let response = ApiError(ExtractError::MissingFile).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["detail"], "Aucun fichier fourni");
    }
}
