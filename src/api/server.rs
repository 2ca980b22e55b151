//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::error::ExtractError;
use crate::provider::{OpenAiProvider, PlanProvider};

use super::{
    handlers::{extract_handler, health_handler},
    types::ApiState,
};

/// Build the CORS layer from the configured origin list.
///
/// `None` or an empty/unparseable list falls back to permissive CORS with a
/// warning: the service historically ran behind an internal network where
/// any-origin was acceptable, but production deployments should set
/// `PLAN2DATA_CORS_ORIGINS`.
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    if let Some(origins) = origins {
        let parsed: Vec<_> = origins
            .iter()
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if !parsed.is_empty() {
            tracing::info!("CORS configured with {} explicit allowed origin(s)", parsed.len());
            return CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(Any)
                .allow_headers(Any);
        }

        tracing::warn!(
            "Configured CORS origins are empty or invalid - falling back to permissive CORS. \
             Set explicit origins for production."
        );
    } else {
        tracing::warn!(
            "CORS configured to allow all origins (default). For production, set \
             PLAN2DATA_CORS_ORIGINS to a comma-separated list of allowed origins."
        );
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router with all routes configured.
///
/// Public so the router can be embedded in a larger application, and so
/// tests can drive it with `tower::ServiceExt::oneshot` against a scripted
/// provider.
pub fn create_router(config: ServiceConfig, provider: Arc<dyn PlanProvider>) -> Router {
    let max_body = config.max_upload_bytes;
    let cors = cors_layer(config.cors_origins.as_deref());

    let state = ApiState {
        config: Arc::new(config),
        provider,
    };

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server.
///
/// # Arguments
///
/// * `host` - IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// * `port` - Port number to bind to (e.g., 8000)
/// * `config` - Service configuration
/// * `provider` - Model backend handling extraction requests
pub async fn serve(
    host: impl AsRef<str>,
    port: u16,
    config: ServiceConfig,
    provider: Arc<dyn PlanProvider>,
) -> Result<(), ExtractError> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| ExtractError::InvalidConfig(format!("Invalid host address: {}", e)))?;

    let addr = SocketAddr::new(ip, port);
    let app = create_router(config, provider);

    tracing::info!("Starting plan2data server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ExtractError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ExtractError::Internal(e.to_string()))?;

    Ok(())
}

/// Start the API server with environment-driven configuration.
///
/// Loads [`ServiceConfig::from_env`] (fails fast when `OPENAI_API_KEY` is
/// missing), builds the OpenAI provider, and binds `0.0.0.0:8000`.
pub async fn serve_default() -> Result<(), ExtractError> {
    let config = ServiceConfig::from_env()?;
    let provider = Arc::new(OpenAiProvider::new(&config)?);
    serve("0.0.0.0", 8000, config, provider).await
}
