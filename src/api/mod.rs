//! REST API server for floor-plan data extraction.
//!
//! An Axum-based HTTP server exposing the extraction pipeline to clients
//! that upload plan PDFs as multipart form data.
//!
//! # Endpoints
//!
//! - `POST /extract` - Extract structured data from an uploaded plan PDF
//!   (multipart field `file`)
//! - `GET /health` - Health check endpoint
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use plan2data::api::serve_default;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), plan2data::ExtractError> {
//!     // Reads OPENAI_API_KEY and PLAN2DATA_* from the environment,
//!     // binds 0.0.0.0:8000
//!     serve_default().await
//! }
//! ```
//!
//! ## Embedding the router in your app
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use plan2data::api::create_router;
//! use plan2data::{OpenAiProvider, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), plan2data::ExtractError> {
//!     let config = ServiceConfig::from_env()?;
//!     let provider = Arc::new(OpenAiProvider::new(&config)?);
//!     let app = Router::new().nest("/api", create_router(config, provider));
//!     // Add your own routes...
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! # Extract a plan
//! curl -F "file=@plan.pdf" http://localhost:8000/extract
//!
//! # Health check
//! curl http://localhost:8000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, serve, serve_default};
pub use types::{ApiState, ErrorResponse, HealthResponse};
