//! # plan2data
//!
//! Extract structured room and surface data from floor-plan PDFs using
//! vision-capable LLMs.
//!
//! ## Why this crate?
//!
//! Marketing floor plans carry their data as a drawing: a room table, a
//! compass rose, surface labels scattered over vector art. Classic PDF text
//! extraction recovers fragments in arbitrary order and nothing at all from
//! scanned sheets. Instead this crate rasterises page 1 into a PNG, lets a
//! vision model read the sheet as a human would, and then normalises the
//! model's untrusted JSON into a strict schema the caller can rely on —
//! whatever the model actually returned.
//!
//! ## Pipeline Overview
//!
//! ```text
//! plan.pdf (multipart upload)
//!  │
//!  ├─ 1. Ingest     validate extension, %PDF magic, stage to temp file
//!  ├─ 2. Render     rasterise page 1 via pdfium (CPU-bound, spawn_blocking)
//!  │                or pull the text layer of every page (text strategy)
//!  ├─ 3. Encode     PNG → base64 data URL
//!  ├─ 4. Provider   one chat-completions call, json_object response mode
//!  └─ 5. Normalise  untrusted reply → ExtractedData (total, never fails)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plan2data::{extract_plan, OpenAiProvider, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::from_env()?; // reads OPENAI_API_KEY
//!     let provider = OpenAiProvider::new(&config)?;
//!     let bytes = std::fs::read("plan.pdf")?;
//!     let data = extract_plan("plan.pdf", &bytes, &provider, &config).await?;
//!     println!("{} rooms, {} m² total", data.surfaces.rooms.len(), data.surfaces.total_area);
//!     Ok(())
//! }
//! ```
//!
//! Or run the whole HTTP service: [`api::serve_default`] binds
//! `0.0.0.0:8000` and answers `POST /extract`.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `plan2data` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding only the library:
//! ```toml
//! plan2data = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod schema;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionStrategy, ServiceConfig, ServiceConfigBuilder};
pub use error::{ErrorKind, ExtractError};
pub use extract::extract_plan;
pub use normalize::normalize;
pub use provider::{OpenAiProvider, PlanContent, PlanProvider};
pub use schema::{ExtractedData, RawExtraction, Room, Surfaces};
