//! Pipeline stages for floor-plan data extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! ingest ──▶ render ──▶ encode ──▶ provider ──▶ normalize
//! (upload)   (pdfium)   (base64)   (LLM call)   (schema)
//! ```
//!
//! 1. [`ingest`] — validate the uploaded bytes and stage them as a temp file
//!    pdfium can open
//! 2. [`render`] — rasterise page 1 (vision strategy) or extract the text
//!    layer of every page (text strategy); runs in `spawn_blocking` because
//!    pdfium is not async-safe
//! 3. [`encode`] — PNG-encode and base64-wrap the rendered page for the
//!    multimodal API request body
//!
//! The provider call and the response normalisation live outside this
//! module, in [`crate::provider`] and [`crate::normalize`].

pub mod encode;
pub mod ingest;
pub mod render;
