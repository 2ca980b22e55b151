//! Error types for the plan2data library.
//!
//! A single [`ExtractError`] enum covers every failure the extraction path
//! can produce. Variants carry named fields with the context an operator
//! needs (filenames, HTTP statuses, reply excerpts); the HTTP boundary never
//! inspects variants directly — it asks [`ExtractError::kind`] and maps the
//! [`ErrorKind`] to a status code.
//!
//! Field-level problems inside the normalizer are *not* errors: they degrade
//! to an omitted field plus a `tracing::warn!`, so one bad surface value
//! never costs the caller the whole response.
//!
//! The three user-facing French messages (`NotAPdf`, `EmptyOrCorruptPdf`,
//! `ProviderTimeout`) are wire text returned verbatim in the response
//! `detail` field; everything else is operator-facing English.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse failure classification used by the HTTP boundary.
///
/// The mapping is fixed: `InvalidInput` → 400, `Timeout` → 504,
/// `ProviderFailure` and `Internal` → 500. `Configuration` errors are never
/// served — the binary reports them and exits before binding a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upload itself is unusable (bad name, bad magic, empty PDF).
    InvalidInput,
    /// The provider call exceeded its time bound.
    Timeout,
    /// The provider errored, or its reply could not be used.
    ProviderFailure,
    /// Startup configuration is invalid; refuse to serve.
    Configuration,
    /// Everything else (task join failures, temp-dir I/O, render faults).
    Internal,
}

/// All errors returned by the plan2data extraction path.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// Multipart body had no `file` field.
    #[error("Aucun fichier fourni")]
    MissingFile,

    /// Uploaded filename does not end in `.pdf`.
    #[error("Le fichier doit être un PDF")]
    NotAPdf { filename: String },

    /// The multipart body could not be read (bad boundary, aborted stream).
    #[error("Invalid multipart body: {detail}")]
    InvalidMultipart { detail: String },

    /// File bytes do not start with `%PDF`, the document has no pages, or
    /// pdfium could not open it.
    #[error("Le fichier PDF est vide ou corrompu")]
    EmptyOrCorruptPdf { detail: String },

    /// Could not write the upload into the request's temp directory.
    #[error("Failed to store upload at '{path}': {source}")]
    UploadStoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF processing errors ─────────────────────────────────────────────
    /// pdfium-render failed while rasterising page 1.
    #[error("Rasterisation failed for page 1: {detail}")]
    RasterisationFailed { detail: String },

    /// pdfium-render failed while reading page text.
    #[error("Text extraction failed on page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// PNG encoding of the rendered page failed.
    #[error("Failed to encode page image as PNG: {detail}")]
    ImageEncodingFailed { detail: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// The provider call exceeded the configured bound.
    #[error("L'analyse du plan a pris trop de temps")]
    ProviderTimeout { secs: u64 },

    /// The provider API rejected the request with an error status.
    #[error("LLM API error (HTTP {status}): {message}")]
    ProviderApi { status: u16, message: String },

    /// Authentication failed (401/403) — retry will not help.
    #[error("Authentication error from provider '{provider}': {detail}\nCheck that OPENAI_API_KEY is valid.")]
    ProviderAuth { provider: String, detail: String },

    /// The provider returned HTTP 429.
    #[error("Rate limit exceeded for provider '{provider}'")]
    ProviderRateLimited {
        provider: String,
        retry_after_secs: Option<u64>,
    },

    /// Network-level failure talking to the provider.
    #[error("HTTP request to LLM provider failed: {source}")]
    ProviderNetwork {
        #[source]
        source: reqwest::Error,
    },

    /// The reply had no `choices[0].message.content`.
    #[error("LLM reply contained no content")]
    EmptyReply,

    /// The reply content was not a JSON object.
    #[error("LLM reply is not a JSON object: {detail}\nReply excerpt: {excerpt}")]
    MalformedReply { detail: String, excerpt: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// A required environment variable is missing.
    #[error("Environment variable {var} is not set.\nExport your LLM provider API key before starting the server.")]
    MissingApiKey { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// Classify this error for status mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFile
            | Self::NotAPdf { .. }
            | Self::InvalidMultipart { .. }
            | Self::EmptyOrCorruptPdf { .. } => ErrorKind::InvalidInput,
            Self::ProviderTimeout { .. } => ErrorKind::Timeout,
            Self::ProviderApi { .. }
            | Self::ProviderAuth { .. }
            | Self::ProviderRateLimited { .. }
            | Self::ProviderNetwork { .. }
            | Self::EmptyReply
            | Self::MalformedReply { .. } => ErrorKind::ProviderFailure,
            Self::MissingApiKey { .. } | Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::UploadStoreFailed { .. }
            | Self::RasterisationFailed { .. }
            | Self::TextExtractionFailed { .. }
            | Self::ImageEncodingFailed { .. }
            | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
