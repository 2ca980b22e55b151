//! Upload ingestion: validate the posted bytes and stage them on disk.
//!
//! ## Why stage to a temp file?
//!
//! pdfium requires a file-system path — it cannot stream from a byte buffer.
//! Writing the upload into a `TempDir` gives us a path pdfium can open while
//! ensuring cleanup happens automatically when `StoredUpload` is dropped,
//! even if the request task panics. We validate the PDF magic bytes (`%PDF`)
//! before returning so callers get a meaningful 400 rather than a pdfium
//! load failure.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Fixed name for the staged file. The client filename is only consulted
/// for extension validation; storing under a fixed name means a hostile
/// filename can never escape the temp directory.
const STAGED_NAME: &str = "upload.pdf";

/// An upload staged on disk, ready for pdfium.
///
/// The `TempDir` is kept alive to prevent cleanup until processing completes.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    size_bytes: usize,
    _temp_dir: TempDir,
}

impl StoredUpload {
    /// Path to the staged PDF file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the upload in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

/// Check whether the client filename claims to be a PDF.
///
/// The match is case-sensitive on purpose: the service has only ever been
/// fed lowercase `.pdf` names by its upstream and anything else is treated
/// as a client error.
pub fn has_pdf_extension(filename: &str) -> bool {
    filename.ends_with(".pdf")
}

/// Validate the upload and stage it as a temp file.
///
/// Rejects (all as 400-class [`ExtractError`] variants):
/// - filenames without a `.pdf` extension
/// - empty bodies
/// - bodies whose first bytes are not the `%PDF` magic
pub async fn store_upload(filename: &str, bytes: &[u8]) -> Result<StoredUpload, ExtractError> {
    if !has_pdf_extension(filename) {
        return Err(ExtractError::NotAPdf {
            filename: filename.to_string(),
        });
    }

    if bytes.is_empty() {
        return Err(ExtractError::EmptyOrCorruptPdf {
            detail: "empty upload body".to_string(),
        });
    }

    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let prefix: Vec<u8> = bytes.iter().take(4).copied().collect();
        return Err(ExtractError::EmptyOrCorruptPdf {
            detail: format!("bad magic bytes {:?}", prefix),
        });
    }

    let temp_dir = TempDir::new().map_err(|e| ExtractError::UploadStoreFailed {
        path: std::env::temp_dir(),
        source: e,
    })?;
    let path = temp_dir.path().join(STAGED_NAME);

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ExtractError::UploadStoreFailed {
            path: path.clone(),
            source: e,
        })?;

    debug!(
        "Staged upload '{}' ({} bytes) at {}",
        filename,
        bytes.len(),
        path.display()
    );

    Ok(StoredUpload {
        path,
        size_bytes: bytes.len(),
        _temp_dir: temp_dir,
    })
}
