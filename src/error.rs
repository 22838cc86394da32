//! Error types for the scribe-ocr library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ScribeError`] — **Fatal**: the run cannot continue (input missing,
//!   document unreadable, a page that will not rasterise, output not
//!   writable). Returned as `Err(ScribeError)` from the `extract*` functions.
//!
//! * [`RecognitionError`] — **Isolated**: the OCR engine choked on one page.
//!   The pipeline writes an error marker for that page and moves on, so one
//!   bad scan never voids the rest of the document.
//!
//! [`RecognitionError::EngineUnavailable`] is the exception: an engine that
//! cannot even be started will fail every page, so the pipeline escalates it
//! to [`ScribeError::OcrUnavailable`].

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the scribe-ocr library.
#[derive(Debug, Error)]
pub enum ScribeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found at '{path}'\nCheck the path exists and is a regular file.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document could not be opened or parsed.
    #[error("Cannot open PDF '{path}': {detail}")]
    DocumentOpen { path: PathBuf, detail: String },

    /// pdfium failed to rasterise a page. Treated as document corruption.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine could not be started at all.
    #[error("OCR engine '{engine}' is unavailable: {detail}\nInstall tesseract or pass --tesseract <PATH>.")]
    OcrUnavailable { engine: String, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create, write or flush the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, place the library in the working\n\
directory, or install it system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse failure class, used by callers that only care about how a run
/// failed rather than the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorClass {
    /// Precondition failure: nothing was touched.
    InputNotFound,
    /// The document never opened; no page sections were written.
    DocumentOpen,
    /// Anything else; the run was aborted mid-way.
    Unexpected,
}

impl ScribeError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ScribeError::InputNotFound { .. } | ScribeError::PermissionDenied { .. } => {
                ErrorClass::InputNotFound
            }
            ScribeError::DocumentOpen { .. } | ScribeError::PdfiumBindingFailed(_) => {
                ErrorClass::DocumentOpen
            }
            ScribeError::RenderFailed { .. }
            | ScribeError::OcrUnavailable { .. }
            | ScribeError::OutputWriteFailed { .. }
            | ScribeError::InvalidConfig(_)
            | ScribeError::Unexpected(_) => ErrorClass::Unexpected,
        }
    }
}

/// An OCR failure for a single page image.
#[derive(Debug, Clone, Error, Serialize)]
pub enum RecognitionError {
    /// The bitmap could not be turned into something the engine accepts.
    #[error("page image is malformed: {detail}")]
    InvalidImage { detail: String },

    /// The engine ran but reported failure.
    #[error("OCR engine failed (status {status}): {detail}")]
    EngineFailed { status: String, detail: String },

    /// The engine claimed success but its output could not be read back.
    #[error("OCR output could not be read: {detail}")]
    OutputUnreadable { detail: String },

    /// Scratch files for the engine could not be prepared.
    #[error("OCR scratch file error: {detail}")]
    Scratch { detail: String },

    /// The engine binary could not be launched.
    #[error("OCR engine '{engine}' could not be started: {detail}")]
    EngineUnavailable { engine: String, detail: String },
}

impl RecognitionError {
    /// Whether this failure is confined to the current page.
    pub fn is_isolated(&self) -> bool {
        !matches!(self, RecognitionError::EngineUnavailable { .. })
    }
}

impl From<RecognitionError> for ScribeError {
    fn from(e: RecognitionError) -> Self {
        match e {
            RecognitionError::EngineUnavailable { engine, detail } => {
                ScribeError::OcrUnavailable { engine, detail }
            }
            other => ScribeError::Unexpected(other.to_string()),
        }
    }
}
