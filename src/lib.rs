//! # scribe-ocr
//!
//! Extract text from scanned or image-only PDFs with OCR.
//!
//! Embedded text layers in scanned documents are missing or garbage, so this
//! crate ignores them: every page is rasterised (300 DPI by default) and run
//! through tesseract. The result is a plain UTF-8 text file with one section
//! per page, written and flushed page by page so an interrupted run keeps
//! everything finished so far.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   check the path exists and looks like a PDF
//!  ├─ 2. Open    load the document via pdfium, read the page count
//!  ├─ 3. Render  rasterise one page at the configured DPI
//!  ├─ 4. OCR     tesseract on the page image (failures stay on that page)
//!  └─ 5. Write   append "--- Page N ---" section, flush, next page
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scribe_ocr::{extract, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder("scan.pdf")
//!         .output_path("scan.txt")
//!         .build()?;
//!     let outcome = extract(&config)?;
//!     eprintln!(
//!         "{} pages, {} OCR errors",
//!         outcome.pages_processed, outcome.pages_failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scribe-ocr` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Runtime requirements
//!
//! * a pdfium shared library (`PDFIUM_LIB_PATH`, working directory, or system path)
//! * the `tesseract` executable with the requested language data installed

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ErrorClass, RecognitionError, ScribeError};
pub use extract::{extract, extract_async, extract_with, inspect, inspect_with};
pub use output::{DocumentInfo, PageOutcome, PageStatus, RunOutcome};
pub use pipeline::ocr::{TesseractRecognizer, TextRecognizer};
pub use pipeline::render::{PageSource, PdfRasterizer, PdfiumRasterizer};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
