//! Pipeline stages for page-by-page OCR extraction.
//!
//! Each submodule implements exactly one step. Rendering and recognition sit
//! behind narrow traits so the loop in [`crate::extract`] can be driven by
//! fakes in tests and by pdfium + tesseract in production.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ ocr ──▶ writer
//! (checks)  (pdfium)   (PNG)    (tesseract) (page sections)
//! ```
//!
//! 1. [`input`]  — verify the PDF path exists and is readable
//! 2. [`render`] — open the document and rasterise one page at a time
//! 3. [`encode`] — PNG-encode the bitmap for the OCR engine
//! 4. [`ocr`]    — run the recognizer; failures here are per-page
//! 5. [`writer`] — append the page section and flush

pub mod encode;
pub mod input;
pub mod ocr;
pub mod render;
pub mod writer;
