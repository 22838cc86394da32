//! Extraction entry points and the page loop.
//!
//! [`extract`] wires the production backends (pdfium + tesseract) into the
//! loop; [`extract_with`] takes them as trait objects so the loop can be run
//! against fakes. Both return `Ok(RunOutcome)` only when every page has a
//! section in the output file.
//!
//! ## Run lifecycle
//!
//! ```text
//! check input ─▶ open document ─▶ create output ─▶ per page:
//!                                                  render ─▶ recognize ─▶ write ─▶ flush
//! ```
//!
//! * A missing input fails before the output file is touched.
//! * A document that will not open fails before the output file is created.
//! * A recognition failure on one page writes an error marker and the loop
//!   moves on.
//! * Any other failure leaves the loop immediately. The document handle and
//!   the output stream are owned by this function's frame, so they are
//!   dropped (closed) on the way out either way.

use crate::config::ExtractionConfig;
use crate::error::ScribeError;
use crate::output::{DocumentInfo, PageOutcome, PageStatus, RunOutcome};
use crate::pipeline::input::check_input;
use crate::pipeline::ocr::{TesseractRecognizer, TextRecognizer};
use crate::pipeline::render::{PageSource, PdfRasterizer, PdfiumRasterizer};
use crate::pipeline::writer::SectionWriter;
use crate::progress::ExtractionProgressCallback;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Extract text from `config.input_path` into `config.output_path` using
/// pdfium for rendering and tesseract for recognition.
///
/// # Errors
/// Returns `Err(ScribeError)` for fatal errors only:
/// - input missing or unreadable (output untouched)
/// - document cannot be opened (output not created)
/// - pdfium cannot be loaded, tesseract cannot be started
/// - a page fails to render, or the output cannot be written
///
/// Per-page OCR failures are not errors; see [`RunOutcome::pages_failed`].
pub fn extract(config: &ExtractionConfig) -> Result<RunOutcome, ScribeError> {
    check_input(&config.input_path)?;
    let rasterizer = PdfiumRasterizer::new()?;
    let recognizer = TesseractRecognizer::new(&config.tesseract_cmd, config.dpi);
    run_pipeline(config, &rasterizer, &recognizer)
}

/// Like [`extract`], with caller-supplied rendering and recognition backends.
pub fn extract_with(
    config: &ExtractionConfig,
    rasterizer: &dyn PdfRasterizer,
    recognizer: &dyn TextRecognizer,
) -> Result<RunOutcome, ScribeError> {
    check_input(&config.input_path)?;
    run_pipeline(config, rasterizer, recognizer)
}

/// Run [`extract`] on tokio's blocking pool.
///
/// The page loop itself stays synchronous; this only keeps it off the async
/// worker threads for callers already inside a runtime.
pub async fn extract_async(config: ExtractionConfig) -> Result<RunOutcome, ScribeError> {
    tokio::task::spawn_blocking(move || extract(&config))
        .await
        .map_err(|e| ScribeError::Unexpected(format!("Extraction task panicked: {}", e)))?
}

/// Read document properties without rendering or writing anything.
pub fn inspect(path: impl AsRef<Path>, password: Option<&str>) -> Result<DocumentInfo, ScribeError> {
    let path = path.as_ref();
    let rasterizer = PdfiumRasterizer::new()?;
    inspect_with(path, password, &rasterizer)
}

/// Like [`inspect`], with a caller-supplied rendering backend.
pub fn inspect_with(
    path: &Path,
    password: Option<&str>,
    rasterizer: &dyn PdfRasterizer,
) -> Result<DocumentInfo, ScribeError> {
    check_input(path)?;
    let document = rasterizer.open(path, password)?;
    Ok(document.info())
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn run_pipeline(
    config: &ExtractionConfig,
    rasterizer: &dyn PdfRasterizer,
    recognizer: &dyn TextRecognizer,
) -> Result<RunOutcome, ScribeError> {
    let start = Instant::now();
    info!("Opening {}", config.input_path.display());

    let mut document = rasterizer.open(&config.input_path, config.password.as_deref())?;
    let total_pages = document.page_count();
    info!("Found {} page(s) in the PDF", total_pages);

    let mut writer = SectionWriter::create(&config.output_path, &config.input_path)?;
    info!(
        "Processing pages and saving output to '{}'",
        config.output_path.display()
    );

    let callback = config.progress_callback.as_deref();
    if let Some(cb) = callback {
        cb.on_extraction_start(total_pages);
    }

    let mut outcome = RunOutcome::new(
        config.input_path.clone(),
        config.output_path.clone(),
        total_pages,
    );

    for index in 0..total_pages {
        let step = PageStep {
            index,
            total_pages,
            config,
            callback,
        };
        match step.run(document.as_mut(), recognizer, &mut writer) {
            Ok(page) => outcome.record(page),
            Err(e) => {
                error!(
                    "Aborting at page {}/{} ({} sections written): {}",
                    index + 1,
                    total_pages,
                    writer.sections(),
                    e
                );
                return Err(e);
            }
        }
    }

    drop(document);
    drop(writer);

    outcome.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Extraction complete: {}/{} pages recognized, {} OCR errors, {}ms",
        outcome.pages_recognized(),
        outcome.pages_found,
        outcome.pages_failed,
        outcome.duration_ms
    );

    if let Some(cb) = callback {
        cb.on_extraction_complete(&outcome);
    }

    Ok(outcome)
}

/// One iteration of the page loop.
struct PageStep<'a> {
    index: usize,
    total_pages: usize,
    config: &'a ExtractionConfig,
    callback: Option<&'a dyn ExtractionProgressCallback>,
}

impl PageStep<'_> {
    fn run<W: Write>(
        &self,
        document: &mut dyn PageSource,
        recognizer: &dyn TextRecognizer,
        writer: &mut SectionWriter<W>,
    ) -> Result<PageOutcome, ScribeError> {
        let page_num = self.index + 1;
        let started = Instant::now();
        if let Some(cb) = self.callback {
            cb.on_page_start(page_num, self.total_pages);
        }

        let image = document.render_page(self.index, self.config.dpi)?;
        let recognized = recognizer.recognize(&image, &self.config.locale);
        drop(image);

        let (status, text_chars) = match recognized {
            Ok(text) => {
                writer.write_text(page_num, &text)?;
                debug!("Page {}: {} bytes of text", page_num, text.len());
                info!("Page {}/{} processed", page_num, self.total_pages);
                if let Some(cb) = self.callback {
                    cb.on_page_complete(page_num, self.total_pages, text.len());
                }
                (PageStatus::Recognized, text.chars().count())
            }
            Err(e) if e.is_isolated() => {
                warn!("Error on page {}: {}", page_num, e);
                writer.write_error(page_num)?;
                let detail = e.to_string();
                if let Some(cb) = self.callback {
                    cb.on_page_error(page_num, self.total_pages, &detail);
                }
                (PageStatus::RecognitionFailed { detail }, 0)
            }
            Err(e) => return Err(e.into()),
        };

        Ok(PageOutcome {
            page_num,
            status,
            text_chars,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
