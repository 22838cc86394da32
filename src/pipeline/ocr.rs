//! Text recognition: turn one page bitmap into text.
//!
//! [`TextRecognizer`] is the seam between the pipeline and the OCR engine.
//! Its error type separates faults the pipeline can absorb (the engine
//! rejected this image) from ones it cannot (the engine is not installed);
//! see [`RecognitionError::is_isolated`].
//!
//! [`TesseractRecognizer`] shells out to the `tesseract` CLI. The page is
//! written to a scratch directory as PNG and the text read back from
//! tesseract's output file; the directory is removed when it goes out of
//! scope, on success and failure alike.

use crate::error::RecognitionError;
use crate::pipeline::encode::encode_png;
use image::DynamicImage;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, instrument};

/// Recognizes text in a page image.
pub trait TextRecognizer {
    /// Recognize `image` using the language model named by `locale`.
    ///
    /// Returns the recognized text verbatim; empty when nothing was found.
    fn recognize(&self, image: &DynamicImage, locale: &str) -> Result<String, RecognitionError>;
}

/// [`TextRecognizer`] wrapping the `tesseract` CLI tool.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: PathBuf,
    dpi: u32,
}

impl TesseractRecognizer {
    /// `command` is the executable name or path; `dpi` is passed through so
    /// tesseract does not have to guess the resolution from PNG metadata.
    pub fn new(command: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            command: command.into(),
            dpi,
        }
    }

    fn engine_name(&self) -> String {
        self.command.display().to_string()
    }
}

impl TextRecognizer for TesseractRecognizer {
    #[instrument(level = "debug", skip_all, fields(locale = %locale))]
    fn recognize(&self, image: &DynamicImage, locale: &str) -> Result<String, RecognitionError> {
        let png = encode_png(image).map_err(|e| RecognitionError::InvalidImage {
            detail: e.to_string(),
        })?;

        let tmpdir = tempfile::TempDir::with_prefix("scribe-tesseract").map_err(|e| {
            RecognitionError::Scratch {
                detail: format!("cannot create temp dir: {e}"),
            }
        })?;
        let input_path = tmpdir.path().join("page.png");
        // tesseract appends ".txt" to the output base itself.
        let output_base = tmpdir.path().join("page");
        std::fs::write(&input_path, &png).map_err(|e| RecognitionError::Scratch {
            detail: format!("cannot write tesseract input file: {e}"),
        })?;

        let output = Command::new(&self.command)
            .arg(&input_path)
            .arg(&output_base)
            .arg("-l")
            .arg(locale)
            .arg("--dpi")
            .arg(self.dpi.to_string())
            .output()
            .map_err(|e| RecognitionError::EngineUnavailable {
                engine: self.engine_name(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RecognitionError::EngineFailed {
                status: output.status.to_string(),
                detail: summarize_stderr(&output.stderr),
            });
        }

        let bytes = std::fs::read(output_base.with_extension("txt")).map_err(|e| {
            RecognitionError::OutputUnreadable {
                detail: e.to_string(),
            }
        })?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        debug!("tesseract returned {} bytes", text.len());
        Ok(text)
    }
}

/// Keep the last few non-empty lines of stderr. Tesseract prints banner
/// noise first and the actual complaint last.
fn summarize_stderr(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return "no diagnostic output".to_string();
    }
    let start = lines.len().saturating_sub(3);
    lines[start..].join(" | ")
}
