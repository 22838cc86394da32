//! Configuration types for PDF text extraction.
//!
//! All run behaviour is controlled through [`ExtractionConfig`], built via
//! its [`ExtractionConfigBuilder`]. Paths, resolution and OCR locale live in
//! one struct and are passed into the pipeline, so tests can point a run at
//! a temp directory without touching any global state.

use crate::error::ScribeError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default rasterisation resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 300;

/// Default tesseract language code.
pub const DEFAULT_LOCALE: &str = "eng";

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "extracted_text.txt";

/// Lowest DPI the builder accepts. Below this tesseract output is noise.
pub const MIN_DPI: u32 = 72;

/// Highest DPI the builder accepts. An A4 page at 1200 DPI is ~140 MP.
pub const MAX_DPI: u32 = 1200;

/// Configuration for a single extraction run.
///
/// # Example
/// ```rust
/// use scribe_ocr::ExtractionConfig;
///
/// let config = ExtractionConfig::builder("scan.pdf")
///     .output_path("scan.txt")
///     .dpi(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.locale, "eng");
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// PDF to read.
    pub input_path: PathBuf,

    /// Text file to write. Truncated at run start. Default: `extracted_text.txt`.
    pub output_path: PathBuf,

    /// Rendering DPI used when rasterising each page. Range: 72–1200. Default: 300.
    ///
    /// Tesseract is trained on glyphs around 20–30 px tall; 300 DPI puts
    /// 10–12 pt body text in that band.
    pub dpi: u32,

    /// Tesseract language code passed as `-l`. Default: `eng`.
    pub locale: String,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Path or name of the tesseract executable. Default: `tesseract`.
    pub tesseract_cmd: PathBuf,

    /// Per-page progress events. `None` means no callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("input_path", &self.input_path)
            .field("output_path", &self.output_path)
            .field("dpi", &self.dpi)
            .field("locale", &self.locale)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a config for `input_path` with every other field at its default.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            dpi: DEFAULT_DPI,
            locale: DEFAULT_LOCALE.to_string(),
            password: None,
            tesseract_cmd: PathBuf::from("tesseract"),
            progress_callback: None,
        }
    }

    /// Create a new builder for `ExtractionConfig`.
    pub fn builder(input_path: impl Into<PathBuf>) -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::new(input_path),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.locale = locale.into();
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ScribeError> {
        let c = &self.config;
        if !(MIN_DPI..=MAX_DPI).contains(&c.dpi) {
            return Err(ScribeError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.locale.trim().is_empty() {
            return Err(ScribeError::InvalidConfig("locale must not be empty".into()));
        }
        if c.output_path.as_os_str().is_empty() {
            return Err(ScribeError::InvalidConfig(
                "output path must not be empty".into(),
            ));
        }
        if c.input_path == c.output_path {
            return Err(ScribeError::InvalidConfig(format!(
                "output path '{}' would overwrite the input PDF",
                c.output_path.display()
            )));
        }
        Ok(self.config)
    }
}
