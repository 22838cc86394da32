//! Page-section output: the text file the run produces.
//!
//! The file is created (truncated) once at run start and then appended to,
//! one section per page, in page order. Every section is flushed as soon as
//! it is written, so if the process dies mid-run the file holds every page
//! finished so far, each complete.
//!
//! Section layout for page `N`:
//!
//! ```text
//! \n--- Page N ---\n
//! \n
//! <recognized text, verbatim>
//! ```
//!
//! or, when recognition failed for that page:
//!
//! ```text
//! \n--- Page N ---\n
//! \n
//! \n--- OCR Error on Page N ---\n
//! ```

use crate::error::ScribeError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The page header line for 1-indexed page `page_num`, surrounding newlines included.
pub fn page_header(page_num: usize) -> String {
    format!("\n--- Page {} ---\n", page_num)
}

/// The marker written in place of text when OCR failed on `page_num`.
pub fn error_marker(page_num: usize) -> String {
    format!("\n--- OCR Error on Page {} ---\n", page_num)
}

/// Append-only writer of page sections.
///
/// Owns the output stream for the whole run. Dropping it closes the file,
/// so every exit path from the pipeline releases it.
pub struct SectionWriter<W: Write> {
    inner: W,
    path: PathBuf,
    sections: usize,
}

impl SectionWriter<BufWriter<File>> {
    /// Create or truncate `path`, creating parent directories as needed.
    ///
    /// Refuses with [`ScribeError::InvalidConfig`] when `path` resolves to the
    /// same file as `input` (through `..`, symlinks or hard links), before
    /// anything is truncated.
    pub fn create(path: &Path, input: &Path) -> Result<Self, ScribeError> {
        let write_err = |source| ScribeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        if is_same_file(path, input) {
            return Err(ScribeError::InvalidConfig(format!(
                "output path {} refers to the input PDF {}",
                path.display(),
                input.display()
            )));
        }
        let file = File::create(path).map_err(write_err)?;
        debug!("Opened output {} (truncated)", path.display());
        Ok(Self::new(BufWriter::new(file), path.to_path_buf()))
    }
}

/// Whether `a` and `b` name the same existing file.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(x), Ok(y)) => x.dev() == y.dev() && x.ino() == y.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

impl<W: Write> SectionWriter<W> {
    /// Wrap an arbitrary stream. `path` is only used in error messages.
    pub fn new(inner: W, path: PathBuf) -> Self {
        Self {
            inner,
            path,
            sections: 0,
        }
    }

    /// Write a recognized-text section for `page_num` and flush.
    pub fn write_text(&mut self, page_num: usize, text: &str) -> Result<(), ScribeError> {
        self.write_section(page_num, text)
    }

    /// Write an error-marker section for `page_num` and flush.
    pub fn write_error(&mut self, page_num: usize) -> Result<(), ScribeError> {
        self.write_section(page_num, &error_marker(page_num))
    }

    /// Number of sections written so far.
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_section(&mut self, page_num: usize, body: &str) -> Result<(), ScribeError> {
        self.append(page_num, body)
            .map_err(|source| ScribeError::OutputWriteFailed {
                path: self.path.clone(),
                source,
            })?;
        self.sections += 1;
        Ok(())
    }

    fn append(&mut self, page_num: usize, body: &str) -> std::io::Result<()> {
        self.inner.write_all(page_header(page_num).as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.inner.write_all(body.as_bytes())?;
        self.inner.flush()
    }
}
