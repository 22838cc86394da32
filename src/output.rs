//! Result types returned by an extraction run.
//!
//! The text itself goes to the output file as the run progresses; these
//! types carry the bookkeeping: which pages were recognized, which fell back
//! to an error marker, and how long each took. Everything is `Serialize` so
//! the CLI can emit it with `--json`.

use serde::Serialize;
use std::path::PathBuf;

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    /// OCR succeeded; the recognized text was written.
    Recognized,
    /// OCR failed for this page only; an error marker was written instead.
    RecognitionFailed { detail: String },
}

/// Bookkeeping for a single page section.
#[derive(Debug, Clone, Serialize)]
pub struct PageOutcome {
    /// 1-indexed page number.
    pub page_num: usize,
    #[serde(flatten)]
    pub status: PageStatus,
    /// Character count of the recognized text (0 for failed pages).
    pub text_chars: usize,
    /// Render + OCR + write time for this page.
    pub duration_ms: u64,
}

impl PageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, PageStatus::RecognitionFailed { .. })
    }
}

/// Summary of a run that reached the end of the document.
///
/// A run that aborted on a fatal error returns `Err(ScribeError)` instead,
/// so holding a `RunOutcome` means every page has a section in the output.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Page count reported by the document at open time.
    pub pages_found: usize,
    /// Pages with a section in the output (recognized or marker).
    pub pages_processed: usize,
    /// Pages whose section is an error marker.
    pub pages_failed: usize,
    pub pages: Vec<PageOutcome>,
    pub duration_ms: u64,
}

impl RunOutcome {
    /// An empty outcome for a document with `pages_found` pages.
    pub fn new(input_path: PathBuf, output_path: PathBuf, pages_found: usize) -> Self {
        Self {
            input_path,
            output_path,
            pages_found,
            pages_processed: 0,
            pages_failed: 0,
            pages: Vec::with_capacity(pages_found),
            duration_ms: 0,
        }
    }

    /// Record a finished page, keeping the counters in step.
    pub fn record(&mut self, page: PageOutcome) {
        self.pages_processed += 1;
        if page.is_failed() {
            self.pages_failed += 1;
        }
        self.pages.push(page);
    }

    /// `true` when every page was recognized without error.
    pub fn is_clean(&self) -> bool {
        self.pages_failed == 0 && self.pages_processed == self.pages_found
    }

    /// Pages recognized without error.
    pub fn pages_recognized(&self) -> usize {
        self.pages_processed - self.pages_failed
    }

    /// 1-indexed numbers of pages that got an error marker.
    pub fn failed_page_numbers(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| p.is_failed())
            .map(|p| p.page_num)
            .collect()
    }
}

/// Document properties reported by [`crate::inspect`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentInfo {
    pub path: PathBuf,
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub producer: Option<String>,
    pub pdf_version: String,
}
