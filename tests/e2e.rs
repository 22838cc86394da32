//! End-to-end tests against real pdfium and tesseract.
//!
//! These tests use PDF files in `./test_cases/` and need libpdfium plus the
//! `tesseract` binary with English data. They are gated behind the
//! `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test e2e -- --nocapture

use scribe_ocr::{extract, inspect, ExtractionConfig, ScribeError};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("scribe_ocr=debug")
        .with_test_writer()
        .try_init();
}

// ── Inspect ──────────────────────────────────────────────────────────────────

#[test]
fn test_inspect_scanned_letter() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("scanned_letter.pdf"));
    init_tracing();

    let meta = inspect(&path, None).expect("inspect() should succeed");
    assert!(meta.page_count >= 1);
    assert!(!meta.pdf_version.is_empty());
    println!("Metadata: {:?}", meta);
}

#[test]
fn test_inspect_nonexistent() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP");
        return;
    }
    let err = inspect(test_cases_dir().join("does_not_exist.pdf"), None).unwrap_err();
    assert!(matches!(err, ScribeError::InputNotFound { .. }));
}

// ── Extraction ───────────────────────────────────────────────────────────────

#[test]
fn test_extract_scanned_letter() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("scanned_letter.pdf"));
    init_tracing();

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("letter.txt");
    let config = ExtractionConfig::builder(&path)
        .output_path(&output)
        .build()
        .expect("valid config");

    let outcome = extract(&config).expect("extract() should succeed");
    let text = std::fs::read_to_string(&output).expect("output written");

    assert_eq!(outcome.pages_processed, outcome.pages_found);
    for n in 1..=outcome.pages_found {
        assert!(
            text.contains(&format!("\n--- Page {n} ---\n\n")),
            "missing header for page {n}"
        );
    }
    assert!(
        text.chars().filter(|c| c.is_alphabetic()).count() > 50,
        "suspiciously little text recognized: {} bytes",
        text.len()
    );
    println!("✓ {} pages, {} bytes", outcome.pages_found, text.len());
}

#[test]
fn test_extract_with_missing_tesseract_aborts() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("scanned_letter.pdf"));

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("letter.txt");
    let config = ExtractionConfig::builder(&path)
        .output_path(&output)
        .tesseract_cmd("/nonexistent/tesseract")
        .build()
        .expect("valid config");

    let err = extract(&config).unwrap_err();
    assert!(matches!(err, ScribeError::OcrUnavailable { .. }), "got {err:?}");
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}
