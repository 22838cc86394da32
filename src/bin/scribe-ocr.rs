//! CLI binary for scribe-ocr.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, shows progress and prints the run summary.
//!
//! Exit status: 0 when the run reached the end of the document (even with
//! per-page OCR errors), 1 when the input file is missing or unreadable,
//! 2 when the run aborted on any other fatal error.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scribe_ocr::{
    extract, inspect, ErrorClass, ExtractionConfig, ExtractionProgressCallback, ProgressCallback,
    RunOutcome, ScribeError,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start time of the page currently being processed.
    page_started: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_extraction_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("OCR");
        self.bar.reset_eta();
    }

    fn page_elapsed_secs(&self) -> f64 {
        self.page_started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_pages} page(s) in the PDF"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        if let Ok(mut t) = self.page_started.lock() {
            *t = Some(Instant::now());
        }
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        let secs = self.page_elapsed_secs();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let secs = self.page_elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = match error.char_indices().nth(79) {
            Some((cut, _)) => format!("{}\u{2026}", &error[..cut]),
            None => error.to_string(),
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, outcome: &RunOutcome) {
        self.bar.finish_and_clear();
        let errors = self.errors.load(Ordering::SeqCst);
        if errors == 0 {
            eprintln!(
                "{} {} pages recognized",
                green("✔"),
                bold(&outcome.pages_recognized().to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages recognized  ({} OCR errors)",
                cyan("⚠"),
                bold(&outcome.pages_recognized().to_string()),
                outcome.pages_found,
                red(&errors.to_string()),
            );
        }
    }
}

impl Drop for CliProgressCallback {
    /// An aborted run never reaches `on_extraction_complete`; clear the bar
    /// so its last frame does not sit above the error message.
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic extraction (writes extracted_text.txt)
  scribe-ocr scan.pdf

  # Choose the output file
  scribe-ocr scan.pdf -o scan.txt

  # Higher resolution for small print
  scribe-ocr --dpi 400 contract.pdf -o contract.txt

  # Another tesseract language pack
  scribe-ocr --lang deu bescheid.pdf -o bescheid.txt

  # Machine-readable run summary
  scribe-ocr --json scan.pdf > summary.json

  # Inspect PDF metadata only
  scribe-ocr --inspect-only scan.pdf

OUTPUT FORMAT:
  Each page becomes a section:

    --- Page N ---

    <recognized text>

  A page whose OCR failed keeps its header and carries
  "--- OCR Error on Page N ---" instead of text.

EXIT STATUS:
  0  document processed (individual pages may have OCR errors)
  1  input file missing or unreadable
  2  run aborted (unreadable PDF, render failure, write failure, no tesseract)

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium; otherwise ./ then the system path
  RUST_LOG          Override log filter (e.g. scribe_ocr=debug)
"#;

/// Extract text from scanned PDFs with OCR.
#[derive(Parser, Debug)]
#[command(
    name = "scribe-ocr",
    version,
    about = "Extract text from scanned PDFs by rendering each page and running tesseract",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to read.
    input: PathBuf,

    /// Text file to write. Truncated at start.
    #[arg(short, long, env = "SCRIBE_OUTPUT", default_value = scribe_ocr::config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Rendering DPI (72–1200).
    #[arg(long, env = "SCRIBE_DPI", default_value_t = scribe_ocr::config::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=1200))]
    dpi: u32,

    /// Tesseract language code.
    #[arg(long, env = "SCRIBE_LANG", default_value = scribe_ocr::config::DEFAULT_LOCALE)]
    lang: String,

    /// Tesseract executable.
    #[arg(long, env = "SCRIBE_TESSERACT", default_value = "tesseract")]
    tesseract: PathBuf,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "SCRIBE_PASSWORD")]
    password: Option<String>,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "SCRIBE_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "SCRIBE_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCRIBE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCRIBE_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level page logs when it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let code = match run(&cli, show_progress) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", red("Error:"), e);
            ExitCode::from(exit_status_for(&e))
        }
    };

    if !cli.quiet && !cli.inspect_only {
        eprintln!("\nProcessing complete.");
    }
    code
}

fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, cli.password.as_deref()).context("Failed to inspect PDF")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let outcome = extract(&config).context("Extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("Failed to serialise outcome")?;
        println!("{json}");
    }

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} pages  {}ms  →  {}",
            if outcome.is_clean() {
                green("✔")
            } else {
                cyan("⚠")
            },
            outcome.pages_processed,
            outcome.pages_found,
            outcome.duration_ms,
            bold(&outcome.output_path.display().to_string()),
        );
        let failed = outcome.failed_page_numbers();
        if !failed.is_empty() {
            let list: Vec<String> = failed.iter().map(|p| p.to_string()).collect();
            eprintln!("   OCR errors on pages: {}", red(&list.join(", ")));
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder(&cli.input)
        .output_path(&cli.output)
        .dpi(cli.dpi)
        .locale(&cli.lang)
        .tesseract_cmd(&cli.tesseract);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Process exit status for a failed run: 1 for a missing or unreadable input,
/// 2 for everything else.
fn exit_status_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ScribeError>().map(ScribeError::class) {
        Some(ErrorClass::InputNotFound) => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_run(err: ScribeError) -> anyhow::Error {
        anyhow::Error::from(err).context("Extraction failed")
    }

    #[test]
    fn missing_input_exits_with_1_through_context() {
        let err = failed_run(ScribeError::InputNotFound {
            path: PathBuf::from("scan.pdf"),
        });
        assert_eq!(exit_status_for(&err), 1);
    }

    #[test]
    fn unreadable_input_exits_with_1() {
        let err = failed_run(ScribeError::PermissionDenied {
            path: PathBuf::from("scan.pdf"),
        });
        assert_eq!(exit_status_for(&err), 1);
    }

    #[test]
    fn aborted_runs_exit_with_2() {
        let open = failed_run(ScribeError::DocumentOpen {
            path: PathBuf::from("scan.pdf"),
            detail: "not a PDF".into(),
        });
        let render = failed_run(ScribeError::RenderFailed {
            page: 3,
            detail: "bitmap allocation failed".into(),
        });
        assert_eq!(exit_status_for(&open), 2);
        assert_eq!(exit_status_for(&render), 2);
    }

    #[test]
    fn non_scribe_errors_exit_with_2() {
        let err = anyhow::anyhow!("Failed to serialise outcome");
        assert_eq!(exit_status_for(&err), 2);
    }

    #[test]
    fn missing_input_message_names_the_path() {
        let err = failed_run(ScribeError::InputNotFound {
            path: PathBuf::from("nowhere/scan.pdf"),
        });
        let shown = format!("{err:#}");
        assert!(shown.starts_with("Extraction failed: "), "{shown}");
        assert!(shown.contains("nowhere/scan.pdf"), "{shown}");
    }

    #[test]
    fn dropping_the_callback_clears_an_unfinished_bar() {
        let cb = CliProgressCallback::new_dynamic();
        let bar = cb.bar.clone();
        cb.on_extraction_start(4);
        cb.on_page_start(1, 4);
        drop(cb);
        assert!(bar.is_finished());
    }

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::try_parse_from(["scribe-ocr", "scan.pdf"]).unwrap();
        assert_eq!(cli.dpi, 300);
        assert_eq!(cli.lang, "eng");
        assert!(Cli::try_parse_from(["scribe-ocr", "--dpi", "40", "scan.pdf"]).is_err());
    }
}
