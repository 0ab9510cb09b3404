//! CLI binary for pdref.
//!
//! A thin shim over the library crate that maps CLI flags to `CrawlConfig`,
//! binds pdfium and prints progress to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdref::{
    crawl, parse_cutoff, CrawlConfig, CrawlProgressCallback, CrawlReport, DocumentReport,
    PdfiumDecoder, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner anchored at the bottom of the terminal, one log line per document.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl CrawlProgressCallback for CliProgressCallback {
    fn on_crawl_start(&self, source_dir: &Path, _output_dir: &Path) {
        self.bar.set_message(source_dir.display().to_string());
    }

    fn on_source_missing(&self, source_dir: &Path) {
        self.bar.println(format!(
            "  {} The PDFs directory does not exist: {}",
            red("✗"),
            source_dir.display()
        ));
    }

    fn on_document_start(&self, path: &Path) {
        self.bar.set_prefix("Processing");
        self.bar.set_message(path.display().to_string());
        self.bar.println(dim(&path.display().to_string()));
    }

    fn on_document_complete(&self, report: &DocumentReport) {
        self.bar.println(format!(
            "  {} {:<32} {}",
            green("✓"),
            report.slug,
            dim(&format!(
                "{} pages, {} annotations, {} images",
                report.pages, report.annotations, report.images_saved
            )),
        ));
    }

    fn on_document_error(&self, path: &Path, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Keep the log line on one terminal row.
        let msg = match error.char_indices().nth(79) {
            Some((cut, _)) => format!("{}\u{2026}", &error[..cut]),
            None => error.to_string(),
        };

        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            path.display(),
            red(&msg)
        ));
    }

    fn on_crawl_complete(&self, report: &CrawlReport) {
        self.bar.finish_and_clear();

        let failed = self.errors.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!("{} {}", green("✔"), bold("Done!"));
        } else {
            eprintln!(
                "{} {} documents processed  ({} failed)",
                red("✘"),
                bold(&report.processed().to_string()),
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Notes for every PDF below ~/papers
  pdref ~/papers ~/notes

  # Only PDFs modified after a date
  pdref --since 2024-01-31 ~/papers ~/notes

  # Skip images smaller than 100x100 pixels, describe the rest
  pdref --min-image-pixels 10000 --debug ~/papers ~/notes

  # Machine-readable run report
  pdref --json --no-progress ~/papers ~/notes > report.json

OUTPUT:
  <OUTPUT>/<slug>/<slug>.pdf              copy of the source PDF
  <OUTPUT>/<slug>/_index.md               written on the first run only
  <OUTPUT>/<slug>/<slug>-p001-12.png      images, linked from _index.md
  <OUTPUT>/<slug>/notes/<timestamp>.md    one per run

ENVIRONMENT VARIABLES:
  PDREF_SOURCE, PDREF_OUTPUT, PDREF_SINCE, PDREF_MIN_IMAGE_PIXELS,
  PDREF_DEBUG, PDREF_JSON, PDREF_NO_PROGRESS, PDREF_VERBOSE, PDREF_QUIET
  PDFIUM_LIB_PATH         Path to libpdfium (default: ./ then system paths)
  RUST_LOG                Overrides -v / -q log filtering
"#;

/// Extract annotations and images from PDFs into Markdown notes.
#[derive(Parser, Debug)]
#[command(
    name = "pdref",
    version,
    about = "Extract annotations and images from PDFs into Markdown notes",
    long_about = "Walk a folder of PDFs and write, for each document, a notes folder holding a \
copy of the PDF, an index page with the extracted images and a dated notes file quoting the \
text under every highlight, underline, strike-out and squiggly annotation.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder searched recursively for *.pdf files.
    #[arg(env = "PDREF_SOURCE")]
    source: PathBuf,

    /// Folder receiving one notes folder per document.
    #[arg(env = "PDREF_OUTPUT")]
    output: PathBuf,

    /// Only process PDFs modified after this date (YYYY-MM-DD[THH:MM[:SS]]).
    #[arg(
        long,
        env = "PDREF_SINCE",
        long_help = "Only process PDFs whose modification time is strictly after this local \
date or date-time. Accepts YYYY-MM-DD, YYYY-MM-DDTHH:MM[:SS] and RFC 3339. A value that \
cannot be parsed disables the filter."
    )]
    since: Option<String>,

    /// Skip images with fewer pixels than this.
    #[arg(long, env = "PDREF_MIN_IMAGE_PIXELS")]
    min_image_pixels: Option<u64>,

    /// Write a description block above every image in _index.md.
    #[arg(long, env = "PDREF_DEBUG")]
    debug: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "PDREF_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDREF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDREF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDREF_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // With the spinner active, per-document lines come from the callback,
    // so library logs are limited to warnings.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn CrawlProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Bind pdfium ──────────────────────────────────────────────────────
    let decoder = PdfiumDecoder::new().context("Failed to load the PDF engine")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let report = crawl(&config, &decoder).context("Crawl failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    if !cli.quiet && !show_progress {
        if report.source_missing {
            eprintln!("The PDFs directory does not exist");
        } else {
            eprintln!(
                "Processed {}/{} documents ({} skipped by date, {} failed)",
                report.processed(),
                report.discovered,
                report.skipped_by_date,
                report.failed
            );
        }
    }

    Ok(())
}

/// Map CLI args to `CrawlConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<CrawlConfig> {
    let cutoff = cli.since.as_deref().and_then(|s| {
        let parsed = parse_cutoff(s);
        if parsed.is_none() {
            tracing::warn!("Ignoring unparseable --since value '{}'", s);
        }
        parsed
    });

    let mut builder = CrawlConfig::builder(&cli.source, &cli.output)
        .modified_after(cutoff)
        .debug(cli.debug);

    if let Some(min) = cli.min_image_pixels {
        builder = builder.image_size_hint(min);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
