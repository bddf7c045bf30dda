// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewarp: find a photographed page, straighten it, and save it.
//
// Entry point. Initialises logging, builds the scan configuration from an
// optional JSON file plus command-line overrides, and runs one scan.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pagewarp_bridge::operator_console;
use pagewarp_core::error::{PagewarpError, Result};
use pagewarp_core::human_errors::{Severity, humanize_error};
use pagewarp_core::{AspectRatio, ScanConfig};
use pagewarp_document::DocumentScanner;
use pagewarp_document::raster::{self, mark_corners};

#[derive(Debug, Parser)]
#[command(name = "pagewarp")]
#[command(about = "Find the page in a photo and warp it into a flat, upright scan")]
#[command(version)]
struct Cli {
    /// Photo to scan.
    input: PathBuf,

    /// Where to write the rectified page. The format follows the extension.
    #[arg(short, long)]
    output: PathBuf,

    /// JSON scan configuration. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ask for confirmation after the page and its corners are found.
    #[arg(long)]
    interactive: bool,

    /// Directory for checkpoint preview images (interactive runs only).
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Also write the photo with the detected corners marked.
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Width of the output page in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Output page proportions as HEIGHT:WIDTH, e.g. 10:7.
    #[arg(long, value_parser = parse_ratio)]
    ratio: Option<AspectRatio>,

    /// Gray level (0-255) at or above which a pixel counts as paper.
    #[arg(long)]
    threshold: Option<u8>,

    /// Write the effective configuration (file plus flags) as JSON.
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn parse_ratio(text: &str) -> std::result::Result<AspectRatio, String> {
    AspectRatio::parse(text).ok_or_else(|| format!("expected N:D, got '{text}'"))
}

impl Cli {
    /// File configuration (or defaults) with command-line overrides applied.
    fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::load(path)?,
            None => ScanConfig::default(),
        };
        if let Some(width) = self.width {
            config.target_width = width;
        }
        if let Some(ratio) = self.ratio {
            config.aspect_ratio = ratio;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.scan_config()?;
    if let Some(path) = &cli.save_config {
        config.save(path)?;
        tracing::info!(path = %path.display(), "Configuration written");
    }
    let scanner = DocumentScanner::new(config)?;
    let photo = raster::decode(&cli.input)?;

    let mut console = operator_console(cli.interactive, cli.preview_dir.clone());
    let outcome = scanner.scan_with(&photo, console.as_mut())?;

    if let Some(path) = &cli.annotated {
        raster::encode(&mark_corners(&photo, &outcome.detection.corners), path)?;
    }
    raster::encode(&outcome.page, &cli.output)?;

    tracing::info!(
        output = %cli.output.display(),
        width = outcome.page.width(),
        height = outcome.page.height(),
        "Scan complete"
    );
    Ok(())
}

fn exit_code(err: &PagewarpError) -> ExitCode {
    match err {
        PagewarpError::OperatorCancelled { .. } => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(input = %cli.input.display(), "Pagewarp starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            if human.severity == Severity::Cancelled {
                tracing::warn!(%err, "Scan cancelled");
            } else {
                tracing::error!(%err, "Scan failed");
            }
            eprintln!("{}\n{}", human.message, human.suggestion);
            exit_code(&err)
        }
    }
}
