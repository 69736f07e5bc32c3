//! Batch processing command for multiple OCR receipt files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use tiquete_core::models::receipt::ReceiptRecord;
use tiquete_core::output::output_file_name;
use tiquete_core::receipt::PatternReceiptParser;

use super::process::{output_config_for, process_file, write_output, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (overrides the configured one)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of receipts processed in parallel
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Page of each OCR document to read (overrides the configured one)
    #[arg(short, long)]
    page: Option<usize>,

    /// Skip calendar validation of receipt dates
    #[arg(long)]
    no_date_validation: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ReceiptRecord>,
    warnings: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let output_config =
        output_config_for(&config.output, args.output_dir.as_ref(), args.format);
    let page = args.page.unwrap_or(config.document.page);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("json")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&output_config.directory)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )?
            .progress_chars("=>-"),
    );

    // One receipt per blocking task; `buffered` keeps input order
    let parser = Arc::new(
        PatternReceiptParser::new().with_date_validation(!args.no_date_validation),
    );
    let mut tasks = stream::iter(files)
        .map(|path| {
            let parser = Arc::clone(&parser);
            tokio::task::spawn_blocking(move || {
                let file_start = Instant::now();
                let result = process_file(&path, &parser, page);
                (path, result, file_start.elapsed().as_millis() as u64)
            })
        })
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    let mut written = HashSet::new();

    while let Some(joined) = tasks.next().await {
        let (path, result, processing_time_ms) = joined?;

        match result {
            Ok(extraction) => {
                let record = extraction.record;
                let output_path = output_config
                    .directory
                    .join(output_file_name(&record, &output_config));

                if !written.insert(output_path.clone()) {
                    warn!(
                        "{} overwrites output of an earlier receipt with the same number",
                        path.display()
                    );
                }

                write_output(&record, args.format, &output_config)?;

                results.push(ProcessResult {
                    path,
                    record: Some(record),
                    warnings: extraction.warnings.len(),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        warnings: 0,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if args.summary {
        let summary_path = output_config.directory.join("summary.csv");

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "date",
        "subtotal",
        "total",
        "items",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let processing_time_ms = result.processing_time_ms.to_string();

        if let Some(record) = &result.record {
            let subtotal = record.subtotal.to_string();
            let total = record.total.to_string();
            let items = record.line_items.len().to_string();
            let warnings = result.warnings.to_string();
            wtr.write_record([
                filename,
                "success",
                record.invoice_number.as_str(),
                record.date.as_str(),
                subtotal.as_str(),
                total.as_str(),
                items.as_str(),
                warnings.as_str(),
                processing_time_ms.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                processing_time_ms.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
