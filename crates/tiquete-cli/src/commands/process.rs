//! Process command - extract data from a single OCR receipt file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use tiquete_core::models::config::OutputConfig;
use tiquete_core::models::receipt::ReceiptRecord;
use tiquete_core::output::{output_file_name, to_json, write_record};
use tiquete_core::receipt::{ExtractionResult, PatternReceiptParser, ReceiptParser};
use tiquete_core::load_receipt_text;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input OCR JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: sample[_<receipt number>].json in the output directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output directory (overrides the configured one)
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Page of the OCR document to read (overrides the configured one)
    #[arg(short, long)]
    page: Option<usize>,

    /// Print the result instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Skip calendar validation of the receipt date
    #[arg(long)]
    no_date_validation: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Extracting receipt data...");

    let page = args.page.unwrap_or(config.document.page);
    let parser = PatternReceiptParser::new().with_date_validation(!args.no_date_validation);
    let result = process_file(&args.input, &parser, page);

    pb.finish_and_clear();
    let result = result?;

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if args.stdout {
        let output = format_record(&result.record, args.format, config.output.indent)?;
        println!("{}", output);
    } else {
        let output_path = match &args.output {
            Some(path) => {
                let output = format_record(&result.record, args.format, config.output.indent)?;
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, output)?;
                path.clone()
            }
            None => {
                let output_config =
                    output_config_for(&config.output, args.output_dir.as_ref(), args.format);
                write_output(&result.record, args.format, &output_config)?
            }
        };
        println!(
            "{} {} file created ({})",
            style("✓").green(),
            args.format.extension().to_uppercase(),
            output_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load one OCR document and extract its receipt.
pub fn process_file(
    path: &Path,
    parser: &PatternReceiptParser,
    page: usize,
) -> anyhow::Result<ExtractionResult> {
    let text = load_receipt_text(path, page)
        .with_context(|| format!("Failed to load receipt {}", path.display()))?;

    if text.trim().is_empty() {
        anyhow::bail!("No text in receipt {}", path.display());
    }

    parser
        .parse(&text)
        .with_context(|| format!("Failed to extract receipt {}", path.display()))
}

/// Write a record into the output directory under its derived file name.
pub fn write_output(
    record: &ReceiptRecord,
    format: OutputFormat,
    output_config: &OutputConfig,
) -> anyhow::Result<PathBuf> {
    if matches!(format, OutputFormat::Json) {
        return Ok(write_record(record, output_config)?);
    }

    fs::create_dir_all(&output_config.directory)?;
    let path = output_config
        .directory
        .join(output_file_name(record, output_config));
    fs::write(&path, format_record(record, format, output_config.indent)?)?;
    debug!("Wrote receipt to {}", path.display());
    Ok(path)
}

/// Output settings with the directory override and format extension applied.
pub fn output_config_for(
    base: &OutputConfig,
    output_dir: Option<&PathBuf>,
    format: OutputFormat,
) -> OutputConfig {
    let mut output = base.clone();
    if let Some(dir) = output_dir {
        output.directory = dir.clone();
    }
    if !matches!(format, OutputFormat::Json) {
        output.extension = format.extension().to_string();
    }
    output
}

pub fn format_record(
    record: &ReceiptRecord,
    format: OutputFormat,
    indent: usize,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(to_json(record, indent)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ReceiptRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "store_address",
        "invoice_number",
        "subtotal",
        "total",
        "sku",
        "description",
        "item_total",
        "tax_code",
    ])?;

    let subtotal = record.subtotal.to_string();
    let total = record.total.to_string();

    // One row per item; receipts without items still get a row
    if record.line_items.is_empty() {
        wtr.write_record([
            record.date.as_str(),
            record.store_address.as_str(),
            record.invoice_number.as_str(),
            subtotal.as_str(),
            total.as_str(),
            "",
            "",
            "",
            "",
        ])?;
    }

    for item in &record.line_items {
        let sku = item.sku.to_string();
        let item_total = item.total.to_string();
        wtr.write_record([
            record.date.as_str(),
            record.store_address.as_str(),
            record.invoice_number.as_str(),
            subtotal.as_str(),
            total.as_str(),
            sku.as_str(),
            item.description.as_str(),
            item_total.as_str(),
            item.tax_code.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ReceiptRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Receipt: {}\n", record.invoice_number));
    output.push_str(&format!("Date: {}\n", record.date));
    output.push('\n');

    output.push_str("Store:\n");
    for line in record.store_address.lines() {
        output.push_str(&format!("  {}\n", line));
    }
    output.push('\n');

    output.push_str("Items:\n");
    for item in &record.line_items {
        output.push_str(&format!(
            "  {:>13}  {:<30} {:>10} {}\n",
            item.sku, item.description, item.total, item.tax_code
        ));
    }
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Subtotal: {}\n", record.subtotal));
    if record.discount() != 0 {
        output.push_str(&format!("  Discount: {}\n", record.discount()));
    }
    output.push_str(&format!("  Total:    {}\n", record.total));

    output
}
