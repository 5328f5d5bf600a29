//! Process command - extract data from a single statement file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cardstmt_core::models::config::fields;
use cardstmt_core::{decoder_for_path, ExtractionResult, StatementExtractor, StatementParser};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Fail when the issuer is not in the registry
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
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

    pb.set_message("Decoding document...");
    let decoder = decoder_for_path(&args.input, &config.decode)?;
    let data = fs::read(&args.input)?;
    let text = decoder.decode(&data).map_err(|e| {
        pb.finish_and_clear();
        anyhow::anyhow!(
            "Failed to parse {}: {}. It may be corrupted or protected.",
            args.input.display(),
            e
        )
    })?;

    pb.set_message("Extracting fields...");
    let extractor = StatementExtractor::new(&config)?
        .with_required_issuer(config.extraction.require_known_issuer || args.strict);
    let result = extractor.parse(&text);
    pb.finish_and_clear();
    let result = result?;

    let output = format_result(&result, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a result in the requested format.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// CSV header for a result: issuer, asset, every field, confidence.
pub fn csv_header(result: &ExtractionResult) -> Vec<String> {
    let mut header = vec!["issuer".to_string(), "assetRef".to_string()];
    header.extend(result.fields.iter().map(|f| f.name.clone()));
    header.push("confidence".to_string());
    header
}

/// CSV row matching [`csv_header`].
pub fn csv_row(result: &ExtractionResult) -> Vec<String> {
    let mut row = vec![result.issuer.name.clone(), result.issuer.asset_ref.clone()];
    row.extend(result.fields.iter().map(|f| result.display(&f.name).to_string()));
    row.push(result.confidence());
    row
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(csv_header(result))?;
    wtr.write_record(csv_row(result))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn field_label(name: &str) -> &str {
    match name {
        fields::TOTAL_DUE => "Total Amount Due",
        fields::MINIMUM_DUE => "Minimum Amount Due",
        fields::DUE_DATE => "Payment Due Date",
        fields::LAST_4_DIGITS => "Card Last 4 Digits",
        fields::STATEMENT_PERIOD => "Statement Period",
        other => other,
    }
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Issuer: {}\n", result.issuer.name));
    output.push_str(&format!("Logo: {}\n", result.issuer.asset_ref));
    output.push('\n');

    for field in &result.fields {
        output.push_str(&format!(
            "{}: {}\n",
            field_label(&field.name),
            result.display(&field.name)
        ));
    }

    output.push('\n');
    output.push_str(&format!("Confidence: {}\n", result.confidence()));

    output
}
