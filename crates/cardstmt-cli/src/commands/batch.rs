//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, warn};

use cardstmt_core::{
    decoder_for_path, ExtractionResult, StatementConfig, StatementExtractor, StatementParser,
};

use super::process::{csv_header, csv_row, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (json or csv)
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Fail files whose issuer is not in the registry
    #[arg(long)]
    strict: bool,
}

/// Result of processing a single file.
#[derive(Serialize)]
struct FileOutcome {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if args.format == OutputFormat::Text {
        anyhow::bail!("Batch output supports json and csv formats only");
    }

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.inputs.join(" "));
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = StatementExtractor::new(&config)?
        .with_required_issuer(config.extraction.require_known_issuer || args.strict);
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let file = path.display().to_string();

        match process_single_file(&path, &extractor, &config) {
            Ok(result) => outcomes.push(FileOutcome {
                file,
                result: Some(result),
                error: None,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", file, error_msg);
                    outcomes.push(FileOutcome {
                        file,
                        result: None,
                        error: Some(error_msg),
                    });
                } else {
                    pb.finish_and_clear();
                    error!("Failed to process {}: {}", file, error_msg);
                    anyhow::bail!("Processing failed for {}: {}", file, error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let output = match args.format {
        OutputFormat::Csv => format_csv(&outcomes)?,
        _ => serde_json::to_string_pretty(&outcomes)?,
    };

    match &args.output {
        Some(path) => fs::write(path, output)?,
        None => println!("{}", output),
    }

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    eprintln!(
        "{} Processed {} files in {:?} ({} successful, {} failed)",
        style("✓").green(),
        outcomes.len(),
        start.elapsed(),
        style(outcomes.len() - failed).green(),
        style(failed).red()
    );

    Ok(())
}

/// Expand glob patterns; plain paths that exist are kept as given.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        for entry in glob(input)? {
            match entry {
                Ok(p) if p.is_file() => files.push(p),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }
    }

    Ok(files)
}

fn process_single_file(
    path: &Path,
    extractor: &StatementExtractor,
    config: &StatementConfig,
) -> anyhow::Result<ExtractionResult> {
    let decoder = decoder_for_path(path, &config.decode)?;
    let data = fs::read(path)?;
    let text = decoder.decode(&data)?;
    Ok(extractor.parse(&text)?)
}

fn format_csv(outcomes: &[FileOutcome]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let Some(first) = outcomes.iter().find_map(|o| o.result.as_ref()) else {
        wtr.write_record(["file", "error"])?;
        for outcome in outcomes {
            wtr.write_record([outcome.file.as_str(), outcome.error.as_deref().unwrap_or("")])?;
        }
        return Ok(String::from_utf8(wtr.into_inner()?)?);
    };

    let mut header = vec!["file".to_string()];
    header.extend(csv_header(first));
    header.push("error".to_string());
    wtr.write_record(&header)?;

    for outcome in outcomes {
        let mut row = vec![outcome.file.clone()];
        match &outcome.result {
            Some(result) => {
                row.extend(csv_row(result));
                row.push(String::new());
            }
            None => {
                row.extend(std::iter::repeat(String::new()).take(header.len() - 2));
                row.push(outcome.error.clone().unwrap_or_default());
            }
        }
        wtr.write_record(&row)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}
