use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{error, info};

use rejected_article_tracker::config::Config;
use rejected_article_tracker::pipeline::FilterPipeline;
use rejected_article_tracker::{logging, metrics, RawRecord};

#[derive(Parser)]
#[command(name = "rejected-article-tracker")]
#[command(about = "Filter a manuscript-tracking export down to rejected articles")]
#[command(version = "0.1.0")]
struct Cli {
    /// JSON array of raw export rows (stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Where to write the JSON article records (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// TOML configuration file (defaults to ./tracker.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write Prometheus exposition text for the run to this file
    #[arg(long)]
    metrics_file: Option<PathBuf>,
    /// Print the per-stage processing report to stderr
    #[arg(long)]
    report: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<RawRecord>> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Input is not a JSON array of records")
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let _log_guard = logging::init_logging(&config.logging)?;
    let metrics_handle = cli.metrics_file.as_ref().and_then(|_| metrics::init_metrics());

    let raw_records = read_input(cli.input.as_ref())?;
    info!(records = raw_records.len(), "Loaded export rows");

    let pipeline = FilterPipeline::with_config(config.pipeline);
    let outcome = match pipeline.process_with_report(raw_records) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Filter pipeline failed: {}", e);
            return Err(e.into());
        }
    };

    let json = serde_json::to_string_pretty(&outcome.records)?;
    match &cli.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?,
        None => writeln!(io::stdout(), "{}", json)?,
    }

    if cli.report {
        eprintln!("{}", serde_json::to_string_pretty(&outcome.report)?);
    }

    if let (Some(path), Some(handle)) = (&cli.metrics_file, metrics_handle) {
        fs::write(path, handle.render())
            .with_context(|| format!("Failed to write metrics file '{}'", path.display()))?;
    }

    info!(records = outcome.records.len(), "Wrote article records");
    Ok(())
}
