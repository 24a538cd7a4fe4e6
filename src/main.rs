use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use order_pipeline::app::ports::RecordSource;
use order_pipeline::config::{Config, LoggingConfig};
use order_pipeline::constants::DEFAULT_CONFIG_PATH;
use order_pipeline::domain::{AnalysisSummary, RawRecord};
use order_pipeline::infra::{read_report, JsonFileSink, JsonFileSource};
use order_pipeline::logging::init_logging;
use order_pipeline::observability;
use order_pipeline::pipeline::processing::analyze::analyze;
use order_pipeline::pipeline::processing::validate::NumericPolicy;
use order_pipeline::pipeline::{process_batch, OrderPipeline, PipelineOptions};

#[derive(Parser)]
#[command(name = "order_pipeline")]
#[command(about = "Validate, clean and analyze raw e-commerce order exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Raw orders file (.json array of records)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// currency-prefix or strip-non-digits
    #[arg(long)]
    numeric_policy: Option<NumericPolicy>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read, validate, clean, analyze and export one batch of orders
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Destination for the cleaned report (.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show what a run would keep and drop, without writing anything
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Recompute the summary of an existing report
    Analyze {
        /// Report previously written by `run`
        #[arg(long)]
        report: PathBuf,
    },
}

impl InputArgs {
    fn load_config(&self) -> Result<Config> {
        Config::load_or_default(&self.config)
            .with_context(|| format!("loading configuration from {}", self.config.display()))
    }

    fn input_path(&self, config: &Config) -> PathBuf {
        self.input.clone().unwrap_or_else(|| config.paths.input.clone())
    }

    fn options(&self, config: &Config) -> PipelineOptions {
        PipelineOptions {
            numeric_policy: self
                .numeric_policy
                .unwrap_or(config.validation.numeric_policy),
        }
    }
}

fn print_summary(summary: &AnalysisSummary) -> Result<()> {
    let rendered = serde_json::to_string_pretty(summary).context("rendering summary")?;
    println!("{}", rendered);
    Ok(())
}

fn write_metrics_snapshot(config: &Config) {
    if let Some(path) = &config.metrics.snapshot_path {
        if let Err(e) = observability::write_snapshot(path) {
            warn!("Failed to write metrics snapshot: {}", e);
        }
    }
}

fn run(input: &InputArgs, output: Option<&Path>) -> Result<()> {
    let config = input.load_config()?;
    let _guard = init_logging(&config.logging);
    if let Err(e) = observability::init() {
        warn!("Metrics disabled: {}", e);
    }

    let input_path = input.input_path(&config);
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.paths.output.clone());

    let pipeline = OrderPipeline::new(
        JsonFileSource::new(&input_path),
        JsonFileSink::new(&output_path),
        input.options(&config),
    );
    let result = pipeline.run();
    write_metrics_snapshot(&config);

    let report = result.with_context(|| format!("processing {}", input_path.display()))?;

    println!("\n📊 Pipeline results (run {}):", report.run_id);
    println!("   Status: {}", report.status);
    println!("   Records read: {}", report.total_records);
    println!("   Valid: {}", report.validated_records);
    println!("   Cleaned: {}", report.transformed_records);
    println!("   Skipped: {}", report.rejections.len());
    match &report.output {
        Some(path) => println!("   Output file: {}", path),
        None => println!("   Output file: none written"),
    }
    if let Some(summary) = &report.summary {
        print_summary(summary)?;
    }
    Ok(())
}

fn check(input: &InputArgs) -> Result<()> {
    let config = input.load_config()?;
    let _guard = init_logging(&config.logging);

    let input_path = input.input_path(&config);
    let records: Vec<RawRecord> = JsonFileSource::new(&input_path)
        .read_records()
        .with_context(|| format!("reading {}", input_path.display()))?;

    let batch = process_batch(&records, &input.options(&config));

    for rejection in &batch.rejections {
        println!("{}", rejection);
    }
    for notice in &batch.notices {
        println!("{}", notice);
    }
    println!(
        "Checked {} records: {} valid, {} cleaned ({})",
        batch.total_records, batch.validated_records, batch.transformed_records, batch.status
    );
    if let Some(summary) = batch.summary() {
        print_summary(summary)?;
    }
    Ok(())
}

fn analyze_report(path: &Path) -> Result<()> {
    let _guard = init_logging(&LoggingConfig::default());

    let report = read_report(path).with_context(|| format!("reading report {}", path.display()))?;
    let summary = analyze(&report.cleaned_data);
    if summary != report.analysis_summary {
        warn!("Stored summary differs from the recomputed one");
    }
    info!("Analyzed {} orders from {}", summary.total_orders, path.display());
    print_summary(&summary)
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { input, output } => run(input, output.as_deref()),
        Commands::Check { input } => check(input),
        Commands::Analyze { report } => analyze_report(report),
    }
}
