//! distill - convert a directory of transcripts into structured JSON records.

use clap::Parser;
use colored::*;
use distill_batch::{BatchRunner, BatchSummary, RateLimiter};
use distill_cli::{Cli, Result, RunConfig, Settings};
use distill_genai::GeminiClient;
use distill_schema::{translate, SchemaNode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr so stdout stays clean for the summary
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Configuration and schema problems are fatal before any file is touched
    let (config, client) = match setup(&cli) {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    let mut runner = BatchRunner::new(config.batch_config(), RateLimiter::new(config.rpm));
    match runner.run(&client).await {
        Ok(summary) => {
            print_summary(&summary);
            if !summary.is_clean() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Resolve settings, load and translate the schema, and build the client.
fn setup(cli: &Cli) -> Result<(RunConfig, GeminiClient)> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let config = RunConfig::resolve(cli, settings);

    let node = SchemaNode::from_file(&config.schema)?;
    let schema = translate(&node);
    info!("loaded response schema from {}", config.schema.display());

    let client = GeminiClient::new(&cli.api_key, &config.model, schema)?
        .with_endpoint(&config.endpoint);

    Ok((config, client))
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "{} {} completed, {} skipped, {} failed",
        "done:".green().bold(),
        summary.completed,
        summary.skipped,
        summary.failures.len()
    );
    for (path, error) in &summary.failures {
        eprintln!("  {} {}: {}", "failed".red(), path.display(), error);
    }
}
