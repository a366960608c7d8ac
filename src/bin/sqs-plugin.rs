//! CLI binary for the sqs-jobs-plugin crate.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sqs_plugin::{
    ConfigError, Configurer, EnvironmentDetector, JsonConfig, Pipeline, DEFAULT_BASE_URL,
    PROBE_TIMEOUT,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqs-plugin")]
#[command(author, version, about = "Inspect the SQS jobs plugin environment")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether this process runs inside AWS
    Detect {
        /// Metadata service base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Timeout for each probe in milliseconds
        #[arg(long, default_value_t = PROBE_TIMEOUT.as_millis() as u64)]
        timeout_ms: u64,
    },

    /// Show a pipeline section from a JSON config file
    Pipeline {
        /// Config section holding the pipeline, e.g. `jobs.pipelines.test-1`
        key: String,

        /// Path to the JSON config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Client(#[from] reqwest::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Detect {
            base_url,
            timeout_ms,
        } => {
            let detector =
                EnvironmentDetector::with_options(&base_url, Duration::from_millis(timeout_ms))?;
            println!("{}", detector.detect().await);
            Ok(())
        }

        Commands::Pipeline { key, config } => {
            let config = JsonConfig::from_path(config)?;
            let pipeline: Pipeline = serde_json::from_value(config.unmarshal_key(&key)?)?;
            println!("name:     {}", pipeline.name());
            println!("driver:   {}", pipeline.driver());
            println!("priority: {}", pipeline.priority());
            println!("{}", serde_json::to_string_pretty(&pipeline)?);
            Ok(())
        }
    }
}
