mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tsefeed_core::EnvelopeMeta;
use uuid::Uuid;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides the default.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tsefeed=info,tsefeed_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    let result = commands::run(&cli).await?;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::debug!(request_id = request_id.as_str(), latency_ms, "command finished");

    if let Some(path) = &cli.output {
        output::export(&result, path)?;
    }
    let meta = EnvelopeMeta::new(request_id, result.source_chain.clone(), latency_ms);
    output::render(&result, cli.format, cli.pretty, meta)
}
