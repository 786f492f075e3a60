//! bootstrap — the executable the platform starts for a custom runtime.
//!
//! Reads the Runtime API address from the environment, sets up logging,
//! and runs the invocation loop with one of the built-in handlers until a
//! fatal failure.
//!
//! # Usage
//!
//! ```text
//! AWS_LAMBDA_RUNTIME_API=127.0.0.1:9001 bootstrap --handler echo --log-format json
//! ```
//!
//! Exit status 2 means the environment was unusable; 1 means the loop hit
//! a fatal control-plane failure.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use byor_client::RuntimeApiClient;
use byor_core::RuntimeConfig;
use byor_runtime::handler::{ack_handler, echo_handler};
use byor_runtime::{Handler, Runtime};

const DEFAULT_FILTER: &str = "info,byor=debug";

/// Exit status when the environment does not describe a Runtime API.
const EXIT_CONFIG: u8 = 2;
/// Exit status after a fatal control-plane failure.
const EXIT_FATAL: u8 = 1;

#[derive(Parser)]
#[command(name = "bootstrap", about = "Custom function runtime", version)]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Built-in handler to run.
    #[arg(long, value_enum, default_value = "echo")]
    handler: HandlerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HandlerKind {
    /// Echo the event back as a 200 body.
    Echo,
    /// Accept every event without a value.
    Ack,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}; this binary must run inside the function platform");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    info!(api = %config.base_url(), handler = ?cli.handler, "runtime starting");

    let client = RuntimeApiClient::new(config);
    match cli.handler {
        HandlerKind::Echo => serve(client, echo_handler()).await,
        HandlerKind::Ack => serve(client, ack_handler()).await,
    }
}

async fn serve<H: Handler>(client: RuntimeApiClient, handler: H) -> ExitCode {
    let runtime = Runtime::new(client, handler);
    let err = runtime.run().await;
    error!(error = %err, "runtime stopped");
    ExitCode::from(EXIT_FATAL)
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
