//! cellfetch demo host
//!
//! A stand-in for the spreadsheet host: it owns the engine lifecycle,
//! registers the function surface, and dispatches calls by symbolic name
//! exactly as a cell formula would, including draining the completion
//! queue for asynchronous performs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use cellfetch_engine::{functions, Engine, EngineConfig};
use cellfetch_sdk::{CallResult, CellValue, Completion, CompletionQueue, HostFunctionRegistry};

#[derive(Parser)]
#[command(name = "cellfetch")]
#[command(about = "HTTP transfer functions for spreadsheet hosts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL synchronously and print the response body
    Get {
        /// URL to fetch
        url: String,
        /// Request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Extra header ("Name: value"), repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },

    /// Fetch a URL on a worker thread and wait on the completion queue
    GetAsync {
        /// URL to fetch
        url: String,
        /// How long to wait for the completion, in milliseconds
        #[arg(long, default_value_t = 60_000)]
        wait_ms: u64,
    },

    /// Print transfer engine version info
    Version,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let engine = Engine::start(EngineConfig::default());
    let completions = Arc::new(CompletionQueue::new());
    let mut registry = HostFunctionRegistry::new();
    functions::register_all(&mut registry, engine.clone(), completions.clone());

    let result = run(&cli.command, &registry, &completions);
    engine.stop();
    result
}

/// Dispatch a named function the way a host formula would, converting an
/// error result into a process-level failure.
fn call(registry: &HostFunctionRegistry, name: &str, args: &[CellValue]) -> Result<CellValue> {
    match registry.call(name, args) {
        CallResult::Value(v) => Ok(v),
        CallResult::Error(msg) => bail!(msg),
    }
}

fn run(
    command: &Commands,
    registry: &HostFunctionRegistry,
    completions: &CompletionQueue,
) -> Result<()> {
    match command {
        Commands::Get {
            url,
            timeout_ms,
            headers,
        } => {
            let session = call(registry, "fetch.sessionCreate", &[CellValue::text(url)])?;
            if let Some(ms) = timeout_ms {
                call(
                    registry,
                    "fetch.sessionSetOption",
                    &[
                        session.clone(),
                        CellValue::text("timeout_ms"),
                        CellValue::text(ms.to_string()),
                    ],
                )?;
            }
            for header in headers {
                call(
                    registry,
                    "fetch.sessionSetOption",
                    &[
                        session.clone(),
                        CellValue::text("header"),
                        CellValue::text(header),
                    ],
                )?;
            }

            let body = call(registry, "fetch.sessionPerform", &[session.clone()])?;
            if let Some(text) = body.as_text() {
                print!("{}", text);
            }
            call(registry, "fetch.sessionRelease", &[session])?;
            Ok(())
        }

        Commands::GetAsync { url, wait_ms } => {
            let session = call(registry, "fetch.sessionCreate", &[CellValue::text(url)])?;
            let text = call(registry, "text.create", &[CellValue::text("")])?;

            call(
                registry,
                "fetch.sessionPerformAsync",
                &[session.clone(), text.clone()],
            )?;

            // The submitting thread stays free; here we simply wait for
            // the single completion like a host's dispatch loop would.
            match completions.next_timeout(Duration::from_millis(*wait_ms)) {
                Some(Completion::Done(handle)) => {
                    let body = call(
                        registry,
                        "text.substr",
                        &[
                            CellValue::handle(handle),
                            CellValue::number(0.0),
                            CellValue::number(0.0),
                        ],
                    )?;
                    if let Some(s) = body.as_text() {
                        print!("{}", s);
                    }
                }
                Some(Completion::Failed(msg)) => bail!("async transfer failed: {}", msg),
                None => bail!("timed out waiting for completion after {} ms", wait_ms),
            }

            call(registry, "text.release", &[text])?;
            call(registry, "fetch.sessionRelease", &[session])?;
            Ok(())
        }

        Commands::Version => {
            let rows = call(registry, "fetch.versionInfo", &[])?;
            if let Some(text) = rows.as_text() {
                let mut lines = text.lines();
                while let (Some(key), Some(value)) = (lines.next(), lines.next()) {
                    println!("{:<12} {}", key, value);
                }
            }
            Ok(())
        }
    }
}
