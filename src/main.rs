//! odata - command-line client for C4C OData services
//!
//! Runs single calls or `$batch` envelopes and prints the decoded JSON.

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use odata_batch::{BatchItem, ClientConfig, ExecutionMode, ODataClient, ODataRequest, build_info};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Debug, Parser)]
#[command(name = "odata", version, long_version = LONG_VERSION, about)]
struct Cli {
    /// YAML configuration file; the ODATA_* environment is used when absent
    #[arg(short, long, global = true, env = "ODATA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured execution mode (blocking or non-blocking)
    #[arg(long, global = true)]
    mode: Option<ExecutionMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// GET one resource, e.g. `odata get AccountCollection -q top=5`
    Get {
        resource: String,
        /// Query option as name=value, without the leading `$`
        #[arg(short, long = "query", value_parser = parse_query_option)]
        query: Vec<(String, String)>,
    },
    /// Send the batch items listed in a YAML file
    Batch { file: PathBuf },
}

fn parse_query_option(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("empty option name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::from_env().context("reading ODATA_* environment")?,
    };
    if let Some(mode) = cli.mode {
        config.settings.mode = mode;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let client = ODataClient::connect(&config).context("connecting to service")?;
    info!("Connected in {} mode", client.mode());

    let output = match cli.command {
        Command::Get { resource, query } => {
            let request = query
                .into_iter()
                .fold(ODataRequest::get(resource), |request, (name, value)| {
                    request.query(name, value)
                });
            client.send_and_wait(&request)?
        }
        Command::Batch { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut items = BatchItem::list_from_yaml(&text)
                .with_context(|| format!("parsing batch items in {}", file.display()))?;
            let parts = client.send_batch_and_wait(&mut items)?;
            serde_json::to_value(parts)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let build = build_info();
    info!("odata {} ({})", build.version, build.git_hash);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
