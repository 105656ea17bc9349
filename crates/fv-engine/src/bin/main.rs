//! fuzzval command-line front end
//!
//! Usage:
//!   fuzzval request <file>      - Serve a JSON request (`-` reads stdin)
//!   fuzzval close <id>          - Delete a persisted processor

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fv_core::Uuid;
use fv_engine::{EngineConfig, FileStore, RequestDispatcher, WireRequest, WireResponse};

#[derive(Parser)]
#[command(name = "fuzzval", version, about = "Seeded fuzz value generation")]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding persisted processors
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a request and print the response
    Request {
        /// Request file, or `-` for stdin
        input: String,
    },
    /// Delete a persisted processor
    Close {
        /// Processor id
        id: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::debug!("Using store {}", config.store_dir.display());

    let dispatcher = RequestDispatcher::new(FileStore::from_config(&config), config);
    let response = match cli.command {
        Commands::Request { input } => {
            let request = read_request(&input)?;
            dispatcher.handle(request)?
        }
        Commands::Close { id } => {
            let id: Uuid = id
                .parse()
                .with_context(|| format!("Invalid processor id {:?}", id))?;
            dispatcher.close(id)?;
            WireResponse::Closed { id }
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    Ok(match &cli.store_dir {
        Some(dir) => config.with_store_dir(dir),
        None => config,
    })
}

fn read_request(input: &str) -> Result<WireRequest> {
    let content = if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read request from stdin")?;
        content
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read request file {}", input))?
    };

    serde_json::from_str(&content).context("Failed to parse request")
}
