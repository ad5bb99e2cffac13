//! # Username Registry
//!
//! Command-line front end for the username registry.
//!
//! ## Startup Sequence
//!
//! 1. Initialize tracing (`RUST_LOG`, default `info`)
//! 2. Load configuration from `UU_*` environment variables
//! 3. Open the store, optionally seeding it from `--seed-file`
//! 4. Populate the membership filter from the store
//! 5. Run the requested command
//!
//! ## Commands
//!
//! - `check <USERNAME>...` - report availability
//! - `claim <USERNAME>...` - claim usernames in order
//! - `stats` - filter and store statistics
//! - `repl` - read `check <name>` / `claim <name>` lines from stdin
//!
//! Responses are printed as one JSON object per line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uu_02_availability::events::{CheckUsernameRequest, ClaimUsernameRequest};
use uu_02_availability::{SaveOutcome, Username, UsernameRecord, UsernameStore};
use uu_runtime::{open_store, RegistryContainer, RuntimeConfig};

#[derive(Parser)]
#[command(name = "uu-runtime")]
#[command(about = "Username registry with a membership pre-filter", long_about = None)]
struct Cli {
    /// File with one pre-claimed username per line, saved before startup
    #[arg(long, global = true)]
    seed_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether usernames are available
    Check {
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Claim usernames
    Claim {
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Show filter and store statistics
    Stats,
    /// Serve check/claim commands read from stdin
    Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = RuntimeConfig::from_env();

    let store = open_store(&config).context("opening username store")?;
    if let Some(path) = &cli.seed_file {
        seed_store(store.as_ref(), path).await?;
    }

    let registry = RegistryContainer::start_with_store(&config, store)
        .await
        .context("starting username registry")?;
    info!(
        loaded = registry.bootstrap.usernames_loaded,
        pages = registry.bootstrap.pages,
        elapsed_ms = registry.bootstrap.elapsed.as_millis() as u64,
        "Registry ready"
    );

    match cli.command {
        Commands::Check { usernames } => {
            for username in usernames {
                run_check(&registry, username).await;
            }
        }
        Commands::Claim { usernames } => {
            for username in usernames {
                run_claim(&registry, username).await;
            }
        }
        Commands::Stats => print_stats(&registry).await?,
        Commands::Repl => repl(&registry).await?,
    }

    Ok(())
}

async fn seed_store(store: &dyn UsernameStore, path: &Path) -> Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;

    let mut saved = 0u64;
    for line in contents.lines() {
        let Ok(username) = Username::parse(line) else {
            continue;
        };
        if store.save(&UsernameRecord::new(username)).await? == SaveOutcome::Saved {
            saved += 1;
        }
    }

    info!(path = %path.display(), saved, "Seeded username store");
    Ok(())
}

async fn run_check(registry: &RegistryContainer, username: String) {
    let result = registry
        .handler
        .handle_check(CheckUsernameRequest::new(username.clone()))
        .await;
    let line = match result {
        Ok(response) => json!({ "username": username, "available": response.available }),
        Err(error) => json!({ "username": username, "error": error }),
    };
    println!("{line}");
}

async fn run_claim(registry: &RegistryContainer, username: String) {
    let line = match registry
        .handler
        .handle_claim(ClaimUsernameRequest::new(username.clone()))
        .await
    {
        Ok(response) => json!(response),
        Err(error) => json!({ "username": username, "error": error }),
    };
    println!("{line}");
}

async fn print_stats(registry: &RegistryContainer) -> Result<()> {
    let filter = registry.service.filter();
    let stored = registry
        .service
        .store()
        .count()
        .await
        .context("counting stored usernames")?;
    let metrics = registry.metrics.snapshot();

    let stats = json!({
        "stored_usernames": stored,
        "filter": {
            "size_bits": filter.size_bits(),
            "hash_count": filter.hash_count(),
            "insertions": filter.insertions(),
            "fill_ratio": filter.fill_ratio(),
            "estimated_fpr": filter.estimated_fpr(),
        },
        "requests": {
            "checks": metrics.checks,
            "filter_misses": metrics.filter_misses,
            "false_positives": metrics.false_positives,
            "claims": metrics.claims,
            "conflicts": metrics.conflicts,
            "store_errors": metrics.store_errors,
            "observed_fpr": registry.metrics.observed_false_positive_rate(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

async fn repl(registry: &RegistryContainer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let (command, argument) = match line.trim_start().split_once(' ') {
            Some((command, argument)) => (command, argument.to_string()),
            None => (line.trim(), String::new()),
        };

        match command {
            "check" => run_check(registry, argument).await,
            "claim" => run_claim(registry, argument).await,
            "stats" => print_stats(registry).await?,
            "" => {}
            "quit" | "exit" => break,
            other => warn!(command = other, "Unknown command; expected check, claim, stats or quit"),
        }
    }

    Ok(())
}
