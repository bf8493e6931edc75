//! TTL Cache CLI
//!
//! Reads and writes a file-backed TTL cache from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ttl_cache::{CacheConfig, FileStore, Lookup, SystemClock, TtlCache};

/// TTL Cache - typed time-to-live cache over a directory of entries
#[derive(Parser)]
#[command(name = "ttl_cache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding cache entries (overrides TTL_CACHE_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Entry lifetime in seconds (overrides TTL_CACHE_TTL_SECS)
    #[arg(long, global = true)]
    ttl_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a JSON value under a key
    Set {
        key: String,
        /// JSON payload; bare words are stored as strings
        value: String,
    },

    /// Print the JSON value under a key if it is still fresh
    Get { key: String },

    /// Delete one key
    Remove { key: String },

    /// Delete every entry in the cache directory
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "ttl_cache=debug"
    } else {
        "ttl_cache=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = CacheConfig::from_env();
    if let Some(dir) = cli.dir {
        config.cache_dir = dir;
    }
    if let Some(ttl_secs) = cli.ttl_secs {
        config.ttl_secs = ttl_secs;
    }
    debug!(
        "Configuration loaded: dir={}, ttl={}s",
        config.cache_dir.display(),
        config.ttl_secs
    );

    let store = FileStore::open(&config.cache_dir)
        .with_context(|| format!("opening cache directory {}", config.cache_dir.display()))?;
    let cache: TtlCache<FileStore, SystemClock> = TtlCache::with_config(store, &config);

    match cli.command {
        Commands::Set { key, value } => {
            let payload = parse_payload(&value);
            cache.set(&key, &payload);
            info!("Stored {}", key);
        }
        Commands::Get { key } => match cache.lookup::<Value>(&key) {
            Lookup::Hit(value) => {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            other => {
                eprintln!("miss: {} ({})", key, describe(&other));
                return Ok(ExitCode::from(1));
            }
        },
        Commands::Remove { key } => {
            cache.remove(&key);
            info!("Removed {}", key);
        }
        Commands::Clear => {
            cache.clear();
            info!("Cleared {}", config.cache_dir.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Parses `raw` as JSON, falling back to a JSON string.
fn parse_payload(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn describe<T>(lookup: &Lookup<T>) -> &'static str {
    match lookup {
        Lookup::Hit(_) => "hit",
        Lookup::Miss => "not cached",
        Lookup::Expired => "expired",
        Lookup::Corrupt => "unreadable",
        Lookup::Unavailable => "store unavailable",
    }
}
