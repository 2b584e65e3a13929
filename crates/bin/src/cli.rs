//! CLI argument definitions for the ArborDB binary.

use std::path::PathBuf;

use arbordb::core::YieldPolicy;
use arbordb::kvdb::DbConfig;
use clap::{Parser, Subcommand};

/// ArborDB content-addressed value store
#[derive(Parser, Debug)]
#[command(name = "arbordb")]
#[command(about = "ArborDB: content-addressed persistent values")]
#[command(version)]
pub struct Cli {
    /// Print JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the identifier of a JSON document
    Hash(HashArgs),
    /// Apply edits in one transaction and print the committed root
    Kv(KvArgs),
}

/// Arguments for the hash command
#[derive(clap::Args, Debug)]
pub struct HashArgs {
    /// Resolve the canonical identifier instead of the structural hash
    #[arg(long)]
    pub canonical: bool,

    /// JSON file to read, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,
}

/// Arguments for the kv command
#[derive(clap::Args, Debug)]
pub struct KvArgs {
    /// Bind KEY to VALUE (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Unbind KEY after all sets are applied (repeatable)
    #[arg(long = "delete", value_name = "KEY")]
    pub delete: Vec<String>,

    /// Print the committed key/value pairs
    #[arg(long)]
    pub dump: bool,

    #[command(flatten)]
    pub db_config: DbConfigArgs,
}

/// Database tuning shared by commands that open a database
#[derive(clap::Args, Debug, Clone)]
pub struct DbConfigArgs {
    /// JSON configuration file; a missing file means defaults
    #[arg(long, env = "ARBORDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Check for cancellation at most once per interval
    #[arg(long, env = "ARBORDB_YIELD_INTERVAL_MS")]
    pub yield_interval_ms: Option<u64>,

    /// Flatten open transactions after this many edits
    #[arg(long, env = "ARBORDB_COMPACT_THRESHOLD")]
    pub compact_threshold: Option<usize>,
}

impl DbConfigArgs {
    /// The configuration file (if any) with command-line overrides applied.
    pub fn load(&self) -> arbordb::Result<DbConfig> {
        let mut config = match &self.config {
            Some(path) => DbConfig::load_from_file(path)?,
            None => DbConfig::default(),
        };
        if let Some(interval_ms) = self.yield_interval_ms {
            config.yield_policy = YieldPolicy::Interval { interval_ms };
        }
        if self.compact_threshold.is_some() {
            config.compact_threshold = self.compact_threshold;
        }
        Ok(config)
    }
}

fn parse_assignment(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{input}'")),
    }
}
