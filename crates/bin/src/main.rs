use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

mod commands {
    pub mod hash;
    pub mod kv;
}

use cli::{Cli, Commands};
use output::OutputFormat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arbordb=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match &cli.command {
        Commands::Hash(args) => commands::hash::run(args, format),
        Commands::Kv(args) => commands::kv::run(args, format),
    }
}
