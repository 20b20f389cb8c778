//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// nuspec-pack - Merge build output into NuGet manifests, then pack and publish them
#[derive(Parser, Debug)]
#[command(name = "nuspec-pack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,

    /// Configuration file (defaults to ./nuspec-pack.yaml, then the user config directory)
    #[arg(long, global = true, value_name = "FILE", env = "NUSPEC_PACK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge build information into a .nuspec manifest in place
    Merge(commands::merge::MergeArgs),

    /// Create a package from a .nuspec manifest
    Pack(commands::pack::PackArgs),

    /// Push the package built from a .nuspec manifest to a feed
    Publish(commands::publish::PublishArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let config = self.config.as_deref();

        match self.command {
            Commands::Merge(args) => commands::merge::execute(args, &self.color, config),
            Commands::Pack(args) => commands::pack::execute(args, &self.color, config),
            Commands::Publish(args) => commands::publish::execute(args, &self.color, config),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
