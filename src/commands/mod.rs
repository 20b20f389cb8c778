//! # CLI Command Implementations
//!
//! Each subcommand of `nuspec-pack` lives in its own file. A command module
//! contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args`, layers them over the
//!   configuration file and calls into the `nuspec_pack` library.

pub mod completions;
pub mod merge;
pub mod pack;
pub mod publish;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use log::debug;

use nuspec_pack::config::{self, Config, ToolConfig};
use nuspec_pack::defaults;
use nuspec_pack::tool::{FailurePolicy, ToolSettings};

/// Options shared by the commands that run the packaging tool.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to nuget.exe or a compatible packaging tool
    #[arg(long, value_name = "PATH", env = "NUGET_PATH")]
    pub tool: Option<PathBuf>,

    /// Seconds to wait for the tool [default: 30]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// What makes a tool run fail [default: stderr]
    #[arg(long, value_enum, value_name = "POLICY")]
    pub failure_policy: Option<FailurePolicy>,
}

impl ToolArgs {
    /// Layer the flags over the configuration file's `tool` section.
    pub fn settings(&self, config: &ToolConfig) -> ToolSettings {
        ToolSettings {
            program: self
                .tool
                .clone()
                .or_else(|| config.path.clone())
                .unwrap_or_else(|| PathBuf::from(defaults::TOOL)),
            timeout: Duration::from_secs(
                self.timeout
                    .or(config.timeout)
                    .unwrap_or(defaults::TOOL_TIMEOUT_SECS),
            ),
            failure_policy: self
                .failure_policy
                .or(config.failure_policy)
                .unwrap_or_default(),
        }
    }
}

/// Load the configuration file for a command.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let (config, source) = config::load(config_path, &env::current_dir()?)?;
    match source {
        Some(path) => debug!("Using configuration from {}", path.display()),
        None => debug!("No configuration file, using defaults"),
    }
    Ok(config)
}
