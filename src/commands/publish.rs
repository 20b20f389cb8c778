//! # Publish Command Implementation
//!
//! This module implements the `publish` subcommand, which pushes the
//! package built from a manifest with `nuget push`. The package file is
//! located from the manifest's name and `<version>`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use nuspec_pack::manifest::Manifest;
use nuspec_pack::output::{OutputConfig, Status};
use nuspec_pack::publish::{package_path, publish_package, PublishRequest};
use nuspec_pack::suggestions;

use super::ToolArgs;

/// Push the package built from a .nuspec manifest to a feed
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// The .nuspec manifest the package was built from
    #[arg(long, value_name = "FILE")]
    pub nuspec: PathBuf,

    /// Directory containing the package
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,

    /// Feed to push to [default: the tool's configured default source]
    #[arg(long, value_name = "URL", env = "NUGET_SERVER")]
    pub server: Option<String>,

    /// API key for the feed
    #[arg(long, value_name = "KEY", env = "NUGET_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(flatten)]
    pub tool: ToolArgs,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `publish` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
/// * `config_path` - The value of the global --config flag
pub fn execute(args: PublishArgs, color_flag: &str, config_path: Option<&Path>) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag).with_quiet(args.quiet);

    if !args.nuspec.is_file() {
        return Err(suggestions::manifest_not_found(&args.nuspec));
    }

    let config = super::load_config(config_path)?;
    let settings = args.tool.settings(&config.tool);
    let request = PublishRequest {
        manifest: args.nuspec.clone(),
        output_dir: args.output.clone(),
        server: args.server.or(config.publish.server),
        api_key: args.api_key.or(config.publish.api_key),
    };

    let package = package_path(&Manifest::open(&args.nuspec)?, &args.output)?;
    out.status(
        Status::Working,
        format!("Publishing {}", package.display()),
    );
    publish_package(&request, &settings)?;

    let destination = request
        .server
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("the default source");
    out.status(
        Status::Success,
        format!("Published {} to {}", package.display(), destination),
    );
    Ok(())
}
