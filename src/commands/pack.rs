//! # Pack Command Implementation
//!
//! This module implements the `pack` subcommand, which runs `nuget pack` on
//! a manifest and reports the result. The tool's error output, exit code and
//! running time are judged by the configured failure policy.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use nuspec_pack::output::{OutputConfig, Status};
use nuspec_pack::pack::{build_package, PackRequest};
use nuspec_pack::suggestions;

use super::ToolArgs;

/// Create a package from a .nuspec manifest
#[derive(Args, Debug)]
pub struct PackArgs {
    /// The .nuspec manifest to pack
    #[arg(long, value_name = "FILE")]
    pub nuspec: PathBuf,

    /// Directory the package is written to; created if missing
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,

    /// Directory that file rules are resolved against [default: the manifest's directory]
    #[arg(long, value_name = "DIR")]
    pub base_path: Option<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `pack` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
/// * `config_path` - The value of the global --config flag
pub fn execute(args: PackArgs, color_flag: &str, config_path: Option<&Path>) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag).with_quiet(args.quiet);

    if !args.nuspec.is_file() {
        return Err(suggestions::manifest_not_found(&args.nuspec));
    }

    let config = super::load_config(config_path)?;
    let settings = args.tool.settings(&config.tool);
    let mut request = PackRequest::new(&args.nuspec, &args.output);
    request.base_path = args.base_path;

    out.status(
        Status::Working,
        format!("Creating NuGet package from {}", args.nuspec.display()),
    );
    build_package(&request, &settings)?;

    out.status(
        Status::Success,
        format!("Package written to {}", args.output.display()),
    );
    Ok(())
}
