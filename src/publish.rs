//! Package publication
//!
//! Pushes the package produced by [`crate::pack`] to a feed:
//!
//! ```text
//! nuget push <out>/<stem>.<version>.nupkg [-ApiKey <key>] [-Source <server>] -NonInteractive
//! ```
//!
//! The package file name is derived from the manifest: its file stem and the
//! `<version>` it declares. The API key never appears in log output.

use std::path::{Path, PathBuf};

use log::info;

use crate::defaults;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::tool::{run_tool, Operation, ToolCommand, ToolOutput, ToolSettings};

/// Inputs for one `push` run.
#[derive(Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
    pub server: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishRequest")
            .field("manifest", &self.manifest)
            .field("output_dir", &self.output_dir)
            .field("server", &self.server)
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .finish()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Where the package built from `manifest` ends up inside `output_dir`.
pub fn package_path(manifest: &Manifest, output_dir: &Path) -> Result<PathBuf> {
    let version = manifest.version().ok_or_else(|| Error::ManifestStructure {
        element: "version".to_string(),
        path: manifest.path().to_path_buf(),
    })?;
    let stem = manifest
        .path()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(output_dir.join(format!(
        "{}.{}.{}",
        stem,
        version,
        defaults::PACKAGE_EXTENSION
    )))
}

impl PublishRequest {
    pub fn new(manifest: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            output_dir: output_dir.into(),
            server: None,
            api_key: None,
        }
    }

    /// Build the tool invocation for the package at `package`.
    pub fn command(&self, program: &Path, package: &Path) -> ToolCommand {
        let mut command = ToolCommand::new(program)
            .arg("push")
            .arg(package.to_string_lossy());
        if let Some(key) = non_blank(&self.api_key) {
            command = command.arg("-ApiKey").secret_arg(key);
        }
        if let Some(server) = non_blank(&self.server) {
            command = command.arg("-Source").arg(server);
        }
        command.arg("-NonInteractive")
    }
}

/// Push the package built from `request.manifest`.
pub fn publish_package(request: &PublishRequest, settings: &ToolSettings) -> Result<ToolOutput> {
    let manifest = Manifest::open(&request.manifest)?;
    let package = package_path(&manifest, &request.output_dir)?;
    info!("Publishing NuGet package {}", package.display());

    let command = request.command(&settings.program, &package);
    run_tool(&command, settings.timeout)?.evaluate(
        settings.failure_policy,
        Operation::Publish,
        settings.timeout,
    )
}
