//! Package creation
//!
//! Runs `nuget pack` on a merged manifest:
//!
//! ```text
//! nuget pack <manifest> -OutputDirectory <out> -BasePath <base>
//!       -NoPackageAnalysis -NonInteractive -Verbosity Detailed
//! ```
//!
//! The tool runs inside the output directory, which is created first if
//! needed. Paths are made absolute so that relative arguments still resolve
//! after the change of directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Result;
use crate::tool::{run_tool, Operation, ToolCommand, ToolOutput, ToolSettings};

/// Inputs for one `pack` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackRequest {
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
    /// Directory that `<file src>` rules are resolved against. Defaults to
    /// the manifest's directory.
    pub base_path: Option<PathBuf>,
}

impl PackRequest {
    pub fn new(manifest: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            output_dir: output_dir.into(),
            base_path: None,
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// The effective base path.
    pub fn base_path(&self) -> PathBuf {
        self.base_path.clone().unwrap_or_else(|| {
            self.manifest
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Build the tool invocation for this request.
    pub fn command(&self, program: &Path) -> Result<ToolCommand> {
        let manifest = std::path::absolute(&self.manifest)?;
        let output_dir = std::path::absolute(&self.output_dir)?;
        let base_path = std::path::absolute(self.base_path())?;

        Ok(ToolCommand::new(program)
            .arg("pack")
            .arg(manifest.to_string_lossy())
            .arg("-OutputDirectory")
            .arg(output_dir.to_string_lossy())
            .arg("-BasePath")
            .arg(base_path.to_string_lossy())
            .arg("-NoPackageAnalysis")
            .arg("-NonInteractive")
            .arg("-Verbosity")
            .arg("Detailed")
            .current_dir(output_dir))
    }
}

/// Create the package described by `request`.
pub fn build_package(request: &PackRequest, settings: &ToolSettings) -> Result<ToolOutput> {
    if !request.output_dir.is_dir() {
        debug!("Creating output directory {}", request.output_dir.display());
        fs::create_dir_all(&request.output_dir)?;
    }

    let command = request.command(&settings.program)?;
    info!("Creating NuGet package from {}", request.manifest.display());
    run_tool(&command, settings.timeout)?.evaluate(
        settings.failure_policy,
        Operation::Pack,
        settings.timeout,
    )
}
