//! # Merge Command Implementation
//!
//! This module implements the `merge` subcommand, which folds the results
//! of a build into a `.nuspec` manifest in place.
//!
//! ## Functionality
//!
//! - **Metadata**: Sets `title` and `version`, and fills blank `summary`,
//!   `description`, `authors` and `owners`.
//! - **Dependencies**: Adds or updates `<dependency>` entries from
//!   `packages.config` and SDK-style package references.
//! - **Framework assemblies**: Declares `System.*` project references.
//! - **Files**: Appends a `<file>` rule for the primary output assembly.
//!
//! Version resources are not read from the assembly itself; they come from
//! `--assembly-info` and the individual `--product-*`/`--file-*` flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use nuspec_pack::assembly::AssemblyInfo;
use nuspec_pack::config::MergeOptions;
use nuspec_pack::identity;
use nuspec_pack::merge::{merge_manifest, MergeReport, MergeRequest, UpsertCounts};
use nuspec_pack::output::{emoji, OutputConfig, Status};
use nuspec_pack::suggestions;
use nuspec_pack::version::{VersionPolicy, VersionSource};

/// Merge build information into a .nuspec manifest
#[derive(Args, Debug, Default)]
pub struct MergeArgs {
    /// The .nuspec manifest to update in place
    #[arg(long, value_name = "FILE")]
    pub nuspec: PathBuf,

    /// The primary output assembly of the build
    #[arg(long, value_name = "FILE")]
    pub assembly: PathBuf,

    /// The project file that produced the assembly
    #[arg(long, value_name = "FILE")]
    pub project: PathBuf,

    /// Dependency config [default: packages.config next to the project]
    #[arg(long, value_name = "FILE")]
    pub packages_config: Option<PathBuf>,

    /// YAML file with the assembly's version resources
    #[arg(long, value_name = "FILE")]
    pub assembly_info: Option<PathBuf>,

    /// Assembly product name
    #[arg(long, value_name = "NAME")]
    pub product_name: Option<String>,

    /// Assembly product version, e.g. 1.2.3.4
    #[arg(long, value_name = "VERSION")]
    pub product_version: Option<String>,

    /// Assembly file version, e.g. 1.2.3.4
    #[arg(long, value_name = "VERSION")]
    pub file_version: Option<String>,

    /// Assembly comments, used for an empty <summary>
    #[arg(long, value_name = "TEXT")]
    pub comments: Option<String>,

    /// Assembly file description, used for an empty <description>
    #[arg(long, value_name = "TEXT")]
    pub file_description: Option<String>,

    /// Explicit package version, bypassing the assembly version
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// How the assembly version becomes the package version [default: major-minor-build]
    #[arg(long, value_enum, value_name = "POLICY")]
    pub version_policy: Option<VersionPolicy>,

    /// Which assembly version to use [default: product]
    #[arg(long, value_enum, value_name = "SOURCE")]
    pub version_source: Option<VersionSource>,

    /// Semicolon-separated patterns excluded from the file rule
    #[arg(long, value_name = "PATTERNS")]
    pub file_exclusion: Option<String>,

    /// Semicolon-separated package ids never added as dependencies
    #[arg(long, value_name = "PATTERNS")]
    pub package_exclusion: Option<String>,

    /// MSBuild target framework version, e.g. v4.5
    #[arg(long, value_name = "VERSION")]
    pub target_framework_version: Option<String>,

    /// MSBuild target framework profile, e.g. Client
    #[arg(long, value_name = "PROFILE")]
    pub target_framework_profile: Option<String>,

    /// Target `lib` instead of `lib\<framework>`
    #[arg(long)]
    pub no_framework_folder: bool,

    /// Use the login name instead of the display name for authors/owners
    #[arg(long)]
    pub no_display_name: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl MergeArgs {
    /// Layer the flags over the configuration file's merge options.
    fn merge_options(&self, mut options: MergeOptions) -> MergeOptions {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        if self.version.is_some() {
            options.version = self.version.clone();
        }
        set(&mut options.version_policy, &self.version_policy);
        set(&mut options.version_source, &self.version_source);
        set(&mut options.file_exclusion, &self.file_exclusion);
        set(&mut options.package_exclusion, &self.package_exclusion);
        if self.target_framework_version.is_some() {
            options.target_framework_version = self.target_framework_version.clone();
        }
        if self.target_framework_profile.is_some() {
            options.target_framework_profile = self.target_framework_profile.clone();
        }
        if self.no_framework_folder {
            options.qualify_target_framework = false;
        }
        if self.no_display_name {
            options.use_display_name = false;
        }
        options
    }

    /// Assembly information from the file, overridden by individual flags.
    fn assembly_info(&self) -> Result<AssemblyInfo> {
        let base = match &self.assembly_info {
            Some(path) => AssemblyInfo::from_file(path)
                .with_context(|| format!("Failed to read assembly info {}", path.display()))?,
            None => AssemblyInfo::default(),
        };
        Ok(base.overlay(AssemblyInfo {
            product_name: self.product_name.clone(),
            product_version: self.product_version.clone(),
            file_version: self.file_version.clone(),
            comments: self.comments.clone(),
            file_description: self.file_description.clone(),
        }))
    }
}

fn counts(counts: &UpsertCounts) -> String {
    format!(
        "{} added, {} updated, {} unchanged",
        counts.inserted, counts.updated, counts.unchanged
    )
}

fn print_report(out: &OutputConfig, manifest: &Path, report: &MergeReport) {
    out.status(
        Status::Success,
        format!("Merged {} (version {})", manifest.display(), report.version),
    );
    if report.inline_options > 0 {
        out.status(
            Status::Detail,
            format!("Inline options applied: {}", report.inline_options),
        );
    }
    if !report.filled_fields.is_empty() {
        out.status(
            Status::Detail,
            format!("Filled: {}", report.filled_fields.join(", ")),
        );
    }
    out.status(
        Status::Detail,
        format!(
            "Dependencies: {}, {} skipped",
            counts(&report.dependencies),
            report.dependencies.skipped
        ),
    );
    out.status(
        Status::Detail,
        format!("Framework assemblies: {}", counts(&report.framework_assemblies)),
    );
    out.status(
        Status::Detail,
        format!(
            "File rule: {} {} {}",
            report.file_rule.src,
            emoji(out, "→", "->"),
            report.file_rule.target
        ),
    );
}

/// Execute the `merge` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
/// * `config_path` - The value of the global --config flag
pub fn execute(args: MergeArgs, color_flag: &str, config_path: Option<&Path>) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag).with_quiet(args.quiet);

    if !args.nuspec.is_file() {
        return Err(suggestions::manifest_not_found(&args.nuspec));
    }
    if !args.project.is_file() {
        return Err(suggestions::input_not_found(
            "Project file",
            &args.project,
            "--project",
        ));
    }

    let config = super::load_config(config_path)?;
    let request = MergeRequest {
        manifest: args.nuspec.clone(),
        assembly: args.assembly.clone(),
        project: args.project.clone(),
        packages_config: args.packages_config.clone(),
        options: args.merge_options(config.merge),
    };
    let info = args.assembly_info()?;

    out.status(
        Status::Working,
        format!("Merging build information into {}", args.nuspec.display()),
    );
    let users = identity::platform_lookup();
    let report = merge_manifest(&request, &info, users.as_ref())
        .with_context(|| format!("Failed to merge {}", args.nuspec.display()))?;

    print_report(&out, &args.nuspec, &report);
    Ok(())
}
