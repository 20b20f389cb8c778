//! # Manifest Merge
//!
//! Folds build information into a `.nuspec` manifest in place. One merge
//! run:
//!
//! 1.  loads the manifest and applies any inline options it carries,
//! 2.  resolves the package version and fills metadata ([`metadata`]),
//! 3.  upserts package dependencies ([`dependencies`]),
//! 4.  upserts framework assembly references ([`references`]),
//! 5.  appends a file rule for the primary output ([`files`]),
//! 6.  writes the manifest back.
//!
//! Every input is read and every option validated before the manifest is
//! modified, and the file is written once at the end. A failing merge
//! leaves the manifest on disk untouched.

pub mod dependencies;
pub mod files;
pub mod inline;
pub mod metadata;
pub mod references;

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::assembly::VersionInfoSource;
use crate::config::MergeOptions;
use crate::defaults;
use crate::error::Result;
use crate::filter::ExclusionFilter;
use crate::framework::target_framework_moniker;
use crate::identity::{self, DisplayNameLookup};
use crate::manifest::{FileRule, Manifest};
use crate::sources::Project;
use crate::version::resolve_version;

pub use dependencies::UpsertCounts;

/// The files a merge reads and the options that shape it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    pub manifest: PathBuf,
    /// Primary output assembly; its file name drives the file rule.
    pub assembly: PathBuf,
    pub project: PathBuf,
    /// Explicit dependency config; defaults to `packages.config` next to
    /// the project file.
    pub packages_config: Option<PathBuf>,
    pub options: MergeOptions,
}

impl MergeRequest {
    pub fn new(
        manifest: impl Into<PathBuf>,
        assembly: impl Into<PathBuf>,
        project: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manifest: manifest.into(),
            assembly: assembly.into(),
            project: project.into(),
            packages_config: None,
            options: MergeOptions::default(),
        }
    }

    /// The dependency config to read, if one exists.
    pub fn packages_config_path(&self) -> Option<PathBuf> {
        let path = match &self.packages_config {
            Some(path) => path.clone(),
            None => self
                .project
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(defaults::PACKAGES_CONFIG),
        };

        if path.is_file() {
            Some(path)
        } else {
            if self.packages_config.is_some() {
                warn!("Dependency config {} does not exist", path.display());
            } else {
                debug!("No {} next to the project", defaults::PACKAGES_CONFIG);
            }
            None
        }
    }
}

/// What a merge changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub version: String,
    pub target_framework: Option<&'static str>,
    /// Blank metadata fields that were filled.
    pub filled_fields: Vec<&'static str>,
    /// Number of options taken from the manifest's inline instruction.
    pub inline_options: usize,
    pub dependencies: UpsertCounts,
    pub framework_assemblies: UpsertCounts,
    pub file_rule: FileRule,
}

/// Merge build information into the manifest named by `request`.
pub fn merge_manifest(
    request: &MergeRequest,
    versions: &dyn VersionInfoSource,
    users: &dyn DisplayNameLookup,
) -> Result<MergeReport> {
    info!("Merging build information into {}", request.manifest.display());

    let mut manifest = Manifest::open(&request.manifest)?;

    let mut options = request.options.clone();
    let inline_options = inline::apply_inline_options(&manifest, &mut options);
    if inline_options > 0 {
        info!("Applied {} inline option(s)", inline_options);
    }

    let assembly_info = versions.version_info(&request.assembly)?;
    let version = resolve_version(
        options.version.as_deref(),
        &assembly_info,
        options.version_policy,
        options.version_source,
    )?;
    info!("Package version {}", version);

    let moniker = options
        .target_framework_version
        .as_deref()
        .and_then(|v| target_framework_moniker(v, options.target_framework_profile.as_deref()));
    if moniker.is_none() {
        if let Some(v) = &options.target_framework_version {
            warn!("Unknown target framework version '{}'", v);
        }
    }

    let file_rule = files::file_rule(
        &request.assembly,
        moniker.filter(|_| options.qualify_target_framework),
        &options.file_exclusion,
    )?;
    let package_filter = ExclusionFilter::new(&options.package_exclusion)?;

    let project = Project::open(&request.project)?;
    let packages_config = request.packages_config_path();
    let candidates = dependencies::dependency_candidates(packages_config.as_deref(), &project)?;
    let assemblies = references::framework_assemblies(&project, moniker);

    let user = identity::current_user(options.use_display_name, users);
    let filled_fields = metadata::merge_metadata(&mut manifest, &assembly_info, &version, &user)?;
    let dependency_counts =
        dependencies::merge_dependencies(&mut manifest, &candidates, &package_filter)?;
    let assembly_counts = references::merge_framework_assemblies(&mut manifest, &assemblies)?;
    files::append_file_rule(&mut manifest, &file_rule)?;

    manifest.save()?;
    info!("Saved {}", request.manifest.display());

    Ok(MergeReport {
        version,
        target_framework: moniker,
        filled_fields,
        inline_options,
        dependencies: dependency_counts,
        framework_assemblies: assembly_counts,
        file_rule,
    })
}
