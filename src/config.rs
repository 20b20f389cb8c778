//! # Configuration
//!
//! Options can be stored in a YAML file so that a build does not have to
//! repeat them on every invocation. The file has three optional sections:
//!
//! ```yaml
//! merge:
//!   version_policy: build-as-patch
//!   package_exclusion: "StyleCop.*;Microsoft.CodeAnalysis.*"
//!   target_framework_version: v4.5
//! tool:
//!   path: /opt/nuget/nuget.exe
//!   timeout: 60
//!   failure_policy: exit-code
//! publish:
//!   server: https://nuget.example.com/api/v2/package
//! ```
//!
//! ## Lookup
//!
//! The first of these that applies is used:
//!
//! 1.  The path given with `--config` or `NUSPEC_PACK_CONFIG`. It must exist.
//! 2.  `nuspec-pack.yaml` in the current directory.
//! 3.  `nuspec-pack/config.yaml` in the platform configuration directory.
//!
//! With none of them present the built-in defaults apply. Command-line
//! flags override the file; inline options in a manifest override both.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::tool::FailurePolicy;
use crate::version::{VersionPolicy, VersionSource};

/// Everything that shapes a manifest merge apart from the input paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeOptions {
    /// Explicit package version; bypasses the assembly version.
    pub version: Option<String>,
    pub version_policy: VersionPolicy,
    pub version_source: VersionSource,
    /// Semicolon-separated patterns written to the `exclude` attribute of
    /// the generated `<file>` rule.
    pub file_exclusion: String,
    /// Semicolon-separated patterns of package ids never added as dependencies.
    pub package_exclusion: String,
    /// MSBuild framework version, e.g. `v4.5`.
    pub target_framework_version: Option<String>,
    /// MSBuild framework profile, e.g. `Client`.
    pub target_framework_profile: Option<String>,
    /// Place the output under `lib\<moniker>` instead of `lib`.
    pub qualify_target_framework: bool,
    /// Prefer the user's display name over the login name for authors/owners.
    pub use_display_name: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            version: None,
            version_policy: VersionPolicy::default(),
            version_source: VersionSource::default(),
            file_exclusion: defaults::FILE_EXCLUSION.to_string(),
            package_exclusion: String::new(),
            target_framework_version: None,
            target_framework_profile: None,
            qualify_target_framework: true,
            use_display_name: true,
        }
    }
}

/// Packaging tool settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub path: Option<PathBuf>,
    /// Seconds to wait for the tool before giving up.
    pub timeout: Option<u64>,
    pub failure_policy: Option<FailurePolicy>,
}

/// Package feed settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    pub server: Option<String>,
    pub api_key: Option<String>,
}

/// The contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub merge: MergeOptions,
    pub tool: ToolConfig,
    pub publish: PublishConfig,
}

/// Parse configuration YAML. An empty document yields the defaults.
pub fn parse(yaml: &str) -> Result<Config> {
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("Valid sections are 'merge', 'tool' and 'publish'".to_string()),
    })
}

/// Load configuration from a YAML file.
pub fn from_file(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: None,
    })?;
    parse(&text).map_err(|e| match e {
        Error::ConfigParse { message, hint } => Error::ConfigParse {
            message: format!("{}: {}", path.display(), message),
            hint,
        },
        other => other,
    })
}

/// Candidate configuration paths, highest priority first, when none is
/// given explicitly.
pub fn search_paths(current_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![current_dir.join(defaults::CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(defaults::APP_NAME).join("config.yaml"));
    }
    paths
}

/// Find and load the configuration, returning the file it came from.
pub fn load(explicit: Option<&Path>, current_dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((from_file(path)?, Some(path.to_path_buf())));
    }
    for candidate in search_paths(current_dir) {
        if candidate.is_file() {
            return Ok((from_file(&candidate)?, Some(candidate)));
        }
    }
    Ok((Config::default(), None))
}
