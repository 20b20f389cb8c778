//! # Package Version Resolution
//!
//! The package version written into a manifest comes from one of two places:
//!
//! 1.  **An explicit override.** It must look like a package version: two to
//!     four numeric segments, optionally followed by a SemVer pre-release
//!     suffix (`-beta.1`) and build metadata (`+abc`). Anything else is a
//!     configuration error and the merge stops before touching the manifest.
//!
//! 2.  **The built assembly.** Either its product version or its file
//!     version is read as a `major.minor.build.private` quadruple and shaped
//!     by a [`VersionPolicy`]:
//!     - `full`: the version string exactly as the assembly reports it,
//!     - `build-as-patch`: `major.minor.private`,
//!     - `major-minor-build`: `major.minor.build` (the default).

use std::fmt;
use std::sync::OnceLock;

use log::warn;
use regex::Regex;
use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Serialize};

use crate::assembly::AssemblyInfo;
use crate::error::{Error, Result};
use crate::suggestions;

/// How a numeric assembly version becomes a package version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VersionPolicy {
    /// Use the version string as reported by the assembly.
    Full,
    /// `major.minor.private`, promoting the private part to the patch number.
    BuildAsPatch,
    /// `major.minor.build`.
    #[default]
    MajorMinorBuild,
}

impl VersionPolicy {
    /// Parse the kebab-case policy name used in config files and inline options.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "build-as-patch" => Some(Self::BuildAsPatch),
            "major-minor-build" => Some(Self::MajorMinorBuild),
            _ => None,
        }
    }
}

/// Which assembly version resource feeds the package version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VersionSource {
    #[default]
    Product,
    File,
}

impl VersionSource {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "product" => Some(Self::Product),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// A four-part assembly version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionQuad {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub private: u32,
}

impl VersionQuad {
    /// Parse the leading numeric segments of `text`. Missing trailing
    /// segments are zero; anything after the fourth segment is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion {
            version: text.to_string(),
            hint: Some("Assembly versions look like 1.2.3.4".to_string()),
        };

        let captures = numeric_prefix().captures(text.trim()).ok_or_else(invalid)?;
        let mut parts = [0u32; 4];
        for (slot, segment) in parts
            .iter_mut()
            .zip(captures[1].split('.'))
        {
            *slot = segment.parse().map_err(|_| invalid())?;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            build: parts[2],
            private: parts[3],
        })
    }
}

impl fmt::Display for VersionQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.private
        )
    }
}

fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+){0,3})").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
    })
}

fn package_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d+(?:\.\d+){1,3}(?:-([^+]+))?(?:\+(.+))?$")
            .unwrap_or_else(|e| panic!("invalid pattern: {e}"))
    })
}

/// Check that `version` is an acceptable package version.
pub fn validate_package_version(version: &str) -> Result<()> {
    let invalid = || Error::InvalidVersion {
        version: version.to_string(),
        hint: Some(suggestions::version_format_hint()),
    };

    let captures = package_version_pattern()
        .captures(version)
        .ok_or_else(invalid)?;
    if let Some(pre) = captures.get(1) {
        Prerelease::new(pre.as_str()).map_err(|_| invalid())?;
    }
    if let Some(build) = captures.get(2) {
        BuildMetadata::new(build.as_str()).map_err(|_| invalid())?;
    }
    Ok(())
}

/// Work out the package version for a merge.
pub fn resolve_version(
    version_override: Option<&str>,
    info: &AssemblyInfo,
    policy: VersionPolicy,
    source: VersionSource,
) -> Result<String> {
    if let Some(explicit) = version_override.filter(|v| !v.trim().is_empty()) {
        validate_package_version(explicit)?;
        return Ok(explicit.to_string());
    }

    let (raw, what) = match source {
        VersionSource::Product => (info.product_version.as_deref(), "product version"),
        VersionSource::File => (info.file_version.as_deref(), "file version"),
    };
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MissingInput {
            what: format!("assembly {}", what),
            hint: Some(
                "Pass --product-version/--file-version, an --assembly-info file, or --version"
                    .to_string(),
            ),
        })?;

    let version = match policy {
        VersionPolicy::Full => {
            if validate_package_version(raw).is_err() {
                warn!("Assembly {} '{}' is not a valid package version", what, raw);
            }
            raw.to_string()
        }
        VersionPolicy::BuildAsPatch => {
            let quad = VersionQuad::parse(raw)?;
            format!("{}.{}.{}", quad.major, quad.minor, quad.private)
        }
        VersionPolicy::MajorMinorBuild => {
            let quad = VersionQuad::parse(raw)?;
            format!("{}.{}.{}", quad.major, quad.minor, quad.build)
        }
    };
    Ok(version)
}
