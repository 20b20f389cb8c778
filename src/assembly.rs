//! Assembly version information
//!
//! Reading version resources out of a compiled assembly is left to the
//! build. The caller hands the values over either as command-line flags or
//! as a small YAML file:
//!
//! ```yaml
//! product_name: Sample Library
//! product_version: 1.2.3.4
//! file_version: 1.2.3.4
//! comments: Short summary of the package
//! file_description: Longer description
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Version resource fields of the primary output assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblyInfo {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_version: Option<String>,
    #[serde(default)]
    pub file_version: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub file_description: Option<String>,
}

impl AssemblyInfo {
    /// Load assembly information from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e),
            hint: Some(
                "Expected keys: product_name, product_version, file_version, comments, file_description"
                    .to_string(),
            ),
        })
    }

    /// Fill in fields from `other` where it has a value.
    pub fn overlay(mut self, other: AssemblyInfo) -> Self {
        fn pick(current: &mut Option<String>, candidate: Option<String>) {
            if candidate.is_some() {
                *current = candidate;
            }
        }
        pick(&mut self.product_name, other.product_name);
        pick(&mut self.product_version, other.product_version);
        pick(&mut self.file_version, other.file_version);
        pick(&mut self.comments, other.comments);
        pick(&mut self.file_description, other.file_description);
        self
    }
}

/// Something that can describe the version resources of an assembly.
pub trait VersionInfoSource {
    fn version_info(&self, assembly: &Path) -> Result<AssemblyInfo>;
}

/// Values supplied up front by the caller, independent of the assembly file.
impl VersionInfoSource for AssemblyInfo {
    fn version_info(&self, _assembly: &Path) -> Result<AssemblyInfo> {
        Ok(self.clone())
    }
}
