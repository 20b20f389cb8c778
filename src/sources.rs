//! Read-only build inputs
//!
//! The merge draws dependencies and framework references from two XML
//! documents next to the manifest:
//!
//! - `packages.config`, listing `<package id version developmentDependency/>`
//!   entries, and
//! - the project file, whose `<Reference Include/>` items name referenced
//!   assemblies and whose SDK-style `<PackageReference Include Version/>`
//!   items name NuGet dependencies.

use std::path::Path;

use crate::error::{Error, Result};
use crate::xml::XmlDocument;

/// A package the project depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub id: String,
    pub version: String,
    /// Build-time-only packages are never declared as dependencies.
    pub development_only: bool,
}

/// Read the entries of a `packages.config` file.
pub fn read_package_config(path: &Path) -> Result<Vec<PackageEntry>> {
    let doc = XmlDocument::open(path)?;
    if !doc.is_named(doc.root(), "packages") {
        return Err(Error::XmlParse {
            path: path.to_path_buf(),
            message: "expected a <packages> root element".to_string(),
        });
    }

    let entries = doc
        .child_elements(doc.root(), "package")
        .into_iter()
        .filter_map(|node| {
            let id = doc.attribute(node, "id")?.trim();
            if id.is_empty() {
                return None;
            }
            Some(PackageEntry {
                id: id.to_string(),
                version: doc.attribute(node, "version").unwrap_or_default().trim().to_string(),
                development_only: doc
                    .attribute(node, "developmentDependency")
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            })
        })
        .collect();
    Ok(entries)
}

/// A parsed project file.
#[derive(Debug)]
pub struct Project {
    doc: XmlDocument,
}

impl Project {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            doc: XmlDocument::open(path)?,
        })
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        Ok(Self {
            doc: XmlDocument::parse(text, path)?,
        })
    }

    /// Simple names of all referenced assemblies.
    ///
    /// `Include="System.Xml, Version=4.0.0.0, Culture=neutral"` yields
    /// `System.Xml`.
    pub fn assembly_references(&self) -> Vec<String> {
        self.doc
            .descendant_elements("Reference")
            .into_iter()
            .filter_map(|node| self.doc.attribute(node, "Include"))
            .filter_map(|include| include.split(',').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// SDK-style `<PackageReference>` items.
    ///
    /// `Version` may be an attribute or a child element. Items with
    /// `PrivateAssets` set to `all` are development-only.
    pub fn package_references(&self) -> Vec<PackageEntry> {
        self.doc
            .descendant_elements("PackageReference")
            .into_iter()
            .filter_map(|node| {
                let id = self.doc.attribute(node, "Include")?.trim().to_string();
                let version = self
                    .item_metadata(node, "Version")
                    .unwrap_or_default();
                let development_only = self
                    .item_metadata(node, "PrivateAssets")
                    .is_some_and(|v| v.eq_ignore_ascii_case("all"));
                Some(PackageEntry {
                    id,
                    version,
                    development_only,
                })
            })
            .filter(|entry| !entry.id.is_empty())
            .collect()
    }

    fn item_metadata(&self, node: xot::Node, name: &str) -> Option<String> {
        self.doc
            .attribute(node, name)
            .map(str::to_string)
            .or_else(|| {
                self.doc
                    .child_element(node, name)
                    .map(|child| self.doc.text(child))
            })
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
