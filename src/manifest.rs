//! # NuGet Manifest Access
//!
//! `Manifest` wraps an [`XmlDocument`] holding a `.nuspec` file and exposes
//! the handful of operations the merge and publish steps need: reading and
//! writing scalar metadata fields, upserting dependencies and framework
//! assemblies, and appending file-inclusion rules.
//!
//! A manifest must contain exactly one `<package>` root and one
//! `<metadata>` element below it. Everything else is created on demand and
//! unknown content is left alone.

use std::path::Path;

use xot::Node;

use crate::error::{Error, Result};
use crate::xml::XmlDocument;

/// A package dependency entry (`<dependency id="..." version="..."/>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub id: String,
    pub version: String,
}

/// A framework assembly reference (`<frameworkAssembly assemblyName="..."/>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkAssembly {
    pub assembly_name: String,
    pub target_framework: Option<String>,
}

/// A file-inclusion rule (`<file src="..." target="..." exclude="..."/>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRule {
    pub src: String,
    pub target: String,
    pub exclude: Option<String>,
}

/// What an upsert did to the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
    Unchanged,
}

/// A loaded `.nuspec` document.
#[derive(Debug)]
pub struct Manifest {
    doc: XmlDocument,
    package: Node,
    metadata: Node,
}

impl Manifest {
    /// Load the manifest at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_document(XmlDocument::open(path)?)
    }

    /// Parse manifest text; `path` is used for messages and [`Manifest::save`].
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        Self::from_document(XmlDocument::parse(text, path)?)
    }

    fn from_document(doc: XmlDocument) -> Result<Self> {
        let root = doc.root();
        if !doc.is_named(root, "package") {
            return Err(Error::ManifestStructure {
                element: "package".to_string(),
                path: doc.path().to_path_buf(),
            });
        }
        let metadata = doc
            .child_element(root, "metadata")
            .ok_or_else(|| Error::ManifestStructure {
                element: "metadata".to_string(),
                path: doc.path().to_path_buf(),
            })?;

        Ok(Self {
            doc,
            package: root,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    /// Data of the processing instructions with the given target.
    pub fn instructions(&self, target: &str) -> Vec<&str> {
        self.doc.processing_instructions(target)
    }

    /// Text of the metadata field `field`, if the element exists.
    pub fn metadata_value(&self, field: &str) -> Option<String> {
        self.doc
            .child_element(self.metadata, field)
            .map(|node| self.doc.text(node))
    }

    /// The package version, trimmed; `None` when absent or blank.
    pub fn version(&self) -> Option<String> {
        self.metadata_value("version")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Set the metadata field `field`, creating the element if needed.
    pub fn set_metadata(&mut self, field: &str, value: &str) -> Result<()> {
        let node = self.doc.get_or_create_child(self.metadata, field)?;
        self.doc.set_text(node, value)
    }

    /// Set the metadata field only when it is missing or blank.
    ///
    /// Returns whether the field was written.
    pub fn set_metadata_if_empty(&mut self, field: &str, value: &str) -> Result<bool> {
        let node = self.doc.get_or_create_child(self.metadata, field)?;
        if !self.doc.text(node).trim().is_empty() {
            return Ok(false);
        }
        self.doc.set_text(node, value)?;
        Ok(true)
    }

    /// Direct `<dependency>` children of `<dependencies>`.
    pub fn dependencies(&self) -> Vec<Dependency> {
        let Some(list) = self.doc.child_element(self.metadata, "dependencies") else {
            return Vec::new();
        };
        self.doc
            .child_elements(list, "dependency")
            .into_iter()
            .filter_map(|node| {
                Some(Dependency {
                    id: self.doc.attribute(node, "id")?.to_string(),
                    version: self.doc.attribute(node, "version").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    /// Insert `dependency`, or update the version of the entry with the same id.
    pub fn upsert_dependency(&mut self, dependency: &Dependency) -> Result<Upsert> {
        let list = self.doc.get_or_create_child(self.metadata, "dependencies")?;
        let existing = self
            .doc
            .child_elements(list, "dependency")
            .into_iter()
            .find(|&node| self.doc.attribute(node, "id") == Some(dependency.id.as_str()));

        match existing {
            Some(node) if self.doc.attribute(node, "version") == Some(dependency.version.as_str()) => {
                Ok(Upsert::Unchanged)
            }
            Some(node) => {
                self.doc.set_attribute(node, "version", &dependency.version);
                Ok(Upsert::Updated)
            }
            None => {
                let node = self.doc.append_element(list, "dependency")?;
                self.doc.set_attribute(node, "id", &dependency.id);
                self.doc.set_attribute(node, "version", &dependency.version);
                Ok(Upsert::Inserted)
            }
        }
    }

    /// Direct `<frameworkAssembly>` children of `<frameworkAssemblies>`.
    pub fn framework_assemblies(&self) -> Vec<FrameworkAssembly> {
        let Some(list) = self.doc.child_element(self.metadata, "frameworkAssemblies") else {
            return Vec::new();
        };
        self.doc
            .child_elements(list, "frameworkAssembly")
            .into_iter()
            .filter_map(|node| {
                Some(FrameworkAssembly {
                    assembly_name: self.doc.attribute(node, "assemblyName")?.to_string(),
                    target_framework: self
                        .doc
                        .attribute(node, "targetFramework")
                        .map(str::to_string),
                })
            })
            .collect()
    }

    /// Insert `assembly`, or refresh the entry with the same assembly name.
    pub fn upsert_framework_assembly(&mut self, assembly: &FrameworkAssembly) -> Result<Upsert> {
        let list = self
            .doc
            .get_or_create_child(self.metadata, "frameworkAssemblies")?;
        let existing = self
            .doc
            .child_elements(list, "frameworkAssembly")
            .into_iter()
            .find(|&node| {
                self.doc.attribute(node, "assemblyName") == Some(assembly.assembly_name.as_str())
            });

        let node = match existing {
            Some(node) => {
                let current = self.doc.attribute(node, "targetFramework");
                match &assembly.target_framework {
                    Some(tfm) if current != Some(tfm.as_str()) => {
                        self.doc.set_attribute(node, "targetFramework", tfm);
                        return Ok(Upsert::Updated);
                    }
                    _ => return Ok(Upsert::Unchanged),
                }
            }
            None => self.doc.append_element(list, "frameworkAssembly")?,
        };

        self.doc
            .set_attribute(node, "assemblyName", &assembly.assembly_name);
        if let Some(tfm) = &assembly.target_framework {
            self.doc.set_attribute(node, "targetFramework", tfm);
        }
        Ok(Upsert::Inserted)
    }

    /// `<file>` rules under `<files>`.
    pub fn files(&self) -> Vec<FileRule> {
        let Some(list) = self.doc.child_element(self.package, "files") else {
            return Vec::new();
        };
        self.doc
            .child_elements(list, "file")
            .into_iter()
            .map(|node| FileRule {
                src: self.doc.attribute(node, "src").unwrap_or_default().to_string(),
                target: self.doc.attribute(node, "target").unwrap_or_default().to_string(),
                exclude: self.doc.attribute(node, "exclude").map(str::to_string),
            })
            .collect()
    }

    /// Append `rule` to `<files>`, creating the list if needed.
    pub fn append_file(&mut self, rule: &FileRule) -> Result<()> {
        let list = self.doc.get_or_create_child(self.package, "files")?;
        let node = self.doc.append_element(list, "file")?;
        self.doc.set_attribute(node, "src", &rule.src);
        self.doc.set_attribute(node, "target", &rule.target);
        if let Some(exclude) = &rule.exclude {
            self.doc.set_attribute(node, "exclude", exclude);
        }
        Ok(())
    }

    pub fn to_xml(&self) -> Result<String> {
        self.doc.to_xml()
    }

    /// Persist the manifest to the path it was loaded from.
    pub fn save(&self) -> Result<()> {
        self.doc.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"<?xml version="1.0"?>
<package xmlns="http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd">
  <metadata>
    <id>Sample</id>
    <authors></authors>
    <owners>Team</owners>
    <version>1.0.0.0</version>
    <summary></summary>
    <dependencies>
      <!-- populated at build time -->
    </dependencies>
  </metadata>
  <files>
  </files>
</package>
"#;

    fn manifest() -> Manifest {
        Manifest::parse(TEMPLATE, Path::new("Sample.nuspec")).unwrap()
    }

    fn dep(id: &str, version: &str) -> Dependency {
        Dependency {
            id: id.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_missing_package_is_structural_error() {
        let result = Manifest::parse("<root><metadata/></root>", Path::new("x.nuspec"));
        match result {
            Err(Error::ManifestStructure { element, .. }) => assert_eq!(element, "package"),
            other => panic!("expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_metadata_is_structural_error() {
        let result = Manifest::parse("<package><files/></package>", Path::new("x.nuspec"));
        match result {
            Err(Error::ManifestStructure { element, .. }) => assert_eq!(element, "metadata"),
            other => panic!("expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_without_namespace() {
        let manifest = Manifest::parse(
            "<package><metadata><version>2.0.0</version></metadata></package>",
            Path::new("x.nuspec"),
        )
        .unwrap();
        assert_eq!(manifest.version(), Some("2.0.0".to_string()));
    }

    #[test]
    fn test_set_metadata_if_empty_keeps_user_text() {
        let mut manifest = manifest();
        assert!(!manifest.set_metadata_if_empty("owners", "someone").unwrap());
        assert_eq!(manifest.metadata_value("owners").unwrap(), "Team");

        assert!(manifest.set_metadata_if_empty("authors", "someone").unwrap());
        assert_eq!(manifest.metadata_value("authors").unwrap(), "someone");
    }

    #[test]
    fn test_set_metadata_creates_missing_field() {
        let mut manifest = manifest();
        assert!(manifest.metadata_value("title").is_none());
        manifest.set_metadata("title", "Sample Library").unwrap();
        assert_eq!(manifest.metadata_value("title").unwrap(), "Sample Library");
    }

    #[test]
    fn test_upsert_dependency_inserts_then_updates() {
        let mut manifest = manifest();
        assert_eq!(
            manifest.upsert_dependency(&dep("Foo", "1.0.0")).unwrap(),
            Upsert::Inserted
        );
        assert_eq!(
            manifest.upsert_dependency(&dep("Foo", "1.0.0")).unwrap(),
            Upsert::Unchanged
        );
        assert_eq!(
            manifest.upsert_dependency(&dep("Foo", "2.0.0")).unwrap(),
            Upsert::Updated
        );
        assert_eq!(manifest.dependencies(), vec![dep("Foo", "2.0.0")]);
    }

    #[test]
    fn test_upsert_framework_assembly() {
        let mut manifest = manifest();
        let assembly = FrameworkAssembly {
            assembly_name: "System.Xml".to_string(),
            target_framework: None,
        };
        assert_eq!(
            manifest.upsert_framework_assembly(&assembly).unwrap(),
            Upsert::Inserted
        );
        assert_eq!(
            manifest.upsert_framework_assembly(&assembly).unwrap(),
            Upsert::Unchanged
        );

        let with_tfm = FrameworkAssembly {
            target_framework: Some("net45".to_string()),
            ..assembly
        };
        assert_eq!(
            manifest.upsert_framework_assembly(&with_tfm).unwrap(),
            Upsert::Updated
        );
        assert_eq!(manifest.framework_assemblies(), vec![with_tfm]);
    }

    #[test]
    fn test_append_file_rule() {
        let mut manifest = manifest();
        let rule = FileRule {
            src: r"**\Sample.*".to_string(),
            target: r"lib\net45".to_string(),
            exclude: Some("*.pdb".to_string()),
        };
        manifest.append_file(&rule).unwrap();
        manifest.append_file(&rule).unwrap();
        assert_eq!(manifest.files(), vec![rule.clone(), rule]);
    }

    #[test]
    fn test_append_file_creates_files_element() {
        let mut manifest = Manifest::parse(
            "<package><metadata/></package>",
            Path::new("x.nuspec"),
        )
        .unwrap();
        let rule = FileRule {
            src: "a".to_string(),
            target: "lib".to_string(),
            exclude: None,
        };
        manifest.append_file(&rule).unwrap();
        assert_eq!(manifest.files(), vec![rule]);
        assert!(!manifest.to_xml().unwrap().contains("exclude"));
    }

    #[test]
    fn test_save_round_trips_through_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Sample.nuspec");
        fs::write(&path, TEMPLATE).unwrap();

        let mut manifest = Manifest::open(&path).unwrap();
        manifest.set_metadata("version", "3.1.4").unwrap();
        manifest.upsert_dependency(&dep("Bar", "0.1.0")).unwrap();
        manifest.save().unwrap();

        let reloaded = Manifest::open(&path).unwrap();
        assert_eq!(reloaded.version(), Some("3.1.4".to_string()));
        assert_eq!(reloaded.dependencies(), vec![dep("Bar", "0.1.0")]);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("populated at build time"));
    }
}
