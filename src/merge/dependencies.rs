//! Package dependencies
//!
//! Dependencies come from `packages.config` and from SDK-style
//! `<PackageReference>` items in the project. Development-only packages,
//! packages matching the exclusion filter and packages without a version
//! are skipped; everything else is upserted by id.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::Result;
use crate::filter::ExclusionFilter;
use crate::manifest::{Dependency, Manifest, Upsert};
use crate::sources::{read_package_config, PackageEntry, Project};

/// Tally of what an upsert pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertCounts {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl UpsertCounts {
    pub(crate) fn record(&mut self, upsert: Upsert) {
        match upsert {
            Upsert::Inserted => self.inserted += 1,
            Upsert::Updated => self.updated += 1,
            Upsert::Unchanged => self.unchanged += 1,
        }
    }
}

/// Collect dependency candidates, `packages.config` entries first.
///
/// A package listed in both places is taken from `packages.config`.
pub fn dependency_candidates(
    packages_config: Option<&Path>,
    project: &Project,
) -> Result<Vec<PackageEntry>> {
    let mut candidates = match packages_config {
        Some(path) => {
            info!("Reading package dependencies from {}", path.display());
            read_package_config(path)?
        }
        None => Vec::new(),
    };

    let mut seen: HashSet<String> = candidates.iter().map(|e| e.id.clone()).collect();
    for entry in project.package_references() {
        if seen.insert(entry.id.clone()) {
            candidates.push(entry);
        }
    }
    Ok(candidates)
}

/// Upsert every eligible candidate into the manifest's dependency list.
pub fn merge_dependencies(
    manifest: &mut Manifest,
    candidates: &[PackageEntry],
    exclusions: &ExclusionFilter,
) -> Result<UpsertCounts> {
    info!("Merging package dependencies");
    let mut counts = UpsertCounts::default();

    for entry in candidates {
        if entry.development_only {
            debug!("Skipping development dependency {}", entry.id);
            counts.skipped += 1;
            continue;
        }
        if exclusions.is_excluded(&entry.id) {
            debug!("Skipping excluded package {}", entry.id);
            counts.skipped += 1;
            continue;
        }
        if entry.version.is_empty() {
            warn!("Package {} has no version and is not added as a dependency", entry.id);
            counts.skipped += 1;
            continue;
        }

        let upsert = manifest.upsert_dependency(&Dependency {
            id: entry.id.clone(),
            version: entry.version.clone(),
        })?;
        debug!("Dependency {} {}: {:?}", entry.id, entry.version, upsert);
        counts.record(upsert);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(id: &str, version: &str, development_only: bool) -> PackageEntry {
        PackageEntry {
            id: id.to_string(),
            version: version.to_string(),
            development_only,
        }
    }

    fn manifest() -> Manifest {
        Manifest::parse(
            r#"<package><metadata><dependencies><dependency id="Serilog" version="1.0.0"/></dependencies></metadata></package>"#,
            Path::new("Sample.nuspec"),
        )
        .unwrap()
    }

    #[test]
    fn test_skips_development_and_excluded_packages() {
        let mut manifest = manifest();
        let candidates = vec![
            entry("Foo", "1.0.0", true),
            entry("StyleCop.Analyzers", "1.1.0", false),
            entry("Newtonsoft.Json", "13.0.1", false),
            entry("Serilog", "2.10.0", false),
        ];
        let filter = ExclusionFilter::new("StyleCop.*").unwrap();

        let counts = merge_dependencies(&mut manifest, &candidates, &filter).unwrap();
        assert_eq!(
            counts,
            UpsertCounts {
                inserted: 1,
                updated: 1,
                unchanged: 0,
                skipped: 2,
            }
        );

        let ids: Vec<String> = manifest.dependencies().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["Serilog", "Newtonsoft.Json"]);
        assert!(!ids.contains(&"Foo".to_string()));
    }

    #[test]
    fn test_is_idempotent() {
        let mut manifest = manifest();
        let candidates = vec![entry("Newtonsoft.Json", "13.0.1", false)];
        let filter = ExclusionFilter::none();

        merge_dependencies(&mut manifest, &candidates, &filter).unwrap();
        let before = manifest.dependencies();
        let counts = merge_dependencies(&mut manifest, &candidates, &filter).unwrap();

        assert_eq!(counts.unchanged, 1);
        assert_eq!(manifest.dependencies(), before);
    }

    #[test]
    fn test_versionless_packages_are_skipped() {
        let mut manifest = manifest();
        let counts = merge_dependencies(
            &mut manifest,
            &[entry("Central.Managed", "", false)],
            &ExclusionFilter::none(),
        )
        .unwrap();
        assert_eq!(counts.skipped, 1);
        assert_eq!(manifest.dependencies().len(), 1);
    }

    #[test]
    fn test_candidates_prefer_packages_config() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("packages.config");
        fs::write(
            &config,
            r#"<packages><package id="Serilog" version="2.10.0"/></packages>"#,
        )
        .unwrap();
        let project = Project::parse(
            r#"<Project><ItemGroup>
                 <PackageReference Include="Serilog" Version="3.0.0"/>
                 <PackageReference Include="Dapper" Version="2.0.0"/>
               </ItemGroup></Project>"#,
            Path::new("Sample.csproj"),
        )
        .unwrap();

        let candidates = dependency_candidates(Some(&config), &project).unwrap();
        assert_eq!(
            candidates,
            vec![entry("Serilog", "2.10.0", false), entry("Dapper", "2.0.0", false)]
        );
    }
}
