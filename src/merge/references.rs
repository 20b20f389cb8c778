//! Framework assembly references
//!
//! Project references to `System.*` assemblies are satisfied by the .NET
//! framework itself, so they are declared as `<frameworkAssembly>` entries
//! instead of package dependencies.

use std::collections::HashSet;

use log::{debug, info};

use crate::defaults;
use crate::error::Result;
use crate::manifest::{FrameworkAssembly, Manifest};
use crate::sources::Project;

use super::dependencies::UpsertCounts;

/// The project's framework assembly references, in project order without
/// duplicates.
pub fn framework_assemblies(project: &Project, moniker: Option<&str>) -> Vec<FrameworkAssembly> {
    let mut seen = HashSet::new();
    project
        .assembly_references()
        .into_iter()
        .filter(|name| name.starts_with(defaults::FRAMEWORK_ASSEMBLY_PREFIX))
        .filter(|name| seen.insert(name.clone()))
        .map(|assembly_name| FrameworkAssembly {
            assembly_name,
            target_framework: moniker.map(str::to_string),
        })
        .collect()
}

/// Upsert `assemblies` into the manifest's framework assembly list.
pub fn merge_framework_assemblies(
    manifest: &mut Manifest,
    assemblies: &[FrameworkAssembly],
) -> Result<UpsertCounts> {
    info!("Merging framework assembly references");
    let mut counts = UpsertCounts::default();
    for assembly in assemblies {
        let upsert = manifest.upsert_framework_assembly(assembly)?;
        debug!("Framework assembly {}: {:?}", assembly.assembly_name, upsert);
        counts.record(upsert);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const PROJECT: &str = r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <Reference Include="System" />
    <Reference Include="System.Xml, Version=4.0.0.0, Culture=neutral" />
    <Reference Include="System.Data" />
    <Reference Include="Newtonsoft.Json" />
  </ItemGroup>
  <ItemGroup Condition="'$(Configuration)' == 'Debug'">
    <Reference Include="System.Data" />
  </ItemGroup>
</Project>"#;

    #[test]
    fn test_only_system_references() {
        let project = Project::parse(PROJECT, Path::new("Sample.csproj")).unwrap();
        let assemblies = framework_assemblies(&project, Some("net45"));

        let names: Vec<&str> = assemblies.iter().map(|a| a.assembly_name.as_str()).collect();
        assert_eq!(names, vec!["System.Xml", "System.Data"]);
        assert!(assemblies
            .iter()
            .all(|a| a.target_framework.as_deref() == Some("net45")));
    }

    #[test]
    fn test_merge_counts() {
        let mut manifest = Manifest::parse(
            r#"<package><metadata><frameworkAssemblies><frameworkAssembly assemblyName="System.Xml"/></frameworkAssemblies></metadata></package>"#,
            Path::new("Sample.nuspec"),
        )
        .unwrap();
        let project = Project::parse(PROJECT, Path::new("Sample.csproj")).unwrap();

        let counts =
            merge_framework_assemblies(&mut manifest, &framework_assemblies(&project, None))
                .unwrap();
        assert_eq!(counts.inserted, 1);
        assert_eq!(counts.unchanged, 1);
        assert_eq!(manifest.framework_assemblies().len(), 2);
    }
}
