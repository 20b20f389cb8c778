//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_sample_build();
//!     fixture.command().arg("merge").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fixtures;
    pub use super::TestFixture;
}

/// Input documents for a small sample build.
#[allow(dead_code)]
pub mod fixtures {
    /// A manifest template as checked into a project.
    pub const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd">
  <metadata>
    <id>Sample</id>
    <version>0.0.0</version>
    <authors></authors>
    <owners></owners>
    <summary></summary>
    <description>Hand written description</description>
    <dependencies>
      <dependency id="Serilog" version="1.0.0" />
    </dependencies>
  </metadata>
</package>
"#;

    /// A manifest without a `<metadata>` element.
    pub const MANIFEST_WITHOUT_METADATA: &str = r#"<?xml version="1.0"?>
<package>
  <files />
</package>
"#;

    /// A classic MSBuild project with framework and package references.
    pub const PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="12.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <Reference Include="System" />
    <Reference Include="System.Xml, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089" />
    <Reference Include="System.Data" />
    <Reference Include="Newtonsoft.Json">
      <HintPath>..\packages\Newtonsoft.Json.13.0.1\lib\net45\Newtonsoft.Json.dll</HintPath>
    </Reference>
  </ItemGroup>
</Project>
"#;

    /// Package dependencies, one of them development-only.
    pub const PACKAGES_CONFIG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Newtonsoft.Json" version="13.0.1" targetFramework="net45" />
  <package id="Serilog" version="2.10.0" targetFramework="net45" />
  <package id="Foo" version="1.0.0" developmentDependency="true" />
  <package id="StyleCop.Analyzers" version="1.1.118" />
</packages>
"#;

    /// Version resources of the built assembly.
    pub const ASSEMBLY_INFO: &str = r#"product_name: Sample Library
product_version: 1.2.3.4
file_version: 1.2.3.4
comments: A sample library
"#;

    /// A fake packaging tool that records its arguments and succeeds.
    pub const TOOL_SUCCESS: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$(dirname "$0")/tool-args.txt"
echo "Successfully created package."
exit 0
"#;

    /// A fake packaging tool that exits cleanly but writes to stderr.
    pub const TOOL_STDERR: &str = r#"#!/bin/sh
echo "Attempting to build package from 'Sample.nuspec'."
echo "Could not find a part of the path 'bin/Release'." >&2
exit 0
"#;

    /// A fake packaging tool that fails silently with a non-zero exit.
    pub const TOOL_EXIT_CODE: &str = r#"#!/bin/sh
echo "Something went wrong"
exit 3
"#;

    /// A fake packaging tool that never finishes on its own.
    pub const TOOL_HANG: &str = r#"#!/bin/sh
exec sleep 30
"#;
}

/// A temporary working directory for one end-to-end test.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add the manifest, project, dependency config and assembly info of
    /// the sample build.
    #[allow(dead_code)]
    pub fn with_sample_build(self) -> Self {
        self.with_file("Sample.nuspec", fixtures::MANIFEST)
            .with_file("Sample.csproj", fixtures::PROJECT)
            .with_file("packages.config", fixtures::PACKAGES_CONFIG)
            .with_file("assembly.yaml", fixtures::ASSEMBLY_INFO)
    }

    /// Add an executable script named `name`.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn with_script(self, name: &str, content: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let fixture = self.with_file(name, content);
        let path = fixture.path().join(name);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        fixture
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a file inside the fixture.
    pub fn file(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Read a file inside the fixture.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.file(path)).expect("Failed to read file")
    }

    /// A `nuspec-pack` command isolated from the user's environment and
    /// configuration, running in the fixture directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nuspec-pack");
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("HOME", self.path())
            .env_remove("NUSPEC_PACK_CONFIG")
            .env_remove("NUGET_PATH")
            .env_remove("NUGET_SERVER")
            .env_remove("NUGET_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
