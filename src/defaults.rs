//! Default values shared by the commands and the library.
//!
//! Everything here can be overridden by the configuration file, an
//! environment variable or a command-line flag.

use std::time::Duration;

/// Application name, used for the configuration directory.
pub const APP_NAME: &str = "nuspec-pack";

/// Configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "nuspec-pack.yaml";

/// Packaging tool invoked when no path is configured.
pub const TOOL: &str = "nuget";

/// Seconds to wait for the packaging tool.
pub const TOOL_TIMEOUT_SECS: u64 = 30;

/// Files produced by code analysis that should never end up in a package.
pub const FILE_EXCLUSION: &str = r"**\*.CodeAnalysisLog.xml;**\*.lastcodeanalysissucceeded";

/// Dependency config file name, looked up next to the project file.
pub const PACKAGES_CONFIG: &str = "packages.config";

/// Assembly references with this prefix become framework assemblies.
pub const FRAMEWORK_ASSEMBLY_PREFIX: &str = "System.";

/// Extension of the package produced by the tool.
pub const PACKAGE_EXTENSION: &str = "nupkg";

/// The default tool timeout as a [`Duration`].
pub fn tool_timeout() -> Duration {
    Duration::from_secs(TOOL_TIMEOUT_SECS)
}
