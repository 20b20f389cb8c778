//! # Error Handling
//!
//! This module defines the centralized error type for `nuspec-pack`. It uses
//! the `thiserror` library to describe every failure the merge, pack and
//! publish operations can report.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to one class of
//!   failure and carries the context needed to act on it:
//!   - structural manifest errors (a required `<package>` or `<metadata>`
//!     element is missing),
//!   - XML syntax errors in the manifest or one of the input documents,
//!   - invalid configuration values such as a malformed version override,
//!   - failures of the external packaging tool (error output, timeout, or
//!     the tool could not be started),
//!   - wrapped I/O and regex errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Malformed inline options in a manifest are not errors here: they are
//! logged and skipped.

use std::path::PathBuf;

use thiserror::Error;

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

fn seconds_unit(seconds: u64) -> &'static str {
    if seconds == 1 {
        "second"
    } else {
        "seconds"
    }
}

/// Main error type for nuspec-pack operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest lacks an element the merge cannot create on its own.
    #[error("The NuSpec file {} does not contain a <{element}> XML element. The NuSpec file appears to be invalid.", path.display())]
    ManifestStructure { element: String, path: PathBuf },

    /// An XML document could not be parsed.
    #[error("XML parsing error in {}: {message}", path.display())]
    XmlParse { path: PathBuf, message: String },

    /// An XML tree operation failed after the document was loaded.
    #[error("XML operation error: {message}")]
    Xml { message: String },

    /// A version override does not look like a package version.
    #[error("Invalid package version '{version}'{}", hint_suffix(hint))]
    InvalidVersion {
        version: String,
        /// Optional hint describing the accepted format
        hint: Option<String>,
    },

    /// The configuration file or an option value could not be understood.
    #[error("Configuration error: {message}{}", hint_suffix(hint))]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A value the operation needs was not supplied by any source.
    #[error("Missing input: {what}{}", hint_suffix(hint))]
    MissingInput {
        what: String,
        /// Optional hint naming the flag or file that provides the value
        hint: Option<String>,
    },

    /// The packaging tool could not be started.
    #[error("Failed to start '{tool}': {message}{}", hint_suffix(hint))]
    ToolSpawn {
        tool: String,
        message: String,
        /// Optional hint, e.g. how to point at the tool
        hint: Option<String>,
    },

    /// The packaging tool did not finish within the allowed time.
    #[error("Timeout, {operation} the NuGet package took longer than {seconds} {}.", seconds_unit(*seconds))]
    ToolTimeout { operation: String, seconds: u64 },

    /// The packaging tool reported a failure.
    #[error("{operation} failed: {message}")]
    ToolFailed { operation: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<xot::Error> for Error {
    fn from(error: xot::Error) -> Self {
        Error::Xml {
            message: error.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_manifest_structure() {
        let error = Error::ManifestStructure {
            element: "metadata".to_string(),
            path: PathBuf::from("pkg/Foo.nuspec"),
        };
        let display = format!("{}", error);
        assert!(display.contains("<metadata>"));
        assert!(display.contains("pkg/Foo.nuspec"));
        assert!(display.contains("appears to be invalid"));
    }

    #[test]
    fn test_error_display_invalid_version_with_hint() {
        let error = Error::InvalidVersion {
            version: "1.x".to_string(),
            hint: Some("Use a version such as 1.2.3 or 1.2.3-beta1".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid package version '1.x'"));
        assert!(display.contains("hint:"));
        assert!(display.contains("1.2.3-beta1"));
    }

    #[test]
    fn test_error_display_invalid_version_without_hint() {
        let error = Error::InvalidVersion {
            version: "abc".to_string(),
            hint: None,
        };
        assert!(!format!("{}", error).contains("hint:"));
    }

    #[test]
    fn test_error_display_tool_timeout() {
        let error = Error::ToolTimeout {
            operation: "creating".to_string(),
            seconds: 30,
        };
        assert_eq!(
            error.to_string(),
            "Timeout, creating the NuGet package took longer than 30 seconds."
        );

        let error = Error::ToolTimeout {
            operation: "publishing".to_string(),
            seconds: 1,
        };
        assert_eq!(
            error.to_string(),
            "Timeout, publishing the NuGet package took longer than 1 second."
        );
    }

    #[test]
    fn test_error_display_tool_failed() {
        let error = Error::ToolFailed {
            operation: "pack".to_string(),
            message: "Could not find a part of the path".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.starts_with("pack failed"));
        assert!(display.contains("Could not find a part of the path"));
    }

    #[test]
    fn test_error_display_tool_spawn() {
        let error = Error::ToolSpawn {
            tool: "nuget".to_string(),
            message: "No such file or directory".to_string(),
            hint: Some("Use --tool".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to start 'nuget'"));
        assert!(display.contains("hint: Use --tool"));
    }

    #[test]
    fn test_error_missing_input() {
        let error = Error::MissingInput {
            what: "product version".to_string(),
            hint: None,
        };
        assert!(error.to_string().contains("Missing input: product version"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_regex_error() {
        let regex_error = regex::Error::Syntax("Invalid regex".to_string());
        let error: Error = regex_error.into();
        assert!(format!("{}", error).contains("Regex error"));
    }
}
