//! File inclusion rule
//!
//! Each merge appends one rule that picks up every file named after the
//! primary output assembly:
//!
//! ```xml
//! <file src="**\Sample.*" target="lib\net45" exclude="**\*.CodeAnalysisLog.xml" />
//! ```

use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::manifest::{FileRule, Manifest};
use crate::suggestions;

/// Check that every exclusion token is a usable glob.
///
/// Backslashes are treated as path separators, as NuGet does.
pub fn validate_file_exclusion(patterns: &str) -> Result<()> {
    for token in patterns.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        glob::Pattern::new(&token.replace('\\', "/")).map_err(|e| Error::ConfigParse {
            message: format!("invalid file exclusion pattern '{}': {}", token, e),
            hint: Some(suggestions::file_exclusion_hint()),
        })?;
    }
    Ok(())
}

/// Build the rule for `assembly`.
pub fn file_rule(assembly: &Path, moniker: Option<&str>, exclusion: &str) -> Result<FileRule> {
    validate_file_exclusion(exclusion)?;

    let output_name = assembly
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::MissingInput {
            what: format!("output assembly name in '{}'", assembly.display()),
            hint: Some("Pass the built assembly with --assembly <FILE>".to_string()),
        })?;

    let target = match moniker {
        Some(moniker) => format!("lib\\{}", moniker),
        None => "lib".to_string(),
    };
    let exclusion = exclusion.trim();

    Ok(FileRule {
        src: format!("**\\{}.*", output_name),
        target,
        exclude: (!exclusion.is_empty()).then(|| exclusion.to_string()),
    })
}

/// Append `rule` to the manifest's file list.
pub fn append_file_rule(manifest: &mut Manifest, rule: &FileRule) -> Result<()> {
    info!("Adding file rule {} -> {}", rule.src, rule.target);
    manifest.append_file(rule)
}
