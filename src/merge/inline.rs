//! Inline merge options
//!
//! A manifest may carry its own merge options in a processing instruction,
//! which take precedence over the command line and the configuration file:
//!
//! ```xml
//! <?nuspec-pack version-policy="build-as-patch" package-exclusion="StyleCop.*"?>
//! ```
//!
//! A value that cannot be understood is logged and skipped; the option keeps
//! the value it already had. Only the first such instruction is read, and an
//! instruction that has been commented out is ignored.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::config::MergeOptions;
use crate::manifest::Manifest;
use crate::suggestions;
use crate::version::{VersionPolicy, VersionSource};

/// Target of the inline option instruction.
pub const INSTRUCTION_TARGET: &str = "nuspec-pack";

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z][\w.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .unwrap_or_else(|e| panic!("invalid pattern: {e}"))
    })
}

/// The `key="value"` pairs in the data of an inline instruction.
pub fn inline_attributes(data: &str) -> Vec<(String, String)> {
    attribute_pattern()
        .captures_iter(data)
        .map(|captures| {
            let value = captures
                .get(2)
                .or_else(|| captures.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            (captures[1].to_string(), unescape(value))
        })
        .collect()
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Apply the inline options of `manifest` to `options`.
///
/// Returns the number of options that were applied.
pub fn apply_inline_options(manifest: &Manifest, options: &mut MergeOptions) -> usize {
    let Some(data) = manifest.instructions(INSTRUCTION_TARGET).first().copied() else {
        return 0;
    };
    let mut applied = 0;

    for (key, value) in inline_attributes(data) {
        let accepted = match key.as_str() {
            "version" => {
                options.version = optional(&value);
                true
            }
            "version-policy" => VersionPolicy::from_name(&value)
                .map(|policy| options.version_policy = policy)
                .is_some(),
            "version-source" => VersionSource::from_name(&value)
                .map(|source| options.version_source = source)
                .is_some(),
            "include-build-version" => parse_bool(&value)
                .map(|include| {
                    if include {
                        options.version_policy = VersionPolicy::Full;
                    } else if options.version_policy == VersionPolicy::Full {
                        options.version_policy = VersionPolicy::MajorMinorBuild;
                    }
                })
                .is_some(),
            "use-build-version-as-patch" => parse_bool(&value)
                .map(|as_patch| {
                    if as_patch {
                        options.version_policy = VersionPolicy::BuildAsPatch;
                    } else if options.version_policy == VersionPolicy::BuildAsPatch {
                        options.version_policy = VersionPolicy::MajorMinorBuild;
                    }
                })
                .is_some(),
            "file-exclusion" => {
                options.file_exclusion = value.trim().to_string();
                true
            }
            "package-exclusion" => {
                options.package_exclusion = value.trim().to_string();
                true
            }
            "target-framework-version" => {
                options.target_framework_version = optional(&value);
                true
            }
            "target-framework-profile" => {
                options.target_framework_profile = optional(&value);
                true
            }
            "qualify-target-framework" => parse_bool(&value)
                .map(|qualify| options.qualify_target_framework = qualify)
                .is_some(),
            "use-display-name" => parse_bool(&value)
                .map(|use_display_name| options.use_display_name = use_display_name)
                .is_some(),
            _ => {
                debug!("Ignoring {}", suggestions::unknown_inline_option(&key));
                continue;
            }
        };

        if accepted {
            debug!("Inline option {}=\"{}\" applied", key, value);
            applied += 1;
        } else {
            debug!("Ignoring malformed inline option {}=\"{}\"", key, value);
        }
    }

    applied
}
