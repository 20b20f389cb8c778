//! Scalar metadata fields
//!
//! `title` and `version` always follow the build. `summary`, `description`,
//! `authors` and `owners` are only filled when the manifest leaves them
//! blank, so hand-written text is never replaced.

use log::{debug, info};

use crate::assembly::AssemblyInfo;
use crate::error::Result;
use crate::manifest::Manifest;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Write the build's metadata into `manifest`.
///
/// Returns the names of the blank fields that were filled.
pub fn merge_metadata(
    manifest: &mut Manifest,
    info: &AssemblyInfo,
    version: &str,
    user: &str,
) -> Result<Vec<&'static str>> {
    info!("Merging metadata");

    if let Some(title) = present(&info.product_name) {
        manifest.set_metadata("title", title)?;
    }
    manifest.set_metadata("version", version)?;

    let fill = [
        ("summary", present(&info.comments)),
        ("description", present(&info.file_description)),
        ("authors", Some(user)),
        ("owners", Some(user)),
    ];

    let mut filled = Vec::new();
    for (field, value) in fill {
        let Some(value) = value else {
            continue;
        };
        if manifest.set_metadata_if_empty(field, value)? {
            debug!("Filled empty <{}> with '{}'", field, value);
            filled.push(field);
        }
    }
    Ok(filled)
}
