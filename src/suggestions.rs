//! # Error Suggestions
//!
//! Helpers that pair an error with a hint on how to fix it. Errors should
//! tell users what went wrong AND what to do about it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nuspec_pack::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("NuSpec file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::manifest_not_found(path));
//! ```

use std::path::Path;

/// Keys understood in a `<?nuspec-pack ...?>` processing instruction.
pub const INLINE_OPTION_KEYS: [&str; 11] = [
    "version",
    "version-policy",
    "version-source",
    "include-build-version",
    "use-build-version-as-patch",
    "file-exclusion",
    "package-exclusion",
    "target-framework-version",
    "target-framework-profile",
    "qualify-target-framework",
    "use-display-name",
];

/// Generate an error for a manifest path that does not exist.
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "NuSpec file not found: {path}\n\n\
         hint: Pass the manifest with --nuspec <FILE>\n\
         hint: Run 'nuspec-pack merge' from the directory the path is relative to",
        path = path.display()
    )
}

/// Generate an error for a missing merge input such as the project file.
pub fn input_not_found(what: &str, path: &Path, flag: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "{what} not found: {path}\n\n\
         hint: Check the value passed to {flag}",
        path = path.display()
    )
}

/// Hint for a packaging tool that could not be started.
pub fn tool_not_found_hint(program: &Path) -> String {
    format!(
        "'{}' is not installed or not on PATH. Pass --tool <PATH> or set NUGET_PATH",
        program.display()
    )
}

/// Hint describing the accepted version override format.
pub fn version_format_hint() -> String {
    "Use two to four numeric segments with an optional pre-release suffix, e.g. 1.2.3 or 1.2.3-beta1"
        .to_string()
}

/// Hint for an exclusion token that is not a valid glob.
pub fn file_exclusion_hint() -> String {
    r"Separate patterns with ';' and use * or ? as wildcards, e.g. **\*.pdb;**\*.xml".to_string()
}

/// Describe an unrecognised inline option, suggesting a close match.
pub fn unknown_inline_option(key: &str) -> String {
    match find_similar(key, &INLINE_OPTION_KEYS) {
        Some(similar) => format!("unknown inline option '{key}' (did you mean '{similar}'?)"),
        None => format!("unknown inline option '{key}'"),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            (distance <= 2 && distance < input.len()).then_some((candidate, distance))
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance over two rolling rows.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut current = Vec::with_capacity(previous.len());
        current.push(i + 1);
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != *b_char);
            let value = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
            current.push(value);
        }
        previous = current;
    }

    previous[b_chars.len()]
}
