//! Package exclusion filter
//!
//! Exclusion patterns are written as semicolon-separated glob-like tokens,
//! e.g. `StyleCop.*;Microsoft.CodeAnalysis.*`. `*` matches any run of
//! characters and `?` a single character. The tokens are compiled into one
//! anchored, case-sensitive regular expression alternation.

use regex::Regex;

use crate::error::Result;

/// A compiled set of exclusion patterns.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    regex: Option<Regex>,
}

impl ExclusionFilter {
    /// Compile a semicolon-separated pattern list. Blank tokens are ignored;
    /// an empty list produces a filter that excludes nothing.
    pub fn new(patterns: &str) -> Result<Self> {
        let alternatives: Vec<String> = patterns
            .split(';')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(token_to_regex)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self::none());
        }

        let regex = Regex::new(&format!("^(?:{})$", alternatives.join("|")))?;
        Ok(Self { regex: Some(regex) })
    }

    /// A filter that excludes nothing.
    pub fn none() -> Self {
        Self { regex: None }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(name))
    }
}

fn token_to_regex(token: &str) -> String {
    let mut out = String::new();
    let mut literal = String::new();

    for ch in token.chars() {
        match ch {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    out.push_str(&regex::escape(&literal));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_excludes_nothing() {
        let filter = ExclusionFilter::new("").unwrap();
        assert!(!filter.is_excluded("Anything"));
        assert!(!filter.is_excluded(""));

        let filter = ExclusionFilter::new(" ; ;").unwrap();
        assert!(!filter.is_excluded("Anything"));
    }

    #[test]
    fn test_wildcard_tokens() {
        let filter = ExclusionFilter::new("StyleCop.*;Foo?").unwrap();
        assert!(filter.is_excluded("StyleCop.Analyzers"));
        assert!(filter.is_excluded("Foo1"));
        assert!(!filter.is_excluded("Foo12"));
        assert!(!filter.is_excluded("Newtonsoft.Json"));
    }

    #[test]
    fn test_match_is_anchored() {
        let filter = ExclusionFilter::new("Json").unwrap();
        assert!(filter.is_excluded("Json"));
        assert!(!filter.is_excluded("Newtonsoft.Json"));
        assert!(!filter.is_excluded("Json.Extra"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let filter = ExclusionFilter::new("xunit*").unwrap();
        assert!(filter.is_excluded("xunit.core"));
        assert!(!filter.is_excluded("XUnit.core"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let filter = ExclusionFilter::new("A.B+(C)").unwrap();
        assert!(filter.is_excluded("A.B+(C)"));
        assert!(!filter.is_excluded("AxBB(C)"));
    }
}
