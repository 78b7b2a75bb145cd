//! Generates candidate email address patterns from a contact name.
//!
//! Two providers exist: a minimal `basic` set and the `full` set used by
//! default. The choice is made once at configuration time via
//! [`PatternSet`]; call sites only ever see the [`PatternProvider`] trait.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Which pattern template set to use for guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSet {
    /// Three most common forms only.
    Basic,
    /// The complete fixed template list.
    #[default]
    Full,
}

impl FromStr for PatternSet {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(PatternSet::Basic),
            "full" => Ok(PatternSet::Full),
            other => Err(format!(
                "unknown pattern set '{}' (expected 'basic' or 'full')",
                other
            )),
        }
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSet::Basic => write!(f, "basic"),
            PatternSet::Full => write!(f, "full"),
        }
    }
}

/// Produces the ordered address permutations for one (first, last) pair.
///
/// Ordering matters: the most conventional forms come first, so callers
/// that bound their verification effort probe the likeliest addresses
/// before rarer ones. Pure string work, no I/O.
pub trait PatternProvider: Send + Sync {
    fn generate(&self, first_name: &str, last_name: &str, domain: &str) -> Vec<String>;
}

/// Minimal fallback set: `first`, `first.last`, `firstlast`.
pub struct BasicPatternProvider;

/// The full fixed template list, most-likely patterns first.
pub struct FullPatternProvider;

pub fn provider_for(set: PatternSet) -> Box<dyn PatternProvider> {
    match set {
        PatternSet::Basic => Box::new(BasicPatternProvider),
        PatternSet::Full => Box::new(FullPatternProvider),
    }
}

impl PatternProvider for BasicPatternProvider {
    fn generate(&self, first_name: &str, last_name: &str, domain: &str) -> Vec<String> {
        let Some((first, last)) = sanitized_parts(first_name, last_name, domain) else {
            return Vec::new();
        };
        let local_parts = vec![
            first.clone(),
            format!("{}.{}", first, last),
            format!("{}{}", first, last),
        ];
        build_addresses(local_parts, domain)
    }
}

impl PatternProvider for FullPatternProvider {
    fn generate(&self, first_name: &str, last_name: &str, domain: &str) -> Vec<String> {
        let Some((first, last)) = sanitized_parts(first_name, last_name, domain) else {
            return Vec::new();
        };

        let first_initial = first.chars().next().unwrap_or_default();
        let last_initial = last.chars().next().unwrap_or_default();

        let local_parts = vec![
            format!("{}.{}", first, last),             // jane.doe
            format!("{}{}", first, last),              // janedoe
            first.clone(),                             // jane
            format!("{}{}", first_initial, last),      // jdoe
            format!("{}.{}", first_initial, last),     // j.doe
            format!("{}_{}", first, last),             // jane_doe
            format!("{}-{}", first, last),             // jane-doe
            last.clone(),                              // doe
            format!("{}{}", first_initial, last_initial), // jd
            last_initial.to_string(),                  // d
        ];
        build_addresses(local_parts, domain)
    }
}

/// Removes most non-alphanumeric characters, whitespace, and converts to
/// lowercase, producing usable local-part building blocks.
fn sanitize_name_part(part: &str) -> String {
    part.trim()
        .replace(
            |c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'),
            "",
        )
        .to_lowercase()
}

fn sanitized_parts(first_name: &str, last_name: &str, domain: &str) -> Option<(String, String)> {
    let first = sanitize_name_part(first_name);
    let last = sanitize_name_part(last_name);

    if first.is_empty() || last.is_empty() {
        tracing::debug!(
            "Cannot generate patterns: sanitized name parts are empty (original: '{} {}')",
            first_name,
            last_name
        );
        return None;
    }
    if domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        tracing::debug!("Cannot generate patterns: invalid domain '{}'", domain);
        return None;
    }
    Some((first, last))
}

/// Appends `@domain`, dropping empty and duplicate local parts while
/// preserving the template order.
fn build_addresses(local_parts: Vec<String>, domain: &str) -> Vec<String> {
    let domain = domain.to_lowercase();
    let mut seen = HashSet::new();
    local_parts
        .into_iter()
        .filter(|lp| !lp.is_empty())
        .filter(|lp| seen.insert(lp.clone()))
        .map(|lp| format!("{}@{}", lp, domain))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_patterns_fixed_count_and_contents() {
        let patterns = FullPatternProvider.generate("jane", "doe", "example.com");
        assert_eq!(patterns.len(), 10);
        assert!(patterns.contains(&"jane@example.com".to_string()));
        assert!(patterns.contains(&"jane.doe@example.com".to_string()));
        assert!(patterns.contains(&"janedoe@example.com".to_string()));
        assert!(patterns.contains(&"jane_doe@example.com".to_string()));
        assert!(patterns.contains(&"jane-doe@example.com".to_string()));
        assert!(patterns.contains(&"j.doe@example.com".to_string()));
        assert!(patterns.contains(&"jdoe@example.com".to_string()));
        assert!(patterns.contains(&"doe@example.com".to_string()));
        assert!(patterns.contains(&"d@example.com".to_string()));
        assert!(patterns.iter().all(|p| p.ends_with("@example.com")));
    }

    #[test]
    fn test_full_patterns_likeliest_first() {
        let patterns = FullPatternProvider.generate("jane", "doe", "example.com");
        assert_eq!(patterns[0], "jane.doe@example.com");
        assert_eq!(patterns[1], "janedoe@example.com");
    }

    #[test]
    fn test_full_patterns_deterministic() {
        let a = FullPatternProvider.generate("jane", "doe", "example.com");
        let b = FullPatternProvider.generate("jane", "doe", "example.com");
        assert_eq!(a, b);
    }

    #[test]
    fn test_basic_patterns() {
        let patterns = BasicPatternProvider.generate("jane", "doe", "example.com");
        assert_eq!(
            patterns,
            vec![
                "jane@example.com".to_string(),
                "jane.doe@example.com".to_string(),
                "janedoe@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_patterns_sanitization() {
        let patterns = FullPatternProvider.generate("  Jane%$ ", " Doe JR.", "test.co.uk");
        assert!(patterns.contains(&"jane.doejr@test.co.uk".to_string()));
        assert!(patterns.contains(&"jdoejr@test.co.uk".to_string()));
        assert!(!patterns
            .iter()
            .any(|p| p.contains('%') || p.contains('$') || p.contains(' ')));
    }

    #[test]
    fn test_patterns_duplicates_collapsed() {
        let patterns = FullPatternProvider.generate("test", "test", "test.com");
        let unique: std::collections::HashSet<_> = patterns.iter().collect();
        assert_eq!(patterns.len(), unique.len());
        // "test" appears in three templates but survives once.
        assert_eq!(patterns.iter().filter(|p| *p == "test@test.com").count(), 1);
        assert_eq!(patterns.len(), 9);
    }

    #[test]
    fn test_patterns_empty_or_invalid_input() {
        for provider in [
            provider_for(PatternSet::Basic),
            provider_for(PatternSet::Full),
        ] {
            assert!(provider.generate("", "doe", "example.com").is_empty());
            assert!(provider.generate("jane", "", "example.com").is_empty());
            assert!(provider.generate("jane", "doe", "").is_empty());
            assert!(provider.generate("jane", "doe", ".com").is_empty());
            assert!(provider.generate("jane", "doe", "example.").is_empty());
            assert!(provider.generate("jane", "doe", "no-dot").is_empty());
            assert!(provider.generate("$%^", "doe", "example.com").is_empty());
        }
    }

    #[test]
    fn test_pattern_set_from_str() {
        assert_eq!("basic".parse::<PatternSet>().unwrap(), PatternSet::Basic);
        assert_eq!("Full".parse::<PatternSet>().unwrap(), PatternSet::Full);
        assert!("fancy".parse::<PatternSet>().is_err());
    }
}
