//! Data models for discovery requests, candidate names and results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single discovery request, as supplied by callers or input files.
///
/// Unknown fields from upstream exports (CRM rows etc.) are preserved in
/// `other_fields` and round-tripped into the output untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryRequest {
    pub domain: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify: Option<bool>,
    #[serde(flatten)]
    pub other_fields: HashMap<String, serde_json::Value>,
}

/// Per-call knobs for one discovery run.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    pub max_pages: usize,
    pub verify: bool,
}

impl DiscoveryOptions {
    pub fn from_config(config: &crate::core::config::Config) -> Self {
        Self {
            max_pages: config.max_pages,
            verify: config.verify_by_default,
        }
    }
}

/// A full name decomposed into lower-case (first, last) tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName {
    pub first: String,
    pub last: String,
}

impl CandidateName {
    /// Splits a "First [Middle] Last" string into lower-case tokens.
    ///
    /// Returns `None` unless the input has at least two whitespace-separated
    /// tokens and both the first and the last one are purely alphabetic.
    pub fn parse(full_name: &str) -> Option<Self> {
        let parts: Vec<&str> = full_name.split_whitespace().collect();
        if parts.len() < 2 {
            return None;
        }
        let first = parts[0].to_lowercase();
        let last = parts[parts.len() - 1].to_lowercase();
        if !first.chars().all(char::is_alphabetic) || !last.chars().all(char::is_alphabetic) {
            return None;
        }
        Some(Self { first, last })
    }
}

/// Where an address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSource {
    Scraped,
    Guessed,
}

/// Domain-level verification outcome for one discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    /// SMTP verification was not requested or never reached.
    #[default]
    Unchecked,
    /// MX resolved and the domain rejected a random probe address, so
    /// individual accept results are meaningful.
    Reachable,
    /// No MX records resolve; every probe counts as rejected.
    NoMailServer,
    /// The domain accepts any local part; accept results are meaningless.
    CatchAll,
}

/// One discovered address and how much we trust it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundAddress {
    pub email: String,
    pub source: AddressSource,
    /// `Some(true)` only when an SMTP probe accepted the address on a
    /// non-catch-all domain. `None` means no meaningful probe ran.
    pub verified: Option<bool>,
}

/// Full result of one discovery run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub domain: String,
    pub base_url: Option<String>,
    /// URLs the crawler attempted, in order, successful or not.
    pub pages_visited: Vec<String>,
    pub found: Vec<FoundAddress>,
    pub domain_status: DomainStatus,
    pub methods_used: Vec<String>,
}

impl DiscoveryReport {
    /// Sorted, deduplicated, lower-case union of all found addresses.
    pub fn addresses(&self) -> Vec<String> {
        let mut out: Vec<String> = self.found.iter().map(|f| f.email.clone()).collect();
        out.sort();
        out.dedup();
        out
    }
}

/// Packaged outcome for one processed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryOutcome {
    pub request: DiscoveryRequest,
    pub emails: Vec<String>,
    pub report: Option<DiscoveryReport>,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_name_basic() {
        let name = CandidateName::parse("Maria Gomez").unwrap();
        assert_eq!(name.first, "maria");
        assert_eq!(name.last, "gomez");
    }

    #[test]
    fn test_candidate_name_takes_first_and_last_token() {
        let name = CandidateName::parse("  Jean Luc Picard ").unwrap();
        assert_eq!(name.first, "jean");
        assert_eq!(name.last, "picard");
    }

    #[test]
    fn test_candidate_name_single_token_skipped() {
        assert!(CandidateName::parse("Madonna").is_none());
        assert!(CandidateName::parse("").is_none());
        assert!(CandidateName::parse("   ").is_none());
    }

    #[test]
    fn test_candidate_name_non_alphabetic_skipped() {
        assert!(CandidateName::parse("R2 D2-X").is_none());
        assert!(CandidateName::parse("John Smith3").is_none());
        // Middle tokens are not inspected.
        assert!(CandidateName::parse("John J. Smith").is_some());
    }

    #[test]
    fn test_report_addresses_sorted_and_deduped() {
        let report = DiscoveryReport {
            found: vec![
                FoundAddress {
                    email: "zoe@acme.test".into(),
                    source: AddressSource::Scraped,
                    verified: None,
                },
                FoundAddress {
                    email: "amy@acme.test".into(),
                    source: AddressSource::Guessed,
                    verified: Some(true),
                },
                FoundAddress {
                    email: "zoe@acme.test".into(),
                    source: AddressSource::Guessed,
                    verified: None,
                },
            ],
            ..Default::default()
        };
        assert_eq!(report.addresses(), vec!["amy@acme.test", "zoe@acme.test"]);
    }
}
