//! Runtime configuration for the discovery core.
//!
//! The core never reads the process environment itself: the CLI maps env
//! vars onto builder calls, and everything ends up in one immutable
//! [`Config`] passed explicitly to the components that need it.

mod builder;
mod loading;
mod validation;

pub use builder::ConfigBuilder;

use crate::utils::patterns::PatternSet;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Immutable runtime configuration. Build via [`ConfigBuilder`].
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP request timeout for page fetches.
    pub request_timeout: Duration,
    /// Identifying user-agent sent with every page fetch.
    pub user_agent: String,
    /// (min, max) seconds of randomized polite delay between requests.
    pub sleep_between_requests: (f32, f32),
    /// Timeout for MX lookups.
    pub dns_timeout: Duration,
    /// DNS servers for MX lookups; empty means resolver defaults.
    pub dns_servers: Vec<String>,
    /// Timeout covering SMTP connect and each command.
    pub smtp_timeout: Duration,
    /// Dummy sender used in MAIL FROM probes.
    pub smtp_sender_email: String,
    /// Lenient mode: also accept response code 251 (will forward).
    pub accept_forwarded_recipients: bool,
    /// Site paths seeded into every crawl; "" is the homepage.
    pub common_pages: Vec<String>,
    /// Crawl budget: maximum pages attempted per discovery run.
    pub max_pages: usize,
    /// Whether guessed addresses are SMTP-verified unless overridden per call.
    pub verify_by_default: bool,
    /// Concurrent discovery tasks in batch mode.
    pub max_concurrency: usize,
    /// Pattern template set used for guessing.
    pub pattern_set: PatternSet,
    /// Email domains never treated as genuine company contacts.
    pub blacklisted_domains: HashSet<String>,
    /// URLs matching this are never fetched.
    pub binary_extension_re: Regex,
    /// Anchored shape check for complete addresses.
    pub email_regex: Regex,
    pub loaded_config_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(8),
            user_agent: "Mozilla/5.0 (EmailScoutBot/1.0; +https://example.com/bot)".to_string(),
            sleep_between_requests: (0.2, 1.0),
            dns_timeout: Duration::from_secs(7),
            dns_servers: Vec::new(),
            smtp_timeout: Duration::from_secs(10),
            smtp_sender_email: "probe@yourdomain.org".to_string(),
            accept_forwarded_recipients: false,
            common_pages: [
                "",
                "contact",
                "team",
                "about",
                "our-team",
                "leadership",
                "who-we-are",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_pages: 6,
            verify_by_default: true,
            max_concurrency: 4,
            pattern_set: PatternSet::default(),
            blacklisted_domains: [
                "linkedin.com",
                "facebook.com",
                "twitter.com",
                "instagram.com",
                "youtube.com",
                "example.com",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            binary_extension_re: Regex::new(r"(?i)\.(pdf|png|jpe?g|gif|zip|docx?|pptx?)$")
                .expect("binary extension pattern is valid"),
            email_regex: Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$")
                .expect("email pattern is valid"),
            loaded_config_path: None,
        }
    }
}

/// On-disk configuration file schema (all fields optional, merged over
/// defaults).
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub dns: DnsSection,
    #[serde(default)]
    pub smtp: SmtpSection,
    #[serde(default)]
    pub scraping: ScrapingSection,
    #[serde(default)]
    pub discovery: DiscoverySection,
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkSection {
    pub request_timeout: Option<u64>,
    pub min_sleep: Option<f32>,
    pub max_sleep: Option<f32>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DnsSection {
    pub dns_timeout: Option<u64>,
    pub dns_servers: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SmtpSection {
    pub smtp_timeout: Option<u64>,
    pub smtp_sender_email: Option<String>,
    pub accept_forwarded_recipients: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScrapingSection {
    pub common_pages: Option<Vec<String>>,
    pub blacklisted_domains: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverySection {
    pub max_pages: Option<usize>,
    pub verify: Option<bool>,
    pub max_concurrency: Option<usize>,
    pub pattern_set: Option<PatternSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.max_pages, 6);
        assert_eq!(config.common_pages.len(), 7);
        assert_eq!(config.common_pages[0], "");
        assert!(config.blacklisted_domains.contains("linkedin.com"));
        assert!(config.blacklisted_domains.contains("example.com"));
        assert!(config.verify_by_default);
        assert_eq!(config.pattern_set, PatternSet::Full);
        assert!(config.email_regex.is_match("jane.doe@example.com"));
        assert!(!config.email_regex.is_match("not-an-email"));
    }

    #[test]
    fn test_binary_extension_matching() {
        let config = Config::default();
        assert!(config.binary_extension_re.is_match("https://a.test/brochure.pdf"));
        assert!(config.binary_extension_re.is_match("https://a.test/logo.JPEG"));
        assert!(config.binary_extension_re.is_match("https://a.test/deck.pptx"));
        assert!(!config.binary_extension_re.is_match("https://a.test/contact"));
        assert!(!config.binary_extension_re.is_match("https://a.test/pdf-guide"));
    }
}
