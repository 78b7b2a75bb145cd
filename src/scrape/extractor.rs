//! Scans raw text for address-shaped substrings, filtering junk domains.

use crate::core::config::Config;
use regex::Regex;
use std::collections::HashSet;

pub struct EmailExtractor {
    email_regex: Regex,
    blacklisted_domains: HashSet<String>,
}

impl EmailExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            email_regex: Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+")
                .expect("email pattern is valid"),
            blacklisted_domains: config.blacklisted_domains.clone(),
        }
    }

    /// Extracts candidate addresses from arbitrary text, lower-cased.
    ///
    /// Matches whose domain portion contains a blacklisted entry (social
    /// networks, placeholder domains) are dropped: they are never genuine
    /// company contacts. Image filenames (`logo@2x.png`) match the address
    /// shape too and are filtered out.
    pub fn extract(&self, text: &str) -> HashSet<String> {
        self.email_regex
            .find_iter(text)
            // The host class is greedy and swallows sentence punctuation.
            .map(|m| m.as_str().trim_end_matches(&['.', '-'][..]).to_lowercase())
            .filter(|email| !is_asset_filename(email))
            .filter(|email| self.domain_allowed(email))
            .collect()
    }

    fn domain_allowed(&self, email: &str) -> bool {
        let domain = email.split('@').nth(1).unwrap_or("");
        !self
            .blacklisted_domains
            .iter()
            .any(|blacklisted| domain.contains(blacklisted.as_str()))
    }
}

fn is_asset_filename(email: &str) -> bool {
    const ASSET_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".webp"];
    ASSET_EXTENSIONS.iter().any(|ext| email.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigBuilder;

    fn extractor() -> EmailExtractor {
        let config = ConfigBuilder::new()
            .build()
            .expect("default config builds for test");
        EmailExtractor::new(&config)
    }

    #[test]
    fn test_extract_basic() {
        let found = extractor().extract("Reach us at info@acme.test or sales@acme.test.");
        assert!(found.contains("info@acme.test"));
        assert!(found.contains("sales@acme.test"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_extract_case_folds() {
        let found = extractor().extract("Mail Jane.Doe@Acme.TEST today");
        assert!(found.contains("jane.doe@acme.test"));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_extract_dedups() {
        let found = extractor().extract("a@b.co a@b.co A@B.CO");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_extract_filters_blacklisted_domains() {
        let found = extractor().extract("contact me at foo@linkedin.com");
        assert!(found.is_empty());

        let found = extractor().extract("real@acme.test but not fake@example.com or x@facebook.com");
        assert_eq!(found.len(), 1);
        assert!(found.contains("real@acme.test"));
    }

    #[test]
    fn test_extract_nothing_from_plain_text() {
        assert!(extractor().extract("no addresses here, just words").is_empty());
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_extract_local_part_charset() {
        let found = extractor().extract("odd+tag.name_x-y@acme.test");
        assert!(found.contains("odd+tag.name_x-y@acme.test"));
    }

    #[test]
    fn test_extract_trims_sentence_punctuation() {
        let found = extractor().extract("Mail foo@acme.test. Thanks!");
        assert!(found.contains("foo@acme.test"));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_extract_ignores_image_filenames() {
        let found = extractor().extract(r#"<img src="logo@2x.png"> write hr@acme.test"#);
        assert_eq!(found.len(), 1);
        assert!(found.contains("hr@acme.test"));
    }
}
