//! Finds same-site links whose path suggests contact or team content.

use scraper::{Html, Selector};
use url::Url;

const LINK_KEYWORDS: [&str; 3] = ["contact", "team", "about"];

/// Collects absolute URLs for anchors pointing at contact/team/about pages.
///
/// Root-relative hrefs are resolved against `base`; other relative forms
/// are ignored on purpose (the orchestrator visits a fixed candidate path
/// list independently, so missing some links is acceptable). Absolute links
/// are kept only when they stay on the base host.
pub(crate) fn discover_contact_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("anchor selector is valid");

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href_lower = href.to_lowercase();
        if !LINK_KEYWORDS
            .iter()
            .any(|keyword| href_lower.contains(keyword))
        {
            continue;
        }

        let absolute = if href.starts_with("http://") || href.starts_with("https://") {
            match Url::parse(href) {
                Ok(url) if url.host_str() == base.host_str() => Some(url.to_string()),
                _ => None,
            }
        } else if href.starts_with('/') {
            base.join(href).ok().map(|url| url.to_string())
        } else {
            None
        };

        if let Some(link) = absolute {
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://acme.test").unwrap()
    }

    #[test]
    fn test_root_relative_links_resolved() {
        let html = r#"<a href="/contact">Contact</a><a href="/our-team">Team page</a>"#;
        let links = discover_contact_links(html, &base());
        assert_eq!(
            links,
            vec!["https://acme.test/contact", "https://acme.test/our-team"]
        );
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let html = r#"<a href="/CONTACT-us">Get in touch</a>"#;
        let links = discover_contact_links(html, &base());
        assert_eq!(links, vec!["https://acme.test/CONTACT-us"]);
    }

    #[test]
    fn test_plain_relative_links_ignored() {
        let html = r#"<a href="contact.html">Contact</a><a href="./team">Team</a>"#;
        assert!(discover_contact_links(html, &base()).is_empty());
    }

    #[test]
    fn test_absolute_links_same_host_only() {
        let html = concat!(
            r#"<a href="https://acme.test/about">About</a>"#,
            r#"<a href="https://linkedin.com/company/acme-team">LinkedIn</a>"#,
        );
        let links = discover_contact_links(html, &base());
        assert_eq!(links, vec!["https://acme.test/about"]);
    }

    #[test]
    fn test_links_without_keywords_ignored() {
        let html = r#"<a href="/pricing">Pricing</a><a href="/blog">Blog</a>"#;
        assert!(discover_contact_links(html, &base()).is_empty());
    }

    #[test]
    fn test_duplicate_links_collapsed() {
        let html = r#"<a href="/team">Team</a><a href="/team">Meet the team</a>"#;
        let links = discover_contact_links(html, &base());
        assert_eq!(links.len(), 1);
    }
}
