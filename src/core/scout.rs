//! The discovery orchestrator: crawl, extract, guess, verify.

use crate::core::config::Config;
use crate::core::error::{AppError, Result};
use crate::core::models::{
    AddressSource, CandidateName, DiscoveryOptions, DiscoveryReport, DomainStatus, FoundAddress,
};
use crate::scrape::extractor::EmailExtractor;
use crate::scrape::fetcher::{fetch_page, FetchOutcome};
use crate::scrape::links::discover_contact_links;
use crate::utils::delay::{DelayPolicy, RandomDelay};
use crate::utils::dns::{create_resolver, resolve_mail_server, MailServer};
use crate::utils::domain::{get_domain_from_url, normalize_url};
use crate::utils::patterns::{provider_for, PatternProvider};
use crate::utils::smtp::SmtpVerifier;

use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;
use trust_dns_resolver::TokioAsyncResolver;
use url::Url;

/// The main struct orchestrating email discovery.
///
/// Holds the shared HTTP client, DNS resolver and SMTP verifier. All
/// per-run state (visited pages, found addresses) lives inside one
/// [`discover`](EmailScout::discover) call and is dropped on return.
#[derive(Clone)]
pub struct EmailScout {
    http_client: Arc<Client>,
    dns_resolver: Arc<TokioAsyncResolver>,
    smtp_verifier: SmtpVerifier,
    extractor: Arc<EmailExtractor>,
    patterns: Arc<dyn PatternProvider>,
    delay: Arc<dyn DelayPolicy>,
}

impl EmailScout {
    /// Creates a new EmailScout instance.
    pub(crate) async fn new(config: &Config) -> Result<Self> {
        tracing::debug!("Initializing EmailScout components...");
        let http_client = Arc::new(
            Client::builder()
                .user_agent(&config.user_agent)
                .timeout(config.request_timeout)
                .build()
                .map_err(|e| {
                    AppError::Initialization(format!("Failed to build HTTP client: {}", e))
                })?,
        );
        let dns_resolver = Arc::new(create_resolver(config).await?);
        let smtp_verifier = SmtpVerifier::new(Arc::new(config.clone()));
        let extractor = Arc::new(EmailExtractor::new(config));
        let patterns: Arc<dyn PatternProvider> = Arc::from(provider_for(config.pattern_set));
        let delay: Arc<dyn DelayPolicy> = Arc::new(RandomDelay::from_config(config));

        tracing::debug!("EmailScout initialized successfully.");
        Ok(Self {
            http_client,
            dns_resolver,
            smtp_verifier,
            extractor,
            patterns,
            delay,
        })
    }

    /// Replaces the pacing policy. Tests use [`NoDelay`](crate::NoDelay) to
    /// run without real sleeps.
    pub fn with_delay_policy(mut self, delay: Arc<dyn DelayPolicy>) -> Self {
        self.delay = delay;
        self
    }

    /// Runs one full discovery pass for a domain.
    ///
    /// Empty or unparseable input terminates immediately with an empty
    /// report; that is a valid result, not an error.
    pub async fn discover(
        &self,
        config: &Config,
        domain_or_url: &str,
        candidate_names: &[String],
        options: DiscoveryOptions,
    ) -> Result<DiscoveryReport> {
        let start_time = Instant::now();
        let mut report = DiscoveryReport::default();

        let trimmed = domain_or_url.trim();
        if trimmed.is_empty() {
            return Ok(report);
        }
        let base_url = match normalize_url(trimmed) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(target: "discovery_task",
                    "Cannot normalize '{}' ({}); returning empty result", trimmed, e);
                return Ok(report);
            }
        };
        let domain = match get_domain_from_url(trimmed) {
            Ok(domain) => domain,
            Err(e) => {
                tracing::warn!(target: "discovery_task",
                    "Cannot extract domain from '{}' ({}); returning empty result", trimmed, e);
                return Ok(report);
            }
        };

        // Base never keeps a trailing slash: it is the prefix for path joins.
        let base = base_url.as_str().trim_end_matches('/').to_string();
        report.domain = domain.clone();
        report.base_url = Some(base.clone());

        tracing::info!(target: "discovery_task",
            "[{}] Starting email discovery (max_pages={}, verify={})",
            domain, options.max_pages, options.verify);

        let mut found: Vec<FoundAddress> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        self.crawl_pages(config, &base, &base_url, options.max_pages, &mut report, &mut found, &mut seen)
            .await;

        if !candidate_names.is_empty() {
            self.guess_addresses(
                config,
                &domain,
                candidate_names,
                options.verify,
                &mut report,
                &mut found,
                &mut seen,
            )
            .await;
        }

        found.sort_by(|a, b| a.email.cmp(&b.email));
        report.found = found;

        tracing::info!(target: "discovery_task",
            "[{}] Discovery finished in {:.2?}: {} addresses (domain status: {:?})",
            domain, start_time.elapsed(), report.found.len(), report.domain_status);
        Ok(report)
    }

    /// Crawls the seeded page set, extracting addresses and opportunistically
    /// following contact/team/about links while the budget lasts.
    #[allow(clippy::too_many_arguments)]
    async fn crawl_pages(
        &self,
        config: &Config,
        base: &str,
        base_url: &Url,
        max_pages: usize,
        report: &mut DiscoveryReport,
        found: &mut Vec<FoundAddress>,
        seen: &mut HashSet<String>,
    ) {
        if max_pages == 0 {
            return;
        }

        let mut queue: VecDeque<String> = config
            .common_pages
            .iter()
            .take(max_pages)
            .map(|path| {
                if path.is_empty() {
                    base.to_string()
                } else {
                    format!("{}/{}", base, path)
                }
            })
            .collect();
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(url) = queue.pop_front() {
            if visited.len() >= max_pages {
                break;
            }
            if visited.contains(&url) || config.binary_extension_re.is_match(&url) {
                continue;
            }
            // Attempted URLs count against the budget whatever happens next;
            // this is what guarantees termination.
            visited.insert(url.clone());
            report.pages_visited.push(url.clone());

            let html = match fetch_page(&self.http_client, &url).await {
                FetchOutcome::Html(html) => html,
                FetchOutcome::Skipped(reason) => {
                    tracing::debug!(target: "discovery_task",
                        "No content from {} ({:?})", url, reason);
                    continue;
                }
            };

            let extracted = self.extractor.extract(&html);
            if !extracted.is_empty()
                && !report.methods_used.iter().any(|m| m == "website_scraping")
            {
                report.methods_used.push("website_scraping".to_string());
            }
            for email in extracted {
                if seen.insert(email.clone()) {
                    tracing::debug!(target: "discovery_task", "Scraped address {} from {}", email, url);
                    found.push(FoundAddress {
                        email,
                        source: AddressSource::Scraped,
                        verified: None,
                    });
                }
            }

            if visited.len() < max_pages {
                for link in discover_contact_links(&html, base_url) {
                    if !visited.contains(&link) && !config.binary_extension_re.is_match(&link) {
                        tracing::trace!(target: "discovery_task", "Queued discovered link {}", link);
                        queue.push_back(link);
                    }
                }
            }

            if let Some(pause) = self.delay.next_pause() {
                sleep(pause).await;
            }
        }
    }

    /// Generates pattern-based guesses for each valid name and, when
    /// requested, keeps only the SMTP-accepted ones.
    #[allow(clippy::too_many_arguments)]
    async fn guess_addresses(
        &self,
        config: &Config,
        domain: &str,
        candidate_names: &[String],
        verify: bool,
        report: &mut DiscoveryReport,
        found: &mut Vec<FoundAddress>,
        seen: &mut HashSet<String>,
    ) {
        let pairs: Vec<CandidateName> = candidate_names
            .iter()
            .filter_map(|name| {
                let parsed = CandidateName::parse(name);
                if parsed.is_none() {
                    tracing::debug!(target: "discovery_task",
                        "Skipping name '{}': needs at least two alphabetic tokens", name);
                }
                parsed
            })
            .collect();
        if pairs.is_empty() {
            return;
        }

        report.methods_used.push("pattern_generation".to_string());

        let mut mail_server: Option<MailServer> = None;
        if verify {
            report.methods_used.push("smtp_verification".to_string());
            match resolve_mail_server(&self.dns_resolver, domain).await {
                Ok(server) => {
                    tracing::info!(target: "discovery_task",
                        "Using mail server {} (preference {}) for domain {}",
                        server.exchange, server.preference, domain);
                    // Catch-all status must be settled before any individual
                    // accept result can be trusted.
                    if self.smtp_verifier.is_catch_all(domain, &server.exchange).await {
                        report.domain_status = DomainStatus::CatchAll;
                    } else {
                        report.domain_status = DomainStatus::Reachable;
                        mail_server = Some(server);
                    }
                }
                Err(AppError::NoMxRecords(_)) => {
                    tracing::warn!(target: "discovery_task",
                        "No MX records for {}; guessed addresses cannot be verified", domain);
                    report.domain_status = DomainStatus::NoMailServer;
                }
                Err(e) => {
                    tracing::warn!(target: "discovery_task",
                        "DNS lookup failed for {} ({}); guessed addresses cannot be verified",
                        domain, e);
                    report.domain_status = DomainStatus::NoMailServer;
                }
            }
        }

        for pair in &pairs {
            for guess in self.patterns.generate(&pair.first, &pair.last, domain) {
                let guess = guess.to_lowercase();
                if seen.contains(&guess) {
                    continue;
                }
                if !config.email_regex.is_match(&guess) {
                    tracing::trace!(target: "discovery_task",
                        "Generated pattern failed shape validation: {}", guess);
                    continue;
                }

                let entry = if !verify {
                    Some(FoundAddress {
                        email: guess.clone(),
                        source: AddressSource::Guessed,
                        verified: None,
                    })
                } else {
                    match report.domain_status {
                        // Verification is meaningless here; keep the guess
                        // but never mark it verified.
                        DomainStatus::CatchAll => Some(FoundAddress {
                            email: guess.clone(),
                            source: AddressSource::Guessed,
                            verified: None,
                        }),
                        // Without a mail server every probe would reject, so
                        // nothing from guessing survives.
                        DomainStatus::NoMailServer => None,
                        _ => {
                            let exchange = mail_server
                                .as_ref()
                                .map(|server| server.exchange.as_str())
                                .unwrap_or_default();
                            let probe = self.smtp_verifier.verify(&guess, exchange).await;
                            if let Some(pause) = self.delay.next_pause() {
                                sleep(pause).await;
                            }
                            if probe.is_accepted() {
                                Some(FoundAddress {
                                    email: guess.clone(),
                                    source: AddressSource::Guessed,
                                    verified: Some(true),
                                })
                            } else {
                                tracing::debug!(target: "discovery_task",
                                    "Discarding {}: {}", guess, probe.message);
                                None
                            }
                        }
                    }
                };

                if let Some(address) = entry {
                    seen.insert(guess);
                    found.push(address);
                }
            }
        }
    }
}
