//! # Email Scout Core Library
//!
//! This crate provides the core logic for discovering company email
//! addresses: it scrapes a site's likely contact pages for visible
//! addresses, generates name-based pattern guesses, and optionally
//! verifies guesses with an SMTP `RCPT TO` probe (including catch-all
//! detection).
//!
//! It is designed to be used either directly as a library or via the
//! `email-scout` command-line tool (which uses this library).

mod core;
mod scrape;
mod utils;

pub use crate::core::config::{Config, ConfigBuilder, ConfigFile};
pub use crate::core::error::{AppError, Result};
pub use crate::core::models::{
    AddressSource, CandidateName, DiscoveryOptions, DiscoveryOutcome, DiscoveryReport,
    DiscoveryRequest, DomainStatus, FoundAddress,
};
pub use crate::core::scout::EmailScout;
pub use crate::utils::delay::{DelayPolicy, NoDelay, RandomDelay};
pub use crate::utils::patterns::{PatternProvider, PatternSet};
pub use crate::utils::smtp::{test_smtp_connectivity, ProbeStatus, RejectReason, SmtpProbeResult};

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;

/// Initializes shared resources like the HTTP client and DNS resolver.
/// Essential for creating an `EmailScout` instance.
pub async fn initialize_scout(config: &Config) -> Result<EmailScout> {
    EmailScout::new(config).await
}

/// Convenience entry point for one domain with default configuration.
///
/// Returns the sorted, deduplicated, lower-case list of discovered
/// addresses. Empty or unparseable `domain_or_url` yields `Ok(vec![])`.
pub async fn discover_emails(
    domain_or_url: &str,
    candidate_names: &[String],
    max_pages: usize,
    verify: bool,
) -> Result<Vec<String>> {
    let config = ConfigBuilder::new().build()?;
    let scout = EmailScout::new(&config).await?;
    let report = scout
        .discover(
            &config,
            domain_or_url,
            candidate_names,
            DiscoveryOptions { max_pages, verify },
        )
        .await?;
    Ok(report.addresses())
}

/// Processes a single request to discover addresses for one domain.
///
/// This function encapsulates validation, discovery, and result packaging
/// for one input `DiscoveryRequest`.
pub async fn discover_single(
    config: &Config,
    scout: &EmailScout,
    request: DiscoveryRequest,
) -> DiscoveryOutcome {
    let task_id = request.domain.as_deref().unwrap_or("N/A").to_string();
    tracing::info!(target: "discover_single", "[{}] Starting processing.", task_id);

    let domain_input = request.domain.as_deref().unwrap_or("").trim().to_string();
    if domain_input.is_empty() {
        tracing::warn!(target: "discover_single", "[{}] Skipping record. Reason: missing domain", task_id);
        return DiscoveryOutcome::skipped(request, "Missing domain".to_string());
    }

    let options = DiscoveryOptions {
        max_pages: request.max_pages.unwrap_or(config.max_pages),
        verify: request.verify.unwrap_or(config.verify_by_default),
    };

    match scout
        .discover(config, &domain_input, &request.names, options)
        .await
    {
        Ok(report) => {
            tracing::info!(target: "discover_single",
                "[{}] Finished processing: {} addresses.", task_id, report.found.len());
            DiscoveryOutcome::success(request, report)
        }
        Err(e) => {
            tracing::error!(target: "discover_single",
                "[{}] !!! Error during discovery: {}", task_id, e);
            DiscoveryOutcome::error(request, format!("Core discovery error: {}", e))
        }
    }
}

/// Processes a batch of requests with bounded concurrency.
///
/// Distinct requests run concurrently; each discovery run keeps its own
/// visited-set and per-host pacing, so politeness invariants hold per host.
pub async fn process_requests(
    config: Arc<Config>,
    scout: Arc<EmailScout>,
    requests: Vec<DiscoveryRequest>,
) -> Vec<DiscoveryOutcome> {
    let total_records = requests.len();
    if total_records == 0 {
        return Vec::new();
    }

    let mut tasks = FuturesUnordered::new();
    let mut results = Vec::with_capacity(total_records);

    for request in requests {
        if request.domain.as_deref().unwrap_or("").trim().is_empty() {
            results.push(DiscoveryOutcome::skipped(
                request,
                "Missing domain".to_string(),
            ));
            continue;
        }

        while tasks.len() >= config.max_concurrency {
            match tasks.next().await {
                Some(Ok(outcome)) => results.push(outcome),
                Some(Err(e)) => {
                    tracing::error!("A discovery task failed to join: {}", e);
                }
                None => {
                    tracing::warn!("Task queue unexpectedly empty while limiting concurrency.");
                    break;
                }
            }
        }

        let scout_clone = Arc::clone(&scout);
        let config_clone = Arc::clone(&config);
        tasks.push(tokio::spawn(async move {
            discover_single(&config_clone, &scout_clone, request).await
        }));
    }

    while let Some(join_result) = tasks.next().await {
        match join_result {
            Ok(outcome) => results.push(outcome),
            Err(e) => {
                tracing::error!("A discovery task failed to join during final drain: {}", e);
            }
        }
    }

    results
}

impl DiscoveryOutcome {
    fn skipped(request: DiscoveryRequest, reason: String) -> Self {
        Self {
            request,
            emails: Vec::new(),
            report: None,
            skipped: true,
            skip_reason: Some(reason),
            error: None,
        }
    }

    fn error(request: DiscoveryRequest, error_msg: String) -> Self {
        Self {
            request,
            emails: Vec::new(),
            report: None,
            skipped: false,
            skip_reason: None,
            error: Some(error_msg),
        }
    }

    fn success(request: DiscoveryRequest, report: DiscoveryReport) -> Self {
        Self {
            emails: report.addresses(),
            request,
            report: Some(report),
            skipped: false,
            skip_reason: None,
            error: None,
        }
    }
}
