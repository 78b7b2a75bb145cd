//! DNS resolver construction and mail-exchange lookups.

use crate::core::config::Config;
use crate::core::error::{AppError, Result};
use std::net::IpAddr;
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::TokioAsyncResolver;

/// The chosen mail exchange for a domain.
#[derive(Debug, Clone)]
pub struct MailServer {
    pub exchange: String,
    pub preference: u16,
}

/// Builds the shared resolver, honoring configured DNS servers if any.
pub(crate) async fn create_resolver(config: &Config) -> Result<TokioAsyncResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = config.dns_timeout;

    let resolver_config = if config.dns_servers.is_empty() {
        ResolverConfig::default()
    } else {
        let ips: Vec<IpAddr> = config
            .dns_servers
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        if ips.is_empty() {
            tracing::warn!(
                "None of the configured DNS servers parsed as an IP address; using defaults."
            );
            ResolverConfig::default()
        } else {
            ResolverConfig::from_parts(
                None,
                vec![],
                NameServerConfigGroup::from_ips_clear(&ips, 53, true),
            )
        }
    };

    Ok(TokioAsyncResolver::tokio(resolver_config, opts))
}

/// Resolves the lowest-preference (highest-priority) MX host for `domain`.
///
/// A domain with no MX records yields `AppError::NoMxRecords`; callers treat
/// that as a legitimate terminal outcome, not something to retry.
pub(crate) async fn resolve_mail_server(
    resolver: &TokioAsyncResolver,
    domain: &str,
) -> Result<MailServer> {
    tracing::debug!(target: "dns_task", "Resolving MX records for {}", domain);

    match resolver.mx_lookup(domain).await {
        Ok(lookup) => lookup
            .iter()
            .min_by_key(|mx| mx.preference())
            .map(|mx| MailServer {
                exchange: mx.exchange().to_utf8().trim_end_matches('.').to_string(),
                preference: mx.preference(),
            })
            .ok_or_else(|| AppError::NoMxRecords(domain.to_string())),
        Err(e) => match e.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => {
                Err(AppError::NoMxRecords(domain.to_string()))
            }
            _ => Err(AppError::Dns(e.to_string())),
        },
    }
}
