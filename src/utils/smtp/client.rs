//! SMTP RCPT TO probing and catch-all detection.
//!
//! One probe is one dialogue: connect on port 25, EHLO, a dummy MAIL FROM,
//! RCPT TO the candidate, QUIT. There are no retries and no STARTTLS
//! re-connect; anything that goes wrong classifies as a rejection with a
//! reason code.

use super::error::handle_smtp_error;
use super::result::{RejectReason, SmtpProbeResult};
use crate::core::config::Config;
use crate::core::error::{AppError, Result};

use lettre::transport::smtp::client::SmtpConnection;
use lettre::transport::smtp::commands::{Ehlo, Mail, Rcpt};
use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::response::Response;
use lettre::Address;
use rand::Rng;
use std::net::ToSocketAddrs;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const SMTP_PORT: u16 = 25;

/// Client for probing mailbox deliverability via SMTP.
#[derive(Clone)]
pub struct SmtpVerifier {
    config: Arc<Config>,
}

impl SmtpVerifier {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Performs a one-shot RCPT TO probe for `email` against `mail_server`.
    ///
    /// Acceptance is strictly response code 250 (251 too when the lenient
    /// `accept_forwarded_recipients` setting is on). Every transport or
    /// protocol failure maps to a rejection; this never returns an error.
    pub async fn verify(&self, email: &str, mail_server: &str) -> SmtpProbeResult {
        tracing::debug!(target: "smtp_task",
            "Starting SMTP check for <{}> via {}", email, mail_server);

        let recipient = match Address::from_str(email) {
            Ok(addr) => addr,
            Err(e) => {
                return SmtpProbeResult::rejected(
                    RejectReason::InvalidAddress,
                    format!("Invalid email format: {}", e),
                );
            }
        };
        let sender = match Address::from_str(&self.config.smtp_sender_email) {
            Ok(addr) => addr,
            Err(e) => {
                // Config validation should make this unreachable.
                return SmtpProbeResult::rejected(
                    RejectReason::InvalidAddress,
                    format!("Invalid sender address in config: {}", e),
                );
            }
        };

        let socket_addr = match (mail_server, SMTP_PORT)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
        {
            Some(addr) => addr,
            None => {
                tracing::debug!(target: "smtp_task",
                    "Could not resolve mail server address: {}", mail_server);
                return SmtpProbeResult::rejected(
                    RejectReason::ServerUnresolvable,
                    format!("Could not resolve mail server address: {}", mail_server),
                );
            }
        };

        // Local hostname if available, "localhost" otherwise.
        let helo_name = ClientId::default();

        let mut conn = match SmtpConnection::connect(
            socket_addr,
            Some(self.config.smtp_timeout),
            &helo_name,
            None,
            None,
        ) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::debug!(target: "smtp_task",
                    "SMTP connection to {} failed: {}", mail_server, e);
                return handle_smtp_error(&e, mail_server);
            }
        };

        if let Err(e) = conn.command(Ehlo::new(helo_name.clone())) {
            let result = handle_smtp_error(&e, mail_server);
            conn.quit().ok();
            return result;
        }

        tracing::trace!(target: "smtp_task",
            "Sending MAIL FROM:<{}> to {}", self.config.smtp_sender_email, mail_server);
        match conn.command(Mail::new(Some(sender), vec![])) {
            Ok(response) if response.is_positive() => {}
            Ok(response) => {
                let message = response.message().collect::<Vec<&str>>().join(" ");
                conn.quit().ok();
                return SmtpProbeResult::rejected(
                    RejectReason::SenderRefused,
                    format!("MAIL FROM rejected: {} {}", response.code(), message),
                );
            }
            Err(e) => {
                let result = handle_smtp_error(&e, mail_server);
                conn.quit().ok();
                return result;
            }
        }

        tracing::trace!(target: "smtp_task", "Sending RCPT TO:<{}> to {}", email, mail_server);
        let outcome = match conn.command(Rcpt::new(recipient, vec![])) {
            Ok(response) => self.classify_rcpt_response(&response),
            Err(e) => handle_smtp_error(&e, mail_server),
        };
        conn.quit().ok();

        tracing::info!(target: "smtp_task",
            "SMTP probe for <{}> via {}: {:?}", email, mail_server, outcome.status);
        outcome
    }

    /// Detects whether `domain` accepts mail for any local part.
    ///
    /// Probes a long random alphabetic local part that is almost certainly
    /// unassigned; if the server accepts it, positive verification on this
    /// domain is meaningless.
    pub async fn is_catch_all(&self, domain: &str, mail_server: &str) -> bool {
        let probe_address = format!("{}@{}", random_local_part(), domain);
        tracing::debug!(target: "smtp_task",
            "Catch-all check for {} with RCPT TO:<{}>", domain, probe_address);

        let result = self.verify(&probe_address, mail_server).await;
        if result.is_accepted() {
            tracing::warn!(target: "smtp_task",
                "Domain {} (MX {}) accepted random address {}; treating as catch-all",
                domain, mail_server, probe_address);
        }
        result.is_accepted()
    }

    fn classify_rcpt_response(&self, response: &Response) -> SmtpProbeResult {
        let code = response.code();
        let message = response.message().collect::<Vec<&str>>().join(" ");
        let code_str = code.to_string();

        if code_str == "250" || (self.config.accept_forwarded_recipients && code_str == "251") {
            return SmtpProbeResult::accepted(format!("SMTP accepted: {} {}", code, message));
        }

        if code_str.starts_with('4') {
            // Greylisting and tarpits land here; still a rejection for us.
            return SmtpProbeResult::rejected(
                RejectReason::RecipientRefused,
                format!("SMTP temporary failure (4xx): {} {}", code, message),
            );
        }

        SmtpProbeResult::rejected(
            RejectReason::RecipientRefused,
            format!("SMTP rejected: {} {}", code, message),
        )
    }
}

/// 20 random lower-case ASCII letters.
fn random_local_part() -> String {
    let mut rng = rand::thread_rng();
    (0..20).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Tests outbound SMTP (port 25) connectivity against a known reliable MX.
/// Helps diagnose environments where outbound port 25 is blocked.
pub async fn test_smtp_connectivity() -> Result<()> {
    let test_server = "gmail-smtp-in.l.google.com";

    tracing::info!("Testing outbound SMTP (port 25) connectivity to {}...", test_server);

    let socket_addr = match (test_server, SMTP_PORT)
        .to_socket_addrs()
        .map_err(|e| AppError::Dns(format!("DNS resolution failed for {}: {}", test_server, e)))?
        .next()
    {
        Some(addr) => addr,
        None => {
            return Err(AppError::Dns(format!(
                "Could not resolve any IP address for {}",
                test_server
            )));
        }
    };

    let helo_name = ClientId::default();
    let timeout = Duration::from_secs(5);

    match tokio::time::timeout(timeout, async {
        SmtpConnection::connect(socket_addr, Some(timeout), &helo_name, None, None)
    })
    .await
    {
        Ok(Ok(mut conn)) => {
            tracing::info!("SMTP connectivity test successful (connected to {}).", test_server);
            conn.quit().ok();
            Ok(())
        }
        Ok(Err(e)) => {
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("connection refused") || err_str.contains("network is unreachable")
            {
                Err(AppError::SmtpConnectivity(format!(
                    "Connection to {} refused or network unreachable. Check firewall or network settings.",
                    test_server
                )))
            } else {
                Err(AppError::Smtp(e))
            }
        }
        Err(_) => Err(AppError::SmtpConnectivity(
            "SMTP connection timed out - outbound port 25 is likely blocked.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_local_part_shape() {
        let local = random_local_part();
        assert_eq!(local.len(), 20);
        assert!(local.chars().all(|c| c.is_ascii_lowercase()));
        // Two samples colliding would be a one-in-26^20 event.
        assert_ne!(local, random_local_part());
    }
}
