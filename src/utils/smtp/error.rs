//! Maps lettre transport errors onto structured probe results.

use super::result::{RejectReason, SmtpProbeResult};
use lettre::transport::smtp::Error as SmtpError;

/// Interprets a `lettre` SMTP error into a rejected probe result with a
/// reason code. Nothing here ever propagates: a transport failure is a
/// rejection, full stop.
pub(crate) fn handle_smtp_error(error: &SmtpError, server: &str) -> SmtpProbeResult {
    let err_string = error.to_string().to_lowercase();

    if err_string.contains("timed out")
        || err_string.contains("connection refused")
        || err_string.contains("connection reset")
        || err_string.contains("network is unreachable")
    {
        tracing::debug!(target: "smtp_task",
            "SMTP connection failed for {}: {}. Port 25 may be blocked.", server, error);
        return SmtpProbeResult::rejected(
            RejectReason::ConnectionFailed,
            format!("Connection failed ({})", error),
        );
    }

    if err_string.contains("550")
        && (err_string.contains("does not exist")
            || err_string.contains("no such user")
            || err_string.contains("user unknown")
            || err_string.contains("recipient not found")
            || err_string.contains("invalid mailbox")
            || err_string.contains("mailbox unavailable")
            || err_string.contains("address rejected")
            || err_string.contains("invalid recipient")
            || err_string.contains("nosuchuser"))
    {
        tracing::debug!(target: "smtp_task",
            "SMTP error indicates user likely unknown on {}: {}", server, error);
        return SmtpProbeResult::rejected(
            RejectReason::RecipientRefused,
            format!("SMTP rejected (user likely unknown): {}", error),
        );
    }

    if err_string.contains("starttls")
        || (err_string.contains("530")
            && err_string.contains("5.7.0")
            && !err_string.contains("authentication required"))
        || err_string.contains("tls")
    {
        tracing::debug!(target: "smtp_task",
            "SMTP server {} requires or failed TLS: {}", server, error);
        return SmtpProbeResult::rejected(
            RejectReason::ProtocolError,
            format!("Server requires TLS encryption: {}", error),
        );
    }

    tracing::debug!(target: "smtp_task", "Unhandled SMTP error for {}: {}", server, error);
    SmtpProbeResult::rejected(
        RejectReason::ProtocolError,
        format!("SMTP dialogue error: {}", error),
    )
}
