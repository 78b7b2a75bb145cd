//! Structured outcomes for SMTP verification probes.

/// Why a probe was classified as rejected.
///
/// A rejection never proves the mailbox is missing: connection problems and
/// greylisting land here too. Callers must read `Rejected` as
/// "unverifiable", not as proof of non-existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The candidate string is not a syntactically valid address.
    InvalidAddress,
    /// The mail server hostname did not resolve to a socket address.
    ServerUnresolvable,
    /// TCP connect failed or timed out (outbound port 25 may be blocked).
    ConnectionFailed,
    /// The dialogue broke down before a RCPT TO response, including
    /// TLS-required responses. No second connection is attempted.
    ProtocolError,
    /// The server refused our MAIL FROM sender.
    SenderRefused,
    /// The server returned a non-accept code for RCPT TO.
    RecipientRefused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Accepted,
    Rejected(RejectReason),
}

/// Result of one RCPT TO probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeResult {
    pub status: ProbeStatus,
    pub message: String,
}

impl SmtpProbeResult {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Accepted,
            message: message.into(),
        }
    }

    pub fn rejected(reason: RejectReason, message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Rejected(reason),
            message: message.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.status, ProbeStatus::Accepted)
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self.status {
            ProbeStatus::Rejected(reason) => Some(reason),
            ProbeStatus::Accepted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_result() {
        let result = SmtpProbeResult::accepted("250 OK");
        assert!(result.is_accepted());
        assert_eq!(result.reject_reason(), None);
    }

    #[test]
    fn test_rejected_result_carries_reason() {
        let result = SmtpProbeResult::rejected(RejectReason::RecipientRefused, "550 no such user");
        assert!(!result.is_accepted());
        assert_eq!(result.reject_reason(), Some(RejectReason::RecipientRefused));
        assert!(result.message.contains("550"));
    }
}
