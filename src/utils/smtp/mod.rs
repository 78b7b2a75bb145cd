//! SMTP probing: one-shot RCPT TO verification and catch-all detection.

mod client;
mod error;
mod result;

pub use client::{test_smtp_connectivity, SmtpVerifier};
pub use result::{ProbeStatus, RejectReason, SmtpProbeResult};
