//! Application-level error types shared across the crate.
//!
//! Network and protocol failures inside the discovery flow are deliberately
//! NOT represented here: the fetcher and the SMTP verifier downgrade them to
//! structured "no result" values. `AppError` covers setup and input problems
//! that a caller can actually act on.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization error: {0}")]
    Initialization(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Could not extract domain: {0}")]
    DomainExtraction(String),

    #[error("Insufficient input: {0}")]
    InsufficientInput(String),

    #[error("DNS resolution failed: {0}")]
    Dns(String),

    #[error("No MX records found for domain: {0}")]
    NoMxRecords(String),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("SMTP connectivity problem: {0}")]
    SmtpConnectivity(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
