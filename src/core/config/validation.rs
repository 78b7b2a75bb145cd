//! Contains validation logic for the final Config struct.

use super::Config;
use crate::core::error::{AppError, Result};

/// Validates the configuration after loading and overrides.
/// Mutates the config to clamp values where a warning is enough.
/// Internal helper for the builder's `build` method.
pub(crate) fn validate_config(config: &mut Config) -> Result<()> {
    if config.sleep_between_requests.0 < 0.0 || config.sleep_between_requests.1 < 0.0 {
        return Err(AppError::Config(
            "Sleep durations cannot be negative.".to_string(),
        ));
    }
    if config.sleep_between_requests.0 > config.sleep_between_requests.1 {
        tracing::warn!(
            "Min sleep ({:.2}s) > max sleep ({:.2}s). Setting max sleep = min sleep.",
            config.sleep_between_requests.0,
            config.sleep_between_requests.1
        );
        config.sleep_between_requests.1 = config.sleep_between_requests.0;
    }
    if !config.smtp_sender_email.contains('@') || !config.smtp_sender_email.contains('.') {
        return Err(AppError::Config(format!(
            "Invalid SMTP sender email format: {}",
            config.smtp_sender_email
        )));
    }
    if config.max_concurrency == 0 {
        tracing::warn!("Max concurrency was set to 0. Setting to 1.");
        config.max_concurrency = 1;
    }
    if config.common_pages.is_empty() {
        tracing::warn!("Common pages list is empty; crawling will fetch nothing.");
    }
    if config.max_pages == 0 {
        tracing::warn!("Max pages is 0; discovery will rely on pattern guessing only.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_sleep_rejected() {
        let mut config = Config {
            sleep_between_requests: (-0.5, 1.0),
            ..Config::default()
        };
        assert!(validate_config(&mut config).is_err());
    }

    #[test]
    fn test_inverted_sleep_range_clamped() {
        let mut config = Config {
            sleep_between_requests: (2.0, 1.0),
            ..Config::default()
        };
        validate_config(&mut config).unwrap();
        assert_eq!(config.sleep_between_requests, (2.0, 2.0));
    }

    #[test]
    fn test_bad_sender_rejected() {
        let mut config = Config {
            smtp_sender_email: "not-an-address".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&mut config).is_err());
    }

    #[test]
    fn test_zero_concurrency_bumped() {
        let mut config = Config {
            max_concurrency: 0,
            ..Config::default()
        };
        validate_config(&mut config).unwrap();
        assert_eq!(config.max_concurrency, 1);
    }
}
