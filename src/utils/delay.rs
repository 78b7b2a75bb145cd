//! Injectable pacing between consecutive network requests.
//!
//! The orchestrator asks the policy for a pause after each successful fetch
//! and each SMTP probe. Tests swap in [`NoDelay`] to run deterministically
//! without real sleeps.

use rand::Rng;
use std::time::Duration;

/// Decides how long to pause before the next request to the same host.
pub trait DelayPolicy: Send + Sync {
    /// `None` means no pause at all.
    fn next_pause(&self) -> Option<Duration>;
}

/// Uniform random pause within a configured range of seconds.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    min_secs: f32,
    max_secs: f32,
}

impl RandomDelay {
    pub fn new(min_secs: f32, max_secs: f32) -> Self {
        let min_secs = min_secs.max(0.0);
        Self {
            min_secs,
            max_secs: max_secs.max(min_secs),
        }
    }

    pub fn from_config(config: &crate::core::config::Config) -> Self {
        let (min, max) = config.sleep_between_requests;
        Self::new(min, max)
    }
}

impl DelayPolicy for RandomDelay {
    fn next_pause(&self) -> Option<Duration> {
        let secs = if self.max_secs > self.min_secs {
            rand::thread_rng().gen_range(self.min_secs..self.max_secs)
        } else {
            self.min_secs
        };
        (secs > 0.0).then(|| Duration::from_secs_f32(secs))
    }
}

/// No-op policy for deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn next_pause(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_stays_in_range() {
        let policy = RandomDelay::new(0.2, 1.0);
        for _ in 0..100 {
            let pause = policy.next_pause().unwrap();
            assert!(pause >= Duration::from_secs_f32(0.2));
            assert!(pause < Duration::from_secs_f32(1.0));
        }
    }

    #[test]
    fn test_random_delay_degenerate_range() {
        let policy = RandomDelay::new(0.5, 0.5);
        assert_eq!(policy.next_pause(), Some(Duration::from_secs_f32(0.5)));
        let zero = RandomDelay::new(0.0, 0.0);
        assert_eq!(zero.next_pause(), None);
    }

    #[test]
    fn test_no_delay_never_pauses() {
        assert_eq!(NoDelay.next_pause(), None);
    }
}
