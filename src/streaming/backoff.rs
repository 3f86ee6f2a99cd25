//! Bounded exponential reconnect delay with jitter.

use std::time::Duration;

use rand::Rng;

/// Configuration for the reconnect policy
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnect; zero reconnects immediately
    pub initial_delay: Duration,
    /// Cap on exponential growth
    pub max_delay: Duration,
    /// Multiplier applied after each consecutive failure
    pub multiplier: f64,
    /// Add up to `jitter_fraction * delay` of random delay
    pub jitter_fraction: f64,
    /// Minimum wait after the upstream asked us to slow down
    pub rate_limit_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(320),
            multiplier: 2.0,
            jitter_fraction: 0.1,
            rate_limit_delay: Duration::from_secs(60),
        }
    }
}

impl ReconnectConfig {
    pub fn with_initial_delay(initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            ..Default::default()
        }
    }
}

/// Tracks consecutive reconnect attempts and computes the next delay
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    attempt: u32,
}

impl ReconnectPolicy {
    pub fn new(config: ReconnectConfig) -> Self {
        Self { config, attempt: 0 }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Forget past failures after a session that delivered data
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Delay before the next reconnect, without jitter
    pub fn base_delay(&self, rate_limited: bool) -> Duration {
        let exponent = self.attempt.saturating_sub(1).min(30) as i32;
        let base = self.config.initial_delay.as_secs_f64() * self.config.multiplier.powi(exponent);
        let capped = Duration::from_secs_f64(base.min(self.config.max_delay.as_secs_f64()));

        if rate_limited {
            capped.max(self.config.rate_limit_delay)
        } else {
            capped
        }
    }

    /// Record a failed or ended session and return how long to wait
    pub fn next_delay(&mut self, rate_limited: bool) -> Duration {
        self.attempt = self.attempt.saturating_add(1);
        let base = self.base_delay(rate_limited);

        let max_jitter = base.as_secs_f64() * self.config.jitter_fraction;
        if max_jitter <= 0.0 {
            return base;
        }
        base + Duration::from_secs_f64(rand::rng().random_range(0.0..=max_jitter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(initial_ms: u64) -> ReconnectPolicy {
        ReconnectPolicy::new(ReconnectConfig {
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(1_000),
            multiplier: 2.0,
            jitter_fraction: 0.0,
            rate_limit_delay: Duration::from_secs(60),
        })
    }

    #[test]
    fn doubles_per_attempt() {
        let mut policy = no_jitter(100);
        assert_eq!(policy.next_delay(false), Duration::from_millis(100));
        assert_eq!(policy.next_delay(false), Duration::from_millis(200));
        assert_eq!(policy.next_delay(false), Duration::from_millis(400));
        assert_eq!(policy.attempt(), 3);
    }

    #[test]
    fn capped_at_max() {
        let mut policy = no_jitter(100);
        for _ in 0..10 {
            policy.next_delay(false);
        }
        assert_eq!(policy.next_delay(false), Duration::from_millis(1_000));
    }

    #[test]
    fn reset_starts_over() {
        let mut policy = no_jitter(100);
        policy.next_delay(false);
        policy.next_delay(false);
        policy.reset();
        assert_eq!(policy.next_delay(false), Duration::from_millis(100));
    }

    #[test]
    fn zero_initial_delay_retries_immediately() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::with_initial_delay(Duration::ZERO));
        for _ in 0..5 {
            assert_eq!(policy.next_delay(false), Duration::ZERO);
        }
    }

    #[test]
    fn rate_limit_enforces_floor() {
        let mut policy = no_jitter(100);
        assert_eq!(policy.next_delay(true), Duration::from_secs(60));
    }

    #[test]
    fn jitter_stays_within_fraction() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_fraction: 0.1,
            rate_limit_delay: Duration::from_secs(60),
        });
        let delay = policy.next_delay(false);
        assert!(delay >= Duration::from_secs(1));
        assert!(delay <= Duration::from_millis(1_100));
    }
}
