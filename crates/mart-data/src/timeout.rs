//! Timeout configuration for API requests.

use std::time::Duration;

/// Timeout configuration for the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout.
    pub connect: Duration,
    /// Total request timeout, unless a request overrides it.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: (total / 3).min(Duration::from_secs(5)),
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            total: Duration::from_secs(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total_caps_connect() {
        let cfg = TimeoutConfig::from_total(Duration::from_secs(60));
        assert_eq!(cfg.connect, Duration::from_secs(5));

        let cfg = TimeoutConfig::from_total(Duration::from_millis(300));
        assert_eq!(cfg.connect, Duration::from_millis(100));
    }
}
