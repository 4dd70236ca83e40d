use std::time::Duration;
use tandem_core::{IceServerConfig, MediaConstraints, utils::default_stun_urls};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub media: MediaConstraints,
    /// Return `CallError::InvalidTransition` for operations issued in the
    /// wrong state. When off they are logged and ignored.
    pub strict_transitions: bool,
    /// Used until the server's `welcome` supplies its own list.
    pub default_ice_servers: Vec<IceServerConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            media: MediaConstraints::default(),
            strict_transitions: cfg!(debug_assertions),
            default_ice_servers: vec![IceServerConfig {
                urls: default_stun_urls(),
                username: None,
                credential: None,
            }],
        }
    }
}

/// Backoff between attempts to reopen the signaling socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: u32,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            factor: 2,
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before attempt number `attempt` (starting at 0), or `None` once
    /// the policy gives up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| attempt >= max) {
            return None;
        }

        let multiplier = self.factor.max(1).checked_pow(attempt).unwrap_or(u32::MAX);
        let delay = self
            .initial_delay
            .checked_mul(multiplier)
            .unwrap_or(self.max_delay);
        Some(delay.min(self.max_delay))
    }
}
