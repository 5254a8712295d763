//! Simulated typing delays

use std::time::Duration;

use rand::Rng;

use crate::config::ChatConfig;

/// Delays applied before simulated chat replies appear
#[derive(Debug, Clone)]
pub struct TypingDelay {
    config: ChatConfig,
}

impl TypingDelay {
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }

    /// No delays at all
    pub fn instant() -> Self {
        Self::new(ChatConfig {
            delays_enabled: false,
            ..ChatConfig::default()
        })
    }

    pub fn enabled(&self) -> bool {
        self.config.delays_enabled
    }

    pub fn facilitator_interval(&self) -> usize {
        self.config.facilitator_interval
    }

    /// Pause before the first teammate reply after connecting
    pub fn initial(&self) -> Duration {
        Duration::from_millis(self.config.connect_delay_ms + self.config.reply_delay_ms)
    }

    /// Teammate typing delay with random jitter
    pub fn reply(&self) -> Duration {
        let jitter = match self.config.reply_jitter_ms {
            0 => 0,
            max => rand::rng().random_range(0..max),
        };
        Duration::from_millis(self.config.reply_delay_ms + jitter)
    }

    pub fn facilitator(&self) -> Duration {
        Duration::from_millis(self.config.facilitator_delay_ms)
    }

    /// Sleep for `delay` unless delays are disabled
    pub async fn wait(&self, delay: Duration) {
        if self.config.delays_enabled && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::new(ChatConfig::default())
    }
}
