use std::time::Duration;

use crate::constants::{CLOCK_REFRESH_SECS, LIVE_REFRESH_SECS, TICK_RATE_MS};
use crate::error::{DashboardError, Result};

/// Runtime settings for the dashboard loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub clock_interval: Duration,
    pub live_interval: Duration,
    pub tick_rate: Duration,
    /// Fixed seed for the synthetic feed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            clock_interval: Duration::from_secs(CLOCK_REFRESH_SECS),
            live_interval: Duration::from_secs(LIVE_REFRESH_SECS),
            tick_rate: Duration::from_millis(TICK_RATE_MS),
            seed: None,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("clock interval", self.clock_interval),
            ("live interval", self.live_interval),
            ("tick rate", self.tick_rate),
        ];
        for (name, value) in intervals {
            if value.is_zero() {
                return Err(DashboardError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        Ok(())
    }
}
