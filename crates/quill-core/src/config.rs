//! Workflow configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Minimum wait between successful error checks
    pub check_cooldown: Duration,
    /// Fixed autosave period
    pub autosave_interval: Duration,
    /// Score granted per check before errors are subtracted
    pub check_score_bonus: u32,
}

impl WorkflowConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a custom check cooldown
    #[inline]
    #[must_use]
    pub fn with_check_cooldown(mut self, cooldown: Duration) -> Self {
        self.check_cooldown = cooldown;
        self
    }

    /// With a custom autosave interval
    #[inline]
    #[must_use]
    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            check_cooldown: Duration::from_secs(30),
            autosave_interval: Duration::from_secs(3),
            check_score_bonus: 10,
        }
    }
}
