//! Integrator parameters: application-level knobs that are not governance policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime parameters for the
/// [`DecisionIntegrator`](crate::use_cases::integrate_decision::DecisionIntegrator).
///
/// The governance policy says *how* rounds are decided; these settings only
/// bound how long the integrator waits on its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Upper bound on a single ledger append. `None` waits indefinitely.
    pub ledger_timeout: Option<Duration>,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            ledger_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl IntegratorConfig {
    // ==================== Builder Methods ====================

    pub fn with_ledger_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.ledger_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = IntegratorConfig::default();
        assert_eq!(config.ledger_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_builder() {
        let config = IntegratorConfig::default().with_ledger_timeout(None);
        assert!(config.ledger_timeout.is_none());
    }
}
