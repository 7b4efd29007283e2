//! Configuration types for the engine.

use serde::{Deserialize, Serialize};

use crate::error::SeatingError;

/// Upper bound for `retry.max_full_attempts`.
pub const MAX_FULL_ATTEMPTS: usize = 1_000;

/// Upper bound for `retry.max_repair_passes`.
pub const MAX_REPAIR_PASSES: usize = 10_000;

/// Top-level engine configuration.
///
/// This defines the pair-scoring weights, the acceptance bar, the candidate
/// window and the retry bounds. Loaded from JSON at runtime; every field
/// falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pair-scoring weights
    pub scoring: ScoringConfig,

    /// Minimum pair score considered conflict-free
    pub acceptance_bar: u32,

    /// Number of leading pool entries searched for a pair or partner
    pub candidate_window: usize,

    /// Retry bounds for the orchestrator
    pub retry: RetryConfig,
}

/// Weights added by each independent scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Awarded when the two people belong to different cohorts
    pub different_cohort: u32,

    /// Awarded when the two people have different group labels
    pub different_group: u32,

    /// Awarded per person whose cohort is absent from the neighbouring desk
    pub fresh_neighbor_cohort: u32,

    /// Awarded when the two people have different last names
    pub different_last_name: u32,
}

/// Retry configuration: how hard the orchestrator works for a clean chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Full rebuilds from a fresh shuffle
    pub max_full_attempts: usize,

    /// Room-local repair passes per full attempt
    pub max_repair_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            acceptance_bar: 8,
            candidate_window: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            different_cohort: 8,
            different_group: 4,
            fresh_neighbor_cohort: 2,
            different_last_name: 1,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_full_attempts: 3,
            max_repair_passes: 10,
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), SeatingError> {
        if self.candidate_window < 2 {
            return Err(SeatingError::InvalidConfig(format!(
                "candidate_window must be at least 2, got {}",
                self.candidate_window
            )));
        }
        if self.retry.max_full_attempts == 0 {
            return Err(SeatingError::InvalidConfig(
                "retry.max_full_attempts must be at least 1".to_string(),
            ));
        }
        if self.retry.max_full_attempts > MAX_FULL_ATTEMPTS {
            return Err(SeatingError::InvalidConfig(format!(
                "retry.max_full_attempts must be at most {MAX_FULL_ATTEMPTS}, got {}",
                self.retry.max_full_attempts
            )));
        }
        if self.retry.max_repair_passes > MAX_REPAIR_PASSES {
            return Err(SeatingError::InvalidConfig(format!(
                "retry.max_repair_passes must be at most {MAX_REPAIR_PASSES}, got {}",
                self.retry.max_repair_passes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.acceptance_bar, 8);
        assert_eq!(config.candidate_window, 30);
        assert_eq!(config.retry.max_full_attempts, 3);
        assert_eq!(config.retry.max_repair_passes, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"candidate_window": 12, "retry": {"max_full_attempts": 5}}"#)
                .unwrap();
        assert_eq!(config.candidate_window, 12);
        assert_eq!(config.retry.max_full_attempts, 5);
        assert_eq!(config.retry.max_repair_passes, 10);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn test_validate_rejects_tiny_window() {
        let config = EngineConfig {
            candidate_window: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SeatingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = EngineConfig::default();
        config.retry.max_full_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_retry_bounds() {
        let config: EngineConfig = serde_json::from_str(&format!(
            r#"{{"retry": {{"max_repair_passes": {}}}}}"#,
            usize::MAX
        ))
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(SeatingError::InvalidConfig(msg)) if msg.contains("max_repair_passes")
        ));

        let mut config = EngineConfig::default();
        config.retry.max_full_attempts = MAX_FULL_ATTEMPTS + 1;
        assert!(config.validate().is_err());

        config.retry.max_full_attempts = MAX_FULL_ATTEMPTS;
        config.retry.max_repair_passes = MAX_REPAIR_PASSES;
        assert!(config.validate().is_ok());
    }
}
