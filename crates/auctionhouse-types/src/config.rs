//! Configuration types for the auction house.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{AuctionError, Result, constants};

/// Listing policy applied by the registry at creation time.
///
/// Both duration bounds are inclusive: an auction lasting exactly
/// `min_duration_secs` or exactly `max_duration_secs` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionPolicy {
    /// Shortest permitted `end_time - start_time`, in seconds.
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: i64,
    /// Longest permitted `end_time - start_time`, in seconds.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: i64,
}

fn default_min_duration_secs() -> i64 {
    constants::DEFAULT_MIN_DURATION_SECS
}

fn default_max_duration_secs() -> i64 {
    constants::DEFAULT_MAX_DURATION_SECS
}

impl Default for AuctionPolicy {
    fn default() -> Self {
        Self {
            min_duration_secs: constants::DEFAULT_MIN_DURATION_SECS,
            max_duration_secs: constants::DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl AuctionPolicy {
    /// Parse and validate a policy from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| AuctionError::Configuration(format!("invalid policy JSON: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies no auction could ever satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.min_duration_secs <= 0 || self.max_duration_secs <= 0 {
            return Err(AuctionError::Configuration(
                "duration bounds must be positive".into(),
            ));
        }
        for (name, secs) in [
            ("min_duration_secs", self.min_duration_secs),
            ("max_duration_secs", self.max_duration_secs),
        ] {
            if Duration::try_seconds(secs).is_none() {
                return Err(AuctionError::Configuration(format!(
                    "{name} ({secs}) is out of range"
                )));
            }
        }
        if self.min_duration_secs > self.max_duration_secs {
            return Err(AuctionError::Configuration(format!(
                "min_duration_secs ({}) exceeds max_duration_secs ({})",
                self.min_duration_secs, self.max_duration_secs
            )));
        }
        Ok(())
    }

    /// Lower bound as a [`Duration`]. Saturates for an unvalidated policy.
    #[must_use]
    pub fn min_duration(&self) -> Duration {
        Duration::try_seconds(self.min_duration_secs).unwrap_or(Duration::MAX)
    }

    /// Upper bound as a [`Duration`]. Saturates for an unvalidated policy.
    #[must_use]
    pub fn max_duration(&self) -> Duration {
        Duration::try_seconds(self.max_duration_secs).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_one_and_sixty_days() {
        let policy = AuctionPolicy::default();
        assert_eq!(policy.min_duration(), Duration::days(1));
        assert_eq!(policy.max_duration(), Duration::days(60));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let policy = AuctionPolicy::from_json_str(r#"{ "min_duration_secs": 3600 }"#).unwrap();
        assert_eq!(policy.min_duration(), Duration::hours(1));
        assert_eq!(policy.max_duration(), Duration::days(60));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = AuctionPolicy::from_json_str(
            r#"{ "min_duration_secs": 100, "max_duration_secs": 10 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AuctionError::Configuration(_)));
    }

    #[test]
    fn zero_bound_rejected() {
        let policy = AuctionPolicy {
            min_duration_secs: 0,
            max_duration_secs: 10,
        };
        assert!(matches!(
            policy.validate(),
            Err(AuctionError::Configuration(_))
        ));
    }

    #[test]
    fn unrepresentable_bound_rejected() {
        let err = AuctionPolicy::from_json_str(r#"{ "max_duration_secs": 9223372036854775807 }"#)
            .unwrap_err();
        assert!(matches!(err, AuctionError::Configuration(ref m) if m.contains("max_duration_secs")));

        let policy = AuctionPolicy {
            min_duration_secs: i64::MAX / 1000 + 1,
            max_duration_secs: i64::MAX,
        };
        assert!(matches!(
            policy.validate(),
            Err(AuctionError::Configuration(_))
        ));
        // Accessors stay total even when validation was skipped.
        assert_eq!(policy.max_duration(), Duration::MAX);
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let err = AuctionPolicy::from_json_str("not json").unwrap_err();
        assert!(matches!(err, AuctionError::Configuration(_)));
    }
}
