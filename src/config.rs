//! Matcher threshold configuration.
//!
//! The defaults reproduce the production thresholds; deployments tune them
//! through a TOML file. Every threshold is validated before the engine will
//! accept a config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Thresholds and weights used by the pairwise matcher.
///
/// ```toml
/// # matcher.toml
/// name_threshold = 70
/// field_threshold = 80
/// min_average = 60
/// review_threshold = 70
/// merge_threshold = 90
/// min_reasons = 2
/// min_phone_digits = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum institution-name similarity for the name signal to count.
    pub name_threshold: u8,

    /// Minimum county/department similarity for those signals to count.
    pub field_threshold: u8,

    /// Matches averaging below this are rejected outright.
    pub min_average: u8,

    /// At or above this average the suggested action is `review`.
    pub review_threshold: u8,

    /// At or above this average the suggested action is `merge`.
    pub merge_threshold: u8,

    /// Minimum number of recorded match reasons; a bare same-state hit is
    /// never enough on its own.
    pub min_reasons: usize,

    /// Phone numbers shorter than this (in digits) never count as a signal.
    pub min_phone_digits: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            name_threshold: 70,
            field_threshold: 80,
            min_average: 60,
            review_threshold: 70,
            merge_threshold: 90,
            min_reasons: 2,
            min_phone_digits: 10,
        }
    }
}

impl MatcherConfig {
    /// Checks that every threshold is in range and the action bands are
    /// ordered.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] describing the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let percentages: [(&'static str, u8); 5] = [
            ("name_threshold", self.name_threshold),
            ("field_threshold", self.field_threshold),
            ("min_average", self.min_average),
            ("review_threshold", self.review_threshold),
            ("merge_threshold", self.merge_threshold),
        ];
        for (field, value) in percentages {
            if value > 100 {
                return Err(ValidationError::ThresholdOutOfRange { field, value });
            }
        }

        if self.min_average > self.review_threshold {
            return Err(ValidationError::ThresholdOrder {
                lower: "min_average",
                upper: "review_threshold",
            });
        }
        if self.review_threshold > self.merge_threshold {
            return Err(ValidationError::ThresholdOrder {
                lower: "review_threshold",
                upper: "merge_threshold",
            });
        }

        if self.min_reasons == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: "min_reasons must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidConfig`] on parse failure, or the
    /// underlying validation error on out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ValidationError> {
        let config: Self = toml::from_str(text).map_err(|e| ValidationError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config from a TOML file.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidConfig`] when the file cannot be
    /// read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let text = std::fs::read_to_string(path).map_err(|e| ValidationError::InvalidConfig {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }
}
