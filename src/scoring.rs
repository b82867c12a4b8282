// 💎 Wealth Score - weighted linear combination of a profile's amounts

use crate::profile::Profile;
use serde::{Deserialize, Serialize};

/// Weight applied to each money field.
///
/// Debts are subtracted, so `debts` is given as a positive weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub income: f64,
    pub assets: f64,
    pub investments: f64,
    pub debts: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            income: 0.5,
            assets: 0.7,
            investments: 1.2,
            debts: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("scoring weight {field} must be a finite, non-negative number, got {value}")]
pub struct WeightError {
    pub field: &'static str,
    pub value: f64,
}

impl ScoreWeights {
    /// Reject weights that would make scores NaN, infinite or sign-flipped.
    /// Tied profiles only share a rank when their scores compare equal.
    pub fn validate(&self) -> Result<(), WeightError> {
        for (field, value) in [
            ("income", self.income),
            ("assets", self.assets),
            ("investments", self.investments),
            ("debts", self.debts),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightError { field, value });
            }
        }
        Ok(())
    }
}

/// Compute the wealth score of a profile. Negative scores are legal.
pub fn score(profile: &Profile, weights: &ScoreWeights) -> f64 {
    profile.income as f64 * weights.income
        + profile.assets as f64 * weights.assets
        + profile.investments as f64 * weights.investments
        - profile.debts as f64 * weights.debts
}
