use crate::utils::error::{Result, SlipError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Point budgets and thresholds used by the slip validator.
///
/// Every field has a default, so a policy file only needs to list the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Budget for the risk assessment; full at LOW risk.
    pub authenticity_points: u32,
    /// Credit awarded at MEDIUM risk.
    pub medium_risk_points: u32,
    pub time_points: u32,
    pub amount_presence_points: u32,
    pub amount_match_points: u32,
    pub recipient_points: u32,
    pub confidence_points: u32,
    /// Credit in the middle confidence band.
    pub medium_confidence_points: u32,
    pub high_confidence_threshold: f32,
    pub medium_confidence_threshold: f32,
    /// Absolute tolerance when comparing amounts.
    pub amount_tolerance: f64,
    /// Off by default: a wrong amount only forfeits its points.
    pub amount_mismatch_is_error: bool,
    pub time_tolerance_minutes: u32,
    /// Minimum `score / max_score` for acceptance.
    pub pass_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            authenticity_points: 30,
            medium_risk_points: 15,
            time_points: 20,
            amount_presence_points: 10,
            amount_match_points: 20,
            recipient_points: 10,
            confidence_points: 10,
            medium_confidence_points: 5,
            high_confidence_threshold: 80.0,
            medium_confidence_threshold: 60.0,
            amount_tolerance: 0.01,
            amount_mismatch_is_error: false,
            time_tolerance_minutes: 2,
            pass_threshold: 0.70,
        }
    }
}

impl ScoringPolicy {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: ScoringPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.pass_threshold) {
            return Err(SlipError::InvalidPolicy(format!(
                "pass_threshold must be within 0..=1, got {}",
                self.pass_threshold
            )));
        }
        if self.medium_risk_points > self.authenticity_points {
            return Err(SlipError::InvalidPolicy(
                "medium_risk_points exceeds authenticity_points".to_string(),
            ));
        }
        if self.medium_confidence_points > self.confidence_points {
            return Err(SlipError::InvalidPolicy(
                "medium_confidence_points exceeds confidence_points".to_string(),
            ));
        }
        if self.medium_confidence_threshold > self.high_confidence_threshold {
            return Err(SlipError::InvalidPolicy(
                "medium_confidence_threshold is above high_confidence_threshold".to_string(),
            ));
        }
        if self.amount_tolerance < 0.0 {
            return Err(SlipError::InvalidPolicy("amount_tolerance is negative".to_string()));
        }
        Ok(())
    }
}
