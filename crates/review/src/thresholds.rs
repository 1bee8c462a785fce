use serde::{Deserialize, Serialize};

use crate::error::ReviewError;
use crate::model::ClaimStatus;

pub const DEFAULT_AUTO_ACCEPT: f64 = 0.85;
pub const DEFAULT_NEEDS_REVIEW: f64 = 0.60;

/// Confidence cut-offs separating the three initial classifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub auto_accept: f64,
    pub needs_review: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            auto_accept: DEFAULT_AUTO_ACCEPT,
            needs_review: DEFAULT_NEEDS_REVIEW,
        }
    }
}

impl Thresholds {
    pub fn new(auto_accept: f64, needs_review: f64) -> Result<Self, ReviewError> {
        let thresholds = Self {
            auto_accept,
            needs_review,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ReviewError> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(self.auto_accept) || !in_range(self.needs_review) {
            return Err(ReviewError::ConfigValidation(format!(
                "thresholds must lie in [0, 1] (auto_accept={}, needs_review={})",
                self.auto_accept, self.needs_review
            )));
        }
        if self.needs_review > self.auto_accept {
            return Err(ReviewError::ConfigValidation(format!(
                "needs_review ({}) must not exceed auto_accept ({})",
                self.needs_review, self.auto_accept
            )));
        }
        Ok(())
    }

    /// Initial classification for a confidence score.
    pub fn classify(&self, confidence: f64) -> ClaimStatus {
        if confidence >= self.auto_accept {
            ClaimStatus::AutoAccepted
        } else if confidence >= self.needs_review {
            ClaimStatus::NeedsReview
        } else {
            ClaimStatus::AutoRejected
        }
    }

    pub fn band(&self, confidence: f64) -> ConfidenceBand {
        match self.classify(confidence) {
            ClaimStatus::AutoAccepted => ConfidenceBand::High,
            ClaimStatus::NeedsReview => ConfidenceBand::Medium,
            ClaimStatus::AutoRejected => ConfidenceBand::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Confidence rendered as a whole percentage.
pub fn percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}
