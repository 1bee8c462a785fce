use serde::Serialize;

use crate::classify::{bucket_for, effective_status};
use crate::model::{Bucket, EffectiveStatus, ReviewClaim};
use crate::store::DecisionMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub needs_review: usize,
    pub auto_accepted: usize,
    pub auto_rejected: usize,
    pub human_accepted: usize,
    pub human_rejected: usize,
    pub unclassified: usize,
}

/// Compute summary statistics over the reconciled view.
pub fn compute_summary(claims: &[ReviewClaim], decisions: &DecisionMap) -> ReviewSummary {
    let mut summary = ReviewSummary {
        total: claims.len(),
        ..ReviewSummary::default()
    };

    for rc in claims {
        let record = decisions.get(&rc.identity);

        match bucket_for(&rc.claim, record) {
            Some(Bucket::NeedsReview) => summary.needs_review += 1,
            Some(Bucket::AutoAccepted) => summary.auto_accepted += 1,
            Some(Bucket::AutoRejected) => summary.auto_rejected += 1,
            None => summary.unclassified += 1,
        }

        match effective_status(&rc.claim, record) {
            EffectiveStatus::Accepted => summary.human_accepted += 1,
            EffectiveStatus::Rejected => summary.human_rejected += 1,
            _ => {}
        }
    }

    summary
}
