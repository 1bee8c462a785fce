use crate::model::{Bucket, Claim, ClaimStatus, DecisionRecord, EffectiveStatus, ReviewClaim};
use crate::store::DecisionMap;

/// Resolve the status used for display and export: a recorded decision wins,
/// otherwise the claim's original status.
pub fn effective_status(claim: &Claim, record: Option<&DecisionRecord>) -> EffectiveStatus {
    if let Some(decision) = record.and_then(|r| r.decision) {
        return decision.into();
    }
    claim
        .status
        .map_or(EffectiveStatus::Unclassified, EffectiveStatus::from)
}

/// Review tab a claim belongs to, if any.
///
/// - `needs_review`: original status is needs_review and nothing decided yet.
///   Once decided, a claim never returns here.
/// - `auto_accepted`: effective status is auto_accepted or accepted.
/// - `auto_rejected`: effective status is auto_rejected or rejected.
pub fn bucket_for(claim: &Claim, record: Option<&DecisionRecord>) -> Option<Bucket> {
    let decided = record.and_then(|r| r.decision).is_some();
    if claim.status == Some(ClaimStatus::NeedsReview) && !decided {
        return Some(Bucket::NeedsReview);
    }

    let status = effective_status(claim, record);
    if status.is_accepted() {
        Some(Bucket::AutoAccepted)
    } else if status.is_rejected() {
        Some(Bucket::AutoRejected)
    } else {
        None
    }
}

/// Claims split into the three disjoint review tabs, each in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewBuckets<'a> {
    pub needs_review: Vec<&'a ReviewClaim>,
    pub auto_accepted: Vec<&'a ReviewClaim>,
    pub auto_rejected: Vec<&'a ReviewClaim>,
}

impl<'a> ReviewBuckets<'a> {
    pub fn get(&self, bucket: Bucket) -> &[&'a ReviewClaim] {
        match bucket {
            Bucket::NeedsReview => &self.needs_review,
            Bucket::AutoAccepted => &self.auto_accepted,
            Bucket::AutoRejected => &self.auto_rejected,
        }
    }

    /// Claims placed in some bucket.
    pub fn placed(&self) -> usize {
        self.needs_review.len() + self.auto_accepted.len() + self.auto_rejected.len()
    }
}

pub fn partition<'a>(claims: &'a [ReviewClaim], decisions: &DecisionMap) -> ReviewBuckets<'a> {
    let mut buckets = ReviewBuckets::default();
    for rc in claims {
        match bucket_for(&rc.claim, decisions.get(&rc.identity)) {
            Some(Bucket::NeedsReview) => buckets.needs_review.push(rc),
            Some(Bucket::AutoAccepted) => buckets.auto_accepted.push(rc),
            Some(Bucket::AutoRejected) => buckets.auto_rejected.push(rc),
            None => {}
        }
    }
    buckets
}

/// Claims in a single tab.
pub fn in_bucket<'a>(
    claims: &'a [ReviewClaim],
    decisions: &DecisionMap,
    bucket: Bucket,
) -> Vec<&'a ReviewClaim> {
    claims
        .iter()
        .filter(|rc| bucket_for(&rc.claim, decisions.get(&rc.identity)) == Some(bucket))
        .collect()
}
