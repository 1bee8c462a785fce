use chrono::{DateTime, Utc};

use crate::classify::{effective_status, in_bucket, partition, ReviewBuckets};
use crate::error::ReviewError;
use crate::export::{export_verified, VerifiedClaim};
use crate::model::{Bucket, Claim, ClaimIdentity, Decision, EffectiveStatus, ReviewClaim};
use crate::store::{DecisionBackend, DecisionStore};
use crate::summary::{compute_summary, ReviewSummary};

/// Loaded claims plus the decision store overlaid on them.
///
/// All reads are pure merges of the two; the claims themselves are never
/// modified, so the same (claims, store) pair always yields the same view.
pub struct ReviewSession<B: DecisionBackend> {
    claims: Vec<ReviewClaim>,
    store: DecisionStore<B>,
}

impl<B: DecisionBackend> ReviewSession<B> {
    pub fn new(claims: Vec<Claim>, store: DecisionStore<B>) -> Self {
        Self {
            claims: ReviewClaim::identify_all(claims),
            store,
        }
    }

    pub fn claims(&self) -> &[ReviewClaim] {
        &self.claims
    }

    pub fn store(&self) -> &DecisionStore<B> {
        &self.store
    }

    pub fn into_store(self) -> DecisionStore<B> {
        self.store
    }

    pub fn find(&self, identity: &ClaimIdentity) -> Option<&ReviewClaim> {
        self.claims.iter().find(|rc| &rc.identity == identity)
    }

    pub fn effective_status(&self, rc: &ReviewClaim) -> EffectiveStatus {
        effective_status(&rc.claim, self.store.get(&rc.identity))
    }

    pub fn partition(&self) -> ReviewBuckets<'_> {
        partition(&self.claims, self.store.records())
    }

    pub fn bucket(&self, bucket: Bucket) -> Vec<&ReviewClaim> {
        in_bucket(&self.claims, self.store.records(), bucket)
    }

    pub fn record_decision(
        &mut self,
        identity: &ClaimIdentity,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Result<(), ReviewError> {
        self.ensure_known(identity)?;
        self.store.set_decision(identity.clone(), decision, now);
        log::debug!("recorded {decision} for {identity}");
        Ok(())
    }

    pub fn record_notes(
        &mut self,
        identity: &ClaimIdentity,
        notes: impl Into<String>,
    ) -> Result<(), ReviewError> {
        self.ensure_known(identity)?;
        self.store.set_notes(identity.clone(), notes);
        Ok(())
    }

    pub fn export_verified(&self) -> Vec<VerifiedClaim> {
        export_verified(&self.claims, self.store.records())
    }

    pub fn summary(&self) -> ReviewSummary {
        compute_summary(&self.claims, self.store.records())
    }

    fn ensure_known(&self, identity: &ClaimIdentity) -> Result<(), ReviewError> {
        match self.find(identity) {
            Some(_) => Ok(()),
            None => Err(ReviewError::UnknownClaim(identity.clone())),
        }
    }
}
