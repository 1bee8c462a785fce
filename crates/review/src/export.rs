//! Verified-claims export.
//!
//! Each exported document is the claim's source record with a `verification`
//! block appended. Only claims whose effective status is `auto_accepted` or
//! `accepted` are emitted.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::classify::effective_status;
use crate::error::ReviewError;
use crate::model::{ClaimIdentity, EffectiveStatus, ReviewClaim};
use crate::store::DecisionMap;

const VERIFICATION_KEY: &str = "verification";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub final_status: EffectiveStatus,
    pub reviewer_notes: String,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaim {
    pub identity: ClaimIdentity,
    pub record: Map<String, Value>,
    pub verification: Verification,
}

impl Serialize for VerifiedClaim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let carried = self.record.iter().filter(|(k, _)| k.as_str() != VERIFICATION_KEY);
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in carried {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(VERIFICATION_KEY, &self.verification)?;
        map.end()
    }
}

pub fn export_verified(claims: &[ReviewClaim], decisions: &DecisionMap) -> Vec<VerifiedClaim> {
    claims
        .iter()
        .filter_map(|rc| {
            let record = decisions.get(&rc.identity);
            let status = effective_status(&rc.claim, record);
            if !status.is_accepted() {
                return None;
            }
            Some(VerifiedClaim {
                identity: rc.identity.clone(),
                record: rc.claim.record().clone(),
                verification: Verification {
                    final_status: status,
                    reviewer_notes: record.map(|r| r.notes.clone()).unwrap_or_default(),
                    reviewed_at: record.and_then(|r| r.decided_at),
                },
            })
        })
        .collect()
}

/// Render the export document. Same input, same bytes.
pub fn render(verified: &[VerifiedClaim]) -> Result<String, ReviewError> {
    serde_json::to_string_pretty(verified).map_err(|e| ReviewError::Encode(e.to_string()))
}
