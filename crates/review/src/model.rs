use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ReviewError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Composite claim key: the originating post and the claim's position among
/// that post's claims in source order.
///
/// Persisted as `"{post_id}_{index}"`. Parsing splits on the last `_`, so post
/// ids that themselves contain `_` survive the round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimIdentity {
    pub post_id: String,
    pub index: usize,
}

impl ClaimIdentity {
    pub fn new(post_id: impl Into<String>, index: usize) -> Self {
        Self {
            post_id: post_id.into(),
            index,
        }
    }
}

impl fmt::Display for ClaimIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.post_id, self.index)
    }
}

impl FromStr for ClaimIdentity {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (post_id, index) = s
            .rsplit_once('_')
            .ok_or_else(|| ReviewError::InvalidIdentity(s.to_string()))?;
        let index = index
            .parse::<usize>()
            .map_err(|_| ReviewError::InvalidIdentity(s.to_string()))?;
        Ok(Self::new(post_id, index))
    }
}

impl Serialize for ClaimIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClaimIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Server-assigned classification, derived upstream from confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    NeedsReview,
    AutoAccepted,
    AutoRejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsReview => "needs_review",
            Self::AutoAccepted => "auto_accepted",
            Self::AutoRejected => "auto_rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "needs_review" => Some(Self::NeedsReview),
            "auto_accepted" => Some(Self::AutoAccepted),
            "auto_rejected" => Some(Self::AutoRejected),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human verdict on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status after overlaying any human decision on the original classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveStatus {
    AutoAccepted,
    NeedsReview,
    AutoRejected,
    Accepted,
    Rejected,
    /// No original status and no decision.
    Unclassified,
}

impl EffectiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoAccepted => "auto_accepted",
            Self::NeedsReview => "needs_review",
            Self::AutoRejected => "auto_rejected",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Unclassified => "unclassified",
        }
    }

    /// True for `auto_accepted` and `accepted`: the statuses that export.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::AutoAccepted | Self::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::AutoRejected | Self::Rejected)
    }
}

impl From<ClaimStatus> for EffectiveStatus {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::NeedsReview => Self::NeedsReview,
            ClaimStatus::AutoAccepted => Self::AutoAccepted,
            ClaimStatus::AutoRejected => Self::AutoRejected,
        }
    }
}

impl From<Decision> for EffectiveStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted => Self::Accepted,
            Decision::Rejected => Self::Rejected,
        }
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three mutually exclusive review tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    NeedsReview,
    AutoAccepted,
    AutoRejected,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::NeedsReview, Bucket::AutoAccepted, Bucket::AutoRejected];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NeedsReview => "Needs Review",
            Self::AutoAccepted => "Auto-Accepted",
            Self::AutoRejected => "Auto-Rejected",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeedsReview => write!(f, "needs_review"),
            Self::AutoAccepted => write!(f, "auto_accepted"),
            Self::AutoRejected => write!(f, "auto_rejected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision record
// ---------------------------------------------------------------------------

/// Locally owned human review outcome for one claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(default, deserialize_with = "lenient::string_field")]
    pub notes: String,
    /// Set whenever `decision` is written; notes edits leave it alone.
    #[serde(default, alias = "timestamp", skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Twitter,
    Meta,
    Tiktok,
    Other(String),
}

impl Platform {
    pub fn parse(s: &str) -> Self {
        match s {
            "twitter" => Self::Twitter,
            "meta" => Self::Meta,
            "tiktok" => Self::Tiktok,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Twitter => "twitter",
            Self::Meta => "meta",
            Self::Tiktok => "tiktok",
            Self::Other(s) => s,
        }
    }

    /// Display label. Unknown platforms show their raw value, or `Unknown`
    /// when there is none.
    pub fn label(&self) -> &str {
        match self {
            Self::Twitter => "Twitter/X",
            Self::Meta => "Facebook",
            Self::Tiktok => "TikTok",
            Self::Other(s) if s.is_empty() => "Unknown",
            Self::Other(s) => s,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Platform::parse(&lenient::string(Some(&value))))
    }
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

/// A factual assertion extracted from a post. Immutable once loaded.
///
/// Every modelled field is read independently: a missing or mistyped value
/// degrades to its default without affecting the rest of the record. The
/// source object is kept verbatim so exports carry fields this crate does
/// not model.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub post_id: String,
    pub claim_text: String,
    pub category: String,
    pub reasoning: String,
    pub source_quote: String,
    pub platform: Platform,
    pub confidence: Option<f64>,
    pub post_url: Option<String>,
    pub status: Option<ClaimStatus>,
    record: Map<String, Value>,
}

impl Claim {
    pub fn from_record(record: Map<String, Value>) -> Self {
        let text = |key: &str| lenient::string(record.get(key));
        let status = record
            .get("status")
            .and_then(Value::as_str)
            .and_then(ClaimStatus::parse);
        let post_url = Some(text("post_url")).filter(|url| !url.is_empty());

        Self {
            post_id: text("post_id"),
            claim_text: text("claim_text"),
            category: text("category"),
            reasoning: text("reasoning"),
            source_quote: text("source_quote"),
            platform: Platform::parse(&text("platform")),
            confidence: lenient::number(record.get("confidence")),
            post_url,
            status,
            record,
        }
    }

    /// Confidence for display. Absent reads as 0; the record is not touched.
    pub fn display_confidence(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    /// The source object as loaded.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }
}

impl TryFrom<Value> for Claim {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(record) => Ok(Claim::from_record(record)),
            other => Err(other),
        }
    }
}

impl Serialize for Claim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Claim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Claim::try_from(value)
            .map_err(|_| serde::de::Error::custom("claim record must be a JSON object"))
    }
}

/// Build claims from raw records. Non-object records are dropped and reported
/// with their source position; everything else loads with per-field defaults.
pub fn parse_claims(values: Vec<Value>) -> (Vec<Claim>, Vec<ReviewError>) {
    let mut claims = Vec::with_capacity(values.len());
    let mut dropped = Vec::new();
    for (position, value) in values.into_iter().enumerate() {
        match Claim::try_from(value) {
            Ok(claim) => claims.push(claim),
            Err(other) => dropped.push(ReviewError::MalformedRecord {
                position,
                reason: format!("expected an object, found {}", json_kind(&other)),
            }),
        }
    }
    (claims, dropped)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A claim paired with its identity in the loaded set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewClaim {
    pub identity: ClaimIdentity,
    pub claim: Claim,
}

impl ReviewClaim {
    /// Assign identities in source order: the n-th claim seen for a post gets
    /// index n.
    pub fn identify_all(claims: Vec<Claim>) -> Vec<ReviewClaim> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        claims
            .into_iter()
            .map(|claim| {
                let next = seen.entry(claim.post_id.clone()).or_insert(0);
                let identity = ClaimIdentity::new(claim.post_id.clone(), *next);
                *next += 1;
                ReviewClaim { identity, claim }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engagement {
    #[serde(deserialize_with = "lenient::count")]
    pub likes: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub shares: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub comments: u64,
}

/// A collected social media post in the unified collector schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    #[serde(deserialize_with = "lenient::string_field")]
    pub id: String,
    pub platform: Platform,
    #[serde(deserialize_with = "lenient::string_field")]
    pub author: String,
    #[serde(deserialize_with = "lenient::string_field")]
    pub text: String,
    #[serde(deserialize_with = "lenient::optional_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient::engagement", skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
}

impl Post {
    pub fn likes(&self) -> u64 {
        self.engagement.as_ref().map_or(0, |e| e.likes)
    }

    pub fn shares(&self) -> u64 {
        self.engagement.as_ref().map_or(0, |e| e.shares)
    }

    pub fn comments(&self) -> u64 {
        self.engagement.as_ref().map_or(0, |e| e.comments)
    }
}

/// Per-field readers that never fail: wrong types fall back to defaults.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Engagement;

    pub(super) fn string(value: Option<&Value>) -> String {
        match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub(super) fn number(value: Option<&Value>) -> Option<f64> {
        match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(super) fn string_field<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(string(Some(&value)))
    }

    pub(super) fn optional_string<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(Some(string(Some(&value))).filter(|s| !s.is_empty()))
    }

    pub(super) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(number(Some(&value))
            .filter(|n| n.is_finite() && *n > 0.0)
            .map_or(0, |n| n as u64))
    }

    pub(super) fn engagement<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Engagement>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }
}
