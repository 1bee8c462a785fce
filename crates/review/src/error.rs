use std::fmt;

use crate::model::ClaimIdentity;

#[derive(Debug)]
pub enum ReviewError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold out of range, inverted bands).
    ConfigValidation(String),
    /// Identity string is not of the form `{post_id}_{index}`.
    InvalidIdentity(String),
    /// Decision or notes written for a claim that is not in the loaded set.
    UnknownClaim(ClaimIdentity),
    /// Claim record at the given source position is not a JSON object.
    MalformedRecord { position: usize, reason: String },
    /// Decision store payload could not be decoded.
    Decode(String),
    /// Decision store or export could not be serialized.
    Encode(String),
    /// Persistence backend failure (read or write).
    Backend(String),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidIdentity(raw) => {
                write!(f, "invalid claim identity '{raw}' (expected <post_id>_<index>)")
            }
            Self::UnknownClaim(identity) => write!(f, "unknown claim: {identity}"),
            Self::MalformedRecord { position, reason } => {
                write!(f, "record {position}: {reason}")
            }
            Self::Decode(msg) => write!(f, "decision store decode error: {msg}"),
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
            Self::Backend(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for ReviewError {}
