//! `claimdesk-review`: claim review engine.
//!
//! Pure engine crate: receives pre-loaded posts and claims, overlays human
//! decisions from a [`DecisionStore`], returns reconciled views.
//! No CLI or file IO dependencies; persistence goes through [`DecisionBackend`].

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod posts;
pub mod store;
pub mod summary;
pub mod thresholds;

pub use config::ReviewConfig;
pub use engine::ReviewSession;
pub use error::ReviewError;
pub use model::{
    parse_claims, Bucket, Claim, ClaimIdentity, ClaimStatus, Decision, DecisionRecord,
    EffectiveStatus, Platform, Post, ReviewClaim,
};
pub use store::{DecisionBackend, DecisionMap, DecisionStore, MemoryBackend};
pub use thresholds::Thresholds;
