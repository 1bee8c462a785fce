use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use serde_json::Value;

use claimdesk_review::export::render;
use claimdesk_review::posts::{filter_and_sort, PlatformFilter, PostSort};
use claimdesk_review::{
    parse_claims, Bucket, ClaimIdentity, Decision, DecisionStore, EffectiveStatus, MemoryBackend,
    Post, ReviewSession,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_session(backend: MemoryBackend) -> ReviewSession<MemoryBackend> {
    let raw = std::fs::read_to_string(fixtures_dir().join("claims.json")).unwrap();
    let values: Vec<Value> = serde_json::from_str(&raw).unwrap();
    let (claims, dropped) = parse_claims(values);
    assert_eq!(dropped.len(), 1, "the trailing string record is dropped");
    ReviewSession::new(claims, DecisionStore::open(backend))
}

fn ids(claims: &[&claimdesk_review::ReviewClaim]) -> Vec<String> {
    claims.iter().map(|rc| rc.identity.to_string()).collect()
}

// -------------------------------------------------------------------------
// Buckets
// -------------------------------------------------------------------------

#[test]
fn fixture_partitions_by_original_status() {
    let session = load_session(MemoryBackend::new());
    assert_eq!(session.claims().len(), 5);

    let buckets = session.partition();
    assert_eq!(ids(&buckets.needs_review), vec!["1890001_1", "fb_pfbid_77_1", "tt_555_0"]);
    assert_eq!(ids(&buckets.auto_accepted), vec!["1890001_0"]);
    assert_eq!(ids(&buckets.auto_rejected), vec!["fb_pfbid_77_0"]);
}

#[test]
fn partition_is_idempotent() {
    let session = load_session(MemoryBackend::new());
    assert_eq!(session.partition(), session.partition());
}

#[test]
fn missing_confidence_displays_zero_without_mutation() {
    let session = load_session(MemoryBackend::new());
    let rc = session.find(&ClaimIdentity::new("tt_555", 0)).unwrap();
    assert_eq!(rc.claim.display_confidence(), 0.0);
    assert!(rc.claim.confidence.is_none());
    assert_eq!(session.effective_status(rc), EffectiveStatus::NeedsReview);
}

// -------------------------------------------------------------------------
// Review scenario
// -------------------------------------------------------------------------

#[test]
fn accepted_review_claim_moves_and_exports() {
    let mut session = load_session(MemoryBackend::new());
    let id = ClaimIdentity::new("1890001", 1);
    let now = Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap();

    session.record_notes(&id, "UN delegate list confirms 104").unwrap();
    session.record_decision(&id, Decision::Accepted, now).unwrap();

    let needs: Vec<String> = ids(&session.bucket(Bucket::NeedsReview));
    assert!(!needs.contains(&id.to_string()));
    assert_eq!(
        ids(&session.bucket(Bucket::AutoAccepted)),
        vec!["1890001_0", "1890001_1"]
    );

    let exported = session.export_verified();
    assert_eq!(exported.len(), session.bucket(Bucket::AutoAccepted).len());
    let ours = exported.iter().find(|v| v.identity == id).unwrap();
    assert_eq!(ours.verification.final_status, EffectiveStatus::Accepted);
    assert_eq!(ours.verification.reviewer_notes, "UN delegate list confirms 104");
    assert_eq!(ours.verification.reviewed_at, Some(now));
}

#[test]
fn decisions_survive_reload() {
    let mut session = load_session(MemoryBackend::new());
    let accepted = ClaimIdentity::new("fb_pfbid_77", 1);
    let rejected = ClaimIdentity::new("tt_555", 0);
    let now = Utc.with_ymd_and_hms(2026, 1, 21, 8, 0, 0).unwrap();
    session.record_decision(&accepted, Decision::Accepted, now).unwrap();
    session.record_decision(&rejected, Decision::Rejected, now).unwrap();

    let backend = session.into_store().into_backend();
    let reloaded = load_session(backend);

    let status = |id: &ClaimIdentity| reloaded.effective_status(reloaded.find(id).unwrap());
    assert_eq!(status(&accepted), EffectiveStatus::Accepted);
    assert_eq!(status(&rejected), EffectiveStatus::Rejected);
    assert_eq!(ids(&reloaded.bucket(Bucket::NeedsReview)), vec!["1890001_1"]);
}

#[test]
fn rejecting_auto_accepted_claim_removes_it_from_export() {
    let mut session = load_session(MemoryBackend::new());
    let id = ClaimIdentity::new("1890001", 0);
    session
        .record_decision(&id, Decision::Rejected, Utc.timestamp_opt(0, 0).unwrap())
        .unwrap();
    assert!(session.export_verified().is_empty());
    assert_eq!(session.bucket(Bucket::AutoRejected).len(), 2);
}

#[test]
fn corrupt_store_starts_clean_session() {
    let session = load_session(MemoryBackend::with_payload("{\"1890001_1\": {\"decision\": "));
    assert!(session.store().records().is_empty());
    assert_eq!(session.partition().needs_review.len(), 3);
}

#[test]
fn record_timestamp_key_is_read_as_decided_at() {
    let legacy = r#"{"1890001_1":{"decision":"rejected","timestamp":"2026-01-02T03:04:05.000Z","notes":"dup"}}"#;
    let session = load_session(MemoryBackend::with_payload(legacy));
    let rc = session.find(&ClaimIdentity::new("1890001", 1)).unwrap();
    assert_eq!(session.effective_status(rc), EffectiveStatus::Rejected);
    let record = session.store().get(&rc.identity).unwrap();
    assert_eq!(record.notes, "dup");
    assert!(record.decided_at.is_some());
}

#[test]
fn store_keys_use_position_within_post() {
    let raw = std::fs::read_to_string(fixtures_dir().join("claims_interleaved.json")).unwrap();
    let values: Vec<Value> = serde_json::from_str(&raw).unwrap();
    let (claims, dropped) = parse_claims(values);
    assert!(dropped.is_empty());

    // tt_9 sits at array positions 1 and 2 but holds per-post indices 0 and 1.
    let store = r#"{"tt_9_1":{"decision":"rejected","decided_at":"2026-01-02T03:04:05Z","notes":""}}"#;
    let session = ReviewSession::new(claims, DecisionStore::open(MemoryBackend::with_payload(store)));

    let second = session.find(&ClaimIdentity::new("tt_9", 1)).unwrap();
    assert_eq!(second.claim.claim_text, "The law passed in March");
    assert_eq!(session.effective_status(second), EffectiveStatus::Rejected);

    let first = session.find(&ClaimIdentity::new("tt_9", 0)).unwrap();
    assert_eq!(first.claim.claim_text, "Rents rose 12 percent");
    assert_eq!(session.effective_status(first), EffectiveStatus::NeedsReview);
    assert_eq!(ids(&session.partition().needs_review), vec!["tw_1_0", "tt_9_0"]);
}

// -------------------------------------------------------------------------
// Export
// -------------------------------------------------------------------------

#[test]
fn export_carries_unmodelled_fields_and_is_stable() {
    let mut session = load_session(MemoryBackend::new());
    let id = ClaimIdentity::new("tt_555", 0);
    session
        .record_decision(&id, Decision::Accepted, Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        .unwrap();

    let first = render(&session.export_verified()).unwrap();
    let second = render(&session.export_verified()).unwrap();
    assert_eq!(first, second);

    let doc: Vec<Value> = serde_json::from_str(&first).unwrap();
    let tiktok = doc.iter().find(|d| d["post_id"] == "tt_555").unwrap();
    assert_eq!(tiktok["extraction_model"], "openai/gpt-4o");
    assert_eq!(tiktok["verification"]["final_status"], "accepted");
    assert_eq!(tiktok["verification"]["reviewed_at"], "2023-11-14T22:13:20Z");
}

// -------------------------------------------------------------------------
// Posts
// -------------------------------------------------------------------------

#[test]
fn posts_fixture_sorts_by_shares() {
    let raw = std::fs::read_to_string(fixtures_dir().join("posts.json")).unwrap();
    let posts: Vec<Post> = serde_json::from_str(&raw).unwrap();
    let sorted = filter_and_sort(&posts, &PlatformFilter::All, PostSort::Shares);
    let order: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(order, vec!["fb_pfbid_77", "1890001", "tt_555"]);
}
