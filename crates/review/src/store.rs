//! Decision Store: claim identity → human decision record.
//!
//! The store owns an in-memory [`DecisionMap`] and mirrors every mutation to a
//! [`DecisionBackend`] slot. Reads never fail: an unreadable or corrupt slot
//! loads as an empty map, and a failed write leaves the session running
//! unpersisted (see [`DecisionStore::is_degraded`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ReviewError;
use crate::model::{ClaimIdentity, Decision, DecisionRecord};

pub type DecisionMap = BTreeMap<ClaimIdentity, DecisionRecord>;

/// Single named slot holding the serialized store.
pub trait DecisionBackend {
    /// Raw payload, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, ReviewError>;

    fn save(&mut self, payload: &str) -> Result<(), ReviewError>;

    /// Move unreadable or undecodable content aside before it is overwritten.
    /// An error here keeps the store from writing over the slot.
    fn quarantine(&mut self) -> Result<(), ReviewError> {
        Ok(())
    }
}

/// Backend kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    payload: Option<String>,
    read_only: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            read_only: false,
        }
    }

    /// A backend whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            payload: None,
            read_only: true,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl DecisionBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, ReviewError> {
        Ok(self.payload.clone())
    }

    fn save(&mut self, payload: &str) -> Result<(), ReviewError> {
        if self.read_only {
            return Err(ReviewError::Backend("memory backend is read-only".into()));
        }
        self.payload = Some(payload.to_string());
        Ok(())
    }
}

/// Serialize a decision map. Keys are written in identity order, so equal
/// maps always encode to identical bytes.
pub fn encode(records: &DecisionMap) -> Result<String, ReviewError> {
    serde_json::to_string_pretty(records).map_err(|e| ReviewError::Encode(e.to_string()))
}

/// Decode a stored payload. The top level must be a JSON object; entries with
/// an unparseable key or record are skipped.
pub fn decode(payload: &str) -> Result<DecisionMap, ReviewError> {
    let raw: BTreeMap<String, Value> =
        serde_json::from_str(payload).map_err(|e| ReviewError::Decode(e.to_string()))?;

    let mut records = DecisionMap::new();
    for (key, value) in raw {
        let identity = match key.parse::<ClaimIdentity>() {
            Ok(identity) => identity,
            Err(e) => {
                log::warn!("skipping stored decision: {e}");
                continue;
            }
        };
        match serde_json::from_value::<DecisionRecord>(value) {
            Ok(record) => {
                records.insert(identity, record);
            }
            Err(e) => log::warn!("skipping stored decision for {identity}: {e}"),
        }
    }
    Ok(records)
}

pub struct DecisionStore<B: DecisionBackend> {
    backend: B,
    records: DecisionMap,
    degraded: bool,
    /// Set when the slot holds content that could be neither read nor moved
    /// aside; writes are skipped so it is never overwritten.
    write_protected: bool,
}

impl<B: DecisionBackend> DecisionStore<B> {
    /// Open a store over `backend`, loading whatever it holds.
    pub fn open(backend: B) -> Self {
        let mut store = Self {
            backend,
            records: DecisionMap::new(),
            degraded: false,
            write_protected: false,
        };
        store.records = store.load_all();
        store
    }

    /// Read the backend slot. Unavailable or corrupt content yields an empty
    /// map; either way the content is handed to [`DecisionBackend::quarantine`]
    /// first, so the next write cannot destroy it.
    pub fn load_all(&mut self) -> DecisionMap {
        let result = self.backend.load().and_then(|payload| match payload {
            Some(payload) => decode(&payload),
            None => Ok(DecisionMap::new()),
        });

        match result {
            Ok(records) => {
                log::debug!("loaded {} stored decisions", records.len());
                records
            }
            Err(e) => {
                log::warn!("decision store unreadable, starting empty: {e}");
                self.set_aside();
                DecisionMap::new()
            }
        }
    }

    fn set_aside(&mut self) {
        if let Err(e) = self.backend.quarantine() {
            log::warn!("cannot move unreadable decision store aside, not writing to it: {e}");
            self.write_protected = true;
        }
    }

    /// Write the current map to the backend.
    pub fn persist(&mut self) -> Result<(), ReviewError> {
        if self.write_protected {
            return Err(ReviewError::Backend(
                "slot holds unreadable content that could not be moved aside".into(),
            ));
        }
        let payload = encode(&self.records)?;
        self.backend.save(&payload)?;
        log::debug!("persisted {} decisions", self.records.len());
        Ok(())
    }

    /// Replace the whole map and persist it.
    pub fn replace(&mut self, records: DecisionMap) {
        self.records = records;
        self.flush();
    }

    pub fn get(&self, identity: &ClaimIdentity) -> Option<&DecisionRecord> {
        self.records.get(identity)
    }

    pub fn decision(&self, identity: &ClaimIdentity) -> Option<Decision> {
        self.get(identity).and_then(|r| r.decision)
    }

    /// Record a verdict. Existing notes are kept.
    pub fn set_decision(&mut self, identity: ClaimIdentity, decision: Decision, now: DateTime<Utc>) {
        let record = self.records.entry(identity).or_default();
        record.decision = Some(decision);
        record.decided_at = Some(now);
        self.flush();
    }

    /// Record reviewer notes. Decision and timestamp are left alone.
    pub fn set_notes(&mut self, identity: ClaimIdentity, notes: impl Into<String>) {
        self.records.entry(identity).or_default().notes = notes.into();
        self.flush();
    }

    pub fn records(&self) -> &DecisionMap {
        &self.records
    }

    /// True when the most recent write failed; decisions since then live in
    /// memory only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn flush(&mut self) {
        match self.persist() {
            Ok(()) => self.degraded = false,
            Err(e) => {
                log::warn!("decision not persisted, continuing in memory: {e}");
                self.degraded = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn p1() -> ClaimIdentity {
        ClaimIdentity::new("p1", 0)
    }

    #[test]
    fn empty_backend_opens_empty() {
        let store = DecisionStore::open(MemoryBackend::new());
        assert!(store.records().is_empty());
        assert!(store.get(&p1()).is_none());
    }

    #[test]
    fn set_decision_preserves_notes() {
        let mut store = DecisionStore::open(MemoryBackend::new());
        store.set_notes(p1(), "source checked");
        store.set_decision(p1(), Decision::Accepted, at(100));

        let rec = store.get(&p1()).unwrap();
        assert_eq!(rec.decision, Some(Decision::Accepted));
        assert_eq!(rec.notes, "source checked");
        assert_eq!(rec.decided_at, Some(at(100)));
    }

    #[test]
    fn set_notes_leaves_decision_and_timestamp() {
        let mut store = DecisionStore::open(MemoryBackend::new());
        store.set_decision(p1(), Decision::Rejected, at(100));
        store.set_notes(p1(), "misquoted");

        let rec = store.get(&p1()).unwrap();
        assert_eq!(rec.decision, Some(Decision::Rejected));
        assert_eq!(rec.decided_at, Some(at(100)));
        assert_eq!(rec.notes, "misquoted");
    }

    #[test]
    fn notes_alone_create_undecided_record() {
        let mut store = DecisionStore::open(MemoryBackend::new());
        store.set_notes(p1(), "look later");
        let rec = store.get(&p1()).unwrap();
        assert_eq!(rec.decision, None);
        assert_eq!(rec.decided_at, None);
    }

    #[test]
    fn every_mutation_persists() {
        let mut store = DecisionStore::open(MemoryBackend::new());
        store.set_decision(p1(), Decision::Accepted, at(5));
        let reopened = DecisionStore::open(store.into_backend());
        assert_eq!(reopened.decision(&p1()), Some(Decision::Accepted));
    }

    #[test]
    fn corrupt_payload_loads_empty() {
        let mut store = DecisionStore::open(MemoryBackend::with_payload("{not json"));
        assert!(store.records().is_empty());
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn non_object_payload_loads_empty() {
        let store = DecisionStore::open(MemoryBackend::with_payload("[1, 2, 3]"));
        assert!(store.records().is_empty());
    }

    #[test]
    fn bad_entries_skipped_good_entries_kept() {
        let payload = r#"{
            "nokey": {"decision": "accepted"},
            "p1_0": {"decision": "accepted", "notes": "ok"},
            "p2_0": {"decision": "maybe"}
        }"#;
        let store = DecisionStore::open(MemoryBackend::with_payload(payload));
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.decision(&p1()), Some(Decision::Accepted));
    }

    #[test]
    fn failed_write_degrades_but_keeps_decision() {
        let mut store = DecisionStore::open(MemoryBackend::read_only());
        store.set_decision(p1(), Decision::Accepted, at(1));
        assert!(store.is_degraded());
        assert_eq!(store.decision(&p1()), Some(Decision::Accepted));
        assert!(store.persist().is_err());
    }

    #[test]
    fn persist_of_loaded_map_is_noop() {
        let mut store = DecisionStore::open(MemoryBackend::new());
        store.set_decision(ClaimIdentity::new("p_2", 1), Decision::Rejected, at(7));
        store.set_notes(ClaimIdentity::new("p1", 10), "n");
        store.set_decision(p1(), Decision::Accepted, at(9));
        let before = store.backend().payload().unwrap().to_string();

        let mut reopened = DecisionStore::open(store.into_backend());
        let loaded = reopened.load_all();
        reopened.replace(loaded);
        assert_eq!(reopened.backend().payload().unwrap(), before);
    }

    #[test]
    fn encoding_orders_keys_by_identity() {
        let mut records = DecisionMap::new();
        records.insert(ClaimIdentity::new("p1", 10), DecisionRecord::default());
        records.insert(ClaimIdentity::new("p1", 2), DecisionRecord::default());
        let encoded = encode(&records).unwrap();
        let first = encoded.find("p1_2").unwrap();
        let second = encoded.find("p1_10").unwrap();
        assert!(first < second);
    }

    /// Backend whose slot cannot be read, with a switchable quarantine.
    struct UnreadableBackend {
        quarantine_ok: bool,
        quarantined: usize,
        saved: Option<String>,
    }

    impl DecisionBackend for UnreadableBackend {
        fn load(&self) -> Result<Option<String>, ReviewError> {
            Err(ReviewError::Decode("stream did not contain valid UTF-8".into()))
        }

        fn save(&mut self, payload: &str) -> Result<(), ReviewError> {
            self.saved = Some(payload.to_string());
            Ok(())
        }

        fn quarantine(&mut self) -> Result<(), ReviewError> {
            self.quarantined += 1;
            if self.quarantine_ok {
                Ok(())
            } else {
                Err(ReviewError::Backend("rename failed".into()))
            }
        }
    }

    fn unreadable(quarantine_ok: bool) -> UnreadableBackend {
        UnreadableBackend { quarantine_ok, quarantined: 0, saved: None }
    }

    #[test]
    fn unreadable_slot_is_set_aside_before_writing() {
        let mut store = DecisionStore::open(unreadable(true));
        assert!(store.records().is_empty());
        assert_eq!(store.backend().quarantined, 1);

        store.set_decision(p1(), Decision::Accepted, at(3));
        assert!(!store.is_degraded());
        assert!(store.backend().saved.is_some());
    }

    #[test]
    fn slot_that_cannot_be_set_aside_is_never_overwritten() {
        let mut store = DecisionStore::open(unreadable(false));
        store.set_decision(p1(), Decision::Accepted, at(3));

        assert!(store.is_degraded());
        assert_eq!(store.decision(&p1()), Some(Decision::Accepted));
        assert!(store.backend().saved.is_none());
        assert!(store.persist().is_err());
    }

    #[test]
    fn null_notes_keep_the_decision() {
        let payload = r#"{"p1_0": {"decision": "accepted", "notes": null}}"#;
        let store = DecisionStore::open(MemoryBackend::with_payload(payload));
        let rec = store.get(&p1()).unwrap();
        assert_eq!(rec.decision, Some(Decision::Accepted));
        assert_eq!(rec.notes, "");
    }
}
