//! Process-lifetime recommendation cache.
//!
//! Maps a findings fingerprint to its validated recommendation set. Created
//! once per process, torn down at process exit; no persistence, no eviction,
//! no TTL — explicitly unbounded within a run. The internal mutex serializes
//! get/put so concurrent sessions see last-writer-wins per key.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Fingerprint, RecommendationSet};

pub struct RecommendationCache {
    entries: Mutex<HashMap<Fingerprint, RecommendationSet>>,
}

impl RecommendationCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<RecommendationSet> {
        self.entries
            .lock()
            .expect("cache lock")
            .get(fingerprint)
            .cloned()
    }

    /// Store a validated set. Idempotent: a second put for the same key
    /// silently overwrites.
    pub fn put(&self, fingerprint: Fingerprint, set: RecommendationSet) {
        self.entries.lock().expect("cache lock").insert(fingerprint, set);
    }

    /// Explicit invalidation — the only way an entry is replaced by absence.
    pub fn invalidate(&self, fingerprint: &Fingerprint) {
        self.entries.lock().expect("cache lock").remove(fingerprint);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DietItem, ExerciseItem, Flag, LifestyleItem, MedicalRecord, PatientInfo,
        TestResult, TestValue};

    fn fingerprint(name: &str, flag: Flag) -> Fingerprint {
        let record = MedicalRecord::new(
            PatientInfo::default(),
            vec![TestResult {
                name: name.into(),
                value: TestValue::Numeric(1.0),
                unit: None,
                reference_range: None,
                flag,
            }],
        );
        Fingerprint::of_record(&record)
    }

    fn set(disclaimer: &str) -> RecommendationSet {
        RecommendationSet {
            diet: vec![DietItem { item: "Oats".into(), action: Default::default(), reason: None }],
            exercise: vec![ExerciseItem {
                activity: "Walking".into(),
                frequency: "daily".into(),
                duration: "30 min".into(),
            }],
            lifestyle: vec![LifestyleItem { advice: "Hydrate".into(), category: None }],
            disclaimer: disclaimer.into(),
        }
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = RecommendationCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&fingerprint("Glucose", Flag::High)).is_none());
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = RecommendationCache::new();
        let fp = fingerprint("Glucose", Flag::High);
        cache.put(fp.clone(), set("v1"));
        assert_eq!(cache.get(&fp).unwrap().disclaimer, "v1");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn second_put_overwrites_silently() {
        let cache = RecommendationCache::new();
        let fp = fingerprint("Glucose", Flag::High);
        cache.put(fp.clone(), set("v1"));
        cache.put(fp.clone(), set("v2"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&fp).unwrap().disclaimer, "v2");
    }

    #[test]
    fn unrelated_fingerprints_are_independent() {
        let cache = RecommendationCache::new();
        let a = fingerprint("Glucose", Flag::High);
        let b = fingerprint("Hemoglobin", Flag::Low);
        cache.put(a.clone(), set("for-a"));
        cache.put(b.clone(), set("for-b"));
        assert_eq!(cache.get(&a).unwrap().disclaimer, "for-a");
        assert_eq!(cache.get(&b).unwrap().disclaimer, "for-b");
    }

    #[test]
    fn invalidate_removes_single_entry() {
        let cache = RecommendationCache::new();
        let a = fingerprint("Glucose", Flag::High);
        let b = fingerprint("Hemoglobin", Flag::Low);
        cache.put(a.clone(), set("for-a"));
        cache.put(b.clone(), set("for-b"));

        cache.invalidate(&a);
        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());
        assert_eq!(cache.len(), 1);
    }
}
