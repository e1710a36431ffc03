//! Deterministic cache key over a record's findings.
//!
//! Two records with the same (test name, flag) multiset produce the same
//! fingerprint no matter the detection order or patient metadata, so a
//! re-scan of the same report is satisfied from cache.

use sha2::{Digest, Sha256};

use super::record::MedicalRecord;

/// SHA-256 of the sorted (normalized name, flag) multiset, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of_record(record: &MedicalRecord) -> Self {
        let mut pairs: Vec<(String, &'static str)> = record
            .results
            .iter()
            .filter(|r| r.is_valid())
            .map(|r| (r.name.trim().to_lowercase(), r.flag.as_str()))
            .collect();
        pairs.sort();

        let mut hasher = Sha256::new();
        for (name, flag) in &pairs {
            hasher.update(name.as_bytes());
            // Unit separator between fields, record separator between pairs,
            // so ("ab", "c") and ("a", "bc") cannot collide.
            hasher.update([0x1f]);
            hasher.update(flag.as_bytes());
            hasher.update([0x1e]);
        }

        let digest = hasher.finalize();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        Fingerprint(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
