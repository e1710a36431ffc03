//! Findings analysis: reduce a record to the flagged results only.
//!
//! Content providers receive this compact summary instead of the full record,
//! which keeps the payload small and leaves patient metadata out of every
//! provider call.

use crate::models::{Flag, MedicalRecord};

/// One flagged result, as sent to the content providers.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub name: String,
    pub value: String,
    pub unit: Option<String>,
    pub flag: Flag,
}

/// Reduced view of a record: flagged (non-normal) results only.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingsSummary {
    pub findings: Vec<Finding>,
}

impl FindingsSummary {
    pub fn from_record(record: &MedicalRecord) -> Self {
        let findings = record
            .results
            .iter()
            .filter(|r| r.is_valid() && r.flag.is_abnormal())
            .map(|r| Finding {
                name: r.name.clone(),
                value: r.value.to_string(),
                unit: r.unit.clone(),
                flag: r.flag,
            })
            .collect();
        Self { findings }
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Human-readable form, one finding per line — this is both the provider
    /// payload and what the caller gets back alongside a terminal failure.
    pub fn to_text(&self) -> String {
        if self.findings.is_empty() {
            return "All reported values fall within their reference ranges.".to_string();
        }
        self.findings
            .iter()
            .map(|f| {
                let unit = f.unit.as_deref().unwrap_or("");
                let sep = if unit.is_empty() { "" } else { " " };
                format!("{} {}: {}{sep}{unit}", capitalized(f.flag), f.name, f.value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn capitalized(flag: Flag) -> &'static str {
    match flag {
        Flag::Normal => "Normal",
        Flag::Low => "Low",
        Flag::High => "High",
        Flag::Critical => "Critical",
        Flag::Unknown => "Unknown",
    }
}
