//! Canonical medical record model.
//!
//! This is the shape shared by the structuring pipeline (producer), the
//! recommendation orchestrator (consumer), and the external visualization
//! layer (consumer, via JSON). Patient metadata is always optional; a record
//! is usable as soon as it carries at least one test result.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categorical position of a test value relative to its reference range.
///
/// `Unknown` is a first-class value, not an absence: it means the result
/// carried no usable range to compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    Normal,
    Low,
    High,
    Critical,
    Unknown,
}

impl Flag {
    /// Stable string form used in fingerprints and findings summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Normal => "normal",
            Flag::Low => "low",
            Flag::High => "high",
            Flag::Critical => "critical",
            Flag::Unknown => "unknown",
        }
    }

    /// Whether this flag marks a result worth surfacing to the advisor.
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Flag::Low | Flag::High | Flag::Critical)
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A test value as reported: numeric when the document gives a number,
/// textual otherwise (e.g. "Negative", "A+").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestValue {
    Numeric(f64),
    Text(String),
}

impl TestValue {
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            TestValue::Numeric(v) => Some(*v),
            TestValue::Text(_) => None,
        }
    }

    /// True for values that carry no information (blank text).
    pub fn is_blank(&self) -> bool {
        match self {
            TestValue::Numeric(_) => false,
            TestValue::Text(t) => t.trim().is_empty(),
        }
    }
}

impl std::fmt::Display for TestValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestValue::Numeric(v) => write!(f, "{v}"),
            TestValue::Text(t) => f.write_str(t),
        }
    }
}

/// Reference range: numeric bounds when the document prints a low/high pair,
/// free text otherwise ("Negative", "< 150").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceRange {
    Bounds { low: f64, high: f64 },
    Text(String),
}

impl ReferenceRange {
    /// Explicit three-way comparison of a numeric value against the range.
    ///
    /// Within bounds is `Normal`; beyond a bound by more than the full range
    /// span is `Critical`; textual ranges cannot be compared and yield
    /// `Unknown`.
    pub fn flag_for(&self, value: f64) -> Flag {
        match self {
            ReferenceRange::Bounds { low, high } => {
                let span = (high - low).max(0.0);
                if value < low - span || value > high + span {
                    Flag::Critical
                } else if value < *low {
                    Flag::Low
                } else if value > *high {
                    Flag::High
                } else {
                    Flag::Normal
                }
            }
            ReferenceRange::Text(_) => Flag::Unknown,
        }
    }
}

impl std::fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceRange::Bounds { low, high } => write!(f, "{low}-{high}"),
            ReferenceRange::Text(t) => f.write_str(t),
        }
    }
}

/// One test result in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub value: TestValue,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub reference_range: Option<ReferenceRange>,
    #[serde(default = "default_flag")]
    pub flag: Flag,
}

fn default_flag() -> Flag {
    Flag::Unknown
}

impl TestResult {
    /// A result is kept only when it has a name and a non-blank value.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.value.is_blank()
    }
}

/// Patient metadata. Never required for downstream processing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.date.is_none()
    }
}

/// The canonical record produced by the structuring pipeline.
///
/// Result order is document order of first appearance; duplicate test names
/// are kept distinct, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    #[serde(default = "Uuid::new_v4")]
    pub record_id: Uuid,
    #[serde(default)]
    pub patient: PatientInfo,
    pub results: Vec<TestResult>,
}

impl MedicalRecord {
    pub fn new(patient: PatientInfo, results: Vec<TestResult>) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            patient,
            results,
        }
    }

    /// A record is usable once it carries at least one valid result.
    pub fn is_usable(&self) -> bool {
        self.results.iter().any(TestResult::is_valid)
    }

    /// Drop results that violate the name/value invariant.
    pub fn retain_valid(&mut self) {
        self.results.retain(TestResult::is_valid);
    }
}
