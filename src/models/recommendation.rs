//! Recommendation set returned by the advisor.
//!
//! This is the schema the JSON-structuring providers must produce. All four
//! top-level fields are required after validation; the shape is deliberately
//! lenient on deserialization (defaults instead of hard serde failures) so
//! that validation can report what is missing instead of a parse error.

use serde::{Deserialize, Serialize};

/// Whether a food should be added to or removed from the diet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietAction {
    #[default]
    Include,
    Avoid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietItem {
    pub item: String,
    #[serde(default)]
    pub action: DietAction,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseItem {
    pub activity: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleItem {
    pub advice: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Validated recommendation output. Lives only for the process lifetime —
/// cached in memory, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    #[serde(default)]
    pub diet: Vec<DietItem>,
    #[serde(default)]
    pub exercise: Vec<ExerciseItem>,
    #[serde(default)]
    pub lifestyle: Vec<LifestyleItem>,
    #[serde(default)]
    pub disclaimer: String,
}
