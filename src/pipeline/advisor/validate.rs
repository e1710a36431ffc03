//! Schema validation for candidate recommendation sets.
//!
//! Runs after parsing, before caching. A failure here drives the same
//! one-step fallback as a provider failure.

use crate::models::RecommendationSet;

use super::AdvisorError;

/// Check the required shape: three non-empty lists whose items carry their
/// required text, plus a non-blank disclaimer.
pub fn validate_recommendation_set(set: &RecommendationSet) -> Result<(), AdvisorError> {
    if set.diet.is_empty() {
        return Err(invalid("diet list is empty"));
    }
    if set.exercise.is_empty() {
        return Err(invalid("exercise list is empty"));
    }
    if set.lifestyle.is_empty() {
        return Err(invalid("lifestyle list is empty"));
    }
    if set.disclaimer.trim().is_empty() {
        return Err(invalid("disclaimer is missing or blank"));
    }

    if set.diet.iter().any(|d| d.item.trim().is_empty()) {
        return Err(invalid("diet item without text"));
    }
    if set.exercise.iter().any(|e| e.activity.trim().is_empty()) {
        return Err(invalid("exercise item without activity"));
    }
    if set.lifestyle.iter().any(|l| l.advice.trim().is_empty()) {
        return Err(invalid("lifestyle item without advice"));
    }

    Ok(())
}

fn invalid(reason: &str) -> AdvisorError {
    tracing::debug!(reason, "recommendation set failed validation");
    AdvisorError::InvalidStructure(reason.to_string())
}
