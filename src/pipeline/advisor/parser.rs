//! Lenient extraction of the candidate recommendation JSON from provider
//! output. Providers wrap JSON in markdown fences or prose despite being
//! told not to; the parser digs the object out before deserializing.

use crate::models::RecommendationSet;

use super::AdvisorError;

/// Parse a structuring provider's response into a candidate set.
///
/// Accepts a ```json fenced block, bare ``` fences, a raw object, or an
/// object embedded in prose. Unknown fields are ignored; missing fields
/// default and are left for validation to judge.
pub fn parse_recommendation_json(response: &str) -> Result<RecommendationSet, AdvisorError> {
    let candidate = extract_json_candidate(response)
        .ok_or_else(|| AdvisorError::InvalidStructure("no JSON object in response".into()))?;

    serde_json::from_str(candidate)
        .map_err(|e| AdvisorError::InvalidStructure(format!("JSON parse error: {e}")))
}

/// Find the JSON object text inside a possibly fenced/prose-wrapped response.
fn extract_json_candidate(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + 7..];
        let end = body.find("```").unwrap_or(body.len());
        return Some(body[..end].trim());
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        let end = stripped.find("```").unwrap_or(stripped.len());
        return Some(stripped[..end].trim());
    }

    // Raw or prose-embedded object: widest brace span
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&trimmed[start..=end])
}
