//! Detection normalizer: heterogeneous raw OCR shapes → uniform detections.
//!
//! Pure transform. Detections with unusable geometry are skipped, never
//! repaired; missing confidence defaults to the 1.0 sentinel.

use super::types::{Detection, BoundingBox, LayoutResponse, LegacyEntry, RawOcrResponse};
use super::StructuringError;

/// Confidence assigned when the source shape carries no score.
pub const DEFAULT_CONFIDENCE: f32 = 1.0;

/// Parse a raw OCR response body into one of the known shapes.
pub fn parse_raw_response(raw: &str) -> Result<RawOcrResponse, StructuringError> {
    serde_json::from_str(raw).map_err(|_| StructuringError::UnsupportedOcrFormat)
}

/// Same, for an already-parsed JSON value.
pub fn raw_response_from_value(value: serde_json::Value) -> Result<RawOcrResponse, StructuringError> {
    serde_json::from_value(value).map_err(|_| StructuringError::UnsupportedOcrFormat)
}

/// Convert a recognized raw response into the uniform detection list.
pub fn normalize(response: RawOcrResponse) -> Vec<Detection> {
    match response {
        RawOcrResponse::Layout(layout) => normalize_layout(layout),
        RawOcrResponse::Legacy(entries) => normalize_legacy(entries),
    }
}

fn normalize_layout(layout: LayoutResponse) -> Vec<Detection> {
    let total = layout.rec_texts.len();
    let scores = layout.rec_scores.unwrap_or_default();

    let mut detections = Vec::with_capacity(total);
    // Parallel arrays zipped to the shortest; trailing unmatched entries
    // carry no geometry and are dropped with the rest.
    for (i, (text, poly)) in layout
        .rec_texts
        .into_iter()
        .zip(layout.rec_polys.into_iter())
        .enumerate()
    {
        if text.trim().is_empty() {
            continue;
        }
        let Some(bbox) = BoundingBox::from_polygon(&poly) else {
            tracing::debug!(index = i, "skipping detection with unusable geometry");
            continue;
        };
        let confidence = scores.get(i).copied().unwrap_or(DEFAULT_CONFIDENCE);
        detections.push(Detection { text, bbox, confidence });
    }

    tracing::debug!(kept = detections.len(), total, "normalized layout response");
    detections
}

fn normalize_legacy(entries: Vec<LegacyEntry>) -> Vec<Detection> {
    let total = entries.len();
    let mut detections = Vec::with_capacity(total);
    for (i, entry) in entries.into_iter().enumerate() {
        let (poly, payload) = entry.into_parts();
        let text = payload.text().trim();
        if text.is_empty() {
            continue;
        }
        let Some(bbox) = BoundingBox::from_polygon(&poly) else {
            tracing::debug!(index = i, "skipping detection with unusable geometry");
            continue;
        };
        detections.push(Detection {
            text: text.to_string(),
            bbox,
            confidence: payload.score().unwrap_or(DEFAULT_CONFIDENCE),
        });
    }

    tracing::debug!(kept = detections.len(), total, "normalized legacy response");
    detections
}
