//! Positional OCR detection types and the raw input variants.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Build from a detection polygon (usually four corner points).
    ///
    /// Returns `None` for degenerate geometry — fewer than two points or any
    /// non-finite coordinate. The normalizer rejects such detections rather
    /// than fabricate a box.
    pub fn from_polygon(points: &[[f32; 2]]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        if points.iter().flatten().any(|c| !c.is_finite()) {
            return None;
        }

        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for [x, y] in points {
            min_x = min_x.min(*x);
            min_y = min_y.min(*y);
            max_x = max_x.max(*x);
            max_y = max_y.max(*y);
        }

        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    pub fn vertical_center(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// One OCR-recognized text span with position and confidence.
/// Immutable once produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub text: String,
    pub bbox: BoundingBox,
    /// 0–1; 1.0 when the source shape carried no score.
    pub confidence: f32,
}

impl Detection {
    pub fn vertical_center(&self) -> f32 {
        self.bbox.vertical_center()
    }

    pub fn height(&self) -> f32 {
        self.bbox.height
    }

    pub fn left(&self) -> f32 {
        self.bbox.x
    }
}

/// A reading-order cluster of detections approximating one visual row.
/// Derived during grouping, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub detections: Vec<Detection>,
}

impl Line {
    /// The line's text in reading order, space joined.
    pub fn text(&self) -> String {
        self.detections
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Rich layout-aware OCR response: parallel arrays of texts, corner polygons
/// and per-detection scores.
#[derive(Debug, Deserialize)]
pub struct LayoutResponse {
    pub rec_texts: Vec<String>,
    pub rec_polys: Vec<Vec<[f32; 2]>>,
    #[serde(default)]
    pub rec_scores: Option<Vec<f32>>,
}

/// One entry of the legacy flat extraction mode. Providers emit the pair in
/// either order — `[text, polygon]` or `[polygon, text]` — and the text slot
/// itself may be `"text"` or `[text, score]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyEntry {
    TextFirst(LegacyText, Vec<[f32; 2]>),
    PolyFirst(Vec<[f32; 2]>, LegacyText),
}

impl LegacyEntry {
    pub fn into_parts(self) -> (Vec<[f32; 2]>, LegacyText) {
        match self {
            LegacyEntry::TextFirst(text, poly) | LegacyEntry::PolyFirst(poly, text) => {
                (poly, text)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyText {
    Bare(String),
    Scored(String, f32),
}

impl LegacyText {
    pub fn text(&self) -> &str {
        match self {
            LegacyText::Bare(t) | LegacyText::Scored(t, _) => t,
        }
    }

    pub fn score(&self) -> Option<f32> {
        match self {
            LegacyText::Bare(_) => None,
            LegacyText::Scored(_, s) => Some(*s),
        }
    }
}

/// The two documented raw OCR response shapes, dispatched by serde.
/// Anything that fits neither is `UnsupportedOcrFormat`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawOcrResponse {
    Layout(LayoutResponse),
    Legacy(Vec<LegacyEntry>),
}
