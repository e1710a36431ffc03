//! Line grouping: scan-order detections → reading-order lines.
//!
//! OCR returns detections in scan order. Clustering by vertical center with a
//! tolerance proportional to the median detection height recovers the visual
//! rows; exact pixel alignment cannot be assumed from scanned documents, so
//! the grouping is approximate by design.

use crate::config::GroupingConfig;

use super::types::{Detection, Line};

/// Cluster detections into lines, then order each line left to right.
///
/// A detection joins the current cluster when its vertical center lies within
/// `tolerance_ratio` × (median height observed so far) of the cluster's
/// running centroid; otherwise it starts a new cluster. An empty input yields
/// an empty line sequence, and a stray detection forms its own line.
pub fn group_into_lines(mut detections: Vec<Detection>, config: &GroupingConfig) -> Vec<Line> {
    if detections.is_empty() {
        return Vec::new();
    }

    detections.sort_by(|a, b| {
        a.vertical_center()
            .partial_cmp(&b.vertical_center())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut lines: Vec<Line> = Vec::new();
    let mut heights = MedianTracker::new();

    let mut iter = detections.into_iter();
    let first = iter.next().expect("non-empty checked above");
    heights.push(first.height());
    let mut centroid_sum = first.vertical_center();
    let mut current = vec![first];

    for det in iter {
        heights.push(det.height());
        let tolerance = config.tolerance_ratio * heights.median();
        let centroid = centroid_sum / current.len() as f32;

        if (det.vertical_center() - centroid).abs() <= tolerance {
            centroid_sum += det.vertical_center();
            current.push(det);
        } else {
            lines.push(finalize(std::mem::take(&mut current)));
            centroid_sum = det.vertical_center();
            current.push(det);
        }
    }
    lines.push(finalize(current));

    tracing::debug!(lines = lines.len(), "grouped detections into lines");
    lines
}

/// Sort a finalized cluster by horizontal start coordinate (reading order).
fn finalize(mut detections: Vec<Detection>) -> Line {
    detections.sort_by(|a, b| {
        a.left()
            .partial_cmp(&b.left())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Line { detections }
}

/// Incremental median over observed detection heights.
struct MedianTracker {
    sorted: Vec<f32>,
}

impl MedianTracker {
    fn new() -> Self {
        Self { sorted: Vec::new() }
    }

    fn push(&mut self, height: f32) {
        let idx = self
            .sorted
            .partition_point(|&h| h < height);
        self.sorted.insert(idx, height);
    }

    fn median(&self) -> f32 {
        let n = self.sorted.len();
        if n == 0 {
            return 0.0;
        }
        if n % 2 == 1 {
            self.sorted[n / 2]
        } else {
            (self.sorted[n / 2 - 1] + self.sorted[n / 2]) / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::structuring::types::BoundingBox;

    /// Detection with the given left x, vertical center and height.
    fn det(text: &str, x: f32, y_center: f32, height: f32) -> Detection {
        Detection {
            text: text.into(),
            bbox: BoundingBox {
                x,
                y: y_center - height / 2.0,
                width: 60.0,
                height,
            },
            confidence: 1.0,
        }
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        let lines = group_into_lines(Vec::new(), &GroupingConfig::default());
        assert!(lines.is_empty());
    }

    #[test]
    fn single_detection_forms_one_line() {
        let lines = group_into_lines(vec![det("A", 0.0, 100.0, 10.0)], &GroupingConfig::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "A");
    }

    #[test]
    fn nearby_centers_group_distant_split() {
        // Heights ~10 ⇒ tolerance 5; A(100) and B(102) share a line, C(300) not
        let detections = vec![
            det("A", 0.0, 100.0, 10.0),
            det("B", 80.0, 102.0, 10.0),
            det("C", 0.0, 300.0, 10.0),
        ];
        let lines = group_into_lines(detections, &GroupingConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "A B");
        assert_eq!(lines[1].text(), "C");
    }

    #[test]
    fn lines_ordered_left_to_right() {
        let detections = vec![
            det("10.2", 200.0, 100.0, 12.0),
            det("Hemoglobin", 10.0, 101.0, 12.0),
            det("g/dL", 300.0, 99.0, 12.0),
        ];
        let lines = group_into_lines(detections, &GroupingConfig::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Hemoglobin 10.2 g/dL");
    }

    #[test]
    fn scan_order_does_not_matter() {
        // Deliberately interleaved rows, as OCR engines emit them
        let detections = vec![
            det("row2-b", 100.0, 220.0, 12.0),
            det("row1-a", 0.0, 100.0, 12.0),
            det("row2-a", 0.0, 221.0, 12.0),
            det("row1-b", 100.0, 101.0, 12.0),
        ];
        let lines = group_into_lines(detections, &GroupingConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "row1-a row1-b");
        assert_eq!(lines[1].text(), "row2-a row2-b");
    }

    #[test]
    fn tolerance_scales_with_text_height() {
        // Same layout at 4x resolution still groups identically
        let small = vec![
            det("A", 0.0, 100.0, 10.0),
            det("B", 80.0, 103.0, 10.0),
        ];
        let large = vec![
            det("A", 0.0, 400.0, 40.0),
            det("B", 320.0, 412.0, 40.0),
        ];
        let config = GroupingConfig::default();
        assert_eq!(group_into_lines(small, &config).len(), 1);
        assert_eq!(group_into_lines(large, &config).len(), 1);
    }

    #[test]
    fn median_tracker_running_values() {
        let mut tracker = MedianTracker::new();
        tracker.push(10.0);
        assert_eq!(tracker.median(), 10.0);
        tracker.push(20.0);
        assert_eq!(tracker.median(), 15.0);
        tracker.push(12.0);
        assert_eq!(tracker.median(), 12.0);
    }
}
