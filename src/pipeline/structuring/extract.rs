//! Report field extractor: ordered lines → structured medical record.
//!
//! Each line is classified as patient metadata, a test result, or noise.
//! Partial reports are expected: unreadable lines are dropped, never fatal.
//! Only a line sequence with no extractable result at all is an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::cancel::CancelToken;
use crate::models::{Flag, MedicalRecord, PatientInfo, ReferenceRange, TestResult, TestValue};

use super::types::Line;
use super::StructuringError;

/// A standalone numeric token (comma decimals tolerated).
static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[.,]\d+)?$").expect("valid regex"));

/// A reference range glued into one token, e.g. "13.0-17.0".
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:[.,]\d+)?)\s*[-\u{2013}\u{2014}]\s*(\d+(?:[.,]\d+)?)$")
        .expect("valid regex")
});

/// Line prefixes that carry patient metadata. Longest prefix wins.
const METADATA_KEYS: &[(&str, MetaField)] = &[
    ("patient name", MetaField::Name),
    ("name", MetaField::Name),
    ("age", MetaField::Age),
    ("dob", MetaField::Date),
    ("report date", MetaField::Date),
    ("collection date", MetaField::Date),
    ("date", MetaField::Date),
];

/// Words that mark section headers and letterhead, not test names.
const SKIP_WORDS: &[&str] = &[
    "page",
    "panel",
    "physician",
    "laboratory",
    "specimen",
    "accession",
    "phone",
    "fax",
];

#[derive(Clone, Copy)]
enum MetaField {
    Name,
    Age,
    Date,
}

/// Walk ordered lines and build a medical record.
///
/// Result order matches document order of first appearance; duplicate test
/// names stay distinct. Fails with `EmptyReport` only when not a single
/// result could be extracted.
pub fn extract_record(lines: &[Line], cancel: &CancelToken) -> Result<MedicalRecord, StructuringError> {
    let mut patient = PatientInfo::default();
    let mut results = Vec::new();
    let mut noise = 0usize;

    for line in lines {
        if cancel.is_cancelled() {
            return Err(StructuringError::Cancelled);
        }
        let text = line.text();
        if apply_metadata(&text, &mut patient) {
            continue;
        }
        match parse_test_result(&text) {
            Some(result) => results.push(result),
            None => noise += 1,
        }
    }

    tracing::debug!(
        results = results.len(),
        noise,
        has_metadata = !patient.is_empty(),
        "extracted report fields"
    );

    if results.is_empty() {
        return Err(StructuringError::EmptyReport);
    }
    Ok(MedicalRecord::new(patient, results))
}

/// Match a metadata key prefix and capture the remainder as its value.
fn apply_metadata(text: &str, patient: &mut PatientInfo) -> bool {
    for (key, field) in METADATA_KEYS {
        if text.len() < key.len() || !text.is_char_boundary(key.len()) {
            continue;
        }
        let (head, rest) = text.split_at(key.len());
        if !head.eq_ignore_ascii_case(key) {
            continue;
        }
        // The key must end at a word boundary: "Name:" yes, "Named" no
        if !rest.is_empty() && !rest.starts_with([':', ' ', '\t']) {
            continue;
        }
        let value = rest.trim_start_matches([':', ' ', '\t']).trim();
        if value.is_empty() {
            return false;
        }
        let slot = match field {
            MetaField::Name => &mut patient.name,
            MetaField::Age => &mut patient.age,
            MetaField::Date => &mut patient.date,
        };
        // First occurrence wins; later repeats are usually footer noise
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
        return true;
    }
    false
}

/// Parse one line against the test-result grammar: name tokens, the first
/// standalone numeric token as value, then optional unit, flag marker and
/// reference range in any gap-tolerant arrangement.
fn parse_test_result(text: &str) -> Option<TestResult> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let value_idx = tokens.iter().position(|t| parse_number(t).is_some())?;
    let value = parse_number(tokens[value_idx])?;

    let name = tokens[..value_idx].join(" ");
    let name = name.trim_end_matches(':').trim();
    if name.is_empty() {
        return None;
    }
    let name_lower = name.to_lowercase();
    if SKIP_WORDS.iter().any(|w| name_lower.contains(w)) {
        return None;
    }

    let mut unit: Option<String> = None;
    let mut range: Option<ReferenceRange> = None;
    let mut marker: Option<Flag> = None;

    let mut i = value_idx + 1;
    while i < tokens.len() {
        let token = tokens[i].trim_matches(['(', ')', ',', ';']);

        if range.is_none() {
            if let Some(r) = parse_range_token(token) {
                range = Some(r);
                i += 1;
                continue;
            }
            // Spaced form: "13.0 - 17.0"
            if i + 2 < tokens.len()
                && matches!(tokens[i + 1], "-" | "\u{2013}" | "\u{2014}")
            {
                if let (Some(low), Some(high)) = (parse_number(token), parse_number(tokens[i + 2]))
                {
                    range = Some(ReferenceRange::Bounds { low, high });
                    i += 3;
                    continue;
                }
            }
        }

        if marker.is_none() {
            if let Some(flag) = parse_flag_marker(token) {
                marker = Some(flag);
                i += 1;
                continue;
            }
        }

        if unit.is_none() && looks_like_unit(token) {
            unit = Some(token.to_string());
        }
        i += 1;
    }

    // Range comparison is authoritative; a printed flag column only counts
    // when the document gives no numeric range to check against.
    let flag = match &range {
        Some(r) => r.flag_for(value),
        None => marker.unwrap_or(Flag::Unknown),
    };

    Some(TestResult {
        name: name.to_string(),
        value: TestValue::Numeric(value),
        unit,
        reference_range: range,
        flag,
    })
}

fn parse_number(token: &str) -> Option<f64> {
    let stripped = token.trim_matches(['(', ')', ',', ';', ':']);
    if !NUMERIC_RE.is_match(stripped) {
        return None;
    }
    parse_decimal(stripped)
}

/// Decimal with a dot or comma separator. A comma before exactly three
/// digits reads as a thousands separator ("250,000"), not a decimal mark —
/// except after a bare zero ("0,125"), which can only be a decimal.
fn parse_decimal(text: &str) -> Option<f64> {
    match text.split_once(',') {
        Some((head, tail)) if tail.len() == 3 && head != "0" => {
            format!("{head}{tail}").parse().ok()
        }
        _ => text.replace(',', ".").parse().ok(),
    }
}

fn parse_range_token(token: &str) -> Option<ReferenceRange> {
    let caps = RANGE_RE.captures(token)?;
    let low = parse_decimal(&caps[1])?;
    let high = parse_decimal(&caps[2])?;
    Some(ReferenceRange::Bounds { low, high })
}

/// Flag column markers as printed on lab reports.
fn parse_flag_marker(token: &str) -> Option<Flag> {
    match token {
        "H" => Some(Flag::High),
        "L" => Some(Flag::Low),
        "HH" | "LL" | "*" => Some(Flag::Critical),
        _ => None,
    }
}

fn looks_like_unit(token: &str) -> bool {
    !token.is_empty()
        && parse_number(token).is_none()
        && parse_range_token(token).is_none()
        && token.chars().any(|c| c.is_alphabetic() || c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::structuring::types::{BoundingBox, Detection};

    fn line(text: &str) -> Line {
        Line {
            detections: vec![Detection {
                text: text.into(),
                bbox: BoundingBox { x: 0.0, y: 0.0, width: 100.0, height: 12.0 },
                confidence: 1.0,
            }],
        }
    }

    fn extract(texts: &[&str]) -> Result<MedicalRecord, StructuringError> {
        let lines: Vec<Line> = texts.iter().map(|t| line(t)).collect();
        extract_record(&lines, &CancelToken::new())
    }

    #[test]
    fn full_result_line_with_range() {
        let record = extract(&["Hemoglobin 10.2 g/dL 13.0-17.0"]).unwrap();
        let result = &record.results[0];
        assert_eq!(result.name, "Hemoglobin");
        assert_eq!(result.value, TestValue::Numeric(10.2));
        assert_eq!(result.unit.as_deref(), Some("g/dL"));
        assert_eq!(
            result.reference_range,
            Some(ReferenceRange::Bounds { low: 13.0, high: 17.0 })
        );
        assert_eq!(result.flag, Flag::Low);
    }

    #[test]
    fn spaced_range_is_recognized() {
        let record = extract(&["Potassium 4.2 mmol/L 3.5 - 5.0"]).unwrap();
        assert_eq!(
            record.results[0].reference_range,
            Some(ReferenceRange::Bounds { low: 3.5, high: 5.0 })
        );
        assert_eq!(record.results[0].flag, Flag::Normal);
    }

    #[test]
    fn parenthesized_range_is_recognized() {
        let record = extract(&["Creatinine 1.8 mg/dL (0.7-1.3)"]).unwrap();
        assert_eq!(record.results[0].flag, Flag::High);
    }

    #[test]
    fn no_range_means_unknown_flag() {
        let record = extract(&["Glucose 95 mg/dL"]).unwrap();
        assert_eq!(record.results[0].flag, Flag::Unknown);
        assert!(record.results[0].reference_range.is_none());
    }

    #[test]
    fn printed_flag_marker_used_without_range() {
        let record = extract(&["Glucose 180 H mg/dL"]).unwrap();
        assert_eq!(record.results[0].flag, Flag::High);
        assert_eq!(record.results[0].unit.as_deref(), Some("mg/dL"));
    }

    #[test]
    fn range_wins_over_printed_marker() {
        // Marker says H but the value sits inside the printed range
        let record = extract(&["Sodium 140 H mmol/L 136-145"]).unwrap();
        assert_eq!(record.results[0].flag, Flag::Normal);
    }

    #[test]
    fn name_with_colon_is_trimmed() {
        let record = extract(&["Glucose: 95 mg/dL"]).unwrap();
        assert_eq!(record.results[0].name, "Glucose");
    }

    #[test]
    fn comma_decimal_values_parse() {
        let record = extract(&["H\u{e9}moglobine 14,2 g/dL 12,0-16,0"]).unwrap();
        assert_eq!(record.results[0].value, TestValue::Numeric(14.2));
        assert_eq!(record.results[0].flag, Flag::Normal);
    }

    #[test]
    fn comma_groups_of_three_read_as_thousands() {
        let record = extract(&["Platelets 250,000 /uL 150,000-450,000"]).unwrap();
        assert_eq!(record.results[0].value, TestValue::Numeric(250_000.0));
        assert_eq!(
            record.results[0].reference_range,
            Some(ReferenceRange::Bounds { low: 150_000.0, high: 450_000.0 })
        );
        assert_eq!(record.results[0].flag, Flag::Normal);
    }

    #[test]
    fn zero_comma_three_digits_is_a_decimal() {
        assert_eq!(parse_number("0,125"), Some(0.125));
        assert_eq!(parse_number("10,000"), Some(10_000.0));
        assert_eq!(parse_number("14,2"), Some(14.2));
    }

    #[test]
    fn metadata_lines_fill_patient_info() {
        let record = extract(&[
            "Patient Name: Marie Dubois",
            "Age 45",
            "Report Date 2024-02-01",
            "Potassium 4.2 mmol/L 3.5-5.0",
        ])
        .unwrap();
        assert_eq!(record.patient.name.as_deref(), Some("Marie Dubois"));
        assert_eq!(record.patient.age.as_deref(), Some("45"));
        assert_eq!(record.patient.date.as_deref(), Some("2024-02-01"));
        assert_eq!(record.results.len(), 1);
    }

    #[test]
    fn headers_and_noise_are_dropped_not_fatal() {
        let record = extract(&[
            "Acme Medical Laboratory",
            "Complete Blood Count",
            "Test Result Unit Reference",
            "WBC 11.2 10^9/L 4.0-10.0",
            "Page 1 of 2",
        ])
        .unwrap();
        assert_eq!(record.results.len(), 1);
        assert_eq!(record.results[0].name, "WBC");
        assert_eq!(record.results[0].flag, Flag::High);
    }

    #[test]
    fn multi_word_test_names() {
        let record = extract(&["Total Cholesterol 240 mg/dL 125-200"]).unwrap();
        assert_eq!(record.results[0].name, "Total Cholesterol");
        assert_eq!(record.results[0].flag, Flag::High);
    }

    #[test]
    fn document_order_is_preserved() {
        let record = extract(&[
            "Sodium 140 mmol/L 136-145",
            "Potassium 4.2 mmol/L 3.5-5.0",
            "Sodium 139 mmol/L 136-145",
        ])
        .unwrap();
        let names: Vec<&str> = record.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Sodium", "Potassium", "Sodium"]);
    }

    #[test]
    fn all_noise_is_empty_report() {
        let result = extract(&["Acme Laboratory", "Signature", "Thank you"]);
        assert!(matches!(result, Err(StructuringError::EmptyReport)));
    }

    #[test]
    fn empty_line_sequence_is_empty_report() {
        let result = extract_record(&[], &CancelToken::new());
        assert!(matches!(result, Err(StructuringError::EmptyReport)));
    }

    #[test]
    fn cancellation_stops_the_walk() {
        let token = CancelToken::new();
        token.cancel();
        let lines = vec![line("Sodium 140 mmol/L 136-145")];
        let result = extract_record(&lines, &token);
        assert!(matches!(result, Err(StructuringError::Cancelled)));
    }

    #[test]
    fn dob_line_is_metadata_not_noise() {
        let record = extract(&[
            "DOB: 1979-01-01",
            "Sodium 140 mmol/L 136-145",
        ])
        .unwrap();
        assert_eq!(record.patient.date.as_deref(), Some("1979-01-01"));
        assert_eq!(record.results.len(), 1);
    }

    #[test]
    fn metadata_key_needs_a_word_boundary() {
        // "Named" must not be read as a "Name" metadata line
        let record = extract(&["Named Peak Flow 350 L/min 400-700"]).unwrap();
        assert!(record.patient.name.is_none());
        assert_eq!(record.results[0].name, "Named Peak Flow");
    }

    #[test]
    fn first_metadata_occurrence_wins() {
        let record = extract(&[
            "Date 2024-02-01",
            "Date 1999-01-01",
            "Sodium 140 mmol/L 136-145",
        ])
        .unwrap();
        assert_eq!(record.patient.date.as_deref(), Some("2024-02-01"));
    }
}
