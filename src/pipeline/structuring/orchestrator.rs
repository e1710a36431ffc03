//! Structuring pipeline entry points.
//!
//! Raw OCR path: parse → normalize → group → extract, one report at a time.
//! Bypass path: pre-structured record JSON, validated against the record
//! invariants, for callers that skip OCR entirely.

use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::config::GroupingConfig;
use crate::models::MedicalRecord;

use super::extract::extract_record;
use super::grouping::group_into_lines;
use super::normalize::{normalize, parse_raw_response, raw_response_from_value};
use super::StructuringError;

/// Turns a raw OCR response into a canonical medical record.
#[derive(Debug, Default)]
pub struct ReportStructurer {
    grouping: GroupingConfig,
}

impl ReportStructurer {
    pub fn new(grouping: GroupingConfig) -> Self {
        Self { grouping }
    }

    /// Structure a raw OCR response body (one of the two documented shapes).
    pub fn structure(&self, raw_json: &str) -> Result<MedicalRecord, StructuringError> {
        self.structure_with_cancel(raw_json, &CancelToken::new())
    }

    pub fn structure_with_cancel(
        &self,
        raw_json: &str,
        cancel: &CancelToken,
    ) -> Result<MedicalRecord, StructuringError> {
        let response = parse_raw_response(raw_json)?;
        self.run(response, cancel)
    }

    /// Structure an already-parsed raw OCR response value.
    pub fn structure_value(
        &self,
        value: serde_json::Value,
    ) -> Result<MedicalRecord, StructuringError> {
        let response = raw_response_from_value(value)?;
        self.run(response, &CancelToken::new())
    }

    fn run(
        &self,
        response: super::types::RawOcrResponse,
        cancel: &CancelToken,
    ) -> Result<MedicalRecord, StructuringError> {
        let record_id = Uuid::new_v4();
        let _span = tracing::info_span!("structure_report", record_id = %record_id).entered();

        let detections = normalize(response);
        tracing::info!(detections = detections.len(), "normalized raw detections");
        if cancel.is_cancelled() {
            return Err(StructuringError::Cancelled);
        }

        let lines = group_into_lines(detections, &self.grouping);
        tracing::info!(lines = lines.len(), "grouped detections into lines");

        let mut record = extract_record(&lines, cancel)?;
        record.record_id = record_id;
        tracing::info!(results = record.results.len(), "report structured");
        Ok(record)
    }
}

/// Pre-structured JSON bypass: used when the OCR path is unavailable.
///
/// Enforces the record invariants — results without a name or value are
/// discarded, and a record left with no result is rejected.
pub fn record_from_json(json: &str) -> Result<MedicalRecord, StructuringError> {
    let mut record: MedicalRecord = serde_json::from_str(json)
        .map_err(|e| StructuringError::InvalidRecordJson(e.to_string()))?;

    let before = record.results.len();
    record.retain_valid();
    let dropped = before - record.results.len();
    if dropped > 0 {
        tracing::warn!(record_id = %record.record_id, dropped, "discarded invalid test results");
    }

    if record.results.is_empty() {
        return Err(StructuringError::EmptyReport);
    }
    Ok(record)
}
