//! The two processing stages: report structuring (OCR output to a record)
//! and recommendation orchestration (record to a validated advice set).

pub mod advisor;
pub mod structuring;
