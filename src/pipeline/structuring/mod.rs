pub mod extract;
pub mod grouping;
pub mod normalize;
pub mod orchestrator;
pub mod types;

pub use extract::*;
pub use grouping::*;
pub use normalize::*;
pub use orchestrator::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructuringError {
    /// Raw detections arrived in a shape this pipeline does not recognize.
    /// Not retried; the caller decides whether to surface or abort.
    #[error("unrecognized raw OCR response shape")]
    UnsupportedOcrFormat,

    /// No usable lines at all. Partial extraction is success, not error.
    #[error("no extractable test results found in report")]
    EmptyReport,

    /// The pre-structured JSON bypass received malformed record JSON.
    #[error("invalid medical record JSON: {0}")]
    InvalidRecordJson(String),

    /// The caller abandoned the request.
    #[error("report structuring cancelled")]
    Cancelled,
}
