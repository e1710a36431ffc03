pub mod cache;
pub mod client;
pub mod findings;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod validate;

pub use cache::*;
pub use client::*;
pub use findings::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;
pub use validate::*;

use thiserror::Error;

/// Which stage of the orchestration exhausted its provider pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Content,
    Formatting,
}

impl std::fmt::Display for FailedStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailedStage::Content => f.write_str("content generation"),
            FailedStage::Formatting => f.write_str("JSON formatting"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// A single provider call failed (timeout, transport, HTTP status or
    /// empty response). Triggers the one-step fallback, never a retry loop.
    #[error("provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// A structuring provider's output failed schema validation.
    /// Also triggers the one-step fallback.
    #[error("structured response failed validation: {0}")]
    InvalidStructure(String),

    /// Both providers of a stage failed. Terminal for the request; carries
    /// the findings summary so the caller can still render the results.
    #[error("recommendations unavailable: both {stage} providers failed")]
    RecommendationUnavailable { stage: FailedStage, findings: String },

    /// The caller abandoned the request.
    #[error("recommendation request cancelled")]
    Cancelled,
}
