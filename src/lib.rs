//! Lab-report structuring and wellness-recommendation pipeline.
//!
//! The crate turns raw OCR engine output into a structured [`models::MedicalRecord`]
//! and, from the record's abnormal findings, orchestrates remote text-completion
//! providers into a schema-validated [`models::RecommendationSet`].
//!
//! Two independent stages:
//! - [`pipeline::structuring`] — normalize OCR detections, cluster them into
//!   reading-order lines, extract test results with flags.
//! - [`pipeline::advisor`] — findings analysis, two provider pairs with
//!   one-step fallback, JSON parsing and validation, fingerprint-keyed caching.

pub mod cancel;
pub mod config;
pub mod models;
pub mod pipeline;

pub use cancel::CancelToken;
pub use config::{AdvisorConfig, GroupingConfig, ProviderEndpoint};
pub use models::{Fingerprint, MedicalRecord, RecommendationSet};
pub use pipeline::advisor::{AdvisorError, SpecialistAdvisor};
pub use pipeline::structuring::{ReportStructurer, StructuringError};
