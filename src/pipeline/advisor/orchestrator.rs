//! Recommendation orchestrator: cache lookup, findings analysis, then the
//! two provider stages with one-step fallback each.
//!
//! Stage order is fixed — content generation fully resolves (or fails
//! terminally) before any structuring call is made. Each stage tries its
//! primary provider once and, on failure, its secondary once; there are no
//! retry loops. Only a set that parsed and validated is ever cached.

use tracing::{info, info_span, warn};

use crate::cancel::CancelToken;
use crate::config::AdvisorConfig;
use crate::models::{Fingerprint, MedicalRecord, RecommendationSet};

use super::cache::RecommendationCache;
use super::client::HttpCompletionClient;
use super::findings::FindingsSummary;
use super::parser::parse_recommendation_json;
use super::prompt::{build_content_prompt, build_formatting_prompt};
use super::types::CompletionClient;
use super::validate::validate_recommendation_set;
use super::{AdvisorError, FailedStage};

type Provider = Box<dyn CompletionClient + Send + Sync>;

pub struct SpecialistAdvisor {
    content_primary: Provider,
    content_secondary: Provider,
    format_primary: Provider,
    format_secondary: Provider,
    cache: RecommendationCache,
}

impl SpecialistAdvisor {
    pub fn new(
        content_primary: Provider,
        content_secondary: Provider,
        format_primary: Provider,
        format_secondary: Provider,
    ) -> Self {
        Self {
            content_primary,
            content_secondary,
            format_primary,
            format_secondary,
            cache: RecommendationCache::new(),
        }
    }

    /// Build the advisor over HTTP clients for the four configured endpoints.
    pub fn from_config(config: AdvisorConfig) -> Self {
        Self::new(
            Box::new(HttpCompletionClient::new(config.content_primary)),
            Box::new(HttpCompletionClient::new(config.content_secondary)),
            Box::new(HttpCompletionClient::new(config.format_primary)),
            Box::new(HttpCompletionClient::new(config.format_secondary)),
        )
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    pub fn recommend(&self, record: &MedicalRecord) -> Result<RecommendationSet, AdvisorError> {
        self.recommend_with_cancel(record, &CancelToken::new())
    }

    /// Produce a validated recommendation set for the record's findings.
    ///
    /// Identical findings (same tests, same flags) are served from the cache
    /// without touching any provider, regardless of patient metadata.
    pub fn recommend_with_cancel(
        &self,
        record: &MedicalRecord,
        cancel: &CancelToken,
    ) -> Result<RecommendationSet, AdvisorError> {
        let fingerprint = Fingerprint::of_record(record);
        let span = info_span!("recommend", record_id = %record.record_id);
        let _guard = span.enter();

        if cancel.is_cancelled() {
            return Err(AdvisorError::Cancelled);
        }

        if let Some(cached) = self.cache.get(&fingerprint) {
            info!("serving recommendation from cache");
            return Ok(cached);
        }

        let findings = FindingsSummary::from_record(record);
        let findings_text = findings.to_text();

        let plan = self.generate_content(&findings_text, cancel)?;
        let set = self.format_plan(&plan, &findings_text, cancel)?;

        self.cache.put(fingerprint, set.clone());
        info!("recommendation generated and cached");
        Ok(set)
    }

    /// Content stage: free-form plan text from the findings summary.
    fn generate_content(
        &self,
        findings_text: &str,
        cancel: &CancelToken,
    ) -> Result<String, AdvisorError> {
        let prompt = build_content_prompt(findings_text);

        for (attempt, provider) in [&self.content_primary, &self.content_secondary]
            .into_iter()
            .enumerate()
        {
            if cancel.is_cancelled() {
                return Err(AdvisorError::Cancelled);
            }
            match provider.complete(&prompt) {
                Ok(text) if !text.trim().is_empty() => {
                    info!(provider = provider.name(), attempt, "content generated");
                    return Ok(text);
                }
                Ok(_) => {
                    warn!(provider = provider.name(), "content provider returned empty text");
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "content provider failed");
                }
            }
        }

        Err(AdvisorError::RecommendationUnavailable {
            stage: FailedStage::Content,
            findings: findings_text.to_string(),
        })
    }

    /// Formatting stage: plan text to a parsed, schema-valid set.
    ///
    /// A parse or validation failure counts the same as a provider failure —
    /// it consumes that provider's single attempt.
    fn format_plan(
        &self,
        plan: &str,
        findings_text: &str,
        cancel: &CancelToken,
    ) -> Result<RecommendationSet, AdvisorError> {
        let prompt = build_formatting_prompt(plan);

        for (attempt, provider) in [&self.format_primary, &self.format_secondary]
            .into_iter()
            .enumerate()
        {
            if cancel.is_cancelled() {
                return Err(AdvisorError::Cancelled);
            }
            match self.attempt_format(provider.as_ref(), &prompt) {
                Ok(set) => {
                    info!(provider = provider.name(), attempt, "plan structured and validated");
                    return Ok(set);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "formatting attempt failed");
                }
            }
        }

        Err(AdvisorError::RecommendationUnavailable {
            stage: FailedStage::Formatting,
            findings: findings_text.to_string(),
        })
    }

    fn attempt_format(
        &self,
        provider: &(dyn CompletionClient + Send + Sync),
        prompt: &str,
    ) -> Result<RecommendationSet, AdvisorError> {
        let response = provider.complete(prompt)?;
        let set = parse_recommendation_json(&response)?;
        validate_recommendation_set(&set)?;
        Ok(set)
    }
}
