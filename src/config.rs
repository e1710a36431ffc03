//! Tunables for the structuring pipeline and the provider endpoints.
//!
//! Everything here has a sensible default; callers override fields rather
//! than supply a full configuration. Credential loading stays outside the
//! core — an `api_key` arrives already resolved.

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "labadvisor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-provider request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Line clustering tunables.
///
/// The tolerance is a fraction of the median detection height, never a pixel
/// constant, so grouping degrades gracefully across image resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Fraction of the running median detection height that a detection's
    /// vertical center may deviate from the cluster centroid and still join
    /// the cluster. The primary calibratable parameter of the pipeline.
    pub tolerance_ratio: f32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self { tolerance_ratio: 0.5 }
    }
}

/// One remote text-completion endpoint (OpenAI-style chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    /// Short label used in logs and error messages.
    pub name: String,
    /// Base URL up to but excluding `/chat/completions`.
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ProviderEndpoint {
    pub fn new(name: &str, base_url: &str, model: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: 1200,
            temperature: 0.5,
        }
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }
}

/// The four provider endpoints driven by the recommendation orchestrator:
/// a primary/secondary pair for content generation and an independent
/// primary/secondary pair for JSON structuring. A provider good at medical
/// reasoning may be poor at strict JSON output, so the pairs are tuned
/// separately (low temperature on the structuring side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub content_primary: ProviderEndpoint,
    pub content_secondary: ProviderEndpoint,
    pub format_primary: ProviderEndpoint,
    pub format_secondary: ProviderEndpoint,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        let mut format_primary = ProviderEndpoint::new(
            "gemini-flash",
            "https://generativelanguage.googleapis.com/v1beta/openai",
            "gemini-2.5-flash",
        );
        format_primary.temperature = 0.1;
        format_primary.max_tokens = 1500;

        let mut format_secondary = ProviderEndpoint::new(
            "deepseek-format",
            "https://router.huggingface.co/novita/v3/openai",
            "deepseek/deepseek-v3-turbo",
        );
        format_secondary.temperature = 0.1;
        format_secondary.max_tokens = 1500;

        Self {
            content_primary: ProviderEndpoint::new(
                "ii-medical",
                "https://router.huggingface.co/featherless-ai/v1",
                "Intelligent-Internet/II-Medical-8B",
            ),
            content_secondary: ProviderEndpoint::new(
                "deepseek-content",
                "https://router.huggingface.co/novita/v3/openai",
                "deepseek/deepseek-v3-turbo",
            ),
            format_primary,
            format_secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_default_is_half_median_height() {
        let config = GroupingConfig::default();
        assert!((config.tolerance_ratio - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let ep = ProviderEndpoint::new("x", "https://example.test/v1/", "m");
        assert_eq!(ep.base_url, "https://example.test/v1");
    }

    #[test]
    fn structuring_endpoints_run_cold() {
        let config = AdvisorConfig::default();
        assert!(config.format_primary.temperature < config.content_primary.temperature);
        assert!(config.format_secondary.temperature < config.content_secondary.temperature);
    }

    #[test]
    fn api_key_defaults_to_none() {
        let config = AdvisorConfig::default();
        assert!(config.content_primary.api_key.is_none());
        let with_key = config.content_primary.with_api_key(Some("k".into()));
        assert_eq!(with_key.api_key.as_deref(), Some("k"));
    }
}
