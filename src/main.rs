//! Command-line front end: structure a lab report and optionally request
//! recommendations for it.
//!
//! Usage:
//!   labadvisor <ocr-response.json> [--record] [--recommend]
//!
//! `--record` treats the input as pre-structured record JSON instead of a
//! raw OCR response. `--recommend` runs the advisor against the default
//! provider endpoints, reading `PROVIDER_API_KEY` / `GEMINI_API_KEY` from
//! the environment.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use labadvisor::config::{AdvisorConfig, GroupingConfig};
use labadvisor::pipeline::advisor::SpecialistAdvisor;
use labadvisor::pipeline::structuring::{record_from_json, ReportStructurer};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let flags: Vec<&str> = args.iter().map(String::as_str).filter(|a| a.starts_with("--")).collect();
    let Some(path) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("usage: labadvisor <input.json> [--record] [--recommend]");
        return ExitCode::FAILURE;
    };

    let input = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cannot read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let record = if flags.contains(&"--record") {
        record_from_json(&input)
    } else {
        ReportStructurer::new(GroupingConfig::default()).structure(&input)
    };
    let record = match record {
        Ok(r) => r,
        Err(e) => {
            eprintln!("structuring failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("cannot serialize record: {e}");
            return ExitCode::FAILURE;
        }
    }

    if flags.contains(&"--recommend") {
        let provider_key = std::env::var("PROVIDER_API_KEY").ok();
        let gemini_key = std::env::var("GEMINI_API_KEY").ok().or_else(|| provider_key.clone());

        let mut config = AdvisorConfig::default();
        config.content_primary = config.content_primary.with_api_key(provider_key.clone());
        config.content_secondary = config.content_secondary.with_api_key(provider_key.clone());
        config.format_primary = config.format_primary.with_api_key(gemini_key);
        config.format_secondary = config.format_secondary.with_api_key(provider_key);

        let advisor = SpecialistAdvisor::from_config(config);
        match advisor.recommend(&record) {
            Ok(set) => match serde_json::to_string_pretty(&set) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("cannot serialize recommendations: {e}");
                    return ExitCode::FAILURE;
                }
            },
            Err(e) => {
                eprintln!("recommendations unavailable: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
