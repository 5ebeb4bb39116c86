use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// How the review-request handler treats the requestee's preference.
///
/// Historically the preference lookup for review requests ran but its answer
/// was never consulted, so requestees who had opted out were still messaged.
/// `Gated` honours the preference; `Ungated` reproduces the old behaviour for
/// deployments that relied on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewRequestPolicy {
    #[default]
    Gated,
    Ungated,
}

impl FromStr for ReviewRequestPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gated" => Ok(Self::Gated),
            "ungated" => Ok(Self::Ungated),
            other => Err(format!(
                "unknown review request policy '{}' (expected 'gated' or 'ungated')",
                other
            )),
        }
    }
}

impl fmt::Display for ReviewRequestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gated => write!(f, "gated"),
            Self::Ungated => write!(f, "ungated"),
        }
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeraldConfig {
    pub review_request_policy: ReviewRequestPolicy,
    /// Log filter directive for hosts that install a subscriber.
    /// `None` means the host's default.
    pub log_filter: Option<String>,
}

impl HeraldConfig {
    pub fn from_env() -> Result<Self> {
        let review_request_policy =
            parse_review_request_policy(env::var("HERALD_REVIEW_REQUEST_POLICY").ok())
                .context("HERALD_REVIEW_REQUEST_POLICY must be 'gated' or 'ungated'")?;

        let log_filter = parse_optional(env::var("HERALD_LOG").ok());

        Ok(HeraldConfig {
            review_request_policy,
            log_filter,
        })
    }
}

/// Parse the review request policy from an optional raw value.
///
/// Missing or blank values fall back to the default (`Gated`).
pub fn parse_review_request_policy(value: Option<String>) -> Result<ReviewRequestPolicy> {
    match parse_optional(value) {
        None => Ok(ReviewRequestPolicy::default()),
        Some(raw) => raw.parse().map_err(anyhow::Error::msg),
    }
}

fn parse_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
