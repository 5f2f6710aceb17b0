//! Runtime knobs. The frontend reads them at compile time with
//! `option_env!` and hands the raw strings to [`PanelConfig::from_raw`].

use serde::{Deserialize, Serialize};

pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;
pub const DEFAULT_BATCH_CONCURRENCY: usize = 1;
pub const MAX_BATCH_CONCURRENCY: usize = 8;
pub const DEFAULT_TOAST_DURATION_MS: u32 = 3_000;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u32 = 300;

/// When a result saved in the entry dialog reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    /// Submitted as soon as the dialog is saved.
    Immediate,
    /// Staged locally until the final submit.
    #[default]
    Batch,
}

impl CommitMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "immediate" => Some(CommitMode::Immediate),
            "batch" => Some(CommitMode::Batch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub commit_mode: CommitMode,
    pub request_timeout_ms: u32,
    pub batch_concurrency: usize,
    pub toast_duration_ms: u32,
    pub search_debounce_ms: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            commit_mode: CommitMode::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl PanelConfig {
    /// Build from optional raw values. Missing or malformed values fall back
    /// to the defaults with a warning.
    pub fn from_raw(
        commit_mode: Option<&str>,
        request_timeout_ms: Option<&str>,
        batch_concurrency: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        let commit_mode = match commit_mode {
            Some(raw) => CommitMode::parse(raw).unwrap_or_else(|| {
                tracing::warn!(value = raw, "unknown commit mode, using default");
                defaults.commit_mode
            }),
            None => defaults.commit_mode,
        };
        let request_timeout_ms = parse_positive(request_timeout_ms, "request timeout")
            .unwrap_or(defaults.request_timeout_ms);
        let batch_concurrency = parse_positive::<usize>(batch_concurrency, "batch concurrency")
            .map(|n| n.min(MAX_BATCH_CONCURRENCY))
            .unwrap_or(defaults.batch_concurrency);

        Self {
            commit_mode,
            request_timeout_ms,
            batch_concurrency,
            ..defaults
        }
    }
}

fn parse_positive<T>(raw: Option<&str>, what: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            tracing::warn!(value = raw, "invalid {what}, using default");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(PanelConfig::from_raw(None, None, None), PanelConfig::default());
        assert_eq!(PanelConfig::default().commit_mode, CommitMode::Batch);
        assert_eq!(PanelConfig::default().request_timeout_ms, 15_000);
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = PanelConfig::from_raw(Some("later"), Some("-5"), Some("zero"));
        assert_eq!(config, PanelConfig::default());
    }

    #[test]
    fn valid_values_are_used_and_concurrency_is_capped() {
        let config = PanelConfig::from_raw(Some(" Immediate "), Some("5000"), Some("64"));
        assert_eq!(config.commit_mode, CommitMode::Immediate);
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.batch_concurrency, MAX_BATCH_CONCURRENCY);
    }
}
