//! Environment-driven configuration.
//!
//! Reads `.env` via dotenvy the way the rest of the deployment expects;
//! every knob has a default good enough for local development against the
//! mock backend.

use std::time::Duration;

use org_console_types::HierarchyScope;

use crate::error::ConsoleError;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the hierarchy backend, no trailing slash.
    pub api_base: String,
    /// State scope for hierarchy fetches.
    pub state_id: i64,
    /// Party scope for hierarchy fetches.
    pub party_id: i64,
    /// Request timeout for backend calls.
    pub request_timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            state_id: 1,
            party_id: 1,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from the environment (`ORG_CONSOLE_API_BASE`,
    /// `ORG_CONSOLE_STATE_ID`, `ORG_CONSOLE_PARTY_ID`,
    /// `ORG_CONSOLE_TIMEOUT_SECS`).
    pub fn from_env() -> Result<Self, ConsoleError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(base) = std::env::var("ORG_CONSOLE_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var("ORG_CONSOLE_STATE_ID") {
            config.state_id = parse_id("ORG_CONSOLE_STATE_ID", &raw)?;
        }
        if let Ok(raw) = std::env::var("ORG_CONSOLE_PARTY_ID") {
            config.party_id = parse_id("ORG_CONSOLE_PARTY_ID", &raw)?;
        }
        if let Ok(raw) = std::env::var("ORG_CONSOLE_TIMEOUT_SECS") {
            let secs = parse_id("ORG_CONSOLE_TIMEOUT_SECS", &raw)?;
            config.request_timeout = Duration::from_secs(secs as u64);
        }
        Ok(config)
    }

    /// Hierarchy scope this console instance operates on.
    pub fn scope(&self) -> HierarchyScope {
        HierarchyScope {
            state_id: self.state_id,
            party_id: self.party_id,
        }
    }
}

fn parse_id(name: &str, raw: &str) -> Result<i64, ConsoleError> {
    raw.parse()
        .map_err(|_| ConsoleError::Config(format!("{name} must be an integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_mock() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api_base, "http://127.0.0.1:8080");
        assert_eq!(config.scope().state_id, 1);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(parse_id("X", "twelve").is_err());
        assert_eq!(parse_id("X", "12").unwrap(), 12);
    }
}
