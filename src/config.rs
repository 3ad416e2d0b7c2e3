//! Configuration management
//!
//! Loads configuration from config.toml with support for:
//! - Findings provider endpoint, repository id, and session credential
//! - Prize pool amount and the severity → base points table

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cantina::DEFAULT_API_BASE;
use crate::scoring::{DEFAULT_HIGH_POINTS, DEFAULT_MEDIUM_POINTS};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Sentinel some users leave in config.toml instead of a real id.
const REPOSITORY_PLACEHOLDER: &str = "YOUR_REPOSITORY_ID_HERE";

/// The provider's session cookie always carries the auth token under this
/// name; anything else is a copy-paste accident.
const COOKIE_PREFIX: &str = "auth_token=";

/// Environment variable that overrides `[provider] auth_cookie`.
pub const AUTH_COOKIE_ENV: &str = "CANTINA_AUTH_COOKIE";

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub payouts: PayoutsConfig,
}

/// Findings provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Contest repository id on the provider
    pub repository: String,
    /// Session cookie, starting with `auth_token=`
    #[serde(default)]
    pub auth_cookie: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum findings fetched in one request
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Payout policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutsConfig {
    /// Total prize pool in dollars. Non-positive values are accepted but
    /// every payout will be zero.
    pub prize_pool: f64,
    /// Severity tier → base point value; severities outside this table are
    /// not payable
    #[serde(default = "default_base_points")]
    pub base_points: BTreeMap<String, f64>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_fetch_limit() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_base_points() -> BTreeMap<String, f64> {
    let mut base_points = BTreeMap::new();
    base_points.insert("high".to_string(), DEFAULT_HIGH_POINTS);
    base_points.insert("medium".to_string(), DEFAULT_MEDIUM_POINTS);
    base_points
}

impl Config {
    /// Load from config.toml or use defaults
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load from specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            // Use embedded default config
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse default config")
        }
    }

    /// Get the auth cookie (env var takes precedence, None if unset in both)
    pub fn auth_cookie(&self) -> Option<String> {
        resolve_cookie(
            std::env::var(AUTH_COOKIE_ENV).ok(),
            &self.provider.auth_cookie,
        )
    }

    /// Check everything that must be right before the network call.
    /// A non-positive pool is not an error; the caller warns about it.
    pub fn validate(&self) -> Result<()> {
        let repository = self.provider.repository.trim();
        if repository.is_empty() || repository.contains(REPOSITORY_PLACEHOLDER) {
            bail!(
                "configuration incomplete: set [provider] repository in config.toml \
                 to the contest repository id"
            );
        }

        let Some(cookie) = self.auth_cookie() else {
            bail!(
                "configuration incomplete: set [provider] auth_cookie in config.toml \
                 or export {AUTH_COOKIE_ENV}"
            );
        };
        if !cookie.trim_start().starts_with(COOKIE_PREFIX) {
            bail!("auth cookie must start with '{COOKIE_PREFIX}'");
        }

        Ok(())
    }
}

fn resolve_cookie(env: Option<String>, file: &str) -> Option<String> {
    match env {
        Some(cookie) if !cookie.is_empty() => Some(cookie),
        _ => {
            if file.is_empty() {
                None
            } else {
                Some(file.to_string())
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded default config is validated at compile time,
        // so this should never fail. Using a fallback for robustness.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            provider: ProviderConfig {
                repository: String::new(),
                auth_cookie: String::new(),
                base_url: default_base_url(),
                fetch_limit: default_fetch_limit(),
                timeout_secs: default_timeout_secs(),
            },
            payouts: PayoutsConfig {
                prize_pool: 500_000.0,
                base_points: default_base_points(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.provider.repository = "e7af4986-183d-4764-8bd2-1d6b47f87d99".to_string();
        config.provider.auth_cookie = "auth_token=abc123".to_string();
        config
    }

    #[test]
    fn test_default_config_parses() {
        let config = Config::default();
        assert_eq!(config.provider.base_url, DEFAULT_API_BASE);
        assert_eq!(config.provider.fetch_limit, 2000);
        assert_eq!(config.provider.timeout_secs, 60);
        assert_eq!(config.payouts.base_points["high"], 10.0);
        assert_eq!(config.payouts.base_points["medium"], 3.0);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_repository() {
        let mut config = configured();
        config.provider.repository = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_placeholder_repository() {
        let mut config = configured();
        config.provider.repository = "YOUR_REPOSITORY_ID_HERE".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_cookie() {
        let mut config = configured();
        config.provider.auth_cookie = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_cookie() {
        let mut config = configured();
        config.provider.auth_cookie = "session=abc123".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_cookie_takes_precedence() {
        assert_eq!(
            resolve_cookie(Some("auth_token=from-env".into()), "auth_token=from-file"),
            Some("auth_token=from-env".to_string())
        );
        // An empty env var does not shadow the file value.
        assert_eq!(
            resolve_cookie(Some(String::new()), "auth_token=from-file"),
            Some("auth_token=from-file".to_string())
        );
        assert_eq!(
            resolve_cookie(None, "auth_token=from-file"),
            Some("auth_token=from-file".to_string())
        );
        assert_eq!(resolve_cookie(None, ""), None);
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [provider]
            repository = "r-1"

            [payouts]
            prize_pool = 1000.0
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.base_url, DEFAULT_API_BASE);
        assert_eq!(config.provider.fetch_limit, 2000);
        assert_eq!(config.payouts.base_points.len(), 2);
    }

    #[test]
    fn test_extended_base_points_table() {
        let config: Config = toml::from_str(
            r#"
            [provider]
            repository = "r-1"

            [payouts]
            prize_pool = 1000.0

            [payouts.base_points]
            critical = 25.0
            high = 10.0
            medium = 3.0
            low = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.payouts.base_points["critical"], 25.0);
        assert_eq!(config.payouts.base_points["low"], 1.0);
    }
}
