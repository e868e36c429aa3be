use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::middleware::admin_gate::SecretDigest;

#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Digest of the credential accepted by /restart and /seppuku.
    pub admin_digest: SecretDigest,
    pub port: u16,
    pub agent_state_path: PathBuf,
    pub status_refresh_secs: u64,
    pub page_title: String,
    /// Upper bound on waiting for in-flight requests once restart or
    /// shutdown has been accepted.
    pub shutdown_drain_secs: u64,
}

impl AdminConfig {
    /// Load config from a specific .env file, or the default `.env` if None.
    pub fn from_env_file(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => {
                dotenvy::from_filename(p).with_context(|| format!("Failed to load {p}"))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::build(|key| std::env::var(key).ok())
    }

    fn build(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let admin_digest = var("ADMIN_PASS_SHA256").context("ADMIN_PASS_SHA256 is required")?;

        Ok(Self {
            admin_digest: SecretDigest::from_hex(&admin_digest)
                .context("ADMIN_PASS_SHA256 must be a hex SHA-256 digest")?,
            port: env("PORT", "17071")
                .parse()
                .context("PORT must be a valid u16")?,
            agent_state_path: PathBuf::from(env("AGENT_STATE_PATH", "agent_state.json")),
            status_refresh_secs: env("STATUS_REFRESH_SECS", "25")
                .parse()
                .context("STATUS_REFRESH_SECS must be a valid u64")?,
            page_title: env("PAGE_TITLE", "Trading Agent"),
            shutdown_drain_secs: env("SHUTDOWN_DRAIN_SECS", "10")
                .parse()
                .context("SHUTDOWN_DRAIN_SECS must be a valid u64")?,
        })
    }
}
