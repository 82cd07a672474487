use anyhow::{Context, Result, anyhow};
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PREDICTOR_TIMEOUT_SECS: u64 = 10;

/// Configuration for the premium service, read from the environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub predictor_url: String,
    pub predictor_timeout: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let predictor_url = lookup("PREDICTOR_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("PREDICTOR_URL environment variable is required"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("PREDICTOR_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().with_context(|| {
                format!("PREDICTOR_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'")
            })?,
            None => DEFAULT_PREDICTOR_TIMEOUT_SECS,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            predictor_url,
            predictor_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
