use crate::{
    data_sources::engine::engine_config::EngineConfig,
    utils::constants::{
        DEFAULT_CODE_EXTENSION, DEFAULT_CODE_ROOT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENGINE_URL,
        DEFAULT_LOG_LEVEL, DEFAULT_SETTLE_DELAY, DEFAULT_STATUS_TIMEOUT,
    },
};
use anyhow::{anyhow, Context, Result};
use std::{env, path::PathBuf, str::FromStr, time::Duration};

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine_url: String,
    pub engine_credential: Option<String>,
    pub accept_invalid_certs: bool,
    pub connect_timeout: Duration,
    pub status_timeout: Duration,
    pub settle_delay: Duration,
    pub strict_frames: bool,
    pub code_root: PathBuf,
    pub code_extension: String,
    pub database_url: Option<String>,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            engine_url: env_or("ENGINE_URL", DEFAULT_ENGINE_URL.to_string())?,
            engine_credential: env_opt("ENGINE_CREDENTIAL"),
            accept_invalid_certs: env_or("ENGINE_ACCEPT_INVALID_CERTS", false)?,
            connect_timeout: env_secs("ENGINE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT)?,
            status_timeout: env_secs("ENGINE_STATUS_TIMEOUT_SECS", DEFAULT_STATUS_TIMEOUT)?,
            settle_delay: env_secs("ENGINE_SETTLE_DELAY_SECS", DEFAULT_SETTLE_DELAY)?,
            strict_frames: env_or("ENGINE_STRICT_FRAMES", false)?,
            code_root: env_or("CODE_ROOT", PathBuf::from(DEFAULT_CODE_ROOT))?,
            code_extension: env_or("CODE_EXTENSION", DEFAULT_CODE_EXTENSION.to_string())?,
            database_url: env_opt("DATABASE_URL"),
            log_level: env_or("LOG_LEVEL", DEFAULT_LOG_LEVEL.to_string())?,
        })
    }

    /// Fails when no engine credential is configured.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let credential = self
            .engine_credential
            .clone()
            .ok_or(anyhow!("ENGINE_CREDENTIAL must be set to talk to the engine."))?;

        Ok(EngineConfig {
            url: self.engine_url.clone(),
            credential,
            accept_invalid_certs: self.accept_invalid_certs,
            connect_timeout: self.connect_timeout,
            status_timeout: self.status_timeout,
            settle_delay: self.settle_delay,
            strict_frames: self.strict_frames,
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env_opt(key) {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: '{}'", key, v)),
        None => Ok(default),
    }
}

fn env_secs(key: &str, default: Duration) -> Result<Duration> {
    let secs: f64 = env_or(key, default.as_secs_f64())?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(anyhow!("{} must be a non-negative number of seconds.", key));
    }

    Ok(Duration::from_secs_f64(secs))
}
