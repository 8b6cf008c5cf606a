use crate::utils::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENGINE_URL, DEFAULT_SETTLE_DELAY, DEFAULT_STATUS_TIMEOUT,
};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub url: String,
    /// Shared secret sent as `password` in every frame.
    pub credential: String,
    /// Accept self-signed or mismatched certificates on `wss://` urls.
    pub accept_invalid_certs: bool,
    /// From opening the connection until the first status frame.
    pub connect_timeout: Duration,
    /// From the `ok` acknowledgement until processing/completed.
    pub status_timeout: Duration,
    /// Pause after `ok` before the result probe is sent.
    pub settle_delay: Duration,
    /// Treat non-JSON frames as protocol errors instead of implicit success.
    pub strict_frames: bool,
}

impl EngineConfig {
    pub fn new(url: &str, credential: &str) -> Self {
        Self {
            url: url.to_string(),
            credential: credential.to_string(),
            ..Default::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENGINE_URL.to_string(),
            credential: String::new(),
            accept_invalid_certs: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            strict_frames: false,
        }
    }
}
