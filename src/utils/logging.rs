use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Transport crates that are chatty at debug level.
const NOISY_MODULES: &[&str] = &["tungstenite", "tokio_tungstenite", "sqlx", "native_tls"];

fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = log_level.to_string();
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }

    EnvFilter::new(directives)
}

/// Installs the global subscriber. `RUST_LOG` overrides `log_level`.
pub fn setup_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(log_level))
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Unable to install log subscriber: {}", e))
}
