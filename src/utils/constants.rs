use std::time::Duration;

pub const DEFAULT_ENGINE_URL: &str = "wss://127.0.0.1:8080";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

pub const DEFAULT_CODE_ROOT: &str = ".";
pub const DEFAULT_CODE_EXTENSION: &str = "h";

/// Directory under the code root that holds per-user source artifacts.
pub const CODE_DIR: &str = "code";

pub const DEFAULT_LOG_LEVEL: &str = "info";
