use crate::trade_log::process_trade_log;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Post-processes a ledger saved on disk and prints it as JSON.
pub async fn run(path: &Path, summary_only: bool) -> Result<()> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Unable to read {}", path.display()))?;

    let processed = process_trade_log(&raw);

    let json = if summary_only {
        serde_json::to_string_pretty(&processed.summary)?
    } else {
        serde_json::to_string_pretty(&processed)?
    };
    println!("{}", json);

    Ok(())
}
