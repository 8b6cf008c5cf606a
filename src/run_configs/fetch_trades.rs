use crate::{run_configs::build_handler, utils::config::AppConfig};
use anyhow::{anyhow, Result};
use uuid::Uuid;

pub async fn run(config: &AppConfig, strategy_id: Uuid, user_id: &str) -> Result<()> {
    let handler = build_handler(config).await?;

    let processed = handler
        .fetch_trades(strategy_id, user_id)
        .await
        .map_err(|e| anyhow!("{} (status {})", e, e.status_code()))?;

    println!("{}", serde_json::to_string_pretty(&processed)?);

    Ok(())
}
