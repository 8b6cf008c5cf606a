use crate::{
    handlers::{handler_error::HandlerError, job_handler::JobHandler},
    trade_log::{process_trade_log, ProcessedTrades},
};
use tracing::info;
use uuid::Uuid;

impl JobHandler {
    /// Pulls the ledger of a finished run from the engine and summarises it.
    pub async fn fetch_trades(
        &self,
        strategy_id: Uuid,
        user_id: &str,
    ) -> Result<ProcessedTrades, HandlerError> {
        self.owned_strategy(strategy_id, user_id).await?;

        let ledger = self
            .engine()
            .fetch_trade_log(&strategy_id.to_string(), user_id)
            .await
            .map_err(HandlerError::Engine)?;

        let processed = process_trade_log(&ledger);
        info!(
            strategy_id = %strategy_id,
            symbols = processed.summary.len(),
            "Trade log processed"
        );

        Ok(processed)
    }
}
