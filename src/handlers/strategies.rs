use crate::{
    handlers::{handler_error::HandlerError, job_handler::JobHandler},
    models::{
        message_payloads::{
            delete_strategy_payload::DeleteStrategyPayload,
            get_strategy_payload::GetStrategyPayload,
            list_strategies_payload::ListStrategiesPayload,
            update_strategy_payload::UpdateStrategyPayload,
        },
        strategy::{Strategy, StrategyFilter, StrategyUpdate},
    },
};
use chrono::Utc;
use uuid::Uuid;

impl JobHandler {
    pub async fn get_strategy(&self, id: Uuid) -> Result<Strategy, HandlerError> {
        self.ask(GetStrategyPayload { id })
            .await?
            .ok_or(HandlerError::NotFound(id))
    }

    pub async fn list_strategies(
        &self,
        user_id: &str,
        filter: StrategyFilter,
    ) -> Result<Vec<Strategy>, HandlerError> {
        self.ask(ListStrategiesPayload {
            user_id: user_id.to_string(),
            filter,
        })
        .await
    }

    pub async fn count_strategies(&self, user_id: &str) -> Result<usize, HandlerError> {
        Ok(self
            .list_strategies(user_id, StrategyFilter::default())
            .await?
            .len())
    }

    pub async fn update_strategy(
        &self,
        id: Uuid,
        update: StrategyUpdate,
    ) -> Result<Strategy, HandlerError> {
        let mut current = self.get_strategy(id).await?;
        current
            .apply(update.clone(), Utc::now())
            .map_err(|e| HandlerError::Validation(e.to_string()))?;

        self.ask(UpdateStrategyPayload { id, update }).await
    }

    pub async fn delete_strategy(&self, id: Uuid) -> Result<(), HandlerError> {
        if !self.ask(DeleteStrategyPayload { id }).await? {
            return Err(HandlerError::NotFound(id));
        }

        Ok(())
    }
}
