use crate::{
    handlers::{handler_error::HandlerError, job_handler::JobHandler},
    models::strategy::Strategy,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeResponse {
    pub code: String,
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JobHandler {
    /// Returns a strategy with its saved source code. A strategy that never got
    /// past submission comes back with empty code.
    pub async fn fetch_code(
        &self,
        strategy_id: Uuid,
        user_id: &str,
    ) -> Result<CodeResponse, HandlerError> {
        if user_id.trim().is_empty() {
            return Err(HandlerError::Validation(
                "Strategy ID and User ID are required".to_string(),
            ));
        }

        let strategy = self.owned_strategy(strategy_id, user_id).await?;
        let code = self
            .engine()
            .artifacts()
            .read(user_id, &strategy_id.to_string())
            .await?;

        let message = code
            .is_none()
            .then(|| "No code file found for this strategy".to_string());

        Ok(CodeResponse {
            code: code.unwrap_or_default(),
            strategy,
            message,
        })
    }
}
