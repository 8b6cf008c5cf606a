use crate::{
    data_sources::engine::engine_ws_api::{Acceptance, EngineWsApi},
    handlers::{
        handler_error::HandlerError,
        in_flight::{InFlightGuard, InFlightRegistry},
    },
    models::{
        backtest_job_builder::BacktestJobBuilder,
        database::db::DB,
        message_payloads::{
            create_strategy_payload::CreateStrategyPayload,
            get_strategy_payload::GetStrategyPayload,
            update_strategy_payload::UpdateStrategyPayload,
        },
        strategy::{Strategy, StrategyUpdate},
        submission::{BacktestParams, SubmissionRequest},
    },
};
use actix::{dev::ToEnvelope, Actor, Addr, Handler, Message};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub strategy_id: Uuid,
    pub accepted: bool,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

/// Entry point for everything a web layer needs: validates requests, keeps the
/// strategy record in step and delegates the engine exchange.
pub struct JobHandler {
    db: Addr<DB>,
    engine: EngineWsApi,
    in_flight: InFlightRegistry,
}

impl JobHandler {
    pub fn new(db: Addr<DB>, engine: EngineWsApi) -> Self {
        Self {
            db,
            engine,
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn engine(&self) -> &EngineWsApi {
        &self.engine
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    pub async fn submit(&self, request: SubmissionRequest) -> Result<SubmitResponse, HandlerError> {
        self.submit_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Creates or restarts the strategy record, runs the engine handshake and
    /// marks the record failed if the handshake does not succeed.
    pub async fn submit_with_cancel(
        &self,
        request: SubmissionRequest,
        cancel: &CancellationToken,
    ) -> Result<SubmitResponse, HandlerError> {
        let params = request
            .params()
            .validate()
            .map_err(|e| HandlerError::Validation(e.to_string()))?;

        let (strategy_id, _guard) = match &request {
            SubmissionRequest::Create { .. } => self.create_running(&params).await?,
            SubmissionRequest::Resubmit {
                strategy_id,
                run_count,
                ..
            } => self.restart(*strategy_id, *run_count, &params).await?,
        };
        let resubmitted = matches!(request, SubmissionRequest::Resubmit { .. });

        let job = BacktestJobBuilder::new()
            .strategy_id(strategy_id)
            .params(&params)
            .build()
            .map_err(|e| HandlerError::Validation(e.to_string()))?;

        info!(
            strategy_id = %strategy_id,
            user_id = %params.user_id,
            timeframe = %params.timeframe,
            url = %self.engine.config().url,
            "Submitting backtest"
        );

        match self.engine.submit_with_cancel(&job, cancel).await {
            Ok(receipt) => {
                let detail = match (receipt.acceptance, resubmitted) {
                    (Acceptance::Unparsed, _) => {
                        "Engine replied without a status, backtest assumed started (code file not saved)"
                    }
                    (_, true) => "Strategy updated and backtest restarted successfully",
                    (_, false) => "Strategy created and backtest started successfully",
                };

                Ok(SubmitResponse {
                    strategy_id,
                    accepted: true,
                    detail: detail.to_string(),
                    file_path: receipt.artifact,
                })
            }
            Err(e) => {
                let update = UpdateStrategyPayload {
                    id: strategy_id,
                    update: StrategyUpdate::failed(e.to_string()),
                };

                if let Err(store_err) = self.ask(update).await {
                    warn!(strategy_id = %strategy_id, "Unable to mark strategy failed: {}", store_err);
                }

                Err(HandlerError::Submission {
                    strategy_id,
                    source: e,
                })
            }
        }
    }

    async fn create_running(
        &self,
        params: &BacktestParams,
    ) -> Result<(Uuid, InFlightGuard), HandlerError> {
        let payload = CreateStrategyPayload {
            strategy: params.new_running(Utc::now()),
        };
        let strategy = self.ask(payload).await?;

        let guard = self
            .in_flight
            .try_acquire(strategy.id)
            .ok_or(HandlerError::AlreadyRunning(strategy.id))?;

        Ok((strategy.id, guard))
    }

    async fn restart(
        &self,
        strategy_id: Uuid,
        run_count: u32,
        params: &BacktestParams,
    ) -> Result<(Uuid, InFlightGuard), HandlerError> {
        let guard = self
            .in_flight
            .try_acquire(strategy_id)
            .ok_or(HandlerError::AlreadyRunning(strategy_id))?;

        let existing = self.owned_strategy(strategy_id, &params.user_id).await?;

        if run_count <= existing.run_count {
            return Err(HandlerError::Validation(format!(
                "Run count must be greater than {}, got {}",
                existing.run_count, run_count
            )));
        }

        let payload = UpdateStrategyPayload {
            id: existing.id,
            update: params.rerun_update(run_count, Utc::now()),
        };
        self.ask(payload).await?;

        Ok((strategy_id, guard))
    }

    /// Loads a record and checks it belongs to `user_id`.
    pub(crate) async fn owned_strategy(
        &self,
        strategy_id: Uuid,
        user_id: &str,
    ) -> Result<Strategy, HandlerError> {
        let strategy = self
            .ask(GetStrategyPayload { id: strategy_id })
            .await?
            .ok_or(HandlerError::NotFound(strategy_id))?;

        if strategy.user_id != user_id {
            return Err(HandlerError::Unauthorized);
        }

        Ok(strategy)
    }

    pub(crate) async fn ask<M, T>(&self, msg: M) -> Result<T, HandlerError>
    where
        M: Message<Result = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
        DB: Handler<M>,
        <DB as Actor>::Context: ToEnvelope<DB, M>,
    {
        self.db
            .send(msg)
            .await
            .map_err(|e| HandlerError::Store(e.into()))?
            .map_err(HandlerError::Store)
    }
}
