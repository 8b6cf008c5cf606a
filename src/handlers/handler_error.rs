use crate::{
    data_sources::engine::submission_error::SubmissionError,
    models::database::artifact_store::ArtifactError,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),

    #[error("Strategy {0} not found")]
    NotFound(Uuid),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("A backtest for strategy {0} is already running")]
    AlreadyRunning(Uuid),

    #[error("Failed to access strategy store: {0:#}")]
    Store(anyhow::Error),

    #[error("Failed to read strategy code: {0}")]
    Artifact(#[from] ArtifactError),

    /// The record exists and has been marked failed.
    #[error("Backtest failed to start for strategy {strategy_id}: {source}")]
    Submission {
        strategy_id: Uuid,
        #[source]
        source: SubmissionError,
    },

    #[error("Engine request failed: {0}")]
    Engine(#[source] SubmissionError),
}

impl HandlerError {
    /// HTTP status a web layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Validation(_) => 400,
            HandlerError::Unauthorized => 403,
            HandlerError::NotFound(_) => 404,
            HandlerError::AlreadyRunning(_) => 409,
            HandlerError::Submission { source, .. } | HandlerError::Engine(source)
                if source.is_timeout() =>
            {
                504
            }
            _ => 500,
        }
    }
}
