use crate::models::database::artifact_store::ArtifactError;
use std::time::Duration;
use thiserror::Error;
use tungstenite::{error::ProtocolError, Error as WsError};

/// Close code used when the peer vanished without a closing handshake.
pub const ABNORMAL_CLOSE: u16 = 1006;

/// Every way a submission attempt can fail. This is the only error that leaves
/// the engine client.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("websocket timeout: engine did not respond within {0:?}")]
    ConnectTimeout(Duration),

    #[error("status check timeout: engine did not report processing within {0:?}")]
    StatusTimeout(Duration),

    #[error("websocket closed with code {code}: {reason}")]
    Closed { code: u16, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{status}: {error}")]
    Engine { status: String, error: String },

    #[error("unexpected status: {0}")]
    UnexpectedStatus(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("submission cancelled")]
    Cancelled,

    /// The engine accepted the job but the local copy could not be written.
    #[error("engine accepted the job but the source artifact was not saved: {0}")]
    Artifact(#[from] ArtifactError),
}

impl SubmissionError {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SubmissionError::ConnectTimeout(_) | SubmissionError::StatusTimeout(_)
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SubmissionError::Closed { .. } | SubmissionError::Transport(_)
        )
    }

    pub(crate) fn dropped() -> Self {
        SubmissionError::Closed {
            code: ABNORMAL_CLOSE,
            reason: "connection dropped without closing handshake".to_string(),
        }
    }
}

impl From<WsError> for SubmissionError {
    fn from(e: WsError) -> Self {
        match e {
            WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
                SubmissionError::dropped()
            }
            other => SubmissionError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SubmissionError {
    fn from(e: serde_json::Error) -> Self {
        SubmissionError::Protocol(e.to_string())
    }
}
