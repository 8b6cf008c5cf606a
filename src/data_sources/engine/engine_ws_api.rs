use crate::{
    data_sources::engine::{
        engine_config::EngineConfig,
        incoming_message::{EngineStatus, IncomingMessage},
        outgoing_message::OutgoingMessage,
        submission_error::SubmissionError,
    },
    models::{backtest_job::BacktestJob, database::artifact_store::ArtifactStore},
};
use futures_util::{SinkExt, StreamExt};
use native_tls::TlsConnector;
use std::{future::pending, path::PathBuf};
use tokio::{
    net::TcpStream,
    select,
    time::{sleep_until, timeout_at, Instant},
};
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tungstenite::{protocol::CloseFrame, Message};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How the engine told us it took the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Processing,
    Completed,
    /// A non-JSON frame arrived while waiting and was taken as success. The
    /// engine never confirmed the job, so no artifact is written.
    Unparsed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub strategy_id: String,
    pub acceptance: Acceptance,
    pub artifact: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitAck,
    AwaitProcessing,
}

/// Client for the backtest execution engine. One connection per call, closed
/// before the call returns.
#[derive(Debug, Clone)]
pub struct EngineWsApi {
    config: EngineConfig,
    artifacts: ArtifactStore,
}

impl EngineWsApi {
    pub fn new(config: EngineConfig, artifacts: ArtifactStore) -> Self {
        Self { config, artifacts }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub async fn submit(&self, job: &BacktestJob) -> Result<SubmissionReceipt, SubmissionError> {
        self.submit_with_cancel(job, &CancellationToken::new()).await
    }

    /// Submits a job and waits until the engine reports it as processing or
    /// completed, then saves the source artifact. Firing `cancel` closes the
    /// connection and fails the attempt.
    pub async fn submit_with_cancel(
        &self,
        job: &BacktestJob,
        cancel: &CancellationToken,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let ack_deadline = Instant::now() + self.config.connect_timeout;

        let mut ws_stream = select! {
            _ = cancel.cancelled() => return Err(SubmissionError::Cancelled),
            res = timeout_at(ack_deadline, self.connect()) => match res {
                Ok(res) => res.map_err(|e| {
                    warn!(strategy_id = %job.strategy_id, "Unable to connect to engine: {}", e);
                    e
                })?,
                Err(_) => {
                    warn!(strategy_id = %job.strategy_id, "Engine connect timed out");
                    return Err(SubmissionError::ConnectTimeout(self.config.connect_timeout));
                }
            },
        };

        info!(strategy_id = %job.strategy_id, url = %self.config.url, "Connected to engine");

        let res = self
            .run_handshake(&mut ws_stream, job, ack_deadline, cancel)
            .await;

        Self::close(&mut ws_stream).await;

        let acceptance = res.map_err(|e| {
            warn!(strategy_id = %job.strategy_id, "Submission failed: {}", e);
            e
        })?;

        let artifact = match acceptance {
            Acceptance::Unparsed => None,
            Acceptance::Processing | Acceptance::Completed => {
                let path = self
                    .artifacts
                    .write(&job.user_id, &job.strategy_id, &job.source_code)
                    .await
                    .map_err(|e| {
                        warn!(strategy_id = %job.strategy_id, "Engine accepted job, artifact write failed: {}", e);
                        e
                    })?;

                Some(path)
            }
        };

        info!(
            strategy_id = %job.strategy_id,
            acceptance = ?acceptance,
            "Submission done"
        );

        Ok(SubmissionReceipt {
            strategy_id: job.strategy_id.clone(),
            acceptance,
            artifact,
        })
    }

    /// Asks the engine for the ledger of a finished job.
    pub async fn fetch_trade_log(
        &self,
        strategy_id: &str,
        user_id: &str,
    ) -> Result<String, SubmissionError> {
        let deadline = Instant::now() + self.config.connect_timeout;

        let mut ws_stream = match timeout_at(deadline, self.connect()).await {
            Ok(res) => res?,
            Err(_) => return Err(SubmissionError::ConnectTimeout(self.config.connect_timeout)),
        };

        let res = self
            .await_trade_log(&mut ws_stream, strategy_id, user_id)
            .await;

        Self::close(&mut ws_stream).await;

        res
    }

    async fn connect(&self) -> Result<WsStream, SubmissionError> {
        let connector = if self.config.accept_invalid_certs {
            let tls = TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| SubmissionError::Transport(e.to_string()))?;

            Some(Connector::NativeTls(tls))
        } else {
            None
        };

        let (ws_stream, _) =
            connect_async_tls_with_config(self.config.url.as_str(), None, false, connector)
                .await?;

        Ok(ws_stream)
    }

    async fn run_handshake(
        &self,
        ws_stream: &mut WsStream,
        job: &BacktestJob,
        ack_deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Acceptance, SubmissionError> {
        let submit = OutgoingMessage::submit(job, &self.config.credential).to_json()?;
        ws_stream.send(Message::Text(submit)).await?;
        debug!(strategy_id = %job.strategy_id, "Submit frame sent");

        let mut phase = Phase::AwaitAck;
        let mut deadline = ack_deadline;
        let mut probe_at: Option<Instant> = None;

        loop {
            let probe_due = async move {
                match probe_at {
                    Some(at) => sleep_until(at).await,
                    None => pending::<()>().await,
                }
            };

            select! {
                _ = cancel.cancelled() => return Err(SubmissionError::Cancelled),
                _ = sleep_until(deadline) => return Err(self.timeout_for(phase)),
                _ = probe_due => {
                    probe_at = None;
                    self.send_probe(ws_stream, &job.strategy_id, &job.user_id).await?;
                }
                ws_msg = ws_stream.next() => {
                    let msg = match ws_msg {
                        Some(msg) => msg?,
                        None => return Err(SubmissionError::dropped()),
                    };

                    let next = self.handle_message(msg, job, &mut phase, &mut deadline, &mut probe_at)?;
                    if let Some(acceptance) = next {
                        return Ok(acceptance);
                    }
                }
            }
        }
    }

    fn handle_message(
        &self,
        msg: Message,
        job: &BacktestJob,
        phase: &mut Phase,
        deadline: &mut Instant,
        probe_at: &mut Option<Instant>,
    ) -> Result<Option<Acceptance>, SubmissionError> {
        let txt = match msg {
            Message::Text(txt) => txt,
            Message::Binary(bin) => String::from_utf8_lossy(&bin).into_owned(),
            Message::Close(frame) => return Err(Self::closed(frame)),
            _ => return Ok(None),
        };

        debug!(strategy_id = %job.strategy_id, phase = ?phase, "Engine frame: {}", txt);

        match IncomingMessage::parse(&txt) {
            IncomingMessage::Status {
                status: EngineStatus::Ok,
                ..
            } => {
                if *phase == Phase::AwaitAck {
                    let now = Instant::now();
                    *phase = Phase::AwaitProcessing;
                    *deadline = now + self.config.status_timeout;
                    *probe_at = Some(now + self.config.settle_delay);
                    info!(strategy_id = %job.strategy_id, "Engine acknowledged job");
                } else {
                    debug!(strategy_id = %job.strategy_id, "Repeated ok ignored");
                }

                Ok(None)
            }
            IncomingMessage::Status {
                status: EngineStatus::Processing,
                ..
            } => Ok(Some(Acceptance::Processing)),
            IncomingMessage::Status {
                status: EngineStatus::Completed,
                ..
            } => Ok(Some(Acceptance::Completed)),
            IncomingMessage::Status {
                status: EngineStatus::Other(status),
                error,
            } => Err(match error {
                Some(error) => SubmissionError::Engine { status, error },
                None => SubmissionError::UnexpectedStatus(status),
            }),
            IncomingMessage::TradeLog(_) => {
                Err(SubmissionError::UnexpectedStatus("tradelog".to_string()))
            }
            IncomingMessage::Unparsed(txt) => {
                if self.config.strict_frames {
                    return Err(SubmissionError::Protocol(format!(
                        "expected a JSON status frame, got '{}'",
                        txt
                    )));
                }

                warn!(strategy_id = %job.strategy_id, "Non-JSON frame taken as acceptance");
                Ok(Some(Acceptance::Unparsed))
            }
        }
    }

    async fn await_trade_log(
        &self,
        ws_stream: &mut WsStream,
        strategy_id: &str,
        user_id: &str,
    ) -> Result<String, SubmissionError> {
        self.send_probe(ws_stream, strategy_id, user_id).await?;
        let deadline = Instant::now() + self.config.status_timeout;

        loop {
            select! {
                _ = sleep_until(deadline) => {
                    return Err(SubmissionError::StatusTimeout(self.config.status_timeout));
                }
                ws_msg = ws_stream.next() => {
                    let msg = match ws_msg {
                        Some(msg) => msg?,
                        None => return Err(SubmissionError::dropped()),
                    };

                    let txt = match msg {
                        Message::Text(txt) => txt,
                        Message::Binary(bin) => String::from_utf8_lossy(&bin).into_owned(),
                        Message::Close(frame) => return Err(Self::closed(frame)),
                        _ => continue,
                    };

                    match IncomingMessage::parse(&txt) {
                        IncomingMessage::TradeLog(ledger) => return Ok(ledger),
                        IncomingMessage::Status {
                            status: EngineStatus::Other(status),
                            error: Some(error),
                        } => return Err(SubmissionError::Engine { status, error }),
                        IncomingMessage::Status { status, .. } => {
                            debug!(strategy_id, "Waiting for trade log, engine reports {}", status);
                        }
                        IncomingMessage::Unparsed(_) => {
                            return Err(SubmissionError::Protocol(
                                "expected a tradelog frame".to_string(),
                            ));
                        }
                    }
                }
            }
        }
    }

    async fn send_probe(
        &self,
        ws_stream: &mut WsStream,
        strategy_id: &str,
        user_id: &str,
    ) -> Result<(), SubmissionError> {
        let probe =
            OutgoingMessage::result_probe(strategy_id, user_id, &self.config.credential).to_json()?;
        ws_stream.send(Message::Text(probe)).await?;
        debug!(strategy_id, "Result probe sent");

        Ok(())
    }

    fn timeout_for(&self, phase: Phase) -> SubmissionError {
        match phase {
            Phase::AwaitAck => SubmissionError::ConnectTimeout(self.config.connect_timeout),
            Phase::AwaitProcessing => SubmissionError::StatusTimeout(self.config.status_timeout),
        }
    }

    fn closed(frame: Option<CloseFrame<'_>>) -> SubmissionError {
        match frame {
            Some(frame) => {
                let reason = if frame.reason.is_empty() {
                    "engine closed the connection before accepting the job".to_string()
                } else {
                    frame.reason.to_string()
                };

                SubmissionError::Closed {
                    code: u16::from(frame.code),
                    reason,
                }
            }
            None => SubmissionError::Closed {
                code: 1005,
                reason: "close frame without status code".to_string(),
            },
        }
    }

    async fn close(ws_stream: &mut WsStream) {
        if let Err(e) = ws_stream.close(None).await {
            debug!("Close after handshake: {}", e);
        }
    }
}
