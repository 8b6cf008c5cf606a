#![allow(dead_code)]

use backtest_bot::{
    data_sources::engine::{engine_config::EngineConfig, engine_ws_api::EngineWsApi},
    models::{
        backtest_job::BacktestJob, backtest_job_builder::BacktestJobBuilder,
        database::artifact_store::ArtifactStore, strategy::DateRange,
    },
};
use chrono::NaiveDate;
use futures_util::{SinkExt, StreamExt};
use std::{path::Path, time::Duration};
use tokio::{
    net::{TcpListener, TcpStream},
    task::JoinHandle,
    time::sleep,
};
use tokio_tungstenite::{
    accept_async,
    tungstenite::{
        protocol::{frame::coding::CloseCode, CloseFrame},
        Message,
    },
    WebSocketStream,
};

pub const USER: &str = "user-1";
pub const SOURCE: &str = "#include <strategy.h>\n\nint on_candle() { return 1; }\n";

pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
pub const STATUS_TIMEOUT: Duration = Duration::from_millis(800);
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// One scripted action of the fake engine.
#[derive(Debug, Clone)]
pub enum Step {
    /// Read one text frame from the client.
    Recv,
    Send(String),
    Wait(Duration),
    /// Send a close frame and stop.
    Close(u16, &'static str),
    /// Drop the socket without a closing handshake.
    Drop,
    /// Keep reading until the client goes away.
    Hang,
}

pub fn status(status: &str) -> Step {
    Step::Send(format!(r#"{{"status":"{}"}}"#, status))
}

/// Fake engine that plays one script per accepted websocket connection, in
/// order.
pub struct EngineStub {
    pub url: String,
    handle: JoinHandle<Vec<Vec<String>>>,
}

impl EngineStub {
    pub async fn spawn(script: Vec<Step>) -> Self {
        Self::sessions(vec![script]).await
    }

    pub async fn sessions(scripts: Vec<Vec<Step>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut sessions = Vec::new();

            for script in scripts {
                let (tcp, _) = listener.accept().await.unwrap();
                let ws = accept_async(tcp).await.unwrap();
                sessions.push(play(ws, script).await);
            }

            sessions
        });

        Self { url, handle }
    }

    /// Text frames the stub read from the client, across all sessions.
    pub async fn received(self) -> Vec<String> {
        self.handle.await.unwrap().concat()
    }
}

async fn play(mut ws: WebSocketStream<TcpStream>, script: Vec<Step>) -> Vec<String> {
    let mut received = Vec::new();

    for step in script {
        match step {
            Step::Recv => match ws.next().await {
                Some(Ok(Message::Text(txt))) => received.push(txt),
                other => panic!("expected a text frame, got {:?}", other),
            },
            Step::Send(txt) => ws.send(Message::Text(txt)).await.unwrap(),
            Step::Wait(d) => sleep(d).await,
            Step::Close(code, reason) => {
                let frame = CloseFrame {
                    code: CloseCode::from(code),
                    reason: reason.into(),
                };
                let _ = ws.close(Some(frame)).await;
                return received;
            }
            Step::Drop => {
                drop(ws);
                return received;
            }
            Step::Hang => break,
        }
    }

    while let Some(Ok(msg)) = ws.next().await {
        if let Message::Text(txt) = msg {
            received.push(txt);
        }
    }

    received
}

/// Accepts TCP connections but never answers the websocket upgrade.
pub async fn silent_listener() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (_tcp, _) = listener.accept().await.unwrap();
        sleep(Duration::from_secs(5)).await;
    });

    (url, handle)
}

pub fn engine_config(url: &str) -> EngineConfig {
    EngineConfig {
        connect_timeout: CONNECT_TIMEOUT,
        status_timeout: STATUS_TIMEOUT,
        settle_delay: SETTLE_DELAY,
        ..EngineConfig::new(url, "secret")
    }
}

pub fn engine(url: &str, root: &Path) -> EngineWsApi {
    EngineWsApi::new(engine_config(url), ArtifactStore::new(root, "h"))
}

pub fn job(strategy_id: &str) -> BacktestJob {
    BacktestJobBuilder::new()
        .strategy_id(strategy_id)
        .user_id(USER)
        .date_range(
            DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )
            .unwrap(),
        )
        .language("cpp")
        .source_code(SOURCE)
        .timeframe("binance.c1h".parse().unwrap())
        .build()
        .unwrap()
}

pub fn frame(txt: &str) -> serde_json::Value {
    serde_json::from_str(txt).unwrap()
}
