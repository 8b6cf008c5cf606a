use crate::models::backtest_job::BacktestJob;
use chrono::NaiveDate;
use serde::Serialize;

/// Frame that asks the engine to run a backtest. `py` carries the source text
/// whatever the language is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitMessage {
    pub action: &'static str,
    pub id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub language: String,
    pub py: String,
    #[serde(rename = "type")]
    pub timeframe: String,
    pub user: String,
    pub password: String,
}

/// Frame that asks the engine about a job it already knows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultProbeMessage {
    pub id: String,
    pub action: &'static str,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    Submit(SubmitMessage),
    ResultProbe(ResultProbeMessage),
}

impl OutgoingMessage {
    pub fn submit(job: &BacktestJob, credential: &str) -> Self {
        OutgoingMessage::Submit(SubmitMessage {
            action: "test",
            id: job.strategy_id.clone(),
            from: job.date_range.from,
            to: job.date_range.to,
            language: job.language.clone(),
            py: job.source_code.clone(),
            timeframe: job.timeframe.to_string(),
            user: job.user_id.clone(),
            password: credential.to_string(),
        })
    }

    pub fn result_probe(strategy_id: &str, user_id: &str, credential: &str) -> Self {
        OutgoingMessage::ResultProbe(ResultProbeMessage {
            id: strategy_id.to_string(),
            action: "result",
            user: user_id.to_string(),
            password: credential.to_string(),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
