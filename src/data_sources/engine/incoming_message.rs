use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// Job received, not yet known to be running.
    Ok,
    Processing,
    Completed,
    Other(String),
}

impl EngineStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, EngineStatus::Processing | EngineStatus::Completed)
    }
}

impl From<&str> for EngineStatus {
    fn from(s: &str) -> Self {
        match s {
            "ok" => EngineStatus::Ok,
            "processing" => EngineStatus::Processing,
            "completed" => EngineStatus::Completed,
            other => EngineStatus::Other(other.to_string()),
        }
    }
}

impl Display for EngineStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineStatus::Ok => write!(f, "ok"),
            EngineStatus::Processing => write!(f, "processing"),
            EngineStatus::Completed => write!(f, "completed"),
            EngineStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    Status {
        status: EngineStatus,
        error: Option<String>,
    },
    TradeLog(String),
    /// Payload that is not a JSON document.
    Unparsed(String),
}

impl IncomingMessage {
    pub fn parse(txt: &str) -> Self {
        let value: Value = match serde_json::from_str(txt) {
            Ok(v) => v,
            Err(_) => return IncomingMessage::Unparsed(txt.to_string()),
        };

        if let Some(tradelog) = value.get("tradelog").and_then(Value::as_str) {
            return IncomingMessage::TradeLog(tradelog.to_string());
        }

        let status = match value.get("status") {
            Some(Value::String(s)) => EngineStatus::from(s.as_str()),
            Some(other) => EngineStatus::Other(other.to_string()),
            None => EngineStatus::Other("missing".to_string()),
        };
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);

        IncomingMessage::Status { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(
            IncomingMessage::parse(r#"{"status":"ok"}"#),
            IncomingMessage::Status {
                status: EngineStatus::Ok,
                error: None
            }
        );
        assert!(matches!(
            IncomingMessage::parse(r#"{"status":"completed"}"#),
            IncomingMessage::Status { status, .. } if status.is_accepted()
        ));
    }

    #[test]
    fn keeps_engine_error_text() {
        assert_eq!(
            IncomingMessage::parse(r#"{"status":"error","error":"compile failed"}"#),
            IncomingMessage::Status {
                status: EngineStatus::Other("error".to_string()),
                error: Some("compile failed".to_string())
            }
        );
    }

    #[test]
    fn missing_status_is_other() {
        assert_eq!(
            IncomingMessage::parse(r#"{"foo":1}"#),
            IncomingMessage::Status {
                status: EngineStatus::Other("missing".to_string()),
                error: None
            }
        );
    }

    #[test]
    fn tradelog_and_garbage() {
        assert_eq!(
            IncomingMessage::parse(r#"{"tradelog":"1,AAA"}"#),
            IncomingMessage::TradeLog("1,AAA".to_string())
        );
        assert_eq!(
            IncomingMessage::parse("job queued"),
            IncomingMessage::Unparsed("job queued".to_string())
        );
    }
}
