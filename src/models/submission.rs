use crate::models::{
    strategy::{DateRange, NewStrategy, StrategyStatus, StrategyUpdate},
    timeframe::Timeframe,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LANGUAGE: &str = "cpp";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRangeParams {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Inbound strategy parameters, as loosely typed as they arrive. Use
/// [`StrategyParams::validate`] to get a [`BacktestParams`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub initial_equity: f64,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub date_range: Option<DateRangeParams>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub code: String,
}

/// Why a set of [`StrategyParams`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsRejection {
    MissingFields(Vec<&'static str>),
    MissingDateRange,
    InvertedDateRange,
    InvalidTimeframe(String),
}

impl std::fmt::Display for ParamsRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsRejection::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            ParamsRejection::MissingDateRange => {
                write!(f, "Date range (from and to) is required")
            }
            ParamsRejection::InvertedDateRange => {
                write!(f, "Date range 'from' must not be after 'to'")
            }
            ParamsRejection::InvalidTimeframe(e) => write!(f, "Invalid timeframe: {}", e),
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<BacktestParams, ParamsRejection> {
        let mut missing = Vec::new();

        if self.initial_equity.is_nan() || self.initial_equity <= 0.0 {
            missing.push("initialEquity");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.timeframe.trim().is_empty() {
            missing.push("timeframe");
        }
        if self.user_id.trim().is_empty() {
            missing.push("userId");
        }
        if self.code.trim().is_empty() {
            missing.push("code");
        }

        if !missing.is_empty() {
            return Err(ParamsRejection::MissingFields(missing));
        }

        let (from, to) = match &self.date_range {
            Some(DateRangeParams {
                from: Some(from),
                to: Some(to),
            }) => (*from, *to),
            _ => return Err(ParamsRejection::MissingDateRange),
        };
        let date_range = DateRange::new(from, to).ok_or(ParamsRejection::InvertedDateRange)?;

        let timeframe: Timeframe = self
            .timeframe
            .parse()
            .map_err(|e: anyhow::Error| ParamsRejection::InvalidTimeframe(e.to_string()))?;

        let language = if self.language.trim().is_empty() {
            default_language()
        } else {
            self.language.clone()
        };

        Ok(BacktestParams {
            name: self.name.trim().to_string(),
            user_id: self.user_id.clone(),
            initial_equity: self.initial_equity,
            timeframe,
            date_range,
            language,
            code: self.code.clone(),
        })
    }
}

/// Strategy parameters that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    pub name: String,
    pub user_id: String,
    pub initial_equity: f64,
    pub timeframe: Timeframe,
    pub date_range: DateRange,
    pub language: String,
    pub code: String,
}

impl BacktestParams {
    pub fn new_running(&self, now: DateTime<Utc>) -> NewStrategy {
        NewStrategy {
            name: self.name.clone(),
            user_id: self.user_id.clone(),
            initial_equity: self.initial_equity,
            timeframe: self.timeframe.clone(),
            date_range: self.date_range,
            status: StrategyStatus::Running,
            last_run_at: Some(now),
            run_count: 1,
        }
    }

    /// Update that restarts an existing record and clears any previous error.
    pub fn rerun_update(&self, run_count: u32, now: DateTime<Utc>) -> StrategyUpdate {
        StrategyUpdate {
            name: Some(self.name.clone()),
            initial_equity: Some(self.initial_equity),
            timeframe: Some(self.timeframe.clone()),
            date_range: Some(self.date_range),
            status: Some(StrategyStatus::Running),
            error: Some(None),
            last_run_at: Some(now),
            run_count: Some(run_count),
        }
    }
}

/// A request to run a backtest, either for a new strategy or for one the store
/// already knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmissionRequest {
    Create {
        params: StrategyParams,
    },
    #[serde(rename_all = "camelCase")]
    Resubmit {
        strategy_id: Uuid,
        params: StrategyParams,
        run_count: u32,
    },
}

impl SubmissionRequest {
    pub fn params(&self) -> &StrategyParams {
        match self {
            SubmissionRequest::Create { params } => params,
            SubmissionRequest::Resubmit { params, .. } => params,
        }
    }

    pub fn params_mut(&mut self) -> &mut StrategyParams {
        match self {
            SubmissionRequest::Create { params } => params,
            SubmissionRequest::Resubmit { params, .. } => params,
        }
    }
}
