use crate::models::timeframe::Timeframe;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Draft,
    Running,
    Completed,
    Failed,
}

impl Display for StrategyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StrategyStatus::Draft => "draft",
            StrategyStatus::Running => "running",
            StrategyStatus::Completed => "completed",
            StrategyStatus::Failed => "failed",
        };

        write!(f, "{}", s)
    }
}

/// Calendar date range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }
}

/// Strategy metadata document as kept by the strategy store. The submitted
/// source code is not part of the record, it lives in the artifact store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub initial_equity: f64,
    pub timeframe: Timeframe,
    pub date_range: DateRange,
    pub status: StrategyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub run_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Strategy {
    pub fn from_new(id: Uuid, new: NewStrategy, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            user_id: new.user_id,
            initial_equity: new.initial_equity,
            timeframe: new.timeframe,
            date_range: new.date_range,
            status: new.status,
            error: None,
            last_run_at: new.last_run_at,
            run_count: new.run_count,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update and stamps `updated_at`. Only a failed record
    /// keeps an error, and a failed record must have one. On error `self` is
    /// left untouched.
    pub fn apply(&mut self, update: StrategyUpdate, now: DateTime<Utc>) -> anyhow::Result<()> {
        let mut next = self.clone();

        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(initial_equity) = update.initial_equity {
            next.initial_equity = initial_equity;
        }
        if let Some(timeframe) = update.timeframe {
            next.timeframe = timeframe;
        }
        if let Some(date_range) = update.date_range {
            next.date_range = date_range;
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(error) = update.error {
            next.error = error;
        }
        if let Some(last_run_at) = update.last_run_at {
            next.last_run_at = Some(last_run_at);
        }
        if let Some(run_count) = update.run_count {
            next.run_count = run_count;
        }

        if next.status != StrategyStatus::Failed {
            next.error = None;
        } else if next.error.as_deref().map_or(true, |e| e.trim().is_empty()) {
            return Err(anyhow::anyhow!(
                "Strategy {} cannot be failed without an error message.",
                self.id
            ));
        }

        next.updated_at = now;
        *self = next;

        Ok(())
    }
}

/// A strategy record before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStrategy {
    pub name: String,
    pub user_id: String,
    pub initial_equity: f64,
    pub timeframe: Timeframe,
    pub date_range: DateRange,
    pub status: StrategyStatus,
    pub last_run_at: Option<DateTime<Utc>>,
    pub run_count: u32,
}

/// Partial update. `error: Some(None)` clears a previous error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyUpdate {
    pub name: Option<String>,
    pub initial_equity: Option<f64>,
    pub timeframe: Option<Timeframe>,
    pub date_range: Option<DateRange>,
    pub status: Option<StrategyStatus>,
    pub error: Option<Option<String>>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub run_count: Option<u32>,
}

impl StrategyUpdate {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: Some(StrategyStatus::Failed),
            error: Some(Some(reason.into())),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyOrder {
    #[default]
    UpdatedAt,
    CreatedAt,
    Name,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyFilter {
    pub status: Option<StrategyStatus>,
    pub order_by: StrategyOrder,
    pub ascending: bool,
    pub limit: Option<usize>,
}

impl StrategyFilter {
    /// Filters, orders and truncates strategies that already belong to a
    /// single user.
    pub fn apply(&self, mut strategies: Vec<Strategy>) -> Vec<Strategy> {
        if let Some(status) = self.status {
            strategies.retain(|s| s.status == status);
        }

        strategies.sort_by(|a, b| {
            let ord = match self.order_by {
                StrategyOrder::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                StrategyOrder::CreatedAt => a.created_at.cmp(&b.created_at),
                StrategyOrder::Name => a.name.cmp(&b.name),
            };

            // Stable sort, so ties keep store order either way.
            if self.ascending {
                ord
            } else {
                ord.reverse()
            }
        });

        if let Some(limit) = self.limit {
            strategies.truncate(limit);
        }

        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timeframe::Interval;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(name: &str, minutes: i64) -> Strategy {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let new = NewStrategy {
            name: name.to_string(),
            user_id: "u1".to_string(),
            initial_equity: 10_000.0,
            timeframe: Timeframe::new(Interval::Minute5),
            date_range: DateRange::new(date(2024, 1, 1), date(2024, 2, 1)).unwrap(),
            status: StrategyStatus::Draft,
            last_run_at: None,
            run_count: 0,
        };

        let mut s = Strategy::from_new(Uuid::new_v4(), new, created);
        s.updated_at = created + Duration::minutes(minutes);
        s
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2024, 3, 1), date(2024, 2, 1)).is_none());
        assert!(DateRange::new(date(2024, 2, 1), date(2024, 2, 1)).is_some());
    }

    #[test]
    fn apply_clears_and_sets_error() {
        let mut s = sample("a", 0);
        let now = Utc::now();

        s.apply(StrategyUpdate::failed("compile failed"), now).unwrap();
        assert_eq!(s.status, StrategyStatus::Failed);
        assert_eq!(s.error.as_deref(), Some("compile failed"));
        assert_eq!(s.updated_at, now);

        let rerun = StrategyUpdate {
            status: Some(StrategyStatus::Running),
            error: Some(None),
            run_count: Some(2),
            ..Default::default()
        };
        s.apply(rerun, now).unwrap();
        assert_eq!(s.status, StrategyStatus::Running);
        assert!(s.error.is_none());
        assert_eq!(s.run_count, 2);
    }

    #[test]
    fn leaving_failed_drops_the_error() {
        let mut s = sample("a", 0);
        let now = Utc::now();
        s.apply(StrategyUpdate::failed("compile failed"), now).unwrap();

        let completed = StrategyUpdate {
            status: Some(StrategyStatus::Completed),
            ..Default::default()
        };
        s.apply(completed, now).unwrap();

        assert_eq!(s.status, StrategyStatus::Completed);
        assert!(s.error.is_none());
    }

    #[test]
    fn failed_status_needs_an_error() {
        let mut s = sample("a", 0);
        let before = s.clone();

        let bare = StrategyUpdate {
            status: Some(StrategyStatus::Failed),
            ..Default::default()
        };
        assert!(s.apply(bare, Utc::now()).is_err());
        assert_eq!(s, before);

        s.apply(StrategyUpdate::failed("boom"), Utc::now()).unwrap();
        let cleared = StrategyUpdate {
            error: Some(None),
            ..Default::default()
        };
        assert!(s.apply(cleared, Utc::now()).is_err());
        assert_eq!(s.error.as_deref(), Some("boom"));

        // An error on a non-failed record is dropped.
        let mut running = sample("b", 0);
        let stray = StrategyUpdate {
            error: Some(Some("stale".to_string())),
            ..Default::default()
        };
        running.apply(stray, Utc::now()).unwrap();
        assert!(running.error.is_none());
    }

    #[test]
    fn descending_order_keeps_ties_in_store_order() {
        let strategies = vec![sample("a", 3), sample("b", 3), sample("c", 7)];

        let newest_first = StrategyFilter::default().apply(strategies.clone());
        let names: Vec<_> = newest_first.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);

        let oldest_first = StrategyFilter {
            ascending: true,
            ..Default::default()
        }
        .apply(strategies);
        let names: Vec<_> = oldest_first.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn record_uses_camel_case_document_fields() {
        let s = sample("a", 0);
        let v = serde_json::to_value(&s).unwrap();

        assert_eq!(v["userId"], "u1");
        assert_eq!(v["initialEquity"], 10_000.0);
        assert_eq!(v["timeframe"], "c5m");
        assert_eq!(v["dateRange"]["from"], "2024-01-01");
        assert_eq!(v["status"], "draft");
        assert!(v.get("error").is_none());
    }

    #[test]
    fn filter_orders_newest_first_by_default() {
        let mut failed = sample("c", 5);
        failed.status = StrategyStatus::Failed;
        let strategies = vec![sample("a", 1), sample("b", 10), failed];

        let all = StrategyFilter::default().apply(strategies.clone());
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        let only_failed = StrategyFilter {
            status: Some(StrategyStatus::Failed),
            ..Default::default()
        }
        .apply(strategies.clone());
        assert_eq!(only_failed.len(), 1);

        let limited = StrategyFilter {
            order_by: StrategyOrder::Name,
            ascending: true,
            limit: Some(2),
            ..Default::default()
        }
        .apply(strategies);
        let names: Vec<_> = limited.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
