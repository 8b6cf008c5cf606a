use crate::models::{
    backtest_job::BacktestJob, strategy::DateRange, submission::BacktestParams,
    timeframe::Timeframe,
};
use anyhow::{anyhow, Result};

#[derive(Debug, Default)]
pub struct BacktestJobBuilder {
    pub strategy_id: Option<String>,
    pub user_id: Option<String>,
    pub date_range: Option<DateRange>,
    pub language: Option<String>,
    pub source_code: Option<String>,
    pub timeframe: Option<Timeframe>,
}

impl BacktestJobBuilder {
    pub fn new() -> Self {
        BacktestJobBuilder::default()
    }

    /// Copies every field except the strategy id from validated params.
    pub fn params(self, params: &BacktestParams) -> Self {
        self.user_id(&params.user_id)
            .date_range(params.date_range)
            .language(&params.language)
            .source_code(&params.code)
            .timeframe(params.timeframe.clone())
    }

    pub fn strategy_id(mut self, strategy_id: impl ToString) -> Self {
        self.strategy_id = Some(strategy_id.to_string());
        self
    }

    pub fn user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn source_code(mut self, source_code: &str) -> Self {
        self.source_code = Some(source_code.to_string());
        self
    }

    pub fn timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    pub fn build(self) -> Result<BacktestJob> {
        let strategy_id = self
            .strategy_id
            .ok_or(anyhow!("Strategy id is required to build BacktestJob."))?;
        let user_id = self
            .user_id
            .ok_or(anyhow!("User id is required to build BacktestJob."))?;
        let date_range = self
            .date_range
            .ok_or(anyhow!("Date range is required to build BacktestJob."))?;
        let language = self
            .language
            .ok_or(anyhow!("Language is required to build BacktestJob."))?;
        let source_code = self
            .source_code
            .ok_or(anyhow!("Source code is required to build BacktestJob."))?;
        let timeframe = self
            .timeframe
            .ok_or(anyhow!("Timeframe is required to build BacktestJob."))?;

        let job = BacktestJob {
            strategy_id,
            user_id,
            date_range,
            language,
            source_code,
            timeframe,
        };

        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timeframe::Interval;
    use chrono::NaiveDate;

    #[test]
    fn build_requires_strategy_id() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
        .unwrap();

        let builder = BacktestJobBuilder::new()
            .user_id("u1")
            .date_range(range)
            .language("cpp")
            .source_code("code")
            .timeframe(Timeframe::new(Interval::Minute1));

        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("Strategy id"));
    }
}
