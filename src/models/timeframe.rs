use anyhow::{anyhow, Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Candle resolution understood by the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute1,
    Minute2,
    Minute3,
    Minute5,
    Minute10,
    Minute15,
    Hour1,
    Hour4,
}

impl Interval {
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Minute1 => "c1m",
            Interval::Minute2 => "c2m",
            Interval::Minute3 => "c3m",
            Interval::Minute5 => "c5m",
            Interval::Minute10 => "c10m",
            Interval::Minute15 => "c15m",
            Interval::Hour1 => "c1h",
            Interval::Hour4 => "c4h",
        }
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let interval = match s {
            "c1m" => Interval::Minute1,
            "c2m" => Interval::Minute2,
            "c3m" => Interval::Minute3,
            "c5m" => Interval::Minute5,
            "c10m" => Interval::Minute10,
            "c15m" => Interval::Minute15,
            "c1h" => Interval::Hour1,
            "c4h" => Interval::Hour4,
            _ => return Err(anyhow!("Unknown interval code '{}'.", s)),
        };

        Ok(interval)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Interval code, optionally namespaced by venue (`<venue>.<code>`).
///
/// The engine receives the full tag verbatim in the `type` field of a submit
/// frame, so the venue prefix is preserved through a parse/format cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    pub venue: Option<String>,
    pub interval: Interval,
}

impl Timeframe {
    pub fn new(interval: Interval) -> Self {
        Self {
            venue: None,
            interval,
        }
    }

    pub fn on_venue(venue: &str, interval: Interval) -> Self {
        Self {
            venue: Some(venue.to_string()),
            interval,
        }
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        match s.rsplit_once('.') {
            Some((venue, code)) => {
                if venue.is_empty() {
                    return Err(anyhow!("Timeframe '{}' has an empty venue.", s));
                }

                Ok(Self::on_venue(venue, code.parse()?))
            }
            None => Ok(Self::new(s.parse()?)),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(value: Timeframe) -> Self {
        value.to_string()
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.venue {
            Some(venue) => write!(f, "{}.{}", venue, self.interval),
            None => write!(f, "{}", self.interval),
        }
    }
}
