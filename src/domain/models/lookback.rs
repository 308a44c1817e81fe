//! Lookback windows such as `"10 minutes"` or `"3 days"`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::checkpoint::Checkpoint;
use crate::domain::errors::{GatewayError, GatewayResult};

/// Unit of a lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookbackUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl LookbackUnit {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "minute" | "minutes" | "min" | "mins" => Some(Self::Minutes),
            "hour" | "hours" | "h" => Some(Self::Hours),
            "day" | "days" | "d" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            "month" | "months" => Some(Self::Months),
            "year" | "years" => Some(Self::Years),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

/// How far back the first poll cycle looks when no checkpoint exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub amount: u32,
    pub unit: LookbackUnit,
}

impl LookbackWindow {
    /// Parse `"<amount> <unit>"`.
    ///
    /// Fails with [`GatewayError::ConfigurationError`] on any other shape.
    pub fn parse(raw: &str) -> GatewayResult<Self> {
        let invalid = || {
            GatewayError::ConfigurationError(format!(
                "Invalid fetch time '{raw}': expected '<number> <unit>', e.g. '10 minutes'"
            ))
        };

        let mut parts = raw.split_whitespace();
        let amount = parts
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let unit = parts.next().and_then(LookbackUnit::parse).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let window = Self { amount, unit };
        window.duration()?;
        Ok(window)
    }

    /// Length of the window; months count 30 days and years 365.
    pub fn duration(&self) -> GatewayResult<Duration> {
        let n = i64::from(self.amount);
        let delta = match self.unit {
            LookbackUnit::Minutes => Duration::try_minutes(n),
            LookbackUnit::Hours => Duration::try_hours(n),
            LookbackUnit::Days => Duration::try_days(n),
            LookbackUnit::Weeks => Duration::try_weeks(n),
            LookbackUnit::Months => Duration::try_days(30 * n),
            LookbackUnit::Years => Duration::try_days(365 * n),
        };
        delta.ok_or_else(|| self.out_of_range())
    }

    /// The checkpoint a first run starts from: `now - window`.
    pub fn seed_checkpoint(&self, now: DateTime<Utc>) -> GatewayResult<Checkpoint> {
        now.checked_sub_signed(self.duration()?)
            .map(Checkpoint::from_datetime)
            .ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> GatewayError {
        GatewayError::ConfigurationError(format!("Fetch time '{self}' is too far in the past"))
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self {
            amount: 10,
            unit: LookbackUnit::Minutes,
        }
    }
}

impl FromStr for LookbackWindow {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.as_str())
    }
}
