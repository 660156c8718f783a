//! Period windows shared by expense listing, expense statistics and category statistics.
//!
//! A window is either relative to "now" (`week`, `month`, `year`), unbounded (`all`),
//! or an explicit `startDate`/`endDate` range. Bounds are inclusive.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use shared::FieldError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Year,
    All,
}

impl Period {
    /// Length of the relative window, None for `All`
    pub fn lookback(&self) -> Option<Duration> {
        match self {
            Period::Week => Some(Duration::days(7)),
            Period::Month => Some(Duration::days(30)),
            Period::Year => Some(Duration::days(365)),
            Period::All => None,
        }
    }
}

impl FromStr for Period {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" | "" => Ok(Period::All),
            other => Err(FieldError::new(
                "period",
                format!("Unknown period '{}', expected week, month, year or all", other),
            )),
        }
    }
}

/// Which end of a range a date-only value is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
///
/// A date-only value resolves to the first millisecond of the day for `Bound::Start`
/// and the last millisecond of the day for `Bound::End`.
pub fn parse_timestamp(input: &str, bound: Bound) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    let start_of_day = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    match bound {
        Bound::Start => Some(start_of_day),
        Bound::End => Some(start_of_day + Duration::days(1) - Duration::milliseconds(1)),
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl PeriodWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn relative(period: Period, now: DateTime<Utc>) -> Self {
        Self {
            start: period.lookback().map(|lookback| now - lookback),
            end: None,
        }
    }

    /// Resolve a window from raw query parameters.
    ///
    /// `period` wins over explicit bounds. Blank parameters count as absent.
    pub fn resolve(
        period: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, Vec<FieldError>> {
        if let Some(period) = non_blank(period) {
            let period = Period::from_str(period).map_err(|e| vec![e])?;
            return Ok(Self::relative(period, now));
        }

        let mut errors = Vec::new();
        let mut parse = |field: &str, value: Option<&str>, bound: Bound| {
            let value = non_blank(value)?;
            let parsed = parse_timestamp(value, bound);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    field,
                    "Valid date is required (RFC 3339 or YYYY-MM-DD)",
                ));
            }
            parsed
        };

        let start = parse("startDate", start_date, Bound::Start);
        let end = parse("endDate", end_date, Bound::End);

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                errors.push(FieldError::new("startDate", "startDate must not be after endDate"));
            }
        }

        if errors.is_empty() {
            Ok(Self { start, end })
        } else {
            Err(errors)
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}
