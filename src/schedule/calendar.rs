//! Working calendar.
//!
//! # Responsibilities
//! - Parse working hours, weekly days off and one-off non-working dates
//! - Decide whether a moment falls inside working time
//!
//! # Design Decisions
//! - Without working hours every moment is working time
//! - Both ends of the working day are inclusive
//! - Evaluated in local time

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

use crate::config::schema::ScheduleConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

pub fn parse_time(value: &str) -> Result<NaiveTime, CalendarError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| CalendarError::InvalidTime(value.to_string()))
}

pub fn parse_weekday(value: &str) -> Result<Weekday, CalendarError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| CalendarError::UnknownWeekday(value.to_string()))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CalendarError::InvalidDate(value.to_string()))
}

/// When monitoring ticks are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingCalendar {
    hours: Option<(NaiveTime, NaiveTime)>,
    days_off: Vec<Weekday>,
    unusual_days: Vec<NaiveDate>,
}

impl WorkingCalendar {
    /// A calendar with no restrictions.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn new(
        hours: Option<(NaiveTime, NaiveTime)>,
        days_off: Vec<Weekday>,
        unusual_days: Vec<NaiveDate>,
    ) -> Self {
        Self {
            hours,
            days_off,
            unusual_days,
        }
    }

    pub fn from_config(config: &ScheduleConfig) -> Result<Self, CalendarError> {
        let hours = match (&config.start_time, &config.end_time) {
            (Some(start), Some(end)) => Some((parse_time(start)?, parse_time(end)?)),
            _ => None,
        };
        let days_off = config
            .days_off
            .iter()
            .map(|d| parse_weekday(d))
            .collect::<Result<_, _>>()?;
        let unusual_days = config
            .unusual_days
            .iter()
            .map(|d| parse_date(d))
            .collect::<Result<_, _>>()?;

        Ok(Self::new(hours, days_off, unusual_days))
    }

    pub fn is_working_time(&self, now: NaiveDateTime) -> bool {
        let Some((start, end)) = self.hours else {
            return true;
        };

        if self.days_off.contains(&now.weekday()) || self.unusual_days.contains(&now.date()) {
            return false;
        }

        let time = now.time();
        time >= start && time <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        parse_date(date).unwrap().and_time(parse_time(time).unwrap())
    }

    fn office() -> WorkingCalendar {
        WorkingCalendar::new(
            Some((parse_time("09:00").unwrap(), parse_time("18:00").unwrap())),
            vec![Weekday::Sat, Weekday::Sun],
            vec![parse_date("2026-12-31").unwrap()],
        )
    }

    #[test]
    fn test_without_hours_always_working() {
        let calendar = WorkingCalendar::new(None, vec![Weekday::Sun], Vec::new());
        // 2026-10-18 is a Sunday.
        assert!(calendar.is_working_time(at("2026-10-18", "03:00")));
    }

    #[test]
    fn test_working_hours_are_inclusive() {
        let calendar = office();
        // 2026-10-19 is a Monday.
        assert!(calendar.is_working_time(at("2026-10-19", "09:00")));
        assert!(calendar.is_working_time(at("2026-10-19", "18:00")));
        assert!(!calendar.is_working_time(at("2026-10-19", "08:59")));
        assert!(!calendar.is_working_time(at("2026-10-19", "18:01")));
    }

    #[test]
    fn test_days_off_and_unusual_days() {
        let calendar = office();
        assert!(!calendar.is_working_time(at("2026-10-17", "12:00")));
        assert!(!calendar.is_working_time(at("2026-12-31", "12:00")));
        assert!(calendar.is_working_time(at("2026-12-30", "12:00")));
    }

    #[test]
    fn test_from_config() {
        let config = ScheduleConfig {
            start_time: Some("09:00".into()),
            end_time: Some("18:00".into()),
            days_off: vec!["Saturday".into(), "Sunday".into()],
            unusual_days: vec!["2026-12-31".into()],
            ..ScheduleConfig::default()
        };
        assert_eq!(WorkingCalendar::from_config(&config).unwrap(), office());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_time("25:00"), Err(CalendarError::InvalidTime("25:00".into())));
        assert_eq!(parse_weekday("Caturday"), Err(CalendarError::UnknownWeekday("Caturday".into())));
        assert_eq!(parse_date("31.12.2026"), Err(CalendarError::InvalidDate("31.12.2026".into())));
    }
}
