//! Pregnancy progress calculations.
//!
//! Everything here is plain date arithmetic relative to a caller-supplied
//! `today`, so results are reproducible in tests.

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Length of a full-term pregnancy in days (40 weeks)
pub const TERM_DAYS: i64 = 40 * 7;

/// Length of a trimester as used for the trimester progress bar
pub const TRIMESTER_DAYS: i64 = 93;

/// Percentage covered by one trimester
const TRIMESTER_PERCENTAGE: f64 = 33.3333;

/// Date format for conception dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A tracked pregnancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pregnancy {
    pub name: Option<String>,
    pub conception_date: NaiveDate,
}

/// Snapshot of a pregnancy on a given day, as rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PregnancyProgress {
    pub name: Option<String>,
    pub age: String,
    pub weeks: i64,
    pub days: i64,
    pub age_in_days: i64,
    pub percentage: f64,
    pub trimester: i64,
    pub due: NaiveDate,
    pub days_left: i64,
    pub progress: ProgressBars,
}

/// Whole-number fill levels for the two progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressBars {
    pub trimester: i64,
    pub pregnancy: i64,
}

impl Pregnancy {
    pub fn new(conception_date: NaiveDate) -> Self {
        Self {
            name: None,
            conception_date,
        }
    }

    /// Parse a `YYYY-MM-DD` conception date.
    pub fn parse(conception: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(conception, DATE_FORMAT).map(Self::new)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Days since conception.
    pub fn age_in_days(&self, today: NaiveDate) -> i64 {
        (today - self.conception_date).num_days()
    }

    /// Completed weeks since conception.
    pub fn age_in_weeks(&self, today: NaiveDate) -> i64 {
        self.age_in_days(today).div_euclid(7)
    }

    /// Human readable age, e.g. `12 weeks and 3 days`.
    pub fn age(&self, today: NaiveDate) -> String {
        format!(
            "{} weeks and {} days",
            self.age_in_weeks(today),
            self.age_in_days(today).rem_euclid(7)
        )
    }

    /// Percentage of the full term that has passed. Not clamped.
    pub fn percentage(&self, today: NaiveDate) -> f64 {
        (self.age_in_days(today) as f64 / TERM_DAYS as f64) * 100.0
    }

    /// Current trimester, starting at 1.
    pub fn trimester(&self, today: NaiveDate) -> i64 {
        (self.percentage(today) / TRIMESTER_PERCENTAGE).floor() as i64 + 1
    }

    pub fn due_date(&self) -> NaiveDate {
        self.conception_date + Days::new(TERM_DAYS as u64)
    }

    /// Days until the due date; negative once it has passed.
    pub fn days_till_due_date(&self, today: NaiveDate) -> i64 {
        (self.due_date() - today).num_days()
    }

    /// Fill levels for the trimester and pregnancy progress bars.
    pub fn progress_bars(&self, today: NaiveDate) -> ProgressBars {
        let days = self.age_in_days(today);
        let in_trimester = days.rem_euclid(TRIMESTER_DAYS) as f64 / TRIMESTER_DAYS as f64;
        ProgressBars {
            trimester: (in_trimester * 100.0).round_ties_even() as i64,
            pregnancy: ((days as f64 / TERM_DAYS as f64) * 100.0).round_ties_even() as i64,
        }
    }

    pub fn progress(&self, today: NaiveDate) -> PregnancyProgress {
        let age_in_days = self.age_in_days(today);
        PregnancyProgress {
            name: self.name.clone(),
            age: self.age(today),
            weeks: self.age_in_weeks(today),
            days: age_in_days.rem_euclid(7),
            age_in_days,
            percentage: self.percentage(today),
            trimester: self.trimester(today),
            due: self.due_date(),
            days_left: self.days_till_due_date(today),
            progress: self.progress_bars(today),
        }
    }
}
