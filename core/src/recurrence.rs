//! Recurring schedules: next occurrence, "is one due today", and date enumeration.
//!
//! Month and year steps use chrono's [`Months`] arithmetic, which clamps to the
//! last valid day of the target month: 2025-01-31 + 1 month is 2025-02-28 and
//! 2024-02-29 + 1 year is 2025-02-28. A monthly series stepped from its last
//! materialized date keeps the clamped day from then on (Jan 31, Feb 28, Mar 28).

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ScheduleError, ScheduleResult};

pub const DEFAULT_OCCURRENCE_LIMIT: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    pub const ALL: [RecurrenceType; 4] = [
        RecurrenceType::Daily,
        RecurrenceType::Weekly,
        RecurrenceType::Monthly,
        RecurrenceType::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecurrenceType::Daily => "daily",
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Monthly => "monthly",
            RecurrenceType::Yearly => "yearly",
        }
    }

    /// Adds exactly one unit of this recurrence to `date`.
    pub fn step(self, date: NaiveDate) -> ScheduleResult<NaiveDate> {
        let next = match self {
            RecurrenceType::Daily => date.checked_add_days(Days::new(1)),
            RecurrenceType::Weekly => date.checked_add_days(Days::new(7)),
            RecurrenceType::Monthly => date.checked_add_months(Months::new(1)),
            RecurrenceType::Yearly => date.checked_add_months(Months::new(12)),
        };
        next.ok_or_else(|| ScheduleError::DateOutOfRange(format!("{} + 1 {}", date, self)))
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" => Ok(RecurrenceType::Daily),
            "weekly" | "w" => Ok(RecurrenceType::Weekly),
            "monthly" | "m" => Ok(RecurrenceType::Monthly),
            "yearly" | "y" => Ok(RecurrenceType::Yearly),
            _ => Err(ScheduleError::UnknownRecurrence(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceConfig {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,
    pub start_date: NaiveDate,
    /// Inclusive: the whole end day still produces occurrences.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Last occurrence materialized by the caller. Never written here.
    #[serde(default)]
    pub last_created: Option<NaiveDate>,
}

impl RecurrenceConfig {
    pub fn new(kind: RecurrenceType, start_date: NaiveDate) -> Self {
        Self {
            kind,
            start_date,
            end_date: None,
            last_created: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn created_on(mut self, last_created: NaiveDate) -> Self {
        self.last_created = Some(last_created);
        self
    }

    pub fn next_occurrence(&self) -> ScheduleResult<NaiveDate> {
        next_occurrence(self.kind, self.start_date, self.last_created)
    }

    pub fn should_create_today(&self, today: NaiveDate) -> bool {
        should_create_today(self, today)
    }

    pub fn occurrences(&self, limit: usize) -> Occurrences {
        enumerate_occurrences(self, limit)
    }
}

/// One `kind` step past `last_created`, or past `start_date` when nothing was created yet.
pub fn next_occurrence(
    kind: RecurrenceType,
    start_date: NaiveDate,
    last_created: Option<NaiveDate>,
) -> ScheduleResult<NaiveDate> {
    kind.step(last_created.unwrap_or(start_date))
}

pub fn should_create_today(config: &RecurrenceConfig, today: NaiveDate) -> bool {
    if today < config.start_date {
        return false;
    }
    if matches!(config.end_date, Some(end) if today > end) {
        return false;
    }
    match config.last_created {
        None => true,
        Some(_) => config
            .next_occurrence()
            .map(|next| today >= next)
            .unwrap_or(false),
    }
}

/// Occurrence dates from `start_date`, at most `limit` of them, none past `end_date`.
pub fn enumerate_occurrences(config: &RecurrenceConfig, limit: usize) -> Occurrences {
    Occurrences {
        kind: config.kind,
        next: Some(config.start_date),
        end_date: config.end_date,
        remaining: limit,
    }
}

/// Lazy occurrence sequence. Clone it to restart from the same position.
#[derive(Debug, Clone)]
pub struct Occurrences {
    kind: RecurrenceType,
    next: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    remaining: usize,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        if matches!(self.end_date, Some(end) if current > end) {
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        self.next = self.kind.step(current).ok();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => (0, Some(self.remaining)),
            None => (0, Some(0)),
        }
    }
}
