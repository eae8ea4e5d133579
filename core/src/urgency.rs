//! Deadline urgency buckets.
//!
//! Every screen that shows "how late is this" goes through [`classify`], so the
//! dashboard counts and reminder selection can never disagree on a boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// Deadline today or already passed.
pub const CRITICAL_DAYS: i64 = 0;
pub const URGENT_DAYS: i64 = 2;
pub const WARNING_DAYS: i64 = 7;

/// Ordered from most to least pressing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Critical,
    Urgent,
    Warning,
    Waiting,
}

/// Collapsed bucket used by count widgets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CountBucket {
    Critical,
    Urgent,
    Normal,
}

impl UrgencyLevel {
    pub fn bucket(self) -> CountBucket {
        match self {
            UrgencyLevel::Critical => CountBucket::Critical,
            UrgencyLevel::Urgent => CountBucket::Urgent,
            UrgencyLevel::Warning | UrgencyLevel::Waiting => CountBucket::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "critical",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Warning => "warning",
            UrgencyLevel::Waiting => "waiting",
        }
    }

    /// True when `self` is at least as pressing as `horizon`.
    pub fn within(self, horizon: UrgencyLevel) -> bool {
        self <= horizon
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(UrgencyLevel::Critical),
            "urgent" => Ok(UrgencyLevel::Urgent),
            "warning" => Ok(UrgencyLevel::Warning),
            "waiting" | "normal" => Ok(UrgencyLevel::Waiting),
            _ => Err(ScheduleError::UnknownUrgency(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrgencyCounts {
    pub critical: usize,
    pub urgent: usize,
    pub normal: usize,
}

impl UrgencyCounts {
    pub fn total(&self) -> usize {
        self.critical + self.urgent + self.normal
    }

    fn record(&mut self, level: UrgencyLevel) {
        match level.bucket() {
            CountBucket::Critical => self.critical += 1,
            CountBucket::Urgent => self.urgent += 1,
            CountBucket::Normal => self.normal += 1,
        }
    }
}

/// Whole calendar days from `today` until `deadline`; negative when overdue.
pub fn days_left(deadline: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    deadline.map(|d| d.signed_duration_since(today).num_days())
}

pub fn classify(deadline: Option<NaiveDate>, today: NaiveDate) -> UrgencyLevel {
    match days_left(deadline, today) {
        None => UrgencyLevel::Waiting,
        Some(days) if days <= CRITICAL_DAYS => UrgencyLevel::Critical,
        Some(days) if days <= URGENT_DAYS => UrgencyLevel::Urgent,
        Some(days) if days <= WARNING_DAYS => UrgencyLevel::Warning,
        Some(_) => UrgencyLevel::Waiting,
    }
}

/// Counts deadlines per collapsed bucket. `warning` and `waiting` both land in `normal`.
pub fn aggregate<I>(deadlines: I, today: NaiveDate) -> UrgencyCounts
where
    I: IntoIterator<Item = Option<NaiveDate>>,
{
    deadlines
        .into_iter()
        .fold(UrgencyCounts::default(), |mut counts, deadline| {
            counts.record(classify(deadline, today));
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn in_days(n: i64) -> Option<NaiveDate> {
        Some(today() + Duration::days(n))
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(in_days(-5), today()), UrgencyLevel::Critical);
        assert_eq!(classify(in_days(0), today()), UrgencyLevel::Critical);
        assert_eq!(classify(in_days(1), today()), UrgencyLevel::Urgent);
        assert_eq!(classify(in_days(2), today()), UrgencyLevel::Urgent);
        assert_eq!(classify(in_days(3), today()), UrgencyLevel::Warning);
        assert_eq!(classify(in_days(7), today()), UrgencyLevel::Warning);
        assert_eq!(classify(in_days(8), today()), UrgencyLevel::Waiting);
        assert_eq!(classify(None, today()), UrgencyLevel::Waiting);
    }

    #[test]
    fn test_deadline_today_is_critical() {
        let t = today();
        assert_eq!(classify(Some(t), t), UrgencyLevel::Critical);
    }

    #[test]
    fn test_days_left_sign() {
        assert_eq!(days_left(in_days(-2), today()), Some(-2));
        assert_eq!(days_left(in_days(4), today()), Some(4));
        assert_eq!(days_left(None, today()), None);
    }

    #[test]
    fn test_aggregate_collapses_warning_and_waiting() {
        let deadlines = vec![
            in_days(-1),
            in_days(0),
            in_days(2),
            in_days(5),
            in_days(30),
            None,
        ];
        let counts = aggregate(deadlines.clone(), today());
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.urgent, 1);
        assert_eq!(counts.normal, 3);
        assert_eq!(counts.total(), deadlines.len());
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut deadlines: Vec<_> = (-3..12).map(in_days).collect();
        deadlines.push(None);
        let forward = aggregate(deadlines.clone(), today());
        deadlines.reverse();
        assert_eq!(aggregate(deadlines, today()), forward);
    }

    #[test]
    fn test_aggregate_normal_matches_per_item_levels() {
        let deadlines: Vec<_> = (-2..20).map(in_days).chain([None, None]).collect();
        let levels: Vec<_> = deadlines.iter().map(|d| classify(*d, today())).collect();
        let warning = levels.iter().filter(|l| **l == UrgencyLevel::Warning).count();
        let waiting = levels.iter().filter(|l| **l == UrgencyLevel::Waiting).count();

        let counts = aggregate(deadlines, today());
        assert_eq!(counts.normal, warning + waiting);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(Vec::new(), today()), UrgencyCounts::default());
    }

    #[test]
    fn test_within_horizon() {
        assert!(UrgencyLevel::Critical.within(UrgencyLevel::Warning));
        assert!(UrgencyLevel::Warning.within(UrgencyLevel::Warning));
        assert!(!UrgencyLevel::Waiting.within(UrgencyLevel::Warning));
        assert!(!UrgencyLevel::Urgent.within(UrgencyLevel::Critical));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("Urgent".parse::<UrgencyLevel>().unwrap(), UrgencyLevel::Urgent);
        assert_eq!("normal".parse::<UrgencyLevel>().unwrap(), UrgencyLevel::Waiting);
        assert!("soon".parse::<UrgencyLevel>().is_err());
    }
}
