//! Errors raised by the schedule computations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Recurrence type outside daily/weekly/monthly/yearly.
    #[error("unknown recurrence type: '{0}'")]
    UnknownRecurrence(String),

    #[error("unknown urgency level: '{0}'")]
    UnknownUrgency(String),

    /// Stepping a schedule ran past the last representable calendar date.
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
