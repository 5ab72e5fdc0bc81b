//! Calendar-day policies for grouping trades by day.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Maps an instant to the calendar day it belongs to.
pub trait DayBoundary {
    fn day_key(&self, at: DateTime<Utc>) -> NaiveDate;
}

/// Calendar day in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UtcDay;

impl DayBoundary for UtcDay {
    fn day_key(&self, at: DateTime<Utc>) -> NaiveDate {
        at.date_naive()
    }
}

/// Calendar day at a fixed offset from UTC, e.g. the trader's exchange time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetDay(pub FixedOffset);

impl OffsetDay {
    /// `None` if the offset is a full day or more.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(OffsetDay)
    }
}

impl DayBoundary for OffsetDay {
    fn day_key(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.0).date_naive()
    }
}

impl<F> DayBoundary for F
where
    F: Fn(DateTime<Utc>) -> NaiveDate,
{
    fn day_key(&self, at: DateTime<Utc>) -> NaiveDate {
        self(at)
    }
}
