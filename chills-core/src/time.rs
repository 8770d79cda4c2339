//! Reference timezone and weekly time slots.
//!
//! Every weekday, minute-of-day and calendar-date derivation goes through a
//! single [`ReferenceZone`], so two enrollments are always compared in the
//! same frame no matter how their instants were written upstream.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ChillsError, ChillsResult};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// The fixed timezone used to turn instants into weekdays, times of day and dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone(Tz);

impl Default for ReferenceZone {
    fn default() -> Self {
        ReferenceZone(Tz::UTC)
    }
}

impl FromStr for ReferenceZone {
    type Err = ChillsError;

    fn from_str(s: &str) -> ChillsResult<Self> {
        s.trim()
            .parse::<Tz>()
            .map(ReferenceZone)
            .map_err(|_| ChillsError::UnknownTimezone(s.to_string()))
    }
}

impl fmt::Display for ReferenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

impl ReferenceZone {
    pub fn tz(&self) -> Tz {
        self.0
    }

    pub fn localize(&self, instant: &DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.0)
    }

    /// Calendar date of an instant in this zone.
    pub fn date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        self.localize(instant).date_naive()
    }

    /// Interpret a wall-clock time as local to this zone.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant;
    /// times skipped by a DST jump have no instant and yield `None`.
    pub fn resolve_local(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        resolve_in(self.0, naive)
    }

    /// Weekly slot covered by `[start, end)` as seen in this zone.
    pub fn slot(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> WeeklySlot {
        let local_start = self.localize(start);
        let local_end = self.localize(end);

        let start_minute = minute_of_day(&local_start);
        // A class running past midnight is clipped to the end of its start day.
        let end_minute = if local_end.date_naive() == local_start.date_naive() {
            minute_of_day(&local_end)
        } else {
            MINUTES_PER_DAY
        };

        WeeklySlot {
            weekday: local_start.weekday(),
            start_minute,
            end_minute,
        }
    }
}

/// Resolve a wall-clock time in an arbitrary zone to a UTC instant.
pub(crate) fn resolve_in(tz: Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn minute_of_day(dt: &DateTime<Tz>) -> u16 {
    // hour < 24 and minute < 60, so this always fits
    (dt.hour() * 60 + dt.minute()) as u16
}

/// A weekday plus a half-open minute-of-day window, e.g. Monday 14:00-16:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklySlot {
    pub weekday: Weekday,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl WeeklySlot {
    /// Same weekday and `max(start) < min(end)`. Touching windows do not overlap.
    pub fn overlaps(&self, other: &WeeklySlot) -> bool {
        self.weekday == other.weekday
            && self.start_minute.max(other.start_minute) < self.end_minute.min(other.end_minute)
    }
}

impl fmt::Display for WeeklySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}-{:02}:{:02}",
            self.weekday,
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}
