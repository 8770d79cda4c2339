//! RRULE expansion for recurring timetable classes.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::constants::MAX_OCCURRENCES;
use crate::error::{ChillsError, ChillsResult};

/// An EXDATE value: either one exact occurrence or a whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exclusion {
    Instant(DateTime<Utc>),
    Date(NaiveDate),
}

/// A recurring class: first occurrence, the zone it recurs in, and its rule.
pub(crate) struct RecurringClass<'a> {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub tz: Tz,
    pub rrule: &'a str,
    pub exclusions: &'a [Exclusion],
}

/// Build an iCalendar-format rule string for the rrule crate parser.
fn build_rrule_string(class: &RecurringClass<'_>) -> String {
    let dtstart = if class.tz == Tz::UTC {
        format!("DTSTART:{}", class.start.format("%Y%m%dT%H%M%SZ"))
    } else {
        format!(
            "DTSTART;TZID={}:{}",
            class.tz.name(),
            class.start.with_timezone(&class.tz).format("%Y%m%dT%H%M%S")
        )
    };

    format!("{dtstart}\nRRULE:{}", class.rrule)
}

/// Expand into `(start, end)` pairs from the first occurrence up to
/// `window_days` later. Recurring in the class's own zone keeps wall-clock
/// times stable across DST changes.
pub(crate) fn expand(
    class: &RecurringClass<'_>,
    window_days: i64,
) -> ChillsResult<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
    let rrule_set: RRuleSet = build_rrule_string(class).parse().map_err(|e| {
        ChillsError::IcsParse(format!("Failed to parse RRULE '{}': {e}", class.rrule))
    })?;

    let window_end = Duration::try_days(window_days)
        .and_then(|window| class.start.checked_add_signed(window))
        .ok_or_else(|| {
            ChillsError::IcsParse(format!("Import window of {window_days} days is out of range"))
        })?;

    // after/before are exclusive
    let tz: rrule::Tz = Utc.into();
    let after = (class.start - Duration::seconds(1)).with_timezone(&tz);
    let before = window_end.with_timezone(&tz);

    let result = rrule_set.after(after).before(before).all(MAX_OCCURRENCES);
    let duration = class.end - class.start;

    Ok(result
        .dates
        .iter()
        .map(|occurrence| occurrence.with_timezone(&Utc))
        .filter(|start| !is_excluded(start, class.tz, class.exclusions))
        .map(|start| (start, start + duration))
        .collect())
}

fn is_excluded(start: &DateTime<Utc>, tz: Tz, exclusions: &[Exclusion]) -> bool {
    exclusions.iter().any(|exclusion| match exclusion {
        Exclusion::Instant(instant) => instant == start,
        Exclusion::Date(date) => start.with_timezone(&tz).date_naive() == *date,
    })
}
