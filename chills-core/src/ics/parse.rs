//! Timetable parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::{debug, warn};

use crate::constants::{MAX_ICS_BYTES, NO_LOCATION};
use crate::enrollment::{ClassType, EnrollmentRow};
use crate::error::{ChillsError, ChillsResult};
use crate::recurrence::{self, Exclusion, RecurringClass};
use crate::time::{ReferenceZone, resolve_in};

/// One class occurrence read from a timetable feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableEvent {
    pub course: String,
    pub class_type: ClassType,
    pub section: Option<String>,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimetableEvent {
    /// The enrolment row this event would be stored as.
    pub fn to_row(&self) -> EnrollmentRow {
        EnrollmentRow {
            course: Some(self.course.clone()),
            class_type: Some(self.class_type.tag().to_string()),
            section: self.section.clone(),
            start_time: Some(self.start.to_rfc3339()),
            end_time: Some(self.end.to_rfc3339()),
            room_id: Some(self.location.clone()),
        }
    }
}

/// Parse a timetable into class occurrences, expanding recurring events
/// over `window_days` from their first occurrence.
///
/// Events whose summary does not start with a course code, and final
/// exams, are skipped. A timetable with no usable event is an error.
pub fn parse_timetable(
    content: &str,
    zone: ReferenceZone,
    window_days: i64,
) -> ChillsResult<Vec<TimetableEvent>> {
    if content.len() > MAX_ICS_BYTES {
        return Err(ChillsError::IcsParse(format!(
            "Timetable is larger than {MAX_ICS_BYTES} bytes"
        )));
    }
    if !content.to_ascii_uppercase().contains("BEGIN:VCALENDAR") {
        return Err(ChillsError::IcsParse(
            "This doesn't look like an .ics file".to_string(),
        ));
    }

    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| ChillsError::IcsParse(e.to_string()))?;

    let mut events = Vec::new();
    for vevent in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        match parse_vevent(vevent, zone, window_days) {
            Ok(mut parsed) => events.append(&mut parsed),
            Err(e) => warn!(error = %e, "skipping timetable event"),
        }
    }

    if events.is_empty() {
        return Err(ChillsError::IcsParse("No valid course events found".to_string()));
    }

    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.course.cmp(&b.course)));
    debug!(events = events.len(), "parsed timetable");
    Ok(events)
}

fn parse_vevent(
    vevent: &Component<'_>,
    zone: ReferenceZone,
    window_days: i64,
) -> ChillsResult<Vec<TimetableEvent>> {
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();

    let Some(class) = classify_summary(&summary) else {
        debug!(%summary, "not a course class");
        return Ok(Vec::new());
    };

    let (Some((start, tz)), Some((end, _))) = (
        instant_prop(vevent, "DTSTART", zone),
        instant_prop(vevent, "DTEND", zone),
    ) else {
        return Err(ChillsError::IcsParse(format!(
            "'{summary}' has no usable DTSTART/DTEND"
        )));
    };
    if start >= end {
        return Err(ChillsError::IcsParse(format!(
            "'{summary}' ends before it starts"
        )));
    }

    let location = vevent
        .find_prop("LOCATION")
        .map(|p| p.val.to_string())
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| NO_LOCATION.to_string());

    let event = |start, end| TimetableEvent {
        course: class.course.clone(),
        class_type: class.class_type,
        section: class.section.clone(),
        location: location.clone(),
        start,
        end,
    };

    let Some(rrule) = vevent.find_prop("RRULE").map(|p| p.val.to_string()) else {
        return Ok(vec![event(start, end)]);
    };

    let exclusions: Vec<Exclusion> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .flat_map(|p| parse_exdate_property(p, tz))
        .collect();

    let occurrences = recurrence::expand(
        &RecurringClass {
            start,
            end,
            tz,
            rrule: &rrule,
            exclusions: &exclusions,
        },
        window_days,
    )?;

    Ok(occurrences
        .into_iter()
        .map(|(start, end)| event(start, end))
        .collect())
}

/// Course, class type and section read from a summary like
/// `COMP1511 Tutorial H11A`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassSummary {
    course: String,
    class_type: ClassType,
    section: Option<String>,
}

fn classify_summary(summary: &str) -> Option<ClassSummary> {
    if summary.contains("Final") {
        return None;
    }

    let mut words = summary.split_whitespace();
    let course = words.next().filter(|w| is_course_code(w))?;

    let class_type = match words.next() {
        Some(w) if w.contains("Lecture") => ClassType::Lecture,
        Some(w) if w.contains("Tutorial") => ClassType::Tutorial,
        Some(w) if w.contains("Lab") => ClassType::Lab,
        _ => ClassType::Other,
    };

    let section = words
        .next()
        .filter(|w| is_section_code(w))
        .map(str::to_ascii_uppercase);

    Some(ClassSummary {
        course: course.to_ascii_uppercase(),
        class_type,
        section,
    })
}

/// Four letters then four digits, e.g. COMP1511.
fn is_course_code(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() == 8
        && bytes[..4].iter().all(u8::is_ascii_alphabetic)
        && bytes[4..].iter().all(u8::is_ascii_digit)
}

/// Letter, two digits, letter, e.g. H11A or W16B.
fn is_section_code(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() == 4
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..3].iter().all(u8::is_ascii_digit)
        && bytes[3].is_ascii_alphabetic()
}

/// Resolve a DTSTART/DTEND property to an instant and the zone it was
/// written in. All-day values are not classes and yield `None`.
fn instant_prop(
    vevent: &Component<'_>,
    name: &str,
    zone: ReferenceZone,
) -> Option<(DateTime<Utc>, Tz)> {
    let value = DatePerhapsTime::try_from(vevent.find_prop(name)?).ok()?;

    match value {
        DatePerhapsTime::Date(_) => None,
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Some((dt, Tz::UTC)),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            Some((zone.resolve_local(&naive)?, zone.tz()))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz = tzid.parse::<Tz>().unwrap_or_else(|_| {
                debug!(%tzid, "unknown TZID, using reference zone");
                zone.tz()
            });
            Some((resolve_in(tz, &date_time)?, tz))
        }
    }
}

/// Parse an EXDATE property into exclusions.
///
/// Handles:
/// - TZID parameter: `EXDATE;TZID=Australia/Sydney:20240311T140000`
/// - VALUE=DATE: `EXDATE;VALUE=DATE:20240311`
/// - UTC: `EXDATE:20240311T030000Z`
/// - Floating (read in the event's zone): `EXDATE:20240311T140000`
/// - Comma-separated values
fn parse_exdate_property(prop: &Property<'_>, event_tz: Tz) -> Vec<Exclusion> {
    let tz = prop
        .params
        .iter()
        .find(|p| p.key == "TZID")
        .and_then(|p| p.val.as_ref())
        .and_then(|v| v.as_ref().parse::<Tz>().ok())
        .unwrap_or(event_tz);

    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    prop.val
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            if is_date {
                NaiveDate::parse_from_str(s, "%Y%m%d")
                    .ok()
                    .map(Exclusion::Date)
            } else if let Some(utc) = s.strip_suffix('Z') {
                NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(|dt| Exclusion::Instant(dt.and_utc()))
            } else {
                NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .and_then(|dt| resolve_in(tz, &dt))
                    .map(Exclusion::Instant)
            }
        })
        .collect()
}
