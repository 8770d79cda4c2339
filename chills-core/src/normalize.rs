//! Turn raw enrollment rows into a [`UserCourseProfile`].

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::enrollment::{ClassType, Enrollment, EnrollmentRow};
use crate::profile::UserCourseProfile;
use crate::time::ReferenceZone;

/// Formats with an explicit offset that are not strict RFC 3339,
/// e.g. Postgres' `2024-03-04 14:00:00+00`.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Wall-clock formats, read in the reference zone.
const FLOATING_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingCourse,
    MissingTime,
    BadTimestamp(String),
    EmptyInterval,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCourse => f.write_str("missing course"),
            SkipReason::MissingTime => f.write_str("missing start or end time"),
            SkipReason::BadTimestamp(raw) => write!(f, "unparsable timestamp '{raw}'"),
            SkipReason::EmptyInterval => f.write_str("start is not before end"),
        }
    }
}

/// Validates enrollment rows and derives their comparison keys once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    zone: ReferenceZone,
}

impl Normalizer {
    pub fn new(zone: ReferenceZone) -> Self {
        Normalizer { zone }
    }

    /// Build a profile from any number of rows. Malformed rows are skipped
    /// and counted, never fatal.
    pub fn normalize(&self, user_id: &str, rows: &[EnrollmentRow]) -> UserCourseProfile {
        let mut enrollments = Vec::with_capacity(rows.len());
        let mut skipped = 0;

        for (index, row) in rows.iter().enumerate() {
            match self.enrollment(row) {
                Ok(enrollment) => enrollments.push(enrollment),
                Err(reason) => {
                    debug!(user_id, index, %reason, "skipping enrollment row");
                    skipped += 1;
                }
            }
        }

        debug!(
            user_id,
            accepted = enrollments.len(),
            skipped,
            "normalized enrollments"
        );

        UserCourseProfile::new(user_id, enrollments, skipped)
    }

    /// Validate a single row.
    pub fn enrollment(&self, row: &EnrollmentRow) -> Result<Enrollment, SkipReason> {
        let course = row
            .course
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(SkipReason::MissingCourse)?
            .to_string();

        let (Some(start_raw), Some(end_raw)) = (row.start_time.as_deref(), row.end_time.as_deref())
        else {
            return Err(SkipReason::MissingTime);
        };
        let start = self.parse_instant(start_raw)?;
        let end = self.parse_instant(end_raw)?;
        if start >= end {
            return Err(SkipReason::EmptyInterval);
        }

        let class_type = row
            .class_type
            .as_deref()
            .map(ClassType::from_tag)
            .unwrap_or(ClassType::Other);

        let section = row
            .section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Enrollment {
            course,
            class_type,
            section,
            slot: self.zone.slot(&start, &end),
            date: self.zone.date(&start),
            start,
            end,
            room_id: row.room_id.clone(),
        })
    }

    /// Parse an ISO-8601 timestamp. Values without an offset are taken as
    /// wall-clock time in the reference zone.
    pub fn parse_instant(&self, raw: &str) -> Result<DateTime<Utc>, SkipReason> {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }

        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Ok(dt.with_timezone(&Utc));
            }
        }

        FLOATING_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .and_then(|naive| self.zone.resolve_local(&naive))
            .ok_or_else(|| SkipReason::BadTimestamp(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Weekday};

    fn row(
        course: &str,
        class: &str,
        section: Option<&str>,
        start: &str,
        end: &str,
    ) -> EnrollmentRow {
        EnrollmentRow {
            course: Some(course.to_string()),
            class_type: Some(class.to_string()),
            section: section.map(str::to_string),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            room_id: Some("K-E19-G05".to_string()),
        }
    }

    fn lecture(course: &str, start: &str, end: &str) -> EnrollmentRow {
        row(course, "lec", None, start, end)
    }

    fn tutorial(start: &str, end: &str) -> EnrollmentRow {
        row("COMP1511", "tut", Some("H11A"), start, end)
    }

    #[test]
    fn builds_course_and_tutorial_sets() {
        let rows = vec![
            lecture("COMP1511", "2024-03-04T10:00:00Z", "2024-03-04T12:00:00Z"),
            tutorial("2024-03-04T14:00:00Z", "2024-03-04T16:00:00Z"),
            row(
                "MATH1081",
                "tut",
                None,
                "2024-03-05T09:00:00Z",
                "2024-03-05T10:00:00Z",
            ),
        ];
        let profile = Normalizer::default().normalize("u1", &rows);

        assert_eq!(profile.enrollments().len(), 3);
        assert_eq!(
            profile.course_set().iter().collect::<Vec<_>>(),
            vec!["COMP1511", "MATH1081"]
        );
        // the MATH1081 tutorial has no section so it cannot be compared
        assert_eq!(profile.tutorial_set().len(), 1);
        assert_eq!(profile.dates().len(), 2);
        assert_eq!(profile.skipped(), 0);
    }

    #[test]
    fn duplicates_count_once_in_sets() {
        let r = tutorial("2024-03-04T14:00:00Z", "2024-03-04T16:00:00Z");
        let profile = Normalizer::default().normalize("u1", &[r.clone(), r]);

        assert_eq!(profile.enrollments().len(), 2);
        assert_eq!(profile.course_set().len(), 1);
        assert_eq!(profile.tutorial_set().len(), 1);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let mut no_course = lecture("COMP1511", "2024-03-04T10:00:00Z", "2024-03-04T12:00:00Z");
        no_course.course = None;
        let blank_course = lecture("  ", "2024-03-04T10:00:00Z", "2024-03-04T12:00:00Z");
        let bad_time = lecture("COMP1511", "next tuesday", "2024-03-04T12:00:00Z");
        let backwards = lecture("COMP1511", "2024-03-04T12:00:00Z", "2024-03-04T10:00:00Z");
        let good = lecture("MATH1081", "2024-03-04T10:00:00Z", "2024-03-04T12:00:00Z");

        let rows = [no_course, blank_course, bad_time, backwards, good];
        let profile = Normalizer::default().normalize("u1", &rows);

        assert_eq!(profile.skipped(), 4);
        assert_eq!(
            profile.course_set().iter().collect::<Vec<_>>(),
            vec!["MATH1081"]
        );
    }

    #[test]
    fn skip_reasons() {
        let n = Normalizer::default();
        assert_eq!(
            n.enrollment(&EnrollmentRow::default()),
            Err(SkipReason::MissingCourse)
        );
        let mut missing_end = lecture("COMP1511", "2024-03-04T10:00:00Z", "x");
        missing_end.end_time = None;
        assert_eq!(n.enrollment(&missing_end), Err(SkipReason::MissingTime));
        let same = lecture("COMP1511", "2024-03-04T10:00:00Z", "2024-03-04T10:00:00Z");
        assert_eq!(n.enrollment(&same), Err(SkipReason::EmptyInterval));
    }

    #[test]
    fn empty_rows_give_empty_profile() {
        let profile = Normalizer::default().normalize("u1", &[]);
        assert!(profile.is_empty());
        assert!(profile.course_set().is_empty());
        assert!(profile.tutorial_set().is_empty());
        assert!(profile.dates().is_empty());
    }

    #[test]
    fn derives_slot_and_date_once() {
        let r = tutorial("2024-03-04T14:00:00Z", "2024-03-04T16:00:00Z");
        let enrollment = Normalizer::default().enrollment(&r).unwrap();

        assert_eq!(enrollment.slot.weekday, Weekday::Mon);
        assert_eq!(enrollment.slot.start_minute, 14 * 60);
        assert_eq!(enrollment.slot.end_minute, 16 * 60);
        assert_eq!(
            enrollment.date,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
        assert_eq!(enrollment.class_type, ClassType::Tutorial);
    }

    #[test]
    fn parses_postgres_and_floating_timestamps() {
        let n = Normalizer::default();
        let expected = Utc.with_ymd_and_hms(2024, 3, 4, 14, 0, 0).unwrap();

        assert_eq!(n.parse_instant("2024-03-04T14:00:00+00:00"), Ok(expected));
        assert_eq!(n.parse_instant("2024-03-04 14:00:00+00"), Ok(expected));
        assert_eq!(n.parse_instant("2024-03-05T01:00:00+11:00"), Ok(expected));
        assert_eq!(n.parse_instant("2024-03-04T14:00:00"), Ok(expected));
        assert_eq!(n.parse_instant("2024-03-04T14:00:00.000"), Ok(expected));
    }

    #[test]
    fn floating_timestamps_use_reference_zone() {
        let n = Normalizer::new("Australia/Sydney".parse().unwrap());
        let expected = Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap();
        assert_eq!(n.parse_instant("2024-03-05T10:00:00"), Ok(expected));
    }
}
