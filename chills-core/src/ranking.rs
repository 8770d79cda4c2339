//! Caller-selected orderings over match records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChillsError, ChillsResult};
use crate::matcher::MatchRecord;

/// Orderings offered to the caller. All of them are total, so equal keys
/// never depend on input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Most shared courses first, then last name A-Z.
    #[default]
    CommonCourses,
    /// Most shared tutorials first, then as `CommonCourses`.
    SharedTutorials,
    /// "First Last" A-Z, case-insensitive.
    Name,
}

impl SortOrder {
    pub fn compare(&self, a: &MatchRecord, b: &MatchRecord) -> Ordering {
        match self {
            SortOrder::CommonCourses => by_common_courses(a, b),
            SortOrder::SharedTutorials => b
                .shared_tutorial_count()
                .cmp(&a.shared_tutorial_count())
                .then_with(|| by_common_courses(a, b)),
            SortOrder::Name => by_display_name(a, b),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ChillsError;

    fn from_str(s: &str) -> ChillsResult<Self> {
        match s {
            "common-courses" => Ok(SortOrder::CommonCourses),
            "shared-tutorials" => Ok(SortOrder::SharedTutorials),
            "name" => Ok(SortOrder::Name),
            other => Err(ChillsError::Config(format!(
                "Unknown sort order '{other}'. Expected common-courses, shared-tutorials or name"
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::CommonCourses => f.write_str("common-courses"),
            SortOrder::SharedTutorials => f.write_str("shared-tutorials"),
            SortOrder::Name => f.write_str("name"),
        }
    }
}

/// Sort records in place.
pub fn sort_matches(records: &mut [MatchRecord], order: SortOrder) {
    records.sort_by(|a, b| order.compare(a, b));
}

fn by_common_courses(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    b.shared_course_count()
        .cmp(&a.shared_course_count())
        .then_with(|| by_last_name(a, b))
}

fn by_last_name(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    let (a, b) = (&a.student, &b.student);
    a.last_name
        .to_lowercase()
        .cmp(&b.last_name.to_lowercase())
        .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

fn by_display_name(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    let (a, b) = (&a.student, &b.student);
    a.full_name()
        .to_lowercase()
        .cmp(&b.full_name().to_lowercase())
        .then_with(|| a.user_id.cmp(&b.user_id))
}
