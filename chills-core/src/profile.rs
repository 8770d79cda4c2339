//! Per-user course profile derived from validated enrollments.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::enrollment::{Enrollment, TutorialKey};

/// A user's enrollments plus the sets the matcher compares.
///
/// The sets are derived from `enrollments` on construction and the fields
/// are private so they cannot drift apart afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCourseProfile {
    user_id: String,
    enrollments: Vec<Enrollment>,
    course_set: BTreeSet<String>,
    tutorial_set: BTreeSet<TutorialKey>,
    dates: BTreeSet<NaiveDate>,
    skipped: usize,
}

impl UserCourseProfile {
    pub fn new(user_id: impl Into<String>, enrollments: Vec<Enrollment>, skipped: usize) -> Self {
        let course_set = enrollments.iter().map(|e| e.course.clone()).collect();
        let tutorial_set = enrollments.iter().filter_map(Enrollment::tutorial_key).collect();
        let dates = enrollments.iter().map(|e| e.date).collect();

        UserCourseProfile {
            user_id: user_id.into(),
            enrollments,
            course_set,
            tutorial_set,
            dates,
            skipped,
        }
    }

    pub fn empty(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Vec::new(), 0)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn course_set(&self) -> &BTreeSet<String> {
        &self.course_set
    }

    pub fn tutorial_set(&self) -> &BTreeSet<TutorialKey> {
        &self.tutorial_set
    }

    /// Calendar dates (in the reference zone) this user has any class on.
    pub fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }

    /// Number of input rows dropped as malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.enrollments.is_empty()
    }
}
