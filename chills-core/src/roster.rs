//! Roster files: the current user and the candidate pool with their enrolments.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enrollment::EnrollmentRow;
use crate::error::{ChillsError, ChillsResult};
use crate::normalize::Normalizer;
use crate::profile::UserCourseProfile;
use crate::student::{Candidate, Student};

/// A student with their raw enrolment rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub student: Student,
    #[serde(default, alias = "enrollments")]
    pub enrolments: Vec<EnrollmentRow>,
}

impl RosterEntry {
    pub fn profile(&self, normalizer: &Normalizer) -> UserCourseProfile {
        normalizer.normalize(&self.student.user_id, &self.enrolments)
    }
}

/// JSON document holding the current user (`me`) and their classmates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub me: RosterEntry,
    #[serde(default)]
    pub classmates: Vec<RosterEntry>,
}

impl Roster {
    pub fn load(path: &Path) -> ChillsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChillsError::Roster(format!("Could not read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
            .map_err(|e| ChillsError::Roster(format!("{}: {e}", path.display())))
    }

    pub fn from_json(content: &str) -> ChillsResult<Self> {
        serde_json::from_str(content).map_err(|e| ChillsError::Serialization(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> ChillsResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ChillsError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the current user's enrolments, e.g. after a timetable import.
    pub fn replace_my_enrolments(&mut self, rows: Vec<EnrollmentRow>) {
        debug!(
            user_id = %self.me.student.user_id,
            before = self.me.enrolments.len(),
            after = rows.len(),
            "replacing enrolments"
        );
        self.me.enrolments = rows;
    }

    /// Normalize everyone. The current user is dropped from the candidate
    /// pool if they appear in it.
    pub fn profiles(&self, normalizer: &Normalizer) -> (UserCourseProfile, Vec<Candidate>) {
        let me = self.me.profile(normalizer);

        let candidates = self
            .classmates
            .iter()
            .filter(|entry| {
                let is_me = entry.student.user_id == self.me.student.user_id;
                if is_me {
                    debug!(user_id = %entry.student.user_id, "dropping current user from pool");
                }
                !is_me
            })
            .map(|entry| Candidate::new(entry.student.clone(), entry.profile(normalizer)))
            .collect();

        (me, candidates)
    }
}
