//! Display fields for a user and the candidate wrapper handed to the matcher.

use serde::{Deserialize, Serialize};

use crate::profile::UserCourseProfile;

/// Profile fields shown next to a match. Passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub user_id: String,
    #[serde(default)]
    pub zid: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl Student {
    /// "First Last", trimmed when either part is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Someone the current user may be matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub student: Student,
    pub profile: UserCourseProfile,
}

impl Candidate {
    pub fn new(student: Student, profile: UserCourseProfile) -> Self {
        Candidate { student, profile }
    }
}
