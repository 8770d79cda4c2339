//! Enrollment rows as delivered by the data layer, and their validated form.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time::WeeklySlot;

/// Kind of class occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Lecture,
    Tutorial,
    Lab,
    Other,
}

impl ClassType {
    /// Parse a class tag. Accepts the short database tags (`lec`, `tut`, `lab`)
    /// as well as the long names; anything else is `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "lec" | "lecture" => ClassType::Lecture,
            "tut" | "tutorial" => ClassType::Tutorial,
            "lab" => ClassType::Lab,
            _ => ClassType::Other,
        }
    }

    /// Short tag as stored in enrollment rows.
    pub fn tag(&self) -> &'static str {
        match self {
            ClassType::Lecture => "lec",
            ClassType::Tutorial => "tut",
            ClassType::Lab => "lab",
            ClassType::Other => "other",
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassType::Lecture => "Lecture",
            ClassType::Tutorial => "Tutorial",
            ClassType::Lab => "Lab",
            ClassType::Other => "Other",
        };
        f.write_str(name)
    }
}

/// One enrollment row exactly as the data layer hands it over.
///
/// Every field is optional because upstream rows are not consistently
/// populated. Nothing downstream reads these directly: rows go through the
/// [`Normalizer`](crate::normalize::Normalizer) first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRow {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default, rename = "class")]
    pub class_type: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    /// ISO-8601 instant
    #[serde(default)]
    pub start_time: Option<String>,
    /// ISO-8601 instant
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

/// A validated enrollment with its weekly slot and date already derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub course: String,
    pub class_type: ClassType,
    pub section: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub room_id: Option<String>,
    pub slot: WeeklySlot,
    pub date: NaiveDate,
}

impl Enrollment {
    /// The `(course, section)` key if this is a tutorial with a known section.
    pub fn tutorial_key(&self) -> Option<TutorialKey> {
        if self.class_type != ClassType::Tutorial {
            return None;
        }
        let section = self.section.as_ref()?;
        Some(TutorialKey {
            course: self.course.clone(),
            section: section.clone(),
        })
    }
}

/// Identifies one tutorial stream. Equal only if both fields match exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TutorialKey {
    pub course: String,
    pub section: String,
}

impl fmt::Display for TutorialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.course, self.section)
    }
}
