//! Classmate matching and squad compatibility for Chills.
//!
//! This crate holds the engine behind the discover screen:
//! - `normalize` turns raw enrolment rows into per-user course profiles
//! - `matcher` compares the current user against a candidate pool
//! - `filter`, `ranking` and `discovery` shape the match list for display
//! - `squad` works out which course a selected group can form a squad in
//!
//! Around it sit the roster and `.ics` loaders and the user config.

pub mod config;
pub mod constants;
pub mod discovery;
pub mod enrollment;
pub mod error;
pub mod filter;
pub mod ics;
pub mod matcher;
pub mod normalize;
pub mod profile;
pub mod ranking;
pub mod roster;
pub mod squad;
pub mod student;
pub mod time;

mod recurrence;

pub use config::ChillsConfig;
pub use discovery::Discovery;
pub use enrollment::{ClassType, Enrollment, EnrollmentRow, TutorialKey};
pub use error::{ChillsError, ChillsResult};
pub use filter::MatchFilter;
pub use matcher::{MatchRecord, Matcher, OverlapScope, match_candidates};
pub use normalize::{Normalizer, SkipReason};
pub use profile::UserCourseProfile;
pub use ranking::{SortOrder, sort_matches};
pub use roster::{Roster, RosterEntry};
pub use squad::{BlockReason, CourseConstraint, SquadCourse, SquadDraft, intersect};
pub use student::{Candidate, Student};
pub use time::{ReferenceZone, WeeklySlot};
