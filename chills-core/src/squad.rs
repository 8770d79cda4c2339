//! Common-course intersection across a selection and the squad course it implies.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{ChillsError, ChillsResult};

/// Courses common to every given set. An empty input yields an empty set;
/// use [`CourseConstraint`] when "nothing selected" must stay distinguishable
/// from "nothing in common".
pub fn intersect<'a, I>(course_sets: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a BTreeSet<String>>,
{
    let mut sets = course_sets.into_iter();
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };

    let mut common = first.clone();
    for set in sets {
        common.retain(|course| set.contains(course));
        if common.is_empty() {
            break;
        }
    }
    common
}

/// What the current selection allows a squad to be about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "courses", rename_all = "kebab-case")]
pub enum CourseConstraint {
    /// Nobody selected yet: any course is still possible.
    Unconstrained,
    /// Courses shared by every selected candidate (possibly none).
    Courses(BTreeSet<String>),
}

impl CourseConstraint {
    pub fn from_selection<'a, I>(course_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeSet<String>>,
    {
        let mut sets = course_sets.into_iter().peekable();
        if sets.peek().is_none() {
            return CourseConstraint::Unconstrained;
        }
        CourseConstraint::Courses(intersect(sets))
    }

    pub fn allows(&self, course: &str) -> bool {
        match self {
            CourseConstraint::Unconstrained => true,
            CourseConstraint::Courses(courses) => courses.contains(course),
        }
    }
}

/// Why a squad cannot be formed from the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockReason {
    /// Two or more members selected with no course common to all of them.
    NoCommonCourse,
    /// The single selected member shares no course with the current user.
    NoSharedCourse,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::NoCommonCourse => f.write_str("selected members share no common course"),
            BlockReason::NoSharedCourse => {
                f.write_str("selected member shares no course with you")
            }
        }
    }
}

/// The squad course decision for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "kebab-case")]
pub enum SquadCourse {
    NoSelection,
    /// Exactly one common course.
    Implied(String),
    /// Several common courses; the caller must pick one.
    MustChoose(BTreeSet<String>),
    Blocked(BlockReason),
}

impl SquadCourse {
    pub fn decide(selected: usize, constraint: &CourseConstraint) -> Self {
        let courses = match constraint {
            CourseConstraint::Unconstrained => return SquadCourse::NoSelection,
            CourseConstraint::Courses(courses) => courses,
        };
        if selected == 0 {
            return SquadCourse::NoSelection;
        }

        let mut iter = courses.iter();
        match (iter.next(), iter.next()) {
            (None, _) if selected >= 2 => SquadCourse::Blocked(BlockReason::NoCommonCourse),
            (None, _) => SquadCourse::Blocked(BlockReason::NoSharedCourse),
            (Some(only), None) => SquadCourse::Implied(only.clone()),
            (Some(_), Some(_)) => SquadCourse::MustChoose(courses.clone()),
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, SquadCourse::Blocked(_))
    }

    /// Settle on a course, using `choice` where the caller has to pick.
    pub fn resolve(&self, choice: Option<&str>) -> ChillsResult<String> {
        match (self, choice) {
            (SquadCourse::NoSelection, _) => Err(ChillsError::InvalidSquad(
                "no members selected".to_string(),
            )),
            (SquadCourse::Blocked(reason), _) => Err(ChillsError::InvalidSquad(reason.to_string())),
            (SquadCourse::Implied(course), None) => Ok(course.clone()),
            (SquadCourse::Implied(course), Some(chosen)) if chosen == course => Ok(course.clone()),
            (SquadCourse::Implied(course), Some(chosen)) => Err(ChillsError::InvalidSquad(format!(
                "'{chosen}' is not shared by the selected members (only {course} is)"
            ))),
            (SquadCourse::MustChoose(courses), None) => Err(ChillsError::InvalidSquad(format!(
                "choose one of {}",
                join(courses)
            ))),
            (SquadCourse::MustChoose(courses), Some(chosen)) if courses.contains(chosen) => {
                Ok(chosen.to_string())
            }
            (SquadCourse::MustChoose(courses), Some(chosen)) => Err(ChillsError::InvalidSquad(
                format!("'{chosen}' is not one of {}", join(courses)),
            )),
        }
    }
}

fn join(courses: &BTreeSet<String>) -> String {
    courses.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// What the squad-creation collaborator needs to persist a new squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquadDraft {
    pub name: String,
    pub description: String,
    pub course: String,
    pub creator_id: String,
    pub member_ids: Vec<String>,
}

impl SquadDraft {
    pub fn new(
        name: &str,
        description: &str,
        course: String,
        creator_id: &str,
        member_ids: Vec<String>,
    ) -> ChillsResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChillsError::InvalidSquad("squad name is empty".to_string()));
        }
        if member_ids.is_empty() {
            return Err(ChillsError::InvalidSquad("no members selected".to_string()));
        }

        Ok(SquadDraft {
            name: name.to_string(),
            description: description.trim().to_string(),
            course,
            creator_id: creator_id.to_string(),
            member_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(courses: &[&str]) -> BTreeSet<String> {
        courses.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn intersect_of_nothing_is_empty() {
        let nothing: [BTreeSet<String>; 0] = [];
        assert!(intersect(&nothing).is_empty());
    }

    #[test]
    fn intersect_of_one_is_itself() {
        let a = set(&["COMP1511", "MATH1081"]);
        assert_eq!(intersect([&a]), a);
    }

    #[test]
    fn intersect_many() {
        let sets = [
            set(&["COMP1511", "MATH1081", "COMP1521"]),
            set(&["COMP1511", "COMP1521"]),
            set(&["COMP1521", "COMP1511", "ARTS1000"]),
        ];
        assert_eq!(intersect(&sets), set(&["COMP1511", "COMP1521"]));
    }

    #[test]
    fn adding_a_set_never_grows_the_intersection() {
        let sets = [
            set(&["COMP1511", "MATH1081", "COMP1521"]),
            set(&["COMP1511", "COMP1521", "PHYS1121"]),
            set(&["COMP1511"]),
            set(&[]),
            set(&["MATH1081"]),
        ];
        for n in 1..sets.len() {
            let before = intersect(&sets[..n]);
            let after = intersect(&sets[..=n]);
            assert!(after.is_subset(&before), "step {n}: {after:?} ⊄ {before:?}");
        }
    }

    #[test]
    fn no_selection_is_distinct_from_empty_intersection() {
        let nothing: [BTreeSet<String>; 0] = [];
        let none = CourseConstraint::from_selection(&nothing);
        let disjoint = CourseConstraint::from_selection(&[set(&["COMP1511"]), set(&["MATH1081"])]);

        assert_eq!(none, CourseConstraint::Unconstrained);
        assert_eq!(disjoint, CourseConstraint::Courses(BTreeSet::new()));
        assert_ne!(none, disjoint);
        assert!(none.allows("ANYTHING"));
        assert!(!disjoint.allows("COMP1511"));
    }

    #[test]
    fn decide_covers_every_state() {
        let decide = |sets: &[BTreeSet<String>]| {
            SquadCourse::decide(sets.len(), &CourseConstraint::from_selection(sets))
        };

        assert_eq!(decide(&[]), SquadCourse::NoSelection);
        assert_eq!(
            decide(&[set(&["COMP1511"]), set(&["COMP1511", "MATH1081"])]),
            SquadCourse::Implied("COMP1511".to_string())
        );
        assert_eq!(
            decide(&[set(&["COMP1511", "MATH1081"])]),
            SquadCourse::MustChoose(set(&["COMP1511", "MATH1081"]))
        );
        assert_eq!(
            decide(&[set(&["COMP1511"]), set(&["MATH1081"])]),
            SquadCourse::Blocked(BlockReason::NoCommonCourse)
        );
        assert_eq!(
            decide(&[set(&[])]),
            SquadCourse::Blocked(BlockReason::NoSharedCourse)
        );
    }

    #[test]
    fn blocked_reason_is_user_visible() {
        let decision = SquadCourse::Blocked(BlockReason::NoCommonCourse);
        assert!(decision.is_blocked());
        assert!(!SquadCourse::Implied("COMP1511".to_string()).is_blocked());
        let err = decision.resolve(Some("COMP1511")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot form squad: selected members share no common course"
        );
    }

    #[test]
    fn resolve_requires_choice_among_intersection() {
        let decision = SquadCourse::MustChoose(set(&["COMP1511", "MATH1081"]));
        assert!(decision.resolve(None).is_err());
        assert!(decision.resolve(Some("PHYS1121")).is_err());
        assert_eq!(decision.resolve(Some("MATH1081")).unwrap(), "MATH1081");

        let implied = SquadCourse::Implied("COMP1511".to_string());
        assert_eq!(implied.resolve(None).unwrap(), "COMP1511");
        assert_eq!(implied.resolve(Some("COMP1511")).unwrap(), "COMP1511");
        assert!(implied.resolve(Some("MATH1081")).is_err());
    }

    #[test]
    fn draft_validates_name_and_members() {
        let members = vec!["u2".to_string()];
        let course = || "COMP1511".to_string();
        assert!(SquadDraft::new(" ", "", course(), "u1", members.clone()).is_err());
        assert!(SquadDraft::new("Study", "", course(), "u1", Vec::new()).is_err());

        let draft = SquadDraft::new(" Lab buddies ", " weekly ", course(), "u1", members).unwrap();
        assert_eq!(draft.name, "Lab buddies");
        assert_eq!(draft.description, "weekly");
        assert_eq!(draft.member_ids, vec!["u2"]);
    }
}
