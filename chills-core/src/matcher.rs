//! Pairwise comparison of the current user against a candidate pool.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enrollment::TutorialKey;
use crate::error::{ChillsError, ChillsResult};
use crate::profile::UserCourseProfile;
use crate::student::{Candidate, Student};

/// Which enrollment pairs are checked for a time overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapScope {
    /// Only classes of the same course.
    #[default]
    SameCourse,
    /// Any two classes, whatever the course.
    AnyCourse,
}

impl FromStr for OverlapScope {
    type Err = ChillsError;

    fn from_str(s: &str) -> ChillsResult<Self> {
        match s {
            "same-course" => Ok(OverlapScope::SameCourse),
            "any-course" => Ok(OverlapScope::AnyCourse),
            other => Err(ChillsError::Config(format!(
                "Unknown overlap scope '{other}'. Expected same-course or any-course"
            ))),
        }
    }
}

impl fmt::Display for OverlapScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapScope::SameCourse => f.write_str("same-course"),
            OverlapScope::AnyCourse => f.write_str("any-course"),
        }
    }
}

/// Relationship facts between the current user and one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub student: Student,
    pub shared_courses: BTreeSet<String>,
    pub shared_tutorials: BTreeSet<TutorialKey>,
    pub same_tutorial: bool,
    pub time_overlap: bool,
    pub same_day: bool,
}

impl MatchRecord {
    pub fn user_id(&self) -> &str {
        &self.student.user_id
    }

    pub fn shared_course_count(&self) -> usize {
        self.shared_courses.len()
    }

    pub fn shared_tutorial_count(&self) -> usize {
        self.shared_tutorials.len()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    scope: OverlapScope,
}

impl Matcher {
    pub fn new(scope: OverlapScope) -> Self {
        Matcher { scope }
    }

    /// One record per candidate, in input order. Candidates sharing nothing
    /// are kept; narrowing the list is up to the caller.
    pub fn match_all(&self, me: &UserCourseProfile, candidates: &[Candidate]) -> Vec<MatchRecord> {
        let records: Vec<MatchRecord> = candidates.iter().map(|c| self.compare(me, c)).collect();

        debug!(
            user_id = me.user_id(),
            candidates = records.len(),
            sharing = records.iter().filter(|r| !r.shared_courses.is_empty()).count(),
            scope = %self.scope,
            "matched candidates"
        );

        records
    }

    pub fn compare(&self, me: &UserCourseProfile, candidate: &Candidate) -> MatchRecord {
        let them = &candidate.profile;

        let shared_courses = intersection(me.course_set(), them.course_set());
        let shared_tutorials = intersection(me.tutorial_set(), them.tutorial_set());

        MatchRecord {
            student: candidate.student.clone(),
            same_tutorial: !shared_tutorials.is_empty(),
            time_overlap: self.has_time_overlap(me, them),
            same_day: !me.dates().is_disjoint(them.dates()),
            shared_courses,
            shared_tutorials,
        }
    }

    fn has_time_overlap(&self, me: &UserCourseProfile, them: &UserCourseProfile) -> bool {
        me.enrollments().iter().any(|mine| {
            them.enrollments().iter().any(|theirs| {
                let comparable = match self.scope {
                    OverlapScope::SameCourse => mine.course == theirs.course,
                    OverlapScope::AnyCourse => true,
                };
                comparable && mine.slot.overlaps(&theirs.slot)
            })
        })
    }
}

/// Match with the default (same-course) overlap scope.
pub fn match_candidates(me: &UserCourseProfile, candidates: &[Candidate]) -> Vec<MatchRecord> {
    Matcher::default().match_all(me, candidates)
}

fn intersection<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.intersection(b).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrollment::EnrollmentRow;
    use crate::normalize::Normalizer;

    /// A class on `day` of March 2024 from `from` to `to` o'clock UTC.
    fn row(
        course: &str,
        class: &str,
        section: Option<&str>,
        day: u32,
        from: u32,
        to: u32,
    ) -> EnrollmentRow {
        EnrollmentRow {
            course: Some(course.to_string()),
            class_type: Some(class.to_string()),
            section: section.map(str::to_string),
            start_time: Some(format!("2024-03-{day:02}T{from:02}:00:00Z")),
            end_time: Some(format!("2024-03-{day:02}T{to:02}:00:00Z")),
            room_id: None,
        }
    }

    fn profile(user_id: &str, rows: &[EnrollmentRow]) -> UserCourseProfile {
        Normalizer::default().normalize(user_id, rows)
    }

    fn candidate(user_id: &str, rows: &[EnrollmentRow]) -> Candidate {
        Candidate::new(
            Student {
                user_id: user_id.to_string(),
                ..Student::default()
            },
            profile(user_id, rows),
        )
    }

    // Monday 2024-03-04, Tuesday 2024-03-05
    fn me_mon_tutorial() -> UserCourseProfile {
        profile("me", &[row("COMP1511", "tut", Some("H11A"), 4, 14, 16)])
    }

    #[test]
    fn overlapping_tutorial_same_section() {
        let a = candidate("a", &[row("COMP1511", "tut", Some("H11A"), 4, 15, 17)]);
        let record = Matcher::default().compare(&me_mon_tutorial(), &a);

        assert!(record.time_overlap);
        assert!(record.same_tutorial);
        assert!(record.same_day);
        assert_eq!(record.shared_course_count(), 1);
    }

    #[test]
    fn overlapping_tutorial_different_section() {
        let a = candidate("a", &[row("COMP1511", "tut", Some("H11B"), 4, 15, 17)]);
        let record = Matcher::default().compare(&me_mon_tutorial(), &a);

        assert!(record.time_overlap);
        assert!(!record.same_tutorial);
        assert!(record.shared_tutorials.is_empty());
    }

    #[test]
    fn same_clock_time_different_weekday() {
        let b = candidate("b", &[row("COMP1511", "tut", Some("H11A"), 5, 14, 16)]);
        let record = Matcher::default().compare(&me_mon_tutorial(), &b);

        assert!(!record.time_overlap);
        assert!(!record.same_day);
        // tutorial identity ignores the time slot
        assert!(record.same_tutorial);
    }

    #[test]
    fn same_day_different_course_is_not_overlap() {
        let c = candidate("c", &[row("MATH1081", "lec", None, 4, 9, 11)]);
        let record = Matcher::default().compare(&me_mon_tutorial(), &c);

        assert!(record.same_day);
        assert!(!record.time_overlap);
        assert!(record.shared_courses.is_empty());
    }

    #[test]
    fn overlap_only_within_same_course_by_default() {
        let c = candidate("c", &[row("MATH1081", "lec", None, 4, 15, 16)]);

        let strict = Matcher::default().compare(&me_mon_tutorial(), &c);
        let relaxed = Matcher::new(OverlapScope::AnyCourse).compare(&me_mon_tutorial(), &c);

        assert!(!strict.time_overlap);
        assert!(relaxed.time_overlap);
    }

    #[test]
    fn shared_courses_equal_independent_intersection() {
        let me = profile(
            "me",
            &[
                row("COMP1511", "lec", None, 4, 10, 12),
                row("MATH1081", "lec", None, 5, 10, 12),
                row("COMP1521", "lec", None, 6, 10, 12),
            ],
        );
        let pool = vec![
            candidate(
                "x",
                &[
                    row("COMP1521", "lec", None, 6, 10, 12),
                    row("ARTS1000", "lec", None, 6, 13, 14),
                ],
            ),
            candidate("y", &[]),
        ];

        for (c, record) in pool.iter().zip(match_candidates(&me, &pool)) {
            let expected: BTreeSet<String> = me
                .course_set()
                .iter()
                .filter(|course| c.profile.course_set().contains(*course))
                .cloned()
                .collect();
            assert_eq!(record.shared_courses, expected);
            assert_eq!(record.user_id(), c.student.user_id);
        }
    }

    #[test]
    fn matching_is_idempotent() {
        let me = me_mon_tutorial();
        let pool = vec![
            candidate("a", &[row("COMP1511", "tut", Some("H11A"), 4, 15, 17)]),
            candidate("b", &[]),
        ];
        assert_eq!(match_candidates(&me, &pool), match_candidates(&me, &pool));
    }

    #[test]
    fn empty_pool_gives_no_records() {
        assert!(match_candidates(&me_mon_tutorial(), &[]).is_empty());
    }

    #[test]
    fn empty_self_profile_gives_false_flags() {
        let me = UserCourseProfile::empty("me");
        let pool = vec![candidate("a", &[row("COMP1511", "tut", Some("H11A"), 4, 15, 17)])];
        let records = match_candidates(&me, &pool);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(record.shared_courses.is_empty());
        assert!(!record.same_tutorial);
        assert!(!record.time_overlap);
        assert!(!record.same_day);
    }

    #[test]
    fn empty_candidate_profile_gives_false_flags() {
        let records = match_candidates(&me_mon_tutorial(), &[candidate("z", &[])]);
        let record = &records[0];
        assert!(record.shared_courses.is_empty());
        assert!(!record.same_tutorial);
        assert!(!record.time_overlap);
        assert!(!record.same_day);
    }

    #[test]
    fn scope_parses_from_kebab_case() {
        assert_eq!(
            "any-course".parse::<OverlapScope>().unwrap(),
            OverlapScope::AnyCourse
        );
        assert!("sometimes".parse::<OverlapScope>().is_err());
    }
}
