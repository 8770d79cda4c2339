//! Discovery session: the filter, sort and selection state around a match list.
//!
//! Selection and course filter are coupled the way the discover screen
//! expects: every selection change resets the course filter to the courses
//! all selected classmates share, and a course outside that set cannot be
//! toggled on while anyone is selected.

use crate::error::ChillsResult;
use crate::filter::MatchFilter;
use crate::matcher::MatchRecord;
use crate::ranking::SortOrder;
use crate::squad::{CourseConstraint, SquadCourse, SquadDraft};

#[derive(Debug, Clone)]
pub struct Discovery {
    matches: Vec<MatchRecord>,
    selection: Vec<String>,
    filter: MatchFilter,
    sort: SortOrder,
}

impl Discovery {
    pub fn new(matches: Vec<MatchRecord>, sort: SortOrder) -> Self {
        Discovery {
            matches,
            selection: Vec::new(),
            filter: MatchFilter::default(),
            sort,
        }
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn filter(&self) -> &MatchFilter {
        &self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.search = query.into();
    }

    pub fn set_same_tutorial(&mut self, on: bool) {
        self.filter.same_tutorial = on;
    }

    pub fn set_time_overlap(&mut self, on: bool) {
        self.filter.time_overlap = on;
    }

    pub fn set_same_day(&mut self, on: bool) {
        self.filter.same_day = on;
    }

    /// Selected user ids in the order they were picked.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_selected(&self, user_id: &str) -> bool {
        self.selection.iter().any(|id| id == user_id)
    }

    /// Select or deselect a classmate. Returns whether they are selected
    /// afterwards; ids not in the match list are ignored.
    pub fn toggle_user(&mut self, user_id: &str) -> bool {
        if let Some(pos) = self.selection.iter().position(|id| id == user_id) {
            self.selection.remove(pos);
            self.sync_course_filter();
            return false;
        }

        if !self.matches.iter().any(|m| m.user_id() == user_id) {
            return false;
        }

        self.selection.push(user_id.to_string());
        self.sync_course_filter();
        true
    }

    /// Drop one classmate from the selection if present.
    pub fn deselect_user(&mut self, user_id: &str) {
        let before = self.selection.len();
        self.selection.retain(|id| id != user_id);
        if self.selection.len() != before {
            self.sync_course_filter();
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.filter.courses.clear();
    }

    /// Toggle a course filter. Refused (returns `false`) while the selection
    /// does not allow that course.
    pub fn toggle_course_filter(&mut self, course: &str) -> bool {
        if !self.selection.is_empty() && !self.constraint().allows(course) {
            return false;
        }
        if !self.filter.courses.remove(course) {
            self.filter.courses.insert(course.to_string());
        }
        true
    }

    /// Reset courses, flags and search text. The selection is kept.
    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    pub fn selected(&self) -> impl Iterator<Item = &MatchRecord> {
        self.selection
            .iter()
            .filter_map(|id| self.matches.iter().find(|m| m.user_id() == id))
    }

    pub fn constraint(&self) -> CourseConstraint {
        CourseConstraint::from_selection(self.selected().map(|m| &m.shared_courses))
    }

    /// Squad course for the current selection. When several courses are
    /// common and the course filter has been narrowed to exactly one of
    /// them, that one is implied.
    pub fn squad_course(&self) -> SquadCourse {
        let decision = SquadCourse::decide(self.selection.len(), &self.constraint());

        if let SquadCourse::MustChoose(courses) = &decision {
            let mut filtered = self.filter.courses.iter();
            if let (Some(only), None) = (filtered.next(), filtered.next()) {
                if courses.contains(only) {
                    return SquadCourse::Implied(only.clone());
                }
            }
        }
        decision
    }

    /// Filtered and sorted view of the match list.
    pub fn visible(&self) -> Vec<&MatchRecord> {
        let mut visible = self.filter.apply(&self.matches);
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }

    /// Build the squad hand-off for the current selection.
    pub fn draft_squad(
        &self,
        name: &str,
        description: &str,
        creator_id: &str,
        course_choice: Option<&str>,
    ) -> ChillsResult<SquadDraft> {
        let course = self.squad_course().resolve(course_choice)?;
        SquadDraft::new(
            name,
            description,
            course,
            creator_id,
            self.selection.clone(),
        )
    }

    fn sync_course_filter(&mut self) {
        self.filter.courses = match self.constraint() {
            CourseConstraint::Unconstrained => Default::default(),
            CourseConstraint::Courses(courses) => courses,
        };
    }
}
