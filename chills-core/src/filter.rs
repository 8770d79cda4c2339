//! Composable predicates over match records.

use std::collections::BTreeSet;

use crate::matcher::MatchRecord;

/// Active filters. Every active predicate must hold; the default filter
/// passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Case-insensitive substring over first name, last name, zid and degree.
    pub search: String,
    /// Keep records sharing at least one of these courses.
    pub courses: BTreeSet<String>,
    pub same_tutorial: bool,
    pub time_overlap: bool,
    pub same_day: bool,
}

impl MatchFilter {
    pub fn matches(&self, record: &MatchRecord) -> bool {
        self.matches_search(record)
            && (self.courses.is_empty() || !self.courses.is_disjoint(&record.shared_courses))
            && (!self.same_tutorial || record.same_tutorial)
            && (!self.time_overlap || record.time_overlap)
            && (!self.same_day || record.same_day)
    }

    pub fn apply<'a>(&self, records: &'a [MatchRecord]) -> Vec<&'a MatchRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Number of active course and flag filters. Search text is not counted.
    pub fn active_count(&self) -> usize {
        self.courses.len()
            + usize::from(self.same_tutorial)
            + usize::from(self.time_overlap)
            + usize::from(self.same_day)
    }

    pub fn clear(&mut self) {
        *self = MatchFilter::default();
    }

    fn matches_search(&self, record: &MatchRecord) -> bool {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let student = &record.student;
        [
            student.first_name.as_str(),
            student.last_name.as_str(),
            student.zid.as_str(),
            student.degree.as_deref().unwrap_or(""),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}
