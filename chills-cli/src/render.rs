//! Terminal rendering for chills-core types.
//!
//! Extension traits that add colored output to the engine's types using
//! owo_colors.

use std::collections::BTreeMap;

use chills_core::ics::TimetableEvent;
use chills_core::{BlockReason, MatchRecord, ReferenceZone, SquadCourse, SquadDraft};
use owo_colors::OwoColorize;

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for MatchRecord {
    fn render(&self) -> String {
        let student = &self.student;
        let mut header = student.full_name().bold().to_string();
        if !student.zid.is_empty() {
            header.push_str(&format!("  {}", student.zid.dimmed()));
        }
        if let Some(degree) = &student.degree {
            header.push_str(&format!("  {}", degree.dimmed()));
        }

        let courses = if self.shared_courses.is_empty() {
            "no shared courses".dimmed().to_string()
        } else {
            self.shared_courses
                .iter()
                .map(|c| c.cyan().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut badges = Vec::new();
        for tutorial in &self.shared_tutorials {
            badges.push(format!("tut {tutorial}").green().to_string());
        }
        if self.time_overlap {
            badges.push("overlap".yellow().to_string());
        }
        if self.same_day {
            badges.push("same day".blue().to_string());
        }

        let mut line = format!("{header}\n   {courses}");
        if !badges.is_empty() {
            line.push_str(&format!("  {}", badges.join(" ")));
        }
        line
    }
}

impl Render for BlockReason {
    fn render(&self) -> String {
        self.to_string().red().to_string()
    }
}

impl Render for SquadCourse {
    fn render(&self) -> String {
        match self {
            SquadCourse::NoSelection => "No classmates selected".dimmed().to_string(),
            SquadCourse::Implied(course) => {
                format!("{} {}", "Squad course:".green(), course.bold())
            }
            SquadCourse::MustChoose(courses) => format!(
                "{} {} {}",
                "Choose a course:".yellow(),
                courses.iter().cloned().collect::<Vec<_>>().join(", "),
                "(pass --course)".dimmed()
            ),
            SquadCourse::Blocked(reason) => {
                format!("{} {}", "Can't form a squad:".red(), reason.render())
            }
        }
    }
}

impl Render for SquadDraft {
    fn render(&self) -> String {
        let course = format!("({})", self.course);
        let mut lines = vec![format!("{} {}", self.name.bold(), course.cyan())];
        if !self.description.is_empty() {
            lines.push(format!("   {}", self.description.dimmed()));
        }
        lines.push(format!(
            "   {} {}: {}",
            self.member_ids.len(),
            pluralize("member", self.member_ids.len()),
            self.member_ids.join(", ")
        ));
        lines.join("\n")
    }
}

/// One imported class in the reference zone, e.g.
/// `COMP1511 tut H11A  Mon 04 Mar 14:00-16:00  Quad 1042`.
pub fn render_event(event: &TimetableEvent, zone: ReferenceZone) -> String {
    let start = zone.localize(&event.start);
    let end = zone.localize(&event.end);

    let mut label = format!("{} {}", event.course, event.class_type.tag());
    if let Some(section) = &event.section {
        label.push_str(&format!(" {section}"));
    }

    format!(
        "{}  {}-{}  {}",
        label.bold(),
        start.format("%a %d %b %H:%M"),
        end.format("%H:%M"),
        event.location.dimmed()
    )
}

/// Threshold for compact view (show counts per course instead of each class)
const COMPACT_THRESHOLD: usize = 8;

/// Render imported classes, falling back to per-course counts for long lists.
pub fn render_import(events: &[TimetableEvent], zone: ReferenceZone) -> String {
    if events.len() <= COMPACT_THRESHOLD {
        return events
            .iter()
            .map(|e| format!("   {}", render_event(e, zone)))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut per_course: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        *per_course.entry(event.course.as_str()).or_default() += 1;
    }

    per_course
        .into_iter()
        .map(|(course, count)| {
            format!(
                "   {} {}",
                course.bold(),
                format!("({count} {})", pluralize("class", count)).dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> &str {
    if count == 1 {
        return word;
    }
    match word {
        "class" => "classes",
        "classmate" => "classmates",
        "course" => "courses",
        "member" => "members",
        _ => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralize_known_words() {
        assert_eq!(pluralize("class", 1), "class");
        assert_eq!(pluralize("class", 2), "classes");
        assert_eq!(pluralize("classmate", 0), "classmates");
        assert_eq!(pluralize("widget", 3), "widget");
    }
}
