use std::collections::BTreeSet;

use anyhow::Result;
use owo_colors::OwoColorize;

use super::Session;
use crate::render::{Render, pluralize};

/// Narrowing requested on the command line.
pub struct Filters {
    pub search: Option<String>,
    pub courses: Vec<String>,
    pub same_tutorial: bool,
    pub time_overlap: bool,
    pub same_day: bool,
}

pub fn run(session: Session, filters: Filters, json: bool) -> Result<()> {
    let mut discovery = session.discovery;

    if let Some(query) = filters.search {
        discovery.set_search(query);
    }
    let courses: BTreeSet<String> = filters
        .courses
        .iter()
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect();
    for course in &courses {
        discovery.toggle_course_filter(course);
    }
    discovery.set_same_tutorial(filters.same_tutorial);
    discovery.set_time_overlap(filters.time_overlap);
    discovery.set_same_day(filters.same_day);

    let visible = discovery.visible();

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    let total = discovery.matches().len();
    let active = discovery.filter().active_count();

    if visible.is_empty() {
        if active > 0 {
            println!("{}", "No classmates match these filters".dimmed());
        } else {
            println!("{}", "No classmates in the roster".dimmed());
        }
        return Ok(());
    }

    let count = visible.len();
    let mut header = format!("{count} {}", pluralize("classmate", count));
    if active > 0 {
        header.push_str(&format!(" of {total}"));
    }
    let sorted_by = format!("sorted by {}", discovery.sort());
    println!("{}  {}", header.bold(), sorted_by.dimmed());
    println!();

    for record in visible {
        println!("{}", record.render());
    }

    Ok(())
}
