use std::path::Path;

use anyhow::Result;
use chills_core::ics::{TimetableEvent, parse_timetable};
use chills_core::{ChillsConfig, EnrollmentRow, Roster};
use owo_colors::OwoColorize;

use crate::feed;
use crate::render::{pluralize, render_import};

pub async fn run(
    config: &ChillsConfig,
    source: &str,
    roster: Option<&Path>,
    json: bool,
) -> Result<()> {
    let content = feed::read_source(source).await?;
    let zone = config.zone()?;
    let events = parse_timetable(&content, zone, config.import_window_days)?;
    let rows: Vec<EnrollmentRow> = events.iter().map(TimetableEvent::to_row).collect();

    if let Some(path) = roster {
        let mut loaded = Roster::load(path)?;
        loaded.replace_my_enrolments(rows.clone());
        loaded.save(path)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let course_count = events
        .iter()
        .map(|e| e.course.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    println!(
        "{} {} {} in {} {}",
        "Imported".green(),
        events.len(),
        pluralize("class", events.len()),
        course_count,
        pluralize("course", course_count)
    );
    println!("{}", render_import(&events, zone));

    if let Some(path) = roster {
        println!();
        println!("{} {}", "Updated".green(), path.display());
    }

    Ok(())
}
