//! Timetable import from `.ics` feeds.

mod parse;

pub use parse::{TimetableEvent, parse_timetable};
