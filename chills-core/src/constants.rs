/// Days of recurring classes expanded from a timetable feed, counted from
/// each event's first occurrence. Covers a university term.
pub const DEFAULT_IMPORT_WINDOW_DAYS: i64 = 120;

/// Largest accepted import window, about ten years.
pub const MAX_IMPORT_WINDOW_DAYS: i64 = 3660;

/// Upper bound on occurrences generated for a single recurring event.
pub const MAX_OCCURRENCES: u16 = 2000;

/// Feeds larger than this are rejected before parsing.
pub const MAX_ICS_BYTES: usize = 2_000_000;

/// Room used for timetable events without a LOCATION.
pub const NO_LOCATION: &str = "No location";

/// Reference timezone when the config does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";
