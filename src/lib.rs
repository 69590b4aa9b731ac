// Roster Attendance - Core Library
// Exposes all modules for use in CLI, TUI, API server, and tests

pub mod model;
pub mod store;
pub mod roster;
pub mod views;
pub mod export;
pub mod config;
pub mod logging;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use model::{
    AttendanceMap, AttendanceStatus, Mark, Player, PlayerAttendance, RosterState,
    parse_date, DATE_FORMAT,
};
pub use store::{
    KeyValueStore, MemoryStore, SqliteStore, StoreError,
    ATTENDANCE_KEY, DATES_KEY, PLAYERS_KEY,
};
pub use roster::{Roster, RosterError, RosterResult, ValidationError};
pub use views::{
    Counts, PlayerSummary,
    per_player_counts, per_date_counts, overall_counts, player_summaries,
    sorted_players, collate, date_label,
};
pub use export::{
    ExportError, export_to_delimited_text, export_file_name, write_export, MIME_TYPE,
};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
