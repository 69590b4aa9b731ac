// Roster Model - Players, session dates and the sparse attendance map
//
// "Player name is a VALUE, player id is IDENTITY"
//
// Storage keeps only recorded marks (present/absent). A (player, date) pair
// with no entry is "not recorded", which is a third state in its own right.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calendar-date format used for every stored date (ISO 8601, no time).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// PLAYER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Display name as entered (trimmed)
    pub name: String,
}

impl Player {
    /// Create new player with a fresh UUID
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison used for the uniqueness rule
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

// ============================================================================
// MARKS & STATUS
// ============================================================================

/// A recorded mark. Serialized as a bool (`true` = present) so stored state
/// keeps the `{ "<id>": { "<date>": true|false } }` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Mark {
    Present,
    Absent,
}

impl From<bool> for Mark {
    fn from(present: bool) -> Self {
        if present {
            Mark::Present
        } else {
            Mark::Absent
        }
    }
}

impl From<Mark> for bool {
    fn from(mark: Mark) -> Self {
        mark == Mark::Present
    }
}

/// Cell value as seen by callers: the stored mark, or `Unrecorded` when the
/// map has no entry for the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Unrecorded,
}

impl AttendanceStatus {
    /// Literal token used in the spreadsheet export
    pub fn export_token(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Presente",
            AttendanceStatus::Absent => "Ausente",
            AttendanceStatus::Unrecorded => "N/A",
        }
    }

    /// Status after one toggle. Unrecorded and absent both go to present.
    pub fn toggled(&self) -> Mark {
        match self {
            AttendanceStatus::Present => Mark::Absent,
            AttendanceStatus::Absent | AttendanceStatus::Unrecorded => Mark::Present,
        }
    }
}

impl From<Option<Mark>> for AttendanceStatus {
    fn from(mark: Option<Mark>) -> Self {
        match mark {
            Some(Mark::Present) => AttendanceStatus::Present,
            Some(Mark::Absent) => AttendanceStatus::Absent,
            None => AttendanceStatus::Unrecorded,
        }
    }
}

/// date -> mark for one player
pub type PlayerAttendance = BTreeMap<String, Mark>;

/// player id -> (date -> mark)
pub type AttendanceMap = BTreeMap<String, PlayerAttendance>;

// ============================================================================
// DATES
// ============================================================================

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// Only the zero-padded form is accepted, so each day has exactly one
/// spelling (`2024-1-5` and `+2024-01-05` are rejected).
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let day = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    (day.format(DATE_FORMAT).to_string() == date).then_some(day)
}

/// Sort dates ascending by calendar value. Strings that do not parse sort
/// first, in lexical order.
pub fn sort_dates(dates: &mut [String]) {
    dates.sort_by(|a, b| (parse_date(a), a).cmp(&(parse_date(b), b)));
}

// ============================================================================
// ROSTER STATE (snapshot)
// ============================================================================

/// The three collections, kept mutually consistent by [`crate::Roster`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterState {
    pub players: Vec<Player>,
    pub dates: Vec<String>,
    pub attendance: AttendanceMap,
}

impl RosterState {
    pub fn find_player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn has_player_named(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.has_name(name))
    }

    pub fn has_date(&self, date: &str) -> bool {
        self.dates.iter().any(|d| d == date)
    }

    /// Tri-state value of one cell
    pub fn status(&self, player_id: &str, date: &str) -> AttendanceStatus {
        self.attendance
            .get(player_id)
            .and_then(|marks| marks.get(date))
            .copied()
            .into()
    }

    /// Bring loaded state back in line with the model's invariants.
    ///
    /// Returns the number of repairs made (dropped duplicates, dangling
    /// entries, missing sub-maps).
    pub fn normalize(&mut self) -> usize {
        let mut repairs = 0;

        let before = self.dates.len();
        sort_dates(&mut self.dates);
        self.dates.dedup();
        repairs += before - self.dates.len();

        let players = &self.players;
        let before = self.attendance.len();
        self.attendance
            .retain(|id, _| players.iter().any(|p| &p.id == id));
        repairs += before - self.attendance.len();

        let dates = &self.dates;
        for marks in self.attendance.values_mut() {
            let before = marks.len();
            marks.retain(|date, _| dates.iter().any(|d| d == date));
            repairs += before - marks.len();
        }

        for player in &self.players {
            if !self.attendance.contains_key(&player.id) {
                self.attendance.insert(player.id.clone(), PlayerAttendance::new());
                repairs += 1;
            }
        }

        repairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, name: &str) -> Player {
        Player {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_player_creation() {
        let a = Player::new("Ana");
        let b = Player::new("Ana");

        assert_eq!(a.name, "Ana");
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id, "Each player gets its own identity");
    }

    #[test]
    fn test_player_name_match_ignores_case() {
        let p = player("1", "Ana");
        assert!(p.has_name("ana"));
        assert!(p.has_name("ANA"));
        assert!(!p.has_name("Anabel"));
    }

    #[test]
    fn test_mark_serializes_as_bool() {
        let mut marks = PlayerAttendance::new();
        marks.insert("2024-01-01".to_string(), Mark::Present);
        marks.insert("2024-01-02".to_string(), Mark::Absent);

        let json = serde_json::to_string(&marks).unwrap();
        assert_eq!(json, r#"{"2024-01-01":true,"2024-01-02":false}"#);

        let back: PlayerAttendance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, marks);
    }

    #[test]
    fn test_status_from_sparse_map() {
        let mut state = RosterState::default();
        state.players.push(player("p1", "Ana"));
        state.dates.push("2024-01-01".to_string());
        state.attendance.insert("p1".to_string(), PlayerAttendance::new());

        assert_eq!(state.status("p1", "2024-01-01"), AttendanceStatus::Unrecorded);
        assert_eq!(state.status("nobody", "2024-01-01"), AttendanceStatus::Unrecorded);

        state
            .attendance
            .get_mut("p1")
            .unwrap()
            .insert("2024-01-01".to_string(), Mark::Absent);
        assert_eq!(state.status("p1", "2024-01-01"), AttendanceStatus::Absent);
    }

    #[test]
    fn test_toggled_never_returns_unrecorded() {
        assert_eq!(AttendanceStatus::Unrecorded.toggled(), Mark::Present);
        assert_eq!(AttendanceStatus::Present.toggled(), Mark::Absent);
        assert_eq!(AttendanceStatus::Absent.toggled(), Mark::Present);
    }

    #[test]
    fn test_parse_date_requires_canonical_form() {
        assert_eq!(parse_date("2024-01-05"), NaiveDate::from_ymd_opt(2024, 1, 5));
        for input in ["2024-1-5", "2024-01-5", "2024-1-05", "+2024-01-05", "02024-01-05", "2024-02-30"] {
            assert_eq!(parse_date(input), None, "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_sort_dates_calendar_order() {
        let mut dates = vec![
            "2024-03-01".to_string(),
            "2023-12-31".to_string(),
            "2024-01-15".to_string(),
        ];
        sort_dates(&mut dates);
        assert_eq!(dates, vec!["2023-12-31", "2024-01-15", "2024-03-01"]);
    }

    #[test]
    fn test_normalize_repairs_loaded_state() {
        let mut state = RosterState {
            players: vec![player("p1", "Ana")],
            dates: vec![
                "2024-02-01".to_string(),
                "2024-01-01".to_string(),
                "2024-02-01".to_string(),
            ],
            attendance: AttendanceMap::new(),
        };

        let mut ghost = PlayerAttendance::new();
        ghost.insert("2024-01-01".to_string(), Mark::Present);
        state.attendance.insert("ghost".to_string(), ghost);

        let repairs = state.normalize();

        assert_eq!(repairs, 3);
        assert_eq!(state.dates, vec!["2024-01-01", "2024-02-01"]);
        assert!(!state.attendance.contains_key("ghost"));
        assert!(state.attendance.contains_key("p1"));
    }

    #[test]
    fn test_normalize_drops_entries_for_unknown_dates() {
        let mut state = RosterState {
            players: vec![player("p1", "Ana")],
            dates: vec!["2024-01-01".to_string()],
            attendance: AttendanceMap::new(),
        };
        let mut marks = PlayerAttendance::new();
        marks.insert("2024-01-01".to_string(), Mark::Present);
        marks.insert("1999-01-01".to_string(), Mark::Absent);
        state.attendance.insert("p1".to_string(), marks);

        assert_eq!(state.normalize(), 1);
        assert_eq!(state.attendance["p1"].len(), 1);
        assert_eq!(state.normalize(), 0, "Normalizing twice is a no-op");
    }
}
