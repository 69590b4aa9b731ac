// Derived Views - Counts and orderings computed from a roster snapshot
//
// Everything here is a pure function of `RosterState`. Counts only consider
// dates that are on the roster, so `present + absent + unrecorded` always
// equals the number of dates.

use crate::model::{AttendanceStatus, Player, RosterState};
use serde::Serialize;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// COUNTS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub present: usize,
    pub absent: usize,
    pub unrecorded: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.present + self.absent + self.unrecorded
    }

    fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Unrecorded => self.unrecorded += 1,
        }
    }
}

impl std::ops::AddAssign for Counts {
    fn add_assign(&mut self, other: Counts) {
        self.present += other.present;
        self.absent += other.absent;
        self.unrecorded += other.unrecorded;
    }
}

/// Counts across every roster date for one player. `None` for unknown ids.
pub fn per_player_counts(state: &RosterState, player_id: &str) -> Option<Counts> {
    state.find_player(player_id)?;

    let mut counts = Counts::default();
    for date in &state.dates {
        counts.record(state.status(player_id, date));
    }
    Some(counts)
}

/// Counts across every player for one date. `None` for dates not on the roster.
pub fn per_date_counts(state: &RosterState, date: &str) -> Option<Counts> {
    if !state.has_date(date) {
        return None;
    }

    let mut counts = Counts::default();
    for player in &state.players {
        counts.record(state.status(&player.id, date));
    }
    Some(counts)
}

/// Counts over the whole grid (players x dates)
pub fn overall_counts(state: &RosterState) -> Counts {
    let mut counts = Counts::default();
    for player in &state.players {
        if let Some(player_counts) = per_player_counts(state, &player.id) {
            counts += player_counts;
        }
    }
    counts
}

/// One row of the per-player summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub counts: Counts,
}

/// Summary rows in display order (see [`sorted_players`])
pub fn player_summaries(state: &RosterState) -> Vec<PlayerSummary> {
    sorted_players(state)
        .into_iter()
        .map(|player| PlayerSummary {
            id: player.id.clone(),
            name: player.name.clone(),
            counts: per_player_counts(state, &player.id).unwrap_or_default(),
        })
        .collect()
}

// ============================================================================
// ORDERING
// ============================================================================

/// Players ordered by name for display.
pub fn sorted_players(state: &RosterState) -> Vec<&Player> {
    let mut players: Vec<&Player> = state.players.iter().collect();
    players.sort_by(|a, b| collate(&a.name, &b.name));
    players
}

/// Locale-style name comparison.
///
/// Levels, first difference wins:
/// 1. base letters (accents and case ignored)
/// 2. accents
/// 3. case (lowercase before uppercase)
/// 4. raw text
pub fn collate(a: &str, b: &str) -> Ordering {
    let (a_key, b_key) = (CollationKey::new(a), CollationKey::new(b));

    a_key
        .base
        .cmp(&b_key.base)
        .then_with(|| a_key.accented.cmp(&b_key.accented))
        .then_with(|| a_key.cased.cmp(&b_key.cased))
        .then_with(|| a.cmp(b))
}

struct CollationKey {
    base: String,
    accented: String,
    cased: Vec<bool>,
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let decomposed: Vec<char> = s.nfd().collect();

        let base = decomposed
            .iter()
            .filter(|c| !is_combining_mark(**c))
            .flat_map(|c| c.to_lowercase())
            .collect();

        let accented = decomposed
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect();

        let cased = decomposed
            .iter()
            .filter(|c| !is_combining_mark(**c))
            .map(|c| c.is_uppercase())
            .collect();

        CollationKey {
            base,
            accented,
            cased,
        }
    }
}

// ============================================================================
// DATE LABELS
// ============================================================================

const WEEKDAYS_ES: [&str; 7] = ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"];
const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Short Spanish label for a roster date, e.g. `lun, 1 ene 2024`.
/// Unparseable input is returned as-is.
pub fn date_label(date: &str, with_year: bool) -> String {
    use chrono::Datelike;

    let Some(day) = crate::model::parse_date(date) else {
        return date.to_string();
    };

    let weekday = WEEKDAYS_ES[day.weekday().num_days_from_monday() as usize];
    let month = MONTHS_ES[day.month0() as usize];

    if with_year {
        format!("{}, {} {} {}", weekday, day.day(), month, day.year())
    } else {
        format!("{}, {} {}", weekday, day.day(), month)
    }
}
