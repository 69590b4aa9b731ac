// Roster - Attendance state owner
//
// Owns players, dates and the attendance map, and is the only thing allowed
// to mutate them. Every mutation is staged on copies, written through to the
// store, and only then committed in memory, so a failed write leaves the
// roster exactly as it was.

use crate::model::{parse_date, sort_dates, AttendanceStatus, Player, PlayerAttendance, RosterState};
use crate::store::{
    encode_slot, load_slot, KeyValueStore, StoreError, ATTENDANCE_KEY, DATES_KEY, PLAYERS_KEY,
};
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// ERRORS
// ============================================================================

/// User input that violates a roster invariant. Nothing changes when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("player name cannot be empty")]
    EmptyName,

    #[error("a player named `{0}` already exists")]
    DuplicateName(String),

    #[error("date cannot be empty")]
    EmptyDate,

    #[error("`{0}` is not a valid YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("date `{0}` is already on the roster")]
    DuplicateDate(String),
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RosterError {
    /// Validation problems are the user's to fix; store problems are not
    pub fn is_validation(&self) -> bool {
        matches!(self, RosterError::Validation(_))
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

// ============================================================================
// ROSTER
// ============================================================================

pub struct Roster<S: KeyValueStore> {
    state: RosterState,
    store: S,
}

impl<S: KeyValueStore> Roster<S> {
    /// Load roster state from the store. Missing or malformed slots start
    /// empty; inconsistencies between slots are repaired in memory.
    pub fn load(store: S) -> RosterResult<Self> {
        let mut state = RosterState {
            players: load_slot(&store, PLAYERS_KEY)?,
            dates: load_slot(&store, DATES_KEY)?,
            attendance: load_slot(&store, ATTENDANCE_KEY)?,
        };

        let repairs = state.normalize();
        if repairs > 0 {
            warn!(repairs, "repaired inconsistent roster state on load");
        }

        info!(
            players = state.players.len(),
            dates = state.dates.len(),
            "roster loaded"
        );

        Ok(Roster { state, store })
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn dates(&self) -> &[String] {
        &self.state.dates
    }

    pub fn attendance(&self) -> &crate::model::AttendanceMap {
        &self.state.attendance
    }

    pub fn status(&self, player_id: &str, date: &str) -> AttendanceStatus {
        self.state.status(player_id, date)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Add a player. The name is trimmed and must be non-empty and unique
    /// (case-insensitive) among current players.
    pub fn add_player(&mut self, name: &str) -> RosterResult<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.state.has_player_named(name) {
            return Err(ValidationError::DuplicateName(name.to_string()).into());
        }

        let player = Player::new(name);

        let mut players = self.state.players.clone();
        players.push(player.clone());
        let mut attendance = self.state.attendance.clone();
        attendance.insert(player.id.clone(), PlayerAttendance::new());

        self.store.set_many(&[
            (PLAYERS_KEY, encode_slot(PLAYERS_KEY, &players)?),
            (ATTENDANCE_KEY, encode_slot(ATTENDANCE_KEY, &attendance)?),
        ])?;

        self.state.players = players;
        self.state.attendance = attendance;

        info!(player_id = %player.id, name = %player.name, "player added");
        Ok(player)
    }

    /// Remove a player and every attendance entry for them. Returns `false`
    /// (and writes nothing) when no player has that id.
    pub fn remove_player(&mut self, id: &str) -> RosterResult<bool> {
        if self.state.find_player(id).is_none() {
            debug!(player_id = id, "remove_player: no such player");
            return Ok(false);
        }

        let mut players = self.state.players.clone();
        players.retain(|p| p.id != id);
        let mut attendance = self.state.attendance.clone();
        attendance.remove(id);

        self.store.set_many(&[
            (PLAYERS_KEY, encode_slot(PLAYERS_KEY, &players)?),
            (ATTENDANCE_KEY, encode_slot(ATTENDANCE_KEY, &attendance)?),
        ])?;

        self.state.players = players;
        self.state.attendance = attendance;

        info!(player_id = id, "player removed");
        Ok(true)
    }

    /// Add a session date (`YYYY-MM-DD`). Dates stay sorted by calendar value.
    pub fn add_date(&mut self, date: &str) -> RosterResult<()> {
        let date = date.trim();
        if date.is_empty() {
            return Err(ValidationError::EmptyDate.into());
        }
        if parse_date(date).is_none() {
            return Err(ValidationError::InvalidDate(date.to_string()).into());
        }
        if self.state.has_date(date) {
            return Err(ValidationError::DuplicateDate(date.to_string()).into());
        }

        let mut dates = self.state.dates.clone();
        dates.push(date.to_string());
        sort_dates(&mut dates);

        self.store.set(DATES_KEY, &encode_slot(DATES_KEY, &dates)?)?;

        self.state.dates = dates;

        info!(date, "date added");
        Ok(())
    }

    /// Remove a session date and its entry from every player. Returns `false`
    /// when the date was not on the roster.
    pub fn remove_date(&mut self, date: &str) -> RosterResult<bool> {
        let date = date.trim();
        if !self.state.has_date(date) {
            debug!(date, "remove_date: no such date");
            return Ok(false);
        }

        let mut dates = self.state.dates.clone();
        dates.retain(|d| d != date);
        let mut attendance = self.state.attendance.clone();
        let mut cleared = 0usize;
        for marks in attendance.values_mut() {
            if marks.remove(date).is_some() {
                cleared += 1;
            }
        }

        self.store.set_many(&[
            (DATES_KEY, encode_slot(DATES_KEY, &dates)?),
            (ATTENDANCE_KEY, encode_slot(ATTENDANCE_KEY, &attendance)?),
        ])?;

        self.state.dates = dates;
        self.state.attendance = attendance;

        info!(date, cleared, "date removed");
        Ok(true)
    }

    /// Flip one cell: unrecorded/absent -> present, present -> absent.
    ///
    /// Returns the new status, or `None` when the player or date does not
    /// exist (nothing is written in that case).
    pub fn toggle_attendance(
        &mut self,
        player_id: &str,
        date: &str,
    ) -> RosterResult<Option<AttendanceStatus>> {
        if self.state.find_player(player_id).is_none() || !self.state.has_date(date) {
            debug!(player_id, date, "toggle_attendance: unknown player or date");
            return Ok(None);
        }

        let next = self.state.status(player_id, date).toggled();

        let mut attendance = self.state.attendance.clone();
        attendance
            .entry(player_id.to_string())
            .or_default()
            .insert(date.to_string(), next);

        self.store
            .set(ATTENDANCE_KEY, &encode_slot(ATTENDANCE_KEY, &attendance)?)?;

        self.state.attendance = attendance;

        let status = AttendanceStatus::from(Some(next));
        info!(player_id, date, ?status, "attendance toggled");
        Ok(Some(status))
    }
}
