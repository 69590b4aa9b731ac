// End-to-end roster scenarios: mutations, derived views, export, and
// persistence through a real SQLite file.

use roster_attendance::{
    export_to_delimited_text, per_player_counts, sorted_players, AttendanceStatus, Counts,
    KeyValueStore, MemoryStore, Roster, RosterError, RosterState, SqliteStore, ValidationError,
    ATTENDANCE_KEY, DATES_KEY, PLAYERS_KEY,
};

fn memory_roster() -> Roster<MemoryStore> {
    Roster::load(MemoryStore::new()).unwrap()
}

/// Every attendance entry points at an existing player and date, and every
/// player has all dates accounted for.
fn assert_consistent(state: &RosterState) {
    for (player_id, marks) in &state.attendance {
        assert!(state.find_player(player_id).is_some(), "dangling player {}", player_id);
        for date in marks.keys() {
            assert!(state.has_date(date), "dangling date {}", date);
        }
    }

    for player in &state.players {
        let counts = per_player_counts(state, &player.id).unwrap();
        assert_eq!(counts.total(), state.dates.len());
    }

    let mut sorted = state.dates.clone();
    roster_attendance::model::sort_dates(&mut sorted);
    assert_eq!(sorted, state.dates);
}

#[test]
fn test_cascade_on_date_removal() {
    let mut roster = memory_roster();
    let a = roster.add_player("A").unwrap();
    roster.add_player("B").unwrap();
    roster.add_date("2024-01-01").unwrap();
    roster.add_date("2024-01-08").unwrap();
    roster.toggle_attendance(&a.id, "2024-01-01").unwrap();

    roster.remove_date("2024-01-01").unwrap();

    assert!(!roster.attendance()[&a.id].contains_key("2024-01-01"));
    assert_eq!(
        per_player_counts(roster.state(), &a.id),
        Some(Counts { present: 0, absent: 0, unrecorded: 1 })
    );
    assert_consistent(roster.state());
}

#[test]
fn test_export_scenario() {
    let mut roster = memory_roster();
    let zoe = roster.add_player("Zoe").unwrap();
    roster.add_player("Ana").unwrap();
    roster.add_date("2024-01-01").unwrap();

    // Zoe: unrecorded -> present -> absent
    roster.toggle_attendance(&zoe.id, "2024-01-01").unwrap();
    roster.toggle_attendance(&zoe.id, "2024-01-01").unwrap();

    let text = export_to_delimited_text(roster.state()).unwrap();
    let rows: Vec<&str> = text.trim_start_matches('\u{FEFF}').split("\r\n").collect();

    assert_eq!(rows[0], "Jugador;2024-01-01;Presente;Ausente;N/A");
    assert_eq!(rows[1], "Ana;N/A;0;0;1");
    assert_eq!(rows[2], "Zoe;Ausente;0;1;0");
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_rejection_scenario_leaves_state_unchanged() {
    let mut roster = memory_roster();
    roster.add_player("Ana").unwrap();
    let before = roster.state().clone();

    for name in ["", "ana"] {
        let err = roster.add_player(name).unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)), "{name:?} should be rejected");
    }

    assert_eq!(roster.state(), &before);
}

#[test]
fn test_invariants_hold_through_mixed_operations() {
    let mut roster = memory_roster();
    let names = ["Lucía", "martín", "Álvaro", "Bea", "zoe"];
    let dates = ["2024-03-10", "2024-01-05", "2024-02-20", "2023-12-31"];

    let mut ids = Vec::new();
    for name in names {
        ids.push(roster.add_player(name).unwrap().id);
        assert_consistent(roster.state());
    }
    for date in dates {
        roster.add_date(date).unwrap();
        assert_consistent(roster.state());
    }

    for (i, id) in ids.iter().enumerate() {
        for date in dates.iter().take(i % dates.len() + 1) {
            roster.toggle_attendance(id, date).unwrap();
        }
    }
    assert_consistent(roster.state());

    roster.remove_player(&ids[2]).unwrap();
    roster.remove_date("2024-01-05").unwrap();
    roster.remove_date("1999-01-01").unwrap();
    assert_consistent(roster.state());

    assert!(matches!(
        roster.add_player("LUCÍA").unwrap_err(),
        RosterError::Validation(ValidationError::DuplicateName(_))
    ));
}

#[test]
fn test_sorted_players_is_locale_ordered() {
    let mut roster = memory_roster();
    for name in ["zoe", "Óscar", "ana", "Bea"] {
        roster.add_player(name).unwrap();
    }

    let names: Vec<&str> = sorted_players(roster.state()).iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["ana", "Bea", "Óscar", "zoe"]);
}

#[test]
fn test_sqlite_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("roster.db");

    let (ana_id, expected) = {
        let mut roster = Roster::load(SqliteStore::open(&db_path).unwrap()).unwrap();
        let ana = roster.add_player("Ana").unwrap();
        roster.add_player("Zoe").unwrap();
        roster.add_date("2024-01-08").unwrap();
        roster.add_date("2024-01-01").unwrap();
        roster.toggle_attendance(&ana.id, "2024-01-08").unwrap();
        (ana.id, roster.state().clone())
    };

    let reopened = Roster::load(SqliteStore::open(&db_path).unwrap()).unwrap();
    assert_eq!(reopened.state(), &expected);
    assert_eq!(reopened.status(&ana_id, "2024-01-08"), AttendanceStatus::Present);
    assert_eq!(reopened.dates(), &["2024-01-01", "2024-01-08"]);
}

#[test]
fn test_stored_slot_format() {
    let mut roster = memory_roster();
    let ana = roster.add_player("Ana").unwrap();
    roster.add_date("2024-01-01").unwrap();
    roster.toggle_attendance(&ana.id, "2024-01-01").unwrap();
    roster.toggle_attendance(&ana.id, "2024-01-01").unwrap();

    let store = roster.into_store();
    let players: serde_json::Value =
        serde_json::from_str(&store.get(PLAYERS_KEY).unwrap().unwrap()).unwrap();
    let dates: serde_json::Value =
        serde_json::from_str(&store.get(DATES_KEY).unwrap().unwrap()).unwrap();
    let attendance: serde_json::Value =
        serde_json::from_str(&store.get(ATTENDANCE_KEY).unwrap().unwrap()).unwrap();

    assert_eq!(players, serde_json::json!([{ "id": ana.id, "name": "Ana" }]));
    assert_eq!(dates, serde_json::json!(["2024-01-01"]));
    assert_eq!(attendance, serde_json::json!({ ana.id.as_str(): { "2024-01-01": false } }));
}

#[test]
fn test_malformed_and_inconsistent_slots_load_safely() {
    let mut store = MemoryStore::new();
    store.set(PLAYERS_KEY, r#"[{"id":"p1","name":"Ana"}]"#).unwrap();
    store.set(DATES_KEY, "{{ not json").unwrap();
    store
        .set(ATTENDANCE_KEY, r#"{"p1":{"2024-01-01":true},"ghost":{"2024-01-01":false}}"#)
        .unwrap();

    let roster = Roster::load(store).unwrap();

    assert_eq!(roster.players().len(), 1);
    assert!(roster.dates().is_empty(), "Malformed dates slot loads as empty");
    assert!(!roster.attendance().contains_key("ghost"));
    assert!(roster.attendance()["p1"].is_empty(), "Entries for unknown dates are dropped");
    assert_consistent(roster.state());
}
