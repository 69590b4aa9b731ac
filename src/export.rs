// Spreadsheet Export - Attendance grid as semicolon-delimited text
//
// Layout:
//   Jugador;<date>...;Presente;Ausente;N/A
//   <name>;Presente|Ausente|N/A...;<present>;<absent>;<unrecorded>
//
// Semicolons because spreadsheet tools in Spanish locales expect them, CRLF
// between rows, and a UTF-8 BOM up front so accented names open correctly.

use crate::model::RosterState;
use crate::views::{per_player_counts, sorted_players};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DELIMITER: u8 = b';';
pub const NEWLINE: &str = "\r\n";
pub const BOM: char = '\u{FEFF}';
pub const MIME_TYPE: &str = "text/csv;charset=utf-8";

const NAME_HEADER: &str = "Jugador";
const STATS_HEADERS: [&str; 3] = ["Presente", "Ausente", "N/A"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the roster needs at least one player and one date")]
    NoData,

    #[error("failed to encode export: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File name offered for an export taken on `today`
pub fn export_file_name(today: NaiveDate) -> String {
    format!("asistencia_equipo_{}.csv", today.format("%Y-%m-%d"))
}

/// Render the full attendance grid.
pub fn export_to_delimited_text(state: &RosterState) -> Result<String, ExportError> {
    if state.players.is_empty() || state.dates.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(state.dates.len() + 4);
    header.push(NAME_HEADER);
    header.extend(state.dates.iter().map(String::as_str));
    header.extend(STATS_HEADERS);
    wtr.write_record(&header)?;

    for player in sorted_players(state) {
        let counts = per_player_counts(state, &player.id).unwrap_or_default();

        let mut row = Vec::with_capacity(state.dates.len() + 4);
        row.push(player.name.clone());
        for date in &state.dates {
            row.push(state.status(&player.id, date).export_token().to_string());
        }
        row.push(counts.present.to_string());
        row.push(counts.absent.to_string());
        row.push(counts.unrecorded.to_string());

        wtr.write_record(&row)?;
    }

    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    // csv only ever writes the UTF-8 we hand it
    let body = String::from_utf8_lossy(&bytes).into_owned();

    let mut text = String::with_capacity(body.len() + BOM.len_utf8());
    text.push(BOM);
    text.push_str(body.strip_suffix(NEWLINE).unwrap_or(body.as_str()));
    Ok(text)
}

/// Write the export into `dir` under [`export_file_name`], returning the path.
pub fn write_export(state: &RosterState, dir: &Path, today: NaiveDate) -> Result<PathBuf, ExportError> {
    let text = export_to_delimited_text(state)?;
    let path = dir.join(export_file_name(today));

    std::fs::write(&path, text.as_bytes()).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = text.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mark, Player, PlayerAttendance};

    fn sample_state() -> RosterState {
        let mut state = RosterState::default();
        for (id, name) in [("z", "Zoe"), ("a", "Ana")] {
            state.players.push(Player {
                id: id.to_string(),
                name: name.to_string(),
            });
            state.attendance.insert(id.to_string(), PlayerAttendance::new());
        }
        state.dates.push("2024-01-01".to_string());
        state
            .attendance
            .get_mut("z")
            .unwrap()
            .insert("2024-01-01".to_string(), Mark::Absent);
        state
    }

    #[test]
    fn test_export_layout() {
        let text = export_to_delimited_text(&sample_state()).unwrap();

        assert!(text.starts_with('\u{FEFF}'));
        let lines: Vec<&str> = text.trim_start_matches('\u{FEFF}').split("\r\n").collect();

        assert_eq!(
            lines,
            vec![
                "Jugador;2024-01-01;Presente;Ausente;N/A",
                "Ana;N/A;0;0;1",
                "Zoe;Ausente;0;1;0",
            ]
        );
        assert!(!text.ends_with("\r\n"), "Rows are joined, not terminated");
    }

    #[test]
    fn test_export_present_token() {
        let mut state = sample_state();
        state
            .attendance
            .get_mut("a")
            .unwrap()
            .insert("2024-01-01".to_string(), Mark::Present);

        let text = export_to_delimited_text(&state).unwrap();
        assert!(text.contains("\r\nAna;Presente;1;0;0\r\n"));
    }

    #[test]
    fn test_export_quotes_delimiter_in_names() {
        let mut state = sample_state();
        state.players[0].name = "Zoe; la capitana".to_string();

        let text = export_to_delimited_text(&state).unwrap();
        assert!(text.contains("\"Zoe; la capitana\";Ausente;0;1;0"));
    }

    #[test]
    fn test_export_requires_players_and_dates() {
        let empty = RosterState::default();
        assert!(matches!(export_to_delimited_text(&empty), Err(ExportError::NoData)));

        let mut no_dates = sample_state();
        no_dates.dates.clear();
        assert!(matches!(export_to_delimited_text(&no_dates), Err(ExportError::NoData)));
    }

    #[test]
    fn test_export_file_name() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(today), "asistencia_equipo_2024-03-09.csv");
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let path = write_export(&sample_state(), dir.path(), today).unwrap();

        assert_eq!(path.file_name().unwrap(), "asistencia_equipo_2024-01-02.csv");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    }
}
