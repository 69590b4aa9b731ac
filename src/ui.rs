use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use roster_attendance::{
    date_label, overall_counts, per_date_counts, player_summaries, sorted_players, write_export,
    AttendanceStatus, KeyValueStore, Roster, RosterError,
};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Grid,
    Players,
    Dates,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Grid => Page::Players,
            Page::Players => Page::Dates,
            Page::Dates => Page::Grid,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Grid => Page::Dates,
            Page::Players => Page::Grid,
            Page::Dates => Page::Players,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Grid => "Attendance",
            Page::Players => "Players",
            Page::Dates => "Dates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    AddPlayer(String),
    AddDate(String),
}

impl InputMode {
    fn buffer_mut(&mut self) -> &mut String {
        match self {
            InputMode::AddPlayer(buf) | InputMode::AddDate(buf) => buf,
        }
    }

    fn prompt(&self) -> &str {
        match self {
            InputMode::AddPlayer(_) => "New player name",
            InputMode::AddDate(_) => "New date (YYYY-MM-DD)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

pub struct App<S: KeyValueStore> {
    pub roster: Roster<S>,
    pub current_page: Page,
    pub grid_state: TableState,
    pub selected_date: usize,
    pub players_state: TableState,
    pub dates_state: TableState,
    pub input: Option<InputMode>,
    pub notice: Option<Notice>,
    pub export_dir: PathBuf,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(roster: Roster<S>, export_dir: PathBuf) -> Self {
        let mut app = Self {
            roster,
            current_page: Page::Grid,
            grid_state: TableState::default(),
            selected_date: 0,
            players_state: TableState::default(),
            dates_state: TableState::default(),
            input: None,
            notice: None,
            export_dir,
        };
        app.clamp_selection();
        app
    }

    /// Player ids in display order
    fn player_ids(&self) -> Vec<String> {
        sorted_players(self.roster.state())
            .into_iter()
            .map(|p| p.id.clone())
            .collect()
    }

    fn row_count(&self) -> usize {
        match self.current_page {
            Page::Grid | Page::Players => self.roster.players().len(),
            Page::Dates => self.roster.dates().len(),
        }
    }

    fn table_state_mut(&mut self) -> &mut TableState {
        match self.current_page {
            Page::Grid => &mut self.grid_state,
            Page::Players => &mut self.players_state,
            Page::Dates => &mut self.dates_state,
        }
    }

    /// Keep every selection inside its collection after adds and removals
    fn clamp_selection(&mut self) {
        let players = self.roster.players().len();
        let dates = self.roster.dates().len();

        for (state, len) in [
            (&mut self.grid_state, players),
            (&mut self.players_state, players),
            (&mut self.dates_state, dates),
        ] {
            let selected = match (state.selected(), len) {
                (_, 0) => None,
                (Some(i), len) => Some(i.min(len - 1)),
                (None, _) => Some(0),
            };
            state.select(selected);
        }

        self.selected_date = self.selected_date.min(dates.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let state = self.table_state_mut();
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let state = self.table_state_mut();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn next_date(&mut self) {
        let len = self.roster.dates().len();
        if len > 0 {
            self.selected_date = (self.selected_date + 1) % len;
        }
    }

    pub fn previous_date(&mut self) {
        let len = self.roster.dates().len();
        if len > 0 {
            self.selected_date = (self.selected_date + len - 1) % len;
        }
    }

    pub fn selected_player_id(&self) -> Option<String> {
        let state = match self.current_page {
            Page::Players => &self.players_state,
            _ => &self.grid_state,
        };
        state
            .selected()
            .and_then(|i| self.player_ids().get(i).cloned())
    }

    pub fn selected_cell(&self) -> Option<(String, String)> {
        let player_id = self.selected_player_id()?;
        let date = self.roster.dates().get(self.selected_date)?.clone();
        Some((player_id, date))
    }

    fn report(&mut self, err: RosterError) {
        if !err.is_validation() {
            tracing::error!(error = %err, "roster update failed");
        }
        self.notice = Some(Notice::Error(err.to_string()));
    }

    pub fn toggle_selected(&mut self) {
        let Some((player_id, date)) = self.selected_cell() else {
            return;
        };
        match self.roster.toggle_attendance(&player_id, &date) {
            Ok(_) => self.notice = None,
            Err(err) => self.report(err),
        }
    }

    pub fn remove_selected(&mut self) {
        let result = match self.current_page {
            Page::Players => match self.selected_player_id() {
                Some(id) => self.roster.remove_player(&id),
                None => return,
            },
            Page::Dates => match self.dates_state.selected().and_then(|i| self.roster.dates().get(i).cloned()) {
                Some(date) => self.roster.remove_date(&date),
                None => return,
            },
            Page::Grid => return,
        };

        match result {
            Ok(_) => {
                self.notice = None;
                self.clamp_selection();
            }
            Err(err) => self.report(err),
        }
    }

    pub fn submit_input(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };

        let result = match &input {
            InputMode::AddPlayer(name) => self.roster.add_player(name).map(|p| format!("Added {}", p.name)),
            InputMode::AddDate(date) => self
                .roster
                .add_date(date)
                .map(|_| format!("Added {}", date_label(date.trim(), true))),
        };

        match result {
            Ok(message) => {
                self.notice = Some(Notice::Info(message));
                self.clamp_selection();
            }
            Err(err) => self.report(err),
        }
    }

    pub fn export(&mut self) {
        let today = Local::now().date_naive();
        match write_export(self.roster.state(), &self.export_dir, today) {
            Ok(path) => self.notice = Some(Notice::Info(format!("Exported to {}", path.display()))),
            Err(err) => self.notice = Some(Notice::Error(err.to_string())),
        }
    }

    /// Apply one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(input) = self.input.as_mut() {
            match key.code {
                KeyCode::Esc => self.input = None,
                KeyCode::Enter => self.submit_input(),
                KeyCode::Backspace => {
                    input.buffer_mut().pop();
                }
                KeyCode::Char(c) => input.buffer_mut().push(c),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Right | KeyCode::Char('l') if self.current_page == Page::Grid => self.next_date(),
            KeyCode::Left | KeyCode::Char('h') if self.current_page == Page::Grid => self.previous_date(),
            KeyCode::Char(' ') | KeyCode::Enter if self.current_page == Page::Grid => self.toggle_selected(),
            KeyCode::Char('p') => self.input = Some(InputMode::AddPlayer(String::new())),
            KeyCode::Char('n') => {
                let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
                self.input = Some(InputMode::AddDate(today));
            }
            KeyCode::Char('x') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }
}

pub fn run_ui<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(());
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar / input
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Grid => render_grid(f, chunks[1], app),
        Page::Players => render_players(f, chunks[1], app),
        Page::Dates => render_dates(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let totals = overall_counts(app.roster.state());

    let mut tab_spans = vec![];
    for (i, page) in [Page::Grid, Page::Players, Page::Dates].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!(
            "{} players · {} dates",
            app.roster.players().len(),
            app.roster.dates().len()
        ),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(format!("✓ {}", totals.present), Style::default().fg(Color::Green)));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(format!("✗ {}", totals.absent), Style::default().fg(Color::Red)));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(format!("? {}", totals.unrecorded), Style::default().fg(Color::Gray)));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn header_row(labels: Vec<String>) -> Row<'static> {
    let cells = labels.into_iter().map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

fn status_cell(status: AttendanceStatus, selected: bool) -> Cell<'static> {
    let (text, color) = match status {
        AttendanceStatus::Present => ("✓", Color::Green),
        AttendanceStatus::Absent => ("✗", Color::Red),
        AttendanceStatus::Unrecorded => ("N/A", Color::DarkGray),
    };

    let mut style = Style::default().fg(color);
    if selected {
        style = style.bg(Color::Blue).add_modifier(Modifier::BOLD);
    }
    Cell::from(text).style(style)
}

fn render_empty_hint(f: &mut Frame, area: Rect, title: &str, hint: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::Gray))),
    ];
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", title)),
    );
    f.render_widget(paragraph, area);
}

fn render_grid<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let state = app.roster.state();

    if state.players.is_empty() || state.dates.is_empty() {
        let hint = if state.players.is_empty() {
            "Add some players to get started (p)."
        } else {
            "Add some dates to start recording attendance (n)."
        };
        render_empty_hint(f, area, "Attendance Sheet", hint);
        return;
    }

    let selected_row = app.grid_state.selected();
    let summaries = player_summaries(state);

    let mut labels = vec!["Player".to_string()];
    labels.extend(state.dates.iter().map(|d| date_label(d, false)));
    labels.extend(["✓".to_string(), "✗".to_string(), "?".to_string()]);

    let rows: Vec<Row> = summaries
        .iter()
        .enumerate()
        .map(|(row_idx, summary)| {
            let mut cells = vec![Cell::from(truncate(&summary.name, 20))];
            for (col_idx, date) in state.dates.iter().enumerate() {
                let selected = selected_row == Some(row_idx) && app.selected_date == col_idx;
                cells.push(status_cell(state.status(&summary.id, date), selected));
            }
            cells.push(Cell::from(summary.counts.present.to_string()).style(Style::default().fg(Color::Green)));
            cells.push(Cell::from(summary.counts.absent.to_string()).style(Style::default().fg(Color::Red)));
            cells.push(Cell::from(summary.counts.unrecorded.to_string()).style(Style::default().fg(Color::Gray)));
            Row::new(cells).height(1)
        })
        .collect();

    // Per-date summary footer
    let mut footer = vec![Cell::from("Summary").style(Style::default().add_modifier(Modifier::BOLD))];
    for date in &state.dates {
        let counts = per_date_counts(state, date).unwrap_or_default();
        footer.push(Cell::from(format!(
            "{}/{}/{}",
            counts.present, counts.absent, counts.unrecorded
        )));
    }

    let mut widths = vec![Constraint::Length(22)];
    widths.extend(state.dates.iter().map(|_| Constraint::Length(13)));
    widths.extend([Constraint::Length(4), Constraint::Length(4), Constraint::Length(4)]);

    let table = Table::new(rows, widths)
        .header(header_row(labels))
        .footer(Row::new(footer).style(Style::default().fg(Color::Cyan)).top_margin(1))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Attendance Sheet "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.grid_state);
}

fn render_players<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let state = app.roster.state();

    if state.players.is_empty() {
        render_empty_hint(f, area, "Players", "No players yet. Press p to add one.");
        return;
    }

    let rows: Vec<Row> = player_summaries(state)
        .into_iter()
        .map(|summary| {
            Row::new(vec![
                Cell::from(truncate(&summary.name, 30)),
                Cell::from(summary.counts.present.to_string()).style(Style::default().fg(Color::Green)),
                Cell::from(summary.counts.absent.to_string()).style(Style::default().fg(Color::Red)),
                Cell::from(summary.counts.unrecorded.to_string()).style(Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header_row(
        ["Player", "Present", "Absent", "N/A"].iter().map(|s| s.to_string()).collect(),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Players "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.players_state);
}

fn render_dates<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let state = app.roster.state();

    if state.dates.is_empty() {
        render_empty_hint(f, area, "Dates", "No dates yet. Press n to add one.");
        return;
    }

    let rows: Vec<Row> = state
        .dates
        .iter()
        .map(|date| {
            let counts = per_date_counts(state, date).unwrap_or_default();
            Row::new(vec![
                Cell::from(date.clone()),
                Cell::from(date_label(date, true)),
                Cell::from(counts.present.to_string()).style(Style::default().fg(Color::Green)),
                Cell::from(counts.absent.to_string()).style(Style::default().fg(Color::Red)),
                Cell::from(counts.unrecorded.to_string()).style(Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header_row(
        ["Date", "Day", "Present", "Absent", "N/A"].iter().map(|s| s.to_string()).collect(),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Dates "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.dates_state);
}

fn render_status_bar<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    if let Some(input) = &app.input {
        let buffer = match input {
            InputMode::AddPlayer(buf) | InputMode::AddDate(buf) => buf,
        };
        let line = Line::from(vec![
            Span::styled(format!(" {}: ", input.prompt()), Style::default().fg(Color::Yellow)),
            Span::raw(buffer.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::styled("  (Enter save, Esc cancel)", Style::default().fg(Color::DarkGray)),
        ]);
        let bar = Paragraph::new(vec![line]).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(bar, area);
        return;
    }

    let mut status_spans = vec![];

    match &app.notice {
        Some(Notice::Error(msg)) => {
            status_spans.push(Span::styled(format!(" {} ", msg), Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" | "));
        }
        Some(Notice::Info(msg)) => {
            status_spans.push(Span::styled(format!(" {} ", msg), Style::default().fg(Color::Green)));
            status_spans.push(Span::raw(" | "));
        }
        None => {}
    }

    let hints: Vec<(&str, &str)> = match app.current_page {
        Page::Grid => vec![("Space", " Toggle | "), ("←/→", " Date | "), ("↑/↓", " Player | ")],
        Page::Players | Page::Dates => vec![("x", " Remove | "), ("↑/↓", " Nav | ")],
    };
    for (key, label) in hints {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    for (key, label) in [("p", " Player | "), ("n", " Date | "), ("e", " Export | "), ("Tab", " Page | ")] {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_attendance::MemoryStore;

    fn app() -> App<MemoryStore> {
        let roster = Roster::load(MemoryStore::new()).unwrap();
        App::new(roster, std::env::temp_dir())
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_player_and_date_through_input() {
        let mut app = app();

        press(&mut app, KeyCode::Char('p'));
        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('n'));
        // Prefilled with today; replace it
        for _ in 0..10 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "2024-01-01");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.roster.players().len(), 1);
        assert_eq!(app.roster.dates(), &["2024-01-01"]);
        assert_eq!(app.grid_state.selected(), Some(0));
        assert!(matches!(app.notice, Some(Notice::Info(_))));
    }

    #[test]
    fn test_duplicate_player_shows_error() {
        let mut app = app();
        app.roster.add_player("Ana").unwrap();

        press(&mut app, KeyCode::Char('p'));
        type_text(&mut app, "ana");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.roster.players().len(), 1);
        assert!(matches!(app.notice, Some(Notice::Error(_))));
        assert!(app.input.is_none());
    }

    #[test]
    fn test_toggle_selected_cell() {
        let mut app = app();
        let ana = app.roster.add_player("Ana").unwrap();
        app.roster.add_date("2024-01-01").unwrap();
        app.roster.add_date("2024-01-08").unwrap();
        app.clamp_selection();

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));

        assert_eq!(app.roster.status(&ana.id, "2024-01-08"), AttendanceStatus::Present);
        assert_eq!(app.roster.status(&ana.id, "2024-01-01"), AttendanceStatus::Unrecorded);
    }

    #[test]
    fn test_remove_on_players_page_keeps_selection_valid() {
        let mut app = app();
        app.roster.add_player("Ana").unwrap();
        app.roster.add_player("Zoe").unwrap();
        app.clamp_selection();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::Players);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('x'));

        assert_eq!(app.roster.players().len(), 1);
        assert_eq!(app.roster.players()[0].name, "Ana");
        assert_eq!(app.players_state.selected(), Some(0));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('q')));

        press(&mut app, KeyCode::Char('p'));
        assert!(!press(&mut app, KeyCode::Char('q')), "Typing q in input does not quit");
        assert!(!press(&mut app, KeyCode::Esc), "Esc cancels input first");
        assert!(app.input.is_none());
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Álvaro", 10), "Álvaro");
        assert_eq!(truncate("Maximiliano Ñúñez", 8), "Maxim...");
    }
}
