// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use roster_attendance::{
    date_label, export_to_delimited_text, overall_counts, per_date_counts, player_summaries,
    sorted_players, write_export, AttendanceStatus, Config, Roster, RosterError, SqliteStore,
};

/// Team attendance roster: players, session dates, and who showed up.
#[derive(Parser, Debug)]
#[command(name = "roster-attendance", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the roster database.
    #[arg(long, env = "ROSTER_DB", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive attendance sheet (default).
    Tui {
        /// Directory exports are written to.
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
    },

    /// List players with their attendance counts.
    Players,

    /// Add a player.
    AddPlayer { name: String },

    /// Remove a player (by id) and all of their attendance.
    RemovePlayer { id: String },

    /// List session dates with per-date counts.
    Dates,

    /// Add a session date (YYYY-MM-DD).
    AddDate { date: String },

    /// Remove a session date and its attendance entries.
    RemoveDate { date: String },

    /// Toggle one attendance cell (unrecorded/absent -> present -> absent).
    Toggle { player_id: String, date: String },

    /// Print the full attendance grid.
    Show,

    /// Print overall counts.
    Stats,

    /// Export the grid as a spreadsheet file, or to stdout with `--stdout`.
    Export {
        /// Directory the file is written to.
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Print the export instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> ExitCode {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Validation problems are for the user, not the log
            match err.downcast_ref::<RosterError>() {
                Some(roster_err) if roster_err.is_validation() => eprintln!("{}", roster_err),
                _ => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.db)?;
    let command = cli.command.unwrap_or(Commands::Tui {
        export_dir: PathBuf::from("."),
    });

    let command = match command {
        Commands::Tui { export_dir } => return run_ui_mode(&config, export_dir, cli.verbose),
        other => other,
    };

    roster_attendance::logging::init_stderr(cli.verbose);
    let mut roster = open_roster(&config)?;

    match command {
        Commands::Players => print_players(&roster),
        Commands::AddPlayer { name } => {
            let player = roster.add_player(&name)?;
            println!("✓ Added {} ({})", player.name, player.id);
        }
        Commands::RemovePlayer { id } => {
            if roster.remove_player(&id)? {
                println!("✓ Removed player {}", id);
            } else {
                println!("No player with id {}", id);
            }
        }
        Commands::Dates => print_dates(&roster),
        Commands::AddDate { date } => {
            roster.add_date(&date)?;
            println!("✓ Added {}", date_label(date.trim(), true));
        }
        Commands::RemoveDate { date } => {
            if roster.remove_date(&date)? {
                println!("✓ Removed {}", date);
            } else {
                println!("{} is not on the roster", date);
            }
        }
        Commands::Toggle { player_id, date } => {
            match roster.toggle_attendance(&player_id, &date)? {
                Some(status) => println!("✓ {} on {}: {}", player_id, date, status_word(status)),
                None => println!("Unknown player or date; nothing changed"),
            }
        }
        Commands::Show => print_grid(&roster),
        Commands::Stats => {
            let totals = overall_counts(roster.state());
            println!("Players:    {}", roster.players().len());
            println!("Dates:      {}", roster.dates().len());
            println!("Present:    {}", totals.present);
            println!("Absent:     {}", totals.absent);
            println!("Unrecorded: {}", totals.unrecorded);
        }
        Commands::Export { out, stdout } => {
            if stdout {
                print!("{}", export_to_delimited_text(roster.state())?);
            } else {
                let today = Local::now().date_naive();
                let path = write_export(roster.state(), &out, today)?;
                println!("✓ Exported to {}", path.display());
            }
        }
        Commands::Tui { .. } => unreachable!("TUI command is dispatched before this match"),
    }

    Ok(())
}

fn open_roster(config: &Config) -> Result<Roster<SqliteStore>> {
    let store = SqliteStore::open(config.db_path())
        .with_context(|| format!("Failed to open roster database {}", config.db_path().display()))?;
    let roster = Roster::load(store)?;
    tracing::debug!(db = %config.db_path().display(), "roster opened");
    Ok(roster)
}

fn status_word(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "present",
        AttendanceStatus::Absent => "absent",
        AttendanceStatus::Unrecorded => "not recorded",
    }
}

fn print_players(roster: &Roster<SqliteStore>) {
    let summaries = player_summaries(roster.state());
    if summaries.is_empty() {
        println!("No players yet.");
        return;
    }

    println!("{:<36}  {:<24} {:>7} {:>7} {:>5}", "ID", "NAME", "PRESENT", "ABSENT", "N/A");
    for s in summaries {
        println!(
            "{:<36}  {:<24} {:>7} {:>7} {:>5}",
            s.id, s.name, s.counts.present, s.counts.absent, s.counts.unrecorded
        );
    }
}

fn print_dates(roster: &Roster<SqliteStore>) {
    if roster.dates().is_empty() {
        println!("No dates yet.");
        return;
    }

    println!("{:<12} {:<18} {:>7} {:>7} {:>5}", "DATE", "DAY", "PRESENT", "ABSENT", "N/A");
    for date in roster.dates() {
        let counts = per_date_counts(roster.state(), date).unwrap_or_default();
        println!(
            "{:<12} {:<18} {:>7} {:>7} {:>5}",
            date,
            date_label(date, true),
            counts.present,
            counts.absent,
            counts.unrecorded
        );
    }
}

fn print_grid(roster: &Roster<SqliteStore>) {
    let state = roster.state();
    if state.players.is_empty() || state.dates.is_empty() {
        println!("Add players and dates to start recording attendance.");
        return;
    }

    print!("{:<24}", "");
    for date in &state.dates {
        print!(" {:>10}", date);
    }
    println!();

    for player in sorted_players(state) {
        print!("{:<24}", player.name);
        for date in &state.dates {
            let mark = match state.status(&player.id, date) {
                AttendanceStatus::Present => "✓",
                AttendanceStatus::Absent => "✗",
                AttendanceStatus::Unrecorded => "·",
            };
            print!(" {:>10}", mark);
        }
        println!();
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config, export_dir: PathBuf, verbose: u8) -> Result<()> {
    let _guard = roster_attendance::logging::init_file(&config.log_dir, verbose)?;

    let roster = open_roster(config)?;
    let mut app = ui::App::new(roster, export_dir);
    ui::run_ui(&mut app)?;

    tracing::info!("ui closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config, _export_dir: PathBuf, _verbose: u8) -> Result<()> {
    anyhow::bail!(
        "TUI mode not available. Rebuild with `--features tui`, or use the subcommands (see --help)"
    )
}
