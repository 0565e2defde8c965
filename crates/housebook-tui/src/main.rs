//! housebook - a terminal UI for a class grade tracker and a House member roster.
//!
//! Grades live only for the session; the member roster is persisted to a
//! local key-value store in the data directory.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use housebook_core::{
    compute_gpa, Config, FileStore, Grade, KeyValueRepository, RosterRepository, Subject,
};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the log directory
const LOG_FILE: &str = "housebook.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file so they do not draw over the TUI. The returned guard
/// must be kept alive until exit to flush buffered lines.
fn init_tracing(config: &Config) -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

/// Stderr logging for the one-shot CLI commands
fn init_cli_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Load the config, falling back to defaults. The error is handed back so it
/// can be logged once a subscriber is installed.
fn load_config() -> (Config, Option<anyhow::Error>) {
    match Config::load_or_create() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);
    let (config, config_error) = load_config();

    // Initialize logging
    let _log_guard = match command {
        Some("--gpa") | Some("--export-members") => {
            init_cli_tracing();
            None
        }
        _ => Some(init_tracing(&config)?),
    };
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    // Check for CLI commands
    match command {
        Some("--gpa") => {
            print!("{}", gpa_summary(&args[2..])?);
            return Ok(());
        }
        Some("--export-members") => {
            println!("{}", export_members(config.data_dir())?);
            return Ok(());
        }
        _ => {}
    }

    info!("housebook starting");

    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("housebook shutting down");
    Ok(())
}

/// GPA summary for grades given on the command line, e.g. `--gpa A B+ W`
fn gpa_summary(letters: &[String]) -> Result<String> {
    let subjects = letters
        .iter()
        .enumerate()
        .map(|(i, letter)| -> Result<Subject> {
            let grade: Grade = letter.parse()?;
            Ok(Subject::new(format!("Subject {}", i + 1), grade))
        })
        .collect::<Result<Vec<_>>>()?;

    let result = compute_gpa(&subjects);
    Ok(format!(
        "Counted subjects: {}\nTotal points:     {}\nGPA:              {}\n",
        result.counted_subjects,
        result.total_points_display(),
        result.gpa_display()
    ))
}

/// The roster stored under `data_dir` as pretty JSON
fn export_members(data_dir: PathBuf) -> Result<String> {
    let store = FileStore::new(data_dir)?;
    let members = KeyValueRepository::new(store).load_all();
    info!(count = members.len(), "Exporting members");
    Ok(serde_json::to_string_pretty(&members)?)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use housebook_core::{MemberFields, MemberRoster, PhotoUpload};

    fn letters(grades: &[&str]) -> Vec<String> {
        grades.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_gpa_summary_skips_withdrawn() {
        let summary = gpa_summary(&letters(&["A", "W"])).unwrap();
        assert_eq!(
            summary,
            "Counted subjects: 1\nTotal points:     4.00\nGPA:              4.00\n"
        );
    }

    #[test]
    fn test_gpa_summary_mixed_grades() {
        let summary = gpa_summary(&letters(&["b+", " C "])).unwrap();
        assert!(summary.contains("Counted subjects: 2"));
        assert!(summary.contains("Total points:     5.50"));
        assert!(summary.contains("GPA:              2.75"));
    }

    #[test]
    fn test_gpa_summary_without_grades() {
        let summary = gpa_summary(&[]).unwrap();
        assert!(summary.contains("Counted subjects: 0"));
        assert!(summary.contains("GPA:              -"));
    }

    #[test]
    fn test_gpa_summary_unknown_grade_is_error() {
        assert!(gpa_summary(&letters(&["A", "Z"])).is_err());
    }

    #[test]
    fn test_export_members_prints_stored_array() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();
        assert_eq!(export_members(data_dir.clone()).unwrap(), "[]");

        let mut roster = MemberRoster::new(KeyValueRepository::new(
            FileStore::new(data_dir.clone()).unwrap(),
        ));
        let fields = MemberFields {
            first_name: "Pita".to_string(),
            last_name: "Limjaroen".to_string(),
            party: "Orange".to_string(),
            work_history: "Engineer".to_string(),
            ..MemberFields::default()
        };
        let photo = PhotoUpload::new("p.png", "image/png", vec![1, 2]);
        roster.add_member(&fields, Some(&photo)).unwrap();

        let exported: serde_json::Value =
            serde_json::from_str(&export_members(data_dir).unwrap()).unwrap();
        assert_eq!(exported.as_array().map(Vec::len), Some(1));
        assert_eq!(exported[0]["firstName"], "Pita");
        assert_eq!(exported[0]["photoUrl"], "data:image/png;base64,AQI=");
    }

    #[test]
    fn test_export_members_ignores_malformed_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("houseMembers.json"), "{oops").unwrap();
        assert_eq!(export_members(dir.path().to_path_buf()).unwrap(), "[]");
    }
}
