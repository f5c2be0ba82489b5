//! rolledit - A terminal piano roll pattern editor.
//!
//! Click an empty cell to add a note, click a note to delete it, and drag a
//! note's left or right edge to resize it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --pattern song.json   # Edit (or create) song.json
//! cargo run -- --new --length 32     # Start a fresh 32-tick pattern
//! RUST_LOG=rolledit=debug cargo run 2> editor.log
//! ```
//!
//! Press `?` for a key hint line.

use rolledit::app::App;
use rolledit::config::EditorConfig;
use rolledit::score::Pattern;
use rolledit::ui;

use anyhow::{bail, Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line options for the application.
struct CliOptions {
    /// Optional editor configuration file.
    config: Option<PathBuf>,
    /// Pattern file to edit.
    pattern: Option<PathBuf>,
    /// Overrides the configured pattern length for new patterns.
    length: Option<f64>,
    /// Overrides the configured grid size.
    grid: Option<f64>,
    /// Start with an empty pattern even if the file exists.
    new_pattern: bool,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--config <path>` or `-c <path>`: Load editor settings from JSON
    /// - `--pattern <path>` or `-p <path>`: Pattern file to edit
    /// - `--length <ticks>`: Length of a new pattern
    /// - `--grid <ticks>`: Initial grid size
    /// - `--new` or `-n`: Ignore an existing pattern file
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut options = Self {
            config: None,
            pattern: None,
            length: None,
            grid: None,
            new_pattern: false,
        };
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--new" | "-n" => options.new_pattern = true,
                "--config" | "-c" => {
                    i += 1;
                    options.config = Some(PathBuf::from(arg_value(&args, i, "--config")?));
                }
                "--pattern" | "-p" => {
                    i += 1;
                    options.pattern = Some(PathBuf::from(arg_value(&args, i, "--pattern")?));
                }
                "--length" => {
                    i += 1;
                    options.length = Some(arg_ticks(&args, i, "--length")?);
                }
                "--grid" => {
                    i += 1;
                    options.grid = Some(arg_ticks(&args, i, "--grid")?);
                }
                "--help" | "-h" => {
                    print_help(args.first().map(String::as_str).unwrap_or("rolledit"));
                    std::process::exit(0);
                }
                other => {
                    // A bare path is the pattern file
                    if !other.starts_with('-') && options.pattern.is_none() {
                        options.pattern = Some(PathBuf::from(other));
                    } else {
                        bail!("Unknown option: {} (use --help for usage information)", other);
                    }
                }
            }
            i += 1;
        }

        Ok(options)
    }
}

/// Returns the argument following a flag.
fn arg_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("{} requires an argument", flag))
}

/// Parses the tick count following a flag.
fn arg_ticks(args: &[String], i: usize, flag: &str) -> Result<f64> {
    let raw = arg_value(args, i, flag)?;
    raw.parse::<f64>()
        .with_context(|| format!("{} expects a number of ticks, got '{}'", flag, raw))
}

fn print_help(program: &str) {
    eprintln!("rolledit - Terminal piano roll pattern editor");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS] [PATTERN]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --pattern PATH   Pattern file to edit (.json, or .bin for binary)");
    eprintln!("  -c, --config PATH    Editor settings (JSON)");
    eprintln!("      --length TICKS   Length of a new pattern");
    eprintln!("      --grid TICKS     Initial grid size");
    eprintln!("  -n, --new            Start with an empty pattern");
    eprintln!("  -h, --help           Print this help message");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=rolledit=debug) and redirect stderr for logs.");
}

/// Builds the editor configuration from the optional file and CLI overrides.
fn load_config(cli: &CliOptions) -> Result<EditorConfig> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    if let Some(length) = cli.length {
        config.pattern_length = length;
    }
    if let Some(grid) = cli.grid {
        config.grid_size = grid;
    }
    config.validate().context("Invalid editor settings")?;

    Ok(config)
}

/// Loads the pattern to edit, or creates an empty one.
fn load_pattern(cli: &CliOptions, config: &EditorConfig) -> Result<Pattern> {
    if let Some(path) = &cli.pattern {
        if !cli.new_pattern && path.exists() {
            let pattern = Pattern::load_from_file(path)
                .with_context(|| format!("Failed to load pattern {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                notes = pattern.note_count(),
                "pattern loaded"
            );
            return Ok(pattern);
        }
    }

    Pattern::new(config.pattern_length).context("Failed to create pattern")
}

/// Main entry point.
fn main() -> Result<()> {
    // Parse CLI options first (before any terminal setup)
    let cli = CliOptions::parse()?;

    // Logs go to stderr so they can be redirected away from the TUI
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let pattern = load_pattern(&cli, &config)?;
    let mut app = App::new(config, pattern, cli.pattern.clone());

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    result?;
    app.save_on_exit().context("Failed to save pattern on exit")?;
    Ok(())
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_status();

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press && handle_key(app, key.code, key.modifiers)
                    {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }
    }
}

/// Routes a mouse event to the editor.
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.handle_mouse_down(x, y),
        MouseEventKind::Up(MouseButton::Left) => app.handle_mouse_up(x, y),
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_mouse_move(x, y)
        }
        MouseEventKind::ScrollUp => app.scroll_octaves(-1),
        MouseEventKind::ScrollDown => app.scroll_octaves(1),
        _ => {}
    }
}

/// Handles a key press event.
///
/// # Returns
///
/// `true` if the application should quit
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Char('c') if ctrl => return true,
        KeyCode::Char('q') => return true,

        KeyCode::Char('z') if ctrl => {
            app.undo();
        }
        KeyCode::Char('y') if ctrl => {
            app.redo();
        }

        // Up shows higher pitches
        KeyCode::Up | KeyCode::Char('k') => app.scroll_octaves(-1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_octaves(1),

        KeyCode::Char('g') => app.cycle_grid(),
        KeyCode::Char('s') => app.save_with_status(),
        KeyCode::Char('?') => app.show_help = !app.show_help,
        _ => {}
    }

    false
}
