mod action;
mod app;
mod command;
mod config;
mod executor;
mod session;
mod store;
mod ui;
mod ui_state;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use arboard::Clipboard;
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use session::Session;
use store::FileStore;
use ui::draw;

#[derive(Parser, Debug)]
#[command(name = "drivechat", version, about = "Chat-driven assistant for a mock file drive")]
struct Cli {
    /// TOML file overriding the built-in settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read commands from stdin and print replies instead of opening the UI
    #[arg(short, long)]
    plain: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log file for the terminal UI (defaults to the configured path)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(log_file) = cli.log_file.clone() {
        config.log_file = log_file;
    }

    let filter = default_filter(cli.verbose);

    if cli.plain {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(filter))
            .with_writer(io::stderr)
            .with_target(false)
            .init();
        return run_plain();
    }

    // The terminal belongs to ratatui, so logs go to a file
    let log_dir = config
        .log_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let log_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "drivechat.log".into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    info!("Starting drivechat");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result.context("Terminal UI failed")
}

/// Line-oriented mode: one submission per stdin line
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "drivechat=debug"
    } else {
        "drivechat=info"
    }
}

/// `RUST_LOG` wins over the built-in default when set
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn run_plain() -> Result<()> {
    let mut session = Session::new(FileStore::demo());
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    if let Some(greeting) = session.conversation.messages().first() {
        writeln!(stdout, "{}\n", greeting.content)?;
    }

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if let Some(reply) = session.submit(&line) {
            writeln!(stdout, "{}\n", reply.content)?;
        }
    }

    let stats = session.log.stats();
    info!(
        total = stats.total,
        successes = stats.successes,
        errors = stats.errors,
        "Session finished"
    );
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);

    loop {
        app.tick();

        terminal.draw(|frame| draw(frame, app))?;

        if !event::poll(tick_rate)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc => {
                    if app.showing_command_popup() {
                        app.reset_command_selection();
                        app.ui.input.clear();
                    } else if app.ui.input.is_empty() {
                        return Ok(());
                    } else {
                        app.ui.input.clear();
                        app.reset_command_selection();
                    }
                }
                KeyCode::Enter => {
                    if app.showing_command_popup() && app.ui.command_selection.is_some() {
                        app.apply_command_selection();
                    } else {
                        app.submit_message();
                    }
                }
                KeyCode::Tab => {
                    if app.showing_command_popup() && app.ui.command_selection.is_some() {
                        app.apply_command_selection();
                    } else {
                        app.next_tab();
                    }
                }
                KeyCode::Backspace => {
                    app.ui.input.pop();
                    app.reset_command_selection();
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if !app.complete_path() {
                        app.ui.status_message = Some("No matching path".to_string());
                    }
                }
                KeyCode::Char('v') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if let Ok(mut clipboard) = Clipboard::new() {
                        if let Ok(text) = clipboard.get_text() {
                            app.push_input(&text);
                        }
                    }
                }
                KeyCode::Char(c) => {
                    app.ui.input.push(c);
                    app.reset_command_selection();
                }
                KeyCode::Up => {
                    if app.showing_command_popup() {
                        app.command_select_up();
                    } else {
                        app.scroll_up();
                    }
                }
                KeyCode::Down => {
                    if app.showing_command_popup() {
                        app.command_select_down();
                    } else {
                        app.scroll_down();
                    }
                }
                KeyCode::F(3) => app.export(),
                _ => {}
            },
            Event::Paste(text) => app.push_input(&text),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => app.scroll_up(),
                MouseEventKind::ScrollDown => app.scroll_down(),
                _ => {}
            },
            _ => {}
        }
    }
}
