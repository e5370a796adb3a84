use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{CrosstermBackend, TestBackend};
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use termcade::app::{self, Report};
use termcade::config::{Cli, Config, GameKind};
use termcade::input::{ScriptedInput, TerminalInput};

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let config = Config::from_cli(&cli);

    let report = match &cli.replay {
        Some(path) => run_headless(cli.game, &config, path)?,
        None => run_terminal(cli.game, &config)?,
    };
    println!("{report}");
    Ok(())
}

// Logs go to a file only; stdout belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_terminal(kind: GameKind, config: &Config) -> Result<Report> {
    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err).context("failed to enter alternate screen");
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(err).context("failed to create terminal");
        }
    };

    let result = terminal
        .clear()
        .context("failed to clear terminal")
        .and_then(|()| app::launch(kind, config, &mut TerminalInput::new(), &mut terminal));

    // Restore terminal, even when the game failed
    let restored = restore_terminal(&mut terminal);
    let report = result?;
    restored?;
    Ok(report)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

fn run_headless(kind: GameKind, config: &Config, path: &Path) -> Result<Report> {
    let bytes = fs::read(path).with_context(|| format!("failed to read replay file {}", path.display()))?;
    let mut input = ScriptedInput::new(bytes);
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).context("failed to create off-screen terminal")?;
    app::launch(kind, config, &mut input, &mut terminal)
}
