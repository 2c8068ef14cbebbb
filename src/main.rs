use std::io::{self, IsTerminal};
use std::panic;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskclock::config::Cli;
use taskclock::{ui, App, Config, TaskListPanel, TaskStore};

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::from(Cli::parse());

    // Load before touching the terminal so a corrupt file is reported plainly.
    let store = TaskStore::open(&config.tasks_path)
        .with_context(|| format!("Failed to load tasks from {}", config.tasks_path.display()))?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("taskclock requires an interactive terminal (TTY)");
    }

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(TaskListPanel::new(store), config.tick_interval);
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("Terminal UI failed")
}

/// Logs go to stderr and only when `RUST_LOG` is set; stdout belongs to the TUI.
fn init_logging() {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .with(filter)
            .init();
    }
}
