use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tracing::{error, info};

use crate::panel::{SortColumn, TaskListPanel};
use crate::task::DUE_DATE_HINT;

/// What the user is currently interacting with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    AddDescription { input: String },
    AddDueDate { description: String, input: String },
    ConfirmDelete,
    Error(String),
}

/// Repeating timer driving the countdown refresh.
///
/// Owned by the [`App`]; it only fires from inside the event loop, so it
/// cannot outlive the view it updates.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    last: Instant,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// Time left until the next tick is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last))
    }

    /// Returns true and re-arms the timer if a tick is due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

pub struct App {
    pub panel: TaskListPanel,
    pub mode: Mode,
    pub status: String,
    pub should_quit: bool,
    ticker: Ticker,
}

impl App {
    pub fn new(panel: TaskListPanel, tick_interval: Duration) -> Self {
        Self {
            panel,
            mode: Mode::Normal,
            status: String::new(),
            should_quit: false,
            ticker: Ticker::new(tick_interval),
        }
    }

    pub fn tick_timeout(&self) -> Duration {
        self.ticker.timeout(Instant::now())
    }

    /// Recomputes countdowns if the tick interval has elapsed.
    pub fn on_tick(&mut self) {
        if self.ticker.fire(Instant::now()) {
            self.panel.tick();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match &mut self.mode {
            Mode::Normal => self.handle_normal_key(key.code),
            Mode::AddDescription { input } => match key.code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let description = std::mem::take(input);
                    self.mode = Mode::AddDueDate {
                        description,
                        input: String::new(),
                    };
                }
                KeyCode::Esc => self.cancel("Add cancelled"),
                _ => {}
            },
            Mode::AddDueDate { description, input } => match key.code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let description = std::mem::take(description);
                    let due_text = std::mem::take(input);
                    self.submit_add(&description, &due_text);
                }
                KeyCode::Esc => self.cancel("Add cancelled"),
                _ => {}
            },
            Mode::ConfirmDelete => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.cancel("Delete cancelled")
                }
                _ => {}
            },
            Mode::Error(_) => self.mode = Mode::Normal,
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('a') => self.add_task_interactive(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_task_interactive(),
            KeyCode::Char('r') => {
                self.panel.refresh();
                self.status = "Refreshed".to_string();
            }
            KeyCode::Char(c @ '1'..='4') => {
                let column = SortColumn::ALL[c as usize - '1' as usize];
                let descending = self.panel.activate_column(column);
                self.status = format!(
                    "Sorted by {} ({})",
                    column.title(),
                    if descending { "descending" } else { "ascending" }
                );
            }
            KeyCode::Down | KeyCode::Char('j') => self.panel.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.panel.select_previous(),
            KeyCode::Home | KeyCode::Char('g') => self.panel.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.panel.select_last(),
            _ => {}
        }
    }

    /// Starts the add flow: description prompt first, then the due date.
    pub fn add_task_interactive(&mut self) {
        self.mode = Mode::AddDescription {
            input: String::new(),
        };
    }

    /// Asks for confirmation before deleting the selected task.
    pub fn delete_task_interactive(&mut self) {
        if self.panel.selected_row().is_some() {
            self.mode = Mode::ConfirmDelete;
        }
    }

    fn submit_add(&mut self, description: &str, due_text: &str) {
        match self.panel.add_task(description, due_text) {
            Ok(()) => {
                self.mode = Mode::Normal;
                self.status = format!("Added \"{description}\"");
            }
            Err(err) => {
                error!(error = %err, "Failed to add task");
                self.mode = Mode::Error(err.to_string());
            }
        }
    }

    fn confirm_delete(&mut self) {
        match self.panel.delete_selected() {
            Ok(Some(removed)) => {
                info!(removed, "Deleted selected task");
                self.mode = Mode::Normal;
                self.status = match removed {
                    1 => "Deleted 1 task".to_string(),
                    n => format!("Deleted {n} tasks"),
                };
            }
            Ok(None) => self.mode = Mode::Normal,
            Err(err) => {
                error!(error = %err, "Failed to delete task");
                self.mode = Mode::Error(err.to_string());
            }
        }
    }

    fn cancel(&mut self, message: &str) {
        self.mode = Mode::Normal;
        self.status = message.to_string();
    }

    /// Prompt title and current input for the add popups.
    pub fn prompt(&self) -> Option<(String, &str)> {
        match &self.mode {
            Mode::AddDescription { input } => Some(("Enter task description".to_string(), input)),
            Mode::AddDueDate { input, .. } => Some((
                format!("Enter due date ({DUE_DATE_HINT})"),
                input.as_str(),
            )),
            _ => None,
        }
    }
}
