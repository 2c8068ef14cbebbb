//! Table model for the task list.
//!
//! The panel mirrors the store as a list of display rows. Rows are rebuilt
//! from the store after every mutation and their countdowns are recomputed
//! on every tick without going back to the store.

use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::countdown::Countdown;
use crate::error::PanelError;
use crate::task::{format_due_date, parse_due_date, Task};
use crate::task_store::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Description,
    DueDate,
    Countdown,
    RemainingSeconds,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Description,
        SortColumn::DueDate,
        SortColumn::Countdown,
        SortColumn::RemainingSeconds,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SortColumn::Description => "Description",
            SortColumn::DueDate => "Due Date",
            SortColumn::Countdown => "Countdown",
            SortColumn::RemainingSeconds => "Remaining Seconds",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    // Countdown text and remaining seconds carry the same value, so both
    // columns order by the numeric key.
    fn compare(self, a: &TaskRow, b: &TaskRow) -> Ordering {
        match self {
            SortColumn::Description => a.description.cmp(&b.description),
            SortColumn::DueDate => a.due_date.cmp(&b.due_date),
            SortColumn::Countdown | SortColumn::RemainingSeconds => {
                a.countdown.remaining_seconds.cmp(&b.countdown.remaining_seconds)
            }
        }
    }
}

/// One displayed row of the task table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub description: String,
    pub due_date: NaiveDateTime,
    pub countdown: Countdown,
}

impl TaskRow {
    fn new(task: &Task, now: NaiveDateTime) -> Self {
        Self {
            description: task.description.clone(),
            due_date: task.due_date,
            countdown: Countdown::between(now, task.due_date),
        }
    }

    pub fn due_date_text(&self) -> String {
        format_due_date(self.due_date)
    }

    pub fn is_overdue(&self) -> bool {
        self.countdown.is_overdue()
    }
}

pub struct TaskListPanel {
    store: TaskStore,
    rows: Vec<TaskRow>,
    selected: Option<usize>,
    sort: Option<(SortColumn, bool)>,
    next_descending: [bool; 4],
}

impl TaskListPanel {
    pub fn new(store: TaskStore) -> Self {
        let mut panel = Self {
            store,
            rows: Vec::new(),
            selected: None,
            sort: None,
            next_descending: [false; 4],
        };
        panel.refresh();
        panel
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// The active sort column and whether it is descending.
    pub fn sort(&self) -> Option<(SortColumn, bool)> {
        self.sort
    }

    pub fn refresh(&mut self) {
        self.refresh_at(now());
    }

    /// Rebuilds every row from the store, keeping the active sort.
    pub fn refresh_at(&mut self, now: NaiveDateTime) {
        self.rows = self
            .store
            .tasks()
            .iter()
            .map(|task| TaskRow::new(task, now))
            .collect();

        if let Some((column, descending)) = self.sort {
            self.sort_rows(column, descending);
        }
        self.selected = match self.selected {
            _ if self.rows.is_empty() => None,
            Some(i) => Some(i.min(self.rows.len() - 1)),
            None => Some(0),
        };
    }

    pub fn tick(&mut self) {
        self.tick_at(now());
    }

    /// Recomputes the countdown of every displayed row.
    pub fn tick_at(&mut self, now: NaiveDateTime) {
        for row in &mut self.rows {
            row.countdown = Countdown::between(now, row.due_date);
        }
    }

    /// Stable-sorts the displayed rows, keeping the selection on the same row.
    pub fn sort_by(&mut self, column: SortColumn, descending: bool) {
        let selected = self.selected_row().cloned();
        self.sort = Some((column, descending));
        self.sort_rows(column, descending);
        if let Some(selected) = selected {
            self.selected = self.rows.iter().position(|row| *row == selected);
        }
        debug!(column = column.title(), descending, "Sorted task list");
    }

    fn sort_rows(&mut self, column: SortColumn, descending: bool) {
        self.rows.sort_by(|a, b| {
            let ordering = column.compare(a, b);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    /// Sorts by `column`, alternating direction on each activation of that column.
    ///
    /// Returns whether the resulting order is descending.
    pub fn activate_column(&mut self, column: SortColumn) -> bool {
        let descending = self.next_descending[column.index()];
        self.sort_by(column, descending);
        self.next_descending[column.index()] = !descending;
        descending
    }

    /// Adds a task from user input. Nothing changes if the due date does not parse.
    pub fn add_task(&mut self, description: &str, due_text: &str) -> Result<(), PanelError> {
        let due_date = parse_due_date(due_text).map_err(|source| {
            warn!(input = due_text, "Rejected due date");
            PanelError::InvalidDueDate {
                input: due_text.to_string(),
                source,
            }
        })?;
        self.store.add(description, due_date)?;
        self.refresh();
        Ok(())
    }

    /// Deletes every task matching the selected row.
    ///
    /// Returns `Ok(None)` when nothing is selected, otherwise the number of
    /// tasks removed.
    pub fn delete_selected(&mut self) -> Result<Option<usize>, PanelError> {
        let Some(row) = self.selected_row() else {
            return Ok(None);
        };
        let description = row.description.clone();
        let due_date = row.due_date;

        let removed = self.store.delete(&description, due_date)?;
        self.refresh();
        Ok(Some(removed))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&TaskRow> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.selected = Some(self.rows.len() - 1);
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn panel_with(dir: &TempDir, tasks: &[(&str, NaiveDateTime)]) -> TaskListPanel {
        let mut store = TaskStore::open(dir.path().join("tasks.txt")).unwrap();
        for (description, due_date) in tasks {
            store.add(*description, *due_date).unwrap();
        }
        TaskListPanel::new(store)
    }

    fn descriptions(panel: &TaskListPanel) -> Vec<&str> {
        panel.rows().iter().map(|r| r.description.as_str()).collect()
    }

    #[test]
    fn test_rows_follow_store_order() {
        let dir = TempDir::new().unwrap();
        let panel = panel_with(
            &dir,
            &[
                ("Pay rent", at(2025, 1, 5, 9, 0, 0)),
                ("Buy milk", at(2025, 1, 1, 10, 0, 0)),
            ],
        );
        assert_eq!(descriptions(&panel), vec!["Pay rent", "Buy milk"]);
        assert_eq!(panel.selected(), Some(0));
        assert_eq!(panel.rows()[0].due_date_text(), "2025-01-05 09:00:00");
    }

    #[test]
    fn test_refresh_computes_countdowns() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(
            &dir,
            &[
                ("Buy milk", at(2025, 1, 1, 10, 0, 0)),
                ("Pay rent", at(2025, 1, 5, 9, 0, 0)),
            ],
        );
        panel.refresh_at(at(2025, 1, 1, 9, 0, 0));

        let rows = panel.rows();
        assert_eq!(rows[0].countdown.text, "0d 1h 0m 0s");
        assert_eq!(rows[0].countdown.remaining_seconds, 3_600);
        assert_eq!(rows[1].countdown.text, "4d 0h 0m 0s");
        assert!(!rows[0].is_overdue());
    }

    #[test]
    fn test_tick_updates_rows_without_requerying_store() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(&dir, &[("Buy milk", at(2025, 1, 1, 10, 0, 0))]);
        panel.refresh_at(at(2025, 1, 1, 9, 59, 58));
        assert_eq!(panel.rows()[0].countdown.remaining_seconds, 2);

        panel.tick_at(at(2025, 1, 1, 10, 0, 3));
        assert_eq!(panel.rows()[0].countdown.remaining_seconds, -3);
        assert_eq!(panel.rows()[0].countdown.text, "0d 0h 0m 0s");
        assert!(panel.rows()[0].is_overdue());
        assert_eq!(panel.rows().len(), 1);
    }

    #[test]
    fn test_sort_by_due_date_scenario() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(
            &dir,
            &[
                ("Pay rent", at(2025, 1, 5, 9, 0, 0)),
                ("Buy milk", at(2025, 1, 1, 10, 0, 0)),
            ],
        );
        panel.sort_by(SortColumn::DueDate, false);
        assert_eq!(descriptions(&panel), vec!["Buy milk", "Pay rent"]);
    }

    #[test]
    fn test_ascending_and_descending_are_reverses() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(
            &dir,
            &[
                ("c", at(2025, 3, 1, 0, 0, 0)),
                ("a", at(2025, 1, 1, 0, 0, 0)),
                ("d", at(2025, 4, 1, 0, 0, 0)),
                ("b", at(2025, 2, 1, 0, 0, 0)),
            ],
        );
        panel.sort_by(SortColumn::DueDate, false);
        let ascending: Vec<TaskRow> = panel.rows().to_vec();
        panel.sort_by(SortColumn::DueDate, true);
        let mut descending: Vec<TaskRow> = panel.rows().to_vec();
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_countdown_and_remaining_seconds_sort_alike() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(
            &dir,
            &[
                ("later", at(2025, 1, 3, 0, 0, 0)),
                ("overdue", at(2024, 12, 1, 0, 0, 0)),
                ("soon", at(2025, 1, 1, 0, 0, 30)),
            ],
        );
        panel.refresh_at(at(2025, 1, 1, 0, 0, 0));

        panel.sort_by(SortColumn::Countdown, false);
        assert_eq!(descriptions(&panel), vec!["overdue", "soon", "later"]);
        panel.sort_by(SortColumn::RemainingSeconds, true);
        assert_eq!(descriptions(&panel), vec!["later", "soon", "overdue"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let dir = TempDir::new().unwrap();
        let due = at(2025, 1, 1, 0, 0, 0);
        let mut panel = panel_with(&dir, &[("first", due), ("second", due), ("third", due)]);
        panel.sort_by(SortColumn::DueDate, false);
        assert_eq!(descriptions(&panel), vec!["first", "second", "third"]);
        panel.sort_by(SortColumn::DueDate, true);
        assert_eq!(descriptions(&panel), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_activate_column_toggles_per_column() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(
            &dir,
            &[
                ("b", at(2025, 1, 1, 0, 0, 0)),
                ("a", at(2025, 1, 2, 0, 0, 0)),
            ],
        );

        assert!(!panel.activate_column(SortColumn::Description));
        assert_eq!(descriptions(&panel), vec!["a", "b"]);
        assert!(panel.activate_column(SortColumn::Description));
        assert_eq!(descriptions(&panel), vec!["b", "a"]);

        // Another column starts ascending regardless of the first one.
        assert!(!panel.activate_column(SortColumn::DueDate));
        assert_eq!(panel.sort(), Some((SortColumn::DueDate, false)));
        assert!(!panel.activate_column(SortColumn::Description));
    }

    #[test]
    fn test_selection_follows_row_through_sort() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(
            &dir,
            &[
                ("b", at(2025, 1, 1, 0, 0, 0)),
                ("a", at(2025, 1, 2, 0, 0, 0)),
            ],
        );
        assert_eq!(panel.selected_row().unwrap().description, "b");
        panel.sort_by(SortColumn::Description, false);
        assert_eq!(panel.selected(), Some(1));
        assert_eq!(panel.selected_row().unwrap().description, "b");
    }

    #[test]
    fn test_add_task_refreshes_and_keeps_sort() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(&dir, &[("b", at(2025, 1, 1, 0, 0, 0))]);
        panel.sort_by(SortColumn::Description, false);

        panel.add_task("a", "2025-06-01 12:00:00").unwrap();
        assert_eq!(descriptions(&panel), vec!["a", "b"]);
        assert_eq!(panel.store().load().unwrap().len(), 2);
    }

    #[test]
    fn test_add_task_rejects_bad_due_date() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(&dir, &[]);

        let err = panel.add_task("Buy milk", "01/01/2025").unwrap_err();
        assert!(matches!(err, PanelError::InvalidDueDate { .. }));
        assert!(panel.rows().is_empty());
        assert!(!panel.store().path().exists());
    }

    #[test]
    fn test_add_task_rejects_padded_due_date() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(&dir, &[]);

        let err = panel.add_task("Buy milk", "  2025-01-01 10:00:00  ").unwrap_err();
        assert!(matches!(err, PanelError::InvalidDueDate { .. }));
        assert!(panel.rows().is_empty());
    }

    #[test]
    fn test_delete_selected_without_rows_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut panel = panel_with(&dir, &[]);
        assert_eq!(panel.delete_selected().unwrap(), None);
    }

    #[test]
    fn test_delete_selected_removes_duplicates() {
        let dir = TempDir::new().unwrap();
        let due = at(2025, 1, 1, 10, 0, 0);
        let mut panel = panel_with(
            &dir,
            &[("Buy milk", due), ("Pay rent", at(2025, 1, 5, 9, 0, 0)), ("Buy milk", due)],
        );

        assert_eq!(panel.delete_selected().unwrap(), Some(2));
        assert_eq!(descriptions(&panel), vec!["Pay rent"]);
        assert_eq!(panel.selected(), Some(0));
    }

    #[test]
    fn test_selection_movement() {
        let dir = TempDir::new().unwrap();
        let base = at(2025, 1, 1, 0, 0, 0);
        let mut panel = panel_with(
            &dir,
            &[
                ("a", base),
                ("b", base + TimeDelta::hours(1)),
                ("c", base + TimeDelta::hours(2)),
            ],
        );

        panel.select_previous();
        assert_eq!(panel.selected(), Some(0));
        panel.select_next();
        panel.select_next();
        panel.select_next();
        assert_eq!(panel.selected(), Some(2));
        panel.select_first();
        assert_eq!(panel.selected(), Some(0));
        panel.select_last();
        assert_eq!(panel.selected(), Some(2));

        panel.delete_selected().unwrap();
        assert_eq!(panel.selected(), Some(1));
    }
}
