use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::task::{validate_description, Task};

/// Owns the task list and the flat file backing it.
///
/// Every mutation rewrites the whole file. The rewrite is not atomic: a crash
/// in the middle of [`TaskStore::save`] can leave a truncated file behind.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Opens the store at `path`, loading whatever tasks it already holds.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.into(),
            tasks: Vec::new(),
        };
        store.tasks = store.load()?;
        info!(path = %store.path.display(), tasks = store.tasks.len(), "Loaded tasks");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Reads every task from the backing file.
    ///
    /// A missing file is an empty list. Any malformed line fails the whole load.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut tasks = Vec::new();
        for (index, line) in data.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let task = Task::from_line(line).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                line: index + 1,
                source,
            })?;
            tasks.push(task);
        }
        Ok(tasks)
    }

    /// Overwrites the backing file with the in-memory tasks, in order.
    pub fn save(&self) -> Result<(), StoreError> {
        self.write_lines().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), tasks = self.tasks.len(), "Saved tasks");
        Ok(())
    }

    fn write_lines(&self) -> io::Result<()> {
        let mut writer = BufWriter::new(fs::File::create(&self.path)?);
        for task in &self.tasks {
            writeln!(writer, "{}", task.to_line())?;
        }
        writer.flush()
    }

    pub fn add(
        &mut self,
        description: impl Into<String>,
        due_date: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let description = description.into();
        validate_description(&description)?;

        self.tasks.push(Task::new(description, due_date));
        if let Err(err) = self.save() {
            self.tasks.pop();
            return Err(err);
        }
        info!(tasks = self.tasks.len(), "Added task");
        Ok(())
    }

    /// Removes every task with exactly this description and due date.
    ///
    /// Tasks have no identity beyond the pair, so duplicates are all removed.
    /// Returns how many tasks were removed.
    pub fn delete(
        &mut self,
        description: &str,
        due_date: NaiveDateTime,
    ) -> Result<usize, StoreError> {
        let previous = self.tasks.clone();
        self.tasks.retain(|task| !task.matches(description, due_date));
        let removed = previous.len() - self.tasks.len();

        if let Err(err) = self.save() {
            self.tasks = previous;
            return Err(err);
        }
        info!(removed, tasks = self.tasks.len(), "Deleted tasks");
        Ok(removed)
    }
}
