use chrono::NaiveDateTime;

use crate::error::{DescriptionError, LineError};

/// Format of due dates, both on disk and in the add prompt.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// [`DUE_DATE_FORMAT`] as shown to users.
pub const DUE_DATE_HINT: &str = "YYYY-MM-DD HH:MM:SS";

/// Separator between the description and the due date in the backing file.
pub const FIELD_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub due_date: NaiveDateTime,
}

impl Task {
    pub fn new(description: impl Into<String>, due_date: NaiveDateTime) -> Self {
        Self {
            description: description.into(),
            due_date,
        }
    }

    /// True when this task is the exact (description, due date) pair.
    pub fn matches(&self, description: &str, due_date: NaiveDateTime) -> bool {
        self.description == description && self.due_date == due_date
    }

    /// Encodes the task as one line of the backing file, without the newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}{}{}",
            self.description,
            FIELD_SEPARATOR,
            format_due_date(self.due_date)
        )
    }

    /// Decodes one line of the backing file.
    pub fn from_line(line: &str) -> Result<Self, LineError> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let [description, due_date] = fields.as_slice() else {
            return Err(LineError::FieldCount(fields.len()));
        };
        let due_date = parse_due_date(due_date.trim())?;
        Ok(Self::new(*description, due_date))
    }
}

pub fn parse_due_date(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, DUE_DATE_FORMAT)
}

pub fn format_due_date(due_date: NaiveDateTime) -> String {
    due_date.format(DUE_DATE_FORMAT).to_string()
}

/// Checks that a description can be written to a single line of the backing file.
pub fn validate_description(description: &str) -> Result<(), DescriptionError> {
    if description.trim().is_empty() {
        return Err(DescriptionError::Empty);
    }
    if description.contains(FIELD_SEPARATOR) {
        return Err(DescriptionError::ContainsSeparator);
    }
    if description.contains(['\n', '\r']) {
        return Err(DescriptionError::ContainsLineBreak);
    }
    Ok(())
}
