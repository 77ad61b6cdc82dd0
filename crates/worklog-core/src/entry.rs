use crate::error::{Result, WorklogError};

/// Up to `max` trimmed, non-empty achievement lines submitted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBatch {
    entries: Vec<String>,
}

impl EntryBatch {
    /// Trim every entry and drop the blank ones, then check the count.
    pub fn new<I, S>(entries: I, max: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if entries.is_empty() {
            return Err(WorklogError::EmptyBatch);
        }
        if entries.len() > max {
            return Err(WorklogError::TooManyEntries {
                got: entries.len(),
                max,
            });
        }
        Ok(Self { entries })
    }

    /// Split free text on newlines, one entry per non-blank line.
    pub fn from_lines(text: &str, max: usize) -> Result<Self> {
        Self::new(text.lines(), max)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
