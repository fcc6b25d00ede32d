use crate::application::Config;
use crate::domain::{
    DateRange, Entry, EntryId, EntryListItem, EntryUpdate, Journal, NewEntry, StreakInfo,
};
use crate::infrastructure::DuckDbStorage;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use std::io::Write;
use std::process::Command;

pub struct PagesApp {
    journal: Journal,
    config: Config,
}

impl PagesApp {
    pub fn new(config: Config) -> Result<Self> {
        let storage = DuckDbStorage::new(&config.db_path).with_context(|| {
            format!("Failed to open journal at {}", config.db_path.display())
        })?;
        log::debug!("using {}", storage.backend_info());

        Ok(Self {
            journal: Journal::new(Box::new(storage)),
            config,
        })
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Saves `text` as the entry for `date`, or opens the editor on the
    /// day's current content when no text is given.
    pub fn write_entry(&self, date: NaiveDate, text: Option<String>) -> Result<Entry> {
        let content = match text {
            Some(text) => text,
            None => {
                let existing = self
                    .journal
                    .get_entry(date)?
                    .map(|entry| entry.content)
                    .unwrap_or_default();
                self.edit_in_editor(&existing)?
            }
        };

        self.journal.save_entry(NewEntry::counted(date, content))
    }

    pub fn update_entry(&self, id: EntryId, text: String) -> Result<Entry> {
        self.journal.update_entry(EntryUpdate::counted(id, text))
    }

    pub fn entry_for(&self, date: NaiveDate) -> Result<Option<Entry>> {
        self.journal.get_entry(date)
    }

    pub fn list(&self, range: DateRange) -> Result<Vec<EntryListItem>> {
        self.journal.list_entries(range)
    }

    pub fn streak(&self) -> Result<StreakInfo> {
        self.journal.streak_info()
    }

    fn edit_in_editor(&self, initial: &str) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("pages-")
            .suffix(".md")
            .tempfile()
            .context("Failed to create temporary file for editing")?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        let mut parts = self.config.editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("No editor configured; set $EDITOR"))?;

        let status = Command::new(program)
            .args(parts)
            .arg(file.path())
            .status()
            .with_context(|| format!("Failed to launch editor '{}'", self.config.editor))?;

        if !status.success() {
            return Err(anyhow!("Editor exited with error: {}", status));
        }

        std::fs::read_to_string(file.path()).context("Failed to read back edited entry")
    }
}
