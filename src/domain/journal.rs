use crate::domain::{
    DateRange, Entry, EntryListItem, EntryUpdate, NewEntry, StreakAnalyzer, StreakInfo,
};
use crate::infrastructure::EntryRepository;
use anyhow::Result;
use chrono::{Local, NaiveDate};

/// Query and write surface over an entry store.
pub struct Journal {
    repository: Box<dyn EntryRepository>,
}

impl Journal {
    pub fn new(repository: Box<dyn EntryRepository>) -> Self {
        Self { repository }
    }

    pub fn streak_info(&self) -> Result<StreakInfo> {
        let entries = self.repository.load_all()?;
        let duplicates = StreakAnalyzer::duplicate_dates(&entries);
        if !duplicates.is_empty() {
            log::warn!(
                "store returned more than one entry for {} date(s): {:?}",
                duplicates.len(),
                duplicates
            );
        }

        let info = StreakAnalyzer::compute_streak_info(&entries);
        log::debug!(
            "streak {} over {} day(s), last entry {:?}",
            info.current_streak,
            info.total_days,
            info.last_entry_date
        );
        Ok(info)
    }

    pub fn list_entries(&self, range: DateRange) -> Result<Vec<EntryListItem>> {
        let entries = if range.is_unbounded() {
            self.repository.load_all()?
        } else {
            self.repository.load_range(&range)?
        };
        Ok(StreakAnalyzer::classify_for_list(&entries, &range))
    }

    pub fn get_entry(&self, date: NaiveDate) -> Result<Option<Entry>> {
        self.repository.find_by_date(date)
    }

    pub fn todays_entry(&self) -> Result<Option<Entry>> {
        self.get_entry(today())
    }

    /// Creates the entry for the payload's date, or replaces its content.
    pub fn save_entry(&self, entry: NewEntry) -> Result<Entry> {
        let saved = self.repository.upsert(entry)?;
        log::info!(
            "saved entry {} for {} ({} words)",
            saved.id,
            saved.date,
            saved.word_count
        );
        Ok(saved)
    }

    pub fn update_entry(&self, update: EntryUpdate) -> Result<Entry> {
        let updated = self.repository.update(update)?;
        log::info!("updated entry {} for {}", updated.id, updated.date);
        Ok(updated)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
