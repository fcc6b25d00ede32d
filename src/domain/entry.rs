use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type EntryId = i64;

/// Words needed to fill the three pages of a day's writing.
pub const DAILY_WORD_TARGET: u32 = 750;

/// Rough words-per-page figure used for display.
pub const WORDS_PER_PAGE: u32 = 250;

// ============================================================================
// Entry
// ============================================================================

/// A single day's writing as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub content: String,
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// True if the content holds anything besides whitespace.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    pub fn pages(&self) -> f64 {
        f64::from(self.word_count) / f64::from(WORDS_PER_PAGE)
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.word_count)
    }
}

/// Write payload for the upsert-by-date path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub content: String,
    pub word_count: u32,
}

impl NewEntry {
    pub fn new(date: NaiveDate, content: impl Into<String>, word_count: u32) -> Self {
        Self {
            date,
            content: content.into(),
            word_count,
        }
    }

    /// Builds a payload whose word count is taken from the text itself.
    pub fn counted(date: NaiveDate, content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = count_words(&content);
        Self {
            date,
            content,
            word_count,
        }
    }
}

/// Write payload for updating an existing entry by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub id: EntryId,
    pub content: String,
    pub word_count: u32,
}

impl EntryUpdate {
    pub fn counted(id: EntryId, content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = count_words(&content);
        Self {
            id,
            content,
            word_count,
        }
    }
}

// ============================================================================
// Derived views
// ============================================================================

/// Row of the entry list; carries no content, only whether there is any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryListItem {
    pub id: EntryId,
    pub date: NaiveDate,
    pub word_count: u32,
    pub has_content: bool,
}

impl From<&Entry> for EntryListItem {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            word_count: entry.word_count,
            has_content: entry.has_content(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub total_days: u32,
    pub last_entry_date: Option<NaiveDate>,
}

// ============================================================================
// Word counting
// ============================================================================

pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Share of the daily target reached, capped at 100.
pub fn progress_percent(word_count: u32) -> f64 {
    (f64::from(word_count) / f64::from(DAILY_WORD_TARGET) * 100.0).min(100.0)
}
