use crate::domain::{DateRange, Entry, EntryId, EntryUpdate, NewEntry};
use anyhow::Result;
use chrono::NaiveDate;

/// Storage contract for journal entries.
///
/// Implementations own the one-entry-per-date invariant and the timestamps:
/// `created_at` is set on first write, `updated_at` on every write.
pub trait EntryRepository {
    /// Every stored entry, in no particular order.
    fn load_all(&self) -> Result<Vec<Entry>>;

    /// Entries whose date falls inside the inclusive range.
    fn load_range(&self, range: &DateRange) -> Result<Vec<Entry>>;

    fn find_by_date(&self, date: NaiveDate) -> Result<Option<Entry>>;

    fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>>;

    /// Insert the entry for `entry.date`, or overwrite the existing one.
    fn upsert(&self, entry: NewEntry) -> Result<Entry>;

    /// Fails with `JournalError::EntryNotFound` when no entry has that id.
    fn update(&self, update: EntryUpdate) -> Result<Entry>;

    fn count(&self) -> Result<u64>;
}
