use crate::domain::EntryId;
use thiserror::Error;

/// Failures callers may want to tell apart; everything else is plain `anyhow`.
#[derive(Debug, Error, PartialEq)]
pub enum JournalError {
    #[error("entry with id {0} not found")]
    EntryNotFound(EntryId),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}
