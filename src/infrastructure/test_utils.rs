/// Test utilities for DuckDB-backed tests
///
/// `TestStorage` opens a fresh on-disk database inside a temporary directory,
/// so tests that need a real file (reopening, migrations) stay isolated and
/// clean up after themselves. Tests that only need a store can use
/// `DuckDbStorage::in_memory()` directly.
#[cfg(test)]
pub mod test_harness {
    use crate::domain::{Entry, NewEntry};
    use crate::infrastructure::{DuckDbStorage, EntryRepository};
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub struct TestStorage {
        pub storage: DuckDbStorage,
        _temp_dir: TempDir, // Keep temp dir alive
    }

    impl TestStorage {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp directory");
            let db_path = temp_dir.path().join("test.db");

            let storage =
                DuckDbStorage::new(&db_path).expect("Failed to initialize test DuckDB storage");

            Self {
                storage,
                _temp_dir: temp_dir,
            }
        }

        pub fn storage(&self) -> &DuckDbStorage {
            &self.storage
        }

        pub fn db_path(&self) -> PathBuf {
            self._temp_dir.path().join("test.db")
        }

        pub fn create_sample_entry(&self, date: NaiveDate) -> Result<Entry> {
            self.storage.upsert(NewEntry::counted(
                date,
                "Woke up early and wrote before coffee.",
            ))
        }

        /// Saves one entry per day for `days` days ending at `last`.
        pub fn create_run(&self, last: NaiveDate, days: u32) -> Result<Vec<Entry>> {
            (0..days)
                .map(|offset| {
                    let date = last - chrono::Duration::days(i64::from(offset));
                    self.create_sample_entry(date)
                })
                .collect()
        }
    }

    /// Run a test with fresh test storage
    pub fn with_test_storage<F, R>(test_fn: F) -> R
    where
        F: FnOnce(&TestStorage) -> R,
    {
        let test_storage = TestStorage::new();
        test_fn(&test_storage)
    }
}

#[cfg(test)]
mod tests {
    use super::test_harness::*;
    use crate::domain::StreakAnalyzer;
    use crate::infrastructure::EntryRepository;
    use chrono::NaiveDate;

    #[test]
    fn test_harness_basic_functionality() {
        let test_storage = TestStorage::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert!(test_storage.storage().find_by_date(date).unwrap().is_none());

        let entry = test_storage.create_sample_entry(date).unwrap();
        assert_eq!(entry.word_count, 7);

        let loaded = test_storage.storage().find_by_date(date).unwrap().unwrap();
        assert_eq!(loaded, entry);
    }

    #[test]
    fn test_harness_with_function() {
        with_test_storage(|test_storage| {
            let last = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
            test_storage.create_run(last, 4).unwrap();

            let entries = test_storage.storage().load_all().unwrap();
            let info = StreakAnalyzer::compute_streak_info(&entries);
            assert_eq!(info.current_streak, 4);
            assert_eq!(info.last_entry_date, Some(last));
        });
    }

    #[test]
    fn test_harness_isolation() {
        let test_storage1 = TestStorage::new();
        let test_storage2 = TestStorage::new();

        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        test_storage1.create_sample_entry(date).unwrap();

        assert!(test_storage2.storage().find_by_date(date).unwrap().is_none());
    }
}
