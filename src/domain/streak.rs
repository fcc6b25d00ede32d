use crate::domain::{DateRange, Entry, EntryListItem, StreakInfo};
use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;

/// Stateless analysis over a snapshot of entries.
///
/// Callers hand over entries already read from the store. The store is
/// expected to hold at most one entry per date; if a snapshot breaks that,
/// each date is still counted once.
pub struct StreakAnalyzer;

impl StreakAnalyzer {
    /// Streak ending at the most recent entry, plus totals. Always pass the
    /// full history: a filtered snapshot yields a filtered streak.
    pub fn compute_streak_info(entries: &[Entry]) -> StreakInfo {
        let mut days: Vec<i32> = entries.iter().map(|e| day_index(e.date)).collect();
        days.sort_unstable_by_key(|&day| Reverse(day));
        days.dedup();

        let Some(&latest) = days.first() else {
            return StreakInfo::default();
        };

        let current_streak = days
            .iter()
            .zip((0..).map(|offset| latest - offset))
            .take_while(|(day, expected)| *day == expected)
            .count();

        StreakInfo {
            current_streak: current_streak as u32,
            total_days: days.len() as u32,
            last_entry_date: NaiveDate::from_num_days_from_ce_opt(latest),
        }
    }

    /// List rows for the entries inside `range`, most recent first.
    pub fn classify_for_list(entries: &[Entry], range: &DateRange) -> Vec<EntryListItem> {
        let mut items: Vec<EntryListItem> = entries
            .iter()
            .filter(|entry| range.contains(entry.date))
            .map(EntryListItem::from)
            .collect();
        items.sort_by_key(|item| Reverse(item.date));
        items
    }

    /// Dates that occur more than once in the snapshot, ascending.
    pub fn duplicate_dates(entries: &[Entry]) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        dates.sort_unstable();
        let mut duplicates: Vec<NaiveDate> = dates
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        duplicates
    }
}

// Consecutive calendar days map to consecutive integers.
fn day_index(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry_with(id: i64, date: NaiveDate, content: &str, word_count: u32) -> Entry {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 6, 30, 0).unwrap();
        Entry {
            id,
            date,
            content: content.to_string(),
            word_count,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn entries(dates: &[NaiveDate]) -> Vec<Entry> {
        dates
            .iter()
            .enumerate()
            .map(|(i, &date)| entry_with(i as i64 + 1, date, "written", 1))
            .collect()
    }

    fn january(days: &[u32]) -> Vec<Entry> {
        entries(&days.iter().map(|&day| d(2024, 1, day)).collect::<Vec<_>>())
    }

    #[test]
    fn test_empty_history() {
        let info = StreakAnalyzer::compute_streak_info(&[]);
        assert_eq!(
            info,
            StreakInfo {
                current_streak: 0,
                total_days: 0,
                last_entry_date: None,
            }
        );
    }

    #[test]
    fn test_single_entry() {
        let info = StreakAnalyzer::compute_streak_info(&january(&[20]));
        assert_eq!(info.current_streak, 1);
        assert_eq!(info.total_days, 1);
        assert_eq!(info.last_entry_date, Some(d(2024, 1, 20)));
    }

    #[test]
    fn test_five_consecutive_days() {
        let info = StreakAnalyzer::compute_streak_info(&january(&[11, 12, 13, 14, 15]));
        assert_eq!(info.current_streak, 5);
        assert_eq!(info.total_days, 5);
        assert_eq!(info.last_entry_date, Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_gap_breaks_streak() {
        let info = StreakAnalyzer::compute_streak_info(&january(&[10, 11, 13, 14, 15]));
        assert_eq!(info.current_streak, 3);
        assert_eq!(info.total_days, 5);
        assert_eq!(info.last_entry_date, Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_isolated_days() {
        let info = StreakAnalyzer::compute_streak_info(&january(&[1, 3, 6, 10]));
        assert_eq!(info.current_streak, 1);
        assert_eq!(info.total_days, 4);
        assert_eq!(info.last_entry_date, Some(d(2024, 1, 10)));
    }

    #[test]
    fn test_older_run_is_not_examined() {
        // A longer run before the break does not count.
        let info =
            StreakAnalyzer::compute_streak_info(&january(&[1, 2, 3, 4, 5, 6, 7, 9, 20, 21]));
        assert_eq!(info.current_streak, 2);
        assert_eq!(info.total_days, 10);
    }

    #[test]
    fn test_streak_crosses_month_and_year_boundaries() {
        let info = StreakAnalyzer::compute_streak_info(&entries(&[
            d(2023, 12, 30),
            d(2023, 12, 31),
            d(2024, 1, 1),
            d(2024, 1, 31),
            d(2024, 2, 1),
        ]));
        assert_eq!(info.current_streak, 2);

        let info = StreakAnalyzer::compute_streak_info(&entries(&[
            d(2023, 12, 30),
            d(2023, 12, 31),
            d(2024, 1, 1),
        ]));
        assert_eq!(info.current_streak, 3);
    }

    #[test]
    fn test_leap_day_is_a_day() {
        let run = [d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)];
        assert_eq!(
            StreakAnalyzer::compute_streak_info(&entries(&run)).current_streak,
            3
        );

        let skipped = [d(2024, 2, 28), d(2024, 3, 1)];
        assert_eq!(
            StreakAnalyzer::compute_streak_info(&entries(&skipped)).current_streak,
            1
        );
    }

    #[test]
    fn test_streak_in_the_past_is_still_reported() {
        let info = StreakAnalyzer::compute_streak_info(&entries(&[
            d(2001, 3, 1),
            d(2001, 3, 2),
            d(2001, 3, 3),
        ]));
        assert_eq!(info.current_streak, 3);
        assert_eq!(info.last_entry_date, Some(d(2001, 3, 3)));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let sorted = january(&[10, 11, 13, 14, 15]);
        let expected = StreakAnalyzer::compute_streak_info(&sorted);

        let mut reversed = sorted.clone();
        reversed.reverse();
        assert_eq!(StreakAnalyzer::compute_streak_info(&reversed), expected);

        let mut rotated = sorted.clone();
        rotated.rotate_left(2);
        assert_eq!(StreakAnalyzer::compute_streak_info(&rotated), expected);

        let shuffled = january(&[13, 10, 15, 11, 14]);
        assert_eq!(StreakAnalyzer::compute_streak_info(&shuffled), expected);
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        let snapshot = january(&[13, 14, 14, 15, 15]);
        let info = StreakAnalyzer::compute_streak_info(&snapshot);
        assert_eq!(info.current_streak, 3);
        assert_eq!(info.total_days, 3);
        assert_eq!(
            StreakAnalyzer::duplicate_dates(&snapshot),
            vec![d(2024, 1, 14), d(2024, 1, 15)]
        );
        assert!(StreakAnalyzer::duplicate_dates(&january(&[1, 2])).is_empty());
    }

    #[test]
    fn test_streak_never_exceeds_total() {
        let cases: [&[u32]; 5] = [&[1], &[1, 2], &[1, 3], &[5, 4, 3, 1], &[31, 30, 2, 1]];
        for days in cases {
            let info = StreakAnalyzer::compute_streak_info(&january(days));
            assert!(info.current_streak <= info.total_days, "{days:?}");
            assert!(info.current_streak >= 1);
        }
    }

    #[test]
    fn test_run_of_k_days_ending_at_latest() {
        for k in 1..=40u32 {
            let start = d(2024, 1, 1);
            let dates: Vec<NaiveDate> = (0..k)
                .map(|i| start + chrono::Duration::days(i64::from(i)))
                .collect();
            let info = StreakAnalyzer::compute_streak_info(&entries(&dates));
            assert_eq!(info.current_streak, k);
            assert_eq!(info.total_days, k);
        }
    }

    #[test]
    fn test_classify_filters_by_inclusive_range() {
        let snapshot = entries(&[d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3), d(2024, 2, 1)]);
        let range = DateRange::between(d(2024, 1, 2), d(2024, 1, 5));

        let dates: Vec<NaiveDate> = StreakAnalyzer::classify_for_list(&snapshot, &range)
            .iter()
            .map(|item| item.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 3), d(2024, 1, 2)]);
    }

    #[test]
    fn test_classify_without_range_sorts_descending() {
        let snapshot = january(&[3, 1, 20, 7]);
        let dates: Vec<u32> = StreakAnalyzer::classify_for_list(&snapshot, &DateRange::all())
            .iter()
            .map(|item| item.date.day())
            .collect();
        assert_eq!(dates, vec![20, 7, 3, 1]);
    }

    #[test]
    fn test_classify_half_open_ranges() {
        let snapshot = january(&[1, 2, 3, 4]);

        let from = DateRange::new(Some(d(2024, 1, 3)), None);
        assert_eq!(StreakAnalyzer::classify_for_list(&snapshot, &from).len(), 2);

        let until = DateRange::new(None, Some(d(2024, 1, 1)));
        let items = StreakAnalyzer::classify_for_list(&snapshot, &until);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].date, d(2024, 1, 1));
    }

    #[test]
    fn test_classify_empty_result() {
        let snapshot = january(&[1, 2]);
        let range = DateRange::between(d(2025, 1, 1), d(2025, 12, 31));
        assert!(StreakAnalyzer::classify_for_list(&snapshot, &range).is_empty());
        assert!(StreakAnalyzer::classify_for_list(&[], &DateRange::all()).is_empty());
    }

    #[test]
    fn test_classify_has_content() {
        let snapshot = vec![
            entry_with(1, d(2024, 1, 1), "", 0),
            entry_with(2, d(2024, 1, 2), "   ", 0),
            entry_with(3, d(2024, 1, 3), "a", 0),
        ];
        let items = StreakAnalyzer::classify_for_list(&snapshot, &DateRange::all());

        let flags: Vec<(i64, bool, u32)> = items
            .iter()
            .map(|item| (item.id, item.has_content, item.word_count))
            .collect();
        assert_eq!(flags, vec![(3, true, 0), (2, false, 0), (1, false, 0)]);
    }
}
