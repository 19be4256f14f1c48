//! Fixed-interval review scheduling
//!
//! Each review schedules the next one purely from the score just given:
//!
//! | score | meaning           | next review |
//! |-------|-------------------|-------------|
//! | 1     | don't know        | 1 day       |
//! | 2     |                   | 3 days      |
//! | 3     |                   | 7 days      |
//! | 4     |                   | 14 days     |
//! | 5     | know perfectly    | 30 days     |
//!
//! There is no ease factor and no review history: this is deliberately not
//! SM-2. All arithmetic is in UTC, so a "day" is always 24 hours.

use chrono::{DateTime, Duration, Utc};

use super::models::{ReviewStats, VocabularyEntry, MAX_SCORE, MIN_SCORE};

/// Days until the next review, indexed by `score - 1`
const INTERVAL_DAYS: [i64; 5] = [1, 3, 7, 14, 30];

/// Map a score to the number of days until the next review.
///
/// Total over all integers: anything outside 1-5 gets the score-1 interval,
/// so an unrecognized score is never scheduled far in the future.
pub fn interval_days(score: i32) -> i64 {
    INTERVAL_DAYS[(normalize_score(score) - MIN_SCORE) as usize]
}

/// Replace an out-of-range score with 1 ("don't know yet")
pub fn normalize_score(score: i32) -> i32 {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        score
    } else {
        MIN_SCORE
    }
}

/// Apply one review event to an entry.
///
/// Sets the score, `last_reviewed` and `next_review_date` together and
/// touches nothing else. An out-of-range score is stored as 1, which keeps
/// `next_review_date == last_reviewed + interval_days(familiarity_score)`.
pub fn apply_review(
    entry: &VocabularyEntry,
    score: i32,
    reviewed_at: DateTime<Utc>,
) -> VocabularyEntry {
    let score = normalize_score(score);
    let mut updated = entry.clone();
    updated.familiarity_score = Some(score);
    updated.last_reviewed = Some(reviewed_at);
    updated.next_review_date = Some(reviewed_at + Duration::days(interval_days(score)));
    updated
}

/// An entry is due when it was never scheduled or its date has arrived
pub fn is_due(entry: &VocabularyEntry, as_of: DateTime<Utc>) -> bool {
    entry
        .next_review_date
        .map_or(true, |next| next <= as_of)
}

/// Entries due for review at `as_of`, in input order
pub fn select_due(entries: &[VocabularyEntry], as_of: DateTime<Utc>) -> Vec<VocabularyEntry> {
    entries
        .iter()
        .filter(|e| is_due(e, as_of))
        .cloned()
        .collect()
}

/// Order entries for a review session.
///
/// Never-scheduled entries come first, oldest capture first; the rest follow
/// by ascending `next_review_date`. The sort is stable, so any remaining ties
/// keep the caller's order.
pub fn sort_by_due_date(entries: &[VocabularyEntry]) -> Vec<VocabularyEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| match (a.next_review_date, b.next_review_date) {
        (None, None) => a.date_added.cmp(&b.date_added),
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y),
    });
    sorted
}

/// Percentage of entries scored 3 or higher, rounded half-up.
///
/// An empty collection scores 0.
pub fn retention_score(entries: &[VocabularyEntry]) -> u32 {
    let total = entries.len() as u64;
    if total == 0 {
        return 0;
    }
    let learned = entries.iter().filter(|e| e.is_learned()).count() as u64;
    // round(100 * learned / total) with .5 rounding up
    ((200 * learned + total) / (2 * total)) as u32
}

/// Summarize a collection for the progress dashboard
pub fn review_stats(entries: &[VocabularyEntry], as_of: DateTime<Utc>) -> ReviewStats {
    let mut stats = ReviewStats {
        total_entries: entries.len(),
        retention_score: retention_score(entries),
        ..Default::default()
    };

    for entry in entries {
        if !entry.is_reviewed() {
            stats.new_entries += 1;
        }
        if is_due(entry, as_of) {
            stats.due_entries += 1;
        }
        if entry.is_learned() {
            stats.learned_entries += 1;
        }
        if let Some(score) = entry.familiarity_score {
            stats.score_distribution[(normalize_score(score) - MIN_SCORE) as usize] += 1;
        }
    }

    stats
}

/// Interval each score would schedule, index 0 holds score 1.
/// Shown next to the score buttons during a review.
pub fn preview_intervals() -> [i64; 5] {
    let mut preview = [0; 5];
    for (slot, score) in preview.iter_mut().zip(MIN_SCORE..=MAX_SCORE) {
        *slot = interval_days(score);
    }
    preview
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i64) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::models::NewEntry;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn new_entry(word: &str) -> VocabularyEntry {
        VocabularyEntry::new(Uuid::new_v4(), NewEntry::new(word, "de"), at(2024, 1, 1))
    }

    fn scheduled(word: &str, next: Option<DateTime<Utc>>) -> VocabularyEntry {
        let mut e = new_entry(word);
        e.next_review_date = next;
        e
    }

    fn scored(score: Option<i32>) -> VocabularyEntry {
        let mut e = new_entry("Wort");
        e.familiarity_score = score;
        e
    }

    #[test]
    fn test_interval_table() {
        assert_eq!(interval_days(1), 1);
        assert_eq!(interval_days(2), 3);
        assert_eq!(interval_days(3), 7);
        assert_eq!(interval_days(4), 14);
        assert_eq!(interval_days(5), 30);
    }

    #[test]
    fn test_interval_falls_back_to_one_day() {
        for score in [i32::MIN, -1, 0, 6, 100, i32::MAX] {
            assert_eq!(interval_days(score), interval_days(1), "score {}", score);
        }
    }

    #[test]
    fn test_review_sets_all_three_fields() {
        let entry = new_entry("Baum");
        let reviewed_at = at(2024, 3, 10);

        for score in MIN_SCORE..=MAX_SCORE {
            let updated = apply_review(&entry, score, reviewed_at);
            assert_eq!(updated.familiarity_score, Some(score));
            assert_eq!(updated.last_reviewed, Some(reviewed_at));
            assert_eq!(
                updated.next_review_date,
                Some(reviewed_at + Duration::days(interval_days(score)))
            );
        }
    }

    #[test]
    fn test_review_scenario_score_three() {
        let mut entry = new_entry("Haus");
        entry.familiarity_score = Some(1);

        let updated = apply_review(&entry, 3, at(2024, 1, 1));

        assert_eq!(updated.next_review_date, Some(at(2024, 1, 8)));
        assert_eq!(updated.last_reviewed, Some(at(2024, 1, 1)));
    }

    #[test]
    fn test_review_scenario_score_five() {
        let mut entry = new_entry("Haus");
        entry.familiarity_score = Some(5);

        let updated = apply_review(&entry, 5, at(2024, 6, 1));

        assert_eq!(updated.next_review_date, Some(at(2024, 7, 1)));
    }

    #[test]
    fn test_review_out_of_range_does_not_panic() {
        let entry = new_entry("Haus");
        let updated = apply_review(&entry, 42, at(2024, 1, 1));

        assert_eq!(updated.familiarity_score, Some(1));
        assert_eq!(updated.next_review_date, Some(at(2024, 1, 2)));
    }

    #[test]
    fn test_review_preserves_identity_and_annotations() {
        let mut entry = new_entry("Haus");
        entry.translation = Some("house".to_string());
        entry.context = Some("Das Haus ist alt.".to_string());
        entry.notes = Some("neuter".to_string());
        entry.book_id = Some(Uuid::new_v4());

        let updated = apply_review(&entry, 4, at(2024, 5, 5));

        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.word, entry.word);
        assert_eq!(updated.language, entry.language);
        assert_eq!(updated.translation, entry.translation);
        assert_eq!(updated.context, entry.context);
        assert_eq!(updated.notes, entry.notes);
        assert_eq!(updated.book_id, entry.book_id);
        assert_eq!(updated.date_added, entry.date_added);
    }

    #[test]
    fn test_select_due_boundary_is_inclusive() {
        let now = at(2024, 2, 1);
        let entries = vec![
            scheduled("past", Some(at(2024, 1, 15))),
            scheduled("exact", Some(now)),
            scheduled("future", Some(now + Duration::seconds(1))),
            scheduled("never", None),
        ];

        let due: Vec<String> = select_due(&entries, now).into_iter().map(|e| e.word).collect();

        assert_eq!(due, vec!["past", "exact", "never"]);
    }

    #[test]
    fn test_never_reviewed_is_always_due() {
        let entries = vec![scheduled("never", None)];
        assert_eq!(select_due(&entries, at(1970, 1, 1)).len(), 1);
        assert_eq!(select_due(&entries, at(2999, 1, 1)).len(), 1);
    }

    #[test]
    fn test_select_due_empty() {
        assert!(select_due(&[], at(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_sort_puts_unscheduled_first_then_ascending() {
        let entries = vec![
            scheduled("late", Some(at(2024, 3, 1))),
            scheduled("never", None),
            scheduled("early", Some(at(2024, 1, 1))),
            scheduled("middle", Some(at(2024, 2, 1))),
        ];

        let sorted: Vec<String> = sort_by_due_date(&entries).into_iter().map(|e| e.word).collect();

        assert_eq!(sorted, vec!["never", "early", "middle", "late"]);
    }

    #[test]
    fn test_sort_unscheduled_by_date_added_then_input_order() {
        let mut newer = scheduled("newer", None);
        newer.date_added = at(2024, 5, 1);
        let mut older = scheduled("older", None);
        older.date_added = at(2024, 4, 1);
        let mut same_a = scheduled("same-a", None);
        same_a.date_added = at(2024, 6, 1);
        let mut same_b = scheduled("same-b", None);
        same_b.date_added = at(2024, 6, 1);

        let sorted: Vec<String> = sort_by_due_date(&[newer, same_a, older, same_b])
            .into_iter()
            .map(|e| e.word)
            .collect();

        assert_eq!(sorted, vec!["older", "newer", "same-a", "same-b"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let entries = vec![
            scheduled("b", Some(at(2024, 2, 1))),
            scheduled("n1", None),
            scheduled("a", Some(at(2024, 1, 1))),
            scheduled("n2", None),
            scheduled("c", Some(at(2024, 2, 1))),
        ];

        let once = sort_by_due_date(&entries);
        let twice = sort_by_due_date(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_retention_empty_is_zero() {
        assert_eq!(retention_score(&[]), 0);
    }

    #[test]
    fn test_retention_scenario() {
        let entries: Vec<_> = [2, 3, 4, 5].into_iter().map(|s| scored(Some(s))).collect();
        assert_eq!(retention_score(&entries), 75);
    }

    #[test]
    fn test_retention_counts_unscored_as_not_learned() {
        let entries = vec![scored(None), scored(Some(5))];
        assert_eq!(retention_score(&entries), 50);
    }

    #[test]
    fn test_retention_rounds_half_up() {
        // 1 of 8 = 12.5%
        let mut entries: Vec<_> = (0..7).map(|_| scored(Some(1))).collect();
        entries.push(scored(Some(3)));
        assert_eq!(retention_score(&entries), 13);

        // 1 of 3 = 33.33%, 2 of 3 = 66.67%
        let thirds = vec![scored(Some(4)), scored(Some(1)), scored(Some(2))];
        assert_eq!(retention_score(&thirds), 33);
        let two_thirds = vec![scored(Some(4)), scored(Some(5)), scored(Some(2))];
        assert_eq!(retention_score(&two_thirds), 67);
    }

    #[test]
    fn test_retention_monotonic_when_score_rises() {
        let mut entries = vec![scored(Some(1)), scored(Some(2)), scored(Some(4))];
        let before = retention_score(&entries);
        for raised in 3..=5 {
            entries[0].familiarity_score = Some(raised);
            assert!(retention_score(&entries) >= before);
        }
    }

    #[test]
    fn test_review_stats() {
        let now = at(2024, 2, 1);
        let mut reviewed_due = scored(Some(2));
        reviewed_due.last_reviewed = Some(at(2024, 1, 1));
        reviewed_due.next_review_date = Some(at(2024, 1, 4));
        let mut reviewed_later = scored(Some(5));
        reviewed_later.last_reviewed = Some(at(2024, 1, 20));
        reviewed_later.next_review_date = Some(at(2024, 2, 19));
        let fresh = scored(None);

        let stats = review_stats(&[reviewed_due, reviewed_later, fresh], now);

        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.new_entries, 1);
        assert_eq!(stats.due_entries, 2);
        assert_eq!(stats.learned_entries, 1);
        assert_eq!(stats.retention_score, 33);
        assert_eq!(stats.score_distribution, [0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(preview_intervals(), [1, 3, 7, 14, 30]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(3), "3d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
    }
}
