//! Commands for vocabulary review
//!
//! This is the boundary between callers (CLI, HTTP) and the scheduler. Input
//! is validated here; the scheduling functions themselves accept any score.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::vocabulary::algorithm::{self, preview_intervals as interval_preview};
use crate::vocabulary::{
    EntryFilter, NewEntry, ReviewStats, VocabularyEntry, VocabularyStorageError, VocabularyStore,
    MAX_SCORE, MIN_SCORE,
};

use super::{CommandError, CommandErrorKind};

impl From<VocabularyStorageError> for CommandError {
    fn from(err: VocabularyStorageError) -> Self {
        let kind = match err {
            VocabularyStorageError::EntryNotFound(_) => CommandErrorKind::NotFound,
            _ => CommandErrorKind::Storage,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

type CommandResult<T> = Result<T, CommandError>;

/// Reject scores outside 1-5.
///
/// Takes `i64` so oversized input still gets the range message instead of
/// failing earlier as a type error.
pub fn validate_score(score: i64) -> CommandResult<i32> {
    match i32::try_from(score) {
        Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => Ok(score),
        _ => Err(CommandError::validation(format!(
            "Familiarity score must be between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, score
        ))),
    }
}

pub fn parse_entry_id(entry_id: &str) -> CommandResult<Uuid> {
    Uuid::parse_str(entry_id.trim())
        .map_err(|e| CommandError::validation(format!("Invalid entry ID: {}", e)))
}

/// List entries, optionally narrowed by language or book
pub fn list_entries(
    store: &dyn VocabularyStore,
    filter: &EntryFilter,
) -> CommandResult<Vec<VocabularyEntry>> {
    if filter.is_empty() {
        store.list_entries().map_err(Into::into)
    } else {
        store.list_entries_filtered(filter).map_err(Into::into)
    }
}

/// Entries to review in a session, in presentation order.
/// Nothing due is an empty list.
pub fn list_due_entries(
    store: &dyn VocabularyStore,
    as_of: DateTime<Utc>,
) -> CommandResult<Vec<VocabularyEntry>> {
    let due = store.list_entries_due_for_review(as_of)?;
    log::debug!("{} vocabulary entries due as of {}", due.len(), as_of);
    Ok(due)
}

/// Capture a new word
pub fn capture_entry(store: &dyn VocabularyStore, mut entry: NewEntry) -> CommandResult<VocabularyEntry> {
    entry.word = entry.word.trim().to_string();
    if entry.word.is_empty() {
        return Err(CommandError::validation("Word must not be empty"));
    }
    entry.language = entry.language.trim().to_string();

    let created = store.insert_entry(entry)?;
    log::info!("Captured \"{}\" ({})", created.word, created.id);
    Ok(created)
}

/// Score a review of one entry, scheduling its next review from now
pub fn submit_review(
    store: &dyn VocabularyStore,
    entry_id: Uuid,
    score: i64,
) -> CommandResult<VocabularyEntry> {
    submit_review_at(store, entry_id, score, Utc::now())
}

/// Score a review with an explicit review time
pub fn submit_review_at(
    store: &dyn VocabularyStore,
    entry_id: Uuid,
    score: i64,
    reviewed_at: DateTime<Utc>,
) -> CommandResult<VocabularyEntry> {
    let score = validate_score(score)?;
    let updated = store.update_entry_review(entry_id, score, reviewed_at)?;
    log::info!(
        "Reviewed \"{}\" with score {}, next review {}",
        updated.word,
        score,
        updated
            .next_review_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_default()
    );
    Ok(updated)
}

/// Retention percentage across all entries
pub fn retention(store: &dyn VocabularyStore) -> CommandResult<u32> {
    let entries = store.list_entries()?;
    Ok(algorithm::retention_score(&entries))
}

pub fn review_stats(store: &dyn VocabularyStore, as_of: DateTime<Utc>) -> CommandResult<ReviewStats> {
    let entries = store.list_entries()?;
    Ok(algorithm::review_stats(&entries, as_of))
}

pub fn delete_entry(store: &dyn VocabularyStore, entry_id: Uuid) -> CommandResult<()> {
    store.delete_entry(entry_id)?;
    log::info!("Deleted vocabulary entry {}", entry_id);
    Ok(())
}

/// Days each score would schedule for an existing entry
pub fn preview_intervals(store: &dyn VocabularyStore, entry_id: Uuid) -> CommandResult<[i64; 5]> {
    // The interval depends on the score alone, but a missing entry is still an error
    store.get_entry(entry_id)?;
    Ok(interval_preview())
}
