//! Data models for the vocabulary review system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest familiarity score ("don't know")
pub const MIN_SCORE: i32 = 1;

/// Highest familiarity score ("know perfectly")
pub const MAX_SCORE: i32 = 5;

/// Scores at or above this count as "known well" for retention
pub const LEARNED_THRESHOLD: i32 = 3;

/// A word captured while reading, together with its review state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: Uuid,
    pub word: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Book the word was captured from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<Uuid>,
    /// Last self-rated recall score (1-5), unset until the first review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub familiarity_score: Option<i32>,
    pub date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
}

impl VocabularyEntry {
    /// Build a never-reviewed entry from a capture request.
    ///
    /// Only storage implementations call this: they own id assignment.
    pub fn new(id: Uuid, entry: NewEntry, date_added: DateTime<Utc>) -> Self {
        Self {
            id,
            word: entry.word,
            language: entry.language,
            translation: entry.translation,
            context: entry.context,
            notes: entry.notes,
            book_id: entry.book_id,
            familiarity_score: None,
            date_added,
            last_reviewed: None,
            next_review_date: None,
        }
    }

    /// Whether this entry has been scored at least once
    pub fn is_reviewed(&self) -> bool {
        self.last_reviewed.is_some()
    }

    /// Whether the last score counts as "known well"
    pub fn is_learned(&self) -> bool {
        self.familiarity_score
            .map_or(false, |score| score >= LEARNED_THRESHOLD)
    }

    /// Copy the free-text annotations from `other`, leaving review state alone
    pub fn with_annotations_from(mut self, other: &VocabularyEntry) -> Self {
        self.translation = other.translation.clone();
        self.context = other.context.clone();
        self.notes = other.notes.clone();
        self.book_id = other.book_id;
        self
    }
}

/// Request to capture a new word
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub word: String,
    pub language: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub book_id: Option<Uuid>,
}

impl NewEntry {
    pub fn new(word: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_book(mut self, book_id: Uuid) -> Self {
        self.book_id = Some(book_id);
        self
    }
}

/// Narrow an entry listing by language and/or source book
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub book_id: Option<Uuid>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &VocabularyEntry) -> bool {
        let language_ok = self
            .language
            .as_ref()
            .map_or(true, |lang| entry.language.eq_ignore_ascii_case(lang));
        let book_ok = self.book_id.map_or(true, |id| entry.book_id == Some(id));
        language_ok && book_ok
    }

    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.book_id.is_none()
    }
}

/// Aggregate progress for a collection of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_entries: usize,
    /// Never reviewed
    pub new_entries: usize,
    pub due_entries: usize,
    /// Score of 3 or more
    pub learned_entries: usize,
    /// Percentage of entries with score >= 3, 0 for an empty collection
    pub retention_score: u32,
    /// Count of entries per score, index 0 holds score 1
    pub score_distribution: [usize; 5],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(language: &str, book_id: Option<Uuid>) -> VocabularyEntry {
        let mut request = NewEntry::new("Haus", language);
        request.book_id = book_id;
        VocabularyEntry::new(Uuid::new_v4(), request, Utc::now())
    }

    #[test]
    fn test_new_entry_is_unreviewed() {
        let e = entry("de", None);
        assert!(e.familiarity_score.is_none());
        assert!(e.last_reviewed.is_none());
        assert!(e.next_review_date.is_none());
        assert!(!e.is_reviewed());
        assert!(!e.is_learned());
    }

    #[test]
    fn test_filter_matches_language_case_insensitive() {
        let filter = EntryFilter {
            language: Some("DE".to_string()),
            book_id: None,
        };
        assert!(filter.matches(&entry("de", None)));
        assert!(!filter.matches(&entry("fr", None)));
    }

    #[test]
    fn test_filter_matches_book() {
        let book = Uuid::new_v4();
        let filter = EntryFilter {
            language: None,
            book_id: Some(book),
        };
        assert!(filter.matches(&entry("de", Some(book))));
        assert!(!filter.matches(&entry("de", Some(Uuid::new_v4()))));
        assert!(!filter.matches(&entry("de", None)));
        assert!(EntryFilter::default().matches(&entry("de", None)));
    }

    #[test]
    fn test_json_uses_camel_case_and_omits_unset_fields() {
        let e = entry("de", None);
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("dateAdded").is_some());
        assert!(json.get("nextReviewDate").is_none());
        assert!(json.get("familiarityScore").is_none());

        let back: VocabularyEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }
}
