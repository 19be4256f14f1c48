//! Storage for vocabulary entries
//!
//! The scheduler never owns entries: it reads and writes them through a
//! [`VocabularyStore`]. Two backends are provided.
//!
//! [`FileVocabularyStore`] keeps one JSON file per entry:
//! ```text
//! {data_dir}/vocabulary/
//! └── entries/
//!     └── {entry-id}.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{apply_review, select_due, sort_by_due_date};
use super::models::{EntryFilter, NewEntry, VocabularyEntry};

#[derive(Error, Debug)]
pub enum VocabularyStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, VocabularyStorageError>;

/// Backing store for vocabulary entries.
///
/// Implementations assign ids and must apply `update_entry_review` as one
/// atomic read-modify-write: a reader never sees the new score without the
/// new dates.
pub trait VocabularyStore: Send + Sync {
    /// All entries, read as one consistent snapshot
    fn list_entries(&self) -> Result<Vec<VocabularyEntry>>;

    fn get_entry(&self, id: Uuid) -> Result<VocabularyEntry>;

    /// Store a newly captured word; the store picks the id and `date_added`
    fn insert_entry(&self, entry: NewEntry) -> Result<VocabularyEntry>;

    /// Replace the annotations of an existing entry.
    ///
    /// Review fields and `date_added` keep their stored values: they only
    /// change through `update_entry_review`.
    fn update_entry(&self, entry: &VocabularyEntry) -> Result<VocabularyEntry>;

    fn delete_entry(&self, id: Uuid) -> Result<()>;

    /// Record a review for one entry and return the updated entry
    fn update_entry_review(
        &self,
        id: Uuid,
        score: i32,
        reviewed_at: DateTime<Utc>,
    ) -> Result<VocabularyEntry>;

    /// Entries due at `as_of`, in review-session order
    fn list_entries_due_for_review(&self, as_of: DateTime<Utc>) -> Result<Vec<VocabularyEntry>> {
        let entries = self.list_entries()?;
        Ok(sort_by_due_date(&select_due(&entries, as_of)))
    }

    fn list_entries_filtered(&self, filter: &EntryFilter) -> Result<Vec<VocabularyEntry>> {
        let entries = self.list_entries()?;
        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }
}

/// Capture order, so listings are stable across calls
fn sort_by_date_added(entries: &mut [VocabularyEntry]) {
    entries.sort_by(|a, b| a.date_added.cmp(&b.date_added).then(a.id.cmp(&b.id)));
}

// ==================== In-memory store ====================

/// Process-local store, used by tests and `storage = "memory"`
#[derive(Default)]
pub struct MemoryVocabularyStore {
    entries: RwLock<HashMap<Uuid, VocabularyEntry>>,
}

impl MemoryVocabularyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VocabularyStore for MemoryVocabularyStore {
    fn list_entries(&self) -> Result<Vec<VocabularyEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let mut snapshot: Vec<VocabularyEntry> = entries.values().cloned().collect();
        sort_by_date_added(&mut snapshot);
        Ok(snapshot)
    }

    fn get_entry(&self, id: Uuid) -> Result<VocabularyEntry> {
        let entries = self
            .entries
            .read()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        entries
            .get(&id)
            .cloned()
            .ok_or(VocabularyStorageError::EntryNotFound(id))
    }

    fn insert_entry(&self, entry: NewEntry) -> Result<VocabularyEntry> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let entry = VocabularyEntry::new(Uuid::new_v4(), entry, Utc::now());
        entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn update_entry(&self, entry: &VocabularyEntry) -> Result<VocabularyEntry> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let stored = entries
            .get_mut(&entry.id)
            .ok_or(VocabularyStorageError::EntryNotFound(entry.id))?;
        *stored = stored.clone().with_annotations_from(entry);
        Ok(stored.clone())
    }

    fn delete_entry(&self, id: Uuid) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        entries
            .remove(&id)
            .map(|_| ())
            .ok_or(VocabularyStorageError::EntryNotFound(id))
    }

    fn update_entry_review(
        &self,
        id: Uuid,
        score: i32,
        reviewed_at: DateTime<Utc>,
    ) -> Result<VocabularyEntry> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let stored = entries
            .get_mut(&id)
            .ok_or(VocabularyStorageError::EntryNotFound(id))?;
        *stored = apply_review(stored, score, reviewed_at);
        Ok(stored.clone())
    }
}

// ==================== File store ====================

/// Store that persists each entry as its own JSON file
pub struct FileVocabularyStore {
    entries_dir: PathBuf,
    /// Serializes writers and snapshot readers
    lock: Mutex<()>,
}

impl FileVocabularyStore {
    /// Open (creating if needed) the store under `data_dir`
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let entries_dir = data_dir.join("vocabulary").join("entries");
        fs::create_dir_all(&entries_dir)?;

        Ok(Self {
            entries_dir,
            lock: Mutex::new(()),
        })
    }

    /// Get the path to an entry file
    fn entry_path(&self, id: Uuid) -> PathBuf {
        self.entries_dir.join(format!("{}.json", id))
    }

    fn read_entry(&self, id: Uuid) -> Result<VocabularyEntry> {
        let path = self.entry_path(id);
        if !path.exists() {
            return Err(VocabularyStorageError::EntryNotFound(id));
        }

        let content = fs::read_to_string(&path)?;
        let entry: VocabularyEntry = serde_json::from_str(&content)?;
        Ok(entry)
    }

    fn write_entry(&self, entry: &VocabularyEntry) -> Result<()> {
        let path = self.entry_path(entry.id);
        replace_file(&path, &serde_json::to_string_pretty(entry)?)
    }

    fn read_dir_entries(dir: &Path) -> Result<Vec<VocabularyEntry>> {
        let mut entries = Vec::new();

        for dir_entry in fs::read_dir(dir)? {
            let path = dir_entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let parsed = fs::read_to_string(&path)
                    .map_err(VocabularyStorageError::from)
                    .and_then(|content| {
                        serde_json::from_str::<VocabularyEntry>(&content).map_err(Into::into)
                    });
                match parsed {
                    Ok(entry) => entries.push(entry),
                    Err(e) => log::warn!("Skipping unreadable vocabulary file {:?}: {}", path, e),
                }
            }
        }

        Ok(entries)
    }
}

/// Write via a temp file and rename so a crash never leaves half an entry.
/// The temp file is removed again if either step fails.
fn replace_file(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let written = fs::write(&tmp_path, content).and_then(|_| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            log::debug!("Could not remove {:?}: {}", tmp_path, cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

impl VocabularyStore for FileVocabularyStore {
    fn list_entries(&self) -> Result<Vec<VocabularyEntry>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let mut entries = Self::read_dir_entries(&self.entries_dir)?;
        sort_by_date_added(&mut entries);
        log::debug!("Loaded {} vocabulary entries", entries.len());
        Ok(entries)
    }

    fn get_entry(&self, id: Uuid) -> Result<VocabularyEntry> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        self.read_entry(id)
    }

    fn insert_entry(&self, entry: NewEntry) -> Result<VocabularyEntry> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let entry = VocabularyEntry::new(Uuid::new_v4(), entry, Utc::now());
        self.write_entry(&entry)?;
        Ok(entry)
    }

    fn update_entry(&self, entry: &VocabularyEntry) -> Result<VocabularyEntry> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let updated = self.read_entry(entry.id)?.with_annotations_from(entry);
        self.write_entry(&updated)?;
        Ok(updated)
    }

    fn delete_entry(&self, id: Uuid) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let path = self.entry_path(id);
        if !path.exists() {
            return Err(VocabularyStorageError::EntryNotFound(id));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn update_entry_review(
        &self,
        id: Uuid,
        score: i32,
        reviewed_at: DateTime<Utc>,
    ) -> Result<VocabularyEntry> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabularyStorageError::LockPoisoned)?;
        let updated = apply_review(&self.read_entry(id)?, score, reviewed_at);
        self.write_entry(&updated)?;
        Ok(updated)
    }
}
