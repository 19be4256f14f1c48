//! Vocabulary review for words captured while reading
//!
//! This module provides:
//! - Vocabulary entries and their review state
//! - A fixed score-to-interval review schedule
//! - Due selection, session ordering and retention statistics
//! - Storage backends (in-memory and JSON files)

pub mod algorithm;
pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{
    FileVocabularyStore, MemoryVocabularyStore, VocabularyStorageError, VocabularyStore,
};
