//! Vocabulary review scheduling for words captured while reading.

pub mod commands;
pub mod config;
pub mod server;
pub mod vocabulary;

pub use config::AppConfig;
pub use vocabulary::{VocabularyEntry, VocabularyStore};
