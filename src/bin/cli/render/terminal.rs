use chrono::{DateTime, Utc};

use glossa_lib::vocabulary::algorithm::{format_interval, is_due};
use glossa_lib::vocabulary::VocabularyEntry;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// Wrap `text` in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Truncate to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Familiarity as "3/5", or "new" before the first review
pub fn score_label(entry: &VocabularyEntry) -> String {
    match entry.familiarity_score {
        Some(score) => format!("{}/5", score),
        None => "new".to_string(),
    }
}

/// When the entry is next due, relative to `now`
pub fn due_label(entry: &VocabularyEntry, now: DateTime<Utc>, use_color: bool) -> String {
    match entry.next_review_date {
        None => paint("due (new)", Color::YELLOW, use_color),
        Some(_) if is_due(entry, now) => paint("due", Color::RED, use_color),
        Some(next) => {
            let days = (next - now).num_days().max(1);
            paint(&format!("in {}", format_interval(days)), Color::GREEN, use_color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use glossa_lib::vocabulary::NewEntry;
    use uuid::Uuid;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Haus", 10), "Haus");
        assert_eq!(truncate("Donaudampfschiff", 10), "Donauda...");
        assert_eq!(truncate("Straße", 6), "Straße");
    }

    #[test]
    fn test_labels() {
        let now = Utc::now();
        let mut entry = VocabularyEntry::new(Uuid::new_v4(), NewEntry::new("Haus", "de"), now);
        assert_eq!(score_label(&entry), "new");
        assert_eq!(due_label(&entry, now, false), "due (new)");

        entry.familiarity_score = Some(4);
        entry.next_review_date = Some(now + Duration::days(14));
        assert_eq!(score_label(&entry), "4/5");
        assert_eq!(due_label(&entry, now, false), "in 2w");

        entry.next_review_date = Some(now - Duration::days(1));
        assert_eq!(due_label(&entry, now, false), "due");
    }
}
