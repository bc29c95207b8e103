//! History export as Markdown or plain text.

use super::entry::HistoryEntry;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Render entries as Markdown.
pub fn export_markdown(entries: &[HistoryEntry]) -> String {
    let mut out = String::from("# Wisdom History\n\n");
    if entries.is_empty() {
        out.push_str("*No wisdom yet.*\n");
        return out;
    }
    for entry in entries {
        out.push_str(&format!(
            "**{}** ({})\n",
            entry.category,
            entry.timestamp.format(TIME_FORMAT)
        ));
        out.push_str(&format!("> {}\n", entry.text));
        if let Some(question) = entry.question() {
            out.push_str(&format!("*Q: {question}*\n"));
        }
        out.push('\n');
    }
    out
}

/// Render entries as plain text.
pub fn export_text(entries: &[HistoryEntry]) -> String {
    let mut out = String::from("Wisdom History\n==============\n\n");
    if entries.is_empty() {
        out.push_str("No wisdom yet.\n");
        return out;
    }
    for entry in entries {
        out.push_str(&format!(
            "[{}] {}\n",
            entry.category.label().to_uppercase(),
            entry.timestamp.format(TIME_FORMAT)
        ));
        out.push_str(&format!("  {}\n", entry.text));
        if let Some(question) = entry.question() {
            out.push_str(&format!("  Q: {question}\n"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use chrono::DateTime;

    fn sample() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry::new(
                "Bloom where you are planted",
                Category::Poetic,
                "Will it rain?",
                DateTime::from_timestamp_millis(0).unwrap(),
            ),
            HistoryEntry::new(
                "Euphoria: Happiness is coming",
                Category::WordOfTheDay,
                "",
                DateTime::from_timestamp_millis(90_000).unwrap(),
            ),
        ]
    }

    #[test]
    fn markdown_export() {
        let md = export_markdown(&sample());
        assert!(md.starts_with("# Wisdom History"));
        assert!(md.contains("**Poetic** (1970-01-01 00:00 UTC)\n> Bloom where you are planted\n*Q: Will it rain?*\n"));
        assert!(md.contains("**Word Wisdom** (1970-01-01 00:01 UTC)\n> Euphoria: Happiness is coming\n\n"));
    }

    #[test]
    fn text_export() {
        let txt = export_text(&sample());
        assert!(txt.contains("[POETIC] 1970-01-01 00:00 UTC\n  Bloom where you are planted\n  Q: Will it rain?\n"));
        assert!(txt.contains("[WORD WISDOM]"));
        assert_eq!(txt.matches("Q:").count(), 1);
    }

    #[test]
    fn empty_exports() {
        assert!(export_markdown(&[]).contains("No wisdom yet"));
        assert!(export_text(&[]).contains("No wisdom yet"));
    }
}
