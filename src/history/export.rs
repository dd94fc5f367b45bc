#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

use chrono::{DateTime, Local};

use crate::config::constants::EXPORT_INPUT_LIMIT;
use crate::models::HistoryEntry;

/// Renders the history as a human-readable report. Pure formatting, no
/// mutation.
pub fn format_as_text(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history available.".to_string();
    }

    let bar = "=".repeat(80);
    let rule = "-".repeat(80);

    let mut text = format!("{}\n", bar);
    text.push_str("SIDEKICK - RESPONSE HISTORY\n");
    text.push_str(&format!(
        "Exported: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    text.push_str(&format!("Total Entries: {}\n", entries.len()));
    text.push_str(&format!("{}\n\n", bar));

    for (index, entry) in entries.iter().enumerate() {
        text.push_str(&format!("{}\n", rule));
        text.push_str(&format!("Entry #{}\n", index + 1));
        text.push_str(&format!("{}\n", rule));
        text.push_str(&format!("Date/Time: {}\n", local_date(&entry.timestamp)));
        text.push_str(&format!(
            "Action: {}{}\n",
            entry.action.display_name(),
            if entry.is_modification() {
                " (Modification)"
            } else {
                ""
            }
        ));
        text.push_str(&format!("Model: {}\n", entry.model));
        text.push_str(&format!("Provider: {}\n", entry.provider));
        text.push_str(&format!(
            "Page: {}\n",
            entry.page_title.as_deref().unwrap_or("Unknown")
        ));
        text.push_str(&format!(
            "URL: {}\n",
            entry.page_url.as_deref().unwrap_or("Unknown")
        ));
        text.push('\n');

        if !entry.is_modification() {
            text.push_str("INPUT TEXT:\n");
            text.push_str(&shorten(&entry.input_text, EXPORT_INPUT_LIMIT));
            text.push_str("\n\n");
        }

        text.push_str("AI RESPONSE:\n");
        text.push_str(&entry.response);
        text.push_str("\n\n");
    }

    text.push_str(&format!("{}\n", bar));
    text.push_str("END OF HISTORY\n");
    text.push_str(&format!("{}\n", bar));

    text
}

fn local_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|d| {
            d.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head)
}
