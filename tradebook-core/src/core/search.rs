//! Display-only filtering of the entry collection.

use crate::Entry;
use std::collections::BTreeSet;

/// Returns `true` if `entry`'s tags, notes or instrument contain `needle`.
///
/// `needle` must already be lowercased.
fn entry_matches(entry: &Entry, needle: &str) -> bool {
    entry.tags().iter().any(|t| t.to_lowercase().contains(needle))
        || entry.notes.to_lowercase().contains(needle)
        || entry.instrument.to_lowercase().contains(needle)
}

/// Entries whose tags, notes or instrument contain `query` (case-insensitive),
/// in collection order.
///
/// The query is trimmed; a blank query matches every entry.
pub fn filter_entries<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }
    entries.iter().filter(|e| entry_matches(e, &needle)).collect()
}

/// All distinct tags used across `entries`, sorted alphabetically.
pub fn all_tags(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|e| e.tags().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::stored_entry;

    #[test]
    fn test_tag_query_matches_only_tagged_entry() {
        let entries = vec![
            stored_entry("1", "ES", &["breakout", "NY"]),
            stored_entry("2", "NQ", &["reversal"]),
        ];
        let hits = filter_entries(&entries, "breakout");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let mut with_notes = stored_entry("1", "XAUUSD", &[]);
        with_notes.notes = "Waited for the London Open sweep".to_string();
        let entries = vec![with_notes, stored_entry("2", "ES", &["Scalp"])];

        assert_eq!(filter_entries(&entries, "london open").len(), 1);
        assert_eq!(filter_entries(&entries, "xau")[0].id.as_deref(), Some("1"));
        assert_eq!(filter_entries(&entries, "SCAL")[0].id.as_deref(), Some("2"));
        assert!(filter_entries(&entries, "crude").is_empty());
    }

    #[test]
    fn test_blank_query_returns_everything_in_order() {
        let entries = vec![stored_entry("1", "ES", &[]), stored_entry("2", "NQ", &[])];
        let hits = filter_entries(&entries, "   ");
        let ids: Vec<_> = hits.iter().map(|e| e.id.as_deref().unwrap()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_all_tags_sorted_distinct() {
        let entries = vec![
            stored_entry("1", "ES", &["reversal", "NY"]),
            stored_entry("2", "NQ", &["NY", "breakout"]),
        ];
        assert_eq!(all_tags(&entries), ["NY", "breakout", "reversal"]);
    }
}
