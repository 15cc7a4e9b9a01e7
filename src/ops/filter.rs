use std::cmp::Reverse;

use regex::Regex;

use crate::model::entry::{Category, Entry, EntryType};

/// Criteria for listing entries. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub category: Option<Category>,
    pub entry_type: Option<EntryType>,
    /// Matched against the note; entries without a note never match
    pub note_pattern: Option<Regex>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(category) = self.category
            && entry.category != category
        {
            return false;
        }
        if let Some(entry_type) = self.entry_type
            && entry.entry_type != entry_type
        {
            return false;
        }
        if let Some(re) = &self.note_pattern {
            return entry.note.as_deref().is_some_and(|n| re.is_match(n));
        }
        true
    }
}

/// Entries matching `filter`, newest first, at most `limit` of them
pub fn select_entries<'a>(
    entries: &'a [Entry],
    filter: &EntryFilter,
    limit: Option<usize>,
) -> Vec<&'a Entry> {
    let mut selected: Vec<&Entry> = entries.iter().filter(|e| filter.matches(e)).collect();
    // stable sort keeps insertion order among equal ids
    selected.sort_by_key(|e| Reverse(e.id));
    if let Some(limit) = limit {
        selected.truncate(limit);
    }
    selected
}
