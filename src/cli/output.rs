use chrono::TimeZone;
use serde::Serialize;

use crate::model::config::DisplayConfig;
use crate::model::entry::{Category, Entry, EntryType};
use crate::ops::form::type_label;
use crate::ops::labels;
use crate::util::unicode::{pad_to_width, single_line, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntryListJson<'a> {
    pub count: usize,
    pub entries: Vec<&'a Entry>,
}

#[derive(Serialize)]
pub struct IntensityLabelJson {
    pub value: u8,
    pub label: &'static str,
}

#[derive(Serialize)]
pub struct CostLabelJson {
    pub position: u32,
    pub amount: f64,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Local `HH:MM` of an entry, or `??:??` if its timestamp is unreadable
fn local_time<Tz: TimeZone>(entry: &Entry, tz: &Tz) -> String {
    entry
        .instant()
        .map(|t| t.with_timezone(tz).naive_local().format("%H:%M").to_string())
        .unwrap_or_else(|| "??:??".to_string())
}

/// Intensity label for cravings, cost for drinks, nothing otherwise
fn entry_detail(entry: &Entry, currency: &str) -> String {
    let mut parts = Vec::new();
    if let Some(i) = entry.intensity {
        let label = labels::intensity_label(i);
        parts.push(if label.is_empty() {
            i.to_string()
        } else {
            label.to_string()
        });
    }
    if let Some(cost) = entry.cost {
        parts.push(labels::format_cost(cost, currency));
    }
    parts.join(" ")
}

/// Format a single entry as a one-line summary
pub fn format_entry_line<Tz: TimeZone>(entry: &Entry, tz: &Tz, display: &DisplayConfig) -> String {
    let note = entry
        .note
        .as_deref()
        .map(|n| truncate_to_width(&single_line(n), display.note_width))
        .unwrap_or_default();
    let line = format!(
        "{}  {} {}  {}  {}  {}  {}",
        entry.id,
        entry.date,
        local_time(entry, tz),
        pad_to_width(entry.category.as_str(), 7),
        pad_to_width(type_label(entry.entry_type, entry.category), 13),
        pad_to_width(&entry_detail(entry, &display.currency), 6),
        note
    );
    line.trim_end().to_string()
}

/// Format detailed entry view
pub fn format_entry_detail<Tz: TimeZone>(
    entry: &Entry,
    tz: &Tz,
    display: &DisplayConfig,
) -> Vec<String> {
    let mut lines = vec![
        format!(
            "[{}] {} ({})",
            entry.entry_type,
            type_label(entry.entry_type, entry.category),
            entry.category
        ),
        format!("id:        {}", entry.id),
        format!("when:      {} {}", entry.date, local_time(entry, tz)),
        format!("timestamp: {}", entry.timestamp),
    ];
    if let Some(i) = entry.intensity {
        lines.push(format!("intensity: {} ({})", i, labels::intensity_label(i)));
    }
    if let Some(cost) = entry.cost {
        lines.push(format!(
            "cost:      {}",
            labels::format_cost(cost, &display.currency)
        ));
    }
    if let Some(note) = &entry.note {
        lines.push("note:".to_string());
        for line in note.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

/// Confirmation printed after logging or editing
pub fn format_logged<Tz: TimeZone>(verb: &str, entry: &Entry, tz: &Tz) -> String {
    format!(
        "{} \"{}\" on {} at {} (id {})",
        verb,
        type_label(entry.entry_type, entry.category),
        entry.date,
        local_time(entry, tz),
        entry.id
    )
}

/// Parse a type string into EntryType
pub fn parse_entry_type(s: &str) -> Result<EntryType, String> {
    EntryType::parse_type(s)
        .ok_or_else(|| format!("unknown type '{}' (expected: craving, smoked)", s))
}

/// Parse a category string into Category
pub fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse_category(s)
        .ok_or_else(|| format!("unknown category '{}' (expected: vaping, alcohol)", s))
}
