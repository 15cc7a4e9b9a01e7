use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of event an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Had a craving
    Craving,
    /// Actually vaped or drank
    Smoked,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Craving => "craving",
            EntryType::Smoked => "smoked",
        }
    }

    /// Parse a type string (`craving` or `smoked`)
    pub fn parse_type(s: &str) -> Option<EntryType> {
        match s {
            "craving" => Some(EntryType::Craving),
            "smoked" => Some(EntryType::Smoked),
            _ => None,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The habit an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vaping,
    Alcohol,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Vaping, Category::Alcohol];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Vaping => "vaping",
            Category::Alcohol => "alcohol",
        }
    }

    /// Parse a category string (`vaping` or `alcohol`)
    pub fn parse_category(s: &str) -> Option<Category> {
        match s {
            "vaping" => Some(Category::Vaping),
            "alcohol" => Some(Category::Alcohol),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logged craving or consumption event.
///
/// Entries are built once by [`crate::ops::entry_builder::EntryBuilder`] and
/// never mutated afterwards; editing builds a replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Millisecond epoch of `timestamp`
    pub id: i64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: Category,
    /// UTC ISO-8601 with milliseconds, e.g. `2025-05-01T11:30:00.000Z`
    pub timestamp: String,
    pub note: Option<String>,
    /// Human-readable local date, e.g. `Thu May 01 2025`
    pub date: String,
    /// 1..=3, cravings only
    pub intensity: Option<u8>,
    /// Currency amount, alcohol consumption only
    pub cost: Option<f64>,
}

impl Entry {
    /// The instant named by `timestamp`, if it parses
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
