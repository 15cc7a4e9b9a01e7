//! State of one entry form, independent of how it is drawn.
//!
//! UI layers translate their input into [`FormEvent`]s and read labels and
//! visibility back from [`EntryForm`]. Submission goes through
//! [`EntryBuilder`], which applies the field suppression rules.

use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone};

use crate::model::entry::{Category, Entry, EntryType};
use crate::ops::entry_builder::{EntryBuilder, NewEntry, ValidationError};
use crate::ops::labels::{self, COST_SLIDER_MAX};

/// How long a success/warning message stays up
pub const MESSAGE_DURATION: Duration = Duration::from_secs(4);

/// One choice in the type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeOption {
    pub value: EntryType,
    pub label: &'static str,
}

/// Type choices offered for a category
pub fn type_options(category: Category) -> [TypeOption; 2] {
    [
        TypeOption {
            value: EntryType::Craving,
            label: type_label(EntryType::Craving, category),
        },
        TypeOption {
            value: EntryType::Smoked,
            label: type_label(EntryType::Smoked, category),
        },
    ]
}

/// Display label for a type within a category
pub fn type_label(entry_type: EntryType, category: Category) -> &'static str {
    match (entry_type, category) {
        (EntryType::Craving, _) => "Had a Craving",
        (EntryType::Smoked, Category::Vaping) => "I Vaped",
        (EntryType::Smoked, Category::Alcohol) => "I Drank",
    }
}

/// The intensity slider is shown for cravings only
pub fn intensity_visible(entry_type: EntryType) -> bool {
    entry_type == EntryType::Craving
}

/// The cost slider is shown for alcohol consumption only
pub fn cost_visible(entry_type: EntryType, category: Category) -> bool {
    entry_type == EntryType::Smoked && category == Category::Alcohol
}

/// Input to the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Switching category rebuilds the type options, which selects the
    /// first (craving) option again
    SetCategory(Category),
    SetType(EntryType),
    SetDate(String),
    SetTime(String),
    SetNote(String),
    /// Intensity slider moved (clamped to 1..=3)
    IntensityInput(u8),
    /// Cost slider moved (clamped to 0..=40)
    CostInput(u32),
}

/// Field values of an entry form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub category: Category,
    pub entry_type: EntryType,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub note: String,
    pub intensity: u8,
    pub cost_position: u32,
}

impl EntryForm {
    /// A fresh form for `category`, dated at `now` in its own zone
    pub fn new<Tz: TimeZone>(category: Category, intensity: u8, now: &DateTime<Tz>) -> Self {
        let local = now.naive_local();
        EntryForm {
            category,
            entry_type: EntryType::Craving,
            date: local.format("%Y-%m-%d").to_string(),
            time: local.format("%H:%M").to_string(),
            note: String::new(),
            intensity: labels::clamp_intensity(intensity),
            cost_position: 0,
        }
    }

    /// Populate a form from a stored entry, rendering its instant in `tz`.
    ///
    /// A missing or zero intensity shows the middle position and a missing
    /// cost shows zero. Returns `None` if the entry's timestamp does not parse.
    pub fn from_entry<Tz: TimeZone>(entry: &Entry, tz: &Tz) -> Option<Self> {
        let local = entry.instant()?.with_timezone(tz).naive_local();
        Some(EntryForm {
            category: entry.category,
            entry_type: entry.entry_type,
            date: local.format("%Y-%m-%d").to_string(),
            time: local.format("%H:%M").to_string(),
            note: entry.note.clone().unwrap_or_default(),
            intensity: entry
                .intensity
                .filter(|&i| i != 0)
                .map(labels::clamp_intensity)
                .unwrap_or(labels::DEFAULT_INTENSITY),
            cost_position: labels::cost_to_slider(entry.cost),
        })
    }

    pub fn apply(&mut self, event: FormEvent) {
        match event {
            FormEvent::SetCategory(category) => {
                if category != self.category {
                    self.category = category;
                    self.entry_type = EntryType::Craving;
                }
            }
            FormEvent::SetType(entry_type) => self.entry_type = entry_type,
            FormEvent::SetDate(date) => self.date = date,
            FormEvent::SetTime(time) => self.time = time,
            FormEvent::SetNote(note) => self.note = note,
            FormEvent::IntensityInput(value) => self.intensity = labels::clamp_intensity(value),
            FormEvent::CostInput(position) => self.cost_position = position.min(COST_SLIDER_MAX),
        }
    }

    pub fn type_options(&self) -> [TypeOption; 2] {
        type_options(self.category)
    }

    pub fn type_label(&self) -> &'static str {
        type_label(self.entry_type, self.category)
    }

    pub fn intensity_visible(&self) -> bool {
        intensity_visible(self.entry_type)
    }

    pub fn cost_visible(&self) -> bool {
        cost_visible(self.entry_type, self.category)
    }

    pub fn intensity_label(&self) -> &'static str {
        labels::intensity_label(self.intensity)
    }

    pub fn cost_label(&self, currency: &str) -> String {
        labels::cost_label(self.cost_position, currency)
    }

    /// Builder inputs for the current field values. An empty note is
    /// recorded as no note.
    pub fn as_new_entry(&self) -> NewEntry<'_> {
        NewEntry {
            entry_type: self.entry_type,
            category: self.category,
            date: &self.date,
            time: &self.time,
            note: Some(self.note.as_str()).filter(|n| !n.is_empty()),
            intensity: Some(self.intensity),
            cost: Some(labels::slider_to_cost(self.cost_position)),
        }
    }

    /// Validate the date/time and build the entry
    pub fn submit<Tz: TimeZone>(
        &self,
        builder: &EntryBuilder<Tz>,
    ) -> Result<Entry, ValidationError> {
        builder.validate(&self.date, &self.time)?;
        builder.build(&self.as_new_entry())
    }

    /// Clear the per-entry fields, keeping category, type, date and time
    pub fn reset_after_submit(&mut self, intensity: u8) {
        self.note.clear();
        self.intensity = labels::clamp_intensity(intensity);
        self.cost_position = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Warning,
}

/// A transient message shown after submitting
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Message {
            kind,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= MESSAGE_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn form() -> EntryForm {
        EntryForm::new(Category::Alcohol, 2, &noon())
    }

    #[test]
    fn type_options_follow_category() {
        let vaping = type_options(Category::Vaping);
        assert_eq!(vaping[0].label, "Had a Craving");
        assert_eq!(vaping[1].label, "I Vaped");
        let alcohol = type_options(Category::Alcohol);
        assert_eq!(alcohol[0].value, EntryType::Craving);
        assert_eq!(alcohol[1].value, EntryType::Smoked);
        assert_eq!(alcohol[1].label, "I Drank");
    }

    #[test]
    fn visibility_rules() {
        assert!(intensity_visible(EntryType::Craving));
        assert!(!intensity_visible(EntryType::Smoked));
        assert!(cost_visible(EntryType::Smoked, Category::Alcohol));
        assert!(!cost_visible(EntryType::Smoked, Category::Vaping));
        assert!(!cost_visible(EntryType::Craving, Category::Alcohol));
    }

    #[test]
    fn new_form_is_dated_now() {
        let at_plus_two = noon().with_timezone(&FixedOffset::east_opt(7200).unwrap());
        let f = EntryForm::new(Category::Vaping, 9, &at_plus_two);
        assert_eq!(f.date, "2025-05-01");
        assert_eq!(f.time, "14:00");
        assert_eq!(f.entry_type, EntryType::Craving);
        assert_eq!(f.intensity, 3);
        assert_eq!(f.cost_position, 0);
    }

    #[test]
    fn changing_category_resets_type() {
        let mut f = form();
        f.apply(FormEvent::SetType(EntryType::Smoked));
        f.apply(FormEvent::SetCategory(Category::Alcohol));
        assert_eq!(f.entry_type, EntryType::Smoked);
        f.apply(FormEvent::SetCategory(Category::Vaping));
        assert_eq!(f.entry_type, EntryType::Craving);
    }

    #[test]
    fn slider_input_updates_labels() {
        let mut f = form();
        f.apply(FormEvent::IntensityInput(3));
        assert_eq!(f.intensity_label(), "Strong");
        f.apply(FormEvent::IntensityInput(0));
        assert_eq!(f.intensity_label(), "Mild");
        f.apply(FormEvent::CostInput(10));
        assert_eq!(f.cost_label("£"), "£2.50");
        f.apply(FormEvent::CostInput(99));
        assert_eq!(f.cost_position, 40);
    }

    #[test]
    fn submit_builds_entry_with_suppression() {
        let builder = EntryBuilder::new(Utc, noon());
        let mut f = form();
        f.apply(FormEvent::SetType(EntryType::Smoked));
        f.apply(FormEvent::SetTime("09:15".into()));
        f.apply(FormEvent::CostInput(18));
        f.apply(FormEvent::SetNote("pub quiz".into()));

        let entry = f.submit(&builder).unwrap();
        assert_eq!(entry.timestamp, "2025-05-01T09:15:00.000Z");
        assert_eq!(entry.cost, Some(4.5));
        assert_eq!(entry.intensity, None);
        assert_eq!(entry.note.as_deref(), Some("pub quiz"));
    }

    #[test]
    fn submit_craving_drops_cost_and_empty_note() {
        let builder = EntryBuilder::new(Utc, noon());
        let mut f = form();
        f.apply(FormEvent::CostInput(18));
        let entry = f.submit(&builder).unwrap();
        assert_eq!(entry.intensity, Some(2));
        assert_eq!(entry.cost, None);
        assert_eq!(entry.note, None);
    }

    #[test]
    fn submit_rejects_future_and_invalid() {
        let builder = EntryBuilder::new(Utc, noon());
        let mut f = form();
        f.apply(FormEvent::SetTime("12:30".into()));
        assert_eq!(f.submit(&builder), Err(ValidationError::FutureTimestamp));
        f.apply(FormEvent::SetTime("99:99".into()));
        assert_eq!(f.submit(&builder), Err(ValidationError::InvalidTimestamp));
    }

    #[test]
    fn populated_form_resubmits_to_same_entry() {
        let builder = EntryBuilder::new(FixedOffset::east_opt(3600).unwrap(), noon());
        let mut f = form();
        f.apply(FormEvent::SetType(EntryType::Smoked));
        f.apply(FormEvent::SetTime("08:45".into()));
        f.apply(FormEvent::CostInput(7));
        let entry = f.submit(&builder).unwrap();

        let populated = EntryForm::from_entry(&entry, builder.timezone()).unwrap();
        assert_eq!(populated, f);
        assert_eq!(populated.submit(&builder).unwrap(), entry);
    }

    #[test]
    fn populating_fills_defaults_for_missing_fields() {
        let entry = Entry {
            id: 0,
            entry_type: EntryType::Craving,
            category: Category::Vaping,
            timestamp: "2025-05-01T23:30:00.000Z".into(),
            note: None,
            date: String::new(),
            intensity: None,
            cost: None,
        };
        let f = EntryForm::from_entry(&entry, &FixedOffset::east_opt(3600).unwrap()).unwrap();
        assert_eq!(f.date, "2025-05-02");
        assert_eq!(f.time, "00:30");
        assert_eq!(f.note, "");
        assert_eq!(f.intensity, 2);
        assert_eq!(f.cost_position, 0);
    }

    #[test]
    fn populating_treats_zero_intensity_as_missing() {
        let entry = Entry {
            id: 0,
            entry_type: EntryType::Craving,
            category: Category::Vaping,
            timestamp: "2025-05-01T10:00:00.000Z".into(),
            note: None,
            date: String::new(),
            intensity: Some(0),
            cost: None,
        };
        let f = EntryForm::from_entry(&entry, &Utc).unwrap();
        assert_eq!(f.intensity, 2);
        assert_eq!(f.intensity_label(), "Medium");
    }

    #[test]
    fn populating_rounds_stored_cost() {
        let entry = Entry {
            id: 0,
            entry_type: EntryType::Smoked,
            category: Category::Alcohol,
            timestamp: "2025-05-01T10:00:00.000Z".into(),
            note: Some("wine".into()),
            date: String::new(),
            intensity: None,
            cost: Some(3.1),
        };
        let f = EntryForm::from_entry(&entry, &Utc).unwrap();
        assert_eq!(f.cost_position, 12);
        assert_eq!(f.cost_label("£"), "£3.00");
    }

    #[test]
    fn reset_keeps_context() {
        let mut f = form();
        f.apply(FormEvent::SetNote("x".into()));
        f.apply(FormEvent::IntensityInput(3));
        f.apply(FormEvent::CostInput(4));
        f.reset_after_submit(2);
        assert_eq!(f.note, "");
        assert_eq!(f.intensity, 2);
        assert_eq!(f.cost_position, 0);
        assert_eq!(f.category, Category::Alcohol);
    }

    #[test]
    fn message_expires_after_duration() {
        let msg = Message::new(MessageKind::Success, "Logged");
        assert!(!msg.is_expired(msg.shown_at));
        assert!(msg.is_expired(msg.shown_at + MESSAGE_DURATION));
    }
}
