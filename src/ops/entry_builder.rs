use chrono::{
    DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone,
    Utc,
};

use crate::model::entry::{Category, Entry, EntryType};

/// Accepted time-of-day formats, tried in order
const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];

/// Why a date/time pair was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Cannot set future date/time!")]
    FutureTimestamp,
    #[error("Invalid date/time!")]
    InvalidTimestamp,
}

/// Receives user-facing validation messages (an alert, a status line, stderr)
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Raw form inputs for a new entry
#[derive(Debug, Clone, Copy)]
pub struct NewEntry<'a> {
    pub entry_type: EntryType,
    pub category: Category,
    /// `YYYY-MM-DD`
    pub date: &'a str,
    /// `HH:MM` or `HH:MM:SS`
    pub time: &'a str,
    pub note: Option<&'a str>,
    pub intensity: Option<u8>,
    pub cost: Option<f64>,
}

/// Validates date/time inputs and builds entries.
///
/// Wall-clock inputs are interpreted in `tz`; the future check compares
/// against the `now` captured when the builder was made.
#[derive(Debug, Clone)]
pub struct EntryBuilder<Tz: TimeZone> {
    tz: Tz,
    now: DateTime<Utc>,
}

impl EntryBuilder<Local> {
    /// Builder for the system time zone at the current instant
    pub fn local() -> Self {
        EntryBuilder::new(Local, Utc::now())
    }
}

impl<Tz: TimeZone> EntryBuilder<Tz> {
    pub fn new(tz: Tz, now: DateTime<Utc>) -> Self {
        EntryBuilder { tz, now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Check that `date` and `time` form a real point in time that is not
    /// later than now.
    pub fn validate(&self, date: &str, time: &str) -> Result<(), ValidationError> {
        let (_, instant) = self.resolve(date, time)?;
        if instant > self.now {
            return Err(ValidationError::FutureTimestamp);
        }
        Ok(())
    }

    /// [`validate`](Self::validate), reporting any failure through `notifier`.
    /// Returns whether the pair is valid.
    pub fn validate_and_notify(
        &self,
        date: &str,
        time: &str,
        notifier: &mut dyn Notifier,
    ) -> bool {
        match self.validate(date, time) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(date, time, error = ?e, "rejected entry date/time");
                notifier.notify(&e.to_string());
                false
            }
        }
    }

    /// Build an entry from form inputs.
    ///
    /// Callers validate first; the future rule is not re-checked here.
    /// Intensity is kept only for cravings and cost only for alcohol
    /// consumption, each decided on its own.
    pub fn build(&self, input: &NewEntry<'_>) -> Result<Entry, ValidationError> {
        let (naive, instant) = self.resolve(input.date, input.time)?;

        let intensity = if input.entry_type == EntryType::Craving {
            input.intensity
        } else {
            None
        };
        let cost = if input.entry_type == EntryType::Smoked && input.category == Category::Alcohol
        {
            input.cost
        } else {
            None
        };

        Ok(Entry {
            id: instant.timestamp_millis(),
            entry_type: input.entry_type,
            category: input.category,
            timestamp: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            note: input.note.map(str::to_string),
            date: naive.format("%a %b %d %Y").to_string(),
            intensity,
            cost,
        })
    }

    /// Combine the inputs into a wall-clock time and the instant it names
    fn resolve(
        &self,
        date: &str,
        time: &str,
    ) -> Result<(NaiveDateTime, DateTime<Utc>), ValidationError> {
        let naive = parse_wall_clock(date, time).ok_or(ValidationError::InvalidTimestamp)?;
        let local = self.tz.from_local_datetime(&naive);
        if matches!(local, LocalResult::Ambiguous(..)) {
            tracing::warn!(%naive, "ambiguous local time, picking earliest");
        }
        let instant = local.earliest().ok_or(ValidationError::InvalidTimestamp)?;
        Ok((naive, instant.with_timezone(&Utc)))
    }
}

/// Parse a `YYYY-MM-DD` date and a time of day into a naive datetime
pub fn parse_wall_clock(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())?;
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn utc_builder() -> EntryBuilder<Utc> {
        EntryBuilder::new(Utc, noon())
    }

    fn input<'a>(entry_type: EntryType, category: Category) -> NewEntry<'a> {
        NewEntry {
            entry_type,
            category,
            date: "2025-05-01",
            time: "11:30",
            note: Some("after lunch"),
            intensity: None,
            cost: None,
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Notifier for Recorder {
        fn notify(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    #[test]
    fn past_and_present_times_are_valid() {
        let b = utc_builder();
        assert_eq!(b.validate("2025-05-01", "11:59"), Ok(()));
        assert_eq!(b.validate("2025-05-01", "12:00"), Ok(()));
        assert_eq!(b.validate("2024-12-31", "23:59:59"), Ok(()));
    }

    #[test]
    fn future_times_are_rejected() {
        let b = utc_builder();
        assert_eq!(
            b.validate("2025-05-01", "12:01"),
            Err(ValidationError::FutureTimestamp)
        );
        assert_eq!(
            b.validate("2025-05-02", "00:00"),
            Err(ValidationError::FutureTimestamp)
        );
    }

    #[test]
    fn malformed_inputs_are_invalid() {
        let b = utc_builder();
        for (date, time) in [
            ("2025-05-01", "99:99"),
            ("2025-05-01", "25:00"),
            ("2025-13-01", "10:00"),
            ("2025-02-30", "10:00"),
            ("", "10:00"),
            ("2025-05-01", ""),
            ("yesterday", "noon"),
        ] {
            assert_eq!(
                b.validate(date, time),
                Err(ValidationError::InvalidTimestamp),
                "{} {}",
                date,
                time
            );
        }
    }

    #[test]
    fn validation_uses_builder_time_zone() {
        // 12:30 at UTC+1 is 11:30 UTC, before noon
        let b = EntryBuilder::new(FixedOffset::east_opt(3600).unwrap(), noon());
        assert_eq!(b.validate("2025-05-01", "12:30"), Ok(()));
        assert_eq!(
            b.validate("2025-05-01", "13:30"),
            Err(ValidationError::FutureTimestamp)
        );
    }

    #[test]
    fn error_messages_are_distinct() {
        assert_eq!(
            ValidationError::FutureTimestamp.to_string(),
            "Cannot set future date/time!"
        );
        assert_eq!(
            ValidationError::InvalidTimestamp.to_string(),
            "Invalid date/time!"
        );
    }

    #[test]
    fn validate_and_notify_reports_failures() {
        let b = utc_builder();
        let mut rec = Recorder::default();
        assert!(b.validate_and_notify("2025-05-01", "10:00", &mut rec));
        assert!(rec.0.is_empty());

        assert!(!b.validate_and_notify("2025-05-03", "10:00", &mut rec));
        assert!(!b.validate_and_notify("2025-05-01", "99:99", &mut rec));
        assert_eq!(rec.0, vec!["Cannot set future date/time!", "Invalid date/time!"]);
    }

    #[test]
    fn build_derives_id_timestamp_and_date() {
        let entry = utc_builder()
            .build(&input(EntryType::Craving, Category::Vaping))
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 5, 1, 11, 30, 0).unwrap();
        assert_eq!(entry.id, expected.timestamp_millis());
        assert_eq!(entry.timestamp, "2025-05-01T11:30:00.000Z");
        assert_eq!(entry.date, "Thu May 01 2025");
        assert_eq!(entry.note.as_deref(), Some("after lunch"));
    }

    #[test]
    fn build_converts_local_time_to_utc_timestamp() {
        let b = EntryBuilder::new(FixedOffset::west_opt(5 * 3600).unwrap(), noon());
        let mut new = input(EntryType::Craving, Category::Vaping);
        new.date = "2025-04-30";
        new.time = "22:15";
        let entry = b.build(&new).unwrap();
        assert_eq!(entry.timestamp, "2025-05-01T03:15:00.000Z");
        // date stays on the local calendar day
        assert_eq!(entry.date, "Wed Apr 30 2025");
    }

    #[test]
    fn craving_keeps_intensity_and_drops_cost() {
        let mut new = input(EntryType::Craving, Category::Alcohol);
        new.intensity = Some(2);
        new.cost = Some(10.0);
        let entry = utc_builder().build(&new).unwrap();
        assert_eq!(entry.intensity, Some(2));
        assert_eq!(entry.cost, None);
    }

    #[test]
    fn alcohol_consumption_keeps_cost_and_drops_intensity() {
        let mut new = input(EntryType::Smoked, Category::Alcohol);
        new.intensity = Some(3);
        new.cost = Some(10.0);
        let entry = utc_builder().build(&new).unwrap();
        assert_eq!(entry.cost, Some(10.0));
        assert_eq!(entry.intensity, None);
    }

    #[test]
    fn vaping_consumption_drops_cost() {
        let mut new = input(EntryType::Smoked, Category::Vaping);
        new.cost = Some(10.0);
        let entry = utc_builder().build(&new).unwrap();
        assert_eq!(entry.cost, None);
        assert_eq!(entry.intensity, None);
    }

    #[test]
    fn alcohol_consumption_without_cost_has_none() {
        let entry = utc_builder()
            .build(&input(EntryType::Smoked, Category::Alcohol))
            .unwrap();
        assert_eq!(entry.cost, None);
    }

    #[test]
    fn build_does_not_recheck_future() {
        let mut new = input(EntryType::Craving, Category::Vaping);
        new.date = "2030-01-01";
        assert!(utc_builder().build(&new).is_ok());
    }

    #[test]
    fn build_rejects_unparsable_input() {
        let mut new = input(EntryType::Craving, Category::Vaping);
        new.time = "99:99";
        assert_eq!(
            utc_builder().build(&new),
            Err(ValidationError::InvalidTimestamp)
        );
    }

    fn london_builder() -> EntryBuilder<chrono_tz::Tz> {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        EntryBuilder::new(chrono_tz::Europe::London, now)
    }

    #[test]
    fn wall_clock_in_dst_gap_is_invalid() {
        // clocks go from 01:00 to 02:00 on 2025-03-30
        let b = london_builder();
        assert_eq!(
            b.validate("2025-03-30", "01:30"),
            Err(ValidationError::InvalidTimestamp)
        );

        let mut new = input(EntryType::Craving, Category::Vaping);
        new.date = "2025-03-30";
        new.time = "01:30";
        assert_eq!(b.build(&new), Err(ValidationError::InvalidTimestamp));

        assert_eq!(b.validate("2025-03-30", "02:30"), Ok(()));
    }

    #[test]
    fn ambiguous_wall_clock_takes_earliest_instant() {
        // 01:00-02:00 happens twice on 2025-10-26; the first pass is BST
        let b = london_builder();
        assert_eq!(b.validate("2025-10-26", "01:30"), Ok(()));

        let mut new = input(EntryType::Craving, Category::Vaping);
        new.date = "2025-10-26";
        new.time = "01:30";
        let entry = b.build(&new).unwrap();
        assert_eq!(entry.timestamp, "2025-10-26T00:30:00.000Z");
        assert_eq!(entry.date, "Sun Oct 26 2025");
    }

    #[test]
    fn seconds_and_fractions_are_accepted() {
        let mut new = input(EntryType::Craving, Category::Vaping);
        new.time = "11:30:15.250";
        let entry = utc_builder().build(&new).unwrap();
        assert_eq!(entry.timestamp, "2025-05-01T11:30:15.250Z");
    }
}
