use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

use crate::derive;
use crate::models::{DerivedWeek, NumericField, WeekEntry};
use crate::ordering;
use crate::sanitize;

#[derive(Debug, Error, PartialEq)]
pub enum ScorecardError {
    #[error("no entry for week {0}")]
    UnknownWeek(String),
    #[error("unknown field {0}")]
    UnknownField(String),
}

/// Monday of the week containing `day`.
pub fn week_start_for(day: NaiveDate) -> NaiveDate {
    day.checked_sub_signed(Duration::days(i64::from(day.weekday().num_days_from_monday())))
        .unwrap_or(day)
}

pub fn week_label(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// A single field change requested by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Numeric(NumericField, Option<f64>),
    ManualRedFlag(bool),
    PaymentRedFlag(bool),
    Notes(String),
}

impl FieldEdit {
    /// Parse a field name and raw text with the same leniency as stored data.
    pub fn parse(name: &str, value: &str) -> Result<Self, ScorecardError> {
        let text = serde_json::Value::String(value.to_string());
        match name {
            "manualRedFlag" => Ok(FieldEdit::ManualRedFlag(sanitize::coerce_bool(&text))),
            "paymentRedFlag" => Ok(FieldEdit::PaymentRedFlag(sanitize::coerce_bool(&text))),
            "notes" => Ok(FieldEdit::Notes(value.to_string())),
            other => NumericField::from_key(other)
                .map(|field| FieldEdit::Numeric(field, sanitize::parse_number_text(value)))
                .ok_or_else(|| ScorecardError::UnknownField(other.to_string())),
        }
    }

    fn apply(self, entry: &mut WeekEntry) {
        match self {
            FieldEdit::Numeric(field, value) => *field.slot(entry) = value,
            FieldEdit::ManualRedFlag(flag) => entry.manual_red_flag = flag,
            FieldEdit::PaymentRedFlag(flag) => entry.payment_red_flag = flag,
            FieldEdit::Notes(notes) => entry.notes = notes,
        }
    }
}

/// The owned entry collection: always sorted, never empty.
///
/// Every operation builds a new vector and swaps it in whole, so readers
/// never observe a half-applied change.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    entries: Vec<WeekEntry>,
    today: NaiveDate,
}

impl Scorecard {
    pub fn from_entries(entries: Vec<WeekEntry>, today: NaiveDate) -> Self {
        let mut scorecard = Self {
            entries: Vec::new(),
            today,
        };
        scorecard.replace_all(entries);
        scorecard
    }

    pub fn load(stored: Option<&str>, today: NaiveDate) -> Self {
        Self::from_entries(sanitize::load_or_default(stored, today), today)
    }

    pub fn entries(&self) -> &[WeekEntry] {
        &self.entries
    }

    pub fn derived(&self) -> Vec<DerivedWeek> {
        derive::derive(&self.entries)
    }

    fn default_entry(&self) -> WeekEntry {
        WeekEntry::empty(week_label(week_start_for(self.today)))
    }

    fn commit(&mut self, mut next: Vec<WeekEntry>) {
        ordering::sort_entries(&mut next);
        debug_assert!(ordering::is_sorted(&next));
        self.entries = next;
    }

    pub fn replace_all(&mut self, entries: Vec<WeekEntry>) {
        if entries.is_empty() {
            let fallback = vec![self.default_entry()];
            self.commit(fallback);
        } else {
            self.commit(entries);
        }
    }

    /// Replace the collection with an imported document; a rejected
    /// document leaves the current entries untouched.
    pub fn import(&mut self, text: &str) -> Result<usize, sanitize::SanitizeError> {
        let entries = sanitize::parse_document(text)?;
        self.replace_all(entries);
        Ok(self.entries.len())
    }

    pub fn add_week(&mut self, week_start: NaiveDate) -> WeekEntry {
        let entry = WeekEntry::empty(week_label(week_start));
        let mut next = self.entries.clone();
        next.push(entry.clone());
        self.commit(next);
        entry
    }

    /// The week after the latest entry, or the current week if no date parses
    /// or the next week falls outside the calendar.
    pub fn next_week_start(&self) -> NaiveDate {
        self.entries
            .last()
            .and_then(WeekEntry::week_start_date)
            .and_then(|latest| latest.checked_add_signed(Duration::days(7)))
            .unwrap_or_else(|| week_start_for(self.today))
    }

    /// Duplicate the latest week's numbers into the following week.
    pub fn copy_previous_week(&mut self) -> WeekEntry {
        let week_start = week_label(self.next_week_start());
        let entry = match self.entries.last() {
            Some(latest) => WeekEntry {
                week_start,
                manual_red_flag: false,
                payment_red_flag: false,
                notes: String::new(),
                ..latest.clone()
            },
            None => WeekEntry::empty(week_start),
        };

        let mut next = self.entries.clone();
        next.push(entry.clone());
        self.commit(next);
        entry
    }

    pub fn apply_edit(&mut self, week_start: &str, edit: FieldEdit) -> Result<(), ScorecardError> {
        let index = self.position(week_start)?;
        let mut next = self.entries.clone();
        edit.apply(&mut next[index]);
        self.commit(next);
        Ok(())
    }

    /// Returns false when the week was kept because it is the only entry.
    pub fn remove_week(&mut self, week_start: &str) -> Result<bool, ScorecardError> {
        let index = self.position(week_start)?;
        if self.entries.len() <= 1 {
            return Ok(false);
        }
        let mut next = self.entries.clone();
        next.remove(index);
        self.commit(next);
        Ok(true)
    }

    fn position(&self, week_start: &str) -> Result<usize, ScorecardError> {
        self.entries
            .iter()
            .position(|entry| entry.week_start == week_start)
            .ok_or_else(|| ScorecardError::UnknownWeek(week_start.to_string()))
    }
}
