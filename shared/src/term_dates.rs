//! Term date rules: auto-filled defaults from the academic year, range
//! checks on manual edits, and the status badge shown in the terms list.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermName {
    #[serde(rename = "1st Term")]
    First,
    #[serde(rename = "2nd Term")]
    Second,
    #[serde(rename = "3rd Term")]
    Third,
}

impl TermName {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1st Term" => Some(TermName::First),
            "2nd Term" => Some(TermName::Second),
            "3rd Term" => Some(TermName::Third),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TermName::First => "1st Term",
            TermName::Second => "2nd Term",
            TermName::Third => "3rd Term",
        }
    }

    /// Start and end as fractions of the academic year.
    fn offsets(self) -> (f64, f64) {
        match self {
            TermName::First => (0.0, 0.33),
            TermName::Second => (0.33, 0.66),
            TermName::Third => (0.66, 1.0),
        }
    }
}

/// Inclusive date range of an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl YearRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::DateOrder);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    fn at_fraction(&self, fraction: f64) -> NaiveDate {
        let span_ms = (self.end - self.start).num_milliseconds() as f64;
        let offset = Duration::milliseconds((span_ms * fraction) as i64);
        let instant = self.start.and_time(chrono::NaiveTime::MIN) + offset;
        instant.date()
    }

    /// Default start/end for `term`, computed in milliseconds and truncated
    /// to the calendar date.
    pub fn term_dates(&self, term: TermName) -> (NaiveDate, NaiveDate) {
        let (from, to) = term.offsets();
        (self.at_fraction(from), self.at_fraction(to))
    }

    pub fn describe(&self) -> String {
        format!("Academic Year: {} to {}", self.start, self.end)
    }

    fn outside(&self, field: &str) -> ValidationError {
        ValidationError::DateOutsideYear {
            field: field.to_string(),
            start: self.start.to_string(),
            end: self.end.to_string(),
        }
    }
}

/// State of the create/edit term form's date inputs.
///
/// Dates the user has not touched are recomputed whenever the year or the
/// term name changes. A rejected manual date is cleared and the error is
/// returned for the toast.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermDateForm {
    year: Option<YearRange>,
    term: Option<TermName>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl TermDateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(&self) -> Option<YearRange> {
        self.year
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Switching years discards both dates and refills them against the new
    /// year, so no date from the previous year survives.
    pub fn select_year(&mut self, year: Option<YearRange>) {
        self.year = year;
        self.start = None;
        self.end = None;
        self.autofill();
    }

    pub fn select_term(&mut self, term: Option<TermName>) {
        self.term = term;
        self.autofill();
    }

    fn autofill(&mut self) {
        let (Some(year), Some(term)) = (self.year, self.term) else {
            return;
        };
        let (start, end) = year.term_dates(term);
        if self.start.is_none() {
            self.start = Some(start);
        }
        if self.end.is_none() {
            self.end = Some(end);
        }
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) -> Result<(), ValidationError> {
        let Some(start) = start else {
            self.start = None;
            return Ok(());
        };
        if let Some(year) = self.year {
            if !year.contains(start) {
                self.start = None;
                return Err(year.outside("Start date"));
            }
        }
        self.start = Some(start);
        if self.end.is_some_and(|end| end < start) {
            self.end = None;
        }
        Ok(())
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) -> Result<(), ValidationError> {
        let Some(end) = end else {
            self.end = None;
            return Ok(());
        };
        if let Some(year) = self.year {
            if end > year.end {
                self.end = None;
                return Err(ValidationError::EndExceedsYear(year.end.to_string()));
            }
            if end < year.start {
                self.end = None;
                return Err(year.outside("End date"));
            }
        }
        if self.start.is_some_and(|start| end <= start) {
            self.end = None;
            return Err(ValidationError::DateOrder);
        }
        self.end = Some(end);
        Ok(())
    }

    /// Final check before submit.
    pub fn validate(&self) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        let start = self
            .start
            .ok_or_else(|| ValidationError::Required("Start date".to_string()))?;
        let end = self
            .end
            .ok_or_else(|| ValidationError::Required("End date".to_string()))?;
        if end <= start {
            return Err(ValidationError::DateOrder);
        }
        if let Some(year) = self.year {
            if !year.contains(start) {
                return Err(year.outside("Start date"));
            }
            if !year.contains(end) {
                return Err(year.outside("End date"));
            }
        }
        Ok((start, end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStatus {
    Current,
    Upcoming,
    Past,
    Active,
}

impl TermStatus {
    pub fn of(is_current: bool, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if is_current {
            TermStatus::Current
        } else if start > today {
            TermStatus::Upcoming
        } else if end < today {
            TermStatus::Past
        } else {
            TermStatus::Active
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TermStatus::Current => "Current",
            TermStatus::Upcoming => "Upcoming",
            TermStatus::Past => "Past",
            TermStatus::Active => "Active",
        }
    }
}

pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
    }

    fn year(start: &str, end: &str) -> YearRange {
        YearRange::new(date(start), date(end)).expect("valid year")
    }

    #[test]
    fn offsets_split_the_year_in_thirds() {
        let range = year("2024-09-01", "2025-07-31");
        assert_eq!(
            range.term_dates(TermName::First),
            (date("2024-09-01"), date("2024-12-19"))
        );
        let (_, third_end) = range.term_dates(TermName::Third);
        assert_eq!(third_end, date("2025-07-31"));
        let (second_start, _) = range.term_dates(TermName::Second);
        assert_eq!(second_start, range.term_dates(TermName::First).1);
    }

    #[test]
    fn switching_year_recomputes_dates_for_the_new_year() {
        let mut form = TermDateForm::new();
        form.select_year(Some(year("2024-09-01", "2025-07-31")));
        form.select_term(TermName::parse("1st Term"));
        assert_eq!(form.start(), Some(date("2024-09-01")));
        assert_eq!(form.end(), Some(date("2024-12-19")));

        form.select_year(Some(year("2025-01-06", "2025-12-19")));
        assert_eq!(form.start(), Some(date("2025-01-06")));
        assert_eq!(form.end(), Some(date("2025-04-30")));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn second_term_follows_the_selected_year() {
        let year_a = year("2023-01-01", "2023-12-31");
        let year_b = year("2024-01-01", "2024-12-31");
        let mut form = TermDateForm::new();

        form.select_year(Some(year_a));
        form.select_term(TermName::parse("2nd Term"));
        assert_eq!(form.start(), Some(date("2023-05-01")));
        assert_eq!(form.end(), Some(date("2023-08-29")));

        // A hand-edited end in year A must not leak into year B.
        form.set_end(Some(date("2023-09-15"))).expect("inside year A");

        form.select_year(Some(year_b));
        assert_eq!(form.year(), Some(year_b));
        assert_eq!(form.start(), Some(date("2024-04-30")));
        assert_eq!(form.end(), Some(date("2024-08-28")));
        assert_eq!(form.validate(), Ok((date("2024-04-30"), date("2024-08-28"))));

        form.select_year(None);
        assert_eq!(form.start(), None);
        assert_eq!(form.end(), None);
    }

    #[test]
    fn manual_dates_outside_the_year_are_cleared() {
        let mut form = TermDateForm::new();
        form.select_year(Some(year("2024-09-01", "2025-07-31")));

        let err = form.set_start(Some(date("2024-08-01"))).expect_err("before year");
        assert!(matches!(err, ValidationError::DateOutsideYear { .. }));
        assert_eq!(form.start(), None);

        form.set_start(Some(date("2024-10-01"))).expect("inside year");
        assert_eq!(
            form.set_end(Some(date("2025-08-01"))),
            Err(ValidationError::EndExceedsYear("2025-07-31".to_string()))
        );
        assert_eq!(form.set_end(Some(date("2024-10-01"))), Err(ValidationError::DateOrder));
        assert_eq!(form.end(), None);

        form.set_end(Some(date("2024-12-01"))).expect("valid end");
        form.set_start(Some(date("2025-01-01"))).expect("inside year");
        assert_eq!(form.end(), None);
    }

    #[test]
    fn status_badge_and_duration() {
        let today = date("2025-03-01");
        let (start, end) = (date("2025-01-06"), date("2025-04-30"));
        assert_eq!(TermStatus::of(true, start, end, today), TermStatus::Current);
        assert_eq!(TermStatus::of(false, start, end, today), TermStatus::Active);
        assert_eq!(
            TermStatus::of(false, date("2025-05-01"), date("2025-07-31"), today),
            TermStatus::Upcoming
        );
        assert_eq!(
            TermStatus::of(false, date("2024-09-01"), date("2024-12-19"), today),
            TermStatus::Past
        );
        assert_eq!(duration_days(start, end), 114);
    }

    #[test]
    fn year_requires_start_before_end() {
        assert_eq!(
            YearRange::new(date("2025-01-01"), date("2025-01-01")),
            Err(ValidationError::DateOrder)
        );
    }
}
