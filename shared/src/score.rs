//! Score rules for result entry.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, ValidationError};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Parse a typed score. Empty input is `Ok(None)`.
pub fn parse_score(label: &str, raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(score) if is_valid_score(score) => Ok(Some(score)),
        _ => Err(ValidationError::ScoreOutOfRange(label.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMode {
    #[default]
    System,
    Manual,
}

impl CalculationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationMode::System => "system",
            CalculationMode::Manual => "manual",
        }
    }

    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("manual") {
            CalculationMode::Manual
        } else {
            CalculationMode::System
        }
    }
}

/// Letter grade preview for a total.
pub fn grade_for(score: f64) -> &'static str {
    const SCALE: [(f64, &str); 9] = [
        (90.0, "A+"),
        (80.0, "A"),
        (75.0, "B+"),
        (70.0, "B"),
        (65.0, "C+"),
        (60.0, "C"),
        (55.0, "D+"),
        (50.0, "D"),
        (35.0, "E"),
    ];
    SCALE
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or("F")
}

/// Grade preview for raw input; `-` while the input is not a valid score.
pub fn grade_preview(raw: &str) -> &'static str {
    match parse_score("Score", raw) {
        Ok(Some(score)) => grade_for(score),
        _ => "-",
    }
}

/// One student's result as entered in the dialog, still as typed text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreInput {
    pub mode: CalculationMode,
    pub class_score: String,
    pub exam_score: String,
    pub total: String,
    pub remarks: String,
    pub publish: bool,
}

/// A validated entry ready to stage or submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub calculation_mode: CalculationMode,
    pub class_score: f64,
    pub exam_score: f64,
    /// Only sent in manual mode; the server computes it otherwise.
    pub score: Option<f64>,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub is_published: bool,
}

impl ScoreEntry {
    /// Short text for the roster status column.
    pub fn status_text(&self) -> String {
        match (self.calculation_mode, self.score) {
            (CalculationMode::Manual, Some(total)) => format!("Total: {}", trim_number(total)),
            _ => format!(
                "Class: {}, Exam: {}",
                trim_number(self.class_score),
                trim_number(self.exam_score)
            ),
        }
    }

    /// Reverse of [`ScoreInput::validate`], used to reopen a staged entry.
    pub fn to_input(&self) -> ScoreInput {
        ScoreInput {
            mode: self.calculation_mode,
            class_score: trim_number(self.class_score),
            exam_score: trim_number(self.exam_score),
            total: self.score.map(trim_number).unwrap_or_default(),
            remarks: self.remarks.clone(),
            publish: self.is_published,
        }
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

impl ScoreInput {
    /// Inline errors for every score field that is filled in but invalid.
    /// Does not check required fields, so the dialog can show range
    /// problems while the user is still typing.
    pub fn inline_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (field, label, raw) in [
            ("class_score", "Class score", &self.class_score),
            ("exam_score", "Exam score", &self.exam_score),
            ("score", "Total score", &self.total),
        ] {
            if let Err(err) = parse_score(label, raw) {
                errors.insert(field, &err);
            }
        }
        errors
    }

    pub fn validate(&self) -> Result<ScoreEntry, ValidationError> {
        let class_score = parse_score("Class score", &self.class_score)?;
        let exam_score = parse_score("Exam score", &self.exam_score)?;
        let total = parse_score("Total score", &self.total)?;

        let (class_score, exam_score, score) = match self.mode {
            CalculationMode::System => match (class_score, exam_score) {
                (Some(class_score), Some(exam_score)) => (class_score, exam_score, None),
                _ => return Err(ValidationError::MissingSystemScores),
            },
            CalculationMode::Manual => {
                let total = total.ok_or(ValidationError::MissingManualScore)?;
                (
                    class_score.unwrap_or(0.0),
                    exam_score.unwrap_or(0.0),
                    Some(total),
                )
            },
        };

        Ok(ScoreEntry {
            calculation_mode: self.mode,
            class_score,
            exam_score,
            score,
            remarks: self.remarks.trim().to_string(),
            is_published: self.publish,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_score_is_finite_and_in_range() {
        for (score, expected) in [
            (0.0, true),
            (100.0, true),
            (55.5, true),
            (-0.1, false),
            (100.01, false),
            (f64::NAN, false),
            (f64::INFINITY, false),
        ] {
            assert_eq!(is_valid_score(score), expected, "{score}");
        }
        assert!(parse_score("Score", "abc").is_err());
        assert_eq!(parse_score("Score", " "), Ok(None));
    }

    #[test]
    fn system_mode_needs_both_scores() {
        let input = ScoreInput {
            class_score: "30".into(),
            ..ScoreInput::default()
        };
        assert_eq!(input.validate(), Err(ValidationError::MissingSystemScores));

        let input = ScoreInput {
            exam_score: "55".into(),
            ..input
        };
        let entry = input.validate().expect("both scores");
        assert_eq!(entry.score, None);
        assert_eq!(entry.status_text(), "Class: 30, Exam: 55");
    }

    #[test]
    fn manual_mode_defaults_missing_parts_to_zero() {
        let input = ScoreInput {
            mode: CalculationMode::Manual,
            total: "72.5".into(),
            ..ScoreInput::default()
        };
        let entry = input.validate().expect("manual total");
        assert_eq!((entry.class_score, entry.exam_score), (0.0, 0.0));
        assert_eq!(entry.score, Some(72.5));
        assert_eq!(entry.status_text(), "Total: 72.5");

        let missing = ScoreInput {
            mode: CalculationMode::Manual,
            ..ScoreInput::default()
        };
        assert_eq!(missing.validate(), Err(ValidationError::MissingManualScore));
    }

    #[test]
    fn out_of_range_is_flagged_inline_without_blocking_other_fields() {
        let input = ScoreInput {
            class_score: "130".into(),
            exam_score: "40".into(),
            remarks: "Good effort".into(),
            ..ScoreInput::default()
        };
        let errors = input.inline_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("class_score").is_some());
        assert!(input.validate().is_err());
    }

    #[test]
    fn grade_scale() {
        assert_eq!(grade_for(90.0), "A+");
        assert_eq!(grade_for(89.9), "A");
        assert_eq!(grade_for(75.0), "B+");
        assert_eq!(grade_for(35.0), "E");
        assert_eq!(grade_for(34.9), "F");
        assert_eq!(grade_preview("abc"), "-");
        assert_eq!(grade_preview("101"), "-");
        assert_eq!(grade_preview("66"), "C+");
    }
}
