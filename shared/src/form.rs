//! Declarative edit/create forms: a field list per entity kind plus the
//! string values the user typed, validated and serialized before submit.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::validation::{is_valid_email, require, FieldErrors, ValidationError};

/// Where a select field gets its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    Static(&'static [(&'static str, &'static str)]),
    AcademicYears,
    Teachers,
    Classes,
    Subjects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    TextArea,
    Number,
    Date,
    Checkbox,
    Select(OptionSource),
    /// Several ids held as one comma separated value.
    MultiSelect(OptionSource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// Raw field values keyed by field name. Checkboxes hold `"true"`/`"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_flag(self, name: &str, checked: bool) -> Self {
        self.with(name, if checked { "true" } else { "false" })
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn checked(&self, name: &str) -> bool {
        matches!(self.get(name), "true" | "on")
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        parse_date(self.get(name))
    }

    /// `application/x-www-form-urlencoded` pairs. Unchecked boxes are
    /// omitted and checked ones send `on`, like a browser form post.
    pub fn to_form_pairs(&self, spec: &[FieldSpec]) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.values.len());
        for (name, value) in &self.values {
            match kind_of(spec, name) {
                Some(FieldKind::Checkbox) => {
                    if self.checked(name) {
                        pairs.push((name.clone(), "on".to_string()));
                    }
                },
                Some(FieldKind::MultiSelect(_)) => {
                    pairs.extend(split_multi(value).map(|id| (name.clone(), id.to_string())));
                },
                _ => pairs.push((name.clone(), value.trim().to_string())),
            }
        }
        pairs
    }

    /// JSON object body. Checkboxes become booleans; everything else is sent
    /// as the trimmed string the server expects.
    pub fn to_json(&self, spec: &[FieldSpec]) -> Value {
        let mut object = Map::new();
        for (name, value) in &self.values {
            let value = match kind_of(spec, name) {
                Some(FieldKind::Checkbox) => Value::Bool(self.checked(name)),
                Some(FieldKind::MultiSelect(_)) => Value::Array(
                    split_multi(value)
                        .map(|id| Value::String(id.to_string()))
                        .collect(),
                ),
                _ => Value::String(value.trim().to_string()),
            };
            object.insert(name.clone(), value);
        }
        Value::Object(object)
    }
}

fn split_multi(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn kind_of(spec: &[FieldSpec], name: &str) -> Option<FieldKind> {
    spec.iter()
        .find(|field| field.name == name)
        .map(|field| field.kind)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Per-field checks from the field list alone.
pub fn validate(spec: &[FieldSpec], values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in spec {
        let raw = values.get(field.name).trim();
        if field.required && field.kind != FieldKind::Checkbox {
            if let Err(err) = require(field.label, raw) {
                errors.insert(field.name, &err);
                continue;
            }
        }
        if raw.is_empty() {
            continue;
        }
        match field.kind {
            FieldKind::Email if !is_valid_email(raw) => {
                errors.insert(field.name, &ValidationError::InvalidEmail);
            },
            FieldKind::Date if parse_date(raw).is_none() => {
                errors.insert(field.name, &ValidationError::InvalidDate(field.label.to_string()));
            },
            FieldKind::Number if raw.parse::<f64>().map_or(true, |n| !n.is_finite()) => {
                errors.insert(field.name, &ValidationError::NotANumber(field.label.to_string()));
            },
            _ => {},
        }
    }
    errors
}

pub const ASSIGN_TEACHER_FIELDS: &[FieldSpec] = &[FieldSpec::required(
    "teacher_id",
    "Teacher",
    FieldKind::Select(OptionSource::Teachers),
)];

pub const ASSIGN_SUBJECTS_FIELDS: &[FieldSpec] = &[FieldSpec::required(
    "subjects",
    "Subjects",
    FieldKind::MultiSelect(OptionSource::Subjects),
)];

pub const PASSWORD_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("new_password", "New password", FieldKind::Password),
    FieldSpec::required("confirm_password", "Confirm password", FieldKind::Password),
];

pub const SUBJECT_CATEGORIES: &[(&str, &str)] = &[("core", "Core"), ("elective", "Elective")];
pub const GENDERS: &[(&str, &str)] = &[("M", "Male"), ("F", "Female")];
pub const TERM_NAMES: &[(&str, &str)] = &[
    ("1st Term", "1st Term"),
    ("2nd Term", "2nd Term"),
    ("3rd Term", "3rd Term"),
];

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &[FieldSpec] = &[
        FieldSpec::required("name", "Name", FieldKind::Text),
        FieldSpec::required("email", "Email", FieldKind::Email),
        FieldSpec::optional("start_date", "Start date", FieldKind::Date),
        FieldSpec::optional("is_active", "Active", FieldKind::Checkbox),
    ];

    #[test]
    fn required_and_shape_errors_are_per_field() {
        let values = FormValues::new()
            .with("name", "  ")
            .with("email", "nope")
            .with("start_date", "2024-13-01");
        let errors = validate(SPEC, &values);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("start_date"), Some("Start date is not a valid date"));
        assert_eq!(errors.get("is_active"), None);
    }

    #[test]
    fn checkbox_serialization_matches_browser_forms() {
        let values = FormValues::new()
            .with("name", " Physics ")
            .with_flag("is_active", false);
        assert_eq!(values.to_form_pairs(SPEC), vec![("name".to_string(), "Physics".to_string())]);

        let values = values.with_flag("is_active", true);
        assert!(values
            .to_form_pairs(SPEC)
            .contains(&("is_active".to_string(), "on".to_string())));
        assert_eq!(values.to_json(SPEC)["is_active"], Value::Bool(true));
        assert_eq!(values.to_json(SPEC)["name"], Value::String("Physics".into()));
    }

    #[test]
    fn multi_select_posts_one_pair_per_id() {
        let values = FormValues::new().with("subjects", "s1, s2,,s3");
        assert_eq!(
            values.to_form_pairs(ASSIGN_SUBJECTS_FIELDS),
            vec![
                ("subjects".to_string(), "s1".to_string()),
                ("subjects".to_string(), "s2".to_string()),
                ("subjects".to_string(), "s3".to_string()),
            ]
        );
    }
}
