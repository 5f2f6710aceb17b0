//! Typed records for every resource the panels manage, and the [`Entity`]
//! trait the generic panel is written against.

use std::fmt;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::{
    envelope::MutationResult,
    form::{self, FieldKind, FieldSpec, FormValues, OptionSource},
    resource::{Action, EntityKind},
    score::CalculationMode,
    term_dates::{duration_days, TermStatus},
    validation::{validate_password_change, FieldErrors, ValidationError},
};

/// Ids arrive as integers for some tables and UUID strings for others.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(text)) if !text.is_empty() => Some(text),
        Some(RawId::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn default_true() -> bool {
    true
}

/// Badge colour of a status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warning,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFlag {
    pub label: &'static str,
    pub tone: Tone,
}

impl StatusFlag {
    pub const fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }

    fn active(is_active: bool) -> Self {
        if is_active {
            Self::new("Active", Tone::Success)
        } else {
            Self::new("Inactive", Tone::Muted)
        }
    }
}

/// What a table row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummary {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub flags: Vec<StatusFlag>,
    /// Values aligned with [`Entity::columns`].
    pub columns: Vec<String>,
}

/// A resource record the generic panel can list, view, edit and patch.
pub trait Entity: Clone + PartialEq + fmt::Debug + DeserializeOwned + 'static {
    const KIND: EntityKind;

    fn id(&self) -> String;

    fn display_name(&self) -> String;

    /// Headers of the extra columns between the title and the status flags.
    fn columns() -> &'static [&'static str];

    fn summary(&self, today: NaiveDate) -> EntitySummary;

    /// Fields of the create/edit form. Empty when the kind is not edited
    /// through a generic form.
    fn form_spec() -> &'static [FieldSpec];

    fn form_values(&self) -> FormValues;

    /// Starting values of the create form.
    fn create_values() -> FormValues {
        FormValues::new()
    }

    fn validate_form(values: &FormValues) -> FieldErrors {
        form::validate(Self::form_spec(), values)
    }

    /// Key under which update responses echo the saved record, if any.
    fn record_key() -> Option<&'static str> {
        None
    }

    /// Apply a successful status action to this row. Returns `false` when the
    /// action does not map onto a field of the row.
    fn patch_status(&mut self, _action: Action, _result: &MutationResult) -> bool {
        false
    }
}

fn blank(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn or_dash(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicYear {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_current: bool,
}

impl Entity for AcademicYear {
    const KIND: EntityKind = EntityKind::AcademicYear;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [&'static str] {
        &["Start Date", "End Date"]
    }

    fn summary(&self, _today: NaiveDate) -> EntitySummary {
        EntitySummary {
            id: self.id.clone(),
            title: self.name.clone(),
            subtitle: None,
            flags: if self.is_current {
                vec![StatusFlag::new("Current", Tone::Success)]
            } else {
                Vec::new()
            },
            columns: vec![self.start_date.to_string(), self.end_date.to_string()],
        }
    }

    fn form_spec() -> &'static [FieldSpec] {
        const SPEC: &[FieldSpec] = &[
            FieldSpec::required("name", "Name", FieldKind::Text),
            FieldSpec::required("start_date", "Start date", FieldKind::Date),
            FieldSpec::required("end_date", "End date", FieldKind::Date),
        ];
        SPEC
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.clone())
            .with("start_date", self.start_date.to_string())
            .with("end_date", self.end_date.to_string())
    }

    fn validate_form(values: &FormValues) -> FieldErrors {
        let mut errors = form::validate(Self::form_spec(), values);
        if let (Some(start), Some(end)) = (values.date("start_date"), values.date("end_date")) {
            if start >= end {
                errors.insert("end_date", &ValidationError::DateOrder);
            }
        }
        errors
    }

    fn record_key() -> Option<&'static str> {
        Some("academic_year")
    }

    fn patch_status(&mut self, action: Action, _result: &MutationResult) -> bool {
        if action == Action::SetCurrent {
            self.is_current = true;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "academic_year", deserialize_with = "deserialize_opt_id")]
    pub academic_year_id: Option<String>,
    #[serde(default)]
    pub academic_year_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_current: bool,
}

impl Term {
    pub fn status(&self, today: NaiveDate) -> TermStatus {
        TermStatus::of(self.is_current, self.start_date, self.end_date, today)
    }

    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }
}

impl Entity for Term {
    const KIND: EntityKind = EntityKind::Term;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [&'static str] {
        &["Start Date", "End Date", "Duration"]
    }

    fn summary(&self, today: NaiveDate) -> EntitySummary {
        let tone = match self.status(today) {
            TermStatus::Current => Tone::Success,
            TermStatus::Upcoming => Tone::Info,
            TermStatus::Past => Tone::Muted,
            TermStatus::Active => Tone::Warning,
        };
        EntitySummary {
            id: self.id.clone(),
            title: self.name.clone(),
            subtitle: self.academic_year_name.clone(),
            flags: vec![StatusFlag::new(self.status(today).label(), tone)],
            columns: vec![
                self.start_date.to_string(),
                self.end_date.to_string(),
                format!("{} days", self.duration_days()),
            ],
        }
    }

    fn form_spec() -> &'static [FieldSpec] {
        const SPEC: &[FieldSpec] = &[
            FieldSpec::required(
                "academic_year",
                "Academic year",
                FieldKind::Select(OptionSource::AcademicYears),
            ),
            FieldSpec::required(
                "name",
                "Term",
                FieldKind::Select(OptionSource::Static(form::TERM_NAMES)),
            ),
            FieldSpec::required("start_date", "Start date", FieldKind::Date),
            FieldSpec::required("end_date", "End date", FieldKind::Date),
            FieldSpec::optional("is_current", "Set as current term", FieldKind::Checkbox),
        ];
        SPEC
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("academic_year", blank(&self.academic_year_id))
            .with("name", self.name.clone())
            .with("start_date", self.start_date.to_string())
            .with("end_date", self.end_date.to_string())
            .with_flag("is_current", self.is_current)
    }

    fn validate_form(values: &FormValues) -> FieldErrors {
        let mut errors = form::validate(Self::form_spec(), values);
        if let (Some(start), Some(end)) = (values.date("start_date"), values.date("end_date")) {
            if end <= start {
                errors.insert("end_date", &ValidationError::DateOrder);
            }
        }
        errors
    }

    fn patch_status(&mut self, action: Action, _result: &MutationResult) -> bool {
        if action == Action::SetCurrent {
            self.is_current = true;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLevel {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, alias = "form_teacher")]
    pub form_teacher_name: Option<String>,
    #[serde(default)]
    pub student_count: Option<u32>,
}

impl Entity for ClassLevel {
    const KIND: EntityKind = EntityKind::ClassLevel;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [&'static str] {
        &["Code", "Form Teacher", "Students", "Capacity"]
    }

    fn summary(&self, _today: NaiveDate) -> EntitySummary {
        EntitySummary {
            id: self.id.clone(),
            title: self.name.clone(),
            subtitle: self.description.clone(),
            flags: vec![StatusFlag::active(self.is_active)],
            columns: vec![
                or_dash(&self.code),
                or_dash(&self.form_teacher_name),
                self.student_count.unwrap_or(0).to_string(),
                self.capacity.map_or_else(|| "-".to_string(), |c| c.to_string()),
            ],
        }
    }

    fn form_spec() -> &'static [FieldSpec] {
        const SPEC: &[FieldSpec] = &[
            FieldSpec::required("name", "Name", FieldKind::Text),
            FieldSpec::optional("code", "Code", FieldKind::Text),
            FieldSpec::optional("capacity", "Capacity", FieldKind::Number),
            FieldSpec::optional("description", "Description", FieldKind::TextArea),
            FieldSpec::optional("is_active", "Active", FieldKind::Checkbox),
        ];
        SPEC
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.clone())
            .with("code", blank(&self.code))
            .with(
                "capacity",
                self.capacity.map(|c| c.to_string()).unwrap_or_default(),
            )
            .with("description", blank(&self.description))
            .with_flag("is_active", self.is_active)
    }

    fn create_values() -> FormValues {
        FormValues::new().with_flag("is_active", true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, alias = "teacher", deserialize_with = "deserialize_opt_id")]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

fn default_category() -> String {
    "core".to_string()
}

impl Entity for Subject {
    const KIND: EntityKind = EntityKind::Subject;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }

    fn columns() -> &'static [&'static str] {
        &["Code", "Category", "Teacher"]
    }

    fn summary(&self, _today: NaiveDate) -> EntitySummary {
        let category = form::SUBJECT_CATEGORIES
            .iter()
            .find(|(value, _)| *value == self.category)
            .map_or(self.category.as_str(), |(_, label)| label);
        EntitySummary {
            id: self.id.clone(),
            title: self.name.clone(),
            subtitle: self.description.clone(),
            flags: vec![StatusFlag::active(self.is_active)],
            columns: vec![
                self.code.clone(),
                category.to_string(),
                self.teacher_name
                    .clone()
                    .unwrap_or_else(|| "Not assigned".to_string()),
            ],
        }
    }

    fn form_spec() -> &'static [FieldSpec] {
        const SPEC: &[FieldSpec] = &[
            FieldSpec::required("name", "Name", FieldKind::Text),
            FieldSpec::required("code", "Code", FieldKind::Text),
            FieldSpec::required(
                "category",
                "Category",
                FieldKind::Select(OptionSource::Static(form::SUBJECT_CATEGORIES)),
            ),
            FieldSpec::optional("teacher", "Teacher", FieldKind::Select(OptionSource::Teachers)),
            FieldSpec::optional("description", "Description", FieldKind::TextArea),
            FieldSpec::optional("is_active", "Active", FieldKind::Checkbox),
        ];
        SPEC
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.clone())
            .with("code", self.code.clone())
            .with("category", self.category.clone())
            .with("teacher", blank(&self.teacher_id))
            .with("description", blank(&self.description))
            .with_flag("is_active", self.is_active)
    }

    fn create_values() -> FormValues {
        FormValues::new()
            .with("category", "core")
            .with_flag("is_active", true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub student_name: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub subject_name: String,
    #[serde(default)]
    pub subject_code: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub class_score: Option<f64>,
    #[serde(default)]
    pub exam_score: Option<f64>,
    pub score: f64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub calculation_mode: CalculationMode,
    #[serde(default)]
    pub term_name: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

impl Entity for ResultRecord {
    const KIND: EntityKind = EntityKind::Result;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        format!("{} - {}", self.student_name, self.subject_name)
    }

    fn columns() -> &'static [&'static str] {
        &["Subject", "Class", "Term", "Score", "Grade"]
    }

    fn summary(&self, _today: NaiveDate) -> EntitySummary {
        EntitySummary {
            id: self.id.clone(),
            title: self.student_name.clone(),
            subtitle: self.student_id.clone(),
            flags: vec![if self.is_published {
                StatusFlag::new("Published", Tone::Success)
            } else {
                StatusFlag::new("Draft", Tone::Warning)
            }],
            columns: vec![
                self.subject_name.clone(),
                or_dash(&self.class_name),
                or_dash(&self.term_name),
                format!("{:.1}", self.score),
                or_dash(&self.grade),
            ],
        }
    }

    fn form_spec() -> &'static [FieldSpec] {
        &[]
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
    }

    /// The publish endpoint toggles and echoes the new state; fall back to
    /// flipping locally when the echo is missing.
    fn patch_status(&mut self, action: Action, result: &MutationResult) -> bool {
        if action != Action::Publish {
            return false;
        }
        self.is_published = result
            .flag("is_published")
            .unwrap_or(!self.is_published);
        true
    }
}

/// Shared shape of admin, teacher and student accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub current_class: Option<String>,
    #[serde(default)]
    pub current_class_name: Option<String>,
}

impl UserAccount {
    pub fn full_name(&self) -> String {
        let joined = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let joined = joined.trim();
        if !joined.is_empty() {
            return joined.to_string();
        }
        self.full_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.username.clone())
    }

    fn patch_active(&mut self, action: Action, result: &MutationResult) -> bool {
        if action != Action::ToggleStatus {
            return false;
        }
        self.is_active = result.flag("is_active").unwrap_or(!self.is_active);
        true
    }

    fn person_values(&self) -> FormValues {
        FormValues::new()
            .with("first_name", self.first_name.clone())
            .with("last_name", self.last_name.clone())
            .with("email", self.email.clone())
            .with("phone_number", blank(&self.phone_number))
            .with("gender", blank(&self.gender))
    }
}

/// Implements the parts of [`Entity`] all account kinds share.
macro_rules! account_entity {
    ($name:ident, $kind:expr, $columns:expr, $summary:expr, $spec:expr, $values:expr, $validate:expr) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub UserAccount);

        impl std::ops::Deref for $name {
            type Target = UserAccount;

            fn deref(&self) -> &UserAccount {
                &self.0
            }
        }

        impl Entity for $name {
            const KIND: EntityKind = $kind;

            fn id(&self) -> String {
                self.0.id.clone()
            }

            fn display_name(&self) -> String {
                self.0.full_name()
            }

            fn columns() -> &'static [&'static str] {
                $columns
            }

            fn summary(&self, _today: NaiveDate) -> EntitySummary {
                let user = &self.0;
                EntitySummary {
                    id: user.id.clone(),
                    title: user.full_name(),
                    subtitle: Some(user.username.clone()),
                    flags: vec![StatusFlag::active(user.is_active)],
                    columns: ($summary)(user),
                }
            }

            fn form_spec() -> &'static [FieldSpec] {
                $spec
            }

            fn form_values(&self) -> FormValues {
                ($values)(&self.0)
            }

            fn validate_form(values: &FormValues) -> FieldErrors {
                ($validate)(values)
            }

            fn patch_status(&mut self, action: Action, result: &MutationResult) -> bool {
                self.0.patch_active(action, result)
            }
        }
    };
}

const PERSON_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("first_name", "First name", FieldKind::Text),
    FieldSpec::required("last_name", "Last name", FieldKind::Text),
    FieldSpec::required("email", "Email", FieldKind::Email),
    FieldSpec::optional("phone_number", "Phone number", FieldKind::Text),
    FieldSpec::optional(
        "gender",
        "Gender",
        FieldKind::Select(OptionSource::Static(form::GENDERS)),
    ),
];

const STUDENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("first_name", "First name", FieldKind::Text),
    FieldSpec::required("last_name", "Last name", FieldKind::Text),
    FieldSpec::optional("email", "Email", FieldKind::Email),
    FieldSpec::optional("phone_number", "Phone number", FieldKind::Text),
    FieldSpec::optional(
        "gender",
        "Gender",
        FieldKind::Select(OptionSource::Static(form::GENDERS)),
    ),
    FieldSpec::optional("current_class", "Class", FieldKind::Select(OptionSource::Classes)),
];

const ADMIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("username", "Username", FieldKind::Text),
    FieldSpec::required("email", "Email", FieldKind::Email),
    FieldSpec::required("first_name", "First name", FieldKind::Text),
    FieldSpec::required("last_name", "Last name", FieldKind::Text),
    FieldSpec::required("password", "Password", FieldKind::Password),
    FieldSpec::required("confirm_password", "Confirm password", FieldKind::Password),
];

fn validate_admin(values: &FormValues) -> FieldErrors {
    let mut errors = form::validate(ADMIN_FIELDS, values);
    if let Err(err) = validate_password_change(values.get("password"), values.get("confirm_password")) {
        let field = match err {
            ValidationError::PasswordMismatch => "confirm_password",
            _ => "password",
        };
        errors.insert(field, &err);
    }
    errors
}

account_entity!(
    AdminUser,
    EntityKind::Admin,
    &["Email", "Role"],
    |user: &UserAccount| vec![user.email.clone(), user.role.clone()],
    ADMIN_FIELDS,
    |user: &UserAccount| FormValues::new()
        .with("username", user.username.clone())
        .with("email", user.email.clone())
        .with("first_name", user.first_name.clone())
        .with("last_name", user.last_name.clone()),
    validate_admin
);

account_entity!(
    TeacherUser,
    EntityKind::Teacher,
    &["Email", "Phone"],
    |user: &UserAccount| vec![user.email.clone(), or_dash(&user.phone_number)],
    PERSON_FIELDS,
    UserAccount::person_values,
    |values: &FormValues| form::validate(PERSON_FIELDS, values)
);

account_entity!(
    StudentUser,
    EntityKind::Student,
    &["Student ID", "Class", "Gender"],
    |user: &UserAccount| vec![
        or_dash(&user.student_id),
        or_dash(&user.current_class_name),
        or_dash(&user.gender),
    ],
    STUDENT_FIELDS,
    |user: &UserAccount| user
        .person_values()
        .with("current_class", blank(&user.current_class)),
    |values: &FormValues| form::validate(STUDENT_FIELDS, values)
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherAssignment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub class_level_id: String,
    pub class_name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub academic_year_id: String,
    pub academic_year_name: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

impl Entity for TeacherAssignment {
    const KIND: EntityKind = EntityKind::TeacherAssignment;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.class_name, self.academic_year_name)
    }

    fn columns() -> &'static [&'static str] {
        &["Academic Year", "Teacher"]
    }

    fn summary(&self, _today: NaiveDate) -> EntitySummary {
        EntitySummary {
            id: self.id.clone(),
            title: self.class_name.clone(),
            subtitle: None,
            flags: Vec::new(),
            columns: vec![
                self.academic_year_name.clone(),
                self.teacher_name
                    .clone()
                    .unwrap_or_else(|| "No Teacher".to_string()),
            ],
        }
    }

    fn form_spec() -> &'static [FieldSpec] {
        const SPEC: &[FieldSpec] = &[
            FieldSpec::required(
                "class_level_id",
                "Class",
                FieldKind::Select(OptionSource::Classes),
            ),
            FieldSpec::required(
                "academic_year_id",
                "Academic year",
                FieldKind::Select(OptionSource::AcademicYears),
            ),
            FieldSpec::optional("teacher_id", "Teacher", FieldKind::Select(OptionSource::Teachers)),
        ];
        SPEC
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("class_level_id", self.class_level_id.clone())
            .with("academic_year_id", self.academic_year_id.clone())
            .with("teacher_id", blank(&self.teacher_id))
    }
}

/// A student on the results upload roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRow {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "student_profile__student_id")]
    pub student_id: Option<String>,
}

impl StudentRow {
    pub fn full_name(&self) -> String {
        let joined = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let joined = joined.trim();
        if joined.is_empty() {
            self.username.clone()
        } else {
            joined.to_string()
        }
    }

    /// Student number, falling back to the username.
    pub fn reference(&self) -> &str {
        self.student_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Entry of a teacher picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Entry of a generic `{id, name}` picker (classes, subjects, terms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
    }

    #[test]
    fn ids_accept_numbers_and_uuids() {
        let year: AcademicYear = serde_json::from_value(json!({
            "id": 7, "name": "2024/2025",
            "start_date": "2024-09-01", "end_date": "2025-07-31", "is_current": true
        }))
        .expect("year");
        assert_eq!(year.id, "7");

        let subject: Subject = serde_json::from_value(json!({
            "id": "5f1c0c8e-1b43-4e0c-9a31-5d7b4f2f0a11", "name": "Physics", "code": "PHY"
        }))
        .expect("subject");
        assert_eq!(subject.id, "5f1c0c8e-1b43-4e0c-9a31-5d7b4f2f0a11");
        assert_eq!(subject.category, "core");
        assert!(subject.is_active);
    }

    #[test]
    fn term_summary_shows_status_and_duration() {
        let term: Term = serde_json::from_value(json!({
            "id": 3, "name": "2nd Term", "academic_year": 7,
            "start_date": "2025-01-06", "end_date": "2025-04-30", "is_current": false
        }))
        .expect("term");
        assert_eq!(term.academic_year_id.as_deref(), Some("7"));
        let summary = term.summary(today());
        assert_eq!(summary.flags, vec![StatusFlag::new("Active", Tone::Warning)]);
        assert_eq!(summary.columns[2], "114 days");
    }

    #[test]
    fn roster_reads_profile_student_id() {
        let row: StudentRow = serde_json::from_value(json!({
            "id": 12, "first_name": "Ama", "last_name": "Mensah",
            "username": "ama.m", "student_profile__student_id": "STU-0012"
        }))
        .expect("student");
        assert_eq!(row.full_name(), "Ama Mensah");
        assert_eq!(row.reference(), "STU-0012");
    }

    #[test]
    fn publish_patch_uses_echoed_flag() {
        let mut record: ResultRecord = serde_json::from_value(json!({
            "id": "r1", "student_name": "Ama Mensah", "subject_name": "Physics",
            "score": 71.0, "is_published": false
        }))
        .expect("result");
        let echo = MutationResult::ok("Result published").tap_flag("is_published", true);
        assert!(record.patch_status(Action::Publish, &echo));
        assert!(record.is_published);

        assert!(record.patch_status(Action::Publish, &MutationResult::ok("toggled")));
        assert!(!record.is_published);
        assert!(!record.patch_status(Action::Delete, &echo));
    }

    #[test]
    fn academic_year_form_requires_start_before_end() {
        let values = FormValues::new()
            .with("name", "2025/2026")
            .with("start_date", "2026-07-31")
            .with("end_date", "2025-09-01");
        let errors = AcademicYear::validate_form(&values);
        assert_eq!(errors.get("end_date"), Some("End date must be after start date"));
    }

    #[test]
    fn admin_form_checks_password_pair() {
        let values = FormValues::new()
            .with("username", "head")
            .with("email", "head@school.edu")
            .with("first_name", "Kofi")
            .with("last_name", "Boateng")
            .with("password", "Sup3rSecret!")
            .with("confirm_password", "Sup3rSecret?");
        let errors = AdminUser::validate_form(&values);
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn new_classes_and_subjects_start_active() {
        assert!(ClassLevel::create_values().checked("is_active"));
        let subject = Subject::create_values();
        assert!(subject.checked("is_active"));
        assert_eq!(subject.get("category"), "core");
        assert_eq!(AcademicYear::create_values(), FormValues::new());
    }

    trait TapFlag {
        fn tap_flag(self, key: &str, value: bool) -> Self;
    }

    impl TapFlag for MutationResult {
        fn tap_flag(mut self, key: &str, value: bool) -> Self {
            self.extra.insert(key.to_string(), serde_json::Value::Bool(value));
            self
        }
    }
}
