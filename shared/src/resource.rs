//! Resource configuration: one table mapping every entity kind and action to
//! the server endpoint that serves it.
//!
//! Paths follow `/<module>/<resource>/<id>/<action>/`. A few legacy routes
//! carry the id in the body instead; those set [`Endpoint::id_field`].

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Every non-GET request must carry the anti-forgery token.
    pub fn is_mutating(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a mutation serializes its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    Json,
    Form,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    AcademicYear,
    Term,
    ClassLevel,
    Subject,
    Result,
    Admin,
    Teacher,
    Student,
    TeacherAssignment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::AcademicYear,
        EntityKind::Term,
        EntityKind::ClassLevel,
        EntityKind::Subject,
        EntityKind::Result,
        EntityKind::Admin,
        EntityKind::Teacher,
        EntityKind::Student,
        EntityKind::TeacherAssignment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::AcademicYear => "Academic Year",
            EntityKind::Term => "Term",
            EntityKind::ClassLevel => "Class",
            EntityKind::Subject => "Subject",
            EntityKind::Result => "Result",
            EntityKind::Admin => "Admin",
            EntityKind::Teacher => "Teacher",
            EntityKind::Student => "Student",
            EntityKind::TeacherAssignment => "Teacher Assignment",
        }
    }

    pub fn plural_noun(self) -> &'static str {
        match self {
            EntityKind::AcademicYear => "academic years",
            EntityKind::Term => "terms",
            EntityKind::ClassLevel => "classes",
            EntityKind::Subject => "subjects",
            EntityKind::Result => "results",
            EntityKind::Admin => "admins",
            EntityKind::Teacher => "teachers",
            EntityKind::Student => "students",
            EntityKind::TeacherAssignment => "assignments",
        }
    }

    /// List endpoint path plus any fixed query parameters.
    pub fn list_endpoint(self) -> (&'static str, &'static [(&'static str, &'static str)]) {
        match self {
            EntityKind::AcademicYear => ("/academics/academic-years/", &[]),
            EntityKind::Term => ("/academics/api/terms/", &[]),
            EntityKind::ClassLevel => ("/academics/classes/", &[]),
            EntityKind::Subject => ("/academics/api/subjects/", &[]),
            EntityKind::Result => ("/academics/results/", &[]),
            EntityKind::Admin => ("/account/admin-list/", &[]),
            EntityKind::Teacher => ("/account/api/users/", &[("role", "teacher")]),
            EntityKind::Student => ("/account/api/users/", &[("role", "student")]),
            EntityKind::TeacherAssignment => ("/academics/subjects/class-assignments/", &[]),
        }
    }

    fn base(self) -> &'static str {
        match self {
            EntityKind::AcademicYear => "/academics/academic-years",
            EntityKind::Term => "/academics/terms",
            EntityKind::ClassLevel => "/academics/classes",
            EntityKind::Subject => "/academics/subjects",
            EntityKind::Result => "/academics/results",
            EntityKind::Admin => "/account/admin",
            EntityKind::Teacher | EntityKind::Student => "/account/users",
            EntityKind::TeacherAssignment => "/academics/subjects/class-assignment",
        }
    }

    /// Row actions offered by the list renderer, in display order.
    pub fn row_actions(self) -> &'static [Action] {
        match self {
            EntityKind::AcademicYear | EntityKind::Term => {
                &[Action::SetCurrent, Action::Update, Action::Delete]
            },
            EntityKind::ClassLevel => &[
                Action::View,
                Action::Update,
                Action::AssignTeacher,
                Action::AssignSubjects,
                Action::Delete,
            ],
            EntityKind::Subject => &[Action::View, Action::Update, Action::AssignTeacher, Action::Delete],
            EntityKind::Result => &[Action::View, Action::Publish, Action::Delete],
            EntityKind::Admin => &[Action::View, Action::ChangePassword, Action::ToggleStatus],
            EntityKind::Teacher | EntityKind::Student => &[
                Action::View,
                Action::Update,
                Action::ChangePassword,
                Action::ResetPassword,
                Action::ToggleStatus,
                Action::Delete,
            ],
            EntityKind::TeacherAssignment => &[Action::Update, Action::Delete],
        }
    }

    pub fn supports(self, action: Action) -> bool {
        action == Action::Create || self.row_actions().contains(&action)
    }

    /// Kinds whose list row already holds the full record, so view/edit need
    /// no detail round trip.
    pub fn detail_from_list(self) -> bool {
        self.endpoint(Action::View, "").is_none()
    }

    /// Endpoint for `action` on the record `id`, or `None` when the kind
    /// does not offer that action through the server.
    pub fn endpoint(self, action: Action, id: &str) -> Option<Endpoint> {
        use Action::*;
        use EntityKind::*;

        let base = self.base();
        let at = |segment: &str| format!("{base}/{id}/{segment}/");
        let endpoint = match (self, action) {
            (AcademicYear, Create) => Endpoint::form(HttpMethod::Post, "/academics/academic-years/create/".into()),
            (AcademicYear, Update) => Endpoint::json(HttpMethod::Put, at("edit")),
            (AcademicYear, Delete) => Endpoint::empty(HttpMethod::Delete, at("delete")),
            (AcademicYear, SetCurrent) => Endpoint::empty(HttpMethod::Post, at("set-current")),

            (Term, Create) => Endpoint::form(HttpMethod::Post, "/academics/terms/create/".into()),
            (Term, Update) => {
                Endpoint::form(HttpMethod::Post, "/academics/api/terms/update/".into()).with_id_field("term_id")
            },
            (Term, Delete) => {
                Endpoint::json(HttpMethod::Post, "/academics/api/terms/delete/".into()).with_id_field("term_id")
            },
            (Term, SetCurrent) => {
                Endpoint::json(HttpMethod::Post, "/academics/api/terms/set-current/".into()).with_id_field("term_id")
            },

            (ClassLevel, Create) => Endpoint::form(HttpMethod::Post, "/academics/classes/create/".into()),
            (ClassLevel, View) => Endpoint::empty(HttpMethod::Get, at("data")),
            (ClassLevel, Update) => Endpoint::form(HttpMethod::Post, at("update")),
            (ClassLevel, Delete) => Endpoint::empty(HttpMethod::Delete, at("delete")),
            (ClassLevel, AssignTeacher) => Endpoint::form(HttpMethod::Post, at("assign-teacher")),
            (ClassLevel, AssignSubjects) => Endpoint::form(HttpMethod::Post, at("assign-subjects")),

            (Subject, Create) => Endpoint::form(HttpMethod::Post, "/academics/subjects/create/".into()),
            (Subject, View) => Endpoint::empty(HttpMethod::Get, at("data")),
            (Subject, Update) => Endpoint::form(HttpMethod::Post, at("update")),
            (Subject, Delete) => Endpoint::empty(HttpMethod::Delete, at("delete")),
            (Subject, AssignTeacher) => Endpoint::form(HttpMethod::Post, at("assign-teacher")),

            (Result, Create) => {
                Endpoint::form(HttpMethod::Post, "/academics/results/upload/result/new/".into())
            },
            (Result, View) => Endpoint::empty(HttpMethod::Get, format!("{base}/{id}/")),
            (Result, Publish) => Endpoint::json(HttpMethod::Post, at("publish")),
            (Result, Delete) => Endpoint::empty(HttpMethod::Delete, at("delete")),

            (Admin, Create) => Endpoint::form(HttpMethod::Post, "/account/create-admin/".into()),
            (Admin, View) => Endpoint::empty(HttpMethod::Get, format!("/account/users/{id}/data/")),
            (Admin, ToggleStatus) => Endpoint::empty(HttpMethod::Post, at("toggle-status")),
            (Admin, ChangePassword) => Endpoint::json(
                HttpMethod::Post,
                format!("/account/users/{id}/change-password/"),
            ),

            (Teacher, Create) => Endpoint::form(HttpMethod::Post, "/account/teachers/create/".into()),
            (Student, Create) => Endpoint::form(HttpMethod::Post, "/account/students/create/".into()),
            (Teacher | Student, View) => Endpoint::empty(HttpMethod::Get, at("data")),
            (Teacher | Student, Update) => Endpoint::form(HttpMethod::Post, at("update")),
            (Teacher | Student, Delete) => Endpoint::empty(HttpMethod::Delete, at("delete")),
            (Teacher | Student, ResetPassword) => Endpoint::empty(HttpMethod::Post, at("reset-password")),
            (Teacher | Student, ChangePassword) => Endpoint::json(HttpMethod::Post, at("change-password")),
            (Teacher | Student, ToggleStatus) => Endpoint::empty(HttpMethod::Post, at("toggle-status")),

            (TeacherAssignment, Create) => Endpoint::form(
                HttpMethod::Post,
                "/academics/subjects/assign-teacher-to-class/".into(),
            ),
            (TeacherAssignment, Update) => Endpoint::form(
                HttpMethod::Post,
                "/academics/subjects/update-class-assignment/".into(),
            )
            .with_id_field("assignment_id"),
            (TeacherAssignment, Delete) => Endpoint::empty(HttpMethod::Delete, at("delete")),

            _ => return None,
        };
        Some(endpoint)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    SetCurrent,
    ToggleStatus,
    Publish,
    ResetPassword,
    ChangePassword,
    AssignTeacher,
    AssignSubjects,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Create => "Create",
            Action::Update => "Edit",
            Action::Delete => "Delete",
            Action::SetCurrent => "Set as Current",
            Action::ToggleStatus => "Toggle Status",
            Action::Publish => "Publish / Unpublish",
            Action::ResetPassword => "Reset Password",
            Action::ChangePassword => "Change Password",
            Action::AssignTeacher => "Assign Teacher",
            Action::AssignSubjects => "Assign Subjects",
        }
    }

    /// Actions that go straight to a yes/no confirmation dialog.
    pub fn needs_confirmation(self) -> bool {
        matches!(
            self,
            Action::Delete | Action::SetCurrent | Action::ToggleStatus | Action::ResetPassword
        )
    }

    /// Whether a success changes other rows than the target (so the list is
    /// reloaded rather than patched).
    pub fn affects_siblings(self) -> bool {
        matches!(self, Action::SetCurrent)
    }

    pub fn confirmation_text(self, kind: EntityKind, name: &str) -> String {
        match self {
            Action::Delete => format!(
                "Are you sure you want to delete \"{name}\"? This action cannot be undone."
            ),
            Action::SetCurrent => format!(
                "Are you sure you want to set \"{name}\" as the current {}? This will unset any other current {}.",
                kind.label().to_lowercase(),
                kind.label().to_lowercase()
            ),
            Action::ToggleStatus => format!(
                "Are you sure you want to change the status of \"{name}\"? Their access changes immediately."
            ),
            Action::ResetPassword => {
                format!("Reset the password of \"{name}\" to the default password?")
            },
            _ => format!("{} \"{name}\"?", self.label()),
        }
    }
}

/// A concrete request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub body: BodyStyle,
    /// Body key that carries the record id for routes without an id segment.
    pub id_field: Option<&'static str>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: String, body: BodyStyle) -> Self {
        Self {
            method,
            path,
            body,
            id_field: None,
        }
    }

    fn form(method: HttpMethod, path: String) -> Self {
        Self::new(method, path, BodyStyle::Form)
    }

    fn json(method: HttpMethod, path: String) -> Self {
        Self::new(method, path, BodyStyle::Json)
    }

    fn empty(method: HttpMethod, path: String) -> Self {
        Self::new(method, path, BodyStyle::Empty)
    }

    fn with_id_field(mut self, field: &'static str) -> Self {
        self.id_field = Some(field);
        self
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::empty(HttpMethod::Get, path.into())
    }

    pub fn post_json(path: impl Into<String>) -> Self {
        Self::json(HttpMethod::Post, path.into())
    }
}

/// Auxiliary read endpoints used by the upload flow and the assign dialogs.
pub mod paths {
    pub const TERMS_FOR_YEAR: &str = "/academics/api/terms/";
    pub const RESULT_STUDENTS: &str = "/academics/api/results/students/";
    pub const EXISTING_RESULTS: &str = "/academics/api/results/existing/";
    pub const PUBLISH_BULK: &str = "/academics/api/results/publish-bulk/";
    pub const ADMIN_BULK_STATUS: &str = "/account/admin/bulk-status/";
    pub const TEACHER_OPTIONS: &str = "/academics/teachers/api/";
    pub const CLASS_OPTIONS: &str = "/account/ajax/classes/";
    pub const ACADEMIC_YEARS: &str = "/academics/academic-years/";
    pub const SUBJECT_OPTIONS: &str = "/academics/api/subjects/";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_module_resource_id_action() {
        let endpoint = EntityKind::Subject
            .endpoint(Action::Delete, "42")
            .expect("subjects can be deleted");
        assert_eq!(endpoint.method, HttpMethod::Delete);
        assert_eq!(endpoint.path, "/academics/subjects/42/delete/");

        let endpoint = EntityKind::AcademicYear
            .endpoint(Action::Update, "7")
            .expect("years can be edited");
        assert_eq!(endpoint.method, HttpMethod::Put);
        assert_eq!(endpoint.body, BodyStyle::Json);
        assert_eq!(endpoint.path, "/academics/academic-years/7/edit/");
    }

    #[test]
    fn assignment_update_carries_id_in_body() {
        let endpoint = EntityKind::TeacherAssignment
            .endpoint(Action::Update, "3")
            .expect("assignments can be edited");
        assert_eq!(endpoint.id_field, Some("assignment_id"));
        assert!(!endpoint.path.contains('3'));
    }

    #[test]
    fn term_mutations_carry_term_id_in_body() {
        let update = EntityKind::Term
            .endpoint(Action::Update, "7")
            .expect("terms can be edited");
        assert_eq!(update.method, HttpMethod::Post);
        assert_eq!(update.body, BodyStyle::Form);
        assert_eq!(update.path, "/academics/api/terms/update/");
        assert_eq!(update.id_field, Some("term_id"));

        for (action, path) in [
            (Action::Delete, "/academics/api/terms/delete/"),
            (Action::SetCurrent, "/academics/api/terms/set-current/"),
        ] {
            let endpoint = EntityKind::Term.endpoint(action, "7").expect("term action routed");
            assert_eq!(endpoint.method, HttpMethod::Post, "{action:?}");
            assert_eq!(endpoint.body, BodyStyle::Json, "{action:?}");
            assert_eq!(endpoint.path, path);
            assert_eq!(endpoint.id_field, Some("term_id"));
        }
    }

    #[test]
    fn every_row_action_has_an_endpoint() {
        for kind in EntityKind::ALL {
            for action in kind.row_actions() {
                assert!(
                    kind.endpoint(*action, "1").is_some() || *action == Action::View,
                    "{kind:?} {action:?}"
                );
            }
            assert!(kind.endpoint(Action::Create, "").is_some(), "{kind:?} create");
        }
    }

    #[test]
    fn list_rows_double_as_details_for_dated_kinds() {
        assert!(EntityKind::Term.detail_from_list());
        assert!(EntityKind::AcademicYear.detail_from_list());
        assert!(!EntityKind::Student.detail_from_list());
    }

    #[test]
    fn only_get_is_non_mutating() {
        assert!(!HttpMethod::Get.is_mutating());
        assert!(HttpMethod::Post.is_mutating());
        assert!(HttpMethod::Put.is_mutating());
        assert!(HttpMethod::Delete.is_mutating());
    }
}
