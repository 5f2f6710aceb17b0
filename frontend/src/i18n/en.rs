pub mod modal {
    pub const CLOSE_ARIA: &str = "Close dialog";
}

pub mod toast {
    pub const DISMISS_ARIA: &str = "Dismiss notification";
}

pub mod loading_spinner {
    pub const ARIA_LABEL: &str = "Loading";
}

pub mod pagination {
    pub const ARIA_NAV: &str = "Pagination";
    pub const ARIA_PREV: &str = "Previous page";
    pub const ARIA_NEXT: &str = "Next page";
    pub const ARIA_GOTO_PAGE_TEMPLATE: &str = "Go to page {}";
}

pub mod error_banner {
    pub const TITLE: &str = "Something went wrong";
    pub const CLOSE_ARIA: &str = "Dismiss error";
    pub const RETRY: &str = "Try again";
}

pub mod form {
    pub const PASSWORD_STRENGTH_TEMPLATE: &str = "Strength: {}";
    pub const SELECT_PLACEHOLDER: &str = "Select...";
    pub const NO_OPTIONS: &str = "No options available";
}

pub mod table {
    pub const SELECT_ALL_ARIA: &str = "Select all rows";
    pub const SELECT_ROW_ARIA_TEMPLATE: &str = "Select {}";
    pub const NAME: &str = "Name";
    pub const STATUS: &str = "Status";
    pub const ACTIONS: &str = "Actions";
}

pub mod header {
    pub const BRAND: &str = "School Admin";
    pub const NAV_ARIA: &str = "Sections";
    pub const OPEN_MENU: &str = "Open menu";
    pub const CLOSE_MENU: &str = "Close menu";
    pub const NAV_ACADEMIC_YEARS: &str = "Academic Years";
    pub const NAV_TERMS: &str = "Terms";
    pub const NAV_CLASSES: &str = "Classes";
    pub const NAV_SUBJECTS: &str = "Subjects";
    pub const NAV_ASSIGNMENTS: &str = "Assignments";
    pub const NAV_RESULTS: &str = "Results";
    pub const NAV_TEACHERS: &str = "Teachers";
    pub const NAV_STUDENTS: &str = "Students";
    pub const NAV_ADMINS: &str = "Admins";
}

pub mod dashboard {
    pub const TITLE: &str = "Dashboard";
    pub const SUBTITLE: &str = "Manage the school's academic records and accounts.";
    pub const ACADEMIC_YEARS: &str = "Create academic years and pick the current one.";
    pub const TERMS: &str = "Plan terms inside each academic year.";
    pub const CLASSES: &str = "Class levels, form teachers and subjects taught.";
    pub const SUBJECTS: &str = "Core and elective subjects and their teachers.";
    pub const ASSIGNMENTS: &str = "Which teacher takes which subject in which class.";
    pub const RESULTS: &str = "Review, publish and remove student results.";
    pub const TEACHERS: &str = "Teacher accounts, passwords and access.";
    pub const STUDENTS: &str = "Student accounts, passwords and access.";
    pub const ADMINS: &str = "Administrator accounts and their status.";
    pub const UPLOAD_TITLE: &str = "Upload Results";
    pub const UPLOAD: &str = "Enter a whole class's scores for one subject and term.";
}

pub mod panel_titles {
    pub const ACADEMIC_YEARS: &str = "Academic Years";
    pub const ACADEMIC_YEARS_HINT: &str = "Only one academic year is current at a time.";
    pub const TERMS: &str = "Terms";
    pub const TERMS_HINT: &str = "Term dates must fall inside their academic year.";
    pub const CLASSES: &str = "Classes";
    pub const SUBJECTS: &str = "Subjects";
    pub const RESULTS: &str = "Results";
    pub const RESULTS_HINT: &str = "Students only see published results.";
    pub const ADMINS: &str = "Administrators";
    pub const TEACHERS: &str = "Teachers";
    pub const STUDENTS: &str = "Students";
    pub const TEACHER_ASSIGNMENTS: &str = "Teacher Assignments";
    pub const FILTER_ACADEMIC_YEAR: &str = "Academic year";
    pub const FILTER_CATEGORY: &str = "Category";
    pub const FILTER_CLASS: &str = "Class";
    pub const FILTER_SUBJECT: &str = "Subject";
    pub const FILTER_STATUS: &str = "Status";
}

pub mod panel {
    pub const CREATE_TEMPLATE: &str = "Add {}";
    pub const VIEW_TITLE_TEMPLATE: &str = "{} Details";
    pub const EDIT_TITLE_TEMPLATE: &str = "Edit {}";
    pub const CREATE_TITLE_TEMPLATE: &str = "Create {}";
    pub const CONFIRM_TITLE: &str = "Please Confirm";
    pub const SEARCH_PLACEHOLDER: &str = "Search...";
    pub const FILTER_ALL: &str = "All";
    pub const CLEAR_FILTERS: &str = "Clear filters";
    pub const SELECTED_TEMPLATE: &str = "{} selected";
    pub const BULK_DONE_TEMPLATE: &str = "{} item(s) updated";
    pub const NOTHING_SELECTED: &str = "Select at least one row first";
    pub const ROW_MISSING: &str = "This record is no longer in the list. Refresh and try again.";
    pub const CANCEL: &str = "Cancel";
    pub const CLOSE: &str = "Close";
    pub const SAVE: &str = "Save";
    pub const SAVING: &str = "Saving...";
    pub const CONFIRM: &str = "Confirm";
    pub const WORKING: &str = "Working...";
    pub const YES: &str = "Yes";
    pub const NO: &str = "No";
}

pub mod upload {
    pub const TITLE: &str = "Upload Results";
    pub const BATCH_HINT: &str =
        "Saved entries are staged on this page until you submit them all at once.";
    pub const IMMEDIATE_HINT: &str = "Each entry is sent to the server as soon as you save it.";
    pub const ACADEMIC_YEAR: &str = "Academic year";
    pub const TERM: &str = "Term";
    pub const CLASS: &str = "Class";
    pub const SUBJECT: &str = "Subject";
    pub const SELECT_TERM: &str = "Select term...";
    pub const TERMS_LOADING: &str = "Loading terms...";
    pub const LOAD_STUDENTS: &str = "Load students";
    pub const LOADING_STUDENTS: &str = "Loading students...";
    pub const PICK_FILTERS_HINT: &str =
        "Pick an academic year, term, class and subject, then load the students.";
    pub const NO_STUDENTS: &str = "No students found in this class";
    pub const NOTHING_STAGED: &str = "No staged results to submit";
    pub const SUBMITTED_COUNT_TEMPLATE: &str = "{} submitted";
    pub const STAGED_COUNT_TEMPLATE: &str = "{} staged";
    pub const SUBMIT_ALL: &str = "Submit all staged";
    pub const SUBMITTING: &str = "Submitting...";
    pub const STUDENT: &str = "Student";
    pub const STUDENT_ID: &str = "Student ID";
    pub const STATUS: &str = "Status";
    pub const ACTIONS: &str = "Actions";
    pub const ENTER_RESULT: &str = "Enter result";
    pub const EDIT_RESULT: &str = "Edit result";
    pub const ENTRY_TITLE_TEMPLATE: &str = "Result for {}";
    pub const CALCULATION_MODE: &str = "Calculation mode";
    pub const MODE_SYSTEM: &str = "System (class + exam)";
    pub const MODE_MANUAL: &str = "Manual total";
    pub const CLASS_SCORE: &str = "Class score";
    pub const EXAM_SCORE: &str = "Exam score";
    pub const TOTAL_SCORE: &str = "Total score";
    pub const GRADE_PREVIEW_TEMPLATE: &str = "Grade: {}";
    pub const REMARKS: &str = "Remarks";
    pub const PUBLISH: &str = "Publish to student";
    pub const CANCEL: &str = "Cancel";
    pub const STAGE: &str = "Save entry";
    pub const SAVE_AND_SUBMIT: &str = "Save and submit";
    pub const SAVING: &str = "Saving...";
}

pub mod term_form {
    pub const TITLE: &str = "New Term";
    pub const ACADEMIC_YEAR: &str = "Academic year";
    pub const SELECT_YEAR: &str = "Select academic year...";
    pub const TERM_NAME: &str = "Term";
    pub const SELECT_TERM: &str = "Select term...";
    pub const START_DATE: &str = "Start date";
    pub const END_DATE: &str = "End date";
    pub const SET_CURRENT: &str = "Set as current term";
    pub const CANCEL: &str = "Cancel";
    pub const CREATE: &str = "Create term";
    pub const SAVING: &str = "Saving...";
}

pub mod not_found {
    pub const TITLE: &str = "404 - Page not found";
    pub const MESSAGE: &str = "The page you are looking for does not exist.";
    pub const BACK_HOME: &str = "Back to dashboard";
}
