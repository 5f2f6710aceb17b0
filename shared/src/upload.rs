//! Bulk results entry: the four-way filter, the roster session that stages
//! one result per student, and the batch submitter that sends them.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde::Deserialize;

use crate::{
    config::CommitMode,
    csrf::CsrfSource,
    envelope::{decode_json, decode_list, ApiError, MutationResult},
    models::{StudentRow, Term},
    resource::{paths, Action, EntityKind},
    score::{CalculationMode, ScoreEntry, ScoreInput},
    submit::{ApiClient, ApiRequest, Notifier, RequestBody, Transport},
    validation::ValidationError,
};

/// Academic year, term, class and subject picked on the upload page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadFilters {
    pub academic_year: String,
    pub term: String,
    pub class_level: String,
    pub subject: String,
}

impl UploadFilters {
    /// A new year invalidates the term choice. Returns whether the year
    /// changed, in which case the caller reloads that year's terms.
    pub fn set_academic_year(&mut self, year: &str) -> bool {
        if self.academic_year == year {
            return false;
        }
        self.academic_year = year.to_string();
        self.term.clear();
        true
    }

    pub fn is_complete(&self) -> bool {
        [&self.academic_year, &self.term, &self.class_level, &self.subject]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ValidationError::IncompleteSelection)
        }
    }

    fn students_query(&self) -> Vec<(String, String)> {
        vec![
            ("class_level_id".to_string(), self.class_level.clone()),
            ("academic_year_id".to_string(), self.academic_year.clone()),
        ]
    }

    fn existing_query(&self) -> Vec<(String, String)> {
        vec![
            ("class_level_id".to_string(), self.class_level.clone()),
            ("subject_id".to_string(), self.subject.clone()),
            ("term_id".to_string(), self.term.clone()),
        ]
    }
}

/// A result already stored on the server for this class, subject and term.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExistingResult {
    #[serde(default)]
    pub class_score: Option<f64>,
    #[serde(default)]
    pub exam_score: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub calculation_mode: Option<CalculationMode>,
    #[serde(default)]
    pub is_published: bool,
}

impl From<ExistingResult> for ScoreEntry {
    fn from(existing: ExistingResult) -> Self {
        let calculation_mode = existing.calculation_mode.unwrap_or_default();
        ScoreEntry {
            calculation_mode,
            class_score: existing.class_score.unwrap_or(0.0),
            exam_score: existing.exam_score.unwrap_or(0.0),
            score: match calculation_mode {
                CalculationMode::Manual => existing.score,
                CalculationMode::System => None,
            },
            remarks: existing.remarks.unwrap_or_default(),
            is_published: existing.is_published,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExistingResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: HashMap<String, ExistingResult>,
    #[serde(default)]
    error: Option<String>,
}

/// Form body of one result submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPayload {
    pub student: String,
    pub class_level: String,
    pub subject: String,
    pub term: String,
    pub academic_year: String,
    pub entry: ScoreEntry,
}

impl ResultPayload {
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("student".to_string(), self.student.clone()),
            ("class_level".to_string(), self.class_level.clone()),
            ("subject".to_string(), self.subject.clone()),
            ("term".to_string(), self.term.clone()),
            ("academic_year".to_string(), self.academic_year.clone()),
            (
                "calculation_mode".to_string(),
                self.entry.calculation_mode.as_str().to_string(),
            ),
            ("remarks".to_string(), self.entry.remarks.clone()),
        ];
        if self.entry.is_published {
            pairs.push(("is_published".to_string(), "on".to_string()));
        }
        pairs.push(("class_score".to_string(), self.entry.class_score.to_string()));
        pairs.push(("exam_score".to_string(), self.entry.exam_score.to_string()));
        if let (CalculationMode::Manual, Some(score)) = (self.entry.calculation_mode, self.entry.score) {
            pairs.push(("score".to_string(), score.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Pending,
    Staged(String),
    Submitted(String),
}

impl RowStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RowStatus::Pending => "Pending",
            RowStatus::Staged(_) => "Staged",
            RowStatus::Submitted(_) => "Submitted",
        }
    }
}

/// Per-page upload state, created when the roster loads and dropped with
/// the page.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    filters: UploadFilters,
    mode: CommitMode,
    students: Vec<StudentRow>,
    staged: BTreeMap<String, ScoreEntry>,
    submitted: BTreeMap<String, ScoreEntry>,
}

impl UploadSession {
    pub fn new(filters: UploadFilters, mode: CommitMode, students: Vec<StudentRow>) -> Self {
        Self {
            filters,
            mode,
            students,
            staged: BTreeMap::new(),
            submitted: BTreeMap::new(),
        }
    }

    pub fn filters(&self) -> &UploadFilters {
        &self.filters
    }

    pub fn mode(&self) -> CommitMode {
        self.mode
    }

    pub fn students(&self) -> &[StudentRow] {
        &self.students
    }

    pub fn student(&self, id: &str) -> Option<&StudentRow> {
        self.students.iter().find(|student| student.id == id)
    }

    /// Record results the server already holds as submitted. Ids not on the
    /// roster are ignored.
    pub fn merge_existing(&mut self, existing: HashMap<String, ExistingResult>) {
        for (student_id, result) in existing {
            if self.student(&student_id).is_none() {
                continue;
            }
            self.staged.remove(&student_id);
            self.submitted.insert(student_id, result.into());
        }
    }

    /// Pre-fill for the entry dialog: the staged edit if any, otherwise the
    /// submitted result, otherwise blank.
    pub fn open_entry(&self, student_id: &str) -> ScoreInput {
        self.staged
            .get(student_id)
            .or_else(|| self.submitted.get(student_id))
            .map(ScoreEntry::to_input)
            .unwrap_or_default()
    }

    /// Stage (or replace) the entry for one student.
    pub fn stage(&mut self, student_id: &str, entry: ScoreEntry) {
        self.staged.insert(student_id.to_string(), entry);
    }

    pub fn record_submitted(&mut self, student_id: &str, entry: ScoreEntry) {
        self.staged.remove(student_id);
        self.submitted.insert(student_id.to_string(), entry);
    }

    pub fn status(&self, student_id: &str) -> RowStatus {
        if let Some(entry) = self.staged.get(student_id) {
            return RowStatus::Staged(entry.status_text());
        }
        match self.submitted.get(student_id) {
            Some(entry) => RowStatus::Submitted(entry.status_text()),
            None => RowStatus::Pending,
        }
    }

    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.len()
    }

    pub fn can_submit(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn payload(&self, student_id: &str, entry: ScoreEntry) -> ResultPayload {
        ResultPayload {
            student: student_id.to_string(),
            class_level: self.filters.class_level.clone(),
            subject: self.filters.subject.clone(),
            term: self.filters.term.clone(),
            academic_year: self.filters.academic_year.clone(),
            entry,
        }
    }

    /// Staged, not yet submitted entries in roster order.
    pub fn pending_batch(&self) -> Vec<(StudentRow, ResultPayload)> {
        self.students
            .iter()
            .filter_map(|student| {
                let entry = self.staged.get(&student.id)?;
                Some((student.clone(), self.payload(&student.id, entry.clone())))
            })
            .collect()
    }

    /// Move every success to submitted. Failures and skips stay staged.
    pub fn apply_report(&mut self, report: &BatchReport) {
        for student_id in &report.succeeded {
            if let Some(entry) = self.staged.remove(student_id) {
                self.submitted.insert(student_id.clone(), entry);
            }
        }
    }
}

/// Where result submissions go.
#[async_trait(?Send)]
pub trait ResultSink {
    async fn save(&self, payload: ResultPayload) -> Result<MutationResult, ApiError>;
}

#[async_trait(?Send)]
impl<T: Transport, C: CsrfSource> ResultSink for ApiClient<T, C> {
    async fn save(&self, payload: ResultPayload) -> Result<MutationResult, ApiError> {
        let endpoint = EntityKind::Result
            .endpoint(Action::Create, "")
            .ok_or_else(|| ApiError::Server("Result upload is not available".to_string()))?;
        self.submit(&endpoint, RequestBody::Form(payload.to_form_pairs()))
            .await
    }
}

/// Shared cancellation flag. Once set, the batch starts no new submissions.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedStudent {
    pub student_id: String,
    pub name: String,
    pub error: String,
}

/// Outcome of one batch, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedStudent>,
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut text = format!("{} result(s) saved.", self.succeeded.len());
        if !self.failed.is_empty() {
            let names: Vec<&str> = self.failed.iter().map(|f| f.name.as_str()).collect();
            text.push_str(&format!(" {} failed: {}.", self.failed.len(), names.join(", ")));
        }
        if !self.skipped.is_empty() {
            text.push_str(&format!(" {} not sent.", self.skipped.len()));
        }
        text
    }
}

enum Outcome {
    Saved,
    Failed(String),
    Skipped,
}

/// Send every staged entry, one request per student, at most `concurrency`
/// at a time. Partial failure is tolerated and nothing is retried; the
/// session is updated from the report before returning.
pub async fn submit_batch<S: ResultSink + ?Sized>(
    sink: &S,
    session: &RefCell<UploadSession>,
    concurrency: usize,
    cancel: &CancelToken,
) -> BatchReport {
    let jobs = session.borrow().pending_batch();
    tracing::info!(count = jobs.len(), concurrency, "submitting staged results");

    let outcomes: Vec<(StudentRow, Outcome)> = stream::iter(jobs.into_iter().map(|(student, payload)| async move {
        if cancel.is_cancelled() {
            return (student, Outcome::Skipped);
        }
        let outcome = match sink.save(payload).await {
            Ok(_) => Outcome::Saved,
            Err(ApiError::Cancelled) => Outcome::Skipped,
            Err(err) => Outcome::Failed(err.user_message()),
        };
        (student, outcome)
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await;

    let mut report = BatchReport::default();
    for (student, outcome) in outcomes {
        match outcome {
            Outcome::Saved => report.succeeded.push(student.id),
            Outcome::Skipped => report.skipped.push(student.id),
            Outcome::Failed(error) => {
                tracing::warn!(student = %student.id, %error, "result submission failed");
                report.failed.push(FailedStudent {
                    name: student.full_name(),
                    student_id: student.id,
                    error,
                });
            },
        }
    }
    session.borrow_mut().apply_report(&report);
    report
}

/// Immediate commit: send one entry now and record it as submitted on
/// success. On failure nothing is staged.
pub async fn save_immediately<S, N>(
    sink: &S,
    notifier: &N,
    session: &RefCell<UploadSession>,
    student_id: &str,
    entry: ScoreEntry,
) -> bool
where
    S: ResultSink + ?Sized,
    N: Notifier + ?Sized,
{
    let payload = session.borrow().payload(student_id, entry.clone());
    match sink.save(payload).await {
        Ok(result) => {
            session.borrow_mut().record_submitted(student_id, entry);
            notifier.success(&result.message_or("Result saved successfully"));
            true
        },
        Err(err) => {
            notifier.error(&err.user_message());
            false
        },
    }
}

/// Commit a dialog save according to the session's mode.
pub async fn commit_entry<S, N>(
    sink: &S,
    notifier: &N,
    session: &RefCell<UploadSession>,
    student_id: &str,
    entry: ScoreEntry,
) -> bool
where
    S: ResultSink + ?Sized,
    N: Notifier + ?Sized,
{
    let mode = session.borrow().mode();
    match mode {
        CommitMode::Immediate => save_immediately(sink, notifier, session, student_id, entry).await,
        CommitMode::Batch => {
            session.borrow_mut().stage(student_id, entry);
            true
        },
    }
}

pub async fn load_terms<T: Transport, C: CsrfSource>(
    client: &ApiClient<T, C>,
    academic_year: &str,
) -> Result<Vec<Term>, ApiError> {
    let response = client
        .send(
            ApiRequest::get(paths::TERMS_FOR_YEAR)
                .with_query(vec![("academic_year".to_string(), academic_year.to_string())]),
        )
        .await?;
    Ok(decode_list::<Term>(&response)?.items)
}

/// Load the roster and merge the results already on the server.
pub async fn load_session<T: Transport, C: CsrfSource>(
    client: &ApiClient<T, C>,
    filters: UploadFilters,
    mode: CommitMode,
) -> Result<UploadSession, ApiError> {
    filters.validate()?;
    let response = client
        .send(ApiRequest::get(paths::RESULT_STUDENTS).with_query(filters.students_query()))
        .await?;
    let students = decode_list::<StudentRow>(&response)?.items;

    let response = client
        .send(ApiRequest::get(paths::EXISTING_RESULTS).with_query(filters.existing_query()))
        .await?;
    let existing: ExistingResponse = decode_json(&response)?;
    if !existing.success {
        return Err(ApiError::Server(
            existing
                .error
                .unwrap_or_else(|| "Failed to load existing results".to_string()),
        ));
    }

    let mut session = UploadSession::new(filters, mode, students);
    session.merge_existing(existing.results);
    tracing::info!(
        students = session.students().len(),
        submitted = session.submitted_count(),
        "upload roster loaded"
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        csrf::StaticToken,
        submit::ToastKind,
        test_support::{init_tracing, student, FakeTransport, RecordingNotifier, ScriptedSink},
    };

    fn filters() -> UploadFilters {
        UploadFilters {
            academic_year: "y1".into(),
            term: "t1".into(),
            class_level: "c1".into(),
            subject: "s1".into(),
        }
    }

    fn entry(class: f64, exam: f64) -> ScoreEntry {
        ScoreEntry {
            calculation_mode: CalculationMode::System,
            class_score: class,
            exam_score: exam,
            score: None,
            remarks: String::new(),
            is_published: false,
        }
    }

    fn session_with(ids: &[&str], mode: CommitMode) -> UploadSession {
        let students = ids.iter().map(|id| student(id, &format!("Student {id}"))).collect();
        UploadSession::new(filters(), mode, students)
    }

    #[test]
    fn all_four_filters_are_required_and_year_change_clears_term() {
        let mut filters = filters();
        assert!(filters.is_complete());
        assert!(filters.set_academic_year("y2"));
        assert_eq!(filters.term, "");
        assert_eq!(filters.validate(), Err(ValidationError::IncompleteSelection));
        assert!(!filters.set_academic_year("y2"));
    }

    #[test]
    fn staging_is_idempotent_and_reopens_the_latest_edit() {
        let mut session = session_with(&["1", "2"], CommitMode::Batch);
        session.stage("1", entry(20.0, 50.0));
        session.stage("1", entry(25.0, 55.0));
        assert_eq!(session.staged_count(), 1);
        let input = session.open_entry("1");
        assert_eq!((input.class_score.as_str(), input.exam_score.as_str()), ("25", "55"));
        assert_eq!(session.status("1"), RowStatus::Staged("Class: 25, Exam: 55".into()));
        assert_eq!(session.status("2"), RowStatus::Pending);
        assert_eq!(session.open_entry("2"), ScoreInput::default());
    }

    #[test]
    fn existing_results_show_as_submitted() {
        let mut session = session_with(&["1", "2"], CommitMode::Batch);
        let existing: HashMap<String, ExistingResult> = serde_json::from_str(
            r#"{"2":{"class_score":null,"exam_score":null,"score":64,"calculation_mode":"manual","remarks":"Steady"},
                "99":{"score":10}}"#,
        )
        .expect("existing results");
        session.merge_existing(existing);
        assert_eq!(session.status("2"), RowStatus::Submitted("Total: 64".into()));
        assert_eq!(session.submitted_count(), 1);
        assert_eq!(session.open_entry("2").remarks, "Steady");
    }

    #[test]
    fn payload_fields() {
        let session = session_with(&["1"], CommitMode::Batch);
        let mut manual = entry(0.0, 0.0);
        manual.calculation_mode = CalculationMode::Manual;
        manual.score = Some(81.5);
        manual.is_published = true;
        let pairs = session.payload("1", manual).to_form_pairs();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("student"), Some("1"));
        assert_eq!(get("class_level"), Some("c1"));
        assert_eq!(get("calculation_mode"), Some("manual"));
        assert_eq!(get("is_published"), Some("on"));
        assert_eq!(get("score"), Some("81.5"));

        let pairs = session.payload("1", entry(30.0, 40.0)).to_form_pairs();
        assert!(!pairs.iter().any(|(k, _)| k == "score" || k == "is_published"));
    }

    #[tokio::test]
    async fn partial_failure_reports_names_and_never_resends_successes() {
        init_tracing();
        let ids = ["1", "2", "3", "4", "5"];
        let mut session = session_with(&ids, CommitMode::Batch);
        for id in ids {
            session.stage(id, entry(20.0, 50.0));
        }
        let session = RefCell::new(session);
        let sink = ScriptedSink::failing(&["2", "4"]);

        let report = submit_batch(&sink, &session, 1, &CancelToken::new()).await;
        assert_eq!(report.succeeded, vec!["1", "3", "5"]);
        let failed: Vec<&str> = report.failed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, vec!["Student 2", "Student 4"]);
        assert_eq!(
            report.summary(),
            "3 result(s) saved. 2 failed: Student 2, Student 4."
        );
        assert_eq!(session.borrow().status("1"), RowStatus::Submitted("Class: 20, Exam: 50".into()));
        assert!(matches!(session.borrow().status("2"), RowStatus::Staged(_)));

        let report = submit_batch(&sink, &session, 1, &CancelToken::new()).await;
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 2);
        let sent: Vec<String> = sink.calls();
        assert_eq!(sent, vec!["1", "2", "3", "4", "5", "2", "4"]);
    }

    #[tokio::test]
    async fn bounded_concurrency_keeps_roster_order() {
        let ids = ["a", "b", "c", "d"];
        let mut session = session_with(&ids, CommitMode::Batch);
        for id in ids.iter().rev() {
            session.stage(id, entry(10.0, 10.0));
        }
        let session = RefCell::new(session);
        let sink = ScriptedSink::failing(&["c"]);

        let report = submit_batch(&sink, &session, 3, &CancelToken::new()).await;
        assert_eq!(report.succeeded, vec!["a", "b", "d"]);
        assert_eq!(report.failed[0].student_id, "c");
        let sent: HashSet<String> = sink.calls().into_iter().collect();
        assert_eq!(sent.len(), 4);
    }

    #[tokio::test]
    async fn cancelled_batch_sends_nothing_new() {
        let mut session = session_with(&["1", "2"], CommitMode::Batch);
        session.stage("1", entry(1.0, 1.0));
        session.stage("2", entry(2.0, 2.0));
        let session = RefCell::new(session);
        let sink = ScriptedSink::failing(&[]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let report = submit_batch(&sink, &session, 1, &cancel).await;
        assert_eq!(report.skipped, vec!["1", "2"]);
        assert!(sink.calls().is_empty());
        assert_eq!(session.borrow().staged_count(), 2);
        assert!(report.summary().ends_with("2 not sent."));
    }

    #[tokio::test]
    async fn immediate_mode_stages_nothing_on_failure() {
        let session = RefCell::new(session_with(&["1", "2"], CommitMode::Immediate));
        let sink = ScriptedSink::failing(&["2"]);
        let notifier = RecordingNotifier::default();

        assert!(commit_entry(&sink, &notifier, &session, "1", entry(30.0, 60.0)).await);
        assert!(!commit_entry(&sink, &notifier, &session, "2", entry(30.0, 60.0)).await);

        assert!(matches!(session.borrow().status("1"), RowStatus::Submitted(_)));
        assert_eq!(session.borrow().status("2"), RowStatus::Pending);
        assert_eq!(session.borrow().staged_count(), 0);
        let kinds: Vec<ToastKind> = notifier.messages().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![ToastKind::Success, ToastKind::Error]);
    }

    #[tokio::test]
    async fn load_session_merges_existing_results() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            r#"{"success":true,"students":[
                {"id":1,"first_name":"Ama","last_name":"Mensah","username":"ama","student_profile__student_id":"S1"},
                {"id":2,"first_name":"Kojo","last_name":"Asante","username":"kojo","student_profile__student_id":null}]}"#,
        );
        transport.respond(
            200,
            r#"{"success":true,"results":{"1":{"class_score":25,"exam_score":50,"score":75,"calculation_mode":"system"}}}"#,
        );
        let client = ApiClient::new(transport, StaticToken("tok".into()));

        let session = load_session(&client, filters(), CommitMode::Batch)
            .await
            .expect("roster loads");
        assert_eq!(session.students().len(), 2);
        assert_eq!(session.status("1"), RowStatus::Submitted("Class: 25, Exam: 50".into()));
        assert_eq!(session.status("2"), RowStatus::Pending);

        let sent = client.transport().requests();
        assert_eq!(sent[0].path, paths::RESULT_STUDENTS);
        assert!(sent[1]
            .query
            .contains(&("subject_id".to_string(), "s1".to_string())));
    }

    #[tokio::test]
    async fn incomplete_filters_block_loading() {
        let client = ApiClient::new(FakeTransport::new(), StaticToken("tok".into()));
        let err = load_session(&client, UploadFilters::default(), CommitMode::Batch)
            .await
            .expect_err("incomplete");
        assert_eq!(err, ApiError::Validation(ValidationError::IncompleteSelection));
        assert!(client.transport().requests().is_empty());
    }
}
