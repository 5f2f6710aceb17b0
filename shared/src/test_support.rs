//! In-memory fakes for the transport, notification, loader and result sink
//! seams.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

use async_trait::async_trait;

use crate::{
    envelope::{ApiError, MutationResult, RawResponse},
    models::{StudentRow, Subject},
    submit::{ApiRequest, Loader, Notifier, ToastKind, Transport},
    upload::{ResultPayload, ResultSink},
};

/// Answers requests from a script, recording what was sent.
#[derive(Default)]
pub struct FakeTransport {
    script: RefCell<VecDeque<Result<RawResponse, ApiError>>>,
    sent: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.script
            .borrow_mut()
            .push_back(Ok(RawResponse::new(status, body)));
    }

    pub fn fail(&self, error: ApiError) {
        self.script.borrow_mut().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.sent.borrow_mut().push(request);
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<(ToastKind, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(ToastKind, String)> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_toast(&self, message: &str, kind: ToastKind, _duration_ms: u32) {
        self.messages.borrow_mut().push((kind, message.to_string()));
    }
}

#[derive(Default)]
pub struct CountingLoader {
    shown: Cell<usize>,
    visible: Cell<bool>,
}

impl CountingLoader {
    pub fn shown(&self) -> usize {
        self.shown.get()
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }
}

impl Loader for CountingLoader {
    fn show_loader(&self) {
        self.shown.set(self.shown.get() + 1);
        self.visible.set(true);
    }

    fn hide_loader(&self) {
        self.visible.set(false);
    }
}

/// Result sink that fails for a fixed set of students.
pub struct ScriptedSink {
    failing: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedSink {
    pub fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ResultSink for ScriptedSink {
    async fn save(&self, payload: ResultPayload) -> Result<MutationResult, ApiError> {
        self.calls.borrow_mut().push(payload.student.clone());
        if self.failing.contains(&payload.student) {
            return Err(ApiError::Server(format!("Could not save result for {}", payload.student)));
        }
        Ok(MutationResult::ok("Result saved successfully"))
    }
}

pub fn subject(id: &str, name: &str) -> Subject {
    Subject {
        id: id.to_string(),
        name: name.to_string(),
        code: format!("SUB{id}"),
        description: None,
        category: "core".to_string(),
        is_active: true,
        teacher_id: None,
        teacher_name: None,
    }
}

/// Roster row whose full name is exactly `name`.
pub fn student(id: &str, name: &str) -> StudentRow {
    StudentRow {
        id: id.to_string(),
        first_name: name.to_string(),
        last_name: String::new(),
        username: format!("user{id}"),
        student_id: None,
    }
}

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
