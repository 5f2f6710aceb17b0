//! Request plumbing shared by every panel: the transport seam, the API
//! client that decorates requests, the notification and loader seams, the
//! busy guard, the detail fetcher and the mutation submitter.

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::DEFAULT_TOAST_DURATION_MS,
    csrf::{CsrfSource, CSRF_HEADER, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE},
    envelope::{decode_envelope, decode_json, decode_list, ApiError, ListPage, MutationResult, RawResponse},
    form::{FieldSpec, FormValues},
    models::Entity,
    resource::{Action, BodyStyle, Endpoint, HttpMethod},
    table::ListQuery,
    validation::FieldErrors,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

impl RequestBody {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Moves one request over the wire. The browser implementation enforces the
/// timeout; every implementation maps its failures onto [`ApiError`].
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Typed client over a [`Transport`]. Adds `X-Requested-With` to every
/// request and the anti-forgery header to every mutating one.
pub struct ApiClient<T, C> {
    transport: T,
    csrf: C,
}

impl<T: Transport, C: CsrfSource> ApiClient<T, C> {
    pub fn new(transport: T, csrf: C) -> Self {
        Self { transport, csrf }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn decorate(&self, mut request: ApiRequest) -> ApiRequest {
        request
            .headers
            .push((REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE.to_string()));
        if request.method.is_mutating() {
            match self.csrf.token() {
                Some(token) => request.headers.push((CSRF_HEADER, token)),
                None => tracing::warn!(path = %request.path, "no anti-forgery token available"),
            }
        }
        request
    }

    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let request = self.decorate(request);
        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.send(request).await;
        if let Err(err) = &response {
            tracing::warn!(error = %err, "request failed");
        }
        response
    }

    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<R, ApiError> {
        let response = self.send(ApiRequest::get(path).with_query(query)).await?;
        decode_json(&response)
    }

    /// `GET` returning the envelope, failing on `success:false`.
    pub async fn get_envelope(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<MutationResult, ApiError> {
        let response = self.send(ApiRequest::get(path).with_query(query)).await?;
        decode_envelope(&response)
    }

    pub async fn list<E: Entity>(&self, query: &ListQuery) -> Result<ListPage<E>, ApiError> {
        let (path, _) = E::KIND.list_endpoint();
        let response = self
            .send(ApiRequest::get(path).with_query(query.to_pairs(E::KIND)))
            .await?;
        decode_list(&response)
    }

    pub async fn submit(&self, endpoint: &Endpoint, body: RequestBody) -> Result<MutationResult, ApiError> {
        let request = ApiRequest::new(endpoint.method, endpoint.path.clone()).with_body(body);
        let response = self.send(request).await?;
        let result = decode_envelope(&response);
        if let Err(ApiError::Server(message)) = &result {
            tracing::info!(path = %endpoint.path, %message, "server rejected mutation");
        }
        result
    }
}

/// Serialize `values` the way `endpoint` expects, adding the id field for
/// routes that carry the id in the body.
pub fn build_body(endpoint: &Endpoint, spec: &[FieldSpec], values: &FormValues, id: &str) -> RequestBody {
    match endpoint.body {
        BodyStyle::Empty => RequestBody::Empty,
        BodyStyle::Json => {
            let mut json = values.to_json(spec);
            if let (Some(field), Value::Object(map)) = (endpoint.id_field, &mut json) {
                map.insert(field.to_string(), Value::String(id.to_string()));
            }
            RequestBody::Json(json)
        },
        BodyStyle::Form => {
            let mut pairs = values.to_form_pairs(spec);
            if let Some(field) = endpoint.id_field {
                pairs.push((field.to_string(), id.to_string()));
            }
            RequestBody::Form(pairs)
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }
}

/// Fire-and-forget toast surface.
pub trait Notifier {
    fn show_toast(&self, message: &str, kind: ToastKind, duration_ms: u32);

    fn success(&self, message: &str) {
        self.show_toast(message, ToastKind::Success, DEFAULT_TOAST_DURATION_MS);
    }

    fn error(&self, message: &str) {
        self.show_toast(message, ToastKind::Error, DEFAULT_TOAST_DURATION_MS);
    }
}

/// Full-screen loading overlay.
pub trait Loader {
    fn show_loader(&self);
    fn hide_loader(&self);
}

/// Hides the loader when dropped, whichever way the scope is left.
pub struct LoaderGuard<'a, L: Loader + ?Sized> {
    loader: &'a L,
}

impl<'a, L: Loader + ?Sized> LoaderGuard<'a, L> {
    pub fn new(loader: &'a L) -> Self {
        loader.show_loader();
        Self { loader }
    }
}

impl<L: Loader + ?Sized> Drop for LoaderGuard<'_, L> {
    fn drop(&mut self) {
        self.loader.hide_loader();
    }
}

/// Keys of controls whose request is in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Rc<RefCell<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while `key` is already busy; the second trigger is ignored.
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<BusyToken> {
        let key = key.into();
        if !self.keys.borrow_mut().insert(key.clone()) {
            tracing::debug!(%key, "ignoring trigger while busy");
            return None;
        }
        Some(BusyToken {
            keys: Rc::clone(&self.keys),
            key,
        })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.keys.borrow().contains(key)
    }

    /// Busy keys, sorted, for rendering.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys.borrow().iter().cloned().collect();
        keys.sort();
        keys
    }
}

impl PartialEq for InFlight {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.keys, &other.keys)
    }
}

/// Releases its key on drop.
#[derive(Debug)]
pub struct BusyToken {
    keys: Rc<RefCell<HashSet<String>>>,
    key: String,
}

impl BusyToken {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for BusyToken {
    fn drop(&mut self) {
        self.keys.borrow_mut().remove(&self.key);
    }
}

pub fn busy_key(action: Action, id: &str) -> String {
    format!("{action:?}:{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

/// Load one record for view/edit under the loader overlay. Failures are
/// reported through `notifier` and resolve to [`Lookup::NotFound`].
pub async fn fetch_detail<E, T, C, N, L>(
    client: &ApiClient<T, C>,
    notifier: &N,
    loader: &L,
    id: &str,
) -> Lookup<E>
where
    E: Entity,
    T: Transport,
    C: CsrfSource,
    N: Notifier + ?Sized,
    L: Loader + ?Sized,
{
    let Some(endpoint) = E::KIND.endpoint(Action::View, id) else {
        tracing::warn!(kind = %E::KIND, "no detail endpoint");
        return Lookup::NotFound;
    };
    let _loading = LoaderGuard::new(loader);
    let envelope = match client.get_envelope(&endpoint.path, Vec::new()).await {
        Ok(envelope) => envelope,
        Err(err) => {
            notifier.error(&err.user_message());
            return Lookup::NotFound;
        },
    };
    let record = envelope
        .data_as::<E>()
        .or_else(|| E::record_key().and_then(|key| envelope.field_as::<E>(key)));
    match record {
        Some(record) => Lookup::Found(record),
        None => {
            tracing::warn!(kind = %E::KIND, id, "detail payload did not match the record shape");
            notifier.error(&format!("Failed to load {} details", E::KIND.label().to_lowercase()));
            Lookup::NotFound
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Done(MutationResult),
    /// Client-side validation blocked the request.
    Invalid(FieldErrors),
    Failed(ApiError),
}

impl Submission {
    pub fn succeeded(&self) -> Option<&MutationResult> {
        match self {
            Submission::Done(result) => Some(result),
            _ => None,
        }
    }
}

/// One mutation from a dialog or a row button.
#[derive(Debug, Clone)]
pub struct MutationRequest<'a> {
    pub action: Action,
    pub id: &'a str,
    pub spec: &'a [FieldSpec],
    pub values: FormValues,
    /// Extra checks beyond the field list (password pair, date order).
    pub errors: FieldErrors,
}

impl<'a> MutationRequest<'a> {
    /// A button action with no form.
    pub fn bare(action: Action, id: &'a str) -> Self {
        Self {
            action,
            id,
            spec: &[],
            values: FormValues::new(),
            errors: FieldErrors::new(),
        }
    }

    /// The entity's own create/edit form, validated by the entity.
    pub fn entity_form<E: Entity>(action: Action, id: &'a str, values: FormValues) -> Self {
        let errors = E::validate_form(&values);
        Self {
            action,
            id,
            spec: E::form_spec(),
            values,
            errors,
        }
    }

    /// A dialog with its own field list.
    pub fn form(action: Action, id: &'a str, spec: &'a [FieldSpec], values: FormValues) -> Self {
        let errors = crate::form::validate(spec, &values);
        Self {
            action,
            id,
            spec,
            values,
            errors,
        }
    }

    pub fn with_errors(mut self, extra: FieldErrors) -> Self {
        if self.errors.is_empty() {
            self.errors = extra;
        }
        self
    }
}

/// Validate, send, and report. The success message (or a fallback) or the
/// server's error text verbatim goes to `notifier`; the caller patches its
/// table only on [`Submission::Done`].
pub async fn submit_mutation<E, T, C, N>(
    client: &ApiClient<T, C>,
    notifier: &N,
    request: MutationRequest<'_>,
) -> Submission
where
    E: Entity,
    T: Transport,
    C: CsrfSource,
    N: Notifier + ?Sized,
{
    if let Some(message) = request.errors.first_message() {
        notifier.error(message);
        return Submission::Invalid(request.errors);
    }
    let Some(endpoint) = E::KIND.endpoint(request.action, request.id) else {
        let err = ApiError::Server(format!(
            "{} is not available for {}",
            request.action.label(),
            E::KIND.plural_noun()
        ));
        notifier.error(&err.user_message());
        return Submission::Failed(err);
    };
    let body = build_body(&endpoint, request.spec, &request.values, request.id);
    match client.submit(&endpoint, body).await {
        Ok(result) => {
            let fallback = format!("{} {} succeeded", E::KIND.label(), request.action.label().to_lowercase());
            notifier.success(&result.message_or(&fallback));
            Submission::Done(result)
        },
        Err(err) => {
            notifier.error(&err.user_message());
            Submission::Failed(err)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        csrf::StaticToken,
        models::Subject,
        table::{RowChange, TableState},
        test_support::{init_tracing, subject, CountingLoader, FakeTransport, RecordingNotifier},
        ListPage,
    };

    fn client(transport: FakeTransport) -> ApiClient<FakeTransport, StaticToken> {
        ApiClient::new(transport, StaticToken("tok".into()))
    }

    fn loaded(ids: &[&str]) -> TableState<Subject> {
        let mut table = TableState::new();
        table.replace(ListPage {
            success: true,
            items: ids.iter().map(|id| subject(id, "Physics")).collect(),
            pagination: None,
            error: None,
        });
        table
    }

    #[tokio::test]
    async fn server_error_reaches_the_sink_verbatim_and_no_row_changes() {
        init_tracing();
        let transport = FakeTransport::new();
        transport.respond(400, r#"{"success":false,"error":"X"}"#);
        let client = client(transport);
        let notifier = RecordingNotifier::default();
        let mut table = loaded(&["1", "2"]);
        let before = table.clone();

        let outcome = submit_mutation::<Subject, _, _, _>(
            &client,
            &notifier,
            MutationRequest::bare(Action::Delete, "2"),
        )
        .await;
        if let Some(result) = outcome.succeeded() {
            table.apply_success(Action::Delete, "2", result);
        }

        assert_eq!(notifier.messages(), vec![(ToastKind::Error, "X".to_string())]);
        assert_eq!(table, before);
    }

    #[tokio::test]
    async fn delete_42_removes_that_row_and_toasts_the_message() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"success":true,"message":"deleted"}"#);
        let client = client(transport);
        let notifier = RecordingNotifier::default();
        let mut table = loaded(&["7", "42", "421"]);

        let outcome = submit_mutation::<Subject, _, _, _>(
            &client,
            &notifier,
            MutationRequest::bare(Action::Delete, "42"),
        )
        .await;
        let result = outcome.succeeded().expect("delete succeeds");
        assert_eq!(table.apply_success(Action::Delete, "42", result), RowChange::Removed);

        let ids: Vec<String> = table.rows().iter().map(|row| row.id.clone()).collect();
        assert_eq!(ids, vec!["7", "421"]);
        assert_eq!(notifier.messages(), vec![(ToastKind::Success, "deleted".to_string())]);

        let sent = client.transport().requests();
        assert_eq!(sent[0].method, HttpMethod::Delete);
        assert_eq!(sent[0].path, "/academics/subjects/42/delete/");
    }

    #[tokio::test]
    async fn mutations_carry_csrf_and_reads_do_not() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"success":true,"subjects":[]}"#);
        transport.respond(200, r#"{"success":true,"message":"ok"}"#);
        let client = client(transport);

        client
            .list::<Subject>(&ListQuery::new())
            .await
            .expect("list loads");
        let endpoint = Endpoint::post_json("/academics/api/results/publish-bulk/");
        client
            .submit(&endpoint, RequestBody::Json(serde_json::json!({"publish": true})))
            .await
            .expect("submit succeeds");

        let sent = client.transport().requests();
        assert_eq!(sent[0].header(CSRF_HEADER), None);
        assert_eq!(sent[0].header(REQUESTED_WITH_HEADER), Some(REQUESTED_WITH_VALUE));
        assert_eq!(sent[1].header(CSRF_HEADER), Some("tok"));
        assert_eq!(sent[1].header(REQUESTED_WITH_HEADER), Some(REQUESTED_WITH_VALUE));
    }

    #[tokio::test]
    async fn invalid_form_never_hits_the_network() {
        let client = client(FakeTransport::new());
        let notifier = RecordingNotifier::default();
        let values = FormValues::new().with("name", "").with("code", "PHY");

        let outcome = submit_mutation::<Subject, _, _, _>(
            &client,
            &notifier,
            MutationRequest::entity_form::<Subject>(Action::Create, "", values),
        )
        .await;

        match outcome {
            Submission::Invalid(errors) => assert_eq!(errors.get("name"), Some("Name is required")),
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn detail_failure_notifies_and_always_hides_loader() {
        let transport = FakeTransport::new();
        transport.fail(ApiError::Network("offline".into()));
        transport.respond(200, r#"{"success":true,"data":{"id":"9","name":"Biology","code":"BIO"}}"#);
        let client = client(transport);
        let notifier = RecordingNotifier::default();
        let loader = CountingLoader::default();

        let missing = fetch_detail::<Subject, _, _, _, _>(&client, &notifier, &loader, "9").await;
        assert_eq!(missing, Lookup::NotFound);
        assert_eq!(
            notifier.messages(),
            vec![(ToastKind::Error, crate::envelope::GENERIC_ERROR_MESSAGE.to_string())]
        );

        let found = fetch_detail::<Subject, _, _, _, _>(&client, &notifier, &loader, "9").await;
        assert_eq!(found.found().map(|s| s.name), Some("Biology".to_string()));
        assert_eq!(loader.shown(), 2);
        assert!(!loader.visible());
    }

    #[test]
    fn busy_key_rejects_second_trigger_until_released() {
        let in_flight = InFlight::new();
        let key = busy_key(Action::Delete, "42");
        let token = in_flight.try_acquire(key.clone()).expect("first trigger");
        assert!(in_flight.try_acquire(key.clone()).is_none());
        assert!(in_flight.is_busy(&key));
        assert_eq!(in_flight.keys(), vec![key.clone()]);
        drop(token);
        assert!(!in_flight.is_busy(&key));
        assert!(in_flight.try_acquire(key).is_some());
    }

    #[test]
    fn assignment_update_puts_id_in_form_body() {
        let endpoint = crate::EntityKind::TeacherAssignment
            .endpoint(Action::Update, "5")
            .expect("assignment update");
        let values = FormValues::new().with("teacher_id", "t1");
        let body = build_body(&endpoint, crate::form::ASSIGN_TEACHER_FIELDS, &values, "5");
        assert_eq!(
            body,
            RequestBody::Form(vec![
                ("teacher_id".to_string(), "t1".to_string()),
                ("assignment_id".to_string(), "5".to_string()),
            ])
        );
    }

    #[test]
    fn term_set_current_sends_term_id_as_json() {
        let endpoint = crate::EntityKind::Term
            .endpoint(Action::SetCurrent, "7")
            .expect("term set current");
        let body = build_body(&endpoint, &[], &FormValues::new(), "7");
        assert_eq!(body, RequestBody::Json(serde_json::json!({ "term_id": "7" })));
        assert_eq!(body.content_type(), Some("application/json"));
    }
}
