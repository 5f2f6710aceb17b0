//! Generic list/table panel shared by every admin entity page.
//!
//! One [`PanelState`] per mounted panel lives behind a `use_mut_ref`; async
//! tasks write into it and ask for a re-render. A list response is applied
//! only when it answers the latest request, and a detail response only when
//! its modal ticket is still current.

use std::{cell::RefCell, rc::Rc};

use gloo_timers::callback::Timeout;
use school_admin_shared::{
    bulk::BulkAction,
    form::{FieldSpec, FormValues, OptionSource, ASSIGN_SUBJECTS_FIELDS, ASSIGN_TEACHER_FIELDS, PASSWORD_FIELDS},
    modal::{CloseReason, LoadTicket, ModalController, ModalKind, OpenModal, SUCCESS_CLOSE_DELAY_MS},
    submit::{busy_key, fetch_detail, submit_mutation, InFlight, Lookup, MutationRequest, Notifier, Submission},
    table::{ListQuery, RowChange, TableState},
    validation::{validate_password_change, FieldErrors, ValidationError},
    Action, Entity,
};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::Link;

use crate::{
    api::{self, Client},
    components::{
        entity_table::{tone_badge_class, EntityTable},
        error_banner::ErrorBanner,
        form_fields::{FormFields, SelectInput},
        loading_spinner::LoadingSpinner,
        modal::Modal,
        pagination::Pagination,
    },
    config::panel_config,
    feedback_context::{use_feedback, Feedback},
    hooks::{use_body_scroll_lock, use_debounced_callback},
    i18n::{current::panel as t, fill_one},
    router::Route,
    utils::status_date,
};

/// A control in the filter bar above the table.
#[derive(Clone, Copy, PartialEq)]
pub enum ListFilter {
    /// Free text sent as `search`, debounced.
    Search,
    Select {
        name: &'static str,
        label: &'static str,
        source: OptionSource,
    },
}

pub const SEARCH_FILTER: &str = "search";

#[derive(Properties, PartialEq)]
pub struct EntityPanelProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub description: Option<AttrValue>,
    #[prop_or_default]
    pub filters: Vec<ListFilter>,
    /// Page that creates records of this kind instead of the generic form.
    #[prop_or_default]
    pub create_route: Option<Route>,
}

#[derive(Debug, Clone)]
struct FormDialog {
    action: Action,
    spec: &'static [FieldSpec],
    values: FormValues,
    errors: FieldErrors,
}

#[derive(Debug, Clone)]
enum PanelModal<T> {
    Record(T),
    Form(FormDialog),
    Confirm { action: Action, name: String },
    BulkConfirm { action: BulkAction, ids: Vec<String> },
}

struct PanelState<T> {
    query: ListQuery,
    table: TableState<T>,
    modal: ModalController<PanelModal<T>>,
    selected: Vec<String>,
    search_text: String,
    loading: bool,
    load_error: Option<String>,
    list_seq: u64,
}

impl<T: Entity> PanelState<T> {
    fn new() -> Self {
        Self {
            query: ListQuery::new(),
            table: TableState::new(),
            modal: ModalController::new(),
            selected: Vec::new(),
            search_text: String::new(),
            loading: true,
            load_error: None,
            list_seq: 0,
        }
    }
}

/// What a confirmed dialog sends.
enum Payload {
    Bare,
    EntityForm(FormValues),
    Fields(&'static [FieldSpec], FormValues, FieldErrors),
}

#[derive(Clone)]
struct PanelHandles<T: Entity> {
    state: Rc<RefCell<PanelState<T>>>,
    client: Rc<Client>,
    feedback: Feedback,
    in_flight: Rc<InFlight>,
    force: UseForceUpdateHandle,
}

impl<T: Entity> PanelHandles<T> {
    fn refresh(&self) {
        self.force.force_update();
    }

    fn reload(&self) {
        let (seq, query) = {
            let mut state = self.state.borrow_mut();
            state.list_seq += 1;
            state.loading = true;
            (state.list_seq, state.query.clone())
        };
        self.refresh();

        let handles = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = handles.client.list::<T>(&query).await;
            {
                let mut state = handles.state.borrow_mut();
                if state.list_seq != seq {
                    return;
                }
                state.loading = false;
                match result {
                    Ok(page) => {
                        state.table.replace(page);
                        state.load_error = None;
                        state.selected.clear();
                    },
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Failed to load {}: {}", T::KIND.plural_noun(), e).into(),
                        );
                        state.load_error = Some(e.user_message());
                    },
                }
            }
            handles.refresh();
        });
    }

    fn set_page(&self, page: usize) {
        self.state.borrow_mut().query.set_page(page);
        self.reload();
    }

    fn set_filter(&self, name: &str, value: &str) {
        self.state.borrow_mut().query.set_filter(name, value);
        self.reload();
    }

    fn clear_filters(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.query.clear_filters();
            state.search_text.clear();
        }
        self.reload();
    }

    fn close(&self, reason: CloseReason) {
        if self.state.borrow_mut().modal.close(reason) {
            self.refresh();
        }
    }

    fn row(&self, id: &str) -> Option<T> {
        self.state.borrow().table.find(id).cloned()
    }

    fn open_now(&self, kind: ModalKind, id: Option<String>, payload: PanelModal<T>) {
        self.state.borrow_mut().modal.open_with(kind, id, payload);
        self.refresh();
    }

    /// Open `kind` for `id`, filling it from the loaded row or from the
    /// detail endpoint.
    fn open_record(&self, kind: ModalKind, id: String, build: fn(T) -> PanelModal<T>) {
        if T::KIND.detail_from_list() {
            match self.row(&id) {
                Some(row) => self.open_now(kind, Some(id), build(row)),
                None => self.feedback.error(t::ROW_MISSING),
            }
            return;
        }

        let ticket = self.state.borrow_mut().modal.open(kind, Some(id.clone()));
        self.refresh();
        let handles = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let lookup = fetch_detail::<T, _, _, _, _>(
                handles.client.as_ref(),
                &handles.feedback,
                &handles.feedback,
                &id,
            )
            .await;
            {
                let mut state = handles.state.borrow_mut();
                match lookup {
                    Lookup::Found(record) => {
                        state.modal.resolve(ticket, build(record));
                    },
                    Lookup::NotFound => {
                        state.modal.abandon(ticket);
                    },
                }
            }
            handles.refresh();
        });
    }

    fn open_create(&self) {
        let dialog = FormDialog {
            action: Action::Create,
            spec: T::form_spec(),
            values: T::create_values(),
            errors: FieldErrors::new(),
        };
        self.open_now(ModalKind::Create, None, PanelModal::Form(dialog));
    }

    fn on_row_action(&self, action: Action, id: String) {
        match action {
            Action::View => self.open_record(ModalKind::View, id, PanelModal::Record),
            Action::Update => self.open_record(ModalKind::Edit, id, |record: T| {
                PanelModal::Form(FormDialog {
                    action: Action::Update,
                    spec: T::form_spec(),
                    values: record.form_values(),
                    errors: FieldErrors::new(),
                })
            }),
            Action::Publish => self.mutate(action, id, Payload::Bare, None),
            action if action.needs_confirmation() => {
                let name = self
                    .row(&id)
                    .map(|row| row.display_name())
                    .unwrap_or_else(|| id.clone());
                self.open_now(
                    ModalKind::Confirm,
                    Some(id),
                    PanelModal::Confirm {
                        action,
                        name,
                    },
                );
            },
            Action::AssignTeacher | Action::AssignSubjects | Action::ChangePassword => {
                let (kind, spec) = match action {
                    Action::AssignTeacher => (ModalKind::Assign, ASSIGN_TEACHER_FIELDS),
                    Action::AssignSubjects => (ModalKind::Assign, ASSIGN_SUBJECTS_FIELDS),
                    _ => (ModalKind::ChangePassword, PASSWORD_FIELDS),
                };
                let dialog = FormDialog {
                    action,
                    spec,
                    values: FormValues::new(),
                    errors: FieldErrors::new(),
                };
                self.open_now(kind, Some(id), PanelModal::Form(dialog));
            },
            other => {
                web_sys::console::warn_1(&format!("Unhandled row action {:?}", other).into());
            },
        }
    }

    fn edit_field(&self, ticket: LoadTicket, name: String, value: String) {
        {
            let mut state = self.state.borrow_mut();
            let Some(open) = state.modal.current_mut() else {
                return;
            };
            if open.ticket != ticket {
                return;
            }
            if let Some(PanelModal::Form(dialog)) = open.payload.as_mut() {
                dialog.values.set(&name, value);
            }
        }
        self.refresh();
    }

    /// Submit the open dialog identified by `ticket`.
    fn submit_dialog(&self, ticket: LoadTicket) {
        let (target, payload) = {
            let state = self.state.borrow();
            let Some(open) = state.modal.current().filter(|open| open.ticket == ticket) else {
                return;
            };
            (open.target.clone().unwrap_or_default(), open.payload.clone())
        };

        match payload {
            Some(PanelModal::Form(dialog)) => {
                let payload = match dialog.action {
                    Action::Create | Action::Update => Payload::EntityForm(dialog.values),
                    Action::ChangePassword => {
                        let extra = password_errors(&dialog.values);
                        Payload::Fields(dialog.spec, dialog.values, extra)
                    },
                    _ => Payload::Fields(dialog.spec, dialog.values, FieldErrors::new()),
                };
                self.mutate(dialog.action, target, payload, Some(ticket));
            },
            Some(PanelModal::Confirm { action, .. }) => {
                self.mutate(action, target, Payload::Bare, Some(ticket));
            },
            Some(PanelModal::BulkConfirm { action, ids }) => self.bulk(action, ids, ticket),
            Some(PanelModal::Record(_)) | None => {},
        }
    }

    fn mutate(&self, action: Action, id: String, payload: Payload, ticket: Option<LoadTicket>) {
        let Some(busy) = self.in_flight.try_acquire(busy_key(action, &id)) else {
            return;
        };
        self.refresh();

        let handles = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let request = match payload {
                Payload::Bare => MutationRequest::bare(action, &id),
                Payload::EntityForm(values) => MutationRequest::entity_form::<T>(action, &id, values),
                Payload::Fields(spec, values, extra) => {
                    MutationRequest::form(action, &id, spec, values).with_errors(extra)
                },
            };
            let outcome = submit_mutation::<T, _, _, _>(handles.client.as_ref(), &handles.feedback, request).await;
            drop(busy);

            match outcome {
                Submission::Done(result) => {
                    let change = handles
                        .state
                        .borrow_mut()
                        .table
                        .apply_success(action, &id, &result);
                    if change == RowChange::Reload {
                        handles.reload();
                    }
                    if let Some(ticket) = ticket {
                        handles.close_after_success(ticket);
                    }
                },
                Submission::Invalid(errors) => {
                    if let Some(ticket) = ticket {
                        handles.show_errors(ticket, errors);
                    }
                },
                Submission::Failed(_) => {},
            }
            handles.refresh();
        });
    }

    fn bulk(&self, action: BulkAction, ids: Vec<String>, ticket: LoadTicket) {
        let Some(busy) = self.in_flight.try_acquire(bulk_busy_key(action)) else {
            return;
        };
        self.refresh();

        let handles = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = api::submit_bulk(&handles.client, action, &ids).await;
            drop(busy);
            match outcome {
                Ok(result) => {
                    handles
                        .feedback
                        .success(&result.message_or(&fill_one(t::BULK_DONE_TEMPLATE, ids.len())));
                    handles.reload();
                    handles.close_after_success(ticket);
                },
                Err(e) => handles.feedback.error(&e.user_message()),
            }
            handles.refresh();
        });
    }

    fn close_after_success(&self, ticket: LoadTicket) {
        let handles = self.clone();
        Timeout::new(SUCCESS_CLOSE_DELAY_MS, move || {
            let closed = {
                let mut state = handles.state.borrow_mut();
                state.modal.is_current(ticket) && state.modal.close(CloseReason::MutationSucceeded)
            };
            if closed {
                handles.refresh();
            }
        })
        .forget();
    }

    fn show_errors(&self, ticket: LoadTicket, errors: FieldErrors) {
        let mut state = self.state.borrow_mut();
        if let Some(open) = state.modal.current_mut().filter(|open| open.ticket == ticket) {
            if let Some(PanelModal::Form(dialog)) = open.payload.as_mut() {
                dialog.errors = errors;
            }
        }
    }

    fn toggle_select(&self, id: String) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(index) = state.selected.iter().position(|selected| *selected == id) {
                state.selected.remove(index);
            } else {
                state.selected.push(id);
            }
        }
        self.refresh();
    }

    fn toggle_all(&self, select: bool) {
        {
            let mut state = self.state.borrow_mut();
            let next = if select {
                state.table.rows().iter().map(|row| row.id()).collect()
            } else {
                Vec::new()
            };
            state.selected = next;
        }
        self.refresh();
    }

    fn open_bulk(&self, action: BulkAction) {
        let ids = self.state.borrow().selected.clone();
        if ids.is_empty() {
            self.feedback.error(t::NOTHING_SELECTED);
            return;
        }
        self.open_now(ModalKind::Confirm, None, PanelModal::BulkConfirm { action, ids });
    }
}

fn password_errors(values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Err(err) = validate_password_change(values.get("new_password"), values.get("confirm_password")) {
        let field = match err {
            ValidationError::PasswordMismatch => "confirm_password",
            _ => "new_password",
        };
        errors.insert(field, &err);
    }
    errors
}

fn bulk_busy_key(action: BulkAction) -> String {
    format!("bulk:{action:?}")
}

#[function_component(EntityPanel)]
pub fn entity_panel<T>(props: &EntityPanelProps) -> Html
where
    T: Entity,
{
    let state = use_mut_ref(PanelState::<T>::new);
    let client = use_memo((), |_| api::client());
    let in_flight = use_memo((), |_| InFlight::new());
    let feedback = use_feedback();
    let force = use_force_update();

    let handles = PanelHandles {
        state: state.clone(),
        client,
        feedback,
        in_flight,
        force,
    };

    {
        let handles = handles.clone();
        use_effect_with((), move |_| {
            handles.reload();
            || ()
        });
    }

    let on_search = {
        let handles = handles.clone();
        use_debounced_callback(
            panel_config().search_debounce_ms,
            Callback::from(move |text: String| handles.set_filter(SEARCH_FILTER, &text)),
        )
    };

    use_body_scroll_lock(state.borrow().modal.body_scroll_locked());

    let state = state.borrow();
    let kind = T::KIND;
    let busy = handles.in_flight.keys();

    let create_button = if let Some(route) = props.create_route.clone() {
        html! {
            <Link<Route> to={route} classes={primary_button_classes()}>
                { fill_one(t::CREATE_TEMPLATE, kind.label()) }
            </Link<Route>>
        }
    } else if !T::form_spec().is_empty() && kind.supports(Action::Create) {
        let handles = handles.clone();
        let onclick = Callback::from(move |_: MouseEvent| handles.open_create());
        html! {
            <button type="button" class={primary_button_classes()} onclick={onclick}>
                { fill_one(t::CREATE_TEMPLATE, kind.label()) }
            </button>
        }
    } else {
        Html::default()
    };

    let on_retry = {
        let handles = handles.clone();
        Callback::from(move |_: ()| handles.reload())
    };
    let filter_bar = render_filters(&props.filters, &state, &handles, on_search);
    let bulk_actions = BulkAction::for_kind(kind);

    let body = if state.loading && state.table.rows().is_empty() {
        html! { <LoadingSpinner /> }
    } else {
        let on_action = {
            let handles = handles.clone();
            Callback::from(move |(action, id): (Action, String)| handles.on_row_action(action, id))
        };
        let on_toggle_select = {
            let handles = handles.clone();
            Callback::from(move |id: String| handles.toggle_select(id))
        };
        let on_toggle_all = {
            let handles = handles.clone();
            Callback::from(move |select: bool| handles.toggle_all(select))
        };
        let on_page_change = {
            let handles = handles.clone();
            Callback::from(move |page: usize| handles.set_page(page))
        };
        html! {
            <>
                <EntityTable
                    view={state.table.view(status_date(), state.query.has_filters())}
                    columns={T::columns()}
                    actions={kind.row_actions()}
                    busy={busy.clone()}
                    on_action={on_action}
                    selectable={!bulk_actions.is_empty()}
                    selected={state.selected.clone()}
                    on_toggle_select={on_toggle_select}
                    on_toggle_all={on_toggle_all}
                />
                <Pagination
                    pagination={state.table.pagination()}
                    noun={kind.plural_noun()}
                    on_page_change={on_page_change}
                />
            </>
        }
    };

    let bulk_bar = if bulk_actions.is_empty() || state.selected.is_empty() {
        Html::default()
    } else {
        html! {
            <div class="flex flex-wrap items-center gap-2 rounded-xl border border-[var(--border)] bg-[var(--surface-alt)] px-4 py-2 text-sm">
                <span class="mr-2 font-medium">{ fill_one(t::SELECTED_TEMPLATE, state.selected.len()) }</span>
                { for bulk_actions.iter().map(|action| {
                    let action = *action;
                    let handles = handles.clone();
                    let onclick = Callback::from(move |_: MouseEvent| handles.open_bulk(action));
                    html! {
                        <button
                            type="button"
                            class={secondary_button_classes()}
                            disabled={busy.contains(&bulk_busy_key(action))}
                            onclick={onclick}
                        >
                            { action.label() }
                        </button>
                    }
                }) }
            </div>
        }
    };

    let modal = state
        .modal
        .current()
        .map(|open| render_modal(open, &handles, &busy))
        .unwrap_or_default();

    html! {
        <section class="mx-auto flex w-full max-w-6xl flex-col gap-5 px-4 py-8">
            <header class="flex flex-wrap items-end justify-between gap-4">
                <div>
                    <h1 class="text-2xl font-bold text-[var(--text)]">{ props.title.clone() }</h1>
                    if let Some(description) = props.description.clone() {
                        <p class="mt-1 text-sm text-[var(--muted)]">{ description }</p>
                    }
                </div>
                { create_button }
            </header>
            { filter_bar }
            if let Some(message) = state.load_error.clone() {
                <ErrorBanner message={message} on_retry={on_retry} />
            }
            { bulk_bar }
            { body }
            { modal }
        </section>
    }
}

fn render_filters<T: Entity>(
    filters: &[ListFilter],
    state: &PanelState<T>,
    handles: &PanelHandles<T>,
    on_search: Callback<String>,
) -> Html {
    if filters.is_empty() {
        return Html::default();
    }

    let on_select = {
        let handles = handles.clone();
        Callback::from(move |(name, value): (String, String)| handles.set_filter(&name, &value))
    };
    let on_clear = {
        let handles = handles.clone();
        Callback::from(move |_: MouseEvent| handles.clear_filters())
    };

    html! {
        <div class="flex flex-wrap items-end gap-3">
            { for filters.iter().map(|filter| match *filter {
                ListFilter::Search => {
                    let oninput = {
                        let handles = handles.clone();
                        let on_search = on_search.clone();
                        Callback::from(move |event: InputEvent| {
                            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                                let text = target.value();
                                handles.state.borrow_mut().search_text = text.clone();
                                on_search.emit(text);
                            }
                        })
                    };
                    html! {
                        <input
                            type="search"
                            class="min-w-[16rem] flex-1 rounded-lg border border-[var(--border)] bg-[var(--surface)] px-3 py-2 text-sm"
                            placeholder={t::SEARCH_PLACEHOLDER}
                            aria-label={t::SEARCH_PLACEHOLDER}
                            value={state.search_text.clone()}
                            oninput={oninput}
                        />
                    }
                },
                ListFilter::Select { name, label, source } => html! {
                    <label class="flex min-w-[12rem] flex-col gap-1 text-xs font-medium text-[var(--muted)]">
                        { label }
                        <SelectInput
                            name={name}
                            source={source}
                            value={state.query.filter(name).to_string()}
                            placeholder={AttrValue::from(t::FILTER_ALL)}
                            on_change={on_select.clone()}
                        />
                    </label>
                },
            }) }
            if state.query.has_filters() {
                <button type="button" class={secondary_button_classes()} onclick={on_clear}>
                    { t::CLEAR_FILTERS }
                </button>
            }
        </div>
    }
}

fn modal_title<T: Entity>(open: &OpenModal<PanelModal<T>>) -> String {
    let label = T::KIND.label();
    match (open.kind, open.payload.as_ref()) {
        (ModalKind::View, _) => fill_one(t::VIEW_TITLE_TEMPLATE, label),
        (ModalKind::Edit, _) => fill_one(t::EDIT_TITLE_TEMPLATE, label),
        (ModalKind::Create, _) => fill_one(t::CREATE_TITLE_TEMPLATE, label),
        (_, Some(PanelModal::Form(dialog))) => dialog.action.label().to_string(),
        _ => t::CONFIRM_TITLE.to_string(),
    }
}

fn render_modal<T: Entity>(open: &OpenModal<PanelModal<T>>, handles: &PanelHandles<T>, busy: &[String]) -> Html {
    let ticket = open.ticket;
    let target = open.target.clone().unwrap_or_default();
    let on_close = {
        let handles = handles.clone();
        Callback::from(move |reason: CloseReason| handles.close(reason))
    };
    let on_cancel = {
        let handles = handles.clone();
        Callback::from(move |_: MouseEvent| handles.close(CloseReason::CloseButton))
    };
    let title = modal_title(open);

    let Some(payload) = open.payload.as_ref() else {
        return html! {
            <Modal title={title} on_close={on_close}>
                <LoadingSpinner />
            </Modal>
        };
    };

    match payload {
        PanelModal::Record(record) => {
            let summary = record.summary(status_date());
            let values = record.form_values();
            let footer = html! {
                <button type="button" class={secondary_button_classes()} onclick={on_cancel}>
                    { t::CLOSE }
                </button>
            };
            html! {
                <Modal title={title} on_close={on_close} footer={footer} wide=true>
                    <div class="flex flex-col gap-4">
                        <div>
                            <p class="text-lg font-semibold text-[var(--text)]">{ summary.title.clone() }</p>
                            if let Some(subtitle) = summary.subtitle.clone() {
                                <p class="text-sm text-[var(--muted)]">{ subtitle }</p>
                            }
                            <div class="mt-2 flex flex-wrap gap-1">
                                { for summary.flags.iter().map(|flag| html! {
                                    <span class={tone_badge_class(flag.tone)}>{ flag.label }</span>
                                }) }
                            </div>
                        </div>
                        <dl class="grid grid-cols-1 gap-x-6 gap-y-3 text-sm sm:grid-cols-2">
                            { for T::columns().iter().zip(summary.columns.iter()).map(|(label, value)| html! {
                                <div>
                                    <dt class="text-xs uppercase tracking-wide text-[var(--muted)]">{ *label }</dt>
                                    <dd class="text-[var(--text)]">{ value.clone() }</dd>
                                </div>
                            }) }
                            { for T::form_spec()
                                .iter()
                                .filter(|field| !T::columns().contains(&field.label))
                                .map(|field| html! {
                                    <div>
                                        <dt class="text-xs uppercase tracking-wide text-[var(--muted)]">{ field.label }</dt>
                                        <dd class="text-[var(--text)]">{ display_value(values.get(field.name)) }</dd>
                                    </div>
                                }) }
                        </dl>
                    </div>
                </Modal>
            }
        },
        PanelModal::Form(dialog) => {
            let is_busy = busy.contains(&busy_key(dialog.action, &target));
            let on_change = {
                let handles = handles.clone();
                Callback::from(move |(name, value): (String, String)| handles.edit_field(ticket, name, value))
            };
            let onsubmit = {
                let handles = handles.clone();
                Callback::from(move |event: SubmitEvent| {
                    event.prevent_default();
                    handles.submit_dialog(ticket);
                })
            };
            html! {
                <Modal title={title} on_close={on_close} wide={dialog.spec.len() > 4}>
                    <form class="flex flex-col gap-5" onsubmit={onsubmit} novalidate=true>
                        <FormFields
                            spec={dialog.spec}
                            values={dialog.values.clone()}
                            errors={dialog.errors.clone()}
                            on_change={on_change}
                            disabled={is_busy}
                        />
                        <div class="flex justify-end gap-2">
                            <button type="button" class={secondary_button_classes()} onclick={on_cancel}>
                                { t::CANCEL }
                            </button>
                            <button
                                type="submit"
                                class={primary_button_classes()}
                                disabled={is_busy}
                                aria-busy={is_busy.to_string()}
                            >
                                { if is_busy { t::SAVING } else { t::SAVE } }
                            </button>
                        </div>
                    </form>
                </Modal>
            }
        },
        PanelModal::Confirm { action, name } => {
            let is_busy = busy.contains(&busy_key(*action, &target));
            let message = action.confirmation_text(T::KIND, name);
            render_confirm(title, message, *action == Action::Delete, is_busy, handles, ticket)
        },
        PanelModal::BulkConfirm { action, ids } => {
            let is_busy = busy.contains(&bulk_busy_key(*action));
            let message = action.confirmation_text(ids.len());
            render_confirm(title, message, false, is_busy, handles, ticket)
        },
    }
}

fn render_confirm<T: Entity>(
    title: String,
    message: String,
    destructive: bool,
    is_busy: bool,
    handles: &PanelHandles<T>,
    ticket: LoadTicket,
) -> Html {
    let on_close = {
        let handles = handles.clone();
        Callback::from(move |reason: CloseReason| handles.close(reason))
    };
    let on_cancel = {
        let handles = handles.clone();
        Callback::from(move |_: MouseEvent| handles.close(CloseReason::CloseButton))
    };
    let on_confirm = {
        let handles = handles.clone();
        Callback::from(move |_: MouseEvent| handles.submit_dialog(ticket))
    };
    let confirm_classes = if destructive {
        classes!(primary_button_classes(), "!bg-red-600", "hover:!bg-red-700")
    } else {
        primary_button_classes()
    };
    let footer = html! {
        <>
            <button type="button" class={secondary_button_classes()} onclick={on_cancel}>
                { t::CANCEL }
            </button>
            <button
                type="button"
                class={confirm_classes}
                disabled={is_busy}
                aria-busy={is_busy.to_string()}
                onclick={on_confirm}
            >
                { if is_busy { t::WORKING } else { t::CONFIRM } }
            </button>
        </>
    };
    html! {
        <Modal title={title} on_close={on_close} footer={footer}>
            <p class="text-sm leading-relaxed text-[var(--text)]">{ message }</p>
        </Modal>
    }
}

fn display_value(raw: &str) -> String {
    match raw {
        "" => "-".to_string(),
        "true" | "on" => t::YES.to_string(),
        "false" => t::NO.to_string(),
        other => other.to_string(),
    }
}

pub fn primary_button_classes() -> Classes {
    classes!(
        "inline-flex",
        "items-center",
        "justify-center",
        "rounded-lg",
        "bg-[var(--primary)]",
        "px-4",
        "py-2",
        "text-sm",
        "font-semibold",
        "text-white",
        "shadow-sm",
        "transition",
        "hover:opacity-90",
        "disabled:opacity-50",
        "disabled:cursor-wait"
    )
}

pub fn secondary_button_classes() -> Classes {
    classes!(
        "inline-flex",
        "items-center",
        "justify-center",
        "rounded-lg",
        "border",
        "border-[var(--border)]",
        "bg-[var(--surface)]",
        "px-4",
        "py-2",
        "text-sm",
        "font-medium",
        "text-[var(--text)]",
        "transition",
        "hover:border-[var(--primary)]",
        "disabled:opacity-50"
    )
}
