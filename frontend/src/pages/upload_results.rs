use std::{cell::RefCell, rc::Rc};

use school_admin_shared::{
    config::CommitMode,
    form::OptionSource,
    modal::{CloseReason, ModalController, ModalKind},
    models::{Term, Tone},
    score::{grade_preview, CalculationMode, ScoreInput},
    submit::{Notifier, ToastKind},
    upload::{commit_entry, load_session, load_terms, submit_batch, CancelToken, RowStatus, UploadFilters, UploadSession},
};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::{
    api,
    components::{
        entity_table::tone_badge_class,
        form_fields::{input_classes, SelectInput},
        loading_spinner::LoadingSpinner,
        modal::Modal,
    },
    config::panel_config,
    feedback_context::use_feedback,
    hooks::use_body_scroll_lock,
    i18n::{current::upload as t, fill_one},
    pages::entity_panel::{primary_button_classes, secondary_button_classes},
};

type SharedSession = Rc<RefCell<UploadSession>>;

fn status_tone(status: &RowStatus) -> Tone {
    match status {
        RowStatus::Pending => Tone::Muted,
        RowStatus::Staged(_) => Tone::Warning,
        RowStatus::Submitted(_) => Tone::Success,
    }
}

/// Results entry for one class, subject and term.
#[function_component(UploadResultsPage)]
pub fn upload_results_page() -> Html {
    let config = panel_config();
    let feedback = use_feedback();
    let client = use_memo((), |_| api::client());
    let force = use_force_update();

    let filters = use_state(UploadFilters::default);
    let terms = use_state(Vec::<Term>::new);
    let terms_loading = use_state(|| false);
    let terms_seq = use_mut_ref(|| 0_u64);
    let session = use_state(|| None::<SharedSession>);
    let roster_loading = use_state(|| false);
    let submitting = use_state(|| false);
    let saving_entry = use_state(|| false);
    let modal = use_mut_ref(ModalController::<ScoreInput>::new);
    let cancel = use_memo((), |_| CancelToken::new());

    {
        let cancel = cancel.clone();
        use_effect_with((), move |_| {
            move || {
                // Leaving the page stops the batch from starting new requests.
                cancel.cancel();
            }
        });
    }

    use_body_scroll_lock(modal.borrow().body_scroll_locked());

    let on_filter_change = {
        let filters = filters.clone();
        let terms = terms.clone();
        let terms_loading = terms_loading.clone();
        let terms_seq = terms_seq.clone();
        let session = session.clone();
        let client = client.clone();
        let feedback = feedback.clone();
        Callback::from(move |(name, value): (String, String)| {
            let mut next = (*filters).clone();
            let year_changed = match name.as_str() {
                "academic_year" => next.set_academic_year(&value),
                "term" => {
                    next.term = value;
                    false
                },
                "class_level" => {
                    next.class_level = value;
                    false
                },
                "subject" => {
                    next.subject = value;
                    false
                },
                _ => return,
            };
            filters.set(next.clone());
            session.set(None);

            if !year_changed {
                return;
            }
            terms.set(Vec::new());
            let request_id = {
                let mut seq = terms_seq.borrow_mut();
                *seq += 1;
                *seq
            };
            if next.academic_year.is_empty() {
                terms_loading.set(false);
                return;
            }
            terms_loading.set(true);

            let terms = terms.clone();
            let terms_loading = terms_loading.clone();
            let terms_seq = terms_seq.clone();
            let client = client.clone();
            let feedback = feedback.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = load_terms(client.as_ref(), &next.academic_year).await;
                if *terms_seq.borrow() != request_id {
                    return;
                }
                terms_loading.set(false);
                match result {
                    Ok(loaded) => terms.set(loaded),
                    Err(e) => {
                        web_sys::console::error_1(&format!("Failed to load terms: {}", e).into());
                        feedback.error(&e.user_message());
                    },
                }
            });
        })
    };

    let on_term_change = {
        let on_filter_change = on_filter_change.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlSelectElement>() {
                on_filter_change.emit(("term".to_string(), target.value()));
            }
        })
    };

    let on_load = {
        let filters = filters.clone();
        let session = session.clone();
        let roster_loading = roster_loading.clone();
        let client = client.clone();
        let feedback = feedback.clone();
        Callback::from(move |_: MouseEvent| {
            if *roster_loading {
                return;
            }
            if let Err(err) = filters.validate() {
                feedback.error(&err.to_string());
                return;
            }
            roster_loading.set(true);

            let filters = (*filters).clone();
            let session = session.clone();
            let roster_loading = roster_loading.clone();
            let client = client.clone();
            let feedback = feedback.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match load_session(client.as_ref(), filters, config.commit_mode).await {
                    Ok(loaded) => {
                        if loaded.students().is_empty() {
                            feedback.show_toast(t::NO_STUDENTS, ToastKind::Info, config.toast_duration_ms);
                        }
                        session.set(Some(Rc::new(RefCell::new(loaded))));
                    },
                    Err(e) => {
                        web_sys::console::error_1(&format!("Failed to load students: {}", e).into());
                        feedback.error(&e.user_message());
                    },
                }
                roster_loading.set(false);
            });
        })
    };

    let on_open_entry = {
        let session = session.clone();
        let modal = modal.clone();
        let force = force.clone();
        Callback::from(move |student_id: String| {
            let Some(current) = (*session).clone() else {
                return;
            };
            let input = current.borrow().open_entry(&student_id);
            modal
                .borrow_mut()
                .open_with(ModalKind::EnterResult, Some(student_id), input);
            force.force_update();
        })
    };

    let on_close_entry = {
        let modal = modal.clone();
        let force = force.clone();
        Callback::from(move |reason: CloseReason| {
            if modal.borrow_mut().close(reason) {
                force.force_update();
            }
        })
    };

    let on_edit_entry = {
        let modal = modal.clone();
        let force = force.clone();
        Callback::from(move |update: Box<dyn FnOnce(&mut ScoreInput)>| {
            if let Some(input) = modal
                .borrow_mut()
                .current_mut()
                .and_then(|open| open.payload.as_mut())
            {
                update(input);
            }
            force.force_update();
        })
    };

    let on_save_entry = {
        let session = session.clone();
        let modal = modal.clone();
        let saving_entry = saving_entry.clone();
        let client = client.clone();
        let feedback = feedback.clone();
        let force = force.clone();
        Callback::from(move |_: ()| {
            if *saving_entry {
                return;
            }
            let Some(current) = (*session).clone() else {
                return;
            };
            let (student_id, input) = {
                let modal = modal.borrow();
                let Some(open) = modal.current() else {
                    return;
                };
                let (Some(student_id), Some(input)) = (open.target.clone(), open.payload.clone()) else {
                    return;
                };
                (student_id, input)
            };
            let entry = match input.validate() {
                Ok(entry) => entry,
                Err(err) => {
                    feedback.error(&err.to_string());
                    return;
                },
            };
            saving_entry.set(true);

            let modal = modal.clone();
            let saving_entry = saving_entry.clone();
            let client = client.clone();
            let feedback = feedback.clone();
            let force = force.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let committed =
                    commit_entry(client.as_ref(), &feedback, current.as_ref(), &student_id, entry).await;
                saving_entry.set(false);
                if committed {
                    modal.borrow_mut().close(CloseReason::MutationSucceeded);
                }
                force.force_update();
            });
        })
    };

    let on_submit_all = {
        let session = session.clone();
        let submitting = submitting.clone();
        let client = client.clone();
        let feedback = feedback.clone();
        let cancel = cancel.clone();
        let force = force.clone();
        Callback::from(move |_: MouseEvent| {
            if *submitting {
                return;
            }
            let Some(current) = (*session).clone() else {
                return;
            };
            if !current.borrow().can_submit() {
                feedback.error(t::NOTHING_STAGED);
                return;
            }
            submitting.set(true);

            let submitting = submitting.clone();
            let client = client.clone();
            let feedback = feedback.clone();
            let cancel = cancel.clone();
            let force = force.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let report =
                    submit_batch(client.as_ref(), current.as_ref(), config.batch_concurrency, &cancel).await;
                if cancel.is_cancelled() {
                    return;
                }
                let kind = if report.is_clean() {
                    ToastKind::Success
                } else if report.succeeded.is_empty() {
                    ToastKind::Error
                } else {
                    ToastKind::Warning
                };
                feedback.show_toast(&report.summary(), kind, config.toast_duration_ms * 2);
                submitting.set(false);
                force.force_update();
            });
        })
    };

    let term_options = if *terms_loading {
        html! { <option value="" selected=true>{ t::TERMS_LOADING }</option> }
    } else {
        html! {
            <>
                <option value="" selected={filters.term.is_empty()}>{ t::SELECT_TERM }</option>
                { for terms.iter().map(|term| html! {
                    <option key={term.id.clone()} value={term.id.clone()} selected={term.id == filters.term}>
                        { term.name.clone() }
                    </option>
                }) }
            </>
        }
    };

    let roster = match (*session).clone() {
        None if *roster_loading => html! {
            <LoadingSpinner label={AttrValue::from(t::LOADING_STUDENTS)} />
        },
        None => html! {
            <p class="rounded-2xl border border-dashed border-[var(--border)] px-6 py-12 text-center text-sm text-[var(--muted)]">
                { t::PICK_FILTERS_HINT }
            </p>
        },
        Some(current) => {
            let current = current.borrow();
            render_roster(&current, on_open_entry, on_submit_all, *submitting)
        },
    };

    let entry_modal = {
        let modal = modal.borrow();
        match modal.current() {
            Some(open) => {
                let name = match ((*session).as_ref(), open.target.as_deref()) {
                    (Some(current), Some(id)) => {
                        let current = current.borrow();
                        let name = current.student(id).map(|student| student.full_name());
                        name.unwrap_or_default()
                    },
                    _ => String::new(),
                };
                match open.payload.clone() {
                    Some(input) => html! {
                        <EntryDialog
                            student_name={name}
                            input={input}
                            saving={*saving_entry}
                            immediate={config.commit_mode == CommitMode::Immediate}
                            on_edit={on_edit_entry}
                            on_save={on_save_entry}
                            on_close={on_close_entry}
                        />
                    },
                    None => Html::default(),
                }
            },
            None => Html::default(),
        }
    };

    html! {
        <section class="mx-auto flex w-full max-w-5xl flex-col gap-6 px-4 py-8">
            <header>
                <h1 class="text-2xl font-bold text-[var(--text)]">{ t::TITLE }</h1>
                <p class="mt-1 text-sm text-[var(--muted)]">
                    { if config.commit_mode == CommitMode::Immediate { t::IMMEDIATE_HINT } else { t::BATCH_HINT } }
                </p>
            </header>
            <div class="grid gap-4 rounded-2xl border border-[var(--border)] bg-[var(--surface)] p-5 sm:grid-cols-2 lg:grid-cols-4">
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::ACADEMIC_YEAR }
                    <SelectInput
                        name="academic_year"
                        source={OptionSource::AcademicYears}
                        value={filters.academic_year.clone()}
                        required=true
                        on_change={on_filter_change.clone()}
                    />
                </label>
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::TERM }
                    <select
                        name="term"
                        class={input_classes(false)}
                        required=true
                        disabled={filters.academic_year.is_empty() || *terms_loading}
                        onchange={on_term_change}
                    >
                        { term_options }
                    </select>
                </label>
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::CLASS }
                    <SelectInput
                        name="class_level"
                        source={OptionSource::Classes}
                        value={filters.class_level.clone()}
                        required=true
                        on_change={on_filter_change.clone()}
                    />
                </label>
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::SUBJECT }
                    <SelectInput
                        name="subject"
                        source={OptionSource::Subjects}
                        value={filters.subject.clone()}
                        required=true
                        on_change={on_filter_change}
                    />
                </label>
                <div class="sm:col-span-2 lg:col-span-4 flex justify-end">
                    <button
                        type="button"
                        class={primary_button_classes()}
                        disabled={!filters.is_complete() || *roster_loading}
                        aria-busy={roster_loading.to_string()}
                        onclick={on_load}
                    >
                        { if *roster_loading { t::LOADING_STUDENTS } else { t::LOAD_STUDENTS } }
                    </button>
                </div>
            </div>
            { roster }
            { entry_modal }
        </section>
    }
}

fn render_roster(
    session: &UploadSession,
    on_open_entry: Callback<String>,
    on_submit_all: Callback<MouseEvent>,
    submitting: bool,
) -> Html {
    if session.students().is_empty() {
        return html! {
            <p class="rounded-2xl border border-dashed border-[var(--border)] px-6 py-12 text-center text-sm text-[var(--muted)]">
                { t::NO_STUDENTS }
            </p>
        };
    }

    let batch = session.mode() == CommitMode::Batch;
    html! {
        <div class="flex flex-col gap-4">
            <div class="flex flex-wrap items-center justify-between gap-3 text-sm text-[var(--muted)]">
                <span>
                    { fill_one(t::SUBMITTED_COUNT_TEMPLATE, session.submitted_count()) }
                    if batch {
                        { " · " }
                        { fill_one(t::STAGED_COUNT_TEMPLATE, session.staged_count()) }
                    }
                </span>
                if batch {
                    <button
                        type="button"
                        class={primary_button_classes()}
                        disabled={submitting || !session.can_submit()}
                        aria-busy={submitting.to_string()}
                        onclick={on_submit_all}
                    >
                        { if submitting { t::SUBMITTING } else { t::SUBMIT_ALL } }
                    </button>
                }
            </div>
            <div class="overflow-x-auto rounded-2xl border border-[var(--border)]">
                <table class="min-w-full divide-y divide-[var(--border)] text-sm">
                    <thead class="bg-[var(--surface-alt)] text-left text-xs uppercase tracking-wide text-[var(--muted)]">
                        <tr>
                            <th class="px-4 py-3">{ t::STUDENT }</th>
                            <th class="px-4 py-3">{ t::STUDENT_ID }</th>
                            <th class="px-4 py-3">{ t::STATUS }</th>
                            <th class="px-4 py-3 text-right">{ t::ACTIONS }</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-[var(--border)] bg-[var(--surface)]">
                        { for session.students().iter().map(|student| {
                            let status = session.status(&student.id);
                            let detail = match &status {
                                RowStatus::Pending => None,
                                RowStatus::Staged(text) | RowStatus::Submitted(text) => Some(text.clone()),
                            };
                            let onclick = {
                                let on_open_entry = on_open_entry.clone();
                                let id = student.id.clone();
                                Callback::from(move |_: MouseEvent| on_open_entry.emit(id.clone()))
                            };
                            html! {
                                <tr key={student.id.clone()}>
                                    <td class="px-4 py-3 font-medium text-[var(--text)]">{ student.full_name() }</td>
                                    <td class="px-4 py-3 text-[var(--muted)]">{ student.reference().to_string() }</td>
                                    <td class="px-4 py-3">
                                        <span class={tone_badge_class(status_tone(&status))}>{ status.label() }</span>
                                        if let Some(detail) = detail {
                                            <span class="ml-2 text-xs text-[var(--muted)]">{ detail }</span>
                                        }
                                    </td>
                                    <td class="px-4 py-3 text-right">
                                        <button
                                            type="button"
                                            class={secondary_button_classes()}
                                            disabled={submitting}
                                            onclick={onclick}
                                        >
                                            { if status == RowStatus::Pending { t::ENTER_RESULT } else { t::EDIT_RESULT } }
                                        </button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct EntryDialogProps {
    student_name: String,
    input: ScoreInput,
    saving: bool,
    immediate: bool,
    on_edit: Callback<Box<dyn FnOnce(&mut ScoreInput)>>,
    on_save: Callback<()>,
    on_close: Callback<CloseReason>,
}

#[function_component(EntryDialog)]
fn entry_dialog(props: &EntryDialogProps) -> Html {
    let input = &props.input;
    let errors = input.inline_errors();
    let manual = input.mode == CalculationMode::Manual;

    let text_input = |apply: fn(&mut ScoreInput, String)| {
        let on_edit = props.on_edit.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                let value = target.value();
                on_edit.emit(Box::new(move |input: &mut ScoreInput| apply(input, value)));
            }
        })
    };
    let on_mode = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlSelectElement>() {
                let mode = CalculationMode::parse(&target.value());
                on_edit.emit(Box::new(move |input: &mut ScoreInput| input.mode = mode));
            }
        })
    };
    let on_remarks = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target_dyn_into::<HtmlTextAreaElement>() {
                let value = target.value();
                on_edit.emit(Box::new(move |input: &mut ScoreInput| input.remarks = value));
            }
        })
    };
    let on_publish = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                let checked = target.checked();
                on_edit.emit(Box::new(move |input: &mut ScoreInput| input.publish = checked));
            }
        })
    };
    let onsubmit = {
        let on_save = props.on_save.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_save.emit(());
        })
    };
    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(CloseReason::CloseButton))
    };

    let score_field = |name: &'static str, label: &'static str, value: &str, apply: fn(&mut ScoreInput, String)| {
        let error = errors.get(name).map(str::to_string);
        html! {
            <label class="flex flex-col gap-1 text-sm font-medium">
                { label }
                <input
                    type="number"
                    name={name}
                    min="0"
                    max="100"
                    step="0.01"
                    class={input_classes(error.is_some())}
                    value={value.to_string()}
                    disabled={props.saving}
                    oninput={text_input(apply)}
                />
                if let Some(error) = error {
                    <span class="text-xs text-red-600" role="alert">{ error }</span>
                }
            </label>
        }
    };

    html! {
        <Modal title={fill_one(t::ENTRY_TITLE_TEMPLATE, &props.student_name)} on_close={props.on_close.clone()}>
            <form class="flex flex-col gap-4" onsubmit={onsubmit} novalidate=true>
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::CALCULATION_MODE }
                    <select class={input_classes(false)} disabled={props.saving} onchange={on_mode}>
                        <option value="system" selected={!manual}>{ t::MODE_SYSTEM }</option>
                        <option value="manual" selected={manual}>{ t::MODE_MANUAL }</option>
                    </select>
                </label>
                if manual {
                    { score_field("score", t::TOTAL_SCORE, &input.total, |input, value| input.total = value) }
                    <p class="text-sm text-[var(--muted)]">
                        { fill_one(t::GRADE_PREVIEW_TEMPLATE, grade_preview(&input.total)) }
                    </p>
                } else {
                    <div class="grid gap-4 sm:grid-cols-2">
                        { score_field("class_score", t::CLASS_SCORE, &input.class_score, |input, value| input.class_score = value) }
                        { score_field("exam_score", t::EXAM_SCORE, &input.exam_score, |input, value| input.exam_score = value) }
                    </div>
                }
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::REMARKS }
                    <textarea
                        rows="2"
                        class={input_classes(false)}
                        value={input.remarks.clone()}
                        disabled={props.saving}
                        oninput={on_remarks}
                    />
                </label>
                <label class="flex items-center gap-2 text-sm">
                    <input type="checkbox" checked={input.publish} disabled={props.saving} onchange={on_publish} />
                    { t::PUBLISH }
                </label>
                <div class="flex justify-end gap-2">
                    <button type="button" class={secondary_button_classes()} onclick={on_cancel}>
                        { t::CANCEL }
                    </button>
                    <button
                        type="submit"
                        class={primary_button_classes()}
                        disabled={props.saving}
                        aria-busy={props.saving.to_string()}
                    >
                        { if props.saving { t::SAVING } else if props.immediate { t::SAVE_AND_SUBMIT } else { t::STAGE } }
                    </button>
                </div>
            </form>
        </Modal>
    }
}
