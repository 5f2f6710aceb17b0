use chrono::NaiveDate;
use school_admin_shared::{
    form::{parse_date, FormValues, TERM_NAMES},
    models::{AcademicYear, Term},
    submit::{submit_mutation, InFlight, MutationRequest, Notifier, Submission},
    table::ListQuery,
    term_dates::{TermDateForm, TermName, YearRange},
    validation::ValidationError,
    Action,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    api,
    components::{
        form_fields::input_classes,
        loading_spinner::LoadingSpinner,
    },
    feedback_context::use_feedback,
    i18n::current::term_form as t,
    pages::entity_panel::{primary_button_classes, secondary_button_classes},
    router::Route,
};

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.to_string()).unwrap_or_default()
}

/// New term with dates bounded by, and defaulted from, the academic year.
#[function_component(TermFormPage)]
pub fn term_form_page() -> Html {
    let feedback = use_feedback();
    let navigator = use_navigator();
    let client = use_memo((), |_| api::client());
    let in_flight = use_memo((), |_| InFlight::new());

    let years = use_state(Vec::<AcademicYear>::new);
    let years_loading = use_state(|| true);
    let year_id = use_state(String::new);
    let term_name = use_state(String::new);
    let is_current = use_state(|| false);
    let dates = use_state(TermDateForm::new);
    let submitting = use_state(|| false);

    {
        let years = years.clone();
        let years_loading = years_loading.clone();
        let client = client.clone();
        let feedback = feedback.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match client.list::<AcademicYear>(&ListQuery::new()).await {
                    Ok(page) => years.set(page.items),
                    Err(e) => {
                        web_sys::console::error_1(&format!("Failed to load academic years: {}", e).into());
                        feedback.error(&e.user_message());
                    },
                }
                years_loading.set(false);
            });
            || ()
        });
    }

    // Rejected dates are cleared by the form; the reason goes to a toast.
    let report = {
        let feedback = feedback.clone();
        move |result: Result<(), ValidationError>| {
            if let Err(err) = result {
                feedback.error(&err.to_string());
            }
        }
    };

    let on_year = {
        let years = years.clone();
        let year_id = year_id.clone();
        let dates = dates.clone();
        let feedback = feedback.clone();
        Callback::from(move |event: Event| {
            let Some(target) = event.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let id = target.value();
            let range = match years.iter().find(|year| year.id == id) {
                Some(year) => match YearRange::new(year.start_date, year.end_date) {
                    Ok(range) => Some(range),
                    Err(err) => {
                        feedback.error(&err.to_string());
                        None
                    },
                },
                None => None,
            };
            let mut next = (*dates).clone();
            next.select_year(range);
            dates.set(next);
            year_id.set(id);
        })
    };

    let on_term = {
        let term_name = term_name.clone();
        let dates = dates.clone();
        Callback::from(move |event: Event| {
            let Some(target) = event.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let name = target.value();
            let mut next = (*dates).clone();
            next.select_term(TermName::parse(&name));
            dates.set(next);
            term_name.set(name);
        })
    };

    let on_start = {
        let dates = dates.clone();
        let report = report.clone();
        Callback::from(move |event: Event| {
            let Some(target) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let mut next = (*dates).clone();
            report(next.set_start(parse_date(&target.value())));
            dates.set(next);
        })
    };

    let on_end = {
        let dates = dates.clone();
        Callback::from(move |event: Event| {
            let Some(target) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let mut next = (*dates).clone();
            report(next.set_end(parse_date(&target.value())));
            dates.set(next);
        })
    };

    let on_current = {
        let is_current = is_current.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                is_current.set(target.checked());
            }
        })
    };

    let onsubmit = {
        let client = client.clone();
        let in_flight = in_flight.clone();
        let feedback = feedback.clone();
        let year_id = year_id.clone();
        let term_name = term_name.clone();
        let is_current = is_current.clone();
        let dates = dates.clone();
        let submitting = submitting.clone();
        let navigator = navigator.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if let Err(err) = dates.validate() {
                feedback.error(&err.to_string());
                return;
            }
            let Some(busy) = in_flight.try_acquire("term:create") else {
                return;
            };
            let values = FormValues::new()
                .with("academic_year", (*year_id).clone())
                .with("name", (*term_name).clone())
                .with("start_date", date_value(dates.start()))
                .with("end_date", date_value(dates.end()))
                .with_flag("is_current", *is_current);
            submitting.set(true);

            let client = client.clone();
            let feedback = feedback.clone();
            let submitting = submitting.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let request = MutationRequest::entity_form::<Term>(Action::Create, "", values);
                let outcome = submit_mutation::<Term, _, _, _>(client.as_ref(), &feedback, request).await;
                drop(busy);
                submitting.set(false);
                if let Submission::Done(_) = outcome {
                    if let Some(navigator) = navigator {
                        navigator.push(&Route::Terms);
                    }
                }
            });
        })
    };

    if *years_loading {
        return html! { <LoadingSpinner /> };
    }

    html! {
        <section class="mx-auto flex w-full max-w-2xl flex-col gap-6 px-4 py-8">
            <header>
                <h1 class="text-2xl font-bold text-[var(--text)]">{ t::TITLE }</h1>
                if let Some(range) = dates.year() {
                    <p class="mt-1 text-sm text-[var(--muted)]">{ range.describe() }</p>
                }
            </header>
            <form
                class="grid gap-4 rounded-2xl border border-[var(--border)] bg-[var(--surface)] p-6"
                onsubmit={onsubmit}
                novalidate=true
            >
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::ACADEMIC_YEAR }
                    <select name="academic_year" class={input_classes(false)} required=true onchange={on_year}>
                        <option value="" selected={year_id.is_empty()}>{ t::SELECT_YEAR }</option>
                        { for years.iter().map(|year| html! {
                            <option key={year.id.clone()} value={year.id.clone()} selected={year.id == *year_id}>
                                { year.name.clone() }
                            </option>
                        }) }
                    </select>
                </label>
                <label class="flex flex-col gap-1 text-sm font-medium">
                    { t::TERM_NAME }
                    <select name="name" class={input_classes(false)} required=true onchange={on_term}>
                        <option value="" selected={term_name.is_empty()}>{ t::SELECT_TERM }</option>
                        { for TERM_NAMES.iter().map(|(value, label)| html! {
                            <option key={*value} value={*value} selected={*value == term_name.as_str()}>
                                { *label }
                            </option>
                        }) }
                    </select>
                </label>
                <div class="grid gap-4 sm:grid-cols-2">
                    <label class="flex flex-col gap-1 text-sm font-medium">
                        { t::START_DATE }
                        <input
                            type="date"
                            name="start_date"
                            class={input_classes(false)}
                            min={dates.year().map(|range| range.start.to_string())}
                            max={dates.year().map(|range| range.end.to_string())}
                            value={date_value(dates.start())}
                            onchange={on_start}
                        />
                    </label>
                    <label class="flex flex-col gap-1 text-sm font-medium">
                        { t::END_DATE }
                        <input
                            type="date"
                            name="end_date"
                            class={input_classes(false)}
                            min={dates.start().map(|start| start.to_string())}
                            max={dates.year().map(|range| range.end.to_string())}
                            value={date_value(dates.end())}
                            onchange={on_end}
                        />
                    </label>
                </div>
                <label class="flex items-center gap-2 text-sm">
                    <input type="checkbox" name="is_current" checked={*is_current} onchange={on_current} />
                    { t::SET_CURRENT }
                </label>
                <div class="flex justify-end gap-2">
                    <Link<Route> to={Route::Terms} classes={secondary_button_classes()}>
                        { t::CANCEL }
                    </Link<Route>>
                    <button
                        type="submit"
                        class={primary_button_classes()}
                        disabled={*submitting}
                        aria-busy={submitting.to_string()}
                    >
                        { if *submitting { t::SAVING } else { t::CREATE } }
                    </button>
                </div>
            </form>
        </section>
    }
}
