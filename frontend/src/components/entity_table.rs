use school_admin_shared::{
    models::{EntitySummary, Tone},
    submit::busy_key,
    table::TableView,
    Action,
};
use yew::prelude::*;

use crate::i18n::{current::table as t, fill_one};

#[derive(Properties, PartialEq)]
pub struct EntityTableProps {
    pub view: TableView,
    /// Headers of the extra columns, aligned with each summary's columns.
    pub columns: &'static [&'static str],
    pub actions: &'static [Action],
    /// Keys from [`busy_key`] whose request is in flight.
    #[prop_or_default]
    pub busy: Vec<String>,
    pub on_action: Callback<(Action, String)>,
    #[prop_or(false)]
    pub selectable: bool,
    #[prop_or_default]
    pub selected: Vec<String>,
    #[prop_or_default]
    pub on_toggle_select: Callback<String>,
    #[prop_or_default]
    pub on_toggle_all: Callback<bool>,
}

pub fn tone_badge_class(tone: Tone) -> Classes {
    let base = classes!(
        "inline-flex",
        "items-center",
        "rounded-full",
        "px-2",
        "py-0.5",
        "text-xs",
        "font-semibold",
        "tracking-[0.04em]"
    );
    match tone {
        Tone::Success => classes!(base, "bg-emerald-500/15", "text-emerald-700", "dark:text-emerald-200"),
        Tone::Info => classes!(base, "bg-sky-500/15", "text-sky-700", "dark:text-sky-200"),
        Tone::Warning => classes!(base, "bg-amber-500/15", "text-amber-700", "dark:text-amber-200"),
        Tone::Muted => classes!(base, "bg-[var(--surface-alt)]", "text-[var(--muted)]"),
    }
}

fn action_button_class(action: Action) -> Classes {
    let base = classes!(
        "rounded-md",
        "border",
        "px-2.5",
        "py-1",
        "text-xs",
        "font-medium",
        "transition",
        "disabled:opacity-50",
        "disabled:cursor-wait"
    );
    match action {
        Action::Delete => classes!(base, "border-red-500/40", "text-red-600", "hover:bg-red-500/10"),
        _ => classes!(
            base,
            "border-[var(--border)]",
            "text-[var(--text)]",
            "hover:border-[var(--primary)]",
            "hover:text-[var(--primary)]"
        ),
    }
}

/// Summary rows with per-row action buttons, or the empty state.
#[function_component(EntityTable)]
pub fn entity_table(props: &EntityTableProps) -> Html {
    let rows = match &props.view {
        TableView::Empty(empty) => {
            return html! {
                <div class="rounded-2xl border border-dashed border-[var(--border)] px-6 py-12 text-center">
                    <p class="text-base font-semibold text-[var(--text)]">{ empty.title.clone() }</p>
                    <p class="mt-1 text-sm text-[var(--muted)]">{ empty.hint.clone() }</p>
                </div>
            };
        },
        TableView::Rows(rows) => rows,
    };

    let all_selected = !rows.is_empty() && rows.iter().all(|row| props.selected.contains(&row.id));
    let on_toggle_all = {
        let on_toggle_all = props.on_toggle_all.clone();
        Callback::from(move |_: Event| on_toggle_all.emit(!all_selected))
    };

    html! {
        <div class="overflow-x-auto rounded-2xl border border-[var(--border)]">
            <table class="min-w-full divide-y divide-[var(--border)] text-sm">
                <thead class="bg-[var(--surface-alt)] text-left text-xs uppercase tracking-wide text-[var(--muted)]">
                    <tr>
                        if props.selectable {
                            <th class="w-10 px-4 py-3">
                                <input
                                    type="checkbox"
                                    aria-label={t::SELECT_ALL_ARIA}
                                    checked={all_selected}
                                    onchange={on_toggle_all}
                                />
                            </th>
                        }
                        <th class="px-4 py-3">{ t::NAME }</th>
                        { for props.columns.iter().map(|column| html! {
                            <th class="px-4 py-3">{ *column }</th>
                        }) }
                        <th class="px-4 py-3">{ t::STATUS }</th>
                        <th class="px-4 py-3 text-right">{ t::ACTIONS }</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-[var(--border)] bg-[var(--surface)]">
                    { for rows.iter().map(|row| render_row(props, row)) }
                </tbody>
            </table>
        </div>
    }
}

fn render_row(props: &EntityTableProps, row: &EntitySummary) -> Html {
    let on_select = {
        let on_toggle_select = props.on_toggle_select.clone();
        let id = row.id.clone();
        Callback::from(move |_: Event| on_toggle_select.emit(id.clone()))
    };

    html! {
        <tr key={row.id.clone()}>
            if props.selectable {
                <td class="px-4 py-3">
                    <input
                        type="checkbox"
                        aria-label={fill_one(t::SELECT_ROW_ARIA_TEMPLATE, &row.title)}
                        checked={props.selected.contains(&row.id)}
                        onchange={on_select}
                    />
                </td>
            }
            <td class="px-4 py-3">
                <p class="font-medium text-[var(--text)]">{ row.title.clone() }</p>
                if let Some(subtitle) = row.subtitle.clone() {
                    <p class="text-xs text-[var(--muted)]">{ subtitle }</p>
                }
            </td>
            { for row.columns.iter().map(|value| html! {
                <td class="px-4 py-3 text-[var(--text)]">{ value.clone() }</td>
            }) }
            <td class="px-4 py-3">
                <div class="flex flex-wrap gap-1">
                    { for row.flags.iter().map(|flag| html! {
                        <span class={tone_badge_class(flag.tone)}>{ flag.label }</span>
                    }) }
                </div>
            </td>
            <td class="px-4 py-3">
                <div class="flex flex-wrap justify-end gap-1.5">
                    { for props.actions.iter().map(|action| {
                        let action = *action;
                        let busy = props.busy.contains(&busy_key(action, &row.id));
                        let onclick = {
                            let on_action = props.on_action.clone();
                            let id = row.id.clone();
                            Callback::from(move |_: MouseEvent| on_action.emit((action, id.clone())))
                        };
                        html! {
                            <button
                                type="button"
                                class={action_button_class(action)}
                                disabled={busy}
                                aria-busy={busy.to_string()}
                                onclick={onclick}
                            >
                                { action.label() }
                            </button>
                        }
                    }) }
                </div>
            </td>
        </tr>
    }
}
