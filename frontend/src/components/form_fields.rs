use school_admin_shared::{
    form::{FieldKind, FieldSpec, FormValues, OptionSource},
    validation::{password_strength, FieldErrors},
};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::{
    hooks::use_options,
    i18n::{current::form as t, fill_one},
};

#[derive(Properties, PartialEq)]
pub struct FormFieldsProps {
    pub spec: &'static [FieldSpec],
    pub values: FormValues,
    #[prop_or_default]
    pub errors: FieldErrors,
    /// `(field name, new raw value)`.
    pub on_change: Callback<(String, String)>,
    #[prop_or(false)]
    pub disabled: bool,
}

pub fn input_classes(has_error: bool) -> Classes {
    classes!(
        "w-full",
        "rounded-lg",
        "border",
        if has_error { "border-red-500" } else { "border-[var(--border)]" },
        "bg-[var(--surface)]",
        "px-3",
        "py-2",
        "text-sm",
        "text-[var(--text)]",
        "focus:border-[var(--primary)]",
        "focus:outline-none",
        "disabled:opacity-60"
    )
}

/// Renders every field of `spec` with its inline error.
#[function_component(FormFields)]
pub fn form_fields(props: &FormFieldsProps) -> Html {
    html! {
        <div class="grid gap-4">
            { for props.spec.iter().map(|field| {
                let error = props.errors.get(field.name).map(str::to_string);
                html! {
                    <Field
                        key={field.name}
                        field={*field}
                        value={props.values.get(field.name).to_string()}
                        error={error}
                        on_change={props.on_change.clone()}
                        disabled={props.disabled}
                    />
                }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct FieldProps {
    field: FieldSpec,
    value: String,
    error: Option<String>,
    on_change: Callback<(String, String)>,
    disabled: bool,
}

#[function_component(Field)]
fn field(props: &FieldProps) -> Html {
    let field = props.field;
    let name = field.name.to_string();
    let has_error = props.error.is_some();

    let on_text_input = {
        let on_change = props.on_change.clone();
        let name = name.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                on_change.emit((name.clone(), target.value()));
            }
        })
    };

    let control = match field.kind {
        FieldKind::Checkbox => {
            let onchange = {
                let on_change = props.on_change.clone();
                let name = name.clone();
                Callback::from(move |event: Event| {
                    if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                        let flag = if target.checked() { "true" } else { "false" };
                        on_change.emit((name.clone(), flag.to_string()));
                    }
                })
            };
            return html! {
                <label class="flex items-center gap-2 text-sm">
                    <input
                        type="checkbox"
                        name={field.name}
                        checked={matches!(props.value.as_str(), "true" | "on")}
                        disabled={props.disabled}
                        onchange={onchange}
                    />
                    { field.label }
                </label>
            };
        },
        FieldKind::TextArea => {
            let oninput = {
                let on_change = props.on_change.clone();
                let name = name.clone();
                Callback::from(move |event: InputEvent| {
                    if let Some(target) = event.target_dyn_into::<HtmlTextAreaElement>() {
                        on_change.emit((name.clone(), target.value()));
                    }
                })
            };
            html! {
                <textarea
                    name={field.name}
                    rows="3"
                    class={input_classes(has_error)}
                    value={props.value.clone()}
                    disabled={props.disabled}
                    oninput={oninput}
                />
            }
        },
        FieldKind::Select(source) => html! {
            <SelectInput
                name={field.name}
                source={source}
                value={props.value.clone()}
                required={field.required}
                has_error={has_error}
                disabled={props.disabled}
                on_change={props.on_change.clone()}
            />
        },
        FieldKind::MultiSelect(source) => html! {
            <MultiSelectInput
                name={field.name}
                source={source}
                value={props.value.clone()}
                disabled={props.disabled}
                on_change={props.on_change.clone()}
            />
        },
        FieldKind::Password => html! {
            <>
                <input
                    type="password"
                    name={field.name}
                    class={input_classes(has_error)}
                    value={props.value.clone()}
                    autocomplete="new-password"
                    disabled={props.disabled}
                    oninput={on_text_input}
                />
                if !props.value.is_empty() && field.name != "confirm_password" {
                    <p class="mt-1 text-xs text-[var(--muted)]">
                        { fill_one(t::PASSWORD_STRENGTH_TEMPLATE, password_strength(&props.value).label()) }
                    </p>
                }
            </>
        },
        kind => {
            let input_type = match kind {
                FieldKind::Email => "email",
                FieldKind::Number => "number",
                FieldKind::Date => "date",
                _ => "text",
            };
            html! {
                <input
                    type={input_type}
                    name={field.name}
                    class={input_classes(has_error)}
                    value={props.value.clone()}
                    disabled={props.disabled}
                    oninput={on_text_input}
                />
            }
        },
    };

    html! {
        <div class="flex flex-col gap-1">
            <label class="text-sm font-medium text-[var(--text)]">
                { field.label }
                if field.required {
                    <span class="ml-1 text-red-500" aria-hidden="true">{"*"}</span>
                }
            </label>
            { control }
            if let Some(error) = props.error.clone() {
                <p class="text-xs text-red-600" role="alert">{ error }</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectInputProps {
    pub name: &'static str,
    pub source: OptionSource,
    pub value: String,
    #[prop_or(false)]
    pub required: bool,
    #[prop_or(false)]
    pub has_error: bool,
    #[prop_or(false)]
    pub disabled: bool,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    pub on_change: Callback<(String, String)>,
}

/// Single select whose options come from `source`.
#[function_component(SelectInput)]
pub fn select_input(props: &SelectInputProps) -> Html {
    let options = use_options(props.source);
    let onchange = {
        let on_change = props.on_change.clone();
        let name = props.name.to_string();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target_dyn_into::<HtmlSelectElement>() {
                on_change.emit((name.clone(), target.value()));
            }
        })
    };
    let placeholder = props
        .placeholder
        .clone()
        .unwrap_or_else(|| AttrValue::from(t::SELECT_PLACEHOLDER));

    html! {
        <select
            name={props.name}
            class={input_classes(props.has_error)}
            required={props.required}
            disabled={props.disabled}
            onchange={onchange}
        >
            <option value="" selected={props.value.is_empty()}>{ placeholder }</option>
            { for options.iter().map(|(value, label)| html! {
                <option key={value.clone()} value={value.clone()} selected={*value == props.value}>
                    { label.clone() }
                </option>
            }) }
        </select>
    }
}

#[derive(Properties, PartialEq)]
struct MultiSelectInputProps {
    name: &'static str,
    source: OptionSource,
    /// Comma separated ids.
    value: String,
    disabled: bool,
    on_change: Callback<(String, String)>,
}

#[function_component(MultiSelectInput)]
fn multi_select_input(props: &MultiSelectInputProps) -> Html {
    let options = use_options(props.source);
    let selected: Vec<String> = props
        .value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    html! {
        <div class="max-h-56 overflow-y-auto rounded-lg border border-[var(--border)] p-3">
            if options.is_empty() {
                <p class="text-sm text-[var(--muted)]">{ t::NO_OPTIONS }</p>
            }
            { for options.iter().map(|(value, label)| {
                let is_selected = selected.contains(value);
                let onchange = {
                    let on_change = props.on_change.clone();
                    let name = props.name.to_string();
                    let selected = selected.clone();
                    let value = value.clone();
                    Callback::from(move |_: Event| {
                        let next: Vec<String> = if is_selected {
                            selected.iter().filter(|id| **id != value).cloned().collect()
                        } else {
                            selected.iter().cloned().chain(std::iter::once(value.clone())).collect()
                        };
                        on_change.emit((name.clone(), next.join(",")));
                    })
                };
                html! {
                    <label key={value.clone()} class="flex items-center gap-2 py-1 text-sm">
                        <input
                            type="checkbox"
                            checked={is_selected}
                            disabled={props.disabled}
                            onchange={onchange}
                        />
                        { label.clone() }
                    </label>
                }
            }) }
        </div>
    }
}
