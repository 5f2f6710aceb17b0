use yew::prelude::*;

use crate::i18n::current::loading_spinner as t;

#[derive(Properties, PartialEq)]
pub struct LoadingSpinnerProps {
    /// Shown under the ring; screen readers get a generic label otherwise.
    #[prop_or_default]
    pub label: Option<AttrValue>,
    /// Dims the page and blocks input while a detail record loads.
    #[prop_or(false)]
    pub overlay: bool,
}

/// Busy indicator for a list, dialog or the whole page.
#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &LoadingSpinnerProps) -> Html {
    let ring = classes!(
        "rounded-full",
        "border-4",
        "border-[var(--primary)]",
        "border-t-transparent",
        "animate-spin",
        if props.overlay { "h-14 w-14" } else { "h-10 w-10" }
    );
    let caption = match props.label.clone() {
        Some(label) => html! { <span class="text-sm text-[var(--muted)]">{ label }</span> },
        None => html! { <span class="sr-only">{ t::ARIA_LABEL }</span> },
    };
    let indicator = html! {
        <div class="flex flex-col items-center gap-3" role="status" aria-live="polite" aria-busy="true">
            <div class={ring} aria-hidden="true"></div>
            { caption }
        </div>
    };

    if props.overlay {
        html! {
            <div class="fixed inset-0 z-[130] flex items-center justify-center bg-black/30">
                { indicator }
            </div>
        }
    } else {
        html! { <div class="flex justify-center py-12">{ indicator }</div> }
    }
}
