use school_admin_shared::submit::ToastKind;
use yew::prelude::*;

use crate::{
    feedback_context::{use_feedback, Toast},
    i18n::current::toast as t,
};

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Vec<Toast>,
}

fn tone_classes(kind: ToastKind) -> Classes {
    match kind {
        ToastKind::Success => classes!("border-emerald-500/40", "bg-emerald-50", "text-emerald-900"),
        ToastKind::Error => classes!("border-red-500/40", "bg-red-50", "text-red-900"),
        ToastKind::Warning => classes!("border-amber-500/40", "bg-amber-50", "text-amber-900"),
        ToastKind::Info => classes!("border-sky-500/40", "bg-sky-50", "text-sky-900"),
    }
}

/// Bottom-right stack of auto-dismissing notifications.
#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    let feedback = use_feedback();

    if props.toasts.is_empty() {
        return Html::default();
    }

    html! {
        <div
            class="fixed bottom-6 right-6 z-[120] flex w-full max-w-sm flex-col gap-3"
            aria-live="polite"
        >
            { for props.toasts.iter().map(|toast| {
                let on_dismiss = {
                    let feedback = feedback.clone();
                    let id = toast.id;
                    Callback::from(move |_: MouseEvent| feedback.dismiss(id))
                };
                let role = if toast.kind == ToastKind::Error { "alert" } else { "status" };
                html! {
                    <div
                        key={toast.id}
                        class={classes!(
                            "flex",
                            "items-start",
                            "gap-3",
                            "rounded-xl",
                            "border",
                            "px-4",
                            "py-3",
                            "text-sm",
                            "shadow-lg",
                            tone_classes(toast.kind)
                        )}
                        role={role}
                    >
                        <p class="flex-1">{ toast.message.clone() }</p>
                        <button
                            type="button"
                            class="text-base leading-none opacity-60 hover:opacity-100"
                            aria-label={t::DISMISS_ARIA}
                            onclick={on_dismiss}
                        >
                            {"×"}
                        </button>
                    </div>
                }
            }) }
        </div>
    }
}
