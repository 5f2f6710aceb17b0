use school_admin_shared::modal::CloseReason;
use wasm_bindgen::JsCast;
use web_sys::{window, KeyboardEvent};
use yew::prelude::*;

use crate::i18n::current::modal as t;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: AttrValue,
    pub on_close: Callback<CloseReason>,
    #[prop_or_default]
    pub footer: Option<Html>,
    #[prop_or(false)]
    pub wide: bool,
    #[prop_or_default]
    pub children: Html,
}

/// Overlay dialog. Mounted only while its modal is open, so the Escape
/// listener lives exactly as long as the dialog.
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    {
        use_effect_with(props.on_close.clone(), move |on_close| {
            let on_close = on_close.clone();
            let listener =
                wasm_bindgen::closure::Closure::wrap(Box::new(move |event: KeyboardEvent| {
                    if event.key() == "Escape" {
                        on_close.emit(CloseReason::Escape);
                    }
                }) as Box<dyn FnMut(_)>);

            if let Some(win) = window() {
                if let Err(e) = win
                    .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())
                {
                    web_sys::console::error_1(&format!("Failed to bind Escape: {:?}", e).into());
                }
            }

            move || {
                if let Some(win) = window() {
                    if let Err(e) = win.remove_event_listener_with_callback(
                        "keydown",
                        listener.as_ref().unchecked_ref(),
                    ) {
                        web_sys::console::error_1(&format!("Failed to unbind Escape: {:?}", e).into());
                    }
                }
            }
        });
    }

    let on_backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(CloseReason::Backdrop))
    };
    let on_close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(CloseReason::CloseButton))
    };
    let stop_propagation = Callback::from(|event: MouseEvent| event.stop_propagation());

    let panel_classes = classes!(
        "relative",
        "w-full",
        if props.wide { "max-w-3xl" } else { "max-w-lg" },
        "max-h-[90vh]",
        "overflow-y-auto",
        "rounded-2xl",
        "border",
        "border-[var(--border)]",
        "bg-[var(--surface)]",
        "text-[var(--text)]",
        "shadow-2xl"
    );

    html! {
        <div
            class={classes!(
                "fixed",
                "inset-0",
                "z-[100]",
                "flex",
                "items-center",
                "justify-center",
                "bg-black/50",
                "p-4",
                "backdrop-blur-sm"
            )}
            role="dialog"
            aria-modal="true"
            aria-label={props.title.clone()}
            onclick={on_backdrop}
        >
            <div class={panel_classes} onclick={stop_propagation}>
                <div class="flex items-center justify-between gap-4 border-b border-[var(--border)] px-6 py-4">
                    <h2 class="text-lg font-semibold">{ props.title.clone() }</h2>
                    <button
                        type="button"
                        class={classes!(
                            "inline-flex",
                            "h-8",
                            "w-8",
                            "items-center",
                            "justify-center",
                            "rounded-full",
                            "text-lg",
                            "text-[var(--muted)]",
                            "transition",
                            "hover:bg-[var(--surface-alt)]",
                            "hover:text-[var(--text)]"
                        )}
                        aria-label={t::CLOSE_ARIA}
                        onclick={on_close_button}
                    >
                        {"×"}
                    </button>
                </div>
                <div class="px-6 py-5">
                    { props.children.clone() }
                </div>
                if let Some(footer) = props.footer.clone() {
                    <div class="flex justify-end gap-3 border-t border-[var(--border)] px-6 py-4">
                        { footer }
                    </div>
                }
            </div>
        </div>
    }
}
