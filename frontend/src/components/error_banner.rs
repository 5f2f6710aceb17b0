use yew::prelude::*;
use yew_hooks::prelude::use_timeout;

use crate::i18n::current::error_banner as t;

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
    /// Shows a retry button when set.
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
    #[prop_or(false)]
    pub auto_dismiss: bool,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let is_open = use_state(|| true);

    let dismiss = {
        let is_open = is_open.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_| {
            if !*is_open {
                return;
            }
            is_open.set(false);
            if let Some(cb) = on_close.as_ref() {
                cb.emit(());
            }
        })
    };

    let auto_timeout = {
        let dismiss = dismiss.clone();
        use_timeout(move || dismiss.emit(()), if props.auto_dismiss { 5000 } else { 0 })
    };

    // A new message reopens a dismissed banner.
    {
        let is_open = is_open.clone();
        use_effect_with(props.message.clone(), move |_| {
            is_open.set(true);
        });
    }

    {
        let auto_timeout = auto_timeout.clone();
        use_effect_with((*is_open, props.auto_dismiss), move |(visible, auto_dismiss)| {
            if *auto_dismiss && *visible {
                auto_timeout.reset();
            } else {
                auto_timeout.cancel();
            }
        });
    }

    if props.message.trim().is_empty() || !*is_open {
        return Html::default();
    }

    let on_close_click = {
        let dismiss = dismiss.clone();
        Callback::from(move |_: MouseEvent| dismiss.emit(()))
    };

    html! {
        <div
            class="flex items-start gap-3 rounded-2xl border border-red-500/40 bg-red-50 px-5 py-4 text-sm text-red-900 shadow-sm"
            role="alert"
            aria-live="assertive"
        >
            <i class="fas fa-triangle-exclamation mt-0.5 text-lg" aria-hidden="true"></i>
            <div class="flex-1 space-y-1">
                <p class="text-base font-semibold">{ t::TITLE }</p>
                <p>{ props.message.clone() }</p>
                if let Some(on_retry) = props.on_retry.clone() {
                    <button
                        type="button"
                        class="mt-2 rounded-md border border-red-500/40 px-3 py-1 text-xs font-semibold hover:bg-red-500/10"
                        onclick={Callback::from(move |_: MouseEvent| on_retry.emit(()))}
                    >
                        { t::RETRY }
                    </button>
                }
            </div>
            <button
                type="button"
                class="inline-flex h-8 w-8 items-center justify-center rounded-full text-lg transition hover:bg-black/10"
                aria-label={t::CLOSE_ARIA}
                onclick={on_close_click}
            >
                {"×"}
            </button>
        </div>
    }
}
