use std::{
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use gloo_timers::callback::Timeout;
use school_admin_shared::submit::{Loader, Notifier, ToastKind};
use yew::prelude::*;

use crate::components::{
    loading_spinner::LoadingSpinner,
    toast::ToastStack,
};

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedbackState {
    pub toasts: Vec<Toast>,
    /// Loader holders; the overlay shows while above zero.
    pub loaders: usize,
}

pub enum FeedbackAction {
    Push(Toast),
    Dismiss(u64),
    ShowLoader,
    HideLoader,
}

impl Reducible for FeedbackState {
    type Action = FeedbackAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            FeedbackAction::Push(toast) => next.toasts.push(toast),
            FeedbackAction::Dismiss(id) => next.toasts.retain(|toast| toast.id != id),
            FeedbackAction::ShowLoader => next.loaders += 1,
            FeedbackAction::HideLoader => next.loaders = next.loaders.saturating_sub(1),
        }
        Rc::new(next)
    }
}

/// Handle the panels use as their notification sink and loader.
#[derive(Clone, PartialEq)]
pub struct Feedback {
    dispatch: Callback<FeedbackAction>,
}

impl Default for Feedback {
    /// Outside a provider messages only reach the console.
    fn default() -> Self {
        Self {
            dispatch: Callback::from(|action: FeedbackAction| {
                if let FeedbackAction::Push(toast) = action {
                    web_sys::console::log_1(
                        &format!("[{}] {}", toast.kind.as_str(), toast.message).into(),
                    );
                }
            }),
        }
    }
}

impl Feedback {
    pub fn dismiss(&self, id: u64) {
        self.dispatch.emit(FeedbackAction::Dismiss(id));
    }
}

impl Notifier for Feedback {
    fn show_toast(&self, message: &str, kind: ToastKind, duration_ms: u32) {
        let id = NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed);
        if kind == ToastKind::Error {
            web_sys::console::error_1(&message.into());
        }
        self.dispatch.emit(FeedbackAction::Push(Toast {
            id,
            message: message.to_string(),
            kind,
        }));
        let dispatch = self.dispatch.clone();
        Timeout::new(duration_ms, move || dispatch.emit(FeedbackAction::Dismiss(id))).forget();
    }
}

impl Loader for Feedback {
    fn show_loader(&self) {
        self.dispatch.emit(FeedbackAction::ShowLoader);
    }

    fn hide_loader(&self) {
        self.dispatch.emit(FeedbackAction::HideLoader);
    }
}

#[hook]
pub fn use_feedback() -> Feedback {
    use_context::<Feedback>().unwrap_or_default()
}

#[derive(Properties, PartialEq)]
pub struct FeedbackProviderProps {
    pub children: Html,
}

#[function_component(FeedbackProvider)]
pub fn feedback_provider(props: &FeedbackProviderProps) -> Html {
    let state = use_reducer(FeedbackState::default);
    let feedback = {
        let dispatcher = state.dispatcher();
        use_memo((), move |_| Feedback {
            dispatch: Callback::from(move |action| dispatcher.dispatch(action)),
        })
    };

    html! {
        <ContextProvider<Feedback> context={(*feedback).clone()}>
            { props.children.clone() }
            <ToastStack toasts={state.toasts.clone()} />
            if state.loaders > 0 {
                <LoadingSpinner overlay=true />
            }
        </ContextProvider<Feedback>>
    }
}
