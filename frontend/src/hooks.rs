use gloo_timers::callback::Timeout;
use school_admin_shared::form::OptionSource;
use yew::prelude::*;

use crate::api;

/// Delay every call to `callback` by `delay_ms`; a new call before the delay
/// elapses replaces the pending one. Pending calls are dropped on unmount.
///
/// # Example
/// ```rust
/// #[function_component(Search)]
/// fn search() -> Html {
///     let on_search = use_debounced_callback(300, Callback::from(|text: String| {
///         web_sys::console::log_1(&text.into());
///     }));
///     html! { <input oninput={move |_| on_search.emit("q".to_string())} /> }
/// }
/// ```
#[hook]
pub fn use_debounced_callback<T>(delay_ms: u32, callback: Callback<T>) -> Callback<T>
where
    T: 'static,
{
    let pending = use_mut_ref(|| None::<Timeout>);

    {
        let pending = pending.clone();
        use_effect_with((), move |_| {
            move || {
                pending.borrow_mut().take();
            }
        });
    }

    Callback::from(move |value: T| {
        let callback = callback.clone();
        // Replacing the handle drops, and so cancels, the previous timer.
        *pending.borrow_mut() = Some(Timeout::new(delay_ms, move || callback.emit(value)));
    })
}

/// Hide the document body's overflow while `locked` is true.
#[hook]
pub fn use_body_scroll_lock(locked: bool) {
    use_effect_with(locked, move |locked| {
        let body = if *locked {
            web_sys::window()
                .and_then(|win| win.document())
                .and_then(|doc| doc.body())
        } else {
            None
        };
        if let Some(body) = body.as_ref() {
            if let Err(e) = body.style().set_property("overflow", "hidden") {
                web_sys::console::error_1(&format!("Failed to lock body scroll: {:?}", e).into());
            }
        }

        move || {
            if let Some(body) = body {
                if let Err(e) = body.style().remove_property("overflow") {
                    web_sys::console::error_1(&format!("Failed to unlock body scroll: {:?}", e).into());
                }
            }
        }
    });
}

/// Options for a select field, loaded once per source.
#[hook]
pub fn use_options(source: OptionSource) -> Vec<(String, String)> {
    let options = use_state(Vec::<(String, String)>::new);

    {
        let options = options.clone();
        use_effect_with(source, move |source| {
            let source = *source;
            wasm_bindgen_futures::spawn_local(async move {
                match api::load_options(&api::client(), source).await {
                    Ok(loaded) => options.set(loaded),
                    Err(e) => {
                        web_sys::console::error_1(&format!("Failed to load options: {}", e).into());
                    },
                }
            });
            || ()
        });
    }

    (*options).clone()
}
