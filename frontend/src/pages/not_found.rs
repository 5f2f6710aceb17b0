use yew::prelude::*;
use yew_router::prelude::*;

use crate::{i18n::current::not_found as t, router::Route};

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <section class="mx-auto flex max-w-xl flex-col items-center gap-3 px-4 py-24 text-center">
            <h2 class="text-2xl font-bold text-[var(--text)]">{ t::TITLE }</h2>
            <p class="text-sm text-[var(--muted)]">{ t::MESSAGE }</p>
            <Link<Route> to={Route::Dashboard} classes="text-sm font-semibold text-[var(--primary)]">
                { t::BACK_HOME }
            </Link<Route>>
        </section>
    }
}
