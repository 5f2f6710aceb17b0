use yew::prelude::*;
use yew_router::prelude::*;

use crate::{i18n::current::header as t, router::Route};

/// Navigation entries in display order: label, target and Font Awesome icon.
pub const NAV_ITEMS: &[(&str, Route, &str)] = &[
    (t::NAV_ACADEMIC_YEARS, Route::AcademicYears, "fa-calendar"),
    (t::NAV_TERMS, Route::Terms, "fa-calendar-week"),
    (t::NAV_CLASSES, Route::Classes, "fa-people-roof"),
    (t::NAV_SUBJECTS, Route::Subjects, "fa-book"),
    (t::NAV_ASSIGNMENTS, Route::TeacherAssignments, "fa-chalkboard-user"),
    (t::NAV_RESULTS, Route::Results, "fa-square-poll-vertical"),
    (t::NAV_TEACHERS, Route::Teachers, "fa-user-tie"),
    (t::NAV_STUDENTS, Route::Students, "fa-user-graduate"),
    (t::NAV_ADMINS, Route::Admins, "fa-user-shield"),
];

/// Whether `current` belongs to the section `item` links to.
fn is_active(item: &Route, current: Option<&Route>) -> bool {
    match (item, current) {
        (Route::Terms, Some(Route::TermNew)) => true,
        (Route::Results, Some(Route::UploadResults)) => true,
        (item, Some(current)) => item == current,
        (_, None) => false,
    }
}

#[function_component(Header)]
pub fn header() -> Html {
    let mobile_menu_open = use_state(|| false);
    let route = use_route::<Route>();

    {
        let mobile_menu_open = mobile_menu_open.clone();
        use_effect_with(route.clone(), move |_| {
            mobile_menu_open.set(false);
            || ()
        });
    }

    let toggle_mobile_menu = {
        let mobile_menu_open = mobile_menu_open.clone();
        Callback::from(move |_: MouseEvent| mobile_menu_open.set(!*mobile_menu_open))
    };

    let link_classes = |active: bool| {
        classes!(
            "flex",
            "items-center",
            "gap-2",
            "rounded-lg",
            "px-3",
            "py-2",
            "text-sm",
            "font-medium",
            "transition-colors",
            "duration-100",
            if active {
                "bg-[var(--primary)] text-white"
            } else {
                "text-[var(--text)] hover:bg-[var(--surface-alt)]"
            }
        )
    };

    let nav_links = NAV_ITEMS
        .iter()
        .map(|(label, target, icon)| {
            let active = is_active(target, route.as_ref());
            html! {
                <Link<Route> to={target.clone()} classes={link_classes(active)}>
                    <i class={classes!("fas", *icon, "w-4")} aria-hidden="true"></i>
                    <span>{ *label }</span>
                </Link<Route>>
            }
        })
        .collect::<Html>();

    html! {
        <header class="sticky top-0 z-[90] border-b border-[var(--border)] bg-[var(--surface)]/90 backdrop-blur">
            <div class="mx-auto flex max-w-7xl items-center justify-between gap-4 px-4 py-3">
                <Link<Route> to={Route::Dashboard} classes="text-lg font-bold text-[var(--text)]">
                    { t::BRAND }
                </Link<Route>>
                <nav class="hidden flex-wrap items-center gap-1 lg:flex" aria-label={t::NAV_ARIA}>
                    { nav_links.clone() }
                </nav>
                <button
                    type="button"
                    class="flex h-10 w-10 items-center justify-center rounded-lg border border-[var(--border)] lg:hidden"
                    aria-label={if *mobile_menu_open { t::CLOSE_MENU } else { t::OPEN_MENU }}
                    aria-expanded={(*mobile_menu_open).to_string()}
                    onclick={toggle_mobile_menu}
                >
                    <i class={classes!("fas", if *mobile_menu_open { "fa-xmark" } else { "fa-bars" })} aria-hidden="true"></i>
                </button>
            </div>
            if *mobile_menu_open {
                <nav class="flex flex-col gap-1 border-t border-[var(--border)] px-4 py-3 lg:hidden" aria-label={t::NAV_ARIA}>
                    { nav_links }
                </nav>
            }
        </header>
    }
}
