use yew::prelude::*;

use crate::{
    components::{header::NAV_ITEMS, section_card::SectionCard},
    i18n::current::dashboard as t,
    router::Route,
};

fn describe(route: &Route) -> &'static str {
    match route {
        Route::AcademicYears => t::ACADEMIC_YEARS,
        Route::Terms => t::TERMS,
        Route::Classes => t::CLASSES,
        Route::Subjects => t::SUBJECTS,
        Route::TeacherAssignments => t::ASSIGNMENTS,
        Route::Results => t::RESULTS,
        Route::Teachers => t::TEACHERS,
        Route::Students => t::STUDENTS,
        Route::Admins => t::ADMINS,
        _ => "",
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    html! {
        <section class="mx-auto flex w-full max-w-6xl flex-col gap-6 px-4 py-8">
            <header>
                <h1 class="text-2xl font-bold text-[var(--text)]">{ t::TITLE }</h1>
                <p class="mt-1 text-sm text-[var(--muted)]">{ t::SUBTITLE }</p>
            </header>
            <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                { for NAV_ITEMS.iter().map(|(label, route, icon)| html! {
                    <SectionCard
                        key={*label}
                        icon={*icon}
                        title={*label}
                        description={describe(route)}
                        route={route.clone()}
                    />
                }) }
                <SectionCard
                    icon="fa-file-arrow-up"
                    title={t::UPLOAD_TITLE}
                    description={t::UPLOAD}
                    route={Route::UploadResults}
                />
            </div>
        </section>
    }
}
