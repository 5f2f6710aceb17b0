use school_admin_shared::{
    form::{OptionSource, SUBJECT_CATEGORIES},
    models::{
        AcademicYear, AdminUser, ClassLevel, ResultRecord, StudentUser, Subject, TeacherAssignment, TeacherUser,
        Term,
    },
};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    components::header::Header,
    feedback_context::FeedbackProvider,
    i18n::current::panel_titles as titles,
    pages::{
        self,
        entity_panel::{EntityPanel, ListFilter},
    },
};

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/academic-years")]
    AcademicYears,
    #[at("/terms")]
    Terms,
    #[at("/terms/new")]
    TermNew,
    #[at("/classes")]
    Classes,
    #[at("/subjects")]
    Subjects,
    #[at("/results")]
    Results,
    #[at("/results/upload")]
    UploadResults,
    #[at("/admins")]
    Admins,
    #[at("/teachers")]
    Teachers,
    #[at("/students")]
    Students,
    #[at("/teacher-assignments")]
    TeacherAssignments,
    #[not_found]
    #[at("/404")]
    NotFound,
}

const ACCOUNT_STATUSES: &[(&str, &str)] = &[("active", "Active"), ("inactive", "Inactive")];
const PUBLISH_STATUSES: &[(&str, &str)] = &[("published", "Published"), ("unpublished", "Unpublished")];

const fn select(name: &'static str, label: &'static str, source: OptionSource) -> ListFilter {
    ListFilter::Select {
        name,
        label,
        source,
    }
}

fn year_filter() -> ListFilter {
    select("academic_year", titles::FILTER_ACADEMIC_YEAR, OptionSource::AcademicYears)
}

fn switch(route: Route) -> Html {
    match route {
        Route::Dashboard => html! { <pages::dashboard::DashboardPage /> },
        Route::AcademicYears => html! {
            <EntityPanel<AcademicYear>
                title={titles::ACADEMIC_YEARS}
                description={titles::ACADEMIC_YEARS_HINT}
                filters={vec![ListFilter::Search]}
            />
        },
        Route::Terms => html! {
            <EntityPanel<Term>
                title={titles::TERMS}
                description={titles::TERMS_HINT}
                filters={vec![ListFilter::Search, year_filter()]}
                create_route={Route::TermNew}
            />
        },
        Route::TermNew => html! { <pages::term_form::TermFormPage /> },
        Route::Classes => html! {
            <EntityPanel<ClassLevel>
                title={titles::CLASSES}
                filters={vec![ListFilter::Search, year_filter()]}
            />
        },
        Route::Subjects => html! {
            <EntityPanel<Subject>
                title={titles::SUBJECTS}
                filters={vec![
                    ListFilter::Search,
                    select(
                        "category",
                        titles::FILTER_CATEGORY,
                        OptionSource::Static(SUBJECT_CATEGORIES),
                    ),
                ]}
            />
        },
        Route::Results => html! {
            <EntityPanel<ResultRecord>
                title={titles::RESULTS}
                description={titles::RESULTS_HINT}
                filters={vec![
                    ListFilter::Search,
                    year_filter(),
                    select("class_level", titles::FILTER_CLASS, OptionSource::Classes),
                    select("subject", titles::FILTER_SUBJECT, OptionSource::Subjects),
                    select("status", titles::FILTER_STATUS, OptionSource::Static(PUBLISH_STATUSES)),
                ]}
                create_route={Route::UploadResults}
            />
        },
        Route::UploadResults => html! { <pages::upload_results::UploadResultsPage /> },
        Route::Admins => html! {
            <EntityPanel<AdminUser>
                title={titles::ADMINS}
                filters={vec![
                    ListFilter::Search,
                    select("status", titles::FILTER_STATUS, OptionSource::Static(ACCOUNT_STATUSES)),
                ]}
            />
        },
        Route::Teachers => html! {
            <EntityPanel<TeacherUser>
                title={titles::TEACHERS}
                filters={vec![
                    ListFilter::Search,
                    select("status", titles::FILTER_STATUS, OptionSource::Static(ACCOUNT_STATUSES)),
                ]}
            />
        },
        Route::Students => html! {
            <EntityPanel<StudentUser>
                title={titles::STUDENTS}
                filters={vec![
                    ListFilter::Search,
                    select("class_level", titles::FILTER_CLASS, OptionSource::Classes),
                    select("status", titles::FILTER_STATUS, OptionSource::Static(ACCOUNT_STATUSES)),
                ]}
            />
        },
        Route::TeacherAssignments => html! {
            <EntityPanel<TeacherAssignment>
                title={titles::TEACHER_ASSIGNMENTS}
                filters={vec![ListFilter::Search, year_filter()]}
            />
        },
        Route::NotFound => html! { <pages::not_found::NotFoundPage /> },
    }
}

#[function_component(AppRouter)]
pub fn app_router() -> Html {
    html! {
        <BrowserRouter>
            <FeedbackProvider>
                <div class="flex flex-col bg-[var(--bg)]" style="min-height: 100vh; min-height: 100svh;">
                    <Header />
                    <main class="flex-1 pt-[var(--space-sm)]">
                        <Switch<Route> render={switch} />
                    </main>
                </div>
            </FeedbackProvider>
        </BrowserRouter>
    }
}
