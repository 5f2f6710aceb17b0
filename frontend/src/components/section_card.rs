use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct SectionCardProps {
    pub icon: AttrValue,
    pub title: AttrValue,
    pub description: AttrValue,
    pub route: Route,
}

/// Dashboard tile linking to one admin section.
#[function_component(SectionCard)]
pub fn section_card(props: &SectionCardProps) -> Html {
    html! {
        <Link<Route>
            to={props.route.clone()}
            classes={classes!(
                "group",
                "flex",
                "flex-col",
                "gap-2",
                "rounded-2xl",
                "border",
                "border-[var(--border)]",
                "bg-[var(--surface)]",
                "p-5",
                "shadow-sm",
                "transition",
                "hover:border-[var(--primary)]",
                "hover:shadow-md"
            )}
        >
            <i
                class={classes!("fas", props.icon.to_string(), "fa-lg", "text-[var(--primary)]")}
                aria-hidden="true"
            ></i>
            <strong class="text-base text-[var(--text)] group-hover:text-[var(--primary)]">
                { props.title.clone() }
            </strong>
            <span class="text-sm text-[var(--muted)]">{ props.description.clone() }</span>
        </Link<Route>>
    }
}
