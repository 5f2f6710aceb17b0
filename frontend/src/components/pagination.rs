use school_admin_shared::{
    table::{page_slots, PageSlot},
    Pagination as PageInfo,
};
use yew::prelude::*;

use crate::i18n::{current::pagination as t, fill_one};

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub pagination: PageInfo,
    /// Plural noun for the "Showing a-b of n" line.
    pub noun: AttrValue,
    pub on_page_change: Callback<usize>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let info = props.pagination;
    if !info.has_multiple_pages() {
        return Html::default();
    }

    let total_pages = info.total_pages;
    let current_page = info.current_page.clamp(1, total_pages);
    let slots = page_slots(current_page, total_pages);
    let on_page_change = props.on_page_change.clone();

    let prev_disabled = current_page <= 1;
    let next_disabled = current_page >= total_pages;

    let prev_onclick = {
        let on_page_change = on_page_change.clone();
        Callback::from(move |_| {
            if current_page > 1 {
                on_page_change.emit(current_page - 1);
            }
        })
    };

    let next_onclick = {
        let on_page_change = on_page_change.clone();
        Callback::from(move |_| {
            if current_page < total_pages {
                on_page_change.emit(current_page + 1);
            }
        })
    };

    let base_btn_classes = classes!(
        "inline-flex",
        "items-center",
        "justify-center",
        "min-w-[2.5rem]",
        "h-9",
        "px-3",
        "rounded-lg",
        "border",
        "border-[var(--border)]",
        "bg-[var(--surface)]",
        "text-[var(--text)]",
        "text-sm",
        "font-semibold",
        "shadow-sm",
        "transition-all",
        "duration-200",
        "hover:border-[var(--primary)]",
        "hover:text-[var(--primary)]",
        "disabled:opacity-50",
        "disabled:cursor-not-allowed"
    );

    html! {
        <div class="flex flex-wrap items-center justify-between gap-3">
            <p class="text-sm text-[var(--muted)]">{ info.summary(&props.noun) }</p>
            <nav class="flex flex-wrap items-center gap-2" aria-label={t::ARIA_NAV}>
                <button
                    type="button"
                    class={base_btn_classes.clone()}
                    disabled={prev_disabled}
                    onclick={prev_onclick}
                    aria-label={t::ARIA_PREV}
                >
                    {"<"}
                </button>
                { for slots.into_iter().enumerate().map(|(index, slot)| match slot {
                    PageSlot::Page(page) => {
                        let page_classes = classes!(
                            base_btn_classes.clone(),
                            if page == current_page {
                                "bg-[var(--primary)] text-white border-transparent cursor-default pointer-events-none"
                            } else {
                                ""
                            }
                        );
                        let onclick = {
                            let on_page_change = on_page_change.clone();
                            Callback::from(move |_| on_page_change.emit(page))
                        };

                        html! {
                            <button
                                key={format!("page-{page}")}
                                type="button"
                                class={page_classes}
                                aria-label={fill_one(t::ARIA_GOTO_PAGE_TEMPLATE, page)}
                                aria-current={if page == current_page {
                                    Some(AttrValue::from("page"))
                                } else {
                                    None
                                }}
                                disabled={page == current_page}
                                onclick={onclick}
                            >
                                { page }
                            </button>
                        }
                    }
                    PageSlot::Ellipsis => html! {
                        <span
                            key={format!("ellipsis-{index}")}
                            class={classes!(base_btn_classes.clone(), "select-none", "opacity-60", "pointer-events-none")}
                            aria-hidden="true"
                        >
                            {"..."}
                        </span>
                    },
                }) }
                <button
                    type="button"
                    class={base_btn_classes.clone()}
                    disabled={next_disabled}
                    onclick={next_onclick}
                    aria-label={t::ARIA_NEXT}
                >
                    {">"}
                </button>
            </nav>
        </div>
    }
}
