use dioxus::prelude::*;

use crate::utils::pagination::{page_items, PageItem};

#[component]
pub fn Pagination(current: u32, total: u32, on_change: EventHandler<u32>) -> Element {
    let items = page_items(current, total);
    if items.is_empty() {
        return rsx! {};
    }

    rsx! {
        nav {
            class: "flex items-center justify-center gap-1 py-4",
            aria_label: "Paginação",
            for (i, item) in items.into_iter().enumerate() {
                match item {
                    PageItem::Previous { target, enabled } => rsx! {
                        button {
                            key: "{i}",
                            class: "px-3 py-1 rounded-lg hover:bg-accent transition disabled:opacity-40",
                            disabled: !enabled,
                            onclick: move |_| on_change.call(target),
                            "Anterior"
                        }
                    },
                    PageItem::Page { number, current } => {
                        let class = if current {
                            "px-3 py-1 rounded-lg bg-primary text-primary-foreground font-semibold"
                        } else {
                            "px-3 py-1 rounded-lg hover:bg-accent transition"
                        };
                        rsx! {
                            button {
                                key: "{i}",
                                class: "{class}",
                                onclick: move |_| on_change.call(number),
                                "{number}"
                            }
                        }
                    }
                    PageItem::Ellipsis => rsx! {
                        span {
                            key: "{i}",
                            class: "px-2 text-muted-foreground",
                            "…"
                        }
                    },
                    PageItem::Next { target, enabled } => rsx! {
                        button {
                            key: "{i}",
                            class: "px-3 py-1 rounded-lg hover:bg-accent transition disabled:opacity-40",
                            disabled: !enabled,
                            onclick: move |_| on_change.call(target),
                            "Próxima"
                        }
                    },
                }
            }
        }
    }
}
