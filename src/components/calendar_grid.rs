use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::utils::calendar::{CalendarCell, MonthCursor, WEEKDAY_LABELS};
use super::icons::{ChevronLeftIcon, ChevronRightIcon};

/// Month view of the agenda. `cells` comes from `build_month_grid` with the
/// active marker already moved to the selected day.
#[component]
pub fn CalendarGrid(
    cursor: MonthCursor,
    cells: Vec<CalendarCell>,
    on_previous: EventHandler<()>,
    on_next: EventHandler<()>,
    on_current: EventHandler<()>,
    on_select: EventHandler<NaiveDate>,
) -> Element {
    rsx! {
        div {
            class: "bg-card border border-border rounded-xl p-4",

            div {
                class: "flex items-center justify-between mb-4",
                button {
                    class: "p-2 rounded-lg hover:bg-accent transition",
                    aria_label: "Mês anterior",
                    onclick: move |_| on_previous.call(()),
                    ChevronLeftIcon { class: "w-5 h-5" }
                }
                div {
                    class: "flex items-center gap-3",
                    h3 {
                        class: "text-lg font-semibold",
                        "{cursor.label()}"
                    }
                    button {
                        class: "px-3 py-1 text-sm rounded-lg border border-border hover:bg-accent transition",
                        onclick: move |_| on_current.call(()),
                        "Mês atual"
                    }
                }
                button {
                    class: "p-2 rounded-lg hover:bg-accent transition",
                    aria_label: "Próximo mês",
                    onclick: move |_| on_next.call(()),
                    ChevronRightIcon { class: "w-5 h-5" }
                }
            }

            div {
                class: "grid grid-cols-7 gap-1 text-center",
                for label in WEEKDAY_LABELS {
                    div {
                        key: "{label}",
                        class: "text-xs font-semibold text-muted-foreground py-1",
                        "{label}"
                    }
                }

                for (i, cell) in cells.into_iter().enumerate() {
                    match cell.date {
                        None => rsx! {
                            div { key: "{i}", class: "h-12" }
                        },
                        Some(date) => {
                            let mut class = String::from("h-12 rounded-lg flex flex-col items-center justify-center transition cursor-pointer");
                            if cell.is_active {
                                class.push_str(" bg-primary text-primary-foreground font-bold");
                            } else if cell.is_today {
                                class.push_str(" border-2 border-primary font-semibold hover:bg-accent");
                            } else {
                                class.push_str(" hover:bg-accent");
                            }
                            let count = cell.appointments;
                            rsx! {
                                button {
                                    key: "{i}",
                                    class: "{class}",
                                    aria_current: if cell.is_today { "date" } else { "false" },
                                    onclick: move |_| on_select.call(date),
                                    span { "{cell.day().unwrap_or_default()}" }
                                    if count > 0 {
                                        span {
                                            class: "text-[10px] leading-none px-1.5 rounded-full bg-blue-500 text-white",
                                            "{count}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
