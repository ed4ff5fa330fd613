use dioxus::prelude::*;

use crate::components::{BarList, Badge, ErrorBanner, ListSkeleton, PageHeader, StatCard};
use crate::context::use_app_context;
use crate::routes::Route;
use crate::services::appointments::{self, Appointment};
use crate::services::dashboard::{self, Counters, RevenueDay};
use crate::services::products::{self, Product};
use crate::utils::data_state::DataState;
use crate::utils::format::{format_brl, format_thousands};
use crate::utils::time::{display_date, format_date_br, format_hour, today};

const LOW_STOCK_PREVIEW: u32 = 5;
const UPCOMING_LIMIT: u32 = 5;
const REVENUE_DAYS: u32 = 7;

#[component]
pub fn Dashboard() -> Element {
    let app = use_app_context();
    let mut counters = use_signal(|| DataState::<Counters>::Pending);
    let mut today_list = use_signal(|| DataState::<Vec<Appointment>>::Pending);
    let mut upcoming = use_signal(Vec::<Appointment>::new);
    let mut low_stock = use_signal(Vec::<Product>::new);
    let mut revenue = use_signal(Vec::<RevenueDay>::new);
    let mut reload = use_signal(|| 0u32);

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let api = api.clone();
        counters.set(DataState::Loading);
        today_list.set(DataState::Loading);

        spawn(async move {
            let day = today();
            counters.set(dashboard::counters(&api).await.into());
            today_list.set(appointments::for_day(&api, day).await.into());

            match appointments::upcoming(&api, day, UPCOMING_LIMIT).await {
                Ok(list) => upcoming.set(list),
                Err(e) => log::warn!("Failed to load upcoming appointments: {}", e),
            }
            match products::low_stock(&api, LOW_STOCK_PREVIEW).await {
                Ok(list) => low_stock.set(list),
                Err(e) => log::warn!("Failed to load low-stock products: {}", e),
            }
            match dashboard::revenue(&api, REVENUE_DAYS).await {
                Ok(days) => revenue.set(days),
                Err(e) => log::warn!("Failed to load revenue: {}", e),
            }
            log::info!("Dashboard loaded");
        });
    });

    let greeting = format!("Olá, {}", app.user_name());
    let revenue_rows: Vec<(String, f64)> = revenue
        .read()
        .iter()
        .map(|d| (display_date(&d.data), d.valor))
        .collect();

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: greeting,
                subtitle: Some(format_date_br(today())),
            }

            div {
                class: "p-4 space-y-6",

                match &*counters.read() {
                    DataState::Error(msg) => rsx! {
                        ErrorBanner {
                            message: msg.clone(),
                            on_retry: move |_| *reload.write() += 1,
                        }
                    },
                    DataState::Loaded(c) => rsx! {
                        div {
                            class: "grid gap-4 sm:grid-cols-2 xl:grid-cols-4",
                            StatCard { icon: "📅", label: "Agendamentos hoje".to_string(), value: format_thousands(c.agendamentos_hoje as u64) }
                            StatCard { icon: "💰", label: "Faturamento hoje".to_string(), value: format_brl(c.faturamento_hoje) }
                            StatCard { icon: "👥", label: "Clientes ativos".to_string(), value: format_thousands(c.clientes_ativos as u64) }
                            StatCard { icon: "📦", label: "Estoque baixo".to_string(), value: format_thousands(c.produtos_estoque_baixo as u64), detail: Some("produtos".to_string()) }
                        }
                    },
                    _ => rsx! {
                        div {
                            class: "grid gap-4 sm:grid-cols-2 xl:grid-cols-4 animate-pulse",
                            for _ in 0..4 {
                                div { class: "h-24 bg-muted rounded-xl" }
                            }
                        }
                    },
                }

                div {
                    class: "grid gap-6 xl:grid-cols-2",

                    // Today's appointments
                    section {
                        class: "bg-card border border-border rounded-xl",
                        div {
                            class: "flex items-center justify-between px-4 py-3 border-b border-border",
                            h3 { class: "font-semibold", "Agenda de hoje" }
                            Link { to: Route::Agenda {}, class: "text-sm text-primary hover:underline", "Abrir agenda" }
                        }
                        match &*today_list.read() {
                            DataState::Loaded(list) if list.is_empty() => rsx! {
                                p { class: "p-4 text-sm text-muted-foreground", "Nenhum agendamento para hoje." }
                            },
                            DataState::Loaded(list) => rsx! {
                                ul {
                                    for a in list.iter() {
                                        AppointmentLine { key: "{a.id}", appointment: a.clone(), show_date: false }
                                    }
                                }
                            },
                            DataState::Error(msg) => rsx! {
                                p { class: "p-4 text-sm text-red-600", "{msg}" }
                            },
                            _ => rsx! { ListSkeleton { rows: 3 } },
                        }
                    }

                    // Upcoming
                    section {
                        class: "bg-card border border-border rounded-xl",
                        div {
                            class: "px-4 py-3 border-b border-border",
                            h3 { class: "font-semibold", "Próximos agendamentos" }
                        }
                        if upcoming.read().is_empty() {
                            p { class: "p-4 text-sm text-muted-foreground", "Nenhum agendamento pendente." }
                        } else {
                            ul {
                                for a in upcoming.read().iter() {
                                    AppointmentLine { key: "{a.id}", appointment: a.clone(), show_date: true }
                                }
                            }
                        }
                    }

                    // Revenue
                    section {
                        class: "bg-card border border-border rounded-xl p-4",
                        h3 { class: "font-semibold mb-3", "Faturamento dos últimos {REVENUE_DAYS} dias" }
                        BarList { rows: revenue_rows }
                    }

                    // Low stock
                    section {
                        class: "bg-card border border-border rounded-xl",
                        div {
                            class: "flex items-center justify-between px-4 py-3 border-b border-border",
                            h3 { class: "font-semibold", "Estoque baixo" }
                            Link { to: Route::Products {}, class: "text-sm text-primary hover:underline", "Ver todos" }
                        }
                        if low_stock.read().is_empty() {
                            p { class: "p-4 text-sm text-muted-foreground", "Nenhum produto com estoque baixo. 👍" }
                        } else {
                            ul {
                                for p in low_stock.read().iter().take(LOW_STOCK_PREVIEW as usize) {
                                    li {
                                        key: "{p.id}",
                                        class: "flex items-center justify-between px-4 py-2 border-b border-border last:border-b-0",
                                        span { "{p.name}" }
                                        span {
                                            class: "text-sm text-red-600 font-medium",
                                            "{p.stock} / mín. {p.min_stock}"
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

#[component]
fn AppointmentLine(appointment: Appointment, show_date: bool) -> Element {
    let when = appointment
        .start()
        .map(|s| {
            if show_date {
                format!("{} {}", s.format("%d/%m"), format_hour(s))
            } else {
                format_hour(s)
            }
        })
        .unwrap_or_default();
    let status = appointment.status;

    rsx! {
        li {
            class: "flex items-center gap-3 px-4 py-2 border-b border-border last:border-b-0",
            span { class: "w-20 text-sm font-mono text-muted-foreground", "{when}" }
            div {
                class: "flex-1 min-w-0",
                p { class: "font-medium truncate", {appointment.client_name.clone().unwrap_or_default()} }
                p { class: "text-xs text-muted-foreground truncate", "{appointment.services_label()}" }
            }
            Badge { label: status.label().to_string(), class: status.badge_class().to_string() }
        }
    }
}
