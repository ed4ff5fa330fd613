use chrono::{Duration, NaiveDate};
use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;
use std::collections::HashMap;

use crate::components::icons::{ChevronLeftIcon, ChevronRightIcon, PlusIcon};
use crate::components::toast::notice;
use crate::components::{
    AppointmentModal, Badge, CalendarGrid, ConfirmModal, EmptyState, ErrorBanner, ListSkeleton,
    Modal, PageHeader, StatCard, INPUT_CLASS,
};
use crate::context::use_app_context;
use crate::hooks::use_debounced;
use crate::services::appointments::{self, Appointment, AppointmentAction, AppointmentQuery};
use crate::utils::calendar::{
    build_month_grid, count_by_day, mark_appointment_counts, select_date, MonthCursor,
};
use crate::utils::data_state::DataState;
use crate::utils::format::format_brl;
use crate::utils::time::{display_datetime, format_date_br, format_hour, today};

const SEARCH_PAGE_SIZE: u32 = 20;

#[derive(Clone, PartialEq)]
enum AgendaDialog {
    New,
    Edit(Appointment),
    View(Appointment),
    Complete(Appointment),
    Cancel(Appointment),
}

#[component]
pub fn Agenda() -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut cursor = use_signal(|| MonthCursor::from_date(today()));
    let mut selected = use_signal(today);
    let mut month_counts = use_signal(HashMap::<NaiveDate, usize>::new);
    let mut day_list = use_signal(|| DataState::<Vec<Appointment>>::Pending);
    let mut upcoming = use_signal(Vec::<Appointment>::new);
    let mut dialog = use_signal(|| None::<AgendaDialog>);
    let mut cancel_reason = use_signal(String::new);
    let mut busy = use_signal(|| false);
    // Bumped after every write so the month and the day reload
    let mut revision = use_signal(|| 0u32);

    let mut search = use_signal(String::new);
    let search_query = use_debounced(search, 400);
    let mut search_results = use_signal(|| None::<DataState<Vec<Appointment>>>);

    // Month overview
    let api = app.api().clone();
    use_effect(move || {
        let _ = revision.read();
        let month = cursor();
        let api = api.clone();
        spawn(async move {
            match appointments::in_range(&api, month.first_day(), month.last_day()).await {
                Ok(list) => {
                    month_counts.set(count_by_day(list.iter().map(|a| a.starts_at.as_str())));
                }
                Err(e) => {
                    log::warn!("Failed to load month overview: {}", e);
                    month_counts.set(HashMap::new());
                }
            }
        });
    });

    // Selected day
    let api = app.api().clone();
    use_effect(move || {
        let _ = revision.read();
        let day = selected();
        let api = api.clone();
        day_list.set(DataState::Loading);
        spawn(async move {
            log::debug!("Loading appointments for {}", day);
            day_list.set(appointments::for_day(&api, day).await.into());
        });
    });

    // Upcoming pending appointments
    let api = app.api().clone();
    use_effect(move || {
        let _ = revision.read();
        let api = api.clone();
        spawn(async move {
            match appointments::upcoming(&api, today(), 5).await {
                Ok(list) => upcoming.set(list),
                Err(e) => log::warn!("Failed to load upcoming appointments: {}", e),
            }
        });
    });

    // Search
    let api = app.api().clone();
    use_effect(move || {
        let term = search_query.read().trim().to_string();
        if term.is_empty() {
            search_results.set(None);
            return;
        }
        let api = api.clone();
        search_results.set(Some(DataState::Loading));
        spawn(async move {
            let query = AppointmentQuery {
                search: term,
                page: 1,
                per_page: SEARCH_PAGE_SIZE,
                ..AppointmentQuery::default()
            };
            let result = appointments::list(&api, &query).await.map(|page| page.items);
            search_results.set(Some(result.into()));
        });
    });

    let mut cells = build_month_grid(cursor(), today());
    select_date(&mut cells, selected());
    mark_appointment_counts(&mut cells, &month_counts.read());

    let mut go_to_day = move |day: NaiveDate| {
        selected.set(day);
        if !cursor.peek().contains(day) {
            cursor.set(MonthCursor::from_date(day));
        }
    };

    let api = app.api().clone();
    let confirm_toast = toast.clone();
    let mut confirm_action = move || {
        let target = match dialog.read().clone() {
            Some(AgendaDialog::Complete(a)) => (a, false),
            Some(AgendaDialog::Cancel(a)) => (a, true),
            _ => return,
        };
        let api = api.clone();
        let toast = confirm_toast.clone();
        let reason = cancel_reason.read().clone();
        busy.set(true);
        spawn(async move {
            let (appointment, cancelling) = target;
            let result = if cancelling {
                appointments::cancel(&api, appointment.id, &reason)
                    .await
                    .map(|_| "Agendamento cancelado")
            } else {
                appointments::complete(&api, appointment.id)
                    .await
                    .map(|_| "Agendamento concluído")
            };
            match result {
                Ok(message) => {
                    log::info!("Appointment {}: {}", appointment.id, message);
                    toast.success(message.to_string(), notice(&display_datetime(&appointment.starts_at)));
                    dialog.set(None);
                    cancel_reason.set(String::new());
                    *revision.write() += 1;
                }
                Err(e) => {
                    log::error!("Appointment action failed: {}", e);
                    toast.error("Erro".to_string(), notice(&e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let summary = day_list
        .read()
        .data()
        .map(|list| appointments::summarize_day(list))
        .unwrap_or_default();
    let day = selected();

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "📅 Agenda".to_string(),
                input {
                    class: "{INPUT_CLASS} w-64",
                    placeholder: "Buscar agendamentos...",
                    value: "{search}",
                    oninput: move |e| search.set(e.value()),
                }
                button {
                    class: "flex items-center gap-2 px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: move |_| dialog.set(Some(AgendaDialog::New)),
                    PlusIcon { class: "w-4 h-4" }
                    "Novo agendamento"
                }
            }

            if let Some(results) = search_results.read().as_ref() {
                section {
                    class: "m-4 bg-card border border-border rounded-xl",
                    div {
                        class: "flex items-center justify-between px-4 py-3 border-b border-border",
                        h3 { class: "font-semibold", "Resultados da busca" }
                        button {
                            class: "text-sm text-muted-foreground hover:underline",
                            onclick: move |_| search.set(String::new()),
                            "Limpar busca"
                        }
                    }
                    match results {
                        DataState::Loaded(list) if list.is_empty() => rsx! {
                            EmptyState { icon: "🔍", title: "Nenhum agendamento encontrado".to_string() }
                        },
                        DataState::Loaded(list) => rsx! {
                            ul {
                                for a in list.iter().cloned() {
                                    AppointmentItem {
                                        key: "{a.id}",
                                        appointment: a,
                                        show_date: true,
                                        on_action: move |(action, a): (AppointmentAction, Appointment)| dialog.set(Some(dialog_for(action, a))),
                                    }
                                }
                            }
                        },
                        DataState::Error(msg) => rsx! { ErrorBanner { message: msg.clone() } },
                        _ => rsx! { ListSkeleton { rows: 2 } },
                    }
                }
            }

            div {
                class: "p-4 grid gap-6 xl:grid-cols-[minmax(0,420px)_1fr]",

                div {
                    class: "space-y-6",
                    CalendarGrid {
                        cursor: cursor(),
                        cells,
                        on_previous: move |_| {
                            let prev = cursor().previous();
                            cursor.set(prev);
                            selected.set(if prev.contains(today()) { today() } else { prev.first_day() });
                        },
                        on_next: move |_| {
                            let next = cursor().next();
                            cursor.set(next);
                            selected.set(if next.contains(today()) { today() } else { next.first_day() });
                        },
                        on_current: move |_| go_to_day(today()),
                        on_select: move |date| selected.set(date),
                    }

                    section {
                        class: "bg-card border border-border rounded-xl",
                        div {
                            class: "px-4 py-3 border-b border-border",
                            h3 { class: "font-semibold", "Próximos pendentes" }
                        }
                        if upcoming.read().is_empty() {
                            p { class: "p-4 text-sm text-muted-foreground", "Nenhum agendamento pendente." }
                        } else {
                            ul {
                                for a in upcoming.read().iter().cloned() {
                                    li {
                                        key: "{a.id}",
                                        class: "px-4 py-2 border-b border-border last:border-b-0 hover:bg-accent cursor-pointer",
                                        onclick: {
                                            let start = a.start();
                                            move |_| {
                                                if let Some(start) = start {
                                                    go_to_day(start.date());
                                                }
                                            }
                                        },
                                        p { class: "font-medium", {a.client_name.clone().unwrap_or_default()} }
                                        p { class: "text-xs text-muted-foreground", "{display_datetime(&a.starts_at)}" }
                                    }
                                }
                            }
                        }
                    }
                }

                section {
                    class: "space-y-4",

                    div {
                        class: "flex items-center justify-between",
                        button {
                            class: "p-2 rounded-lg hover:bg-accent transition",
                            aria_label: "Dia anterior",
                            onclick: move |_| go_to_day(day - Duration::days(1)),
                            ChevronLeftIcon { class: "w-5 h-5" }
                        }
                        div {
                            class: "flex items-center gap-3",
                            h3 { class: "text-lg font-semibold", "{format_date_br(day)}" }
                            button {
                                class: "px-3 py-1 text-sm rounded-lg border border-border hover:bg-accent transition",
                                onclick: move |_| go_to_day(today()),
                                "Hoje"
                            }
                        }
                        button {
                            class: "p-2 rounded-lg hover:bg-accent transition",
                            aria_label: "Próximo dia",
                            onclick: move |_| go_to_day(day + Duration::days(1)),
                            ChevronRightIcon { class: "w-5 h-5" }
                        }
                    }

                    div {
                        class: "grid gap-4 sm:grid-cols-3",
                        StatCard { icon: "🗓️", label: "Agendamentos".to_string(), value: summary.count.to_string() }
                        StatCard { icon: "💰", label: "Valor previsto".to_string(), value: format_brl(summary.total_value) }
                        StatCard { icon: "👥", label: "Clientes".to_string(), value: summary.distinct_clients.to_string() }
                    }

                    div {
                        class: "bg-card border border-border rounded-xl",
                        match &*day_list.read() {
                            DataState::Error(msg) => rsx! {
                                ErrorBanner {
                                    message: msg.clone(),
                                    on_retry: move |_| *revision.write() += 1,
                                }
                            },
                            DataState::Loaded(list) if list.is_empty() => rsx! {
                                EmptyState {
                                    icon: "📭",
                                    title: "Nenhum agendamento neste dia".to_string(),
                                    hint: Some("Use \"Novo agendamento\" para marcar um horário.".to_string()),
                                }
                            },
                            DataState::Loaded(list) => rsx! {
                                ul {
                                    for a in list.iter().cloned() {
                                        AppointmentItem {
                                            key: "{a.id}",
                                            appointment: a,
                                            show_date: false,
                                            on_action: move |(action, a): (AppointmentAction, Appointment)| dialog.set(Some(dialog_for(action, a))),
                                        }
                                    }
                                }
                            },
                            _ => rsx! { ListSkeleton { rows: 4 } },
                        }
                    }
                }
            }

            match dialog.read().clone() {
                Some(AgendaDialog::New) => rsx! {
                    AppointmentModal {
                        appointment: None,
                        date: day,
                        on_close: move |_| dialog.set(None),
                        on_saved: move |saved: Appointment| {
                            dialog.set(None);
                            if let Some(start) = saved.start() {
                                go_to_day(start.date());
                            }
                            *revision.write() += 1;
                        },
                    }
                },
                Some(AgendaDialog::Edit(a)) => rsx! {
                    AppointmentModal {
                        appointment: Some(a),
                        date: day,
                        on_close: move |_| dialog.set(None),
                        on_saved: move |_| {
                            dialog.set(None);
                            *revision.write() += 1;
                        },
                    }
                },
                Some(AgendaDialog::View(a)) => rsx! {
                    AppointmentModal {
                        appointment: Some(a),
                        date: day,
                        read_only: true,
                        on_close: move |_| dialog.set(None),
                        on_saved: move |_| dialog.set(None),
                    }
                },
                Some(AgendaDialog::Complete(a)) => rsx! {
                    ConfirmModal {
                        title: "Concluir agendamento".to_string(),
                        message: format!("Marcar o atendimento de {} como concluído?", a.client_name.clone().unwrap_or_default()),
                        confirm_text: Some("Concluir".to_string()),
                        destructive: false,
                        busy: *busy.read(),
                        on_confirm: move |_| confirm_action(),
                        on_cancel: move |_| dialog.set(None),
                    }
                },
                Some(AgendaDialog::Cancel(a)) => rsx! {
                    Modal {
                        title: "Cancelar agendamento".to_string(),
                        on_close: move |_| dialog.set(None),
                        p {
                            class: "text-muted-foreground mb-4",
                            "Cancelar o horário de {a.client_name.clone().unwrap_or_default()} em {display_datetime(&a.starts_at)}?"
                        }
                        label { class: "block text-sm font-medium mb-1", "Motivo" }
                        textarea {
                            class: INPUT_CLASS,
                            rows: "2",
                            value: "{cancel_reason}",
                            oninput: move |e| cancel_reason.set(e.value()),
                        }
                        div {
                            class: "flex gap-3 justify-end mt-6",
                            button {
                                class: "px-4 py-2 rounded-lg hover:bg-accent transition",
                                onclick: move |_| dialog.set(None),
                                "Voltar"
                            }
                            button {
                                class: "px-4 py-2 bg-destructive text-destructive-foreground rounded-lg hover:bg-destructive/90 transition disabled:opacity-50",
                                disabled: *busy.read(),
                                onclick: move |_| confirm_action(),
                                "Cancelar agendamento"
                            }
                        }
                    }
                },
                None => rsx! {},
            }
        }
    }
}

fn dialog_for(action: AppointmentAction, appointment: Appointment) -> AgendaDialog {
    match action {
        AppointmentAction::View => AgendaDialog::View(appointment),
        AppointmentAction::Edit => AgendaDialog::Edit(appointment),
        AppointmentAction::Complete => AgendaDialog::Complete(appointment),
        AppointmentAction::Cancel => AgendaDialog::Cancel(appointment),
    }
}

#[component]
fn AppointmentItem(
    appointment: Appointment,
    show_date: bool,
    on_action: EventHandler<(AppointmentAction, Appointment)>,
) -> Element {
    let when = appointment
        .start()
        .map(|s| {
            if show_date {
                format!("{} {}", format_date_br(s.date()), format_hour(s))
            } else {
                format_hour(s)
            }
        })
        .unwrap_or_default();
    let status = appointment.status;

    rsx! {
        li {
            class: "flex flex-wrap items-center gap-3 px-4 py-3 border-b border-border last:border-b-0",
            span { class: "w-28 font-mono text-sm", "{when}" }
            div {
                class: "flex-1 min-w-0",
                p { class: "font-medium truncate", {appointment.client_name.clone().unwrap_or_default()} }
                p {
                    class: "text-xs text-muted-foreground truncate",
                    "{appointment.services_label()} · {appointment.barber_name.clone().unwrap_or_default()}"
                }
            }
            span { class: "text-sm font-medium", "{format_brl(appointment.total_price())}" }
            Badge { label: status.label().to_string(), class: status.badge_class().to_string() }
            div {
                class: "flex gap-1",
                for action in status.actions().iter().copied() {
                    button {
                        key: "{action.label()}",
                        class: match action {
                            AppointmentAction::Cancel => "px-2 py-1 text-sm rounded-lg text-red-600 hover:bg-red-50 dark:hover:bg-red-950 transition",
                            _ => "px-2 py-1 text-sm rounded-lg hover:bg-accent transition",
                        },
                        onclick: {
                            let appointment = appointment.clone();
                            move |_| on_action.call((action, appointment.clone()))
                        },
                        "{action.label()}"
                    }
                }
            }
        }
    }
}
