use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::icons::PlusIcon;
use crate::components::toast::notice;
use crate::components::{
    Badge, BarList, ConfirmModal, EmptyState, ErrorBanner, ListSkeleton, PageHeader, Pagination,
    PaymentModal, SaleDetails, SaleModal, StatCard, INPUT_CLASS,
};
use crate::context::use_app_context;
use crate::hooks::use_debounced;
use crate::services::page::Page;
use crate::services::sales::{self, method_label, PaymentSplit, Sale, SaleFilters, SalesSummary};
use crate::utils::data_state::{DataState, ListView};
use crate::utils::export;
use crate::utils::format::{capitalize, format_brl, format_percent};
use crate::utils::print;
use crate::utils::time::{display_datetime, format_date_br, now_local, parse_date, today};

const STATUS_OPTIONS: [(&str, &str); 4] = [
    ("", "Todos os status"),
    ("finalizada", "Finalizada"),
    ("pendente", "Pendente"),
    ("cancelada", "Cancelada"),
];

#[derive(Clone, PartialEq)]
enum SaleDialog {
    New,
    Details(Sale),
    Payment(Sale),
    Cancel(Sale),
    PrintOffer(Sale),
}

/// Human description of the active filters, printed on the sales report
fn filters_label(filters: &SaleFilters) -> String {
    let mut parts = Vec::new();
    if let Some(from) = filters.from {
        parts.push(format!("de {}", format_date_br(from)));
    }
    if let Some(to) = filters.to {
        parts.push(format!("até {}", format_date_br(to)));
    }
    if !filters.status.is_empty() {
        parts.push(format!("status {}", filters.status));
    }
    if !filters.search.trim().is_empty() {
        parts.push(format!("busca \"{}\"", filters.search.trim()));
    }
    if parts.is_empty() {
        "Nenhum".to_string()
    } else {
        parts.join(", ")
    }
}

fn print_receipt(sale: &Sale) -> Result<(), String> {
    let company = crate::stores::settings_store::SETTINGS.read().empresa.clone();
    print::open_document(&print::receipt_html(sale, &company))
}

#[component]
pub fn Sales() -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut filters = use_signal(SaleFilters::default);
    let mut search = use_signal(String::new);
    let search_query = use_debounced(search, 300);
    let mut list = use_signal(|| DataState::<Page<Sale>>::Pending);
    let mut summary = use_signal(|| None::<SalesSummary>);
    let mut split = use_signal(PaymentSplit::default);
    let mut dialog = use_signal(|| None::<SaleDialog>);
    let mut cancelling = use_signal(|| false);
    let mut exporting = use_signal(|| false);
    let mut reload = use_signal(|| 0u32);

    // Debounced search feeds the filters and resets the page
    use_effect(move || {
        let term = search_query();
        if filters.peek().search != term {
            let mut f = filters.write();
            f.search = term;
            f.page = 1;
        }
    });

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let current = filters();
        let api = api.clone();
        list.set(DataState::Loading);
        spawn(async move {
            log::debug!("Loading sales page {}", current.page);
            list.set(sales::list(&api, &current).await.into());
        });
    });

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let api = api.clone();
        spawn(async move {
            match sales::summary(&api).await {
                Ok(s) => summary.set(Some(s)),
                Err(e) => log::warn!("Failed to load sales summary: {}", e),
            }
            match sales::payment_split(&api).await {
                Ok(s) => split.set(s),
                Err(e) => log::warn!("Failed to load payment split: {}", e),
            }
        });
    });

    let api = app.api().clone();
    let cancel_toast = toast.clone();
    let confirm_cancel = move |_| {
        let Some(SaleDialog::Cancel(sale)) = dialog.read().clone() else {
            return;
        };
        let api = api.clone();
        let toast = cancel_toast.clone();
        cancelling.set(true);
        spawn(async move {
            match sales::cancel(&api, sale.id).await {
                Ok(_) => {
                    log::info!("Sale {} cancelled", sale.id);
                    toast.success("Venda cancelada".to_string(), notice(&format!("Venda #{}", sale.id)));
                    dialog.set(None);
                    *reload.write() += 1;
                }
                Err(e) => {
                    log::error!("Failed to cancel sale {}: {}", sale.id, e);
                    toast.error("Erro ao cancelar".to_string(), notice(&e.to_string()));
                }
            }
            cancelling.set(false);
        });
    };

    let api = app.api().clone();
    let export_toast = toast.clone();
    let export_csv = move |_| {
        if *exporting.read() {
            return;
        }
        let api = api.clone();
        let toast = export_toast.clone();
        let current = filters();
        exporting.set(true);
        spawn(async move {
            let result = sales::export(&api, &current)
                .await
                .map_err(|e| e.to_string())
                .and_then(|rows| {
                    let csv = export::sales_csv(&rows);
                    export::download_text(&export::sales_csv_filename(today()), &csv, "text/csv;charset=utf-8")
                        .map(|_| rows.len())
                });
            match result {
                Ok(count) => {
                    log::info!("Exported {} sales", count);
                    toast.success("Exportação concluída".to_string(), notice(&format!("{} venda(s)", count)));
                }
                Err(e) => {
                    log::error!("Sales export failed: {}", e);
                    toast.error("Erro ao exportar".to_string(), notice(&e));
                }
            }
            exporting.set(false);
        });
    };

    let print_toast = toast.clone();
    let print_list = move |_| {
        let rows = list.read().data().map(|p| p.items.clone()).unwrap_or_default();
        let html = print::sales_report_html(&rows, &filters_label(&filters.read()), now_local());
        if let Err(e) = print::open_document(&html) {
            print_toast.warning("Impressão".to_string(), notice(&e));
        }
    };

    let receipt_toast = toast.clone();
    let print_sale = move |sale: Sale| {
        if let Err(e) = print_receipt(&sale) {
            receipt_toast.warning("Impressão".to_string(), notice(&e));
        }
    };

    let filtered = filters.read().is_filtered();
    let view = list.read().list_view(|p| p.len(), filtered);
    let rows = list.read().data().map(|p| p.items.clone()).unwrap_or_default();
    let split_rows: Vec<(String, f64)> = split
        .read()
        .valores
        .iter()
        .map(|(method, value)| (method_label(Some(method)).to_string(), *value))
        .collect();

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "🛒 Vendas".to_string(),
                subtitle: list.read().data().map(|p| p.range_label()),
                button {
                    class: "px-4 py-2 rounded-lg border border-border hover:bg-accent transition disabled:opacity-50",
                    disabled: *exporting.read(),
                    onclick: export_csv,
                    if *exporting.read() { "Exportando..." } else { "⬇️ Exportar CSV" }
                }
                button {
                    class: "px-4 py-2 rounded-lg border border-border hover:bg-accent transition",
                    onclick: print_list,
                    "🖨️ Imprimir lista"
                }
                button {
                    class: "flex items-center gap-2 px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: move |_| dialog.set(Some(SaleDialog::New)),
                    PlusIcon { class: "w-4 h-4" }
                    "Nova venda"
                }
            }

            div {
                class: "p-4 space-y-6",

                if let Some(s) = summary.read().as_ref() {
                    div {
                        class: "grid gap-4 sm:grid-cols-2 xl:grid-cols-4",
                        StatCard { icon: "📅", label: "Hoje".to_string(), value: format_brl(s.hoje.valor), detail: Some(format!("{} venda(s)", s.hoje.total)) }
                        StatCard { icon: "🗓️", label: "Semana".to_string(), value: format_brl(s.semana.valor), detail: Some(format!("{} venda(s)", s.semana.total)) }
                        StatCard { icon: "📆", label: "Mês".to_string(), value: format_brl(s.mes.valor), detail: Some(format!("{} venda(s)", s.mes.total)) }
                        StatCard {
                            icon: "🎯",
                            label: "Ticket médio".to_string(),
                            value: format_brl(s.ticket_medio),
                            detail: Some(format!("{} vs. mês anterior", format_percent(s.ticket_variacao))),
                        }
                    }
                }

                // Filters
                div {
                    class: "bg-card border border-border rounded-xl p-4 grid gap-3 sm:grid-cols-2 xl:grid-cols-5",
                    input {
                        class: "{INPUT_CLASS} xl:col-span-2",
                        placeholder: "Buscar por cliente ou número...",
                        value: "{search}",
                        oninput: move |e| search.set(e.value()),
                    }
                    input {
                        class: INPUT_CLASS,
                        r#type: "date",
                        aria_label: "Data inicial",
                        value: filters.read().from.map(|d| d.to_string()).unwrap_or_default(),
                        onchange: move |e| {
                            let mut f = filters.write();
                            f.from = parse_date(&e.value());
                            f.page = 1;
                        },
                    }
                    input {
                        class: INPUT_CLASS,
                        r#type: "date",
                        aria_label: "Data final",
                        value: filters.read().to.map(|d| d.to_string()).unwrap_or_default(),
                        onchange: move |e| {
                            let mut f = filters.write();
                            f.to = parse_date(&e.value());
                            f.page = 1;
                        },
                    }
                    select {
                        class: INPUT_CLASS,
                        onchange: move |e| {
                            let mut f = filters.write();
                            f.status = e.value();
                            f.page = 1;
                        },
                        for (value, label) in STATUS_OPTIONS {
                            option {
                                key: "{value}",
                                value: value,
                                selected: filters.read().status == value,
                                "{label}"
                            }
                        }
                    }
                }

                match view {
                    ListView::Loading => rsx! { ListSkeleton {} },
                    ListView::Failed => rsx! {
                        ErrorBanner {
                            message: list.read().error().unwrap_or_default().to_string(),
                            on_retry: move |_| *reload.write() += 1,
                        }
                    },
                    ListView::Empty => rsx! {
                        EmptyState {
                            icon: "🛒",
                            title: "Nenhuma venda registrada".to_string(),
                            hint: Some("Use \"Nova venda\" para registrar a primeira.".to_string()),
                        }
                    },
                    ListView::NoResults => rsx! {
                        EmptyState {
                            icon: "🔍",
                            title: "Nenhuma venda encontrada com esses filtros".to_string(),
                            on_clear: move |_| {
                                search.set(String::new());
                                filters.set(SaleFilters::default());
                            },
                        }
                    },
                    ListView::Rows => rsx! {
                        div {
                            class: "bg-card border border-border rounded-xl overflow-x-auto",
                            table {
                                class: "w-full text-sm",
                                thead {
                                    tr {
                                        class: "text-left text-muted-foreground border-b border-border",
                                        th { class: "px-4 py-3", "#" }
                                        th { class: "px-4 py-3", "Data" }
                                        th { class: "px-4 py-3", "Cliente" }
                                        th { class: "px-4 py-3", "Itens" }
                                        th { class: "px-4 py-3 text-right", "Total" }
                                        th { class: "px-4 py-3", "Status" }
                                        th { class: "px-4 py-3", "Pagamento" }
                                        th { class: "px-4 py-3 text-right", "Ações" }
                                    }
                                }
                                tbody {
                                    for sale in rows {
                                        SaleRow {
                                            key: "{sale.id}",
                                            sale: sale.clone(),
                                            on_details: move |s| dialog.set(Some(SaleDialog::Details(s))),
                                            on_payment: move |s| dialog.set(Some(SaleDialog::Payment(s))),
                                            on_cancel: move |s| dialog.set(Some(SaleDialog::Cancel(s))),
                                        }
                                    }
                                }
                            }
                        }
                        if let Some(p) = list.read().data() {
                            Pagination {
                                current: p.current,
                                total: p.pages,
                                on_change: move |n| filters.write().page = n,
                            }
                        }
                    },
                }

                section {
                    class: "bg-card border border-border rounded-xl p-4",
                    h3 { class: "font-semibold mb-3", "Recebimentos por forma de pagamento" }
                    BarList { rows: split_rows, color: "bg-emerald-500".to_string() }
                }
            }

            match dialog.read().clone() {
                Some(SaleDialog::New) => rsx! {
                    SaleModal {
                        on_close: move |_| dialog.set(None),
                        on_saved: move |sale: Sale| {
                            dialog.set(Some(SaleDialog::PrintOffer(sale)));
                            *reload.write() += 1;
                        },
                    }
                },
                Some(SaleDialog::Details(sale)) => rsx! {
                    SaleDetails {
                        sale,
                        on_close: move |_| dialog.set(None),
                        on_print: print_sale,
                    }
                },
                Some(SaleDialog::Payment(sale)) => rsx! {
                    PaymentModal {
                        sale,
                        on_close: move |_| dialog.set(None),
                        on_paid: move |_| {
                            dialog.set(None);
                            *reload.write() += 1;
                        },
                    }
                },
                Some(SaleDialog::Cancel(sale)) => rsx! {
                    ConfirmModal {
                        title: "Cancelar venda".to_string(),
                        message: format!(
                            "Cancelar a venda #{} de {} ({})? O estoque dos itens será devolvido.",
                            sale.id,
                            sale.client_label(),
                            format_brl(sale.total)
                        ),
                        confirm_text: Some("Cancelar venda".to_string()),
                        cancel_text: Some("Voltar".to_string()),
                        busy: *cancelling.read(),
                        on_confirm: confirm_cancel,
                        on_cancel: move |_| dialog.set(None),
                    }
                },
                Some(SaleDialog::PrintOffer(sale)) => rsx! {
                    ConfirmModal {
                        title: "Venda registrada".to_string(),
                        message: format!("Venda #{} no valor de {}. Deseja imprimir o comprovante?", sale.id, format_brl(sale.total)),
                        confirm_text: Some("Imprimir".to_string()),
                        cancel_text: Some("Agora não".to_string()),
                        destructive: false,
                        on_confirm: move |_| {
                            print_sale(sale.clone());
                            dialog.set(None);
                        },
                        on_cancel: move |_| dialog.set(None),
                    }
                },
                None => rsx! {},
            }
        }
    }
}

#[component]
fn SaleRow(
    sale: Sale,
    on_details: EventHandler<Sale>,
    on_payment: EventHandler<Sale>,
    on_cancel: EventHandler<Sale>,
) -> Element {
    let state = sale.payment_state();
    let created = sale.created_at.as_deref().map(display_datetime).unwrap_or_default();
    let status = capitalize(sale.status.as_deref().unwrap_or("-"));
    let can_pay = !sale.is_cancelled() && sale.outstanding() > 0.0;
    let can_cancel = !sale.is_cancelled();
    let for_details = sale.clone();
    let for_payment = sale.clone();
    let for_cancel = sale.clone();

    rsx! {
        tr {
            class: "border-b border-border last:border-b-0 hover:bg-accent/50",
            td { class: "px-4 py-3 font-mono text-xs", "#{sale.id}" }
            td { class: "px-4 py-3 whitespace-nowrap", "{created}" }
            td { class: "px-4 py-3", "{sale.client_label()}" }
            td { class: "px-4 py-3", "{sale.items.len()}" }
            td { class: "px-4 py-3 text-right font-medium", "{format_brl(sale.total)}" }
            td { class: "px-4 py-3", "{status}" }
            td {
                class: "px-4 py-3",
                Badge { label: state.label().to_string(), class: state.badge_class().to_string() }
            }
            td {
                class: "px-4 py-3",
                div {
                    class: "flex justify-end gap-1",
                    button {
                        class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                        onclick: move |_| on_details.call(for_details.clone()),
                        "Ver"
                    }
                    if can_pay {
                        button {
                            class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                            onclick: move |_| on_payment.call(for_payment.clone()),
                            "Pagamento"
                        }
                    }
                    if can_cancel {
                        button {
                            class: "px-2 py-1 rounded-lg text-red-600 hover:bg-red-50 dark:hover:bg-red-950 transition",
                            onclick: move |_| on_cancel.call(for_cancel.clone()),
                            "Cancelar"
                        }
                    }
                }
            }
        }
    }
}
