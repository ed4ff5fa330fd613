use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::toast::notice;
use crate::components::{BarList, ErrorBanner, ListSkeleton, PageHeader, StatCard};
use crate::context::use_app_context;
use crate::services::sales::{self, method_label, PaymentSplit, RevenueSeries, SalesSummary};
use crate::utils::data_state::DataState;
use crate::utils::format::{format_brl, format_percent};
use crate::utils::print;
use crate::utils::time::now_local;

const PERIODS: [u32; 4] = [7, 30, 90, 365];

fn period_label(days: u32) -> String {
    match days {
        365 => "Último ano".to_string(),
        d => format!("Últimos {} dias", d),
    }
}

#[component]
pub fn Reports() -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut period = use_signal(|| 30u32);
    let mut series = use_signal(|| DataState::<RevenueSeries>::Pending);
    let mut summary = use_signal(SalesSummary::default);
    let mut split = use_signal(PaymentSplit::default);
    let mut reload = use_signal(|| 0u32);

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let days = period();
        let api = api.clone();
        series.set(DataState::Loading);
        spawn(async move {
            log::debug!("Loading revenue for {} days", days);
            series.set(sales::revenue_chart(&api, days).await.into());
        });
    });

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let api = api.clone();
        spawn(async move {
            match sales::summary(&api).await {
                Ok(s) => summary.set(s),
                Err(e) => log::warn!("Failed to load sales summary: {}", e),
            }
            match sales::payment_split(&api).await {
                Ok(s) => split.set(s),
                Err(e) => log::warn!("Failed to load payment split: {}", e),
            }
        });
    });

    let split_rows: Vec<(String, f64)> = split
        .read()
        .valores
        .iter()
        .map(|(method, value)| (method_label(Some(method)).to_string(), *value))
        .collect();
    let split_shares: Vec<(String, f64)> = split
        .read()
        .percentuais
        .iter()
        .map(|(method, share)| (method_label(Some(method)).to_string(), *share))
        .collect();

    let print_report = move |_| {
        let Some(data) = series.read().data().cloned() else {
            return;
        };
        let s = summary.read().clone();
        let summary_rows = [
            ("Total no período", format_brl(data.total())),
            ("Maior faturamento diário", format_brl(data.max())),
            ("Vendas no mês", format!("{} ({})", s.mes.total, format_brl(s.mes.valor))),
            ("Ticket médio", format_brl(s.ticket_medio)),
        ];
        let html = print::revenue_report_html(&period_label(period()), &data.points(), &summary_rows, now_local());
        if let Err(e) = print::open_document(&html) {
            toast.warning("Impressão".to_string(), notice(&e));
        }
    };

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "📈 Relatórios".to_string(),
                subtitle: Some(period_label(period())),
                div {
                    class: "flex rounded-lg border border-border overflow-hidden",
                    for days in PERIODS {
                        button {
                            key: "{days}",
                            class: if period() == days { "px-3 py-2 text-sm bg-primary text-primary-foreground" } else { "px-3 py-2 text-sm hover:bg-accent" },
                            onclick: move |_| period.set(days),
                            if days == 365 { "1 ano" } else { "{days} dias" }
                        }
                    }
                }
                button {
                    class: "px-4 py-2 rounded-lg border border-border hover:bg-accent transition disabled:opacity-50",
                    disabled: series.read().data().is_none(),
                    onclick: print_report,
                    "🖨️ Imprimir"
                }
            }

            div {
                class: "p-4 space-y-6",

                match &*series.read() {
                    DataState::Loaded(data) => rsx! {
                        div {
                            class: "grid gap-4 sm:grid-cols-2 xl:grid-cols-4",
                            StatCard { icon: "💰", label: "Faturamento no período".to_string(), value: format_brl(data.total()) }
                            StatCard { icon: "🏆", label: "Melhor dia".to_string(), value: format_brl(data.max()) }
                            StatCard {
                                icon: "🎯",
                                label: "Ticket médio".to_string(),
                                value: format_brl(summary.read().ticket_medio),
                                detail: Some(format!("{} vs. mês anterior", format_percent(summary.read().ticket_variacao))),
                            }
                            StatCard {
                                icon: "🧾",
                                label: "Vendas no mês".to_string(),
                                value: summary.read().mes.total.to_string(),
                                detail: Some(format_brl(summary.read().mes.valor)),
                            }
                        }
                        section {
                            class: "bg-card border border-border rounded-xl p-4",
                            h3 { class: "font-semibold mb-3", "Faturamento por dia" }
                            BarList { rows: data.points() }
                        }
                    },
                    DataState::Error(msg) => rsx! {
                        ErrorBanner {
                            message: msg.clone(),
                            on_retry: move |_| *reload.write() += 1,
                        }
                    },
                    _ => rsx! { ListSkeleton { rows: 4 } },
                }

                div {
                    class: "grid gap-6 xl:grid-cols-2",
                    section {
                        class: "bg-card border border-border rounded-xl p-4",
                        h3 { class: "font-semibold mb-3", "Recebido por forma de pagamento" }
                        BarList { rows: split_rows, color: "bg-emerald-500".to_string() }
                    }
                    section {
                        class: "bg-card border border-border rounded-xl p-4",
                        h3 { class: "font-semibold mb-3", "Participação (%)" }
                        BarList { rows: split_shares, currency: false, color: "bg-violet-500".to_string() }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_labels() {
        assert_eq!(period_label(7), "Últimos 7 dias");
        assert_eq!(period_label(365), "Último ano");
    }
}
