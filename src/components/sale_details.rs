use dioxus::prelude::*;

use crate::components::modal::Modal;
use crate::components::states::Badge;
use crate::services::sales::{method_label, Sale};
use crate::utils::format::{capitalize, format_brl};
use crate::utils::time::display_datetime;

/// Read-only view of a sale with its items and payments
#[component]
pub fn SaleDetails(sale: Sale, on_close: EventHandler<()>, on_print: EventHandler<Sale>) -> Element {
    let state = sale.payment_state();
    let created = sale.created_at.as_deref().map(display_datetime).unwrap_or_default();
    let printable = sale.clone();

    rsx! {
        Modal {
            title: format!("Venda #{}", sale.id),
            wide: true,
            on_close: move |_| on_close.call(()),

            div {
                class: "grid gap-2 sm:grid-cols-2 text-sm mb-4",
                p { span { class: "text-muted-foreground", "Data: " } "{created}" }
                p { span { class: "text-muted-foreground", "Cliente: " } "{sale.client_label()}" }
                if let Some(barber) = &sale.barber_name {
                    p { span { class: "text-muted-foreground", "Barbeiro: " } "{barber}" }
                }
                p {
                    span { class: "text-muted-foreground", "Status: " }
                    "{capitalize(sale.status.as_deref().unwrap_or(\"-\"))} "
                    Badge { label: state.label().to_string(), class: state.badge_class().to_string() }
                }
            }

            table {
                class: "w-full text-sm mb-4",
                thead {
                    tr {
                        class: "text-left text-muted-foreground border-b border-border",
                        th { class: "py-2", "Produto" }
                        th { class: "py-2", "Qtd" }
                        th { class: "py-2 text-right", "Unitário" }
                        th { class: "py-2 text-right", "Desc." }
                        th { class: "py-2 text-right", "Total" }
                    }
                }
                tbody {
                    for (i, item) in sale.items.iter().enumerate() {
                        tr {
                            key: "{i}",
                            class: "border-b border-border",
                            td {
                                class: "py-2",
                                {item.product_name.clone().unwrap_or_else(|| format!("Produto #{}", item.produto_id))}
                            }
                            td { class: "py-2", "{item.quantity}" }
                            td { class: "py-2 text-right", "{format_brl(item.unit_price)}" }
                            td { class: "py-2 text-right", "{item.discount_percent}%" }
                            td { class: "py-2 text-right", "{format_brl(item.total)}" }
                        }
                    }
                }
            }

            div {
                class: "grid gap-4 sm:grid-cols-2",
                div {
                    h4 { class: "font-semibold mb-2", "Pagamentos" }
                    if sale.payments.is_empty() {
                        p { class: "text-sm text-muted-foreground", "Nenhum pagamento registrado." }
                    } else {
                        ul {
                            class: "text-sm space-y-1",
                            for (i, payment) in sale.payments.iter().enumerate() {
                                li {
                                    key: "{i}",
                                    class: "flex justify-between",
                                    span { "{method_label(payment.method.as_deref())}" }
                                    span { "{format_brl(payment.amount)}" }
                                }
                            }
                        }
                    }
                }
                div {
                    class: "bg-muted/40 rounded-lg p-4 space-y-1 text-sm",
                    div { class: "flex justify-between", span { "Subtotal" } span { "{format_brl(sale.subtotal)}" } }
                    div { class: "flex justify-between", span { "Desconto" } span { "- {format_brl(sale.discount)}" } }
                    div { class: "flex justify-between", span { "Impostos" } span { "{format_brl(sale.tax)}" } }
                    div {
                        class: "flex justify-between font-bold pt-2 border-t border-border",
                        span { "Total" }
                        span { "{format_brl(sale.total)}" }
                    }
                    div { class: "flex justify-between text-muted-foreground", span { "Restante" } span { "{format_brl(sale.outstanding())}" } }
                }
            }

            if let Some(notes) = sale.notes.as_ref().filter(|n| !n.trim().is_empty()) {
                p {
                    class: "mt-4 text-sm",
                    span { class: "text-muted-foreground", "Observações: " }
                    "{notes}"
                }
            }

            div {
                class: "flex justify-end mt-6",
                button {
                    class: "px-4 py-2 rounded-lg border border-border hover:bg-accent transition",
                    onclick: move |_| on_print.call(printable.clone()),
                    "🖨️ Imprimir comprovante"
                }
            }
        }
    }
}
