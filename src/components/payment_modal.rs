use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::form_field::{FormAlert, TextField, INPUT_CLASS};
use crate::components::modal::Modal;
use crate::components::toast::notice;
use crate::context::use_app_context;
use crate::services::sales::{self, PaymentMethod, PaymentRequest, Sale};
use crate::utils::format::{format_brl, parse_decimal};
use crate::utils::validation::FormErrors;

#[component]
pub fn PaymentModal(sale: Sale, on_close: EventHandler<()>, on_paid: EventHandler<()>) -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let outstanding = sale.outstanding();
    let sale_id = sale.id;

    let mut amount = use_signal(|| format!("{:.2}", outstanding));
    let mut method = use_signal(|| PaymentMethod::Dinheiro);
    let mut errors = use_signal(FormErrors::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let api = app.api().clone();
    let submit = move |_| {
        if *submitting.read() {
            return;
        }
        let request = PaymentRequest {
            amount: parse_decimal(&amount.read()).unwrap_or(0.0),
            method: *method.read(),
        };
        if let Err(found) = request.validate(outstanding) {
            errors.set(found);
            return;
        }
        errors.set(FormErrors::new());
        error.set(None);
        submitting.set(true);

        let api = api.clone();
        let toast = toast.clone();
        spawn(async move {
            match sales::register_payment(&api, sale_id, &request).await {
                Ok(_) => {
                    log::info!("Payment of {:.2} registered for sale {}", request.amount, sale_id);
                    toast.success("Pagamento registrado".to_string(), notice(&format_brl(request.amount)));
                    on_paid.call(());
                }
                Err(e) => {
                    log::error!("Failed to register payment for sale {}: {}", sale_id, e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        Modal {
            title: format!("Registrar pagamento · Venda #{}", sale.id),
            on_close: move |_| on_close.call(()),

            FormAlert { message: error.read().clone() }

            div {
                class: "grid grid-cols-3 gap-2 mb-4 text-sm",
                div {
                    p { class: "text-muted-foreground", "Total" }
                    p { class: "font-semibold", "{format_brl(sale.total)}" }
                }
                div {
                    p { class: "text-muted-foreground", "Pago" }
                    p { class: "font-semibold", "{format_brl(sale.paid_amount())}" }
                }
                div {
                    p { class: "text-muted-foreground", "Restante" }
                    p { class: "font-semibold text-red-600", "{format_brl(outstanding)}" }
                }
            }

            div {
                class: "space-y-4",
                TextField {
                    label: "Valor".to_string(),
                    name: "valor".to_string(),
                    input_type: "number".to_string(),
                    value: amount.read().clone(),
                    error: errors.read().get("valor").map(str::to_string),
                    required: true,
                    on_input: move |v| amount.set(v),
                }
                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Forma de pagamento" }
                    select {
                        class: INPUT_CLASS,
                        onchange: move |e| {
                            if let Some(m) = PaymentMethod::from_str(&e.value()) {
                                method.set(m);
                            }
                        },
                        for m in PaymentMethod::ALL {
                            option {
                                key: "{m.as_str()}",
                                value: "{m.as_str()}",
                                selected: *method.read() == m,
                                "{m.label()}"
                            }
                        }
                    }
                }
            }

            div {
                class: "flex gap-3 justify-end mt-6",
                button {
                    class: "px-4 py-2 rounded-lg hover:bg-accent transition",
                    onclick: move |_| on_close.call(()),
                    "Cancelar"
                }
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition disabled:opacity-50",
                    disabled: *submitting.read(),
                    onclick: submit,
                    "Registrar"
                }
            }
        }
    }
}
