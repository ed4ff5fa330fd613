use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::confirm_modal::ConfirmModal;
use crate::components::form_field::{FormAlert, INPUT_CLASS};
use crate::components::modal::Modal;
use crate::components::toast::notice;
use crate::context::use_app_context;
use crate::hooks::use_debounced;
use crate::services::barbers::{self, Barber};
use crate::services::clients::{self, Client};
use crate::services::products::{self, Product};
use crate::services::sales::{self, Sale};
use crate::stores::cart::Cart;
use crate::stores::settings_store;
use crate::utils::format::{format_brl, parse_decimal};

const MIN_SEARCH_LEN: usize = 2;

/// New-sale form: product search into the cart, optional client and
/// barber, global discount, tax and notes
#[component]
pub fn SaleModal(on_close: EventHandler<()>, on_saved: EventHandler<Sale>) -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut cart = use_signal(Cart::default);
    let mut discount = use_signal(String::new);
    let mut tax = use_signal(|| {
        let default_tax = settings_store::default_tax_percent();
        if default_tax > 0.0 {
            format!("{}", default_tax)
        } else {
            String::new()
        }
    });
    let mut notes = use_signal(String::new);

    let mut product_term = use_signal(String::new);
    let product_query = use_debounced(product_term, 300);
    let mut product_results = use_signal(Vec::<Product>::new);

    let mut client_term = use_signal(String::new);
    let client_query = use_debounced(client_term, 300);
    let mut client_results = use_signal(Vec::<Client>::new);
    let mut selected_client = use_signal(|| None::<Client>);

    let mut barber_list = use_signal(Vec::<Barber>::new);
    let mut barber_id = use_signal(|| None::<i64>);

    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut confirm_clear = use_signal(|| false);

    let api = app.api().clone();
    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            match barbers::list(&api).await {
                Ok(list) => barber_list.set(list.into_iter().filter(|b| b.available).collect()),
                Err(e) => log::warn!("Failed to load barbers for sale form: {}", e),
            }
        });
    });

    let api = app.api().clone();
    use_effect(move || {
        let term = product_query.read().trim().to_string();
        if term.chars().count() < MIN_SEARCH_LEN {
            product_results.set(Vec::new());
            return;
        }
        let api = api.clone();
        spawn(async move {
            match products::search(&api, &term).await {
                Ok(found) => product_results.set(found),
                Err(e) => log::warn!("Product search failed: {}", e),
            }
        });
    });

    let api = app.api().clone();
    use_effect(move || {
        let term = client_query.read().trim().to_string();
        if term.chars().count() < MIN_SEARCH_LEN {
            client_results.set(Vec::new());
            return;
        }
        let api = api.clone();
        spawn(async move {
            match clients::search(&api, &term).await {
                Ok(found) => client_results.set(found),
                Err(e) => log::warn!("Client search failed: {}", e),
            }
        });
    });

    let global_discount = parse_decimal(&discount.read()).unwrap_or(0.0);
    let tax_percent = parse_decimal(&tax.read()).unwrap_or(0.0);
    let totals = cart.read().totals(global_discount, tax_percent);
    let cart_empty = cart.read().is_empty();

    let submit_toast = toast.clone();
    let api = app.api().clone();
    let submit = move |_| {
        if *submitting.read() {
            return;
        }
        let client_id = selected_client.read().as_ref().map(|c| c.id);
        let Some(request) = cart.read().to_sale_request(
            client_id,
            *barber_id.read(),
            global_discount,
            tax_percent,
            &notes.read(),
        ) else {
            error.set(Some("Adicione ao menos um produto à venda.".to_string()));
            return;
        };

        submitting.set(true);
        error.set(None);
        let api = api.clone();
        let toast = submit_toast.clone();
        spawn(async move {
            match sales::create(&api, &request).await {
                Ok(sale) => {
                    log::info!("Sale {} created with {} item(s)", sale.id, request.itens.len());
                    cart.write().clear();
                    toast.success("Venda registrada".to_string(), notice(&format!("Venda #{} finalizada.", sale.id)));
                    on_saved.call(sale);
                }
                Err(e) => {
                    log::error!("Failed to create sale: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    let qty_toast = toast.clone();

    rsx! {
        Modal {
            title: "Nova venda".to_string(),
            wide: true,
            on_close: move |_| on_close.call(()),

            FormAlert { message: error.read().clone() }

            div {
                class: "grid gap-4 md:grid-cols-2 mb-4",

                // Client
                div {
                    class: "relative space-y-1",
                    label { class: "block text-sm font-medium", "Cliente" }
                    if let Some(client) = selected_client.read().clone() {
                        div {
                            class: "flex items-center justify-between px-3 py-2 border border-border rounded-lg",
                            span { "{client.name}" }
                            button {
                                class: "text-sm text-muted-foreground hover:underline",
                                onclick: move |_| selected_client.set(None),
                                "Remover"
                            }
                        }
                    } else {
                        input {
                            class: INPUT_CLASS,
                            placeholder: "Buscar cliente (opcional)",
                            value: "{client_term}",
                            oninput: move |e| client_term.set(e.value()),
                        }
                        if !client_results.read().is_empty() {
                            ul {
                                class: "absolute z-10 mt-1 w-full bg-card border border-border rounded-lg shadow-lg max-h-48 overflow-y-auto",
                                for client in client_results.read().iter().cloned() {
                                    li {
                                        key: "{client.id}",
                                        class: "px-3 py-2 hover:bg-accent cursor-pointer",
                                        onclick: {
                                            let client = client.clone();
                                            move |_| {
                                                selected_client.set(Some(client.clone()));
                                                client_term.set(String::new());
                                                client_results.set(Vec::new());
                                            }
                                        },
                                        div { class: "font-medium", "{client.name}" }
                                        div { class: "text-xs text-muted-foreground", "{client.phone_display()}" }
                                    }
                                }
                            }
                        }
                    }
                }

                // Barber
                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Barbeiro" }
                    select {
                        class: INPUT_CLASS,
                        onchange: move |e| barber_id.set(e.value().parse::<i64>().ok()),
                        option { value: "", "Nenhum" }
                        for barber in barber_list.read().iter() {
                            option {
                                key: "{barber.id}",
                                value: "{barber.id}",
                                selected: *barber_id.read() == Some(barber.id),
                                "{barber.display_name()}"
                            }
                        }
                    }
                }
            }

            // Product search
            div {
                class: "relative space-y-1 mb-4",
                label { class: "block text-sm font-medium", "Adicionar produto" }
                input {
                    class: INPUT_CLASS,
                    placeholder: "Buscar por nome ou código",
                    value: "{product_term}",
                    oninput: move |e| product_term.set(e.value()),
                }
                if !product_results.read().is_empty() {
                    ul {
                        class: "absolute z-10 mt-1 w-full bg-card border border-border rounded-lg shadow-lg max-h-56 overflow-y-auto",
                        for product in product_results.read().iter().cloned() {
                            li {
                                key: "{product.id}",
                                class: if product.stock > 0 {
                                    "px-3 py-2 hover:bg-accent cursor-pointer flex justify-between"
                                } else {
                                    "px-3 py-2 opacity-50 cursor-not-allowed flex justify-between"
                                },
                                onclick: {
                                    let toast = toast.clone();
                                    let product = product.clone();
                                    move |_| {
                                        if let Some(warning) = cart.write().add_product(&product) {
                                            toast.warning("Estoque".to_string(), notice(&warning.message()));
                                        }
                                        product_term.set(String::new());
                                        product_results.set(Vec::new());
                                    }
                                },
                                span { "{product.name}" }
                                span {
                                    class: "text-sm text-muted-foreground",
                                    "{format_brl(product.price)} · {product.stock} em estoque"
                                }
                            }
                        }
                    }
                }
            }

            // Cart
            if cart_empty {
                div {
                    class: "text-center py-8 border border-dashed border-border rounded-lg text-muted-foreground mb-4",
                    div { class: "text-4xl mb-2", "🛒" }
                    "Nenhum produto adicionado"
                }
            } else {
                div {
                    class: "overflow-x-auto mb-4",
                    table {
                        class: "w-full text-sm",
                        thead {
                            tr {
                                class: "text-left text-muted-foreground border-b border-border",
                                th { class: "py-2", "Produto" }
                                th { class: "py-2 w-32", "Qtd" }
                                th { class: "py-2 w-28", "Preço" }
                                th { class: "py-2 w-20", "Desc. %" }
                                th { class: "py-2 text-right", "Subtotal" }
                                th { class: "py-2 w-8" }
                            }
                        }
                        tbody {
                            for (index, line) in cart.read().lines().iter().cloned().enumerate() {
                                tr {
                                    key: "{line.product_id}",
                                    class: "border-b border-border",
                                    td {
                                        class: "py-2",
                                        div { "{line.name}" }
                                        div { class: "text-xs text-muted-foreground", "{line.stock_available} disponível(is)" }
                                    }
                                    td {
                                        class: "py-2",
                                        div {
                                            class: "flex items-center gap-1",
                                            button {
                                                class: "w-7 h-7 rounded border border-border hover:bg-accent",
                                                onclick: move |_| cart.write().decrement(index),
                                                "−"
                                            }
                                            input {
                                                class: "w-12 text-center bg-background border border-border rounded",
                                                r#type: "number",
                                                min: "1",
                                                max: "{line.stock_available}",
                                                value: "{line.quantity}",
                                                onchange: {
                                                    let toast = qty_toast.clone();
                                                    move |e: FormEvent| {
                                                        if let Some(warning) = cart.write().update_quantity(index, &e.value()) {
                                                            toast.warning("Estoque".to_string(), notice(&warning.message()));
                                                        }
                                                    }
                                                },
                                            }
                                            button {
                                                class: "w-7 h-7 rounded border border-border hover:bg-accent",
                                                onclick: {
                                                    let toast = qty_toast.clone();
                                                    move |_| {
                                                        if let Some(warning) = cart.write().increment(index) {
                                                            toast.warning("Estoque".to_string(), notice(&warning.message()));
                                                        }
                                                    }
                                                },
                                                "+"
                                            }
                                        }
                                    }
                                    td {
                                        class: "py-2",
                                        input {
                                            class: "w-24 bg-background border border-border rounded px-2",
                                            r#type: "number",
                                            step: "0.01",
                                            min: "0.01",
                                            value: "{line.unit_price:.2}",
                                            onchange: move |e| cart.write().update_unit_price(index, &e.value()),
                                        }
                                    }
                                    td {
                                        class: "py-2",
                                        input {
                                            class: "w-16 bg-background border border-border rounded px-2",
                                            r#type: "number",
                                            min: "0",
                                            max: "100",
                                            value: "{line.discount_percent}",
                                            onchange: move |e| cart.write().update_discount(index, &e.value()),
                                        }
                                    }
                                    td {
                                        class: "py-2 text-right font-medium",
                                        "{format_brl(line.subtotal())}"
                                    }
                                    td {
                                        class: "py-2 text-right",
                                        button {
                                            class: "text-red-600 hover:text-red-800",
                                            aria_label: "Remover item",
                                            onclick: move |_| cart.write().remove_line(index),
                                            "✕"
                                        }
                                    }
                                }
                            }
                        }
                    }
                    button {
                        class: "mt-2 text-sm text-muted-foreground hover:underline",
                        onclick: move |_| {
                            if cart.read().needs_clear_confirmation() {
                                confirm_clear.set(true);
                            }
                        },
                        "Limpar carrinho"
                    }
                }
            }

            div {
                class: "grid gap-4 md:grid-cols-2",

                div {
                    class: "space-y-3",
                    div {
                        class: "grid grid-cols-2 gap-3",
                        div {
                            class: "space-y-1",
                            label { class: "block text-sm font-medium", "Desconto (R$)" }
                            input {
                                class: INPUT_CLASS,
                                r#type: "number",
                                min: "0",
                                step: "0.01",
                                value: "{discount}",
                                oninput: move |e| discount.set(e.value()),
                            }
                        }
                        div {
                            class: "space-y-1",
                            label { class: "block text-sm font-medium", "Imposto (%)" }
                            input {
                                class: INPUT_CLASS,
                                r#type: "number",
                                min: "0",
                                max: "100",
                                step: "0.1",
                                value: "{tax}",
                                oninput: move |e| tax.set(e.value()),
                            }
                        }
                    }
                    div {
                        class: "space-y-1",
                        label { class: "block text-sm font-medium", "Observações" }
                        textarea {
                            class: INPUT_CLASS,
                            rows: "2",
                            value: "{notes}",
                            oninput: move |e| notes.set(e.value()),
                        }
                    }
                }

                div {
                    class: "bg-muted/40 rounded-lg p-4 space-y-1 text-sm",
                    div {
                        class: "flex justify-between",
                        span { "Subtotal ({cart.read().item_count()} itens)" }
                        span { "{format_brl(totals.subtotal)}" }
                    }
                    div {
                        class: "flex justify-between text-muted-foreground",
                        span { "Desconto ({totals.discount_share_percent}%)" }
                        span { "- {format_brl(totals.discount)}" }
                    }
                    div {
                        class: "flex justify-between text-muted-foreground",
                        span { "Impostos" }
                        span { "{format_brl(totals.tax)}" }
                    }
                    div {
                        class: "flex justify-between text-lg font-bold pt-2 border-t border-border",
                        span { "Total" }
                        span { "{format_brl(totals.total)}" }
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
                    disabled: cart_empty || *submitting.read(),
                    onclick: submit,
                    if *submitting.read() { "Salvando..." } else { "Finalizar venda" }
                }
            }
        }

        if *confirm_clear.read() {
            ConfirmModal {
                title: "Limpar carrinho".to_string(),
                message: "Remover todos os itens da venda?".to_string(),
                confirm_text: Some("Limpar".to_string()),
                on_confirm: move |_| {
                    cart.write().clear();
                    confirm_clear.set(false);
                },
                on_cancel: move |_| confirm_clear.set(false),
            }
        }
    }
}
