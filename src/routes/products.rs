use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::icons::PlusIcon;
use crate::components::toast::notice;
use crate::components::{
    Badge, ConfirmModal, EmptyState, ErrorBanner, FormAlert, ListSkeleton, Modal, PageHeader,
    Pagination, TextField, INPUT_CLASS,
};
use crate::context::use_app_context;
use crate::hooks::use_debounced;
use crate::services::page::{ListQuery, Page};
use crate::services::products::{self, Product, ProductForm, StockMovement, StockMovementKind};
use crate::utils::data_state::{DataState, ListView};
use crate::utils::format::{format_brl, format_percent};
use crate::utils::validation::FormErrors;

const LOW_STOCK_LIMIT: u32 = 100;

#[derive(Clone, PartialEq)]
enum ProductDialog {
    Form(Option<Product>),
    Stock(Product),
    Delete(Product),
}

fn stock_badge(product: &Product) -> &'static str {
    if product.stock <= 0 {
        "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-200"
    } else if product.is_low_stock() {
        "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-200"
    } else {
        "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-200"
    }
}

#[component]
pub fn Products() -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut list = use_signal(|| DataState::<Page<Product>>::Pending);
    let mut page = use_signal(|| 1u32);
    let mut search = use_signal(String::new);
    let search_query = use_debounced(search, 300);
    let mut last_search = use_signal(String::new);
    let mut low_only = use_signal(|| false);
    let mut dialog = use_signal(|| None::<ProductDialog>);
    let mut deleting = use_signal(|| false);
    let mut reload = use_signal(|| 0u32);

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let term = search_query();
        let current = page();
        let low = low_only();
        if *last_search.peek() != term {
            last_search.set(term.clone());
            if current != 1 {
                page.set(1);
                return;
            }
        }
        let api = api.clone();
        list.set(DataState::Loading);
        spawn(async move {
            if low {
                // The low-stock endpoint is unpaged; wrap it so the table code is shared
                let result = products::low_stock(&api, LOW_STOCK_LIMIT).await.map(|items| Page {
                    total: items.len() as u32,
                    pages: 1,
                    current: 1,
                    per_page: items.len() as u32,
                    items,
                });
                list.set(result.into());
            } else {
                let query = ListQuery {
                    search: term,
                    page: current,
                    ..ListQuery::default()
                };
                list.set(products::list(&api, &query).await.into());
            }
        });
    });

    let api = app.api().clone();
    let confirm_delete = move |_| {
        let Some(ProductDialog::Delete(product)) = dialog.read().clone() else {
            return;
        };
        let api = api.clone();
        let toast = toast.clone();
        deleting.set(true);
        spawn(async move {
            match products::delete(&api, product.id).await {
                Ok(_) => {
                    log::info!("Product {} deleted", product.id);
                    toast.success("Produto excluído".to_string(), notice(&product.name));
                    dialog.set(None);
                    *reload.write() += 1;
                }
                Err(e) => {
                    log::error!("Failed to delete product {}: {}", product.id, e);
                    toast.error("Erro ao excluir".to_string(), notice(&e.to_string()));
                }
            }
            deleting.set(false);
        });
    };

    let filtered = low_only() || !search_query.read().trim().is_empty();
    let view = list.read().list_view(|p| p.len(), filtered);
    let rows = list.read().data().map(|p| p.items.clone()).unwrap_or_default();

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "📦 Produtos".to_string(),
                subtitle: list.read().data().map(|p| p.range_label()),
                input {
                    class: "{INPUT_CLASS} w-64",
                    placeholder: "Buscar produtos...",
                    disabled: low_only(),
                    value: "{search}",
                    oninput: move |e| search.set(e.value()),
                }
                label {
                    class: "flex items-center gap-2 text-sm",
                    input {
                        r#type: "checkbox",
                        checked: low_only(),
                        onchange: move |e| low_only.set(e.checked()),
                    }
                    "Somente estoque baixo"
                }
                button {
                    class: "flex items-center gap-2 px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: move |_| dialog.set(Some(ProductDialog::Form(None))),
                    PlusIcon { class: "w-4 h-4" }
                    "Novo produto"
                }
            }

            div {
                class: "p-4",
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
                            icon: "📦",
                            title: "Nenhum produto cadastrado".to_string(),
                        }
                    },
                    ListView::NoResults => rsx! {
                        EmptyState {
                            icon: (if low_only() { "👍" } else { "🔍" }),
                            title: if low_only() { "Nenhum produto com estoque baixo".to_string() } else { "Nenhum produto encontrado".to_string() },
                            on_clear: move |_| {
                                search.set(String::new());
                                low_only.set(false);
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
                                        th { class: "px-4 py-3", "Código" }
                                        th { class: "px-4 py-3", "Produto" }
                                        th { class: "px-4 py-3", "Categoria" }
                                        th { class: "px-4 py-3 text-right", "Preço" }
                                        th { class: "px-4 py-3 text-right", "Margem" }
                                        th { class: "px-4 py-3 text-right", "Estoque" }
                                        th { class: "px-4 py-3 text-right", "Ações" }
                                    }
                                }
                                tbody {
                                    for product in rows {
                                        tr {
                                            key: "{product.id}",
                                            class: "border-b border-border last:border-b-0 hover:bg-accent/50",
                                            td { class: "px-4 py-3 font-mono text-xs", {product.code.clone().unwrap_or_else(|| "-".to_string())} }
                                            td {
                                                class: "px-4 py-3",
                                                p { class: "font-medium", "{product.name}" }
                                                if let Some(brand) = product.brand.as_ref() {
                                                    p { class: "text-xs text-muted-foreground", "{brand}" }
                                                }
                                            }
                                            td { class: "px-4 py-3", {product.category.clone().unwrap_or_else(|| "-".to_string())} }
                                            td { class: "px-4 py-3 text-right", "{format_brl(product.price)}" }
                                            td {
                                                class: "px-4 py-3 text-right text-muted-foreground",
                                                {product.margin_percent().map(format_percent).unwrap_or_else(|| "-".to_string())}
                                            }
                                            td {
                                                class: "px-4 py-3 text-right",
                                                span { class: "mr-2", "{product.stock} {product.unit.clone().unwrap_or_default()}" }
                                                Badge { label: product.stock_label().to_string(), class: stock_badge(&product).to_string() }
                                            }
                                            td {
                                                class: "px-4 py-3",
                                                div {
                                                    class: "flex justify-end gap-1",
                                                    button {
                                                        class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                                                        onclick: {
                                                            let product = product.clone();
                                                            move |_| dialog.set(Some(ProductDialog::Stock(product.clone())))
                                                        },
                                                        "Estoque"
                                                    }
                                                    button {
                                                        class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                                                        onclick: {
                                                            let product = product.clone();
                                                            move |_| dialog.set(Some(ProductDialog::Form(Some(product.clone()))))
                                                        },
                                                        "Editar"
                                                    }
                                                    button {
                                                        class: "px-2 py-1 rounded-lg text-red-600 hover:bg-red-50 dark:hover:bg-red-950 transition",
                                                        onclick: {
                                                            let product = product.clone();
                                                            move |_| dialog.set(Some(ProductDialog::Delete(product.clone())))
                                                        },
                                                        "Excluir"
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        if let Some(p) = list.read().data() {
                            Pagination {
                                current: p.current,
                                total: p.pages,
                                on_change: move |n| page.set(n),
                            }
                        }
                    },
                }
            }

            match dialog.read().clone() {
                Some(ProductDialog::Form(product)) => rsx! {
                    ProductFormModal {
                        product,
                        on_close: move |_| dialog.set(None),
                        on_saved: move |_| {
                            dialog.set(None);
                            *reload.write() += 1;
                        },
                    }
                },
                Some(ProductDialog::Stock(product)) => rsx! {
                    StockModal {
                        product,
                        on_close: move |_| dialog.set(None),
                        on_saved: move |_| {
                            dialog.set(None);
                            *reload.write() += 1;
                        },
                    }
                },
                Some(ProductDialog::Delete(product)) => rsx! {
                    ConfirmModal {
                        title: "Excluir produto".to_string(),
                        message: format!("Excluir {}? Esta ação não pode ser desfeita.", product.name),
                        confirm_text: Some("Excluir".to_string()),
                        busy: *deleting.read(),
                        on_confirm: confirm_delete,
                        on_cancel: move |_| dialog.set(None),
                    }
                },
                None => rsx! {},
            }
        }
    }
}

#[component]
fn ProductFormModal(product: Option<Product>, on_close: EventHandler<()>, on_saved: EventHandler<Product>) -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let editing_id = product.as_ref().map(|p| p.id);
    let initial = product.as_ref().map(ProductForm::from_product).unwrap_or_default();

    let mut form = use_signal(move || initial);
    let mut errors = use_signal(FormErrors::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let api = app.api().clone();
    let submit = move |_| {
        let payload = match form.read().validate() {
            Ok(payload) => payload,
            Err(found) => {
                errors.set(found);
                return;
            }
        };
        errors.set(FormErrors::new());
        error.set(None);
        submitting.set(true);

        let api = api.clone();
        let toast = toast.clone();
        spawn(async move {
            let result = match editing_id {
                Some(id) => products::update(&api, id, &payload).await,
                None => products::create(&api, &payload).await,
            };
            match result {
                Ok(saved) => {
                    log::info!("Product {} saved", saved.id);
                    toast.success("Produto salvo".to_string(), notice(&saved.name));
                    on_saved.call(saved);
                }
                Err(e) => {
                    log::error!("Failed to save product: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    let field_error = move |name: &str| errors.read().get(name).map(str::to_string);

    rsx! {
        Modal {
            title: if editing_id.is_some() { "Editar produto".to_string() } else { "Novo produto".to_string() },
            wide: true,
            on_close: move |_| on_close.call(()),

            FormAlert { message: error.read().clone() }

            div {
                class: "grid sm:grid-cols-2 gap-4",
                TextField {
                    label: "Código".to_string(),
                    name: "codigo".to_string(),
                    value: form.read().code.clone(),
                    error: field_error("codigo"),
                    on_input: move |v| form.write().code = v,
                }
                TextField {
                    label: "Nome".to_string(),
                    name: "nome".to_string(),
                    value: form.read().name.clone(),
                    error: field_error("nome"),
                    required: true,
                    on_input: move |v| form.write().name = v,
                }
                TextField {
                    label: "Categoria".to_string(),
                    name: "categoria".to_string(),
                    value: form.read().category.clone(),
                    error: field_error("categoria"),
                    on_input: move |v| form.write().category = v,
                }
                TextField {
                    label: "Marca".to_string(),
                    name: "marca".to_string(),
                    value: form.read().brand.clone(),
                    error: field_error("marca"),
                    on_input: move |v| form.write().brand = v,
                }
                TextField {
                    label: "Unidade".to_string(),
                    name: "unidade".to_string(),
                    placeholder: "un".to_string(),
                    value: form.read().unit.clone(),
                    error: field_error("unidade"),
                    on_input: move |v| form.write().unit = v,
                }
                TextField {
                    label: "Preço de venda (R$)".to_string(),
                    name: "preco".to_string(),
                    input_type: "text".to_string(),
                    placeholder: "0,00".to_string(),
                    value: form.read().price.clone(),
                    error: field_error("preco"),
                    required: true,
                    on_input: move |v| form.write().price = v,
                }
                TextField {
                    label: "Preço de custo (R$)".to_string(),
                    name: "preco_custo".to_string(),
                    placeholder: "0,00".to_string(),
                    value: form.read().cost_price.clone(),
                    error: field_error("preco_custo"),
                    on_input: move |v| form.write().cost_price = v,
                }
                TextField {
                    label: "Estoque".to_string(),
                    name: "estoque".to_string(),
                    input_type: "number".to_string(),
                    value: form.read().stock.clone(),
                    error: field_error("estoque"),
                    disabled: editing_id.is_some(),
                    on_input: move |v| form.write().stock = v,
                }
                TextField {
                    label: "Estoque mínimo".to_string(),
                    name: "estoque_minimo".to_string(),
                    input_type: "number".to_string(),
                    value: form.read().min_stock.clone(),
                    error: field_error("estoque_minimo"),
                    on_input: move |v| form.write().min_stock = v,
                }
            }
            div {
                class: "space-y-1 mt-4",
                label { class: "block text-sm font-medium", "Descrição" }
                textarea {
                    class: INPUT_CLASS,
                    rows: "3",
                    value: "{form.read().description}",
                    oninput: move |e| form.write().description = e.value(),
                }
            }
            if editing_id.is_some() {
                p {
                    class: "text-xs text-muted-foreground mt-2",
                    "Para alterar o estoque use a ação \"Estoque\" na lista."
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
                    if *submitting.read() { "Salvando..." } else { "Salvar" }
                }
            }
        }
    }
}

#[component]
fn StockModal(product: Product, on_close: EventHandler<()>, on_saved: EventHandler<Product>) -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut kind = use_signal(|| StockMovementKind::Entrada);
    let mut quantity = use_signal(String::new);
    let mut reason = use_signal(String::new);
    let mut errors = use_signal(FormErrors::new);
    let mut submitting = use_signal(|| false);

    let current = product.stock;
    let parsed = quantity.read().trim().parse::<u32>().unwrap_or(0);
    let preview = kind().apply(current, i64::from(parsed));

    let api = app.api().clone();
    let product_id = product.id;
    let product_name = product.name.clone();
    let submit = move |_| {
        let movement = StockMovement {
            tipo: kind(),
            quantity: quantity.read().trim().parse::<u32>().unwrap_or(0),
            reason: Some(reason.read().trim().to_string()).filter(|r| !r.is_empty()),
        };
        if let Err(found) = movement.validate(current) {
            errors.set(found);
            return;
        }
        errors.set(FormErrors::new());
        submitting.set(true);

        let api = api.clone();
        let toast = toast.clone();
        let product_name = product_name.clone();
        spawn(async move {
            match products::adjust_stock(&api, product_id, &movement).await {
                Ok(updated) => {
                    log::info!("Stock of product {} is now {}", updated.id, updated.stock);
                    toast.success("Estoque atualizado".to_string(), notice(&product_name));
                    on_saved.call(updated);
                }
                Err(e) => {
                    log::error!("Stock movement failed: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    toast.error("Erro".to_string(), notice(&e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        Modal {
            title: format!("Estoque · {}", product.name),
            on_close: move |_| on_close.call(()),

            div {
                class: "space-y-4",
                p { class: "text-sm text-muted-foreground", "Estoque atual: {current} · mínimo {product.min_stock}" }
                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Movimento" }
                    select {
                        class: INPUT_CLASS,
                        onchange: move |e| kind.set(StockMovementKind::from_str(&e.value())),
                        for k in StockMovementKind::ALL {
                            option {
                                key: "{k.as_str()}",
                                value: k.as_str(),
                                selected: kind() == k,
                                "{k.label()}"
                            }
                        }
                    }
                }
                TextField {
                    label: "Quantidade".to_string(),
                    name: "quantidade".to_string(),
                    input_type: "number".to_string(),
                    value: quantity.read().clone(),
                    error: errors.read().get("quantidade").map(str::to_string),
                    required: true,
                    on_input: move |v| quantity.set(v),
                }
                TextField {
                    label: "Motivo".to_string(),
                    name: "motivo".to_string(),
                    value: reason.read().clone(),
                    on_input: move |v| reason.set(v),
                }
                p {
                    class: "text-sm",
                    "Estoque após o movimento: "
                    span { class: "font-semibold", "{preview}" }
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
