use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::icons::PlusIcon;
use crate::components::toast::notice;
use crate::components::{
    Badge, ConfirmModal, EmptyState, ErrorBanner, FormAlert, ListSkeleton, Modal, PageHeader,
    TextField, INPUT_CLASS,
};
use crate::context::use_app_context;
use crate::services::catalog::{self, Service, ServiceForm};
use crate::stores::category_store::{self, CUSTOM_CATEGORIES};
use crate::utils::data_state::{DataState, ListView};
use crate::utils::format::{format_brl, format_duration};
use crate::utils::validation::FormErrors;

/// Loaded catalog plus whether it came from the local cache
#[derive(Debug, Clone, PartialEq)]
struct Catalog {
    services: Vec<Service>,
    stale: bool,
}

#[derive(Clone, PartialEq)]
enum ServiceDialog {
    Form(Option<Service>),
    Delete(Service),
}

#[component]
pub fn Services() -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut state = use_signal(|| DataState::<Catalog>::Pending);
    let mut category = use_signal(|| None::<String>);
    let mut dialog = use_signal(|| None::<ServiceDialog>);
    let mut deleting = use_signal(|| false);
    let mut new_category = use_signal(String::new);
    let mut reload = use_signal(|| 0u32);

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let api = api.clone();
        state.set(DataState::Loading);
        spawn(async move {
            match catalog::list(&api).await {
                Ok(services) => {
                    category_store::cache_services(&services);
                    state.set(DataState::Loaded(Catalog { services, stale: false }));
                }
                Err(e) => {
                    log::warn!("Failed to load services, trying cache: {}", e);
                    match category_store::cached_services() {
                        Some(services) => state.set(DataState::Loaded(Catalog { services, stale: true })),
                        None => state.set(DataState::Error(e.to_string())),
                    }
                }
            }
        });
    });

    let api = app.api().clone();
    let delete_toast = toast.clone();
    let confirm_delete = move |_| {
        let Some(ServiceDialog::Delete(service)) = dialog.read().clone() else {
            return;
        };
        let api = api.clone();
        let toast = delete_toast.clone();
        deleting.set(true);
        spawn(async move {
            match catalog::delete(&api, service.id).await {
                Ok(_) => {
                    log::info!("Service {} deleted", service.id);
                    toast.success("Serviço excluído".to_string(), notice(service.display_name()));
                    dialog.set(None);
                    *reload.write() += 1;
                }
                Err(e) => {
                    log::error!("Failed to delete service {}: {}", service.id, e);
                    toast.error("Erro ao excluir".to_string(), notice(&e.to_string()));
                }
            }
            deleting.set(false);
        });
    };

    let create_category = move |_| {
        let name = new_category.read().clone();
        match category_store::add_category(&name) {
            Some(added) => {
                toast.success("Categoria criada".to_string(), notice(&added));
                new_category.set(String::new());
            }
            None => {
                toast.warning(
                    "Categoria inválida".to_string(),
                    notice("Informe um nome novo, sem \":\"."),
                );
            }
        }
    };

    let services = state
        .read()
        .data()
        .map(|c| c.services.clone())
        .unwrap_or_default();
    let categories = category_store::all_categories(&CUSTOM_CATEGORIES.read(), &services);
    let selected = category.read().clone();
    let visible: Vec<Service> = catalog::filter_by_category(&services, selected.as_deref())
        .into_iter()
        .cloned()
        .collect();
    let stale = state.read().data().map_or(false, |c| c.stale);
    let view = state
        .read()
        .clone()
        .map(|_| visible.clone())
        .list_view(|v| v.len(), selected.is_some());

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "✂️ Serviços".to_string(),
                subtitle: Some(format!("{} serviços", services.len())),
                select {
                    class: "{INPUT_CLASS} w-48",
                    onchange: move |e| {
                        let value = e.value();
                        category.set((!value.is_empty()).then_some(value));
                    },
                    option { value: "", selected: selected.is_none(), "Todas as categorias" }
                    for c in categories.iter() {
                        option {
                            key: "{c}",
                            value: "{c}",
                            selected: selected.as_deref() == Some(c.as_str()),
                            "{c}"
                        }
                    }
                }
                button {
                    class: "flex items-center gap-2 px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: move |_| dialog.set(Some(ServiceDialog::Form(None))),
                    PlusIcon { class: "w-4 h-4" }
                    "Novo serviço"
                }
            }

            div {
                class: "p-4 space-y-4",

                if stale {
                    div {
                        class: "p-4 bg-yellow-100 dark:bg-yellow-900 text-yellow-800 dark:text-yellow-200 rounded-lg flex items-center justify-between",
                        span { "⚠️ Sem conexão com o servidor. Exibindo a última lista salva." }
                        button {
                            class: "px-3 py-1 rounded-lg bg-yellow-200 dark:bg-yellow-800 hover:opacity-80",
                            onclick: move |_| *reload.write() += 1,
                            "Tentar novamente"
                        }
                    }
                }

                div {
                    class: "flex flex-wrap items-center gap-2",
                    for c in categories.iter().cloned() {
                        button {
                            key: "{c}",
                            class: if selected.as_deref() == Some(c.as_str()) {
                                "px-3 py-1 rounded-full text-sm bg-primary text-primary-foreground"
                            } else {
                                "px-3 py-1 rounded-full text-sm bg-muted hover:bg-accent"
                            },
                            onclick: {
                                let c = c.clone();
                                move |_| {
                                    let same = category.read().as_deref() == Some(c.as_str());
                                    category.set(if same { None } else { Some(c.clone()) });
                                }
                            },
                            "{c}"
                        }
                    }
                    input {
                        class: "{INPUT_CLASS} w-40",
                        placeholder: "Nova categoria",
                        value: "{new_category}",
                        oninput: move |e| new_category.set(e.value()),
                    }
                    button {
                        class: "px-3 py-1 rounded-lg border border-border text-sm hover:bg-accent",
                        onclick: create_category,
                        "Adicionar"
                    }
                }

                match view {
                    ListView::Loading => rsx! { ListSkeleton {} },
                    ListView::Failed => rsx! {
                        ErrorBanner {
                            message: state.read().error().unwrap_or_default().to_string(),
                            on_retry: move |_| *reload.write() += 1,
                        }
                    },
                    ListView::Empty => rsx! {
                        EmptyState {
                            icon: "✂️",
                            title: "Nenhum serviço cadastrado".to_string(),
                        }
                    },
                    ListView::NoResults => rsx! {
                        EmptyState {
                            icon: "🔍",
                            title: "Nenhum serviço nesta categoria".to_string(),
                            on_clear: move |_| category.set(None),
                        }
                    },
                    ListView::Rows => rsx! {
                        div {
                            class: "grid gap-4 sm:grid-cols-2 xl:grid-cols-3",
                            for service in visible {
                                div {
                                    key: "{service.id}",
                                    class: "bg-card border border-border rounded-xl p-4 flex flex-col gap-2",
                                    div {
                                        class: "flex items-start justify-between gap-2",
                                        div {
                                            h3 { class: "font-semibold", "{service.display_name()}" }
                                            if let Some(c) = service.category() {
                                                p { class: "text-xs text-muted-foreground", "{c}" }
                                            }
                                        }
                                        Badge {
                                            label: service.popularity_level().label().to_string(),
                                            class: service.popularity_level().badge_class().to_string(),
                                        }
                                    }
                                    if let Some(description) = service.description.as_ref().filter(|d| !d.is_empty()) {
                                        p { class: "text-sm text-muted-foreground", "{description}" }
                                    }
                                    div {
                                        class: "flex items-center justify-between mt-auto pt-2",
                                        span { class: "text-lg font-bold", "{format_brl(service.price)}" }
                                        span { class: "text-sm text-muted-foreground", "⏱️ {format_duration(service.duration_min)}" }
                                    }
                                    if !stale {
                                        div {
                                            class: "flex justify-end gap-1",
                                            button {
                                                class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                                                onclick: {
                                                    let service = service.clone();
                                                    move |_| dialog.set(Some(ServiceDialog::Form(Some(service.clone()))))
                                                },
                                                "Editar"
                                            }
                                            button {
                                                class: "px-2 py-1 rounded-lg text-red-600 hover:bg-red-50 dark:hover:bg-red-950 transition",
                                                onclick: {
                                                    let service = service.clone();
                                                    move |_| dialog.set(Some(ServiceDialog::Delete(service.clone())))
                                                },
                                                "Excluir"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                }
            }

            match dialog.read().clone() {
                Some(ServiceDialog::Form(service)) => rsx! {
                    ServiceFormModal {
                        service,
                        categories: categories.clone(),
                        on_close: move |_| dialog.set(None),
                        on_saved: move |_| {
                            dialog.set(None);
                            *reload.write() += 1;
                        },
                    }
                },
                Some(ServiceDialog::Delete(service)) => rsx! {
                    ConfirmModal {
                        title: "Excluir serviço".to_string(),
                        message: format!("Excluir {}? Agendamentos antigos continuam registrados.", service.display_name()),
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
fn ServiceFormModal(
    service: Option<Service>,
    categories: Vec<String>,
    on_close: EventHandler<()>,
    on_saved: EventHandler<Service>,
) -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let editing_id = service.as_ref().map(|s| s.id);
    let initial = service.as_ref().map(ServiceForm::from_service).unwrap_or_default();

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
                Some(id) => catalog::update(&api, id, &payload).await,
                None => catalog::create(&api, &payload).await,
            };
            match result {
                Ok(saved) => {
                    log::info!("Service {} saved", saved.id);
                    toast.success("Serviço salvo".to_string(), notice(saved.display_name()));
                    on_saved.call(saved);
                }
                Err(e) => {
                    log::error!("Failed to save service: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        Modal {
            title: if editing_id.is_some() { "Editar serviço".to_string() } else { "Novo serviço".to_string() },
            on_close: move |_| on_close.call(()),

            FormAlert { message: error.read().clone() }

            div {
                class: "space-y-4",
                TextField {
                    label: "Nome".to_string(),
                    name: "nome".to_string(),
                    value: form.read().name.clone(),
                    error: errors.read().get("nome").map(str::to_string),
                    required: true,
                    on_input: move |v| form.write().name = v,
                }
                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Categoria" }
                    select {
                        class: INPUT_CLASS,
                        onchange: move |e| form.write().category = e.value(),
                        option { value: "", "Sem categoria" }
                        for c in categories.iter() {
                            option {
                                key: "{c}",
                                value: "{c}",
                                selected: form.read().category.eq_ignore_ascii_case(c),
                                "{c}"
                            }
                        }
                    }
                    if let Some(message) = errors.read().get("categoria") {
                        p { class: "text-sm text-red-600 dark:text-red-400", "{message}" }
                    }
                }
                div {
                    class: "grid grid-cols-2 gap-3",
                    TextField {
                        label: "Preço (R$)".to_string(),
                        name: "preco".to_string(),
                        placeholder: "0,00".to_string(),
                        value: form.read().price.clone(),
                        error: errors.read().get("preco").map(str::to_string),
                        required: true,
                        on_input: move |v| form.write().price = v,
                    }
                    TextField {
                        label: "Duração (min)".to_string(),
                        name: "duracao_estimada_min".to_string(),
                        input_type: "number".to_string(),
                        value: form.read().duration_min.clone(),
                        error: errors.read().get("duracao_estimada_min").map(str::to_string),
                        required: true,
                        on_input: move |v| form.write().duration_min = v,
                    }
                }
                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Descrição" }
                    textarea {
                        class: INPUT_CLASS,
                        rows: "3",
                        value: "{form.read().description}",
                        oninput: move |e| form.write().description = e.value(),
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
                    if *submitting.read() { "Salvando..." } else { "Salvar" }
                }
            }
        }
    }
}
