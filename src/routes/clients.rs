use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::icons::PlusIcon;
use crate::components::toast::notice;
use crate::components::{
    ConfirmModal, EmptyState, ErrorBanner, FormAlert, ListSkeleton, Modal, PageHeader, Pagination,
    TextField, INPUT_CLASS,
};
use crate::context::use_app_context;
use crate::hooks::use_debounced;
use crate::services::clients::{self, Client, ClientForm};
use crate::services::page::{ListQuery, Page};
use crate::utils::data_state::{DataState, ListView};
use crate::utils::format::initials;
use crate::utils::time::display_date;
use crate::utils::validation::FormErrors;

#[derive(Clone, PartialEq)]
enum ClientDialog {
    Form(Option<Client>),
    Profile(i64),
    Delete(Client),
}

#[component]
pub fn Clients() -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut list = use_signal(|| DataState::<Page<Client>>::Pending);
    let mut page = use_signal(|| 1u32);
    let mut search = use_signal(String::new);
    let search_query = use_debounced(search, 300);
    let mut dialog = use_signal(|| None::<ClientDialog>);
    let mut deleting = use_signal(|| false);
    let mut reload = use_signal(|| 0u32);

    let mut last_search = use_signal(String::new);

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let term = search_query();
        let current = page();
        // A new search always starts from the first page
        if *last_search.peek() != term {
            last_search.set(term.clone());
            if current != 1 {
                page.set(1);
                return;
            }
        }
        let query = ListQuery {
            search: term,
            page: current,
            ..ListQuery::default()
        };
        let api = api.clone();
        list.set(DataState::Loading);
        spawn(async move {
            log::debug!("Loading clients page {}", query.page);
            list.set(clients::list(&api, &query).await.into());
        });
    });

    let api = app.api().clone();
    let confirm_delete = move |_| {
        let Some(ClientDialog::Delete(client)) = dialog.read().clone() else {
            return;
        };
        let api = api.clone();
        let toast = toast.clone();
        deleting.set(true);
        spawn(async move {
            match clients::delete(&api, client.id).await {
                Ok(_) => {
                    log::info!("Client {} deleted", client.id);
                    toast.success("Cliente excluído".to_string(), notice(&client.name));
                    dialog.set(None);
                    *reload.write() += 1;
                }
                Err(e) => {
                    log::error!("Failed to delete client {}: {}", client.id, e);
                    toast.error("Erro ao excluir".to_string(), notice(&e.to_string()));
                }
            }
            deleting.set(false);
        });
    };

    let filtered = !search_query.read().trim().is_empty();
    let view = list.read().list_view(|p| p.len(), filtered);

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "👥 Clientes".to_string(),
                subtitle: list.read().data().map(|p| p.range_label()),
                input {
                    class: "{INPUT_CLASS} w-64",
                    placeholder: "Buscar por nome, telefone ou e-mail...",
                    value: "{search}",
                    oninput: move |e| search.set(e.value()),
                }
                button {
                    class: "flex items-center gap-2 px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: move |_| dialog.set(Some(ClientDialog::Form(None))),
                    PlusIcon { class: "w-4 h-4" }
                    "Novo cliente"
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
                            icon: "👥",
                            title: "Nenhum cliente cadastrado".to_string(),
                            hint: Some("Cadastre o primeiro cliente para começar.".to_string()),
                        }
                    },
                    ListView::NoResults => rsx! {
                        EmptyState {
                            icon: "🔍",
                            title: format!("Nenhum cliente encontrado para \"{}\"", search_query.read().trim()),
                            on_clear: move |_| search.set(String::new()),
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
                                        th { class: "px-4 py-3", "Nome" }
                                        th { class: "px-4 py-3", "Telefone" }
                                        th { class: "px-4 py-3", "E-mail" }
                                        th { class: "px-4 py-3 text-right", "Ações" }
                                    }
                                }
                                tbody {
                                    for client in list.read().data().map(|p| p.items.clone()).unwrap_or_default() {
                                        tr {
                                            key: "{client.id}",
                                            class: "border-b border-border last:border-b-0 hover:bg-accent/50",
                                            td { class: "px-4 py-3 font-medium", "{client.name}" }
                                            td { class: "px-4 py-3", "{client.phone_display()}" }
                                            td { class: "px-4 py-3 text-muted-foreground", {client.email.clone().unwrap_or_else(|| "-".to_string())} }
                                            td {
                                                class: "px-4 py-3",
                                                div {
                                                    class: "flex justify-end gap-1",
                                                    button {
                                                        class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                                                        onclick: {
                                                            let id = client.id;
                                                            move |_| dialog.set(Some(ClientDialog::Profile(id)))
                                                        },
                                                        "Ver"
                                                    }
                                                    button {
                                                        class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                                                        onclick: {
                                                            let client = client.clone();
                                                            move |_| dialog.set(Some(ClientDialog::Form(Some(client.clone()))))
                                                        },
                                                        "Editar"
                                                    }
                                                    button {
                                                        class: "px-2 py-1 rounded-lg text-red-600 hover:bg-red-50 dark:hover:bg-red-950 transition",
                                                        onclick: {
                                                            let client = client.clone();
                                                            move |_| dialog.set(Some(ClientDialog::Delete(client.clone())))
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
                Some(ClientDialog::Form(client)) => rsx! {
                    ClientFormModal {
                        client,
                        on_close: move |_| dialog.set(None),
                        on_saved: move |_| {
                            dialog.set(None);
                            *reload.write() += 1;
                        },
                    }
                },
                Some(ClientDialog::Profile(id)) => rsx! {
                    ClientProfile {
                        id,
                        on_close: move |_| dialog.set(None),
                        on_edit: move |client| dialog.set(Some(ClientDialog::Form(Some(client)))),
                    }
                },
                Some(ClientDialog::Delete(client)) => rsx! {
                    ConfirmModal {
                        title: "Excluir cliente".to_string(),
                        message: format!("Excluir {}? Esta ação não pode ser desfeita.", client.name),
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
fn ClientFormModal(client: Option<Client>, on_close: EventHandler<()>, on_saved: EventHandler<Client>) -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let editing_id = client.as_ref().map(|c| c.id);
    let initial = client.as_ref().map(ClientForm::from_client).unwrap_or_default();

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
                Some(id) => clients::update(&api, id, &payload).await,
                None => clients::create(&api, &payload).await,
            };
            match result {
                Ok(saved) => {
                    log::info!("Client {} saved", saved.id);
                    let title = if editing_id.is_some() { "Cliente atualizado" } else { "Cliente cadastrado" };
                    toast.success(title.to_string(), notice(&saved.name));
                    on_saved.call(saved);
                }
                Err(e) => {
                    log::error!("Failed to save client: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        Modal {
            title: if editing_id.is_some() { "Editar cliente".to_string() } else { "Novo cliente".to_string() },
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
                TextField {
                    label: "Telefone".to_string(),
                    name: "telefone".to_string(),
                    input_type: "tel".to_string(),
                    placeholder: "(11) 91234-5678".to_string(),
                    value: form.read().phone.clone(),
                    error: errors.read().get("telefone").map(str::to_string),
                    required: true,
                    on_input: move |v| form.write().phone = v,
                }
                TextField {
                    label: "E-mail".to_string(),
                    name: "email".to_string(),
                    input_type: "email".to_string(),
                    value: form.read().email.clone(),
                    error: errors.read().get("email").map(str::to_string),
                    on_input: move |v| form.write().email = v,
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

/// Read-only client card, fetched fresh so it reflects edits made elsewhere
#[component]
fn ClientProfile(id: i64, on_close: EventHandler<()>, on_edit: EventHandler<Client>) -> Element {
    let app = use_app_context();
    let mut state = use_signal(|| DataState::<Client>::Pending);

    let api = app.api().clone();
    use_effect(move || {
        let api = api.clone();
        state.set(DataState::Loading);
        spawn(async move {
            state.set(clients::get(&api, id).await.into());
        });
    });

    rsx! {
        Modal {
            title: "Perfil do cliente".to_string(),
            on_close: move |_| on_close.call(()),

            match state.read().clone() {
                DataState::Loaded(client) => rsx! {
                    div {
                        class: "flex items-center gap-4 mb-6",
                        div {
                            class: "w-16 h-16 rounded-full bg-muted flex items-center justify-center text-xl font-semibold",
                            "{initials(&client.name)}"
                        }
                        div {
                            h3 { class: "text-lg font-bold", "{client.name}" }
                            if let Some(since) = client.created_at.as_deref() {
                                p { class: "text-sm text-muted-foreground", "Cliente desde {display_date(since)}" }
                            }
                        }
                    }
                    dl {
                        class: "grid grid-cols-[auto_1fr] gap-x-4 gap-y-2 text-sm",
                        dt { class: "text-muted-foreground", "Telefone" }
                        dd { "{client.phone_display()}" }
                        dt { class: "text-muted-foreground", "E-mail" }
                        dd { {client.email.clone().unwrap_or_else(|| "-".to_string())} }
                    }
                    div {
                        class: "flex justify-end mt-6",
                        button {
                            class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                            onclick: {
                                let client = client.clone();
                                move |_| on_edit.call(client.clone())
                            },
                            "Editar"
                        }
                    }
                },
                DataState::Error(msg) => rsx! { ErrorBanner { message: msg } },
                _ => rsx! { ListSkeleton { rows: 2 } },
            }
        }
    }
}
