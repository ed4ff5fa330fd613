use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::icons::PlusIcon;
use crate::components::toast::notice;
use crate::components::{
    Badge, BarList, ConfirmModal, EmptyState, ErrorBanner, FormAlert, ListSkeleton, Modal, PageHeader,
    TextField,
};
use crate::context::use_app_context;
use crate::services::barbers::{self, Barber, BarberForm, BarberPerformance, PERFORMANCE_PERIODS};
use crate::utils::data_state::{DataState, ListView};
use crate::utils::format::{format_percent, initials};
use crate::utils::validation::FormErrors;

#[derive(Clone, PartialEq)]
enum BarberDialog {
    Form(Option<Barber>),
    Details(Barber),
    Delete(Barber),
}

fn availability_badge(available: bool) -> (&'static str, &'static str) {
    if available {
        ("Disponível", "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-200")
    } else {
        ("Indisponível", "bg-muted text-muted-foreground")
    }
}

#[component]
pub fn Barbers() -> Element {
    let app = use_app_context();
    let toast = consume_toast();

    let mut state = use_signal(|| DataState::<Vec<Barber>>::Pending);
    let mut dialog = use_signal(|| None::<BarberDialog>);
    let mut deleting = use_signal(|| false);
    let mut toggling = use_signal(|| None::<i64>);
    let mut reload = use_signal(|| 0u32);

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let api = api.clone();
        state.set(DataState::Loading);
        spawn(async move {
            state.set(barbers::list(&api).await.into());
        });
    });

    let api = app.api().clone();
    let toggle_toast = toast.clone();
    let toggle = move |barber: Barber| {
        if toggling.read().is_some() {
            return;
        }
        let api = api.clone();
        let toast = toggle_toast.clone();
        toggling.set(Some(barber.id));
        spawn(async move {
            let wanted = !barber.available;
            match barbers::set_availability(&api, &barber, wanted).await {
                Ok(updated) => {
                    log::info!("Barber {} availability set to {}", updated.id, updated.available);
                    if let DataState::Loaded(list) = &mut *state.write() {
                        if let Some(slot) = list.iter_mut().find(|b| b.id == updated.id) {
                            *slot = updated;
                        }
                    }
                }
                Err(e) => {
                    log::error!("Failed to toggle availability of barber {}: {}", barber.id, e);
                    toast.error("Erro".to_string(), notice(&e.to_string()));
                }
            }
            toggling.set(None);
        });
    };

    let api = app.api().clone();
    let confirm_delete = move |_| {
        let Some(BarberDialog::Delete(barber)) = dialog.read().clone() else {
            return;
        };
        let api = api.clone();
        let toast = toast.clone();
        deleting.set(true);
        spawn(async move {
            match barbers::delete(&api, barber.id).await {
                Ok(_) => {
                    log::info!("Barber {} deleted", barber.id);
                    toast.success("Barbeiro removido".to_string(), notice(&barber.display_name()));
                    dialog.set(None);
                    *reload.write() += 1;
                }
                Err(e) => {
                    log::error!("Failed to delete barber {}: {}", barber.id, e);
                    toast.error("Erro ao excluir".to_string(), notice(&e.to_string()));
                }
            }
            deleting.set(false);
        });
    };

    let view = state.read().list_view(|v| v.len(), false);
    let rows = state.read().data().cloned().unwrap_or_default();
    let available = rows.iter().filter(|b| b.available).count();

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "💈 Barbeiros".to_string(),
                subtitle: Some(format!("{} disponíveis de {}", available, rows.len())),
                button {
                    class: "flex items-center gap-2 px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: move |_| dialog.set(Some(BarberDialog::Form(None))),
                    PlusIcon { class: "w-4 h-4" }
                    "Novo barbeiro"
                }
            }

            div {
                class: "p-4",
                match view {
                    ListView::Loading => rsx! { ListSkeleton { rows: 3 } },
                    ListView::Failed => rsx! {
                        ErrorBanner {
                            message: state.read().error().unwrap_or_default().to_string(),
                            on_retry: move |_| *reload.write() += 1,
                        }
                    },
                    ListView::Empty | ListView::NoResults => rsx! {
                        EmptyState {
                            icon: "💈",
                            title: "Nenhum barbeiro cadastrado".to_string(),
                        }
                    },
                    ListView::Rows => rsx! {
                        div {
                            class: "grid gap-4 sm:grid-cols-2 xl:grid-cols-3",
                            for barber in rows.iter().cloned() {
                                BarberCard {
                                    key: "{barber.id}",
                                    barber: barber.clone(),
                                    busy: *toggling.read() == Some(barber.id),
                                    on_toggle: {
                                        let mut toggle = toggle.clone();
                                        move |b| toggle(b)
                                    },
                                    on_details: move |b| dialog.set(Some(BarberDialog::Details(b))),
                                    on_edit: move |b| dialog.set(Some(BarberDialog::Form(Some(b)))),
                                    on_delete: move |b| dialog.set(Some(BarberDialog::Delete(b))),
                                }
                            }
                        }
                    },
                }
            }

            div {
                class: "px-4 pb-4",
                PerformancePanel {}
            }

            match dialog.read().clone() {
                Some(BarberDialog::Form(barber)) => rsx! {
                    BarberFormModal {
                        barber,
                        on_close: move |_| dialog.set(None),
                        on_saved: move |_| {
                            dialog.set(None);
                            *reload.write() += 1;
                        },
                    }
                },
                Some(BarberDialog::Details(barber)) => rsx! {
                    BarberDetails {
                        barber,
                        on_close: move |_| dialog.set(None),
                        on_edit: move |b| dialog.set(Some(BarberDialog::Form(Some(b)))),
                    }
                },
                Some(BarberDialog::Delete(barber)) => rsx! {
                    ConfirmModal {
                        title: "Remover barbeiro".to_string(),
                        message: format!("Remover {} da equipe?", barber.display_name()),
                        confirm_text: Some("Remover".to_string()),
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
fn PerformancePanel() -> Element {
    let app = use_app_context();
    let mut period = use_signal(|| 30u32);
    let mut state = use_signal(|| DataState::<Vec<BarberPerformance>>::Pending);
    let mut reload = use_signal(|| 0u32);

    let api = app.api().clone();
    use_effect(move || {
        let _ = reload.read();
        let days = period();
        let api = api.clone();
        state.set(DataState::Loading);
        spawn(async move {
            log::debug!("Loading barber performance for {} days", days);
            let result = barbers::performance(&api, days).await;
            if let Err(e) = &result {
                log::warn!("Failed to load barber performance: {}", e);
            }
            state.set(result.into());
        });
    });

    let view = state.read().list_view(|rows| rows.len(), false);
    let (visits, revenue) = state
        .read()
        .data()
        .map(|rows| barbers::performance_rows(rows))
        .unwrap_or_default();

    rsx! {
        section {
            class: "bg-card border border-border rounded-xl p-4",
            div {
                class: "flex items-center justify-between gap-4 mb-4",
                h3 { class: "font-semibold", "Desempenho dos barbeiros" }
                div {
                    class: "flex rounded-lg border border-border overflow-hidden",
                    for days in PERFORMANCE_PERIODS {
                        button {
                            key: "{days}",
                            class: if period() == days { "px-3 py-1 text-sm bg-primary text-primary-foreground" } else { "px-3 py-1 text-sm hover:bg-accent" },
                            onclick: move |_| period.set(days),
                            "{days} dias"
                        }
                    }
                }
            }
            match view {
                ListView::Loading => rsx! { ListSkeleton { rows: 3 } },
                ListView::Failed => rsx! {
                    ErrorBanner {
                        message: format!("Erro ao carregar desempenho: {}", state.read().error().unwrap_or_default()),
                        on_retry: move |_| *reload.write() += 1,
                    }
                },
                ListView::Empty | ListView::NoResults => rsx! {
                    p {
                        class: "text-sm text-muted-foreground text-center py-6",
                        "Não há dados de desempenho disponíveis para o período selecionado."
                    }
                },
                ListView::Rows => rsx! {
                    div {
                        class: "grid gap-6 lg:grid-cols-2",
                        div {
                            h4 { class: "text-sm text-muted-foreground mb-2", "Atendimentos" }
                            BarList { rows: visits, currency: false }
                        }
                        div {
                            h4 { class: "text-sm text-muted-foreground mb-2", "Faturamento" }
                            BarList { rows: revenue, color: "bg-emerald-500".to_string() }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn BarberCard(
    barber: Barber,
    busy: bool,
    on_toggle: EventHandler<Barber>,
    on_details: EventHandler<Barber>,
    on_edit: EventHandler<Barber>,
    on_delete: EventHandler<Barber>,
) -> Element {
    let (status, status_class) = availability_badge(barber.available);
    let name = barber.display_name();
    let b1 = barber.clone();
    let b2 = barber.clone();
    let b3 = barber.clone();
    let b4 = barber.clone();

    rsx! {
        div {
            class: "bg-card border border-border rounded-xl p-4 flex flex-col gap-3",
            div {
                class: "flex items-center gap-3",
                div {
                    class: "w-12 h-12 rounded-full bg-muted flex items-center justify-center font-semibold",
                    "{initials(&name)}"
                }
                div {
                    class: "flex-1 min-w-0",
                    h3 { class: "font-semibold truncate", "{name}" }
                    p { class: "text-xs text-muted-foreground truncate", "{barber.specialties_label()}" }
                }
                Badge { label: status.to_string(), class: status_class.to_string() }
            }
            p { class: "text-sm", "Comissão: {format_percent(barber.commission_percent)}" }
            div {
                class: "flex flex-wrap justify-end gap-1",
                button {
                    class: "px-2 py-1 rounded-lg hover:bg-accent transition disabled:opacity-50",
                    disabled: busy,
                    onclick: move |_| on_toggle.call(b1.clone()),
                    if barber.available { "Marcar indisponível" } else { "Marcar disponível" }
                }
                button {
                    class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                    onclick: move |_| on_details.call(b2.clone()),
                    "Detalhes"
                }
                button {
                    class: "px-2 py-1 rounded-lg hover:bg-accent transition",
                    onclick: move |_| on_edit.call(b3.clone()),
                    "Editar"
                }
                button {
                    class: "px-2 py-1 rounded-lg text-red-600 hover:bg-red-50 dark:hover:bg-red-950 transition",
                    onclick: move |_| on_delete.call(b4.clone()),
                    "Remover"
                }
            }
        }
    }
}

#[component]
fn BarberDetails(barber: Barber, on_close: EventHandler<()>, on_edit: EventHandler<Barber>) -> Element {
    let (status, status_class) = availability_badge(barber.available);
    let name = barber.display_name();
    let edit_target = barber.clone();

    rsx! {
        Modal {
            title: "Detalhes do barbeiro".to_string(),
            on_close: move |_| on_close.call(()),

            div {
                class: "flex items-center gap-4 mb-6",
                div {
                    class: "w-16 h-16 rounded-full bg-muted flex items-center justify-center text-xl font-semibold",
                    "{initials(&name)}"
                }
                div {
                    h3 { class: "text-lg font-bold", "{name}" }
                    Badge { label: status.to_string(), class: status_class.to_string() }
                }
            }
            dl {
                class: "grid grid-cols-[auto_1fr] gap-x-4 gap-y-2 text-sm",
                dt { class: "text-muted-foreground", "Especialidades" }
                dd { "{barber.specialties_label()}" }
                dt { class: "text-muted-foreground", "Comissão" }
                dd { "{format_percent(barber.commission_percent)}" }
                if let Some(user_id) = barber.usuario_id {
                    dt { class: "text-muted-foreground", "Usuário" }
                    dd { "#{user_id}" }
                }
            }
            div {
                class: "flex justify-end mt-6",
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: move |_| on_edit.call(edit_target.clone()),
                    "Editar"
                }
            }
        }
    }
}

#[component]
fn BarberFormModal(barber: Option<Barber>, on_close: EventHandler<()>, on_saved: EventHandler<Barber>) -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let editing_id = barber.as_ref().map(|b| b.id);
    let initial = barber
        .as_ref()
        .map(BarberForm::from_barber)
        .unwrap_or_else(BarberForm::new_barber);

    let mut form = use_signal(move || initial);
    let mut errors = use_signal(FormErrors::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let api = app.api().clone();
    let submit = move |_| {
        if *submitting.read() {
            return;
        }
        let request = match form.read().validate(editing_id) {
            Ok(request) => request,
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
            match barbers::save(&api, &request).await {
                Ok(saved) => {
                    log::info!("Barber {} saved", saved.id);
                    toast.success("Barbeiro salvo".to_string(), notice(&saved.display_name()));
                    on_saved.call(saved);
                }
                Err(e) => {
                    log::error!("Failed to save barber: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    let creating = editing_id.is_none();

    rsx! {
        Modal {
            title: if creating { "Novo barbeiro".to_string() } else { "Editar barbeiro".to_string() },
            on_close: move |_| on_close.call(()),

            FormAlert { message: error.read().clone() }

            div {
                class: "space-y-4",
                TextField {
                    label: "Nome".to_string(),
                    name: "nome".to_string(),
                    value: form.read().name.clone(),
                    error: errors.read().get("nome").map(str::to_string),
                    required: creating,
                    disabled: !creating,
                    on_input: move |v| form.write().name = v,
                }
                if creating {
                    TextField {
                        label: "E-mail".to_string(),
                        name: "email".to_string(),
                        input_type: "email".to_string(),
                        value: form.read().email.clone(),
                        error: errors.read().get("email").map(str::to_string),
                        required: true,
                        on_input: move |v| form.write().email = v,
                    }
                    TextField {
                        label: "Senha de acesso".to_string(),
                        name: "senha".to_string(),
                        input_type: "password".to_string(),
                        value: form.read().password.clone(),
                        error: errors.read().get("senha").map(str::to_string),
                        required: true,
                        on_input: move |v| form.write().password = v,
                    }
                    TextField {
                        label: "Telefone".to_string(),
                        name: "telefone".to_string(),
                        input_type: "tel".to_string(),
                        value: form.read().phone.clone(),
                        error: errors.read().get("telefone").map(str::to_string),
                        on_input: move |v| form.write().phone = v,
                    }
                }
                TextField {
                    label: "Especialidades".to_string(),
                    name: "especialidades".to_string(),
                    placeholder: "corte, barba, pigmentação".to_string(),
                    value: form.read().specialties.clone(),
                    error: errors.read().get("especialidades").map(str::to_string),
                    on_input: move |v| form.write().specialties = v,
                }
                TextField {
                    label: "Comissão (%)".to_string(),
                    name: "comissao_percentual".to_string(),
                    value: form.read().commission_percent.clone(),
                    error: errors.read().get("comissao_percentual").map(str::to_string),
                    on_input: move |v| form.write().commission_percent = v,
                }
                label {
                    class: "flex items-center gap-2 text-sm",
                    input {
                        r#type: "checkbox",
                        checked: form.read().available,
                        onchange: move |e| form.write().available = e.checked(),
                    }
                    "Disponível para agendamentos"
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
