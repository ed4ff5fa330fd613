use chrono::NaiveDate;
use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::form_field::{FormAlert, TextField, INPUT_CLASS};
use crate::components::modal::Modal;
use crate::components::toast::notice;
use crate::context::use_app_context;
use crate::services::appointments::{self, Appointment, AppointmentForm};
use crate::services::barbers::{self, Barber};
use crate::services::catalog::{self, Service};
use crate::services::clients::{self, Client, ClientForm};
use crate::services::page::ListQuery;
use crate::utils::format::{format_brl, format_duration};
use crate::utils::time::{display_datetime, now_local};
use crate::utils::validation::FormErrors;

const CLIENT_PICKER_SIZE: u32 = 100;

/// Create, edit or view an appointment.
///
/// `appointment` is `None` for a new booking on `date`; `read_only` turns
/// the form into a details panel.
#[component]
pub fn AppointmentModal(
    appointment: Option<Appointment>,
    date: NaiveDate,
    #[props(default = false)] read_only: bool,
    on_close: EventHandler<()>,
    on_saved: EventHandler<Appointment>,
) -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let editing_id = appointment.as_ref().map(|a| a.id);

    let initial = appointment
        .as_ref()
        .map(AppointmentForm::from_appointment)
        .unwrap_or_else(|| AppointmentForm::for_date(date));
    let mut form = use_signal(move || initial);
    let mut errors = use_signal(FormErrors::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let mut client_options = use_signal(Vec::<Client>::new);
    let mut service_options = use_signal(Vec::<Service>::new);
    let mut barber_options = use_signal(Vec::<Barber>::new);

    let mut quick_client = use_signal(|| None::<ClientForm>);
    let mut quick_errors = use_signal(FormErrors::new);

    let api = app.api().clone();
    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            let query = ListQuery {
                per_page: CLIENT_PICKER_SIZE,
                ..ListQuery::default()
            };
            match clients::list(&api, &query).await {
                Ok(page) => client_options.set(page.items),
                Err(e) => log::warn!("Failed to load clients for appointment form: {}", e),
            }
            match catalog::list(&api).await {
                Ok(services) => service_options.set(services),
                Err(e) => log::warn!("Failed to load services for appointment form: {}", e),
            }
        });
    });

    // Barber list follows the chosen date and time
    let slot = use_memo(move || {
        let f = form.read();
        (f.date.clone(), f.time.clone())
    });
    let api = app.api().clone();
    use_effect(move || {
        let (day, time) = slot();
        let api = api.clone();
        spawn(async move {
            let result = if day.is_empty() || time.is_empty() {
                barbers::list(&api).await
            } else {
                barbers::available_at(&api, &day, &time).await
            };
            match result {
                Ok(list) => barber_options.set(list),
                Err(e) => log::warn!("Failed to load barbers: {}", e),
            }
        });
    });

    let (total_price, total_minutes) = form.read().selection_totals(&service_options.read());

    let api = app.api().clone();
    let save_toast = toast.clone();
    let submit = move |_| {
        if *submitting.read() {
            return;
        }
        let payload = match form.read().validate(now_local()) {
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
        let toast = save_toast.clone();
        spawn(async move {
            match appointments::save(&api, editing_id, &payload).await {
                Ok(saved) => {
                    log::info!("Appointment {} saved", saved.id);
                    let title = if editing_id.is_some() { "Agendamento atualizado" } else { "Agendamento criado" };
                    toast.success(title.to_string(), notice(&display_datetime(&saved.starts_at)));
                    on_saved.call(saved);
                }
                Err(e) => {
                    log::error!("Failed to save appointment: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    let api = app.api().clone();
    let save_client = move |_| {
        let Some(draft) = quick_client.read().clone() else {
            return;
        };
        let payload = match draft.validate() {
            Ok(payload) => payload,
            Err(found) => {
                quick_errors.set(found);
                return;
            }
        };
        let api = api.clone();
        let toast = toast.clone();
        spawn(async move {
            match clients::create(&api, &payload).await {
                Ok(client) => {
                    log::info!("Client {} created from appointment form", client.id);
                    form.write().client_id = Some(client.id);
                    client_options.write().insert(0, client);
                    quick_client.set(None);
                    quick_errors.set(FormErrors::new());
                    toast.success("Cliente cadastrado".to_string(), notice(&payload.name));
                }
                Err(e) => quick_errors.set(FormErrors::from_server(&e)),
            }
        });
    };

    let title = match (editing_id, read_only) {
        (Some(id), true) => format!("Agendamento #{}", id),
        (Some(_), false) => "Editar agendamento".to_string(),
        (None, _) => "Novo agendamento".to_string(),
    };

    if read_only {
        let Some(appointment) = appointment else {
            return rsx! {};
        };
        return rsx! {
            Modal {
                title,
                on_close: move |_| on_close.call(()),
                div {
                    class: "space-y-2 text-sm",
                    p { span { class: "text-muted-foreground", "Cliente: " } {appointment.client_name.clone().unwrap_or_default()} }
                    p { span { class: "text-muted-foreground", "Barbeiro: " } {appointment.barber_name.clone().unwrap_or_default()} }
                    p { span { class: "text-muted-foreground", "Início: " } "{display_datetime(&appointment.starts_at)}" }
                    p { span { class: "text-muted-foreground", "Status: " } "{appointment.status.label()}" }
                    p { span { class: "text-muted-foreground", "Serviços: " } "{appointment.services_label()}" }
                    p {
                        span { class: "text-muted-foreground", "Total: " }
                        "{format_brl(appointment.total_price())} · {format_duration(appointment.total_duration())}"
                    }
                    if let Some(notes) = appointment.notes.as_ref().filter(|n| !n.is_empty()) {
                        p { span { class: "text-muted-foreground", "Observações: " } "{notes}" }
                    }
                }
            }
        };
    }

    rsx! {
        Modal {
            title,
            on_close: move |_| on_close.call(()),

            FormAlert { message: error.read().clone() }

            div {
                class: "space-y-4",

                div {
                    class: "space-y-1",
                    div {
                        class: "flex items-center justify-between",
                        label { class: "block text-sm font-medium", "Cliente" span { class: "text-red-500 ml-0.5", "*" } }
                        button {
                            class: "text-sm text-primary hover:underline",
                            onclick: move |_| {
                                let open = quick_client.read().is_some();
                                quick_client.set(if open { None } else { Some(ClientForm::default()) });
                            },
                            if quick_client.read().is_some() { "Fechar" } else { "+ Novo cliente" }
                        }
                    }
                    select {
                        class: INPUT_CLASS,
                        onchange: move |e| form.write().client_id = e.value().parse::<i64>().ok(),
                        option { value: "", "Selecione..." }
                        for client in client_options.read().iter() {
                            option {
                                key: "{client.id}",
                                value: "{client.id}",
                                selected: form.read().client_id == Some(client.id),
                                "{client.name}"
                            }
                        }
                    }
                    if let Some(message) = errors.read().get("cliente_id") {
                        p { class: "text-sm text-red-600 dark:text-red-400", "{message}" }
                    }
                }

                if let Some(draft) = quick_client.read().clone() {
                    div {
                        class: "p-3 border border-border rounded-lg space-y-3 bg-muted/30",
                        TextField {
                            label: "Nome".to_string(),
                            name: "nome".to_string(),
                            value: draft.name.clone(),
                            error: quick_errors.read().get("nome").map(str::to_string),
                            required: true,
                            on_input: move |v| {
                                if let Some(d) = quick_client.write().as_mut() {
                                    d.name = v;
                                }
                            },
                        }
                        TextField {
                            label: "Telefone".to_string(),
                            name: "telefone".to_string(),
                            value: draft.phone.clone(),
                            error: quick_errors.read().get("telefone").map(str::to_string),
                            required: true,
                            on_input: move |v| {
                                if let Some(d) = quick_client.write().as_mut() {
                                    d.phone = v;
                                }
                            },
                        }
                        button {
                            class: "px-3 py-1 bg-primary text-primary-foreground rounded-lg text-sm",
                            onclick: save_client,
                            "Cadastrar cliente"
                        }
                    }
                }

                div {
                    class: "grid grid-cols-2 gap-3",
                    TextField {
                        label: "Data".to_string(),
                        name: "data".to_string(),
                        input_type: "date".to_string(),
                        value: form.read().date.clone(),
                        error: errors.read().get("data").map(str::to_string),
                        required: true,
                        on_input: move |v| form.write().date = v,
                    }
                    TextField {
                        label: "Horário".to_string(),
                        name: "hora".to_string(),
                        input_type: "time".to_string(),
                        value: form.read().time.clone(),
                        error: errors.read().get("hora").map(str::to_string),
                        required: true,
                        on_input: move |v| form.write().time = v,
                    }
                }

                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Barbeiro" span { class: "text-red-500 ml-0.5", "*" } }
                    select {
                        class: INPUT_CLASS,
                        onchange: move |e| form.write().barber_id = e.value().parse::<i64>().ok(),
                        option { value: "", "Selecione..." }
                        for barber in barber_options.read().iter() {
                            option {
                                key: "{barber.id}",
                                value: "{barber.id}",
                                selected: form.read().barber_id == Some(barber.id),
                                "{barber.display_name()}"
                            }
                        }
                    }
                    if let Some(message) = errors.read().get("barbeiro_id") {
                        p { class: "text-sm text-red-600 dark:text-red-400", "{message}" }
                    }
                }

                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Serviços" span { class: "text-red-500 ml-0.5", "*" } }
                    div {
                        class: "grid sm:grid-cols-2 gap-2 max-h-48 overflow-y-auto",
                        for service in service_options.read().iter() {
                            label {
                                key: "{service.id}",
                                class: "flex items-center gap-2 px-3 py-2 border border-border rounded-lg cursor-pointer hover:bg-accent",
                                input {
                                    r#type: "checkbox",
                                    checked: form.read().service_ids.contains(&service.id),
                                    onchange: {
                                        let id = service.id;
                                        move |_| form.write().toggle_service(id)
                                    },
                                }
                                span { class: "flex-1", "{service.display_name()}" }
                                span { class: "text-xs text-muted-foreground", "{format_brl(service.price)}" }
                            }
                        }
                    }
                    if let Some(message) = errors.read().get("servicos") {
                        p { class: "text-sm text-red-600 dark:text-red-400", "{message}" }
                    }
                    p {
                        class: "text-sm text-muted-foreground",
                        "Total: {format_brl(total_price)} · Duração: {format_duration(total_minutes)}"
                    }
                }

                div {
                    class: "space-y-1",
                    label { class: "block text-sm font-medium", "Observações" }
                    textarea {
                        class: INPUT_CLASS,
                        rows: "2",
                        value: "{form.read().notes}",
                        oninput: move |e| form.write().notes = e.value(),
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
