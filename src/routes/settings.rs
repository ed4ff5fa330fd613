use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;

use crate::components::toast::notice;
use crate::components::{FormAlert, PageHeader, TextField};
use crate::context::use_app_context;
use crate::services::auth::{self, PasswordChange};
use crate::stores::settings_store::{self, AppSettings, NotificationPrefs};
use crate::utils::format::parse_decimal;
use crate::utils::validation::FormErrors;

#[derive(Clone, Copy, PartialEq)]
enum SettingsTab {
    Company,
    Notifications,
    Password,
}

impl SettingsTab {
    const ALL: [SettingsTab; 3] = [Self::Company, Self::Notifications, Self::Password];

    fn label(&self) -> &'static str {
        match self {
            Self::Company => "🏢 Empresa",
            Self::Notifications => "🔔 Preferências",
            Self::Password => "🔒 Senha",
        }
    }
}

#[component]
pub fn Settings() -> Element {
    let mut tab = use_signal(|| SettingsTab::Company);

    rsx! {
        div {
            class: "min-h-screen",

            PageHeader {
                title: "⚙️ Configurações".to_string(),
            }

            // Tabs
            div {
                class: "flex border-b border-border px-4",
                for t in SettingsTab::ALL {
                    button {
                        key: "{t.label()}",
                        class: if tab() == t {
                            "px-4 py-3 font-semibold border-b-2 border-primary"
                        } else {
                            "px-4 py-3 text-muted-foreground hover:text-foreground"
                        },
                        onclick: move |_| tab.set(t),
                        "{t.label()}"
                    }
                }
            }

            div {
                class: "p-4 max-w-2xl",
                match tab() {
                    SettingsTab::Company => rsx! { CompanyTab {} },
                    SettingsTab::Notifications => rsx! { PreferencesTab {} },
                    SettingsTab::Password => rsx! { PasswordTab {} },
                }
            }
        }
    }
}

#[component]
fn CompanyTab() -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let mut company = use_signal(|| app.settings().empresa);
    let mut errors = use_signal(FormErrors::new);

    let save = move |_| {
        let profile = company.read().clone();
        if let Err(found) = profile.validate() {
            errors.set(found);
            return;
        }
        errors.set(FormErrors::new());
        let settings = AppSettings {
            empresa: profile,
            ..settings_store::SETTINGS.read().clone()
        };
        match settings_store::save_settings(settings) {
            Ok(()) => {
                toast.success("Configurações salvas".to_string(), notice("Dados da empresa atualizados."));
            }
            Err(e) => {
                toast.error("Erro".to_string(), notice(&e));
            }
        }
    };

    let field_error = move |name: &str| errors.read().get(name).map(str::to_string);

    rsx! {
        section {
            class: "bg-card border border-border rounded-xl p-6 space-y-4",
            TextField {
                label: "Nome da empresa".to_string(),
                name: "nome".to_string(),
                value: company.read().nome.clone(),
                error: field_error("nome"),
                required: true,
                on_input: move |v| company.write().nome = v,
            }
            div {
                class: "grid sm:grid-cols-2 gap-4",
                TextField {
                    label: "CNPJ".to_string(),
                    name: "cnpj".to_string(),
                    value: company.read().cnpj.clone(),
                    on_input: move |v| company.write().cnpj = v,
                }
                TextField {
                    label: "Telefone".to_string(),
                    name: "telefone".to_string(),
                    input_type: "tel".to_string(),
                    value: company.read().telefone.clone(),
                    error: field_error("telefone"),
                    on_input: move |v| company.write().telefone = v,
                }
            }
            TextField {
                label: "E-mail".to_string(),
                name: "email".to_string(),
                input_type: "email".to_string(),
                value: company.read().email.clone(),
                error: field_error("email"),
                on_input: move |v| company.write().email = v,
            }
            TextField {
                label: "Endereço".to_string(),
                name: "endereco".to_string(),
                value: company.read().endereco.clone(),
                on_input: move |v| company.write().endereco = v,
            }
            div {
                class: "grid sm:grid-cols-2 gap-4",
                TextField {
                    label: "Horário de funcionamento".to_string(),
                    name: "horario_funcionamento".to_string(),
                    value: company.read().horario_funcionamento.clone(),
                    on_input: move |v| company.write().horario_funcionamento = v,
                }
                TextField {
                    label: "Dias de funcionamento".to_string(),
                    name: "dias_funcionamento".to_string(),
                    value: company.read().dias_funcionamento.clone(),
                    on_input: move |v| company.write().dias_funcionamento = v,
                }
            }
            div {
                class: "flex justify-end",
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: save,
                    "Salvar"
                }
            }
        }
    }
}

const PREFERENCE_LABELS: [(&str, &str); 5] = [
    ("email", "Notificações por e-mail"),
    ("sistema", "Notificações do sistema"),
    ("agendamento", "Novos agendamentos"),
    ("cancelamento", "Cancelamentos"),
    ("estoque", "Alertas de estoque baixo"),
];

fn pref_flag<'a>(prefs: &'a mut NotificationPrefs, key: &str) -> &'a mut bool {
    match key {
        "email" => &mut prefs.email,
        "sistema" => &mut prefs.sistema,
        "agendamento" => &mut prefs.agendamento,
        "cancelamento" => &mut prefs.cancelamento,
        _ => &mut prefs.estoque,
    }
}

#[component]
fn PreferencesTab() -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let initial = app.settings();
    let mut prefs = use_signal(|| initial.notificacoes);
    let mut tax = use_signal(move || format!("{}", initial.imposto_padrao).replace('.', ","));
    let mut tax_error = use_signal(|| None::<String>);

    let save = move |_| {
        let Some(tax_percent) = parse_decimal(&tax.read()).filter(|t| (0.0..=100.0).contains(t)) else {
            tax_error.set(Some("Informe um percentual entre 0 e 100".to_string()));
            return;
        };
        tax_error.set(None);
        let settings = AppSettings {
            notificacoes: prefs(),
            imposto_padrao: tax_percent,
            ..settings_store::SETTINGS.read().clone()
        };
        match settings_store::save_settings(settings) {
            Ok(()) => {
                toast.success("Preferências salvas".to_string(), notice("Valem para este navegador."));
            }
            Err(e) => {
                toast.error("Erro".to_string(), notice(&e));
            }
        }
    };

    rsx! {
        section {
            class: "bg-card border border-border rounded-xl p-6 space-y-4",
            h3 { class: "font-semibold", "Notificações" }
            for (key, label) in PREFERENCE_LABELS {
                label {
                    key: "{key}",
                    class: "flex items-center justify-between gap-4 py-2 border-b border-border last:border-b-0",
                    span { "{label}" }
                    input {
                        r#type: "checkbox",
                        checked: *pref_flag(&mut prefs(), key),
                        onchange: move |e| *pref_flag(&mut prefs.write(), key) = e.checked(),
                    }
                }
            }

            h3 { class: "font-semibold pt-2", "Vendas" }
            TextField {
                label: "Imposto padrão (%)".to_string(),
                name: "imposto_padrao".to_string(),
                value: tax.read().clone(),
                error: tax_error.read().clone(),
                on_input: move |v| tax.set(v),
            }
            p { class: "text-xs text-muted-foreground", "Aplicado automaticamente em novas vendas." }

            div {
                class: "flex justify-end",
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                    onclick: save,
                    "Salvar"
                }
            }
        }
    }
}

#[component]
fn PasswordTab() -> Element {
    let app = use_app_context();
    let toast = consume_toast();
    let mut form = use_signal(PasswordChange::default);
    let mut errors = use_signal(FormErrors::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let api = app.api().clone();
    let submit = move |_| {
        if *submitting.read() {
            return;
        }
        let change = form.read().clone();
        if let Err(found) = change.validate() {
            errors.set(found);
            return;
        }
        errors.set(FormErrors::new());
        error.set(None);
        submitting.set(true);

        let api = api.clone();
        let toast = toast.clone();
        spawn(async move {
            match auth::change_password(&api, &change).await {
                Ok(_) => {
                    log::info!("Password changed");
                    toast.success("Senha alterada".to_string(), notice("Use a nova senha no próximo acesso."));
                    form.set(PasswordChange::default());
                }
                Err(e) => {
                    log::warn!("Password change failed: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        section {
            class: "bg-card border border-border rounded-xl p-6 space-y-4",
            FormAlert { message: error.read().clone() }
            TextField {
                label: "Senha atual".to_string(),
                name: "senha_atual".to_string(),
                input_type: "password".to_string(),
                value: form.read().current.clone(),
                error: errors.read().get("senha_atual").map(str::to_string),
                required: true,
                on_input: move |v| form.write().current = v,
            }
            TextField {
                label: "Nova senha".to_string(),
                name: "nova_senha".to_string(),
                input_type: "password".to_string(),
                value: form.read().new.clone(),
                error: errors.read().get("nova_senha").map(str::to_string),
                required: true,
                on_input: move |v| form.write().new = v,
            }
            TextField {
                label: "Confirmar nova senha".to_string(),
                name: "confirmacao".to_string(),
                input_type: "password".to_string(),
                value: form.read().confirmation.clone(),
                error: errors.read().get("confirmacao").map(str::to_string),
                required: true,
                on_input: move |v| form.write().confirmation = v,
            }
            div {
                class: "flex justify-end",
                button {
                    class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition disabled:opacity-50",
                    disabled: *submitting.read(),
                    onclick: submit,
                    if *submitting.read() { "Alterando..." } else { "Alterar senha" }
                }
            }
        }
    }
}
