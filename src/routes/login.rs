use dioxus::prelude::*;

use crate::components::form_field::{FormAlert, TextField};
use crate::context::use_app_context;
use crate::routes::Route;
use crate::services::auth::Credentials;
use crate::stores::auth_store::{self, GuardAction};
use crate::utils::validation::FormErrors;

#[component]
pub fn Login() -> Element {
    let app = use_app_context();
    let navigator = navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(FormErrors::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    // Already signed in: go straight to the dashboard
    let api = app.api().clone();
    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            if auth_store::run_guard(&api, true, chrono::Utc::now()).await == GuardAction::RedirectHome {
                navigator.replace(Route::Dashboard {});
            }
        });
    });

    let api = app.api().clone();
    let submit = move |e: FormEvent| {
        e.prevent_default();
        if *submitting.read() {
            return;
        }
        let credentials = Credentials {
            email: email.read().trim().to_string(),
            password: password.read().clone(),
        };
        if let Err(found) = credentials.validate() {
            errors.set(found);
            return;
        }
        errors.set(FormErrors::new());
        error.set(None);
        submitting.set(true);

        let api = api.clone();
        spawn(async move {
            match auth_store::login(&api, &credentials).await {
                Ok(_) => {
                    navigator.replace(Route::Dashboard {});
                }
                Err(e) => {
                    log::warn!("Login failed: {}", e);
                    errors.set(FormErrors::from_server(&e));
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        div {
            class: "min-h-screen flex items-center justify-center bg-background p-4",
            div {
                class: "bg-card border border-border rounded-xl w-full max-w-sm p-8 shadow-xl",

                div {
                    class: "flex flex-col items-center mb-6",
                    div {
                        class: "w-14 h-14 bg-blue-500 rounded-full flex items-center justify-center text-white font-bold text-2xl mb-3",
                        "B"
                    }
                    h1 {
                        class: "text-2xl font-bold",
                        "B-Manager"
                    }
                    p {
                        class: "text-sm text-muted-foreground",
                        "Sistema de Gestão para Barbearias"
                    }
                }

                FormAlert { message: error.read().clone() }

                form {
                    class: "space-y-4",
                    onsubmit: submit,
                    TextField {
                        label: "E-mail".to_string(),
                        name: "email".to_string(),
                        input_type: "email".to_string(),
                        value: email.read().clone(),
                        error: errors.read().get("email").map(str::to_string),
                        required: true,
                        on_input: move |v| email.set(v),
                    }
                    TextField {
                        label: "Senha".to_string(),
                        name: "senha".to_string(),
                        input_type: "password".to_string(),
                        value: password.read().clone(),
                        error: errors.read().get("senha").map(str::to_string),
                        required: true,
                        on_input: move |v| password.set(v),
                    }
                    button {
                        class: "w-full py-2 bg-primary text-primary-foreground font-semibold rounded-lg hover:bg-primary/90 transition disabled:opacity-50",
                        r#type: "submit",
                        disabled: *submitting.read(),
                        if *submitting.read() { "Entrando..." } else { "Entrar" }
                    }
                }
            }
        }
    }
}
