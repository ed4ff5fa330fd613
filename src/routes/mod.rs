use dioxus::prelude::*;

pub mod agenda;
pub mod barbers;
pub mod clients;
pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod products;
pub mod reports;
pub mod sales;
pub mod services;
pub mod settings;

use agenda::Agenda;
use barbers::Barbers;
use clients::Clients;
use dashboard::Dashboard;
use login::Login;
use not_found::NotFound;
use products::Products;
use reports::Reports;
use sales::Sales;
use services::Services;
use settings::Settings;

use crate::components::icons::{
    BarberIcon, CalendarIcon, CartIcon, ChartIcon, HomeIcon, LogOutIcon, MenuIcon, PackageIcon,
    ScissorsIcon, SettingsIcon, UsersIcon,
};
use crate::components::Spinner;
use crate::context::use_app_context;
use crate::stores::auth_store::{self, GuardAction};
use crate::utils::format::initials;

/// App routes
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/")]
        Dashboard {},

        #[route("/agenda")]
        Agenda {},

        #[route("/clientes")]
        Clients {},

        #[route("/produtos")]
        Products {},

        #[route("/servicos")]
        Services {},

        #[route("/barbeiros")]
        Barbers {},

        #[route("/vendas")]
        Sales {},

        #[route("/relatorios")]
        Reports {},

        #[route("/configuracoes")]
        Settings {},
    #[end_layout]

    #[route("/login")]
    Login {},

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    let app = use_app_context();
    let auth = auth_store::AUTH_STATE.read();
    let mut sidebar_open = use_signal(|| false);
    let mut checked = use_signal(|| false);
    let navigator = navigator();

    // Session guard on every protected page load
    let api = app.api().clone();
    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            match auth_store::run_guard(&api, false, chrono::Utc::now()).await {
                GuardAction::Stay | GuardAction::RedirectHome => checked.set(true),
                GuardAction::RefreshAndReload => {
                    log::info!("Session refreshed, reloading page");
                    auth_store::reload_page();
                }
                GuardAction::RedirectLogin => {
                    auth_store::clear_auth();
                    navigator.replace(Route::Login {});
                }
            }
        });
    });

    let user_name = app.user_name();
    let role = auth
        .user
        .as_ref()
        .map(|u| u.role_label())
        .unwrap_or_default();

    rsx! {
        div {
            class: "min-h-screen bg-background transition-colors",

            div {
                class: "flex max-w-[1600px] mx-auto",

                // Left Sidebar (Navigation)
                aside {
                    class: "w-[275px] flex-shrink-0 border-r border-border sticky top-0 h-screen hidden lg:block bg-background",
                    SidebarContent {
                        user_name: user_name.clone(),
                        role: role.to_string(),
                        on_navigate: move |_| {},
                    }
                }

                // Mobile Sidebar Overlay
                if *sidebar_open.read() {
                    div {
                        class: "fixed inset-0 bg-black/50 z-40 lg:hidden",
                        onclick: move |_| sidebar_open.set(false),

                        aside {
                            class: "w-64 bg-background h-full",
                            onclick: move |e| e.stop_propagation(),
                            SidebarContent {
                                user_name: user_name.clone(),
                                role: role.to_string(),
                                on_navigate: move |_| sidebar_open.set(false),
                            }
                        }
                    }
                }

                // Center Content Area
                main {
                    class: "w-full flex-1 min-w-0",

                    // Mobile header
                    div {
                        class: "sticky top-0 z-30 bg-background/80 backdrop-blur-sm border-b border-border p-4 lg:hidden",
                        div {
                            class: "flex items-center justify-between",
                            button {
                                class: "p-2 hover:bg-accent rounded-lg",
                                aria_label: "Abrir menu",
                                onclick: move |_| sidebar_open.set(true),
                                MenuIcon {}
                            }
                            div {
                                class: "text-lg font-bold",
                                "B-Manager"
                            }
                            div {
                                class: "w-10"
                            }
                        }
                    }

                    // Page Content
                    if *checked.read() && auth.is_authenticated {
                        Outlet::<Route> {}
                    } else {
                        Spinner { label: "Verificando sessão...".to_string() }
                    }
                }
            }
        }
    }
}

#[component]
fn SidebarContent(user_name: String, role: String, on_navigate: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "h-full flex flex-col p-4 overflow-y-auto",

            // Logo
            div {
                class: "flex items-center gap-2 mb-6",
                div {
                    class: "w-12 h-12 bg-blue-500 rounded-full flex items-center justify-center text-white font-bold text-xl",
                    "B"
                }
                span {
                    class: "text-2xl font-bold",
                    "B-Manager"
                }
            }

            // Navigation Menu
            nav {
                class: "flex flex-col gap-1",
                onclick: move |_| on_navigate.call(()),

                NavLink {
                    to: Route::Dashboard {},
                    icon: rsx! { HomeIcon { class: "w-6 h-6" } },
                    label: "Início"
                }
                NavLink {
                    to: Route::Agenda {},
                    icon: rsx! { CalendarIcon { class: "w-6 h-6" } },
                    label: "Agenda"
                }
                NavLink {
                    to: Route::Clients {},
                    icon: rsx! { UsersIcon { class: "w-6 h-6" } },
                    label: "Clientes"
                }
                NavLink {
                    to: Route::Services {},
                    icon: rsx! { ScissorsIcon { class: "w-6 h-6" } },
                    label: "Serviços"
                }
                NavLink {
                    to: Route::Products {},
                    icon: rsx! { PackageIcon { class: "w-6 h-6" } },
                    label: "Produtos"
                }
                NavLink {
                    to: Route::Barbers {},
                    icon: rsx! { BarberIcon { class: "w-6 h-6" } },
                    label: "Barbeiros"
                }
                NavLink {
                    to: Route::Sales {},
                    icon: rsx! { CartIcon { class: "w-6 h-6" } },
                    label: "Vendas"
                }
                NavLink {
                    to: Route::Reports {},
                    icon: rsx! { ChartIcon { class: "w-6 h-6" } },
                    label: "Relatórios"
                }
                NavLink {
                    to: Route::Settings {},
                    icon: rsx! { SettingsIcon { class: "w-6 h-6" } },
                    label: "Configurações"
                }
            }

            // Current user + logout
            div {
                class: "mt-auto pt-4 border-t border-border",
                div {
                    class: "flex items-center gap-3 px-2 mb-3",
                    div {
                        class: "w-10 h-10 rounded-full bg-muted flex items-center justify-center font-semibold",
                        "{initials(&user_name)}"
                    }
                    div {
                        class: "min-w-0",
                        p {
                            class: "font-semibold truncate",
                            "{user_name}"
                        }
                        if !role.is_empty() {
                            p {
                                class: "text-xs text-muted-foreground",
                                "{role}"
                            }
                        }
                    }
                }
                button {
                    class: "flex items-center gap-4 px-4 py-2 rounded-full hover:bg-accent transition w-full text-left",
                    onclick: move |_| auth_store::logout(),
                    LogOutIcon { class: "w-6 h-6" }
                    span { "Sair" }
                }
            }
        }
    }
}

// Navigation Link Component
#[component]
fn NavLink(
    to: Route,
    icon: Element,
    label: &'static str,
) -> Element {
    let current_route = use_route::<Route>();
    let is_active = std::mem::discriminant(&to) == std::mem::discriminant(&current_route);
    let font_class = if is_active { "font-bold bg-accent" } else { "" };

    rsx! {
        Link {
            to: to,
            class: "flex items-center justify-start gap-4 px-4 py-2 rounded-full hover:bg-accent transition text-lg w-full {font_class}",
            {icon}
            span {
                "{label}"
            }
        }
    }
}
