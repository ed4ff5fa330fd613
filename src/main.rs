#![allow(non_snake_case)]

use dioxus::prelude::*;
use stores::{auth_store, category_store, settings_store};

// Modules
mod components;
mod context;
mod hooks;
mod routes;
mod services;
mod stores;
mod utils;

use components::toast::ToastProvider;
use context::AppContext;

fn main() {
    // Initialize panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    }

    log::info!("Starting B-Manager web client");

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(AppContext::browser);

    // Restore session and local preferences before the first guard runs
    use_hook(|| {
        auth_store::init_auth();
        settings_store::init_settings();
        category_store::init_categories();
    });

    rsx! {
        ToastProvider {
            Router::<routes::Route> {}
        }
    }
}
