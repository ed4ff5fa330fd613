/// Application Context
///
/// Holds the API client and accessors to the global stores. Created once in
/// `App` and handed to every page through Dioxus context, so pages never
/// build their own client.
use dioxus::prelude::*;
use std::rc::Rc;

use crate::services::api::{ApiClient, BrowserTransport, DEFAULT_API_URL};
use crate::services::auth::User;
use crate::stores::auth_store::{self, BrowserSession};
use crate::stores::settings_store;

#[derive(Clone)]
pub struct AppContext {
    api: ApiClient,
}

impl AppContext {
    /// Browser context: fetch transport, `localStorage` session and a
    /// redirect to the login route when the session cannot be recovered
    pub fn browser() -> Self {
        let api = ApiClient::new(
            DEFAULT_API_URL,
            Rc::new(BrowserTransport),
            Rc::new(BrowserSession),
            Rc::new(|| {
                log::warn!("Session expired, redirecting to login");
                *auth_store::AUTH_STATE.write() = auth_store::AuthState::default();
                auth_store::redirect_to_login();
            }),
        );
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ============================================================================
    // Authentication & User
    // ============================================================================

    pub fn current_user(&self) -> Option<User> {
        auth_store::AUTH_STATE.read().user.clone()
    }

    pub fn user_name(&self) -> String {
        self.current_user()
            .map(|u| u.display_name().to_string())
            .unwrap_or_else(|| "Usuário".to_string())
    }

    pub fn is_authenticated(&self) -> bool {
        auth_store::AUTH_STATE.read().is_authenticated
    }

    // ============================================================================
    // Preferences
    // ============================================================================

    pub fn settings(&self) -> settings_store::AppSettings {
        settings_store::SETTINGS.read().clone()
    }
}

/// Shorthand for `use_context::<AppContext>()`
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>()
}
