use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};

use crate::services::api::{ApiClient, SessionStore};
use crate::services::auth::{self, Credentials, LoginResponse, User};
use crate::services::error::ApiResult;
use crate::utils::jwt;

/// Route the app sends unauthenticated users to
pub const LOGIN_ROUTE: &str = match option_env!("BMANAGER_LOGIN_ROUTE") {
    Some(route) => route,
    None => "/login",
};

const STORAGE_KEY_TOKEN: &str = "token";
const STORAGE_KEY_REFRESH: &str = "refresh_token";
const STORAGE_KEY_USER: &str = "usuario";

/// Authentication state shown by the layout
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// Global authentication state
pub static AUTH_STATE: GlobalSignal<AuthState> = Signal::global(AuthState::default);

/// Session kept in `localStorage` under `token`, `refresh_token` and `usuario`
pub struct BrowserSession;

impl SessionStore for BrowserSession {
    fn access_token(&self) -> Option<String> {
        LocalStorage::get::<String>(STORAGE_KEY_TOKEN).ok()
    }

    fn refresh_token(&self) -> Option<String> {
        LocalStorage::get::<String>(STORAGE_KEY_REFRESH).ok()
    }

    fn set_access_token(&self, token: &str) {
        if let Err(e) = LocalStorage::set(STORAGE_KEY_TOKEN, token) {
            log::error!("Failed to store access token: {}", e);
        }
    }

    fn clear(&self) {
        LocalStorage::delete(STORAGE_KEY_TOKEN);
        LocalStorage::delete(STORAGE_KEY_REFRESH);
        LocalStorage::delete(STORAGE_KEY_USER);
    }
}

impl BrowserSession {
    pub fn stored_user(&self) -> Option<User> {
        LocalStorage::get::<User>(STORAGE_KEY_USER).ok()
    }

    fn save_login(&self, response: &LoginResponse) {
        self.set_access_token(&response.access_token);
        match &response.refresh_token {
            Some(refresh) => {
                if let Err(e) = LocalStorage::set(STORAGE_KEY_REFRESH, refresh) {
                    log::error!("Failed to store refresh token: {}", e);
                }
            }
            None => LocalStorage::delete(STORAGE_KEY_REFRESH),
        }
        if let Some(user) = &response.user {
            if let Err(e) = LocalStorage::set(STORAGE_KEY_USER, user) {
                log::error!("Failed to store user profile: {}", e);
            }
        }
    }
}

// =============================================================================
// Session checks
// =============================================================================

/// Local verdict on the stored access token; the backend is not contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    Valid,
    Missing,
    Malformed { can_refresh: bool },
    Expired { can_refresh: bool },
}

impl SessionCheck {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionCheck::Valid)
    }
}

pub fn check_session(session: &dyn SessionStore, now: DateTime<Utc>) -> SessionCheck {
    let Some(token) = session.access_token().filter(|t| !t.is_empty()) else {
        return SessionCheck::Missing;
    };

    let can_refresh = session.refresh_token().is_some_and(|t| !t.is_empty());
    match jwt::decode_claims(&token) {
        Ok(claims) if jwt::is_expired(&claims, now) => SessionCheck::Expired { can_refresh },
        Ok(_) => SessionCheck::Valid,
        Err(e) => {
            log::warn!("Stored token is malformed: {}", e);
            SessionCheck::Malformed { can_refresh }
        }
    }
}

pub fn verify_authentication(session: &dyn SessionStore, now: DateTime<Utc>) -> bool {
    check_session(session, now).is_authenticated()
}

/// What a page should do with the current session when it loads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    Stay,
    RedirectHome,
    RedirectLogin,
    RefreshAndReload,
}

pub fn guard_page_load(check: SessionCheck, on_login_route: bool) -> GuardAction {
    match (check, on_login_route) {
        (SessionCheck::Valid, true) => GuardAction::RedirectHome,
        (_, true) => GuardAction::Stay,
        (SessionCheck::Valid, false) => GuardAction::Stay,
        (SessionCheck::Expired { can_refresh: true }, false)
        | (SessionCheck::Malformed { can_refresh: true }, false) => GuardAction::RefreshAndReload,
        (_, false) => GuardAction::RedirectLogin,
    }
}

/// Run the page-load guard. A refresh is only attempted when a refresh
/// token exists; the returned action tells the caller where to go next.
pub async fn run_guard(api: &ApiClient, on_login_route: bool, now: DateTime<Utc>) -> GuardAction {
    let check = check_session(api.session().as_ref(), now);
    match guard_page_load(check, on_login_route) {
        GuardAction::RefreshAndReload => {
            if api.refresh_access_token().await {
                GuardAction::RefreshAndReload
            } else {
                log::warn!("Session refresh failed on page load");
                api.session().clear();
                GuardAction::RedirectLogin
            }
        }
        other => other,
    }
}

// =============================================================================
// Login / logout
// =============================================================================

/// Load the stored user into [`AUTH_STATE`]
pub fn init_auth() {
    let session = BrowserSession;
    let authenticated = verify_authentication(&session, Utc::now());
    *AUTH_STATE.write() = AuthState {
        user: session.stored_user(),
        is_authenticated: authenticated,
    };
    log::info!("Auth initialised (authenticated: {})", authenticated);
}

pub async fn login(api: &ApiClient, credentials: &Credentials) -> ApiResult<Option<User>> {
    log::info!("Logging in as {}", credentials.email);
    let response = auth::login(api, credentials).await?;
    BrowserSession.save_login(&response);

    *AUTH_STATE.write() = AuthState {
        user: response.user.clone(),
        is_authenticated: true,
    };
    log::info!("Login successful");
    Ok(response.user)
}

/// Forget the session locally
pub fn clear_auth() {
    BrowserSession.clear();
    *AUTH_STATE.write() = AuthState::default();
}

pub fn logout() {
    log::info!("Logging out");
    clear_auth();
    redirect_to_login();
}

/// Full page navigation to the login route
pub fn redirect_to_login() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(LOGIN_ROUTE) {
                log::error!("Failed to redirect to login: {:?}", e);
            }
        }
    }
}

pub fn reload_page() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().reload() {
                log::error!("Failed to reload page: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::testing::*;
    use crate::utils::jwt::make_token;
    use chrono::TimeZone;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn expired_token() -> String {
        make_token(r#"{"exp": 1600000000}"#)
    }

    fn valid_token() -> String {
        make_token(r#"{"exp": 1800000000, "perfil": "admin"}"#)
    }

    #[test]
    fn test_check_session_variants() {
        let missing = MemorySession::with_tokens(None, None);
        assert_eq!(check_session(&missing, now()), SessionCheck::Missing);

        let malformed = MemorySession::with_tokens(Some("not-a-jwt"), None);
        assert_eq!(
            check_session(&malformed, now()),
            SessionCheck::Malformed { can_refresh: false }
        );
        let recoverable = MemorySession::with_tokens(Some("not-a-jwt"), Some("r"));
        assert_eq!(
            check_session(&recoverable, now()),
            SessionCheck::Malformed { can_refresh: true }
        );

        let valid = MemorySession::with_tokens(Some(&valid_token()), None);
        assert_eq!(check_session(&valid, now()), SessionCheck::Valid);

        let expired = MemorySession::with_tokens(Some(&expired_token()), Some("r"));
        assert_eq!(
            check_session(&expired, now()),
            SessionCheck::Expired { can_refresh: true }
        );
        assert!(!verify_authentication(&expired, now()));
    }

    #[test]
    fn test_guard_matrix() {
        assert_eq!(guard_page_load(SessionCheck::Valid, true), GuardAction::RedirectHome);
        assert_eq!(guard_page_load(SessionCheck::Missing, true), GuardAction::Stay);
        assert_eq!(guard_page_load(SessionCheck::Valid, false), GuardAction::Stay);
        assert_eq!(
            guard_page_load(SessionCheck::Expired { can_refresh: true }, false),
            GuardAction::RefreshAndReload
        );
        assert_eq!(
            guard_page_load(SessionCheck::Expired { can_refresh: false }, false),
            GuardAction::RedirectLogin
        );
        assert_eq!(
            guard_page_load(SessionCheck::Malformed { can_refresh: false }, false),
            GuardAction::RedirectLogin
        );
        assert_eq!(
            guard_page_load(SessionCheck::Malformed { can_refresh: true }, false),
            GuardAction::RefreshAndReload
        );
    }

    #[test]
    fn test_expired_without_refresh_token_makes_no_request() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some(&expired_token()), None));
        let api = client(transport.clone(), session.clone(), Rc::new(RefCell::new(0)));

        assert!(!verify_authentication(session.as_ref(), now()));
        let action = block_on(run_guard(&api, false, now()));
        assert_eq!(action, GuardAction::RedirectLogin);
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_expired_with_refresh_token_refreshes() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some(&expired_token()), Some("r")));
        let api = client(transport.clone(), session.clone(), Rc::new(RefCell::new(0)));
        transport.reply(200, r#"{"access_token": "fresh"}"#);

        let action = block_on(run_guard(&api, false, now()));
        assert_eq!(action, GuardAction::RefreshAndReload);
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(session.access_token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_malformed_token_with_refresh_token_refreshes() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("not-a-jwt"), Some("r")));
        let api = client(transport.clone(), session.clone(), Rc::new(RefCell::new(0)));
        transport.reply(200, r#"{"access_token": "fresh"}"#);

        let action = block_on(run_guard(&api, false, now()));
        assert_eq!(action, GuardAction::RefreshAndReload);
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(session.access_token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_failed_refresh_clears_session() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some(&expired_token()), Some("r")));
        let api = client(transport.clone(), session.clone(), Rc::new(RefCell::new(0)));
        transport.reply(401, r#"{"erro": "Token expirado"}"#);

        let action = block_on(run_guard(&api, false, now()));
        assert_eq!(action, GuardAction::RedirectLogin);
        assert_eq!(session.access_token(), None);
    }
}
