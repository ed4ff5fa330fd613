//! HTTP client for the B-Manager REST backend.
//!
//! All requests go through [`ApiClient::call`], which attaches the bearer
//! token, performs at most one refresh-and-replay on a 401 and normalises
//! error bodies (`{ "erro": ..., "detalhes": {...} }`) into [`ApiError`].

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::error::{fallback_message, ApiError, ApiResult};

/// Backend base URL, overridable at build time
pub const DEFAULT_API_URL: &str = match option_env!("BMANAGER_API_URL") {
    Some(url) => url,
    None => "/api",
};

const REFRESH_ENDPOINT: &str = "/auth/refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully resolved request handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can deliver an [`ApiRequest`]
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

/// Token storage the client reads from and writes refreshed tokens to
pub trait SessionStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn set_access_token(&self, token: &str);
    fn clear(&self);
}

// =============================================================================
// Browser transport
// =============================================================================

/// Transport backed by `fetch` through gloo-net
pub struct BrowserTransport;

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| ApiError::Network(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    erro: Option<String>,
    #[serde(default)]
    mensagem: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detalhes: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(alias = "token")]
    access_token: String,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn Transport>,
    session: Rc<dyn SessionStore>,
    on_session_expired: Rc<dyn Fn()>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Rc<dyn Transport>,
        session: Rc<dyn SessionStore>,
        on_session_expired: Rc<dyn Fn()>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            session,
            on_session_expired,
        }
    }

    pub fn session(&self) -> &Rc<dyn SessionStore> {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn build_request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
        bearer: Option<String>,
    ) -> ApiRequest {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(token) = bearer {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        ApiRequest {
            method,
            url: self.url(endpoint),
            headers,
            body,
        }
    }

    async fn send_once(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
        include_auth: bool,
    ) -> ApiResult<ApiResponse> {
        let bearer = if include_auth {
            self.session.access_token()
        } else {
            None
        };
        let request = self.build_request(endpoint, method, body, bearer);
        log::debug!("{} {}", method.as_str(), request.url);
        self.transport.send(request).await
    }

    /// Perform a request and return the decoded JSON body.
    ///
    /// A 401 on an authenticated call triggers one refresh; when it succeeds
    /// the original request is replayed exactly once, otherwise the session
    /// is cleared and the expiry callback runs.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        include_auth: bool,
    ) -> ApiResult<Value> {
        let body = body.map(|b| b.to_string());
        let response = self
            .send_once(endpoint, method, body.clone(), include_auth)
            .await?;

        if response.status != 401 || !include_auth {
            return interpret(response);
        }

        log::warn!("{} {} returned 401, refreshing session", method.as_str(), endpoint);
        if !self.refresh_access_token().await {
            self.expire_session();
            return Err(ApiError::SessionExpired);
        }

        let replay = self.send_once(endpoint, method, body, include_auth).await?;
        if replay.status == 401 {
            log::warn!("Replay of {} still unauthorized", endpoint);
            self.expire_session();
            return Err(ApiError::SessionExpired);
        }
        interpret(replay)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Returns false when there is no refresh token or the server rejects it.
    pub async fn refresh_access_token(&self) -> bool {
        let Some(refresh_token) = self.session.refresh_token() else {
            log::info!("No refresh token stored, cannot refresh session");
            return false;
        };

        let request =
            self.build_request(REFRESH_ENDPOINT, Method::Post, None, Some(refresh_token));
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Token refresh failed: {}", e);
                return false;
            }
        };

        if !response.is_success() {
            log::warn!("Token refresh rejected with status {}", response.status);
            return false;
        }

        match serde_json::from_str::<RefreshResponse>(&response.body) {
            Ok(refreshed) => {
                self.session.set_access_token(&refreshed.access_token);
                log::info!("Access token refreshed");
                true
            }
            Err(e) => {
                log::error!("Malformed refresh response: {}", e);
                false
            }
        }
    }

    fn expire_session(&self) {
        self.session.clear();
        (self.on_session_expired)();
    }

    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
        include_auth: bool,
    ) -> ApiResult<T> {
        let value = self
            .call(endpoint, method, body.as_ref(), include_auth)
            .await?;
        serde_json::from_value(value).map_err(|e| {
            log::error!("Failed to decode response from {}: {}", endpoint, e);
            ApiError::Decode(e.to_string())
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(endpoint, Method::Get, None, true).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(endpoint, Method::Post, Some(body), true).await
    }

    /// POST without the Authorization header (login)
    pub async fn post_public<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(endpoint, Method::Post, Some(body), false).await
    }

    /// Authenticated POST whose 401 means "wrong credentials", not an
    /// expired session: no refresh, no replay.
    pub async fn post_checked<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?.to_string();
        let response = self
            .send_once(endpoint, Method::Post, Some(body), true)
            .await?;
        let value = interpret(response)?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(endpoint, Method::Put, Some(body), true).await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResult<Value> {
        self.call(endpoint, Method::Delete, None, true).await
    }
}

/// Map a raw response onto the JSON value or an [`ApiError`]
fn interpret(response: ApiResponse) -> ApiResult<Value> {
    if response.is_success() {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&response.body).map_err(ApiError::from);
    }

    let parsed: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
    let message = parsed
        .erro
        .or(parsed.mensagem)
        .or(parsed.message)
        .unwrap_or_else(|| fallback_message(response.status));

    let fields: BTreeMap<String, String> = parsed
        .detalhes
        .unwrap_or_default()
        .into_iter()
        .map(|(field, value)| (field, flatten_detail(&value)))
        .collect();

    if response.status == 422 || !fields.is_empty() {
        log::warn!("Validation error ({}): {}", response.status, message);
        return Err(ApiError::Validation { message, fields });
    }

    log::warn!("Request failed ({}): {}", response.status, message);
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

/// Field details may be a string, a list of strings or a nested object
fn flatten_detail(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(flatten_detail)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(map) => map
            .iter()
            .map(|(key, inner)| format!("{}: {}", key, flatten_detail(inner)))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build a query string, skipping empty values
pub fn query_string(params: &[(&str, String)]) -> String {
    let encoded: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    if encoded.is_empty() {
        String::new()
    } else {
        format!("?{}", encoded.join("&"))
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory doubles for exercising the client without a browser

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    pub struct MemorySession {
        pub access: RefCell<Option<String>>,
        pub refresh: RefCell<Option<String>>,
    }

    impl MemorySession {
        pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
            Self {
                access: RefCell::new(access.map(str::to_string)),
                refresh: RefCell::new(refresh.map(str::to_string)),
            }
        }
    }

    impl SessionStore for MemorySession {
        fn access_token(&self) -> Option<String> {
            self.access.borrow().clone()
        }
        fn refresh_token(&self) -> Option<String> {
            self.refresh.borrow().clone()
        }
        fn set_access_token(&self, token: &str) {
            *self.access.borrow_mut() = Some(token.to_string());
        }
        fn clear(&self) {
            *self.access.borrow_mut() = None;
            *self.refresh.borrow_mut() = None;
        }
    }

    /// Replies with queued responses and records every request
    #[derive(Default)]
    pub struct ScriptedTransport {
        pub replies: RefCell<VecDeque<ApiResult<ApiResponse>>>,
        pub requests: RefCell<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub fn reply(&self, status: u16, body: &str) {
            self.replies.borrow_mut().push_back(Ok(ApiResponse {
                status,
                body: body.to_string(),
            }));
        }

        pub fn fail(&self, message: &str) {
            self.replies
                .borrow_mut()
                .push_back(Err(ApiError::Network(message.to_string())));
        }

        pub fn sent(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
            self.requests.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_string())))
        }
    }

    pub fn client(
        transport: Rc<ScriptedTransport>,
        session: Rc<MemorySession>,
        expired: Rc<RefCell<u32>>,
    ) -> ApiClient {
        ApiClient::new(
            "/api",
            transport,
            session,
            Rc::new(move || *expired.borrow_mut() += 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;

    fn setup(
        access: Option<&str>,
        refresh: Option<&str>,
    ) -> (ApiClient, Rc<ScriptedTransport>, Rc<MemorySession>, Rc<RefCell<u32>>) {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(access, refresh));
        let expired = Rc::new(RefCell::new(0));
        let api = client(transport.clone(), session.clone(), expired.clone());
        (api, transport, session, expired)
    }

    #[test]
    fn test_attaches_bearer_token() {
        let (api, transport, _, _) = setup(Some("abc"), None);
        transport.reply(200, r#"{"ok": true}"#);

        let value = block_on(api.call("/clientes/", Method::Get, None, true)).unwrap();
        assert_eq!(value, json!({"ok": true}));

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "/api/clientes/");
        assert_eq!(sent[0].header("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_public_call_has_no_authorization() {
        let (api, transport, _, _) = setup(Some("abc"), None);
        transport.reply(200, "{}");

        block_on(api.call("/auth/login", Method::Post, Some(&json!({})), false)).unwrap();
        assert_eq!(transport.sent()[0].header("Authorization"), None);
    }

    #[test]
    fn test_401_refresh_then_single_replay() {
        let (api, transport, session, expired) = setup(Some("old"), Some("refresh-1"));
        transport.reply(401, r#"{"erro": "Token expirado"}"#);
        transport.reply(200, r#"{"access_token": "new"}"#);
        transport.reply(200, r#"{"items": []}"#);

        let body = json!({"nome": "Ana"});
        let value = block_on(api.call("/clientes/", Method::Post, Some(&body), true)).unwrap();
        assert_eq!(value, json!({"items": []}));

        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].url, "/api/auth/refresh");
        assert_eq!(sent[1].header("Authorization"), Some("Bearer refresh-1"));
        // replayed once, same body, new token
        assert_eq!(sent[2].url, sent[0].url);
        assert_eq!(sent[2].body, sent[0].body);
        assert_eq!(sent[2].header("Authorization"), Some("Bearer new"));
        assert_eq!(session.access_token().as_deref(), Some("new"));
        assert_eq!(*expired.borrow(), 0);
    }

    #[test]
    fn test_refresh_accepts_token_alias() {
        let (api, transport, session, _) = setup(Some("old"), Some("r"));
        transport.reply(200, r#"{"token": "aliased"}"#);

        assert!(block_on(api.refresh_access_token()));
        assert_eq!(session.access_token().as_deref(), Some("aliased"));
    }

    #[test]
    fn test_failed_refresh_clears_session() {
        let (api, transport, session, expired) = setup(Some("old"), Some("bad"));
        transport.reply(401, "{}");
        transport.reply(401, r#"{"erro": "Refresh inválido"}"#);

        let result = block_on(api.call("/vendas/", Method::Get, None, true));
        assert_eq!(result, Err(ApiError::SessionExpired));
        assert_eq!(transport.sent().len(), 2);
        assert_eq!(session.access_token(), None);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(*expired.borrow(), 1);
    }

    #[test]
    fn test_401_without_refresh_token_does_not_call_refresh() {
        let (api, transport, _, expired) = setup(Some("old"), None);
        transport.reply(401, "{}");

        let result = block_on(api.call("/vendas/", Method::Get, None, true));
        assert_eq!(result, Err(ApiError::SessionExpired));
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(*expired.borrow(), 1);
    }

    #[test]
    fn test_second_401_is_not_retried_again() {
        let (api, transport, _, expired) = setup(Some("old"), Some("r"));
        transport.reply(401, "{}");
        transport.reply(200, r#"{"access_token": "new"}"#);
        transport.reply(401, "{}");

        let result = block_on(api.call("/vendas/", Method::Get, None, true));
        assert_eq!(result, Err(ApiError::SessionExpired));
        assert_eq!(transport.sent().len(), 3);
        assert_eq!(*expired.borrow(), 1);
    }

    #[test]
    fn test_422_surfaces_message_and_fields() {
        let (api, transport, _, _) = setup(Some("t"), None);
        transport.reply(
            422,
            r#"{"erro": "Dados inválidos", "detalhes": {"email": ["Not a valid email.", "Too long."]}}"#,
        );

        let err = block_on(api.call("/clientes/", Method::Post, None, true)).unwrap_err();
        match err {
            ApiError::Validation { message, fields } => {
                assert_eq!(message, "Dados inválidos");
                assert_eq!(fields["email"], "Not a valid email.; Too long.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_400_with_details_maps_to_validation() {
        let (api, transport, _, _) = setup(Some("t"), None);
        transport.reply(400, r#"{"erro": "Dados inválidos", "detalhes": {"preco": "obrigatório"}}"#);

        let err = block_on(api.call("/produtos/", Method::Post, None, true)).unwrap_err();
        assert_eq!(err.field_errors()["preco"], "obrigatório");
    }

    #[test]
    fn test_other_errors_use_server_or_fallback_message() {
        let (api, transport, _, _) = setup(Some("t"), None);
        transport.reply(404, r#"{"erro": "Cliente não encontrado"}"#);
        transport.reply(500, "<html>boom</html>");

        let first = block_on(api.call("/clientes/9", Method::Get, None, true)).unwrap_err();
        assert_eq!(
            first,
            ApiError::Http { status: 404, message: "Cliente não encontrado".to_string() }
        );

        let second = block_on(api.call("/clientes/9", Method::Get, None, true)).unwrap_err();
        assert_eq!(second, ApiError::Http { status: 500, message: fallback_message(500) });
    }

    #[test]
    fn test_network_failure_is_reported() {
        let (api, transport, _, _) = setup(Some("t"), None);
        transport.fail("offline");

        let err = block_on(api.call("/clientes/", Method::Get, None, true)).unwrap_err();
        assert_eq!(err, ApiError::Network("offline".to_string()));
    }

    #[test]
    fn test_empty_success_body_is_null() {
        let (api, transport, _, _) = setup(Some("t"), None);
        transport.reply(204, "");
        assert_eq!(block_on(api.delete("/clientes/1")).unwrap(), Value::Null);
    }

    #[test]
    fn test_query_string_skips_empty_values() {
        let qs = query_string(&[
            ("busca", "João Silva".to_string()),
            ("status", String::new()),
            ("pagina", "2".to_string()),
        ]);
        assert_eq!(qs, "?busca=Jo%C3%A3o%20Silva&pagina=2");
        assert_eq!(query_string(&[("busca", String::new())]), "");
    }
}
