use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api::ApiClient;
use super::error::ApiResult;
use crate::utils::validation::FormErrors;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Logged-in user as returned by `/auth/login` and `/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "perfil", default)]
    pub role: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Usuário"
        } else {
            self.name.trim()
        }
    }

    pub fn role_label(&self) -> &'static str {
        match self.role.as_deref() {
            Some("admin") => "Administrador",
            Some("barbeiro") => "Barbeiro",
            Some("cliente") => "Cliente",
            _ => "Usuário",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("email", &self.email, "Email");
        errors.email("email", &self.email);
        errors.require("senha", &self.password, "Senha");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(rename = "usuario", default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct PasswordChangeBody<'a> {
    senha_atual: &'a str,
    nova_senha: &'a str,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("senha_atual", &self.current, "Senha atual");
        errors.min_len("nova_senha", &self.new, MIN_PASSWORD_LEN, "Nova senha");
        if self.new != self.confirmation {
            errors.add("confirmacao", "As senhas não conferem");
        }
        errors.into_result()
    }
}

pub async fn login(api: &ApiClient, credentials: &Credentials) -> ApiResult<LoginResponse> {
    api.post_public("/auth/login", credentials).await
}

pub async fn me(api: &ApiClient) -> ApiResult<User> {
    api.get("/auth/me").await
}

/// A wrong current password answers 401, so no refresh is attempted
pub async fn change_password(api: &ApiClient, change: &PasswordChange) -> ApiResult<Value> {
    let body = PasswordChangeBody {
        senha_atual: &change.current,
        nova_senha: &change.new,
    };
    api.post_checked("/auth/alterar-senha", &body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::testing::*;
    use crate::services::api::SessionStore;
    use crate::services::error::ApiError;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_login_response_accepts_token_alias() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token": "abc", "usuario": {"id": 1, "nome": "Admin", "email": "a@b.com", "perfil": "admin"}}"#,
        )
        .unwrap();
        assert_eq!(response.access_token, "abc");
        assert_eq!(response.refresh_token, None);
        let user = response.user.unwrap();
        assert!(user.active);
        assert_eq!(user.role_label(), "Administrador");
    }

    #[test]
    fn test_login_sends_no_bearer() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("old"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(401, r#"{"erro": "Credenciais inválidas"}"#);

        let credentials = Credentials {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };
        let err = block_on(login(&api, &credentials)).unwrap_err();
        assert_eq!(err.to_string(), "Credenciais inválidas");
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].header("Authorization"), None);
    }

    #[test]
    fn test_password_change_validation() {
        let change = PasswordChange {
            current: String::new(),
            new: "123".to_string(),
            confirmation: "1234".to_string(),
        };
        let errors = change.validate().unwrap_err();
        assert!(errors.has("senha_atual"));
        assert!(errors.has("nova_senha"));
        assert!(errors.has("confirmacao"));
    }

    #[test]
    fn test_wrong_current_password_keeps_session() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), Some("r")));
        let expired = Rc::new(RefCell::new(0));
        let api = client(transport.clone(), session.clone(), expired.clone());
        transport.reply(401, r#"{"erro": "Senha atual incorreta"}"#);

        let change = PasswordChange {
            current: "errada".to_string(),
            new: "novasenha".to_string(),
            confirmation: "novasenha".to_string(),
        };
        let err = block_on(change_password(&api, &change)).unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 401,
                message: "Senha atual incorreta".to_string()
            }
        );
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(*expired.borrow(), 0);
        assert_eq!(session.access_token().as_deref(), Some("t"));
    }
}
