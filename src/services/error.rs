//! API error types
//!
//! Every backend failure is normalised into [`ApiError`] so that pages can
//! decide between an inline message, a toast or field highlighting.

use std::collections::BTreeMap;
use std::fmt;

/// Error returned by every call made through [`super::api::ApiClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // ==========================================================================
    // Transport
    // ==========================================================================
    /// The request never produced an HTTP response
    Network(String),

    // ==========================================================================
    // Session
    // ==========================================================================
    /// 401 that could not be recovered by refreshing the access token
    SessionExpired,

    // ==========================================================================
    // Server responses
    // ==========================================================================
    /// 422 (or any response carrying `detalhes`) with per-field messages
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },
    /// Any other non-2xx response
    Http { status: u16, message: String },

    // ==========================================================================
    // Payload
    // ==========================================================================
    /// Body could not be encoded or decoded as the expected JSON shape
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Falha de conexão com o servidor: {}", msg),
            Self::SessionExpired => write!(f, "Sua sessão expirou. Faça login novamente."),
            Self::Validation { message, .. } => write!(f, "{}", message),
            Self::Http { message, .. } => write!(f, "{}", message),
            Self::Decode(msg) => write!(f, "Resposta inválida do servidor: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Per-field messages sent by the server, empty for other variants
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            Self::Validation { fields, .. } => fields.clone(),
            _ => BTreeMap::new(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Validation { .. } => Some(422),
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Generic message used when the server sends no `erro` field
pub fn fallback_message(status: u16) -> String {
    match status {
        400 => "Requisição inválida".to_string(),
        403 => "Você não tem permissão para realizar esta ação".to_string(),
        404 => "Recurso não encontrado".to_string(),
        409 => "Conflito com o estado atual do registro".to_string(),
        500..=599 => format!("Erro interno do servidor ({})", status),
        _ => format!("Erro na requisição ({})", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_server_message() {
        let err = ApiError::Http {
            status: 400,
            message: "Telefone já cadastrado".to_string(),
        };
        assert_eq!(err.to_string(), "Telefone já cadastrado");
    }

    #[test]
    fn test_field_errors_only_for_validation() {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), "Email inválido".to_string());
        let err = ApiError::Validation {
            message: "Dados inválidos".to_string(),
            fields: fields.clone(),
        };
        assert_eq!(err.field_errors(), fields);
        assert!(ApiError::SessionExpired.field_errors().is_empty());
    }

    #[test]
    fn test_fallback_message_by_status() {
        assert_eq!(fallback_message(404), "Recurso não encontrado");
        assert!(fallback_message(503).contains("503"));
        assert!(ApiError::Http { status: 404, message: String::new() }.is_not_found());
    }
}
