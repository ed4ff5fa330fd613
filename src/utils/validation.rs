//! Client-side form validation shared by every CRUD page.
//!
//! Validators fill a [`FormErrors`] map keyed by the backend field name so
//! that local errors and server `detalhes` land on the same input.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::services::error::ApiError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// Field name -> message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Overlay per-field messages from a server validation error
    pub fn merge_server(&mut self, err: &ApiError) {
        for (field, message) in err.field_errors() {
            self.0.insert(field, message);
        }
    }

    pub fn from_server(err: &ApiError) -> Self {
        let mut errors = Self::new();
        errors.merge_server(err);
        errors
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    // ========================================================================
    // Field checks
    // ========================================================================

    pub fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{} é obrigatório", label));
        }
    }

    pub fn require_some<T>(&mut self, field: &str, value: &Option<T>, message: &str) {
        if value.is_none() {
            self.add(field, message);
        }
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize, label: &str) {
        if value.trim().chars().count() < min {
            self.add(field, format!("{} deve ter pelo menos {} caracteres", label, min));
        }
    }

    /// Optional e-mail: empty is accepted
    pub fn email(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && !is_valid_email(value) {
            self.add(field, "Email inválido");
        }
    }

    pub fn phone(&mut self, field: &str, value: &str) {
        if !is_valid_phone(value) {
            self.add(field, "Telefone inválido. Use DDD + número");
        }
    }

    pub fn positive(&mut self, field: &str, value: Option<f64>, label: &str) {
        match value {
            Some(v) if v > 0.0 => {}
            _ => self.add(field, format!("{} deve ser maior que zero", label)),
        }
    }

    pub fn non_negative(&mut self, field: &str, value: Option<f64>, label: &str) {
        match value {
            Some(v) if v >= 0.0 => {}
            _ => self.add(field, format!("{} não pode ser negativo", label)),
        }
    }

    pub fn range(&mut self, field: &str, value: Option<f64>, min: f64, max: f64, label: &str) {
        match value {
            Some(v) if v >= min && v <= max => {}
            _ => self.add(field, format!("{} deve estar entre {} e {}", label, min, max)),
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Brazilian phone: 10 or 11 digits once formatting is stripped
pub fn is_valid_phone(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=11).contains(&digits)
}

/// Format the digits of a phone as `(11) 98765-4321`
pub fn format_phone(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_email() {
        let mut errors = FormErrors::new();
        errors.require("nome", "   ", "Nome");
        errors.email("email", "sem-arroba");
        errors.email("email_opcional", "");
        assert_eq!(errors.get("nome"), Some("Nome é obrigatório"));
        assert_eq!(errors.get("email"), Some("Email inválido"));
        assert!(!errors.has("email_opcional"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_first_message_wins() {
        let mut errors = FormErrors::new();
        errors.add("preco", "primeiro");
        errors.add("preco", "segundo");
        assert_eq!(errors.get("preco"), Some("primeiro"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("1133334444"));
        assert!(!is_valid_phone("12345"));
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
    }

    #[test]
    fn test_numeric_rules() {
        let mut errors = FormErrors::new();
        errors.positive("preco", Some(0.0), "Preço");
        errors.non_negative("estoque", Some(0.0), "Estoque");
        errors.range("comissao", Some(120.0), 0.0, 100.0, "Comissão");
        errors.positive("valor", None, "Valor");
        assert!(errors.has("preco"));
        assert!(!errors.has("estoque"));
        assert!(errors.has("comissao"));
        assert!(errors.has("valor"));
    }

    #[test]
    fn test_merge_server_errors_overrides_local() {
        let mut fields = BTreeMap::new();
        fields.insert("telefone".to_string(), "Telefone já cadastrado".to_string());
        let err = ApiError::Validation {
            message: "Dados inválidos".to_string(),
            fields,
        };

        let mut errors = FormErrors::new();
        errors.add("telefone", "local");
        errors.merge_server(&err);
        assert_eq!(errors.get("telefone"), Some("Telefone já cadastrado"));

        let plain = ApiError::Http { status: 500, message: "x".to_string() };
        assert!(FormErrors::from_server(&plain).is_empty());
    }
}
