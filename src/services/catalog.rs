//! Barbershop service catalogue (`/servicos`).
//!
//! Services carry a typed `categoria`. Older records encoded the category in
//! the name as `"Categoria: Nome"`; that form is only read, never written.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api::ApiClient;
use super::error::ApiResult;
use crate::utils::format::parse_decimal;
use crate::utils::validation::FormErrors;

pub const MIN_DURATION_MIN: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "duracao_estimada_min", default)]
    pub duration_min: u32,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "popularidade", default)]
    pub popularity: Option<f64>,
}

/// Split `"Barba: Navalha"` into `(Some("Barba"), "Navalha")`
pub fn split_legacy_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((category, rest)) if !category.trim().is_empty() && !rest.trim().is_empty() => {
            (Some(category.trim()), rest.trim())
        }
        _ => (None, name.trim()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popularity {
    High,
    Medium,
    Low,
    New,
}

impl Popularity {
    pub fn from_score(score: Option<f64>) -> Self {
        match score.unwrap_or(0.0) {
            s if s > 75.0 => Self::High,
            s if s > 25.0 => Self::Medium,
            s if s > 0.0 => Self::Low,
            _ => Self::New,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "Alta",
            Self::Medium => "Média",
            Self::Low => "Baixa",
            Self::New => "Novo",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::High => "bg-green-100 text-green-800",
            Self::Medium => "bg-sky-100 text-sky-800",
            Self::Low => "bg-amber-100 text-amber-800",
            Self::New => "bg-muted text-muted-foreground",
        }
    }
}

impl Service {
    /// Typed category, falling back to the legacy name prefix
    pub fn category(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| split_legacy_name(&self.name).0.map(str::to_string))
    }

    pub fn display_name(&self) -> &str {
        if self.category.as_deref().map_or(false, |c| !c.trim().is_empty()) {
            return self.name.trim();
        }
        split_legacy_name(&self.name).1
    }

    pub fn popularity_level(&self) -> Popularity {
        Popularity::from_score(self.popularity)
    }
}

/// `/servicos/` has answered both a bare list and `{ "servicos": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceList {
    Bare(Vec<Service>),
    Wrapped { servicos: Vec<Service> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub duration_min: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "duracao_estimada_min")]
    pub duration_min: u32,
}

impl ServiceForm {
    pub fn from_service(service: &Service) -> Self {
        Self {
            name: service.display_name().to_string(),
            description: service.description.clone().unwrap_or_default(),
            category: service.category().unwrap_or_default(),
            price: format!("{:.2}", service.price),
            duration_min: service.duration_min.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ServicePayload, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("nome", &self.name, "Nome");
        if self.name.contains(':') {
            errors.add("nome", "Use o campo categoria em vez de \"Categoria: Nome\"");
        }

        let price = parse_decimal(&self.price);
        errors.non_negative("preco", price, "Preço");

        let duration = self.duration_min.trim().parse::<u32>().ok();
        match duration {
            Some(d) if d >= MIN_DURATION_MIN => {}
            _ => errors.add(
                "duracao_estimada_min",
                format!("Duração mínima é de {} minutos", MIN_DURATION_MIN),
            ),
        }
        errors.into_result()?;

        let description = self.description.trim();
        let category = self.category.trim();
        Ok(ServicePayload {
            name: self.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            category: (!category.is_empty()).then(|| category.to_string()),
            price: price.unwrap_or_default(),
            duration_min: duration.unwrap_or(MIN_DURATION_MIN),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SavedService {
    #[serde(rename = "servico")]
    service: Service,
}

pub async fn list(api: &ApiClient) -> ApiResult<Vec<Service>> {
    let list: ServiceList = api.get("/servicos/").await?;
    Ok(match list {
        ServiceList::Bare(items) => items,
        ServiceList::Wrapped { servicos } => servicos,
    })
}

pub async fn create(api: &ApiClient, payload: &ServicePayload) -> ApiResult<Service> {
    let saved: SavedService = api.post("/servicos/", payload).await?;
    Ok(saved.service)
}

pub async fn update(api: &ApiClient, id: i64, payload: &ServicePayload) -> ApiResult<Service> {
    let saved: SavedService = api.put(&format!("/servicos/{}", id), payload).await?;
    Ok(saved.service)
}

pub async fn delete(api: &ApiClient, id: i64) -> ApiResult<Value> {
    api.delete(&format!("/servicos/{}", id)).await
}

/// Services whose category (typed or legacy) equals `category`
pub fn filter_by_category<'a>(services: &'a [Service], category: Option<&str>) -> Vec<&'a Service> {
    services
        .iter()
        .filter(|s| match category {
            None => true,
            Some(wanted) => s
                .category()
                .map_or(false, |c| c.eq_ignore_ascii_case(wanted)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, category: Option<&str>) -> Service {
        Service {
            id: 1,
            name: name.to_string(),
            description: None,
            price: 30.0,
            duration_min: 30,
            category: category.map(str::to_string),
            popularity: None,
        }
    }

    #[test]
    fn test_legacy_name_parsing() {
        assert_eq!(split_legacy_name("Barba: Navalha"), (Some("Barba"), "Navalha"));
        assert_eq!(split_legacy_name("Corte"), (None, "Corte"));
        assert_eq!(split_legacy_name(": Corte"), (None, ": Corte"));
        assert_eq!(split_legacy_name("Combo:"), (None, "Combo:"));
    }

    #[test]
    fn test_typed_category_wins() {
        let typed = service("Navalha", Some("Barba"));
        assert_eq!(typed.category().as_deref(), Some("Barba"));
        assert_eq!(typed.display_name(), "Navalha");

        let legacy = service("Cabelo: Degradê", None);
        assert_eq!(legacy.category().as_deref(), Some("Cabelo"));
        assert_eq!(legacy.display_name(), "Degradê");

        let blank = service("Corte", Some("  "));
        assert_eq!(blank.category(), None);
    }

    #[test]
    fn test_filter_by_category() {
        let services = vec![
            service("Navalha", Some("Barba")),
            service("barba: Tradicional", None),
            service("Corte", Some("Cabelo")),
        ];
        assert_eq!(filter_by_category(&services, Some("Barba")).len(), 2);
        assert_eq!(filter_by_category(&services, None).len(), 3);
    }

    #[test]
    fn test_popularity_thresholds() {
        assert_eq!(Popularity::from_score(Some(80.0)), Popularity::High);
        assert_eq!(Popularity::from_score(Some(75.0)), Popularity::Medium);
        assert_eq!(Popularity::from_score(Some(25.0)), Popularity::Low);
        assert_eq!(Popularity::from_score(Some(0.0)), Popularity::New);
        assert_eq!(Popularity::from_score(None).label(), "Novo");
    }

    #[test]
    fn test_both_list_shapes_decode() {
        let bare: ServiceList =
            serde_json::from_str(r#"[{"id": 1, "nome": "Corte", "preco": 40, "duracao_estimada_min": 30}]"#).unwrap();
        let wrapped: ServiceList =
            serde_json::from_str(r#"{"servicos": [{"id": 2, "nome": "Barba", "preco": 25}]}"#).unwrap();
        assert!(matches!(bare, ServiceList::Bare(ref v) if v.len() == 1));
        assert!(matches!(wrapped, ServiceList::Wrapped { ref servicos } if servicos[0].duration_min == 0));
    }

    #[test]
    fn test_form_validation() {
        let form = ServiceForm {
            name: "Barba: Navalha".to_string(),
            price: "-1".to_string(),
            duration_min: "3".to_string(),
            ..ServiceForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("nome"));
        assert!(errors.has("preco"));
        assert!(errors.has("duracao_estimada_min"));

        let ok = ServiceForm {
            name: "Navalha".to_string(),
            category: "Barba".to_string(),
            price: "45,00".to_string(),
            duration_min: "40".to_string(),
            ..ServiceForm::default()
        }
        .validate()
        .unwrap();
        assert_eq!(ok.category.as_deref(), Some("Barba"));
        assert_eq!(ok.duration_min, 40);

        let from_legacy = ServiceForm::from_service(&service("Cabelo: Degradê", None));
        assert_eq!(from_legacy.name, "Degradê");
        assert_eq!(from_legacy.category, "Cabelo");
    }
}
