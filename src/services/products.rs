use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api::{query_string, ApiClient};
use super::error::ApiResult;
use super::page::{ListQuery, Page};
use crate::utils::format::parse_decimal;
use crate::utils::validation::FormErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "codigo", default)]
    pub code: Option<String>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "unidade_medida", default)]
    pub unit: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "preco_custo", default)]
    pub cost_price: Option<f64>,
    #[serde(rename = "quantidade_estoque", default)]
    pub stock: i64,
    #[serde(rename = "estoque_minimo", default)]
    pub min_stock: i64,
    #[serde(rename = "imagem_url", default)]
    pub image_url: Option<String>,
}

impl Product {
    pub fn available_stock(&self) -> u32 {
        u32::try_from(self.stock.max(0)).unwrap_or(u32::MAX)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    pub fn stock_label(&self) -> &'static str {
        if self.stock <= 0 {
            "Sem estoque"
        } else if self.is_low_stock() {
            "Estoque baixo"
        } else {
            "Em estoque"
        }
    }

    /// Gross margin over cost, when a cost is known
    pub fn margin_percent(&self) -> Option<f64> {
        match self.cost_price {
            Some(cost) if cost > 0.0 => Some((self.price - cost) / cost * 100.0),
            _ => None,
        }
    }
}

/// Raw values typed into the product modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub unit: String,
    pub price: String,
    pub cost_price: String,
    pub stock: String,
    pub min_stock: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    #[serde(rename = "codigo", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "marca", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "unidade_medida")]
    pub unit: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "preco_custo", skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(rename = "quantidade_estoque")]
    pub stock: i64,
    #[serde(rename = "estoque_minimo")]
    pub min_stock: i64,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_count(value: &str) -> Option<i64> {
    if value.trim().is_empty() {
        return Some(0);
    }
    value.trim().parse::<i64>().ok()
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            code: product.code.clone().unwrap_or_default(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            brand: product.brand.clone().unwrap_or_default(),
            unit: product.unit.clone().unwrap_or_default(),
            price: format!("{:.2}", product.price),
            cost_price: product.cost_price.map(|c| format!("{:.2}", c)).unwrap_or_default(),
            stock: product.stock.to_string(),
            min_stock: product.min_stock.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ProductPayload, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("nome", &self.name, "Nome");
        errors.min_len("nome", &self.name, 2, "Nome");

        let price = parse_decimal(&self.price);
        errors.positive("preco", price, "Preço de venda");

        let cost_price = parse_decimal(&self.cost_price);
        if optional(&self.cost_price).is_some() {
            errors.non_negative("preco_custo", cost_price, "Preço de custo");
        }

        let stock = parse_count(&self.stock);
        errors.non_negative("quantidade_estoque", stock.map(|v| v as f64), "Estoque");
        let min_stock = parse_count(&self.min_stock);
        errors.non_negative("estoque_minimo", min_stock.map(|v| v as f64), "Estoque mínimo");

        errors.into_result()?;

        Ok(ProductPayload {
            code: optional(&self.code),
            name: self.name.trim().to_string(),
            description: optional(&self.description),
            category: optional(&self.category),
            brand: optional(&self.brand),
            unit: optional(&self.unit).unwrap_or_else(|| "unidade".to_string()),
            price: price.unwrap_or_default(),
            cost_price,
            stock: stock.unwrap_or_default(),
            min_stock: min_stock.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMovementKind {
    Entrada,
    Saida,
    Ajuste,
}

impl StockMovementKind {
    pub const ALL: [StockMovementKind; 3] = [Self::Entrada, Self::Saida, Self::Ajuste];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Saida => "saida",
            Self::Ajuste => "ajuste",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "saida" => Self::Saida,
            "ajuste" => Self::Ajuste,
            _ => Self::Entrada,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Entrada => "Entrada",
            Self::Saida => "Saída",
            Self::Ajuste => "Ajuste (definir quantidade)",
        }
    }

    /// Stock after applying `quantity` of this movement
    pub fn apply(&self, current: i64, quantity: i64) -> i64 {
        match self {
            Self::Entrada => current + quantity,
            Self::Saida => current - quantity,
            Self::Ajuste => quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockMovement {
    pub tipo: StockMovementKind,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "motivo", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StockMovement {
    /// Check a movement against the current stock before sending it
    pub fn validate(&self, current_stock: i64) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.quantity == 0 {
            errors.add("quantidade", "Informe uma quantidade maior que zero");
        }
        if self.tipo == StockMovementKind::Saida && i64::from(self.quantity) > current_stock {
            errors.add(
                "quantidade",
                format!("Saída maior que o estoque atual ({})", current_stock),
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SavedProduct {
    #[serde(rename = "produto")]
    product: Product,
}

pub async fn list(api: &ApiClient, query: &ListQuery) -> ApiResult<Page<Product>> {
    api.get(&format!("/produtos/{}", query.to_query())).await
}

pub async fn search(api: &ApiClient, term: &str) -> ApiResult<Vec<Product>> {
    let query = ListQuery {
        search: term.to_string(),
        per_page: 20,
        ..ListQuery::default()
    };
    Ok(list(api, &query).await?.items)
}

pub async fn get(api: &ApiClient, id: i64) -> ApiResult<Product> {
    api.get(&format!("/produtos/{}", id)).await
}

pub async fn create(api: &ApiClient, payload: &ProductPayload) -> ApiResult<Product> {
    let saved: SavedProduct = api.post("/produtos/", payload).await?;
    Ok(saved.product)
}

pub async fn update(api: &ApiClient, id: i64, payload: &ProductPayload) -> ApiResult<Product> {
    let saved: SavedProduct = api.put(&format!("/produtos/{}", id), payload).await?;
    Ok(saved.product)
}

pub async fn delete(api: &ApiClient, id: i64) -> ApiResult<Value> {
    api.delete(&format!("/produtos/{}", id)).await
}

pub async fn adjust_stock(api: &ApiClient, id: i64, movement: &StockMovement) -> ApiResult<Product> {
    let saved: SavedProduct = api.post(&format!("/produtos/{}/estoque", id), movement).await?;
    Ok(saved.product)
}

pub async fn low_stock(api: &ApiClient, limit: u32) -> ApiResult<Vec<Product>> {
    let qs = query_string(&[("limite", limit.to_string())]);
    api.get(&format!("/produtos/estoque-baixo{}", qs)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Pomada Modeladora".to_string(),
            price: "35,90".to_string(),
            stock: "12".to_string(),
            min_stock: "3".to_string(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_decode_product() {
        let json = r#"{"id": 4, "codigo": "P-04", "nome": "Gel", "preco": 19.9,
            "preco_custo": 8.0, "quantidade_estoque": 2, "estoque_minimo": 5, "categoria": null}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.code.as_deref(), Some("P-04"));
        assert!(product.is_low_stock());
        assert_eq!(product.stock_label(), "Estoque baixo");
        assert!((product.margin_percent().unwrap() - 148.75).abs() < 1e-9);
    }

    #[test]
    fn test_available_stock_saturates() {
        let json = r#"{"id": 5, "nome": "Pomada", "preco": 30, "quantidade_estoque": 5000000000}"#;
        let mut product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.available_stock(), u32::MAX);

        product.stock = -3;
        assert_eq!(product.available_stock(), 0);
        product.stock = 7;
        assert_eq!(product.available_stock(), 7);
    }

    #[test]
    fn test_form_validation_builds_payload() {
        let payload = form().validate().unwrap();
        assert_eq!(payload.price, 35.9);
        assert_eq!(payload.unit, "unidade");
        assert_eq!(payload.code, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["nome"], "Pomada Modeladora");
        assert_eq!(json["quantidade_estoque"], 12);
        assert!(json.get("codigo").is_none());
    }

    #[test]
    fn test_form_validation_errors() {
        let bad = ProductForm {
            name: String::new(),
            price: "0".to_string(),
            stock: "-1".to_string(),
            cost_price: "abc".to_string(),
            ..ProductForm::default()
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.has("nome"));
        assert!(errors.has("preco"));
        assert!(errors.has("quantidade_estoque"));
        assert!(errors.has("preco_custo"));
        assert!(!errors.has("estoque_minimo"));
    }

    #[test]
    fn test_stock_movement_rules() {
        assert_eq!(StockMovementKind::Entrada.apply(5, 3), 8);
        assert_eq!(StockMovementKind::Saida.apply(5, 3), 2);
        assert_eq!(StockMovementKind::Ajuste.apply(5, 3), 3);

        let too_many = StockMovement {
            tipo: StockMovementKind::Saida,
            quantity: 9,
            reason: None,
        };
        assert!(too_many.validate(5).is_err());

        let json = serde_json::to_value(StockMovement {
            tipo: StockMovementKind::Ajuste,
            quantity: 4,
            reason: Some("inventário".to_string()),
        })
        .unwrap();
        assert_eq!(json["tipo"], "ajuste");
        assert_eq!(json["motivo"], "inventário");
    }
}
