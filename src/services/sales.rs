use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::api::{query_string, ApiClient};
use super::error::ApiResult;
use super::page::{Page, DEFAULT_PAGE_SIZE};
use crate::utils::time::iso_date;
use crate::utils::validation::FormErrors;

const PAID_EPSILON: f64 = 0.005;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub produto_id: i64,
    #[serde(rename = "produto_nome", default)]
    pub product_name: Option<String>,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "valor_unitario")]
    pub unit_price: f64,
    #[serde(rename = "percentual_desconto", default)]
    pub discount_percent: f64,
    #[serde(rename = "valor_total", default)]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "forma_pagamento", default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    #[serde(default)]
    pub cliente_id: Option<i64>,
    #[serde(rename = "cliente_nome", default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub barbeiro_id: Option<i64>,
    #[serde(rename = "barbeiro_nome", default)]
    pub barber_name: Option<String>,
    #[serde(rename = "data_hora", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(rename = "valor_desconto", default)]
    pub discount: f64,
    #[serde(rename = "percentual_imposto", default)]
    pub tax_percent: f64,
    #[serde(rename = "valor_imposto", default)]
    pub tax: f64,
    #[serde(rename = "valor_total", default)]
    pub total: f64,
    #[serde(rename = "observacao", default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "itens", default)]
    pub items: Vec<SaleItem>,
    #[serde(rename = "pagamentos", default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Paid,
    Partial,
    Pending,
    Cancelled,
}

impl PaymentState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paid => "Pago",
            Self::Partial => "Parcial",
            Self::Pending => "Pendente",
            Self::Cancelled => "Cancelado",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Paid => "bg-green-100 text-green-800",
            Self::Partial => "bg-sky-100 text-sky-800",
            Self::Pending => "bg-amber-100 text-amber-800",
            Self::Cancelled => "bg-red-100 text-red-800",
        }
    }
}

impl Sale {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelada")
    }

    pub fn paid_amount(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn outstanding(&self) -> f64 {
        (self.total - self.paid_amount()).max(0.0)
    }

    pub fn payment_state(&self) -> PaymentState {
        if self.is_cancelled() {
            return PaymentState::Cancelled;
        }
        let paid = self.paid_amount();
        if paid <= PAID_EPSILON {
            PaymentState::Pending
        } else if paid + PAID_EPSILON >= self.total {
            PaymentState::Paid
        } else {
            PaymentState::Partial
        }
    }

    pub fn client_label(&self) -> String {
        self.client_name
            .clone()
            .unwrap_or_else(|| "Cliente não identificado".to_string())
    }
}

// =============================================================================
// New sale
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSaleItem {
    pub produto_id: i64,
    pub quantidade: u32,
    pub valor_unitario: f64,
    pub percentual_desconto: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSale {
    pub cliente_id: Option<i64>,
    pub barbeiro_id: Option<i64>,
    pub valor_desconto: f64,
    pub percentual_imposto: f64,
    pub observacao: String,
    pub itens: Vec<NewSaleItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct SavedSale {
    #[serde(rename = "venda")]
    sale: Sale,
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Dinheiro,
    CartaoCredito,
    CartaoDebito,
    Pix,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        Self::Dinheiro,
        Self::CartaoCredito,
        Self::CartaoDebito,
        Self::Pix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dinheiro => "dinheiro",
            Self::CartaoCredito => "cartao_credito",
            Self::CartaoDebito => "cartao_debito",
            Self::Pix => "pix",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dinheiro => "Dinheiro",
            Self::CartaoCredito => "Cartão de crédito",
            Self::CartaoDebito => "Cartão de débito",
            Self::Pix => "PIX",
        }
    }
}

/// Human label for a raw `forma_pagamento`
pub fn method_label(raw: Option<&str>) -> &'static str {
    raw.and_then(PaymentMethod::from_str)
        .map(|m| m.label())
        .unwrap_or("Não informado")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "metodo")]
    pub method: PaymentMethod,
}

impl PaymentRequest {
    /// Amount must be positive and not exceed what is still owed
    pub fn validate(&self, outstanding: f64) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if !(self.amount > 0.0) {
            errors.add("valor", "Informe um valor maior que zero");
        } else if self.amount > outstanding + PAID_EPSILON {
            errors.add(
                "valor",
                format!(
                    "Valor excede o restante da venda ({})",
                    crate::utils::format::format_brl(outstanding)
                ),
            );
        }
        errors.into_result()
    }
}

// =============================================================================
// Listing and reports
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SaleFilters {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: String,
    pub search: String,
    pub page: u32,
}

impl Default for SaleFilters {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            status: String::new(),
            search: String::new(),
            page: 1,
        }
    }
}

impl SaleFilters {
    pub fn is_filtered(&self) -> bool {
        self.from.is_some()
            || self.to.is_some()
            || !self.status.is_empty()
            || !self.search.trim().is_empty()
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("data_inicio", self.from.map(iso_date).unwrap_or_default()),
            (
                "data_fim",
                self.to
                    .map(|d| format!("{}T23:59:59", iso_date(d)))
                    .unwrap_or_default(),
            ),
            ("status", self.status.clone()),
            ("busca", self.search.trim().to_string()),
        ]
    }

    pub fn to_query(&self) -> String {
        let mut params = self.params();
        params.push(("pagina", self.page.max(1).to_string()));
        params.push(("por_pagina", DEFAULT_PAGE_SIZE.to_string()));
        query_string(&params)
    }

    pub fn to_export_query(&self) -> String {
        query_string(&self.params())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PeriodTotals {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SalesSummary {
    #[serde(default)]
    pub hoje: PeriodTotals,
    #[serde(default)]
    pub semana: PeriodTotals,
    #[serde(default)]
    pub mes: PeriodTotals,
    #[serde(default)]
    pub ticket_medio: f64,
    #[serde(default)]
    pub ticket_variacao: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RevenueSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub valores: Vec<f64>,
}

impl RevenueSeries {
    pub fn points(&self) -> Vec<(String, f64)> {
        self.labels
            .iter()
            .cloned()
            .zip(self.valores.iter().copied())
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.valores.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.valores.iter().copied().fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PaymentSplit {
    #[serde(default)]
    pub valores: BTreeMap<String, f64>,
    #[serde(default)]
    pub percentuais: BTreeMap<String, f64>,
}

pub async fn list(api: &ApiClient, filters: &SaleFilters) -> ApiResult<Page<Sale>> {
    api.get(&format!("/vendas/{}", filters.to_query())).await
}

pub async fn get(api: &ApiClient, id: i64) -> ApiResult<Sale> {
    api.get(&format!("/vendas/{}", id)).await
}

pub async fn create(api: &ApiClient, sale: &NewSale) -> ApiResult<Sale> {
    let saved: SavedSale = api.post("/vendas/", sale).await?;
    Ok(saved.sale)
}

pub async fn register_payment(api: &ApiClient, id: i64, payment: &PaymentRequest) -> ApiResult<Value> {
    api.post(&format!("/vendas/{}/pagamento", id), payment).await
}

pub async fn cancel(api: &ApiClient, id: i64) -> ApiResult<Value> {
    api.delete(&format!("/vendas/{}", id)).await
}

pub async fn summary(api: &ApiClient) -> ApiResult<SalesSummary> {
    api.get("/vendas/relatorio/resumo").await
}

pub async fn revenue_chart(api: &ApiClient, days: u32) -> ApiResult<RevenueSeries> {
    api.get(&format!("/vendas/relatorio/grafico?periodo={}", days)).await
}

pub async fn payment_split(api: &ApiClient) -> ApiResult<PaymentSplit> {
    api.get("/vendas/relatorio/pagamentos").await
}

/// Full filtered list for CSV export
pub async fn export(api: &ApiClient, filters: &SaleFilters) -> ApiResult<Vec<Sale>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ExportBody {
        Bare(Vec<Sale>),
        Wrapped { vendas: Vec<Sale> },
    }

    let body: ExportBody = api
        .get(&format!("/vendas/exportar{}", filters.to_export_query()))
        .await?;
    Ok(match body {
        ExportBody::Bare(sales) => sales,
        ExportBody::Wrapped { vendas } => vendas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(total: f64, payments: &[f64], status: &str) -> Sale {
        Sale {
            id: 1,
            cliente_id: None,
            client_name: None,
            barbeiro_id: None,
            barber_name: None,
            created_at: None,
            subtotal: total,
            discount: 0.0,
            tax_percent: 0.0,
            tax: 0.0,
            total,
            notes: None,
            status: Some(status.to_string()),
            items: Vec::new(),
            payments: payments
                .iter()
                .map(|amount| Payment {
                    amount: *amount,
                    method: Some("pix".to_string()),
                    status: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_payment_state() {
        assert_eq!(sale(100.0, &[], "finalizada").payment_state(), PaymentState::Pending);
        assert_eq!(sale(100.0, &[40.0], "finalizada").payment_state(), PaymentState::Partial);
        assert_eq!(sale(100.0, &[40.0, 60.0], "finalizada").payment_state(), PaymentState::Paid);
        assert_eq!(sale(100.0, &[100.0], "cancelada").payment_state(), PaymentState::Cancelled);
        assert_eq!(sale(100.0, &[40.0], "finalizada").outstanding(), 60.0);
    }

    #[test]
    fn test_payment_validation() {
        let ok = PaymentRequest { amount: 60.0, method: PaymentMethod::Pix };
        assert!(ok.validate(60.0).is_ok());
        let too_much = PaymentRequest { amount: 60.5, method: PaymentMethod::Dinheiro };
        assert!(too_much.validate(60.0).unwrap_err().has("valor"));
        let zero = PaymentRequest { amount: 0.0, method: PaymentMethod::Dinheiro };
        assert!(zero.validate(60.0).is_err());

        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["metodo"], "pix");
        assert_eq!(json["valor"], 60.0);
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(PaymentMethod::from_str("cartao_debito"), Some(PaymentMethod::CartaoDebito));
        assert_eq!(method_label(Some("cartao_credito")), "Cartão de crédito");
        assert_eq!(method_label(Some("cheque")), "Não informado");
        assert_eq!(method_label(None), "Não informado");
    }

    #[test]
    fn test_filters_query() {
        let filters = SaleFilters {
            from: NaiveDate::from_ymd_opt(2024, 5, 1),
            status: "finalizada".to_string(),
            page: 3,
            ..SaleFilters::default()
        };
        assert!(filters.is_filtered());
        assert_eq!(
            filters.to_query(),
            "?data_inicio=2024-05-01&status=finalizada&pagina=3&por_pagina=10"
        );
        assert_eq!(filters.to_export_query(), "?data_inicio=2024-05-01&status=finalizada");
        assert!(!SaleFilters::default().is_filtered());
    }

    #[test]
    fn test_decode_sale_and_reports() {
        let json = r#"{"id": 12, "cliente_nome": "Ana", "data_hora": "2024-05-03T10:00:00",
            "valor_total": 93.5, "valor_desconto": 5, "percentual_imposto": 10, "valor_imposto": 8.5,
            "subtotal": 100, "status": "finalizada",
            "itens": [{"produto_id": 1, "produto_nome": "Gel", "quantidade": 1, "valor_unitario": 100,
                       "percentual_desconto": 10, "valor_total": 90}],
            "pagamentos": [{"valor": 93.5, "forma_pagamento": "pix", "status": "confirmado"}]}"#;
        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.items[0].quantity, 1);
        assert_eq!(sale.payment_state(), PaymentState::Paid);

        let series: RevenueSeries =
            serde_json::from_str(r#"{"labels": ["01/05", "02/05"], "valores": [10.0, 30.5]}"#).unwrap();
        assert_eq!(series.points()[1], ("02/05".to_string(), 30.5));
        assert_eq!(series.total(), 40.5);
        assert_eq!(series.max(), 30.5);

        let summary: SalesSummary =
            serde_json::from_str(r#"{"hoje": {"total": 2, "valor": 50}, "ticket_medio": 25}"#).unwrap();
        assert_eq!(summary.hoje.total, 2);
        assert_eq!(summary.mes, PeriodTotals::default());
    }
}
