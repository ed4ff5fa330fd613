use serde::Deserialize;

use super::api::ApiClient;
use super::error::ApiResult;

/// Headline numbers for the menu page
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub agendamentos_hoje: u32,
    #[serde(default)]
    pub faturamento_hoje: f64,
    #[serde(default)]
    pub clientes_ativos: u32,
    #[serde(default)]
    pub produtos_estoque_baixo: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenueDay {
    pub data: String,
    #[serde(default)]
    pub valor: f64,
    #[serde(default)]
    pub agendamentos: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct RevenueBody {
    #[serde(default)]
    faturamento: Vec<RevenueDay>,
}

pub async fn counters(api: &ApiClient) -> ApiResult<Counters> {
    api.get("/dashboard/counters").await
}

pub async fn revenue(api: &ApiClient, days: u32) -> ApiResult<Vec<RevenueDay>> {
    let body: RevenueBody = api
        .get(&format!("/dashboard/faturamento?periodo={}", days))
        .await?;
    Ok(body.faturamento)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::testing::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_counters_tolerate_missing_fields() {
        let counters: Counters =
            serde_json::from_str(r#"{"agendamentos_hoje": 4, "faturamento_hoje": 180.5}"#).unwrap();
        assert_eq!(counters.agendamentos_hoje, 4);
        assert_eq!(counters.faturamento_hoje, 180.5);
        assert_eq!(counters.produtos_estoque_baixo, 0);
    }

    #[test]
    fn test_revenue_unwraps_series() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(
            200,
            r#"{"faturamento": [{"data": "2024-05-01", "valor": 120.0, "agendamentos": 3}]}"#,
        );

        let days = block_on(revenue(&api, 7)).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].agendamentos, 3);
        assert_eq!(transport.sent()[0].url, "/api/dashboard/faturamento?periodo=7");
    }
}
