use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api::{query_string, ApiClient};
use super::error::ApiResult;
use crate::utils::format::parse_decimal;
use crate::utils::validation::FormErrors;

pub const DEFAULT_COMMISSION: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barber {
    pub id: i64,
    #[serde(default)]
    pub usuario_id: Option<i64>,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "especialidades", default)]
    pub specialties: Vec<String>,
    #[serde(rename = "comissao_percentual", default)]
    pub commission_percent: f64,
    #[serde(rename = "disponivel", default)]
    pub available: bool,
}

impl Barber {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Barbeiro #{}", self.id))
    }

    pub fn specialties_label(&self) -> String {
        if self.specialties.is_empty() {
            "-".to_string()
        } else {
            self.specialties.join(", ")
        }
    }
}

/// Barber modal values. E-mail and password are only asked on creation,
/// since a new barber also creates the login account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarberForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub specialties: String,
    pub commission_percent: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBarber {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "especialidades", skip_serializing_if = "Option::is_none")]
    pub specialties: Option<String>,
    #[serde(rename = "comissao_percentual")]
    pub commission_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarberUpdate {
    #[serde(rename = "especialidades", skip_serializing_if = "Option::is_none")]
    pub specialties: Option<String>,
    #[serde(rename = "comissao_percentual")]
    pub commission_percent: f64,
    #[serde(rename = "disponivel")]
    pub available: bool,
}

/// One save call per submit: create or update, never both
#[derive(Debug, Clone, PartialEq)]
pub enum BarberSave {
    Create(NewBarber),
    Update { id: i64, changes: BarberUpdate },
}

/// Normalise "corte,  barba , ,pigmentação" to "corte, barba, pigmentação"
pub fn normalize_specialties(input: &str) -> Option<String> {
    let parts: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

impl BarberForm {
    pub fn new_barber() -> Self {
        Self {
            commission_percent: format!("{}", DEFAULT_COMMISSION),
            available: true,
            ..Self::default()
        }
    }

    pub fn from_barber(barber: &Barber) -> Self {
        Self {
            name: barber.display_name(),
            specialties: barber.specialties.join(", "),
            commission_percent: format!("{}", barber.commission_percent),
            available: barber.available,
            ..Self::default()
        }
    }

    /// Validate and turn into the single save request for `editing`
    pub fn validate(&self, editing: Option<i64>) -> Result<BarberSave, FormErrors> {
        let mut errors = FormErrors::new();
        let commission = parse_decimal(&self.commission_percent);
        errors.range("comissao_percentual", commission, 0.0, 100.0, "Comissão");

        if editing.is_none() {
            errors.require("nome", &self.name, "Nome");
            errors.min_len("nome", &self.name, 3, "Nome");
            errors.require("email", &self.email, "Email");
            errors.email("email", &self.email);
            errors.min_len("senha", &self.password, 6, "Senha");
            if !self.phone.trim().is_empty() {
                errors.phone("telefone", &self.phone);
            }
        }
        errors.into_result()?;

        let commission_percent = commission.unwrap_or(DEFAULT_COMMISSION);
        let specialties = normalize_specialties(&self.specialties);

        Ok(match editing {
            Some(id) => BarberSave::Update {
                id,
                changes: BarberUpdate {
                    specialties,
                    commission_percent,
                    available: self.available,
                },
            },
            None => BarberSave::Create(NewBarber {
                name: self.name.trim().to_string(),
                email: self.email.trim().to_string(),
                password: self.password.clone(),
                phone: Some(self.phone.trim().to_string()).filter(|p| !p.is_empty()),
                specialties,
                commission_percent,
            }),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SavedBarber {
    #[serde(rename = "barbeiro")]
    barber: Barber,
}

pub async fn list(api: &ApiClient) -> ApiResult<Vec<Barber>> {
    api.get("/barbeiros/").await
}

pub async fn get(api: &ApiClient, id: i64) -> ApiResult<Barber> {
    api.get(&format!("/barbeiros/{}", id)).await
}

pub async fn save(api: &ApiClient, request: &BarberSave) -> ApiResult<Barber> {
    let saved: SavedBarber = match request {
        BarberSave::Create(new_barber) => api.post("/barbeiros/completo", new_barber).await?,
        BarberSave::Update { id, changes } => {
            api.put(&format!("/barbeiros/{}", id), changes).await?
        }
    };
    Ok(saved.barber)
}

pub async fn set_availability(api: &ApiClient, barber: &Barber, available: bool) -> ApiResult<Barber> {
    let changes = BarberUpdate {
        specialties: normalize_specialties(&barber.specialties.join(",")),
        commission_percent: barber.commission_percent,
        available,
    };
    save(api, &BarberSave::Update { id: barber.id, changes }).await
}

pub async fn delete(api: &ApiClient, id: i64) -> ApiResult<Value> {
    api.delete(&format!("/barbeiros/{}", id)).await
}

/// Periods offered by the performance panel, in days
pub const PERFORMANCE_PERIODS: [u32; 3] = [7, 30, 90];

/// One row of `/barbeiros/desempenho`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BarberPerformance {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "total_atendimentos", default)]
    pub appointments: u32,
    #[serde(rename = "faturamento", default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PerformanceReport {
    #[serde(default)]
    desempenho: Vec<BarberPerformance>,
}

/// Appointments per barber over the last `days`
pub async fn performance(api: &ApiClient, days: u32) -> ApiResult<Vec<BarberPerformance>> {
    let qs = query_string(&[("periodo", days.to_string())]);
    let report: PerformanceReport = api.get(&format!("/barbeiros/desempenho{}", qs)).await?;
    Ok(report.desempenho)
}

/// Bar rows for the panel: appointments and revenue, labelled by barber
pub fn performance_rows(rows: &[BarberPerformance]) -> (Vec<(String, f64)>, Vec<(String, f64)>) {
    rows.iter()
        .map(|r| ((r.name.clone(), f64::from(r.appointments)), (r.name.clone(), r.revenue)))
        .unzip()
}

/// Barbers free at a date/time. Falls back to every barber flagged
/// `disponivel` when the availability endpoint fails.
pub async fn available_at(api: &ApiClient, date: &str, time: &str) -> ApiResult<Vec<Barber>> {
    let qs = query_string(&[("data", date.to_string()), ("hora", time.to_string())]);
    match api.get::<Vec<Barber>>(&format!("/barbeiros/disponiveis{}", qs)).await {
        Ok(barbers) => Ok(barbers),
        Err(e) => {
            log::warn!("Availability lookup failed ({}), listing all available barbers", e);
            Ok(list(api).await?.into_iter().filter(|b| b.available).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::testing::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_specialties_normalisation() {
        assert_eq!(
            normalize_specialties("corte,  barba , ,pigmentação").as_deref(),
            Some("corte, barba, pigmentação")
        );
        assert_eq!(normalize_specialties(" , "), None);
    }

    #[test]
    fn test_create_requires_account_fields() {
        let errors = BarberForm::new_barber().validate(None).unwrap_err();
        assert!(errors.has("nome"));
        assert!(errors.has("email"));
        assert!(errors.has("senha"));
        assert!(!errors.has("comissao_percentual"));
    }

    #[test]
    fn test_edit_builds_update_only() {
        let form = BarberForm {
            specialties: "corte, barba".to_string(),
            commission_percent: "40".to_string(),
            available: false,
            ..BarberForm::default()
        };
        match form.validate(Some(9)).unwrap() {
            BarberSave::Update { id, changes } => {
                assert_eq!(id, 9);
                assert_eq!(changes.commission_percent, 40.0);
                assert!(!changes.available);
            }
            other => panic!("expected update, got {:?}", other),
        }

        let bad = BarberForm {
            commission_percent: "150".to_string(),
            ..BarberForm::default()
        };
        assert!(bad.validate(Some(9)).unwrap_err().has("comissao_percentual"));
    }

    #[test]
    fn test_save_issues_exactly_one_request() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(500, r#"{"erro": "Erro ao criar barbeiro: timeout"}"#);

        let request = BarberForm {
            name: "Carlos Lima".to_string(),
            email: "carlos@barbearia.com".to_string(),
            password: "segredo1".to_string(),
            ..BarberForm::new_barber()
        }
        .validate(None)
        .unwrap();

        let result = block_on(save(&api, &request));
        assert!(result.is_err());
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "/api/barbeiros/completo");
    }

    #[test]
    fn test_performance_reads_wrapped_rows() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(
            200,
            r#"{"desempenho": [{"nome": "Carlos", "total_atendimentos": 12, "faturamento": 480.5}, {"nome": "Bruno", "total_atendimentos": 3}]}"#,
        );

        let rows = block_on(performance(&api, 7)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Carlos");
        assert_eq!(rows[0].appointments, 12);
        assert_eq!(rows[1].revenue, 0.0);
        assert_eq!(transport.sent()[0].url, "/api/barbeiros/desempenho?periodo=7");

        let (visits, revenue) = performance_rows(&rows);
        assert_eq!(visits, vec![("Carlos".to_string(), 12.0), ("Bruno".to_string(), 3.0)]);
        assert_eq!(revenue[0], ("Carlos".to_string(), 480.5));
    }

    #[test]
    fn test_performance_without_rows_is_empty() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(200, r#"{"periodo": 30}"#);

        assert!(block_on(performance(&api, 30)).unwrap().is_empty());
    }

    #[test]
    fn test_availability_falls_back_to_list() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(404, r#"{"erro": "Not Found"}"#);
        transport.reply(
            200,
            r#"[{"id": 1, "nome": "A", "disponivel": true}, {"id": 2, "nome": "B", "disponivel": false}]"#,
        );

        let barbers = block_on(available_at(&api, "2024-05-03", "10:00")).unwrap();
        assert_eq!(barbers.len(), 1);
        assert_eq!(barbers[0].display_name(), "A");
        assert_eq!(transport.sent()[0].url, "/api/barbeiros/disponiveis?data=2024-05-03&hora=10%3A00");
    }
}
