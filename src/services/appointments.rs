use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::api::{query_string, ApiClient};
use super::catalog::Service;
use super::error::ApiResult;
use super::page::Page;
use crate::utils::time::{iso_date, iso_datetime, parse_date, parse_datetime, parse_time};
use crate::utils::validation::FormErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pendente,
    EmAndamento,
    Concluido,
    Cancelado,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::EmAndamento => "Em andamento",
            Self::Concluido => "Concluído",
            Self::Cancelado => "Cancelado",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Pendente => "bg-amber-100 text-amber-800",
            Self::EmAndamento => "bg-sky-100 text-sky-800",
            Self::Concluido => "bg-green-100 text-green-800",
            Self::Cancelado => "bg-red-100 text-red-800",
        }
    }

    pub fn actions(&self) -> &'static [AppointmentAction] {
        use AppointmentAction::*;
        match self {
            Self::Pendente => &[Edit, Complete, Cancel],
            Self::EmAndamento => &[Complete, Cancel],
            Self::Concluido | Self::Cancelado => &[View],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    View,
    Edit,
    Complete,
    Cancel,
}

impl AppointmentAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::View => "Ver",
            Self::Edit => "Editar",
            Self::Complete => "Concluir",
            Self::Cancel => "Cancelar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub cliente_id: i64,
    pub barbeiro_id: i64,
    #[serde(rename = "cliente_nome", default)]
    pub client_name: Option<String>,
    #[serde(rename = "barbeiro_nome", default)]
    pub barber_name: Option<String>,
    #[serde(rename = "data_hora_inicio")]
    pub starts_at: String,
    #[serde(rename = "data_hora_fim", default)]
    pub ends_at: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
    #[serde(rename = "servicos", default)]
    pub services: Vec<Service>,
}

impl Appointment {
    pub fn start(&self) -> Option<NaiveDateTime> {
        parse_datetime(&self.starts_at)
    }

    pub fn total_price(&self) -> f64 {
        self.services.iter().map(|s| s.price).sum()
    }

    pub fn total_duration(&self) -> u32 {
        self.services.iter().map(|s| s.duration_min).sum()
    }

    pub fn services_label(&self) -> String {
        self.services
            .iter()
            .map(|s| s.display_name().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Totals shown above the day list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DaySummary {
    pub count: usize,
    pub total_value: f64,
    pub distinct_clients: usize,
}

pub fn summarize_day(appointments: &[Appointment]) -> DaySummary {
    let clients: HashSet<i64> = appointments.iter().map(|a| a.cliente_id).collect();
    DaySummary {
        count: appointments.len(),
        total_value: appointments.iter().map(Appointment::total_price).sum(),
        distinct_clients: clients.len(),
    }
}

/// Sort in place by start time; unparsable timestamps go last
pub fn sort_by_start(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| (a.start().is_none(), a.start()));
}

// =============================================================================
// Form
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentForm {
    pub client_id: Option<i64>,
    pub barber_id: Option<i64>,
    pub date: String,
    pub time: String,
    pub service_ids: Vec<i64>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRef {
    pub servico_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentPayload {
    pub cliente_id: i64,
    pub barbeiro_id: i64,
    pub data_hora_inicio: String,
    pub servicos: Vec<ServiceRef>,
    #[serde(rename = "observacoes")]
    pub notes: String,
}

impl AppointmentForm {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: iso_date(date),
            ..Self::default()
        }
    }

    pub fn from_appointment(appointment: &Appointment) -> Self {
        let start = appointment.start();
        Self {
            client_id: Some(appointment.cliente_id),
            barber_id: Some(appointment.barbeiro_id),
            date: start.map(|s| iso_date(s.date())).unwrap_or_default(),
            time: start.map(|s| s.format("%H:%M").to_string()).unwrap_or_default(),
            service_ids: appointment.services.iter().map(|s| s.id).collect(),
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }

    pub fn toggle_service(&mut self, id: i64) {
        if let Some(pos) = self.service_ids.iter().position(|s| *s == id) {
            self.service_ids.remove(pos);
        } else {
            self.service_ids.push(id);
        }
    }

    /// Sum of price and duration of the selected services
    pub fn selection_totals(&self, catalog: &[Service]) -> (f64, u32) {
        catalog
            .iter()
            .filter(|s| self.service_ids.contains(&s.id))
            .fold((0.0, 0), |(price, minutes), s| (price + s.price, minutes + s.duration_min))
    }

    /// Validate against `now`; past dates, or past times today, are refused
    pub fn validate(&self, now: NaiveDateTime) -> Result<AppointmentPayload, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require_some("cliente_id", &self.client_id, "Selecione um cliente");
        errors.require_some("barbeiro_id", &self.barber_id, "Selecione um barbeiro");

        let date = parse_date(&self.date);
        let time = parse_time(&self.time);
        match date {
            None => errors.add("data", "Informe a data"),
            Some(d) if d < now.date() => errors.add("data", "A data não pode ser no passado"),
            _ => {}
        }
        match (date, time) {
            (_, None) => errors.add("hora", "Informe o horário"),
            (Some(d), Some(t)) if d == now.date() && t < now.time() => {
                errors.add("hora", "O horário não pode ser no passado")
            }
            _ => {}
        }
        if self.service_ids.is_empty() {
            errors.add("servicos", "Selecione pelo menos um serviço");
        }
        errors.into_result()?;

        let starts_at = match (date, time) {
            (Some(d), Some(t)) => d.and_time(t),
            _ => now,
        };
        Ok(AppointmentPayload {
            cliente_id: self.client_id.unwrap_or_default(),
            barbeiro_id: self.barber_id.unwrap_or_default(),
            data_hora_inicio: iso_datetime(starts_at),
            servicos: self
                .service_ids
                .iter()
                .map(|id| ServiceRef { servico_id: *id })
                .collect(),
            notes: self.notes.trim().to_string(),
        })
    }
}

// =============================================================================
// Endpoints
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub search: String,
    pub page: u32,
    pub per_page: u32,
}

impl AppointmentQuery {
    pub fn to_query(&self) -> String {
        let status = self
            .status
            .and_then(|s| serde_json::to_value(s).ok())
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        query_string(&[
            ("data_inicio", self.from.map(iso_date).unwrap_or_default()),
            (
                "data_fim",
                self.to
                    .map(|d| format!("{}T23:59:59", iso_date(d)))
                    .unwrap_or_default(),
            ),
            ("status", status),
            ("busca", self.search.trim().to_string()),
            ("pagina", self.page.max(1).to_string()),
            ("por_pagina", self.per_page.max(1).to_string()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SavedAppointment {
    #[serde(rename = "agendamento")]
    appointment: Appointment,
}

#[derive(Debug, Clone, Serialize)]
struct CancelRequest<'a> {
    motivo: &'a str,
}

pub async fn list(api: &ApiClient, query: &AppointmentQuery) -> ApiResult<Page<Appointment>> {
    api.get(&format!("/agendamentos/{}", query.to_query())).await
}

pub async fn for_day(api: &ApiClient, date: NaiveDate) -> ApiResult<Vec<Appointment>> {
    let mut appointments: Vec<Appointment> =
        api.get(&format!("/agendamentos/data/{}", iso_date(date))).await?;
    sort_by_start(&mut appointments);
    Ok(appointments)
}

/// Every appointment starting inside `[from, to]`, for the month overview
pub async fn in_range(api: &ApiClient, from: NaiveDate, to: NaiveDate) -> ApiResult<Vec<Appointment>> {
    let query = AppointmentQuery {
        from: Some(from),
        to: Some(to),
        page: 1,
        per_page: 500,
        ..AppointmentQuery::default()
    };
    Ok(list(api, &query).await?.items)
}

pub async fn upcoming(api: &ApiClient, today: NaiveDate, limit: u32) -> ApiResult<Vec<Appointment>> {
    let query = AppointmentQuery {
        from: Some(today),
        status: Some(AppointmentStatus::Pendente),
        page: 1,
        per_page: limit,
        ..AppointmentQuery::default()
    };
    let mut items = list(api, &query).await?.items;
    sort_by_start(&mut items);
    Ok(items)
}

pub async fn save(api: &ApiClient, id: Option<i64>, payload: &AppointmentPayload) -> ApiResult<Appointment> {
    let saved: SavedAppointment = match id {
        Some(id) => api.put(&format!("/agendamentos/{}", id), payload).await?,
        None => api.post("/agendamentos/", payload).await?,
    };
    Ok(saved.appointment)
}

pub async fn complete(api: &ApiClient, id: i64) -> ApiResult<Appointment> {
    let saved: SavedAppointment = api
        .post(&format!("/agendamentos/{}/concluir", id), &serde_json::json!({}))
        .await?;
    Ok(saved.appointment)
}

pub async fn cancel(api: &ApiClient, id: i64, reason: &str) -> ApiResult<Appointment> {
    let saved: SavedAppointment = api
        .post(
            &format!("/agendamentos/{}/cancelar", id),
            &CancelRequest { motivo: reason.trim() },
        )
        .await?;
    Ok(saved.appointment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn appointment(id: i64, client: i64, start: &str, prices: &[f64]) -> Appointment {
        Appointment {
            id,
            cliente_id: client,
            barbeiro_id: 1,
            client_name: None,
            barber_name: None,
            starts_at: start.to_string(),
            ends_at: None,
            status: AppointmentStatus::Pendente,
            notes: None,
            services: prices
                .iter()
                .enumerate()
                .map(|(i, p)| Service {
                    id: i as i64,
                    name: format!("S{}", i),
                    description: None,
                    price: *p,
                    duration_min: 30,
                    category: None,
                    popularity: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_status_decoding_and_actions() {
        let status: AppointmentStatus = serde_json::from_str("\"em_andamento\"").unwrap();
        assert_eq!(status, AppointmentStatus::EmAndamento);
        assert_eq!(status.actions(), &[AppointmentAction::Complete, AppointmentAction::Cancel]);
        assert_eq!(AppointmentStatus::Concluido.actions(), &[AppointmentAction::View]);
        assert!(AppointmentStatus::Pendente.actions().contains(&AppointmentAction::Edit));
    }

    #[test]
    fn test_day_summary_counts_distinct_clients() {
        let day = vec![
            appointment(1, 10, "2024-05-03T09:00:00", &[40.0, 25.0]),
            appointment(2, 11, "2024-05-03T10:00:00", &[40.0]),
            appointment(3, 10, "2024-05-03T16:00:00", &[30.0]),
        ];
        let summary = summarize_day(&day);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.distinct_clients, 2);
        assert!((summary.total_value - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_sort_by_start() {
        let mut day = vec![
            appointment(1, 1, "2024-05-03T15:00:00", &[]),
            appointment(2, 1, "invalid", &[]),
            appointment(3, 1, "2024-05-03T08:30:00", &[]),
        ];
        sort_by_start(&mut day);
        let ids: Vec<i64> = day.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_form_validation_rules() {
        let now = at("2024-05-03T12:00:00");
        let empty = AppointmentForm::default().validate(now).unwrap_err();
        for field in ["cliente_id", "barbeiro_id", "data", "hora", "servicos"] {
            assert!(empty.has(field), "missing error for {}", field);
        }

        let past_day = AppointmentForm {
            client_id: Some(1),
            barber_id: Some(2),
            date: "2024-05-02".to_string(),
            time: "15:00".to_string(),
            service_ids: vec![5],
            notes: String::new(),
        };
        assert!(past_day.validate(now).unwrap_err().has("data"));

        let earlier_today = AppointmentForm {
            date: "2024-05-03".to_string(),
            time: "11:30".to_string(),
            ..past_day.clone()
        };
        let errors = earlier_today.validate(now).unwrap_err();
        assert!(errors.has("hora"));
        assert!(!errors.has("data"));

        let later_today = AppointmentForm {
            date: "2024-05-03".to_string(),
            time: "14:00".to_string(),
            notes: " corte curto ".to_string(),
            ..past_day
        };
        let payload = later_today.validate(now).unwrap();
        assert_eq!(payload.data_hora_inicio, "2024-05-03T14:00:00");
        assert_eq!(payload.notes, "corte curto");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["servicos"][0]["servico_id"], 5);
    }

    #[test]
    fn test_toggle_and_totals() {
        let catalog = appointment(1, 1, "2024-05-03T09:00:00", &[40.0, 25.0, 10.0]).services;
        let mut form = AppointmentForm::default();
        form.toggle_service(0);
        form.toggle_service(2);
        form.toggle_service(2);
        form.toggle_service(1);
        assert_eq!(form.service_ids, vec![0, 1]);
        assert_eq!(form.selection_totals(&catalog), (65.0, 60));
    }

    #[test]
    fn test_query_string() {
        let query = AppointmentQuery {
            from: parse_date("2024-05-01"),
            to: parse_date("2024-05-31"),
            status: Some(AppointmentStatus::Pendente),
            page: 1,
            per_page: 5,
            ..AppointmentQuery::default()
        };
        assert_eq!(
            query.to_query(),
            "?data_inicio=2024-05-01&data_fim=2024-05-31T23%3A59%3A59&status=pendente&pagina=1&por_pagina=5"
        );
    }
}
