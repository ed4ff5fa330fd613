/// Local preferences stored under `configuracoes`
use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};

use crate::utils::validation::FormErrors;

const STORAGE_KEY: &str = "configuracoes";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompanyProfile {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub endereco: String,
    #[serde(default)]
    pub horario_funcionamento: String,
    #[serde(default)]
    pub dias_funcionamento: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            nome: "B-Manager Barbearia".to_string(),
            cnpj: String::new(),
            telefone: String::new(),
            email: String::new(),
            endereco: String::new(),
            horario_funcionamento: "09:00 - 19:00".to_string(),
            dias_funcionamento: "Segunda a Sábado".to_string(),
        }
    }
}

impl CompanyProfile {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("nome", &self.nome, "Nome da empresa");
        errors.email("email", &self.email);
        if !self.telefone.trim().is_empty() {
            errors.phone("telefone", &self.telefone);
        }
        errors.into_result()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotificationPrefs {
    pub email: bool,
    pub sistema: bool,
    pub agendamento: bool,
    pub cancelamento: bool,
    pub estoque: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: true,
            sistema: true,
            agendamento: true,
            cancelamento: true,
            estoque: true,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub empresa: CompanyProfile,
    #[serde(default)]
    pub notificacoes: NotificationPrefs,
    /// Tax percent pre-filled in the new-sale form
    #[serde(default)]
    pub imposto_padrao: f64,
    #[serde(default)]
    pub version: u32,
}

pub static SETTINGS: GlobalSignal<AppSettings> = Signal::global(AppSettings::default);

pub fn init_settings() {
    match LocalStorage::get::<AppSettings>(STORAGE_KEY) {
        Ok(settings) => {
            log::info!("Loaded settings from storage");
            *SETTINGS.write() = settings;
        }
        Err(_) => log::info!("No stored settings, using defaults"),
    }
}

pub fn save_settings(settings: AppSettings) -> Result<(), String> {
    let settings = AppSettings {
        imposto_padrao: settings.imposto_padrao.clamp(0.0, 100.0),
        version: 1,
        ..settings
    };
    LocalStorage::set(STORAGE_KEY, &settings).map_err(|e| format!("Falha ao salvar: {}", e))?;
    *SETTINGS.write() = settings;
    log::info!("Settings saved");
    Ok(())
}

pub fn default_tax_percent() -> f64 {
    SETTINGS.read().imposto_padrao
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"empresa": {"nome": "Barbearia do Zé"}}"#).unwrap();
        assert_eq!(settings.empresa.nome, "Barbearia do Zé");
        assert_eq!(settings.empresa.cnpj, "");
        assert!(settings.notificacoes.estoque);
        assert_eq!(settings.imposto_padrao, 0.0);
    }

    #[test]
    fn test_company_validation() {
        let mut profile = CompanyProfile::default();
        assert!(profile.validate().is_ok());
        profile.nome = " ".to_string();
        profile.email = "contato@".to_string();
        let errors = profile.validate().unwrap_err();
        assert!(errors.has("nome"));
        assert!(errors.has("email"));
    }
}
