use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use std::collections::BTreeSet;

use crate::services::catalog::Service;

const STORAGE_KEY_CATEGORIES: &str = "categorias_customizadas";
const STORAGE_KEY_SERVICES_CACHE: &str = "servicos_cache";

pub const DEFAULT_CATEGORIES: [&str; 4] = ["Cabelo", "Barba", "Combo", "Tratamento"];

/// Categories the user created on the services page
pub static CUSTOM_CATEGORIES: GlobalSignal<Vec<String>> = Signal::global(Vec::new);

/// Load stored custom categories into [`CUSTOM_CATEGORIES`]
pub fn init_categories() {
    let stored = LocalStorage::get::<Vec<String>>(STORAGE_KEY_CATEGORIES).unwrap_or_default();
    log::info!("Loaded {} custom service categories", stored.len());
    *CUSTOM_CATEGORIES.write() = stored;
}

/// Add a category unless it already exists (case-insensitive). Returns the
/// trimmed name when it was added.
pub fn add_category(name: &str) -> Option<String> {
    let mut categories = CUSTOM_CATEGORIES.read().clone();
    let added = insert_category(&mut categories, name)?;
    if let Err(e) = LocalStorage::set(STORAGE_KEY_CATEGORIES, &categories) {
        log::error!("Failed to persist categories: {}", e);
    }
    *CUSTOM_CATEGORIES.write() = categories;
    Some(added)
}

pub fn insert_category(categories: &mut Vec<String>, name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty()
        || name.contains(':')
        || DEFAULT_CATEGORIES.iter().any(|c| c.eq_ignore_ascii_case(name))
        || categories.iter().any(|c| c.eq_ignore_ascii_case(name))
    {
        return None;
    }
    categories.push(name.to_string());
    Some(name.to_string())
}

/// Defaults, custom categories and any category seen on a service, deduped
/// case-insensitively and sorted
pub fn all_categories(custom: &[String], services: &[Service]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut result = Vec::new();
    let candidates = DEFAULT_CATEGORIES
        .iter()
        .map(|c| c.to_string())
        .chain(custom.iter().cloned())
        .chain(services.iter().filter_map(Service::category));

    for category in candidates {
        if seen.insert(category.to_lowercase()) {
            result.push(category);
        }
    }
    result.sort_by_key(|c| c.to_lowercase());
    result
}

// =============================================================================
// Last known service list
// =============================================================================

pub fn cache_services(services: &[Service]) {
    if let Err(e) = LocalStorage::set(STORAGE_KEY_SERVICES_CACHE, services) {
        log::warn!("Failed to cache services: {}", e);
    }
}

pub fn cached_services() -> Option<Vec<Service>> {
    LocalStorage::get::<Vec<Service>>(STORAGE_KEY_SERVICES_CACHE).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, category: Option<&str>) -> Service {
        Service {
            id: 1,
            name: name.to_string(),
            description: None,
            price: 10.0,
            duration_min: 30,
            category: category.map(str::to_string),
            popularity: None,
        }
    }

    #[test]
    fn test_insert_category_rules() {
        let mut categories = vec!["Infantil".to_string()];
        assert_eq!(insert_category(&mut categories, "  Química "), Some("Química".to_string()));
        assert_eq!(insert_category(&mut categories, "infantil"), None);
        assert_eq!(insert_category(&mut categories, "barba"), None);
        assert_eq!(insert_category(&mut categories, "A: B"), None);
        assert_eq!(insert_category(&mut categories, "   "), None);
        assert_eq!(categories.len(), 2);
    }

    #[test]
    fn test_all_categories_merges_sources() {
        let custom = vec!["Infantil".to_string(), "cabelo".to_string()];
        let services = vec![
            service("Pigmentação", Some("Estética")),
            service("Sobrancelha: Design", None),
        ];
        let all = all_categories(&custom, &services);
        assert_eq!(
            all,
            vec!["Barba", "Cabelo", "Combo", "Estética", "Infantil", "Sobrancelha", "Tratamento"]
        );
    }
}
