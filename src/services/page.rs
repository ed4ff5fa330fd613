use serde::{Deserialize, Serialize};

use super::api::query_string;

fn first_page() -> u32 {
    1
}

/// Paginated list envelope returned by the backend list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total: u32,
    #[serde(rename = "paginas", default)]
    pub pages: u32,
    #[serde(rename = "pagina_atual", default = "first_page")]
    pub current: u32,
    #[serde(rename = "por_pagina", default)]
    pub per_page: u32,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// "Mostrando 11-20 de 43"
    pub fn range_label(&self) -> String {
        if self.items.is_empty() {
            return format!("Mostrando 0 de {}", self.total);
        }
        let start = (self.current.saturating_sub(1)) * self.per_page.max(1) + 1;
        let end = start + self.items.len() as u32 - 1;
        format!("Mostrando {}-{} de {}", start, end, self.total)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total: 0,
            pages: 0,
            current: 1,
            per_page: 0,
            items: Vec::new(),
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Common list parameters: search term plus page
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: String,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty()
    }

    pub fn to_query(&self) -> String {
        query_string(&[
            ("busca", self.search.trim().to_string()),
            ("pagina", self.page.to_string()),
            ("por_pagina", self.per_page.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_envelope() {
        let json = r#"{"total": 23, "paginas": 3, "pagina_atual": 3, "por_pagina": 10, "items": [1, 2, 3]}"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.pages, 3);
        assert_eq!(page.range_label(), "Mostrando 21-23 de 23");
    }

    #[test]
    fn test_missing_fields_default() {
        let page: Page<u32> = serde_json::from_str("{}").unwrap();
        assert_eq!(page.current, 1);
        assert!(page.is_empty());
    }

    #[test]
    fn test_list_query_string() {
        let query = ListQuery {
            search: " ana ".to_string(),
            page: 2,
            per_page: 10,
        };
        assert!(query.is_filtered());
        assert_eq!(query.to_query(), "?busca=ana&pagina=2&por_pagina=10");
        assert_eq!(ListQuery::default().to_query(), "?pagina=1&por_pagina=10");
    }
}
