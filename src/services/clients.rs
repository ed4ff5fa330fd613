use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api::ApiClient;
use super::error::ApiResult;
use super::page::{ListQuery, Page};
use crate::utils::validation::{format_phone, FormErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Client {
    pub fn phone_display(&self) -> String {
        self.phone
            .as_deref()
            .map(format_phone)
            .unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientForm {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ClientForm {
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            phone: client.phone.clone().unwrap_or_default(),
            email: client.email.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ClientPayload, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("nome", &self.name, "Nome");
        errors.min_len("nome", &self.name, 3, "Nome");
        errors.require("telefone", &self.phone, "Telefone");
        errors.phone("telefone", &self.phone);
        errors.email("email", &self.email);
        errors.into_result()?;

        let email = self.email.trim();
        Ok(ClientPayload {
            name: self.name.trim().to_string(),
            phone: self.phone.chars().filter(|c| c.is_ascii_digit()).collect(),
            email: (!email.is_empty()).then(|| email.to_string()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SavedClient {
    #[serde(rename = "cliente")]
    client: Client,
}

pub async fn list(api: &ApiClient, query: &ListQuery) -> ApiResult<Page<Client>> {
    api.get(&format!("/clientes/{}", query.to_query())).await
}

pub async fn search(api: &ApiClient, term: &str) -> ApiResult<Vec<Client>> {
    let query = ListQuery {
        search: term.to_string(),
        per_page: 20,
        ..ListQuery::default()
    };
    Ok(list(api, &query).await?.items)
}

pub async fn get(api: &ApiClient, id: i64) -> ApiResult<Client> {
    api.get(&format!("/clientes/{}", id)).await
}

pub async fn create(api: &ApiClient, payload: &ClientPayload) -> ApiResult<Client> {
    let saved: SavedClient = api.post("/clientes/", payload).await?;
    Ok(saved.client)
}

pub async fn update(api: &ApiClient, id: i64, payload: &ClientPayload) -> ApiResult<Client> {
    let saved: SavedClient = api.put(&format!("/clientes/{}", id), payload).await?;
    Ok(saved.client)
}

pub async fn delete(api: &ApiClient, id: i64) -> ApiResult<Value> {
    api.delete(&format!("/clientes/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::testing::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_validation() {
        let form = ClientForm {
            name: "Jo".to_string(),
            phone: "123".to_string(),
            email: "x@".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("nome"));
        assert!(errors.has("telefone"));
        assert!(errors.has("email"));

        let ok = ClientForm {
            name: " João Pereira ".to_string(),
            phone: "(11) 98888-7777".to_string(),
            email: String::new(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.name, "João Pereira");
        assert_eq!(ok.phone, "11988887777");
        assert_eq!(ok.email, None);
    }

    #[test]
    fn test_list_requests_search_and_page() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(
            200,
            r#"{"total": 1, "paginas": 1, "pagina_atual": 2, "por_pagina": 10,
                "items": [{"id": 7, "nome": "Ana", "telefone": "11999990000", "email": null}]}"#,
        );

        let query = ListQuery {
            search: "Ana".to_string(),
            page: 2,
            per_page: 10,
        };
        let page = block_on(list(&api, &query)).unwrap();
        assert_eq!(page.items[0].name, "Ana");
        assert_eq!(page.items[0].phone_display(), "(11) 99999-0000");
        assert_eq!(transport.sent()[0].url, "/api/clientes/?busca=Ana&pagina=2&por_pagina=10");
    }

    #[test]
    fn test_create_unwraps_envelope() {
        let transport = Rc::new(ScriptedTransport::default());
        let session = Rc::new(MemorySession::with_tokens(Some("t"), None));
        let api = client(transport.clone(), session, Rc::new(RefCell::new(0)));
        transport.reply(201, r#"{"mensagem": "ok", "cliente": {"id": 3, "nome": "Bia"}}"#);

        let payload = ClientPayload {
            name: "Bia".to_string(),
            phone: "11999990000".to_string(),
            email: None,
        };
        let created = block_on(create(&api, &payload)).unwrap();
        assert_eq!(created.id, 3);
        let body: Value = serde_json::from_str(transport.sent()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["telefone"], "11999990000");
        assert!(body.get("email").is_none());
    }
}
