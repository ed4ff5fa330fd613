use chrono::NaiveDate;

use crate::services::sales::Sale;
use crate::utils::time::{display_date, iso_date};

const CSV_HEADER: &str = "ID,Data,Cliente,Valor Total,Status,Itens,Pagamento";

/// Quote a CSV field when it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn sales_csv(sales: &[Sale]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for sale in sales {
        let row = [
            sale.id.to_string(),
            sale.created_at.as_deref().map(display_date).unwrap_or_default(),
            sale.client_label(),
            format!("{:.2}", sale.total),
            sale.status.clone().unwrap_or_default(),
            sale.items.len().to_string(),
            sale.payments.len().to_string(),
        ];
        let line: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }
    csv
}

pub fn sales_csv_filename(today: NaiveDate) -> String {
    format!("vendas_{}.csv", iso_date(today))
}

#[cfg(target_arch = "wasm32")]
pub fn object_url(content: &str, mime_type: &str) -> Result<String, String> {
    use wasm_bindgen::JsValue;
    use web_sys::BlobPropertyBag;

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&JsValue::from_str(content));

    let blob_options = BlobPropertyBag::new();
    blob_options.set_type(mime_type);

    let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)
        .map_err(|e| format!("Failed to create Blob: {:?}", e))?;
    web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))
}

/// Trigger a browser download of `content`
#[cfg(target_arch = "wasm32")]
pub fn download_text(filename: &str, content: &str, mime_type: &str) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    let url = object_url(content, mime_type)?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document")?;
    let body = document.body().ok_or("No document body")?;

    let link = document
        .create_element("a")
        .map_err(|e| format!("Failed to create link: {:?}", e))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Element is not an anchor".to_string())?;
    link.set_href(&url);
    link.set_download(filename);

    body.append_child(&link)
        .map_err(|e| format!("Failed to attach link: {:?}", e))?;
    link.click();
    body.remove_child(&link).ok();
    web_sys::Url::revoke_object_url(&url).ok();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn download_text(_filename: &str, _content: &str, _mime_type: &str) -> Result<(), String> {
    Err("Download disponível apenas no navegador".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_rows_and_quoting() {
        let sales: Vec<Sale> = serde_json::from_str(
            r#"[{"id": 1, "cliente_nome": "Silva, João", "data_hora": "2024-05-03T10:00:00",
                 "valor_total": 93.5, "status": "finalizada",
                 "itens": [{"produto_id": 1, "quantidade": 1, "valor_unitario": 93.5}],
                 "pagamentos": []},
                {"id": 2, "valor_total": 10, "status": "cancelada"}]"#,
        )
        .unwrap();

        let csv = sales_csv(&sales);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,03/05/2024,\"Silva, João\",93.50,finalizada,1,0");
        assert_eq!(lines[2], "2,,Cliente não identificado,10.00,cancelada,0,0");
    }

    #[test]
    fn test_csv_field_escapes_quotes() {
        assert_eq!(csv_field("diz \"oi\""), "\"diz \"\"oi\"\"\"");
        assert_eq!(csv_field("simples"), "simples");
    }

    #[test]
    fn test_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        assert_eq!(sales_csv_filename(date), "vendas_2024-05-03.csv");
    }
}
