//! Printable documents (sale receipt, sales list, revenue report).
//!
//! Documents are standalone HTML pages opened in a new tab through a Blob
//! URL. Every value coming from the backend or the user goes through
//! [`escape`] before it is placed in the markup.

use chrono::NaiveDateTime;

use crate::services::sales::{method_label, Sale};
use crate::stores::settings_store::CompanyProfile;
use crate::utils::format::{capitalize, format_brl};
use crate::utils::time::{display_date, display_datetime, format_datetime_br};

const BASE_STYLE: &str = "body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
h1 { text-align: center; margin-bottom: 20px; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
.right { text-align: right; }
.footer { text-align: center; margin-top: 30px; font-size: 12px; color: #666; }
@media print { .no-print { display: none; } body { padding: 0; } }";

const RECEIPT_STYLE: &str = "body { font-family: 'Courier New', monospace; margin: 0; padding: 10px; font-size: 12px; }
.header { text-align: center; margin-bottom: 10px; }
.divider { border-top: 1px dashed #000; margin: 10px 0; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 3px 0; }
.right { text-align: right; }
.footer { text-align: center; margin-top: 20px; font-size: 10px; }
@media print { .no-print { display: none; } body { padding: 0; } }";

pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

fn page(title: &str, style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head>\
         <body><div class=\"no-print\" style=\"text-align: right; margin-bottom: 20px;\">\
         <button onclick=\"window.print()\">Imprimir</button> \
         <button onclick=\"window.close()\">Fechar</button></div>{}</body></html>",
        escape(title),
        style,
        body
    )
}

pub fn receipt_html(sale: &Sale, company: &CompanyProfile) -> String {
    let mut body = String::new();
    body.push_str("<div class=\"header\">");
    body.push_str(&format!(
        "<h1 style=\"margin: 0; font-size: 16px;\">{}</h1>",
        escape(&company.nome.to_uppercase())
    ));
    for line in [&company.cnpj, &company.endereco, &company.telefone] {
        if !line.trim().is_empty() {
            body.push_str(&format!("<p>{}</p>", escape(line)));
        }
    }
    body.push_str("</div><div class=\"divider\"></div>");

    body.push_str("<h2 style=\"text-align: center; font-size: 14px;\">COMPROVANTE DE VENDA</h2>");
    body.push_str(&format!("<p><strong>Venda Nº:</strong> {}</p>", sale.id));
    if let Some(created) = &sale.created_at {
        body.push_str(&format!(
            "<p><strong>Data/Hora:</strong> {}</p>",
            escape(&display_datetime(created))
        ));
    }
    body.push_str(&format!(
        "<p><strong>Cliente:</strong> {}</p>",
        escape(&sale.client_label())
    ));
    if let Some(barber) = &sale.barber_name {
        body.push_str(&format!("<p><strong>Barbeiro:</strong> {}</p>", escape(barber)));
    }
    body.push_str(&format!(
        "<p><strong>Status:</strong> {}</p>",
        escape(&capitalize(sale.status.as_deref().unwrap_or("-")))
    ));
    body.push_str("<div class=\"divider\"></div>");

    body.push_str(
        "<table><thead><tr><th>Item</th><th>Qtd</th><th class=\"right\">Valor Unit.</th>\
         <th class=\"right\">Subtotal</th></tr></thead><tbody>",
    );
    for item in &sale.items {
        let name = item
            .product_name
            .clone()
            .unwrap_or_else(|| format!("Produto #{}", item.produto_id));
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td></tr>",
            escape(&name),
            item.quantity,
            format_brl(item.unit_price),
            format_brl(item.quantity as f64 * item.unit_price)
        ));
    }
    body.push_str("</tbody></table><div class=\"divider\"></div>");

    body.push_str("<table>");
    for (label, value) in [
        ("Subtotal", format_brl(sale.subtotal)),
        ("Desconto", format_brl(sale.discount)),
        ("Impostos", format_brl(sale.tax)),
        ("TOTAL", format_brl(sale.total)),
        ("Total pago", format_brl(sale.paid_amount())),
    ] {
        body.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td class=\"right\">{}</td></tr>",
            label, value
        ));
    }
    body.push_str("</table>");

    if !sale.payments.is_empty() {
        body.push_str("<div class=\"divider\"></div><p><strong>Pagamentos:</strong></p><ul>");
        for payment in &sale.payments {
            body.push_str(&format!(
                "<li>{}: {}</li>",
                method_label(payment.method.as_deref()),
                format_brl(payment.amount)
            ));
        }
        body.push_str("</ul>");
    }

    body.push_str("<div class=\"footer\"><p>Obrigado pela preferência!</p></div>");
    page(&format!("Comprovante de Venda #{}", sale.id), RECEIPT_STYLE, &body)
}

pub fn sales_report_html(sales: &[Sale], filters_label: &str, generated_at: NaiveDateTime) -> String {
    let mut body = String::from("<h1>Relatório de Vendas</h1>");
    body.push_str(&format!(
        "<p><strong>Filtros aplicados:</strong> {}</p>",
        escape(filters_label)
    ));
    body.push_str(
        "<table><thead><tr><th>ID</th><th>Data</th><th>Cliente</th><th>Itens</th>\
         <th>Valor Total</th><th>Status</th></tr></thead><tbody>",
    );
    for sale in sales {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} item(ns)</td><td>{}</td><td>{}</td></tr>",
            sale.id,
            escape(&sale.created_at.as_deref().map(display_date).unwrap_or_default()),
            escape(&sale.client_label()),
            sale.items.len(),
            format_brl(sale.total),
            escape(&capitalize(sale.status.as_deref().unwrap_or("-")))
        ));
    }
    let total: f64 = sales.iter().map(|s| s.total).sum();
    body.push_str(&format!(
        "</tbody><tfoot><tr><th colspan=\"4\">Total:</th><th>{}</th><th>{} venda(s)</th></tr></tfoot></table>",
        format_brl(total),
        sales.len()
    ));
    body.push_str(&format!(
        "<div class=\"footer\"><p>B-Manager - Sistema de Gestão para Barbearias</p>\
         <p>Relatório gerado em {}</p></div>",
        format_datetime_br(generated_at)
    ));
    page("Relatório de Vendas - B-Manager", BASE_STYLE, &body)
}

/// Revenue report: one row per `(label, value)` plus the period summary
pub fn revenue_report_html(
    period_label: &str,
    rows: &[(String, f64)],
    summary: &[(&str, String)],
    generated_at: NaiveDateTime,
) -> String {
    let mut body = format!("<h1>Relatório Financeiro</h1><p><strong>Período:</strong> {}</p>", escape(period_label));
    body.push_str("<table><tbody>");
    for (label, value) in summary {
        body.push_str(&format!(
            "<tr><th>{}</th><td class=\"right\">{}</td></tr>",
            escape(label),
            escape(value)
        ));
    }
    body.push_str("</tbody></table>");

    body.push_str("<table><thead><tr><th>Data</th><th class=\"right\">Faturamento</th></tr></thead><tbody>");
    for (label, value) in rows {
        body.push_str(&format!(
            "<tr><td>{}</td><td class=\"right\">{}</td></tr>",
            escape(label),
            format_brl(*value)
        ));
    }
    body.push_str("</tbody></table>");
    body.push_str(&format!(
        "<div class=\"footer\"><p>Relatório gerado em {}</p></div>",
        format_datetime_br(generated_at)
    ));
    page("Relatório Financeiro - B-Manager", BASE_STYLE, &body)
}

/// Open an HTML document in a new tab. Fails when the popup is blocked.
#[cfg(target_arch = "wasm32")]
pub fn open_document(html: &str) -> Result<(), String> {
    let url = crate::utils::export::object_url(html, "text/html;charset=utf-8")?;
    let window = web_sys::window().ok_or("No window object")?;
    match window.open_with_url_and_target(&url, "_blank") {
        Ok(Some(_)) => Ok(()),
        _ => Err(
            "O bloqueador de pop-ups impediu a abertura da janela de impressão. Permita pop-ups para este site."
                .to_string(),
        ),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_document(_html: &str) -> Result<(), String> {
    Err("Impressão disponível apenas no navegador".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale() -> Sale {
        serde_json::from_str(
            r#"{"id": 42, "cliente_nome": "<script>alert(1)</script>", "data_hora": "2024-05-03T10:15:00",
                "subtotal": 100, "valor_desconto": 5, "valor_imposto": 8.5, "valor_total": 93.5,
                "status": "finalizada",
                "itens": [{"produto_id": 1, "produto_nome": "Pomada & Cera", "quantidade": 2, "valor_unitario": 50}],
                "pagamentos": [{"valor": 93.5, "forma_pagamento": "pix"}]}"#,
        )
        .unwrap()
    }

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 3).unwrap().and_hms_opt(18, 0, 0).unwrap()
    }

    #[test]
    fn test_receipt_escapes_backend_text() {
        let html = receipt_html(&sale(), &CompanyProfile::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(&escape("Pomada & Cera")));
        assert!(html.contains("&amp;"));
        assert!(html.contains("R$ 93,50"));
        assert!(html.contains("PIX: R$ 93,50"));
        assert!(html.contains(&escape("03/05/2024 10:15")));
    }

    #[test]
    fn test_sales_report_totals() {
        let html = sales_report_html(&[sale(), sale()], "Status: todos", generated());
        assert!(html.contains("R$ 187,00"));
        assert!(html.contains("2 venda(s)"));
        assert!(html.contains("03/05/2024 18:00"));
    }

    #[test]
    fn test_revenue_report_rows() {
        let rows = vec![("01/05".to_string(), 10.0), ("02/05".to_string(), 1234.5)];
        let html = revenue_report_html("Últimos 7 dias", &rows, &[("Total", "R$ 1.244,50".to_string())], generated());
        assert!(html.contains("R$ 1.234,50"));
        assert!(html.contains(&escape("Últimos 7 dias")));
    }
}
