//! Shopping cart for the new-sale modal.
//!
//! The cart is owned by the sales page (`use_signal(Cart::default)`), so it
//! starts empty every time the page mounts. Every mutation keeps
//! `1 <= quantity <= stock_available` and `0 <= discount_percent <= 100`;
//! operations that had to refuse or clamp the request return a
//! [`CartNotice`] for the page to show as a warning toast.

use crate::services::products::Product;
use crate::services::sales::{NewSale, NewSaleItem};
use crate::utils::format::parse_decimal;

const MIN_UNIT_PRICE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub stock_available: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        line_subtotal(self.quantity, self.unit_price, self.discount_percent)
    }
}

/// `quantity * unit_price * (1 - discount_percent / 100)`
pub fn line_subtotal(quantity: u32, unit_price: f64, discount_percent: f64) -> f64 {
    quantity as f64 * unit_price * (1.0 - discount_percent / 100.0)
}

/// Warning raised when a cart operation was refused or adjusted
#[derive(Debug, Clone, PartialEq)]
pub enum CartNotice {
    OutOfStock { name: String },
    StockLimit { name: String, stock: u32 },
    QuantityClamped { stock: u32 },
}

impl CartNotice {
    pub fn message(&self) -> String {
        match self {
            Self::OutOfStock { name } => format!("{} está sem estoque", name),
            Self::StockLimit { name, stock } => {
                format!("Estoque insuficiente para {}: disponível {}", name, stock)
            }
            Self::QuantityClamped { stock } => {
                format!("Quantidade ajustada para o estoque disponível ({})", stock)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
    /// Global discount as a rounded percentage of the subtotal
    pub discount_share_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn add_product(&mut self, product: &Product) -> Option<CartNotice> {
        let stock = product.available_stock();
        if stock == 0 {
            return Some(CartNotice::OutOfStock {
                name: product.name.clone(),
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            if line.quantity + 1 > stock {
                return Some(CartNotice::StockLimit {
                    name: product.name.clone(),
                    stock,
                });
            }
            line.quantity += 1;
            line.stock_available = stock;
            return None;
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            quantity: 1,
            unit_price: product.price.max(MIN_UNIT_PRICE),
            discount_percent: 0.0,
            stock_available: stock,
        });
        None
    }

    pub fn increment(&mut self, index: usize) -> Option<CartNotice> {
        let line = self.lines.get_mut(index)?;
        if line.quantity + 1 > line.stock_available {
            return Some(CartNotice::StockLimit {
                name: line.name.clone(),
                stock: line.stock_available,
            });
        }
        line.quantity += 1;
        None
    }

    pub fn decrement(&mut self, index: usize) {
        if let Some(line) = self.lines.get_mut(index) {
            if line.quantity > 1 {
                line.quantity -= 1;
            }
        }
    }

    /// Typed quantity; non-numbers and values below 1 become 1
    pub fn update_quantity(&mut self, index: usize, raw: &str) -> Option<CartNotice> {
        let line = self.lines.get_mut(index)?;
        let requested = raw.trim().parse::<i64>().unwrap_or(1).max(1);
        if requested > line.stock_available as i64 {
            line.quantity = line.stock_available;
            return Some(CartNotice::QuantityClamped {
                stock: line.stock_available,
            });
        }
        line.quantity = requested as u32;
        None
    }

    pub fn update_unit_price(&mut self, index: usize, raw: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.unit_price = parse_decimal(raw)
                .filter(|p| *p > 0.0)
                .unwrap_or(MIN_UNIT_PRICE);
        }
    }

    pub fn update_discount(&mut self, index: usize, raw: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.discount_percent = parse_decimal(raw).unwrap_or(0.0).clamp(0.0, 100.0);
        }
    }

    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Clearing a non-empty cart must be confirmed by the user first
    pub fn needs_clear_confirmation(&self) -> bool {
        !self.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn totals(&self, global_discount: f64, tax_percent: f64) -> CartTotals {
        let subtotal = self.subtotal();
        let discount = if global_discount.is_finite() {
            global_discount.max(0.0)
        } else {
            0.0
        };
        let tax_percent = if tax_percent.is_finite() {
            tax_percent.clamp(0.0, 100.0)
        } else {
            0.0
        };

        let taxable = subtotal - discount;
        let tax = taxable * tax_percent / 100.0;
        let total = (taxable + tax).max(0.0);
        let discount_share_percent = if subtotal > 0.0 {
            (discount / subtotal * 100.0).round().max(0.0) as u32
        } else {
            0
        };

        CartTotals {
            subtotal,
            discount,
            tax,
            total,
            discount_share_percent,
        }
    }

    /// Request body for `POST /vendas/`; `None` while the cart is empty
    pub fn to_sale_request(
        &self,
        client_id: Option<i64>,
        barber_id: Option<i64>,
        global_discount: f64,
        tax_percent: f64,
        notes: &str,
    ) -> Option<NewSale> {
        if self.is_empty() {
            return None;
        }
        let totals = self.totals(global_discount, tax_percent);
        Some(NewSale {
            cliente_id: client_id,
            barbeiro_id: barber_id,
            valor_desconto: totals.discount,
            percentual_imposto: if tax_percent.is_finite() {
                tax_percent.clamp(0.0, 100.0)
            } else {
                0.0
            },
            observacao: notes.trim().to_string(),
            itens: self
                .lines
                .iter()
                .map(|line| NewSaleItem {
                    produto_id: line.product_id,
                    quantidade: line.quantity,
                    valor_unitario: line.unit_price,
                    percentual_desconto: line.discount_percent,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn product(id: i64, price: f64, stock: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "codigo": format!("P{}", id),
            "nome": format!("Produto {}", id),
            "preco": price,
            "quantidade_estoque": stock,
        }))
        .unwrap()
    }

    fn cart_with(price: f64, stock: i64) -> Cart {
        let mut cart = Cart::default();
        assert_eq!(cart.add_product(&product(1, price, stock)), None);
        cart
    }

    #[test]
    fn test_zero_stock_is_rejected() {
        let mut cart = Cart::default();
        let notice = cart.add_product(&product(1, 10.0, 0));
        assert!(matches!(notice, Some(CartNotice::OutOfStock { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adding_again_increments_until_stock() {
        let mut cart = cart_with(10.0, 2);
        assert_eq!(cart.add_product(&product(1, 10.0, 2)), None);
        assert_eq!(cart.lines()[0].quantity, 2);

        let notice = cart.add_product(&product(1, 10.0, 2));
        assert!(matches!(notice, Some(CartNotice::StockLimit { stock: 2, .. })));
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_increment_and_decrement_bounds() {
        let mut cart = cart_with(10.0, 1);
        assert!(cart.increment(0).is_some());
        assert_eq!(cart.lines()[0].quantity, 1);
        cart.decrement(0);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.increment(5), None);
    }

    #[test]
    fn test_update_quantity_clamps() {
        let mut cart = cart_with(10.0, 5);
        assert_eq!(cart.update_quantity(0, "3"), None);
        assert_eq!(cart.lines()[0].quantity, 3);

        assert_eq!(cart.update_quantity(0, "0"), None);
        assert_eq!(cart.lines()[0].quantity, 1);

        assert_eq!(cart.update_quantity(0, "abc"), None);
        assert_eq!(cart.lines()[0].quantity, 1);

        let notice = cart.update_quantity(0, "9");
        assert_eq!(notice, Some(CartNotice::QuantityClamped { stock: 5 }));
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_price_and_discount_normalisation() {
        let mut cart = cart_with(10.0, 5);
        cart.update_unit_price(0, "-3");
        assert_eq!(cart.lines()[0].unit_price, 0.01);
        cart.update_unit_price(0, "12,50");
        assert_eq!(cart.lines()[0].unit_price, 12.5);

        cart.update_discount(0, "150");
        assert_eq!(cart.lines()[0].discount_percent, 100.0);
        cart.update_discount(0, "-5");
        assert_eq!(cart.lines()[0].discount_percent, 0.0);
        cart.update_discount(0, "x");
        assert_eq!(cart.lines()[0].discount_percent, 0.0);
    }

    #[test]
    fn test_line_subtotal_monotonic() {
        let mut previous = 0.0;
        for quantity in 1..10 {
            let value = line_subtotal(quantity, 15.0, 20.0);
            assert!(value >= previous);
            previous = value;
        }
        let mut previous = f64::MAX;
        for discount in [0.0, 10.0, 25.0, 50.0, 100.0] {
            let value = line_subtotal(3, 15.0, discount);
            assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn test_totals_simple() {
        let mut cart = cart_with(10.0, 5);
        cart.increment(0);
        let totals = cart.totals(0.0, 0.0);
        assert!(approx(totals.subtotal, 20.0));
        assert!(approx(totals.total, 20.0));
        assert_eq!(totals.discount_share_percent, 0);
    }

    #[test]
    fn test_totals_with_discounts_and_tax() {
        let mut cart = cart_with(100.0, 5);
        cart.update_discount(0, "10");
        assert!(approx(cart.lines()[0].subtotal(), 90.0));

        let totals = cart.totals(5.0, 10.0);
        assert!(approx(totals.subtotal, 90.0));
        assert!(approx(totals.tax, 8.5));
        assert!(approx(totals.total, 93.5));
        assert_eq!(totals.discount_share_percent, 6);
    }

    #[test]
    fn test_total_never_negative() {
        let cart = cart_with(10.0, 5);
        for discount in [0.0, 5.0, 10.0, 50.0, 1000.0] {
            for tax in [0.0, 10.0, 100.0] {
                assert!(cart.totals(discount, tax).total >= 0.0);
            }
        }
        assert!(Cart::default().totals(10.0, 10.0).total >= 0.0);
    }

    #[test]
    fn test_sale_request() {
        let mut cart = Cart::default();
        assert!(cart.to_sale_request(None, None, 0.0, 0.0, "").is_none());

        cart.add_product(&product(4, 25.0, 3));
        cart.update_discount(0, "10");
        let request = cart.to_sale_request(Some(2), None, 1.0, 5.0, " obs ").unwrap();
        assert_eq!(request.cliente_id, Some(2));
        assert_eq!(request.observacao, "obs");
        assert_eq!(request.itens.len(), 1);
        assert_eq!(request.itens[0].produto_id, 4);
        assert_eq!(request.itens[0].percentual_desconto, 10.0);

        assert!(cart.needs_clear_confirmation());
        cart.clear();
        assert!(!cart.needs_clear_confirmation());
    }
}
