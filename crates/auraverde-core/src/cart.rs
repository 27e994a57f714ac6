//! Cart-side values the shipping engine consumes: the delivery address and
//! the line items whose quantities decide free shipping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A saved delivery address as the storefront collects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street and number, e.g. `"Hector Plano 58"`.
    pub address: String,
    pub city: String,
    pub zip: String,
}

impl ShippingAddress {
    /// Joins street, city and postal code with `", "`, the shape the
    /// geocoder receives. Blank parts are skipped so a missing zip does not
    /// leave a dangling separator.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        [&self.address, &self.city, &self.zip]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// An address counts as usable once it has both a street and a city.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && !self.city.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    /// Unit price in ARS, serialized as a decimal string.
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price × quantity`, or `None` if the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum of quantities across all lines.
#[must_use]
pub fn item_count(lines: &[CartLine]) -> i64 {
    lines.iter().map(|l| i64::from(l.quantity)).sum()
}

/// Sum of line totals, or `None` if any step overflows.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.line_total()?))
}

/// Totals shown on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub item_count: i64,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl CheckoutSummary {
    /// Builds the summary for `lines` plus a shipping amount.
    ///
    /// Returns `None` when the prices are too large to total without
    /// overflowing `Decimal`.
    #[must_use]
    pub fn try_new(lines: &[CartLine], shipping: u32) -> Option<Self> {
        let subtotal = subtotal(lines)?;
        let shipping = Decimal::from(shipping);
        Some(Self {
            item_count: item_count(lines),
            subtotal,
            shipping,
            total: subtotal.checked_add(shipping)?,
        })
    }
}
