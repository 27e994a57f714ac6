//! Checkout totals: cart subtotal plus the shipping quote for the
//! selected address.

use auraverde_core::{CartLine, CheckoutSummary, QuoteBasis, ShippingAddress};
use axum::{extract::State, Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::shipping::resolve_address;
use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutRequest {
    pub items: Vec<CartLine>,
    pub address: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckoutData {
    #[serde(flatten)]
    pub summary: CheckoutSummary,
    pub currency: &'static str,
    pub items_until_free_shipping: u32,
    pub shipping_basis: QuoteBasis,
}

fn validate_items(req_id: &str, items: &[CartLine]) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::validation(req_id, "cart is empty"));
    }

    for line in items {
        if line.quantity == 0 {
            return Err(ApiError::validation(
                req_id,
                format!("item '{}' must have a quantity of at least 1", line.product_id),
            ));
        }
        if line.unit_price < Decimal::ZERO {
            return Err(ApiError::validation(
                req_id,
                format!("item '{}' has a negative unit_price", line.product_id),
            ));
        }
    }

    if auraverde_core::subtotal(items).is_none() {
        return Err(ApiError::validation(req_id, "cart total is too large"));
    }

    Ok(())
}

pub(super) async fn summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<ApiResponse<CheckoutData>>, ApiError> {
    validate_items(&req_id.0, &body.items)?;
    if body
        .shipping_address
        .as_ref()
        .is_some_and(|a| !a.is_complete())
    {
        return Err(ApiError::validation(
            &req_id.0,
            "shipping_address needs both a street address and a city",
        ));
    }
    let address = resolve_address(&req_id.0, body.address, body.shipping_address.as_ref())?;

    let item_count = auraverde_core::item_count(&body.items);
    let quote = state.engine.quote(address.as_deref(), item_count).await;
    let summary = CheckoutSummary::try_new(&body.items, quote.amount)
        .ok_or_else(|| ApiError::validation(&req_id.0, "cart total is too large"))?;

    tracing::info!(
        item_count,
        subtotal = %summary.subtotal,
        shipping = %summary.shipping,
        total = %summary.total,
        "checkout summary computed"
    );

    Ok(Json(ApiResponse::new(
        CheckoutData {
            summary,
            currency: "ARS",
            items_until_free_shipping: state.engine.policy().items_until_free(item_count),
            shipping_basis: quote.basis,
        },
        req_id.0,
    )))
}
