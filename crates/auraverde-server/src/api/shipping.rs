//! Shipping quote and policy handlers.

use auraverde_core::{QuoteBasis, ShippingAddress, ShippingPolicy, ShippingRequest};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct QuantityLine {
    pub quantity: u32,
}

/// Either a free-text `address` or a structured `shipping_address`, plus
/// either an explicit `total_items` or the cart `items` to count.
#[derive(Debug, Deserialize)]
pub(super) struct QuoteRequest {
    pub address: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub total_items: Option<i64>,
    #[serde(default)]
    pub items: Vec<QuantityLine>,
}

#[derive(Debug, Serialize)]
pub(super) struct QuoteData {
    pub amount: u32,
    pub currency: &'static str,
    pub free: bool,
    pub items_until_free_shipping: u32,
    pub basis: QuoteBasis,
}

/// Picks the address string the engine should price.
///
/// Supplying both forms is ambiguous and rejected.
pub(super) fn resolve_address(
    req_id: &str,
    address: Option<String>,
    shipping_address: Option<&ShippingAddress>,
) -> Result<Option<String>, ApiError> {
    match (address, shipping_address) {
        (Some(_), Some(_)) => Err(ApiError::validation(
            req_id,
            "provide either 'address' or 'shipping_address', not both",
        )),
        (Some(address), None) => Ok(Some(address)),
        (None, Some(structured)) => Ok(Some(structured.to_query_string())),
        (None, None) => Ok(None),
    }
}

fn resolve_item_count(total_items: Option<i64>, items: &[QuantityLine]) -> i64 {
    total_items.unwrap_or_else(|| items.iter().map(|l| i64::from(l.quantity)).sum())
}

pub(super) async fn quote(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<ApiResponse<QuoteData>>, ApiError> {
    let request = ShippingRequest {
        address: resolve_address(&req_id.0, body.address, body.shipping_address.as_ref())?,
        total_items: resolve_item_count(body.total_items, &body.items),
    };

    let quote = state.engine.quote_request(&request).await;
    let items_until_free_shipping = state.engine.policy().items_until_free(request.total_items);

    Ok(Json(ApiResponse::new(
        QuoteData {
            amount: quote.amount,
            currency: "ARS",
            free: quote.is_free(),
            items_until_free_shipping,
            basis: quote.basis,
        },
        req_id.0,
    )))
}

pub(super) async fn policy(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ShippingPolicy>> {
    Json(ApiResponse::new(state.engine.policy().clone(), req_id.0))
}
