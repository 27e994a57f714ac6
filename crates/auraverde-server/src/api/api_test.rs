use std::time::Duration;

use auraverde_core::ShippingPolicy;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn app_with_geocoder(server: &MockServer) -> Router {
    let geocoder = NominatimClient::with_base_url("auraverde-test/0.1", 2, &server.uri())
        .expect("geocoder client");
    let engine = Arc::new(ShippingEngine::new(ShippingPolicy::default(), geocoder));
    build_app(
        AppState { engine },
        RateLimitState::new(100, Duration::from_secs(60)),
    )
}

async fn mount_store_location(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"lat": "-38.7361644", "lon": "-62.2874379"}])),
        )
        .mount(server)
        .await;
}

async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_unknown_code_maps_to_internal_error() {
    let response = ApiError::new("req-1", "boom", "unexpected").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_reports_ok_with_request_id() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "health-1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "health-1");
}

#[tokio::test]
async fn policy_endpoint_exposes_active_tiers() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/shipping/policy")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"]["national_price"], 8500);
    assert_eq!(json["data"]["local_tiers"][0]["price"], 1500);
    assert_eq!(json["data"]["free_threshold"], 5);
}

#[tokio::test]
async fn quote_for_local_address_uses_distance_tier() {
    let server = MockServer::start().await;
    mount_store_location(&server).await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/shipping/quote",
        &json!({"address": "Hector Plano 58, Bahia Blanca, 8000", "total_items": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["amount"], 1500);
    assert_eq!(json["data"]["currency"], "ARS");
    assert_eq!(json["data"]["free"], false);
    assert_eq!(json["data"]["items_until_free_shipping"], 4);
    assert_eq!(json["data"]["basis"]["kind"], "local_distance");
    assert_eq!(json["data"]["basis"]["tier"], 1);
}

#[tokio::test]
async fn quote_accepts_structured_address_and_counts_items() {
    let server = MockServer::start().await;
    mount_store_location(&server).await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/shipping/quote",
        &json!({
            "shipping_address": {"address": "Hector Plano 58", "city": "Bahia Blanca", "zip": "8000"},
            "items": [{"quantity": 1}, {"quantity": 2}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["amount"], 1500);
    assert_eq!(json["data"]["items_until_free_shipping"], 2);
}

#[tokio::test]
async fn quote_for_national_address_does_not_geocode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/shipping/quote",
        &json!({"address": "Av. Libertador 1000, Buenos Aires", "total_items": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["amount"], 8500);
    assert_eq!(json["data"]["basis"]["kind"], "national");
}

#[tokio::test]
async fn quote_falls_back_when_geocoder_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/shipping/quote",
        &json!({"address": "Alem 1200, Bahia Blanca", "total_items": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["amount"], 5000);
    assert_eq!(json["data"]["basis"]["kind"], "local_fallback");
}

#[tokio::test]
async fn quote_with_five_items_and_no_address_is_free() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let (status, json) =
        post_json(app, "/api/v1/shipping/quote", &json!({"total_items": 5})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["amount"], 0);
    assert_eq!(json["data"]["free"], true);
    assert_eq!(json["data"]["basis"]["kind"], "free_threshold");
}

#[tokio::test]
async fn quote_rejects_both_address_forms() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/shipping/quote",
        &json!({
            "address": "Alem 1200, Bahia Blanca",
            "shipping_address": {"address": "Alem 1200", "city": "Bahia Blanca", "zip": "8000"},
            "total_items": 1
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn checkout_summary_adds_shipping_to_subtotal() {
    let server = MockServer::start().await;
    mount_store_location(&server).await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/checkout/summary",
        &json!({
            "items": [
                {"product_id": "monstera", "name": "Monstera", "unit_price": "12000", "quantity": 1},
                {"product_id": "pothos", "name": "Pothos", "unit_price": "4500.50", "quantity": 2}
            ],
            "shipping_address": {"address": "Hector Plano 58", "city": "Bahia Blanca", "zip": "8000"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["item_count"], 3);
    assert_eq!(json["data"]["subtotal"], "21001.00");
    assert_eq!(json["data"]["shipping"], "1500");
    assert_eq!(json["data"]["total"], "22501.00");
    assert_eq!(json["data"]["items_until_free_shipping"], 2);
    assert_eq!(json["data"]["shipping_basis"]["kind"], "local_distance");
}

#[tokio::test]
async fn checkout_summary_with_five_items_ships_free() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/checkout/summary",
        &json!({
            "items": [
                {"product_id": "cactus", "name": "Cactus", "unit_price": "2000", "quantity": 5}
            ],
            "address": "Av. Libertador 1000, Buenos Aires"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["shipping"], "0");
    assert_eq!(json["data"]["total"], "10000");
    assert_eq!(json["data"]["items_until_free_shipping"], 0);
}

#[tokio::test]
async fn checkout_summary_rejects_empty_cart() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/checkout/summary",
        &json!({"items": [], "address": "Alem 1200, Bahia Blanca"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "cart is empty");
}

#[tokio::test]
async fn checkout_summary_rejects_zero_quantity() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/checkout/summary",
        &json!({
            "items": [{"product_id": "fern", "name": "Fern", "unit_price": "100", "quantity": 0}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn checkout_summary_rejects_negative_price() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let (status, _) = post_json(
        app,
        "/api/v1/checkout/summary",
        &json!({
            "items": [{"product_id": "fern", "name": "Fern", "unit_price": "-1", "quantity": 1}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_summary_rejects_cart_total_that_overflows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/checkout/summary",
        &json!({
            "items": [{
                "product_id": "bonsai",
                "name": "Bonsai",
                "unit_price": "79228162514264337593543950335",
                "quantity": 2
            }],
            "address": "Alem 1200, Bahia Blanca"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["message"], "cart total is too large");
}

#[tokio::test]
async fn checkout_summary_rejects_shipping_address_without_city() {
    let server = MockServer::start().await;
    let app = app_with_geocoder(&server);

    let (status, json) = post_json(
        app,
        "/api/v1/checkout/summary",
        &json!({
            "items": [{"product_id": "fern", "name": "Fern", "unit_price": "100", "quantity": 1}],
            "shipping_address": {"address": "Alem 1200", "city": "  ", "zip": "8000"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}
