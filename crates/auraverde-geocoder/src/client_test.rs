use super::*;

fn client(base_url: &str) -> NominatimClient {
    NominatimClient::with_base_url("auraverde-test/0.1", 5, base_url).unwrap()
}

#[test]
fn search_url_encodes_address_and_fixes_limit() {
    let url = client("https://nominatim.openstreetmap.org").search_url("Hector Plano 58, Bahia Blanca, 8000");
    assert_eq!(
        url.as_str(),
        "https://nominatim.openstreetmap.org/search?q=Hector+Plano+58%2C+Bahia+Blanca%2C+8000&format=json&limit=1"
    );
}

#[test]
fn search_url_keeps_base_path_prefix() {
    let url = client("http://localhost:8080/nominatim/").search_url("x");
    assert_eq!(url.path(), "/nominatim/search");
}

#[test]
fn with_base_url_rejects_garbage() {
    let result = NominatimClient::with_base_url("ua", 5, "not a url");
    assert!(
        matches!(result, Err(GeocoderError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}

#[test]
fn with_base_url_requires_user_agent() {
    let result = NominatimClient::with_base_url("  ", 5, DEFAULT_BASE_URL);
    assert!(matches!(result, Err(GeocoderError::MissingUserAgent)));
}

#[test]
fn parse_returns_first_match() {
    let body = r#"[
        {"lat": "-38.7183", "lon": "-62.2663", "display_name": "Plaza Rivadavia"},
        {"lat": "0", "lon": "0"}
    ]"#;
    let coordinate = parse_search_response(body).unwrap();
    assert_eq!(coordinate, Coordinate::new(-38.7183, -62.2663));
}

#[test]
fn parse_empty_list_is_no_match() {
    assert_eq!(parse_search_response("[]"), Err(NotFoundReason::NoMatch));
}

#[test]
fn parse_non_json_is_malformed() {
    assert!(matches!(
        parse_search_response("<html>busy</html>"),
        Err(NotFoundReason::MalformedResponse(_))
    ));
}

#[test]
fn parse_object_instead_of_list_is_malformed() {
    assert!(matches!(
        parse_search_response(r#"{"error": "rate limited"}"#),
        Err(NotFoundReason::MalformedResponse(_))
    ));
}

#[test]
fn parse_non_numeric_latitude_is_invalid_coordinate() {
    let result = parse_search_response(r#"[{"lat": "north-ish", "lon": "-62.2"}]"#);
    assert_eq!(
        result,
        Err(NotFoundReason::InvalidCoordinate {
            lat: "north-ish".to_string(),
            lon: "-62.2".to_string(),
        })
    );
}

#[test]
fn parse_nan_and_infinity_are_rejected() {
    for (lat, lon) in [("NaN", "-62.2"), ("-38.7", "inf"), ("-infinity", "0")] {
        let body = format!(r#"[{{"lat": "{lat}", "lon": "{lon}"}}]"#);
        assert!(
            matches!(
                parse_search_response(&body),
                Err(NotFoundReason::InvalidCoordinate { .. })
            ),
            "expected {lat}/{lon} to be rejected"
        );
    }
}

#[test]
fn parse_trims_whitespace_around_numbers() {
    let coordinate = parse_search_response(r#"[{"lat": " -38.7 ", "lon": "-62.2"}]"#).unwrap();
    assert_eq!(coordinate, Coordinate::new(-38.7, -62.2));
}
