// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the geocoding adapter

use geo_services::{GeocodingClient, GeocodingConfig};
use serde_json::json;
use shared_types::LatLon;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeocodingClient {
    GeocodingClient::new(GeocodingConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        ..GeocodingConfig::default()
    })
    .expect("geocoding client")
}

#[tokio::test]
async fn short_queries_never_touch_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let results = client_for(&server).search_address("ab").await;

    assert!(results.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn search_issues_one_localized_restricted_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Cau Rong"))
        .and(query_param("countrycodes", "vn"))
        .and(query_param("limit", "5"))
        .and(header("Accept-Language", "vi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"display_name": "Cầu Rồng, Hải Châu, Đà Nẵng, Việt Nam",
             "lat": "16.0613", "lon": "108.2274"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server).search_address("Cau Rong").await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Cầu Rồng");
    assert_eq!(
        results[0].address,
        "Cầu Rồng, Hải Châu, Đà Nẵng, Việt Nam"
    );
    assert_eq!(results[0].coordinates, LatLon::new(16.0613, 108.2274));
    server.verify().await;
}

#[tokio::test]
async fn search_failure_degrades_to_no_suggestions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let results = client_for(&server).search_address("Cau Rong").await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn reverse_lookup_returns_first_address_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("zoom", "18"))
        .and(header("Accept-Language", "vi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "display_name": "Bãi biển Mỹ Khê, Sơn Trà, Đà Nẵng"
        })))
        .mount(&server)
        .await;

    let label = client_for(&server)
        .reverse_geocode(LatLon::new(16.0544, 108.2488))
        .await;

    assert_eq!(label, "Bãi biển Mỹ Khê");
}

#[tokio::test]
async fn reverse_lookup_without_name_uses_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let label = client_for(&server)
        .reverse_geocode(LatLon::new(16.0544, 108.2488))
        .await;

    assert_eq!(label, "Vị trí đã chọn");
}

#[tokio::test]
async fn reverse_lookup_failure_formats_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let label = client_for(&server)
        .reverse_geocode(LatLon::new(16.05443, 108.24879))
        .await;

    assert_eq!(label, "16.0544, 108.2488");
}
