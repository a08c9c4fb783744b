// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the directions adapter

use geo_services::directions::OFFLINE_DURATION_LABEL;
use geo_services::{DirectionsClient, DirectionsConfig};
use serde_json::json;
use shared_types::LatLon;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DirectionsClient {
    DirectionsClient::new(DirectionsConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .expect("directions client")
}

const START: LatLon = LatLon {
    lat: 16.0613,
    lon: 108.2274,
};
const END: LatLon = LatLon {
    lat: 16.0544,
    lon: 108.2488,
};

#[tokio::test]
async fn route_is_translated_into_localized_steps() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{
                "distance": 2500.0,
                "duration": 420.0,
                "geometry": {"coordinates": [[108.2274, 16.0613], [108.2488, 16.0544]]},
                "legs": [{
                    "steps": [
                        {"name": "Trần Hưng Đạo", "distance": 850.4, "maneuver": {"type": "depart"}},
                        {"name": "", "distance": 1200.0, "maneuver": {"type": "turn", "modifier": "left"}},
                        {"name": "", "distance": 0.0, "maneuver": {"type": "arrive"}}
                    ]
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let route = client_for(&server).fetch_directions(START, END).await;

    assert_eq!(route.summary.total_distance, "2.5 km");
    assert_eq!(route.summary.total_duration, "7 phút");

    assert_eq!(route.steps.len(), 3);
    assert_eq!(route.steps[0].instruction, "Khởi hành vào Trần Hưng Đạo");
    assert_eq!(route.steps[0].distance, "850 m");
    assert_eq!(route.steps[1].instruction, "Rẽ trái");
    assert_eq!(route.steps[1].distance, "1.2 km");
    assert_eq!(route.steps[2].instruction, "Bạn đã đến đích");
    assert_eq!(route.steps[2].distance, "");

    // Service (lon, lat) pairs arrive swapped into (lat, lon).
    assert_eq!(route.route_geometry, vec![START, END]);
    server.verify().await;
}

#[tokio::test]
async fn service_failure_falls_back_to_straight_line() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let route = client_for(&server).fetch_directions(START, END).await;

    assert_eq!(route.summary.total_duration, OFFLINE_DURATION_LABEL);
    assert_eq!(route.route_geometry, vec![START, END]);
    assert_eq!(route.steps.len(), 1);
    assert_eq!(route.steps[0].instruction, "Chế độ offline: Đi thẳng đến đích");
    // The great-circle estimate still yields a formatted distance.
    assert!(route.summary.total_distance.ends_with(" km") || route.summary.total_distance.ends_with(" m"));
}

#[tokio::test]
async fn empty_route_list_falls_back_to_straight_line() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": "NoRoute", "routes": []})),
        )
        .mount(&server)
        .await;

    let route = client_for(&server).fetch_directions(START, END).await;

    assert_eq!(route.summary.total_duration, OFFLINE_DURATION_LABEL);
    assert_eq!(route.route_geometry.len(), 2);
}
