use crate::state::test_helpers::{memory_app_state, spawn_app};

fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn healthz_returns_ok() {
    let base = spawn_app(memory_app_state()).await;
    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_is_json_not_found() {
    let base = spawn_app(memory_app_state()).await;
    let response = reqwest::get(format!("{base}/api/floors")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Not found" }));
}

#[tokio::test]
async fn unsupported_method_on_building_is_not_found() {
    let base = spawn_app(memory_app_state()).await;
    let response = reqwest::Client::new()
        .delete(format!("{base}/api/buildings/sample"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preflight_on_any_path_is_no_content() {
    let base = spawn_app(memory_app_state()).await;
    for path in ["/api/buildings/sample", "/anything/at/all"] {
        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("{base}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
        assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
        assert_eq!(header(&response, "access-control-allow-methods"), Some("GET, POST, OPTIONS"));
        assert_eq!(header(&response, "access-control-allow-headers"), Some("Content-Type"));
        assert_eq!(header(&response, "access-control-max-age"), Some("86400"));
    }
}

#[tokio::test]
async fn json_responses_carry_cors_and_no_cache() {
    let base = spawn_app(memory_app_state()).await;
    let response = reqwest::get(format!("{base}/api/buildings")).await.unwrap();
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&response, "access-control-allow-methods"), Some("GET, POST, OPTIONS"));
    assert_eq!(header(&response, "cache-control"), Some("no-cache"));
    assert_eq!(header(&response, "access-control-max-age"), None);
}

#[tokio::test]
async fn health_probe_is_not_marked_no_cache() {
    let base = spawn_app(memory_app_state()).await;
    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&response, "cache-control"), None);
}

#[tokio::test]
async fn demo_document_is_served_from_data() {
    let base = spawn_app(memory_app_state()).await;
    let response = reqwest::get(format!("{base}/data/demo-building.json")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let raw = response.text().await.unwrap();
    let building = floorplan::doc::Building::from_json(&raw).unwrap();
    assert_eq!(building.building_id, "sample");
}
