//! Tests for the HTTP catalog adapter against a local fixture server.

use std::collections::HashMap;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use launch_catalog::{CatalogError, HttpLaunchCatalog, LaunchCatalog, LaunchCatalogExt, LaunchId};
use reqwest::Url;

const FIXTURE: &str = r#"[
    {
        "flight_number": 3,
        "mission_name": "Trailblazer",
        "launch_site": {"site_name": "Kwajalein Atoll"},
        "links": {"mission_patch": "https://images.example/3.png", "mission_patch_small": "https://images.example/3s.png"},
        "rocket": {"rocket_id": "falcon1", "rocket_name": "Falcon 1", "rocket_type": "Merlin C"}
    },
    {
        "flight_number": 1,
        "mission_name": "FalconSat",
        "launch_site": {"site_name": "Kwajalein Atoll"},
        "links": {"mission_patch": "https://images.example/1.png", "mission_patch_small": null},
        "rocket": {"rocket_id": "falcon1", "rocket_name": "Falcon 1", "rocket_type": "Merlin A"}
    },
    {
        "flight_number": 2,
        "mission_name": "DemoSat",
        "launch_site": {"site_name": "Kwajalein Atoll"},
        "links": {"mission_patch": null, "mission_patch_small": null},
        "rocket": {"rocket_id": "falcon1", "rocket_name": "Falcon 1", "rocket_type": "Merlin A"}
    }
]"#;

async fn launches(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let all: Vec<serde_json::Value> = serde_json::from_str(FIXTURE).unwrap();
    let selected: Vec<serde_json::Value> = match params.get("flight_number") {
        Some(n) => all
            .into_iter()
            .filter(|launch| launch["flight_number"].to_string() == *n)
            .collect(),
        None => all,
    };
    (
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&selected).unwrap(),
    )
}

async fn spawn_server(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/v2/")).unwrap()
}

async fn fixture_catalog() -> HttpLaunchCatalog {
    let base = spawn_server(Router::new().route("/v2/launches", get(launches))).await;
    HttpLaunchCatalog::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn get_all_launches_sorts_by_flight_number() {
    let catalog = fixture_catalog().await;

    let launches = catalog.get_all_launches().await.unwrap();
    let ids: Vec<_> = launches.iter().map(|launch| launch.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(launches[0].mission.name.as_deref(), Some("FalconSat"));
    assert_eq!(launches[0].site.as_deref(), Some("Kwajalein Atoll"));
    assert_eq!(launches[0].rocket.name.as_deref(), Some("Falcon 1"));
}

#[tokio::test]
async fn records_without_or_repeating_flight_numbers_yield_unique_ids() {
    let payload = r#"[
        {"mission_name": "Unnumbered"},
        {"flight_number": 2, "mission_name": "DemoSat"},
        {},
        {"flight_number": 1, "mission_name": "FalconSat"},
        {"flight_number": 2, "mission_name": "DemoSat rerun"}
    ]"#;
    let base = spawn_server(Router::new().route(
        "/v2/launches",
        get(move || async move {
            ([(axum::http::header::CONTENT_TYPE, "application/json")], payload)
        }),
    ))
    .await;
    let catalog = HttpLaunchCatalog::new(base, Duration::from_secs(5)).unwrap();

    let launches = catalog.get_all_launches().await.unwrap();
    let ids: Vec<_> = launches.iter().map(|launch| launch.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(launches[1].mission.name.as_deref(), Some("DemoSat"));
}

#[tokio::test]
async fn get_launch_by_id_filters_on_flight_number() {
    let catalog = fixture_catalog().await;

    let launch = catalog
        .get_launch_by_id(LaunchId::new(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(launch.mission.name.as_deref(), Some("Trailblazer"));
    assert_eq!(
        launch.mission.mission_patch_small.as_deref(),
        Some("https://images.example/3s.png")
    );

    assert!(catalog.get_launch_by_id(LaunchId::new(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn get_launches_by_ids_fetches_each_launch() {
    let catalog = fixture_catalog().await;

    let launches = catalog
        .get_launches_by_ids(&[LaunchId::new(2), LaunchId::new(1)])
        .await
        .unwrap();
    let ids: Vec<_> = launches.iter().map(|launch| launch.id.as_i64()).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn error_status_is_reported() {
    let base = spawn_server(Router::new().route(
        "/v2/launches",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    ))
    .await;
    let catalog = HttpLaunchCatalog::new(base, Duration::from_secs(5)).unwrap();

    match catalog.get_all_launches().await {
        Err(CatalogError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let base = spawn_server(Router::new().route("/v2/launches", get(|| async { "not json" }))).await;
    let catalog = HttpLaunchCatalog::new(base, Duration::from_secs(5)).unwrap();

    assert!(matches!(
        catalog.get_all_launches().await,
        Err(CatalogError::Decode(_))
    ));
}

#[tokio::test]
async fn unreachable_catalog_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/v2/")).unwrap();
    let catalog = HttpLaunchCatalog::new(base, Duration::from_secs(2)).unwrap();

    assert!(matches!(
        catalog.get_all_launches().await,
        Err(CatalogError::Transport(_))
    ));
}
