//! Integration tests for the GraphQL gateway.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::{Backends, Identity};
use launch_catalog::InMemoryLaunchCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;
use user_store::InMemoryUserStore;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    router: axum::Router,
    store: InMemoryUserStore,
    catalog: InMemoryLaunchCatalog,
}

fn setup() -> TestApp {
    setup_with_launches(30)
}

fn setup_with_launches(count: i64) -> TestApp {
    setup_with(InMemoryUserStore::new(), count)
}

fn setup_with(store: InMemoryUserStore, count: i64) -> TestApp {
    let catalog = InMemoryLaunchCatalog::with_generated(count);
    let backends = Backends::new(Arc::new(catalog.clone()), Arc::new(store.clone()));
    TestApp {
        router: api::create_app(backends, get_metrics_handle()),
        store,
        catalog,
    }
}

fn token(email: &str) -> String {
    Identity::parse(email).unwrap().to_token()
}

async fn graphql(
    router: &axum::Router,
    credential: Option<&str>,
    query: &str,
    variables: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json");
    if let Some(credential) = credential {
        builder = builder.header("authorization", credential);
    }
    let body = json!({ "query": query, "variables": variables });

    let response = router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

const LAUNCHES: &str = r#"
    query Launches($pageSize: Int, $after: String) {
        launches(pageSize: $pageSize, after: $after) {
            cursor
            hasMore
            launches { id isBooked }
        }
    }
"#;

const BOOK_TRIPS: &str = r#"
    mutation Book($ids: [ID]!) {
        bookTrips(launchIds: $ids) {
            success
            message
            launches { id isBooked }
        }
    }
"#;

const CANCEL_TRIP: &str = r#"
    mutation Cancel($id: ID!) {
        cancelTrip(launchId: $id) {
            success
            message
            launches { id isBooked }
        }
    }
"#;

const ME: &str = "{ me { id username trips { id } } }";

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_graphiql_page_is_served() {
    let app = setup();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/graphql")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("graphiql"));
}

#[tokio::test]
async fn test_metrics_endpoint_reports_gateway_counters() {
    let app = setup();
    graphql(&app.router, None, LAUNCHES, json!({})).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("gateway_datasource_sets_created_total"));
}

#[tokio::test]
async fn test_launches_first_page_defaults_to_twenty() {
    let app = setup();

    let (status, body) = graphql(&app.router, None, LAUNCHES, json!({})).await;

    assert_eq!(status, StatusCode::OK);
    let page = &body["data"]["launches"];
    assert_eq!(page["launches"].as_array().unwrap().len(), 20);
    assert_eq!(page["cursor"], "20");
    assert_eq!(page["hasMore"], true);
    assert_eq!(page["launches"][0]["isBooked"], false);
}

#[tokio::test]
async fn test_launches_cursor_chaining_visits_every_launch_once() {
    let app = setup_with_launches(23);

    let mut ids = Vec::new();
    let mut after: Option<String> = None;
    loop {
        let (_, body) = graphql(
            &app.router,
            None,
            LAUNCHES,
            json!({ "pageSize": 5, "after": after }),
        )
        .await;
        let page = &body["data"]["launches"];
        for launch in page["launches"].as_array().unwrap() {
            ids.push(launch["id"].as_str().unwrap().parse::<i64>().unwrap());
        }
        if page["hasMore"] == false {
            break;
        }
        after = Some(page["cursor"].as_str().unwrap().to_string());
    }

    assert_eq!(ids, (1..=23).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_invalid_page_size_is_bad_user_input() {
    let app = setup();

    let (status, body) = graphql(&app.router, None, LAUNCHES, json!({ "pageSize": 0 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(error_code(&body), "BAD_USER_INPUT");
    assert_eq!(app.catalog.fetch_count(), 0);
}

#[tokio::test]
async fn test_catalog_outage_is_backend_unavailable() {
    let app = setup();
    app.catalog.set_unavailable(true);

    let (_, body) = graphql(&app.router, None, LAUNCHES, json!({})).await;

    assert_eq!(error_code(&body), "BACKEND_UNAVAILABLE");
}

#[tokio::test]
async fn test_launch_by_id() {
    let app = setup();
    let query = r#"
        query Launch($id: ID!) {
            launch(id: $id) {
                id
                site
                mission { name small: missionPatch(size: SMALL) large: missionPatch }
                rocket { id name type }
            }
        }
    "#;

    let (_, body) = graphql(&app.router, None, query, json!({ "id": "7" })).await;
    let launch = &body["data"]["launch"];
    assert_eq!(launch["id"], "7");
    assert_eq!(launch["site"], "Site 7");
    assert_eq!(launch["mission"]["name"], "Mission 7");
    assert_eq!(launch["mission"]["small"], "https://images.example/7-small.png");
    assert_eq!(launch["mission"]["large"], "https://images.example/7.png");
    assert_eq!(launch["rocket"]["type"], "FT");

    let (_, body) = graphql(&app.router, None, query, json!({ "id": "999" })).await;
    assert!(body["data"]["launch"].is_null());

    let (_, body) = graphql(&app.router, None, query, json!({ "id": "abc" })).await;
    assert!(body["data"]["launch"].is_null());
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_me_is_null_when_anonymous() {
    let app = setup();

    let (_, body) = graphql(&app.router, None, ME, json!({})).await;
    assert!(body["data"]["me"].is_null());

    let (_, body) = graphql(&app.router, Some("garbage!!"), ME, json!({})).await;
    assert!(body["data"]["me"].is_null());
    assert_eq!(app.store.lookup_count(), 0);
}

#[tokio::test]
async fn test_login_then_me() {
    let app = setup();

    let (_, body) = graphql(
        &app.router,
        None,
        "mutation { login(email: \"ada@example.com\") }",
        json!({}),
    )
    .await;
    let token = body["data"]["login"].as_str().unwrap().to_string();

    let (_, body) = graphql(&app.router, Some(&token), ME, json!({})).await;
    assert_eq!(body["data"]["me"]["username"], "ada@example.com");
    assert_eq!(body["data"]["me"]["trips"], json!([]));

    let bearer = format!("Bearer {token}");
    let (_, body) = graphql(&app.router, Some(&bearer), ME, json!({})).await;
    assert_eq!(body["data"]["me"]["username"], "ada@example.com");
}

#[tokio::test]
async fn test_login_with_invalid_email_returns_null() {
    let app = setup();

    let (_, body) = graphql(&app.router, None, "mutation { login(email: \"nope\") }", json!({})).await;
    assert!(body["data"]["login"].is_null());
    let (_, body) = graphql(&app.router, None, "mutation { login }", json!({})).await;
    assert!(body["data"]["login"].is_null());
    assert_eq!(app.store.user_count().await, 0);
}

#[tokio::test]
async fn test_book_trips_requires_login() {
    let app = setup();

    let (status, body) = graphql(&app.router, None, BOOK_TRIPS, json!({ "ids": ["1"] })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
    assert_eq!(app.store.trip_count().await, 0);
}

#[tokio::test]
async fn test_book_trips_partial_failure() {
    let app = setup();
    let credential = token("ada@example.com");

    let (_, body) = graphql(&app.router, Some(&credential), BOOK_TRIPS, json!({ "ids": ["2"] })).await;
    assert_eq!(body["data"]["bookTrips"]["success"], true);

    let (_, body) = graphql(
        &app.router,
        Some(&credential),
        BOOK_TRIPS,
        json!({ "ids": ["1", "2"] }),
    )
    .await;
    let response = &body["data"]["bookTrips"];
    assert_eq!(response["success"], false);
    assert_eq!(response["launches"], json!([{ "id": "1", "isBooked": true }]));
    assert!(
        response["message"]
            .as_str()
            .unwrap()
            .contains("2 (already booked)")
    );

    let (_, body) = graphql(&app.router, Some(&credential), ME, json!({})).await;
    assert_eq!(
        body["data"]["me"]["trips"],
        json!([{ "id": "1" }, { "id": "2" }])
    );
}

#[tokio::test]
async fn test_cancel_trip() {
    let app = setup();
    let credential = token("ada@example.com");
    graphql(&app.router, Some(&credential), BOOK_TRIPS, json!({ "ids": ["5"] })).await;

    let (_, body) = graphql(&app.router, Some(&credential), CANCEL_TRIP, json!({ "id": "5" })).await;
    let response = &body["data"]["cancelTrip"];
    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "trip cancelled");
    assert_eq!(response["launches"], json!([{ "id": "5", "isBooked": false }]));

    let (_, body) = graphql(&app.router, Some(&credential), CANCEL_TRIP, json!({ "id": "5" })).await;
    let response = &body["data"]["cancelTrip"];
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "failed to cancel trip");
    assert_eq!(response["launches"], json!([]));
}

#[tokio::test]
async fn test_is_booked_is_per_user() {
    let app = setup();
    let ada = token("ada@example.com");
    let bob = token("bob@example.com");
    graphql(&app.router, Some(&ada), BOOK_TRIPS, json!({ "ids": ["1"] })).await;

    let (_, ada_body) = graphql(&app.router, Some(&ada), LAUNCHES, json!({ "pageSize": 1 })).await;
    let (_, bob_body) = graphql(&app.router, Some(&bob), LAUNCHES, json!({ "pageSize": 1 })).await;

    assert_eq!(ada_body["data"]["launches"]["launches"][0]["isBooked"], true);
    assert_eq!(bob_body["data"]["launches"]["launches"][0]["isBooked"], false);
}

#[tokio::test]
async fn test_concurrent_requests_see_their_own_user() {
    let app = setup_with(InMemoryUserStore::with_latency(Duration::from_millis(5)), 3);
    let emails: Vec<String> = (0..12).map(|i| format!("user{i}@example.com")).collect();

    let handles: Vec<_> = emails
        .iter()
        .map(|email| {
            let router = app.router.clone();
            let credential = token(email);
            tokio::spawn(async move { graphql(&router, Some(&credential), ME, json!({})).await })
        })
        .collect();

    for (email, handle) in emails.iter().zip(handles) {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body["data"]["me"]["username"], email.as_str());
    }
}

#[tokio::test]
async fn test_directory_outage_with_credential_is_service_unavailable() {
    let app = setup();
    app.store.set_unavailable(true);

    let (status, body) = graphql(&app.router, Some(&token("ada@example.com")), ME, json!({})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["data"].is_null());
    assert_eq!(error_code(&body), "BACKEND_UNAVAILABLE");

    let (status, body) = graphql(&app.router, None, ME, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["me"].is_null());
}
