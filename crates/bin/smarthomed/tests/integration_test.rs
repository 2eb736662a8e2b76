//! End-to-end tests for the full smarthomed stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`; no TCP port is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use smarthome_adapter_http_axum::router;
use smarthome_adapter_http_axum::state::AppState;
use smarthome_adapter_storage_sqlite_sqlx::{
    Config, SqliteApplianceRepository, SqliteHomeRepository, SqliteOpeningRepository,
    SqliteUserRepository, SqliteZoneRepository,
};
use smarthome_app::event_bus::InProcessEventBus;
use smarthome_domain::event::{Event, EventType};
use tokio::sync::broadcast;
use tower::ServiceExt;

type SqliteBackend = (
    SqliteHomeRepository,
    SqliteZoneRepository,
    SqliteOpeningRepository,
    SqliteApplianceRepository,
    SqliteUserRepository,
);

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> (axum::Router, broadcast::Receiver<Event>) {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let pool = db.pool().clone();

    let event_bus = Arc::new(InProcessEventBus::new(256));
    let events = event_bus.subscribe();

    let state = AppState::<SqliteBackend>::new(
        SqliteHomeRepository::new(pool.clone()),
        SqliteZoneRepository::new(pool.clone()),
        SqliteOpeningRepository::new(pool.clone()),
        SqliteApplianceRepository::new(pool.clone()),
        SqliteUserRepository::new(pool),
        event_bus,
    );

    (router::build(state), events)
}

async fn call(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn drain(events: &mut broadcast::Receiver<Event>) -> Vec<EventType> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event.event_type);
    }
    seen
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (app, _) = app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Rules engine walkthrough
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_walk_through_occupancy_automation_and_alarm() {
    let (app, mut events) = app().await;

    // H1 in automatic mode with Z1 holding light L1 (off) and a fan.
    let (_, home) = call(&app, Method::POST, "/api/homes", Some(json!({"name": "H1"}))).await;
    let h1 = home["id"].as_str().unwrap().to_string();
    assert_eq!(home["security_level"], json!("disarmed"));

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/homes/{h1}"),
        Some(json!({"auto_mode": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, zone) = call(
        &app,
        Method::POST,
        &format!("/api/homes/{h1}/zones"),
        Some(json!({"name": "Z1"})),
    )
    .await;
    let z1 = zone["id"].as_str().unwrap().to_string();

    let (_, light) = call(
        &app,
        Method::POST,
        &format!("/api/zones/{z1}/appliances"),
        Some(json!({"kind": "light", "state": 0})),
    )
    .await;
    let l1 = light["id"].as_str().unwrap().to_string();
    let (_, fan) = call(
        &app,
        Method::POST,
        &format!("/api/zones/{z1}/appliances"),
        Some(json!({"kind": "fan"})),
    )
    .await;
    let fan_id = fan["id"].as_str().unwrap().to_string();

    // U1 lives in H1 and starts outside.
    let (_, user) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": "U1", "email": "u1@example.com", "password": "pw", "is_guest": true})),
    )
    .await;
    let u1 = user["id"].as_str().unwrap().to_string();
    assert_eq!(user["role"], json!("user"));
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/users/{u1}"),
        Some(json!({"home_id": h1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    drain(&mut events);

    // Entering Z1 lights L1 and leaves the fan alone.
    let (status, moved) = call(
        &app,
        Method::PUT,
        &format!("/api/users/{u1}/zone"),
        Some(json!({"zone_id": z1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["success"], json!(true));
    assert_eq!(moved["data"]["zone_id"], json!(z1));

    let (_, appliances) = call(&app, Method::GET, &format!("/api/zones/{z1}/appliances"), None).await;
    for appliance in appliances.as_array().unwrap() {
        if appliance["id"] == json!(l1) {
            assert_eq!(appliance["state"], json!(1));
        } else {
            assert_eq!(appliance["id"], json!(fan_id));
            assert_eq!(appliance["state"], json!(0));
        }
    }
    assert_eq!(
        drain(&mut events),
        [EventType::ApplianceStateChanged, EventType::UserMoved]
    );

    // Arming is refused while U1 is inside.
    let (status, denied) = call(
        &app,
        Method::PUT,
        &format!("/api/homes/{h1}/security"),
        Some(json!({"level": "armed"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(denied["success"], json!(false));
    assert!(denied["message"].as_str().unwrap().contains("users present"));
    let (_, home) = call(&app, Method::GET, &format!("/api/homes/{h1}"), None).await;
    assert_eq!(home["security_level"], json!("disarmed"));

    // U1 leaves, then arming succeeds.
    let (status, outside) = call(
        &app,
        Method::PUT,
        &format!("/api/users/{u1}/zone"),
        Some(json!({"zone_id": "outside"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outside["data"]["zone_id"], Value::Null);

    let (status, armed) = call(
        &app,
        Method::PUT,
        &format!("/api/homes/{h1}/security"),
        Some(json!({"level": "armed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(armed["data"]["security_level"], json!("armed_away"));

    // Re-entering trips the alarm and U1 stays outside.
    let (status, tripped) = call(
        &app,
        Method::PUT,
        &format!("/api/users/{u1}/zone"),
        Some(json!({"zone_id": z1})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(tripped["message"].as_str().unwrap().contains("triggered"));
    let (_, user) = call(&app, Method::GET, &format!("/api/users/{u1}"), None).await;
    assert_eq!(user["zone_id"], Value::Null);

    assert_eq!(
        drain(&mut events),
        [
            EventType::ArmingDenied,
            EventType::UserMoved,
            EventType::SecurityLevelChanged,
            EventType::AlarmTriggered,
        ]
    );
}

#[tokio::test]
async fn should_report_partial_update_for_unknown_zone() {
    let (app, _) = app().await;
    let (_, home) = call(&app, Method::POST, "/api/homes", Some(json!({"name": "H1"}))).await;
    let h1 = home["id"].as_str().unwrap().to_string();
    let (_, user) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": "U1", "email": "u1@example.com", "password": "pw"})),
    )
    .await;
    let u1 = user["id"].as_str().unwrap().to_string();

    let unknown_zone = smarthome_domain::id::ZoneId::new().to_string();
    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/users/{u1}"),
        Some(json!({"home_id": h1, "zone_id": unknown_zone, "name": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Zone supplied does not exist"));
    assert_eq!(body["data"]["name"], json!("Renamed"));
    assert_eq!(body["data"]["home_id"], json!(h1));
}

#[tokio::test]
async fn should_reject_second_account_with_same_email() {
    let (app, _) = app().await;
    let signup = json!({"name": "U1", "email": "same@example.com", "password": "pw"});
    let (status, _) = call(&app, Method::POST, "/api/users", Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, Method::POST, "/api/users", Some(signup)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn should_put_users_outside_when_their_zone_is_deleted() {
    let (app, _) = app().await;
    let (_, home) = call(&app, Method::POST, "/api/homes", Some(json!({"name": "H1"}))).await;
    let h1 = home["id"].as_str().unwrap().to_string();
    let (_, zone) = call(
        &app,
        Method::POST,
        &format!("/api/homes/{h1}/zones"),
        Some(json!({"name": "Z1"})),
    )
    .await;
    let z1 = zone["id"].as_str().unwrap().to_string();
    let (_, user) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": "U1", "email": "u1@example.com", "password": "pw"})),
    )
    .await;
    let u1 = user["id"].as_str().unwrap().to_string();
    call(
        &app,
        Method::PUT,
        &format!("/api/users/{u1}"),
        Some(json!({"home_id": h1, "zone_id": z1})),
    )
    .await;

    let (status, _) = call(&app, Method::DELETE, &format!("/api/zones/{z1}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, user) = call(&app, Method::GET, &format!("/api/users/{u1}"), None).await;
    assert_eq!(user["zone_id"], Value::Null);
    assert_eq!(user["home_id"], json!(h1));

    let (_, occupancy) = call(&app, Method::GET, &format!("/api/homes/{h1}/occupancy"), None).await;
    assert_eq!(occupancy["occupied"], json!(false));
}
