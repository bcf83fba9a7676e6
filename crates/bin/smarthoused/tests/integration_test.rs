//! End-to-end smoke tests for the full smarthoused stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real
//! repos, real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot` — no TCP port is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use smarthouse_adapter_http_axum::router;
use smarthouse_adapter_http_axum::state::AppState;
use smarthouse_adapter_storage_sqlite_sqlx::{
    Config, SqliteHouseRepository, SqliteMeasurementRepository,
};
use smarthouse_app::services::house_service::HouseService;
use smarthouse_app::services::telemetry_service::TelemetryService;

/// Seed a two-floor house: living room (id 1, floor 1) with a temperature
/// sensor and a heat pump, bathroom (id 2, floor 2) with a light bulb and a
/// humidity sensor.
async fn seed(pool: &SqlitePool) {
    for (floor, area, name) in [(1, 20.0, "Living Room"), (2, 9.0, "Bathroom")] {
        sqlx::query("INSERT INTO rooms (floor, area, name) VALUES (?, ?, ?)")
            .bind(floor)
            .bind(area)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
    }

    for (id, room, kind, category) in [
        ("temp-1", 1, "Temperature Sensor", "sensor"),
        ("pump-1", 1, "Heat Pump", "actuator"),
        ("bulb-1", 2, "Light Bulb", "actuator"),
        ("hum-1", 2, "Humidity Sensor", "sensor"),
    ] {
        sqlx::query(
            "INSERT INTO devices (id, room, kind, category, supplier, product) VALUES (?, ?, ?, ?, 'Acme', 'Model X')",
        )
        .bind(id)
        .bind(room)
        .bind(kind)
        .bind(category)
        .execute(pool)
        .await
        .unwrap();
    }
}

/// Build a fully-wired router backed by a seeded in-memory `SQLite` database.
async fn app() -> axum::Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();
    seed(&pool).await;

    let house_repo = SqliteHouseRepository::new(pool.clone());
    let measurement_repo = SqliteMeasurementRepository::new(pool);

    let state = AppState::new(
        HouseService::load(house_repo)
            .await
            .expect("seeded house should load"),
        TelemetryService::new(measurement_repo),
    );

    router::build(state)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
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
// House structure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_summarize_house_structure() {
    let app = app().await;

    let (status, body) = get(&app, "/smarthouse").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["no_floors"], 2);
    assert_eq!(body["no_rooms"], 2);
    assert_eq!(body["no_devices"], 4);
    assert_eq!(body["total_area"], 29.0);
}

#[tokio::test]
async fn should_list_floors_and_their_rooms() {
    let app = app().await;

    let (status, body) = get(&app, "/smarthouse/floor").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["fid"], 1);
    assert_eq!(body[0]["rooms"], serde_json::json!([1]));

    let (status, body) = get(&app, "/smarthouse/floor/2/room").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["rid"], 2);
    assert_eq!(body[0]["room_name"], "Bathroom");
    assert_eq!(body[0]["room_size"], 9.0);
    assert_eq!(body[0]["devices"], serde_json::json!(["bulb-1", "hum-1"]));
}

#[tokio::test]
async fn should_scope_room_lookup_to_floor() {
    let app = app().await;

    let (status, body) = get(&app, "/smarthouse/floor/1/room/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room_name"], "Living Room");

    // Room 2 lives on floor 2.
    let (status, body) = get(&app, "/smarthouse/floor/1/room/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Room `2` not found");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_floor() {
    let app = app().await;

    let (status, _) = get(&app, "/smarthouse/floor/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_describe_devices_with_capability_category() {
    let app = app().await;

    let (status, body) = get(&app, "/smarthouse/device").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = get(&app, "/smarthouse/device/pump-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device_type"], "Heat Pump");
    assert_eq!(body["device_category"], "actuator_with_sensor");
    assert_eq!(body["model"], "Model X");
    assert_eq!(body["supplier"], "Acme");
    assert_eq!(body["room"], 1);

    let (status, _) = get(&app, "/smarthouse/device/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Sensor time series
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_record_and_serve_sensor_readings() {
    let app = app().await;

    // Empty series: 404, not an empty payload.
    let (status, _) = get(&app, "/smarthouse/sensor/temp-1/current").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for (ts, value) in [
        ("2024-01-01 08:00:00", 18.0),
        ("2024-01-01 10:00:00", 21.0),
        ("2024-01-01 09:00:00", 19.5),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/smarthouse/sensor/temp-1/current",
            serde_json::json!({"timestamp": ts, "value": value, "unit": "°C"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Latest is by timestamp, not insertion order.
    let (status, body) = get(&app, "/smarthouse/sensor/temp-1/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timestamp"], "2024-01-01 10:00:00");
    assert_eq!(body["value"], 21.0);

    // History is newest-first, capped by `n`.
    let (status, body) = get(&app, "/smarthouse/sensor/temp-1/values?n=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["timestamp"], "2024-01-01 10:00:00");
    assert_eq!(body[1]["timestamp"], "2024-01-01 09:00:00");
}

#[tokio::test]
async fn should_delete_oldest_reading_first() {
    let app = app().await;

    for ts in ["2024-01-01 08:00:00", "2024-01-01 09:00:00"] {
        send(
            &app,
            "POST",
            "/smarthouse/sensor/hum-1/current",
            serde_json::json!({"timestamp": ts, "value": 55.0, "unit": "%"}),
        )
        .await;
    }

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/smarthouse/sensor/hum-1/oldest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&resp.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert_eq!(body["timestamp"], "2024-01-01 08:00:00");

    // Only the newer reading remains.
    let (_, body) = get(&app, "/smarthouse/sensor/hum-1/values").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["timestamp"], "2024-01-01 09:00:00");

    // Draining an empty series yields null, not an error.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/smarthouse/sensor/temp-1/oldest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&resp.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn should_reject_sensor_routes_for_pure_actuator() {
    let app = app().await;

    let (status, _) = get(&app, "/smarthouse/sensor/bulb-1/values").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The heat pump carries a sensor, so it is addressable as one.
    let (status, _) = send(
        &app,
        "POST",
        "/smarthouse/sensor/pump-1/current",
        serde_json::json!({"timestamp": "2024-01-01 08:00:00", "value": 21.0, "unit": "°C"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Actuator control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_roundtrip_actuator_state_over_http() {
    let app = app().await;

    let (status, body) = get(&app, "/smarthouse/actuator/bulb-1/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "off");

    let (status, body) = send(
        &app,
        "PUT",
        "/smarthouse/actuator/pump-1",
        serde_json::json!({"state": 21.5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], 21.5);

    let (status, body) = get(&app, "/smarthouse/actuator/pump-1/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], 21.5);

    let (status, body) = send(
        &app,
        "PUT",
        "/smarthouse/actuator/bulb-1",
        serde_json::json!({"state": "running"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "running");
}

#[tokio::test]
async fn should_reject_actuator_routes_for_sensor() {
    let app = app().await;

    let (status, _) = get(&app, "/smarthouse/actuator/temp-1/current").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/smarthouse/actuator/temp-1",
        serde_json::json!({"state": "running"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Room statistics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_average_temperatures_per_date() {
    let app = app().await;

    for (ts, value) in [
        ("2024-01-01 08:00:00", 20.0),
        ("2024-01-01 20:00:00", 22.0),
        ("2024-01-02 08:00:00", 18.0),
    ] {
        send(
            &app,
            "POST",
            "/smarthouse/sensor/temp-1/current",
            serde_json::json!({"timestamp": ts, "value": value, "unit": "°C"}),
        )
        .await;
    }

    let (status, body) =
        get(&app, "/smarthouse/floor/1/room/1/temperature/daily").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["2024-01-01"], 21.0);
    assert_eq!(body["2024-01-02"], 18.0);

    // Inclusive date bounds.
    let (status, body) = get(
        &app,
        "/smarthouse/floor/1/room/1/temperature/daily?from=2024-01-02&until=2024-01-02",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("2024-01-01").is_none());
    assert_eq!(body["2024-01-02"], 18.0);
}

#[tokio::test]
async fn should_report_hours_with_humidity_above_day_average() {
    let app = app().await;

    // Hour 10 has four readings above the day average, hour 11 only two.
    for (ts, value) in [
        ("2024-01-01 06:00:00", 20.0),
        ("2024-01-01 10:00:00", 60.0),
        ("2024-01-01 10:10:00", 60.0),
        ("2024-01-01 10:20:00", 60.0),
        ("2024-01-01 10:30:00", 60.0),
        ("2024-01-01 11:00:00", 55.0),
        ("2024-01-01 11:30:00", 55.0),
    ] {
        send(
            &app,
            "POST",
            "/smarthouse/sensor/hum-1/current",
            serde_json::json!({"timestamp": ts, "value": value, "unit": "%"}),
        )
        .await;
    }

    let (status, body) = get(
        &app,
        "/smarthouse/floor/2/room/2/humidity/hours?date=2024-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([10]));

    // A day without readings reports no hours.
    let (status, body) = get(
        &app,
        "/smarthouse/floor/2/room/2/humidity/hours?date=2024-01-02",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}
