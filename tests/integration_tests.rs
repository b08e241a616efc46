//! Integration tests for nogo-router
//!
//! Drive the library and the binary against a mock routing backend.
//!
//! Note: The binary tests are disabled during CI package verification to
//! avoid compilation overhead during cargo publish.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use nogo_router::core::map::Viewport;
use nogo_router::{
    frame, submit, ClientConfig, Coordinate, Error, GeoJsonMap, MapSynchronizer, Msg,
    RequestStatus, RouteClient, Session,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[ctor::ctor]
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn client_for(server: &MockServer) -> RouteClient {
    RouteClient::with_config(ClientConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .expect("client")
}

fn ottawa_session() -> Session {
    let mut session = Session::new();
    session.update(Msg::StartChanged("1125 Colonel By Dr".into())).unwrap();
    session.update(Msg::EndChanged("75 Laurier Avenue East".into())).unwrap();
    session.update(Msg::AvoidChanged("  Bank St \n\n Rideau St\nQueensway ".into())).unwrap();
    session
}

fn route_reply(points: serde_json::Value, log: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "route": {"type": "Feature", "geometry": {"type": "LineString", "coordinates": points}},
        "log": log,
    }))
}

#[tokio::test]
async fn test_submit_success_frames_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/find_route"))
        .and(body_partial_json(json!({"avoid": ["Bank St", "Rideau St", "Queensway"]})))
        .respond_with(route_reply(
            json!([[45.40, -75.70], [45.41, -75.69], [45.42, -75.68]]),
            "All streets avoided",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = ottawa_session();
    let route = submit(&mut session, &client_for(&server)).await.unwrap();

    assert_eq!(route.coordinates.len(), 3);
    assert_eq!(session.status(), &RequestStatus::Succeeded);
    assert_eq!(session.log(), "All streets avoided");
    assert_eq!(session.map().start_point(), Some(Coordinate::new(45.40, -75.70)));
    assert_eq!(session.map().end_point(), Some(Coordinate::new(45.42, -75.68)));

    match frame(session.map()).viewport {
        Viewport::Fit { bounds, .. } => {
            for p in session.map().coordinates().iter() {
                assert!(bounds.contains(p), "{p:?} outside {bounds:?}");
            }
        }
        other => panic!("Expected fitted viewport, got {other:?}"),
    }

    let mut map = GeoJsonMap::new();
    assert!(MapSynchronizer::new().sync(session.map(), &mut map));
    assert_eq!(map.layer_count(), 3);
}

#[tokio::test]
async fn test_blank_start_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::new();
    session.update(Msg::EndChanged("anything".into())).unwrap();

    let err = submit(&mut session, &client_for(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(session.status(), &RequestStatus::Idle);

    server.verify().await;
}

#[tokio::test]
async fn test_failed_resubmission_keeps_previous_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/find_route"))
        .respond_with(route_reply(json!([[45.40, -75.70], [45.42, -75.68]]), ""))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/find_route"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "no route found"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = ottawa_session();
    submit(&mut session, &client).await.unwrap();
    let before = Arc::clone(session.map().coordinates());

    let err = submit(&mut session, &client).await.unwrap_err();
    assert_eq!(err.status_message(), "no route found");
    assert_eq!(session.status(), &RequestStatus::Failed("no route found".into()));
    assert!(Arc::ptr_eq(&before, session.map().coordinates()));

    session.update(Msg::Clear).unwrap();
    assert!(session.map().is_empty());
    assert_eq!(session.status(), &RequestStatus::Idle);
    assert_eq!(session.form().start, "");
}

#[tokio::test]
async fn test_server_error_without_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let mut session = ottawa_session();
    let err = submit(&mut session, &client_for(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Backend { status: Some(500), .. }));
    assert_eq!(
        session.status(),
        &RequestStatus::Failed("backend failed to find a route".into())
    );
}

#[tokio::test]
async fn test_slow_earlier_response_overwrites_later_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"start_address": "Slow St"})))
        .respond_with(route_reply(json!([[45.30, -75.80]]), "slow").set_delay(Duration::from_millis(400)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"start_address": "Fast St"})))
        .respond_with(route_reply(json!([[45.50, -75.60]]), "fast"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = Session::new();
    session.update(Msg::EndChanged("75 Laurier Avenue East".into())).unwrap();

    let mut in_flight = FuturesUnordered::new();
    for start in ["Slow St", "Fast St"] {
        session.update(Msg::StartChanged(start.into())).unwrap();
        let request = session.begin_submit().unwrap();
        let client = client.clone();
        in_flight.push(async move { client.find_route(&request).await });
    }

    let mut arrivals = Vec::new();
    while let Some(result) = in_flight.next().await {
        arrivals.push(result.as_ref().map(|r| r.log.clone()).unwrap_or_default());
        session.update(Msg::RouteFetched(result)).unwrap();
    }

    assert_eq!(arrivals, ["fast", "slow"]);
    assert_eq!(session.log(), "slow");
    assert_eq!(session.map().start_point(), Some(Coordinate::new(45.30, -75.80)));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let client = RouteClient::with_config(ClientConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        connect_timeout: Duration::from_secs(2),
        ..Default::default()
    })
    .unwrap();

    let mut session = ottawa_session();
    let err = submit(&mut session, &client).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(session.status(), &RequestStatus::Failed("error occurred".into()));
    assert!(session.map().is_empty());
}

#[test]
#[cfg(not(feature = "ci-tests-disabled"))]
fn test_dry_run_prints_payload() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_nogo-router"))
        .args(["-s", "1125 Colonel By Dr", "-e", "75 Laurier Avenue East"])
        .args(["-a", " Bank St ", "-a", "", "-a", "Rideau St"])
        .arg("--dry-run")
        .env_remove("NOGO_ROUTER_URL")
        .output()
        .expect("Failed to run dry-run command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "dry run failed: {stderr}");
    assert!(stderr.contains("DRY RUN"), "Expected DRY RUN indicator: {stderr}");
    assert!(stderr.contains("Avoid count: 2"), "Expected avoid count: {stderr}");

    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("payload is JSON");
    assert_eq!(
        payload,
        json!({
            "start_address": "1125 Colonel By Dr",
            "destination_address": "75 Laurier Avenue East",
            "avoid": ["Bank St", "Rideau St"],
        })
    );
}

#[test]
#[cfg(not(feature = "ci-tests-disabled"))]
fn test_missing_destination_fails_fast() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_nogo-router"))
        .args(["-s", "1125 Colonel By Dr", "--dry-run"])
        .output()
        .expect("Failed to run command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("destination address is required"), "stderr: {stderr}");
}

#[tokio::test]
#[cfg(not(feature = "ci-tests-disabled"))]
async fn test_cli_writes_geojson() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/find_route"))
        .respond_with(route_reply(json!([[45.40, -75.70], [45.42, -75.68]]), "done"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("route.geojson");

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_nogo-router"))
        .args(["-s", "1125 Colonel By Dr", "-e", "75 Laurier Avenue East"])
        .arg("--server")
        .arg(server.uri())
        .arg("--geojson")
        .arg(&out)
        .output()
        .await
        .expect("Failed to run command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Log: done"), "stdout: {stdout}");
    assert!(stdout.contains("Map: 2 point(s)"), "stdout: {stdout}");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["bbox"], json!([-75.70, 45.40, -75.68, 45.42]));
}

#[tokio::test]
#[cfg(not(feature = "ci-tests-disabled"))]
async fn test_cli_reports_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "no route found"})),
        )
        .mount(&server)
        .await;

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_nogo-router"))
        .args(["-s", "a", "-e", "b", "--server"])
        .arg(server.uri())
        .output()
        .await
        .expect("Failed to run command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("no route found"), "stderr: {stderr}");
}
