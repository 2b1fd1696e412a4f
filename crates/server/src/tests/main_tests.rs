use super::*;
use axum::{body, body::Body, http::Request};
use shared::domain::Round;
use tokio::net::TcpListener;
use tower::ServiceExt;

async fn spawn_fake_ergast() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let upstream = Router::new()
        .route(
            "/2023.json",
            get(|| async {
                Json(serde_json::json!({
                    "MRData": { "RaceTable": { "Races": [
                        { "round": "1", "raceName": "Bahrain Grand Prix", "date": "2023-03-05" }
                    ] } }
                }))
            }),
        )
        .route(
            "/2023/1/results.json",
            get(|| async {
                Json(serde_json::json!({
                    "MRData": { "RaceTable": { "Races": [{
                        "round": "1",
                        "raceName": "Bahrain Grand Prix",
                        "date": "2023-03-05",
                        "Results": [{
                            "position": "1",
                            "points": "25",
                            "Driver": { "givenName": "Max", "familyName": "Verstappen", "nationality": "Dutch", "dateOfBirth": "1997-09-30" },
                            "Constructor": { "name": "Red Bull" },
                            "grid": "1",
                            "laps": "57",
                            "status": "Finished"
                        }]
                    }] } }
                }))
            }),
        )
        .route(
            "/2023/2/results.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });
    format!("http://{addr}")
}

async fn test_app() -> Router {
    let base_url = spawn_fake_ergast().await;
    let ergast = ErgastContext::new(base_url, false).expect("ergast context");
    build_router(Arc::new(AppState { ergast }))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn races_route_requires_year() {
    let (status, body) = get_json(test_app().await, "/api/races").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
    assert_eq!(body["message"], "Missing year parameter");
}

#[tokio::test]
async fn results_route_requires_year_and_round() {
    let (status, body) = get_json(test_app().await, "/api/results?year=2023").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing year or round parameter");

    let (status, _) = get_json(test_app().await, "/api/results?year=2023&round=first").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn races_route_returns_numeric_rounds() {
    let (status, body) = get_json(test_app().await, "/api/races?year=2023").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([{ "round": 1, "name": "Bahrain Grand Prix" }])
    );
}

#[tokio::test]
async fn results_route_returns_flattened_rows() {
    let (status, body) = get_json(test_app().await, "/api/results?year=2023&round=1").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<ResultRow> = serde_json::from_value(body).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].race_name, "Bahrain Grand Prix");
    assert_eq!(rows[0].round, Round(1));
    assert_eq!(rows[0].date, "2023-03-05");
    assert_eq!(rows[0].constructor.name, "Red Bull");
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let (status, body) = get_json(test_app().await, "/api/results?year=2023&round=2").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "upstream");
}

#[tokio::test]
async fn responses_allow_cross_origin_requests() {
    let app = test_app().await;
    let request = Request::get("/healthz")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[test]
fn error_codes_map_to_http_statuses() {
    let cases = [
        (ErrorCode::Validation, StatusCode::BAD_REQUEST),
        (ErrorCode::Upstream, StatusCode::BAD_GATEWAY),
        (ErrorCode::Internal, StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let (status, _) = error_response(ApiError::new(code, "x"));
        assert_eq!(status, expected);
    }
}
