//! Router-level tests: CORS preflight, parameter validation, credential
//! degradation, and method policing. None of these paths reach an upstream,
//! so no network access is needed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use apirelay::{create_router, AppState, Config};

fn test_app() -> Router {
    // No credentials configured: search proxies must degrade, not fail.
    let config = Config::default();
    let router = create_router(&config);
    let state = AppState::with_config(config).unwrap();
    router.with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn preflight_returns_cors_headers_and_empty_body() {
    for path in ["/api/bing", "/api/brave", "/api/google", "/api/reddit", "/api/mexc"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .header(header::ORIGIN, "https://app.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "preflight on {}", path);

        let headers = response.headers();
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty(), "preflight body on {}", path);
    }

    // The QR route preflights with POST
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/qrcode")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn missing_query_parameter_yields_400_naming_it() {
    for path in ["/api/bing", "/api/brave", "/api/google", "/api/reddit"] {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "on {}", path);

        let body = body_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains('q'), "error should mention q: {}", message);
    }
}

#[tokio::test]
async fn blank_query_parameter_counts_as_missing() {
    let request = Request::builder()
        .uri("/api/bing?q=%20%20")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_credentials_degrade_to_no_key_success() {
    let cases = [
        ("/api/bing?q=kaspa", "value"),
        ("/api/brave?q=kaspa", "results"),
        ("/api/google?q=kaspa", "items"),
    ];

    for (path, results_key) in cases {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "on {}", path);

        let body = body_json(response).await;
        assert_eq!(body["noKey"], serde_json::json!(true), "on {}", path);
        assert_eq!(
            body[results_key],
            serde_json::json!([]),
            "empty collection on {}",
            path
        );
    }
}

#[tokio::test]
async fn mexc_requires_endpoint_and_symbol() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/mexc?symbol=KASUSDT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("endpoint"));

    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/mexc?endpoint=ticker/price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("symbol"));
}

#[tokio::test]
async fn nicehash_rejects_non_post_with_405() {
    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let request = Request::builder()
            .method(method.clone())
            .uri("/api/nicehash")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "method {}",
            method
        );

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .to_lowercase()
            .contains("method not allowed"));
    }
}

#[tokio::test]
async fn nicehash_has_no_cors_preflight_path() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/nicehash")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn nicehash_post_validates_required_fields() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/nicehash")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("endpoint"));
}

#[tokio::test]
async fn qrcode_validates_url_and_body() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/qrcode")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{ "body": { "data": "x" } }"#))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("url"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/qrcode")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{ "url": "http://127.0.0.1:1/qr" }"#))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("body"));
}

#[tokio::test]
async fn health_check_answers_ok() {
    let response = test_app()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}
