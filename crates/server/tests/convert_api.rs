//! Integration tests for the conversion API.
//!
//! These drive the full router with a mock transcoder, so they exercise
//! routing, auth, input resolution, and response shaping without ffmpeg.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use forgeline_core::config::{AuthConfig, AuthMethod, Config};
use forgeline_core::input::{Fetcher, FetcherConfig, InputResolver};
use forgeline_core::testing::MockTranscoder;
use forgeline_core::{create_authenticator, Authenticator};

use forgeline_server::api::create_router;
use forgeline_server::state::AppState;

const BOUNDARY: &str = "test-boundary-7f93a1";

fn multipart_body(fields: &[(&str, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

fn test_state(auth: AuthConfig) -> (Arc<AppState>, Arc<MockTranscoder>) {
    let authenticator: Arc<dyn Authenticator> =
        Arc::from(create_authenticator(&auth).unwrap());
    let config = Config {
        auth,
        server: Default::default(),
        transcoder: Default::default(),
        fetcher: FetcherConfig::default(),
    };
    let transcoder = Arc::new(MockTranscoder::new());
    let resolver = InputResolver::new(Fetcher::new(FetcherConfig::default()).unwrap());
    let state = Arc::new(AppState::new(
        config,
        authenticator,
        transcoder.clone(),
        resolver,
    ));
    (state, transcoder)
}

fn open_state() -> (Arc<AppState>, Arc<MockTranscoder>) {
    test_state(AuthConfig {
        method: AuthMethod::None,
        api_key: None,
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_convert_audio_upload() {
    let (state, transcoder) = open_state();
    let (content_type, body) = multipart_body(&[("file", b"fake ogg bytes")]);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["audio"], BASE64.encode(b"transcoded"));
    assert_eq!(json["format"], "ogg");
    assert_eq!(json["duration"], 42);

    let recorded = transcoder.recorded_requests().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].request.payload, b"fake ogg bytes");
    assert_eq!(recorded[0].request.input_format, "ogg");
}

#[tokio::test]
async fn test_convert_audio_output_format_field() {
    let (state, transcoder) = open_state();
    let (content_type, body) = multipart_body(&[
        ("file", b"fake wav bytes"),
        ("output_format", b"mp3"),
        ("input_format", b"wav"),
    ]);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["format"], "mp3");

    let recorded = transcoder.recorded_requests().await;
    assert_eq!(recorded[0].request.input_format, "wav");
}

#[tokio::test]
async fn test_convert_audio_unknown_format_falls_back_to_compact_voice() {
    let (state, _) = open_state();
    let (content_type, body) =
        multipart_body(&[("file", b"bytes"), ("output_format", b"flac")]);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["format"], "ogg");
}

#[tokio::test]
async fn test_convert_audio_base64_channel() {
    let (state, transcoder) = open_state();
    let encoded = BASE64.encode(b"raw audio");
    let (content_type, body) = multipart_body(&[("base64", encoded.as_bytes())]);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let recorded = transcoder.recorded_requests().await;
    assert_eq!(recorded[0].request.payload, b"raw audio");
}

#[tokio::test]
async fn test_convert_audio_invalid_base64_is_bad_request() {
    let (state, transcoder) = open_state();
    let (content_type, body) = multipart_body(&[("base64", b"!!not base64!!")]);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["stage"], "acquisition");
    assert_eq!(transcoder.request_count().await, 0);
}

#[tokio::test]
async fn test_convert_audio_no_input_is_bad_request() {
    let (state, transcoder) = open_state();
    let (content_type, body) = multipart_body(&[("output_format", b"mp3")]);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["stage"], "acquisition");
    assert_eq!(transcoder.request_count().await, 0);
}

#[tokio::test]
async fn test_convert_gif_multipart_upload() {
    let (state, transcoder) = open_state();
    let (content_type, body) = multipart_body(&[("file", b"GIF89a...")]);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/gif")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["video"], BASE64.encode(b"transcoded"));
    assert_eq!(json["format"], "mp4");
    assert!(json.get("duration").is_none());

    let recorded = transcoder.recorded_requests().await;
    assert_eq!(recorded[0].request.input_format, "gif");
}

#[tokio::test]
async fn test_convert_gif_unreachable_url_is_bad_request() {
    let (state, transcoder) = open_state();

    // Connection refused locally, no remote traffic.
    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/gif?url=http://127.0.0.1:1/clip.gif")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["stage"], "acquisition");
    assert_eq!(transcoder.request_count().await, 0);
}

#[tokio::test]
async fn test_convert_gif_json_body_without_url_is_bad_request() {
    let (state, _) = open_state();

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/gif")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_convert_video_and_image_payload_keys() {
    let (state, _) = open_state();
    let router = create_router(state);

    let (content_type, body) = multipart_body(&[("file", b"movie bytes")]);
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/video")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["format"], "mp4");
    assert!(json.get("video").is_some());

    let (content_type, body) = multipart_body(&[("file", b"image bytes")]);
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/image")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["format"], "png");
    assert!(json.get("image").is_some());
}

#[tokio::test]
async fn test_process_failure_returns_diagnostics() {
    let (state, transcoder) = open_state();
    transcoder
        .set_next_error(forgeline_core::TranscodeError::process_failed(
            "exit status 1",
            "corrupt header\n",
        ))
        .await;

    let (content_type, body) = multipart_body(&[("file", b"bytes")]);
    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["stage"], "process");
    assert_eq!(json["diagnostics"], "corrupt header\n");
}

#[tokio::test]
async fn test_convert_requires_auth_when_configured() {
    let (state, _) = test_state(AuthConfig {
        method: AuthMethod::ApiKey,
        api_key: Some("secret-key".to_string()),
    });
    let router = create_router(state);

    let (content_type, body) = multipart_body(&[("file", b"bytes")]);
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type.clone())
                .body(Body::from(body.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/convert/audio")
                .header(header::CONTENT_TYPE, content_type)
                .header("apikey", "secret-key")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_config_are_open() {
    let (state, _) = test_state(AuthConfig {
        method: AuthMethod::ApiKey,
        api_key: Some("secret-key".to_string()),
    });
    let router = create_router(state);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!text.contains("secret-key"));
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prometheus_text() {
    let (state, _) = open_state();

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/v1/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("forgeline_http_requests_in_flight"));
}
