//! Router-level tests: the select → attempt loop over HTTP, plus the
//! error envelope for bad requests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use lexiease_backend_rust::create_app;

async fn test_app() -> Router {
    create_app().await
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn get(uri: &str, learner: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {learner}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, learner: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {learner}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_banner_is_up() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_store_backend() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["storeBackend"].is_string());
    assert!(body["uptimeSeconds"].is_number());
}

#[tokio::test]
async fn selection_requires_authentication() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/letters/next")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn letter_select_then_attempt_round_trip() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/letters/next", "learner-api-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let item_id = body["itemId"].as_str().unwrap().to_string();
    assert_eq!(body["displayText"].as_str().unwrap(), item_id);

    let payload = json!({ "itemId": item_id, "transcript": item_id });
    let response = app
        .clone()
        .oneshot(post_json("/api/letters/attempt", "learner-api-1", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["correct"], true);
    assert_eq!(body["score"], 100);
    assert_eq!(body["reward"], 1.0);
    assert_eq!(body["pulls"], 1);
    assert_eq!(body["message"], "Correct!");

    // the attempt consumed the active arm; a replay conflicts
    let response = app
        .oneshot(post_json("/api/letters/attempt", "learner-api-1", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn word_select_then_attempt_round_trip() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/words/next", "learner-api-2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let item_id = body["itemId"].as_str().unwrap().to_string();
    let word = body["displayText"].as_str().unwrap().to_string();
    assert!(body["targetLetters"].is_array());

    let payload = json!({
        "itemId": item_id,
        "expected": word,
        "transcript": word,
        "responseTimeMs": 1500
    });
    let response = app
        .oneshot(post_json("/api/words/attempt", "learner-api-2", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["correct"], true);
    assert_eq!(body["reward"], 1.0);
    assert_eq!(body["message"], "Good job! Keep going.");
}

#[tokio::test]
async fn attempt_without_transcript_or_audio_is_rejected() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/letters/next", "learner-api-3"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let item_id = body["itemId"].as_str().unwrap().to_string();

    let payload = json!({ "itemId": item_id });
    let response = app
        .oneshot(post_json("/api/letters/attempt", "learner-api-3", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn word_attempt_with_bad_response_time_is_rejected() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/words/next", "learner-api-4"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let item_id = body["itemId"].as_str().unwrap().to_string();
    let word = body["displayText"].as_str().unwrap().to_string();

    let payload = json!({
        "itemId": item_id,
        "expected": word,
        "transcript": word,
        "responseTimeMs": 0
    });
    let response = app
        .oneshot(post_json("/api/words/attempt", "learner-api-4", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn attempt_against_unselected_item_conflicts() {
    let app = test_app().await;

    let payload = json!({ "itemId": "a", "transcript": "a" });
    let response = app
        .oneshot(post_json("/api/letters/attempt", "learner-api-5", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn two_letter_round_trip_reports_problem_letters() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/twoletterwords/next", "learner-api-6"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let item_id = body["itemId"].as_str().unwrap().to_string();
    let word = body["displayText"].as_str().unwrap().to_string();

    // answer something entirely wrong: every expected letter is a problem
    let payload = json!({
        "itemId": item_id,
        "expected": word,
        "transcript": "qq"
    });
    let response = app
        .oneshot(post_json("/api/twoletterwords/attempt", "learner-api-6", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["correct"], false);
    let problems = body["problemLetters"].as_array().unwrap();
    assert!(!problems.is_empty());
}

#[tokio::test]
async fn sentence_round_trip() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/sentences/next", "learner-api-7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let item_id = body["itemId"].as_str().unwrap().to_string();
    let sentence = body["displayText"].as_str().unwrap().to_string();

    let payload = json!({
        "itemId": item_id,
        "expected": sentence,
        "transcript": sentence,
        "responseTimeMs": 2000
    });
    let response = app
        .oneshot(post_json("/api/sentences/attempt", "learner-api-7", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["correct"], true);
    assert_eq!(body["reward"], 1.0);
}

#[tokio::test]
async fn unknown_route_returns_the_error_envelope() {
    let app = test_app().await;
    let response = app
        .oneshot(get("/api/phonemes/next", "learner-api-8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}
