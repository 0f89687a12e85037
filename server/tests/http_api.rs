use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sukuranburu_core::{Board, BoardSetup};
use sukuranburu_server::router;
use tower::ServiceExt;

fn app() -> Router {
    let setup = BoardSetup::parse("2x2\nA\nB\nB\nA\n").unwrap();
    router(Arc::new(Board::new(setup)))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn look_renders_fresh_board() {
    let response = app().oneshot(get("/look/alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "2x2\ndown\ndown\ndown\ndown");
}

#[tokio::test]
async fn flip_claims_a_card() {
    let response = app().oneshot(get("/flip/alice/0,0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert_eq!(body.lines().nth(1), Some("my A"));
}

#[tokio::test]
async fn flip_failure_is_conflict_with_diagnostic() {
    let response = app().oneshot(get("/flip/alice/9,9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_text(response).await;
    assert!(
        body.starts_with("cannot flip this card: "),
        "unexpected body: {body}"
    );
}

#[tokio::test]
async fn malformed_location_is_bad_request() {
    let response = app().oneshot(get("/flip/alice/zz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_rewrites_matching_labels() {
    let app = app();
    let flipped = app.clone().oneshot(get("/flip/alice/0,0")).await.unwrap();
    assert_eq!(flipped.status(), StatusCode::OK);

    let response = app.oneshot(get("/replace/alice/A/Z")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert_eq!(body.lines().nth(1), Some("my Z"));
}

#[tokio::test]
async fn same_player_state_is_shared_between_routes() {
    let app = app();
    app.clone().oneshot(get("/flip/alice/0,0")).await.unwrap();

    let response = app.oneshot(get("/look/bob")).await.unwrap();
    let body = body_text(response).await;
    assert_eq!(body.lines().nth(1), Some("up A"));
}
