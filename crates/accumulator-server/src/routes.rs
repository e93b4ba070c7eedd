//! API route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::SharedState;

/// Create API routes
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Tree state
        .route("/api/tree", get(handlers::tree_info))
        .route("/api/leaves", post(handlers::insert_leaf))
        .route("/api/levels/:level", get(handlers::level))
        // Root history
        .route("/api/root", get(handlers::last_root))
        .route("/api/roots/known", post(handlers::is_known_root))
        .route("/api/roots/:offset", get(handlers::root_at_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{
        format_field, InsertResponse, KnownRootResponse, LevelResponse, RootAtOffsetResponse,
        RootResponse, TreeInfoResponse,
    };
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use merkle_accumulator::{ConstraintF, TreeConfig};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app(depth: usize, roots_size: usize) -> Router {
        let state = AppState::load_or_create(&TreeConfig::new(depth, roots_size), None)
            .unwrap()
            .into_shared();
        api_routes().with_state(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    fn leaf_hex(n: u64) -> String {
        format_field(&ConstraintF::from(n))
    }

    #[tokio::test]
    async fn test_insert_then_query() {
        let app = app(4, 3);

        let (status, body) = send(&app, get("/api/root")).await;
        assert_eq!(status, StatusCode::OK);
        let empty_root = decode::<RootResponse>(&body).root;

        let (status, body) = send(&app, post_json("/api/leaves", serde_json::json!({ "leaf": leaf_hex(7) }))).await;
        assert_eq!(status, StatusCode::OK);
        let inserted: InsertResponse = decode(&body);
        assert_eq!(inserted.index, 0);
        assert_ne!(inserted.root, empty_root);

        let (_, body) = send(&app, get("/api/tree")).await;
        let info: TreeInfoResponse = decode(&body);
        assert_eq!(info.leaf_count, 1);
        assert_eq!(info.capacity, 16);
        assert_eq!(info.history_length, 2);
        assert_eq!(info.last_root, inserted.root);

        let (_, body) = send(&app, post_json("/api/roots/known", serde_json::json!({ "root": empty_root }))).await;
        assert!(decode::<KnownRootResponse>(&body).known);

        let (_, body) = send(&app, get("/api/roots/1")).await;
        let previous: RootAtOffsetResponse = decode(&body);
        assert_eq!(previous.root, Some(empty_root));

        let (_, body) = send(&app, get("/api/roots/2")).await;
        assert_eq!(decode::<RootAtOffsetResponse>(&body).root, None);
    }

    #[tokio::test]
    async fn test_level_introspection() {
        let app = app(4, 3);
        send(&app, post_json("/api/leaves", serde_json::json!({ "leaf": leaf_hex(9) }))).await;

        let (status, body) = send(&app, get("/api/levels/0")).await;
        assert_eq!(status, StatusCode::OK);
        let level: LevelResponse = decode(&body);
        assert_eq!(level.filled_subtree, leaf_hex(9));

        let (status, _) = send(&app, get("/api/levels/4")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_tree_conflict() {
        let app = app(1, 3);
        for n in 0..2 {
            let (status, _) = send(&app, post_json("/api/leaves", serde_json::json!({ "leaf": leaf_hex(n) }))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, _) = send(&app, post_json("/api/leaves", serde_json::json!({ "leaf": leaf_hex(5) }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = send(&app, get("/api/tree")).await;
        assert_eq!(decode::<TreeInfoResponse>(&body).leaf_count, 2);
    }

    #[tokio::test]
    async fn test_bad_leaf_and_offset() {
        let app = app(4, 3);

        let (status, _) = send(&app, post_json("/api/leaves", serde_json::json!({ "leaf": "0x12" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/api/roots/3")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, post_json("/api/roots/known", serde_json::json!({ "root": leaf_hex(0) }))).await;
        assert!(!decode::<KnownRootResponse>(&body).known);
    }
}
