//! HTTP surface
//!
//! Routes:
//! - `GET /health`
//! - `GET /info`
//! - `GET /api/repositories` - discovered repository names, sorted
//! - `GET /api/charts-all` - cross-repository listing, disabled

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;

use chartroom_core::ServerConfig;
use chartroom_repo::{DiscoveryError, RepositoryDiscovery};

/// Shared application state passed to all handlers via `axum::extract::State`.
pub struct AppState {
    /// Resolved startup configuration, never mutated afterwards
    pub config: ServerConfig,
    /// Gate and discovery strategies
    pub discovery: RepositoryDiscovery,
}

impl AppState {
    pub fn new(config: ServerConfig, discovery: RepositoryDiscovery) -> Self {
        Self { config, discovery }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/api/repositories", get(list_repositories))
        .route("/api/charts-all", get(list_all_charts))
        .with_state(state)
}

/// Error response with a `{"error": "..."}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(err: DiscoveryError) -> Self {
        let status = match err {
            DiscoveryError::Disabled => StatusCode::FORBIDDEN,
            DiscoveryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "healthy": true }))
}

async fn info() -> Json<serde_json::Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

/// `GET /api/repositories`
pub async fn list_repositories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.discovery.discover().await?;
    Ok(Json(names))
}

/// `GET /api/charts-all`
pub async fn list_all_charts(State(state): State<Arc<AppState>>) -> ApiError {
    if !state.config.features.allow_charts_all {
        return ApiError::new(StatusCode::FORBIDDEN, "charts-all is disabled");
    }
    ApiError::new(StatusCode::NOT_IMPLEMENTED, "charts-all is not implemented")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartroom_core::MemoryObjectStore;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn state(root: Option<PathBuf>, store: &MemoryObjectStore) -> Arc<AppState> {
        let mut config = ServerConfig::default();
        config.storage.local_root_dir = root;
        state_from(config, store)
    }

    fn state_from(config: ServerConfig, store: &MemoryObjectStore) -> Arc<AppState> {
        let discovery = RepositoryDiscovery::from_config(&config, Arc::new(store.clone()));
        Arc::new(AppState::new(config, discovery))
    }

    async fn into_parts(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn call_list(state: Arc<AppState>) -> (StatusCode, String) {
        into_parts(list_repositories(State(state)).await.into_response()).await
    }

    #[tokio::test]
    async fn test_local_tree_response() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "repoA/charts/webapp-0.1.0.tgz");
        touch(dir.path(), "repoB/api-1.0.0.tgz");
        let store = MemoryObjectStore::new();

        let (status, body) = call_list(state(Some(dir.path().to_path_buf()), &store)).await;
        assert_eq!(status, StatusCode::OK);
        insta::assert_snapshot!(body, @r#"["repoA","repoB"]"#);
        assert_eq!(store.operation_counts().lists, 0);
    }

    #[tokio::test]
    async fn test_disabled_response() {
        let store = MemoryObjectStore::with_paths(["t1/charts/a.tgz"]);
        let mut config = ServerConfig::default();
        config.features.allow_list_repos = false;

        let (status, body) = call_list(state_from(config, &store)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        insta::assert_snapshot!(body, @r#"{"error":"listing repositories is disabled"}"#);
        assert_eq!(store.operation_counts().lists, 0);
    }

    #[tokio::test]
    async fn test_generic_fallback_response() {
        let store = MemoryObjectStore::with_paths(["t1/charts/a.tgz", "t2/b.tgz", "noslash"]);

        let (status, body) = call_list(state(None, &store)).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(names, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_empty_generic_result_is_ok() {
        let store = MemoryObjectStore::new();

        let (status, body) = call_list(state(None, &store)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_listing_failure_response() {
        let store = MemoryObjectStore::failing("bucket unreachable");

        let (status, body) = call_list(state(None, &store)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            json["error"],
            "Storage listing failed: bucket unreachable"
        );
    }

    #[tokio::test]
    async fn test_charts_all_disabled() {
        let store = MemoryObjectStore::new();
        let response = list_all_charts(State(state(None, &store))).await.into_response();

        let (status, body) = into_parts(response).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        insta::assert_snapshot!(body, @r#"{"error":"charts-all is disabled"}"#);
    }

    #[tokio::test]
    async fn test_charts_all_enabled_is_not_implemented() {
        let store = MemoryObjectStore::new();
        let mut config = ServerConfig::default();
        config.features.allow_charts_all = true;
        let response = list_all_charts(State(state_from(config, &store)))
            .await
            .into_response();

        let (status, body) = into_parts(response).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        insta::assert_snapshot!(body, @r#"{"error":"charts-all is not implemented"}"#);
    }

    #[tokio::test]
    async fn test_router_over_tcp() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "repoA/charts/webapp-0.1.0.tgz");
        let store = MemoryObjectStore::new();
        let app = router(state(Some(dir.path().to_path_buf()), &store));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base = format!("http://{}", addr);
        let repos: Vec<String> = reqwest::get(format!("{}/api/repositories", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(repos, vec!["repoA"]);

        let health = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(health.status().as_u16(), 200);

        let charts_all = reqwest::get(format!("{}/api/charts-all", base)).await.unwrap();
        assert_eq!(charts_all.status().as_u16(), 403);
    }
}
