//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::{Map, Value, json};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::StationId;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/sources", get(list_sources))
        .route("/sources/:alias", get(source_stations))
        .route("/buoys", get(list_buoys))
        .route("/buoys/:id", get(buoy))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        refresh_cycles: state.status.cycles(),
        last_refresh: state.status.last_refresh(),
        sources: state.cache.source_count().await,
        stations: state.cache.station_count().await,
    })
}

/// Every cached source with the alias to query it by.
async fn list_sources(State(state): State<AppState>) -> Json<SourceListResponse> {
    let sources = state
        .cache
        .aliases()
        .await
        .into_iter()
        .map(|(endpoint, id)| SourceEntry { id, endpoint })
        .collect();

    Json(SourceListResponse { sources })
}

/// Station ids of one source, keyed by the source's name.
///
/// An unknown alias answers with an empty list under the alias itself.
async fn source_stations(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> Json<Value> {
    let mut body = Map::new();

    match state.cache.source_by_alias(&alias).await {
        Some(source) => {
            let stations = source
                .stations
                .into_iter()
                .map(|s| Value::String(s.into()))
                .collect();
            body.insert(source.name, Value::Array(stations));
        }
        None => {
            warn!(alias = %alias, "unknown source alias");
            body.insert(alias, Value::Array(Vec::new()));
        }
    }

    Json(Value::Object(body))
}

async fn list_buoys(State(state): State<AppState>) -> Json<BuoyListResponse> {
    let buoys = state
        .cache
        .all_station_ids()
        .await
        .into_iter()
        .map(String::from)
        .collect();

    Json(BuoyListResponse { buoys })
}

/// Latest observation of one station, keyed by the requested id.
///
/// Unknown, malformed or currently unavailable stations answer with an
/// empty object.
async fn buoy(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    let snapshot = match StationId::parse(&id) {
        Ok(station) => state.cache.station(&station).await,
        Err(e) => {
            debug!(id = %id, error = %e, "rejected station id");
            None
        }
    };

    let value = match snapshot {
        Some(snapshot) => json!(snapshot.as_ref()),
        None => Value::Object(Map::new()),
    };

    let mut body = Map::new();
    body.insert(id, value);
    Json(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::{BuoyCache, CacheConfig};
    use crate::ndbc::{MockNdbcClient, Upstream};

    fn mock_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("sources.json"),
            r#"{"Alpha Group": ["41001", "41002"], "IOOS/Partners": ["44013"], "Ships": ["SHIP1"]}"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("stations")).unwrap();
        fs::write(
            dir.path().join("stations/41001.json"),
            r#"{"station": "41001", "observed_at": "2024-03-15T12:00:00Z", "measurements": {"WSPD": 5.0, "WVHT": 1.2}}"#,
        )
        .unwrap();
        dir
    }

    async fn app(dir: &TempDir) -> (Router, AppState) {
        let client = MockNdbcClient::new(dir.path()).unwrap();
        let cache = Arc::new(BuoyCache::new(Upstream::Mock(client), CacheConfig::default()));
        let state = AppState::new(Arc::clone(&cache)).unwrap();
        cache.refresh_sources().await.unwrap();
        (create_router(state.clone()), state)
    }

    async fn get_json(router: Router, uri: &str) -> Value {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let dir = mock_dir();
        let (router, _) = app(&dir).await;

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn sources_list_aliases_without_ships() {
        let dir = mock_dir();
        let (router, _) = app(&dir).await;

        let body = get_json(router, "/sources").await;
        assert_eq!(
            body,
            json!({"sources": [
                {"id": "Alpha Group", "endpoint": "Alpha_Group"},
                {"id": "IOOS/Partners", "endpoint": "IOOS_Partners"},
            ]})
        );
    }

    #[tokio::test]
    async fn source_by_alias_lists_stations() {
        let dir = mock_dir();
        let (router, _) = app(&dir).await;

        let body = get_json(router, "/sources/Alpha_Group").await;
        assert_eq!(body, json!({"Alpha Group": ["41001", "41002"]}));
    }

    #[tokio::test]
    async fn unknown_alias_is_empty() {
        let dir = mock_dir();
        let (router, _) = app(&dir).await;

        let body = get_json(router, "/sources/Ships").await;
        assert_eq!(body, json!({"Ships": []}));
    }

    #[tokio::test]
    async fn buoys_lists_known_stations() {
        let dir = mock_dir();
        let (router, _) = app(&dir).await;

        let body = get_json(router, "/buoys").await;
        assert_eq!(body, json!({"buoys": ["41001", "41002", "44013"]}));
    }

    #[tokio::test]
    async fn buoy_returns_snapshot() {
        let dir = mock_dir();
        let (router, _) = app(&dir).await;

        let body = get_json(router, "/buoys/41001").await;
        assert_eq!(body["41001"]["station"], json!("41001"));
        assert_eq!(body["41001"]["measurements"]["WVHT"], json!(1.2));
    }

    #[tokio::test]
    async fn missing_buoys_are_empty_objects() {
        let dir = mock_dir();
        let (router, _) = app(&dir).await;

        // Listed without data, not listed, and malformed
        for id in ["41002", "99999", "not-a-station"] {
            let body = get_json(router.clone(), &format!("/buoys/{id}")).await;
            assert_eq!(body, json!({ id: {} }));
        }
    }

    #[tokio::test]
    async fn status_counts_refreshes() {
        let dir = mock_dir();
        let (router, state) = app(&dir).await;
        state.cache.refresh_sources().await.unwrap();

        let body = get_json(router, "/status").await;
        assert_eq!(body["refresh_cycles"], json!(2));
        assert_eq!(body["sources"], json!(2));
        assert_eq!(body["stations"], json!(3));
        assert!(body["last_refresh"].is_string());
    }
}
