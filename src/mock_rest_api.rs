//! Mock REST backend for the hierarchy contracts.
//!
//! Serves the two routes the console consumes over an in-memory
//! [`HierarchyStore`], with the same server-side re-validation a real
//! backend performs. This keeps the `RemoteRejected` path exercisable
//! end-to-end without any database.

use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use org_console_types::{NodeId, ParentPatch, Snapshot};

use crate::store::{HierarchyStore, StoreError};

/// Mock server configuration.
#[derive(Debug, Clone)]
pub struct MockRestApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MockRestApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<HierarchyStore>>,
}

/// Query parameters for the hierarchy fetch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyQuery {
    pub state_id: i64,
    pub party_id: i64,
}

/// GET /api/hierarchy?stateId={}&partyId={}
async fn get_hierarchy(
    State(state): State<AppState>,
    Query(query): Query<HierarchyQuery>,
) -> Result<Json<Snapshot>, (StatusCode, String)> {
    let store = state.store.read().unwrap();
    let scope = store.scope();
    if scope.state_id != query.state_id || scope.party_id != query.party_id {
        return Err((
            StatusCode::NOT_FOUND,
            format!(
                "no hierarchy for stateId={} partyId={}",
                query.state_id, query.party_id
            ),
        ));
    }
    Ok(Json(store.snapshot()))
}

/// PUT /api/hierarchy/nodes/{id}/parent
async fn update_parent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ParentPatch>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .write()
        .unwrap()
        .update_parent(NodeId(id), &patch)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|err| (status_for(&err), err.to_string()))
}

fn status_for(err: &StoreError) -> StatusCode {
    match err {
        StoreError::UnknownNode(_) | StoreError::UnknownAssembly(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidPatch(_) => StatusCode::BAD_REQUEST,
        StoreError::CycleDetected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::DuplicateNode(_) => StatusCode::CONFLICT,
    }
}

/// Build the mock router over shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/hierarchy", get(get_hierarchy))
        .route("/api/hierarchy/nodes/:id/parent", put(update_parent))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(config: MockRestApiConfig, store: HierarchyStore) -> anyhow::Result<()> {
    let state = AppState {
        store: Arc::new(RwLock::new(store)),
    };
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("mock hierarchy backend listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use org_console_types::PatchError;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&StoreError::UnknownNode(NodeId(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&StoreError::InvalidPatch(PatchError::AmbiguousParent)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&StoreError::CycleDetected {
                node: NodeId(1),
                target: NodeId(2),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
