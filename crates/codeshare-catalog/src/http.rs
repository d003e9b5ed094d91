//! HTTP routes for the catalog.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::{CatalogError, CodeBlockStore};

type SharedStore = Arc<dyn CodeBlockStore>;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Builds the catalog router:
///
/// - `GET /api/codeblocks` → every block
/// - `GET /api/codeblocks/{id}` → one block, or 404
///
/// Store failures answer 500 with a generic body and are logged.
pub fn router(store: SharedStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/codeblocks", get(list_blocks))
        .route("/api/codeblocks/{id}", get(get_block))
        .layer(cors)
        .with_state(store)
}

async fn list_blocks(State(store): State<SharedStore>) -> Response {
    match store.list().await {
        Ok(blocks) => Json(blocks).into_response(),
        Err(e) => server_error(&e),
    }
}

async fn get_block(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Response {
    match store.get(&id).await {
        Ok(block) => Json(block).into_response(),
        Err(CatalogError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Json(ErrorBody { error: "Not found" }))
                .into_response()
        }
        Err(e) => server_error(&e),
    }
}

fn server_error(e: &CatalogError) -> Response {
    tracing::error!(error = %e, "catalog lookup failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "Server error",
        }),
    )
        .into_response()
}
