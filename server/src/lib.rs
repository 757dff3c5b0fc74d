use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use termite::{render_results, IndexPaths, IndexReader, QueryEngine, SearchResponse};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    /// Prefix `!` complements against the whole corpus when set.
    #[serde(default)]
    pub complement: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<IndexReader>,
}

/// Loads the index once at startup; every request shares the reader.
pub fn build_app(index_dir: &str) -> Result<Router> {
    let index = Arc::new(IndexReader::open(&IndexPaths::new(index_dir))?);
    tracing::info!(index_dir, num_docs = index.doc_count(), "index loaded");
    let state = AppState { index };

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let mut engine = QueryEngine::new(&state.index);
    if params.complement {
        engine = engine.with_complement();
    }
    let ids = engine.eval(&params.q).map_err(internal)?;
    let time_sec = start.elapsed().as_secs_f64();
    let response = render_results(&state.index, &ids, time_sec).map_err(internal)?;
    Ok(Json(response))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    if doc_id >= state.index.doc_count() {
        return Err((StatusCode::NOT_FOUND, format!("no document {doc_id}")));
    }
    let (url, title) = state.index.doc(doc_id).map_err(internal)?;
    Ok(Json(serde_json::json!({ "id": doc_id, "url": url, "title": title })))
}

fn internal(err: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
