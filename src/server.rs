//! REST server for vocabulary review.
//!
//! Maps HTTP routes onto the vocabulary commands. Score validation happens
//! in the command layer, so an out-of-range score is a 400 here rather than
//! being quietly scheduled.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::commands::vocabulary as commands;
use crate::commands::{CommandError, CommandErrorKind};
use crate::config::ServerConfig;
use crate::vocabulary::{EntryFilter, NewEntry, VocabularyStore, MAX_SCORE, MIN_SCORE};

/// Server state shared across requests.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn VocabularyStore>,
}

/// Body of a review submission.
///
/// The score is read as any JSON number so that oversized or fractional
/// values reach validation instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub score: serde_json::Number,
}

/// Query parameters for listing entries.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub language: Option<String>,
    pub book_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetentionResponse {
    retention_score: u32,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            CommandErrorKind::Validation => StatusCode::BAD_REQUEST,
            CommandErrorKind::NotFound => StatusCode::NOT_FOUND,
            CommandErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("Vocabulary request failed: {}", self.message);
        }
        (status, Json(ErrorBody { error: self.message })).into_response()
    }
}

type ApiResult<T> = Result<T, CommandError>;

/// Any body axum cannot deserialize is a caller error, reported like the
/// other validation failures.
fn body_error(rejection: JsonRejection) -> CommandError {
    CommandError::validation(format!("Invalid request body: {}", rejection.body_text()))
}

/// Run a store operation on the blocking pool; the file store does
/// synchronous IO under a mutex.
async fn with_store<T, F>(state: &ServerState, operation: F) -> ApiResult<T>
where
    F: FnOnce(&dyn VocabularyStore) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || operation(store.as_ref()))
        .await
        .map_err(|e| CommandError::storage(format!("Storage task failed: {}", e)))?
}

async fn list_entries(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = EntryFilter {
        language: query.language,
        book_id: query.book_id,
    };
    let entries = with_store(&state, move |store| commands::list_entries(store, &filter)).await?;
    Ok(Json(entries))
}

async fn capture_entry(
    State(state): State<ServerState>,
    request: Result<Json<NewEntry>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = request.map_err(body_error)?;
    let entry = with_store(&state, move |store| commands::capture_entry(store, request)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn due_entries(State(state): State<ServerState>) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let due = with_store(&state, move |store| commands::list_due_entries(store, now)).await?;
    Ok(Json(due))
}

async fn submit_review(
    State(state): State<ServerState>,
    Path(entry_id): Path<String>,
    request: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = commands::parse_entry_id(&entry_id)?;
    let Json(request) = request.map_err(body_error)?;
    let score = request.score.as_i64().ok_or_else(|| {
        CommandError::validation(format!(
            "Familiarity score must be a whole number between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, request.score
        ))
    })?;
    let entry = with_store(&state, move |store| commands::submit_review(store, id, score)).await?;
    Ok(Json(entry))
}

async fn delete_entry(
    State(state): State<ServerState>,
    Path(entry_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = commands::parse_entry_id(&entry_id)?;
    with_store(&state, move |store| commands::delete_entry(store, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn retention(State(state): State<ServerState>) -> ApiResult<impl IntoResponse> {
    let retention_score = with_store(&state, |store| commands::retention(store)).await?;
    Ok(Json(RetentionResponse { retention_score }))
}

async fn stats(State(state): State<ServerState>) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let stats = with_store(&state, move |store| commands::review_stats(store, now)).await?;
    Ok(Json(stats))
}

async fn preview(
    State(state): State<ServerState>,
    Path(entry_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = commands::parse_entry_id(&entry_id)?;
    let preview = with_store(&state, move |store| commands::preview_intervals(store, id)).await?;
    Ok(Json(preview))
}

/// Build the API router over a store.
pub fn build_router(store: Arc<dyn VocabularyStore>) -> Router {
    Router::new()
        .route("/api/vocabulary", get(list_entries).post(capture_entry))
        .route("/api/vocabulary/due", get(due_entries))
        .route("/api/vocabulary/retention", get(retention))
        .route("/api/vocabulary/stats", get(stats))
        .route("/api/vocabulary/{id}", axum::routing::delete(delete_entry))
        .route("/api/vocabulary/{id}/review", put(submit_review))
        .route("/api/vocabulary/{id}/preview", get(preview))
        .with_state(ServerState { store })
}

/// Start the API server and serve until ctrl-c.
pub async fn start_server(
    config: &ServerConfig,
    store: Arc<dyn VocabularyStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(config.bind.as_str()).await?;
    let addr = listener.local_addr()?;

    log::info!("Vocabulary server started on http://{}", addr);

    axum::serve(listener, build_router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Vocabulary server shutting down");
        })
        .await?;

    Ok(())
}
