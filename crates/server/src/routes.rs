use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use marquee_core::error::ApiError;
use marquee_metadata::credentials::FixedCredential;
use marquee_metadata::session::RowOutcome;
use marquee_scanner::{RowScan, scan_row};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        // The page script runs on a third-party origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/rows/scan", post(scan_rows))
        .route("/rows/lookup", post(lookup_row))
        .route(
            "/credential",
            put(set_credential).delete(clear_credential),
        )
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    cached_lookups: i64,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let cached_lookups = marquee_db::repo::kv::count_prefix(&state.db, "movie|")
        .await
        .map_err(|e| ApiError::Internal(format!("database check failed: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        cached_lookups,
    }))
}

// ─── Rows ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ScanRequest {
    filenames: Vec<String>,
}

#[derive(Serialize)]
struct ScannedRow {
    filename: String,
    #[serde(flatten)]
    scan: RowScan,
}

/// New rows appeared on the page: decide which get a lookup button.
async fn scan_rows(Json(req): Json<ScanRequest>) -> Json<Vec<ScannedRow>> {
    let rows = req
        .filenames
        .into_iter()
        .map(|filename| ScannedRow {
            scan: scan_row(&filename),
            filename,
        })
        .collect();
    Json(rows)
}

#[derive(Deserialize)]
struct LookupRequest {
    row_id: String,
    filename: String,
    /// Title/year from an earlier scan; parsed from `filename` when absent.
    title: Option<String>,
    year: Option<String>,
    /// Answer to the page's key prompt, if it showed one.
    api_key: Option<String>,
}

async fn lookup_row(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<RowOutcome>, AppError> {
    if req.filename.trim().is_empty() {
        return Err(ApiError::BadRequest("filename must not be empty".into()).into());
    }

    let Some(_guard) = state.rows.begin(&req.row_id) else {
        return Err(ApiError::Conflict(format!("row {} is already being looked up", req.row_id)).into());
    };

    let credentials = FixedCredential(req.api_key);
    let outcome = match req.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => {
            let year = req.year.as_deref().filter(|y| !y.is_empty());
            state
                .session
                .lookup(title, year, &req.filename, &credentials)
                .await?
        }
        None => state.session.lookup_row(&req.filename, &credentials).await?,
    };

    debug!(row_id = %req.row_id, ?outcome, "row looked up");
    Ok(Json(outcome))
}

// ─── Credential ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CredentialRequest {
    api_key: String,
}

async fn set_credential(
    State(state): State<AppState>,
    Json(req): Json<CredentialRequest>,
) -> Result<StatusCode, AppError> {
    if req.api_key.trim().is_empty() {
        return Err(ApiError::BadRequest("api_key must not be empty".into()).into());
    }
    state.session.set_credential(&req.api_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
struct ClearedResponse {
    removed: bool,
}

async fn clear_credential(
    State(state): State<AppState>,
) -> Result<Json<ClearedResponse>, AppError> {
    let removed = state.session.clear_credential().await?;
    Ok(Json(ClearedResponse { removed }))
}
