// Ballot Tracker - Web Server
// Read-only REST API over the reconciliation facade

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use ballot_tracker::{
    load_snapshot, AppConfig, DelegationProfiles, ErrorKind, Featured, LookupError,
    PoliticianProfile, RecordDetail, Reconciler,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Shared application state
#[derive(Clone)]
struct AppState {
    reconciler: Arc<Reconciler>,
    config: Arc<AppConfig>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Failure on the API surface
enum ApiError {
    Lookup(LookupError),
    Internal(anyhow::Error),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::Lookup(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Lookup(err) => {
                let status = match err.kind() {
                    ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                };
                (status, err.to_string())
            }
            ApiError::Internal(err) => {
                error!(error = %format!("{:#}", err), "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
            }
        };
        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct RefreshResponse {
    legislators: usize,
    zip_codes: usize,
    records: usize,
    built_at: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/zip/:zip - Delegation for a ZIP code
async fn get_delegation(
    State(state): State<AppState>,
    Path(zip): Path<String>,
) -> ApiResult<DelegationProfiles> {
    Ok(Json(ApiResponse::ok(state.reconciler.search_by_zip(&zip)?)))
}

/// GET /api/search?q= - Substring name search
async fn search_by_name(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<PoliticianProfile>> {
    Ok(Json(ApiResponse::ok(state.reconciler.search_by_name(&params.q)?)))
}

/// GET /api/politicians/:ref - Profile by bioguide id or exact name
async fn get_politician(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<PoliticianProfile> {
    Ok(Json(ApiResponse::ok(state.reconciler.lookup_profile(&reference)?)))
}

/// GET /api/records - Every record with its resolved politicians
async fn get_records(State(state): State<AppState>) -> ApiResult<Vec<RecordDetail>> {
    Ok(Json(ApiResponse::ok(state.reconciler.list_records())))
}

/// GET /api/records/:id - One record
async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult<RecordDetail> {
    Ok(Json(ApiResponse::ok(state.reconciler.record_detail(&record_id)?)))
}

/// GET /api/featured - Top politicians with good / bad votes
async fn get_featured(State(state): State<AppState>) -> ApiResult<Featured> {
    Ok(Json(ApiResponse::ok(state.reconciler.featured())))
}

/// POST /api/refresh - Reload all sources and publish a new snapshot
async fn refresh(State(state): State<AppState>) -> ApiResult<RefreshResponse> {
    let config = Arc::clone(&state.config);
    let snapshot = tokio::task::spawn_blocking(move || load_snapshot(&config))
        .await
        .context("snapshot loader panicked")
        .and_then(|result| result)
        .map_err(ApiError::Internal)?;

    let response = RefreshResponse {
        legislators: snapshot.index.len(),
        zip_codes: snapshot.districts.len(),
        records: snapshot.linker.len(),
        built_at: snapshot.built_at.to_rfc3339(),
    };
    state.reconciler.refresh(snapshot);

    Ok(Json(ApiResponse::ok(response)))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/zip/:zip", get(get_delegation))
        .route("/search", get(search_by_name))
        .route("/politicians/:reference", get(get_politician))
        .route("/records", get(get_records))
        .route("/records/:record_id", get(get_record))
        .route("/featured", get(get_featured))
        .route("/refresh", post(refresh))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    println!("🌐 Ballot Tracker - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = AppConfig::load()?;
    let snapshot = load_snapshot(&config)?;
    println!(
        "✓ Loaded {} legislators, {} ZIP codes, {} records",
        snapshot.index.len(),
        snapshot.districts.len(),
        snapshot.linker.len()
    );

    let addr = config.server.addr.clone();
    let state = AppState {
        reconciler: Arc::new(Reconciler::new(snapshot)),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "server listening");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/zip/55401", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state))
        .await
        .context("Failed to start server")?;

    Ok(())
}
