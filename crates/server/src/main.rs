use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use server_api::ApiContext;
use shared::{
    domain::{Correction, DesignAnalysisSnapshot, DesignId},
    error::{ApiError, ErrorCode},
    protocol::{
        ApplyCorrectionRequest, ApplyCorrectionResponse, CommitDesignRequest, CreateDesignRequest,
        DesignResponse, InventoryQuery, InventoryResponse, ParseCommandRequest,
        ParseCommandResponse, ProjectDesignRequest, UpsertInventoryRequest,
    },
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};

mod app_state;
mod settings;

use app_state::AppState;
use settings::load_settings;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings()?;
    let storage = Storage::new(&settings.database_url)
        .await
        .map_err(|error| {
            error!(
                database_url = %settings.database_url,
                %error,
                "failed to open SQLite database; verify parent directory exists and permissions are correct"
            );
            error
        })?;
    let api = ApiContext::new(storage, settings.color_matcher());
    let app = build_router(Arc::new(AppState { api }), settings.max_body_bytes);

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/commands/parse", post(http_parse_command))
        .route("/corrections/apply", post(http_apply_correction))
        .route("/designs/project", post(http_project_design))
        .route("/designs", post(http_create_design))
        .route("/designs/:design_id", get(http_get_design).put(http_commit_design))
        .route("/inventory", get(http_check_inventory))
        .route("/inventory", put(http_upsert_inventory))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::UnrecognizedCommand | ErrorCode::InvalidShape | ErrorCode::Validation => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::UnknownColor | ErrorCode::Unsupported => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Persistence => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = status_for(err.code);
    if status.is_server_error() {
        warn!(code = ?err.code, message = %err.message, "request failed");
    }
    (status, Json(err))
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        error!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn http_parse_command(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseCommandRequest>,
) -> ApiResult<ParseCommandResponse> {
    let correction: Correction = server_api::parse_command(&state.api, &req.text).map_err(reject)?;
    Ok(Json(ParseCommandResponse { correction }))
}

async fn http_apply_correction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApplyCorrectionRequest>,
) -> ApiResult<ApplyCorrectionResponse> {
    server_api::apply_correction(&state.api, &req.correction, &req.clusters)
        .map(Json)
        .map_err(reject)
}

async fn http_project_design(
    Json(req): Json<ProjectDesignRequest>,
) -> Json<DesignAnalysisSnapshot> {
    Json(server_api::project_design(req.total_clusters, &req.colors))
}

async fn http_create_design(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDesignRequest>,
) -> ApiResult<DesignResponse> {
    server_api::create_design(&state.api, req.total_clusters, &req.colors)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_get_design(
    State(state): State<Arc<AppState>>,
    Path(design_id): Path<i64>,
) -> ApiResult<DesignResponse> {
    server_api::get_design(&state.api, DesignId(design_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_commit_design(
    State(state): State<Arc<AppState>>,
    Path(design_id): Path<i64>,
    Json(req): Json<CommitDesignRequest>,
) -> ApiResult<DesignResponse> {
    server_api::commit_design(&state.api, DesignId(design_id), req.clusters)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_check_inventory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<InventoryResponse> {
    let availability = server_api::check_inventory(&state.api, &query.color)
        .await
        .map_err(reject)?;
    Ok(Json(InventoryResponse { availability }))
}

async fn http_upsert_inventory(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertInventoryRequest>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    server_api::upsert_inventory(&state.api, &req)
        .await
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
