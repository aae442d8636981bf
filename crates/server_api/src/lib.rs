use std::sync::Arc;

use assistant::{
    apply_correction as apply_to_clusters, distribute_clusters, project, snapshot_of, ColorMatcher,
    CommandParser, DesignStore,
};
use chrono::Utc;
use shared::{
    domain::{
        ColorCluster, Correction, DesignAnalysisSnapshot, DesignId, DesignRecord,
        InventoryAvailability,
    },
    error::{ApiError, ErrorCode},
    protocol::{ApplyCorrectionResponse, DesignResponse, UpsertInventoryRequest},
};
use storage::Storage;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub matcher: ColorMatcher,
    pub parser: Arc<CommandParser>,
}

impl ApiContext {
    pub fn new(storage: Storage, matcher: ColorMatcher) -> Self {
        Self {
            storage,
            matcher,
            parser: Arc::new(CommandParser::standard()),
        }
    }
}

pub fn parse_command(ctx: &ApiContext, text: &str) -> Result<Correction, ApiError> {
    ctx.parser.parse(text).ok_or_else(|| {
        ApiError::new(
            ErrorCode::UnrecognizedCommand,
            "try e.g. 'change pink clusters to 5', 'add purple with 3 clusters' or 'remove green color'",
        )
    })
}

pub fn apply_correction(
    ctx: &ApiContext,
    correction: &Correction,
    clusters: &[ColorCluster],
) -> Result<ApplyCorrectionResponse, ApiError> {
    let applied = apply_to_clusters(correction, clusters, &ctx.matcher)?;
    let snapshot = applied.snapshot();
    Ok(ApplyCorrectionResponse {
        clusters: applied.clusters,
        total_clusters: applied.total_clusters,
        snapshot,
    })
}

pub fn project_design(total_clusters: u32, colors: &[String]) -> DesignAnalysisSnapshot {
    project(total_clusters, colors)
}

pub async fn create_design(
    ctx: &ApiContext,
    total_clusters: u32,
    colors: &[String],
) -> Result<DesignResponse, ApiError> {
    let colors = clean_colors(colors)?;
    let clusters = distribute_clusters(total_clusters, &colors);
    let record = ctx
        .storage
        .create_design(&project(total_clusters, &colors), &clusters)
        .await
        .map_err(persistence)?;
    Ok(design_response(record))
}

pub async fn get_design(ctx: &ApiContext, design_id: DesignId) -> Result<DesignResponse, ApiError> {
    let record = ctx
        .storage
        .load_design(design_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| design_not_found(design_id))?;
    Ok(design_response(record))
}

/// Stores `clusters` as the committed allocation of an existing design.
pub async fn commit_design(
    ctx: &ApiContext,
    design_id: DesignId,
    clusters: Vec<ColorCluster>,
) -> Result<DesignResponse, ApiError> {
    if ctx
        .storage
        .load_design(design_id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err(design_not_found(design_id));
    }

    let record = DesignRecord {
        design_id,
        snapshot: snapshot_of(&clusters)?,
        clusters,
        updated_at: Utc::now(),
    };
    ctx.storage
        .save_design(&record)
        .await
        .map_err(persistence)?;
    info!(
        design_id = design_id.0,
        total_clusters = record.snapshot.total_clusters,
        "design committed"
    );
    Ok(design_response(record))
}

pub async fn check_inventory(
    ctx: &ApiContext,
    color: &str,
) -> Result<InventoryAvailability, ApiError> {
    if color.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "color is required"));
    }
    ctx.storage
        .lookup_inventory(color, &ctx.matcher)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::NotFound,
                format!("no inventory matches color '{color}'"),
            )
        })
}

pub async fn upsert_inventory(
    ctx: &ApiContext,
    req: &UpsertInventoryRequest,
) -> Result<(), ApiError> {
    if req.color.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "color is required"));
    }
    ctx.storage
        .upsert_inventory(&req.color, req.size, req.quantity)
        .await
        .map_err(internal)
}

fn clean_colors(colors: &[String]) -> Result<Vec<String>, ApiError> {
    let cleaned: Vec<String> = colors
        .iter()
        .map(|color| color.trim().to_string())
        .filter(|color| !color.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "a design needs at least one color",
        ));
    }
    Ok(cleaned)
}

fn design_response(record: DesignRecord) -> DesignResponse {
    DesignResponse {
        design_id: record.design_id,
        snapshot: record.snapshot,
        clusters: record.clusters,
    }
}

fn design_not_found(design_id: DesignId) -> ApiError {
    ApiError::new(
        ErrorCode::NotFound,
        format!("design {} not found", design_id.0),
    )
}

fn persistence(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Persistence, err.to_string())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
