use serde::{Deserialize, Serialize};

use crate::domain::{
    BalloonSize, ColorCluster, Correction, DesignAnalysisSnapshot, DesignId, InventoryAvailability,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseCommandRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseCommandResponse {
    pub correction: Correction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyCorrectionRequest {
    pub correction: Correction,
    pub clusters: Vec<ColorCluster>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCorrectionResponse {
    pub clusters: Vec<ColorCluster>,
    pub total_clusters: u32,
    pub snapshot: DesignAnalysisSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDesignRequest {
    pub total_clusters: u32,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDesignRequest {
    pub total_clusters: u32,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDesignRequest {
    pub clusters: Vec<ColorCluster>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignResponse {
    pub design_id: DesignId,
    pub snapshot: DesignAnalysisSnapshot,
    pub clusters: Vec<ColorCluster>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryQuery {
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertInventoryRequest {
    pub color: String,
    pub size: BalloonSize,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub availability: InventoryAvailability,
}

/// Body sent to the remote text-understanding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    pub command: String,
    pub current_clusters: Vec<ColorCluster>,
}
