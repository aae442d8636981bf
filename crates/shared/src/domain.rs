use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(DesignId);

/// 11-inch balloons per cluster.
pub const BALLOONS_11_PER_CLUSTER: u64 = 11;
/// 16-inch balloons per cluster.
pub const BALLOONS_16_PER_CLUSTER: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BalloonSize {
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "16")]
    Sixteen,
}

impl BalloonSize {
    pub const ALL: [BalloonSize; 2] = [BalloonSize::Eleven, BalloonSize::Sixteen];

    pub fn inches(self) -> u8 {
        match self {
            BalloonSize::Eleven => 11,
            BalloonSize::Sixteen => 16,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BalloonSize::Eleven => "11",
            BalloonSize::Sixteen => "16",
        }
    }

    /// Label used in design snapshots, e.g. `11in`.
    pub fn label(self) -> &'static str {
        match self {
            BalloonSize::Eleven => "11in",
            BalloonSize::Sixteen => "16in",
        }
    }

    pub fn balloons_per_cluster(self) -> u64 {
        match self {
            BalloonSize::Eleven => BALLOONS_11_PER_CLUSTER,
            BalloonSize::Sixteen => BALLOONS_16_PER_CLUSTER,
        }
    }
}

impl fmt::Display for BalloonSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown balloon size '{0}'")]
pub struct UnknownBalloonSize(pub String);

impl FromStr for BalloonSize {
    type Err = UnknownBalloonSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('"');
        let trimmed = trimmed
            .strip_suffix("in")
            .or_else(|| trimmed.strip_suffix("inch"))
            .unwrap_or(trimmed)
            .trim();
        match trimmed {
            "11" => Ok(BalloonSize::Eleven),
            "16" => Ok(BalloonSize::Sixteen),
            _ => Err(UnknownBalloonSize(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorCluster {
    pub color: String,
    pub base_clusters: u32,
    pub extra_clusters: u32,
}

impl ColorCluster {
    pub fn new(color: impl Into<String>, base_clusters: u32, extra_clusters: u32) -> Self {
        Self {
            color: color.into(),
            base_clusters,
            extra_clusters,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.base_clusters) + u64::from(self.extra_clusters)
    }
}

/// Value carried by a correction: a count for numeric edits, text for names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectionValue {
    Count(u32),
    Text(String),
}

impl CorrectionValue {
    pub fn as_count(&self) -> Option<u32> {
        match self {
            CorrectionValue::Count(n) => Some(*n),
            CorrectionValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CorrectionValue::Count(_) => None,
            CorrectionValue::Text(text) => Some(text),
        }
    }
}

impl From<u32> for CorrectionValue {
    fn from(value: u32) -> Self {
        CorrectionValue::Count(value)
    }
}

impl From<&str> for CorrectionValue {
    fn from(value: &str) -> Self {
        CorrectionValue::Text(value.to_string())
    }
}

impl From<String> for CorrectionValue {
    fn from(value: String) -> Self {
        CorrectionValue::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionAction {
    UpdateClusters,
    AddColor,
    RemoveColor,
    UpdateBalloonCount,
    RenameColor,
    UpdateTotalClusters,
}

impl CorrectionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CorrectionAction::UpdateClusters => "update_clusters",
            CorrectionAction::AddColor => "add_color",
            CorrectionAction::RemoveColor => "remove_color",
            CorrectionAction::UpdateBalloonCount => "update_balloon_count",
            CorrectionAction::RenameColor => "rename_color",
            CorrectionAction::UpdateTotalClusters => "update_total_clusters",
        }
    }
}

/// Variant-specific part of a correction, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CorrectionKind {
    ClusterCount {
        #[serde(rename = "clusterCount")]
        cluster_count: u32,
    },
    ColorName,
    BalloonCount {
        #[serde(rename = "balloonSize")]
        balloon_size: BalloonSize,
    },
    AddColor {
        #[serde(rename = "clusterCount")]
        cluster_count: u32,
    },
    RemoveColor,
    TotalClusters {
        #[serde(rename = "clusterCount")]
        cluster_count: u32,
    },
}

impl CorrectionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            CorrectionKind::ClusterCount { .. } => "cluster_count",
            CorrectionKind::ColorName => "color_name",
            CorrectionKind::BalloonCount { .. } => "balloon_count",
            CorrectionKind::AddColor { .. } => "add_color",
            CorrectionKind::RemoveColor => "remove_color",
            CorrectionKind::TotalClusters { .. } => "total_clusters",
        }
    }

    pub fn default_action(&self) -> CorrectionAction {
        match self {
            CorrectionKind::ClusterCount { .. } => CorrectionAction::UpdateClusters,
            CorrectionKind::ColorName => CorrectionAction::RenameColor,
            CorrectionKind::BalloonCount { .. } => CorrectionAction::UpdateBalloonCount,
            CorrectionKind::AddColor { .. } => CorrectionAction::AddColor,
            CorrectionKind::RemoveColor => CorrectionAction::RemoveColor,
            CorrectionKind::TotalClusters { .. } => CorrectionAction::UpdateTotalClusters,
        }
    }

    pub fn cluster_count(&self) -> Option<u32> {
        match self {
            CorrectionKind::ClusterCount { cluster_count }
            | CorrectionKind::AddColor { cluster_count }
            | CorrectionKind::TotalClusters { cluster_count } => Some(*cluster_count),
            _ => None,
        }
    }
}

/// Structured edit derived from a free-text command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    #[serde(flatten)]
    pub kind: CorrectionKind,
    pub color: String,
    pub original_value: Option<CorrectionValue>,
    pub new_value: CorrectionValue,
    pub action: CorrectionAction,
}

impl Correction {
    pub fn cluster_count(color: impl Into<String>, count: u32) -> Self {
        Self {
            kind: CorrectionKind::ClusterCount {
                cluster_count: count,
            },
            color: color.into(),
            original_value: None,
            new_value: CorrectionValue::Count(count),
            action: CorrectionAction::UpdateClusters,
        }
    }

    pub fn add_color(color: impl Into<String>, count: u32) -> Self {
        Self {
            kind: CorrectionKind::AddColor {
                cluster_count: count,
            },
            color: color.into(),
            original_value: None,
            new_value: CorrectionValue::Count(count),
            action: CorrectionAction::AddColor,
        }
    }

    /// `original` keeps the casing the user typed; `color` is normalised by the caller.
    pub fn remove_color(color: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            kind: CorrectionKind::RemoveColor,
            color: color.into(),
            original_value: Some(CorrectionValue::Text(original.into())),
            new_value: CorrectionValue::Text(String::new()),
            action: CorrectionAction::RemoveColor,
        }
    }

    pub fn balloon_count(color: impl Into<String>, size: BalloonSize, count: u32) -> Self {
        Self {
            kind: CorrectionKind::BalloonCount { balloon_size: size },
            color: color.into(),
            original_value: None,
            new_value: CorrectionValue::Count(count),
            action: CorrectionAction::UpdateBalloonCount,
        }
    }

    pub fn total_clusters(count: u32) -> Self {
        Self {
            kind: CorrectionKind::TotalClusters {
                cluster_count: count,
            },
            color: String::new(),
            original_value: None,
            new_value: CorrectionValue::Count(count),
            action: CorrectionAction::UpdateTotalClusters,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeQuantity {
    pub size: String,
    pub quantity: u64,
}

/// Aggregate view of a design; `sizes` is always derived from `total_clusters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignAnalysisSnapshot {
    pub total_clusters: u32,
    pub colors: Vec<String>,
    pub sizes: Vec<SizeQuantity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    pub design_id: DesignId,
    pub snapshot: DesignAnalysisSnapshot,
    pub clusters: Vec<ColorCluster>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub color: String,
    pub size: BalloonSize,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeAvailability {
    pub size: BalloonSize,
    pub quantity: u32,
}

/// Stock for the stored color a lookup resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAvailability {
    pub color: String,
    pub quantities: Vec<SizeAvailability>,
}

impl InventoryAvailability {
    pub fn quantity_for(&self, size: BalloonSize) -> u32 {
        self.quantities
            .iter()
            .filter(|entry| entry.size == size)
            .map(|entry| entry.quantity)
            .sum()
    }
}
