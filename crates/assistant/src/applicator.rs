use serde::{Deserialize, Serialize};
use shared::domain::{
    ColorCluster, Correction, CorrectionKind, CorrectionValue, DesignAnalysisSnapshot,
};
use tracing::debug;

use crate::{
    color_match::ColorMatcher,
    error::AssistantError,
    projection::{cluster_for, distribute_clusters, snapshot_with_total, total_clusters},
};

/// Next allocation list and its recomputed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCorrection {
    pub clusters: Vec<ColorCluster>,
    pub total_clusters: u32,
}

impl AppliedCorrection {
    fn from_clusters(clusters: Vec<ColorCluster>) -> Result<Self, AssistantError> {
        let total_clusters = total_clusters(&clusters)?;
        Ok(Self {
            clusters,
            total_clusters,
        })
    }

    pub fn snapshot(&self) -> DesignAnalysisSnapshot {
        snapshot_with_total(&self.clusters, self.total_clusters)
    }
}

/// Applies `correction` to `clusters` without touching the input.
pub fn apply_correction(
    correction: &Correction,
    clusters: &[ColorCluster],
    matcher: &ColorMatcher,
) -> Result<AppliedCorrection, AssistantError> {
    let next = match &correction.kind {
        CorrectionKind::ClusterCount { cluster_count } => {
            let index = matcher
                .position(clusters, |cluster| cluster.color.as_str(), &correction.color)
                .ok_or_else(|| unknown_color(&correction.color, clusters))?;
            let mut next = clusters.to_vec();
            let color = next[index].color.clone();
            next[index] = cluster_for(color, *cluster_count);
            next
        }
        CorrectionKind::AddColor { cluster_count } => {
            let mut next = clusters.to_vec();
            next.push(cluster_for(correction.color.clone(), *cluster_count));
            next
        }
        CorrectionKind::RemoveColor => {
            let target = removal_target(correction);
            clusters
                .iter()
                .filter(|cluster| cluster.color != target)
                .cloned()
                .collect()
        }
        CorrectionKind::TotalClusters { cluster_count } => {
            let colors: Vec<&str> = clusters.iter().map(|c| c.color.as_str()).collect();
            distribute_clusters(*cluster_count, &colors)
        }
        CorrectionKind::BalloonCount { .. } | CorrectionKind::ColorName => {
            return Err(AssistantError::UnsupportedCorrection {
                kind: correction.type_name(),
            })
        }
    };

    let applied = AppliedCorrection::from_clusters(next)?;
    debug!(
        kind = correction.type_name(),
        color = %correction.color,
        before = clusters.len(),
        after = applied.clusters.len(),
        total = applied.total_clusters,
        "applied correction"
    );
    Ok(applied)
}

/// Removal compares the typed name exactly, case included.
fn removal_target(correction: &Correction) -> &str {
    match &correction.original_value {
        Some(CorrectionValue::Text(original)) => original,
        _ => &correction.color,
    }
}

fn unknown_color(color: &str, clusters: &[ColorCluster]) -> AssistantError {
    AssistantError::UnknownColor {
        color: color.to_string(),
        available: clusters.iter().map(|c| c.color.clone()).collect(),
    }
}

#[cfg(test)]
#[path = "tests/applicator_tests.rs"]
mod tests;
