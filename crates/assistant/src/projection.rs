use shared::domain::{BalloonSize, ColorCluster, DesignAnalysisSnapshot, SizeQuantity};

use crate::error::AssistantError;

const BASE_SHARE: f64 = 0.7;
const EXTRA_SHARE: f64 = 0.3;

/// Splits `count` clusters 70/30 into `(base, extra)`.
///
/// Returns `(ceil(0.7 * n), floor(0.3 * n))` computed on doubles.
pub fn split_clusters(count: u32) -> (u32, u32) {
    let count = f64::from(count);
    let base = (BASE_SHARE * count).ceil() as u32;
    let extra = (EXTRA_SHARE * count).floor() as u32;
    (base, extra)
}

pub fn cluster_for(color: impl Into<String>, count: u32) -> ColorCluster {
    let (base, extra) = split_clusters(count);
    ColorCluster::new(color, base, extra)
}

/// Sum of every entry; fails when it does not fit the `u32` design total.
pub fn total_clusters(clusters: &[ColorCluster]) -> Result<u32, AssistantError> {
    clusters
        .iter()
        .try_fold(0u32, |sum, cluster| {
            u32::try_from(cluster.total())
                .ok()
                .and_then(|total| sum.checked_add(total))
        })
        .ok_or_else(|| AssistantError::invalid_shape("cluster total overflows"))
}

pub fn size_quantities(total_clusters: u32) -> Vec<SizeQuantity> {
    quantities_for(u64::from(total_clusters))
}

/// Balloons needed for one color's clusters, per size.
pub fn balloons_for(cluster: &ColorCluster) -> Vec<SizeQuantity> {
    quantities_for(cluster.total())
}

fn quantities_for(clusters: u64) -> Vec<SizeQuantity> {
    BalloonSize::ALL
        .iter()
        .map(|size| SizeQuantity {
            size: size.label().to_string(),
            quantity: clusters * size.balloons_per_cluster(),
        })
        .collect()
}

/// Even split of `total` over `colors` slots; the first `total % colors`
/// slots get one extra cluster.
pub fn distribute_counts(total: u32, colors: usize) -> Vec<u32> {
    if colors == 0 {
        return Vec::new();
    }
    let slots = u32::try_from(colors).unwrap_or(u32::MAX);
    let per_color = total / slots;
    let remainder = (total % slots) as usize;
    (0..colors)
        .map(|index| per_color + u32::from(index < remainder))
        .collect()
}

/// Initial allocation of a design: even split per color, then 70/30 per color.
pub fn distribute_clusters<S: AsRef<str>>(total: u32, colors: &[S]) -> Vec<ColorCluster> {
    colors
        .iter()
        .zip(distribute_counts(total, colors.len()))
        .map(|(color, count)| cluster_for(color.as_ref(), count))
        .collect()
}

pub fn project<S: AsRef<str>>(total_clusters: u32, colors: &[S]) -> DesignAnalysisSnapshot {
    DesignAnalysisSnapshot {
        total_clusters,
        colors: colors.iter().map(|color| color.as_ref().to_string()).collect(),
        sizes: size_quantities(total_clusters),
    }
}

/// Snapshot for an allocation list: total is the sum over all entries and the
/// colors keep list order.
pub fn snapshot_of(clusters: &[ColorCluster]) -> Result<DesignAnalysisSnapshot, AssistantError> {
    Ok(snapshot_with_total(clusters, total_clusters(clusters)?))
}

pub(crate) fn snapshot_with_total(
    clusters: &[ColorCluster],
    total_clusters: u32,
) -> DesignAnalysisSnapshot {
    let colors: Vec<&str> = clusters.iter().map(|cluster| cluster.color.as_str()).collect();
    project(total_clusters, &colors)
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
