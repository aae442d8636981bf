use anyhow::{anyhow, Context, Result};
use assistant::{ColorMatcher, DesignStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info};

use shared::domain::{
    BalloonSize, ColorCluster, DesignAnalysisSnapshot, DesignId, DesignRecord,
    InventoryAvailability, InventoryItem, SizeAvailability, SizeQuantity,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own empty database.
        let max_connections = if is_memory_url(database_url) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_design(
        &self,
        snapshot: &DesignAnalysisSnapshot,
        clusters: &[ColorCluster],
    ) -> Result<DesignRecord> {
        let updated_at = Utc::now();
        let rec = sqlx::query(
            "INSERT INTO designs (total_clusters, colors_json, sizes_json, clusters_json, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(i64::from(snapshot.total_clusters))
        .bind(serde_json::to_string(&snapshot.colors)?)
        .bind(serde_json::to_string(&snapshot.sizes)?)
        .bind(serde_json::to_string(clusters)?)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await?;
        let design_id = DesignId(rec.get::<i64, _>(0));
        info!(design_id = design_id.0, total_clusters = snapshot.total_clusters, "design created");
        Ok(DesignRecord {
            design_id,
            snapshot: snapshot.clone(),
            clusters: clusters.to_vec(),
            updated_at,
        })
    }

    pub async fn update_design(&self, record: &DesignRecord) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE designs
             SET total_clusters = ?, colors_json = ?, sizes_json = ?, clusters_json = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(i64::from(record.snapshot.total_clusters))
        .bind(serde_json::to_string(&record.snapshot.colors)?)
        .bind(serde_json::to_string(&record.snapshot.sizes)?)
        .bind(serde_json::to_string(&record.clusters)?)
        .bind(record.updated_at)
        .bind(record.design_id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(anyhow!("design {} not found", record.design_id.0));
        }
        debug!(design_id = record.design_id.0, "design updated");
        Ok(())
    }

    pub async fn load_design(&self, design_id: DesignId) -> Result<Option<DesignRecord>> {
        let row = sqlx::query(
            "SELECT id, total_clusters, colors_json, sizes_json, clusters_json, updated_at
             FROM designs WHERE id = ?",
        )
        .bind(design_id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| design_from_row(&row)).transpose()
    }

    pub async fn upsert_inventory(&self, color: &str, size: BalloonSize, quantity: u32) -> Result<()> {
        sqlx::query(
            "INSERT INTO inventory (color, size, quantity) VALUES (?, ?, ?)
             ON CONFLICT(color, size) DO UPDATE SET quantity=excluded.quantity",
        )
        .bind(color.trim())
        .bind(size.as_str())
        .bind(i64::from(quantity))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        let rows = sqlx::query("SELECT color, size, quantity FROM inventory ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(inventory_from_row).collect()
    }

    /// Stock of the first stored color (insertion order) that `matcher`
    /// accepts for `color`.
    pub async fn lookup_inventory(
        &self,
        color: &str,
        matcher: &ColorMatcher,
    ) -> Result<Option<InventoryAvailability>> {
        let rows = sqlx::query(
            "SELECT color, MIN(id) AS first_id FROM inventory GROUP BY color ORDER BY first_id",
        )
        .fetch_all(&self.pool)
        .await?;
        let stored: Vec<String> = rows.iter().map(|r| r.get::<String, _>(0)).collect();
        let Some(resolved) = matcher.find_first(&stored, |name| name.as_str(), color) else {
            debug!(%color, "no inventory color matched");
            return Ok(None);
        };

        let rows = sqlx::query("SELECT color, size, quantity FROM inventory WHERE color = ? ORDER BY size")
            .bind(resolved.as_str())
            .fetch_all(&self.pool)
            .await?;
        let quantities = rows
            .iter()
            .map(inventory_from_row)
            .map(|item| {
                item.map(|item| SizeAvailability {
                    size: item.size,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(InventoryAvailability {
            color: resolved.clone(),
            quantities,
        }))
    }
}

#[async_trait]
impl DesignStore for Storage {
    async fn save_design(&self, record: &DesignRecord) -> Result<()> {
        self.update_design(record).await
    }
}

fn design_from_row(row: &SqliteRow) -> Result<DesignRecord> {
    let total_clusters = u32::try_from(row.get::<i64, _>(1)).context("total_clusters out of range")?;
    let colors: Vec<String> = serde_json::from_str(&row.get::<String, _>(2))?;
    let sizes: Vec<SizeQuantity> = serde_json::from_str(&row.get::<String, _>(3))?;
    let clusters: Vec<ColorCluster> = serde_json::from_str(&row.get::<String, _>(4))?;
    Ok(DesignRecord {
        design_id: DesignId(row.get::<i64, _>(0)),
        snapshot: DesignAnalysisSnapshot {
            total_clusters,
            colors,
            sizes,
        },
        clusters,
        updated_at: row.get::<DateTime<Utc>, _>(5),
    })
}

fn inventory_from_row(row: &SqliteRow) -> Result<InventoryItem> {
    let size = row.get::<String, _>(1);
    Ok(InventoryItem {
        color: row.get::<String, _>(0),
        size: size.parse().with_context(|| format!("bad inventory size '{size}'"))?,
        quantity: u32::try_from(row.get::<i64, _>(2)).context("inventory quantity out of range")?,
    })
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
