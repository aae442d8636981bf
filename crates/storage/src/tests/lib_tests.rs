use assistant::{distribute_clusters, project, SynonymTable};

use super::*;

async fn memory_storage() -> Storage {
    Storage::new("sqlite::memory:").await.expect("db")
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = memory_storage().await;
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("balloon_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("designs.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn creates_and_loads_design() {
    let storage = memory_storage().await;
    let colors = ["Pink", "Gold"];
    let created = storage
        .create_design(&project(10, &colors), &distribute_clusters(10, &colors))
        .await
        .expect("create");

    let loaded = storage
        .load_design(created.design_id)
        .await
        .expect("load")
        .expect("design exists");
    assert_eq!(loaded.snapshot, created.snapshot);
    assert_eq!(loaded.clusters, created.clusters);
    assert_eq!(loaded.snapshot.sizes[0].quantity, 110);

    assert!(storage
        .load_design(DesignId(created.design_id.0 + 100))
        .await
        .expect("load")
        .is_none());
}

#[tokio::test]
async fn save_design_overwrites_existing_record() {
    let storage = memory_storage().await;
    let colors = ["Pink"];
    let mut record = storage
        .create_design(&project(4, &colors), &distribute_clusters(4, &colors))
        .await
        .expect("create");

    record.clusters = vec![ColorCluster::new("Pink", 7, 3)];
    record.snapshot = project(10, &colors);
    storage.save_design(&record).await.expect("save");

    let loaded = storage
        .load_design(record.design_id)
        .await
        .expect("load")
        .expect("design exists");
    assert_eq!(loaded.snapshot.total_clusters, 10);
    assert_eq!(loaded.clusters, record.clusters);
}

#[tokio::test]
async fn saving_unknown_design_fails() {
    let storage = memory_storage().await;
    let record = DesignRecord {
        design_id: DesignId(404),
        snapshot: project(1, &["Pink"]),
        clusters: Vec::new(),
        updated_at: Utc::now(),
    };
    let err = storage.save_design(&record).await.expect_err("missing");
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn inventory_upsert_replaces_quantity() {
    let storage = memory_storage().await;
    storage
        .upsert_inventory("Pink", BalloonSize::Eleven, 40)
        .await
        .expect("insert");
    storage
        .upsert_inventory("Pink", BalloonSize::Eleven, 25)
        .await
        .expect("update");
    storage
        .upsert_inventory("Pink", BalloonSize::Sixteen, 6)
        .await
        .expect("insert");

    let items = storage.list_inventory().await.expect("list");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, 25);
    assert_eq!(items[1].size, BalloonSize::Sixteen);
}

#[tokio::test]
async fn lookup_returns_first_stored_match() {
    let storage = memory_storage().await;
    storage
        .upsert_inventory("Blood Orange", BalloonSize::Eleven, 12)
        .await
        .expect("insert");
    storage
        .upsert_inventory("Orange", BalloonSize::Eleven, 80)
        .await
        .expect("insert");
    storage
        .upsert_inventory("Orange", BalloonSize::Sixteen, 9)
        .await
        .expect("insert");
    storage
        .upsert_inventory("Wild Berry", BalloonSize::Sixteen, 3)
        .await
        .expect("insert");

    let matcher = ColorMatcher::default();
    let orange = storage
        .lookup_inventory("orange", &matcher)
        .await
        .expect("lookup")
        .expect("match");
    assert_eq!(orange.color, "Blood Orange");
    assert_eq!(orange.quantity_for(BalloonSize::Eleven), 12);
    assert_eq!(orange.quantity_for(BalloonSize::Sixteen), 0);

    let berry = storage
        .lookup_inventory("wildberry", &matcher)
        .await
        .expect("lookup")
        .expect("match");
    assert_eq!(berry.color, "Wild Berry");
    assert_eq!(berry.quantities.len(), 1);

    let strict = ColorMatcher::new(SynonymTable::new());
    assert!(storage
        .lookup_inventory("teal", &strict)
        .await
        .expect("lookup")
        .is_none());
}
