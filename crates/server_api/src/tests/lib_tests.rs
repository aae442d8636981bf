use shared::domain::BalloonSize;

use super::*;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext::new(storage, ColorMatcher::default())
}

fn colors(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[tokio::test]
async fn unrecognized_command_carries_hint() {
    let ctx = setup().await;
    let err = parse_command(&ctx, "this is not a valid command").expect_err("no match");
    assert_eq!(err.code, ErrorCode::UnrecognizedCommand);
    assert!(err.message.contains("change pink clusters to 5"));
}

#[tokio::test]
async fn apply_returns_clusters_and_snapshot() {
    let ctx = setup().await;
    let correction = parse_command(&ctx, "set gold clusters to 10").expect("parsed");
    let response = apply_correction(
        &ctx,
        &correction,
        &[ColorCluster::new("Gold", 1, 0), ColorCluster::new("White", 2, 0)],
    )
    .expect("applied");
    assert_eq!(response.total_clusters, 12);
    assert_eq!(response.snapshot.total_clusters, 12);
    assert_eq!(response.snapshot.sizes[1].quantity, 24);
}

#[tokio::test]
async fn apply_maps_unknown_color_code() {
    let ctx = setup().await;
    let err = apply_correction(
        &ctx,
        &Correction::cluster_count("teal", 1),
        &[ColorCluster::new("Gold", 1, 0)],
    )
    .expect_err("unknown");
    assert_eq!(err.code, ErrorCode::UnknownColor);
    assert!(err.message.contains("Gold"));
}

#[tokio::test]
async fn create_commit_and_reload_design() {
    let ctx = setup().await;
    let created = create_design(&ctx, 9, &colors(&["Pink", " ", "Gold"]))
        .await
        .expect("created");
    assert_eq!(created.snapshot.colors, vec!["Pink", "Gold"]);
    assert_eq!(created.clusters[0].total(), 5);

    let committed = commit_design(
        &ctx,
        created.design_id,
        vec![ColorCluster::new("Pink", 7, 3)],
    )
    .await
    .expect("committed");
    assert_eq!(committed.snapshot.total_clusters, 10);

    let loaded = get_design(&ctx, created.design_id).await.expect("loaded");
    assert_eq!(loaded.clusters, committed.clusters);
    assert_eq!(loaded.snapshot.colors, vec!["Pink"]);
}

#[tokio::test]
async fn design_errors_use_specific_codes() {
    let ctx = setup().await;
    let err = create_design(&ctx, 3, &colors(&[" "]))
        .await
        .expect_err("no colors");
    assert_eq!(err.code, ErrorCode::Validation);

    let err = get_design(&ctx, DesignId(77)).await.expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = commit_design(&ctx, DesignId(77), Vec::new())
        .await
        .expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn inventory_round_trip_through_matcher() {
    let ctx = setup().await;
    upsert_inventory(
        &ctx,
        &UpsertInventoryRequest {
            color: "Wild Berry".into(),
            size: BalloonSize::Eleven,
            quantity: 150,
        },
    )
    .await
    .expect("upsert");

    let found = check_inventory(&ctx, "wild-berry").await.expect("found");
    assert_eq!(found.color, "Wild Berry");
    assert_eq!(found.quantity_for(BalloonSize::Eleven), 150);

    let err = check_inventory(&ctx, "teal").await.expect_err("none");
    assert_eq!(err.code, ErrorCode::NotFound);
    let err = check_inventory(&ctx, "  ").await.expect_err("blank");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn commit_rejects_allocation_whose_total_overflows() {
    let ctx = setup().await;
    let created = create_design(&ctx, 4, &colors(&["Pink"]))
        .await
        .expect("created");

    let err = commit_design(
        &ctx,
        created.design_id,
        vec![
            ColorCluster::new("Pink", u32::MAX, 0),
            ColorCluster::new("Gold", 1, 0),
        ],
    )
    .await
    .expect_err("overflow");
    assert_eq!(err.code, ErrorCode::InvalidShape);

    let loaded = get_design(&ctx, created.design_id).await.expect("loaded");
    assert_eq!(loaded.snapshot.total_clusters, 4);
    assert_eq!(loaded.clusters, created.clusters);
}

#[tokio::test]
async fn apply_rejects_overflowing_parsed_count() {
    let ctx = setup().await;
    let correction =
        parse_command(&ctx, "add purple with 4000000000 clusters").expect("parsed");
    let err = apply_correction(
        &ctx,
        &correction,
        &[ColorCluster::new("Pink", 3_000_000_000, 0)],
    )
    .expect_err("overflow");
    assert_eq!(err.code, ErrorCode::InvalidShape);
}
