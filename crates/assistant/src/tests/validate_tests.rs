use serde_json::json;

use super::*;

#[test]
fn accepts_well_formed_cluster_count() {
    let correction = validate_remote_reply(&json!({
        "type": "cluster_count",
        "color": "pink",
        "clusterCount": 5,
        "newValue": 5,
        "originalValue": null,
        "action": "update_clusters",
    }))
    .expect("valid");
    assert_eq!(correction, Correction::cluster_count("pink", 5));
}

#[test]
fn fills_action_and_new_value_from_type() {
    let correction = validate_remote_reply(&json!({
        "type": "add_color",
        "color": "Teal",
        "clusterCount": 2,
    }))
    .expect("valid");
    assert_eq!(correction, Correction::add_color("Teal", 2));
}

#[test]
fn error_replies_become_remote_rejections() {
    let err = validate_remote_reply(&json!({"type": "error", "message": "which color?"}))
        .expect_err("rejected");
    assert!(matches!(err, AssistantError::RemoteRejected { ref message } if message == "which color?"));
    assert!(err.is_reprompt());
}

#[test]
fn missing_required_fields_are_invalid_shape() {
    let cases = [
        json!("cluster_count"),
        json!({"color": "pink", "clusterCount": 1}),
        json!({"type": "cluster_count", "color": "pink"}),
        json!({"type": "cluster_count", "clusterCount": 4}),
        json!({"type": "cluster_count", "color": "pink", "clusterCount": -1}),
        json!({"type": "cluster_count", "color": "pink", "clusterCount": 2.5}),
        json!({"type": "balloon_count", "color": "pink", "newValue": 3}),
        json!({"type": "balloon_count", "color": "pink", "balloonSize": "12", "newValue": 3}),
        json!({"type": "balloon_count", "color": "pink", "balloonSize": "11"}),
        json!({"type": "color_name", "color": "pink"}),
        json!({"type": "recolor", "color": "pink"}),
    ];
    for case in cases {
        let err = validate_remote_reply(&case).expect_err("should be rejected");
        assert!(
            matches!(err, AssistantError::InvalidShape { .. }),
            "{case} gave {err}"
        );
    }
}

#[test]
fn type_must_agree_with_populated_fields() {
    let err = validate_remote_reply(&json!({
        "type": "remove_color",
        "color": "pink",
        "clusterCount": 3,
    }))
    .expect_err("foreign field");
    assert!(matches!(err, AssistantError::InvalidShape { .. }));

    let err = validate_remote_reply(&json!({
        "type": "cluster_count",
        "color": "pink",
        "clusterCount": 3,
        "newValue": 4,
    }))
    .expect_err("disagreeing value");
    assert!(matches!(err, AssistantError::InvalidShape { .. }));

    let err = validate_remote_reply(&json!({
        "type": "cluster_count",
        "color": "pink",
        "clusterCount": 3,
        "action": "add_color",
    }))
    .expect_err("disagreeing action");
    assert!(matches!(err, AssistantError::InvalidShape { .. }));
}

#[test]
fn balloon_size_accepts_numbers_and_strings() {
    let correction = validate_remote_reply(&json!({
        "type": "balloon_count",
        "color": "gold",
        "balloonSize": 16,
        "newValue": 10,
    }))
    .expect("valid");
    assert_eq!(
        correction,
        Correction::balloon_count("gold", BalloonSize::Sixteen, 10)
    );
}

#[test]
fn removal_defaults_original_value_to_color() {
    let correction = validate_remote_reply(&json!({"type": "remove_color", "color": "Green"}))
        .expect("valid");
    assert_eq!(correction, Correction::remove_color("Green", "Green"));
}

#[test]
fn total_clusters_needs_no_color() {
    let correction = validate_remote_reply(&json!({"type": "total_clusters", "clusterCount": 12}))
        .expect("valid");
    assert_eq!(correction, Correction::total_clusters(12));
}

#[test]
fn rename_carries_new_name() {
    let correction = validate_remote_reply(&json!({
        "type": "color_name",
        "color": "pink",
        "newValue": " Blush ",
    }))
    .expect("valid");
    assert_eq!(correction.kind, CorrectionKind::ColorName);
    assert_eq!(correction.new_value, CorrectionValue::Text("Blush".into()));
    assert_eq!(correction.action, CorrectionAction::RenameColor);
}
