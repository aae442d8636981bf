use serde_json::{Map, Value};
use shared::domain::{BalloonSize, Correction, CorrectionAction, CorrectionKind, CorrectionValue};

use crate::error::AssistantError;

type Object = Map<String, Value>;

/// Re-validates a correction produced by an untrusted interpreter.
///
/// Accepts either `{ "type": "error", "message": ... }`, which becomes
/// [`AssistantError::RemoteRejected`], or a correction object whose fields
/// agree with its `type`. Anything else is [`AssistantError::InvalidShape`].
pub fn validate_remote_reply(value: &Value) -> Result<Correction, AssistantError> {
    let object = value
        .as_object()
        .ok_or_else(|| AssistantError::invalid_shape("reply is not a JSON object"))?;
    let type_name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| AssistantError::invalid_shape("missing 'type'"))?;

    if type_name == "error" {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("interpreter returned an error without a message");
        return Err(AssistantError::RemoteRejected {
            message: message.to_string(),
        });
    }

    let kind = match type_name {
        "cluster_count" => CorrectionKind::ClusterCount {
            cluster_count: required_count(object, "clusterCount")?,
        },
        "add_color" => CorrectionKind::AddColor {
            cluster_count: required_count(object, "clusterCount")?,
        },
        "total_clusters" => CorrectionKind::TotalClusters {
            cluster_count: required_count(object, "clusterCount")?,
        },
        "balloon_count" => CorrectionKind::BalloonCount {
            balloon_size: balloon_size(object)?,
        },
        "color_name" => CorrectionKind::ColorName,
        "remove_color" => CorrectionKind::RemoveColor,
        other => {
            return Err(AssistantError::invalid_shape(format!(
                "unknown correction type '{other}'"
            )))
        }
    };

    reject_foreign_fields(object, &kind)?;

    let color = match object.get("color") {
        Some(Value::String(color)) => color.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(_) => return Err(AssistantError::invalid_shape("'color' must be a string")),
    };
    if color.is_empty() && !matches!(kind, CorrectionKind::TotalClusters { .. }) {
        return Err(AssistantError::invalid_shape(format!(
            "'{type_name}' requires a target color"
        )));
    }

    let action = match object.get("action") {
        Some(Value::Null) | None => kind.default_action(),
        Some(raw) => {
            let action: CorrectionAction = serde_json::from_value(raw.clone()).map_err(|_| {
                AssistantError::invalid_shape(format!("unknown action {raw}"))
            })?;
            if action != kind.default_action() {
                return Err(AssistantError::invalid_shape(format!(
                    "action '{}' does not fit type '{type_name}'",
                    action.as_str()
                )));
            }
            action
        }
    };

    let new_value = new_value(object, &kind, type_name)?;
    let original_value = original_value(object, &kind, &color)?;

    Ok(Correction {
        kind,
        color,
        original_value,
        new_value,
        action,
    })
}

fn required_count(object: &Object, field: &str) -> Result<u32, AssistantError> {
    let raw = object
        .get(field)
        .filter(|value| !value.is_null())
        .ok_or_else(|| AssistantError::invalid_shape(format!("missing '{field}'")))?;
    as_count(raw).ok_or_else(|| {
        AssistantError::invalid_shape(format!("'{field}' must be a non-negative integer"))
    })
}

fn as_count(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn balloon_size(object: &Object) -> Result<BalloonSize, AssistantError> {
    let parsed: Option<BalloonSize> = match object.get("balloonSize") {
        Some(Value::String(raw)) => raw.parse().ok(),
        Some(Value::Number(raw)) => raw.to_string().parse().ok(),
        _ => return Err(AssistantError::invalid_shape("missing 'balloonSize'")),
    };
    parsed.ok_or_else(|| AssistantError::invalid_shape("'balloonSize' must be 11 or 16"))
}

fn reject_foreign_fields(object: &Object, kind: &CorrectionKind) -> Result<(), AssistantError> {
    let present = |field: &str| object.get(field).is_some_and(|value| !value.is_null());
    if kind.cluster_count().is_none() && present("clusterCount") {
        return Err(AssistantError::invalid_shape(format!(
            "'clusterCount' is not valid for '{}'",
            kind.type_name()
        )));
    }
    if !matches!(kind, CorrectionKind::BalloonCount { .. }) && present("balloonSize") {
        return Err(AssistantError::invalid_shape(format!(
            "'balloonSize' is not valid for '{}'",
            kind.type_name()
        )));
    }
    Ok(())
}

fn new_value(
    object: &Object,
    kind: &CorrectionKind,
    type_name: &str,
) -> Result<CorrectionValue, AssistantError> {
    let raw = object.get("newValue").filter(|value| !value.is_null());
    match kind {
        CorrectionKind::ClusterCount { cluster_count }
        | CorrectionKind::AddColor { cluster_count }
        | CorrectionKind::TotalClusters { cluster_count } => match raw {
            None => Ok(CorrectionValue::Count(*cluster_count)),
            Some(raw) if as_count(raw) == Some(*cluster_count) => {
                Ok(CorrectionValue::Count(*cluster_count))
            }
            Some(_) => Err(AssistantError::invalid_shape(
                "'newValue' must equal 'clusterCount'",
            )),
        },
        CorrectionKind::BalloonCount { .. } => raw
            .and_then(as_count)
            .map(CorrectionValue::Count)
            .ok_or_else(|| {
                AssistantError::invalid_shape(format!(
                    "'{type_name}' requires a numeric 'newValue'"
                ))
            }),
        CorrectionKind::ColorName => raw
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(CorrectionValue::from)
            .ok_or_else(|| AssistantError::invalid_shape("'color_name' requires a new name")),
        CorrectionKind::RemoveColor => Ok(CorrectionValue::Text(String::new())),
    }
}

fn original_value(
    object: &Object,
    kind: &CorrectionKind,
    color: &str,
) -> Result<Option<CorrectionValue>, AssistantError> {
    let raw = object.get("originalValue").filter(|value| !value.is_null());
    match (kind, raw) {
        (CorrectionKind::RemoveColor, None) => Ok(Some(CorrectionValue::from(color))),
        (CorrectionKind::RemoveColor, Some(Value::String(original))) => {
            Ok(Some(CorrectionValue::from(original.trim())))
        }
        (CorrectionKind::RemoveColor, Some(_)) => Err(AssistantError::invalid_shape(
            "'originalValue' of a removal must be the color name",
        )),
        (_, None) => Ok(None),
        (_, Some(Value::String(text))) => Ok(Some(CorrectionValue::from(text.as_str()))),
        (_, Some(raw)) => as_count(raw)
            .map(|count| Some(CorrectionValue::Count(count)))
            .ok_or_else(|| {
                AssistantError::invalid_shape("'originalValue' must be a count or a name")
            }),
    }
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
