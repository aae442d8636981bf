use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::{ColorCluster, Correction, DesignId, DesignRecord};
use tracing::{info, warn};

use crate::{
    applicator::{apply_correction, AppliedCorrection},
    color_match::ColorMatcher,
    error::AssistantError,
    interpreter::{CommandInterpreter, LocalInterpreter},
};

/// Persistence collaborator for committed designs.
#[async_trait]
pub trait DesignStore: Send + Sync {
    async fn save_design(&self, record: &DesignRecord) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryOutcome {
    Proposed,
    Applied { total_clusters: u32 },
    Cancelled,
    Rejected { reason: String },
    Unrecognized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command: String,
    pub correction: Option<Correction>,
    pub outcome: HistoryOutcome,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PendingCorrection {
    pub command: String,
    pub correction: Correction,
}

/// Design-assistant state for one design.
///
/// Visible clusters only change after the store accepted the new record. A
/// confirmed correction that fails to persist stays pending so it can be
/// retried.
pub struct DesignSession {
    design_id: DesignId,
    clusters: Vec<ColorCluster>,
    pending: Option<PendingCorrection>,
    history: Vec<HistoryEntry>,
    matcher: ColorMatcher,
    interpreter: Arc<dyn CommandInterpreter>,
    store: Arc<dyn DesignStore>,
}

impl DesignSession {
    pub fn new(
        design_id: DesignId,
        clusters: Vec<ColorCluster>,
        store: Arc<dyn DesignStore>,
    ) -> Self {
        Self {
            design_id,
            clusters,
            pending: None,
            history: Vec::new(),
            matcher: ColorMatcher::default(),
            interpreter: Arc::new(LocalInterpreter::default()),
            store,
        }
    }

    pub fn with_matcher(mut self, matcher: ColorMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Arc<dyn CommandInterpreter>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn design_id(&self) -> DesignId {
        self.design_id
    }

    pub fn clusters(&self) -> &[ColorCluster] {
        &self.clusters
    }

    pub fn pending(&self) -> Option<&PendingCorrection> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Interprets `command` and holds the result for confirmation. A pending
    /// correction it replaces is recorded as cancelled; a failed
    /// interpretation leaves it pending.
    pub async fn propose(&mut self, command: &str) -> Result<&Correction, AssistantError> {
        let interpreted = self.interpreter.interpret(command, &self.clusters).await;
        let correction = match interpreted {
            Ok(correction) => correction,
            Err(err) => {
                let outcome = match err {
                    AssistantError::ParseFailure { .. } => HistoryOutcome::Unrecognized,
                    ref other => HistoryOutcome::Rejected {
                        reason: other.to_string(),
                    },
                };
                self.record(command, None, outcome);
                return Err(err);
            }
        };

        // A newer proposal supersedes the pending one.
        self.cancel();
        self.record(command, Some(correction.clone()), HistoryOutcome::Proposed);
        let pending = self.pending.insert(PendingCorrection {
            command: command.to_string(),
            correction,
        });
        Ok(&pending.correction)
    }

    /// Pending correction applied to the visible state, nothing committed.
    pub fn preview(&self) -> Result<AppliedCorrection, AssistantError> {
        let pending = self
            .pending
            .as_ref()
            .ok_or(AssistantError::NoPendingCorrection)?;
        apply_correction(&pending.correction, &self.clusters, &self.matcher)
    }

    pub fn cancel(&mut self) -> Option<Correction> {
        let pending = self.pending.take()?;
        self.record(
            &pending.command,
            Some(pending.correction.clone()),
            HistoryOutcome::Cancelled,
        );
        Some(pending.correction)
    }

    /// Applies the pending correction, persists it, then commits it locally.
    pub async fn confirm(&mut self) -> Result<AppliedCorrection, AssistantError> {
        let pending = self
            .pending
            .clone()
            .ok_or(AssistantError::NoPendingCorrection)?;

        let applied = match apply_correction(&pending.correction, &self.clusters, &self.matcher) {
            Ok(applied) => applied,
            Err(err) => {
                self.pending = None;
                self.record(
                    &pending.command,
                    Some(pending.correction),
                    HistoryOutcome::Rejected {
                        reason: err.to_string(),
                    },
                );
                return Err(err);
            }
        };

        let record = DesignRecord {
            design_id: self.design_id,
            snapshot: applied.snapshot(),
            clusters: applied.clusters.clone(),
            updated_at: Utc::now(),
        };
        if let Err(source) = self.store.save_design(&record).await {
            warn!(
                design_id = self.design_id.0,
                error = %source,
                "design save failed; keeping previous state"
            );
            self.record(
                &pending.command,
                Some(pending.correction),
                HistoryOutcome::Rejected {
                    reason: format!("save failed: {source}"),
                },
            );
            return Err(AssistantError::PersistenceFailure { source });
        }

        info!(
            design_id = self.design_id.0,
            kind = pending.correction.type_name(),
            total_clusters = applied.total_clusters,
            "design correction committed"
        );
        self.clusters = applied.clusters.clone();
        self.pending = None;
        self.record(
            &pending.command,
            Some(pending.correction),
            HistoryOutcome::Applied {
                total_clusters: applied.total_clusters,
            },
        );
        Ok(applied)
    }

    fn record(&mut self, command: &str, correction: Option<Correction>, outcome: HistoryOutcome) {
        self.history.push(HistoryEntry {
            command: command.to_string(),
            correction,
            outcome,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
