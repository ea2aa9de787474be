//! Guarded status transitions
//!
//! ```text
//! Evrak Tedarik Aşamasında --mark ready--> Başvuruya Hazır --mark applied--> Başvuru Yapıldı
//! ```
//!
//! Only these two transitions have dedicated operations. Any other status
//! change goes through the replace-update and is not checked. Neither
//! operation looks at document completeness.

use serde::Serialize;

use crate::case_file::{CaseFile, CaseStatus};
use crate::error::CaseFileError;
use crate::statistics::Statistics;

/// A guarded workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    MarkReady,
    MarkApplied,
}

impl WorkflowAction {
    /// Status a file must be in for the action to apply
    ///
    /// This is also the status of the partition view the action is run from.
    pub fn source(&self) -> CaseStatus {
        match self {
            WorkflowAction::MarkReady => CaseStatus::DocumentGatheringInProgress,
            WorkflowAction::MarkApplied => CaseStatus::ReadyForApplication,
        }
    }

    /// Status the file ends up in
    pub fn target(&self) -> CaseStatus {
        match self {
            WorkflowAction::MarkReady => CaseStatus::ReadyForApplication,
            WorkflowAction::MarkApplied => CaseStatus::ApplicationSubmitted,
        }
    }

    /// Applies the action to a file
    pub fn apply(&self, file: &mut CaseFile) -> Result<(), CaseFileError> {
        if file.status != self.source() {
            return Err(CaseFileError::InvalidStatusTransition {
                from: file.status.label().to_string(),
                to: self.target().label().to_string(),
            });
        }
        file.status = self.target();
        Ok(())
    }
}

/// Moves a file from document gathering to ready-for-application
pub fn mark_ready(file: &mut CaseFile) -> Result<(), CaseFileError> {
    WorkflowAction::MarkReady.apply(file)
}

/// Moves a ready file to application-submitted
pub fn mark_applied(file: &mut CaseFile) -> Result<(), CaseFileError> {
    WorkflowAction::MarkApplied.apply(file)
}

/// Result of a guarded transition
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    /// The updated file as persisted
    pub file: CaseFile,
    /// Statistics after the transition
    pub statistics: Statistics,
    /// True when no file is left in the source partition, so the view the
    /// action was run from can be closed
    pub close_view: bool,
}

impl TransitionOutcome {
    /// Builds the outcome from the updated file and the collection after the change
    pub fn new(action: WorkflowAction, file: CaseFile, collection: &[CaseFile]) -> Self {
        let statistics = Statistics::compute(collection);
        let close_view = statistics.status_count(action.source()) == 0;
        Self {
            file,
            statistics,
            close_view,
        }
    }
}
