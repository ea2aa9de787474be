//! Aggregate statistics over the case file collection
//!
//! Recomputed from scratch on every call; the collection is office-sized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::case_file::{CaseFile, CaseStatus, ClaimType};

/// Counts per claim type and per status
///
/// Every claim type and every status has an entry, zero included.
/// `status_counts` partitions the collection; `type_counts` may sum to more
/// than `total_files` because a file can carry several tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_files: usize,
    #[serde(rename = "fileTypes")]
    pub type_counts: BTreeMap<ClaimType, usize>,
    #[serde(rename = "fileStatuses")]
    pub status_counts: BTreeMap<CaseStatus, usize>,
    /// Files in [`CaseStatus::ReadyForApplication`]
    pub ready_files_count: usize,
    /// Files in [`CaseStatus::DocumentGatheringInProgress`]
    pub pending_files_count: usize,
}

impl Statistics {
    /// Computes statistics for a collection
    pub fn compute(files: &[CaseFile]) -> Self {
        let mut type_counts: BTreeMap<ClaimType, usize> =
            ClaimType::ALL.into_iter().map(|t| (t, 0)).collect();
        let mut status_counts: BTreeMap<CaseStatus, usize> =
            CaseStatus::ALL.into_iter().map(|s| (s, 0)).collect();

        for file in files {
            for claim_type in &file.claim_types {
                *type_counts.entry(*claim_type).or_insert(0) += 1;
            }
            *status_counts.entry(file.status).or_insert(0) += 1;
        }

        Self {
            total_files: files.len(),
            ready_files_count: status_counts[&CaseStatus::ReadyForApplication],
            pending_files_count: status_counts[&CaseStatus::DocumentGatheringInProgress],
            type_counts,
            status_counts,
        }
    }

    /// Number of files carrying a tag
    pub fn type_count(&self, claim_type: ClaimType) -> usize {
        self.type_counts.get(&claim_type).copied().unwrap_or(0)
    }

    /// Number of files in a status
    pub fn status_count(&self, status: CaseStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::compute(&[])
    }
}
