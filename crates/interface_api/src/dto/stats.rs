//! Statistics DTOs

use std::collections::BTreeMap;

use serde::Serialize;

use domain_casefile::{CaseStatus, ClaimType, Statistics};

/// Dashboard counters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub type_stats: BTreeMap<ClaimType, usize>,
    pub status_stats: BTreeMap<CaseStatus, usize>,
    pub ready_files_count: usize,
    pub pending_files_count: usize,
    pub total_files: usize,
}

impl From<Statistics> for StatsResponse {
    fn from(stats: Statistics) -> Self {
        Self {
            type_stats: stats.type_counts,
            status_stats: stats.status_counts,
            ready_files_count: stats.ready_files_count,
            pending_files_count: stats.pending_files_count,
            total_files: stats.total_files,
        }
    }
}
