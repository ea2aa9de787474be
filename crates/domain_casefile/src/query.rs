//! Listing order, partition views and free-text search

use std::cmp::Ordering;

use crate::case_file::{CaseFile, CaseStatus};

/// Listing bucket: ready files first, then files still gathering documents,
/// then everything else
fn listing_rank(status: CaseStatus) -> u8 {
    match status {
        CaseStatus::ReadyForApplication => 0,
        CaseStatus::DocumentGatheringInProgress => 1,
        _ => 2,
    }
}

/// Ordering used by every list view
///
/// Bucket first, then newest registration first.
pub fn listing_cmp(a: &CaseFile, b: &CaseFile) -> Ordering {
    listing_rank(a.status)
        .cmp(&listing_rank(b.status))
        .then_with(|| b.registration_date.cmp(&a.registration_date))
}

/// Sorts files in place into listing order (stable)
pub fn sort_for_listing(files: &mut [CaseFile]) {
    files.sort_by(listing_cmp);
}

/// Files whose status equals `status`, in input order
pub fn partition(files: &[CaseFile], status: CaseStatus) -> Vec<&CaseFile> {
    files.iter().filter(|f| f.status == status).collect()
}

/// Case-insensitive substring search
///
/// Matches client name, plate, national ID, opponent name and opponent
/// plate. A blank term returns every file in input order.
pub fn search<'a>(files: &'a [CaseFile], term: &str) -> Vec<&'a CaseFile> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return files.iter().collect();
    }

    files.iter().filter(|f| matches_term(f, &needle)).collect()
}

/// `needle` must already be lower-cased
fn matches_term(file: &CaseFile, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&file.client_name)
        || contains(&file.plate)
        || file.national_id.as_deref().is_some_and(contains)
        || file.opponent_name.as_deref().is_some_and(contains)
        || file.opponent_plate.as_deref().is_some_and(contains)
}
