//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than comparing whole structs.

use domain_casefile::{listing_cmp, missing_documents, CaseFile, CaseStatus, DocumentType, Statistics};

/// Asserts that files are in listing order: status bucket, then newest
/// registration first
pub fn assert_listing_order(files: &[CaseFile]) {
    for pair in files.windows(2) {
        assert!(
            listing_cmp(&pair[0], &pair[1]) != std::cmp::Ordering::Greater,
            "Files out of listing order: {} ({}) before {} ({})",
            pair[0].id,
            pair[0].registration_date,
            pair[1].id,
            pair[1].registration_date
        );
    }
}

/// Asserts that every file is in the given status
pub fn assert_all_in_status(files: &[CaseFile], status: CaseStatus) {
    for file in files {
        assert_eq!(
            file.status, status,
            "File {} is in '{}', expected '{}'",
            file.id, file.status, status
        );
    }
}

/// Asserts the exact missing-document list of a file
pub fn assert_missing(file: &CaseFile, expected: &[DocumentType]) {
    let actual = missing_documents(file);
    assert_eq!(
        actual, expected,
        "Missing documents of {} differ: actual={:?}, expected={:?}",
        file.id, actual, expected
    );
}

/// Asserts the invariants every statistics value must hold for its collection
pub fn assert_statistics_consistent(stats: &Statistics, files: &[CaseFile]) {
    assert_eq!(stats.total_files, files.len(), "total_files mismatch");

    let status_sum: usize = stats.status_counts.values().sum();
    assert_eq!(status_sum, files.len(), "Status counts must partition the collection");

    let tag_sum: usize = files.iter().map(|f| f.claim_types.len()).sum();
    let type_sum: usize = stats.type_counts.values().sum();
    assert_eq!(type_sum, tag_sum, "Type counts must equal the number of tags");

    assert_eq!(
        stats.ready_files_count,
        stats.status_count(CaseStatus::ReadyForApplication)
    );
    assert_eq!(
        stats.pending_files_count,
        stats.status_count(CaseStatus::DocumentGatheringInProgress)
    );
}
