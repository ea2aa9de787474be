//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use domain_casefile::{CaseFile, CaseStatus, ClaimType, DocumentType, NewCaseFile};

use crate::builders::DocumentRecordBuilder;

/// Strategy for claim-type tags
pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    prop::sample::select(ClaimType::ALL.to_vec())
}

/// Strategy for statuses
pub fn status_strategy() -> impl Strategy<Value = CaseStatus> {
    prop::sample::select(CaseStatus::ALL.to_vec())
}

/// Strategy for document types, the generic type included
pub fn document_type_strategy() -> impl Strategy<Value = DocumentType> {
    prop::sample::select(DocumentType::ALL.to_vec())
}

/// Strategy for non-blank client names, Turkish letters included
pub fn client_name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-zÇŞĞÜÖİçşğüöı]{1,12}( [A-Za-zÇŞĞÜÖİçşğüöı]{1,12})?"
}

/// Strategy for plates in the `NN L{1,3} N{2,4}` shape
pub fn plate_strategy() -> impl Strategy<Value = String> {
    "[0-8][0-9] [A-Z]{1,3} [0-9]{2,4}"
}

/// Strategy for the fields of a new file
pub fn new_case_file_strategy() -> impl Strategy<Value = NewCaseFile> {
    (
        client_name_strategy(),
        plate_strategy(),
        prop::collection::vec(claim_type_strategy(), 1..4),
        prop::option::of(status_strategy()),
    )
        .prop_map(|(client_name, plate, claim_types, status)| NewCaseFile {
            client_name,
            plate,
            claim_types,
            status,
            ..Default::default()
        })
}

/// Strategy for stored files with random documents and registration dates
/// spread over three years
pub fn case_file_strategy() -> impl Strategy<Value = CaseFile> {
    (
        new_case_file_strategy(),
        prop::collection::vec(document_type_strategy(), 0..10),
        0i64..(3 * 365),
    )
        .prop_filter_map("invalid case file", |(new, document_types, days)| {
            let mut file = CaseFile::create(new).ok()?;
            file.registration_date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single()? + Duration::days(days);
            file.documents = document_types
                .into_iter()
                .map(|t| DocumentRecordBuilder::new(t).build())
                .collect();
            Some(file)
        })
}

/// Strategy for whole collections
pub fn collection_strategy(max_len: usize) -> impl Strategy<Value = Vec<CaseFile>> {
    prop::collection::vec(case_file_strategy(), 0..max_len)
}
