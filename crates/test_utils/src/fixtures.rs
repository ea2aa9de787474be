//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for case files and documents.
//! Fixed values are predictable for unit tests; the `random_*` helpers use
//! `fake` for tests that only need plausible input.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use fake::Fake;

use domain_casefile::ports::mock::{MockCaseFileStore, MockDocumentStorage};
use domain_casefile::{CaseFile, CaseFileService, DocumentType};

/// Fixed strings used across tests
pub struct StringFixtures;

impl StringFixtures {
    pub fn client_name() -> &'static str {
        "Ahmet Yılmaz"
    }

    pub fn plate() -> &'static str {
        "34 ABC 123"
    }

    pub fn national_id() -> &'static str {
        "12345678901"
    }

    pub fn opponent_name() -> &'static str {
        "Mehmet Demir"
    }

    pub fn insurance_company() -> &'static str {
        "Anadolu Sigorta"
    }

    /// Random person name
    pub fn random_name() -> String {
        Name().fake()
    }

    /// Random company name, used for insurers
    pub fn random_company() -> String {
        CompanyName().fake()
    }

    /// Random plate in the `NN LLL NNN` shape
    pub fn random_plate() -> String {
        let city: u8 = (1..82).fake();
        let letters: String = (0..3)
            .map(|_| char::from(b'A' + (0..26u8).fake::<u8>()))
            .collect();
        let number: u16 = (100..1000).fake();
        format!("{:02} {} {}", city, letters, number)
    }
}

/// Fixed dates
pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn registration() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    pub fn insurance_application() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    pub fn arbitration_application() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }
}

/// Document payloads
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// Smallest byte sequence recognised as a PDF
    pub fn pdf_bytes() -> Vec<u8> {
        b"%PDF-1.4\n%%EOF\n".to_vec()
    }

    pub fn png_bytes() -> Vec<u8> {
        vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
    }

    /// Every required document type
    pub fn full_set() -> Vec<DocumentType> {
        domain_casefile::REQUIRED_DOCUMENTS.to_vec()
    }
}

/// Services wired to in-memory adapters
pub struct ServiceFixtures;

impl ServiceFixtures {
    /// Service over empty mocks, returning the mocks for inspection
    pub fn in_memory() -> (CaseFileService, Arc<MockCaseFileStore>, Arc<MockDocumentStorage>) {
        let store = Arc::new(MockCaseFileStore::new());
        let documents = Arc::new(MockDocumentStorage::new());
        let service = CaseFileService::new(store.clone(), documents.clone());
        (service, store, documents)
    }

    /// Service over a store seeded with files
    pub async fn seeded(files: Vec<CaseFile>) -> (CaseFileService, Arc<MockDocumentStorage>) {
        let store = Arc::new(MockCaseFileStore::with_files(files).await);
        let documents = Arc::new(MockDocumentStorage::new());
        let service = CaseFileService::new(store, documents.clone());
        (service, documents)
    }
}
