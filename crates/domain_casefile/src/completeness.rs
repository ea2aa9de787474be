//! Document completeness
//!
//! Every case file is expected to collect one attachment of each type in a
//! fixed catalog. The catalog is the same for every claim type.

use serde::Serialize;

use crate::case_file::CaseFile;
use crate::document::DocumentType;

/// Documents every case file needs, in display order
pub const REQUIRED_DOCUMENTS: [DocumentType; 7] = [
    DocumentType::AccidentReport,
    DocumentType::VehiclePhotos,
    DocumentType::RegistrationCopies,
    DocumentType::IdentityCopies,
    DocumentType::ExpertReport,
    DocumentType::PowerOfAttorney,
    DocumentType::RepairInvoice,
];

/// Required document types with no attachment on the file, in catalog order
pub fn missing_documents(file: &CaseFile) -> Vec<DocumentType> {
    REQUIRED_DOCUMENTS
        .into_iter()
        .filter(|required| !file.document_types().any(|t| t == *required))
        .collect()
}

/// Badge shown next to a file in list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Completeness {
    Complete,
    Missing { count: usize },
}

impl Completeness {
    /// Evaluates a file
    pub fn of(file: &CaseFile) -> Self {
        match missing_documents(file).len() {
            0 => Completeness::Complete,
            count => Completeness::Missing { count },
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Completeness::Complete)
    }

    pub fn missing_count(&self) -> usize {
        match self {
            Completeness::Complete => 0,
            Completeness::Missing { count } => *count,
        }
    }

    /// Short label: "Tamam" when complete, otherwise "<n> eksik"
    pub fn badge(&self) -> String {
        match self {
            Completeness::Complete => "Tamam".to_string(),
            Completeness::Missing { count } => format!("{} eksik", count),
        }
    }
}
