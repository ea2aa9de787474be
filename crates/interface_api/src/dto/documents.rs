//! Document DTOs

use serde::Serialize;

use domain_casefile::DocumentRecord;

/// Envelope returned by the standalone upload endpoint
#[derive(Debug, Serialize)]
pub struct DocumentUploadedResponse {
    pub success: bool,
    pub document: DocumentRecord,
}

impl From<DocumentRecord> for DocumentUploadedResponse {
    fn from(document: DocumentRecord) -> Self {
        Self {
            success: true,
            document,
        }
    }
}
