//! Test Data Builders
//!
//! Builder patterns for constructing case files and document records with
//! sensible defaults. Tests set only the fields they care about.

use chrono::{DateTime, NaiveDate, Utc};

use domain_casefile::{
    CaseFile, CaseStatus, ClaimType, DocumentMetadata, DocumentRecord, DocumentType, NewCaseFile,
};

use crate::fixtures::{StringFixtures, TemporalFixtures};

/// Builder for case files
///
/// `build` goes through [`CaseFile::create`], so the result satisfies every
/// invariant a stored file has. Registration date and documents are set
/// afterwards.
#[derive(Debug, Clone)]
pub struct CaseFileBuilder {
    new: NewCaseFile,
    registration_date: Option<DateTime<Utc>>,
    documents: Vec<DocumentRecord>,
}

impl Default for CaseFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseFileBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            new: NewCaseFile {
                client_name: StringFixtures::client_name().to_string(),
                plate: StringFixtures::plate().to_string(),
                claim_types: vec![ClaimType::DiminishedValue],
                ..Default::default()
            },
            registration_date: None,
            documents: Vec::new(),
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.new.client_name = name.into();
        self
    }

    pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
        self.new.national_id = Some(national_id.into());
        self
    }

    pub fn with_plate(mut self, plate: impl Into<String>) -> Self {
        self.new.plate = plate.into();
        self
    }

    pub fn with_claim_types(mut self, claim_types: Vec<ClaimType>) -> Self {
        self.new.claim_types = claim_types;
        self
    }

    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.new.status = Some(status);
        self
    }

    pub fn with_opponent(mut self, name: impl Into<String>, plate: impl Into<String>) -> Self {
        self.new.opponent_name = Some(name.into());
        self.new.opponent_plate = Some(plate.into());
        self
    }

    pub fn with_insurance_company(mut self, company: impl Into<String>) -> Self {
        self.new.insurance_company = Some(company.into());
        self
    }

    pub fn with_insurance_application_date(mut self, date: NaiveDate) -> Self {
        self.new.insurance_application_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.new.notes = Some(notes.into());
        self
    }

    /// Overrides the server-assigned registration date
    pub fn registered_at(mut self, date: DateTime<Utc>) -> Self {
        self.registration_date = Some(date);
        self
    }

    /// Attaches one document of the given type
    pub fn with_document(mut self, document_type: DocumentType) -> Self {
        self.documents.push(DocumentRecordBuilder::new(document_type).build());
        self
    }

    /// Attaches one document of every required type
    pub fn with_all_documents(mut self) -> Self {
        for document_type in domain_casefile::REQUIRED_DOCUMENTS {
            self.documents.push(DocumentRecordBuilder::new(document_type).build());
        }
        self
    }

    pub fn with_record(mut self, record: DocumentRecord) -> Self {
        self.documents.push(record);
        self
    }

    /// Fields as they would be posted to create a file
    pub fn build_new(self) -> NewCaseFile {
        self.new
    }

    /// Builds the file
    ///
    /// # Panics
    ///
    /// Panics if the configured fields fail validation
    pub fn build(self) -> CaseFile {
        let mut file = CaseFile::create(self.new).expect("builder produced an invalid case file");
        file.registration_date = self
            .registration_date
            .unwrap_or_else(TemporalFixtures::registration);
        file.documents = self.documents;
        file
    }
}

/// Builder for document records
#[derive(Debug, Clone)]
pub struct DocumentRecordBuilder {
    document_type: DocumentType,
    original_name: String,
    media_type: String,
    stored_filename: Option<String>,
    size: u64,
}

impl DocumentRecordBuilder {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            original_name: "belge.pdf".to_string(),
            media_type: "application/pdf".to_string(),
            stored_filename: None,
            size: 1024,
        }
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = name.into();
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn with_stored_filename(mut self, filename: impl Into<String>) -> Self {
        self.stored_filename = Some(filename.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Builds the record; the stored filename defaults to one derived from
    /// the generated document id
    pub fn build(self) -> DocumentRecord {
        let metadata = DocumentMetadata::new(self.original_name, self.document_type, self.media_type);
        let mut record = DocumentRecord::new(metadata, String::new(), self.size);
        let stored = self
            .stored_filename
            .unwrap_or_else(|| format!("{}.pdf", record.id));
        record.path = domain_casefile::public_path(&stored);
        record.stored_filename = stored;
        record
    }
}
