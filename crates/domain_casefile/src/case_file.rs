//! Case file aggregate

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{normalize_text, CaseFileId, DocumentId};
use crate::document::{DocumentRecord, DocumentType};
use crate::error::CaseFileError;

/// Nature of the claim a case file pursues
///
/// A case file may carry several tags at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClaimType {
    /// Loss in market value after repair
    #[serde(rename = "Değer Kaybı")]
    DiminishedValue,
    /// Cost of a substitute vehicle during repair
    #[serde(rename = "İkame Araç Bedeli")]
    ReplacementVehicle,
    /// Debt enforcement proceedings
    #[serde(rename = "İcra Takibi")]
    EnforcementProceedings,
    /// Shortfall on a total-loss settlement
    #[serde(rename = "Pert Farkı")]
    TotalLossDifference,
    #[serde(rename = "Diğer")]
    Other,
}

impl ClaimType {
    /// All tags in their canonical order
    pub const ALL: [ClaimType; 5] = [
        ClaimType::DiminishedValue,
        ClaimType::ReplacementVehicle,
        ClaimType::EnforcementProceedings,
        ClaimType::TotalLossDifference,
        ClaimType::Other,
    ];

    /// Returns the persisted label
    pub fn label(&self) -> &'static str {
        match self {
            ClaimType::DiminishedValue => "Değer Kaybı",
            ClaimType::ReplacementVehicle => "İkame Araç Bedeli",
            ClaimType::EnforcementProceedings => "İcra Takibi",
            ClaimType::TotalLossDifference => "Pert Farkı",
            ClaimType::Other => "Diğer",
        }
    }

    /// Looks a tag up by its persisted label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClaimType {
    type Err = CaseFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .ok_or_else(|| CaseFileError::validation(format!("unknown claim type '{}'", s)))
    }
}

/// Processing stage of a case file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CaseStatus {
    /// All paperwork in hand, application can be filed
    #[default]
    #[serde(rename = "Başvuruya Hazır")]
    ReadyForApplication,
    /// Application filed with the insurer
    #[serde(rename = "Başvuru Yapıldı")]
    ApplicationSubmitted,
    /// Still collecting documents
    #[serde(rename = "Evrak Tedarik Aşamasında")]
    DocumentGatheringInProgress,
    #[serde(rename = "Tahkimde")]
    InArbitration,
    #[serde(rename = "İcrada")]
    InEnforcement,
    #[serde(rename = "Kapandı")]
    Closed,
}

impl CaseStatus {
    /// All statuses in their canonical order
    pub const ALL: [CaseStatus; 6] = [
        CaseStatus::ReadyForApplication,
        CaseStatus::ApplicationSubmitted,
        CaseStatus::DocumentGatheringInProgress,
        CaseStatus::InArbitration,
        CaseStatus::InEnforcement,
        CaseStatus::Closed,
    ];

    /// Returns the persisted label
    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::ReadyForApplication => "Başvuruya Hazır",
            CaseStatus::ApplicationSubmitted => "Başvuru Yapıldı",
            CaseStatus::DocumentGatheringInProgress => "Evrak Tedarik Aşamasında",
            CaseStatus::InArbitration => "Tahkimde",
            CaseStatus::InEnforcement => "İcrada",
            CaseStatus::Closed => "Kapandı",
        }
    }

    /// Looks a status up by its persisted label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CaseStatus {
    type Err = CaseFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .ok_or_else(|| CaseFileError::validation(format!("unknown status '{}'", s)))
    }
}

/// A tracked insurance claim
///
/// `id` and `registration_date` are assigned by [`CaseFile::create`] and no
/// domain operation modifies them afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseFile {
    /// Unique identifier
    pub id: CaseFileId,
    /// When the file was opened
    pub registration_date: DateTime<Utc>,
    /// Client (claimant) name
    pub client_name: String,
    /// Client's national ID number
    #[serde(rename = "tc", default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    /// Client's vehicle plate
    pub plate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Claim-type tags, never empty
    #[serde(rename = "fileTypes")]
    pub claim_types: Vec<ClaimType>,
    #[serde(rename = "fileStatus")]
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_company: Option<String>,
    /// Fault-share note, kept as typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
    /// Handler assigned to the file
    #[serde(rename = "master", default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_application_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arbitration_application_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_application_date: Option<NaiveDate>,
    /// Free-text note on where the file stands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Attachments in upload order
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

/// Fields supplied when opening a new case file
#[derive(Debug, Clone, Default)]
pub struct NewCaseFile {
    pub client_name: String,
    pub national_id: Option<String>,
    pub plate: String,
    pub driver_name: Option<String>,
    pub claim_types: Vec<ClaimType>,
    /// Defaults to [`CaseStatus::ReadyForApplication`]
    pub status: Option<CaseStatus>,
    pub opponent_name: Option<String>,
    pub opponent_plate: Option<String>,
    pub opponent_driver: Option<String>,
    pub insurance_company: Option<String>,
    pub percentage: Option<String>,
    pub handler: Option<String>,
    pub insurance_application_date: Option<NaiveDate>,
    pub arbitration_application_date: Option<NaiveDate>,
    pub enforcement_application_date: Option<NaiveDate>,
    pub current_status: Option<String>,
    pub notes: Option<String>,
    /// Documents uploaded before the file was saved
    pub documents: Vec<DocumentRecord>,
}

/// Replace-update of an existing case file
///
/// Every supplied field overwrites the stored value; omitted fields are kept.
/// A supplied blank text clears an optional field, and `Some(None)` clears a
/// date. A supplied `documents` list is authoritative.
#[derive(Debug, Clone, Default)]
pub struct CaseFileUpdate {
    pub client_name: Option<String>,
    pub national_id: Option<String>,
    pub plate: Option<String>,
    pub driver_name: Option<String>,
    pub claim_types: Option<Vec<ClaimType>>,
    pub status: Option<CaseStatus>,
    pub opponent_name: Option<String>,
    pub opponent_plate: Option<String>,
    pub opponent_driver: Option<String>,
    pub insurance_company: Option<String>,
    pub percentage: Option<String>,
    pub handler: Option<String>,
    pub insurance_application_date: Option<Option<NaiveDate>>,
    pub arbitration_application_date: Option<Option<NaiveDate>>,
    pub enforcement_application_date: Option<Option<NaiveDate>>,
    pub current_status: Option<String>,
    pub notes: Option<String>,
    pub documents: Option<Vec<DocumentRecord>>,
}

impl CaseFileUpdate {
    /// An update that only changes the status
    pub fn status_only(status: CaseStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl CaseFile {
    /// Opens a new case file
    ///
    /// Assigns a fresh identifier and stamps the registration date with the
    /// current time.
    pub fn create(new: NewCaseFile) -> Result<Self, CaseFileError> {
        let file = Self {
            id: CaseFileId::generate(),
            registration_date: Utc::now(),
            client_name: new.client_name.trim().to_string(),
            national_id: normalize_text(new.national_id),
            plate: new.plate.trim().to_string(),
            driver_name: normalize_text(new.driver_name),
            claim_types: dedup_claim_types(new.claim_types),
            status: new.status.unwrap_or_default(),
            opponent_name: normalize_text(new.opponent_name),
            opponent_plate: normalize_text(new.opponent_plate),
            opponent_driver: normalize_text(new.opponent_driver),
            insurance_company: normalize_text(new.insurance_company),
            percentage: normalize_text(new.percentage),
            handler: normalize_text(new.handler),
            insurance_application_date: new.insurance_application_date,
            arbitration_application_date: new.arbitration_application_date,
            enforcement_application_date: new.enforcement_application_date,
            current_status: normalize_text(new.current_status),
            notes: normalize_text(new.notes),
            documents: new.documents,
        };

        file.validate()?;
        Ok(file)
    }

    /// Checks the required fields
    pub fn validate(&self) -> Result<(), CaseFileError> {
        let mut errors = Vec::new();

        if self.client_name.trim().is_empty() {
            errors.push("client name is required".to_string());
        }
        if self.plate.trim().is_empty() {
            errors.push("plate is required".to_string());
        }
        if self.claim_types.is_empty() {
            errors.push("at least one claim type is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CaseFileError::validation_failed(errors))
        }
    }

    /// Merges an update into this file
    ///
    /// The merged record is validated before anything is changed; on error
    /// the file is left untouched. Returns the documents that the update's
    /// document list dropped.
    pub fn apply_update(&mut self, update: CaseFileUpdate) -> Result<Vec<DocumentRecord>, CaseFileError> {
        let mut merged = self.clone();

        if let Some(name) = update.client_name {
            merged.client_name = name.trim().to_string();
        }
        if let Some(plate) = update.plate {
            merged.plate = plate.trim().to_string();
        }
        if let Some(types) = update.claim_types {
            merged.claim_types = dedup_claim_types(types);
        }
        if let Some(status) = update.status {
            merged.status = status;
        }

        overwrite_text(&mut merged.national_id, update.national_id);
        overwrite_text(&mut merged.driver_name, update.driver_name);
        overwrite_text(&mut merged.opponent_name, update.opponent_name);
        overwrite_text(&mut merged.opponent_plate, update.opponent_plate);
        overwrite_text(&mut merged.opponent_driver, update.opponent_driver);
        overwrite_text(&mut merged.insurance_company, update.insurance_company);
        overwrite_text(&mut merged.percentage, update.percentage);
        overwrite_text(&mut merged.handler, update.handler);
        overwrite_text(&mut merged.current_status, update.current_status);
        overwrite_text(&mut merged.notes, update.notes);

        if let Some(date) = update.insurance_application_date {
            merged.insurance_application_date = date;
        }
        if let Some(date) = update.arbitration_application_date {
            merged.arbitration_application_date = date;
        }
        if let Some(date) = update.enforcement_application_date {
            merged.enforcement_application_date = date;
        }

        let mut dropped = Vec::new();
        if let Some(documents) = update.documents {
            dropped = merged
                .documents
                .iter()
                .filter(|old| {
                    !documents
                        .iter()
                        .any(|new| new.id == old.id && new.stored_filename == old.stored_filename)
                })
                .cloned()
                .collect();
            merged.documents = documents;
        }

        merged.validate()?;
        *self = merged;
        Ok(dropped)
    }

    /// Appends a document in upload order
    pub fn attach_document(&mut self, document: DocumentRecord) {
        self.documents.push(document);
    }

    /// Removes a document addressed by its id or its stored filename
    pub fn remove_document(&mut self, reference: &str) -> Result<DocumentRecord, CaseFileError> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id.as_str() == reference || d.stored_filename == reference)
            .ok_or_else(|| CaseFileError::DocumentNotFound(reference.to_string()))?;

        Ok(self.documents.remove(index))
    }

    /// Finds a document by id
    pub fn document(&self, id: &DocumentId) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| &d.id == id)
    }

    /// Types of all attached documents
    pub fn document_types(&self) -> impl Iterator<Item = DocumentType> + '_ {
        self.documents.iter().map(|d| d.document_type)
    }

    /// Returns true if the file carries the given claim-type tag
    pub fn has_claim_type(&self, claim_type: ClaimType) -> bool {
        self.claim_types.contains(&claim_type)
    }
}

/// Removes duplicate tags and puts them in canonical order
fn dedup_claim_types(mut types: Vec<ClaimType>) -> Vec<ClaimType> {
    types.sort();
    types.dedup();
    types
}

fn overwrite_text(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = normalize_text(Some(value));
    }
}
