//! Case file DTOs
//!
//! Request bodies use the same camelCase names as the stored records so the
//! existing front end can post its form state unchanged. Server-assigned
//! fields (`id`, `registrationDate`) are ignored if sent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::parse_calendar_date;
use domain_casefile::{
    missing_documents, CaseFile, CaseFileUpdate, CaseStatus, ClaimType, Completeness,
    DocumentRecord, DocumentType, NewCaseFile,
};

use infra_store::MULTIPLE_TYPES_LABEL;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseFileRequest {
    #[validate(length(min = 1, max = 200, message = "Client name must be between 1 and 200 characters"))]
    pub client_name: String,
    pub tc: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Plate must be between 1 and 32 characters"))]
    pub plate: String,
    pub driver_name: Option<String>,
    #[serde(default)]
    pub file_types: Vec<String>,
    /// Single-tag form used by older clients
    pub file_type: Option<String>,
    pub file_status: Option<String>,
    pub opponent_name: Option<String>,
    pub opponent_plate: Option<String>,
    pub opponent_driver: Option<String>,
    pub insurance_company: Option<String>,
    pub percentage: Option<String>,
    pub master: Option<String>,
    pub insurance_application_date: Option<String>,
    pub arbitration_application_date: Option<String>,
    pub enforcement_application_date: Option<String>,
    pub current_status: Option<String>,
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

impl CreateCaseFileRequest {
    pub fn into_new_case_file(self) -> Result<NewCaseFile, ApiError> {
        Ok(NewCaseFile {
            claim_types: parse_claim_types(self.file_types, self.file_type)?,
            status: self.file_status.as_deref().map(parse_status).transpose()?.flatten(),
            insurance_application_date: parse_date(self.insurance_application_date.as_deref())?,
            arbitration_application_date: parse_date(self.arbitration_application_date.as_deref())?,
            enforcement_application_date: parse_date(self.enforcement_application_date.as_deref())?,
            client_name: self.client_name,
            national_id: self.tc,
            plate: self.plate,
            driver_name: self.driver_name,
            opponent_name: self.opponent_name,
            opponent_plate: self.opponent_plate,
            opponent_driver: self.opponent_driver,
            insurance_company: self.insurance_company,
            percentage: self.percentage,
            handler: self.master,
            current_status: self.current_status,
            notes: self.notes,
            documents: self.documents,
        })
    }
}

/// Replace-update body: every field optional, omitted fields are kept
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaseFileRequest {
    #[validate(length(min = 1, max = 200, message = "Client name must be between 1 and 200 characters"))]
    pub client_name: Option<String>,
    pub tc: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Plate must be between 1 and 32 characters"))]
    pub plate: Option<String>,
    pub driver_name: Option<String>,
    pub file_types: Option<Vec<String>>,
    pub file_type: Option<String>,
    pub file_status: Option<String>,
    pub opponent_name: Option<String>,
    pub opponent_plate: Option<String>,
    pub opponent_driver: Option<String>,
    pub insurance_company: Option<String>,
    pub percentage: Option<String>,
    pub master: Option<String>,
    /// An empty string clears the date
    pub insurance_application_date: Option<String>,
    pub arbitration_application_date: Option<String>,
    pub enforcement_application_date: Option<String>,
    pub current_status: Option<String>,
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
    pub documents: Option<Vec<DocumentRecord>>,
}

impl UpdateCaseFileRequest {
    pub fn into_update(self) -> Result<CaseFileUpdate, ApiError> {
        let claim_types = match (self.file_types, single_label(self.file_type)) {
            (None, None) => None,
            (types, single) => Some(parse_claim_types(types.unwrap_or_default(), single)?),
        };

        Ok(CaseFileUpdate {
            claim_types,
            status: self.file_status.as_deref().map(parse_status).transpose()?.flatten(),
            insurance_application_date: update_date(self.insurance_application_date)?,
            arbitration_application_date: update_date(self.arbitration_application_date)?,
            enforcement_application_date: update_date(self.enforcement_application_date)?,
            client_name: self.client_name,
            national_id: self.tc,
            plate: self.plate,
            driver_name: self.driver_name,
            opponent_name: self.opponent_name,
            opponent_plate: self.opponent_plate,
            opponent_driver: self.opponent_driver,
            insurance_company: self.insurance_company,
            percentage: self.percentage,
            handler: self.master,
            current_status: self.current_status,
            notes: self.notes,
            documents: self.documents,
        })
    }
}

/// The legacy `fileType` as a usable tag; blank and the several-tags marker
/// carry none
fn single_label(label: Option<String>) -> Option<String> {
    label.filter(|l| {
        let l = l.trim();
        !l.is_empty() && l != MULTIPLE_TYPES_LABEL
    })
}

/// `fileTypes` wins over the legacy `fileType`; an empty result is left to
/// domain validation
fn parse_claim_types(types: Vec<String>, single: Option<String>) -> Result<Vec<ClaimType>, ApiError> {
    let labels = if types.is_empty() { single_label(single).into_iter().collect() } else { types };

    labels
        .iter()
        .map(|label| {
            ClaimType::from_label(label)
                .ok_or_else(|| ApiError::Validation(format!("Unknown claim type '{}'", label)))
        })
        .collect()
}

/// A blank status counts as not supplied
fn parse_status(label: &str) -> Result<Option<CaseStatus>, ApiError> {
    if label.trim().is_empty() {
        return Ok(None);
    }
    CaseStatus::from_label(label)
        .map(Some)
        .ok_or_else(|| ApiError::Validation(format!("Unknown status '{}'", label)))
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        Some(v) => parse_calendar_date(v).map_err(|e| ApiError::Validation(e.to_string())),
        None => Ok(None),
    }
}

fn update_date(value: Option<String>) -> Result<Option<Option<NaiveDate>>, ApiError> {
    value.map(|v| parse_date(Some(&v))).transpose()
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A case file annotated with its completeness badge
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseFileResponse {
    #[serde(flatten)]
    pub file: CaseFile,
    pub completeness: Completeness,
    pub badge: String,
}

impl From<CaseFile> for CaseFileResponse {
    fn from(file: CaseFile) -> Self {
        let completeness = Completeness::of(&file);
        Self {
            badge: completeness.badge(),
            completeness,
            file,
        }
    }
}

/// Envelope returned by create and update
#[derive(Debug, Serialize)]
pub struct FileSavedResponse {
    pub success: bool,
    pub file: CaseFileResponse,
}

impl From<CaseFile> for FileSavedResponse {
    fn from(file: CaseFile) -> Self {
        Self {
            success: true,
            file: file.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDocumentsResponse {
    pub file_id: String,
    pub missing: Vec<DocumentType>,
    pub completeness: Completeness,
    pub badge: String,
}

impl From<&CaseFile> for MissingDocumentsResponse {
    fn from(file: &CaseFile) -> Self {
        let completeness = Completeness::of(file);
        Self {
            file_id: file.id.to_string(),
            missing: missing_documents(file),
            badge: completeness.badge(),
            completeness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_single_type_accepted() {
        let request = CreateCaseFileRequest {
            client_name: "Ayşe".to_string(),
            plate: "34 ABC 123".to_string(),
            file_type: Some("Pert Farkı".to_string()),
            ..Default::default()
        };
        let new = request.into_new_case_file().unwrap();
        assert_eq!(new.claim_types, vec![ClaimType::TotalLossDifference]);
    }

    #[test]
    fn test_unknown_labels_rejected() {
        let request = CreateCaseFileRequest {
            file_types: vec!["Kasko".to_string()],
            ..Default::default()
        };
        assert!(matches!(request.into_new_case_file(), Err(ApiError::Validation(_))));

        let request = UpdateCaseFileRequest {
            file_status: Some("Arşivde".to_string()),
            ..Default::default()
        };
        assert!(matches!(request.into_update(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_empty_date_clears_on_update() {
        let update = UpdateCaseFileRequest {
            insurance_application_date: Some(String::new()),
            arbitration_application_date: Some("2024-05-01".to_string()),
            ..Default::default()
        }
        .into_update()
        .unwrap();

        assert_eq!(update.insurance_application_date, Some(None));
        assert_eq!(update.arbitration_application_date, Some(NaiveDate::from_ymd_opt(2024, 5, 1)));
        assert_eq!(update.enforcement_application_date, None);
        assert_eq!(update.claim_types, None);
    }

    #[test]
    fn test_multiple_types_marker_is_not_a_tag() {
        let update = UpdateCaseFileRequest {
            file_type: Some(MULTIPLE_TYPES_LABEL.to_string()),
            notes: Some("yeni not".to_string()),
            ..Default::default()
        }
        .into_update()
        .unwrap();
        assert_eq!(update.claim_types, None);
        assert_eq!(update.notes.as_deref(), Some("yeni not"));

        let update = UpdateCaseFileRequest {
            file_types: Some(vec!["Değer Kaybı".to_string(), "Diğer".to_string()]),
            file_type: Some(MULTIPLE_TYPES_LABEL.to_string()),
            ..Default::default()
        }
        .into_update()
        .unwrap();
        assert_eq!(update.claim_types, Some(vec![ClaimType::DiminishedValue, ClaimType::Other]));

        let new = CreateCaseFileRequest {
            client_name: "Ayşe".to_string(),
            plate: "34 ABC 123".to_string(),
            file_type: Some(MULTIPLE_TYPES_LABEL.to_string()),
            ..Default::default()
        }
        .into_new_case_file()
        .unwrap();
        assert!(new.claim_types.is_empty());
    }

    #[test]
    fn test_validator_rejects_blank_required_fields() {
        let request = CreateCaseFileRequest::default();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("client_name"));
        assert!(errors.field_errors().contains_key("plate"));
    }
}
