//! Ingestion of stored records
//!
//! The database file has been written by several generations of the
//! application. Records are read through lenient raw shapes and normalised
//! into canonical [`CaseFile`] values here, once, so nothing downstream has to
//! care about older layouts:
//!
//! - a single `fileType` string instead of the `fileTypes` list
//! - numeric ids and national IDs
//! - blank strings for untouched form inputs
//! - full timestamps in calendar-date fields
//! - documents written before `name`, `uploadedDate`, or `size` existed

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use core_kernel::{normalize_text, parse_calendar_date, CaseFileId, DocumentId};
use domain_casefile::{
    public_path, CaseFile, CaseStatus, ClaimType, DocumentRecord, DocumentType,
};

use crate::error::StoreError;

/// Legacy `fileType` value for files carrying several tags
pub const MULTIPLE_TYPES_LABEL: &str = "Çoklu";

/// Media type recorded when a document never had one
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Case file as found on disk
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCaseFile {
    pub id: Option<Value>,
    pub registration_date: Option<Value>,
    pub client_name: Option<Value>,
    pub tc: Option<Value>,
    pub plate: Option<Value>,
    pub driver_name: Option<Value>,
    pub file_types: Option<Vec<Value>>,
    pub file_type: Option<Value>,
    pub file_status: Option<Value>,
    pub opponent_name: Option<Value>,
    pub opponent_plate: Option<Value>,
    pub opponent_driver: Option<Value>,
    pub insurance_company: Option<Value>,
    pub percentage: Option<Value>,
    pub master: Option<Value>,
    pub insurance_application_date: Option<Value>,
    pub arbitration_application_date: Option<Value>,
    pub enforcement_application_date: Option<Value>,
    pub current_status: Option<Value>,
    pub notes: Option<Value>,
    pub documents: Option<Vec<RawDocument>>,
}

/// Document record as found on disk
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawDocument {
    pub id: Option<Value>,
    pub name: Option<Value>,
    #[serde(rename = "fileName")]
    pub file_name: Option<Value>,
    #[serde(rename = "type")]
    pub document_type: Option<Value>,
    pub filename: Option<Value>,
    pub originalname: Option<Value>,
    #[serde(rename = "uploadedDate")]
    pub uploaded_date: Option<Value>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<Value>,
    pub size: Option<Value>,
    pub mimetype: Option<Value>,
}

/// Turns a raw record into a canonical case file
///
/// `index` is the record's position in the file, used in errors and logs.
pub fn normalize_case_file(raw: RawCaseFile, index: usize) -> Result<CaseFile, StoreError> {
    let id = text(raw.id)
        .and_then(|id| CaseFileId::parse(id).ok())
        .ok_or(StoreError::MissingId { index })?;

    let registration_date = match text(raw.registration_date).as_deref().map(parse_timestamp) {
        Some(Some(ts)) => ts,
        _ => {
            warn!(file_id = %id, "Case file has no readable registration date, using epoch");
            DateTime::<Utc>::default()
        }
    };

    let claim_types = claim_types(&id, raw.file_types, raw.file_type);
    let status = status(&id, raw.file_status);

    let documents = raw
        .documents
        .unwrap_or_default()
        .into_iter()
        .filter_map(|doc| normalize_document(doc, registration_date, &id))
        .collect();

    Ok(CaseFile {
        registration_date,
        client_name: text(raw.client_name).unwrap_or_default(),
        national_id: text(raw.tc),
        plate: text(raw.plate).unwrap_or_default(),
        driver_name: text(raw.driver_name),
        claim_types,
        status,
        opponent_name: text(raw.opponent_name),
        opponent_plate: text(raw.opponent_plate),
        opponent_driver: text(raw.opponent_driver),
        insurance_company: text(raw.insurance_company),
        percentage: text(raw.percentage),
        handler: text(raw.master),
        insurance_application_date: date(&id, "insuranceApplicationDate", raw.insurance_application_date),
        arbitration_application_date: date(&id, "arbitrationApplicationDate", raw.arbitration_application_date),
        enforcement_application_date: date(&id, "enforcementApplicationDate", raw.enforcement_application_date),
        current_status: text(raw.current_status),
        notes: text(raw.notes),
        documents,
        id,
    })
}

/// Legacy single-tag label derived from a file's tags
pub fn legacy_file_type(claim_types: &[ClaimType]) -> &'static str {
    match claim_types {
        [single] => single.label(),
        _ => MULTIPLE_TYPES_LABEL,
    }
}

fn claim_types(id: &CaseFileId, list: Option<Vec<Value>>, single: Option<Value>) -> Vec<ClaimType> {
    let labels: Vec<String> = match list {
        Some(list) if !list.is_empty() => list.into_iter().filter_map(|v| text(Some(v))).collect(),
        _ => text(single)
            .filter(|label| label != MULTIPLE_TYPES_LABEL)
            .into_iter()
            .collect(),
    };

    let mut types: Vec<ClaimType> = Vec::with_capacity(labels.len());
    for label in &labels {
        match ClaimType::from_label(label) {
            Some(t) => types.push(t),
            None => warn!(file_id = %id, tag = %label, "Dropping unknown claim type"),
        }
    }
    types.sort();
    types.dedup();

    if types.is_empty() {
        warn!(file_id = %id, "Case file has no known claim type, tagging as {}", ClaimType::Other);
        types.push(ClaimType::Other);
    }
    types
}

fn status(id: &CaseFileId, value: Option<Value>) -> CaseStatus {
    let label = text(value);
    match label.as_deref().and_then(CaseStatus::from_label) {
        Some(status) => status,
        None => {
            warn!(
                file_id = %id,
                status = label.as_deref().unwrap_or(""),
                "Unknown case file status, defaulting to {}",
                CaseStatus::default()
            );
            CaseStatus::default()
        }
    }
}

fn date(id: &CaseFileId, field: &str, value: Option<Value>) -> Option<NaiveDate> {
    let raw = text(value)?;
    match parse_calendar_date(&raw) {
        Ok(date) => date,
        Err(e) => {
            warn!(file_id = %id, field, error = %e, "Ignoring unreadable date");
            None
        }
    }
}

fn normalize_document(raw: RawDocument, fallback_date: DateTime<Utc>, file_id: &CaseFileId) -> Option<DocumentRecord> {
    let raw_id = text(raw.id);
    let stored_filename = match text(raw.filename).or_else(|| raw_id.clone()) {
        Some(name) => name,
        None => {
            warn!(%file_id, "Dropping document with neither id nor stored filename");
            return None;
        }
    };
    let id = raw_id
        .and_then(|id| DocumentId::parse(id).ok())
        .or_else(|| DocumentId::parse(stored_filename.clone()).ok())?;

    let original_name = text(raw.originalname);
    let name = text(raw.name)
        .or_else(|| text(raw.file_name))
        .or_else(|| original_name.clone())
        .unwrap_or_else(|| DocumentType::General.label().to_string());

    let document_type = text(raw.document_type)
        .and_then(|label| DocumentType::from_label(&label))
        .unwrap_or_default();

    let uploaded_at = text(raw.uploaded_date)
        .or_else(|| text(raw.created_at))
        .and_then(|ts| parse_timestamp(&ts))
        .unwrap_or(fallback_date);

    let size = raw.size.as_ref().and_then(Value::as_u64).unwrap_or(0);
    let media_type = text(raw.mimetype).unwrap_or_else(|| UNKNOWN_MEDIA_TYPE.to_string());

    Some(DocumentRecord {
        id,
        original_name: original_name.unwrap_or_else(|| name.clone()),
        name,
        document_type,
        path: public_path(&stored_filename),
        stored_filename,
        uploaded_at,
        size,
        media_type,
    })
}

/// Trimmed text of a string or number; blank and other JSON types are absent
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => normalize_text(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}
