//! Document records and upload policy

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::DocumentId;
use crate::error::CaseFileError;

/// URL prefix under which stored binaries are served
pub const PUBLIC_UPLOADS_PREFIX: &str = "/uploads";

/// Default maximum upload size (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Media types accepted for upload
pub const ALLOWED_MEDIA_TYPES: [&str; 8] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Kind of paperwork an attachment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    /// Accident report signed by both parties
    #[serde(rename = "Kaza Tespit Tutanağı")]
    AccidentReport,
    #[serde(rename = "Araç Fotoğrafları")]
    VehiclePhotos,
    /// Vehicle registration copies
    #[serde(rename = "Ruhsat Fotokopileri")]
    RegistrationCopies,
    #[serde(rename = "Kimlik Fotokopileri")]
    IdentityCopies,
    /// Loss adjuster's appraisal
    #[serde(rename = "Ekspertiz Raporu")]
    ExpertReport,
    #[serde(rename = "Vekaletname")]
    PowerOfAttorney,
    #[serde(rename = "Hasar Onarım Faturası")]
    RepairInvoice,
    /// Any attachment outside the required catalog
    #[default]
    #[serde(rename = "Belge")]
    General,
}

impl DocumentType {
    pub const ALL: [DocumentType; 8] = [
        DocumentType::AccidentReport,
        DocumentType::VehiclePhotos,
        DocumentType::RegistrationCopies,
        DocumentType::IdentityCopies,
        DocumentType::ExpertReport,
        DocumentType::PowerOfAttorney,
        DocumentType::RepairInvoice,
        DocumentType::General,
    ];

    /// Returns the persisted label
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::AccidentReport => "Kaza Tespit Tutanağı",
            DocumentType::VehiclePhotos => "Araç Fotoğrafları",
            DocumentType::RegistrationCopies => "Ruhsat Fotokopileri",
            DocumentType::IdentityCopies => "Kimlik Fotokopileri",
            DocumentType::ExpertReport => "Ekspertiz Raporu",
            DocumentType::PowerOfAttorney => "Vekaletname",
            DocumentType::RepairInvoice => "Hasar Onarım Faturası",
            DocumentType::General => "Belge",
        }
    }

    /// Looks a type up by its persisted label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = CaseFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .ok_or_else(|| CaseFileError::validation(format!("unknown document type '{}'", s)))
    }
}

/// Metadata and stored-file reference for one uploaded attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    /// Display name
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    /// Server-assigned unique filename in the uploads directory
    #[serde(rename = "filename")]
    pub stored_filename: String,
    /// Filename as sent by the client
    #[serde(rename = "originalname")]
    pub original_name: String,
    /// Public path of the stored binary
    pub path: String,
    #[serde(rename = "uploadedDate")]
    pub uploaded_at: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
    #[serde(rename = "mimetype")]
    pub media_type: String,
}

impl DocumentRecord {
    /// Creates the record for a binary that has just been stored
    pub fn new(metadata: DocumentMetadata, stored_filename: impl Into<String>, size: u64) -> Self {
        let stored_filename = stored_filename.into();
        Self {
            id: DocumentId::generate(),
            name: metadata.original_name.clone(),
            document_type: metadata.document_type,
            path: public_path(&stored_filename),
            stored_filename,
            original_name: metadata.original_name,
            uploaded_at: Utc::now(),
            size,
            media_type: metadata.media_type,
        }
    }

    /// True when both records name the same document or the same stored binary
    pub fn shares_identity(&self, other: &DocumentRecord) -> bool {
        self.id == other.id || self.stored_filename == other.stored_filename
    }
}

/// Public path of a stored binary
pub fn public_path(stored_filename: &str) -> String {
    format!("{}/{}", PUBLIC_UPLOADS_PREFIX, stored_filename)
}

/// What the client told us about an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub original_name: String,
    pub document_type: DocumentType,
    pub media_type: String,
}

impl DocumentMetadata {
    pub fn new(
        original_name: impl Into<String>,
        document_type: DocumentType,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            document_type,
            media_type: normalize_media_type(&media_type.into()),
        }
    }
}

/// Strips parameters and lower-cases a media type
///
/// `"Image/JPEG; charset=binary"` becomes `"image/jpeg"`.
pub fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
        .to_ascii_lowercase()
}

/// Limits applied to uploads before anything is stored
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub allowed_media_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_media_types: ALLOWED_MEDIA_TYPES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    /// Policy with the default media allowlist and a custom size limit
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            ..Default::default()
        }
    }

    /// Rejects empty, oversized, or disallowed uploads
    pub fn check(&self, media_type: &str, size: usize) -> Result<(), CaseFileError> {
        if size == 0 {
            return Err(CaseFileError::validation("no file selected"));
        }
        if size > self.max_bytes {
            return Err(CaseFileError::PayloadTooLarge { max_bytes: self.max_bytes });
        }

        let normalized = normalize_media_type(media_type);
        if !self.allowed_media_types.iter().any(|m| m.eq_ignore_ascii_case(&normalized)) {
            return Err(CaseFileError::UnsupportedMedia(normalized));
        }
        Ok(())
    }
}
