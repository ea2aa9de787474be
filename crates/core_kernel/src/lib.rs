//! Core Kernel - Foundational types for the case file tracker
//!
//! This crate provides the building blocks shared by every other crate:
//! - Opaque, strongly-typed identifiers for case files and documents
//! - Port contracts (errors, health checks) used by the hexagonal layers
//! - Normalisation helpers for free-text and calendar-date form fields

pub mod identifiers;
pub mod ports;
pub mod fields;
pub mod error;

pub use identifiers::{CaseFileId, DocumentId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
pub use fields::{normalize_text, parse_calendar_date};
pub use error::CoreError;
