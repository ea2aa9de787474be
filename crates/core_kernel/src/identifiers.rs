//! Strongly-typed identifiers for domain entities
//!
//! Identifiers are opaque strings: records written by earlier versions of the
//! system carry timestamp-based ids, so no particular format can be assumed
//! when reading. Newly generated ids are time-ordered UUIDs (v7) in their
//! simple (hyphen-free) form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new time-ordered identifier
            pub fn generate() -> Self {
                Self(Uuid::now_v7().simple().to_string())
            }

            /// Wraps an existing identifier string
            ///
            /// Returns a validation error when the string is blank.
            pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::validation(concat!($label, " id must not be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the entity label used in messages
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_id!(CaseFileId, "Case file");
define_id!(DocumentId, "Document");
