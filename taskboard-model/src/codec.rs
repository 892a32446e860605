//! Encoding of [`PersistedState`] records.
//!
//! Two formats are supported: pretty JSON, which matches the camelCase
//! layout the browser client stored, and compact postcard binary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseEnumError;
use crate::state::{PERSISTED_STATE_VERSION, PersistedState};

/// Error type for record encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Binary serialization or deserialization failed.
    #[error("binary error: {0}")]
    Binary(String),
    /// The record was written by a newer format version.
    #[error("unsupported record version {found} (max supported {supported})")]
    UnsupportedVersion {
        /// Version found in the record.
        found: u32,
        /// Highest version this build reads.
        supported: u32,
    },
}

/// On-disk format of a persisted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Binary,
}

impl Format {
    /// File extension used for records in this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "bin",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for Format {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "binary" | "bin" | "postcard" => Ok(Self::Binary),
            _ => Err(ParseEnumError {
                kind: "format",
                value: s.to_string(),
                expected: "json, binary",
            }),
        }
    }
}

/// Encodes a record in the given format.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn encode(format: Format, record: &PersistedState) -> Result<Vec<u8>, CodecError> {
    match format {
        Format::Json => Ok(serde_json::to_vec_pretty(record)?),
        Format::Binary => {
            postcard::to_allocvec(record).map_err(|e| CodecError::Binary(e.to_string()))
        }
    }
}

/// Decodes a record in the given format and checks its version.
///
/// # Errors
///
/// Returns [`CodecError`] if the bytes are malformed or the record was
/// written by a newer version.
pub fn decode(format: Format, bytes: &[u8]) -> Result<PersistedState, CodecError> {
    let record: PersistedState = match format {
        Format::Json => serde_json::from_slice(bytes)?,
        Format::Binary => {
            postcard::from_bytes(bytes).map_err(|e| CodecError::Binary(e.to_string()))?
        }
    };
    if record.version > PERSISTED_STATE_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: record.version,
            supported: PERSISTED_STATE_VERSION,
        });
    }
    Ok(record)
}
