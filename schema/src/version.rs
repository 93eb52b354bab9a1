use crate::error::VersionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape of a serialized Info document. Bumped whenever a field is added,
/// removed or renamed; independent of the application release version.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u64", into = "u64")]
pub enum SerializationVersion {
    /// Dimensions and tile sizes only.
    V1,
    /// Adds `identifier` and `mediaType`.
    V2,
    /// Adds both version fields, `numResolutions` and `metadata`.
    V3,
    /// Metadata gains `nativeMetadata`.
    V4,
}

impl SerializationVersion {
    pub const CURRENT: Self = Self::V4;

    pub fn number(&self) -> u64 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
        }
    }

    /// Works out which format a cached document was written in, so that a
    /// reader can pick a decoding strategy. The document's shape is only
    /// consulted when it carries no `serializationVersion` at all.
    pub fn detect(document: &Value) -> Result<Self, VersionError> {
        let object = document.as_object().ok_or(VersionError::NotAnObject)?;
        if let Some(version) = object.get("serializationVersion") {
            let number = version
                .as_u64()
                .ok_or_else(|| VersionError::Invalid(version.clone()))?;
            return Self::try_from(number);
        }
        if object.contains_key("identifier") {
            Ok(Self::V2)
        } else {
            Ok(Self::V1)
        }
    }
}

impl TryFrom<u64> for SerializationVersion {
    type Error = VersionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            other => Err(VersionError::Unknown(other)),
        }
    }
}

impl From<SerializationVersion> for u64 {
    fn from(version: SerializationVersion) -> Self {
        version.number()
    }
}

/// Supplies the version of the running application.
pub trait VersionProvider {
    fn application_version(&self) -> &str;
}

/// The version this crate was built as.
#[derive(Debug, Default, Copy, Clone)]
pub struct BuildVersion;

impl VersionProvider for BuildVersion {
    fn application_version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}

impl VersionProvider for &str {
    fn application_version(&self) -> &str {
        self
    }
}

impl VersionProvider for String {
    fn application_version(&self) -> &str {
        self
    }
}
