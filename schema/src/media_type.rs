use crate::error::MediaTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `type/subtype` MIME type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct MediaType(String);

impl MediaType {
    pub const JPEG: &'static str = "image/jpeg";
    pub const PNG: &'static str = "image/png";
    pub const TIFF: &'static str = "image/tiff";
    pub const JP2: &'static str = "image/jp2";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn subtype(&self) -> &str {
        self.0.split_once('/').map(|(_, s)| s).unwrap_or_default()
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.split_once('/') {
            Some(("", _)) => Err(MediaTypeError::MissingType(s.to_string())),
            Some((_, "")) | None => Err(MediaTypeError::MissingSubtype(s.to_string())),
            Some(_) => Ok(Self(value)),
        }
    }
}

impl TryFrom<String> for MediaType {
    type Error = MediaTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        media_type.0
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
