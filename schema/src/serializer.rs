use crate::error::{MetadataError, Result, SerializeError};
use crate::info::Info;
use crate::version::{BuildVersion, SerializationVersion, VersionProvider};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::io::Write;

pub const APPLICATION_VERSION_KEY: &str = "applicationVersion";
pub const SERIALIZATION_VERSION_KEY: &str = "serializationVersion";
pub const IDENTIFIER_KEY: &str = "identifier";
pub const MEDIA_TYPE_KEY: &str = "mediaType";
pub const NUM_RESOLUTIONS_KEY: &str = "numResolutions";
pub const IMAGES_KEY: &str = "images";
pub const METADATA_KEY: &str = "metadata";

/// Turns an [`Info`] into its cache document.
///
/// Every document is stamped with the current application and serialization
/// versions, whatever versions the Info itself was read with.
#[derive(Debug, Clone, Default)]
pub struct InfoSerializer<V = BuildVersion> {
    versions: V,
}

/// Ordered view of one Info, ready to be written.
struct Document<'a> {
    application_version: &'a str,
    info: &'a Info,
    metadata: Option<Value>,
}

impl<V: VersionProvider> InfoSerializer<V> {
    pub fn new(versions: V) -> Self {
        Self { versions }
    }

    /// Writes the document for `info` into `writer`.
    ///
    /// On error the writer may hold a partial document, which must be discarded.
    pub fn serialize<W: Write>(&self, info: &Info, writer: W) -> Result<()> {
        let document = self.document(info)?;
        serde_json::to_writer(writer, &document).map_err(from_json)
    }

    pub fn serialize_pretty<W: Write>(&self, info: &Info, writer: W) -> Result<()> {
        let document = self.document(info)?;
        serde_json::to_writer_pretty(writer, &document).map_err(from_json)
    }

    pub fn to_vec(&self, info: &Info) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.serialize(info, &mut buf)?;
        Ok(buf)
    }

    pub fn to_string(&self, info: &Info) -> Result<String> {
        let document = self.document(info)?;
        Ok(serde_json::to_string(&document)?)
    }

    pub fn to_value(&self, info: &Info) -> Result<Value> {
        let document = self.document(info)?;
        Ok(serde_json::to_value(&document)?)
    }

    fn document<'a>(&'a self, info: &'a Info) -> Result<Document<'a>> {
        if !info.is_consistent() {
            return Err(SerializeError::ResolutionMismatch {
                declared: info.num_resolutions(),
                actual: info.images().len(),
            });
        }

        let metadata = match info.metadata().map(|m| m.encode()).transpose() {
            Ok(metadata) => metadata,
            Err(MetadataError::UnsupportedRootElement { element, parent }) => {
                log::warn!(
                    "Ignoring metadata of {}: {} is not allowed as an element tag inside {}",
                    info.identifier()
                        .map(|i| i.as_str())
                        .unwrap_or("unidentified image"),
                    element,
                    parent
                );
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Document {
            application_version: self.versions.application_version(),
            info,
            metadata,
        })
    }
}

impl Serialize for Document<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let info = self.info;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(APPLICATION_VERSION_KEY, self.application_version)?;
        map.serialize_entry(SERIALIZATION_VERSION_KEY, &SerializationVersion::CURRENT)?;
        if let Some(identifier) = info.identifier() {
            map.serialize_entry(IDENTIFIER_KEY, identifier)?;
        }
        if let Some(media_type) = info.media_type() {
            map.serialize_entry(MEDIA_TYPE_KEY, media_type)?;
        }
        map.serialize_entry(NUM_RESOLUTIONS_KEY, &info.num_resolutions())?;
        map.serialize_entry(IMAGES_KEY, info.images())?;
        if let Some(metadata) = &self.metadata {
            map.serialize_entry(METADATA_KEY, metadata)?;
        }
        map.end()
    }
}

fn from_json(e: serde_json::Error) -> SerializeError {
    if e.is_io() {
        SerializeError::Io(e.into())
    } else {
        SerializeError::Json(e)
    }
}
