//! Cached image Info and the versioned document it is stored as.
//!
//! An [`Info`] describes one source image: its identifier, media type, the
//! resolution levels of its pyramid and any embedded metadata. The
//! [`InfoSerializer`] writes it out as a JSON object whose field order and
//! shape are fixed by [`SerializationVersion::CURRENT`].

mod error;
mod info;
mod media_type;
mod metadata;
mod serializer;
mod version;

pub use error::{MediaTypeError, MetadataError, Result, SerializeError, VersionError};
pub use info::{Identifier, Image, Info};
pub use media_type::MediaType;
pub use metadata::Metadata;
pub use serializer::{
    InfoSerializer, APPLICATION_VERSION_KEY, IDENTIFIER_KEY, IMAGES_KEY, MEDIA_TYPE_KEY,
    METADATA_KEY, NUM_RESOLUTIONS_KEY, SERIALIZATION_VERSION_KEY,
};
pub use version::{BuildVersion, SerializationVersion, VersionProvider};
