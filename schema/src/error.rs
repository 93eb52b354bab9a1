/// Errors raised while encoding the embedded metadata of an Info.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The XMP packet places `rdf:RDF` somewhere the metadata encoder does not
    /// accept it. Serialization recovers from this one by leaving the metadata out.
    #[error("{element} is not allowed as an element tag inside {parent}")]
    UnsupportedRootElement { element: String, parent: String },

    #[error("malformed XMP: {0}")]
    MalformedXmp(#[from] roxmltree::Error),
}

/// Errors that abort serialization of an Info.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("numResolutions is {declared} but {actual} images are present")]
    ResolutionMismatch { declared: i32, actual: usize },

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("media type is missing a subtype: {0}")]
    MissingSubtype(String),

    #[error("media type is missing a type: {0}")]
    MissingType(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("unknown serialization version: {0}")]
    Unknown(u64),

    #[error("serializationVersion is not a version number: {0}")]
    Invalid(serde_json::Value),

    #[error("document is not an object")]
    NotAnObject,
}

/// Convenience alias for serialization results.
pub type Result<T> = std::result::Result<T, SerializeError>;
