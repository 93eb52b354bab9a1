use crate::media_type::MediaType;
use crate::metadata::Metadata;
use crate::version::SerializationVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token naming a source image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dimensions and tile geometry of one resolution level.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "tileWidth")]
    pub tile_width: u32,
    #[serde(rename = "tileHeight")]
    pub tile_height: u32,
}

impl Image {
    /// An untiled level, where the single tile covers the whole image.
    pub fn untiled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tile_width: width,
            tile_height: height,
        }
    }

    pub fn tiled(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
        }
    }
}

/// Cacheable facts about one source image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    identifier: Option<Identifier>,
    media_type: Option<MediaType>,
    num_resolutions: i32,
    images: Vec<Image>,
    metadata: Option<Metadata>,
    // Versions recorded when this Info was read back from a cache.
    serialization_version: Option<SerializationVersion>,
    application_version: Option<String>,
}

impl Info {
    /// Pyramid depth has not been determined.
    pub const UNKNOWN_RESOLUTIONS: i32 = -1;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier(mut self, identifier: impl Into<Identifier>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.push_image(image);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn set_identifier(&mut self, identifier: Option<Identifier>) {
        self.identifier = identifier;
    }

    pub fn media_type(&self) -> Option<&MediaType> {
        self.media_type.as_ref()
    }

    pub fn set_media_type(&mut self, media_type: Option<MediaType>) {
        self.media_type = media_type;
    }

    pub fn num_resolutions(&self) -> i32 {
        self.num_resolutions
    }

    /// Overrides the resolution count, e.g. with [`Info::UNKNOWN_RESOLUTIONS`].
    pub fn set_num_resolutions(&mut self, num_resolutions: i32) {
        self.num_resolutions = num_resolutions;
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Appends the next resolution level. A known resolution count follows
    /// along, saturating at `i32::MAX`; an unknown one stays unknown.
    pub fn push_image(&mut self, image: Image) {
        self.images.push(image);
        if self.num_resolutions != Self::UNKNOWN_RESOLUTIONS {
            self.num_resolutions = resolution_count(self.images.len());
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Option<Metadata>) {
        self.metadata = metadata;
    }

    pub fn serialization_version(&self) -> Option<SerializationVersion> {
        self.serialization_version
    }

    pub fn set_serialization_version(&mut self, version: Option<SerializationVersion>) {
        self.serialization_version = version;
    }

    pub fn application_version(&self) -> Option<&str> {
        self.application_version.as_deref()
    }

    pub fn set_application_version(&mut self, version: Option<String>) {
        self.application_version = version;
    }

    /// Whether the resolution count agrees with the images present.
    pub fn is_consistent(&self) -> bool {
        self.num_resolutions == Self::UNKNOWN_RESOLUTIONS
            || usize::try_from(self.num_resolutions).ok() == Some(self.images.len())
    }
}

fn resolution_count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_image_tracks_count() {
        let info = Info::new()
            .with_image(Image::untiled(100, 80))
            .with_image(Image::untiled(50, 40));
        assert_eq!(info.num_resolutions(), 2);
        assert!(info.is_consistent());
    }

    #[test]
    fn resolution_count_saturates() {
        assert_eq!(resolution_count(3), 3);
        assert_eq!(resolution_count(i32::MAX as usize), i32::MAX);
        assert_eq!(resolution_count(i32::MAX as usize + 1), i32::MAX);
    }

    #[test]
    fn unknown_count_stays_unknown() {
        let mut info = Info::new();
        info.set_num_resolutions(Info::UNKNOWN_RESOLUTIONS);
        info.push_image(Image::untiled(100, 80));
        assert_eq!(info.num_resolutions(), Info::UNKNOWN_RESOLUTIONS);
        assert!(info.is_consistent());
    }

    #[test]
    fn mismatched_count_is_inconsistent() {
        let mut info = Info::new().with_image(Image::untiled(100, 80));
        info.set_num_resolutions(3);
        assert!(!info.is_consistent());
        info.set_num_resolutions(-7);
        assert!(!info.is_consistent());
    }

    #[test]
    fn media_type_can_arrive_later() {
        let mut info = Info::new().with_identifier("img-1");
        assert!(info.media_type().is_none());
        info.set_media_type(Some(MediaType::PNG.parse().unwrap()));
        assert_eq!(info.media_type().unwrap().as_str(), "image/png");
        assert_eq!(info.identifier().unwrap().as_str(), "img-1");
    }

    #[test]
    fn image_field_names() {
        assert_eq!(
            serde_json::to_value(Image::tiled(1024, 768, 256, 128)).unwrap(),
            json!({"width": 1024, "height": 768, "tileWidth": 256, "tileHeight": 128})
        );
    }
}
