use crate::error::MetadataError;
use roxmltree::{Document, Node};
use serde_json::{Map, Value};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Technical and descriptive metadata embedded in a source image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Decoded EXIF directory tree.
    pub exif: Option<Value>,
    /// IPTC IIM data sets.
    pub iptc: Vec<Value>,
    /// Raw XMP packet.
    pub xmp: Option<String>,
    /// Format-specific metadata that has no standard home.
    pub native: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.exif.is_none() && self.iptc.is_empty() && self.xmp.is_none() && self.native.is_none()
    }

    /// Encodes the metadata into its document form.
    ///
    /// The XMP packet is parsed before it is accepted. A packet that is not
    /// well-formed fails with [`MetadataError::MalformedXmp`]; one with an
    /// `rdf:RDF` element nested inside other RDF content fails with
    /// [`MetadataError::UnsupportedRootElement`]. Any wrapper around the
    /// outermost `rdf:RDF`, such as `x:xmpmeta` or `x:xapmeta`, is accepted.
    pub fn encode(&self) -> Result<Value, MetadataError> {
        if let Some(xmp) = &self.xmp {
            check_xmp(xmp)?;
        }
        let mut encoded = Map::new();
        if let Some(exif) = &self.exif {
            encoded.insert("exif".into(), exif.clone());
        }
        if !self.iptc.is_empty() {
            encoded.insert("iptc".into(), Value::Array(self.iptc.clone()));
        }
        if let Some(xmp) = &self.xmp {
            encoded.insert("xmp".into(), Value::String(xmp.clone()));
        }
        if let Some(native) = &self.native {
            encoded.insert("nativeMetadata".into(), Value::String(native.clone()));
        }
        Ok(Value::Object(encoded))
    }
}

fn check_xmp(xmp: &str) -> Result<(), MetadataError> {
    let doc = Document::parse(xmp)?;
    for node in doc.descendants().filter(|n| is_element(n, RDF_NS, "RDF")) {
        let inside_rdf = node
            .ancestors()
            .skip(1)
            .any(|a| a.is_element() && a.tag_name().namespace() == Some(RDF_NS));
        if let (true, Some(parent)) = (inside_rdf, node.parent_element()) {
            return Err(MetadataError::UnsupportedRootElement {
                element: qualified_name(&node),
                parent: qualified_name(&parent),
            });
        }
    }
    Ok(())
}

fn is_element(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(namespace)
        && node.tag_name().name() == name
}

fn qualified_name(node: &Node) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|ns| node.lookup_prefix(ns)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, tag.name()),
        _ => tag.name().to_string(),
    }
}
