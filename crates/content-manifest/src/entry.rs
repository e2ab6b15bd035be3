//! Per-node manifest metadata

use crate::xml::{XmlElement, XmlNode};
use std::fmt;
use std::str::FromStr;

pub const INCLUDE: &str = "Include";
pub const NAME: &str = "Name";
pub const IMPORTER: &str = "Importer";
pub const PROCESSOR: &str = "Processor";
pub const COPY_TO_OUTPUT: &str = "CopyToOutputDirectory";

/// The element name a content item is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    None,
    Compile,
    Content,
    Folder,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [Self::None, Self::Compile, Self::Content, Self::Folder];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Compile => "Compile",
            Self::Content => "Content",
            Self::Folder => "Folder",
        }
    }

    pub fn from_element_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `CopyToOutputDirectory` metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyToOutput {
    #[default]
    Never,
    PreserveNewest,
    Always,
}

impl CopyToOutput {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::PreserveNewest => "PreserveNewest",
            Self::Always => "Always",
        }
    }

    pub fn copies(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

impl FromStr for CopyToOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Never" | "" => Ok(Self::Never),
            "PreserveNewest" => Ok(Self::PreserveNewest),
            "Always" => Ok(Self::Always),
            other => Err(format!("unknown copy policy '{other}'")),
        }
    }
}

/// Serializable metadata of one content item.
///
/// Attributes and child metadata keep their document order. Metadata
/// elements are held whole, so their attributes (`Condition`, ...), nested
/// elements and interleaved comments are written back exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    kind: ElementKind,
    attributes: Vec<(String, String)>,
    metadata: Vec<XmlNode>,
}

impl ManifestEntry {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            metadata: Vec::new(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ElementKind) {
        self.kind = kind;
    }

    /// The raw `Include` attribute, separators as written.
    pub fn include(&self) -> Option<&str> {
        self.attribute(INCLUDE)
    }

    pub fn set_include(&mut self, include: impl Into<String>) {
        self.set_attribute(INCLUDE, include);
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Text of the first metadata element named `key`. `None` when absent
    /// or when the element holds more than plain text.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata_element(key)?.leaf_text()
    }

    pub fn metadata_element(&self, key: &str) -> Option<&XmlElement> {
        self.metadata_elements().find(|el| el.name == key)
    }

    /// Replace the content of the `key` element with `value`, keeping its
    /// attributes and position, or append a new element.
    pub fn set_metadata(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let existing = self.metadata.iter_mut().find_map(|node| match node {
            XmlNode::Element(el) if el.name == key => Some(el),
            _ => None,
        });
        match existing {
            Some(el) => el.children = vec![XmlNode::Text(value)],
            None => self
                .metadata
                .push(XmlNode::Element(XmlElement::new(key).with_text(value))),
        }
    }

    /// Remove the `key` element, returning its text.
    pub fn remove_metadata(&mut self, key: &str) -> Option<String> {
        let pos = self
            .metadata
            .iter()
            .position(|node| matches!(node, XmlNode::Element(el) if el.name == key))?;
        match self.metadata.remove(pos) {
            XmlNode::Element(el) => Some(el.text()),
            _ => None,
        }
    }

    /// Metadata elements in document order, comments skipped.
    pub fn metadata_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.metadata.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata(NAME)
    }

    pub fn importer(&self) -> Option<&str> {
        self.metadata(IMPORTER)
    }

    pub fn processor(&self) -> Option<&str> {
        self.metadata(PROCESSOR)
    }

    /// Unknown policy strings read as [`CopyToOutput::Never`].
    pub fn copy_to_output(&self) -> CopyToOutput {
        self.metadata(COPY_TO_OUTPUT)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// Build an entry from a content element, or `None` when the element is
    /// not one (wrong name, or no `Include`).
    pub fn from_element(element: &XmlElement) -> Option<Self> {
        let kind = ElementKind::from_element_name(&element.name)?;
        element.attribute(INCLUDE)?;

        let metadata = element
            .children
            .iter()
            .filter(|node| !matches!(node, XmlNode::Text(_)))
            .cloned()
            .collect();
        Some(Self {
            kind,
            attributes: element.attributes.clone(),
            metadata,
        })
    }

    pub fn to_element(&self) -> XmlElement {
        XmlElement {
            name: self.kind.as_str().to_string(),
            attributes: self.attributes.clone(),
            children: self.metadata.clone(),
        }
    }
}
