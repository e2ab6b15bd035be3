//! Whole-document manifest model

use crate::entry::ManifestEntry;
use crate::xml::{self, XmlElement, XmlNode};
use crate::{Error, MSBUILD_NAMESPACE, Result};
use content_fs::{DiskIo, NormalizedPath, io};

const PROJECT: &str = "Project";
const ITEM_GROUP: &str = "ItemGroup";

/// One `ItemGroup` worth of content items, emitted in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemGroup {
    pub entries: Vec<ManifestEntry>,
}

impl ItemGroup {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_element(&self) -> XmlElement {
        let mut group = XmlElement::new(ITEM_GROUP);
        for entry in &self.entries {
            group.push(entry.to_element());
        }
        group
    }
}

/// A parsed manifest.
///
/// `shell` is the `Project` element with every content element removed,
/// along with any item group that held nothing else. `slot` is the index in
/// the shell's children where fresh item groups get inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    shell: XmlElement,
    slot: usize,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// A brand-new project with no content.
    pub fn empty(tools_version: &str) -> Self {
        let shell = XmlElement::new(PROJECT)
            .with_attribute("ToolsVersion", tools_version)
            .with_attribute("xmlns", MSBUILD_NAMESPACE);
        Self {
            shell,
            slot: 0,
            entries: Vec::new(),
        }
    }

    pub fn parse(source: &str) -> Result<Self> {
        let root = xml::parse(source)?;
        if root.name != PROJECT {
            return Err(Error::invalid(format!(
                "root element is <{}>, expected <{PROJECT}>",
                root.name
            )));
        }
        match root.attribute("xmlns") {
            Some(MSBUILD_NAMESPACE) => {}
            Some(other) => {
                return Err(Error::invalid(format!("unexpected namespace '{other}'")));
            }
            None => return Err(Error::invalid("missing MSBuild namespace")),
        }

        let XmlElement {
            name,
            attributes,
            children,
        } = root;

        let mut entries = Vec::new();
        let mut kept = Vec::with_capacity(children.len());
        let mut slot = None;

        for child in children {
            let group = match child {
                XmlNode::Element(el) if el.name == ITEM_GROUP => el,
                other => {
                    kept.push(other);
                    continue;
                }
            };

            let before = entries.len();
            let mut rest = Vec::new();
            for node in group.children {
                let entry = match &node {
                    XmlNode::Element(el) => ManifestEntry::from_element(el),
                    _ => None,
                };
                match entry {
                    Some(entry) => entries.push(entry),
                    None => rest.push(node),
                }
            }

            if entries.len() > before && slot.is_none() {
                slot = Some(kept.len());
            }
            let had_content = entries.len() > before;
            if !had_content || !rest.is_empty() {
                kept.push(XmlNode::Element(XmlElement {
                    name: group.name,
                    attributes: group.attributes,
                    children: rest,
                }));
            }
        }

        tracing::debug!(entries = entries.len(), "Parsed manifest");
        Ok(Self {
            slot: slot.unwrap_or(kept.len()),
            shell: XmlElement {
                name,
                attributes,
                children: kept,
            },
            entries,
        })
    }

    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let source = io::read_text(path)?;
        Self::parse(&source)
    }

    /// Content entries in document order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Everything that is not a content element.
    pub fn shell(&self) -> &XmlElement {
        &self.shell
    }

    /// Serialize the shell with `groups` spliced in. Empty groups are skipped.
    pub fn render(&self, groups: &[ItemGroup], indent: usize) -> Result<String> {
        let mut document = self.shell.clone();
        let slot = self.slot.min(document.children.len());
        let fresh = groups
            .iter()
            .filter(|group| !group.is_empty())
            .map(|group| XmlNode::Element(group.to_element()));
        document.children.splice(slot..slot, fresh);
        xml::write(&document, indent)
    }

    /// Write the manifest to `path` through `disk` and adopt `groups` as its
    /// content.
    pub fn save(
        &mut self,
        disk: &dyn DiskIo,
        path: &NormalizedPath,
        groups: Vec<ItemGroup>,
        indent: usize,
    ) -> Result<()> {
        let rendered = self.render(&groups, indent)?;
        disk.write_text(path, &rendered)?;
        self.entries = groups.into_iter().flat_map(|group| group.entries).collect();
        tracing::info!(path = %path, entries = self.entries.len(), "Saved manifest");
        Ok(())
    }
}
