//! Content-type registry
//!
//! The single table of per-type behavior: which extensions map to which
//! type, the default build pipeline of each type, and whether it compiles.

use content_fs::NormalizedPath;
use content_manifest::entry::{COPY_TO_OUTPUT, IMPORTER, NAME, PROCESSOR};
use content_manifest::{CopyToOutput, ElementKind, ManifestEntry};
use std::fmt;

/// Classification of a content node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentType {
    Folder,
    Script,
    Image,
    Sound,
    Shader,
    SpriteFont,
    Unknown,
}

/// What a content type does by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    pub label: &'static str,
    pub element: ElementKind,
    pub importer: Option<&'static str>,
    pub processor: Option<&'static str>,
    /// Whether the external asset compiler handles this type at all
    pub compiles: bool,
    /// Copy policy written for newly created nodes
    pub copy_to_output: CopyToOutput,
}

const BEHAVIORS: [Behavior; 7] = [
    Behavior {
        label: "folder",
        element: ElementKind::Folder,
        importer: None,
        processor: None,
        compiles: false,
        copy_to_output: CopyToOutput::Never,
    },
    Behavior {
        label: "script",
        element: ElementKind::Compile,
        importer: None,
        processor: None,
        compiles: true,
        copy_to_output: CopyToOutput::Never,
    },
    Behavior {
        label: "image",
        element: ElementKind::Compile,
        importer: Some("TextureImporter"),
        processor: Some("TextureProcessor"),
        compiles: true,
        copy_to_output: CopyToOutput::Never,
    },
    Behavior {
        label: "sound",
        element: ElementKind::Compile,
        importer: Some("WavImporter"),
        processor: Some("SoundEffectProcessor"),
        compiles: true,
        copy_to_output: CopyToOutput::Never,
    },
    Behavior {
        label: "shader",
        element: ElementKind::Compile,
        importer: Some("EffectImporter"),
        processor: Some("EffectProcessor"),
        compiles: true,
        copy_to_output: CopyToOutput::Never,
    },
    Behavior {
        label: "font",
        element: ElementKind::Compile,
        importer: Some("FontDescriptionImporter"),
        processor: Some("FontDescriptionProcessor"),
        compiles: true,
        copy_to_output: CopyToOutput::Never,
    },
    Behavior {
        label: "unknown",
        element: ElementKind::None,
        importer: None,
        processor: None,
        compiles: false,
        copy_to_output: CopyToOutput::PreserveNewest,
    },
];

impl ContentType {
    /// Manifest emission order.
    pub const ORDERED: [ContentType; 7] = [
        Self::Folder,
        Self::Script,
        Self::Image,
        Self::Sound,
        Self::Shader,
        Self::SpriteFont,
        Self::Unknown,
    ];

    /// Type of a file with the given extension (without the dot).
    pub fn classify(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "conscript" => Self::Script,
            "png" | "jpg" | "gif" => Self::Image,
            "wav" => Self::Sound,
            "fx" => Self::Shader,
            "spritefont" => Self::SpriteFont,
            _ => Self::Unknown,
        }
    }

    /// Type of a file, judged by its name.
    pub fn for_file_name(name: &str) -> Self {
        NormalizedPath::new(name)
            .extension()
            .map(Self::classify)
            .unwrap_or(Self::Unknown)
    }

    pub fn behavior(&self) -> &'static Behavior {
        &BEHAVIORS[*self as usize]
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.behavior().label)
    }
}

/// `(type, default importer, default processor)` for an extension.
pub fn classify(extension: &str) -> (ContentType, Option<&'static str>, Option<&'static str>) {
    let content_type = ContentType::classify(extension);
    let behavior = content_type.behavior();
    (content_type, behavior.importer, behavior.processor)
}

/// Manifest metadata for a node created by the editor.
///
/// `Include` is left unset; it is derived from the node's position on save.
pub fn new_entry(content_type: ContentType, name: &str) -> ManifestEntry {
    let behavior = content_type.behavior();
    let mut entry = ManifestEntry::new(behavior.element);
    if content_type.is_folder() {
        return entry;
    }
    if let Some(stem) = NormalizedPath::new(name).file_stem() {
        entry.set_metadata(NAME, stem);
    }
    apply_pipeline(&mut entry, behavior);
    if behavior.copy_to_output.copies() {
        entry.set_metadata(COPY_TO_OUTPUT, behavior.copy_to_output.as_str());
    }
    entry
}

/// Point `entry` at the default pipeline of `content_type`.
pub(crate) fn reset_pipeline(entry: &mut ManifestEntry, content_type: ContentType) {
    let behavior = content_type.behavior();
    entry.set_kind(behavior.element);
    entry.remove_metadata(IMPORTER);
    entry.remove_metadata(PROCESSOR);
    apply_pipeline(entry, behavior);
}

fn apply_pipeline(entry: &mut ManifestEntry, behavior: &Behavior) {
    if let Some(importer) = behavior.importer {
        entry.set_metadata(IMPORTER, importer);
    }
    if let Some(processor) = behavior.processor {
        entry.set_metadata(PROCESSOR, processor);
    }
}

/// Whether the asset compiler should build this node.
///
/// A node redirected to a different importer or processor than its type's
/// default is built by someone else and must not be compiled here.
pub fn should_compile(content_type: ContentType, entry: &ManifestEntry) -> bool {
    let behavior = content_type.behavior();
    behavior.compiles
        && entry.importer() == behavior.importer
        && entry.processor() == behavior.processor
}

pub fn should_copy_to_output(entry: &ManifestEntry) -> bool {
    entry.copy_to_output().copies()
}
