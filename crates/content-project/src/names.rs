//! Node name validation and generation

use crate::{Error, Result};
use content_fs::NormalizedPath;

const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Reject names that cannot be used as a file or folder name.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative path marker")
    } else if name.contains(RESERVED) {
        Some("name contains a reserved character")
    } else if name.chars().any(char::is_control) {
        Some("name contains a control character")
    } else if name.ends_with(' ') || name.ends_with('.') {
        Some("name ends with a space or dot")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// First of `base`, `base (2)`, `base (3)`... that is not `taken`.
///
/// The counter goes before the extension: `New File (2).txt`.
pub fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let (stem, extension) = split(base);
    numbered(stem, extension, taken)
}

/// Name for a duplicate of `name`: `stem<suffix>.ext`, then
/// `stem<suffix> (2).ext` and so on.
pub fn copy_name(name: &str, suffix: &str, taken: impl Fn(&str) -> bool) -> String {
    let (stem, extension) = split(name);
    numbered(&format!("{stem}{suffix}"), extension, taken)
}

fn numbered(stem: &str, extension: Option<&str>, taken: impl Fn(&str) -> bool) -> String {
    let compose = |counter: usize| {
        let numbered = if counter < 2 {
            stem.to_string()
        } else {
            format!("{stem} ({counter})")
        };
        match extension {
            Some(ext) => format!("{numbered}.{ext}"),
            None => numbered,
        }
    };

    (1..)
        .map(compose)
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| stem.to_string())
}

fn split(name: &str) -> (&str, Option<&str>) {
    let path = NormalizedPath::new(name);
    match path.extension() {
        Some(ext) => (&name[..name.len() - ext.len() - 1], Some(&name[name.len() - ext.len()..])),
        None => (name, None),
    }
}
