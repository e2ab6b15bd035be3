//! End-to-end flow across all three crates
//!
//! create project -> include -> save -> reparse manifest -> reopen

use content_fs::NormalizedPath;
use content_manifest::{ElementKind, Manifest};
use content_project::{ContentProject, ContentType, ErrorPolicy};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_create_include_save_reopen() {
    let temp = TempDir::new().unwrap();
    let manifest_path = NormalizedPath::new(temp.path().join("Game/Content/Content.contentproj"));
    let incoming = temp.path().join("hero.png");
    fs::write(&incoming, "png").unwrap();

    let mut project = ContentProject::headless();
    project.create(manifest_path.clone()).unwrap();
    project.new_folder("", Some("gfx"), ErrorPolicy::Propagate).unwrap();
    project
        .include(NormalizedPath::new(&incoming), "gfx", ErrorPolicy::Propagate)
        .unwrap();
    project.save_manifest().unwrap();

    // The manifest codec sees exactly the file; the folder is implied
    let manifest = Manifest::load(&manifest_path).unwrap();
    let entries = manifest.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind(), ElementKind::Compile);
    assert_eq!(entries[0].include(), Some(r"gfx\hero.png"));
    assert_eq!(entries[0].name(), Some("hero"));

    let mut reopened = ContentProject::headless();
    let report = reopened.load_manifest(manifest_path).unwrap();
    assert_eq!(report.created, 2);
    assert!(report.missing.is_empty());
    let hero = reopened.get("gfx/hero.png").unwrap();
    assert_eq!(hero.content_type(), ContentType::Image);
    assert!(hero.should_compile());
}

#[test]
fn test_disk_layout_follows_tree() {
    let temp = TempDir::new().unwrap();
    let manifest_path = NormalizedPath::new(temp.path().join("Content.contentproj"));
    let mut project = ContentProject::headless();
    project.create(manifest_path).unwrap();

    project.new_folder("", Some("levels"), ErrorPolicy::Propagate).unwrap();
    project.new_file("levels", Some("intro.conscript"), ErrorPolicy::Propagate).unwrap();
    project.new_folder("", Some("archive"), ErrorPolicy::Propagate).unwrap();
    project.move_node("levels", "archive", ErrorPolicy::Propagate).unwrap();
    project.rename("archive", "old", ErrorPolicy::Propagate).unwrap();

    assert!(temp.path().join("old/levels/intro.conscript").is_file());
    let id = project.find("old/levels/intro.conscript").unwrap();
    assert_eq!(
        project.disk_path_of(id).unwrap(),
        NormalizedPath::new(temp.path().join("old/levels/intro.conscript"))
    );
}
