//! Cut, copy, paste and clipboard change notifications

mod common;

use common::{Harness, assets_fixture};
use content_project::{Clipboard, ErrorKind, ErrorPolicy};
use content_test_utils::DiskOp;
use pretty_assertions::assert_eq;

const PROPAGATE: ErrorPolicy = ErrorPolicy::Propagate;

fn cut_nodes(h: &Harness) -> Vec<String> {
    h.project
        .tree()
        .iter()
        .filter(|(_, node)| node.is_cut())
        .map(|(id, _)| h.project.path_of(id).unwrap().to_string())
        .collect()
}

#[test]
fn second_cut_replaces_the_first() {
    let mut h = Harness::open(assets_fixture());

    h.project.cut("assets/foo.png").unwrap();
    h.project.cut("assets/dir").unwrap();

    assert_eq!(cut_nodes(&h), vec!["assets/dir"]);
    assert_eq!(h.project.cut_node(), Some(h.id("assets/dir")));
}

#[test]
fn copy_clears_any_cut() {
    let mut h = Harness::open(assets_fixture());

    h.project.cut("assets/foo.png").unwrap();
    h.project.copy("assets/dir").unwrap();

    assert!(cut_nodes(&h).is_empty());
    assert_eq!(h.project.cut_node(), None);
    assert_eq!(
        h.clipboard.file_drop_list(),
        Some(vec![h.fixture.path("assets/dir")])
    );
}

#[test]
fn foreign_clipboard_content_cancels_the_cut() {
    let mut h = Harness::open(assets_fixture());
    h.project.cut("assets/foo.png").unwrap();

    h.project.on_clipboard_changed();
    assert_eq!(cut_nodes(&h), vec!["assets/foo.png"]);

    h.clipboard.set_file_drop_list(&["/elsewhere/thing.png".into()]);
    h.project.on_clipboard_changed();
    assert!(cut_nodes(&h).is_empty());
    assert_eq!(h.project.cut_node(), None);
}

#[test]
fn paste_after_cut_moves_the_node() {
    let mut h = Harness::open(assets_fixture());
    let id = h.id("assets/foo.png");
    h.project.cut("assets/foo.png").unwrap();

    let pasted = h.project.paste("assets/dir/sub", PROPAGATE).unwrap().unwrap();

    assert_eq!(pasted, vec![id]);
    assert_eq!(h.project.path_of(id).unwrap().as_str(), "assets/dir/sub/foo.png");
    assert!(!h.project.node(id).unwrap().is_cut());
    assert_eq!(h.project.cut_node(), None);
    assert_eq!(h.clipboard.file_drop_list(), None);
    assert_eq!(h.disk.ops(), vec![DiskOp::Rename]);
}

#[test]
fn pasting_a_cut_folder_into_itself_fails() {
    let mut h = Harness::open(assets_fixture());
    h.project.cut("assets/dir").unwrap();

    let err = h.project.paste("assets/dir", PROPAGATE).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfSubdirectory);
    assert!(err.to_string().contains("into itself"));

    let err = h.project.paste("assets/dir/sub", PROPAGATE).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfSubdirectory);
    assert!(h.disk.calls().is_empty());
    assert_eq!(h.project.cut_node(), Some(h.id("assets/dir")));
}

#[test]
fn paste_after_copy_in_same_folder_duplicates() {
    let mut h = Harness::open(assets_fixture());
    h.project.copy("assets/foo.png").unwrap();

    let pasted = h.project.paste("assets", PROPAGATE).unwrap().unwrap();

    assert_eq!(pasted.len(), 1);
    assert_eq!(h.project.path_of(pasted[0]).unwrap().as_str(), "assets/foo - Copy.png");
    h.fixture.assert_file_exists("assets/foo - Copy.png");

    h.project.paste("assets", PROPAGATE).unwrap();
    assert!(h.project.contains("assets/foo - Copy (2).png"));
}

#[test]
fn paste_after_copy_into_other_folder_includes() {
    let mut h = Harness::open(assets_fixture());
    h.project.copy("assets/foo.png").unwrap();

    h.project.paste("assets/dir", PROPAGATE).unwrap();

    assert!(h.project.contains("assets/dir/foo.png"));
    assert!(h.project.contains("assets/foo.png"));
    assert_eq!(h.fixture.read("assets/dir/foo.png"), "png");
}

#[test]
fn paste_with_empty_clipboard_does_nothing() {
    let mut h = Harness::open(assets_fixture());
    let pasted = h.project.paste("assets", PROPAGATE).unwrap();
    assert_eq!(pasted, Some(Vec::new()));
    assert!(h.disk.calls().is_empty());
}

#[test]
fn excluding_the_cut_node_clears_the_cut() {
    let mut h = Harness::open(assets_fixture());
    h.project.cut("assets/dir/sub").unwrap();

    h.project.exclude("assets/dir", PROPAGATE).unwrap();

    assert_eq!(h.project.cut_node(), None);
}
