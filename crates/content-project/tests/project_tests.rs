//! Timestamps, compile pass and settings

mod common;

use common::{Harness, assets_fixture};
use content_fs::NormalizedPath;
use content_project::{
    CompileRequest, ContentProject, ContentType, ErrorKind, ErrorPolicy, HeadlessHost, MemoryClipboard,
    ProjectSettings,
};
use content_test_utils::{CountingDisk, DiskOp, TestProject};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::fs::File;
use std::time::{Duration, SystemTime};

fn touch(path: &NormalizedPath, time: SystemTime) {
    File::options()
        .write(true)
        .open(path.to_native())
        .unwrap()
        .set_modified(time)
        .unwrap();
}

#[test]
fn external_edits_are_detected_and_polled() {
    let mut h = Harness::open(assets_fixture());
    let id = h.id("assets/foo.png");
    assert!(!h.project.is_file_outdated(id));

    touch(&h.fixture.path("assets/foo.png"), SystemTime::now() + Duration::from_secs(60));

    assert!(h.project.is_file_outdated(id));
    assert_eq!(h.project.poll_outdated(), vec![id]);
    assert_eq!(h.host.changed(), vec![NormalizedPath::new("assets/foo.png")]);

    h.project.refresh_timestamp(id).unwrap();
    assert!(!h.project.is_file_outdated(id));
}

#[test]
fn manifest_edits_are_detected_and_saving_resets_them() {
    let mut h = Harness::open(assets_fixture());
    assert!(!h.project.is_manifest_outdated());

    touch(&h.fixture.manifest_path(), SystemTime::now() + Duration::from_secs(60));
    assert!(h.project.is_manifest_outdated());

    h.project.save_manifest().unwrap();
    assert!(!h.project.is_manifest_outdated());
}

#[test]
fn compile_pass_skips_redirected_and_unknown_files() {
    let fixture = TestProject::new()
        .with_file("a.png", "a")
        .with_file("b.png", "b")
        .with_file("ai.conscript", "s")
        .with_file("notes.txt", "n")
        .with_manifest(
            r#"<ItemGroup>
    <Compile Include="a.png"><Importer>TextureImporter</Importer><Processor>TextureProcessor</Processor></Compile>
    <Compile Include="b.png"><Importer>TextureImporter</Importer><Processor>NormalMapProcessor</Processor></Compile>
    <Compile Include="ai.conscript" />
    <None Include="notes.txt" />
  </ItemGroup>"#,
        );
    let h = Harness::open(fixture);
    let seen = RefCell::new(Vec::new());
    let compiler = |request: &CompileRequest| -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        seen.borrow_mut().push((request.path.to_string(), request.content_type));
        if request.content_type == ContentType::Script {
            return Err("syntax error".into());
        }
        Ok(())
    };

    let report = h.project.compile(&compiler);

    assert_eq!(
        seen.into_inner(),
        vec![
            ("a.png".to_string(), ContentType::Image),
            ("ai.conscript".to_string(), ContentType::Script),
        ]
    );
    assert_eq!(report.compiled, vec![NormalizedPath::new("a.png")]);
    assert_eq!(
        report.failed,
        vec![(NormalizedPath::new("ai.conscript"), "syntax error".to_string())]
    );
}

#[test]
fn redirecting_a_pipeline_suppresses_compilation() {
    let mut h = Harness::open(assets_fixture());
    assert!(h.project.get("assets/foo.png").unwrap().should_compile());

    h.project
        .set_metadata("assets/foo.png", "Processor", "NormalMapProcessor")
        .unwrap();

    assert!(!h.project.get("assets/foo.png").unwrap().should_compile());
    assert!(h.project.is_dirty());
}

#[test]
fn settings_load_from_any_format() {
    let dir = tempfile::TempDir::new().unwrap();
    let toml_path = NormalizedPath::new(dir.path().join("editor.toml"));
    std::fs::write(
        toml_path.to_native(),
        "[naming]\nnew_folder = \"Folder\"\n\n[manifest]\nindent = 4\n",
    )
    .unwrap();

    let settings = ProjectSettings::load(&toml_path).unwrap();
    assert_eq!(settings.naming.new_folder, "Folder");
    assert_eq!(settings.naming.copy_suffix, " - Copy");
    assert_eq!(settings.manifest.indent, 4);
    assert_eq!(settings.manifest.tools_version, "4.0");

    let json_path = NormalizedPath::new(dir.path().join("editor.json"));
    settings.save(&json_path).unwrap();
    assert_eq!(ProjectSettings::load(&json_path).unwrap(), settings);

    let missing = NormalizedPath::new(dir.path().join("absent.yaml"));
    assert_eq!(ProjectSettings::load(&missing).unwrap(), ProjectSettings::default());
}

#[test]
fn configured_base_names_are_used() {
    let mut settings = ProjectSettings::default();
    settings.naming.new_folder = "Folder".to_string();
    let fixture = TestProject::new();
    let mut project = content_project::ContentProject::headless().with_settings(settings);
    project.load_manifest(fixture.manifest_path()).unwrap();

    project.new_folder("", None, ErrorPolicy::Propagate).unwrap();
    project.new_folder("", None, ErrorPolicy::Propagate).unwrap();

    assert!(project.contains("Folder"));
    assert!(project.contains("Folder (2)"));
}

#[test]
fn create_writes_the_manifest_through_the_disk_port() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = NormalizedPath::new(dir.path().join("Game/Game.contentproj"));
    let disk = CountingDisk::new();
    let mut project = ContentProject::new(
        Box::new(disk.clone()),
        Box::new(HeadlessHost::new()),
        Box::new(MemoryClipboard::new()),
    );

    project.create(path.clone()).unwrap();

    assert_eq!(disk.ops(), vec![DiskOp::CreateDir, DiskOp::WriteText]);
    assert_eq!(disk.calls()[1].path, path);
}

#[test]
fn failed_manifest_write_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = NormalizedPath::new(dir.path().join("Game.contentproj"));
    let disk = CountingDisk::new();
    disk.fail(DiskOp::WriteText);
    let mut project = ContentProject::new(
        Box::new(disk.clone()),
        Box::new(HeadlessHost::new()),
        Box::new(MemoryClipboard::new()),
    );

    let err = project.create(path.clone()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!path.exists());
}

#[test]
fn save_goes_through_the_disk_port() {
    let mut h = Harness::open(assets_fixture());
    h.project.new_folder("", Some("sfx"), ErrorPolicy::Propagate).unwrap();
    h.disk.reset();
    h.disk.fail(DiskOp::WriteText);

    let err = h.project.save_manifest().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(h.project.is_dirty());
    assert!(!h.fixture.read_manifest().contains("sfx"));

    h.disk.heal();
    h.project.save_manifest().unwrap();
    assert_eq!(h.disk.ops(), vec![DiskOp::WriteText, DiskOp::WriteText]);
    assert!(!h.project.is_dirty());
}
