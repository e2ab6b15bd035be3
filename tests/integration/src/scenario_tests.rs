//! Behavioural scenarios of the content project, one module per area
//!
//! Each scenario runs against a real temporary project directory with
//! recording collaborators, so both the tree and every disk call are
//! observable.

use content_fs::NormalizedPath;
use content_project::{
    ContentProject, ContentType, ErrorKind, ErrorPolicy, HeadlessHost, MemoryClipboard,
};
use content_test_utils::{CountingDisk, DiskOp, TestProject};

struct Scenario {
    fixture: TestProject,
    disk: CountingDisk,
    host: HeadlessHost,
    project: ContentProject,
}

impl Scenario {
    fn open(fixture: TestProject) -> Self {
        let disk = CountingDisk::new();
        let host = HeadlessHost::new();
        let mut project = ContentProject::new(
            Box::new(disk.clone()),
            Box::new(host.clone()),
            Box::new(MemoryClipboard::new()),
        );
        project.load_manifest(fixture.manifest_path()).unwrap();
        disk.reset();
        Self {
            fixture,
            disk,
            host,
            project,
        }
    }

    fn paths(&self) -> Vec<String> {
        let tree = self.project.tree();
        tree.descendants(tree.root())
            .into_iter()
            .map(|id| tree.path(id).unwrap().to_string())
            .collect()
    }
}

fn assets_project() -> TestProject {
    TestProject::new()
        .with_file("assets/foo.png", "png")
        .with_dir("assets/dir/sub")
        .with_manifest(
            r#"<ItemGroup>
    <Folder Include="assets\dir\sub\" />
    <Compile Include="assets\foo.png" />
  </ItemGroup>"#,
        )
}

mod s1_include {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s1_1_include_image_into_existing_folder() {
        let mut s = Scenario::open(
            TestProject::new()
                .with_dir("assets")
                .with_manifest(r#"<ItemGroup><Folder Include="assets\" /></ItemGroup>"#),
        );
        let source = s.fixture.incoming("foo.png", "png");

        let id = s
            .project
            .include(source, "assets", ErrorPolicy::Propagate)
            .unwrap()
            .unwrap();

        let node = s.project.node(id).unwrap();
        assert_eq!(s.project.path_of(id).unwrap().as_str(), "assets/foo.png");
        assert_eq!(node.content_type(), ContentType::Image);
        assert_eq!(node.importer(), Some("TextureImporter"));
        assert_eq!(node.processor(), Some("TextureProcessor"));
        assert!(node.should_compile());
    }
}

mod s2_move {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s2_1_move_folder_inside_itself_fails_without_disk_calls() {
        let mut s = Scenario::open(assets_project());
        let before = s.paths();

        let err = s
            .project
            .move_node("assets/dir", "assets/dir/sub", ErrorPolicy::Propagate)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SelfSubdirectory);
        assert_eq!(s.paths(), before);
        assert!(s.disk.calls().is_empty());
    }

    #[test]
    fn s2_2_cut_paste_into_subtree_fails_the_same_way() {
        let mut s = Scenario::open(assets_project());
        s.project.cut("assets/dir").unwrap();
        let before = s.paths();

        let err = s
            .project
            .paste("assets/dir/sub", ErrorPolicy::Report)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SelfSubdirectory);
        assert_eq!(s.paths(), before);
        assert!(s.disk.calls().is_empty());
    }
}

mod s3_load {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s3_1_single_compile_item_yields_folder_and_image() {
        let s = Scenario::open(
            TestProject::new()
                .with_file("gfx/sprite.png", "png")
                .with_manifest(r#"<ItemGroup><Compile Include="gfx\sprite.png" /></ItemGroup>"#),
        );

        assert_eq!(s.paths(), vec!["gfx", "gfx/sprite.png"]);
        let tree = s.project.tree();
        let gfx = s.project.find("gfx").unwrap();
        assert_eq!(tree.node(gfx).unwrap().parent(), Some(tree.root()));
        assert_eq!(
            s.project.get("gfx/sprite.png").unwrap().content_type(),
            ContentType::Image
        );
    }
}

mod s4_delete {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s4_1_delete_of_vanished_file_reports_and_detaches() {
        let mut s = Scenario::open(assets_project());
        std::fs::remove_file(s.fixture.root().join("assets/foo.png")).unwrap();

        let result = s.project.delete("assets/foo.png", ErrorPolicy::Report);

        assert!(result.is_ok());
        assert!(!s.project.contains("assets/foo.png"));
        assert_eq!(s.disk.ops(), vec![DiskOp::Delete]);
        let errors = s.host.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, ErrorKind::Io);
    }
}

mod s5_invariants {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s5_1_idempotent_rename() {
        let mut s = Scenario::open(assets_project());
        s.project
            .rename("assets/foo.png", "foo.png", ErrorPolicy::Propagate)
            .unwrap();
        assert!(s.disk.calls().is_empty());
        assert!(s.project.contains("assets/foo.png"));
    }

    #[test]
    fn s5_2_cut_exclusivity() {
        let mut s = Scenario::open(assets_project());
        let a = s.project.find("assets/foo.png").unwrap();
        let b = s.project.find("assets/dir").unwrap();

        s.project.cut("assets/foo.png").unwrap();
        s.project.cut("assets/dir").unwrap();
        assert!(!s.project.node(a).unwrap().is_cut());
        assert!(s.project.node(b).unwrap().is_cut());

        s.project.copy("assets/foo.png").unwrap();
        assert!(s.project.tree().iter().all(|(_, node)| !node.is_cut()));
    }

    #[test]
    fn s5_3_round_trip_after_mutations() {
        let mut s = Scenario::open(assets_project());
        let source = s.fixture.incoming("theme.wav", "w");
        s.project
            .include(source, "assets/dir", ErrorPolicy::Propagate)
            .unwrap();
        s.project
            .move_node("assets/foo.png", "assets/dir/sub", ErrorPolicy::Propagate)
            .unwrap();
        s.project.save_manifest().unwrap();

        let saved = s.fixture.read_manifest();

        let mut reopened = ContentProject::headless();
        reopened.load_manifest(s.fixture.manifest_path()).unwrap();
        let paths = |project: &ContentProject| {
            let tree = project.tree();
            tree.descendants(tree.root())
                .into_iter()
                .map(|id| tree.path(id).unwrap())
                .collect::<Vec<NormalizedPath>>()
        };
        assert_eq!(paths(&reopened), paths(&s.project));

        reopened.save_manifest().unwrap();
        assert_eq!(s.fixture.read_manifest(), saved);
    }
}
