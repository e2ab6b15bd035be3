//! Shared setup for content-project integration tests

#![allow(dead_code)]

use content_project::{ContentProject, HeadlessHost, MemoryClipboard, NodeId};
use content_test_utils::{CountingDisk, TestProject};

/// A loaded project together with handles on all of its collaborators.
pub struct Harness {
    pub fixture: TestProject,
    pub disk: CountingDisk,
    pub host: HeadlessHost,
    pub clipboard: MemoryClipboard,
    pub project: ContentProject,
}

impl Harness {
    /// Open `fixture`'s manifest. Calls made during load are not recorded.
    pub fn open(fixture: TestProject) -> Self {
        let disk = CountingDisk::new();
        let host = HeadlessHost::new();
        let clipboard = MemoryClipboard::new();
        let mut project = ContentProject::new(
            Box::new(disk.clone()),
            Box::new(host.clone()),
            Box::new(clipboard.clone()),
        );
        project
            .load_manifest(fixture.manifest_path())
            .unwrap_or_else(|e| panic!("Harness: failed to load manifest: {e}"));
        disk.reset();
        Self {
            fixture,
            disk,
            host,
            clipboard,
            project,
        }
    }

    pub fn id(&self, path: &str) -> NodeId {
        self.project
            .find(path)
            .unwrap_or_else(|| panic!("Harness: no node at '{path}'"))
    }

    /// Every project path in pre-order.
    pub fn paths(&self) -> Vec<String> {
        let tree = self.project.tree();
        tree.descendants(tree.root())
            .into_iter()
            .map(|id| tree.path(id).unwrap().to_string())
            .collect()
    }
}

/// Fixture with `assets/` holding one registered image and an empty folder.
pub fn assets_fixture() -> TestProject {
    TestProject::new()
        .with_file("assets/foo.png", "png")
        .with_dir("assets/dir/sub")
        .with_manifest(
            r#"  <ItemGroup>
    <Folder Include="assets\dir\sub\" />
  </ItemGroup>
  <ItemGroup>
    <Compile Include="assets\foo.png">
      <Name>foo</Name>
      <Importer>TextureImporter</Importer>
      <Processor>TextureProcessor</Processor>
    </Compile>
  </ItemGroup>"#,
        )
}
