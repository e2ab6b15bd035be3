//! [`TestProject`] fixture for content project scenarios.

use content_fs::NormalizedPath;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Wrap item-group markup in a `Project` element with the MSBuild namespace.
pub fn manifest_xml(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project ToolsVersion=\"4.0\" xmlns=\"{NAMESPACE}\">\n{body}\n</Project>\n"
    )
}

/// A temporary directory laid out as
///
/// ```text
/// <tmp>/
///   Content/               project directory
///     Content.contentproj  manifest
///   incoming/              files to include from outside the project
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use content_test_utils::TestProject;
///
/// let fixture = TestProject::new()
///     .with_file("gfx/sprite.png", "png")
///     .with_manifest(r#"<ItemGroup><Compile Include="gfx\sprite.png" /></ItemGroup>"#);
/// fixture.assert_file_exists("gfx/sprite.png");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create the directory layout with an empty manifest.
    pub fn new() -> Self {
        let temp_dir =
            TempDir::new().unwrap_or_else(|e| panic!("TestProject: failed to create temp dir: {e}"));
        let fixture = Self { temp_dir };
        for dir in [fixture.root(), fixture.incoming_dir()] {
            fs::create_dir_all(&dir)
                .unwrap_or_else(|e| panic!("TestProject: failed to create {}: {e}", dir.display()));
        }
        fixture.with_manifest("")
    }

    /// The project directory.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("Content")
    }

    pub fn incoming_dir(&self) -> PathBuf {
        self.temp_dir.path().join("incoming")
    }

    pub fn manifest_path(&self) -> NormalizedPath {
        NormalizedPath::new(self.root().join("Content.contentproj"))
    }

    /// Absolute path of `relative` inside the project directory.
    pub fn path(&self, relative: &str) -> NormalizedPath {
        NormalizedPath::new(self.root().join(relative))
    }

    /// Replace the manifest with `body` wrapped by [`manifest_xml`].
    pub fn with_manifest(self, body: &str) -> Self {
        write(self.manifest_path().to_native(), &manifest_xml(body));
        self
    }

    /// Write a file inside the project directory.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        write(self.root().join(relative), content);
        self
    }

    /// Create a directory inside the project directory.
    pub fn with_dir(self, relative: &str) -> Self {
        let dir = self.root().join(relative);
        fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("TestProject: failed to create {}: {e}", dir.display()));
        self
    }

    /// Write a file outside the project and return its absolute path.
    pub fn incoming(&self, relative: &str, content: &str) -> NormalizedPath {
        let path = self.incoming_dir().join(relative);
        write(&path, content);
        NormalizedPath::new(path)
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestProject: could not read {}: {e}", path.display()))
    }

    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.manifest_path().to_native())
            .unwrap_or_else(|e| panic!("TestProject: could not read manifest: {e}"))
    }

    /// Assert that `relative` exists inside the project directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.root().join(relative);
        assert!(full_path.exists(), "Expected to exist: {}", full_path.display());
    }

    /// Assert that `relative` does **not** exist inside the project directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let full_path = self.root().join(relative);
        assert!(!full_path.exists(), "Expected NOT to exist: {}", full_path.display());
    }
}

fn write(path: impl AsRef<Path>, content: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("TestProject: failed to create {}: {e}", parent.display()));
    }
    fs::write(path, content)
        .unwrap_or_else(|e| panic!("TestProject: failed to write {}: {e}", path.display()));
}
