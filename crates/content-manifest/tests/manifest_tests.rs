//! Reading and writing whole manifests

use content_fs::{LocalDisk, NormalizedPath};
use content_manifest::{ElementKind, Error, ItemGroup, MSBUILD_NAMESPACE, Manifest, ManifestEntry};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn project(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" DefaultTargets="Build" xmlns="{MSBUILD_NAMESPACE}">
{body}
</Project>"#
    )
}

#[test]
fn entries_are_read_in_document_order() {
    let source = project(
        r#"
  <ItemGroup>
    <Folder Include="levels\" />
    <Compile Include="gfx\sprite.png">
      <Name>sprite</Name>
      <Importer>TextureImporter</Importer>
      <Processor>TextureProcessor</Processor>
    </Compile>
  </ItemGroup>
  <ItemGroup>
    <None Include="readme.txt">
      <CopyToOutputDirectory>PreserveNewest</CopyToOutputDirectory>
    </None>
  </ItemGroup>"#,
    );

    let manifest = Manifest::parse(&source).unwrap();
    let includes: Vec<_> = manifest.entries().iter().map(|e| e.include().unwrap()).collect();

    assert_eq!(includes, vec![r"levels\", r"gfx\sprite.png", "readme.txt"]);
    assert_eq!(manifest.entries()[1].kind(), ElementKind::Compile);
    assert_eq!(manifest.entries()[1].importer(), Some("TextureImporter"));
    assert!(manifest.entries()[2].copy_to_output().copies());
}

#[test]
fn non_content_parts_survive_a_rewrite() {
    let source = project(
        r#"
  <PropertyGroup>
    <OutputPath>bin\$(Platform)</OutputPath>
  </PropertyGroup>
  <ItemGroup>
    <Reference Include="Engine.Pipeline" />
    <Compile Include="a.fx" />
  </ItemGroup>
  <!-- keep me -->
  <Import Project="$(MSBuildExtensionsPath)\Content.targets" />"#,
    );

    let manifest = Manifest::parse(&source).unwrap();
    let xml = manifest.render(&[], 2).unwrap();

    assert!(xml.contains(r"<OutputPath>bin\$(Platform)</OutputPath>"));
    assert!(xml.contains(r#"<Reference Include="Engine.Pipeline"/>"#));
    assert!(xml.contains("keep me"));
    assert!(xml.contains("Content.targets"));
    assert!(!xml.contains("a.fx"));
    assert!(xml.contains(r#"DefaultTargets="Build""#));
}

#[test]
fn emptied_item_groups_are_dropped() {
    let source = project(r#"<ItemGroup><Compile Include="a.fx" /></ItemGroup>"#);

    let manifest = Manifest::parse(&source).unwrap();

    assert!(manifest.shell().elements().all(|el| el.name != "ItemGroup"));
}

#[test]
fn render_splices_groups_where_content_was() {
    let source = project(
        r#"<PropertyGroup />
  <ItemGroup><Compile Include="old.fx" /></ItemGroup>
  <Import Project="x.targets" />"#,
    );
    let manifest = Manifest::parse(&source).unwrap();
    let mut entry = ManifestEntry::new(ElementKind::Compile);
    entry.set_include("new.fx");

    let xml = manifest.render(&[ItemGroup::default(), ItemGroup::new(vec![entry])], 2).unwrap();
    let reparsed = Manifest::parse(&xml).unwrap();

    let names: Vec<_> = xml::element_names(&xml);
    assert_eq!(names, vec!["PropertyGroup", "ItemGroup", "Import"]);
    assert_eq!(reparsed.entries()[0].include(), Some("new.fx"));
}

#[rstest]
#[case::wrong_root(r#"<Solution xmlns="http://schemas.microsoft.com/developer/msbuild/2003" />"#)]
#[case::no_namespace("<Project />")]
#[case::wrong_namespace(r#"<Project xmlns="urn:other" />"#)]
#[case::malformed("<Project xmlns=")]
#[case::empty("")]
fn invalid_documents_are_rejected(#[case] source: &str) {
    let err = Manifest::parse(source).unwrap_err();
    assert!(matches!(err, Error::InvalidManifest { .. }), "got {err:?}");
}

#[test]
fn save_writes_file_and_adopts_entries() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("Content.contentproj"));
    let mut manifest = Manifest::empty("4.0");
    let mut entry = ManifestEntry::new(ElementKind::Folder);
    entry.set_include(r"empty\");

    manifest.save(&LocalDisk, &path, vec![ItemGroup::new(vec![entry.clone()])], 2).unwrap();

    assert_eq!(manifest.entries(), &[entry]);
    let reloaded = Manifest::load(&path).unwrap();
    assert_eq!(reloaded.entries(), manifest.entries());
}

#[test]
fn special_characters_round_trip() {
    let mut entry = ManifestEntry::new(ElementKind::None);
    entry.set_include(r"docs\notes & <todo>.txt");
    entry.set_metadata("Name", "notes & <todo>");
    let xml = Manifest::empty("4.0")
        .render(&[ItemGroup::new(vec![entry.clone()])], 2)
        .unwrap();

    let reparsed = Manifest::parse(&xml).unwrap();

    assert_eq!(reparsed.entries(), &[entry]);
}

mod xml {
    /// Names of the `Project` element's direct children.
    pub fn element_names(source: &str) -> Vec<String> {
        content_manifest::xml::parse(source)
            .unwrap()
            .elements()
            .map(|el| el.name.clone())
            .collect()
    }
}
