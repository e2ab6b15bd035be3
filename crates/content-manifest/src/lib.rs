//! MSBuild-style content manifest codec
//!
//! A manifest is an XML `Project` document whose `ItemGroup` children list
//! the content files of a project:
//!
//! ```xml
//! <Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
//!   <ItemGroup>
//!     <Compile Include="gfx\sprite.png">
//!       <Name>sprite</Name>
//!       <Importer>TextureImporter</Importer>
//!       <Processor>TextureProcessor</Processor>
//!     </Compile>
//!   </ItemGroup>
//! </Project>
//! ```
//!
//! Reading splits the document into a [`ManifestEntry`] list and a "shell"
//! holding everything else. Writing is stateless: the shell plus a fresh set
//! of [`ItemGroup`]s is serialized from scratch on every save.

pub mod entry;
pub mod error;
pub mod manifest;
pub mod xml;

pub use entry::{CopyToOutput, ElementKind, ManifestEntry};
pub use error::{Error, Result};
pub use manifest::{ItemGroup, Manifest};

/// Namespace every manifest `Project` element must declare.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";
