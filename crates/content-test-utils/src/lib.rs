//! Shared test utilities for the content project workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`](project::TestProject), a temporary project
//!   directory with a manifest and helper assertions
//! - [`disk`]: [`CountingDisk`](disk::CountingDisk), a `DiskIo` that records
//!   calls and fails on demand

pub mod disk;
pub mod project;

pub use disk::{CountingDisk, DiskCall, DiskOp};
pub use project::{TestProject, manifest_xml};
