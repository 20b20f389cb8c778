//! # nuspec-pack Library
//!
//! This library provides the core functionality behind the `nuspec-pack`
//! command-line tool: folding build information into a NuGet manifest
//! (`.nuspec`), then packing and publishing it with an external packaging
//! tool.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use nuspec_pack::manifest::{Dependency, Manifest, Upsert};
//!
//! let mut manifest = Manifest::parse(
//!     "<package><metadata><id>Sample</id></metadata></package>",
//!     Path::new("Sample.nuspec"),
//! ).unwrap();
//!
//! let dependency = Dependency {
//!     id: "Newtonsoft.Json".to_string(),
//!     version: "13.0.1".to_string(),
//! };
//! assert_eq!(manifest.upsert_dependency(&dependency).unwrap(), Upsert::Inserted);
//! assert_eq!(manifest.upsert_dependency(&dependency).unwrap(), Upsert::Unchanged);
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`, `xml`)**: Typed access to a `.nuspec` document.
//!   Elements are looked up in the root's namespace and created on demand;
//!   unknown content is preserved.
//! - **Merge (`merge`)**: Fills version, metadata, dependencies, framework
//!   assemblies and a file rule from the build's outputs. Inputs come from
//!   `assembly`, `sources`, `identity`, `version`, `filter` and `framework`.
//! - **Pack and publish (`pack`, `publish`, `tool`)**: Run `nuget pack` and
//!   `nuget push` with a bounded wait and a configurable failure policy.
//! - **Configuration (`config`, `defaults`)**: Optional YAML settings layered
//!   under command-line flags.
//!
//! The three operations are independent and communicate only through the
//! manifest file on disk.

pub mod assembly;
pub mod config;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod framework;
pub mod identity;
pub mod manifest;
pub mod merge;
pub mod output;
pub mod pack;
pub mod publish;
pub mod sources;
pub mod suggestions;
pub mod tool;
pub mod version;
pub mod xml;
