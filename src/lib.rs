//! tsgen - per-package configuration for TypeScript build-file generation
//!
//! Each directory of a source tree is a package. Its configuration is derived
//! from the parent package's configuration and then adjusted by the
//! directives found in its build file, so settings flow root to leaf.

pub mod config;
pub mod directives;
pub mod report;
pub mod types;
pub mod walker;

pub use config::{ConfigLoader, ConfigNode, ConfigTree, EnvironmentType, NodeId};
pub use report::ResolvedPackage;
pub use types::TsGenError;
pub use walker::{SourceTree, Walker};
