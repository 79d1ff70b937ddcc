//! Per-package configuration for build-file generation
//!
//! Settings are resolved outside-in:
//! 1. Built-in defaults
//! 2. Tool config `[root]` table (seeds the root package)
//! 3. Directives found in each package, inherited by its sub-packages

mod defaults;
mod loader;
mod node;
mod third_party;
mod tree;
mod user_config;

pub use defaults::{
    default_library_naming_template, default_test_naming_template, PACKAGE_NAME_PLACEHOLDER,
};
pub use loader::{ConfigLoader, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use node::{ConfigNode, EnvironmentType};
pub use third_party::{StaticModuleMap, ThirdPartyResolver, Unresolved};
pub use tree::{
    normalize_package, Ancestors, ConfigTree, ExclusionInheritance, NodeId, PatternListId,
    ROOT_PACKAGE,
};
pub use user_config::{RootSettings, Settings, UserConfig};
