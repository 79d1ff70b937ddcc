//! Built-in defaults for a root package
//!
//! These apply whenever neither a directive nor the tool config overrides them

use crate::config::node::EnvironmentType;

/// Substring replaced with the package's short name when rendering target names.
pub const PACKAGE_NAME_PLACEHOLDER: &str = "$package_name$";

pub const DEFAULT_GENERATION_ENABLED: bool = true;

pub const DEFAULT_VALIDATE_IMPORT_STATEMENTS: bool = true;

pub const DEFAULT_ENVIRONMENT: EnvironmentType = EnvironmentType::Other;

/// Library targets are named after the package itself.
pub fn default_library_naming_template() -> String {
    PACKAGE_NAME_PLACEHOLDER.to_string()
}

pub fn default_test_naming_template() -> String {
    format!("{}_test", PACKAGE_NAME_PLACEHOLDER)
}
