//! Directive discovery and application
//!
//! Directives are comments of the form `# gazelle:<key> <value>` in a
//! package's build file. Each one recognized here mutates that package's
//! [`ConfigNode`](crate::config::ConfigNode); keys owned by other extensions
//! are skipped.

use crate::config::{ConfigTree, EnvironmentType, NodeId};
use crate::types::{Result, TsGenError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub const DIRECTIVE_MARKER: &str = "gazelle:";

/// Build file names, in order of preference.
pub const BUILD_FILE_NAMES: &[&str] = &["BUILD.bazel", "BUILD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `enabled` or `disabled`. Sub-packages inherit the value.
    Generation,
    /// Dependencies left out of generated targets, here and below.
    IgnoreDependencies,
    /// May appear at most once per package.
    ValidateImportStatements,
    Environment,
    /// Library target name; `$package_name$` is replaced by the package name.
    LibraryNamingConvention,
    TestNamingConvention,
    Exclude,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 7] = [
        DirectiveKind::Generation,
        DirectiveKind::IgnoreDependencies,
        DirectiveKind::ValidateImportStatements,
        DirectiveKind::Environment,
        DirectiveKind::LibraryNamingConvention,
        DirectiveKind::TestNamingConvention,
        DirectiveKind::Exclude,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DirectiveKind::Generation => "ts_generation",
            DirectiveKind::IgnoreDependencies => "ts_ignore_dependencies",
            DirectiveKind::ValidateImportStatements => "ts_validate_import_statements",
            DirectiveKind::Environment => "ts_environment",
            DirectiveKind::LibraryNamingConvention => "ts_project_naming_convention",
            DirectiveKind::TestNamingConvention => "ts_test_naming_convention",
            DirectiveKind::Exclude => "exclude",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    pub value: String,
}

impl Directive {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> Option<DirectiveKind> {
        DirectiveKind::from_key(&self.key)
    }
}

/// Extract every directive comment from build file contents, in file order.
pub fn parse_directives(content: &str) -> Vec<Directive> {
    content.lines().filter_map(parse_directive_line).collect()
}

fn parse_directive_line(line: &str) -> Option<Directive> {
    let comment = line.trim().strip_prefix('#')?;
    let body = comment.trim_start().strip_prefix(DIRECTIVE_MARKER)?;

    let (key, value) = match body.split_once(char::is_whitespace) {
        Some((key, value)) => (key, value.trim()),
        None => (body.trim(), ""),
    };
    if key.is_empty() {
        return None;
    }
    Some(Directive::new(key, value))
}

/// The build file of the package at `dir`, if it has one.
pub fn find_build_file(dir: &Path) -> Option<PathBuf> {
    BUILD_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read the directives of the package at `dir`. A package without a build
/// file has none.
pub fn read_directives(dir: &Path) -> Result<Vec<Directive>> {
    let Some(build_file) = find_build_file(dir) else {
        return Ok(Vec::new());
    };

    let content = fs::read_to_string(&build_file)?;
    let directives = parse_directives(&content);
    trace!(
        "Found {} directives in {}",
        directives.len(),
        build_file.display()
    );
    Ok(directives)
}

/// Apply `directives` to the node of `package`, in order.
pub fn apply_directives(
    tree: &mut ConfigTree,
    node: NodeId,
    package: &str,
    directives: &[Directive],
) -> Result<()> {
    for directive in directives {
        apply_directive(tree, node, package, directive)?;
    }
    Ok(())
}

/// Apply a single directive. Returns `false` when the key is not ours.
pub fn apply_directive(
    tree: &mut ConfigTree,
    node: NodeId,
    package: &str,
    directive: &Directive,
) -> Result<bool> {
    let Some(kind) = directive.kind() else {
        trace!("Skipping directive '{}' in '{}'", directive.key, package);
        return Ok(false);
    };

    let value = directive.value.trim();
    debug!("Applying {}={:?} to package '{}'", kind.key(), value, package);

    match kind {
        DirectiveKind::Generation => {
            let enabled = match value {
                "enabled" => true,
                "disabled" => false,
                _ => return Err(invalid(kind, value, "expected 'enabled' or 'disabled'")),
            };
            tree.node_mut(node).set_generation_enabled(enabled);
        }
        DirectiveKind::IgnoreDependencies => {
            let config = tree.node_mut(node);
            for dependency in value
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|d| !d.is_empty())
            {
                config.add_ignored_dependency(dependency);
            }
        }
        DirectiveKind::ValidateImportStatements => {
            let validate = parse_bool(value)
                .ok_or_else(|| invalid(kind, value, "expected a boolean"))?;
            let config = tree.node_mut(node);
            if config.validate_import_statements_explicit().is_some() {
                return Err(TsGenError::DuplicateDirective {
                    directive: kind.key().to_string(),
                    package: package.to_string(),
                });
            }
            config.set_validate_import_statements(validate);
        }
        DirectiveKind::Environment => {
            let environment = value
                .parse::<EnvironmentType>()
                .map_err(|reason| invalid(kind, value, &reason))?;
            tree.node_mut(node).set_environment_type(environment);
        }
        DirectiveKind::LibraryNamingConvention => {
            require_value(kind, value)?;
            tree.node_mut(node).set_library_naming_template(value);
        }
        DirectiveKind::TestNamingConvention => {
            require_value(kind, value)?;
            tree.node_mut(node).set_test_naming_template(value);
        }
        DirectiveKind::Exclude => {
            require_value(kind, value)?;
            tree.add_excluded_pattern(node, value);
        }
    }

    Ok(true)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn require_value(kind: DirectiveKind, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(kind, value, "value must not be empty"));
    }
    Ok(())
}

fn invalid(kind: DirectiveKind, value: &str, reason: &str) -> TsGenError {
    TsGenError::InvalidDirectiveValue {
        directive: kind.key().to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
