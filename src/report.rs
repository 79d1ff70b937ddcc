//! Resolved per-package settings, as read by a build-file emitter

use crate::config::{ConfigTree, EnvironmentType, NodeId};
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    pub package: String,
    /// Short name substituted into the naming conventions.
    pub name: String,
    pub generation_enabled: bool,
    pub environment: EnvironmentType,
    pub validate_import_statements: bool,
    pub excluded_patterns: Vec<String>,
    /// Ignored here or in any ancestor package.
    pub ignored_dependencies: Vec<String>,
    pub library_name: String,
    pub test_name: String,
}

impl ResolvedPackage {
    pub fn from_node(tree: &ConfigTree, package: &str, id: NodeId) -> Self {
        let node = tree.node(id);
        let name = package_name(package, node.repo_root());

        Self {
            package: package.to_string(),
            generation_enabled: node.generation_enabled(),
            environment: node.environment_type(),
            validate_import_statements: node.validate_import_statements(),
            excluded_patterns: tree.excluded_patterns(id).to_vec(),
            ignored_dependencies: tree.effective_ignored_dependencies(id).into_iter().collect(),
            library_name: node.render_library_name(&name),
            test_name: node.render_test_name(&name),
            name,
        }
    }

    /// Resolve a registered package, or `None` if the tree has no node for it.
    pub fn resolve(tree: &ConfigTree, package: &str) -> Option<Self> {
        tree.get(package)
            .map(|id| Self::from_node(tree, package, id))
    }
}

impl fmt::Display for ResolvedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.package.is_empty() {
            "//"
        } else {
            self.package.as_str()
        };
        writeln!(f, "{} ({})", label, self.name)?;
        writeln!(
            f,
            "  generation: {}",
            if self.generation_enabled { "enabled" } else { "disabled" }
        )?;
        writeln!(f, "  environment: {}", self.environment)?;
        writeln!(f, "  validate_import_statements: {}", self.validate_import_statements)?;
        writeln!(f, "  library: {}", self.library_name)?;
        writeln!(f, "  test: {}", self.test_name)?;
        if !self.excluded_patterns.is_empty() {
            writeln!(f, "  exclude: {}", self.excluded_patterns.join(", "))?;
        }
        if !self.ignored_dependencies.is_empty() {
            writeln!(f, "  ignored: {}", self.ignored_dependencies.join(", "))?;
        }
        Ok(())
    }
}

/// Answer to a single dependency / module lookup for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyQuery {
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency: Option<IgnoredDependency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ThirdPartyModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredDependency {
    pub name: String,
    pub ignored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThirdPartyModule {
    pub name: String,
    /// `None` when no resolver knows the module; the emitter leaves it unresolved.
    pub label: Option<String>,
}

impl DependencyQuery {
    pub fn run(
        tree: &ConfigTree,
        package: &str,
        id: NodeId,
        dependency: Option<&str>,
        module: Option<&str>,
    ) -> Self {
        Self {
            package: package.to_string(),
            dependency: dependency.map(|name| IgnoredDependency {
                name: name.trim().to_string(),
                ignored: tree.is_dependency_ignored(id, name),
            }),
            module: module.map(|name| ThirdPartyModule {
                name: name.to_string(),
                label: tree.find_third_party_dependency(id, name),
            }),
        }
    }
}

/// Short name of a package: its last path segment, or the repository
/// directory name for the root package.
pub fn package_name(package: &str, repo_root: &str) -> String {
    let source = if package.is_empty() { repo_root } else { package };
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
