//! Per-package configuration node
//!
//! A node carries every setting the generator reads for one package. Scalars
//! are copied from the parent when a child is derived; the ignore set starts
//! empty and is resolved through the ancestor chain by [`ConfigTree`].
//!
//! [`ConfigTree`]: crate::config::ConfigTree

use crate::config::defaults::{
    default_library_naming_template, default_test_naming_template, DEFAULT_ENVIRONMENT,
    DEFAULT_GENERATION_ENABLED, DEFAULT_VALIDATE_IMPORT_STATEMENTS, PACKAGE_NAME_PLACEHOLDER,
};
use crate::config::tree::{NodeId, PatternListId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Runtime environment of the package's sources. Decides which native
/// imports are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentType {
    Node,
    Browser,
    Other,
}

impl EnvironmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentType::Node => "node",
            EnvironmentType::Browser => "browser",
            EnvironmentType::Other => "other",
        }
    }
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "node" => Ok(EnvironmentType::Node),
            "browser" => Ok(EnvironmentType::Browser),
            "other" => Ok(EnvironmentType::Other),
            other => Err(format!(
                "unknown environment '{}', expected one of: node, browser, other",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigNode {
    parent: Option<NodeId>,

    generation_enabled: bool,
    repo_root: String,
    environment_type: EnvironmentType,

    /// Handle into the tree's pattern lists; may be shared with ancestors.
    excluded_patterns: PatternListId,
    /// Package-local only. Inherited entries are found by walking the parents.
    ignored_dependencies: BTreeSet<String>,

    validate_import_statements: bool,
    /// Set once a directive on this very package chose the value.
    validate_import_statements_explicit: bool,

    library_naming_template: String,
    test_naming_template: String,
}

impl ConfigNode {
    pub(crate) fn root(repo_root: impl Into<String>, excluded_patterns: PatternListId) -> Self {
        Self {
            parent: None,
            generation_enabled: DEFAULT_GENERATION_ENABLED,
            repo_root: repo_root.into(),
            environment_type: DEFAULT_ENVIRONMENT,
            excluded_patterns,
            ignored_dependencies: BTreeSet::new(),
            validate_import_statements: DEFAULT_VALIDATE_IMPORT_STATEMENTS,
            validate_import_statements_explicit: false,
            library_naming_template: default_library_naming_template(),
            test_naming_template: default_test_naming_template(),
        }
    }

    /// Build a child of `self`, which lives at `self_id` in the arena.
    pub(crate) fn child(&self, self_id: NodeId, excluded_patterns: PatternListId) -> Self {
        Self {
            parent: Some(self_id),
            generation_enabled: self.generation_enabled,
            repo_root: self.repo_root.clone(),
            environment_type: self.environment_type,
            excluded_patterns,
            ignored_dependencies: BTreeSet::new(),
            validate_import_statements: self.validate_import_statements,
            validate_import_statements_explicit: false,
            library_naming_template: self.library_naming_template.clone(),
            test_naming_template: self.test_naming_template.clone(),
        }
    }

    /// The node this one was derived from. `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn excluded_patterns_id(&self) -> PatternListId {
        self.excluded_patterns
    }

    pub fn repo_root(&self) -> &str {
        &self.repo_root
    }

    pub fn set_generation_enabled(&mut self, enabled: bool) {
        self.generation_enabled = enabled;
    }

    pub fn generation_enabled(&self) -> bool {
        self.generation_enabled
    }

    pub fn set_environment_type(&mut self, environment_type: EnvironmentType) {
        self.environment_type = environment_type;
    }

    pub fn environment_type(&self) -> EnvironmentType {
        self.environment_type
    }

    /// Add a dependency to this package's ignore set. Surrounding whitespace
    /// is dropped before insertion.
    pub fn add_ignored_dependency(&mut self, dependency: &str) {
        self.ignored_dependencies
            .insert(dependency.trim().to_string());
    }

    /// Whether this package itself ignores the dependency, without looking at
    /// ancestors. Use [`ConfigTree::is_dependency_ignored`] for the inherited answer.
    ///
    /// [`ConfigTree::is_dependency_ignored`]: crate::config::ConfigTree::is_dependency_ignored
    pub fn ignores_locally(&self, dependency: &str) -> bool {
        self.ignored_dependencies.contains(dependency.trim())
    }

    pub fn ignored_dependencies(&self) -> &BTreeSet<String> {
        &self.ignored_dependencies
    }

    pub fn set_validate_import_statements(&mut self, validate: bool) {
        self.validate_import_statements = validate;
        self.validate_import_statements_explicit = true;
    }

    /// Change the value without marking it as set on this package. Used when
    /// seeding the root from the tool configuration.
    pub fn set_default_validate_import_statements(&mut self, validate: bool) {
        self.validate_import_statements = validate;
    }

    /// Whether import statements should be validated. Defaults to true unless
    /// this package or an ancestor said otherwise.
    pub fn validate_import_statements(&self) -> bool {
        self.validate_import_statements
    }

    /// The value set on this package, or `None` when it was only inherited.
    pub fn validate_import_statements_explicit(&self) -> Option<bool> {
        self.validate_import_statements_explicit
            .then_some(self.validate_import_statements)
    }

    pub fn set_library_naming_template(&mut self, template: impl Into<String>) {
        self.library_naming_template = template.into();
    }

    pub fn library_naming_template(&self) -> &str {
        &self.library_naming_template
    }

    /// Render the library target name, e.g. `$package_name$_lib` -> `foo_lib`.
    pub fn render_library_name(&self, package_name: &str) -> String {
        render_template(&self.library_naming_template, package_name)
    }

    pub fn set_test_naming_template(&mut self, template: impl Into<String>) {
        self.test_naming_template = template.into();
    }

    pub fn test_naming_template(&self) -> &str {
        &self.test_naming_template
    }

    pub fn render_test_name(&self, package_name: &str) -> String {
        render_template(&self.test_naming_template, package_name)
    }
}

fn render_template(template: &str, package_name: &str) -> String {
    template.replace(PACKAGE_NAME_PLACEHOLDER, package_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> ConfigNode {
        ConfigNode::root("/repo", PatternListId::new(0))
    }

    #[test]
    fn test_root_defaults() {
        let node = root();
        assert!(node.is_root());
        assert!(node.generation_enabled());
        assert_eq!(node.environment_type(), EnvironmentType::Other);
        assert!(node.validate_import_statements());
        assert_eq!(node.validate_import_statements_explicit(), None);
        assert!(node.ignored_dependencies().is_empty());
        assert_eq!(node.repo_root(), "/repo");
    }

    #[test]
    fn test_child_copies_scalars() {
        let mut parent = root();
        parent.set_generation_enabled(false);
        parent.set_environment_type(EnvironmentType::Browser);
        parent.set_validate_import_statements(false);
        parent.set_library_naming_template("$package_name$_lib");
        parent.add_ignored_dependency("left-pad");

        let child = parent.child(NodeId::new(0), PatternListId::new(0));
        assert_eq!(child.parent(), Some(NodeId::new(0)));
        assert!(!child.generation_enabled());
        assert_eq!(child.environment_type(), EnvironmentType::Browser);
        assert!(!child.validate_import_statements());
        assert_eq!(child.validate_import_statements_explicit(), None);
        assert_eq!(child.library_naming_template(), "$package_name$_lib");
        assert_eq!(child.test_naming_template(), "$package_name$_test");
        assert!(child.ignored_dependencies().is_empty());
    }

    #[test]
    fn test_child_is_not_a_live_link() {
        let mut parent = root();
        let child = parent.child(NodeId::new(0), PatternListId::new(0));
        parent.set_generation_enabled(false);
        parent.set_test_naming_template("$package_name$.spec");

        assert!(child.generation_enabled());
        assert_eq!(child.render_test_name("bar"), "bar_test");
    }

    #[test]
    fn test_validate_import_statements_explicit() {
        let mut node = root();
        node.set_default_validate_import_statements(false);
        assert_eq!(node.validate_import_statements_explicit(), None);
        assert!(!node.validate_import_statements());

        node.set_validate_import_statements(true);
        assert_eq!(node.validate_import_statements_explicit(), Some(true));
    }

    #[test]
    fn test_ignored_dependency_trimmed() {
        let mut node = root();
        node.add_ignored_dependency("  x  ");
        node.add_ignored_dependency("x");
        assert_eq!(node.ignored_dependencies().len(), 1);
        assert!(node.ignores_locally("x"));
        assert!(node.ignores_locally(" x "));
    }

    #[test]
    fn test_render_names() {
        let mut node = root();
        node.set_library_naming_template("$package_name$_lib");
        assert_eq!(node.render_library_name("foo"), "foo_lib");
        assert_eq!(node.render_test_name("bar"), "bar_test");
    }

    #[test]
    fn test_render_without_placeholder() {
        let mut node = root();
        node.set_library_naming_template("lib");
        assert_eq!(node.render_library_name("foo"), "lib");
    }

    #[test]
    fn test_render_multiple_placeholders() {
        let mut node = root();
        node.set_test_naming_template("$package_name$_$package_name$_test");
        assert_eq!(node.render_test_name("a"), "a_a_test");
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("node".parse::<EnvironmentType>(), Ok(EnvironmentType::Node));
        assert_eq!(" browser ".parse::<EnvironmentType>(), Ok(EnvironmentType::Browser));
        assert!("deno".parse::<EnvironmentType>().is_err());
        assert_eq!(EnvironmentType::Other.to_string(), "other");
    }
}
