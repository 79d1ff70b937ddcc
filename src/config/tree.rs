//! Package-keyed tree of configuration nodes
//!
//! The tree owns every node and every exclusion list for one generation run.
//! Nodes refer to their parent by [`NodeId`]; exclusion lists are referred to
//! by [`PatternListId`] so that several nodes can hold the same list.

use crate::config::node::ConfigNode;
use crate::config::third_party::{ThirdPartyResolver, Unresolved};
use crate::types::{Result, TsGenError};
use path_clean::PathClean;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use tracing::{debug, trace};

/// Key under which the workspace root package is registered.
pub const ROOT_PACKAGE: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternListId(usize);

impl PatternListId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }
}

/// How a derived child gets its exclusion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExclusionInheritance {
    /// Child and parent hold the same list; appends through either are seen by both.
    #[default]
    Shared,
    /// Child starts with an independent copy of the parent's current patterns.
    Copied,
}

pub struct ConfigTree {
    nodes: Vec<ConfigNode>,
    pattern_lists: Vec<Vec<String>>,
    packages: HashMap<String, NodeId>,
    resolver: Box<dyn ThirdPartyResolver>,
}

impl fmt::Debug for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigTree")
            .field("nodes", &self.nodes.len())
            .field("pattern_lists", &self.pattern_lists.len())
            .field("packages", &self.packages)
            .finish_non_exhaustive()
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            pattern_lists: Vec::new(),
            packages: HashMap::new(),
            resolver: Box::new(Unresolved),
        }
    }

    /// Replace the third-party resolver consulted by [`find_third_party_dependency`].
    ///
    /// [`find_third_party_dependency`]: ConfigTree::find_third_party_dependency
    pub fn with_resolver(mut self, resolver: impl ThirdPartyResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Create a root node with all defaults. The node is not registered under
    /// any package; see [`ConfigTree::init_root`].
    pub fn create(&mut self, repo_root: impl Into<String>) -> NodeId {
        let patterns = self.new_pattern_list(Vec::new());
        self.push(ConfigNode::root(repo_root, patterns))
    }

    /// Create the root node and register it under the root package key.
    pub fn init_root(&mut self, repo_root: impl Into<String>) -> Result<NodeId> {
        let root = self.create(repo_root);
        self.insert(ROOT_PACKAGE, root)?;
        Ok(root)
    }

    /// Derive a child from `parent`, sharing its exclusion list.
    pub fn derive_child(&mut self, parent: NodeId) -> NodeId {
        self.derive_child_with(parent, ExclusionInheritance::Shared)
    }

    pub fn derive_child_with(
        &mut self,
        parent: NodeId,
        exclusions: ExclusionInheritance,
    ) -> NodeId {
        let parent_patterns = self.nodes[parent.0].excluded_patterns_id();
        let patterns = match exclusions {
            ExclusionInheritance::Shared => parent_patterns,
            ExclusionInheritance::Copied => {
                let copy = self.pattern_lists[parent_patterns.0].clone();
                self.new_pattern_list(copy)
            }
        };

        let child = self.nodes[parent.0].child(parent, patterns);
        let id = self.push(child);
        trace!("Derived node {:?} from {:?} ({:?} exclusions)", id, parent, exclusions);
        id
    }

    /// Register `node` as the configuration of `package`.
    pub fn insert(&mut self, package: &str, node: NodeId) -> Result<()> {
        let key = normalize_package(package);
        if self.packages.contains_key(&key) {
            return Err(TsGenError::PackageAlreadyRegistered(key));
        }
        debug!("Registered package '{}' as {:?}", key, node);
        self.packages.insert(key, node);
        Ok(())
    }

    /// Look up the node registered for `package`.
    pub fn get(&self, package: &str) -> Option<NodeId> {
        self.packages.get(&normalize_package(package)).copied()
    }

    /// The node registered for the directory containing `package`.
    ///
    /// Returns `None` for the root package, and when the parent has not been
    /// registered yet.
    pub fn parent_for_package(&self, package: &str) -> Option<NodeId> {
        let key = normalize_package(package);
        let dir = parent_package(&key)?;
        self.packages.get(&dir).copied()
    }

    /// Like [`parent_for_package`] but treats a missing parent as the caller
    /// having visited `package` before its ancestors. Asking for the parent
    /// of the root package is [`TsGenError::RootHasNoParent`].
    ///
    /// [`parent_for_package`]: ConfigTree::parent_for_package
    pub fn require_parent_for_package(&self, package: &str) -> Result<NodeId> {
        let key = normalize_package(package);
        let dir = parent_package(&key).ok_or(TsGenError::RootHasNoParent)?;

        self.packages
            .get(&dir)
            .copied()
            .ok_or(TsGenError::TreeOrderingViolation {
                package: key,
                parent: dir,
            })
    }

    /// Derive the node for `package` from its parent's node and register it.
    pub fn derive_for_package(&mut self, package: &str) -> Result<NodeId> {
        let key = normalize_package(package);
        if self.packages.contains_key(&key) {
            return Err(TsGenError::PackageAlreadyRegistered(key));
        }
        let parent = self.require_parent_for_package(&key)?;
        let child = self.derive_child(parent);
        self.insert(&key, child)?;
        Ok(child)
    }

    pub fn node(&self, id: NodeId) -> &ConfigNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ConfigNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent()
    }

    /// Iterate over the ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Append a glob to the exclusion list `id` holds. Every node holding the
    /// same list sees the new pattern.
    pub fn add_excluded_pattern(&mut self, id: NodeId, pattern: impl Into<String>) {
        let list = self.nodes[id.0].excluded_patterns_id();
        self.pattern_lists[list.0].push(pattern.into());
    }

    pub fn excluded_patterns(&self, id: NodeId) -> &[String] {
        let list = self.nodes[id.0].excluded_patterns_id();
        &self.pattern_lists[list.0]
    }

    /// The exclusion list `id` holds.
    pub fn exclusion_list(&self, id: NodeId) -> PatternListId {
        self.nodes[id.0].excluded_patterns_id()
    }

    /// Whether `id` holds the same exclusion list as `other`.
    pub fn shares_exclusions(&self, id: NodeId, other: NodeId) -> bool {
        self.nodes[id.0].excluded_patterns_id() == self.nodes[other.0].excluded_patterns_id()
    }

    /// Whether `dependency` is ignored by the package at `id` or by any of
    /// its ancestors up to the workspace root.
    pub fn is_dependency_ignored(&self, id: NodeId, dependency: &str) -> bool {
        let dependency = dependency.trim();
        std::iter::once(id)
            .chain(self.ancestors(id))
            .any(|node| self.nodes[node.0].ignores_locally(dependency))
    }

    /// Union of the ignore sets along the ancestor chain of `id`.
    pub fn effective_ignored_dependencies(&self, id: NodeId) -> BTreeSet<String> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .flat_map(|node| self.nodes[node.0].ignored_dependencies().iter().cloned())
            .collect()
    }

    /// Resolve an import module name to a build label, asking the resolver for
    /// `id` first and then for each ancestor up to the root.
    pub fn find_third_party_dependency(&self, id: NodeId, module_name: &str) -> Option<String> {
        let found = std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|node| self.resolver.resolve(&self.nodes[node.0], module_name));

        match &found {
            Some(label) => debug!("Resolved third-party module '{}' to {}", module_name, label),
            None => trace!("Third-party module '{}' not resolved", module_name),
        }
        found
    }

    /// Registered packages in sorted order.
    pub fn packages(&self) -> Vec<(&str, NodeId)> {
        let mut packages: Vec<_> = self
            .packages
            .iter()
            .map(|(package, id)| (package.as_str(), *id))
            .collect();
        packages.sort();
        packages
    }

    /// Number of nodes, registered or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: ConfigNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn new_pattern_list(&mut self, patterns: Vec<String>) -> PatternListId {
        self.pattern_lists.push(patterns);
        PatternListId(self.pattern_lists.len() - 1)
    }
}

pub struct Ancestors<'a> {
    tree: &'a ConfigTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Normalize a package path into its registry key. The root is `""`.
pub fn normalize_package(package: &str) -> String {
    let trimmed = package.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return ROOT_PACKAGE.to_string();
    }

    let cleaned = Path::new(trimmed).clean();
    let key = cleaned.to_string_lossy().replace('\\', "/");
    if key == "." {
        ROOT_PACKAGE.to_string()
    } else {
        key
    }
}

/// Directory of a normalized package key; `None` for the root itself.
fn parent_package(key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    Some(match key.rfind('/') {
        Some(idx) => key[..idx].to_string(),
        None => ROOT_PACKAGE.to_string(),
    })
}
