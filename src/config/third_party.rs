//! Third-party dependency resolution
//!
//! Mapping an import module name to a build label is a capability plugged
//! into [`ConfigTree`](crate::config::ConfigTree). The tree asks the resolver
//! for the importing package first and then for each ancestor.

use crate::config::node::ConfigNode;
use std::collections::HashMap;

pub trait ThirdPartyResolver: Send + Sync {
    /// Resolve `module_name` as seen from `node`, or `None` when this package
    /// has nothing to say about it.
    fn resolve(&self, node: &ConfigNode, module_name: &str) -> Option<String>;
}

/// Resolves nothing. Every module is left for the emitter to report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

impl ThirdPartyResolver for Unresolved {
    fn resolve(&self, _node: &ConfigNode, _module_name: &str) -> Option<String> {
        None
    }
}

/// Fixed module -> label table, independent of the package asking.
#[derive(Debug, Clone, Default)]
pub struct StaticModuleMap {
    modules: HashMap<String, String>,
}

impl StaticModuleMap {
    pub fn new(modules: HashMap<String, String>) -> Self {
        Self { modules }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticModuleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            modules: iter
                .into_iter()
                .map(|(module, label)| (module.into(), label.into()))
                .collect(),
        }
    }
}

impl ThirdPartyResolver for StaticModuleMap {
    fn resolve(&self, _node: &ConfigNode, module_name: &str) -> Option<String> {
        self.modules.get(module_name.trim()).cloned()
    }
}

impl<F> ThirdPartyResolver for F
where
    F: Fn(&ConfigNode, &str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, node: &ConfigNode, module_name: &str) -> Option<String> {
        self(node, module_name)
    }
}
