//! Exclude-pattern matching for the tree walk

use crate::config::{ConfigTree, NodeId, PatternListId};
use crate::types::{Result, TsGenError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use tracing::trace;

/// Compiled form of a package's live exclusion list. Patterns are matched
/// against repo-relative package paths.
#[derive(Debug)]
pub struct ExcludeMatcher {
    glob_set: GlobSet,
}

impl ExcludeMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let glob = Glob::new(pattern).map_err(|source| TsGenError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }

        let glob_set = builder.build().map_err(|source| TsGenError::InvalidPattern {
            pattern: "<set>".to_string(),
            source,
        })?;
        Ok(Self { glob_set })
    }

    pub fn is_empty(&self) -> bool {
        self.glob_set.is_empty()
    }

    pub fn is_excluded(&self, package: &str) -> bool {
        self.glob_set.is_match(package)
    }
}

/// Compiled matchers per exclusion list. Lists only grow, so a matcher is
/// current as long as it was built from the same number of patterns.
#[derive(Debug, Default)]
pub struct ExcludeCache {
    matchers: HashMap<PatternListId, (usize, ExcludeMatcher)>,
    builds: usize,
}

impl ExcludeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher for the exclusion list `node` holds, rebuilt only when that
    /// list has grown since the last call.
    pub fn matcher(&mut self, tree: &ConfigTree, node: NodeId) -> Result<&ExcludeMatcher> {
        let list = tree.exclusion_list(node);
        let patterns = tree.excluded_patterns(node);

        let stale = self
            .matchers
            .get(&list)
            .map_or(true, |(len, _)| *len != patterns.len());
        if stale {
            trace!("Compiling {} exclude patterns for {:?}", patterns.len(), list);
            let matcher = ExcludeMatcher::new(patterns)?;
            self.matchers.insert(list, (patterns.len(), matcher));
            self.builds += 1;
        }

        Ok(&self.matchers[&list].1)
    }

    /// Number of matchers compiled so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusionInheritance;

    #[test]
    fn test_exact_and_recursive_patterns() {
        let matcher = ExcludeMatcher::new(&["dist", "**/node_modules", "gen/*"]).unwrap();

        assert!(matcher.is_excluded("dist"));
        assert!(!matcher.is_excluded("app/dist"));
        assert!(matcher.is_excluded("node_modules"));
        assert!(matcher.is_excluded("app/web/node_modules"));
        assert!(matcher.is_excluded("gen/protos"));
        assert!(!matcher.is_excluded("src"));
    }

    #[test]
    fn test_empty_patterns_skipped() {
        let matcher = ExcludeMatcher::new(&["", "   "]).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.is_excluded("anything"));
    }

    #[test]
    fn test_cache_rebuilds_only_when_list_grows() {
        let mut tree = ConfigTree::new();
        let root = tree.init_root("/repo").unwrap();
        tree.add_excluded_pattern(root, "dist");
        let a = tree.derive_for_package("a").unwrap();
        let b = tree.derive_for_package("b").unwrap();

        let mut cache = ExcludeCache::new();
        assert!(cache.matcher(&tree, root).unwrap().is_excluded("dist"));
        assert!(cache.matcher(&tree, a).unwrap().is_excluded("dist"));
        assert!(cache.matcher(&tree, b).unwrap().is_excluded("dist"));
        assert_eq!(cache.builds(), 1);

        tree.add_excluded_pattern(a, "gen");
        assert!(cache.matcher(&tree, b).unwrap().is_excluded("gen"));
        assert_eq!(cache.builds(), 2);
    }

    #[test]
    fn test_cache_keeps_copied_lists_apart() {
        let mut tree = ConfigTree::new();
        let root = tree.init_root("/repo").unwrap();
        tree.add_excluded_pattern(root, "dist");
        let copy = tree.derive_child_with(root, ExclusionInheritance::Copied);
        tree.add_excluded_pattern(copy, "tmp");

        let mut cache = ExcludeCache::new();
        assert!(!cache.matcher(&tree, root).unwrap().is_excluded("tmp"));
        assert!(cache.matcher(&tree, copy).unwrap().is_excluded("tmp"));
        assert_eq!(cache.builds(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ExcludeMatcher::new(&["a/[b"]).unwrap_err();
        match err {
            TsGenError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "a/[b"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
