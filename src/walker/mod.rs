//! Source tree walk
//!
//! Visits every directory of a repository root-to-leaf, derives the package's
//! configuration from its parent package and applies the directives found in
//! its build file. Parents are always visited before their children, which
//! is the only ordering the configuration tree relies on.

mod exclude;

pub use exclude::{ExcludeCache, ExcludeMatcher};

use crate::config::{normalize_package, ConfigLoader, ConfigTree, NodeId, ROOT_PACKAGE};
use crate::directives::{apply_directives, read_directives};
use crate::types::{Result, TsGenError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Configuration of every package found under a repository root.
#[derive(Debug)]
pub struct SourceTree {
    pub root: PathBuf,
    pub tree: ConfigTree,
    /// Packages in visit order; the root package comes first.
    pub packages: Vec<String>,
}

impl SourceTree {
    pub fn node(&self, package: &str) -> Option<NodeId> {
        self.tree.get(package)
    }
}

pub struct Walker<'a> {
    root: PathBuf,
    loader: &'a ConfigLoader,
}

impl<'a> Walker<'a> {
    pub fn new(root: impl Into<PathBuf>, loader: &'a ConfigLoader) -> Self {
        Self {
            root: root.into(),
            loader,
        }
    }

    pub fn walk(&self) -> Result<SourceTree> {
        info!("Walking source tree at {}", self.root.display());

        let (mut tree, root_node) = self.loader.build_tree(&self.root.to_string_lossy())?;
        let mut packages = Vec::new();
        let mut excludes = ExcludeCache::new();

        let mut entries = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let package = self.package_of(entry.path())?;
            let node = if package == ROOT_PACKAGE {
                root_node
            } else {
                if is_hidden(&entry) {
                    entries.skip_current_dir();
                    continue;
                }

                let parent = tree.require_parent_for_package(&package)?;
                if excludes.matcher(&tree, parent)?.is_excluded(&package) {
                    debug!("Excluding package '{}' and its sub-packages", package);
                    entries.skip_current_dir();
                    continue;
                }

                tree.derive_for_package(&package)?
            };

            let directives = read_directives(entry.path())?;
            apply_directives(&mut tree, node, &package, &directives)?;
            packages.push(package);
        }

        info!("Resolved configuration for {} packages", packages.len());
        Ok(SourceTree {
            root: self.root.clone(),
            tree,
            packages,
        })
    }

    fn package_of(&self, path: &Path) -> Result<String> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| TsGenError::PathNotInRepo(path.to_path_buf()))?;
        Ok(normalize_package(&relative.to_string_lossy()))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
