//! Tool configuration loader
//!
//! Search order (first existing file wins):
//! 1. Explicit path (`--config`)
//! 2. `<repo root>/.tsgen.toml`
//! 3. `$TSGEN_CONFIG`
//! 4. `~/.config/tsgen/config.toml`

use crate::config::third_party::StaticModuleMap;
use crate::config::tree::{ConfigTree, NodeId};
use crate::config::UserConfig;
use crate::types::TsGenError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = ".tsgen.toml";
pub const CONFIG_ENV_VAR: &str = "TSGEN_CONFIG";

#[derive(Debug, Default)]
pub struct ConfigLoader {
    user_config: UserConfig,
    source: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(explicit: Option<&Path>, repo_root: &Path) -> Result<Self, TsGenError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(TsGenError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        for path in Self::candidates(repo_root) {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        debug!("No tool config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, TsGenError> {
        debug!("Loading tool config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| TsGenError::ConfigError(format!("Failed to read config: {}", e)))?;

        let user_config: UserConfig = toml::from_str(&content)
            .map_err(|e| TsGenError::ConfigError(format!("Failed to parse config: {}", e)))?;

        info!("Loaded tool configuration from {}", path.display());
        Ok(Self {
            user_config,
            source: Some(path.to_path_buf()),
        })
    }

    fn candidates(repo_root: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![repo_root.join(CONFIG_FILE_NAME)];

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            candidates.push(PathBuf::from(config_path));
        }

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("tsgen").join("config.toml"));
        }

        candidates
    }

    pub fn user_config(&self) -> &UserConfig {
        &self.user_config
    }

    /// File the configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.user_config
            .settings
            .as_ref()
            .and_then(|s| s.log_level.as_deref())
    }

    /// Start a tree for `repo_root`: root node registered and seeded from the
    /// `[root]` table, resolver built from `[third_party]`.
    pub fn build_tree(&self, repo_root: &str) -> Result<(ConfigTree, NodeId), TsGenError> {
        let mut tree = ConfigTree::new();
        if !self.user_config.third_party.is_empty() {
            let modules = StaticModuleMap::new(self.user_config.third_party.clone());
            debug!("Using {} third-party module mappings", modules.len());
            tree = tree.with_resolver(modules);
        }

        let root = tree.init_root(repo_root)?;
        self.user_config.root.apply(&mut tree, root);
        Ok((tree, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_repo_config_file_found() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[root]\nenvironment = \"node\"\n\n[third_party]\nreact = \"//:react\"\n",
        )
        .unwrap();

        let loader = ConfigLoader::new(None, dir.path()).unwrap();
        assert_eq!(loader.source(), Some(dir.path().join(CONFIG_FILE_NAME).as_path()));

        let (tree, root) = loader.build_tree("/repo").unwrap();
        assert_eq!(tree.node(root).environment_type().as_str(), "node");
        assert_eq!(
            tree.find_third_party_dependency(root, "react").as_deref(),
            Some("//:react")
        );
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = ConfigLoader::new(Some(&missing), dir.path());
        assert!(matches!(result, Err(TsGenError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[root\n").unwrap();
        assert!(ConfigLoader::from_file(&path).is_err());
    }

    #[test]
    fn test_log_level() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsgen.toml");
        fs::write(&path, "[settings]\nlog_level = \"trace\"\n").unwrap();
        let loader = ConfigLoader::new(Some(&path), dir.path()).unwrap();
        assert_eq!(loader.log_level(), Some("trace"));
    }

    #[test]
    fn test_default_tree() {
        let loader = ConfigLoader::default();
        let (tree, root) = loader.build_tree("/repo").unwrap();
        assert_eq!(tree.get(""), Some(root));
        assert!(tree.node(root).generation_enabled());
        assert_eq!(tree.find_third_party_dependency(root, "react"), None);
    }
}
