//! Tool configuration file parsing

use crate::config::node::EnvironmentType;
use crate::config::tree::{ConfigTree, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub settings: Option<Settings>,
    pub root: RootSettings,
    /// Module name -> build label, consulted when resolving third-party imports.
    pub third_party: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub log_level: Option<String>,
}

/// Values seeded into the root package before any directive is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootSettings {
    pub generation: Option<bool>,
    pub environment: Option<EnvironmentType>,
    pub validate_import_statements: Option<bool>,
    pub library_naming_convention: Option<String>,
    pub test_naming_convention: Option<String>,
    pub exclude: Vec<String>,
    pub ignore_dependencies: Vec<String>,
}

impl RootSettings {
    pub fn apply(&self, tree: &mut ConfigTree, root: NodeId) {
        let node = tree.node_mut(root);
        if let Some(enabled) = self.generation {
            node.set_generation_enabled(enabled);
        }
        if let Some(environment) = self.environment {
            node.set_environment_type(environment);
        }
        if let Some(validate) = self.validate_import_statements {
            node.set_default_validate_import_statements(validate);
        }
        if let Some(template) = &self.library_naming_convention {
            node.set_library_naming_template(template.clone());
        }
        if let Some(template) = &self.test_naming_convention {
            node.set_test_naming_template(template.clone());
        }
        for dependency in &self.ignore_dependencies {
            node.add_ignored_dependency(dependency);
        }
        for pattern in &self.exclude {
            tree.add_excluded_pattern(root, pattern.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: UserConfig = toml::from_str(
            r#"
            [settings]
            log_level = "debug"

            [root]
            generation = false
            environment = "browser"
            validate_import_statements = false
            library_naming_convention = "$package_name$_lib"
            exclude = ["**/dist"]
            ignore_dependencies = ["left-pad"]

            [third_party]
            react = "//:node_modules/react"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.settings.unwrap().log_level.as_deref(),
            Some("debug")
        );
        assert_eq!(config.root.environment, Some(EnvironmentType::Browser));
        assert_eq!(config.root.test_naming_convention, None);
        assert_eq!(config.third_party["react"], "//:node_modules/react");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert!(config.settings.is_none());
        assert!(config.root.exclude.is_empty());
        assert!(config.third_party.is_empty());
    }

    #[test]
    fn test_apply_root_settings() {
        let settings = RootSettings {
            generation: Some(false),
            environment: Some(EnvironmentType::Node),
            validate_import_statements: Some(false),
            library_naming_convention: Some("$package_name$_lib".to_string()),
            test_naming_convention: None,
            exclude: vec!["dist".to_string()],
            ignore_dependencies: vec![" fs ".to_string()],
        };

        let mut tree = ConfigTree::new();
        let root = tree.init_root("/repo").unwrap();
        settings.apply(&mut tree, root);

        let node = tree.node(root);
        assert!(!node.generation_enabled());
        assert_eq!(node.environment_type(), EnvironmentType::Node);
        assert!(!node.validate_import_statements());
        assert_eq!(node.validate_import_statements_explicit(), None);
        assert_eq!(node.render_library_name("app"), "app_lib");
        assert_eq!(node.render_test_name("app"), "app_test");
        assert!(tree.is_dependency_ignored(root, "fs"));
        assert_eq!(tree.excluded_patterns(root), ["dist"]);
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let result = toml::from_str::<UserConfig>("[root]\nenvironment = \"deno\"\n");
        assert!(result.is_err());
    }
}
