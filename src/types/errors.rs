use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsGenError {
    #[error("Package '{package}' visited before its parent package '{parent}'")]
    TreeOrderingViolation { package: String, parent: String },

    #[error("The root package has no parent package")]
    RootHasNoParent,

    #[error("Package '{0}' already has a configuration node")]
    PackageAlreadyRegistered(String),

    #[error("Directive '{directive}' specified more than once in package '{package}'")]
    DuplicateDirective { directive: String, package: String },

    #[error("Invalid value '{value}' for directive '{directive}': {reason}")]
    InvalidDirectiveValue {
        directive: String,
        value: String,
        reason: String,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Path is not inside the repository root: {0}")]
    PathNotInRepo(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, TsGenError>;
