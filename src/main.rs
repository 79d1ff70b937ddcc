use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use tsgen_config::report::DependencyQuery;
use tsgen_config::{ConfigLoader, ResolvedPackage, Walker};

/// Resolve per-package TypeScript build-generation settings
///
/// Walks a source tree root to leaf, applying `# gazelle:` directives found in
/// each package's BUILD file on top of the settings inherited from its parent.
#[derive(Parser, Debug)]
#[command(name = "tsgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository root directory
    ///
    /// If not specified, attempts to auto-detect from:
    /// 1. Nearest ancestor containing a WORKSPACE or MODULE.bazel file
    /// 2. Current working directory
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Tool configuration file (defaults to <root>/.tsgen.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log to file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved settings of every package
    Resolve {
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Only print these packages
        packages: Vec<String>,
    },

    /// Check whether a dependency is ignored or a module resolves in a package
    Query {
        /// Package path relative to the root ("" for the root package)
        package: String,

        #[arg(short, long)]
        dependency: Option<String>,

        #[arg(short, long)]
        module: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

const WORKSPACE_MARKERS: &[&str] = &["MODULE.bazel", "WORKSPACE", "WORKSPACE.bazel"];

fn setup_logging(log_level: &str, log_file: Option<PathBuf>) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if let Some(log_path) = log_file {
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
        subscriber.with_writer(file).with_ansi(false).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

fn detect_repo_root(provided: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = provided {
        return path
            .canonicalize()
            .with_context(|| format!("Invalid root directory {}", path.display()));
    }

    let current_dir = std::env::current_dir()?;
    let mut dir = current_dir.as_path();

    loop {
        if WORKSPACE_MARKERS.iter().any(|m| dir.join(m).is_file()) {
            debug!("Detected workspace root: {}", dir.display());
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    debug!("Using current directory as repository root");
    Ok(current_dir)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let repo_root = detect_repo_root(args.root)?;
    let loader = ConfigLoader::new(args.config.as_deref(), &repo_root)?;

    let log_level = args
        .log_level
        .as_deref()
        .or(loader.log_level())
        .unwrap_or("warn")
        .to_string();
    setup_logging(&log_level, args.log_file)?;

    info!("Starting tsgen v{}", env!("CARGO_PKG_VERSION"));
    if let Some(source) = loader.source() {
        info!("Tool configuration: {}", source.display());
    }

    let source = Walker::new(&repo_root, &loader)
        .walk()
        .with_context(|| format!("Failed to resolve packages under {}", repo_root.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Resolve { format, packages } => {
            let selected: Vec<&str> = if packages.is_empty() {
                source.packages.iter().map(String::as_str).collect()
            } else {
                packages.iter().map(String::as_str).collect()
            };

            let mut resolved = Vec::with_capacity(selected.len());
            for package in selected {
                let package = tsgen_config::config::normalize_package(package);
                let entry = ResolvedPackage::resolve(&source.tree, &package)
                    .with_context(|| format!("Unknown package '{}'", package))?;
                resolved.push(entry);
            }

            match format {
                Format::Json => {
                    serde_json::to_writer_pretty(&mut out, &resolved)?;
                    writeln!(out)?;
                }
                Format::Text => {
                    for entry in &resolved {
                        write!(out, "{}", entry)?;
                    }
                }
            }
        }
        Command::Query {
            package,
            dependency,
            module,
        } => {
            if dependency.is_none() && module.is_none() {
                anyhow::bail!("Nothing to query: pass --dependency and/or --module");
            }

            let package = tsgen_config::config::normalize_package(&package);
            let id = source
                .node(&package)
                .with_context(|| format!("Unknown package '{}'", package))?;
            let query = DependencyQuery::run(
                &source.tree,
                &package,
                id,
                dependency.as_deref(),
                module.as_deref(),
            );
            serde_json::to_writer_pretty(&mut out, &query)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
