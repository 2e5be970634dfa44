//! apidoc: generate API documentation from annotated PHP controllers.
//!
//! Two modes, as with any filter-style doc tool:
//!
//! - **stdin mode**: `apidoc < Order.php`
//! - **file mode**: `apidoc -f html -o docs/api.html app/shop/controller`
//!
//! `--category N` reads the N-th configured `api_type` directory, and
//! `--detail Class::method` prints one action as JSON.

mod catalogue;
mod config;
mod render;
mod source;
mod toc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::catalogue::Catalogue;
use crate::config::{ApiType, Config};
use crate::source::ClassSource;

#[derive(Parser)]
#[command(
    name = "apidoc",
    about = "Generate API documentation from annotated PHP controller comments"
)]
struct Cli {
    /// Input files or directories (glob patterns supported). If omitted,
    /// reads from stdin.
    inputs: Vec<String>,

    /// Config file [default: ./apidoc.toml when present]
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format: markdown (default), html, json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Write to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Application root that `api_type` apps are resolved against
    #[arg(long, default_value = ".")]
    base: PathBuf,

    /// Document the N-th configured API category (0-based)
    #[arg(long)]
    category: Option<usize>,

    /// Print one action, `Class::method`, with the global request settings
    #[arg(long)]
    detail: Option<String>,

    /// Log parse steps to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let renderer = render::create_renderer(&cli.format)?;

    let category = match cli.category {
        Some(index) => Some(config.category(index)?.clone()),
        None => None,
    };

    let sources = if cli.inputs.is_empty() && category.is_none() {
        stdin_sources()?
    } else {
        file_sources(&cli.inputs, category.as_ref(), &cli.base)?
    };

    let output = match cli.detail {
        Some(ref href) => {
            let detail = catalogue::detail(&sources, href, &config)?;
            let mut json = serde_json::to_string_pretty(&detail)?;
            json.push('\n');
            json
        }
        None => {
            let classes = catalogue::build(&sources, &config);
            for class in &classes {
                for (at, warning) in class.all_warnings() {
                    tracing::warn!("{}: {}", at, warning);
                }
            }
            let catalogue = Catalogue::new(&config, category, classes);
            tracing::debug!(
                classes = catalogue.classes.len(),
                actions = catalogue.action_count(),
                "catalogue built"
            );
            renderer.render(&catalogue)?
        }
    };

    write_output(cli.output.as_deref(), &output)
}

/// stderr logging: `-v` means debug, otherwise `RUST_LOG` or warn.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

/// stdin mode: one PHP source text.
fn stdin_sources() -> Result<Vec<ClassSource>> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(source::php::scan(&input))
}

/// file mode: every matched file, plus the category directory if any.
fn file_sources(
    inputs: &[String],
    category: Option<&ApiType>,
    base: &Path,
) -> Result<Vec<ClassSource>> {
    let mut patterns = inputs.to_vec();
    if let Some(api_type) = category {
        let dir = api_type.source_dir(base);
        if !dir.is_dir() {
            bail!(
                "category {} has no source directory: {}",
                api_type.name,
                dir.display()
            );
        }
        tracing::debug!(category = %api_type.name, dir = %dir.display(), "reading category");
        patterns.push(dir.to_string_lossy().to_string());
    }

    let mut sources = Vec::new();
    for path in expand_globs(&patterns)? {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        match source::open(&path, content) {
            Ok(src) => sources.extend(src.classes()),
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }
    Ok(sources)
}

/// Expand glob patterns into a list of real file paths.
/// Directories are scanned recursively for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if entry.file_type().is_file() && is_supported(p) {
                    files.push(p.to_path_buf());
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| source::SUPPORTED_EXTENSIONS.contains(&ext))
}

fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    let Some(path) = path else {
        print!("{}", output);
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote output");
    Ok(())
}
