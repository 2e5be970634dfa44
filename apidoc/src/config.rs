//! `apidoc.toml`: document settings, API categories and placeholders.
//!
//! Every key is optional; a missing file means built-in defaults.

use anyhow::{bail, Context, Result};
use apidoc_syntax::Defaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "apidoc.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub version: String,
    pub copyright: String,
    /// Prefix for routed paths when rendering (e.g. `https://api.example.com`).
    pub base_url: String,
    /// Whether the global request headers apply to actions.
    pub is_header: bool,
    /// Global request headers (tokens and the like).
    pub header: BTreeMap<String, serde_json::Value>,
    /// Global request parameters.
    pub params: BTreeMap<String, serde_json::Value>,
    /// Method names never parsed, on top of `__construct`.
    pub filter_method: Vec<String>,
    pub api_type: Vec<ApiType>,
    pub return_format: BTreeMap<String, String>,
    /// Return codes and their messages.
    pub code: BTreeMap<String, String>,
    pub explain: Vec<ExplainSection>,
    pub placeholders: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: "API-DOC".to_string(),
            version: "1.0.0".to_string(),
            copyright: "Powered By Api Doc".to_string(),
            base_url: String::new(),
            is_header: true,
            header: BTreeMap::new(),
            params: BTreeMap::new(),
            filter_method: [
                "_empty", "initialize", "_initialize", "__destruct", "__get", "__set", "__isset",
                "__unset", "__call", "__clone", "__toString", "__debugInfo",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            api_type: Vec::new(),
            return_format: BTreeMap::from([
                ("status".to_string(), "200/300/301/302".to_string()),
                ("message".to_string(), "message text".to_string()),
            ]),
            code: BTreeMap::new(),
            explain: Vec::new(),
            placeholders: Defaults::default(),
        }
    }
}

/// One API category: an application and how its classes are reached.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiType {
    pub name: String,
    pub app: String,
    #[serde(default)]
    pub kind: ApiKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    /// Domain application: in-process `api` classes.
    Domain,
    /// Public application: routed `controller` classes.
    #[default]
    External,
}

impl ApiType {
    /// Directory holding this category's classes under the application root.
    pub fn source_dir(&self, base: &Path) -> PathBuf {
        let layer = match self.kind {
            ApiKind::Domain => "api",
            ApiKind::External => "controller",
        };
        base.join(&self.app).join(layer)
    }
}

/// A titled list of notes shown before the catalogue.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplainSection {
    pub name: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Config {
    /// Load from `--config`, else `./apidoc.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let candidate = Path::new(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(candidate)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE}, using built-in defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        for (i, t) in config.api_type.iter().enumerate() {
            if t.app.trim().is_empty() {
                bail!("api_type[{}] ({}) has an empty app", i, t.name);
            }
        }
        Ok(config)
    }

    /// Methods excluded from parsing: `__construct` plus `filter_method`.
    pub fn is_filtered(&self, method: &str) -> bool {
        method == "__construct" || self.filter_method.iter().any(|m| m == method)
    }

    pub fn category(&self, index: usize) -> Result<&ApiType> {
        self.api_type.get(index).with_context(|| {
            format!(
                "unknown category {}: {} configured in api_type",
                index,
                self.api_type.len()
            )
        })
    }
}
