//! Catalogue assembly: class and action records for every discovered class.
//!
//! A class is listed only when its own comment carries tags. Its actions
//! are the public methods declared in it, minus filtered names, that have
//! a tagged comment. Problems with one class never affect its siblings.

use crate::config::{ApiType, Config, ExplainSection};
use crate::source::{ClassSource, Visibility};
use anyhow::{anyhow, bail, Result};
use apidoc_syntax::{ActionDoc, ClassDoc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything a renderer needs.
#[derive(Debug, Serialize)]
pub struct Catalogue {
    pub title: String,
    pub version: String,
    pub copyright: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ApiType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explain: Vec<ExplainSection>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub code: BTreeMap<String, String>,
    pub return_format: BTreeMap<String, String>,
    pub classes: Vec<ClassDoc>,
}

impl Catalogue {
    pub fn new(config: &Config, category: Option<ApiType>, classes: Vec<ClassDoc>) -> Self {
        Catalogue {
            title: config.title.clone(),
            version: config.version.clone(),
            copyright: config.copyright.clone(),
            base_url: config.base_url.clone(),
            category,
            explain: config.explain.clone(),
            code: config.code.clone(),
            return_format: config.return_format.clone(),
            classes,
        }
    }

    /// Number of documented actions across all classes.
    pub fn action_count(&self) -> usize {
        self.classes.iter().map(|c| c.actions.len()).sum()
    }
}

/// Build class records, sorted by qualified class name.
pub fn build(sources: &[ClassSource], config: &Config) -> Vec<ClassDoc> {
    let mut classes: Vec<ClassDoc> = sources
        .iter()
        .filter_map(|source| build_class(source, config))
        .collect();
    classes.sort_by(|a, b| a.class.cmp(&b.class));
    classes
}

fn build_class(source: &ClassSource, config: &Config) -> Option<ClassDoc> {
    let Some(mut doc) =
        apidoc_syntax::parse_class(&source.comment, &source.name, &config.placeholders.class)
    else {
        tracing::debug!(class = %source.name, "class has no doc tags, skipped");
        return None;
    };

    doc.actions = source
        .methods
        .iter()
        .filter(|m| m.visibility == Visibility::Public && !config.is_filtered(&m.name))
        .filter_map(|m| {
            apidoc_syntax::parse_action(
                &m.comment,
                &source.name,
                &m.name,
                &config.placeholders.action,
            )
        })
        .collect();
    Some(doc)
}

/// One action plus the global request settings, as the detail view shows it.
#[derive(Debug, Serialize)]
pub struct ActionDetail {
    #[serde(flatten)]
    pub action: ActionDoc,
    pub is_header: bool,
    #[serde(rename = "_header")]
    pub header: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "_params")]
    pub params: BTreeMap<String, serde_json::Value>,
}

/// Look up `Class::method` and parse it, whether or not the class itself
/// is documented.
pub fn detail(sources: &[ClassSource], href: &str, config: &Config) -> Result<ActionDetail> {
    let (class, method) = href
        .rsplit_once("::")
        .ok_or_else(|| anyhow!("expected Class::method, got `{}`", href))?;
    let class = class.trim_start_matches('\\');

    let source = sources
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(class))
        .ok_or_else(|| anyhow!("class not found: {}", class))?;
    let Some(method_source) = source.methods.iter().find(|m| m.name == method) else {
        bail!("method not found: {}::{}", source.name, method);
    };

    let action = apidoc_syntax::parse_action(
        &method_source.comment,
        &source.name,
        &method_source.name,
        &config.placeholders.action,
    )
    .ok_or_else(|| anyhow!("{}::{} has no doc tags", source.name, method))?;

    Ok(ActionDetail {
        action,
        is_header: config.is_header,
        header: config.header.clone(),
        params: config.params.clone(),
    })
}
