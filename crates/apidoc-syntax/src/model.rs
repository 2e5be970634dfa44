//! Parsed documentation records: what the host layer consumes.

use crate::url::UrlTarget;
use crate::warning::DocWarning;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sentinel for an optional field absent from the comment.
pub const SENTINEL: &str = "-";

/// One `@param` or `@return` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDoc {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub default: String,
    pub description: String,
    /// Validation rules, `.`-separated, messages after `_`
    /// (e.g. `require_id.number`). Always the sentinel on returns.
    pub validation_rule: String,
}

/// Parsed documentation for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDoc {
    pub title: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub url: UrlTarget,
    pub method: String,
    pub parameters: Vec<ParameterDoc>,
    pub returns: Vec<ParameterDoc>,
    /// `<fully-qualified-class>::<method>`
    pub href: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DocWarning>,
}

/// Parsed documentation for one class and its documented methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDoc {
    pub title: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub class: String,
    #[serde(rename = "action")]
    pub actions: Vec<ActionDoc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DocWarning>,
}

impl ClassDoc {
    /// Warnings on the class and on every action, in catalogue order.
    pub fn all_warnings(&self) -> impl Iterator<Item = (&str, &DocWarning)> {
        self.warnings
            .iter()
            .map(move |w| (self.class.as_str(), w))
            .chain(
                self.actions
                    .iter()
                    .flat_map(|a| a.warnings.iter().map(move |w| (a.href.as_str(), w))),
            )
    }
}
