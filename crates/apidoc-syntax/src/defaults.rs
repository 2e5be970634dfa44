//! Placeholder values merged over parsed records.

use crate::interpreter::DocRecord;
use crate::model::{ActionDoc, ClassDoc};
use crate::url::UrlTarget;
use serde::Deserialize;

/// Placeholders for fields an action comment leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionDefaults {
    pub title: String,
    pub description: String,
    pub author: String,
    pub version: String,
    /// Used when neither `@method` nor URL inference supplies a method.
    pub method: String,
}

impl Default for ActionDefaults {
    fn default() -> Self {
        ActionDefaults {
            title: "(untitled method)".to_string(),
            description: "(no method description)".to_string(),
            author: "(anonymous)".to_string(),
            version: "1.0".to_string(),
            method: "(unspecified: internal api call, external POST)".to_string(),
        }
    }
}

/// Placeholders for fields a class comment leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassDefaults {
    pub title: String,
    pub description: String,
    pub author: String,
    pub version: String,
}

impl Default for ClassDefaults {
    fn default() -> Self {
        ClassDefaults {
            title: "(untitled module)".to_string(),
            description: "(no module description)".to_string(),
            author: "(anonymous)".to_string(),
            version: "1.0".to_string(),
        }
    }
}

/// Both placeholder sets, as read from the `[placeholders]` config table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub action: ActionDefaults,
    pub class: ClassDefaults,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ActionDoc {
    /// Merge a record over the placeholders. URL and method must already
    /// be resolved by the caller.
    pub fn from_record(
        record: DocRecord,
        url: UrlTarget,
        method: Option<String>,
        href: String,
        defaults: &ActionDefaults,
    ) -> Self {
        ActionDoc {
            title: or_default(record.title, &defaults.title),
            description: or_default(record.description, &defaults.description),
            author: or_default(record.author, &defaults.author),
            version: or_default(record.version, &defaults.version),
            url,
            method: or_default(method, &defaults.method),
            parameters: record.parameters,
            returns: record.returns,
            href,
            extra: record.extra,
            warnings: record.warnings,
        }
    }
}

impl ClassDoc {
    pub fn from_record(record: DocRecord, class: String, defaults: &ClassDefaults) -> Self {
        if !record.parameters.is_empty() || !record.returns.is_empty() {
            tracing::debug!(%class, "ignoring @param/@return on class comment");
        }
        ClassDoc {
            title: or_default(record.title, &defaults.title),
            description: or_default(record.description, &defaults.description),
            author: or_default(record.author, &defaults.author),
            version: or_default(record.version, &defaults.version),
            class,
            actions: Vec::new(),
            extra: record.extra,
            warnings: record.warnings,
        }
    }
}
