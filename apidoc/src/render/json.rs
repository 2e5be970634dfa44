//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the Catalogue directly; field names match the parsed
//! records (`title`, `description`, `parameters`, `validationRule`, ...).

use crate::catalogue::Catalogue;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, catalogue: &Catalogue) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(catalogue).context("failed to serialize catalogue")?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn renders_document_fields() {
        let config = Config::default();
        let catalogue = Catalogue::new(&config, None, Vec::new());
        let out = JsonRenderer.render(&catalogue).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "API-DOC");
        assert_eq!(value["classes"], serde_json::json!([]));
        assert!(value.get("category").is_none());
    }
}
