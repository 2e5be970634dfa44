//! Output formats for a catalogue.

pub mod html;
pub mod json;
pub mod markdown;

use crate::catalogue::Catalogue;
use anyhow::{anyhow, Result};
use apidoc_syntax::UrlTarget;

/// Trait for rendering a Catalogue into a specific output format.
pub trait Renderer {
    fn render(&self, catalogue: &Catalogue) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use markdown, html, or json",
            format
        )),
    }
}

/// Human-readable URL: routed paths get the configured base URL.
pub fn display_url(url: &UrlTarget, base_url: &str) -> String {
    match url {
        UrlTarget::Path { path } if path.starts_with('/') => {
            format!("{}{}", base_url.trim_end_matches('/'), path)
        }
        UrlTarget::Unavailable => "(no url available)".to_string(),
        other => other.to_string(),
    }
}
