//! Index links and anchor slugs for the markdown and HTML renderers.
//!
//! Anchors are derived from the action's `href` (or the class name), not
//! from titles, so duplicate or placeholder titles still link correctly.

/// Anchor for a class or action identifier.
///
/// GitHub heading slug rules: lowercase, keep alphanumerics, spaces and
/// hyphens, drop everything else (`\`, `:`, `.`, `_`), spaces become hyphens.
pub fn anchor(id: &str) -> String {
    let mut slug = String::with_capacity(id.len());
    for c in id.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Markdown index entry, indented by nesting depth.
pub fn render_toc_item(title: &str, id: &str, depth: usize) -> String {
    format!(
        "{}* [{}](#{})",
        "  ".repeat(depth),
        escape_link_text(title),
        anchor(id)
    )
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
