//! GitHub-flavored markdown renderer.
//!
//! Layout: document header, explain notes, index, one `##` section per
//! class with a `###` block per action, then the return-code table.

use crate::catalogue::Catalogue;
use crate::render::{display_url, Renderer};
use crate::toc;
use anyhow::Result;
use apidoc_syntax::{ActionDoc, ClassDoc, DocWarning, ParameterDoc};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, catalogue: &Catalogue) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("# {} {}\n", catalogue.title, catalogue.version));
        if let Some(ref category) = catalogue.category {
            lines.push(format!("_{}_ (`{}`)\n", category.name, category.app));
        }

        for section in &catalogue.explain {
            lines.push(format!("## {}\n", section.name));
            for line in &section.lines {
                lines.push(format!("* {}", line.replace('\n', "\n  ")));
            }
            lines.push(String::new());
        }

        if !catalogue.classes.is_empty() {
            lines.push("## Index\n".to_string());
            for class in &catalogue.classes {
                lines.push(toc::render_toc_item(&class.title, &class.class, 0));
                for action in &class.actions {
                    lines.push(toc::render_toc_item(&action.title, &action.href, 1));
                }
            }
            lines.push(String::new());
        }

        for class in &catalogue.classes {
            render_class(&mut lines, class, &catalogue.base_url);
        }

        if !catalogue.return_format.is_empty() {
            lines.push("## Return format\n".to_string());
            lines.push("| Field | Meaning |".to_string());
            lines.push("|---|---|".to_string());
            for (field, meaning) in &catalogue.return_format {
                lines.push(format!("| `{}` | {} |", field, cell(meaning)));
            }
            lines.push(String::new());
        }

        if !catalogue.code.is_empty() {
            lines.push("## Return codes\n".to_string());
            lines.push("| Code | Message |".to_string());
            lines.push("|---|---|".to_string());
            for (code, message) in &catalogue.code {
                lines.push(format!("| `{}` | {} |", code, cell(message)));
            }
            lines.push(String::new());
        }

        lines.push(format!("---\n\n{}\n", catalogue.copyright));
        Ok(lines.join("\n"))
    }
}

fn render_class(lines: &mut Vec<String>, class: &ClassDoc, base_url: &str) {
    lines.push(format!("<a id=\"{}\"></a>\n", toc::anchor(&class.class)));
    lines.push(format!("## {}\n", class.title));
    lines.push(format!("`{}`\n", class.class));
    lines.push(format!("{}\n", class.description));
    lines.push(format!("> Author: {} · Version: {}\n", class.author, class.version));
    render_extra(lines, &class.extra);
    render_warnings(lines, &class.warnings);

    for action in &class.actions {
        render_action(lines, action, base_url);
    }
}

/// Render a single action block.
fn render_action(lines: &mut Vec<String>, action: &ActionDoc, base_url: &str) {
    lines.push(format!("<a id=\"{}\"></a>\n", toc::anchor(&action.href)));
    lines.push(format!("### {}\n", action.title));
    lines.push(format!(
        "**{}** `{}`\n",
        action.method,
        display_url(&action.url, base_url)
    ));
    lines.push(format!("{}\n", action.description));
    lines.push(format!("> Author: {} · Version: {}\n", action.author, action.version));
    render_extra(lines, &action.extra);

    if !action.parameters.is_empty() {
        lines.push("#### Parameters\n".to_string());
        lines.push("| Name | Type | Default | Description | Validation |".to_string());
        lines.push("|---|---|---|---|---|".to_string());
        for p in &action.parameters {
            lines.push(format!(
                "| `{}` | {} | {} | {} | {} |",
                p.name,
                cell(&p.ty),
                cell(&p.default),
                cell(&p.description),
                render_rule(p)
            ));
        }
        lines.push(String::new());
    }

    if !action.returns.is_empty() {
        lines.push("#### Returns\n".to_string());
        lines.push("| Name | Type | Default | Description |".to_string());
        lines.push("|---|---|---|---|".to_string());
        for r in &action.returns {
            lines.push(format!(
                "| `{}` | {} | {} | {} |",
                r.name,
                cell(&r.ty),
                cell(&r.default),
                cell(&r.description)
            ));
        }
        lines.push(String::new());
    }

    render_warnings(lines, &action.warnings);
}

fn render_warnings(lines: &mut Vec<String>, warnings: &[DocWarning]) {
    if warnings.is_empty() {
        return;
    }
    lines.push("#### Warnings\n".to_string());
    for w in warnings {
        lines.push(format!("* {}", cell(&w.to_string())));
    }
    lines.push(String::new());
}

fn render_extra(lines: &mut Vec<String>, extra: &std::collections::BTreeMap<String, String>) {
    if extra.is_empty() {
        return;
    }
    let badges: Vec<String> = extra
        .iter()
        .map(|(tag, value)| {
            if value == apidoc_syntax::SENTINEL {
                format!("`@{}`", tag)
            } else {
                format!("`@{}` {}", tag, value)
            }
        })
        .collect();
    lines.push(format!("{}\n", badges.join(" · ")));
}

/// `require_id.max:20` → `require (id), max:20`
fn render_rule(p: &ParameterDoc) -> String {
    if p.validation_rule == apidoc_syntax::SENTINEL {
        return p.validation_rule.clone();
    }
    let rules: Vec<String> = p
        .validation_rule
        .split('.')
        .filter(|r| !r.is_empty())
        .map(|r| match r.split_once('_') {
            Some((rule, message)) => format!("{} ({})", rule, message),
            None => r.to_string(),
        })
        .collect();
    cell(&rules.join(", "))
}

/// Make text safe for a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
