//! HTML renderer: one self-contained page.

use crate::catalogue::Catalogue;
use crate::render::{display_url, Renderer};
use crate::toc;
use anyhow::Result;
use apidoc_syntax::{ActionDoc, ClassDoc, DocWarning, ParameterDoc};
use std::collections::BTreeMap;

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, catalogue: &Catalogue) -> Result<String> {
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!(
            "<title>{} {}</title>\n",
            html_escape(&catalogue.title),
            html_escape(&catalogue.version)
        ));
        out.push_str("<style>\n");
        out.push_str("body { font-family: system-ui, sans-serif; max-width: 60em; margin: 2em auto; padding: 0 1em; }\n");
        out.push_str("code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }\n");
        out.push_str("table { border-collapse: collapse; margin: 0.5em 0 1em; }\n");
        out.push_str("th, td { border: 1px solid #ddd; padding: 0.3em 0.6em; text-align: left; }\n");
        out.push_str(".method { display: inline-block; font-size: 0.75em; padding: 0.1em 0.4em; border-radius: 3px; background: #4a6fa5; color: white; }\n");
        out.push_str(".meta { color: #666; font-size: 0.9em; }\n");
        out.push_str(".warning { color: #a94442; }\n");
        out.push_str("</style>\n");
        out.push_str("</head>\n<body>\n");

        out.push_str(&format!(
            "<h1>{} <small>{}</small></h1>\n",
            html_escape(&catalogue.title),
            html_escape(&catalogue.version)
        ));
        if let Some(ref category) = catalogue.category {
            out.push_str(&format!(
                "<p class=\"meta\">{} (<code>{}</code>)</p>\n",
                html_escape(&category.name),
                html_escape(&category.app)
            ));
        }

        for section in &catalogue.explain {
            out.push_str(&format!("<h2>{}</h2>\n<ul>\n", html_escape(&section.name)));
            for line in &section.lines {
                out.push_str(&format!("  <li>{}</li>\n", html_escape(line)));
            }
            out.push_str("</ul>\n");
        }

        // Index
        if !catalogue.classes.is_empty() {
            out.push_str("<h2>Index</h2>\n<ul>\n");
            for class in &catalogue.classes {
                out.push_str(&format!(
                    "  <li><a href=\"#{}\">{}</a>\n",
                    html_escape(&toc::anchor(&class.class)),
                    html_escape(&class.title)
                ));
                if !class.actions.is_empty() {
                    out.push_str("    <ul>\n");
                    for action in &class.actions {
                        out.push_str(&format!(
                            "      <li><a href=\"#{}\">{}</a></li>\n",
                            html_escape(&toc::anchor(&action.href)),
                            html_escape(&action.title)
                        ));
                    }
                    out.push_str("    </ul>\n");
                }
                out.push_str("  </li>\n");
            }
            out.push_str("</ul>\n");
        }

        for class in &catalogue.classes {
            out.push_str(&render_class_html(class, &catalogue.base_url));
        }

        if !catalogue.return_format.is_empty() {
            out.push_str("<h2>Return format</h2>\n");
            out.push_str(&render_pairs(&catalogue.return_format, "Field", "Meaning"));
        }
        if !catalogue.code.is_empty() {
            out.push_str("<h2>Return codes</h2>\n");
            out.push_str(&render_pairs(&catalogue.code, "Code", "Message"));
        }

        out.push_str(&format!(
            "<footer class=\"meta\">{}</footer>\n",
            html_escape(&catalogue.copyright)
        ));
        out.push_str("</body>\n</html>\n");
        Ok(out)
    }
}

fn render_class_html(class: &ClassDoc, base_url: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "<h2 id=\"{}\">{}</h2>\n",
        html_escape(&toc::anchor(&class.class)),
        html_escape(&class.title)
    ));
    out.push_str(&format!("<p><code>{}</code></p>\n", html_escape(&class.class)));
    out.push_str(&format!("<p>{}</p>\n", html_escape(&class.description)));
    out.push_str(&format!(
        "<p class=\"meta\">Author: {} · Version: {}</p>\n",
        html_escape(&class.author),
        html_escape(&class.version)
    ));
    out.push_str(&render_warnings(&class.warnings));

    for action in &class.actions {
        out.push_str(&render_action_html(action, base_url));
    }
    out
}

fn render_action_html(action: &ActionDoc, base_url: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "<h3 id=\"{}\">{}</h3>\n",
        html_escape(&toc::anchor(&action.href)),
        html_escape(&action.title)
    ));
    out.push_str(&format!(
        "<p><span class=\"method\">{}</span> <code>{}</code></p>\n",
        html_escape(&action.method),
        html_escape(&display_url(&action.url, base_url))
    ));
    out.push_str(&format!("<p>{}</p>\n", html_escape(&action.description)));
    out.push_str(&format!(
        "<p class=\"meta\">Author: {} · Version: {}</p>\n",
        html_escape(&action.author),
        html_escape(&action.version)
    ));

    if !action.parameters.is_empty() {
        out.push_str("<h4>Parameters</h4>\n");
        out.push_str(&render_fields(&action.parameters, true));
    }
    if !action.returns.is_empty() {
        out.push_str("<h4>Returns</h4>\n");
        out.push_str(&render_fields(&action.returns, false));
    }

    out.push_str(&render_warnings(&action.warnings));
    out
}

fn render_warnings(warnings: &[DocWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"warning\">\n");
    for w in warnings {
        out.push_str(&format!("  <li>{}</li>\n", html_escape(&w.to_string())));
    }
    out.push_str("</ul>\n");
    out
}

fn render_fields(fields: &[ParameterDoc], with_rule: bool) -> String {
    let mut out = String::from("<table>\n<tr><th>Name</th><th>Type</th><th>Default</th><th>Description</th>");
    if with_rule {
        out.push_str("<th>Validation</th>");
    }
    out.push_str("</tr>\n");
    for f in fields {
        out.push_str(&format!(
            "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td>",
            html_escape(&f.name),
            html_escape(&f.ty),
            html_escape(&f.default),
            html_escape(&f.description)
        ));
        if with_rule {
            out.push_str(&format!("<td>{}</td>", html_escape(&f.validation_rule)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

fn render_pairs(pairs: &BTreeMap<String, String>, key: &str, value: &str) -> String {
    let mut out = format!("<table>\n<tr><th>{}</th><th>{}</th></tr>\n", key, value);
    for (k, v) in pairs {
        out.push_str(&format!(
            "<tr><td><code>{}</code></td><td>{}</td></tr>\n",
            html_escape(k),
            html_escape(v)
        ));
    }
    out.push_str("</table>\n");
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
