//! Parsing library for apidoc comments.
//!
//! Turns a raw doc comment into a typed [`ActionDoc`] or [`ClassDoc`]:
//!
//! 1. [`tokenizer::tokenize`]: `@tag` lines → token lists
//! 2. [`interpreter::interpret`]: token lists → [`DocRecord`]
//! 3. [`url::infer`]: fallback URL from the qualified class name
//! 4. [`defaults`]: placeholders merged over missing fields
//!
//! Everything here is pure: no I/O, no shared state.

pub mod defaults;
pub mod interpreter;
pub mod model;
pub mod tokenizer;
pub mod url;
pub mod warning;

pub use defaults::{ActionDefaults, ClassDefaults, Defaults};
pub use interpreter::DocRecord;
pub use model::{ActionDoc, ClassDoc, ParameterDoc, SENTINEL};
pub use url::{InferredUrl, UrlExpr, UrlTarget};
pub use warning::{DocWarning, SyntaxError};

/// Tokenize and interpret a comment block.
pub fn parse_comment(comment: &str) -> DocRecord {
    interpreter::interpret(&tokenizer::tokenize(comment))
}

/// Parse a class comment. `None` when the comment carries no tags.
pub fn parse_class(comment: &str, class: &str, defaults: &ClassDefaults) -> Option<ClassDoc> {
    let record = parse_comment(comment);
    if record.is_empty() {
        return None;
    }
    Some(ClassDoc::from_record(record, class.to_string(), defaults))
}

/// Parse a method comment. `None` when the comment carries no tags.
///
/// Without a usable `@url`, the URL is inferred from `class`; when that
/// fails too, the action gets [`UrlTarget::Unavailable`] and a warning.
pub fn parse_action(
    comment: &str,
    class: &str,
    method: &str,
    defaults: &ActionDefaults,
) -> Option<ActionDoc> {
    let mut record = parse_comment(comment);
    if record.is_empty() {
        return None;
    }

    let mut http_method = record.method.take();
    let url = match record.url.take() {
        Some(url) => url,
        None => match url::infer(class, method) {
            Ok(inferred) => {
                if inferred.method.is_some() {
                    http_method = inferred.method;
                }
                inferred.url
            }
            Err(warning) => {
                record.warnings.push(warning);
                UrlTarget::Unavailable
            }
        },
    };

    let href = format!("{class}::{method}");
    tracing::debug!(%href, %url, "parsed action");
    Some(ActionDoc::from_record(record, url, http_method, href, defaults))
}
