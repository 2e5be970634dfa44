//! Action URLs: the closed `@url` expression grammar and URL inference
//! from qualified class names.
//!
//! `@url` values are parsed, never evaluated. The accepted shapes are:
//!
//! - a literal path or URL, bare or quoted: `/shop/order/list`, `'/shop/order/list'`
//! - `url('<path>')`
//! - `api('<class>', '<action>'[, '$data'])`: in-process invocation
//!
//! Everything else is rejected with a [`SyntaxError`].

use crate::warning::{DocWarning, SyntaxError};
use serde::Serialize;
use std::fmt;

/// Where an action can be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UrlTarget {
    /// Routed HTTP path (or absolute URL).
    Path { path: String },
    /// Invocation descriptor: called through the internal cross-module
    /// mechanism rather than a routed URL.
    Invoke { class: String, action: String },
    /// Neither an explicit nor an inferred URL exists.
    Unavailable,
}

impl UrlTarget {
    pub fn path(path: impl Into<String>) -> Self {
        UrlTarget::Path { path: path.into() }
    }

    pub fn is_invoke(&self) -> bool {
        matches!(self, UrlTarget::Invoke { .. })
    }
}

impl fmt::Display for UrlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlTarget::Path { path } => f.write_str(path),
            UrlTarget::Invoke { class, action } => write!(f, "api('{class}','{action}','$data')"),
            UrlTarget::Unavailable => f.write_str("-"),
        }
    }
}

// -- @url expression grammar --------------------------------------------------

/// A parsed `@url` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlExpr {
    Literal(String),
    UrlCall(String),
    ApiCall { class: String, action: String },
}

impl UrlExpr {
    /// Parse a raw `@url` token.
    pub fn parse(raw: &str) -> Result<Self, SyntaxError> {
        let text = raw.trim().trim_end_matches(';').trim_end();
        if text.is_empty() {
            return Err(SyntaxError::Empty);
        }

        let first = text.chars().next().unwrap_or_default();
        if first == '\'' || first == '"' {
            let mut cursor = Cursor::new(text);
            let value = cursor.string_literal()?;
            cursor.skip_blanks();
            if let Some(c) = cursor.peek() {
                return Err(SyntaxError::UnexpectedChar(c));
            }
            return literal_path(&value).map(UrlExpr::Literal);
        }

        if looks_like_path(text) {
            return literal_path(text).map(UrlExpr::Literal);
        }

        let (name, args) = parse_call(text)?;
        match name.as_str() {
            "url" => match args.as_slice() {
                [Arg::Str(path)] => literal_path(path).map(UrlExpr::UrlCall),
                [_] => Err(SyntaxError::NotALiteral(1)),
                _ => Err(SyntaxError::Arity {
                    function: name,
                    expected: "1",
                    found: args.len(),
                }),
            },
            "api" => {
                if !(2..=3).contains(&args.len()) {
                    return Err(SyntaxError::Arity {
                        function: name,
                        expected: "2 or 3",
                        found: args.len(),
                    });
                }
                let class = match &args[0] {
                    Arg::Str(s) if is_qualified_name(s) => s.clone(),
                    _ => return Err(SyntaxError::NotALiteral(1)),
                };
                let action = match &args[1] {
                    Arg::Str(s) if is_identifier(s) => s.clone(),
                    _ => return Err(SyntaxError::NotALiteral(2)),
                };
                // Only the `$data` placeholder may be passed as payload.
                if let Some(payload) = args.get(2) {
                    let ok = match payload {
                        Arg::Str(s) | Arg::Var(s) => s == "$data",
                    };
                    if !ok {
                        return Err(SyntaxError::NotALiteral(3));
                    }
                }
                Ok(UrlExpr::ApiCall { class, action })
            }
            _ => Err(SyntaxError::UnknownFunction(name)),
        }
    }

    pub fn into_target(self) -> UrlTarget {
        match self {
            UrlExpr::Literal(path) | UrlExpr::UrlCall(path) => UrlTarget::Path { path },
            UrlExpr::ApiCall { class, action } => UrlTarget::Invoke { class, action },
        }
    }
}

#[derive(Debug, PartialEq)]
enum Arg {
    Str(String),
    Var(String),
}

fn looks_like_path(text: &str) -> bool {
    text.starts_with('/') || text.starts_with("http://") || text.starts_with("https://")
}

fn literal_path(text: &str) -> Result<String, SyntaxError> {
    if !looks_like_path(text) {
        return Err(SyntaxError::NotAPath(text.to_string()));
    }
    if let Some(c) = text
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '`' | '\\' | ';' | '$' | '(' | ')'))
    {
        return Err(SyntaxError::UnexpectedChar(c));
    }
    Ok(text.to_string())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_qualified_name(s: &str) -> bool {
    s.split(['\\', '.'])
        .filter(|seg| !seg.is_empty())
        .all(is_identifier)
        && s.chars().any(|c| c.is_ascii_alphabetic())
}

/// Parse `name(arg, arg, ...)` where every argument is a quoted string or
/// a bare `$variable`.
fn parse_call(text: &str) -> Result<(String, Vec<Arg>), SyntaxError> {
    let mut cursor = Cursor::new(text);
    let name = cursor.identifier();
    if name.is_empty() {
        return Err(match cursor.peek() {
            Some(c) => SyntaxError::UnexpectedChar(c),
            None => SyntaxError::Empty,
        });
    }
    cursor.skip_blanks();
    cursor.expect('(')?;

    let mut args = Vec::new();
    cursor.skip_blanks();
    if cursor.peek() == Some(')') {
        cursor.bump();
    } else {
        loop {
            cursor.skip_blanks();
            let arg = match cursor.peek() {
                Some('\'' | '"') => Arg::Str(cursor.string_literal()?),
                Some('$') => {
                    cursor.bump();
                    let ident = cursor.identifier();
                    if ident.is_empty() {
                        return Err(SyntaxError::NotALiteral(args.len() + 1));
                    }
                    Arg::Var(format!("${ident}"))
                }
                Some(_) => return Err(SyntaxError::NotALiteral(args.len() + 1)),
                None => return Err(SyntaxError::UnterminatedString),
            };
            args.push(arg);
            cursor.skip_blanks();
            match cursor.bump() {
                Some(',') => continue,
                Some(')') => break,
                Some(c) => return Err(SyntaxError::UnexpectedChar(c)),
                None => return Err(SyntaxError::UnterminatedString),
            }
        }
    }

    cursor.skip_blanks();
    if let Some(c) = cursor.peek() {
        return Err(SyntaxError::UnexpectedChar(c));
    }
    Ok((name, args))
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            chars: text.chars().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), SyntaxError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(SyntaxError::UnexpectedChar(c)),
            None => Err(SyntaxError::Empty),
        }
    }

    fn identifier(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    /// Read a single- or double-quoted literal. Only `\\` and an escaped
    /// closing quote are unescaped; other backslashes are kept, so
    /// namespace separators survive.
    fn string_literal(&mut self) -> Result<String, SyntaxError> {
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(SyntaxError::UnexpectedChar(c)),
            None => return Err(SyntaxError::Empty),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SyntaxError::UnterminatedString),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.peek() {
                    Some(next) if next == quote || next == '\\' => {
                        out.push(next);
                        self.bump();
                    }
                    _ => out.push('\\'),
                },
                Some(c) => out.push(c),
            }
        }
    }
}

// -- URL inference ------------------------------------------------------------

/// Result of inferring a URL from a qualified class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredUrl {
    pub url: UrlTarget,
    /// `Some("api")` for invocation descriptors; routed paths leave the
    /// method to the caller's default.
    pub method: Option<String>,
}

/// Layer name whose classes are invoked in-process instead of routed.
pub const API_LAYER: &str = "api";

/// Infer an action's URL from `<root>\<app>\<layer>\<module>[\<sub>]` and
/// the method name.
///
/// Segments may be separated by `\` or `.`. Fewer than four segments is a
/// [`DocWarning::MalformedQualifiedName`].
pub fn infer(qualified_class: &str, method: &str) -> Result<InferredUrl, DocWarning> {
    let segments: Vec<String> = qualified_class
        .split(['\\', '.'])
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();

    if segments.len() < 4 {
        return Err(DocWarning::MalformedQualifiedName {
            name: qualified_class.to_string(),
            segments: segments.len(),
        });
    }

    if segments[2] == API_LAYER {
        return Ok(InferredUrl {
            url: UrlTarget::Invoke {
                class: qualified_class.trim_start_matches('\\').to_string(),
                action: method.to_string(),
            },
            method: Some(API_LAYER.to_string()),
        });
    }

    let module = match segments.get(4) {
        Some(sub) => format!("{}.{}", segments[3], sub),
        None => segments[3].clone(),
    };
    Ok(InferredUrl {
        url: UrlTarget::path(format!("/{}/{}/{}", segments[1], module, method)),
        method: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- grammar --

    #[test]
    fn parse_bare_path() {
        assert_eq!(
            UrlExpr::parse("/shop/order/list").unwrap(),
            UrlExpr::Literal("/shop/order/list".to_string())
        );
    }

    #[test]
    fn parse_quoted_path_and_absolute_url() {
        assert_eq!(
            UrlExpr::parse("'/shop/order/list'").unwrap(),
            UrlExpr::Literal("/shop/order/list".to_string())
        );
        assert_eq!(
            UrlExpr::parse("\"https://example.com/v1/users\"").unwrap(),
            UrlExpr::Literal("https://example.com/v1/users".to_string())
        );
    }

    #[test]
    fn parse_url_call() {
        assert_eq!(
            UrlExpr::parse("url('/index/user/info');").unwrap(),
            UrlExpr::UrlCall("/index/user/info".to_string())
        );
    }

    #[test]
    fn parse_api_call() {
        let expr = UrlExpr::parse(r"api('app\website\api\Article','add','$data')").unwrap();
        assert_eq!(
            expr,
            UrlExpr::ApiCall {
                class: r"app\website\api\Article".to_string(),
                action: "add".to_string(),
            }
        );
        let bare_var = UrlExpr::parse(r#"api("app\shop\api\Cart", "clear", $data)"#).unwrap();
        assert!(bare_var.into_target().is_invoke());
    }

    #[test]
    fn reject_arbitrary_code() {
        assert_eq!(
            UrlExpr::parse("system('rm -rf /')"),
            Err(SyntaxError::UnknownFunction("system".to_string()))
        );
        assert!(UrlExpr::parse("$_GET['x']").is_err());
        assert!(UrlExpr::parse("/a;phpinfo()").is_err());
        assert!(UrlExpr::parse("url($path)").is_err());
        assert!(UrlExpr::parse("api('A\\B','x','$other')").is_err());
        assert!(UrlExpr::parse("api('A','x-y')").is_err());
        assert!(UrlExpr::parse("'/ok' . $tail").is_err());
    }

    #[test]
    fn reject_non_path_literal() {
        assert_eq!(
            UrlExpr::parse("'index.php'"),
            Err(SyntaxError::NotAPath("index.php".to_string()))
        );
        assert_eq!(UrlExpr::parse("  "), Err(SyntaxError::Empty));
    }

    #[test]
    fn reject_unterminated() {
        assert_eq!(
            UrlExpr::parse("api('A\\B','x'"),
            Err(SyntaxError::UnterminatedString)
        );
    }

    // -- inference --

    #[test]
    fn infer_api_layer() {
        let inferred = infer(r"app\website\api\Article", "add").unwrap();
        assert_eq!(inferred.method.as_deref(), Some("api"));
        assert_eq!(
            inferred.url,
            UrlTarget::Invoke {
                class: r"app\website\api\Article".to_string(),
                action: "add".to_string(),
            }
        );
    }

    #[test]
    fn infer_controller_four_segments() {
        let inferred = infer("app.shop.controller.Order", "detail").unwrap();
        assert_eq!(inferred.url, UrlTarget::path("/shop/order/detail"));
        assert_eq!(inferred.method, None);
    }

    #[test]
    fn infer_controller_five_segments() {
        let inferred = infer(r"\app\shop\controller\Order\Refund", "apply").unwrap();
        assert_eq!(inferred.url, UrlTarget::path("/shop/order.refund/apply"));
    }

    #[test]
    fn infer_too_few_segments() {
        assert_eq!(
            infer(r"app\Index", "home"),
            Err(DocWarning::MalformedQualifiedName {
                name: r"app\Index".to_string(),
                segments: 2,
            })
        );
    }

    #[test]
    fn invoke_display_matches_legacy_form() {
        let target = UrlTarget::Invoke {
            class: r"app\a\api\B".to_string(),
            action: "c".to_string(),
        };
        assert_eq!(target.to_string(), r"api('app\a\api\B','c','$data')");
    }
}
