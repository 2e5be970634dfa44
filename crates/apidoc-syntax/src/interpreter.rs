//! Tag interpreter: folds token lists into a [`DocRecord`].
//!
//! Dispatch is on the lowercased tag name:
//!
//! - `title`, `desc`, `author`, `version`, `method` → typed scalar fields
//! - `url` → parsed with [`UrlExpr`], never evaluated
//! - `param`, `return` → ordered [`ParameterDoc`] lists
//! - anything else → `extra`, keyed by the tag name as written

use crate::model::{ParameterDoc, SENTINEL};
use crate::url::{UrlExpr, UrlTarget};
use crate::warning::DocWarning;
use std::collections::BTreeMap;

/// Result of interpreting one comment block, before defaults are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
    pub method: Option<String>,
    pub url: Option<UrlTarget>,
    pub parameters: Vec<ParameterDoc>,
    pub returns: Vec<ParameterDoc>,
    pub extra: BTreeMap<String, String>,
    pub warnings: Vec<DocWarning>,
    /// Number of tag lines seen, well-formed or not.
    pub tags_seen: usize,
}

impl DocRecord {
    /// True when the comment carried no tags at all.
    pub fn is_empty(&self) -> bool {
        self.tags_seen == 0
    }
}

/// ThinkPHP-style validation rule names accepted as a bare trailing token.
/// Plain English rule names (`number`, `email`, `date`, ...) are left out:
/// as a last word they are far more often the end of a description.
const RULE_KEYWORDS: &[&str] = &[
    "require", "alphaNum", "alphaDash", "chs", "chsAlpha", "chsAlphaNum", "chsDash", "idCard",
];

/// Interpret tokenized tag lines.
pub fn interpret(tokens: &[Vec<String>]) -> DocRecord {
    let mut record = DocRecord::default();

    for item in tokens {
        let Some(tag) = item.first() else {
            continue;
        };
        record.tags_seen += 1;
        let args = &item[1..];

        match tag.to_lowercase().as_str() {
            "title" => record.title = Some(scalar(args)),
            "desc" => record.description = Some(scalar(args)),
            "author" => record.author = Some(scalar(args)),
            "version" => record.version = Some(scalar(args)),
            "method" => record.method = args.first().map(|_| args.join(" ")),
            "url" => interpret_url(&mut record, args),
            "param" => match parameter(item, true) {
                Some(param) => record.parameters.push(param),
                None => record.warnings.push(malformed(tag, item)),
            },
            "return" => match parameter(item, false) {
                Some(ret) => record.returns.push(ret),
                None => record.warnings.push(malformed(tag, item)),
            },
            _ => {
                record.extra.insert(tag.clone(), scalar(args));
            }
        }
    }

    record
}

/// Single-value tag: the rest of the line, or the sentinel.
fn scalar(args: &[String]) -> String {
    if args.is_empty() {
        SENTINEL.to_string()
    } else {
        args.join(" ")
    }
}

/// The whole rest of the line is the expression, so `api('a', 'b')` with
/// spaces after commas still parses.
fn interpret_url(record: &mut DocRecord, args: &[String]) {
    if args.is_empty() {
        return;
    }
    let raw = args.join(" ");
    match UrlExpr::parse(&raw) {
        Ok(expr) => record.url = Some(expr.into_target()),
        Err(err) => {
            tracing::debug!(expression = %raw, error = %err, "rejected @url");
            record.warnings.push(DocWarning::UnsafeRawExpression {
                expression: raw,
                reason: err.to_string(),
            });
        }
    }
}

fn malformed(tag: &str, item: &[String]) -> DocWarning {
    DocWarning::MalformedTag {
        tag: tag.to_lowercase(),
        tokens: item.to_vec(),
    }
}

/// Build a `@param` / `@return` entry: `<tag> <type> <name> [default] [description...] [rule]`.
fn parameter(item: &[String], with_rule: bool) -> Option<ParameterDoc> {
    let [_, ty, name, rest @ ..] = item else {
        return None;
    };
    let (default, tail) = match rest.split_first() {
        Some((default, tail)) => (default.clone(), tail),
        None => (SENTINEL.to_string(), &[][..]),
    };

    let (description, validation_rule) = if with_rule {
        split_rule(tail)
    } else {
        (join_or_sentinel(tail), SENTINEL.to_string())
    };

    Some(ParameterDoc {
        ty: ty.clone(),
        name: name.strip_prefix('$').unwrap_or(name).to_string(),
        default,
        description,
        validation_rule,
    })
}

/// Separate the description words from a trailing validation rule.
///
/// Two words are read positionally. With more words, the last one is a
/// rule only when it has rule shape; otherwise it is part of the prose.
fn split_rule(tail: &[String]) -> (String, String) {
    match tail {
        [] => (SENTINEL.to_string(), SENTINEL.to_string()),
        [description] => (description.clone(), SENTINEL.to_string()),
        [description, rule] => (description.clone(), rule.clone()),
        [words @ .., last] if is_rule(last) => (words.join(" "), last.clone()),
        _ => (tail.join(" "), SENTINEL.to_string()),
    }
}

fn join_or_sentinel(words: &[String]) -> String {
    if words.is_empty() {
        SENTINEL.to_string()
    } else {
        words.join(" ")
    }
}

/// `require_msg.number`, `max:20`, `in:a|b`, or a bare known rule name.
/// A trailing `.` is punctuation, not a rule separator.
fn is_rule(token: &str) -> bool {
    if !token.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let inner_dot = token
        .strip_suffix('.')
        .unwrap_or(token)
        .contains('.');
    if inner_dot || token.contains(['_', ':', '|']) {
        return true;
    }
    RULE_KEYWORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse(input: &str) -> DocRecord {
        interpret(&tokenize(input))
    }

    fn param(ty: &str, name: &str, default: &str, desc: &str, rule: &str) -> ParameterDoc {
        ParameterDoc {
            ty: ty.to_string(),
            name: name.to_string(),
            default: default.to_string(),
            description: desc.to_string(),
            validation_rule: rule.to_string(),
        }
    }

    #[test]
    fn scalar_tags() {
        let r = parse("* @title Get User\n* @desc Fetch a user by id\n* @author ann\n* @version 2.0\n");
        assert_eq!(r.title.as_deref(), Some("Get User"));
        assert_eq!(r.description.as_deref(), Some("Fetch a user by id"));
        assert_eq!(r.author.as_deref(), Some("ann"));
        assert_eq!(r.version.as_deref(), Some("2.0"));
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn scalar_without_value_is_sentinel() {
        let r = parse("* @title\n");
        assert_eq!(r.title.as_deref(), Some("-"));
    }

    #[test]
    fn tag_names_are_case_insensitive() {
        let r = parse("* @TITLE Upper\n* @Param int $a\n");
        assert_eq!(r.title.as_deref(), Some("Upper"));
        assert_eq!(r.parameters.len(), 1);
    }

    #[test]
    fn unknown_tags_go_to_extra() {
        let r = parse("* @deprecated since 3.0\n* @Internal\n");
        assert_eq!(r.extra.get("deprecated").map(String::as_str), Some("since 3.0"));
        assert_eq!(r.extra.get("Internal").map(String::as_str), Some("-"));
    }

    #[test]
    fn later_scalar_overwrites_earlier() {
        let r = parse("* @title One\n* @title Two\n");
        assert_eq!(r.title.as_deref(), Some("Two"));
    }

    #[test]
    fn param_all_fields_verbatim() {
        let r = parse("* @param int $page 1 page_number require_page.number\n");
        assert_eq!(
            r.parameters,
            vec![param("int", "page", "1", "page_number", "require_page.number")]
        );
    }

    #[test]
    fn param_two_trailing_words_are_positional() {
        let r = parse("* @param string $q x keyword anything\n");
        assert_eq!(r.parameters[0].description, "keyword");
        assert_eq!(r.parameters[0].validation_rule, "anything");
    }

    #[test]
    fn param_prose_description_with_rule() {
        let r = parse("* @param int $id 0 user id require_id.number\n");
        assert_eq!(r.parameters, vec![param("int", "id", "0", "user id", "require_id.number")]);
    }

    #[test]
    fn param_prose_description_without_rule() {
        let r = parse("* @param int $limit 20 rows per page\n");
        assert_eq!(r.parameters, vec![param("int", "limit", "20", "rows per page", "-")]);
    }

    #[test]
    fn param_sentence_ending_in_full_stop() {
        let r = parse("* @param int $limit 20 rows per page.\n");
        assert_eq!(r.parameters, vec![param("int", "limit", "20", "rows per page.", "-")]);
    }

    #[test]
    fn param_english_rule_name_ends_description() {
        let r = parse("* @param string $tel - the phone number\n* @param string $mail - contact email\n");
        assert_eq!(r.parameters[0], param("string", "tel", "-", "the phone number", "-"));
        assert_eq!(r.parameters[1], param("string", "mail", "-", "contact email", "-"));
    }

    #[test]
    fn param_rule_shapes() {
        let r = parse(concat!(
            "* @param int $a 0 first one max:20\n",
            "* @param string $b - second one in:x|y\n",
            "* @param int $c 0 third one require.number\n",
            "* @param string $d - fourth one alphaDash\n",
        ));
        let rules: Vec<&str> = r.parameters.iter().map(|p| p.validation_rule.as_str()).collect();
        assert_eq!(rules, ["max:20", "in:x|y", "require.number", "alphaDash"]);
        assert!(r.parameters.iter().all(|p| p.description.ends_with(" one")));
    }

    #[test]
    fn param_missing_optional_fields() {
        let r = parse("* @param int $a\n* @param int $b 3\n");
        assert_eq!(r.parameters[0], param("int", "a", "-", "-", "-"));
        assert_eq!(r.parameters[1], param("int", "b", "3", "-", "-"));
    }

    #[test]
    fn param_order_preserved() {
        let r = parse("* @param int $a\n* @param string $b\n");
        assert_eq!(r.parameters[0].name, "a");
        assert_eq!(r.parameters[1].name, "b");
    }

    #[test]
    fn dollar_prefix_stripped() {
        let r = parse("* @param int $page\n* @return int id\n");
        assert_eq!(r.parameters[0].name, "page");
        assert_eq!(r.returns[0].name, "id");
    }

    #[test]
    fn return_joins_description_and_never_has_rule() {
        let r = parse("* @return array $data - user record\n");
        assert_eq!(r.returns, vec![param("array", "data", "-", "user record", "-")]);
    }

    #[test]
    fn malformed_param_skipped_and_parsing_continues() {
        let r = parse("* @param int\n* @param string $name\n* @title After\n");
        assert_eq!(r.parameters.len(), 1);
        assert_eq!(r.parameters[0].name, "name");
        assert_eq!(r.title.as_deref(), Some("After"));
        assert_eq!(
            r.warnings,
            vec![DocWarning::MalformedTag {
                tag: "param".to_string(),
                tokens: vec!["param".to_string(), "int".to_string()],
            }]
        );
    }

    #[test]
    fn malformed_return_warns() {
        let r = parse("* @return\n");
        assert!(r.returns.is_empty());
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn url_literal_and_invoke() {
        let r = parse("* @url /shop/order/list\n");
        assert_eq!(r.url, Some(UrlTarget::path("/shop/order/list")));

        let r = parse("* @url api('app\\shop\\api\\Order','list','$data')\n");
        assert!(r.url.as_ref().is_some_and(UrlTarget::is_invoke));
    }

    #[test]
    fn url_call_with_spaces() {
        let r = parse("* @url api('app\\shop\\api\\Order', 'list', $data)\n");
        assert_eq!(
            r.url,
            Some(UrlTarget::Invoke {
                class: r"app\shop\api\Order".to_string(),
                action: "list".to_string(),
            })
        );
    }

    #[test]
    fn unsafe_url_rejected_with_warning() {
        let r = parse("* @url exec('id')\n");
        assert_eq!(r.url, None);
        assert!(matches!(
            &r.warnings[..],
            [DocWarning::UnsafeRawExpression { expression, .. }] if expression == "exec('id')"
        ));
    }

    #[test]
    fn empty_url_and_method_are_absent() {
        let r = parse("* @url\n* @method\n");
        assert_eq!(r.url, None);
        assert_eq!(r.method, None);
        assert!(r.warnings.is_empty());
        assert_eq!(r.tags_seen, 2);
    }

    #[test]
    fn interpret_is_deterministic() {
        let tokens = tokenize("* @title A\n* @param int $a 1 x y z\n* @foo bar\n");
        assert_eq!(interpret(&tokens), interpret(&tokens));
    }

    #[test]
    fn no_tags_is_empty() {
        assert!(parse("/** just prose */").is_empty());
        assert!(!parse("* @param x\n").is_empty());
    }
}
