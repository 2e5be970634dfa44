//! Doc-comment tokenizer: splits `@tag` lines into token lists.
//!
//! Accepts a full `/** ... */` block, a block stripped of its delimiters,
//! or bare `@tag` lines. The tag name keeps its original case; callers
//! lowercase it for dispatch.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_BLANKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

// A tag line: optional indentation, optional `/**` or `*` marker, `@`, then
// everything up to the end of the line.
static RE_TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ ?(?:/\*+|\*)? ?@([^\r\n]*)").unwrap());

// -- Public API ---------------------------------------------------------------

/// Tokenize a raw doc comment into one token list per `@tag` line.
///
/// Lists are returned in source order. The first element of each list is
/// the tag name; a tag without arguments yields a single-element list.
pub fn tokenize(raw: &str) -> Vec<Vec<String>> {
    let collapsed = RE_BLANKS.replace_all(raw, " ");

    RE_TAG_LINE
        .captures_iter(&collapsed)
        .filter_map(|caps| {
            let body = strip_closing(&caps[1]);
            if body.is_empty() {
                return None;
            }
            Some(body.split(' ').map(str::to_string).collect())
        })
        .collect()
}

/// Drop a trailing `*/` and surrounding blanks from a captured tag line.
fn strip_closing(line: &str) -> &str {
    let line = line.trim_end();
    line.strip_suffix("*/").unwrap_or(line).trim()
}
