//! PHP source scanner: regex pass over namespaces, classes, functions
//! and the `/** */` blocks directly above them.
//!
//! No PHP parsing beyond that: a method belongs to the class whose body
//! (matched braces, skipping strings and comments) contains it, and a doc
//! block counts only when nothing but blank lines or `#[...]` attributes
//! separate it from the declaration.

use super::{ClassSource, CommentSource, MethodSource, Visibility};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*namespace[ \t]+([\w\\]+)[ \t]*[;{]").unwrap());

// Doc blocks, class-like declarations and named functions, in source order.
static RE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?ms)(?P<doc>/\*\*.*?\*/)",
        r"|^[ \t]*(?:(?:abstract|final|readonly)[ \t]+)*class[ \t]+(?P<class>\w+)",
        r"|^[ \t]*(?:interface|trait|enum)[ \t]+(?P<other>\w+)",
        r"|^[ \t]*(?P<mods>(?:(?:public|protected|private|static|final|abstract)[ \t]+)*)function[ \t]+&?[ \t]*(?P<func>\w+)",
    ))
    .unwrap()
});

/// Source text of one PHP file.
pub struct PhpSource {
    content: String,
}

impl PhpSource {
    pub fn new(content: String) -> Self {
        PhpSource { content }
    }
}

impl CommentSource for PhpSource {
    fn classes(&self) -> Vec<ClassSource> {
        scan(&self.content)
    }
}

/// Scan PHP source text for classes and their methods.
pub fn scan(content: &str) -> Vec<ClassSource> {
    let namespace = RE_NAMESPACE
        .captures(content)
        .map(|caps| caps[1].trim_start_matches('\\').to_string());

    let mut classes: Vec<ClassSource> = Vec::new();
    // End offset of the last class body; functions past it are not methods.
    let mut class_end: Option<usize> = None;
    let mut pending_doc: Option<(String, usize)> = None;

    for caps in RE_ITEM.captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if let Some(doc) = caps.name("doc") {
            pending_doc = Some((doc.as_str().to_string(), doc.end()));
            continue;
        }

        let comment = pending_doc
            .take()
            .filter(|(_, end)| is_adjacent(&content[*end..whole.start()]))
            .map(|(text, _)| text)
            .unwrap_or_default();

        if let Some(class) = caps.name("class") {
            let name = match &namespace {
                Some(ns) => format!("{}\\{}", ns, class.as_str()),
                None => class.as_str().to_string(),
            };
            classes.push(ClassSource {
                name,
                comment,
                methods: Vec::new(),
            });
            class_end = Some(body_end(content, whole.end()));
        } else if caps.name("other").is_some() {
            class_end = None;
        } else if let Some(func) = caps.name("func") {
            if !class_end.is_some_and(|end| whole.start() < end) {
                continue;
            }
            let mods = caps.name("mods").map(|m| m.as_str()).unwrap_or_default();
            if let Some(class) = classes.last_mut() {
                class.methods.push(MethodSource {
                    name: func.as_str().to_string(),
                    comment,
                    visibility: visibility(mods),
                });
            }
        }
    }

    classes
}

/// Offset just past the `}` closing the body that opens at or after
/// `from`. An unterminated body runs to the end of the text.
fn body_end(content: &str, from: usize) -> usize {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = content[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = line_end(content, i),
            b'#' if bytes.get(i + 1) != Some(&b'[') => i = line_end(content, i),
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn line_end(content: &str, from: usize) -> usize {
    content[from..].find('\n').map_or(content.len(), |p| from + p)
}

/// Only blank lines and attributes may sit between a doc block and its
/// declaration.
fn is_adjacent(between: &str) -> bool {
    between.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with("#[")
    })
}

fn visibility(mods: &str) -> Visibility {
    let mut words = mods.split_whitespace();
    if words.clone().any(|w| w == "private") {
        Visibility::Private
    } else if words.any(|w| w == "protected") {
        Visibility::Protected
    } else {
        Visibility::Public
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"<?php
declare(strict_types=1);

namespace app\shop\controller;

use think\Request;

/**
 * @title Orders
 * @desc Order management
 */
class Order extends Base
{
    /**
     * @title List orders
     * @param int $page 1 page number
     */
    public function index()
    {
        $fn = function ($x) { return $x; };
    }

    /** @title Helper */
    protected function helper() {}

    /**
     * @title Detached
     */

    $notADeclaration = 1;

    public static function build() {}

    function implicit() {}

    #[Route('/x')]
    /** @title Misplaced */
    private function secret() {}
}
"#;

    #[test]
    fn scan_class_and_methods() {
        let classes = scan(SOURCE);
        assert_eq!(classes.len(), 1);
        let class = &classes[0];
        assert_eq!(class.name, r"app\shop\controller\Order");
        assert!(class.comment.contains("@title Orders"));

        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["index", "helper", "build", "implicit", "secret"]);
    }

    #[test]
    fn scan_method_comments() {
        let classes = scan(SOURCE);
        let methods = &classes[0].methods;
        assert!(methods[0].comment.contains("@param int $page"));
        assert!(methods[1].comment.contains("@title Helper"));
        // Separated from its declaration by code.
        assert!(methods[2].comment.is_empty());
        assert!(methods[3].comment.is_empty());
        assert!(methods[4].comment.contains("@title Misplaced"));
    }

    #[test]
    fn scan_visibility() {
        let classes = scan(SOURCE);
        let vis: Vec<Visibility> = classes[0].methods.iter().map(|m| m.visibility).collect();
        assert_eq!(
            vis,
            [
                Visibility::Public,
                Visibility::Protected,
                Visibility::Public,
                Visibility::Public,
                Visibility::Private,
            ]
        );
    }

    #[test]
    fn function_after_class_body_is_not_a_method() {
        let input = "<?php\nnamespace app\\shop\\controller;\nclass Order {\n /** @title List */\n public function list() {}\n}\n\n/** @title Helper */\nfunction helper() {}\n";
        let classes = scan(input);
        let names: Vec<&str> = classes[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["list"]);
    }

    #[test]
    fn braces_in_strings_and_comments_ignored() {
        let input = concat!(
            "<?php\nclass A {\n",
            "  public function a() { $s = '}'; $t = \"{\\\"}\"; }\n",
            "  // closing } in a comment\n",
            "  /* and } here */\n",
            "  # or } here\n",
            "  public function b() {}\n",
            "}\nfunction c() {}\n",
        );
        let classes = scan(input);
        let names: Vec<&str> = classes[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn body_end_offsets() {
        assert_eq!(body_end("class A { { } }\nrest", 7), 15);
        assert_eq!(body_end("class A { ", 7), 10);
    }

    #[test]
    fn scan_without_namespace() {
        let classes = scan("<?php\n/** @title Plain */\nfinal class Plain {\n  public function a() {}\n}\n");
        assert_eq!(classes[0].name, "Plain");
        assert_eq!(classes[0].methods.len(), 1);
    }

    #[test]
    fn functions_outside_classes_ignored() {
        let input = "<?php\n/** @title f */\nfunction helper() {}\ninterface Shape {\n  public function area();\n}\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn multiple_classes_in_one_file() {
        let input = "<?php\nnamespace a\\b\\c;\nclass One {\n public function x() {}\n}\ntrait T {\n public function t() {}\n}\nclass Two {\n public function y() {}\n}\n";
        let classes = scan(input);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].methods[0].name, "x");
        assert_eq!(classes[1].name, r"a\b\c\Two");
        assert_eq!(classes[1].methods.len(), 1);
    }
}
