//! Comment sources: where raw class and method comments come from.
//!
//! The parser never looks at code itself; a [`CommentSource`] hands it
//! the qualified class name, the method names and their raw comments.

pub mod php;

use anyhow::{anyhow, Result};
use std::path::Path;

/// Method visibility, as declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// One method declared in a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSource {
    pub name: String,
    /// Raw doc comment, empty when the method has none.
    pub comment: String,
    pub visibility: Visibility,
}

/// One class with its raw comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSource {
    /// Fully-qualified name, `\`-separated, without a leading `\`.
    pub name: String,
    pub comment: String,
    pub methods: Vec<MethodSource>,
}

/// Anything that can list documented classes.
pub trait CommentSource {
    fn classes(&self) -> Vec<ClassSource>;
}

/// File extensions recognized as source files.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["php"];

/// Open a source file based on its extension.
pub fn open(path: &Path, content: String) -> Result<Box<dyn CommentSource>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("php") => Ok(Box::new(php::PhpSource::new(content))),
        _ => Err(anyhow!("unsupported file type: {}", path.display())),
    }
}
