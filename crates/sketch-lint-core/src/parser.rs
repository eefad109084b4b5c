//! Parser frontend seam.

use std::path::{Path, PathBuf};

use crate::syntax::{SourceUnit, Span};

/// A source file that could not be turned into a [`SourceUnit`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}:{}:{}: {message}", path.display(), span.line, span.column)]
pub struct ParseFailure {
    /// Path of the file, relative to the project root.
    pub path: PathBuf,
    /// Parser message.
    pub message: String,
    /// First position the parser rejected.
    pub span: Span,
}

/// Turns source text into a role-taggable syntax model.
///
/// Implement this to support a host language. The analyzer calls
/// [`SourceParser::parse`] once per discovered file, in path order.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., `"java"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses one file.
    ///
    /// `path` is already relative to the project root and is stored in the
    /// returned unit as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] when the text is not valid source.
    fn parse(&self, path: &Path, source: &str) -> Result<SourceUnit, ParseFailure>;
}

/// Type alias for boxed parser trait objects.
pub type ParserBox = Box<dyn SourceParser>;
