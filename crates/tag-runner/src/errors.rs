//! Structured error reporting for definition loading.
//!
//! All errors format to stderr in the standard style:
//! ```text
//! collatz.tag:4:1: error: no production defined for 'c'
//! ```

use std::fmt;

use tag_engine::{DefinitionError, Symbol};
use thiserror::Error;

use crate::parser::{ParseError, ParseErrorKind};

/// A source location for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoc {
    /// File path as given by the caller.
    pub file: String,
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number (1 if unknown).
    pub column: usize,
}

impl SourceLoc {
    /// Creates a new source location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Classification of definition loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    /// Reading the definition file failed.
    #[error("cannot read definition: {0}")]
    Io(String),
    /// A line failed to parse.
    #[error("{0}")]
    Parse(ParseErrorKind),
    /// The source held no directives or rules.
    #[error("no definition found (literate files need a ```tag block)")]
    NoDefinition,
    /// A directive appeared twice.
    #[error("duplicate '{directive}' directive (first given on line {first_line})")]
    DuplicateDirective {
        /// Directive keyword.
        directive: &'static str,
        /// Line of the first occurrence.
        first_line: usize,
    },
    /// Two rules were given for the same symbol.
    #[error("duplicate production for '{symbol}' (first given on line {first_line})")]
    DuplicateRule {
        /// The symbol with two rules.
        symbol: Symbol,
        /// Line of the first rule.
        first_line: usize,
    },
    /// A required directive was never given.
    #[error("missing required '{directive}' directive")]
    MissingDirective {
        /// Directive keyword.
        directive: &'static str,
    },
    /// The engine rejected the assembled system or its input word.
    #[error("{0}")]
    Definition(#[from] DefinitionError),
}

/// A definition loading error with optional source context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct LoadError {
    /// The kind of error.
    pub kind: LoadErrorKind,
    /// Source location if available.
    pub location: Option<SourceLoc>,
}

impl LoadError {
    /// Creates an error without a location.
    #[must_use]
    pub const fn new(kind: LoadErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Adds a source location to the error.
    #[must_use]
    pub fn with_location(mut self, loc: SourceLoc) -> Self {
        self.location = Some(loc);
        self
    }

    /// Builds a located error from a line parse failure in `file`.
    #[must_use]
    pub fn from_parse(file: &str, error: ParseError) -> Self {
        Self::new(LoadErrorKind::Parse(error.kind)).with_location(SourceLoc::new(
            file,
            error.location.line,
            error.location.column,
        ))
    }

    /// Formats the error for stderr output.
    #[must_use]
    pub fn format_for_stderr(&self) -> String {
        self.location.as_ref().map_or_else(
            || format!("error: {}", self.kind),
            |loc| format!("{loc}: error: {}", self.kind),
        )
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SourceLocation;

    #[test]
    fn source_loc_formats_file_line_column() {
        assert_eq!(SourceLoc::new("a.tag", 3, 9).to_string(), "a.tag:3:9");
    }

    #[test]
    fn stderr_format_with_and_without_location() {
        let bare = LoadError::new(LoadErrorKind::MissingDirective { directive: "halt" });
        assert_eq!(
            bare.format_for_stderr(),
            "error: missing required 'halt' directive"
        );

        let located = LoadError::new(LoadErrorKind::DuplicateRule {
            symbol: Symbol::new('a'),
            first_line: 2,
        })
        .with_location(SourceLoc::new("x.tag", 5, 1));
        assert_eq!(
            located.format_for_stderr(),
            "x.tag:5:1: error: duplicate production for 'a' (first given on line 2)"
        );
        assert_eq!(
            located.to_string(),
            "x.tag:5:1: duplicate production for 'a' (first given on line 2)"
        );
    }

    #[test]
    fn parse_errors_keep_their_location() {
        let error = LoadError::from_parse(
            "y.tag",
            ParseError {
                location: SourceLocation { line: 4, column: 6 },
                kind: ParseErrorKind::UnknownDirective("halts".to_string()),
            },
        );

        assert_eq!(
            error.format_for_stderr(),
            "y.tag:4:6: error: unknown directive 'halts'"
        );
    }

    #[test]
    fn definition_errors_convert() {
        let kind = LoadErrorKind::from(DefinitionError::EmptyAlphabet);
        assert_eq!(kind.to_string(), "alphabet is empty");
    }
}
