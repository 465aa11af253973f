//! Symbol and word primitives shared by every engine stage.
//!
//! A [`Word`] has no mutating API: each rewrite builds a fresh value, so a
//! word recorded in a trace can never change afterwards.

use std::fmt;

/// A single alphabet token.
///
/// Symbols are compared by identity only; the wrapped character is their
/// textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Symbol(char);

impl Symbol {
    /// Creates a symbol from its textual form.
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self(ch)
    }

    /// Returns the character this symbol is written as.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for Symbol {
    fn from(ch: char) -> Self {
        Self(ch)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable, possibly empty sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Word(Vec<Symbol>);

impl Word {
    /// The empty word.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds a word from symbols in left-to-right order.
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self(symbols.into_iter().collect())
    }

    /// Number of symbols in the word.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty word.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Leftmost symbol, or `None` for the empty word.
    #[must_use]
    pub fn leading(&self) -> Option<Symbol> {
        self.0.first().copied()
    }

    /// Borrowed view of the symbols in order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// Iterates symbols left to right.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }

    /// Drops `deletion` leading symbols and appends `production`.
    ///
    /// Deleting more symbols than the word holds yields just the production.
    pub(crate) fn delete_then_append(&self, deletion: usize, production: &Self) -> Self {
        let kept = self.0.get(deletion..).unwrap_or_default();
        let mut symbols = Vec::with_capacity(kept.len() + production.len());
        symbols.extend_from_slice(kept);
        symbols.extend_from_slice(&production.0);
        Self(symbols)
    }
}

impl From<&str> for Word {
    /// Parses a word written as the concatenation of its symbols.
    ///
    /// Whitespace separates nothing and is skipped.
    fn from(text: &str) -> Self {
        Self(
            text.chars()
                .filter(|ch| !ch.is_whitespace())
                .map(Symbol)
                .collect(),
        )
    }
}

impl FromIterator<Symbol> for Word {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self::from_symbols(iter)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
