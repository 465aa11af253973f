//! Production rule table keyed by leading symbol.

use std::collections::BTreeMap;

use crate::{Symbol, Word};

/// Mapping from a symbol to the production appended when it leads a word.
///
/// The table is assembled by the caller and then moved into a
/// [`TagSystem`](crate::TagSystem), which validates it and never mutates it
/// again. Iteration follows symbol order, so reports are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RuleTable {
    productions: BTreeMap<Symbol, Word>,
}

impl RuleTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            productions: BTreeMap::new(),
        }
    }

    /// Sets the production for `symbol`, returning the one it replaces.
    pub fn insert(&mut self, symbol: Symbol, production: Word) -> Option<Word> {
        self.productions.insert(symbol, production)
    }

    /// Looks up the production for `symbol` by exact identity.
    #[must_use]
    pub fn get(&self, symbol: Symbol) -> Option<&Word> {
        self.productions.get(&symbol)
    }

    /// Returns true when `symbol` has an entry.
    #[must_use]
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.productions.contains_key(&symbol)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.productions.len()
    }

    /// Returns true when no productions are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Iterates `(symbol, production)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Word)> + '_ {
        self.productions
            .iter()
            .map(|(symbol, production)| (*symbol, production))
    }
}

impl FromIterator<(Symbol, Word)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, Word)>>(iter: I) -> Self {
        Self {
            productions: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(char, &str); N]> for RuleTable {
    /// Builds a table from `(symbol, production text)` pairs.
    fn from(rules: [(char, &str); N]) -> Self {
        rules
            .into_iter()
            .map(|(symbol, production)| (Symbol::new(symbol), Word::from(production)))
            .collect()
    }
}
