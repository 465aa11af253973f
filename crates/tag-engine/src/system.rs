//! Validated tag system definitions.

use std::collections::BTreeSet;

use crate::{DefinitionError, RuleTable, Symbol, Word};

/// An immutable, validated tag system.
///
/// Only [`TagSystem::new`] produces values of this type, so every instance
/// satisfies:
/// - `deletion_count > 1`;
/// - the alphabet is non-empty and contains the halting symbol;
/// - every production key and every symbol inside a production is in the
///   alphabet;
/// - every alphabet symbol other than the halting symbol has a production.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTagSystem"))]
pub struct TagSystem {
    deletion_count: usize,
    alphabet: BTreeSet<Symbol>,
    halting_symbol: Symbol,
    productions: RuleTable,
}

impl TagSystem {
    /// Validates the parts of a tag system and assembles it.
    ///
    /// A production for the halting symbol may be present; it is kept but
    /// never consulted.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, checked in this order:
    /// deletion count, empty alphabet, halting symbol membership, production
    /// keys, production contents, missing productions.
    pub fn new(
        deletion_count: usize,
        alphabet: impl IntoIterator<Item = Symbol>,
        halting_symbol: Symbol,
        productions: RuleTable,
    ) -> Result<Self, DefinitionError> {
        if deletion_count <= 1 {
            return Err(DefinitionError::DeletionCountTooSmall {
                count: deletion_count,
            });
        }

        let alphabet: BTreeSet<Symbol> = alphabet.into_iter().collect();
        if alphabet.is_empty() {
            return Err(DefinitionError::EmptyAlphabet);
        }
        if !alphabet.contains(&halting_symbol) {
            return Err(DefinitionError::HaltingSymbolNotInAlphabet {
                symbol: halting_symbol,
            });
        }

        for (rule, production) in productions.iter() {
            if !alphabet.contains(&rule) {
                return Err(DefinitionError::ProductionForUnknownSymbol { symbol: rule });
            }
            if let Some(symbol) = production.iter().find(|s| !alphabet.contains(s)) {
                return Err(DefinitionError::SymbolOutsideAlphabet { rule, symbol });
            }
        }

        if let Some(&symbol) = alphabet
            .iter()
            .find(|&&s| s != halting_symbol && !productions.contains(s))
        {
            return Err(DefinitionError::MissingProduction { symbol });
        }

        Ok(Self {
            deletion_count,
            alphabet,
            halting_symbol,
            productions,
        })
    }

    /// Number of leading symbols removed per step.
    #[must_use]
    pub const fn deletion_count(&self) -> usize {
        self.deletion_count
    }

    /// Alphabet in symbol order.
    #[must_use]
    pub const fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// The designated halting symbol.
    #[must_use]
    pub const fn halting_symbol(&self) -> Symbol {
        self.halting_symbol
    }

    /// Full production table.
    #[must_use]
    pub const fn productions(&self) -> &RuleTable {
        &self.productions
    }

    /// Production selected by `symbol`, if one is defined.
    #[must_use]
    pub fn production(&self, symbol: Symbol) -> Option<&Word> {
        self.productions.get(symbol)
    }

    /// Checks that `word` only uses alphabet symbols.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::WordOutsideAlphabet`] naming the first
    /// foreign symbol.
    pub fn check_word(&self, word: &Word) -> Result<(), DefinitionError> {
        match word
            .iter()
            .enumerate()
            .find(|(_, symbol)| !self.alphabet.contains(symbol))
        {
            Some((position, symbol)) => {
                Err(DefinitionError::WordOutsideAlphabet { symbol, position })
            }
            None => Ok(()),
        }
    }
}

/// Unvalidated wire form; deserialization funnels through [`TagSystem::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTagSystem {
    deletion_count: usize,
    alphabet: BTreeSet<Symbol>,
    halting_symbol: Symbol,
    productions: RuleTable,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTagSystem> for TagSystem {
    type Error = DefinitionError;

    fn try_from(raw: RawTagSystem) -> Result<Self, Self::Error> {
        Self::new(
            raw.deletion_count,
            raw.alphabet,
            raw.halting_symbol,
            raw.productions,
        )
    }
}
