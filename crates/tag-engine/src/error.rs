use thiserror::Error;

use crate::Symbol;

/// Reasons a tag system definition, or a word offered to it, is rejected.
///
/// Raised only before any rewrite step happens. A constructed
/// [`TagSystem`](crate::TagSystem) is immutable and cannot become invalid
/// later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DefinitionError {
    /// Deletion count was 0 or 1.
    #[error("deletion count must be greater than 1, got {count}")]
    DeletionCountTooSmall {
        /// The rejected count.
        count: usize,
    },
    /// Alphabet had no symbols.
    #[error("alphabet is empty")]
    EmptyAlphabet,
    /// Halting symbol is not part of the alphabet.
    #[error("halting symbol '{symbol}' is not in the alphabet")]
    HaltingSymbolNotInAlphabet {
        /// The halting symbol.
        symbol: Symbol,
    },
    /// A production is keyed by a symbol outside the alphabet.
    #[error("production defined for '{symbol}', which is not in the alphabet")]
    ProductionForUnknownSymbol {
        /// The foreign key.
        symbol: Symbol,
    },
    /// A production word uses a symbol outside the alphabet.
    #[error("production for '{rule}' uses '{symbol}', which is not in the alphabet")]
    SymbolOutsideAlphabet {
        /// Key of the offending production.
        rule: Symbol,
        /// The foreign symbol inside it.
        symbol: Symbol,
    },
    /// A non-halting alphabet symbol has no production.
    #[error("no production defined for '{symbol}'")]
    MissingProduction {
        /// The uncovered symbol.
        symbol: Symbol,
    },
    /// A word handed to the system uses a symbol outside the alphabet.
    #[error("word uses '{symbol}' at position {position}, which is not in the alphabet")]
    WordOutsideAlphabet {
        /// The foreign symbol.
        symbol: Symbol,
        /// Zero-based index of its first occurrence.
        position: usize,
    },
}

impl DefinitionError {
    /// Production key the error is attributed to, when there is one.
    #[must_use]
    pub const fn rule(self) -> Option<Symbol> {
        match self {
            Self::ProductionForUnknownSymbol { symbol } => Some(symbol),
            Self::SymbolOutsideAlphabet { rule, .. } => Some(rule),
            Self::DeletionCountTooSmall { .. }
            | Self::EmptyAlphabet
            | Self::HaltingSymbolNotInAlphabet { .. }
            | Self::MissingProduction { .. }
            | Self::WordOutsideAlphabet { .. } => None,
        }
    }
}
