//! Halt predicate.

use std::fmt;

use crate::{TagSystem, Word};

/// Why a word ends a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HaltReason {
    /// The word has no symbols.
    Empty,
    /// The word is shorter than the deletion count.
    ShorterThanDeletion,
    /// The leftmost symbol is the halting symbol.
    HaltingSymbol,
}

impl HaltReason {
    /// Short stable label used in reports and inline test assertions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::ShorterThanDeletion => "short",
            Self::HaltingSymbol => "halt-symbol",
        }
    }

    /// Inverse of [`HaltReason::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "empty" => Some(Self::Empty),
            "short" => Some(Self::ShorterThanDeletion),
            "halt-symbol" => Some(Self::HaltingSymbol),
            _ => None,
        }
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "word is empty"),
            Self::ShorterThanDeletion => write!(f, "word is shorter than the deletion count"),
            Self::HaltingSymbol => write!(f, "word starts with the halting symbol"),
        }
    }
}

/// Classifies `word`, returning why it halts or `None` if it can be rewritten.
///
/// Conditions are reported in priority order: empty, too short, leading
/// halting symbol.
#[must_use]
pub fn halt_reason(word: &Word, system: &TagSystem) -> Option<HaltReason> {
    match word.leading() {
        None => Some(HaltReason::Empty),
        Some(_) if word.len() < system.deletion_count() => Some(HaltReason::ShorterThanDeletion),
        Some(leading) if leading == system.halting_symbol() => Some(HaltReason::HaltingSymbol),
        Some(_) => None,
    }
}

/// Returns true when `word` ends a run under `system`.
#[must_use]
pub fn is_halting(word: &Word, system: &TagSystem) -> bool {
    halt_reason(word, system).is_some()
}
