//! Single-step rewriting.
//!
//! [`transform`] is the raw delete-then-append step and requires a
//! transformable word. [`step_one`] classifies first and is the entry point
//! the driver and single-stepping hosts use.

use crate::{halt_reason, HaltReason, TagSystem, Word};

/// Result of one step attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The word was rewritten into this successor.
    Rewritten(Word),
    /// The word is halting; nothing was rewritten.
    Halted(HaltReason),
}

/// Deletes `deletion_count` leading symbols and appends the production of the
/// word's leftmost symbol.
///
/// The successor has exactly
/// `word.len() - deletion_count + production.len()` symbols.
///
/// # Panics
///
/// Panics if `word` is halting under `system`, or if its leftmost symbol has
/// no production. Neither is reachable for a word that passed
/// [`TagSystem::check_word`] and was classified transformable, which is what
/// [`step_one`] guarantees.
#[must_use]
pub fn transform(word: &Word, system: &TagSystem) -> Word {
    if let Some(reason) = halt_reason(word, system) {
        panic!("transform called on a halting word ({reason}): \"{word}\"");
    }
    let Some(leading) = word.leading() else {
        unreachable!("non-halting word is never empty");
    };
    let Some(production) = system.production(leading) else {
        panic!("no production for leading symbol '{leading}' of \"{word}\"");
    };

    word.delete_then_append(system.deletion_count(), production)
}

/// Rewrites `word` once, or reports why it halts.
#[must_use]
pub fn step_one(word: &Word, system: &TagSystem) -> StepOutcome {
    match halt_reason(word, system) {
        Some(reason) => StepOutcome::Halted(reason),
        None => StepOutcome::Rewritten(transform(word, system)),
    }
}

#[cfg(test)]
mod tests {
    use super::{step_one, transform, StepOutcome};
    use crate::{HaltReason, RuleTable, Symbol, TagSystem, Word};

    fn collatz() -> TagSystem {
        TagSystem::new(
            2,
            "abcH".chars().map(Symbol::new),
            Symbol::new('H'),
            RuleTable::from([('a', "bc"), ('b', "a"), ('c', "aaa")]),
        )
        .expect("valid system")
    }

    #[test]
    fn production_follows_leading_symbol() {
        let system = collatz();
        assert_eq!(transform(&Word::from("aaa"), &system), Word::from("abc"));
        assert_eq!(transform(&Word::from("abc"), &system), Word::from("cbc"));
        assert_eq!(transform(&Word::from("cbc"), &system), Word::from("caaa"));
    }

    #[test]
    fn length_can_shrink_grow_or_hold() {
        let system = collatz();

        let shrink = transform(&Word::from("bcbc"), &system);
        assert_eq!(shrink, Word::from("bca"));

        let grow = transform(&Word::from("caaa"), &system);
        assert_eq!(grow.len(), 4 - 2 + 3);

        let hold = transform(&Word::from("abcb"), &system);
        assert_eq!(hold.len(), 4);
    }

    #[test]
    fn input_word_is_left_untouched() {
        let system = collatz();
        let word = Word::from("aaa");
        let _ = transform(&word, &system);
        assert_eq!(word, Word::from("aaa"));
    }

    #[test]
    #[should_panic(expected = "transform called on a halting word")]
    fn transform_rejects_halting_word() {
        let _ = transform(&Word::from("Haa"), &collatz());
    }

    #[test]
    fn step_one_reports_halt_without_rewriting() {
        let system = collatz();
        assert_eq!(
            step_one(&Word::from("a"), &system),
            StepOutcome::Halted(HaltReason::ShorterThanDeletion)
        );
        assert_eq!(
            step_one(&Word::from("Hbc"), &system),
            StepOutcome::Halted(HaltReason::HaltingSymbol)
        );
        assert_eq!(
            step_one(&Word::from("bc"), &system),
            StepOutcome::Rewritten(Word::from("a"))
        );
    }
}
