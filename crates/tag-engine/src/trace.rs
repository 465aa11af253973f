//! Record of the words a run visits.

use crate::Word;

/// Append-only record of every word a run visited, initial word first.
///
/// A trace always holds at least the initial word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTrace {
    words: Vec<Word>,
}

impl ExecutionTrace {
    pub(crate) fn starting_with(initial: Word) -> Self {
        Self {
            words: vec![initial],
        }
    }

    pub(crate) fn record(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Most recently recorded word.
    #[must_use]
    pub fn newest(&self) -> &Word {
        &self.words[self.words.len() - 1]
    }

    /// The word the run started from.
    #[must_use]
    pub fn initial(&self) -> &Word {
        &self.words[0]
    }

    /// All words in visit order.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of recorded words; one more than the steps taken.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false, since a trace holds its initial word. Pairs with `len`
    /// for `clippy::len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Rewrite steps between the initial and newest word.
    #[must_use]
    pub fn steps(&self) -> u64 {
        u64::try_from(self.words.len() - 1).unwrap_or(u64::MAX)
    }

    /// Iterates words in visit order.
    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    /// Releases the recorded words.
    #[must_use]
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }
}

impl<'a> IntoIterator for &'a ExecutionTrace {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
