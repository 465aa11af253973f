//! Parsing for inline test block syntax.
//!
//! This module parses `tagtest` block content into run settings and
//! structured assertions.
//!
//! ## Supported Syntax
//!
//! - Run settings: `input WORD`, `budget N` (each at most once per block)
//! - Outcome assertions: `outcome == halted`, `outcome != budget-exceeded`
//! - Halt reason assertions: `reason == short` (`empty`, `short`, `halt-symbol`)
//! - Counter assertions: `steps == 24`, `length != 0`
//! - Final word assertions: `final == a` (`final ==` compares against the
//!   empty word)
//! - Comments: `;` to end of line

use std::fmt;

use tag_engine::{HaltReason, Word};
use thiserror::Error;

use crate::parser::COMMENT_CHAR;

/// Expected run outcome in an `outcome` assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedOutcome {
    /// The run reached a halting word.
    Halted,
    /// The run used up its step budget.
    BudgetExceeded,
}

impl ExpectedOutcome {
    /// Label used in test blocks.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Halted => "halted",
            Self::BudgetExceeded => "budget-exceeded",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "halted" => Some(Self::Halted),
            "budget-exceeded" => Some(Self::BudgetExceeded),
            _ => None,
        }
    }
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed assertion from a `tagtest` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Assert on how the run ended.
    Outcome {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected outcome.
        expected: ExpectedOutcome,
    },
    /// Assert on why the run halted. Never satisfied by `==` when the budget
    /// ran out.
    Reason {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected reason.
        expected: HaltReason,
    },
    /// Assert on the number of rewrite steps taken.
    Steps {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected step count.
        expected: u64,
    },
    /// Assert on the last word of the trace.
    Final {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected word.
        expected: Word,
    },
    /// Assert on the length of the last word of the trace.
    Length {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected length.
        expected: usize,
    },
}

impl Assertion {
    /// The comparison operator of this assertion.
    #[must_use]
    pub const fn operator(&self) -> ComparisonOp {
        match self {
            Self::Outcome { operator, .. }
            | Self::Reason { operator, .. }
            | Self::Steps { operator, .. }
            | Self::Final { operator, .. }
            | Self::Length { operator, .. } => *operator,
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outcome { operator, expected } => write!(f, "outcome {operator} {expected}"),
            Self::Reason { operator, expected } => {
                write!(f, "reason {operator} {}", expected.label())
            }
            Self::Steps { operator, expected } => write!(f, "steps {operator} {expected}"),
            Self::Final { operator, expected } => write!(f, "final {operator} {expected}"),
            Self::Length { operator, expected } => write!(f, "length {operator} {expected}"),
        }
    }
}

/// Comparison operator for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// Assert equality (`==`).
    Equal,
    /// Assert inequality (`!=`).
    NotEqual,
}

impl ComparisonOp {
    /// Applies the operator to `actual` and `expected`.
    #[must_use]
    pub fn holds<T: PartialEq>(self, actual: &T, expected: &T) -> bool {
        match self {
            Self::Equal => actual == expected,
            Self::NotEqual => actual != expected,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
        }
    }
}

/// A parsed test block with its run settings, assertions and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTestBlock {
    /// Initial word override.
    pub input: Option<Word>,
    /// Step budget override.
    pub budget: Option<u64>,
    /// The parsed assertions in order.
    pub assertions: Vec<Assertion>,
    /// 1-indexed line number where the block starts.
    pub start_line: usize,
    /// 1-indexed line number where the block ends.
    pub end_line: usize,
}

/// Error parsing a test block line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_in_block}: {message} (in '{text}')")]
pub struct ParseAssertionError {
    /// The line number (1-indexed) within the test block where the error occurred.
    pub line_in_block: usize,
    /// The problematic text.
    pub text: String,
    /// Description of the error.
    pub message: String,
}

/// Parses a test block's content into settings and structured assertions.
///
/// Each non-empty, non-comment line is a setting or an assertion.
///
/// # Arguments
///
/// * `content` - The raw text content of the test block (without fence lines)
/// * `start_line` - The 1-indexed line number where the block starts in source
/// * `end_line` - The 1-indexed line number where the block ends in source
///
/// # Errors
///
/// Returns `ParseAssertionError` for the first line with invalid syntax.
pub fn parse_test_block(
    content: &str,
    start_line: usize,
    end_line: usize,
) -> Result<ParsedTestBlock, ParseAssertionError> {
    let mut block = ParsedTestBlock {
        input: None,
        budget: None,
        assertions: Vec::new(),
        start_line,
        end_line,
    };

    for (idx, raw) in content.lines().enumerate() {
        let code = raw
            .find(COMMENT_CHAR)
            .map_or(raw, |pos| &raw[..pos])
            .trim();
        if code.is_empty() {
            continue;
        }
        let error = |message: String| ParseAssertionError {
            line_in_block: idx + 1,
            text: code.to_string(),
            message,
        };

        let (keyword, rest) = code
            .split_once(char::is_whitespace)
            .map_or((code, ""), |(keyword, rest)| (keyword, rest.trim()));

        match keyword {
            "input" => {
                if block.input.is_some() {
                    return Err(error("duplicate 'input' setting".to_string()));
                }
                block.input = Some(Word::from(rest));
            }
            "budget" => {
                if block.budget.is_some() {
                    return Err(error("duplicate 'budget' setting".to_string()));
                }
                let budget = parse_count(rest).map_err(&error)?;
                block.budget = Some(budget);
            }
            _ => block
                .assertions
                .push(parse_assertion(keyword, rest).map_err(&error)?),
        }
    }

    Ok(block)
}

fn parse_assertion(keyword: &str, rest: &str) -> Result<Assertion, String> {
    let (operator, value) = if let Some(value) = rest.strip_prefix("==") {
        (ComparisonOp::Equal, value.trim())
    } else if let Some(value) = rest.strip_prefix("!=") {
        (ComparisonOp::NotEqual, value.trim())
    } else if matches!(keyword, "outcome" | "reason" | "steps" | "final" | "length") {
        return Err(format!("expected '==' or '!=' after '{keyword}'"));
    } else {
        return Err(format!("unknown assertion target '{keyword}'"));
    };

    match keyword {
        "outcome" => ExpectedOutcome::from_label(value)
            .map(|expected| Assertion::Outcome { operator, expected })
            .ok_or_else(|| {
                format!("invalid outcome '{value}' (expected 'halted' or 'budget-exceeded')")
            }),
        "reason" => HaltReason::from_label(value)
            .map(|expected| Assertion::Reason { operator, expected })
            .ok_or_else(|| {
                format!(
                    "invalid halt reason '{value}' (expected 'empty', 'short' or 'halt-symbol')"
                )
            }),
        "steps" => parse_count(value).map(|expected| Assertion::Steps { operator, expected }),
        "length" => {
            parse_count(value).map(|expected| Assertion::Length { operator, expected })
        }
        "final" => Ok(Assertion::Final {
            operator,
            expected: Word::from(value),
        }),
        other => Err(format!("unknown assertion target '{other}'")),
    }
}

fn parse_count<T: std::str::FromStr>(text: &str) -> Result<T, String> {
    if text.is_empty() {
        return Err("missing number".to_string());
    }
    text.replace('_', "")
        .parse()
        .map_err(|_| format!("invalid number '{text}'"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn parses_settings_and_assertions() {
        let content = "\
; Collatz n=3
input aaa
budget 1_000
outcome == halted
reason == short
steps == 24
final == a
length != 0
";
        let block = parse_test_block(content, 10, 19).expect("block should parse");

        assert_eq!(block.input, Some(Word::from("aaa")));
        assert_eq!(block.budget, Some(1_000));
        assert_eq!(block.start_line, 10);
        assert_eq!(block.end_line, 19);
        assert_eq!(
            block.assertions,
            vec![
                Assertion::Outcome {
                    operator: ComparisonOp::Equal,
                    expected: ExpectedOutcome::Halted,
                },
                Assertion::Reason {
                    operator: ComparisonOp::Equal,
                    expected: HaltReason::ShorterThanDeletion,
                },
                Assertion::Steps {
                    operator: ComparisonOp::Equal,
                    expected: 24,
                },
                Assertion::Final {
                    operator: ComparisonOp::Equal,
                    expected: Word::from("a"),
                },
                Assertion::Length {
                    operator: ComparisonOp::NotEqual,
                    expected: 0,
                },
            ]
        );
    }

    #[test]
    fn settings_are_optional() {
        let block = parse_test_block("outcome != budget-exceeded", 1, 3).expect("parse");

        assert_eq!(block.input, None);
        assert_eq!(block.budget, None);
        assert_eq!(block.assertions.len(), 1);
    }

    #[test]
    fn empty_final_word_and_empty_input() {
        let block = parse_test_block("input\nfinal ==\nreason == empty", 1, 5).expect("parse");

        assert_eq!(block.input, Some(Word::empty()));
        assert_eq!(
            block.assertions[0],
            Assertion::Final {
                operator: ComparisonOp::Equal,
                expected: Word::empty(),
            }
        );
    }

    #[test]
    fn assertions_display_in_source_syntax() {
        let block =
            parse_test_block("reason != halt-symbol\noutcome == budget-exceeded", 1, 4)
                .expect("parse");

        let rendered: Vec<String> = block.assertions.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["reason != halt-symbol", "outcome == budget-exceeded"]
        );
    }

    #[rstest]
    #[case::unknown_target("colour == red", "unknown assertion target 'colour'")]
    #[case::missing_operator("steps 24", "expected '==' or '!=' after 'steps'")]
    #[case::bad_outcome("outcome == done", "invalid outcome 'done'")]
    #[case::bad_reason("reason == tired", "invalid halt reason 'tired'")]
    #[case::bad_number("steps == many", "invalid number 'many'")]
    #[case::missing_budget("budget", "missing number")]
    fn rejects_invalid_lines(#[case] line: &str, #[case] message: &str) {
        let error = parse_test_block(line, 1, 3).expect_err("line should fail");

        assert_eq!(error.line_in_block, 1);
        assert!(
            error.message.starts_with(message),
            "unexpected message: {}",
            error.message
        );
    }

    #[test]
    fn rejects_duplicate_settings() {
        let error = parse_test_block("input aa\n\ninput a", 1, 5).expect_err("duplicate input");

        assert_eq!(error.line_in_block, 3);
        assert_eq!(
            error.to_string(),
            "line 3: duplicate 'input' setting (in 'input a')"
        );
    }

    #[test]
    fn comparison_op_holds() {
        assert!(ComparisonOp::Equal.holds(&3, &3));
        assert!(!ComparisonOp::Equal.holds(&3, &4));
        assert!(ComparisonOp::NotEqual.holds(&"a", &"b"));
    }
}
