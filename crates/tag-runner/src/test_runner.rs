//! Test execution for inline `tagtest` blocks.
//!
//! ## Execution Model
//!
//! Every block is an independent run of the definition's system:
//!
//! 1. Pick the initial word: the block's `input`, else the definition's.
//! 2. Pick the budget: the block's `budget`, else the definition's, else
//!    [`DEFAULT_STEP_BUDGET`](tag_engine::DEFAULT_STEP_BUDGET).
//! 3. Run to a halting word or the end of the budget.
//! 4. Evaluate all assertions against the outcome and report expected vs.
//!    actual values for failures.

use std::fmt;

use tag_engine::{run, RunOutcome, Word};
use tracing::debug;

use crate::definition::Definition;
use crate::test_format::{Assertion, ExpectedOutcome, ParsedTestBlock};

/// Result of evaluating a single assertion against a run outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// The original assertion that was evaluated.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// The actual value observed (for failure reporting).
    pub actual: String,
}

/// Result of running a single test block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBlockResult {
    /// 1-indexed source line where the test block starts.
    pub start_line: usize,
    /// 1-indexed source line where the test block ends.
    pub end_line: usize,
    /// Results for each assertion in the block.
    pub assertion_results: Vec<AssertionResult>,
    /// Why the block could not run, if it could not.
    pub error: Option<String>,
}

impl TestBlockResult {
    /// Returns true if the block ran and all assertions passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.assertion_results.iter().all(|r| r.passed)
    }
}

/// Result of running all test blocks of a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunResult {
    /// Results for each test block in order.
    pub block_results: Vec<TestBlockResult>,
}

impl TestRunResult {
    /// Returns true if every block passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.block_results.iter().all(TestBlockResult::passed)
    }

    /// Returns counts for summary reporting.
    #[must_use]
    pub fn summary(&self) -> TestSummary {
        let passed = self.block_results.iter().filter(|b| b.passed()).count();
        TestSummary {
            passed,
            failed: self.block_results.len() - passed,
            total: self.block_results.len(),
        }
    }
}

/// Summary counts for test run reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSummary {
    /// Number of test blocks that passed.
    pub passed: usize,
    /// Number of test blocks that failed.
    pub failed: usize,
    /// Total number of test blocks.
    pub total: usize,
}

/// Runs all test blocks against a loaded definition.
#[must_use]
pub fn run_tests(definition: &Definition, test_blocks: &[ParsedTestBlock]) -> TestRunResult {
    TestRunResult {
        block_results: test_blocks
            .iter()
            .map(|block| run_test_block(definition, block))
            .collect(),
    }
}

fn run_test_block(definition: &Definition, block: &ParsedTestBlock) -> TestBlockResult {
    let result = |assertion_results: Vec<AssertionResult>, error: Option<String>| {
        TestBlockResult {
            start_line: block.start_line,
            end_line: block.end_line,
            assertion_results,
            error,
        }
    };

    let Some(input) = block.input.as_ref().or(definition.input.as_ref()) else {
        return result(
            Vec::new(),
            Some("no input word (set 'input' in the block or the definition)".to_string()),
        );
    };
    let budget = block.budget.unwrap_or_else(|| definition.step_budget());

    debug!(
        start_line = block.start_line,
        input = %input,
        budget,
        "running test block"
    );

    match run(input, &definition.system, budget) {
        Ok(outcome) => result(evaluate_assertions(&outcome, &block.assertions), None),
        Err(error) => result(Vec::new(), Some(format!("input rejected: {error}"))),
    }
}

fn evaluate_assertions(outcome: &RunOutcome, assertions: &[Assertion]) -> Vec<AssertionResult> {
    assertions
        .iter()
        .map(|assertion| evaluate_assertion(outcome, assertion))
        .collect()
}

fn evaluate_assertion(outcome: &RunOutcome, assertion: &Assertion) -> AssertionResult {
    let (passed, actual) = match assertion {
        Assertion::Outcome { operator, expected } => {
            let actual = if outcome.is_halted() {
                ExpectedOutcome::Halted
            } else {
                ExpectedOutcome::BudgetExceeded
            };
            (operator.holds(&actual, expected), actual.label().to_string())
        }
        Assertion::Reason { operator, expected } => {
            let actual = outcome.halt_reason();
            (
                operator.holds(&actual, &Some(*expected)),
                actual.map_or_else(|| "none".to_string(), |r| r.label().to_string()),
            )
        }
        Assertion::Steps { operator, expected } => {
            let actual = outcome.steps();
            (operator.holds(&actual, expected), actual.to_string())
        }
        Assertion::Final { operator, expected } => {
            let actual = outcome.final_word();
            (operator.holds(actual, expected), display_word(actual))
        }
        Assertion::Length { operator, expected } => {
            let actual = outcome.final_word().len();
            (operator.holds(&actual, expected), actual.to_string())
        }
    };

    AssertionResult {
        assertion: assertion.clone(),
        passed,
        actual,
    }
}

fn display_word(word: &Word) -> String {
    if word.is_empty() {
        "<empty>".to_string()
    } else {
        word.to_string()
    }
}

impl fmt::Display for TestBlockResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(
                f,
                "PASS (lines {}-{}): {} assertions",
                self.start_line,
                self.end_line,
                self.assertion_results.len()
            )
        } else if let Some(error) = &self.error {
            write!(
                f,
                "FAIL (lines {}-{}): {error}",
                self.start_line, self.end_line
            )
        } else {
            let failures = self.assertion_results.iter().filter(|r| !r.passed).count();
            write!(
                f,
                "FAIL (lines {}-{}): {failures} assertion(s) failed",
                self.start_line, self.end_line
            )
        }
    }
}

impl fmt::Display for AssertionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "PASS: {}", self.assertion)
        } else {
            write!(f, "FAIL: {} (got {})", self.assertion, self.actual)
        }
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passed, {} failed", self.passed, self.failed)
    }
}
