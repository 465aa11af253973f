//! Deterministic, step-bounded Tag System rewriting engine.
//!
//! A tag system rewrites a word by deleting a fixed number of leading symbols
//! and appending the production selected by the word's leftmost symbol. The
//! engine iterates that rewrite until a halting word appears or a
//! caller-supplied step budget runs out.

/// Symbol and word primitives.
pub mod word;
pub use word::{Symbol, Word};

/// Production rule table.
pub mod rules;
pub use rules::RuleTable;

/// Definition and input validation errors.
pub mod error;
pub use error::DefinitionError;

/// Validated tag system definitions.
pub mod system;
pub use system::TagSystem;

/// Halt predicate and halt reasons.
pub mod halt;
pub use halt::{halt_reason, is_halting, HaltReason};

/// Single-step rewriting.
pub mod rewrite;
pub use rewrite::{step_one, transform, StepOutcome};

/// Host-facing run configuration and trace hooks.
pub mod api;
pub use api::{
    NullTraceSink, RunConfig, TraceEvent, TraceRecorder, TraceSink, DEFAULT_STEP_BUDGET,
};

/// Execution trace recording.
pub mod trace;
pub use trace::ExecutionTrace;

/// Bounded run loop.
pub mod driver;
pub use driver::{run, run_with_config, RunOutcome};

#[cfg(test)]
use proptest as _;
