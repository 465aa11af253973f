//! Bounded run loop.
//!
//! Halting of a tag system is undecidable in general, so the loop never
//! trusts the modelled system to terminate: the step budget is the only
//! termination guarantee, and running out of it is reported as
//! [`RunOutcome::BudgetExceeded`], never as "does not halt".

use tracing::{debug, trace};

use crate::{
    halt_reason, transform, DefinitionError, ExecutionTrace, HaltReason, NullTraceSink, RunConfig,
    TagSystem, TraceEvent, TraceSink, Word,
};

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A halting word was reached.
    Halted {
        /// The halting word, also the newest trace entry.
        final_word: Word,
        /// Why the final word halts.
        reason: HaltReason,
        /// Every word visited, initial word first.
        trace: ExecutionTrace,
    },
    /// The budget ran out before a halting word appeared.
    BudgetExceeded {
        /// Steps taken, equal to the budget.
        steps: u64,
        /// Words visited so far, initial word first.
        trace: ExecutionTrace,
    },
}

impl RunOutcome {
    /// Returns true for [`RunOutcome::Halted`].
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        matches!(self, Self::Halted { .. })
    }

    /// Words visited by the run.
    #[must_use]
    pub const fn trace(&self) -> &ExecutionTrace {
        match self {
            Self::Halted { trace, .. } | Self::BudgetExceeded { trace, .. } => trace,
        }
    }

    /// Consumes the outcome, keeping only the trace.
    #[must_use]
    pub fn into_trace(self) -> ExecutionTrace {
        match self {
            Self::Halted { trace, .. } | Self::BudgetExceeded { trace, .. } => trace,
        }
    }

    /// Rewrite steps performed.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.trace().steps()
    }

    /// Newest word of the run.
    ///
    /// After [`RunOutcome::BudgetExceeded`] this is the word to resume from:
    /// a rewrite depends on the current word alone, so running again from it
    /// continues the same computation.
    #[must_use]
    pub fn final_word(&self) -> &Word {
        match self {
            Self::Halted { final_word, .. } => final_word,
            Self::BudgetExceeded { trace, .. } => trace.newest(),
        }
    }

    /// Halt reason, for halted runs.
    #[must_use]
    pub const fn halt_reason(&self) -> Option<HaltReason> {
        match self {
            Self::Halted { reason, .. } => Some(*reason),
            Self::BudgetExceeded { .. } => None,
        }
    }
}

/// Runs `system` from `initial` for at most `step_budget` rewrites.
///
/// # Errors
///
/// Returns [`DefinitionError::WordOutsideAlphabet`] if `initial` uses a
/// symbol outside the alphabet. No step is taken in that case.
pub fn run(
    initial: &Word,
    system: &TagSystem,
    step_budget: u64,
) -> Result<RunOutcome, DefinitionError> {
    run_with_config(
        initial,
        system,
        &RunConfig::with_budget(step_budget),
        &mut NullTraceSink,
    )
}

/// Runs `system` from `initial` under `config`, dispatching trace events to
/// `sink` when tracing is enabled.
///
/// Repeated calls with equal arguments produce equal outcomes and equal event
/// streams.
///
/// # Errors
///
/// Returns [`DefinitionError::WordOutsideAlphabet`] if `initial` uses a
/// symbol outside the alphabet. No step is taken in that case.
pub fn run_with_config(
    initial: &Word,
    system: &TagSystem,
    config: &RunConfig,
    sink: &mut dyn TraceSink,
) -> Result<RunOutcome, DefinitionError> {
    system.check_word(initial)?;
    debug!(
        initial_len = initial.len(),
        deletion_count = system.deletion_count(),
        step_budget = config.step_budget,
        "starting run"
    );

    let deletion = system.deletion_count();
    let mut trace = ExecutionTrace::starting_with(initial.clone());
    let mut steps: u64 = 0;

    loop {
        let current = trace.newest();

        if let Some(reason) = halt_reason(current, system) {
            if config.tracing_enabled {
                sink.on_event(TraceEvent::Halted { step: steps, reason });
            }
            debug!(steps, %reason, "run halted");
            let final_word = current.clone();
            return Ok(RunOutcome::Halted {
                final_word,
                reason,
                trace,
            });
        }

        if steps == config.step_budget {
            if config.tracing_enabled {
                sink.on_event(TraceEvent::BudgetExhausted { steps });
            }
            debug!(steps, "step budget exhausted");
            return Ok(RunOutcome::BudgetExceeded { steps, trace });
        }

        let Some(leading) = current.leading() else {
            unreachable!("non-halting word is never empty");
        };
        let next = transform(current, system);
        steps += 1;

        trace!(step = steps, %leading, len = next.len(), "rewrote word");
        if config.tracing_enabled {
            sink.on_event(TraceEvent::Rewrite {
                step: steps,
                leading,
                deleted: deletion,
                appended: next.len() + deletion - current.len(),
                resulting_len: next.len(),
            });
        }

        trace.record(next);
    }
}
