//! Host-facing run configuration and trace hooks.

use crate::{HaltReason, Symbol};

/// Step budget used when a host does not pick one.
pub const DEFAULT_STEP_BUDGET: u64 = 10_000;

/// Immutable configuration for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunConfig {
    /// Maximum number of rewrite steps before the run reports
    /// [`RunOutcome::BudgetExceeded`](crate::RunOutcome::BudgetExceeded).
    pub step_budget: u64,
    /// Enables deterministic [`TraceSink`] dispatch.
    pub tracing_enabled: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            step_budget: DEFAULT_STEP_BUDGET,
            tracing_enabled: false,
        }
    }
}

impl RunConfig {
    /// Default configuration with a specific budget.
    #[must_use]
    pub const fn with_budget(step_budget: u64) -> Self {
        Self {
            step_budget,
            tracing_enabled: false,
        }
    }
}

/// Deterministic events emitted by the driver when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// One rewrite was applied.
    Rewrite {
        /// 1-based index of the step that produced the new word.
        step: u64,
        /// Leftmost symbol that selected the production.
        leading: Symbol,
        /// Symbols removed from the front.
        deleted: usize,
        /// Symbols appended at the back.
        appended: usize,
        /// Length of the produced word.
        resulting_len: usize,
    },
    /// The run ended on a halting word.
    Halted {
        /// Steps taken before the halting word was classified.
        step: u64,
        /// Why the word halts.
        reason: HaltReason,
    },
    /// The run stopped with the budget spent.
    BudgetExhausted {
        /// Steps taken, equal to the configured budget.
        steps: u64,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Sink that keeps every event in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceRecorder {
    /// Events received so far.
    pub events: Vec<TraceEvent>,
}

impl TraceSink for TraceRecorder {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
