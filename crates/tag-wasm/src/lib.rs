use serde::{Deserialize, Serialize};
use tag_engine::{run, RunOutcome, Word};
use tag_runner::definition::{parse_definition_str, Definition};
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&JsValue::from_str(&format!($($t)*))))
}

/// JS-compatible tag for how a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WasmOutcomeKind {
    Halted,
    BudgetExceeded,
}

/// JS-compatible version of RunOutcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmRunOutcome {
    pub kind: WasmOutcomeKind,
    pub steps: u64,
    /// Halt reason label; absent when the budget ran out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub final_word: String,
    pub trace: Vec<String>,
}

impl From<&RunOutcome> for WasmRunOutcome {
    fn from(outcome: &RunOutcome) -> Self {
        let kind = if outcome.is_halted() {
            WasmOutcomeKind::Halted
        } else {
            WasmOutcomeKind::BudgetExceeded
        };
        Self {
            kind,
            steps: outcome.steps(),
            reason: outcome.halt_reason().map(|r| r.label().to_string()),
            final_word: outcome.final_word().to_string(),
            trace: outcome.trace().iter().map(ToString::to_string).collect(),
        }
    }
}

#[wasm_bindgen]
pub struct WasmTagSystem {
    definition: Definition,
}

impl WasmTagSystem {
    /// Parses plain definition text.
    ///
    /// # Errors
    ///
    /// Returns the formatted load error.
    pub fn from_source(source: &str) -> Result<Self, String> {
        parse_definition_str(source)
            .map(|definition| Self { definition })
            .map_err(|e| e.format_for_stderr())
    }

    /// Runs from `input` (or the definition's `input`) within `budget` (or the
    /// definition's budget).
    ///
    /// # Errors
    ///
    /// Fails when no initial word is available or it leaves the alphabet.
    pub fn run_outcome(
        &self,
        input: Option<&str>,
        budget: Option<u32>,
    ) -> Result<WasmRunOutcome, String> {
        let initial = input
            .map(Word::from)
            .or_else(|| self.definition.input.clone())
            .ok_or_else(|| "error: no initial word given and no 'input' directive".to_string())?;
        let budget = budget.map_or_else(|| self.definition.step_budget(), u64::from);

        run(&initial, &self.definition.system, budget)
            .map(|outcome| WasmRunOutcome::from(&outcome))
            .map_err(|e| format!("error: input word rejected: {e}"))
    }
}

#[wasm_bindgen]
impl WasmTagSystem {
    /// Parses a definition; errors surface as JS exceptions.
    ///
    /// # Errors
    ///
    /// Throws the formatted load error.
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str) -> Result<Self, JsValue> {
        console_error_panic_hook::set_once();
        let system = Self::from_source(source).map_err(|e| JsValue::from_str(&e))?;
        console_log!(
            "Loaded tag system: deletion {}, {} rules",
            system.deletion_count(),
            system.definition.system.productions().len()
        );
        Ok(system)
    }

    /// Runs the system and returns the outcome as a JS object.
    ///
    /// # Errors
    ///
    /// Throws when the run cannot start or the outcome cannot be converted.
    #[allow(clippy::needless_pass_by_value)]
    pub fn run(&self, input: Option<String>, budget: Option<u32>) -> Result<JsValue, JsValue> {
        let outcome = self
            .run_outcome(input.as_deref(), budget)
            .map_err(|e| JsValue::from_str(&e))?;
        serde_wasm_bindgen::to_value(&outcome).map_err(Into::into)
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn deletion_count(&self) -> usize {
        self.definition.system.deletion_count()
    }

    #[must_use]
    pub fn halting_symbol(&self) -> String {
        self.definition.system.halting_symbol().to_string()
    }

    /// Alphabet symbols in sorted order.
    #[must_use]
    pub fn alphabet(&self) -> js_sys::Array {
        self.definition
            .system
            .alphabet()
            .iter()
            .map(|symbol| JsValue::from_str(&symbol.to_string()))
            .collect()
    }

    /// Returns the validated system as a JSON object.
    ///
    /// # Errors
    ///
    /// Throws if serialization fails.
    pub fn system(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.definition.system).map_err(Into::into)
    }
}
