//! Deterministic run fingerprint generator used for cross-host comparison.

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use tag_engine::{
    run_with_config, HaltReason, RuleTable, RunConfig, RunOutcome, Symbol, TagSystem, TraceEvent,
    TraceRecorder, Word,
};
use thiserror as _;
use tracing as _;

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn hash_symbol(hash: &mut u64, symbol: Symbol) {
    hash_bytes(hash, &u32::from(symbol.as_char()).to_le_bytes());
}

const fn reason_tag(reason: HaltReason) -> u8 {
    match reason {
        HaltReason::Empty => 0x21,
        HaltReason::ShorterThanDeletion => 0x22,
        HaltReason::HaltingSymbol => 0x23,
    }
}

fn fingerprint() -> String {
    let system = TagSystem::new(
        2,
        "abcH".chars().map(Symbol::new),
        Symbol::new('H'),
        RuleTable::from([('a', "bc"), ('b', "a"), ('c', "aaa")]),
    )
    .expect("reference system should be valid");
    let config = RunConfig {
        step_budget: 200,
        tracing_enabled: true,
    };
    let mut recorder = TraceRecorder::default();
    let outcome = run_with_config(&Word::from("aaaaaaa"), &system, &config, &mut recorder)
        .expect("reference run should start");

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    hash_bytes(&mut hash, &outcome.steps().to_le_bytes());

    match &outcome {
        RunOutcome::Halted { reason, .. } => hash_bytes(&mut hash, &[0x10, reason_tag(*reason)]),
        RunOutcome::BudgetExceeded { steps, .. } => {
            hash_bytes(&mut hash, &[0x11]);
            hash_bytes(&mut hash, &steps.to_le_bytes());
        }
    }

    for word in outcome.trace() {
        hash_bytes(&mut hash, &(word.len() as u64).to_le_bytes());
        for symbol in word.iter() {
            hash_symbol(&mut hash, symbol);
        }
    }

    for event in &recorder.events {
        match *event {
            TraceEvent::Rewrite {
                step,
                leading,
                appended,
                resulting_len,
                ..
            } => {
                hash_bytes(&mut hash, &[0x30]);
                hash_bytes(&mut hash, &step.to_le_bytes());
                hash_symbol(&mut hash, leading);
                hash_bytes(&mut hash, &(appended as u64).to_le_bytes());
                hash_bytes(&mut hash, &(resulting_len as u64).to_le_bytes());
            }
            TraceEvent::Halted { step, reason } => {
                hash_bytes(&mut hash, &[0x31, reason_tag(reason)]);
                hash_bytes(&mut hash, &step.to_le_bytes());
            }
            TraceEvent::BudgetExhausted { steps } => {
                hash_bytes(&mut hash, &[0x32]);
                hash_bytes(&mut hash, &steps.to_le_bytes());
            }
        }
    }

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
