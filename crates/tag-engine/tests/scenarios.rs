//! End-to-end runs over small reference systems.

use proptest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

use rstest::rstest;
use tag_engine::{
    run, run_with_config, DefinitionError, HaltReason, RuleTable, RunConfig, RunOutcome, Symbol,
    TagSystem, TraceRecorder, Word,
};

fn system(deletion_count: usize, alphabet: &str, rules: RuleTable) -> TagSystem {
    TagSystem::new(
        deletion_count,
        alphabet.chars().map(Symbol::new),
        Symbol::new('H'),
        rules,
    )
    .expect("valid system")
}

/// De Mol's 2-tag system for the Collatz map; `a^n` ends on `a` when the
/// orbit of `n` reaches 1.
fn collatz() -> TagSystem {
    system(
        2,
        "abcH",
        RuleTable::from([('a', "bc"), ('b', "a"), ('c', "aaa")]),
    )
}

fn rendered(outcome: &RunOutcome) -> Vec<String> {
    outcome.trace().iter().map(ToString::to_string).collect()
}

#[test]
fn single_step_to_short_halting_word() {
    let system = system(2, "aH", RuleTable::from([('a', "H")]));

    let outcome = run(&Word::from("aa"), &system, 100).expect("run");

    // "H" is shorter than the deletion count, which is checked first.
    assert_eq!(outcome.halt_reason(), Some(HaltReason::ShorterThanDeletion));
    assert_eq!(outcome.final_word(), &Word::from("H"));
    assert_eq!(rendered(&outcome), vec!["aa", "H"]);
    assert_eq!(outcome.steps(), 1);
}

#[test]
fn single_step_to_halting_symbol_at_the_head() {
    let system = system(2, "aH", RuleTable::from([('a', "HH")]));

    let outcome = run(&Word::from("aa"), &system, 100).expect("run");

    assert_eq!(outcome.halt_reason(), Some(HaltReason::HaltingSymbol));
    assert_eq!(outcome.final_word(), &Word::from("HH"));
    assert_eq!(rendered(&outcome), vec!["aa", "HH"]);
    assert_eq!(outcome.steps(), 1);
}

#[test]
fn length_based_halt_takes_no_step() {
    let system = system(3, "abH", RuleTable::from([('a', "b"), ('b', "a")]));

    let outcome = run(&Word::from("ab"), &system, 100).expect("run");

    assert_eq!(outcome.halt_reason(), Some(HaltReason::ShorterThanDeletion));
    assert_eq!(rendered(&outcome), vec!["ab"]);
    assert_eq!(outcome.steps(), 0);
}

#[test]
fn budget_exceeded_after_exactly_budget_steps() {
    let system = system(2, "aH", RuleTable::from([('a', "aa")]));

    let outcome = run(&Word::from("aa"), &system, 5).expect("run");

    match &outcome {
        RunOutcome::BudgetExceeded { steps, trace } => {
            assert_eq!(*steps, 5);
            assert_eq!(trace.len(), 6);
            assert!(trace.iter().all(|word| *word == Word::from("aa")));
        }
        RunOutcome::Halted { .. } => panic!("cycle must not halt"),
    }
}

#[rstest]
#[case(1, 0)]
#[case(2, 2)]
#[case(3, 24)]
#[case(4, 6)]
#[case(5, 20)]
#[case(7, 128)]
fn collatz_orbits_halt_on_single_a(#[case] n: usize, #[case] expected_steps: u64) {
    let initial = Word::from("a".repeat(n).as_str());

    let outcome = run(&initial, &collatz(), 1_000).expect("run");

    assert_eq!(outcome.halt_reason(), Some(HaltReason::ShorterThanDeletion));
    assert_eq!(outcome.final_word(), &Word::from("a"));
    assert_eq!(outcome.steps(), expected_steps);
}

#[test]
fn collatz_three_visits_the_expected_words() {
    let outcome = run(&Word::from("aaa"), &collatz(), 1_000).expect("run");
    let trace = rendered(&outcome);

    assert_eq!(
        &trace[..6],
        &["aaa", "abc", "cbc", "caaa", "aaaaa", "aaabc"]
    );
    assert_eq!(&trace[trace.len() - 4..], &["bca", "aa", "bc", "a"]);
    assert_eq!(trace.len(), 25);
}

#[test]
fn halting_symbol_surfaces_mid_word() {
    let system = system(
        2,
        "abcH",
        RuleTable::from([('a', "ccbaH"), ('b', "cca"), ('c', "cc")]),
    );

    let outcome = run(&Word::from("baa"), &system, 100).expect("run");

    assert_eq!(
        rendered(&outcome),
        vec!["baa", "acca", "caccbaH", "ccbaHcc", "baHcccc", "Hcccccca"]
    );
    assert_eq!(outcome.halt_reason(), Some(HaltReason::HaltingSymbol));
}

#[test]
fn resuming_from_partial_word_matches_uninterrupted_run() {
    let system = collatz();
    let initial = Word::from("aaaaaaa");

    let whole = run(&initial, &system, 1_000).expect("run");

    let mut resumed_steps = 0;
    let mut word = initial;
    let last = loop {
        let outcome = run(&word, &system, 10).expect("run");
        resumed_steps += outcome.steps();
        if outcome.is_halted() {
            break outcome;
        }
        word = outcome.final_word().clone();
    };

    assert_eq!(last.final_word(), whole.final_word());
    assert_eq!(resumed_steps, whole.steps());
}

#[test]
fn repeated_runs_are_identical() {
    let system = collatz();
    let config = RunConfig {
        step_budget: 50,
        tracing_enabled: true,
    };

    let mut first_events = TraceRecorder::default();
    let mut second_events = TraceRecorder::default();
    let first =
        run_with_config(&Word::from("aaaaaaa"), &system, &config, &mut first_events).expect("run");
    let second =
        run_with_config(&Word::from("aaaaaaa"), &system, &config, &mut second_events).expect("run");

    assert_eq!(first, second);
    assert_eq!(first_events, second_events);
    assert!(!first.is_halted());
}

#[rstest]
#[case::zero(0)]
#[case::one(1)]
fn construction_rejects_degenerate_deletion_counts(#[case] count: usize) {
    let error = TagSystem::new(
        count,
        "aH".chars().map(Symbol::new),
        Symbol::new('H'),
        RuleTable::from([('a', "H")]),
    )
    .expect_err("degenerate deletion count");

    assert_eq!(error, DefinitionError::DeletionCountTooSmall { count });
}

#[test]
fn construction_rejects_missing_production() {
    let error = TagSystem::new(
        2,
        "abH".chars().map(Symbol::new),
        Symbol::new('H'),
        RuleTable::from([('a', "b")]),
    )
    .expect_err("b has no production");

    assert_eq!(
        error,
        DefinitionError::MissingProduction {
            symbol: Symbol::new('b')
        }
    );
}

#[test]
fn construction_rejects_out_of_alphabet_production_symbol() {
    let error = TagSystem::new(
        2,
        "aH".chars().map(Symbol::new),
        Symbol::new('H'),
        RuleTable::from([('a', "ab")]),
    )
    .expect_err("b is not in the alphabet");

    assert_eq!(
        error,
        DefinitionError::SymbolOutsideAlphabet {
            rule: Symbol::new('a'),
            symbol: Symbol::new('b'),
        }
    );
}

#[test]
fn independent_runs_share_one_system_across_threads() {
    let system = collatz();

    let steps: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = [3usize, 5, 7]
            .into_iter()
            .map(|n| {
                let system = &system;
                scope.spawn(move || {
                    run(&Word::from("a".repeat(n).as_str()), system, 1_000)
                        .expect("run")
                        .steps()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("run thread"))
            .collect()
    });

    assert_eq!(steps, vec![24, 20, 128]);
}
