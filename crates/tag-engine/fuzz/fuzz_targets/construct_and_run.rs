#![no_main]

use libfuzzer_sys::fuzz_target;
use tag_engine::{
    halt_reason, is_halting, run, step_one, RuleTable, StepOutcome, Symbol, TagSystem, Word,
};

const LETTERS: [char; 4] = ['a', 'b', 'c', 'H'];

fn symbol(byte: u8) -> Symbol {
    Symbol::new(LETTERS[usize::from(byte) % LETTERS.len()])
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let deletion_count = usize::from(data[0] % 5);
    let budget = u64::from(data[1]);
    let split = 2 + usize::from(data[2]) % (data.len() - 2);
    let (rule_bytes, word_bytes) = data[2..].split_at(split - 2);

    let mut rules = RuleTable::new();
    for (index, chunk) in rule_bytes.chunks(4).enumerate() {
        let key = symbol(u8::try_from(index % 3).unwrap_or(0));
        rules.insert(key, chunk.iter().copied().map(symbol).collect());
    }

    let Ok(system) = TagSystem::new(
        deletion_count,
        LETTERS.iter().copied().map(Symbol::new),
        Symbol::new('H'),
        rules,
    ) else {
        return;
    };

    let word: Word = word_bytes.iter().copied().map(symbol).collect();
    match step_one(&word, &system) {
        StepOutcome::Halted(reason) => assert_eq!(halt_reason(&word, &system), Some(reason)),
        StepOutcome::Rewritten(next) => assert!(next.len() + system.deletion_count() >= word.len()),
    }

    if let Ok(outcome) = run(&word, &system, budget) {
        assert!(outcome.steps() <= budget);
        assert_eq!(outcome.is_halted(), is_halting(outcome.final_word(), &system));
    }
});
