//! Definition loading pipeline.
//!
//! 1. **Extraction**: plain or literate source (`source::extract_source`)
//! 2. **Parsing**: one directive or rule per line (`parser::parse_line`)
//! 3. **Collection**: duplicate checks and alphabet inference
//! 4. **Validation**: [`TagSystem::new`] and the default input check
//!
//! Every failure is returned as a [`LoadError`] located at the line that
//! caused it, when such a line exists.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tag_engine::{DefinitionError, RuleTable, Symbol, TagSystem, Word, DEFAULT_STEP_BUDGET};
use tracing::debug;

use crate::errors::{LoadError, LoadErrorKind, SourceLoc};
use crate::parser::{parse_line, Directive, ParsedLine, SourceLocation};
use crate::source::{extract_plain_source, extract_source, SourceLine, TestBlock};

/// File name reported for definitions that did not come from disk.
pub const INLINE_SOURCE_NAME: &str = "<inline>";

/// A loaded and validated definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// The validated system.
    pub system: TagSystem,
    /// Default initial word from the `input` directive.
    pub input: Option<Word>,
    /// Default step budget from the `budget` directive.
    pub budget: Option<u64>,
    /// Raw `tagtest` blocks in document order.
    pub test_blocks: Vec<TestBlock>,
    /// Path the definition was read from.
    pub file_path: String,
}

impl Definition {
    /// Budget from the file, or [`DEFAULT_STEP_BUDGET`].
    #[must_use]
    pub fn step_budget(&self) -> u64 {
        self.budget.unwrap_or(DEFAULT_STEP_BUDGET)
    }
}

/// Reads and validates a definition file.
///
/// # Errors
///
/// Returns a [`LoadError`] for I/O failures and any parse or validation error.
pub fn load_definition(path: &Path) -> Result<Definition, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| {
        LoadError::new(LoadErrorKind::Io(format!("{}: {e}", path.display())))
    })?;
    parse_definition(path, &content)
}

/// Validates definition text that was read from `path`.
///
/// The path only selects plain or literate extraction and names the file in
/// error locations.
///
/// # Errors
///
/// Returns a [`LoadError`] for any parse or validation error.
pub fn parse_definition(path: &Path, content: &str) -> Result<Definition, LoadError> {
    let source = extract_source(path, content);
    build_definition(source.file_path, &source.lines, source.test_blocks)
}

/// Validates plain definition text that has no backing file.
///
/// # Errors
///
/// Returns a [`LoadError`] for any parse or validation error.
pub fn parse_definition_str(content: &str) -> Result<Definition, LoadError> {
    build_definition(
        INLINE_SOURCE_NAME.to_string(),
        &extract_plain_source(content),
        Vec::new(),
    )
}

fn build_definition(
    file_path: String,
    lines: &[SourceLine],
    test_blocks: Vec<TestBlock>,
) -> Result<Definition, LoadError> {
    let collected = Collected::from_lines(&file_path, lines)?;
    let locate = |error: DefinitionError| {
        let location = collected.locate(error);
        let error = LoadError::new(LoadErrorKind::Definition(error));
        match location {
            Some(at) => error.with_location(SourceLoc::new(file_path.as_str(), at.line, at.column)),
            None => error,
        }
    };

    let deletion_count = collected
        .deletion
        .ok_or_else(|| missing_directive(&file_path, "deletion"))?;
    let halting_symbol = collected
        .halt
        .ok_or_else(|| missing_directive(&file_path, "halt"))?;
    let alphabet = collected
        .alphabet
        .clone()
        .unwrap_or_else(|| inferred_alphabet(halting_symbol, &collected.rules));

    let system = TagSystem::new(
        deletion_count,
        alphabet,
        halting_symbol,
        collected.rules.clone(),
    )
    .map_err(locate)?;

    if let Some(input) = &collected.input {
        system.check_word(input).map_err(locate)?;
    }

    debug!(
        file = %file_path,
        deletion_count,
        symbols = system.alphabet().len(),
        rules = system.productions().len(),
        inferred_alphabet = collected.alphabet.is_none(),
        tests = test_blocks.len(),
        "loaded tag system definition"
    );

    Ok(Definition {
        system,
        input: collected.input,
        budget: collected.budget,
        test_blocks,
        file_path,
    })
}

fn missing_directive(file_path: &str, directive: &'static str) -> LoadError {
    debug!(file = %file_path, directive, "definition is missing a directive");
    LoadError::new(LoadErrorKind::MissingDirective { directive })
}

/// Halting symbol, every rule key, and every symbol a production uses.
fn inferred_alphabet(halting_symbol: Symbol, rules: &RuleTable) -> Vec<Symbol> {
    std::iter::once(halting_symbol)
        .chain(
            rules
                .iter()
                .flat_map(|(symbol, production)| std::iter::once(symbol).chain(production.iter())),
        )
        .collect()
}

/// Directive values and rules gathered from the source, with the location
/// each one was declared at.
#[derive(Default)]
struct Collected {
    deletion: Option<usize>,
    alphabet: Option<Vec<Symbol>>,
    halt: Option<Symbol>,
    input: Option<Word>,
    budget: Option<u64>,
    directive_locations: BTreeMap<&'static str, SourceLocation>,
    rules: RuleTable,
    rule_locations: BTreeMap<Symbol, SourceLocation>,
}

impl Collected {
    fn from_lines(file_path: &str, lines: &[SourceLine]) -> Result<Self, LoadError> {
        let mut collected = Self::default();

        for line in lines {
            let parsed = parse_line(&line.text, line.original_line)
                .map_err(|e| LoadError::from_parse(file_path, e))?;
            let location = SourceLocation {
                line: line.original_line,
                column: indent_column(&line.text),
            };
            let duplicate = |kind: LoadErrorKind| {
                LoadError::new(kind).with_location(SourceLoc::new(
                    file_path,
                    location.line,
                    location.column,
                ))
            };

            match parsed {
                ParsedLine::Blank => {}
                ParsedLine::Directive(directive) => {
                    let keyword = directive.keyword();
                    if let Some(first) = collected.directive_locations.get(keyword) {
                        return Err(duplicate(LoadErrorKind::DuplicateDirective {
                            directive: keyword,
                            first_line: first.line,
                        }));
                    }
                    collected.directive_locations.insert(keyword, location);
                    collected.apply(directive);
                }
                ParsedLine::Rule { symbol, production } => {
                    if let Some(first) = collected.rule_locations.get(&symbol) {
                        return Err(duplicate(LoadErrorKind::DuplicateRule {
                            symbol,
                            first_line: first.line,
                        }));
                    }
                    collected.rule_locations.insert(symbol, location);
                    collected.rules.insert(symbol, production);
                }
            }
        }

        if collected.directive_locations.is_empty() && collected.rules.is_empty() {
            return Err(LoadError::new(LoadErrorKind::NoDefinition)
                .with_location(SourceLoc::new(file_path, 1, 1)));
        }

        Ok(collected)
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Deletion(count) => self.deletion = Some(count),
            Directive::Alphabet(symbols) => self.alphabet = Some(symbols),
            Directive::Halt(symbol) => self.halt = Some(symbol),
            Directive::Input(word) => self.input = Some(word),
            Directive::Budget(budget) => self.budget = Some(budget),
        }
    }

    /// Line an engine validation error should be reported at.
    fn locate(&self, error: DefinitionError) -> Option<SourceLocation> {
        let directive = |keyword: &str| self.directive_locations.get(keyword).copied();
        match error {
            DefinitionError::DeletionCountTooSmall { .. } => directive("deletion"),
            DefinitionError::EmptyAlphabet => directive("alphabet"),
            DefinitionError::HaltingSymbolNotInAlphabet { .. } => directive("halt"),
            DefinitionError::WordOutsideAlphabet { .. } => directive("input"),
            DefinitionError::MissingProduction { symbol } => {
                directive("alphabet").or_else(|| self.first_use_of(symbol))
            }
            DefinitionError::ProductionForUnknownSymbol { .. }
            | DefinitionError::SymbolOutsideAlphabet { .. } => error
                .rule()
                .and_then(|rule| self.rule_locations.get(&rule).copied()),
        }
    }

    /// Earliest rule whose production mentions `symbol`.
    fn first_use_of(&self, symbol: Symbol) -> Option<SourceLocation> {
        self.rules
            .iter()
            .filter(|(_, production)| production.iter().any(|s| s == symbol))
            .filter_map(|(rule, _)| self.rule_locations.get(&rule).copied())
            .min_by_key(|location| location.line)
    }
}

fn indent_column(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count() + 1
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tag_engine::HaltReason;

    use super::*;

    const COLLATZ: &str = "\
; De Mol's Collatz system
deletion 2
alphabet a b c H
halt H
input aaa
budget 500

a -> bc
b -> a
c -> aaa
";

    fn load_err(content: &str) -> LoadError {
        parse_definition(Path::new("sys.tag"), content).expect_err("definition should fail")
    }

    #[test]
    fn loads_plain_definition() {
        let definition =
            parse_definition(Path::new("collatz.tag"), COLLATZ).expect("collatz should load");

        assert_eq!(definition.system.deletion_count(), 2);
        assert_eq!(definition.system.halting_symbol(), Symbol::new('H'));
        assert_eq!(definition.system.alphabet().len(), 4);
        assert_eq!(
            definition.system.production(Symbol::new('c')),
            Some(&Word::from("aaa"))
        );
        assert_eq!(definition.input, Some(Word::from("aaa")));
        assert_eq!(definition.step_budget(), 500);
        assert_eq!(definition.file_path, "collatz.tag");
        assert!(definition.test_blocks.is_empty());

        let outcome = tag_engine::run(
            definition.input.as_ref().expect("input"),
            &definition.system,
            definition.step_budget(),
        )
        .expect("run");
        assert_eq!(outcome.steps(), 24);
        assert_eq!(outcome.halt_reason(), Some(HaltReason::ShorterThanDeletion));
    }

    #[test]
    fn loads_literate_definition_with_tests() {
        let content = "\
# Doubling

```tag
deletion 2
halt H
a -> H
```

Prose between blocks.

```tagtest
input aa
outcome == halted
```
";
        let definition =
            parse_definition(Path::new("double.tag.md"), content).expect("literate should load");

        assert_eq!(definition.test_blocks.len(), 1);
        assert_eq!(definition.test_blocks[0].start_line, 11);
        assert_eq!(definition.input, None);
        assert_eq!(definition.step_budget(), DEFAULT_STEP_BUDGET);
    }

    #[test]
    fn infers_alphabet_from_rules_and_halt() {
        let definition =
            parse_definition_str("deletion 2\nhalt H\na -> bH\nb -> \n").expect("inferred");

        let alphabet: String = definition
            .system
            .alphabet()
            .iter()
            .map(|s| s.as_char())
            .collect();
        assert_eq!(alphabet, "Hab");
        assert_eq!(definition.file_path, INLINE_SOURCE_NAME);
    }

    #[test]
    fn inferred_alphabet_reports_symbol_used_only_in_production() {
        let error = load_err("deletion 2\nhalt H\n  a -> bx\nb -> a\n");

        assert_eq!(
            error.kind,
            LoadErrorKind::Definition(DefinitionError::MissingProduction {
                symbol: Symbol::new('x')
            })
        );
        assert_eq!(error.location, Some(SourceLoc::new("sys.tag", 3, 3)));
    }

    #[rstest]
    #[case::deletion_too_small(
        "deletion 1\nhalt H\na -> H\n",
        DefinitionError::DeletionCountTooSmall { count: 1 },
        1
    )]
    #[case::halt_outside_alphabet(
        "deletion 2\nalphabet a\nhalt H\na -> a\n",
        DefinitionError::HaltingSymbolNotInAlphabet { symbol: Symbol::new('H') },
        3
    )]
    #[case::rule_for_foreign_symbol(
        "deletion 2\nalphabet aH\nhalt H\na -> H\nz -> a\n",
        DefinitionError::ProductionForUnknownSymbol { symbol: Symbol::new('z') },
        5
    )]
    #[case::production_outside_alphabet(
        "deletion 2\nalphabet aH\nhalt H\na -> ab\n",
        DefinitionError::SymbolOutsideAlphabet { rule: Symbol::new('a'), symbol: Symbol::new('b') },
        4
    )]
    #[case::missing_production(
        "deletion 2\nalphabet a b H\nhalt H\na -> b\n",
        DefinitionError::MissingProduction { symbol: Symbol::new('b') },
        2
    )]
    #[case::input_outside_alphabet(
        "deletion 2\nhalt H\ninput aq\na -> H\n",
        DefinitionError::WordOutsideAlphabet { symbol: Symbol::new('q'), position: 1 },
        3
    )]
    fn engine_errors_point_at_the_offending_line(
        #[case] content: &str,
        #[case] expected: DefinitionError,
        #[case] line: usize,
    ) {
        let error = load_err(content);

        assert_eq!(error.kind, LoadErrorKind::Definition(expected));
        assert_eq!(error.location.map(|loc| loc.line), Some(line));
    }

    #[test]
    fn duplicate_directive_cites_both_lines() {
        let error = load_err("deletion 2\nhalt H\na -> H\nhalt H\n");

        assert_eq!(
            error.kind,
            LoadErrorKind::DuplicateDirective {
                directive: "halt",
                first_line: 2,
            }
        );
        assert_eq!(error.location, Some(SourceLoc::new("sys.tag", 4, 1)));
    }

    #[test]
    fn duplicate_rule_cites_both_lines() {
        let error = load_err("deletion 2\nhalt H\na -> H\na -> aa\n");

        assert_eq!(
            error.format_for_stderr(),
            "sys.tag:4:1: error: duplicate production for 'a' (first given on line 3)"
        );
    }

    #[rstest]
    #[case::deletion("halt H\na -> H\n", "deletion")]
    #[case::halt("deletion 2\na -> a\n", "halt")]
    fn missing_required_directive(#[case] content: &str, #[case] directive: &str) {
        let error = load_err(content);

        assert!(matches!(
            error.kind,
            LoadErrorKind::MissingDirective { directive: d } if d == directive
        ));
    }

    #[test]
    fn parse_errors_keep_file_line_and_column() {
        let error = load_err("deletion 2\nhalt H\na -> H\n   budget lots\n");

        assert_eq!(
            error.format_for_stderr(),
            "sys.tag:4:11: error: 'lots' is not a valid budget value"
        );
    }

    #[test]
    fn empty_sources_have_no_definition() {
        let error = parse_definition(Path::new("notes.md"), "# Just prose\n").expect_err("empty");
        assert_eq!(error.kind, LoadErrorKind::NoDefinition);

        let error = load_err("; only comments\n\n");
        assert_eq!(error.kind, LoadErrorKind::NoDefinition);
    }

    #[test]
    fn load_definition_reads_from_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".tag")
            .tempfile()
            .expect("create temp file");
        file.write_all(COLLATZ.as_bytes()).expect("write definition");

        let definition = load_definition(file.path()).expect("load from disk");
        assert_eq!(definition.system.deletion_count(), 2);
    }

    #[test]
    fn load_definition_reports_io_errors() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("missing.tag");

        let error = load_definition(&missing).expect_err("missing file");

        assert!(matches!(error.kind, LoadErrorKind::Io(_)));
        assert!(error.location.is_none());
        assert!(error.format_for_stderr().starts_with("error: cannot read definition"));
    }
}
