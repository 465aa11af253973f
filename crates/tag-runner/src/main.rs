//! CLI entry point for the `tagrun` binary.

use std::env;
use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tag_engine::{run, RunOutcome, Word};
use tag_runner::definition::{load_definition, Definition};
use tag_runner::logging::init_logging;
use tag_runner::test_format::parse_test_block;
use tag_runner::test_runner::run_tests;
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing::debug;
use tracing_subscriber as _;

const USAGE_TEXT: &str = "\
Usage: tagrun <command> <definition> [options]

Commands:
  run   <definition> [-i <word>] [-b <n>] [-q]  Run the system and print its trace
  check <definition>                           Validate the definition
  test  <definition>                           Run inline tagtest blocks

Options:
  -i, --input <word>   Initial word (default: the definition's 'input')
  -b, --budget <n>     Step budget (default: the definition's 'budget', then 10000)
  -q, --quiet          Print only the final word (run only)
  -v, --verbose        Debug logging on stderr (otherwise TAGRUN_LOG, default 'warn')
  -h, --help           Show this help message

Exit codes:
  0  halted, definition valid, or all tests passed
  1  invalid definition, usage error, or failing tests
  2  step budget exceeded before a halting word appeared

Examples:
  tagrun run collatz.tag -i aaa
  tagrun check collatz.tag.md
  tagrun test collatz.tag.md
";

/// Exit code for a run that used up its budget.
const EXIT_BUDGET_EXCEEDED: i32 = 2;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Check(CommonArgs),
    Test(CommonArgs),
}

impl Command {
    const fn verbose(&self) -> bool {
        match self {
            Self::Run(args) => args.common.verbose,
            Self::Check(args) | Self::Test(args) => args.verbose,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct CommonArgs {
    definition: PathBuf,
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    common: CommonArgs,
    input: Option<String>,
    budget: Option<u64>,
    quiet: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "check" => parse_common_args(args)
            .map(Command::Check)
            .map(ParseResult::Command),
        "test" => parse_common_args(args)
            .map(Command::Test)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut definition: Option<PathBuf> = None;
    let mut input: Option<String> = None;
    let mut budget: Option<u64> = None;
    let mut quiet = false;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--quiet" || arg == "-q" {
            quiet = true;
            continue;
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "-i" || arg == "--input" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -i".to_string())?;
            input = Some(value.to_string_lossy().to_string());
            continue;
        }

        if arg == "-b" || arg == "--budget" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -b".to_string())?;
            let text = value.to_string_lossy();
            let parsed = text
                .replace('_', "")
                .parse()
                .map_err(|_| format!("invalid budget: {text}"))?;
            budget = Some(parsed);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if definition.is_some() {
            return Err("multiple definition paths provided".to_string());
        }
        definition = Some(PathBuf::from(arg));
    }

    let definition = definition.ok_or_else(|| "missing definition path".to_string())?;
    Ok(RunArgs {
        common: CommonArgs {
            definition,
            verbose,
        },
        input,
        budget,
        quiet,
    })
}

fn parse_common_args(args: impl Iterator<Item = OsString>) -> Result<CommonArgs, String> {
    let mut definition: Option<PathBuf> = None;
    let mut verbose = false;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if definition.is_some() {
            return Err("multiple definition paths provided".to_string());
        }
        definition = Some(PathBuf::from(arg));
    }

    let definition = definition.ok_or_else(|| "missing definition path".to_string())?;
    Ok(CommonArgs {
        definition,
        verbose,
    })
}

fn load(args: &CommonArgs) -> Result<Definition, i32> {
    load_definition(&args.definition).map_err(|e| {
        eprintln!("{}", e.format_for_stderr());
        1
    })
}

fn run_run(args: &RunArgs) -> Result<(), i32> {
    let definition = load(&args.common)?;

    let Some(initial) = args
        .input
        .as_deref()
        .map(Word::from)
        .or_else(|| definition.input.clone())
    else {
        eprintln!(
            "error: no initial word: pass -i <word> or add an 'input' directive to {}",
            definition.file_path
        );
        return Err(1);
    };
    let budget = args.budget.unwrap_or_else(|| definition.step_budget());

    debug!(initial = %initial, budget, "starting run");
    let outcome = run(&initial, &definition.system, budget).map_err(|e| {
        eprintln!("error: input word rejected: {e}");
        1
    })?;

    if let Err(e) = print_trace(&outcome, args.quiet) {
        eprintln!("error: failed to write trace: {e}");
        return Err(1);
    }

    match &outcome {
        RunOutcome::Halted { reason, .. } => {
            eprintln!(
                "halted after {} step(s): {reason} ({})",
                outcome.steps(),
                reason.label()
            );
            Ok(())
        }
        RunOutcome::BudgetExceeded { steps, .. } => {
            eprintln!("budget exceeded after {steps} step(s) without reaching a halting word");
            Err(EXIT_BUDGET_EXCEEDED)
        }
    }
}

fn print_trace(outcome: &RunOutcome, quiet: bool) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    if quiet {
        writeln!(out, "{}", outcome.final_word())?;
    } else {
        for word in outcome.trace() {
            writeln!(out, "{word}")?;
        }
    }
    out.flush()
}

fn run_check(args: &CommonArgs) -> Result<(), i32> {
    let definition = load(args)?;
    let system = &definition.system;

    println!(
        "{}: ok (deletion {}, {} symbols, {} rules, {} test blocks)",
        definition.file_path,
        system.deletion_count(),
        system.alphabet().len(),
        system.productions().len(),
        definition.test_blocks.len()
    );
    Ok(())
}

fn run_test(args: &CommonArgs) -> Result<(), i32> {
    let definition = load(args)?;

    if definition.test_blocks.is_empty() {
        println!("No test blocks found in {}", definition.file_path);
        return Ok(());
    }

    let parsed_blocks: Vec<_> = definition
        .test_blocks
        .iter()
        .filter_map(|block| {
            parse_test_block(&block.content, block.start_line, block.end_line)
                .map_err(|e| {
                    eprintln!(
                        "{}:{}: error: invalid test block: {e}",
                        definition.file_path, block.start_line
                    );
                })
                .ok()
        })
        .collect();

    if parsed_blocks.len() != definition.test_blocks.len() {
        return Err(1);
    }

    let test_result = run_tests(&definition, &parsed_blocks);

    for block_result in &test_result.block_results {
        println!("{block_result}");

        if !block_result.passed() {
            for ar in &block_result.assertion_results {
                if !ar.passed {
                    println!("  {ar}");
                }
            }
        }
    }

    let summary = test_result.summary();
    println!();
    println!("Test Summary: {summary} (total: {})", summary.total);

    if test_result.all_passed() {
        Ok(())
    } else {
        Err(1)
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(command)) => {
            if let Err(e) = init_logging(command.verbose()) {
                eprintln!("warning: logging disabled: {e}");
            }
            let result = match command {
                Command::Run(args) => run_run(&args),
                Command::Check(args) => run_check(&args),
                Command::Test(args) => run_test(&args),
            };
            result.err().unwrap_or(0)
        }
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
