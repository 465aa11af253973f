//! Definition line parser for directives and production rules.
//!
//! Each source line is one of:
//! - blank or comment-only (`;` starts a comment);
//! - a directive: `deletion N`, `alphabet SYMBOLS...`, `halt S`,
//!   `input WORD`, `budget N`;
//! - a production rule: `S -> WORD` (an empty right-hand side is the empty
//!   production).

use tag_engine::{Symbol, Word};
use thiserror::Error;

/// Comment delimiter; everything after it on a line is ignored.
pub const COMMENT_CHAR: char = ';';
/// Separator between a rule's symbol and its production.
pub const RULE_ARROW: &str = "->";

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `deletion N` - symbols removed per step.
    Deletion(usize),
    /// `alphabet ...` - every character of every operand is a symbol.
    Alphabet(Vec<Symbol>),
    /// `halt S` - the halting symbol.
    Halt(Symbol),
    /// `input WORD` - default initial word.
    Input(Word),
    /// `budget N` - default step budget.
    Budget(u64),
}

impl Directive {
    /// Keyword that introduces this directive.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Deletion(_) => "deletion",
            Self::Alphabet(_) => "alphabet",
            Self::Halt(_) => "halt",
            Self::Input(_) => "input",
            Self::Budget(_) => "budget",
        }
    }
}

/// A single parsed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or comment-only line.
    Blank,
    /// Directive line.
    Directive(Directive),
    /// Production rule line.
    Rule {
        /// Leading symbol selecting the production.
        symbol: Symbol,
        /// Appended word.
        production: Word,
    },
}

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

/// Parse error with source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{}: {kind}", .location.line, .location.column)]
pub struct ParseError {
    /// Location of the error.
    pub location: SourceLocation,
    /// Kind of parse error.
    pub kind: ParseErrorKind,
}

/// Classification of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// First token is neither a directive keyword nor part of a rule.
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
    /// Directive given without its operand.
    #[error("'{directive}' needs an operand")]
    MissingOperand {
        /// Directive keyword.
        directive: &'static str,
    },
    /// Directive given more operands than it takes.
    #[error("unexpected operand '{text}' after '{directive}'")]
    UnexpectedOperand {
        /// Directive keyword.
        directive: &'static str,
        /// The extra operand.
        text: String,
    },
    /// Numeric operand did not parse.
    #[error("'{text}' is not a valid {directive} value")]
    InvalidNumber {
        /// Directive keyword.
        directive: &'static str,
        /// The rejected operand.
        text: String,
    },
    /// A symbol position held something other than exactly one character.
    #[error("'{text}' is not a single symbol")]
    InvalidSymbol {
        /// The rejected text.
        text: String,
    },
}

/// A whitespace-separated token with its 1-indexed column.
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    column: usize,
}

/// Parses one source line.
///
/// # Errors
///
/// Returns a [`ParseError`] located at the offending token.
pub fn parse_line(text: &str, line: usize) -> Result<ParsedLine, ParseError> {
    let code = strip_comment(text);
    let error = |column: usize, kind: ParseErrorKind| ParseError {
        location: SourceLocation { line, column },
        kind,
    };

    if let Some(arrow) = code.find(RULE_ARROW) {
        return parse_rule(code, arrow).map_err(|(column, kind)| error(column, kind));
    }

    let tokens = tokenize(code);
    let Some((keyword, operands)) = tokens.split_first() else {
        return Ok(ParsedLine::Blank);
    };

    let directive = match keyword.text {
        "deletion" => single_operand("deletion", keyword, operands)
            .and_then(|token| parse_number("deletion", token))
            .map(Directive::Deletion),
        "budget" => single_operand("budget", keyword, operands)
            .and_then(|token| parse_number("budget", token))
            .map(Directive::Budget),
        "halt" => single_operand("halt", keyword, operands)
            .and_then(parse_symbol)
            .map(Directive::Halt),
        "alphabet" => {
            if operands.is_empty() {
                Err((
                    keyword.column,
                    ParseErrorKind::MissingOperand {
                        directive: "alphabet",
                    },
                ))
            } else {
                Ok(Directive::Alphabet(
                    operands
                        .iter()
                        .flat_map(|token| token.text.chars())
                        .map(Symbol::new)
                        .collect(),
                ))
            }
        }
        "input" => Ok(Directive::Input(
            operands
                .iter()
                .flat_map(|token| token.text.chars())
                .map(Symbol::new)
                .collect(),
        )),
        other => Err((
            keyword.column,
            ParseErrorKind::UnknownDirective(other.to_string()),
        )),
    };

    directive
        .map(ParsedLine::Directive)
        .map_err(|(column, kind)| error(column, kind))
}

fn strip_comment(text: &str) -> &str {
    text.find(COMMENT_CHAR).map_or(text, |idx| &text[..idx])
}

fn tokenize(code: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in code.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(begin)) => {
                tokens.push(token_at(code, begin, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(begin) = start {
        tokens.push(token_at(code, begin, code.len()));
    }

    tokens
}

fn token_at(code: &str, begin: usize, end: usize) -> Token<'_> {
    Token {
        text: &code[begin..end],
        column: column_of(code, begin),
    }
}

fn column_of(code: &str, byte_offset: usize) -> usize {
    code[..byte_offset].chars().count() + 1
}

type LineResult<T> = Result<T, (usize, ParseErrorKind)>;

fn parse_rule(code: &str, arrow: usize) -> LineResult<ParsedLine> {
    let lhs = tokenize(&code[..arrow]);
    let symbol = match lhs.as_slice() {
        [token] => parse_symbol(*token)?,
        [] => {
            return Err((
                column_of(code, arrow),
                ParseErrorKind::InvalidSymbol {
                    text: String::new(),
                },
            ))
        }
        [first, ..] => {
            return Err((
                first.column,
                ParseErrorKind::InvalidSymbol {
                    text: code[..arrow].trim().to_string(),
                },
            ));
        }
    };

    let production = Word::from(&code[arrow + RULE_ARROW.len()..]);
    Ok(ParsedLine::Rule { symbol, production })
}

fn single_operand<'a>(
    directive: &'static str,
    keyword: &Token<'a>,
    operands: &[Token<'a>],
) -> LineResult<Token<'a>> {
    match operands {
        [] => Err((keyword.column, ParseErrorKind::MissingOperand { directive })),
        [operand] => Ok(*operand),
        [_, extra, ..] => Err((
            extra.column,
            ParseErrorKind::UnexpectedOperand {
                directive,
                text: extra.text.to_string(),
            },
        )),
    }
}

fn parse_number<T: std::str::FromStr>(directive: &'static str, token: Token<'_>) -> LineResult<T> {
    token.text.replace('_', "").parse().map_err(|_| {
        (
            token.column,
            ParseErrorKind::InvalidNumber {
                directive,
                text: token.text.to_string(),
            },
        )
    })
}

fn parse_symbol(token: Token<'_>) -> LineResult<Symbol> {
    let mut chars = token.text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Symbol::new(ch)),
        _ => Err((
            token.column,
            ParseErrorKind::InvalidSymbol {
                text: token.text.to_string(),
            },
        )),
    }
}
