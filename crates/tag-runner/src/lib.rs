//! Definition files, inline tests and the `tagrun` command line for the tag
//! system engine.

/// Definition loading and validation.
pub mod definition;
/// Structured load error types.
pub mod errors;
/// Log subscriber setup.
pub mod logging;
/// Line parser for directives and production rules.
pub mod parser;
/// Source loading and literate Markdown extraction.
pub mod source;
/// Inline test block syntax.
pub mod test_format;
/// Inline test execution.
pub mod test_runner;
