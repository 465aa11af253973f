//! Source ingestion for plain and literate definition formats.
//!
//! This module extracts definition text from two formats:
//! - **Literate** (`.md`, e.g. `collatz.tag.md`): Markdown files where fenced
//!   code blocks tagged `tag` hold definition lines and blocks tagged
//!   `tagtest` hold inline tests. Everything else is prose.
//! - **Plain** (`.tag` or other): the entire file is definition text.
//!
//! Lines keep their original file line numbers for error reporting.

use std::path::Path;

/// Fence info string marking definition blocks.
pub const DEFINITION_FENCE_TAG: &str = "tag";
/// Fence info string marking inline test blocks.
pub const TEST_FENCE_TAG: &str = "tagtest";

/// A line of extracted source with its original location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// The source text (without trailing newline).
    pub text: String,
    /// 1-indexed line number in the original file.
    pub original_line: usize,
}

/// Raw contents of a `tagtest` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBlock {
    /// Block text between the fences.
    pub content: String,
    /// 1-indexed line of the opening fence.
    pub start_line: usize,
    /// 1-indexed line of the closing fence (last line for unterminated blocks).
    pub end_line: usize,
}

/// Extracted source content from an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContent {
    /// Definition lines in document order.
    pub lines: Vec<SourceLine>,
    /// Inline test blocks in document order.
    pub test_blocks: Vec<TestBlock>,
    /// The file path (for error reporting).
    pub file_path: String,
}

/// Extracts definition source from a file.
///
/// For Markdown files, extracts fenced `tag` and `tagtest` blocks.
/// For all other files, treats the entire content as definition text.
#[must_use]
pub fn extract_source(file_path: &Path, content: &str) -> SourceContent {
    let file_path = file_path.to_string_lossy().to_string();

    if is_literate_file(Path::new(&file_path)) {
        let (lines, test_blocks) = extract_literate_source(content);
        SourceContent {
            lines,
            test_blocks,
            file_path,
        }
    } else {
        SourceContent {
            lines: extract_plain_source(content),
            test_blocks: Vec::new(),
            file_path,
        }
    }
}

/// Returns true if the file should be treated as literate (Markdown) format.
fn is_literate_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Each line keeps its original line number.
pub(crate) fn extract_plain_source(content: &str) -> Vec<SourceLine> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| SourceLine {
            text: line.to_string(),
            original_line: idx + 1,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Definition,
    Test,
}

struct OpenBlock {
    kind: BlockKind,
    fence_len: usize,
    start_line: usize,
    content: Vec<String>,
}

/// Scans fenced blocks and splits them into definition lines and test blocks.
fn extract_literate_source(content: &str) -> (Vec<SourceLine>, Vec<TestBlock>) {
    let mut lines = Vec::new();
    let mut test_blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;
    // Non-tag fenced blocks are skipped but still have to be tracked so their
    // contents are never mistaken for fences of ours.
    let mut foreign_fence: Option<usize> = None;
    let mut last_line = 0;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        last_line = line_num;
        let fence = fence_length(line);

        if let Some(len) = foreign_fence {
            if fence.is_some_and(|f| f >= len) {
                foreign_fence = None;
            }
            continue;
        }

        if let Some(block) = open.as_mut() {
            let closes = fence.is_some_and(|len| len >= block.fence_len);
            if !closes {
                if block.kind == BlockKind::Definition {
                    lines.push(SourceLine {
                        text: line.to_string(),
                        original_line: line_num,
                    });
                }
                block.content.push(line.to_string());
            } else if let Some(block) = open.take() {
                close_block(block, line_num, &mut test_blocks);
            }
            continue;
        }

        let Some(len) = fence else {
            continue;
        };
        let info = line.trim_start()[len..].split_whitespace().next();
        let kind = match info {
            Some(DEFINITION_FENCE_TAG) => Some(BlockKind::Definition),
            Some(TEST_FENCE_TAG) => Some(BlockKind::Test),
            _ => None,
        };
        match kind {
            Some(kind) => {
                open = Some(OpenBlock {
                    kind,
                    fence_len: len,
                    start_line: line_num,
                    content: Vec::new(),
                });
            }
            None => foreign_fence = Some(len),
        }
    }

    if let Some(block) = open {
        close_block(block, last_line, &mut test_blocks);
    }

    (lines, test_blocks)
}

fn close_block(block: OpenBlock, end_line: usize, test_blocks: &mut Vec<TestBlock>) {
    if block.kind == BlockKind::Test {
        test_blocks.push(TestBlock {
            content: block.content.join("\n"),
            start_line: block.start_line,
            end_line,
        });
    }
}

/// Returns the number of backticks if this is a fence (>= 3 backticks).
fn fence_length(line: &str) -> Option<usize> {
    let count = line.trim_start().chars().take_while(|&c| c == '`').count();
    (count >= 3).then_some(count)
}
