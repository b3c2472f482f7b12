//! Code span detection, so wikilinks and anchors inside code stay literal.

use regex::Regex;
use std::sync::LazyLock;

/// A byte range covered by a fenced block or an inline code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Fenced block (vs inline code).
    pub is_fenced: bool,
}

impl CodeRange {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && end > self.start
    }
}

// ``` or ~~~ at start of line
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}(`{3,}|~{3,})").unwrap());

static INLINE_CODE_DOUBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"``(?:[^`]|`[^`])*``").unwrap());

static INLINE_CODE_SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// Find all fenced blocks and inline code spans in `content`, sorted by start.
///
/// An unterminated fence runs to the end of the content, as in CommonMark.
pub fn find_code_ranges(content: &str) -> Vec<CodeRange> {
    let mut ranges = Vec::new();
    let mut pos = 0;

    while let Some(cap) = FENCE_OPEN.captures(&content[pos..]) {
        let fence = cap.get(1).map(|m| m.as_str()).unwrap_or("```");
        let open_start = pos + cap.get(0).map(|m| m.start()).unwrap_or(0);
        let body_start = line_end(content, open_start);
        let close = find_closing_fence(content, body_start, fence);
        let end = close.unwrap_or(content.len());

        ranges.push(CodeRange {
            start: open_start,
            end,
            is_fenced: true,
        });

        if end >= content.len() {
            break;
        }
        pos = end;
    }

    for re in [&*INLINE_CODE_DOUBLE, &*INLINE_CODE_SINGLE] {
        for m in re.find_iter(content) {
            if ranges.iter().any(|r| r.overlaps(m.start(), m.end())) {
                continue;
            }
            ranges.push(CodeRange {
                start: m.start(),
                end: m.end(),
                is_fenced: false,
            });
        }
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Offset just past the newline ending the line that contains `from`.
fn line_end(content: &str, from: usize) -> usize {
    content[from..]
        .find('\n')
        .map(|i| from + i + 1)
        .unwrap_or(content.len())
}

/// Find the end offset of the line closing a fence opened with `fence`.
fn find_closing_fence(content: &str, from: usize, fence: &str) -> Option<usize> {
    let fence_char = fence.chars().next()?;
    let mut line_start = from;

    while line_start < content.len() {
        let next = line_end(content, line_start);
        let line = content[line_start..next].trim();
        if line.len() >= fence.len() && line.chars().all(|c| c == fence_char) {
            return Some(next);
        }
        line_start = next;
    }

    None
}

/// Check whether a byte offset falls inside any code range.
pub fn is_in_code(offset: usize, ranges: &[CodeRange]) -> bool {
    ranges.iter().any(|r| offset >= r.start && offset < r.end)
}
