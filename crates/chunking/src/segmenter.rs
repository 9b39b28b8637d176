//! Splits a document's lines into ordered, contiguous semantic blocks.
//!
//! Boundary detection is an ordered list of named rules evaluated
//! first-match-wins; the ordering encodes real precedence (table
//! continuity outranks section markers).

use crate::classifier;
use crate::line_format::{analyze_line, is_header_like};
use crate::patterns;
use crate::types::{BlockType, SemanticBlock};

/// Column counts may drift this much between consecutive rows of the same
/// table (empirically tuned default).
pub const COLUMN_DRIFT_TOLERANCE: usize = 2;

struct BoundaryContext<'a> {
    line: &'a str,
    /// Last content line before any blanks.
    prev: Option<&'a str>,
    /// Whitespace-only lines seen since the previous content line.
    blank_run: usize,
    block_lines: &'a [String],
}

/// `Some(true)` forces a boundary, `Some(false)` pins the line to the
/// current block, `None` defers to the next rule.
struct BoundaryRule {
    name: &'static str,
    eval: fn(&BoundaryContext) -> Option<bool>,
}

const BOUNDARY_RULES: &[BoundaryRule] = &[
    BoundaryRule {
        name: "blank-run",
        eval: blank_run_rule,
    },
    BoundaryRule {
        name: "table-continuity",
        eval: table_continuity_rule,
    },
    BoundaryRule {
        name: "section-marker",
        eval: section_marker_rule,
    },
    BoundaryRule {
        name: "header-transition",
        eval: header_transition_rule,
    },
];

/// Two consecutive blank lines always split.
fn blank_run_rule(ctx: &BoundaryContext) -> Option<bool> {
    (ctx.blank_run >= 2).then_some(true)
}

/// Rows that keep the same column shape stay together, both header→data
/// and data→data.
fn table_continuity_rule(ctx: &BoundaryContext) -> Option<bool> {
    let prev = analyze_line(ctx.prev?);
    let current = analyze_line(ctx.line);
    (prev.has_separator
        && current.has_separator
        && prev.column_count > 1
        && current.column_count > 1
        && prev.column_count.abs_diff(current.column_count) <= COLUMN_DRIFT_TOLERANCE)
        .then_some(false)
}

/// Horizontal rules, markdown headings and lone `[bracketed]` tokens force
/// a boundary, unless the accumulating block reads as a table and the
/// marker is not header-like (table continuity wins).
fn section_marker_rule(ctx: &BoundaryContext) -> Option<bool> {
    if !is_section_marker(ctx.line) {
        return None;
    }
    if classifier::classify_lines(ctx.block_lines) == BlockType::Table && !is_header_like(ctx.line)
    {
        return Some(false);
    }
    Some(true)
}

/// A header after non-header content starts a new section.
fn header_transition_rule(ctx: &BoundaryContext) -> Option<bool> {
    (is_header_like(ctx.line) && ctx.prev.is_some_and(|p| !is_header_like(p))).then_some(true)
}

pub(crate) fn is_section_marker(line: &str) -> bool {
    patterns::section_rule().is_match(line)
        || patterns::markdown_heading().is_match(line)
        || patterns::bracketed_token().is_match(line)
}

fn boundary_decision(ctx: &BoundaryContext) -> bool {
    for rule in BOUNDARY_RULES {
        if let Some(split) = (rule.eval)(ctx) {
            tracing::trace!(rule = rule.name, split, "boundary rule matched");
            return split;
        }
    }
    false
}

/// Segment raw document lines into classified blocks. Blank lines belong
/// to no block; blocks carry inclusive original line indices.
pub fn segment_blocks(lines: &[&str]) -> Vec<SemanticBlock> {
    let mut blocks = Vec::new();
    let mut acc: Vec<String> = Vec::new();
    let mut start = 0usize;
    let mut end = 0usize;
    let mut prev: Option<&str> = None;
    let mut blank_run = 0usize;

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        let split = !acc.is_empty()
            && boundary_decision(&BoundaryContext {
                line,
                prev,
                blank_run,
                block_lines: &acc,
            });
        if split {
            flush(&mut blocks, &mut acc, start, end);
        }
        if acc.is_empty() {
            start = i;
        }
        acc.push(line.to_string());
        end = i;
        prev = Some(line);
        blank_run = 0;
    }
    flush(&mut blocks, &mut acc, start, end);
    blocks
}

fn flush(blocks: &mut Vec<SemanticBlock>, acc: &mut Vec<String>, start: usize, end: usize) {
    if acc.is_empty() {
        return;
    }
    let lines = std::mem::take(acc);
    blocks.push(classifier::classify_block(lines, start, end));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Vec<SemanticBlock> {
        let lines: Vec<&str> = text.lines().collect();
        segment_blocks(&lines)
    }

    #[test]
    fn double_blank_line_splits_blocks() {
        let text = "First paragraph line one.\nFirst paragraph line two.\n\n\nSecond paragraph starts here.";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(blocks[1].lines.len(), 1);
    }

    #[test]
    fn single_blank_line_does_not_split() {
        let text = "line one continues the thought.\n\nline two still belongs here.";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn table_rows_stay_together_across_markers() {
        let text = "ID\tName\tPrice\nA1\tbolt\t$1.00\nA2\tnut\t$2.00\n---\nA3\twasher\t$3.00";
        let blocks = segment(text);
        // The rule line is not header-like and the block reads as a table,
        // so continuity wins and everything stays in one block.
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Table);
        assert_eq!(blocks[0].lines.len(), 5);
    }

    #[test]
    fn section_marker_splits_prose() {
        let text = "Some prose before the break here.\n---\nAnd a fresh section after it.";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].lines[0], "---");
    }

    #[test]
    fn markdown_heading_splits() {
        let text = "intro prose sits on top.\n## Pricing\ntable talk follows the heading.";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].lines[0], "## Pricing");
    }

    #[test]
    fn bracketed_token_splits() {
        let text = "prose above the marker line.\n[Configuration]\nkey: value";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].lines[0], "[Configuration]");
    }

    #[test]
    fn header_after_prose_starts_new_block() {
        let text = "a sentence of ordinary prose.\nSection Overview\nmore prose under the header.";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].lines[0], "Section Overview");
    }

    #[test]
    fn header_to_data_transition_stays_in_table() {
        let text = "ID\tUnidad\tPrecio\nA1\tpieza\t$10.00\nA2\tcaja\t$20.00";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Table);
    }

    #[test]
    fn column_drift_within_tolerance_continues_block() {
        let text = "a\tb\tc\td\ne\tf\tg\nh\ti\tj\tk\tl";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn indices_are_inclusive_original_positions() {
        let text = "block one line.\n\n\nblock two line one.\nblock two line two.";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].start_index, blocks[0].end_index), (0, 0));
        assert_eq!((blocks[1].start_index, blocks[1].end_index), (3, 4));
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\n  \n").is_empty());
    }
}
