//! Table-aware chunking: header-seeded accumulation with a relaxed budget
//! for comparison-critical tables.

use serde_json::json;

use crate::criticality;
use crate::line_format::is_header_like;
use crate::types::{Chunk, MetadataMap};

use super::{price, BlockContext, ChunkSpec};

/// Header detection looks at most this far into the block.
pub const MAX_HEADER_LINES: usize = 3;
/// Critical-but-not-price tables get this many times the size budget.
pub const CRITICAL_BUDGET_MULTIPLIER: usize = 3;
/// A critical table chunk may not close before accumulating this many rows.
pub const CRITICAL_MIN_ROWS: usize = 10;

pub(crate) fn chunk_table(ctx: &BlockContext) -> Vec<Chunk> {
    let lines = &ctx.block.lines;
    let mut header_count = lines
        .iter()
        .take(MAX_HEADER_LINES)
        .take_while(|l| is_header_like(l.as_str()))
        .count();
    if header_count == 0 {
        header_count = 1;
    }
    let (header_lines, data_lines) = lines.split_at(header_count.min(lines.len()));

    let verdict = criticality::assess_table(header_lines, data_lines);
    if verdict.is_price_table {
        return price::chunk_price_table(ctx, header_lines, data_lines);
    }

    let budget = if verdict.is_critical {
        ctx.config.chunk_size * CRITICAL_BUDGET_MULTIPLIER
    } else {
        ctx.config.chunk_size
    };
    let header_text = header_lines.join("\n");

    let mut chunks = Vec::new();
    let mut current = header_text.clone();
    let mut rows = 0usize;
    let mut seq = 0usize;
    for line in data_lines {
        let would_exceed = current.len() + 1 + line.len() > budget;
        let can_close = rows > 0 && !(verdict.is_critical && rows < CRITICAL_MIN_ROWS);
        if would_exceed && can_close {
            chunks.push(table_chunk(ctx, &current, seq, rows, verdict.is_critical));
            seq += 1;
            current = header_text.clone();
            rows = 0;
        }
        current.push('\n');
        current.push_str(line);
        rows += 1;
    }
    if rows > 0 || chunks.is_empty() {
        chunks.push(table_chunk(ctx, &current, seq, rows, verdict.is_critical));
    }
    chunks
}

fn table_chunk(
    ctx: &BlockContext,
    content: &str,
    seq: usize,
    rows: usize,
    is_critical: bool,
) -> Chunk {
    super::finish_chunk(
        ctx,
        ChunkSpec {
            content: content.to_string(),
            seq,
            suffix: None,
            offset: seq,
            extra: MetadataMap::from([
                ("strategy".to_string(), json!("table")),
                ("hasHeaders".to_string(), json!(true)),
                ("isComparisonCritical".to_string(), json!(is_critical)),
                ("isPriceTable".to_string(), json!(false)),
                ("dataRowCount".to_string(), json!(rows)),
            ]),
        },
    )
}
