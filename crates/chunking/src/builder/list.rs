//! List-aware chunking: prose preceding the first item becomes a context
//! prefix repeated at the top of every chunk.

use serde_json::json;

use crate::line_format::is_list_item;
use crate::types::{Chunk, MetadataMap};

use super::{BlockContext, ChunkSpec};

pub(crate) fn chunk_list(ctx: &BlockContext) -> Vec<Chunk> {
    let lines = &ctx.block.lines;
    let first_item = lines
        .iter()
        .position(|l| is_list_item(l.as_str()))
        .unwrap_or(0);
    let (context_lines, rest) = lines.split_at(first_item);
    let prefix = context_lines.join("\n");

    let mut chunks = Vec::new();
    let mut current = prefix.clone();
    let mut items = 0usize;
    let mut seq = 0usize;

    for line in rest {
        let appended_len = if current.is_empty() {
            line.len()
        } else {
            current.len() + 1 + line.len()
        };
        // Only close once at least one item landed in the open chunk, so a
        // single oversized item never yields a context-only chunk.
        if appended_len > ctx.config.chunk_size && items >= 1 {
            chunks.push(list_chunk(ctx, &current, seq, items, !prefix.is_empty()));
            seq += 1;
            current = prefix.clone();
            items = 0;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
        if is_list_item(line) {
            items += 1;
        }
    }
    if items > 0 || current != prefix || chunks.is_empty() {
        chunks.push(list_chunk(ctx, &current, seq, items, !prefix.is_empty()));
    }
    chunks
}

fn list_chunk(
    ctx: &BlockContext,
    content: &str,
    seq: usize,
    items: usize,
    has_context: bool,
) -> Chunk {
    super::finish_chunk(
        ctx,
        ChunkSpec {
            content: content.to_string(),
            seq,
            suffix: None,
            offset: seq,
            extra: MetadataMap::from([
                ("strategy".to_string(), json!("list")),
                ("itemCount".to_string(), json!(items)),
                ("hasContext".to_string(), json!(has_context)),
            ]),
        },
    )
}
