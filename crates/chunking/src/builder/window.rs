//! Overlapping-window chunking for prose and anything without exploitable
//! structure.

use serde_json::json;

use crate::types::{Chunk, MetadataMap};

use super::{BlockContext, ChunkSpec};

/// A window end is only pulled back to a space if that shrinks it by at
/// most this fraction.
pub const WORD_PULLBACK_MAX: f64 = 0.2;

pub(crate) fn chunk_windows(ctx: &BlockContext) -> Vec<Chunk> {
    let text = ctx.block.text();
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let size = ctx.config.chunk_size.max(1);
    let overlap = ctx.config.chunk_overlap;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut prev_end = 0usize;
    let mut seq = 0usize;

    loop {
        let mut end = (start + size).min(total);
        if end < total && !chars[end].is_whitespace() && !chars[end - 1].is_whitespace() {
            // Mid-word cut: pull back to the nearest preceding space when
            // cheap enough, otherwise accept it.
            if let Some(space) = (start + 1..end).rev().find(|&i| chars[i].is_whitespace()) {
                let shrink = end - space;
                if shrink as f64 <= WORD_PULLBACK_MAX * (end - start) as f64 {
                    end = space;
                }
            }
        }

        let content: String = chars[start..end].iter().collect();
        let content = content.trim();
        if !content.is_empty() {
            chunks.push(super::finish_chunk(
                ctx,
                ChunkSpec {
                    content: content.to_string(),
                    seq,
                    suffix: None,
                    offset: seq,
                    extra: MetadataMap::from([
                        ("strategy".to_string(), json!("window")),
                        ("hasOverlap".to_string(), json!(seq > 0 && start < prev_end)),
                    ]),
                },
            ));
            seq += 1;
        }

        if end >= total {
            break;
        }
        prev_end = end;
        // Clamped so the next window always advances, even when the
        // overlap is at least the window size.
        start = end.saturating_sub(overlap).max(start + 1);
    }
    chunks
}
