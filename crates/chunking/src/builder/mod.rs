//! Strategy-dispatched chunk construction.
//!
//! Each block is chunked independently (rayon fan-out); the flattened
//! list is re-sorted by position so intra-block order is preserved no
//! matter which worker finished first.

mod list;
mod price;
mod table;
mod window;

use rayon::prelude::*;
use serde_json::json;

use chunkmill_core::{ChunkingConfig, DocumentRef};

use crate::types::{BlockType, Chunk, MetadataMap, SemanticBlock};

/// Positions advance by this much per block; intra-block offsets stay
/// well below it.
pub const BLOCK_POSITION_STRIDE: usize = 10_000;
/// Wider stride separating the price-table chunk families within a block.
pub(crate) const PRICE_FAMILY_STRIDE: usize = 1_000;
/// Words-to-tokens fudge factor for the token estimate.
pub const TOKENS_PER_WORD: f64 = 1.33;

pub(crate) struct BlockContext<'a> {
    pub doc: &'a DocumentRef,
    pub block: &'a SemanticBlock,
    pub block_index: usize,
    pub config: &'a ChunkingConfig,
}

/// Build every chunk for the document, ordered by position.
pub fn build_chunks(
    blocks: &[SemanticBlock],
    doc: &DocumentRef,
    config: &ChunkingConfig,
) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = blocks
        .par_iter()
        .enumerate()
        .flat_map_iter(|(block_index, block)| {
            build_block(&BlockContext {
                doc,
                block,
                block_index,
                config,
            })
        })
        .collect();
    chunks.sort_by(|a, b| a.position.cmp(&b.position));
    chunks
}

fn build_block(ctx: &BlockContext) -> Vec<Chunk> {
    let text = ctx.block.text();
    if text.trim().is_empty() {
        tracing::warn!(block = ctx.block_index, "skipping block with no content");
        return Vec::new();
    }
    if text.len() <= ctx.config.chunk_size {
        let chunk = finish_chunk(
            ctx,
            ChunkSpec {
                content: text,
                seq: 0,
                suffix: None,
                offset: 0,
                extra: MetadataMap::from([
                    ("strategy".to_string(), json!("complete")),
                    ("isCompleteBlock".to_string(), json!(true)),
                ]),
            },
        );
        return vec![chunk];
    }
    match ctx.block.block_type {
        BlockType::Table | BlockType::Structured => table::chunk_table(ctx),
        BlockType::List => list::chunk_list(ctx),
        _ => window::chunk_windows(ctx),
    }
}

/// Everything a strategy decides about one chunk before finishing.
pub(crate) struct ChunkSpec {
    pub content: String,
    /// Intra-block chunk index, used in the id.
    pub seq: usize,
    /// Strategy suffix appended to the id (price families only).
    pub suffix: Option<String>,
    /// Position offset within the block's stride.
    pub offset: usize,
    pub extra: MetadataMap,
}

/// Assign id, position, token estimate and the merged metadata bag.
pub(crate) fn finish_chunk(ctx: &BlockContext, spec: ChunkSpec) -> Chunk {
    let mut metadata = ctx.block.metadata.to_map();
    metadata.insert("blockType".into(), json!(ctx.block.block_type.to_string()));
    metadata.insert("blockIndex".into(), json!(ctx.block_index));
    metadata.extend(spec.extra);

    let id = match &spec.suffix {
        Some(suffix) => format!(
            "{}-b{}-c{}-{}",
            ctx.doc.document_id, ctx.block_index, spec.seq, suffix
        ),
        None => format!("{}-b{}-c{}", ctx.doc.document_id, ctx.block_index, spec.seq),
    };

    Chunk {
        id,
        document_id: ctx.doc.document_id,
        knowledge_base_id: ctx.doc.knowledge_base_id,
        token_count: estimate_tokens(&spec.content),
        position: ctx.block_index * BLOCK_POSITION_STRIDE + spec.offset,
        content: spec.content,
        metadata,
    }
}

/// Approximate LLM token count from word count.
pub fn estimate_tokens(text: &str) -> usize {
    (text.split_whitespace().count() as f64 * TOKENS_PER_WORD).ceil() as usize
}
