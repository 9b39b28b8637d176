//! Top-level pipeline: structure analysis, segmentation, classification
//! and chunk construction for one document.

use chunkmill_core::{ChunkError, ChunkingConfig, DocumentRef};

use crate::builder;
use crate::segmenter;
use crate::structure;
use crate::types::{ChunkDigest, ChunkingOutput, ChunkingSummary};

/// Stateless chunking engine; one instance can serve any number of
/// documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentChunker {
    config: ChunkingConfig,
}

impl DocumentChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk one document's normalized text.
    ///
    /// Deterministic: identical text and config produce byte-identical
    /// chunks, ids and positions. The only escalated failure is a
    /// document that yields no chunks at all.
    pub fn chunk(&self, text: &str, doc: &DocumentRef) -> Result<ChunkingOutput, ChunkError> {
        let lines: Vec<&str> = text.lines().collect();
        let content_lines: Vec<&str> = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        let analysis = structure::analyze_structure(&content_lines);
        tracing::debug!(
            document = %doc.document_id,
            structure = ?analysis.structure_type,
            confidence = analysis.confidence,
            "document structure analyzed"
        );

        let blocks = segmenter::segment_blocks(&lines);
        tracing::debug!(document = %doc.document_id, blocks = blocks.len(), "segmented");

        let chunks = builder::build_chunks(&blocks, doc, &self.config);
        if chunks.is_empty() {
            return Err(ChunkError::NoChunksProduced);
        }

        let summary = ChunkingSummary {
            chunk_count: chunks.len(),
            chunk_size: self.config.chunk_size,
            chunk_overlap: self.config.chunk_overlap,
            chunks: chunks
                .iter()
                .map(|c| ChunkDigest {
                    id: c.id.clone(),
                    position: c.position,
                    token_count: c.token_count,
                })
                .collect(),
        };

        Ok(ChunkingOutput {
            chunks,
            summary,
            structure: analysis,
        })
    }
}
