//! Semantic chunking engine.
//!
//! Turns extracted document text into retrieval-ready, size-bounded
//! chunks: per-line feature extraction, whole-document structure
//! analysis, semantic block segmentation, per-block classification,
//! comparison-criticality detection and strategy-dispatched chunk
//! construction, with an embedding-time prefix enrichment step on top.

pub mod builder;
pub mod classifier;
pub mod criticality;
pub mod enrichment;
pub mod line_format;
mod patterns;
pub mod pipeline;
pub mod segmenter;
pub mod structure;
pub mod types;

pub use pipeline::DocumentChunker;
pub use types::{Chunk, ChunkDigest, ChunkingOutput, ChunkingSummary, SemanticBlock};
