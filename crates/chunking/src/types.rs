//! Block and chunk types produced by the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::structure::DocumentStructureAnalysis;

/// Metadata bag attached to chunks. `BTreeMap` keeps key order
/// deterministic so repeated runs serialize identically.
pub type MetadataMap = BTreeMap<String, Value>;

/// Separator family recognised in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorKind {
    Tab,
    Pipe,
    Comma,
    MultiSpace,
    None,
}

impl SeparatorKind {
    pub fn label(&self) -> &'static str {
        match self {
            SeparatorKind::Tab => "tab",
            SeparatorKind::Pipe => "pipe",
            SeparatorKind::Comma => "comma",
            SeparatorKind::MultiSpace => "multispace",
            SeparatorKind::None => "none",
        }
    }
}

/// Semantic category assigned to a block by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Unknown,
    Table,
    List,
    Header,
    Structured,
    Paragraph,
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BlockType::Unknown => "unknown",
            BlockType::Table => "table",
            BlockType::List => "list",
            BlockType::Header => "header",
            BlockType::Structured => "structured",
            BlockType::Paragraph => "paragraph",
        };
        write!(f, "{name}")
    }
}

/// A maximal contiguous run of lines treated as one coherent unit.
///
/// Created by the segmenter, classified in place, consumed by the chunk
/// builder. Never shared across documents.
#[derive(Debug, Clone)]
pub struct SemanticBlock {
    pub lines: Vec<String>,
    pub block_type: BlockType,
    pub metadata: BlockMetadata,
    /// Inclusive index of the first line in the original line sequence.
    pub start_index: usize,
    /// Inclusive index of the last line.
    pub end_index: usize,
}

impl SemanticBlock {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Shape facts the classifier extracts from every block regardless of type.
#[derive(Debug, Clone, Default)]
pub struct BlockMetadata {
    pub numeric_count: usize,
    pub numeric_range: Option<(f64, f64)>,
    /// Up to 3 header-like lines found in the block.
    pub header_lines: Vec<String>,
    pub language: String,
    /// Modal column count, table blocks only.
    pub table_columns: Option<usize>,
    /// Fraction of lines matching the modal column count, table blocks only.
    pub table_consistency: Option<f64>,
}

impl BlockMetadata {
    /// Flatten into the map merged into every chunk built from the block.
    pub fn to_map(&self) -> MetadataMap {
        let mut map = MetadataMap::new();
        map.insert("numericCount".into(), json!(self.numeric_count));
        if let Some((min, max)) = self.numeric_range {
            map.insert("numericMin".into(), json!(min));
            map.insert("numericMax".into(), json!(max));
        }
        if !self.header_lines.is_empty() {
            map.insert("headerLines".into(), json!(self.header_lines));
        }
        map.insert("language".into(), json!(self.language));
        if let Some(columns) = self.table_columns {
            map.insert("tableColumns".into(), json!(columns));
        }
        if let Some(consistency) = self.table_consistency {
            map.insert("tableConsistency".into(), json!(consistency));
        }
        map
    }
}

/// A bounded slice of document text with metadata, the atomic unit handed
/// to the embedding/indexing stage. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub document_id: Uuid,
    pub knowledge_base_id: Uuid,
    pub content: String,
    /// Strictly encodes block-then-intra-block order.
    pub position: usize,
    pub token_count: usize,
    pub metadata: MetadataMap,
}

/// Digest row for the document-level summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkDigest {
    pub id: String,
    pub position: usize,
    pub token_count: usize,
}

/// Document-level summary persisted alongside the chunks; lets the caller
/// verify completeness of downstream embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingSummary {
    pub chunk_count: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub chunks: Vec<ChunkDigest>,
}

/// Everything a chunking run hands to the storage/embedding collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingOutput {
    pub chunks: Vec<Chunk>,
    pub summary: ChunkingSummary,
    pub structure: DocumentStructureAnalysis,
}
