use thiserror::Error;

/// Errors a chunking run can surface to the caller.
///
/// Everything else (empty blocks, unparseable numeric tokens) is absorbed
/// locally with a diagnostic log and a safe default.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("document produced no chunks")]
    NoChunksProduced,
}
