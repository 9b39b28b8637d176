use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Sizing parameters for the chunking engine.
///
/// `chunk_size` and `chunk_overlap` are measured in characters of block
/// text. `max_tokens` travels with the config so the embedding stage can
/// batch against it; chunking itself does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            max_tokens: 512,
        }
    }
}

impl ChunkingConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            chunk_size: env_usize("CHUNK_SIZE", 1000),
            chunk_overlap: env_usize("CHUNK_OVERLAP", 200),
            max_tokens: env_usize("CHUNK_MAX_TOKENS", 512),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Chunking config: size={}, overlap={}, max_tokens={}",
            self.chunk_size,
            self.chunk_overlap,
            self.max_tokens
        );
    }
}
