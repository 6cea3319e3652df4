//! Shared constants for cardy.
//!
//! Centralizes magic numbers that would otherwise be duplicated across crates.

/// Maximum number of results for any query (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 200;

/// Default number of results when limit is not specified by the caller.
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// Embedding vector dimension (OpenAI text-embedding-3-small: 1536d).
/// Must match the arity of the `vector` column in `document_chunks`.
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Minimum cosine similarity for a chunk to count as a match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Default number of chunks retrieved per query.
pub const DEFAULT_MATCH_COUNT: usize = 8;

/// Default chunk window in characters (paragraph-aware splitting).
pub const DEFAULT_CHUNK_MAX_CHARS: usize = 2000;

/// Maximum chunk embeddings requested concurrently per document.
pub const EMBED_CONCURRENCY: usize = 4;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;
