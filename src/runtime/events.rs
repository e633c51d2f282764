//! Runtime event stream payloads.

/// Events emitted by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupEvent {
    /// A single lookup finished.
    Resolved {
        /// Call as submitted.
        call: String,
        /// Number of hits returned.
        hits: usize,
        /// Served from the cache.
        cached: bool,
    },
    /// A batch finished and its results were merged.
    BatchCompleted {
        /// Calls in the batch.
        calls: usize,
        /// Hits returned after the cap.
        hits: usize,
        /// The cap cut the merged output.
        truncated: bool,
        /// Wall time for the batch.
        elapsed_ms: u64,
    },
    /// The cache was emptied.
    CacheCleared,
}
