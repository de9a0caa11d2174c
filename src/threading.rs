//! Rayon-based splitting of flat output ranges.
//!
//! Output elements are independent, so work is divided into contiguous chunks
//! of the flat output. Each chunk seeds its traversal state from its first
//! flat position and then steps incrementally, exactly like the sequential path.

use crate::MIN_PARALLEL_WORK;

/// Chunks handed out per worker thread, for load balancing.
const CHUNKS_PER_THREAD: usize = 4;

/// Whether `outputs` elements costing `work_per_output` each are worth splitting.
pub(crate) fn should_split(outputs: usize, work_per_output: usize) -> bool {
    let nthreads = rayon::current_num_threads();
    let split = nthreads > 1
        && outputs > 1
        && outputs.saturating_mul(work_per_output.max(1)) > MIN_PARALLEL_WORK;
    tracing::trace!(outputs, work_per_output, nthreads, split, "parallel split decision");
    split
}

/// Chunk length for `total` outputs on the current pool.
pub(crate) fn chunk_len(total: usize) -> usize {
    let nchunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    total.div_ceil(nchunks.max(1)).max(1)
}
