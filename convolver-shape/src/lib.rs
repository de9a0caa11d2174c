//! Index arithmetic for dense, contiguous N-dimensional buffers.
//!
//! Axis 0 is the fastest-varying axis: a flat position is
//! `pos = sum_d index[d] * stride[d]` with `stride[0] = 1` and
//! `stride[d] = stride[d - 1] * dims[d - 1]`.
//!
//! # Building blocks
//!
//! - [`size_from_shape`], [`index_to_pos`], [`pos_to_index`]: flat position <-> multi-index
//! - [`corner_reset`] / [`corner_decrement`] and [`Countdown`]: flattened-order traversal that
//!   reports how many axes rolled over at each step
//! - [`CoIncrement`] / [`OffsetCache`]: address deltas for walking an inner shape embedded in
//!   an outer buffer in O(1) per step
//!
//! # Example
//!
//! ```rust
//! use convolver_shape::{OffsetCache, index_to_pos};
//!
//! // Taps of a 2x2 window inside a 4x4 buffer.
//! let cache = OffsetCache::build(&[4, 4], &[2, 2]).unwrap();
//! assert_eq!(cache.as_slice(), &[0, 1, 4, 5]);
//! assert_eq!(index_to_pos(&[4, 4], &[1, 1]), Some(5));
//! ```

mod co_increment;
mod corner;
mod shape;

pub use co_increment::{CoIncrement, OffsetCache};
pub use corner::{corner_decrement, corner_reset, Countdown};
pub use shape::{
    col_major_strides, index_to_pos, index_to_pos_unchecked, pos_to_index, size_from_shape,
    Index, Shape,
};

use std::collections::TryReserveError;

/// Largest rank accepted anywhere in the workspace.
pub const MAX_RANK: usize = 16;

/// Largest element count a single buffer may hold (`i32::MAX`).
pub const MAX_ELEMENTS: usize = i32::MAX as usize;

/// Errors raised while validating shapes or building traversal tables.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// Rank is zero or larger than [`MAX_RANK`].
    #[error("invalid rank {rank}: must be between 1 and {MAX_RANK}")]
    InvalidRank { rank: usize },

    /// Two shapes that must share a rank do not.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// An axis has extent zero.
    #[error("axis {axis} has zero extent")]
    ZeroExtent { axis: usize },

    /// The element count does not fit in a 32-bit signed integer.
    #[error("element count of shape {0:?} overflows i32")]
    SizeOverflow(Vec<usize>),

    /// The inner shape does not fit inside the outer shape.
    #[error("inner extent {inner} exceeds outer extent {outer} on axis {axis}")]
    InnerExceedsOuter {
        axis: usize,
        outer: usize,
        inner: usize,
    },

    /// The offset cache could not be allocated.
    #[error("offset cache allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

/// Result type for shape operations.
pub type Result<T> = std::result::Result<T, ShapeError>;
