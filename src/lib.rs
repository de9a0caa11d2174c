//! Dense numerical kernels over flat N-dimensional `f32` buffers.
//!
//! All arrays are contiguous with axis 0 varying fastest, rank between 1 and
//! [`MAX_RANK`]. Traversal is driven by the co-increment tables of
//! [`convolver_shape`], which turn per-element index recomputation into one
//! table lookup and addition per step.
//!
//! # Operations
//!
//! - [`convolve_into`] / [`convolve`]: valid-mode cross-correlation
//! - [`max_pool_into`] / [`max_pool`]: tiled, possibly overlapping max-pooling
//! - [`dense_layer_into`] / [`dense_layer`]: fully-connected layer with threshold and ReLU
//! - [`fit_kernel_backwards_into`] / [`fit_kernel_backwards`]: reverse and circularly shift a
//!   kernel into a zero-padded buffer, staging it for frequency-domain convolution
//!
//! The `_into` variants validate their arguments and write into a caller-supplied output;
//! the allocating variants size the output themselves.
//!
//! # Example
//!
//! ```rust
//! use convolver::{convolve, ArrayView};
//!
//! let signal = [0.3f32, 0.4, 0.5];
//! let kernel = [1.3f32, -0.5];
//! let out = convolve(
//!     &ArrayView::new(&signal, &[3]).unwrap(),
//!     &ArrayView::new(&kernel, &[2]).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(out.dims(), &[2]);
//! assert!((out.data()[0] - 0.19).abs() < 1e-6);
//! assert!((out.data()[1] - 0.27).abs() < 1e-6);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): split large outputs across the rayon thread pool
//! - `simd` (default): runtime CPU-feature dispatch via `pulp`

mod convolve;
mod dense;
mod pool;
mod reposition;
mod simd;
#[cfg(feature = "parallel")]
mod threading;
mod validate;
pub mod view;

pub use convolve::{convolve, convolve_into};
pub use dense::{dense_layer, dense_layer_into};
pub use pool::{max_pool, max_pool_into};
pub use reposition::{fit_kernel_backwards, fit_kernel_backwards_into};
pub use validate::{convolve_output_shape, kernel_shift, max_pool_output_shape};
pub use view::{Array, ArrayView, ArrayViewMut};

pub use convolver_shape::{Shape, ShapeError, MAX_RANK};

/// Largest accepted tile or pool factor for [`max_pool`].
pub const MAX_POOL_FACTOR: usize = 100;

/// Multiply-adds (or comparisons) below which work stays on the calling thread.
pub const MIN_PARALLEL_WORK: usize = 1 << 15;

/// Errors reported before any engine touches its output.
#[derive(Debug, thiserror::Error)]
pub enum ConvolverError {
    /// Invalid rank, zero extent, size overflow, or offset-cache allocation failure.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Operands that must share a rank do not.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// An output (or destination) shape differs from the one the operation produces.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    /// The kernel is larger than the signal (or destination) along an axis.
    #[error("kernel extent {kernel} exceeds signal extent {signal} on axis {axis}")]
    KernelTooLarge {
        axis: usize,
        signal: usize,
        kernel: usize,
    },

    /// A tile or pool factor outside `1..=MAX_POOL_FACTOR`.
    #[error("{name} must be between 1 and {MAX_POOL_FACTOR}, got {value}")]
    InvalidFactor { name: &'static str, value: usize },

    /// A buffer does not hold the number of elements its shape requires.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLength { expected: usize, got: usize },

    /// A repositioning shift larger than the destination extent.
    #[error("shift {shift} exceeds destination extent {extent} on axis {axis}")]
    ShiftOutOfRange {
        axis: usize,
        shift: usize,
        extent: usize,
    },

    /// A pooling window would contain no input element.
    #[error(
        "pool window of output {output_index} on axis {axis} starts past input extent {input_extent}"
    )]
    EmptyPoolWindow {
        axis: usize,
        output_index: usize,
        input_extent: usize,
    },
}

/// Result type for convolver operations.
pub type Result<T> = std::result::Result<T, ConvolverError>;
