//! Reverse-countdown traversal of a shape in flattened order.
//!
//! Each axis holds the number of steps left before it rolls over, so a
//! decrement tells the caller exactly how many axis boundaries were crossed.
//! Counting down from `dims[d] - 1` to 0 visits positions in the same order
//! as counting the forward index up from 0.

use smallvec::SmallVec;

use crate::shape::Index;

/// Sets `rev[d] = dims[d] - 1` for every axis.
///
/// # Panics
/// Panics if any extent is zero.
#[inline]
pub fn corner_reset(dims: &[usize], rev: &mut [usize]) {
    debug_assert_eq!(dims.len(), rev.len());
    for (r, &d) in rev.iter_mut().zip(dims.iter()) {
        assert!(d > 0, "zero extent in countdown dims {dims:?}");
        *r = d - 1;
    }
}

/// Advances the traversal by one flat position.
///
/// `rev` must come from [`corner_reset`] on the same `dims`, so every extent
/// is nonzero.
///
/// Returns the number of axes that rolled over (reset to their top value)
/// during this step: 0 when only axis 0 moved. Returns `dims.len()` when
/// every axis rolled over, i.e. the traversal wrapped back to its start.
#[inline(always)]
pub fn corner_decrement(dims: &[usize], rev: &mut [usize]) -> usize {
    let rank = rev.len();
    let mut axis = 0usize;
    while axis < rank {
        if rev[axis] > 0 {
            rev[axis] -= 1;
            return axis;
        }
        rev[axis] = dims[axis] - 1;
        axis += 1;
    }
    axis
}

/// Owned countdown state over one shape.
#[derive(Clone, Debug)]
pub struct Countdown {
    dims: Index,
    rev: Index,
}

impl Countdown {
    /// Starts at flat position 0.
    ///
    /// # Panics
    /// Panics if any extent is zero.
    pub fn new(dims: &[usize]) -> Self {
        let mut rev: Index = SmallVec::from_elem(0, dims.len());
        corner_reset(dims, &mut rev);
        Self {
            dims: SmallVec::from_slice(dims),
            rev,
        }
    }

    /// Jumps to flat position `pos` by direct decomposition.
    pub fn seek(&mut self, mut pos: usize) {
        for (r, &d) in self.rev.iter_mut().zip(self.dims.iter()) {
            *r = d - 1 - pos % d;
            pos /= d;
        }
    }

    /// Moves to the next flat position; see [`corner_decrement`].
    #[inline(always)]
    pub fn step(&mut self) -> usize {
        corner_decrement(&self.dims, &mut self.rev)
    }

    /// Forward coordinate of the current position along `axis`.
    #[inline]
    pub fn coord(&self, axis: usize) -> usize {
        self.dims[axis] - 1 - self.rev[axis]
    }

    /// Forward index of the current position.
    pub fn index(&self) -> Index {
        (0..self.dims.len()).map(|axis| self.coord(axis)).collect()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }
}
