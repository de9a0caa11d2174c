//! Flat position <-> multi-index conversion for contiguous buffers.

use smallvec::SmallVec;

use crate::{Result, ShapeError, MAX_ELEMENTS, MAX_RANK};

/// Inline storage for one coordinate (or extent) per axis.
pub type Index = SmallVec<[usize; MAX_RANK]>;

/// A validated array shape: rank in `1..=MAX_RANK`, every extent at least 1,
/// and an element count that fits in `i32`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Index,
}

impl Shape {
    pub fn new(dims: &[usize]) -> Result<Self> {
        if dims.is_empty() || dims.len() > MAX_RANK {
            return Err(ShapeError::InvalidRank { rank: dims.len() });
        }
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(ShapeError::ZeroExtent { axis });
        }
        size_from_shape(dims)?;
        Ok(Self {
            dims: SmallVec::from_slice(dims),
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total element count. Cannot overflow: checked at construction.
    #[inline]
    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn strides(&self) -> Index {
        col_major_strides(&self.dims)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        &self.dims
    }
}

/// Product of all extents.
///
/// Accumulates in 64 bits and fails with [`ShapeError::SizeOverflow`] if the
/// result does not fit in an `i32`. An empty shape has size 1.
pub fn size_from_shape(dims: &[usize]) -> Result<usize> {
    let mut size = 1u64;
    for &d in dims {
        size = match size.checked_mul(d as u64) {
            Some(s) if s <= MAX_ELEMENTS as u64 => s,
            _ => return Err(ShapeError::SizeOverflow(dims.to_vec())),
        };
    }
    Ok(size as usize)
}

/// Strides of a contiguous buffer with axis 0 varying fastest.
pub fn col_major_strides(dims: &[usize]) -> Index {
    let mut strides: Index = SmallVec::with_capacity(dims.len());
    let mut factor = 1usize;
    for &d in dims {
        strides.push(factor);
        factor *= d;
    }
    strides
}

/// Flat position of `index`, or `None` if any coordinate is out of range
/// (or the ranks differ).
#[inline]
pub fn index_to_pos(dims: &[usize], index: &[usize]) -> Option<usize> {
    if dims.len() != index.len() {
        return None;
    }
    let mut pos = 0usize;
    for (&d, &i) in dims.iter().zip(index.iter()).rev() {
        if i >= d {
            return None;
        }
        pos = pos * d + i;
    }
    Some(pos)
}

/// Flat position of `index` without bounds checks.
///
/// Callers must guarantee `index[d] < dims[d]` for every axis; violating that
/// yields a meaningless (but memory-safe) position.
#[inline(always)]
pub fn index_to_pos_unchecked(dims: &[usize], index: &[usize]) -> usize {
    debug_assert_eq!(dims.len(), index.len());
    let mut pos = 0usize;
    for (&d, &i) in dims.iter().zip(index.iter()).rev() {
        debug_assert!(i < d);
        pos = pos * d + i;
    }
    pos
}

/// Inverse of [`index_to_pos`]: writes the coordinates of `pos` into `index`.
#[inline]
pub fn pos_to_index(dims: &[usize], mut pos: usize, index: &mut [usize]) {
    debug_assert_eq!(dims.len(), index.len());
    for (slot, &d) in index.iter_mut().zip(dims.iter()) {
        *slot = pos % d;
        pos /= d;
    }
}
