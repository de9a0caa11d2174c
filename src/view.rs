//! Contiguous array types over `f32` buffers.
//!
//! - [`ArrayView`]: borrowed, read-only
//! - [`ArrayViewMut`]: borrowed, writable
//! - [`Array`]: owned buffer plus shape
//!
//! All three store axis 0 fastest and check at construction that the buffer
//! holds exactly `size_from_shape(dims)` elements.

use std::ops::{Index, IndexMut};

use convolver_shape::{index_to_pos, pos_to_index, Shape};

use crate::{ConvolverError, Result};

fn check_len(shape: &Shape, len: usize) -> Result<()> {
    if shape.size() != len {
        return Err(ConvolverError::BufferLength {
            expected: shape.size(),
            got: len,
        });
    }
    Ok(())
}

fn flat_index(dims: &[usize], indices: &[usize]) -> usize {
    assert_eq!(indices.len(), dims.len(), "wrong number of indices");
    match index_to_pos(dims, indices) {
        Some(pos) => pos,
        None => panic!("index {indices:?} out of bounds for dims {dims:?}"),
    }
}

// ============================================================================
// ArrayView
// ============================================================================

/// Read-only view of a contiguous buffer.
#[derive(Clone, Debug)]
pub struct ArrayView<'a> {
    shape: Shape,
    data: &'a [f32],
}

impl<'a> ArrayView<'a> {
    pub fn new(data: &'a [f32], dims: &[usize]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        check_len(&shape, data.len())?;
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn ndim(&self) -> usize {
        self.shape.rank()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: shapes have no zero extents.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &'a [f32] {
        self.data
    }

    /// Element at `indices`. Panics when out of bounds.
    pub fn get(&self, indices: &[usize]) -> f32 {
        self.data[flat_index(self.dims(), indices)]
    }
}

// ============================================================================
// ArrayViewMut
// ============================================================================

/// Writable view of a contiguous buffer.
#[derive(Debug)]
pub struct ArrayViewMut<'a> {
    shape: Shape,
    data: &'a mut [f32],
}

impl<'a> ArrayViewMut<'a> {
    pub fn new(data: &'a mut [f32], dims: &[usize]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        check_len(&shape, data.len())?;
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn ndim(&self) -> usize {
        self.shape.rank()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut *self.data
    }

    pub fn as_view(&self) -> ArrayView<'_> {
        ArrayView {
            shape: self.shape.clone(),
            data: &*self.data,
        }
    }

    pub fn get(&self, indices: &[usize]) -> f32 {
        self.data[flat_index(self.dims(), indices)]
    }

    pub fn set(&mut self, indices: &[usize], value: f32) {
        let pos = flat_index(self.shape.dims(), indices);
        self.data[pos] = value;
    }
}

// ============================================================================
// Array
// ============================================================================

/// Owned contiguous array.
#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    shape: Shape,
    data: Vec<f32>,
}

impl Array {
    /// Zero-filled array.
    pub fn zeros(dims: &[usize]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        let data = vec![0.0; shape.size()];
        Ok(Self { shape, data })
    }

    /// Wraps `data`, which must hold exactly one element per position.
    pub fn from_vec(dims: &[usize], data: Vec<f32>) -> Result<Self> {
        let shape = Shape::new(dims)?;
        check_len(&shape, data.len())?;
        Ok(Self { shape, data })
    }

    /// Fills each position with `f(index)`, visiting positions in flat order.
    pub fn from_fn(dims: &[usize], mut f: impl FnMut(&[usize]) -> f32) -> Result<Self> {
        let shape = Shape::new(dims)?;
        let total = shape.size();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; shape.rank()];
        for pos in 0..total {
            pos_to_index(shape.dims(), pos, &mut idx);
            data.push(f(&idx));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn ndim(&self) -> usize {
        self.shape.rank()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn view(&self) -> ArrayView<'_> {
        ArrayView {
            shape: self.shape.clone(),
            data: &self.data,
        }
    }

    pub fn view_mut(&mut self) -> ArrayViewMut<'_> {
        ArrayViewMut {
            shape: self.shape.clone(),
            data: &mut self.data,
        }
    }

    pub fn get(&self, indices: &[usize]) -> f32 {
        self[indices]
    }

    pub fn set(&mut self, indices: &[usize], value: f32) {
        self[indices] = value;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.data.iter()
    }
}

impl Index<&[usize]> for Array {
    type Output = f32;

    fn index(&self, indices: &[usize]) -> &f32 {
        &self.data[flat_index(self.shape.dims(), indices)]
    }
}

impl IndexMut<&[usize]> for Array {
    fn index_mut(&mut self, indices: &[usize]) -> &mut f32 {
        let pos = flat_index(self.shape.dims(), indices);
        &mut self.data[pos]
    }
}

// ============================================================================
// Tests
// ============================================================================
