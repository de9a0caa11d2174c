//! Address deltas for walking an inner shape embedded in an outer buffer.

use smallvec::SmallVec;

use crate::corner::Countdown;
use crate::shape::size_from_shape;
use crate::{Result, ShapeError, MAX_RANK};

/// Per-rollover address deltas for an (outer, inner) shape pair.
///
/// When the inner flat index advances by one and `k` axes roll over, the
/// matching address in the outer buffer advances by `get(k)`:
///
/// `steps[0] = 1`, `steps[d + 1] = steps[d] + factor_d * (outer[d] - inner[d])`
/// with `factor_d = prod_{j < d} outer[j]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoIncrement {
    steps: SmallVec<[usize; MAX_RANK + 1]>,
}

/// Rejects an inner shape with a zero extent, which has no positions to walk.
fn ensure_nonzero(inner: &[usize]) -> Result<()> {
    match inner.iter().position(|&i| i == 0) {
        Some(axis) => Err(ShapeError::ZeroExtent { axis }),
        None => Ok(()),
    }
}

impl CoIncrement {
    pub fn new(outer: &[usize], inner: &[usize]) -> Result<Self> {
        if outer.len() != inner.len() {
            return Err(ShapeError::RankMismatch(outer.len(), inner.len()));
        }
        ensure_nonzero(inner)?;
        let mut steps: SmallVec<[usize; MAX_RANK + 1]> = SmallVec::with_capacity(outer.len() + 1);
        steps.push(1);
        let mut factor = 1usize;
        for (axis, (&o, &i)) in outer.iter().zip(inner.iter()).enumerate() {
            if i > o {
                return Err(ShapeError::InnerExceedsOuter {
                    axis,
                    outer: o,
                    inner: i,
                });
            }
            let prev = steps[axis];
            steps.push(prev + factor * (o - i));
            factor *= o;
        }
        Ok(Self { steps })
    }

    /// Delta for a step on which `rollovers` axes reset.
    #[inline(always)]
    pub fn get(&self, rollovers: usize) -> usize {
        self.steps[rollovers]
    }

    /// Same table with every delta multiplied by `factor`.
    ///
    /// With `inner` as the shape of a downsampled grid, this walks the outer
    /// buffer at `factor`-element spacing along every axis.
    pub fn scaled(&self, factor: usize) -> Self {
        Self {
            steps: self.steps.iter().map(|&s| s * factor).collect(),
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.steps
    }
}

/// Outer-buffer offset of every inner position, in inner flat order.
///
/// Built once per call and reused for every output element.
#[derive(Clone, Debug)]
pub struct OffsetCache {
    offsets: Vec<usize>,
}

impl OffsetCache {
    pub fn build(outer: &[usize], inner: &[usize]) -> Result<Self> {
        let co = CoIncrement::new(outer, inner)?;
        Self::from_co_increment(inner, &co)
    }

    /// Walks `inner` with a countdown, accumulating `co.get(rollovers)`.
    pub fn from_co_increment(inner: &[usize], co: &CoIncrement) -> Result<Self> {
        ensure_nonzero(inner)?;
        let size = size_from_shape(inner)?;
        let mut offsets = Vec::new();
        offsets.try_reserve_exact(size)?;

        let mut countdown = Countdown::new(inner);
        let mut offset = 0usize;
        offsets.push(offset);
        for _ in 1..size {
            offset += co.get(countdown.step());
            offsets.push(offset);
        }
        Ok(Self { offsets })
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Largest offset, i.e. that of the last inner position.
    pub fn max_offset(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }
}
