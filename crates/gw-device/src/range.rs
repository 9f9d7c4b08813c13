use crate::error::{DeviceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A three-dimensional dispatch extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range3 {
    dims: [usize; 3],
}

impl Range3 {
    /// Create a new range from its three extents.
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Range3 { dims: [x, y, z] }
    }

    /// Total number of work items (product of all extents).
    pub fn nelems(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the extent along `axis`.
    ///
    /// # Errors
    /// Returns an error if `axis >= 3`.
    pub fn get(&self, axis: usize) -> Result<usize> {
        self.dims
            .get(axis)
            .copied()
            .ok_or(DeviceError::InvalidAxis { axis })
    }

    /// Returns a reference to the underlying extents.
    pub fn dims(&self) -> &[usize; 3] {
        &self.dims
    }
}

impl Index<usize> for Range3 {
    type Output = usize;

    fn index(&self, axis: usize) -> &usize {
        &self.dims[axis]
    }
}

impl IndexMut<usize> for Range3 {
    fn index_mut(&mut self, axis: usize) -> &mut usize {
        &mut self.dims[axis]
    }
}

impl fmt::Display for Range3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.dims[0], self.dims[1], self.dims[2])
    }
}

impl From<[usize; 3]> for Range3 {
    fn from(dims: [usize; 3]) -> Self {
        Range3 { dims }
    }
}

/// A (global, local) pair of ranges describing one kernel launch.
///
/// The global range counts work items, not workgroups: the number of
/// workgroups along an axis is `global[axis] / local[axis]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispatchGrid {
    pub global: Range3,
    pub local: Range3,
}

impl DispatchGrid {
    /// Create a dispatch grid, rejecting zero local extents.
    pub fn new(global: Range3, local: Range3) -> Result<Self> {
        if let Some(axis) = local.dims.iter().position(|&d| d == 0) {
            return Err(DeviceError::InvalidLocalSize { axis });
        }
        Ok(DispatchGrid { global, local })
    }

    /// Number of workgroups dispatched along `axis`.
    ///
    /// # Panics
    /// Panics if `axis >= 3`, or if the grid was built without going through
    /// [`DispatchGrid::new`] and has a zero local extent.
    pub fn groups(&self, axis: usize) -> usize {
        self.global[axis] / self.local[axis]
    }

    /// Threads per workgroup.
    pub fn threads_per_group(&self) -> usize {
        self.local.nelems()
    }
}

impl fmt::Display for DispatchGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "global={} local={}", self.global, self.local)
    }
}
