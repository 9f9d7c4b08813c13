use gw_device::{DispatchGrid, Range3};

use crate::error::{Result, ScheduleError};

/// Logical GEMM problem sizes: `C[batch, m, n] = A[batch, m, k] @ B[batch, k, n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProblemDims {
    pub m: i32,
    pub n: i32,
    pub k: i32,
    pub batch: i32,
}

impl ProblemDims {
    pub fn new(m: i32, n: i32, k: i32) -> Self {
        Self { m, n, k, batch: 1 }
    }

    pub fn with_batch(mut self, batch: i32) -> Self {
        self.batch = batch;
        self
    }

    /// The natural one-workgroup-per-tile grid for `tile_m x tile_n` tiles.
    ///
    /// M tiles go on axis 0, N tiles on axis 1 and batches on axis 2; a
    /// kernel with `LoopOrder::Nmk` is expected to have the first two axes
    /// swapped by its caller.
    pub fn dispatch_grid(&self, tile_m: u32, tile_n: u32, local: Range3) -> Result<DispatchGrid> {
        if tile_m == 0 || tile_n == 0 {
            return Err(ScheduleError::InvalidProblem(format!(
                "tile size {}x{} must be non-zero",
                tile_m, tile_n
            )));
        }
        if self.m < 0 || self.n < 0 || self.k < 0 || self.batch < 1 {
            return Err(ScheduleError::InvalidProblem(format!(
                "dimensions m={} n={} k={} batch={} out of range",
                self.m, self.n, self.k, self.batch
            )));
        }

        let groups_m = (self.m as u32).div_ceil(tile_m) as usize;
        let groups_n = (self.n as u32).div_ceil(tile_n) as usize;
        let global = Range3::new(
            groups_m * local[0],
            groups_n * local[1],
            self.batch as usize * local[2],
        );
        Ok(DispatchGrid::new(global, local)?)
    }
}
