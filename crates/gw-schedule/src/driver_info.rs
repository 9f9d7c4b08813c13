use gw_device::GrfMode;
use gw_walk::LoopOrder;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Register counts above this select the large register file.
pub const LARGE_GRF_THRESHOLD: u32 = 128;

/// How the kernel maps its linear dispatch id onto output tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WalkOrder {
    /// Natural row-major dispatch; no ordering arguments.
    #[default]
    Trivial,
    SimpleLinear,
    Hilbert,
    Boustrophedon,
}

/// Kernel loop, used to index per-loop unroll factors and workgroup extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Loop {
    M = 0,
    N = 1,
    K = 2,
}

/// Static description of the selected GEMM kernel, as produced by the
/// kernel-selection stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverInfo {
    /// Which dispatch axis carries M tiles.
    pub loop_order: LoopOrder,
    /// Tile walk order compiled into the kernel.
    pub walk_order: WalkOrder,
    /// The kernel parallelizes the K loop across dispatch axis 2.
    pub k_parallel: bool,
    /// The kernel fuses the beta/bias epilogue with k-parallel accumulation.
    pub fused_beta: bool,
    /// The kernel supports variable k-slicing of the tail wave.
    pub k_parallel_variable: bool,
    /// Each workgroup loops over several tiles.
    pub persistent: bool,
    /// Unroll factors indexed by [`Loop`].
    pub unroll: [u32; 3],
    /// Workgroup extents in threads, indexed by [`Loop`].
    pub wg: [u32; 3],
    /// Registers per thread.
    pub grf_count: u32,
    /// Requested K padding for k-sliced tiles.
    pub k_padding: i32,
    /// Additional workgroups appended to the dispatch.
    pub extra_wgs: u32,
}

impl Default for DriverInfo {
    fn default() -> Self {
        Self {
            loop_order: LoopOrder::Mnk,
            walk_order: WalkOrder::Trivial,
            k_parallel: false,
            fused_beta: false,
            k_parallel_variable: false,
            persistent: false,
            unroll: [1, 1, 1],
            wg: [1, 1, 1],
            grf_count: LARGE_GRF_THRESHOLD,
            k_padding: 0,
            extra_wgs: 0,
        }
    }
}

impl DriverInfo {
    pub fn with_loop_order(mut self, loop_order: LoopOrder) -> Self {
        self.loop_order = loop_order;
        self
    }

    pub fn with_walk_order(mut self, walk_order: WalkOrder) -> Self {
        self.walk_order = walk_order;
        self
    }

    /// Enable k-parallel dispatch, optionally with a fused beta epilogue.
    pub fn with_k_parallel(mut self, fused_beta: bool) -> Self {
        self.k_parallel = true;
        self.fused_beta = fused_beta;
        self
    }

    pub fn with_k_parallel_variable(mut self, k_padding: i32) -> Self {
        self.k_parallel_variable = true;
        self.k_padding = k_padding;
        self
    }

    pub fn with_persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn with_unroll(mut self, m: u32, n: u32, k: u32) -> Self {
        self.unroll = [m, n, k];
        self
    }

    pub fn with_wg(mut self, m: u32, n: u32, k: u32) -> Self {
        self.wg = [m, n, k];
        self
    }

    pub fn with_grf_count(mut self, grf_count: u32) -> Self {
        self.grf_count = grf_count;
        self
    }

    pub fn with_extra_wgs(mut self, extra_wgs: u32) -> Self {
        self.extra_wgs = extra_wgs;
        self
    }

    pub fn unroll(&self, l: Loop) -> u32 {
        self.unroll[l as usize]
    }

    pub fn wg(&self, l: Loop) -> u32 {
        self.wg[l as usize]
    }

    pub fn grf_mode(&self) -> GrfMode {
        if self.grf_count > LARGE_GRF_THRESHOLD {
            GrfMode::Large
        } else {
            GrfMode::Normal
        }
    }

    /// True when the kernel expects tile-ordering arguments.
    pub fn is_linear_order(&self) -> bool {
        self.walk_order != WalkOrder::Trivial
    }

    /// M:N aspect ratio of one workgroup's output block, in elements.
    pub fn tile_bias(&self) -> f64 {
        let m = self.wg(Loop::M) as f64 * self.unroll(Loop::M) as f64;
        let n = self.wg(Loop::N) as f64 * self.unroll(Loop::N) as f64;
        m / n
    }

    /// Check the fields the scheduler divides by.
    pub fn validate(&self) -> Result<()> {
        if let Some(i) = self.unroll.iter().position(|&u| u == 0) {
            return Err(ScheduleError::InvalidDriverInfo(format!(
                "unroll factor {} is zero",
                i
            )));
        }
        if let Some(i) = self.wg.iter().position(|&w| w == 0) {
            return Err(ScheduleError::InvalidDriverInfo(format!(
                "workgroup extent {} is zero",
                i
            )));
        }
        if self.k_padding < 0 {
            return Err(ScheduleError::InvalidDriverInfo(format!(
                "k_padding {} is negative",
                self.k_padding
            )));
        }
        Ok(())
    }
}

/// Advice from the kernel selector for a particular problem size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TuningHint {
    /// Whether variable k-slicing pays off. Without a hint it is always used.
    pub k_parallel_variable: bool,
}
