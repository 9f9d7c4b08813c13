use gw_device::{ArgKind, DeviceQuery, KernelArg};
use gw_schedule::{DriverInfo, TuningHint, WalkOrder};
use gw_walk::LoopOrder;

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GWStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorBufferTooSmall = 2,
    ErrorInternal = 3,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GWLoopOrder {
    Mnk = 0,
    Nmk = 1,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GWWalkOrder {
    Trivial = 0,
    SimpleLinear = 1,
    Hilbert = 2,
    Boustrophedon = 3,
}

/// Kernel descriptor fields the scheduler reads.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct GWDriverInfo {
    pub loop_order: GWLoopOrder,
    pub walk_order: GWWalkOrder,
    pub k_parallel: bool,
    pub fused_beta: bool,
    pub k_parallel_variable: bool,
    pub persistent: bool,
    /// Unroll factors for the M, N and K loops.
    pub unroll: [u32; 3],
    /// Workgroup extents for the M, N and K loops.
    pub wg: [u32; 3],
    pub grf_count: u32,
    pub k_padding: i32,
    pub extra_wgs: u32,
}

impl Default for GWDriverInfo {
    fn default() -> Self {
        Self::from(&DriverInfo::default())
    }
}

impl From<&DriverInfo> for GWDriverInfo {
    fn from(info: &DriverInfo) -> Self {
        Self {
            loop_order: match info.loop_order {
                LoopOrder::Mnk => GWLoopOrder::Mnk,
                LoopOrder::Nmk => GWLoopOrder::Nmk,
            },
            walk_order: match info.walk_order {
                WalkOrder::Trivial => GWWalkOrder::Trivial,
                WalkOrder::SimpleLinear => GWWalkOrder::SimpleLinear,
                WalkOrder::Hilbert => GWWalkOrder::Hilbert,
                WalkOrder::Boustrophedon => GWWalkOrder::Boustrophedon,
            },
            k_parallel: info.k_parallel,
            fused_beta: info.fused_beta,
            k_parallel_variable: info.k_parallel_variable,
            persistent: info.persistent,
            unroll: info.unroll,
            wg: info.wg,
            grf_count: info.grf_count,
            k_padding: info.k_padding,
            extra_wgs: info.extra_wgs,
        }
    }
}

impl From<&GWDriverInfo> for DriverInfo {
    fn from(info: &GWDriverInfo) -> Self {
        Self {
            loop_order: match info.loop_order {
                GWLoopOrder::Mnk => LoopOrder::Mnk,
                GWLoopOrder::Nmk => LoopOrder::Nmk,
            },
            walk_order: match info.walk_order {
                GWWalkOrder::Trivial => WalkOrder::Trivial,
                GWWalkOrder::SimpleLinear => WalkOrder::SimpleLinear,
                GWWalkOrder::Hilbert => WalkOrder::Hilbert,
                GWWalkOrder::Boustrophedon => WalkOrder::Boustrophedon,
            },
            k_parallel: info.k_parallel,
            fused_beta: info.fused_beta,
            k_parallel_variable: info.k_parallel_variable,
            persistent: info.persistent,
            unroll: info.unroll,
            wg: info.wg,
            grf_count: info.grf_count,
            k_padding: info.k_padding,
            extra_wgs: info.extra_wgs,
        }
    }
}

/// Problem-specific tuning advice. Pass null to `gw_schedule` when there is
/// none.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GWTuningHint {
    pub k_parallel_variable: bool,
}

impl From<&GWTuningHint> for TuningHint {
    fn from(hint: &GWTuningHint) -> Self {
        Self {
            k_parallel_variable: hint.k_parallel_variable,
        }
    }
}

/// Device figures as reported by the runtime.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GWDeviceQuery {
    pub eu_count: u32,
    pub max_eus_per_wg: u32,
    pub hw_threads: u32,
    pub hw_threads_large_grf: u32,
}

impl DeviceQuery for GWDeviceQuery {
    fn eu_count(&self) -> u32 {
        self.eu_count
    }

    fn max_eus_per_wg(&self) -> u32 {
        self.max_eus_per_wg
    }

    fn hw_threads(&self, large_grf: bool) -> u32 {
        if large_grf {
            self.hw_threads_large_grf
        } else {
            self.hw_threads
        }
    }
}

/// A launch range, updated in place by the scheduler.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GWDispatchRange {
    pub global: [usize; 3],
    pub local: [usize; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GWArgKind {
    U32 = 0,
    I32 = 1,
}

/// One kernel argument as its type tag and raw 32-bit word.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GWKernelArg {
    pub kind: GWArgKind,
    pub bits: u32,
}

impl From<KernelArg> for GWKernelArg {
    fn from(arg: KernelArg) -> Self {
        let kind = match arg.kind() {
            ArgKind::U32 => GWArgKind::U32,
            ArgKind::I32 => GWArgKind::I32,
        };
        Self {
            kind,
            bits: arg.to_bits(),
        }
    }
}

impl Default for GWKernelArg {
    fn default() -> Self {
        Self {
            kind: GWArgKind::U32,
            bits: 0,
        }
    }
}

/// Receives each scheduling argument with its absolute argument index.
pub type GWArgCallback = Option<
    extern "C" fn(index: u32, arg: GWKernelArg, user_data: *mut std::os::raw::c_void),
>;
