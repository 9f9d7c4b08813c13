//! `gw-schedule` - Host-side dispatch scheduling for GEMM kernels.
//!
//! Given the selected kernel's [`DriverInfo`], the problem sizes, the launch
//! grid and the device capacity, [`schedule`] appends the tile-ordering and
//! k-slicing arguments the kernel reads positionally and resizes the grid.

pub mod dims;
pub mod driver_info;
pub mod error;
pub mod kparallel;
pub mod plan;
pub mod scheduler;

pub use dims::ProblemDims;
pub use driver_info::{DriverInfo, Loop, TuningHint, WalkOrder};
pub use error::{Result, ScheduleError};
pub use kparallel::{KParallelPlan, KvConfig, PaddingFixpoint};
pub use plan::DispatchPlan;
pub use scheduler::{schedule, walk_planner};
