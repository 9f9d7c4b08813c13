//! `gw-device` - Device-facing value objects for gemm-walk.
//!
//! This crate provides:
//! - `Range3` and `DispatchGrid` for (global, local) launch ranges
//! - `KernelArg`, the `ArgSink` trait and an `ArgCursor` for positional
//!   launch arguments
//! - `DeviceCapacity` and the `DeviceQuery` seam to the device runtime
//! - Fixed-point reciprocals used for division-free math in kernels

pub mod args;
pub mod capacity;
pub mod error;
pub mod range;
pub mod recip;

// Re-export primary types at the crate root for convenience.
pub use args::{ArgCursor, ArgKind, ArgSink, KernelArg, KernelArgList};
pub use capacity::{DeviceCapacity, DeviceQuery, GrfMode, StaticDevice};
pub use error::{DeviceError, Result};
pub use range::{DispatchGrid, Range3};
pub use recip::{reciprocal, FastDivisor};
