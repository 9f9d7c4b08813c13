use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Result};

/// Register-file pressure class a kernel was compiled for.
///
/// Kernels using the large register file get fewer hardware thread slots
/// per slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrfMode {
    #[default]
    Normal,
    Large,
}

/// Capability queries answered by the device runtime.
pub trait DeviceQuery: Debug {
    /// Total number of execution units on the device.
    fn eu_count(&self) -> u32;

    /// Execution units that one workgroup can span, i.e. EUs per slice.
    fn max_eus_per_wg(&self) -> u32;

    /// Hardware thread slots across the whole device for the given
    /// register-file mode.
    fn hw_threads(&self, large_grf: bool) -> u32;
}

/// A device described by fixed figures, used when the runtime has already
/// been queried or in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDevice {
    pub eu_count: u32,
    pub max_eus_per_wg: u32,
    pub hw_threads: u32,
    pub hw_threads_large_grf: u32,
}

impl DeviceQuery for StaticDevice {
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

/// Planning figures for how many workgroups a device can keep resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceCapacity {
    /// Number of independent compute slices.
    pub slices: u32,
    /// Hardware thread slots per slice with the normal register file.
    pub threads_per_slice: u32,
    /// Hardware thread slots per slice with the large register file.
    pub threads_per_slice_large_grf: u32,
}

impl DeviceCapacity {
    pub fn new(slices: u32, threads_per_slice: u32, threads_per_slice_large_grf: u32) -> Self {
        Self {
            slices,
            threads_per_slice,
            threads_per_slice_large_grf,
        }
    }

    /// Derive capacity figures from a device query.
    ///
    /// The slice count is `eu_count / max_eus_per_wg`; thread slots are the
    /// device-wide count divided evenly across slices.
    pub fn from_query(query: &dyn DeviceQuery) -> Result<Self> {
        let eu_count = query.eu_count();
        let max_eus_per_wg = query.max_eus_per_wg();
        let slices = eu_count.checked_div(max_eus_per_wg).unwrap_or(0);
        if slices == 0 {
            return Err(DeviceError::NoComputeSlices {
                eu_count,
                max_eus_per_wg,
            });
        }

        Ok(Self {
            slices,
            threads_per_slice: query.hw_threads(false) / slices,
            threads_per_slice_large_grf: query.hw_threads(true) / slices,
        })
    }

    pub fn threads_per_slice(&self, mode: GrfMode) -> u32 {
        match mode {
            GrfMode::Normal => self.threads_per_slice,
            GrfMode::Large => self.threads_per_slice_large_grf,
        }
    }

    /// Number of workgroups of `threads_per_group` threads that can be
    /// resident on the whole device at once. Never less than one.
    pub fn concurrent_groups(&self, mode: GrfMode, threads_per_group: u32) -> u32 {
        let per_slice = self
            .threads_per_slice(mode)
            .checked_div(threads_per_group)
            .unwrap_or(0);
        per_slice.saturating_mul(self.slices).max(1)
    }
}
