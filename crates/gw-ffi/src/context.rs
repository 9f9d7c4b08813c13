use gw_device::{DeviceCapacity, DeviceQuery};

/// Opaque context handle holding the device capacity figures, queried once
/// per device and reused for every launch.
pub struct GWContext {
    pub caps: DeviceCapacity,
}

impl GWContext {
    pub fn new(query: &dyn DeviceQuery) -> gw_device::Result<Self> {
        let caps = DeviceCapacity::from_query(query)?;
        log::debug!(
            "device context: {} slices, {}/{} threads per slice",
            caps.slices,
            caps.threads_per_slice,
            caps.threads_per_slice_large_grf
        );
        Ok(Self { caps })
    }
}
