use gw_device::{ArgSink, KernelArg};

use crate::types::GWKernelArg;

/// Forwards every argument to a host callback, standing in for the host's
/// own argument list.
pub struct CallbackSink {
    pub callback: extern "C" fn(u32, GWKernelArg, *mut std::os::raw::c_void),
    pub user_data: *mut std::os::raw::c_void,
}

impl ArgSink for CallbackSink {
    fn set(&mut self, index: usize, arg: KernelArg) {
        (self.callback)(index as u32, arg.into(), self.user_data);
    }
}
