use gw_device::{ArgCursor, DeviceCapacity, DispatchGrid, KernelArg, KernelArgList};

use crate::dims::ProblemDims;
use crate::driver_info::{DriverInfo, TuningHint};
use crate::scheduler::schedule;

/// The outputs of [`schedule`] for a launch with no preceding arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub args: Vec<KernelArg>,
    pub grid: DispatchGrid,
}

impl DispatchPlan {
    pub fn compute(
        grid: DispatchGrid,
        dims: ProblemDims,
        disable_hilbert: bool,
        info: &DriverInfo,
        hint: Option<&TuningHint>,
        caps: &DeviceCapacity,
    ) -> Self {
        let mut list = KernelArgList::new();
        let mut argn = 0;
        let mut grid = grid;

        schedule(
            &mut ArgCursor::new(&mut list, &mut argn),
            &mut grid,
            dims,
            disable_hilbert,
            info,
            hint,
            caps,
        );

        DispatchPlan {
            args: list.values(),
            grid,
        }
    }

    /// Raw argument words as the kernel reads them.
    pub fn words(&self) -> Vec<u32> {
        self.args.iter().map(KernelArg::to_bits).collect()
    }
}
