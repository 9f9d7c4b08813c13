use gw_device::{ArgCursor, ArgSink};

use crate::boustrophedon::Strip;
use crate::grid::TileGrid;
use crate::hilbert::HilbertSpan;

/// Trait for walk orders that map a linear dispatch index onto the tile grid.
///
/// A planner only decides the parameters; the kernel performs the walk.
pub trait WalkPlanner: Send + Sync {
    /// Returns the name of this walk order.
    fn name(&self) -> &str;

    /// Compute the kernel arguments describing the walk over `grid`.
    fn plan(&self, grid: &TileGrid) -> WalkArgs;
}

/// Walk-order parameters, in the shape each planner produces them.
///
/// Bit-packing into kernel words happens only in [`WalkArgs::emit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkArgs {
    Linear {
        gcmn_recip: u32,
    },
    Hilbert {
        span: HilbertSpan,
        uvd_recip: u32,
        bail: u32,
    },
    Boustrophedon(Strip),
}

impl WalkArgs {
    /// Number of kernel arguments [`WalkArgs::emit`] writes.
    pub fn arg_count(&self) -> usize {
        match self {
            WalkArgs::Linear { .. } => 1,
            WalkArgs::Hilbert { .. } => 3,
            WalkArgs::Boustrophedon(_) => 2,
        }
    }

    /// Append the argument block in kernel order.
    pub fn emit<S: ArgSink>(&self, args: &mut ArgCursor<'_, S>) {
        match *self {
            WalkArgs::Linear { gcmn_recip } => {
                args.push(gcmn_recip);
            }
            WalkArgs::Hilbert {
                span,
                uvd_recip,
                bail,
            } => {
                args.push(span.pack());
                args.push(uvd_recip);
                args.push(bail);
            }
            WalkArgs::Boustrophedon(strip) => {
                args.push(strip.slice());
                args.push(strip.thresh);
            }
        }
    }
}
