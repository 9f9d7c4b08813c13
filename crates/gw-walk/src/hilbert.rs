use gw_device::reciprocal;

use crate::grid::TileGrid;
use crate::planner::{WalkArgs, WalkPlanner};

/// Remaining-tile count below which the kernel abandons the curve and scans
/// linearly when curve ordering is disabled for a launch.
pub const DISABLED_BAIL: u32 = 512;

/// Bail threshold used when curve ordering is enabled.
pub const ENABLED_BAIL: u32 = 1;

/// Which tile dimension the curve's stripes run along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// `groups_n >= groups_m`.
    Wide,
    /// `groups_n < groups_m`; packed by setting the high 16 bits.
    Tall,
}

/// Stripe width of the curve together with its orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HilbertSpan {
    pub orientation: Orientation,
    pub magnitude: u32,
}

impl HilbertSpan {
    /// Kernel word: the magnitude, with the top 16 bits set for `Tall`.
    pub fn pack(&self) -> u32 {
        match self.orientation {
            Orientation::Wide => self.magnitude,
            Orientation::Tall => self.magnitude | 0xFFFF_0000,
        }
    }
}

/// Space-filling curve walk (serpentine diagonal stripes).
pub struct HilbertPlanner {
    disable_hilbert: bool,
}

impl HilbertPlanner {
    pub fn new(disable_hilbert: bool) -> Self {
        Self { disable_hilbert }
    }

    /// Stripe span and the tile count of one full stripe (`uvd`).
    pub fn span(grid: &TileGrid) -> (HilbertSpan, u32) {
        let gm = grid.groups_m as f64;
        let gn = grid.groups_n as f64;
        let ratio = gn / gm;

        if ratio >= 1.0 {
            let vd = (gn / (2.0 * ratio).round()).ceil() as u32;
            let span = HilbertSpan {
                orientation: Orientation::Wide,
                magnitude: vd,
            };
            (span, grid.groups_m.wrapping_mul(vd))
        } else {
            let vd = (gm / (2.0 / ratio).round()).ceil() as u32;
            let span = HilbertSpan {
                orientation: Orientation::Tall,
                magnitude: vd,
            };
            (span, grid.groups_n.wrapping_mul(vd))
        }
    }
}

impl WalkPlanner for HilbertPlanner {
    fn name(&self) -> &str {
        "hilbert"
    }

    fn plan(&self, grid: &TileGrid) -> WalkArgs {
        let (span, uvd) = Self::span(grid);
        let bail = if self.disable_hilbert {
            DISABLED_BAIL
        } else {
            ENABLED_BAIL
        };

        WalkArgs::Hilbert {
            span,
            uvd_recip: reciprocal(uvd),
            bail,
        }
    }
}
