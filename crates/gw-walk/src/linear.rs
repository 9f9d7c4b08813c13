use gw_device::reciprocal;

use crate::grid::{LoopOrder, TileGrid};
use crate::planner::{WalkArgs, WalkPlanner};

/// Plain linear walk over the tile grid.
///
/// The kernel splits its linear id into (outer, inner) coordinates by
/// multiplying with the reciprocal of the fast dimension's tile count.
pub struct LinearPlanner {
    loop_order: LoopOrder,
}

impl LinearPlanner {
    pub fn new(loop_order: LoopOrder) -> Self {
        Self { loop_order }
    }

    /// Tile count along the dimension that varies fastest with the id.
    pub fn fast_groups(&self, grid: &TileGrid) -> u32 {
        match self.loop_order {
            LoopOrder::Mnk => grid.groups_m,
            LoopOrder::Nmk => grid.groups_n,
        }
    }
}

impl WalkPlanner for LinearPlanner {
    fn name(&self) -> &str {
        "linear"
    }

    fn plan(&self, grid: &TileGrid) -> WalkArgs {
        WalkArgs::Linear {
            gcmn_recip: reciprocal(self.fast_groups(grid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recip_follows_loop_order() {
        let grid = TileGrid::new(3, 5, 64);
        assert_eq!(
            LinearPlanner::new(LoopOrder::Mnk).plan(&grid),
            WalkArgs::Linear {
                gcmn_recip: reciprocal(3)
            }
        );
        assert_eq!(
            LinearPlanner::new(LoopOrder::Nmk).plan(&grid),
            WalkArgs::Linear {
                gcmn_recip: reciprocal(5)
            }
        );
    }
}
