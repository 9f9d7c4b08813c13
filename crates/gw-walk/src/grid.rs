use serde::{Deserialize, Serialize};

/// Which dispatch axis carries M tiles.
///
/// With `Mnk` the M tile index lives on axis 0 and the linear walk treats M
/// as the fast dimension; `Nmk` swaps both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoopOrder {
    #[default]
    Mnk,
    Nmk,
}

impl LoopOrder {
    pub fn m_axis(&self) -> usize {
        match self {
            LoopOrder::Mnk => 0,
            LoopOrder::Nmk => 1,
        }
    }

    pub fn n_axis(&self) -> usize {
        match self {
            LoopOrder::Mnk => 1,
            LoopOrder::Nmk => 0,
        }
    }
}

/// The 2-D grid of output tiles to be walked, plus how many workgroups the
/// device can keep resident at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub groups_m: u32,
    pub groups_n: u32,
    pub concurrent_tg: u32,
}

impl TileGrid {
    pub fn new(groups_m: u32, groups_n: u32, concurrent_tg: u32) -> Self {
        Self {
            groups_m,
            groups_n,
            concurrent_tg,
        }
    }

    /// Total number of tiles.
    pub fn group_count(&self) -> u32 {
        self.groups_m.wrapping_mul(self.groups_n)
    }
}
