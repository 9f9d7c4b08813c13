//! Boustrophedon (serpentine strip) walk.
//!
//! The tile grid is cut into strips along one axis and the kernel snakes
//! through each strip. Strip widths are chosen so that the set of
//! concurrently resident workgroups covers a region that is as close to
//! square as possible in output elements, not in tiles.

use crate::grid::TileGrid;
use crate::planner::{WalkArgs, WalkPlanner};

/// The axis whose tiles are partitioned into strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceAxis {
    M,
    N,
}

/// One strip layout.
///
/// On the wire the axis is the sign of `slice` (negative for [`SliceAxis::N`])
/// and `thresh` is passed through unchanged. A negative `thresh` marks the
/// layout where strips below the boundary are one tile narrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strip {
    pub axis: SliceAxis,
    pub width: u32,
    pub thresh: i32,
}

impl Strip {
    /// Signed strip width as the kernel reads it.
    pub fn slice(&self) -> i32 {
        match self.axis {
            SliceAxis::M => self.width as i32,
            SliceAxis::N => -(self.width as i32),
        }
    }
}

/// Ideal strip widths, in tiles, for each slicing axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripTarget {
    pub sm: f64,
    pub sn: f64,
}

impl StripTarget {
    /// `bias` is the M:N aspect ratio of one tile in elements.
    pub fn new(bias: f64, concurrent_tg: u32) -> Self {
        let ctg = concurrent_tg as f64;
        Self {
            sm: (ctg / bias).sqrt(),
            sn: (ctg * bias).sqrt(),
        }
    }

    pub fn along(&self, axis: SliceAxis) -> f64 {
        match axis {
            SliceAxis::M => self.sm,
            SliceAxis::N => self.sn,
        }
    }
}

pub struct BoustrophedonPlanner {
    bias: f64,
}

impl BoustrophedonPlanner {
    /// `bias` is `(wg_m * unroll_m) / (wg_n * unroll_n)`. Non-finite or
    /// non-positive values are treated as square tiles.
    pub fn new(bias: f64) -> Self {
        let bias = if bias.is_finite() && bias > 0.0 {
            bias
        } else {
            log::warn!("boustrophedon bias {} is not a positive ratio; using 1", bias);
            1.0
        };
        Self { bias }
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Choose the strip layout for `grid`.
    pub fn strip(&self, grid: &TileGrid) -> Strip {
        let target = StripTarget::new(self.bias, grid.concurrent_tg);
        let ctg = grid.concurrent_tg as i64;
        let gm = grid.groups_m as i64;
        let gn = grid.groups_n as i64;

        // Cut strips across the smaller dimension first.
        let first = if gm > gn { SliceAxis::N } else { SliceAxis::M };
        let second = match first {
            SliceAxis::M => SliceAxis::N,
            SliceAxis::N => SliceAxis::M,
        };

        for axis in [first, second] {
            let (gc, gco) = match axis {
                SliceAxis::M => (gm, gn),
                SliceAxis::N => (gn, gm),
            };

            let s = target.along(axis);
            let mut sf = s.floor() as i64;
            let mut sc = (s.ceil() as i64).max(1);
            if ctg % sc == 0 {
                sf = sc;
            }
            if ctg % (sc + 1) == 0 {
                sc += 1;
                sf = sc;
            }

            // Candidates: ceiling, ceiling with the next width up as the
            // neighbour, then floor.
            for (s0, up) in [(sc, false), (sc, true), (sf, false)] {
                let s1 = if up { s0 + 1 } else { s0 - 1 };
                if s1 <= 0 {
                    continue;
                }

                let rem = gc % s0;
                let thresh = if rem == 0 || up {
                    gc / s0 - rem
                } else {
                    div_ceil(gc, s0) - (s0 - rem)
                };

                if thresh >= 0 && gco >= 2 * s0.max(s1) {
                    let strip = encode(axis, s0, thresh, gc, up);
                    log::trace!(
                        "boustrophedon: {}x{} tiles, ctg={}, width {} along {:?} (up={})",
                        gm,
                        gn,
                        ctg,
                        s0,
                        axis,
                        up
                    );
                    return strip;
                }
            }
        }

        self.fallback(grid, &target)
    }

    /// Single proportional slice along the smaller dimension, used when no
    /// candidate leaves room for two full passes per strip.
    pub fn fallback(&self, grid: &TileGrid, target: &StripTarget) -> Strip {
        let axis = if grid.groups_m > grid.groups_n {
            SliceAxis::N
        } else {
            SliceAxis::M
        };
        let s = target.along(axis);
        let gc = match axis {
            SliceAxis::M => grid.groups_m as i64,
            SliceAxis::N => grid.groups_n as i64,
        };

        let width = if (gc as f64) < s * 1.5 {
            gc
        } else {
            let rounded = (s.round() as i64).max(1);
            gc / div_ceil(gc, rounded)
        };

        if width == 0 {
            log::debug!("boustrophedon: degenerate tile grid, using linear strips");
            return Strip {
                axis: SliceAxis::M,
                width: 1,
                thresh: grid.groups_m as i32,
            };
        }

        let thresh = (gc / width - gc % width).max(0);
        log::debug!(
            "boustrophedon: fallback width {} along {:?}, thresh {}",
            width,
            axis,
            thresh
        );
        Strip {
            axis,
            width: width as u32,
            thresh: thresh as i32,
        }
    }
}

impl WalkPlanner for BoustrophedonPlanner {
    fn name(&self) -> &str {
        "boustrophedon"
    }

    fn plan(&self, grid: &TileGrid) -> WalkArgs {
        WalkArgs::Boustrophedon(self.strip(grid))
    }
}

fn encode(axis: SliceAxis, s0: i64, thresh: i64, gc: i64, up: bool) -> Strip {
    let (width, thresh) = match (up, thresh > 0) {
        (true, _) => (s0, thresh),
        (false, true) => (s0, -thresh),
        // Every strip is exactly s0 - 1 wide plus one extra tile.
        (false, false) => (s0 - 1, gc),
    };
    Strip {
        axis,
        width: width as u32,
        thresh: thresh as i32,
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}
