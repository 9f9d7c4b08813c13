//! `gw-walk` - Tile walk-order planners for gemm-walk.
//!
//! Each planner turns a tile grid and the device's resident-workgroup count
//! into the kernel arguments the compiled GEMM kernel uses to map its linear
//! dispatch id back onto a tile.

pub mod boustrophedon;
pub mod grid;
pub mod hilbert;
pub mod linear;
pub mod planner;

pub use boustrophedon::{BoustrophedonPlanner, SliceAxis, Strip, StripTarget};
pub use grid::{LoopOrder, TileGrid};
pub use hilbert::{HilbertPlanner, HilbertSpan, Orientation};
pub use linear::LinearPlanner;
pub use planner::{WalkArgs, WalkPlanner};
