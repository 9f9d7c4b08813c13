use gw_device::{ArgCursor, ArgSink, DeviceCapacity, DispatchGrid};
use gw_walk::{BoustrophedonPlanner, HilbertPlanner, LinearPlanner, TileGrid, WalkPlanner};

use crate::dims::ProblemDims;
use crate::driver_info::{DriverInfo, TuningHint, WalkOrder};
use crate::kparallel::KParallelPlan;

/// Planner for the kernel's walk order, or `None` for natural dispatch.
pub fn walk_planner(info: &DriverInfo, disable_hilbert: bool) -> Option<Box<dyn WalkPlanner>> {
    match info.walk_order {
        WalkOrder::Trivial => None,
        WalkOrder::SimpleLinear => Some(Box::new(LinearPlanner::new(info.loop_order))),
        WalkOrder::Hilbert => Some(Box::new(HilbertPlanner::new(disable_hilbert))),
        WalkOrder::Boustrophedon => Some(Box::new(BoustrophedonPlanner::new(info.tile_bias()))),
    }
}

/// Append the tile-ordering arguments for one GEMM launch and flatten the
/// grid onto axis 0.
///
/// Arguments are written through `args` in this order, each block present
/// only when its condition holds:
///
/// 1. `groups_k` (k-parallel kernels with a fused beta epilogue)
/// 2. `groups_m`, `groups_n` (any non-trivial walk order)
/// 3. the walk block: `gcmn_recip` | `vd, uvd_recip, bail` | `slice, thresh`
/// 4. `k0, kv_config, k_recip` (variable k-slicing)
/// 5. `group_count` (persistent kernels)
///
/// For a trivial walk order the grid is left as is. Otherwise
/// `grid.global[0]` becomes `local[0] * (group_count + extra_wgs)` and axis 1
/// collapses to a single workgroup.
///
/// The grid must have non-zero local extents (see [`DispatchGrid::new`]).
pub fn schedule<S: ArgSink>(
    args: &mut ArgCursor<'_, S>,
    grid: &mut DispatchGrid,
    dims: ProblemDims,
    disable_hilbert: bool,
    info: &DriverInfo,
    hint: Option<&TuningHint>,
    caps: &DeviceCapacity,
) {
    if info.k_parallel && info.fused_beta {
        let groups_k = grid.groups(2) as u32;
        args.push(groups_k);
    }

    let planner = match walk_planner(info, disable_hilbert) {
        Some(p) => p,
        None => return,
    };

    let groups_m = grid.groups(info.loop_order.m_axis()) as u32;
    let groups_n = grid.groups(info.loop_order.n_axis()) as u32;
    let concurrent_tg = caps.concurrent_groups(info.grf_mode(), grid.threads_per_group() as u32);
    let tiles = TileGrid::new(groups_m, groups_n, concurrent_tg);
    let mut group_count = tiles.group_count();

    args.push(groups_m);
    args.push(groups_n);

    let walk = planner.plan(&tiles);
    walk.emit(args);

    if info.k_parallel_variable {
        let kp = KParallelPlan::compute(group_count, concurrent_tg, dims.k, info, hint);
        log::debug!(
            "k-slicing {} of {} tiles: k0={} groups={} slabs={}",
            kp.k_sliced_tiles,
            group_count,
            kp.k0,
            kp.k_parallel_groups,
            kp.k_sync_slabs
        );
        kp.emit(args);
        group_count = kp.group_count;
    }

    if info.persistent {
        group_count = group_count.min(concurrent_tg);
        args.push(group_count);
    }

    grid.global[0] = grid.local[0] * (group_count as usize + info.extra_wgs as usize);
    grid.global[1] = grid.local[1];

    log::debug!(
        "{} walk for {}x{}x{}: {}x{} tiles, {} resident, {:?} -> {}",
        planner.name(),
        dims.m,
        dims.n,
        dims.k,
        groups_m,
        groups_n,
        concurrent_tg,
        walk,
        grid
    );
}
