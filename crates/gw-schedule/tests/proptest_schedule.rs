//! Property tests for dispatch scheduling.

use gw_device::{DeviceCapacity, DispatchGrid, Range3};
use gw_schedule::{DispatchPlan, DriverInfo, KParallelPlan, ProblemDims, WalkOrder};
use gw_walk::LoopOrder;
use proptest::prelude::*;

fn walk_order() -> impl Strategy<Value = WalkOrder> {
    prop::sample::select(vec![
        WalkOrder::Trivial,
        WalkOrder::SimpleLinear,
        WalkOrder::Hilbert,
        WalkOrder::Boustrophedon,
    ])
}

fn loop_order() -> impl Strategy<Value = LoopOrder> {
    prop::sample::select(vec![LoopOrder::Mnk, LoopOrder::Nmk])
}

fn pow2(max_log: u32) -> impl Strategy<Value = u32> {
    (0..=max_log).prop_map(|e| 1u32 << e)
}

prop_compose! {
    fn driver_info()(
        walk in walk_order(),
        loop_order in loop_order(),
        k_parallel in any::<bool>(),
        fused_beta in any::<bool>(),
        kvar in any::<bool>(),
        k_padding in 0i32..=512,
        persistent in any::<bool>(),
        unroll in (pow2(6), pow2(6), pow2(6)),
        wg in (pow2(3), pow2(3), 1u32..=2),
        grf in prop::sample::select(vec![128u32, 256]),
        extra in 0u32..=4,
    ) -> DriverInfo {
        let mut info = DriverInfo::default()
            .with_walk_order(walk)
            .with_loop_order(loop_order)
            .with_unroll(unroll.0, unroll.1, unroll.2)
            .with_wg(wg.0, wg.1, wg.2)
            .with_grf_count(grf)
            .with_extra_wgs(extra);
        if k_parallel {
            info = info.with_k_parallel(fused_beta);
        }
        if kvar {
            info = info.with_k_parallel_variable(k_padding);
        }
        if persistent {
            info = info.with_persistent();
        }
        info
    }
}

prop_compose! {
    fn launch()(
        groups in (1usize..=64, 1usize..=64, 1usize..=4),
        local in (pow2(5), 1usize..=4, 1usize..=2),
    ) -> DispatchGrid {
        let local = Range3::new(local.0 as usize, local.1, local.2);
        let global = Range3::new(groups.0 * local[0], groups.1 * local[1], groups.2 * local[2]);
        DispatchGrid::new(global, local).unwrap()
    }
}

prop_compose! {
    fn capacity()(slices in 1u32..=16, tps in 16u32..=512) -> DeviceCapacity {
        DeviceCapacity::new(slices, tps, tps / 2)
    }
}

fn expected_arg_count(info: &DriverInfo) -> usize {
    let prelude = usize::from(info.k_parallel && info.fused_beta);
    let walk = match info.walk_order {
        WalkOrder::Trivial => return prelude,
        WalkOrder::SimpleLinear => 1,
        WalkOrder::Hilbert => 3,
        WalkOrder::Boustrophedon => 2,
    };
    prelude
        + 2
        + walk
        + if info.k_parallel_variable { 3 } else { 0 }
        + usize::from(info.persistent)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: the argument block has a fixed shape per kernel
    #[test]
    fn prop_arg_count(info in driver_info(), grid in launch(), caps in capacity(), k in 1i32..=1 << 16) {
        let plan = DispatchPlan::compute(grid, ProblemDims::new(1, 1, k), false, &info, None, &caps);
        prop_assert_eq!(plan.args.len(), expected_arg_count(&info));
    }

    /// Property: the same inputs always produce the same launch
    #[test]
    fn prop_deterministic(info in driver_info(), grid in launch(), caps in capacity(), k in 1i32..=1 << 16, dh in any::<bool>()) {
        let dims = ProblemDims::new(1, 1, k);
        let a = DispatchPlan::compute(grid, dims, dh, &info, None, &caps);
        let b = DispatchPlan::compute(grid, dims, dh, &info, None, &caps);
        prop_assert_eq!(a, b);
    }

    /// Property: ordered walks flatten onto axis 0 in whole workgroups and
    /// keep the batch axis
    #[test]
    fn prop_grid_shape(info in driver_info(), grid in launch(), caps in capacity(), k in 1i32..=1 << 16) {
        let plan = DispatchPlan::compute(grid, ProblemDims::new(1, 1, k), false, &info, None, &caps);
        if info.walk_order == WalkOrder::Trivial {
            prop_assert_eq!(plan.grid, grid);
        } else {
            let out = plan.grid;
            prop_assert_eq!(out.local, grid.local);
            prop_assert_eq!(out.global[0] % out.local[0], 0);
            prop_assert!(out.groups(0) > info.extra_wgs as usize);
            prop_assert_eq!(out.global[1], out.local[1]);
            prop_assert_eq!(out.global[2], grid.global[2]);
        }
    }

    /// Property: persistent kernels never dispatch more than one resident wave
    #[test]
    fn prop_persistent_fits_one_wave(info in driver_info(), grid in launch(), caps in capacity(), k in 1i32..=1 << 16) {
        prop_assume!(info.persistent && info.walk_order != WalkOrder::Trivial);
        let plan = DispatchPlan::compute(grid, ProblemDims::new(1, 1, k), false, &info, None, &caps);
        let ctg = caps.concurrent_groups(info.grf_mode(), grid.threads_per_group() as u32);
        let group_count = *plan.words().last().unwrap();
        prop_assert!(group_count <= ctg);
        prop_assert_eq!(plan.grid.groups(0), (group_count + info.extra_wgs) as usize);
    }

    /// Property: k-sliced tiles are exactly the tail after the start tile and
    /// their workgroups cover the padded K of every sliced tile
    #[test]
    fn prop_k_slicing_covers_tail(
        group_count in 1u32..=4096,
        ctg in 1u32..=256,
        k in 1i32..=1 << 20,
        k_padding in 0i32..=4096,
        unroll_k in pow2(6),
    ) {
        let info = DriverInfo::default()
            .with_unroll(32, 32, unroll_k)
            .with_k_parallel_variable(k_padding);
        let kp = KParallelPlan::compute(group_count, ctg, k, &info, None);

        prop_assert_eq!(kp.k_parallel_start + kp.k_sliced_tiles, group_count);
        prop_assert!(kp.k_sliced_tiles <= 2 * ctg);
        prop_assert_eq!(kp.group_count, kp.k_parallel_start + kp.k_parallel_groups);
        if kp.k_sliced_tiles > 0 {
            prop_assert_eq!(kp.k0 % unroll_k, 0);
        }
        prop_assert!(kp.padding.k_padding <= k_padding as i64);
        prop_assert!(kp.k_parallel_groups as i64 * kp.k0 as i64 >= kp.padding.k_total);
        prop_assert!((kp.k_sync_slabs as i64) * (kp.k0 as i64) < kp.k_padded.max(1));
        prop_assert_eq!(kp.kv_config.pack() & 0xFFFF, kp.k_sliced_tiles);
    }
}
