//! Variable k-slicing of the last wave.
//!
//! When the tile count leaves the final wave of workgroups partially empty,
//! the tiles of that wave (plus one full wave before it) are computed by
//! several workgroups each, every one of them reducing a slice of K. Partial
//! sums are combined through a small number of serialized sync slabs.

use gw_device::{reciprocal, ArgCursor, ArgSink};

use crate::driver_info::{DriverInfo, Loop, TuningHint};

/// Upper bound on padding refinement rounds. Padding strictly shrinks every
/// round that does not converge; descriptor paddings of a few K unrolls
/// settle within three rounds.
pub const MAX_PADDING_ITERATIONS: u32 = 1024;

/// Number of k-slicing phases. Only single-phase slicing is produced; the
/// multi-phase bit in [`KvConfig`] is kept for the kernel's layout.
pub const K_SLICED_PHASES: u32 = 1;

/// First tile index handed to k-sliced workgroups.
///
/// Rounds the tile count down to whole waves, then backs off one more wave
/// so the last plain wave overlaps with the first k-sliced one. A hint that
/// disables variable slicing moves the start past the last tile.
pub fn k_parallel_start(group_count: u32, concurrent_tg: u32, hint: Option<&TuningHint>) -> u32 {
    let ctg = concurrent_tg.max(1);
    let mut start = group_count - group_count % ctg;
    if hint.is_some_and(|h| !h.k_parallel_variable) {
        start = group_count;
    }
    if start > 0 && start != group_count {
        start -= ctg;
    }
    start
}

/// Converged result of [`refine_padding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingFixpoint {
    /// Padding after refinement.
    pub k_padding: i64,
    /// K rounded up to the unroll factor, padding included.
    pub k_padded: i64,
    /// `k_padded` summed over every tile of one phase.
    pub k_total: i64,
    /// K extent handled by one k-sliced workgroup.
    pub k0: i64,
    pub iterations: u32,
}

/// Shrink the requested K padding to at most twice the per-workgroup K
/// extent, recomputing that extent until the padding stops changing.
pub fn refine_padding(
    k: i32,
    k_padding: i32,
    unroll_k: u32,
    tiles_per_phase: u32,
    concurrent_tg: u32,
) -> PaddingFixpoint {
    let unroll = unroll_k.max(1) as i64;
    let ctg = concurrent_tg.max(1) as i64;
    let tiles = tiles_per_phase as i64;
    let k = k as i64;

    let mut state = PaddingFixpoint {
        k_padding: k_padding as i64,
        k_padded: k,
        k_total: 0,
        k0: k,
        iterations: 0,
    };

    loop {
        let k_padded = round_up(k + state.k_padding, unroll);
        let k_total = k_padded * tiles;
        let iterations = state.iterations + 1;

        if k_total == 0 {
            return PaddingFixpoint {
                k_padded,
                k_total,
                iterations,
                ..state
            };
        }

        let k0 = round_up(div_ceil(k_total, ctg), unroll);
        let k_padding = state.k_padding.min(2 * k0);
        let converged = k_padding == state.k_padding;

        state = PaddingFixpoint {
            k_padding,
            k_padded,
            k_total,
            k0,
            iterations,
        };
        log::trace!(
            "k padding round {}: padded={} k0={} padding={}",
            iterations,
            k_padded,
            k0,
            k_padding
        );

        if converged {
            return state;
        }
        if iterations >= MAX_PADDING_ITERATIONS {
            log::warn!(
                "k padding did not settle after {} rounds (padding={}, k0={})",
                iterations,
                k_padding,
                k0
            );
            return state;
        }
    }
}

/// Packed k-slicing configuration word.
///
/// Bits 0..16 hold the k-sliced tile count, bits 16..31 the sync slab count
/// and bit 31 flags multi-phase slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KvConfig {
    pub sliced_tiles: u32,
    pub sync_slabs: u32,
    pub multi_phase: bool,
}

impl KvConfig {
    pub fn pack(&self) -> u32 {
        let mut word = self.sliced_tiles | (self.sync_slabs << 16);
        if self.multi_phase {
            word |= 0x8000_0000;
        }
        word
    }
}

/// Variable k-slicing decisions for one launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KParallelPlan {
    pub k_parallel_start: u32,
    pub k_sliced_tiles: u32,
    pub k_parallel_groups: u32,
    pub k_sync_slabs: u32,
    pub k_padded: i64,
    pub k0: u32,
    pub kv_config: KvConfig,
    /// Reciprocal of the K extent left after the synchronized slabs.
    pub k_recip: u32,
    /// Workgroups to dispatch: plain tiles plus k-sliced workgroups.
    pub group_count: u32,
    pub padding: PaddingFixpoint,
}

impl KParallelPlan {
    pub fn compute(
        group_count: u32,
        concurrent_tg: u32,
        k: i32,
        info: &DriverInfo,
        hint: Option<&TuningHint>,
    ) -> Self {
        let ctg = concurrent_tg.max(1);
        let k_parallel_start = k_parallel_start(group_count, ctg, hint);
        let k_sliced_tiles = group_count - k_parallel_start;
        let tiles_per_phase = k_sliced_tiles.div_ceil(K_SLICED_PHASES);

        let padding = refine_padding(
            k,
            info.k_padding,
            info.unroll(Loop::K),
            tiles_per_phase,
            ctg,
        );
        let k_padded = padding.k_padded;

        let mut k_parallel_groups = 0;
        let mut k_sync_slabs = 0;
        let mut total_groups = k_parallel_start;

        if padding.k0 > 0 {
            k_parallel_groups = div_ceil(padding.k_total, padding.k0) as u32;
            if K_SLICED_PHASES > 1 {
                k_parallel_groups = ctg;
            }
            total_groups += k_parallel_groups * K_SLICED_PHASES;

            if tiles_per_phase > 0 {
                let slabs = (k_parallel_groups + (tiles_per_phase >> 1)).saturating_sub(1);
                let max_slabs = ((k_padded - 1) / padding.k0).max(0) as u32;
                k_sync_slabs = slabs.min(max_slabs);
            }
        }

        let k0 = padding.k0 as u32;
        let k_unsynced = (k_padded - k_sync_slabs as i64 * padding.k0) as u32;

        Self {
            k_parallel_start,
            k_sliced_tiles,
            k_parallel_groups,
            k_sync_slabs,
            k_padded,
            k0,
            kv_config: KvConfig {
                sliced_tiles: k_sliced_tiles,
                sync_slabs: k_sync_slabs,
                multi_phase: K_SLICED_PHASES > 1,
            },
            k_recip: reciprocal(k_unsynced),
            group_count: total_groups,
            padding,
        }
    }

    /// Append `k0`, the packed config word and the K reciprocal.
    pub fn emit<S: ArgSink>(&self, args: &mut ArgCursor<'_, S>) {
        args.push(self.k0);
        args.push(self.kv_config.pack());
        args.push(self.k_recip);
    }
}

fn round_up(a: i64, b: i64) -> i64 {
    div_ceil(a, b) * b
}

fn div_ceil(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(unroll_k: u32, k_padding: i32) -> DriverInfo {
        DriverInfo::default()
            .with_unroll(32, 32, unroll_k)
            .with_k_parallel_variable(k_padding)
    }

    #[test]
    fn test_start_within_first_wave() {
        assert_eq!(k_parallel_start(16, 64, None), 0);
    }

    #[test]
    fn test_start_backs_off_one_wave() {
        // 100 -> 96 -> 64
        assert_eq!(k_parallel_start(100, 32, None), 64);
    }

    #[test]
    fn test_start_on_exact_waves() {
        assert_eq!(k_parallel_start(96, 32, None), 96);
    }

    #[test]
    fn test_start_hint() {
        let off = TuningHint {
            k_parallel_variable: false,
        };
        let on = TuningHint {
            k_parallel_variable: true,
        };
        assert_eq!(k_parallel_start(100, 32, Some(&off)), 100);
        assert_eq!(k_parallel_start(16, 64, Some(&off)), 16);
        assert_eq!(k_parallel_start(100, 32, Some(&on)), 64);
    }

    #[test]
    fn test_padding_unchanged() {
        let fix = refine_padding(256, 0, 32, 16, 64);
        assert_eq!(fix.k_padded, 256);
        assert_eq!(fix.k_total, 4096);
        assert_eq!(fix.k0, 64);
        assert_eq!(fix.k_padding, 0);
        assert_eq!(fix.iterations, 1);
    }

    #[test]
    fn test_padding_shrinks() {
        // 1064 -> k0 24 -> padding 48 -> k0 8 -> padding 16 -> stable
        let fix = refine_padding(64, 1000, 8, 1, 64);
        assert_eq!(fix.k_padding, 16);
        assert_eq!(fix.k_padded, 80);
        assert_eq!(fix.k0, 8);
        assert_eq!(fix.iterations, 3);
    }

    #[test]
    fn test_padding_no_tiles() {
        let fix = refine_padding(100, 8, 16, 0, 64);
        assert_eq!(fix.k_total, 0);
        assert_eq!(fix.k_padded, 112);
        assert_eq!(fix.k0, 100);
        assert_eq!(fix.iterations, 1);
    }

    #[test]
    fn test_padding_settles_quickly() {
        for k in [64, 256, 1000, 4096, 65536] {
            for padding in [0, 32, 64, 128] {
                for unroll in [16, 32, 64] {
                    for tiles in 1..130 {
                        for ctg in [8, 56, 64, 512] {
                            let fix = refine_padding(k, padding, unroll, tiles, ctg);
                            assert!(
                                fix.iterations <= 8,
                                "k={} padding={} unroll={} tiles={} ctg={} took {}",
                                k,
                                padding,
                                unroll,
                                tiles,
                                ctg,
                                fix.iterations
                            );
                            assert!(fix.k_padding <= padding as i64);
                            assert_eq!(fix.k_padded % unroll as i64, 0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_padding_converges_from_large_requests() {
        for k in [1, 7, 255, 4097] {
            for padding in [4096, 100_000] {
                for unroll in [1, 8, 64] {
                    for tiles in [1, 3, 63] {
                        for ctg in [1, 8, 64] {
                            let fix = refine_padding(k, padding, unroll, tiles, ctg);
                            assert!(fix.iterations < MAX_PADDING_ITERATIONS);
                            // One more round leaves the padding unchanged.
                            let again = refine_padding(k, fix.k_padding as i32, unroll, tiles, ctg);
                            assert_eq!(again.k_padding, fix.k_padding);
                            assert_eq!(again.k0, fix.k0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_plan_single_wave() {
        let plan = KParallelPlan::compute(16, 64, 256, &info(32, 0), None);
        assert_eq!(plan.k_parallel_start, 0);
        assert_eq!(plan.k_sliced_tiles, 16);
        assert_eq!(plan.k0, 64);
        assert_eq!(plan.k_parallel_groups, 64);
        assert_eq!(plan.group_count, 64);
        // min(64 + 8 - 1, 255 / 64)
        assert_eq!(plan.k_sync_slabs, 3);
        assert_eq!(plan.kv_config.pack(), 16 | (3 << 16));
        // 256 - 3 * 64 = 64, a power of two
        assert_eq!(plan.k_recip, 0);
    }

    #[test]
    fn test_plan_tail_wave() {
        let plan = KParallelPlan::compute(100, 32, 1000, &info(16, 64), None);
        assert_eq!(plan.k_parallel_start, 64);
        assert_eq!(plan.k_sliced_tiles, 36);
        assert_eq!(plan.k_padded, 1072);
        assert_eq!(plan.k0, 1216);
        assert_eq!(plan.k_parallel_groups, 32);
        assert_eq!(plan.group_count, 96);
        assert_eq!(plan.k_sync_slabs, 0);
        assert_eq!(plan.kv_config.pack(), 36);
        assert_eq!(plan.k_recip, reciprocal(1072));
    }

    #[test]
    fn test_plan_disabled_by_hint() {
        let hint = TuningHint {
            k_parallel_variable: false,
        };
        let plan = KParallelPlan::compute(16, 64, 256, &info(32, 0), Some(&hint));
        assert_eq!(plan.k_sliced_tiles, 0);
        assert_eq!(plan.k_parallel_groups, 0);
        assert_eq!(plan.k_sync_slabs, 0);
        assert_eq!(plan.group_count, 16);
        assert_eq!(plan.kv_config.pack(), 0);
        assert_eq!(plan.k0, 256);
        assert_eq!(plan.k_recip, reciprocal(256));
    }

    #[test]
    fn test_kv_config_layout() {
        let kv = KvConfig {
            sliced_tiles: 0x1234,
            sync_slabs: 0x56,
            multi_phase: true,
        };
        assert_eq!(kv.pack(), 0x8056_1234);
    }

    #[test]
    fn test_slab_bound() {
        for group_count in [1u32, 5, 17, 64, 65, 130, 1000] {
            for k in [1, 33, 512, 4096] {
                let plan = KParallelPlan::compute(group_count, 64, k, &info(16, 32), None);
                assert_eq!(plan.k_sliced_tiles + plan.k_parallel_start, group_count);
                assert!(plan.k0 > 0);
                assert!(plan.k_sync_slabs as i64 <= (plan.k_padded - 1) / plan.k0 as i64);
            }
        }
    }
}
