//! Property tests for the fixed-point reciprocal.

use gw_device::{reciprocal, FastDivisor};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Property: reciprocal division matches integer division for n < 2^31
    #[test]
    fn prop_div_matches_integer_division(x in 1u32..=u32::MAX, n in 0u32..(1u32 << 31)) {
        let d = FastDivisor::new(x);
        prop_assert_eq!(d.div(n), n / x);
        prop_assert_eq!(d.rem(n), n % x);
    }

    /// Property: small divisors, as used for tile counts
    #[test]
    fn prop_tile_count_divisors(x in 1u32..=4096, n in 0u32..=(1u32 << 24)) {
        prop_assert_eq!(FastDivisor::new(x).div(n), n / x);
    }

    /// Property: the emitted word is the 2^(32+ilog2) reciprocal rounded up,
    /// truncated to 32 bits
    #[test]
    fn prop_reciprocal_formula(x in 1u32..=u32::MAX) {
        let shift = 32 + x.ilog2();
        let exact = (1u128 << shift).div_ceil(x as u128);
        prop_assert_eq!(reciprocal(x) as u128, exact & 0xFFFF_FFFF);
    }
}
