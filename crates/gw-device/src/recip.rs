//! Fixed-point reciprocals for division-free integer division on the device.
//!
//! The device computes `n / x` as `(n * reciprocal(x)) >> (32 + ilog2(x))`
//! using a 32x32->64 multiply. The reciprocal is rounded up, which keeps the
//! quotient exact for every `n < 2^31`.

/// Fixed-point reciprocal of `x`, as passed to the kernel.
///
/// Returns 0 for `x == 0`. For powers of two the 33-bit value `2^32` does not
/// fit and the result wraps to 0 as well; the device divides by a shift in
/// that case.
pub fn reciprocal(x: u32) -> u32 {
    if x == 0 {
        return 0;
    }
    ((1u64 << 32 << x.ilog2()).div_ceil(x as u64)) as u32
}

/// Host-side model of the device's reciprocal division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastDivisor {
    divisor: u32,
    recip: u32,
    shift: u32,
}

impl FastDivisor {
    pub fn new(divisor: u32) -> Self {
        Self {
            divisor,
            recip: reciprocal(divisor),
            shift: divisor.checked_ilog2().unwrap_or(0),
        }
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// The word handed to the kernel.
    pub fn recip(&self) -> u32 {
        self.recip
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Quotient `n / divisor`, exact for `n < 2^31`.
    ///
    /// A zero divisor yields zero.
    pub fn div(&self, n: u32) -> u32 {
        match (self.divisor, self.recip) {
            (0, _) => 0,
            (_, 0) => n >> self.shift,
            (_, recip) => ((n as u64 * recip as u64) >> (32 + self.shift)) as u32,
        }
    }

    /// Remainder `n % divisor`, derived from [`FastDivisor::div`].
    pub fn rem(&self, n: u32) -> u32 {
        n - self.div(n) * self.divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(reciprocal(0), 0);
        assert_eq!(FastDivisor::new(0).div(17), 0);
    }

    #[test]
    fn test_known_values() {
        // ceil(2^33 / 3)
        assert_eq!(reciprocal(3), 2_863_311_531);
        // ceil(2^34 / 5)
        assert_eq!(reciprocal(5), 3_435_973_837);
        // ceil(2^34 / 7)
        assert_eq!(reciprocal(7), 2_454_267_027);
    }

    #[test]
    fn test_power_of_two_wraps() {
        for shift in 0..32 {
            assert_eq!(reciprocal(1 << shift), 0);
        }
        let d = FastDivisor::new(16);
        assert_eq!(d.shift(), 4);
        assert_eq!(d.div(100), 6);
        assert_eq!(d.rem(100), 4);
    }

    #[test]
    fn test_exact_multiples() {
        // Rounding the reciprocal down would give 0 here.
        let d = FastDivisor::new(3);
        assert_eq!(d.div(3), 1);
        assert_eq!(d.div(6), 2);
        assert_eq!(d.div(2_147_483_646), 715_827_882);
    }

    #[test]
    fn test_small_divisors_exhaustive() {
        for x in 1..=64u32 {
            let d = FastDivisor::new(x);
            for n in 0..4096u32 {
                assert_eq!(d.div(n), n / x, "n={} x={}", n, x);
                assert_eq!(d.rem(n), n % x, "n={} x={}", n, x);
            }
        }
    }

    #[test]
    fn test_large_divisor() {
        let d = FastDivisor::new(u32::MAX);
        assert_eq!(d.shift(), 31);
        assert_eq!(d.div(i32::MAX as u32), 0);
    }
}
