//! Uniform float mapping (spec §4.7, component G).
//!
//! Converts an engine's raw integer output (domain `[min, max]`) to a float
//! on one of the four unit-interval variants. Mirrors
//! `utility::u01xx_traits` in `examples/original_source/src/uniformxx.hpp`:
//! enough raw draws are accumulated, base-`(max-min+1)`, to fill the target
//! float's mantissa, then the accumulated digit is scaled into `[0, 1]` and
//! adjusted per variant. Bit-exact parity with the original's float output is
//! not a goal (spec §1 Non-goals: "floating-point determinism across
//! architectures beyond what IEEE-754 ... guarantees"), only the range
//! contract tested in spec §8.1.

use crate::engine::{Engine, RawInt};

/// A float type this module can map engine output onto.
pub trait UniformFloat: Copy + PartialOrd + core::ops::Add<Output = Self> + core::ops::Sub<Output = Self> + core::ops::Mul<Output = Self> {
    /// Bits of mantissa precision (`f32` -> 24 including the implicit bit,
    /// `f64` -> 53), matching `math::numeric_limits<T>::digits` in the
    /// original.
    const MANTISSA_BITS: u32;

    fn zero() -> Self;
    fn one() -> Self;
    /// The smallest representable gap above 1.0 (`FLT_EPSILON`/`DBL_EPSILON`
    /// in the original's `epsilon<T>`).
    fn epsilon() -> Self;
    /// `numerator / denominator`, both within the mantissa's exact-integer
    /// range for the types this trait is implemented for.
    fn from_ratio(numerator: u128, denominator: u128) -> Self;
}

impl UniformFloat for f64 {
    const MANTISSA_BITS: u32 = 53;
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn epsilon() -> Self {
        f64::EPSILON
    }
    fn from_ratio(numerator: u128, denominator: u128) -> Self {
        numerator as f64 / denominator as f64
    }
}

impl UniformFloat for f32 {
    const MANTISSA_BITS: u32 = 24;
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn epsilon() -> Self {
        f32::EPSILON
    }
    fn from_ratio(numerator: u128, denominator: u128) -> Self {
        (numerator as f64 / denominator as f64) as f32
    }
}

/// `ceil(log2(x))` for `x > 0`, `u128` version of `int_math::log2_ceil`
/// (needed here since a domain size of `2^64` doesn't fit `u64`).
fn log2_ceil_u128(x: u128) -> u32 {
    if x <= 1 {
        return 0;
    }
    128 - (x - 1).leading_zeros()
}

/// How many raw draws, and the per-draw scale, needed to fill `F`'s mantissa
/// from an engine whose domain is `[0, domain_size)`.
fn plan(domain_size: u128, mantissa_bits: u32) -> (u32, u128) {
    let domain_bits = log2_ceil_u128(domain_size).max(1);
    let calls = ((mantissa_bits + domain_bits - 1) / domain_bits).max(1);
    (calls, domain_size)
}

/// Accumulate `calls` raw draws from `r`, base-`scale`, into a single
/// non-negative integer in `[0, scale^calls)`.
fn variate<E: Engine>(r: &mut E, calls: u32, min: u128, scale: u128) -> u128 {
    let mut acc: u128 = 0;
    for _ in 0..calls {
        let x = Engine::next_value(r).to_u128() - min;
        acc = acc * scale + x;
    }
    acc
}

/// `x^n` for small `n`, exact in `u128` for the domain sizes this crate's
/// engines expose (at most 64 domain bits, at most 3 calls).
fn pow_u128(mut base: u128, mut n: u32) -> u128 {
    let mut result: u128 = 1;
    while n > 0 {
        if n & 1 == 1 {
            result *= base;
        }
        base *= base;
        n >>= 1;
    }
    result
}

/// `[0, 1]` (spec §4.7).
pub fn uniform_cc<E: Engine, F: UniformFloat>(r: &mut E) -> F {
    let min = E::min().to_u128();
    let max = E::max().to_u128();
    let scale = max - min + 1;
    let (calls, scale) = plan(scale, F::MANTISSA_BITS);
    let acc = variate(r, calls, min, scale);
    let denom = pow_u128(scale, calls) - 1;
    F::from_ratio(acc, denom)
}

/// `[0, 1)` (spec §4.7): `uniform_cc(r) * (1 - eps)`.
///
/// The original (`uniformxx.hpp`'s `co_norm = cc_norm * (1 - eps)`) never
/// divides the raw variate by the domain size directly for this variant —
/// doing so lets the top end of the domain round up to exactly `1.0` once
/// the variate exceeds the target float's mantissa precision (as it always
/// does for a 64-bit-domain engine reduced to an `f64`'s 53 mantissa bits).
/// Scaling the already-computed (and exact, by construction) `[0, 1]` ratio
/// by `1 - eps` instead guarantees the result lands strictly below `1.0`:
/// `eps` is defined as the smallest gap above `1.0`, so `1 - eps` is the
/// largest representable float below it.
pub fn uniform_co<E: Engine, F: UniformFloat>(r: &mut E) -> F {
    let cc = uniform_cc::<E, F>(r);
    cc * (F::one() - F::epsilon())
}

/// `(0, 1]` (spec §4.7): `1 - uniform_co(r)`.
pub fn uniform_oc<E: Engine, F: UniformFloat>(r: &mut E) -> F {
    F::one() - uniform_co::<E, F>(r)
}

/// `(0, 1)` (spec §4.7): `uniform_cc(r) * (1 - 2*eps) + eps`.
pub fn uniform_oo<E: Engine, F: UniformFloat>(r: &mut E) -> F {
    let cc = uniform_cc::<E, F>(r);
    let eps = F::epsilon();
    cc * (F::one() - (eps + eps)) + eps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mrg::Mrg3;
    use crate::mt19937::Mt19937;

    #[test]
    fn co_stays_in_half_open_range() {
        let mut r = Mrg3::default();
        for _ in 0..5000 {
            let x: f64 = uniform_co(&mut r);
            assert!(x >= 0.0 && x < 1.0);
        }
    }

    #[test]
    fn cc_stays_in_closed_range() {
        let mut r = Mrg3::default();
        for _ in 0..5000 {
            let x: f64 = uniform_cc(&mut r);
            assert!((0.0..=1.0).contains(&x));
        }
    }

    #[test]
    fn oc_and_oo_avoid_their_excluded_endpoints() {
        let mut r = Mrg3::default();
        for _ in 0..5000 {
            let oc: f64 = uniform_oc(&mut r);
            assert!(oc > 0.0 && oc <= 1.0);
            let oo: f64 = uniform_oo(&mut r);
            assert!(oo > 0.0 && oo < 1.0);
        }
    }

    #[test]
    fn f32_output_also_stays_in_range() {
        let mut r = Mt19937::default();
        for _ in 0..2000 {
            let x: f32 = uniform_co(&mut r);
            assert!(x >= 0.0 && x < 1.0);
        }
    }

    #[test]
    fn wide_domain_engine_also_stays_in_range() {
        // mt19937's 32-bit domain needs 2 draws to fill an f64 mantissa;
        // exercise that multi-call path explicitly.
        let mut r = Mt19937::default();
        for _ in 0..5000 {
            let x: f64 = uniform_co(&mut r);
            assert!(x >= 0.0 && x < 1.0);
        }
    }

    /// A fixed-output stand-in for a `u64`-domain engine (`Count128`,
    /// `Lcg64`, `Lcg64Shift`), used to pin the top of the domain without
    /// depending on any real engine ever landing on `u64::MAX`.
    #[derive(Clone, Debug, PartialEq)]
    struct MaxAlways(u64);

    impl Engine for MaxAlways {
        type RawOut = u64;
        fn min() -> u64 {
            0
        }
        fn max() -> u64 {
            u64::MAX
        }
        fn name() -> &'static str {
            "max_always"
        }
        fn next_value(&mut self) -> u64 {
            self.0
        }
        fn reseed(&mut self) {}
        fn reseed_u64(&mut self, _seed: u64) {}
        fn reseed_from<R: rand_core::RngCore>(&mut self, _source: &mut R) {}
        fn discard(&mut self, _n: u64) {}
    }

    #[test]
    fn co_stays_below_one_at_the_top_of_a_64_bit_domain() {
        // A single draw of u64::MAX used to round up to exactly 1.0 once
        // narrowed to an f64's 53-bit mantissa; co() must still return
        // strictly less than 1.0 here.
        let mut r = MaxAlways(u64::MAX);
        let x: f64 = uniform_co(&mut r);
        assert!(x < 1.0, "uniform_co at domain max was {x}, expected < 1.0");
        let x: f32 = uniform_co(&mut r);
        assert!(x < 1.0, "uniform_co (f32) at domain max was {x}, expected < 1.0");
    }

    #[test]
    fn cc_reaches_exactly_one_at_the_top_of_a_64_bit_domain() {
        let mut r = MaxAlways(u64::MAX);
        let x: f64 = uniform_cc(&mut r);
        assert_eq!(x, 1.0);
    }

    #[test]
    fn oc_avoids_zero_at_the_top_of_a_64_bit_domain() {
        let mut r = MaxAlways(u64::MAX);
        let x: f64 = uniform_oc(&mut r);
        assert!(x > 0.0, "uniform_oc at domain max was {x}, expected > 0.0");
    }
}
