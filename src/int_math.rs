//! Modular integer kernel (spec §4.1, component A).
//!
//! `modulo_invers` is the extended-Euclid inverse used by Gaussian
//! elimination (`linalg::gauss_solve`) after a `split`. `fast_modulo`
//! eliminates integer division from the MRG recurrence's hot loop by
//! exploiting that every modulus this crate ships is of the form `2^e - k`
//! for a small `k`. `modular_power` is plain right-to-left binary
//! exponentiation built on top of `fast_modulo`.

use crate::error::{Result, TrngError};
use wrapping_arithmetic::wrappit;

/// A prime modulus of the form `2^E - K`, known at compile time.
///
/// `E` is `ceil(log2(P))`; `MASK` is `2^E - 1`; `K` is `MASK + 1 - P`.
/// The three moduli named in spec §3.2/§6.3 all satisfy this shape, which is
/// what makes `fast_modulo` division-free.
pub trait Prime: Copy + Clone + core::fmt::Debug + Eq + 'static {
    /// The prime modulus itself.
    const P: i64;
    /// `ceil(log2(P))`.
    const E: u32;
    /// `2^E - 1`.
    const MASK: u64;
    /// `MASK + 1 - P`.
    const K: u64;
}

/// `2^31 - 1`, the modulus shared by `mrg2`, `mrg3`, `mrg4` and `yarn5`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct P31_1;

impl Prime for P31_1 {
    const P: i64 = 2_147_483_647;
    const E: u32 = 31;
    const MASK: u64 = (1u64 << 31) - 1;
    const K: u64 = 1;
}

/// `2^31 - 21069`, the modulus used by the `*s` ("small-increment") MRG3
/// family.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct P31S1;

impl Prime for P31S1 {
    const P: i64 = 2_147_483_648 - 21_069;
    const E: u32 = 31;
    const MASK: u64 = (1u64 << 31) - 1;
    const K: u64 = 21_069;
}

/// `2^31 - 22641`, the modulus used by `mrg5s`/`yarn5s`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct P31S2;

impl Prime for P31S2 {
    const P: i64 = 2_147_483_648 - 22_641;
    const E: u32 = 31;
    const MASK: u64 = (1u64 << 31) - 1;
    const K: u64 = 22_641;
}

/// Number of Barrett-style reduction passes `fast_modulo` applies before
/// falling back to trial subtraction. Every modulus in this crate has a `K`
/// small enough that 4 passes over-converge with room to spare; more passes
/// are always safe (the trailing subtraction loop is exact regardless), just
/// not free, so we don't pick an extravagant number.
const REDUCTION_PASSES: u32 = 4;

/// `x mod P::P`, without using integer division.
///
/// Contract (spec §4.1): valid for any `x` that arises from a dot product of
/// at most a handful of residues below `P::P` (the MRG recurrence order is
/// at most 5), which is the only place this function is called from.
#[wrappit]
pub fn fast_modulo<M: Prime>(x: u64) -> i64 {
    let mut x = x;
    for _ in 0..REDUCTION_PASSES {
        x = (x & M::MASK) + (x >> M::E) * M::K;
    }
    let mut r = x as i64;
    while r >= M::P {
        r -= M::P;
    }
    r
}

/// `x mod P::P` for a wide accumulator that may not fit in `u64` — the MRG
/// recurrence's dot product (up to 5 terms, each up to `(P-1)^2 ~ 2^62`) can
/// exceed `u64::MAX` before it is ever reduced. One reduction pass done in
/// `u128` brings the value comfortably back under `2^64`, after which
/// [`fast_modulo`] finishes the job.
pub fn reduce_wide<M: Prime>(x: u128) -> i64 {
    let reduced = (x & M::MASK as u128) + (x >> M::E) * M::K as u128;
    fast_modulo::<M>(reduced as u64)
}

/// Right-to-left binary modular exponentiation, `x^n mod P::P`.
pub fn modular_power<M: Prime>(x: i64, mut n: u64) -> i64 {
    let mut base = x.rem_euclid(M::P);
    let mut result: i64 = 1;
    while n > 0 {
        if n & 1 == 1 {
            result = fast_modulo::<M>(result as u64 * base as u64);
        }
        base = fast_modulo::<M>(base as u64 * base as u64);
        n >>= 1;
    }
    result
}

/// Extended-Euclidean modular inverse: the unique `a^-1 in [1, m)` with
/// `a * a^-1 == 1 (mod m)`.
///
/// Errors with [`TrngError::InvalidArgument`] when `a <= 0` or `m <= 1`, and
/// with [`TrngError::NoInverse`] when `gcd(a, m) != 1`.
pub fn modulo_invers(a: i64, m: i64) -> Result<i64> {
    if a <= 0 || m <= 1 {
        return Err(TrngError::invalid_argument(format!(
            "modulo_invers({a}, {m}): requires a > 0 and m > 1"
        )));
    }
    let mut a = a;
    let mut m1 = m;
    let mut flast: i64 = 0;
    let mut f: i64 = 1;
    while a > 1 {
        let temp = m1 % a;
        let q = m1 / a;
        m1 = a;
        a = temp;
        let temp = f;
        f = flast - q * f;
        flast = temp;
    }
    if a == 0 {
        return Err(TrngError::NoInverse);
    }
    Ok(if f >= 0 { f } else { f + m })
}

/// `floor(log2(x))` for `x > 0`.
pub fn log2_floor(mut x: u64) -> u32 {
    debug_assert!(x > 0);
    let mut y = 0u32;
    while x > 1 {
        x >>= 1;
        y += 1;
    }
    y
}

/// `ceil(log2(x))` for `x > 0`.
pub fn log2_ceil(x: u64) -> u32 {
    if x <= 1 {
        return 0;
    }
    let f = log2_floor(x);
    if (1u64 << f) < x {
        f + 1
    } else {
        f
    }
}
