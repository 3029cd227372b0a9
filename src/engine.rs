//! The engine/parallel-engine contract (spec §6.1, §6.2) and the small
//! [`RawInt`] helper trait the uniform-mapping layer (`uniform.rs`) needs to
//! treat every engine's native output type uniformly.

use crate::error::Result;

/// Output types an engine can natively produce. Implemented for every
/// integer type used as a `RawOut` in this crate; not meant to be
/// implemented outside it.
pub trait RawInt: Copy + Clone + core::fmt::Debug + Eq + Ord + 'static {
    /// Widen to `u128` without loss (every `RawOut` in this crate is
    /// non-negative).
    fn to_u128(self) -> u128;
    /// Narrow back down from `u128`. Truncates silently; callers only ever
    /// pass values already known to fit.
    fn from_u128(v: u128) -> Self;
}

macro_rules! impl_raw_int_unsigned {
    ($($t:ty),*) => {
        $(impl RawInt for $t {
            fn to_u128(self) -> u128 { self as u128 }
            fn from_u128(v: u128) -> Self { v as $t }
        })*
    };
}

impl_raw_int_unsigned!(u32, u64, u128);

impl RawInt for i64 {
    fn to_u128(self) -> u128 {
        debug_assert!(self >= 0, "MRG/YARN raw outputs are always non-negative");
        self as u64 as u128
    }
    fn from_u128(v: u128) -> Self {
        v as i64
    }
}

/// The consumer-visible engine contract (spec §6.1).
///
/// Every family in this crate — MRG, YARN, the counter-LCG hybrid, LCG64,
/// Mersenne Twister, lagged Fibonacci, xoshiro256+ — implements this trait.
/// `operator()` from the spec is [`Engine::next_value`]; plain `next` is
/// avoided to not collide with `Iterator::next` or `RngCore::next_u32`.
pub trait Engine: Clone + core::fmt::Debug + PartialEq {
    /// The engine's native raw output type.
    type RawOut: RawInt;

    /// Smallest value the engine can ever produce.
    fn min() -> Self::RawOut;
    /// Largest value the engine can ever produce.
    fn max() -> Self::RawOut;
    /// Stable name used in the serialisation grammar (spec §6.4), e.g.
    /// `"mrg3"`, `"yarn5s"`, `"lcg64_shift"`.
    fn name() -> &'static str;

    /// Advance the state and return the freshly produced output.
    fn next_value(&mut self) -> Self::RawOut;

    /// Reseed from the engine's fixed default seed.
    fn reseed(&mut self);
    /// Reseed from a single integer.
    fn reseed_u64(&mut self, seed: u64);
    /// Reseed from a seed source: anything producing enough raw bits to
    /// fill the engine's status block (spec §3.6).
    fn reseed_from<R: rand_core::RngCore>(&mut self, source: &mut R);

    /// Advance the state by exactly `n` steps without reading the
    /// intermediate outputs.
    fn discard(&mut self, n: u64);
}

/// Jump-ahead without sub-stream splitting (spec §4.6): the minimum a
/// "non-parallel" engine can offer while still supporting random access.
/// xoshiro256+ implements only this — its 256-bit GF(2) step operator makes
/// `jump2`/`jump` cheap via matrix exponentiation, but the spec does not
/// define a `split` for it (unlike the MRG/YARN/count128/lcg64 families).
pub trait Jumpable: Engine {
    /// Advance by exactly `2^i` steps.
    fn jump2(&mut self, i: u32);
    /// Advance by exactly `n` steps. Equivalent to `discard(n)`.
    fn jump(&mut self, n: u64);
}

/// The parallel-generator contract (spec §6.2): jump-ahead and sub-stream
/// splitting. Implemented by MRG, YARN, the counter-LCG hybrid and LCG64 —
/// not by Mersenne Twister, lagged Fibonacci, or xoshiro256+ (spec §4.6).
pub trait ParallelEngine: Jumpable {
    /// Reparameterise so the engine now produces the interleaved sub-stream
    /// `(x_n, x_{n+s}, x_{n+2s}, ...)` of the original sequence.
    ///
    /// Errors with [`crate::error::TrngError::InvalidArgument`] when `s < 1`
    /// or `n >= s`.
    fn split(&mut self, s: u32, n: u32) -> Result<()>;
}
