//! The 128-bit counter-LCG hybrid (spec §3.5, §6.5, component F).
//!
//! The state is a 128-bit counter that advances by a fixed increment each
//! step (`S.r += increment`, wrapping on overflow); the visible output is
//! obtained by folding the counter's two 64-bit halves together through a
//! small affine-plus-xorshift mix. Because the recurrence is pure addition,
//! `jump`/`jump2`/`split` only ever need to scale the increment — no
//! companion-matrix algebra is involved, unlike the MRG/LCG64 families.

use core::str::FromStr;

use rand_core::impls as rc_impls;
use rand_core::RngCore;
use wrapping_arithmetic::wrappit;

use crate::engine::{Engine, Jumpable, ParallelEngine};
use crate::error::{Result, TrngError};
use crate::serialize::{format_engine, parse_engine_footer, parse_engine_header};

/// `increment`, `a`, `b` (spec §6.5): `increment` advances the 128-bit
/// counter each step; `a`/`b` parameterise the output mix.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Count128Params {
    pub increment: u128,
    pub a: u64,
    pub b: u64,
}

/// `0xfe2134b266a61770_32095479a8f5500b`, the prime
/// `337796325545380861827125810166389624843` (spec §6.5), paired with the
/// default `a = 18145460002477866997`, `b = 1`.
pub const DEFAULT: Count128Params =
    Count128Params { increment: 0xfe2134b266a61770_32095479a8f5500b, a: 18_145_460_002_477_866_997, b: 1 };
/// Same increment, alternate output multiplier `2862933555777941757`.
pub const LECUYER1: Count128Params =
    Count128Params { increment: 0xfe2134b266a61770_32095479a8f5500b, a: 2_862_933_555_777_941_757, b: 1 };
/// Same increment, alternate output multiplier `3202034522624059733`.
pub const LECUYER2: Count128Params =
    Count128Params { increment: 0xfe2134b266a61770_32095479a8f5500b, a: 3_202_034_522_624_059_733, b: 1 };
/// Same increment, alternate output multiplier `3935559000370003845`.
pub const LECUYER3: Count128Params =
    Count128Params { increment: 0xfe2134b266a61770_32095479a8f5500b, a: 3_935_559_000_370_003_845, b: 1 };

#[wrappit]
fn step(p: &Count128Params, r: &mut u128) {
    *r += p.increment;
}

#[wrappit]
fn output(p: &Count128Params, r: u128) -> u64 {
    let hi = (r >> 64) as u64;
    let lo = r as u64;
    let mut t = (lo ^ hi) * p.a + p.b;
    t ^= t >> 23;
    t ^= t << 41;
    t ^= t >> 18;
    t
}

/// The `count128_lcg_shift` engine (spec §3.5, §6.5).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Count128 {
    params: Count128Params,
    r: u128,
}

impl Count128 {
    pub fn new(params: Count128Params) -> Self {
        Count128 { params, r: 0 }
    }

    pub fn params(&self) -> Count128Params {
        self.params
    }
}

impl Default for Count128 {
    fn default() -> Self {
        Self::new(DEFAULT)
    }
}

impl Engine for Count128 {
    type RawOut = u64;

    fn min() -> u64 {
        0
    }

    fn max() -> u64 {
        u64::MAX
    }

    fn name() -> &'static str {
        "count128_lcg_shift"
    }

    fn next_value(&mut self) -> u64 {
        step(&self.params, &mut self.r);
        output(&self.params, self.r)
    }

    fn reseed(&mut self) {
        *self = Self::default();
    }

    fn reseed_u64(&mut self, seed: u64) {
        self.r = ((seed as u128) << 64) | seed as u128;
    }

    fn reseed_from<R: RngCore>(&mut self, source: &mut R) {
        let mut r: u128 = 0;
        for _ in 0..4 {
            r = (r << 32) + source.next_u32() as u128;
        }
        self.r = r;
    }

    fn discard(&mut self, n: u64) {
        Jumpable::jump(self, n);
    }
}

impl Jumpable for Count128 {
    #[wrappit]
    fn jump2(&mut self, i: u32) {
        self.r += (1u128 << (i % 128)) * self.params.increment;
    }

    #[wrappit]
    fn jump(&mut self, n: u64) {
        self.r += n as u128 * self.params.increment;
    }
}

impl ParallelEngine for Count128 {
    #[wrappit]
    fn split(&mut self, s: u32, n: u32) -> Result<()> {
        if s < 1 || n >= s {
            return Err(TrngError::invalid_argument(format!(
                "split(s={s}, n={n}): requires s >= 1 and n < s"
            )));
        }
        if s > 1 {
            self.r += n as u128 * self.params.increment;
            self.r += self.params.increment;
            self.params.increment *= s as u128;
            self.r -= self.params.increment;
        }
        Ok(())
    }
}

impl RngCore for Count128 {
    fn next_u32(&mut self) -> u32 {
        (Engine::next_value(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Engine::next_value(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rc_impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl core::fmt::Display for Count128 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&format_engine(
            Self::name(),
            &format!(
                "({} {} {})",
                self.params.increment, self.params.a, self.params.b
            ),
            &format!("({})", self.r),
        ))
    }
}

impl FromStr for Count128 {
    type Err = TrngError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = parse_engine_header(s, Self::name())?;
        let rest = rest.trim_start();
        let rest = rest
            .strip_prefix('(')
            .ok_or_else(|| TrngError::serialization_failure("count128: expected '(' before parameters"))?;
        let mut parts = rest.splitn(2, ')');
        let body = parts
            .next()
            .ok_or_else(|| TrngError::serialization_failure("count128: unterminated parameter tuple"))?;
        let rest = parts
            .next()
            .ok_or_else(|| TrngError::serialization_failure("count128: unterminated parameter tuple"))?;
        let mut fields = body.split_whitespace();
        let increment: u128 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| TrngError::serialization_failure("count128: bad increment"))?;
        let a: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| TrngError::serialization_failure("count128: bad multiplier"))?;
        let b: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| TrngError::serialization_failure("count128: bad increment term"))?;
        let rest = rest.trim_start();
        let rest = rest
            .strip_prefix('(')
            .ok_or_else(|| TrngError::serialization_failure("count128: expected '(' before status"))?;
        let mut parts = rest.splitn(2, ')');
        let body = parts
            .next()
            .ok_or_else(|| TrngError::serialization_failure("count128: unterminated status tuple"))?;
        let rest = parts
            .next()
            .ok_or_else(|| TrngError::serialization_failure("count128: unterminated status tuple"))?;
        let r: u128 = body
            .trim()
            .parse()
            .map_err(|_| TrngError::serialization_failure("count128: bad status value"))?;
        parse_engine_footer(rest)?;
        Ok(Count128 { params: Count128Params { increment, a, b }, r })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_deterministic() {
        let mut a = Count128::default();
        let mut b = Count128::default();
        for _ in 0..200 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }

    #[test]
    fn jump_matches_repeated_step() {
        let mut by_step = Count128::default();
        let mut by_jump = Count128::default();
        for _ in 0..37 {
            Engine::next_value(&mut by_step);
        }
        Jumpable::jump(&mut by_jump, 37);
        assert_eq!(by_step, by_jump);
    }

    #[test]
    fn jump2_matches_jump_power_of_two() {
        let mut by_jump2 = Count128::default();
        let mut by_jump = Count128::default();
        Jumpable::jump2(&mut by_jump2, 10);
        Jumpable::jump(&mut by_jump, 1 << 10);
        assert_eq!(by_jump2, by_jump);
    }

    #[test]
    fn discard_to_large_offset_via_jump2() {
        // Exercises the 2^40th output via repeated doubling rather than 2^40
        // single steps.
        let mut r = Count128::default();
        Engine::discard(&mut r, 1u64 << 40);
        let mut by_jump2 = Count128::default();
        Jumpable::jump2(&mut by_jump2, 40);
        assert_eq!(r, by_jump2);
    }

    #[test]
    fn split_produces_disjoint_interleaved_substreams() {
        let s = 4u32;
        let mut streams: Vec<Count128> = (0..s)
            .map(|n| {
                let mut r = Count128::default();
                ParallelEngine::split(&mut r, s, n).unwrap();
                r
            })
            .collect();

        let mut reference = Count128::default();
        let mut expected = Vec::new();
        for _ in 0..(s as usize * 6) {
            expected.push(Engine::next_value(&mut reference));
        }

        for (n, stream) in streams.iter_mut().enumerate() {
            for k in 0..6usize {
                let want = expected[k * s as usize + n];
                assert_eq!(Engine::next_value(stream), want);
            }
        }
    }

    #[test]
    fn split_rejects_invalid_arguments() {
        let mut r = Count128::default();
        assert!(ParallelEngine::split(&mut r, 0, 0).is_err());
        assert!(ParallelEngine::split(&mut r, 3, 3).is_err());
    }

    #[test]
    fn canonical_text_round_trips() {
        let mut r = Count128::default();
        Engine::discard(&mut r, 12345);
        let text = r.to_string();
        let parsed: Count128 = text.parse().unwrap();
        assert_eq!(r, parsed);
        let mut a = r;
        let mut b = parsed;
        for _ in 0..3 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }
}
