//! 64-bit linear congruential generators (spec §3.5, §4.6, component F).
//!
//! `Lcg64` returns the raw recurrence state; `Lcg64Shift` additionally mixes
//! the state through a fixed xorshift before returning it (spec §3.5's "raw
//! output or bit-mixed output"). Both share the exact jump-ahead algebra —
//! `pow`/`g`/`f` below are a literal port of `lcg64_shift::pow`/`g`/`f` in
//! the original C++ source, which computes `a^n`, `prod(1+a^(2^i))` and
//! `sum(a^i)` respectively to support `jump2`/`jump`/`split` without ever
//! materialising the sequence in between.

use core::str::FromStr;

use rand_core::impls as rc_impls;
use rand_core::RngCore;
use wrapping_arithmetic::wrappit;

use crate::engine::{Engine, Jumpable, ParallelEngine};
use crate::error::{Result, TrngError};
use crate::serialize::{format_engine, format_tuple, parse_engine_footer, parse_engine_header, parse_tuple};

/// `x^n`, wrapping 64-bit binary exponentiation.
#[wrappit]
fn pow64(mut x: u64, mut n: u64) -> u64 {
    let mut result: u64 = 1;
    while n > 0 {
        if n & 1 == 1 {
            result *= x;
        }
        x *= x;
        n >>= 1;
    }
    result
}

/// `prod(1 + a^(2^i), i=0..l-1)`.
#[wrappit]
fn g_product(l: u32, a: u64) -> u64 {
    let mut p = a;
    let mut res: u64 = 1;
    for _ in 0..l {
        res *= 1 + p;
        p *= p;
    }
    res
}

/// `sum(a^i, i=0..s-1)`.
#[wrappit]
fn f_sum(s: u64, a: u64) -> u64 {
    if s == 0 {
        return 0;
    }
    let e = crate::int_math::log2_floor(s);
    let mut y: u64 = 0;
    let mut p = a;
    for l in 0..=e {
        if (1u64 << l) & s != 0 {
            y = g_product(l, a) + p * y;
        }
        p *= p;
    }
    y
}

/// Multiplier/increment pair (spec §6.5): `(a, b)` with step `r <- a*r + b`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lcg64Params {
    pub a: u64,
    pub b: u64,
}

/// `18145460002477866997` / `1` — the default `lcg64`/`lcg64_shift`
/// multiplier and increment (spec §6.5).
pub const DEFAULT: Lcg64Params = Lcg64Params { a: 18_145_460_002_477_866_997, b: 1 };
/// Alternate multiplier `2862933555777941757` (spec §6.5, "LEcuyer1").
pub const LECUYER1: Lcg64Params = Lcg64Params { a: 2_862_933_555_777_941_757, b: 1 };
/// Alternate multiplier `3202034522624059733` (spec §6.5, "LEcuyer2").
pub const LECUYER2: Lcg64Params = Lcg64Params { a: 3_202_034_522_624_059_733, b: 1 };
/// Alternate multiplier `3935559000370003845` (spec §6.5, "LEcuyer3").
pub const LECUYER3: Lcg64Params = Lcg64Params { a: 3_935_559_000_370_003_845, b: 1 };

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Lcg64Status {
    r: u64,
}

fn step(p: &Lcg64Params, s: &mut Lcg64Status) {
    s.r = p.a.wrapping_mul(s.r).wrapping_add(p.b);
}

#[wrappit]
fn jump2(p: &Lcg64Params, s: &mut Lcg64Status, i: u32) {
    // The recurrence's state is 64 bits wide, so advancing by 2^64 steps is
    // a full-period no-op; reducing `i` modulo 64 up front (as `count128`'s
    // `jump2` does modulo 128 for its 128-bit counter) keeps `1u64 << i`
    // from overflowing for callers who jump ahead by `i >= 64`.
    let two_pow_i = 1u64 << (i % 64);
    s.r = s.r * pow64(p.a, two_pow_i) + f_sum(two_pow_i, p.a) * p.b;
}

fn jump(p: &Lcg64Params, s: &mut Lcg64Status, mut n: u64) {
    if n < 16 {
        for _ in 0..n {
            step(p, s);
        }
    } else {
        let mut i = 0u32;
        while n > 0 {
            if n & 1 == 1 {
                jump2(p, s, i);
            }
            i += 1;
            n >>= 1;
        }
    }
}

/// `jump2(i)` applied for every `i` in `[0, 64)`: a full-period backward
/// step, since `a` is odd and the recurrence is a bijection of `u64`.
fn backward(p: &Lcg64Params, s: &mut Lcg64Status) {
    for i in 0..64 {
        jump2(p, s, i);
    }
}

#[wrappit]
fn split(p: &mut Lcg64Params, s: &mut Lcg64Status, sp: u32, n: u32) -> Result<()> {
    if sp < 1 || n >= sp {
        return Err(TrngError::invalid_argument(format!(
            "split(s={sp}, n={n}): requires s >= 1 and n < s"
        )));
    }
    if sp > 1 {
        jump(p, s, n as u64 + 1);
        p.b *= f_sum(sp as u64, p.a);
        p.a = pow64(p.a, sp as u64);
        backward(p, s);
    }
    Ok(())
}

macro_rules! lcg64_alias {
    ($alias:ident, $name:literal, $mix:expr) => {
        #[doc = concat!("The `", $name, "` engine (spec \u{a7}3.5, \u{a7}6.5).")]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $alias {
            params: Lcg64Params,
            status: Lcg64Status,
        }

        impl $alias {
            pub fn new(params: Lcg64Params) -> Self {
                $alias { params, status: Lcg64Status { r: 0 } }
            }

            pub fn params(&self) -> Lcg64Params {
                self.params
            }
        }

        impl Default for $alias {
            fn default() -> Self {
                Self::new(DEFAULT)
            }
        }

        impl Engine for $alias {
            type RawOut = u64;

            fn min() -> u64 {
                0
            }

            fn max() -> u64 {
                u64::MAX
            }

            fn name() -> &'static str {
                $name
            }

            fn next_value(&mut self) -> u64 {
                step(&self.params, &mut self.status);
                $mix(self.status.r)
            }

            fn reseed(&mut self) {
                *self = Self::default();
            }

            fn reseed_u64(&mut self, seed: u64) {
                self.status.r = seed;
            }

            fn reseed_from<R: RngCore>(&mut self, source: &mut R) {
                self.status.r = source.next_u64();
            }

            fn discard(&mut self, n: u64) {
                jump(&self.params, &mut self.status, n);
            }
        }

        impl Jumpable for $alias {
            fn jump2(&mut self, i: u32) {
                jump2(&self.params, &mut self.status, i);
            }

            fn jump(&mut self, n: u64) {
                jump(&self.params, &mut self.status, n);
            }
        }

        impl ParallelEngine for $alias {
            fn split(&mut self, s: u32, n: u32) -> Result<()> {
                split(&mut self.params, &mut self.status, s, n)
            }
        }

        impl RngCore for $alias {
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

        impl core::fmt::Display for $alias {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&format_engine(
                    $name,
                    &format_tuple(&[self.params.a as i64, self.params.b as i64]),
                    &format_tuple(&[self.status.r as i64]),
                ))
            }
        }

        impl FromStr for $alias {
            type Err = TrngError;

            fn from_str(s: &str) -> Result<Self> {
                let rest = parse_engine_header(s, $name)?;
                let (a, rest) = parse_tuple::<2>(rest)?;
                let rest = rest.trim_start();
                let (r, rest) = parse_tuple::<1>(rest)?;
                parse_engine_footer(rest)?;
                Ok($alias {
                    params: Lcg64Params { a: a[0] as u64, b: a[1] as u64 },
                    status: Lcg64Status { r: r[0] as u64 },
                })
            }
        }
    };
}

lcg64_alias!(Lcg64, "lcg64", |r: u64| r);

#[wrappit]
fn shift_mix(mut t: u64) -> u64 {
    t ^= t >> 17;
    t ^= t << 31;
    t ^= t >> 8;
    t
}

lcg64_alias!(Lcg64Shift, "lcg64_shift", shift_mix);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_deterministic() {
        let mut a = Lcg64Shift::default();
        let mut b = Lcg64Shift::default();
        for _ in 0..500 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }

    #[test]
    fn jump_matches_repeated_step() {
        let mut by_step = Lcg64Shift::default();
        let mut by_jump = Lcg64Shift::default();
        for _ in 0..53 {
            Engine::next_value(&mut by_step);
        }
        Jumpable::jump(&mut by_jump, 53);
        assert_eq!(by_step, by_jump);
    }

    #[test]
    fn jump2_matches_jump_power_of_two() {
        let mut by_jump2 = Lcg64Shift::default();
        let mut by_jump = Lcg64Shift::default();
        Jumpable::jump2(&mut by_jump2, 6);
        Jumpable::jump(&mut by_jump, 1 << 6);
        assert_eq!(by_jump2, by_jump);
    }

    #[test]
    fn split_produces_disjoint_interleaved_substreams() {
        let s = 5u32;
        let mut streams: Vec<Lcg64Shift> = (0..s)
            .map(|n| {
                let mut r = Lcg64Shift::default();
                ParallelEngine::split(&mut r, s, n).unwrap();
                r
            })
            .collect();

        let mut reference = Lcg64Shift::default();
        let mut expected = Vec::new();
        for _ in 0..(s as usize * 8) {
            expected.push(Engine::next_value(&mut reference));
        }

        for (n, stream) in streams.iter_mut().enumerate() {
            for k in 0..8usize {
                let want = expected[k * s as usize + n];
                assert_eq!(Engine::next_value(stream), want);
            }
        }
    }

    #[test]
    fn split_rejects_invalid_arguments() {
        let mut r = Lcg64Shift::default();
        assert!(ParallelEngine::split(&mut r, 0, 0).is_err());
        assert!(ParallelEngine::split(&mut r, 3, 3).is_err());
    }

    #[test]
    fn raw_and_shift_share_the_recurrence_but_differ_in_output() {
        let mut raw = Lcg64::default();
        let mut shift = Lcg64Shift::default();
        let a = Engine::next_value(&mut raw);
        let b = Engine::next_value(&mut shift);
        assert_ne!(a, b);
        assert_eq!(raw.status.r, shift.status.r);
    }

    #[test]
    fn canonical_text_round_trips() {
        let mut r = Lcg64Shift::default();
        Engine::discard(&mut r, 271_828);
        let text = r.to_string();
        let parsed: Lcg64Shift = text.parse().unwrap();
        assert_eq!(r, parsed);
        let mut a = r;
        let mut b = parsed;
        for _ in 0..3 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }
}
