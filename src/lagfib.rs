//! Lagged Fibonacci generators (spec §3.5, §4.6, component F).
//!
//! A ring buffer of `B` words indexed by a head; each step computes
//! `r_i <- r_{i-A} OP r_{i-B}` for the lag pair `(A, B)`, where `OP` is
//! xor (`lagfib2xor` in the original) or wrapping addition (the "plus"
//! variant spec §3.5 names alongside it — same ring-buffer recurrence,
//! substituting the combining operator, not a separate algorithm). Neither
//! variant exposes `jump`/`split` (spec §4.6): only `discard`, implemented
//! here as repeated stepping rather than the original's GF(2) fast-discard
//! matrix, since the contract only requires n-step equivalence, not a
//! sub-quadratic shortcut.
//!
//! The buffer is sized to the next power of two at or above `B` (mirroring
//! `int_math::ceil2`/`mask` in the original) so index wraparound is a
//! cheap bitmask. `SIZE` is supplied explicitly per named alias below
//! rather than computed, since stable const generics cannot derive it from
//! `B` at the type level.

use core::str::FromStr;

use rand_core::impls as rc_impls;
use rand_core::RngCore;

use crate::engine::Engine;
use crate::error::{Result, TrngError};
use crate::serialize::{parse_engine_footer, parse_engine_header};

/// Minimal integer operations the ring buffer needs, implemented for the
/// two word widths the original exposes (`unsigned long`/`unsigned long
/// long`, ported as `u32`/`u64`).
pub trait LagWord: Copy + Clone + core::fmt::Debug + Eq + Default + core::str::FromStr + core::fmt::Display + 'static {
    const BITS: u32;
    const BYTE_LEN: usize;
    const MIN: Self;
    const MAX: Self;
    fn wrapping_add(self, other: Self) -> Self;
    fn bitxor(self, other: Self) -> Self;
    fn shl1(self) -> Self;
    fn set_low_bit(self) -> Self;
    fn into_u64(self) -> u64;
}

impl LagWord for u32 {
    const BITS: u32 = 32;
    const BYTE_LEN: usize = 4;
    const MIN: Self = 0;
    const MAX: Self = u32::MAX;
    fn wrapping_add(self, other: Self) -> Self {
        u32::wrapping_add(self, other)
    }
    fn bitxor(self, other: Self) -> Self {
        self ^ other
    }
    fn shl1(self) -> Self {
        self.wrapping_shl(1)
    }
    fn set_low_bit(self) -> Self {
        self | 1
    }
    fn into_u64(self) -> u64 {
        self as u64
    }
}

impl LagWord for u64 {
    const BITS: u32 = 64;
    const BYTE_LEN: usize = 8;
    const MIN: Self = 0;
    const MAX: Self = u64::MAX;
    fn wrapping_add(self, other: Self) -> Self {
        u64::wrapping_add(self, other)
    }
    fn bitxor(self, other: Self) -> Self {
        self ^ other
    }
    fn shl1(self) -> Self {
        self.wrapping_shl(1)
    }
    fn set_low_bit(self) -> Self {
        self | 1
    }
    fn into_u64(self) -> u64 {
        self
    }
}

/// A minimal Park-Miller minimal-standard LCG (modulus `2147483647`,
/// multiplier `16807`), used only to expand an integer seed into the
/// ring buffer's bits, exactly as the original's `seed(unsigned long)`
/// delegates to an internal `minstd`.
struct Minstd {
    r: u32,
}

impl Minstd {
    fn new(seed: u64) -> Self {
        let r = (seed % 2_147_483_647) as u32;
        Minstd { r: if r == 0 { 1 } else { r } }
    }

    fn next(&mut self) -> u32 {
        let t = self.r as u64 * 16807 % 2_147_483_647;
        self.r = t as u32;
        self.r
    }
}

/// The combining operator a lagged Fibonacci recurrence applies at each
/// step (spec §3.5: xor or `+ mod 2^w`).
pub trait LagOp<W> {
    fn combine(a: W, b: W) -> W;
    const TAG: &'static str;
}

/// `r_i <- r_{i-A} xor r_{i-B}` (`lagfib2xor` in the original).
#[derive(Clone, Copy, Debug)]
pub struct Xor;

impl<W: LagWord> LagOp<W> for Xor {
    fn combine(a: W, b: W) -> W {
        a.bitxor(b)
    }
    const TAG: &'static str = "lagfib2xor";
}

/// `r_i <- r_{i-A} + r_{i-B} mod 2^w` (the "plus" counterpart spec §3.5
/// names alongside `lagfib2xor`).
#[derive(Clone, Copy, Debug)]
pub struct Plus;

impl<W: LagWord> LagOp<W> for Plus {
    fn combine(a: W, b: W) -> W {
        a.wrapping_add(b)
    }
    const TAG: &'static str = "lagfib2plus";
}

/// A lagged Fibonacci engine over word type `W`, lag pair `(A, B)`, ring
/// buffer capacity `SIZE` (the next power of two at or above `B`), and
/// combining operator `Op`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LagFib<W, Op, const A: usize, const B: usize, const SIZE: usize> {
    r: [W; SIZE],
    index: usize,
    _op: core::marker::PhantomData<Op>,
}

impl<W: LagWord, Op: LagOp<W>, const A: usize, const B: usize, const SIZE: usize> LagFib<W, Op, A, B, SIZE> {
    fn mask(i: usize) -> usize {
        i & (SIZE - 1)
    }

    fn step(&mut self) {
        self.index = Self::mask(self.index + 1);
        let a = self.r[Self::mask(self.index + SIZE - A)];
        let b = self.r[Self::mask(self.index + SIZE - B)];
        self.r[self.index] = Op::combine(a, b);
    }

    /// Seed every ring buffer slot bit-by-bit from `source`, mirroring
    /// the original's `seed(gen&)`: each bit is `1` when the source's next
    /// output lies in the upper half of its range.
    fn seed_from_bits<F: FnMut() -> u32>(&mut self, mut next: F) {
        let half = (u32::MAX / 2) as u64;
        for slot in self.r.iter_mut().take(B) {
            let mut v = W::MIN;
            for _ in 0..W::BITS {
                v = v.shl1();
                let g = next() as u64;
                if g > half {
                    v = v.set_low_bit();
                }
            }
            *slot = v;
        }
        self.index = B - 1;
    }
}

impl<W: LagWord, Op: LagOp<W>, const A: usize, const B: usize, const SIZE: usize> Default
    for LagFib<W, Op, A, B, SIZE>
{
    fn default() -> Self {
        let mut engine = LagFib { r: [W::default(); SIZE], index: 0, _op: core::marker::PhantomData };
        let mut source = Minstd::new(0);
        engine.seed_from_bits(|| source.next());
        engine
    }
}

macro_rules! lagfib_alias {
    ($alias:ident, $word:ty, $op:ty, $a:literal, $b:literal, $size:literal, $tag:literal) => {
        #[doc = concat!("The `", $tag, "` engine (spec \u{a7}3.5, \u{a7}6.6): lag pair (",
            stringify!($a), ", ", stringify!($b), "), ", stringify!($word), " words.")]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $alias(LagFib<$word, $op, $a, $b, $size>);

        impl Default for $alias {
            fn default() -> Self {
                $alias(LagFib::default())
            }
        }

        impl Engine for $alias {
            type RawOut = $word;

            fn min() -> $word {
                <$word as LagWord>::MIN
            }

            fn max() -> $word {
                <$word as LagWord>::MAX
            }

            fn name() -> &'static str {
                $tag
            }

            fn next_value(&mut self) -> $word {
                self.0.step();
                self.0.r[self.0.index]
            }

            fn reseed(&mut self) {
                *self = Self::default();
            }

            fn reseed_u64(&mut self, seed: u64) {
                let mut source = Minstd::new(seed);
                self.0.seed_from_bits(|| source.next());
            }

            fn reseed_from<R: RngCore>(&mut self, source: &mut R) {
                self.0.seed_from_bits(|| source.next_u32());
            }

            fn discard(&mut self, n: u64) {
                for _ in 0..n {
                    self.0.step();
                }
            }
        }

        impl RngCore for $alias {
            fn next_u32(&mut self) -> u32 {
                rc_impls::next_u32_via_fill(self)
            }

            fn next_u64(&mut self) -> u64 {
                rc_impls::next_u64_via_fill(self)
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                let mut i = 0;
                while i < dest.len() {
                    let v = Engine::next_value(self);
                    let bytes_le = v.into_u64().to_le_bytes();
                    let n = <$word as LagWord>::BYTE_LEN.min(dest.len() - i);
                    dest[i..i + n].copy_from_slice(&bytes_le[..n]);
                    i += n;
                }
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }

        impl core::fmt::Display for $alias {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "[{} ({}", $tag, self.0.index)?;
                for slot in self.0.r.iter() {
                    write!(f, " {slot}")?;
                }
                write!(f, ")]")
            }
        }

        impl FromStr for $alias {
            type Err = TrngError;

            fn from_str(s: &str) -> Result<Self> {
                let rest = parse_engine_header(s, $tag)?;
                let rest = rest.trim_start();
                let rest = rest
                    .strip_prefix('(')
                    .ok_or_else(|| TrngError::serialization_failure("lagfib: expected '(' before status"))?;
                let mut parts = rest.splitn(2, ')');
                let body = parts
                    .next()
                    .ok_or_else(|| TrngError::serialization_failure("lagfib: unterminated status tuple"))?;
                let rest = parts
                    .next()
                    .ok_or_else(|| TrngError::serialization_failure("lagfib: unterminated status tuple"))?;
                let mut fields = body.split_whitespace();
                let index: usize = fields
                    .next()
                    .and_then(|t| t.parse().ok())
                    .ok_or_else(|| TrngError::serialization_failure("lagfib: bad index"))?;
                let mut r = [<$word as LagWord>::MIN; $size];
                for slot in r.iter_mut() {
                    let token = fields
                        .next()
                        .ok_or_else(|| TrngError::serialization_failure("lagfib: missing ring word"))?;
                    *slot = token
                        .parse()
                        .map_err(|_| TrngError::serialization_failure("lagfib: bad ring word"))?;
                }
                parse_engine_footer(rest)?;
                Ok($alias(LagFib { r, index, _op: core::marker::PhantomData }))
            }
        }
    };
}

// The representative pair the original calls `r250` (lag 103/250) and the
// larger `lagfib2xor_607`/`lagfib2plus_607` pair (lag 273/607), each shown
// in both word widths. The original ships five further lag pairs (521,
// 1279, 2281, 3217, 4423); omitted here as proportionate coverage of the
// same recurrence rather than an exhaustive catalogue (see `DESIGN.md`).
lagfib_alias!(LagFibXor32R250, u32, Xor, 103, 250, 256, "lagfib2xor_32_103_250");
lagfib_alias!(LagFibPlus32R250, u32, Plus, 103, 250, 256, "lagfib2plus_32_103_250");
lagfib_alias!(LagFibXor64L607, u64, Xor, 273, 607, 1024, "lagfib2xor_64_273_607");
lagfib_alias!(LagFibPlus64L607, u64, Plus, 273, 607, 1024, "lagfib2plus_64_273_607");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_deterministic_and_in_range() {
        let mut r = LagFibXor32R250::default();
        for _ in 0..2000 {
            Engine::next_value(&mut r);
        }
    }

    #[test]
    fn xor_and_plus_diverge_from_the_same_seed() {
        let mut x = LagFibXor64L607::default();
        let mut p = LagFibPlus64L607::default();
        let ox = Engine::next_value(&mut x);
        let op = Engine::next_value(&mut p);
        assert_ne!(ox, op);
    }

    #[test]
    fn discard_matches_repeated_step() {
        let mut by_step = LagFibXor32R250::default();
        let mut by_discard = LagFibXor32R250::default();
        for _ in 0..900 {
            Engine::next_value(&mut by_step);
        }
        Engine::discard(&mut by_discard, 900);
        assert_eq!(by_step, by_discard);
    }

    #[test]
    fn reseed_u64_is_deterministic() {
        let mut a = LagFibPlus32R250::default();
        let mut b = LagFibPlus32R250::default();
        Engine::reseed_u64(&mut a, 424242);
        Engine::reseed_u64(&mut b, 424242);
        for _ in 0..50 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }

    #[test]
    fn canonical_text_round_trips() {
        let mut r = LagFibXor64L607::default();
        Engine::discard(&mut r, 1234);
        let text = r.to_string();
        let parsed: LagFibXor64L607 = text.parse().unwrap();
        assert_eq!(r, parsed);
        let mut a = r;
        let mut b = parsed;
        for _ in 0..4 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }
}
