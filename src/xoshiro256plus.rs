//! xoshiro256+ (spec §3.5, §4.6, component F).
//!
//! A direct port of the `step`/`jump2`/`jump` algebra in
//! `examples/original_source/trng/xoshiro256plus.cc`: state is four `u64`
//! words, advanced by a fixed xor/rotate/shift recurrence, output is
//! `r[0] + r[3]` taken before the step in the original but after it here —
//! matching every other engine in this crate, where `next_value` both
//! advances and returns in one call. Jump-ahead is realised over the GF(2)
//! companion matrix in [`crate::linalg::gf2`]: `jump2(i)` squares the
//! once-built step matrix `i` times (so `i` can run past 64 without ever
//! materialising `2^i` as an integer), `jump(n)` uses ordinary binary
//! exponentiation for `n >= 16` and falls back to repeated stepping below
//! that, exactly as the original does. Only [`Jumpable`] is implemented,
//! not [`ParallelEngine`] (spec §4.6): the original exposes no `split` for
//! this generator.

use core::str::FromStr;

use once_cell::sync::Lazy;
use rand_core::impls as rc_impls;
use rand_core::RngCore;

use crate::engine::{Engine, Jumpable};
use crate::error::{Result, TrngError};
use crate::linalg::gf2::{Matrix256, Vector256};
use crate::serialize::{format_engine, format_tuple, parse_engine_footer, parse_engine_header, parse_tuple};

#[inline]
fn rotl(x: u64, k: u32) -> u64 {
    (x << k) | (x >> (64 - k))
}

fn step(r: &mut [u64; 4]) {
    let t = r[1] << 17;
    r[2] ^= r[0];
    r[3] ^= r[1];
    r[1] ^= r[2];
    r[0] ^= r[3];
    r[2] ^= t;
    r[3] = rotl(r[3], 45);
}

fn state_to_vector(r: &[u64; 4]) -> Vector256 {
    Vector256(*r)
}

fn vector_to_state(v: &Vector256) -> [u64; 4] {
    v.0
}

/// The companion matrix of one [`step`], built once by stepping every
/// standard basis vector of GF(2)^256 (mirrors the original's lazily
/// constructed `jump_matrix`).
static STEP_MATRIX: Lazy<Matrix256> = Lazy::new(|| {
    let mut m = Matrix256::zero();
    for col in 0..256 {
        let mut v = Vector256::zero();
        v.set_bit(col, true);
        let mut r = vector_to_state(&v);
        step(&mut r);
        let out = state_to_vector(&r);
        for row in 0..256 {
            if out.bit(row) {
                m.rows[row].set_bit(col, true);
            }
        }
    }
    m
});

/// The `xoshiro256plus` engine (spec §3.5, §6.6).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Xoshiro256Plus {
    r: [u64; 4],
}

impl Default for Xoshiro256Plus {
    fn default() -> Self {
        Xoshiro256Plus { r: [1u64 << 63, 0, 0, 0] }
    }
}

impl Xoshiro256Plus {
    /// Reseed from four raw words, guarding against the reserved all-zero
    /// state (spec §3.6: a generator's status must never be the fixed
    /// point of its own recurrence), exactly as the original's generic
    /// `seed(gen&)` does by setting the top bit of `r[0]`.
    fn reseed_words(&mut self, mut r: [u64; 4]) {
        if r == [0, 0, 0, 0] {
            r[0] = 1u64 << 63;
        }
        self.r = r;
    }
}

impl Engine for Xoshiro256Plus {
    type RawOut = u64;

    fn min() -> u64 {
        0
    }

    fn max() -> u64 {
        u64::MAX
    }

    fn name() -> &'static str {
        "xoshiro256plus"
    }

    fn next_value(&mut self) -> u64 {
        step(&mut self.r);
        self.r[0].wrapping_add(self.r[3])
    }

    fn reseed(&mut self) {
        *self = Self::default();
    }

    fn reseed_u64(&mut self, seed: u64) {
        // Expand the integer seed through the same Park-Miller minimal
        // standard LCG (modulus 2147483647, multiplier 16807) the lagged
        // Fibonacci family uses for this, matching the original's
        // `seed(unsigned long s)`, which delegates to `minstd r(s); seed(r);`.
        let mut state = (seed % 2_147_483_647) as u32;
        if state == 0 {
            state = 1;
        }
        let mut next_u32 = || {
            state = (state as u64 * 16807 % 2_147_483_647) as u32;
            state
        };
        let mut r = [0u64; 4];
        for word in r.iter_mut() {
            let lo = next_u32() as u64;
            let hi = next_u32() as u64;
            *word = (hi << 32) | lo;
        }
        self.reseed_words(r);
    }

    fn reseed_from<R: RngCore>(&mut self, source: &mut R) {
        let r = [source.next_u64(), source.next_u64(), source.next_u64(), source.next_u64()];
        self.reseed_words(r);
    }

    fn discard(&mut self, n: u64) {
        Jumpable::jump(self, n);
    }
}

impl Jumpable for Xoshiro256Plus {
    fn jump2(&mut self, i: u32) {
        let matrix = STEP_MATRIX.pow2(i);
        let v = state_to_vector(&self.r);
        self.r = vector_to_state(&matrix.apply(&v));
    }

    fn jump(&mut self, n: u64) {
        if n < 16 {
            for _ in 0..n {
                step(&mut self.r);
            }
        } else {
            let matrix = STEP_MATRIX.pow(n);
            let v = state_to_vector(&self.r);
            self.r = vector_to_state(&matrix.apply(&v));
        }
    }
}

impl RngCore for Xoshiro256Plus {
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

impl core::fmt::Display for Xoshiro256Plus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&format_engine(
            Self::name(),
            "()",
            &format_tuple(&[self.r[0] as i64, self.r[1] as i64, self.r[2] as i64, self.r[3] as i64]),
        ))
    }
}

impl FromStr for Xoshiro256Plus {
    type Err = TrngError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = parse_engine_header(s, Self::name())?;
        let rest = rest.trim_start();
        let rest = rest
            .strip_prefix("()")
            .ok_or_else(|| TrngError::serialization_failure("xoshiro256plus: expected empty parameter block '()'"))?;
        let rest = rest.trim_start();
        let (r, rest) = parse_tuple::<4>(rest)?;
        parse_engine_footer(rest)?;
        Ok(Xoshiro256Plus { r: [r[0] as u64, r[1] as u64, r[2] as u64, r[3] as u64] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_deterministic() {
        let mut a = Xoshiro256Plus::default();
        let mut b = Xoshiro256Plus::default();
        for _ in 0..2000 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }

    #[test]
    fn jump_matches_repeated_step() {
        let mut by_step = Xoshiro256Plus::default();
        let mut by_jump = Xoshiro256Plus::default();
        for _ in 0..4 {
            Engine::next_value(&mut by_step);
        }
        Jumpable::jump(&mut by_jump, 4);
        assert_eq!(by_step, by_jump);

        let mut by_step = Xoshiro256Plus::default();
        let mut by_jump = Xoshiro256Plus::default();
        for _ in 0..500 {
            Engine::next_value(&mut by_step);
        }
        Jumpable::jump(&mut by_jump, 500);
        assert_eq!(by_step, by_jump);
    }

    #[test]
    fn jump2_matches_jump_power_of_two_for_small_exponents() {
        for i in 0u32..20 {
            let mut by_jump2 = Xoshiro256Plus::default();
            let mut by_jump = Xoshiro256Plus::default();
            Jumpable::jump2(&mut by_jump2, i);
            Jumpable::jump(&mut by_jump, 1u64 << i);
            assert_eq!(by_jump2, by_jump, "mismatch at i={i}");
        }
    }

    #[test]
    fn jump2_handles_exponents_beyond_64_without_overflow() {
        // 2^64 doesn't fit a u64, so this only exercises the matrix-squaring
        // path, not a jump()-based cross-check.
        let mut r = Xoshiro256Plus::default();
        Jumpable::jump2(&mut r, 64);
        Jumpable::jump2(&mut r, 100);
        // No particular expected state; this exists to confirm the call
        // completes without panicking on the overflow that `1u64 << i`
        // would hit for i >= 64.
        let _ = r;
    }

    #[test]
    fn reseed_guards_against_the_all_zero_state() {
        let mut r = Xoshiro256Plus::default();
        r.reseed_words([0, 0, 0, 0]);
        assert_ne!(r.r, [0, 0, 0, 0]);
    }

    #[test]
    fn reseed_u64_is_deterministic() {
        let mut a = Xoshiro256Plus::default();
        let mut b = Xoshiro256Plus::default();
        Engine::reseed_u64(&mut a, 7);
        Engine::reseed_u64(&mut b, 7);
        for _ in 0..50 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }

    #[test]
    fn canonical_text_round_trips() {
        let mut r = Xoshiro256Plus::default();
        Engine::discard(&mut r, 321);
        let text = r.to_string();
        let parsed: Xoshiro256Plus = text.parse().unwrap();
        assert_eq!(r, parsed);
        let mut a = r;
        let mut b = parsed;
        for _ in 0..5 {
            assert_eq!(Engine::next_value(&mut a), Engine::next_value(&mut b));
        }
    }
}
