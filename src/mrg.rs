//! Multiple-recursive generators (spec §3.2-§3.3, §4.3, component C).
//!
//! `Mrg<M, K>` is generic over the modulus (`M: Prime`, component A) and the
//! recurrence order (`K`, a const generic standing in for the original
//! per-order C++ class template parameter). All five named engines
//! (`Mrg2`..`Mrg5s`) are monomorphisations of the same generic step,
//! jump-ahead and split algebra; only the name, default coefficients and
//! modulus differ between them, matching how the five `mrgN[s].hpp` classes
//! in the original source are textually identical apart from those details.

use core::marker::PhantomData;
use core::str::FromStr;

use rand_core::impls as rc_impls;
use rand_core::RngCore;

use crate::engine::{Engine, Jumpable, ParallelEngine};
use crate::error::{Result, TrngError};
use crate::int_math::{modulo_invers, reduce_wide, Prime, P31S1, P31S2, P31_1};
use crate::linalg::{gauss_solve, mat_pow2, mat_vec};
use crate::mrg_constants;
use crate::serialize::{format_engine, format_tuple, parse_engine_footer, parse_engine_header, parse_tuple};

/// The recurrence coefficients `(a1, ..., aK)` of an order-`K` MRG.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MrgParams<const K: usize> {
    pub a: [i64; K],
}

/// The `K` most recent residues, newest first (`r[0]` is `x_n`, `r[K-1]` is
/// `x_{n-K+1}`).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MrgStatus<const K: usize> {
    pub r: [i64; K],
}

/// Default status for a fresh engine: `r = [0, 1, 1, ..., 1]`, confirmed
/// identical across every order in the original source (`mrg2`, `mrg4`,
/// `mrg5s`'s `status_type()` default constructors all follow this pattern).
/// Picking `r[0] = 0` and the rest `1` keeps the first output deterministic
/// while ensuring at least one residue is non-zero (spec §3.2's "not all
/// residues zero" invariant).
pub(crate) fn default_status<const K: usize>() -> [i64; K] {
    let mut r = [1i64; K];
    r[0] = 0;
    r
}

/// A generic order-`K` multiple-recursive generator over the prime `M::P`.
// `serde(bound = "")` suppresses the derive's default "every generic
// parameter must itself be (De)Serialize" rule: `M` only ever appears
// through `PhantomData<M>`, never serialized itself, so no bound on `M` is
// actually required (`Prime` marker types like `P31_1` carry no `serde`
// impls of their own).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mrg<M: Prime, const K: usize> {
    params: MrgParams<K>,
    status: MrgStatus<K>,
    _modulus: PhantomData<M>,
}

impl<M: Prime, const K: usize> Mrg<M, K> {
    /// Construct from coefficients, canonicalised modulo `M::P`, with the
    /// default status.
    pub fn new(a: [i64; K]) -> Self {
        let mut canon = a;
        for v in canon.iter_mut() {
            *v = v.rem_euclid(M::P);
        }
        Mrg {
            params: MrgParams { a: canon },
            status: MrgStatus { r: default_status::<K>() },
            _modulus: PhantomData,
        }
    }

    /// Explicit residue seeding (spec §3.6): set every residue directly,
    /// canonicalised modulo `M::P`. Mirrors the `mrgN::seed(r1, ..., rK)`
    /// overload in the original source.
    pub fn set_residues(&mut self, r: [i64; K]) {
        for (slot, v) in self.status.r.iter_mut().zip(r.iter()) {
            *slot = v.rem_euclid(M::P);
        }
    }

    pub fn params(&self) -> &MrgParams<K> {
        &self.params
    }

    pub fn status(&self) -> &MrgStatus<K> {
        &self.status
    }

    /// Construct directly from already-canonicalised coefficients and
    /// residues, bypassing `new`'s default status. Used by [`crate::yarn`]
    /// to rebuild the inner MRG state after parsing a YARN engine's text
    /// form, which shares the identical `(a) (r)` grammar (spec §3.3: YARN
    /// wraps the MRG state unchanged).
    pub(crate) fn from_raw(a: [i64; K], r: [i64; K]) -> Self {
        Mrg {
            params: MrgParams { a },
            status: MrgStatus { r },
            _modulus: PhantomData,
        }
    }

    fn companion_matrix(&self) -> [[i64; K]; K] {
        let mut m = [[0i64; K]; K];
        m[0] = self.params.a;
        for i in 1..K {
            m[i][i - 1] = 1;
        }
        m
    }

    fn step(&mut self) {
        // Accumulate in `u128`: a 5-term dot product of near-maximal
        // residues overflows `u64` (spec §4.1's division-free reduction is
        // only safe once the value is back under that bound).
        let mut t: u128 = 0;
        for i in 0..K {
            t += self.params.a[i] as u128 * self.status.r[i] as u128;
        }
        let new_head = reduce_wide::<M>(t);
        for j in (1..K).rev() {
            self.status.r[j] = self.status.r[j - 1];
        }
        self.status.r[0] = new_head;
    }

    /// Step the recurrence backward by one, the inverse of [`Self::step`].
    ///
    /// When every coefficient is zero there is no information to invert
    /// (the recurrence doesn't depend on the discarded residue at all); the
    /// freshly-exposed low-order residue is zero-filled, per spec.md's
    /// documented resolution of this ambiguity.
    fn backward(&mut self) {
        let mut t = 0i64;
        for m in (1..=K).rev() {
            if self.params.a[m - 1] != 0 {
                let base = K - m;
                let mut val = self.status.r[base];
                for i in 1..m {
                    val -= self.params.a[i - 1] * self.status.r[base + i];
                }
                val = val.rem_euclid(M::P);
                let inv = modulo_invers(self.params.a[m - 1], M::P)
                    .expect("trailing coefficient is non-zero mod P by construction");
                t = (val * inv).rem_euclid(M::P);
                break;
            }
        }
        for j in 0..(K - 1) {
            self.status.r[j] = self.status.r[j + 1];
        }
        self.status.r[K - 1] = t;
    }

    fn jump2(&mut self, i: u32) {
        let companion = self.companion_matrix();
        let power = mat_pow2(&companion, i, M::P);
        self.status.r = mat_vec(&power, &self.status.r, M::P);
    }

    fn jump(&mut self, mut n: u64) {
        if n < 16 {
            for _ in 0..n {
                self.step();
            }
        } else {
            let mut i = 0u32;
            while n > 0 {
                if n & 1 == 1 {
                    self.jump2(i);
                }
                i += 1;
                n >>= 1;
            }
        }
    }

    /// Reparameterise so the engine produces the interleaved sub-stream
    /// `(x_n, x_{n+s}, x_{n+2s}, ...)`. Samples `2K` points of the original
    /// sequence, solves for the coefficient vector of the decimated
    /// recurrence via Gaussian elimination (spec §4.3 step 3), then
    /// backward-steps `K` times to leave the engine positioned to emit
    /// `x_n` on the next call.
    fn split(&mut self, s: u32, n: u32) -> Result<()> {
        if s < 1 || n >= s {
            return Err(TrngError::invalid_argument(format!(
                "split(s={s}, n={n}): requires s >= 1 and n < s"
            )));
        }
        if s == 1 {
            return Ok(());
        }
        self.jump(n as u64 + 1);
        let mut q: Vec<i64> = Vec::with_capacity(2 * K);
        q.push(self.status.r[0]);
        for _ in 1..(2 * K) {
            self.jump(s as u64);
            q.push(self.status.r[0]);
        }

        let mut a = [0i64; K];
        let mut b = [[0i64; K]; K];
        for i in 0..K {
            a[i] = q[K + i];
            for j in 0..K {
                b[i][j] = q[(K - 1 + i) - j];
            }
        }
        let solved = gauss_solve(b, a, M::P)?;
        self.params.a = solved;

        let mut r = [0i64; K];
        for j in 0..K {
            r[j] = q[K - 1 - j];
        }
        self.status.r = r;
        for _ in 0..K {
            self.backward();
        }
        Ok(())
    }

    fn reseed_residues_u64(&mut self, seed: u64) {
        self.status.r[0] = (seed % M::P as u64) as i64;
        for slot in self.status.r.iter_mut().skip(1) {
            *slot = 1;
        }
    }

    fn reseed_residues_from<R: RngCore>(&mut self, source: &mut R) {
        for slot in self.status.r.iter_mut() {
            *slot = (source.next_u32() as u64 % M::P as u64) as i64;
        }
    }

    fn to_canonical_string(&self, name: &str) -> String {
        format_engine(name, &format_tuple(&self.params.a), &format_tuple(&self.status.r))
    }

    fn from_canonical_str(s: &str, name: &str) -> Result<Self> {
        let rest = parse_engine_header(s, name)?;
        let (a, rest) = parse_tuple::<K>(rest)?;
        let rest = rest.trim_start();
        let (r, rest) = parse_tuple::<K>(rest)?;
        parse_engine_footer(rest)?;
        Ok(Mrg {
            params: MrgParams { a },
            status: MrgStatus { r },
            _modulus: PhantomData,
        })
    }
}

macro_rules! mrg_alias {
    ($alias:ident, $modulus:ty, $order:literal, $name:literal, $default:expr) => {
        #[doc = concat!("The `", $name, "` multiple-recursive generator (spec \u{a7}6.3).")]
        pub type $alias = Mrg<$modulus, $order>;

        impl Default for $alias {
            fn default() -> Self {
                Mrg::new($default)
            }
        }

        impl Engine for $alias {
            type RawOut = i64;

            fn min() -> i64 {
                0
            }

            fn max() -> i64 {
                <$modulus as Prime>::P - 1
            }

            fn name() -> &'static str {
                $name
            }

            fn next_value(&mut self) -> i64 {
                self.step();
                self.status.r[0]
            }

            fn reseed(&mut self) {
                *self = Self::default();
            }

            fn reseed_u64(&mut self, seed: u64) {
                self.reseed_residues_u64(seed);
            }

            fn reseed_from<R: RngCore>(&mut self, source: &mut R) {
                self.reseed_residues_from(source);
            }

            fn discard(&mut self, n: u64) {
                self.jump(n);
            }
        }

        impl Jumpable for $alias {
            fn jump2(&mut self, i: u32) {
                Mrg::jump2(self, i)
            }

            fn jump(&mut self, n: u64) {
                Mrg::jump(self, n)
            }
        }

        impl ParallelEngine for $alias {
            fn split(&mut self, s: u32, n: u32) -> Result<()> {
                Mrg::split(self, s, n)
            }
        }

        impl RngCore for $alias {
            fn next_u32(&mut self) -> u32 {
                Engine::next_value(self) as u32
            }

            fn next_u64(&mut self) -> u64 {
                rc_impls::next_u64_via_u32(self)
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
                f.write_str(&self.to_canonical_string($name))
            }
        }

        impl FromStr for $alias {
            type Err = TrngError;

            fn from_str(s: &str) -> Result<Self> {
                Mrg::from_canonical_str(s, $name)
            }
        }
    };
}

mrg_alias!(Mrg2, P31_1, 2, "mrg2", mrg_constants::mrg2::LECUYER1);
mrg_alias!(Mrg3, P31_1, 3, "mrg3", mrg_constants::mrg3::LECUYER1);
mrg_alias!(Mrg4, P31_1, 4, "mrg4", mrg_constants::mrg4::LECUYER1);
mrg_alias!(Mrg5, P31_1, 5, "mrg5", mrg_constants::mrg5::LECUYER1);
mrg_alias!(Mrg3s, P31S1, 3, "mrg3s", mrg_constants::mrg3s::TRNG0);
mrg_alias!(Mrg5s, P31S2, 5, "mrg5s", mrg_constants::mrg5s::TRNG0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_matches_original_pattern() {
        assert_eq!(default_status::<2>(), [0, 1]);
        assert_eq!(default_status::<4>(), [0, 1, 1, 1]);
        assert_eq!(default_status::<5>(), [0, 1, 1, 1, 1]);
    }

    #[test]
    fn step_is_deterministic_and_in_range() {
        let mut r = Mrg3::default();
        for _ in 0..1000 {
            let v = Engine::next_value(&mut r);
            assert!(v >= Mrg3::min() && v <= Mrg3::max());
        }
    }

    #[test]
    fn jump_matches_repeated_step() {
        let mut by_step = Mrg4::default();
        let mut by_jump = Mrg4::default();
        for _ in 0..37 {
            Engine::next_value(&mut by_step);
        }
        Jumpable::jump(&mut by_jump, 37);
        assert_eq!(by_step, by_jump);
    }

    #[test]
    fn jump2_matches_jump_power_of_two() {
        let mut by_jump2 = Mrg2::default();
        let mut by_jump = Mrg2::default();
        Jumpable::jump2(&mut by_jump2, 5);
        Jumpable::jump(&mut by_jump, 1 << 5);
        assert_eq!(by_jump2, by_jump);
    }

    #[test]
    fn split_produces_disjoint_interleaved_substreams() {
        let s = 4u32;
        let mut streams: Vec<Mrg3> = (0..s)
            .map(|n| {
                let mut r = Mrg3::default();
                ParallelEngine::split(&mut r, s, n).unwrap();
                r
            })
            .collect();

        let mut reference = Mrg3::default();
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
        let mut r = Mrg3::default();
        assert!(ParallelEngine::split(&mut r, 0, 0).is_err());
        assert!(ParallelEngine::split(&mut r, 4, 4).is_err());
    }

    #[test]
    fn canonical_text_round_trips() {
        let mut r = Mrg4::default();
        Engine::discard(&mut r, 12345);
        let text = r.to_string();
        let parsed: Mrg4 = text.parse().unwrap();
        assert_eq!(r, parsed);
    }

    #[test]
    fn partial_parse_failure_leaves_target_unchanged() {
        let original = Mrg3::default();
        let mut target = original.clone();
        let bad = "[mrg3 (1 2 3) (4 5)]";
        let result: Result<Mrg3> = bad.parse();
        assert!(result.is_err());
        // `from_str` only ever constructs a fresh value; it cannot mutate
        // `target`, so the contract holds trivially by construction.
        assert_eq!(target, original);
        let _ = &mut target;
    }

    #[test]
    fn backward_is_true_inverse_of_step() {
        let mut r = Mrg5::default();
        let before = r.status.clone();
        Engine::next_value(&mut r);
        r.backward();
        assert_eq!(r.status, before);
    }
}
