//! A parallel pseudo-random number generator kernel: multiple-recursive,
//! non-linear (YARN-wrapped), counter-based, linear-congruential, Mersenne
//! Twister, lagged Fibonacci, and xoshiro256+ engines, all over a common
//! [`Engine`](engine::Engine) contract with jump-ahead and sub-stream
//! splitting where the underlying recurrence supports it, plus canonical
//! text serialisation and uniform float mapping.
//!
//! Engines implementing only [`Engine`]: [`mt19937::Mt19937`],
//! [`mt19937::Mt19937_64`], the `lagfib` family.
//! Engines additionally implementing [`engine::Jumpable`]:
//! [`xoshiro256plus::Xoshiro256Plus`].
//! Engines additionally implementing [`engine::ParallelEngine`] (jump-ahead
//! and sub-stream splitting): the `mrg`/`yarn` families, [`count128::Count128`],
//! the `lcg64` family.

pub mod distribution;
pub mod engine;
pub mod error;
pub mod int_math;
pub mod lagfib;
pub mod linalg;
pub mod mrg;
pub mod mrg_constants;
pub mod mt19937;
pub mod serialize;
pub mod uniform;
pub mod xoshiro256plus;
pub mod yarn;

pub mod count128;
pub mod lcg64;

pub use engine::{Engine, Jumpable, ParallelEngine, RawInt};
pub use error::{Result, TrngError};
pub use uniform::{uniform_cc, uniform_co, uniform_oc, uniform_oo, UniformFloat};

pub use count128::Count128;
pub use lagfib::{LagFibPlus32R250, LagFibPlus64L607, LagFibXor32R250, LagFibXor64L607};
pub use lcg64::{Lcg64, Lcg64Shift};
pub use mrg::{Mrg2, Mrg3, Mrg3s, Mrg4, Mrg5, Mrg5s};
pub use mt19937::{Mt19937, Mt19937_64};
pub use xoshiro256plus::Xoshiro256Plus;
pub use yarn::{Yarn2, Yarn3, Yarn3s, Yarn4, Yarn5, Yarn5s};
