//! Error catalogue (spec §7).
//!
//! Every fallible operation in this crate returns [`TrngError`] rather than
//! panicking on out-of-contract input. `NoInverse` and `SingularSystem` are
//! only reachable by calling the low-level kernel (`int_math`, `linalg`)
//! directly on adversarial input; the engines built on top of them never
//! construct inputs that trigger those two variants.

use std::fmt;

/// The error catalogue of the modular-arithmetic and parallel-stream kernel.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrngError {
    /// `split(s, n)` called with `s < 1` or `n >= s`; `modulo_invers` called
    /// with `a <= 0` or `m <= 1`; a resize with non-positive size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `gcd(a, m) != 1`: `a` has no inverse modulo `m`. Internal; should
    /// never escape a well-formed engine operation.
    #[error("no modular inverse exists")]
    NoInverse,

    /// Gaussian elimination could not solve for the post-split coefficient
    /// vector: the system is rank-deficient and inconsistent. Internal;
    /// implies a bug or a degenerate (adversarially chosen) generator state.
    #[error("singular system encountered while solving for split coefficients")]
    SingularSystem,

    /// The canonical text form (spec §4.8/§6.4) did not match the grammar.
    /// The target of the parse is left unchanged.
    #[error("serialization grammar violation: {0}")]
    SerializationFailure(String),
}

impl TrngError {
    pub(crate) fn invalid_argument(msg: impl fmt::Display) -> Self {
        TrngError::InvalidArgument(msg.to_string())
    }

    pub(crate) fn serialization_failure(msg: impl fmt::Display) -> Self {
        TrngError::SerializationFailure(msg.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, TrngError>;
