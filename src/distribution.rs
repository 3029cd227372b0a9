//! Distribution adaptor surface (spec §4.9, component I).
//!
//! This crate stops at uniform integers and uniform floats (components F
//! and G): turning those into non-uniform distributions (normal, exponential,
//! discrete, ...) is explicitly out of scope (spec §1 Non-goals: "the
//! distribution classes built on top of an engine"). What belongs here is
//! the *seam* a distribution layer would plug into, documented rather than
//! implemented, so a downstream crate has a stable contract to target.
//!
//! [`rand_core::RngCore`], implemented by every engine in this crate, already
//! is that seam in the Rust ecosystem: any `rand`-compatible distribution
//! (`rand::distributions::Distribution`) accepts `&mut impl RngCore`
//! directly. A hypothetical `TrngError::DomainError` variant — raised when a
//! distribution's parameters are out of range, e.g. a negative standard
//! deviation — belongs to that downstream layer, not here: nothing in this
//! crate ever constructs it, since no operation defined here has a
//! parameter domain to validate in that sense.

/// Marker documenting the adaptor seam a distribution layer builds on:
/// any type implementing [`rand_core::RngCore`] (every engine in this
/// crate does) is a valid uniform source for such a layer. This trait adds
/// nothing over `RngCore` itself; it exists so the seam has a name other
/// crates can refer to.
pub trait UniformSource: rand_core::RngCore {}

impl<T: rand_core::RngCore> UniformSource for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mrg::Mrg3;

    #[test]
    fn every_engine_is_a_uniform_source() {
        fn assert_source<T: UniformSource>(_: &T) {}
        assert_source(&Mrg3::default());
    }
}
