//! Duplex Sponge Interface
//!
//! This module defines the [`DuplexSpongeInterface`] trait, which provides
//! a generic interface for cryptographic sponge functions that support
//! duplex operation (absorb and squeeze phases).
//!
//! Challenge spaces use it to hash arbitrary byte strings into challenges
//! (see [`ChallengeSpace::hash_into_challenge_space`](crate::challenge::ChallengeSpace::hash_into_challenge_space)).

pub mod shake;

/// A trait defining the behavior of a duplex sponge construction.
///
/// A duplex sponge allows for:
/// - **Absorbing** input data into the sponge state
/// - **Squeezing** output data from the sponge state
pub trait DuplexSpongeInterface {
    /// Creates a new sponge instance with an initialization vector.
    fn new(iv: &[u8]) -> Self;

    /// Absorbs input data into the sponge state.
    fn absorb(&mut self, input: &[u8]);

    /// Squeezes output data from the sponge state.
    fn squeeze(&mut self, length: usize) -> Vec<u8>;
}
