//! SHAKE-based duplex sponge implementation
//!
//! This module implements a duplex sponge construction using SHAKE128.

use crate::duplex_sponge::DuplexSpongeInterface;
use sha3::digest::{ExtendableOutput, Update};
use sha3::Shake128;

/// Rate of SHAKE128 in bytes.
const RATE: usize = 168;

/// Duplex sponge construction using SHAKE128.
///
/// The initialization vector is length-prefixed and padded to a full block so
/// that distinct IVs can never collide with absorbed data.
#[derive(Clone, Debug)]
pub struct ShakeDuplexSponge(Shake128);

impl DuplexSpongeInterface for ShakeDuplexSponge {
    fn new(iv: &[u8]) -> Self {
        let mut hasher = Shake128::default();
        let mut initial_block = (iv.len() as u32).to_be_bytes().to_vec();
        initial_block.extend_from_slice(iv);
        let padding = RATE - initial_block.len() % RATE;
        initial_block.resize(initial_block.len() + padding, 0);
        hasher.update(&initial_block);
        Self(hasher)
    }

    fn absorb(&mut self, input: &[u8]) {
        self.0.update(input);
    }

    fn squeeze(&mut self, length: usize) -> Vec<u8> {
        let mut output = vec![0u8; length];
        self.0.clone().finalize_xof_into(&mut output);
        // Ratchet so that a second squeeze yields fresh output.
        self.0.update(&output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squeeze_is_deterministic_and_iv_separated() {
        let mut a = ShakeDuplexSponge::new(b"domain-a");
        let mut b = ShakeDuplexSponge::new(b"domain-a");
        let mut c = ShakeDuplexSponge::new(b"domain-b");
        for sponge in [&mut a, &mut b, &mut c] {
            sponge.absorb(b"message");
        }
        let out_a = a.squeeze(48);
        assert_eq!(out_a, b.squeeze(48));
        assert_ne!(out_a, c.squeeze(48));
        assert_ne!(out_a, a.squeeze(48));
    }
}
