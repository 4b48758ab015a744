//! Schnorr proof of knowledge of a discrete logarithm in the order-`q` subgroup of `Z_p^*`.
//!
//! Challenges and responses live in `Z_q`, so this fragment draws its challenges
//! from a [`ZnChallengeSpace`] rather than from a curve scalar field.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::challenge::{ChallengeSpace, ZnChallengeSpace};
use crate::errors::Error;
use crate::traits::{SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript};

/// Prover state between announcement and response; consumed by the response.
pub struct ModPSecret {
    nonce: BigUint,
    witness: BigUint,
}

/// Statement `y = g^x mod p` where `g` generates a subgroup of prime order `q`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModPDiscreteLog {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    y: BigUint,
    space: ZnChallengeSpace,
}

fn encode_fixed(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    out
}

impl ModPDiscreteLog {
    /// Validates the group parameters and the public value.
    ///
    /// `q` must divide `p - 1`, and both `g != 1` and `y` must lie in the order-`q`
    /// subgroup. Primality of `p` and `q` is the caller's responsibility.
    pub fn new(p: BigUint, q: BigUint, g: BigUint, y: BigUint) -> Result<Self, Error> {
        let one = BigUint::one();
        if p <= BigUint::from(3u32) || q <= one {
            return Err(Error::InvalidParameters("modulus too small".into()));
        }
        if !((&p - &one) % &q).is_zero() {
            return Err(Error::InvalidParameters("q does not divide p - 1".into()));
        }
        if g <= one || g >= p || g.modpow(&q, &p) != one {
            return Err(Error::InvalidParameters("g does not generate the order-q subgroup".into()));
        }
        if y.is_zero() || y >= p || y.modpow(&q, &p) != one {
            return Err(Error::InvalidParameters("y is not in the order-q subgroup".into()));
        }
        let space = ZnChallengeSpace::new(q.clone())?;
        Ok(Self { p, q, g, y, space })
    }

    /// Statement for the witness `x`.
    pub fn from_witness(p: BigUint, q: BigUint, g: BigUint, x: &BigUint) -> Result<Self, Error> {
        let y = g.modpow(x, &p);
        Self::new(p, q, g, y)
    }

    pub fn public_value(&self) -> &BigUint {
        &self.y
    }

    fn element_len(&self) -> usize {
        ((self.p.bits() + 7) / 8) as usize
    }

    fn scalar_len(&self) -> usize {
        self.space.challenge_len()
    }
}

impl SigmaProtocol for ModPDiscreteLog {
    type Space = ZnChallengeSpace;
    type Announcement = BigUint;
    type AnnouncementSecret = ModPSecret;
    type Response = BigUint;
    type Witness = BigUint;

    fn challenge_space(&self) -> &ZnChallengeSpace {
        &self.space
    }

    fn generate_announcement(
        &self,
        witness: &BigUint,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(BigUint, ModPSecret), Error> {
        if self.g.modpow(witness, &self.p) != self.y {
            return Err(Error::InvalidInstanceWitnessPair);
        }
        let nonce = rng.gen_biguint_below(&self.q);
        let announcement = self.g.modpow(&nonce, &self.p);
        Ok((
            announcement,
            ModPSecret {
                nonce,
                witness: witness % &self.q,
            },
        ))
    }

    /// `s = k + c * x mod q`
    fn generate_response(
        &self,
        secret: ModPSecret,
        challenge: &BigUint,
    ) -> Result<BigUint, Error> {
        Ok((secret.nonce + challenge * secret.witness) % &self.q)
    }

    /// Checks `g^s == t * y^c mod p`.
    fn check_transcript(&self, announcement: &BigUint, challenge: &BigUint, response: &BigUint) -> bool {
        if announcement.is_zero() || announcement >= &self.p || response >= &self.q {
            return false;
        }
        let lhs = self.g.modpow(response, &self.p);
        let rhs = (announcement * self.y.modpow(challenge, &self.p)) % &self.p;
        lhs == rhs
    }

    fn serialize_announcement(&self, announcement: &BigUint) -> Vec<u8> {
        encode_fixed(announcement, self.element_len())
    }

    fn serialize_response(&self, response: &BigUint) -> Vec<u8> {
        encode_fixed(response, self.scalar_len())
    }

    fn restore_announcement(&self, data: &[u8]) -> Result<BigUint, Error> {
        let value = BigUint::from_bytes_be(data);
        if data.len() != self.element_len() || value.is_zero() || value >= self.p {
            return Err(Error::InvalidEncoding("Z_p announcement"));
        }
        Ok(value)
    }

    fn restore_response(&self, data: &[u8]) -> Result<BigUint, Error> {
        let value = BigUint::from_bytes_be(data);
        if data.len() != self.scalar_len() || value >= self.q {
            return Err(Error::InvalidEncoding("Z_q response"));
        }
        Ok(value)
    }

    fn protocol_identifier(&self) -> Vec<u8> {
        b"sigma-compose/modp-discrete-log".to_vec()
    }

    fn instance_label(&self) -> Vec<u8> {
        let len = self.element_len();
        [&self.p, &self.q, &self.g, &self.y]
            .iter()
            .flat_map(|value| encode_fixed(value, len))
            .collect()
    }
}

impl SigmaProtocolSimulator for ModPDiscreteLog {
    /// `t = g^s * y^(q - c)` for a uniformly random `s`.
    fn simulate_transcript(
        &self,
        challenge: &BigUint,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SigmaProtocolTranscript<Self>, Error> {
        let response = rng.gen_biguint_below(&self.q);
        let inverse_exponent = (&self.q - (challenge % &self.q)) % &self.q;
        let announcement = (self.g.modpow(&response, &self.p)
            * self.y.modpow(&inverse_exponent, &self.p))
            % &self.p;
        Ok(SigmaProtocolTranscript::new(announcement, challenge.clone(), response))
    }
}
