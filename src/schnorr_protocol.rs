//! Schnorr-style proofs of (equal) discrete logarithms over a [`group::prime::PrimeGroup`].
//!
//! [`DiscreteLogEquality`] proves knowledge of a scalar `x` such that
//! `images[i] = x * bases[i]` for every `i`. With a single base this is the
//! classical Schnorr proof of knowledge of a discrete logarithm; with two bases it
//! is the Chaum-Pedersen proof of discrete-log equality.

use ff::Field;
use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};
use tracing::instrument;

use crate::challenge::ScalarChallengeSpace;
use crate::errors::Error;
use crate::group::serialization::{
    deserialize_elements, deserialize_scalars, serialize_elements, serialize_scalars,
};
use crate::traits::{SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript};

/// Prover state between announcement and response.
///
/// Neither `Clone` nor `Copy`: answering two challenges with one nonce reveals `x`.
///
/// ```compile_fail
/// use curve25519_dalek::{RistrettoPoint, Scalar};
/// use group::Group;
/// use rand::rngs::OsRng;
/// use sigma_compose::{DiscreteLogEquality, SigmaProtocol};
///
/// let x = Scalar::from(7u64);
/// let protocol = DiscreteLogEquality::from_witness(vec![RistrettoPoint::generator()], &x).unwrap();
/// let (_, secret) = protocol.generate_announcement(&x, &mut OsRng).unwrap();
/// let first = protocol.generate_response(secret, &Scalar::from(1u64)).unwrap();
/// let second = protocol.generate_response(secret, &Scalar::from(2u64)).unwrap();
/// ```
pub struct DiscreteLogSecret<F> {
    nonce: F,
    witness: F,
}

/// Statement `images[i] = x * bases[i]` for all `i`, with witness `x`.
#[derive(Clone, Debug)]
pub struct DiscreteLogEquality<G: PrimeGroup> {
    bases: Vec<G>,
    images: Vec<G>,
    space: ScalarChallengeSpace<G::Scalar>,
}

impl<G: PrimeGroup> DiscreteLogEquality<G> {
    /// Builds the statement, rejecting empty or mismatched vectors and identity
    /// bases (which would make the relation trivially satisfiable).
    pub fn new(bases: Vec<G>, images: Vec<G>) -> Result<Self, Error> {
        if bases.is_empty() || bases.len() != images.len() {
            return Err(Error::InvalidParameters(
                "bases and images must be non-empty and of equal length".into(),
            ));
        }
        if bases.iter().any(|base| bool::from(base.is_identity())) {
            return Err(Error::InvalidParameters("identity base".into()));
        }
        Ok(Self {
            bases,
            images,
            space: ScalarChallengeSpace::new(),
        })
    }

    /// Proof of knowledge of `x` with `image = x * base`.
    pub fn schnorr(base: G, image: G) -> Result<Self, Error> {
        Self::new(vec![base], vec![image])
    }

    /// Statement for the witness `x` over the given bases.
    pub fn from_witness(bases: Vec<G>, x: &G::Scalar) -> Result<Self, Error> {
        let images = bases.iter().map(|base| *base * x).collect();
        Self::new(bases, images)
    }

    pub fn bases(&self) -> &[G] {
        &self.bases
    }

    pub fn images(&self) -> &[G] {
        &self.images
    }

    /// Whether `x` satisfies the relation.
    pub fn is_witness(&self, x: &G::Scalar) -> bool {
        self.bases
            .iter()
            .zip(&self.images)
            .all(|(base, image)| *base * x == *image)
    }

    /// Special-soundness extractor: recovers the witness from two accepting
    /// transcripts sharing an announcement but with distinct challenges.
    pub fn extract_witness(
        &self,
        first: &SigmaProtocolTranscript<Self>,
        second: &SigmaProtocolTranscript<Self>,
    ) -> Option<G::Scalar> {
        if first.announcement != second.announcement
            || first.challenge == second.challenge
            || !first.verify(self)
            || !second.verify(self)
        {
            return None;
        }
        let denominator: Option<G::Scalar> = (first.challenge - second.challenge).invert().into();
        Some((first.response - second.response) * denominator?)
    }
}

impl<G: PrimeGroup> SigmaProtocol for DiscreteLogEquality<G> {
    type Space = ScalarChallengeSpace<G::Scalar>;
    type Announcement = Vec<G>;
    type AnnouncementSecret = DiscreteLogSecret<G::Scalar>;
    type Response = G::Scalar;
    type Witness = G::Scalar;

    fn challenge_space(&self) -> &Self::Space {
        &self.space
    }

    /// Prover's first message: `k * bases[i]` for a fresh nonce `k`.
    ///
    /// # Errors
    /// - [`Error::InvalidInstanceWitnessPair`] if `witness` does not satisfy the relation.
    #[instrument(skip_all, fields(bases = self.bases.len()))]
    fn generate_announcement(
        &self,
        witness: &G::Scalar,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Vec<G>, DiscreteLogSecret<G::Scalar>), Error> {
        if !self.is_witness(witness) {
            return Err(Error::InvalidInstanceWitnessPair);
        }
        let nonce = G::Scalar::random(&mut *rng);
        let announcement = self.bases.iter().map(|base| *base * nonce).collect();
        Ok((
            announcement,
            DiscreteLogSecret {
                nonce,
                witness: *witness,
            },
        ))
    }

    /// Computes `k + c * x`.
    fn generate_response(
        &self,
        secret: DiscreteLogSecret<G::Scalar>,
        challenge: &G::Scalar,
    ) -> Result<G::Scalar, Error> {
        Ok(secret.nonce + secret.witness * challenge)
    }

    /// Checks `s * bases[i] == announcement[i] + c * images[i]`.
    #[instrument(skip_all, fields(bases = self.bases.len()))]
    fn check_transcript(&self, announcement: &Vec<G>, challenge: &G::Scalar, response: &G::Scalar) -> bool {
        if announcement.len() != self.bases.len() {
            return false;
        }
        self.bases
            .iter()
            .zip(&self.images)
            .zip(announcement)
            .all(|((base, image), t)| *base * response == *t + *image * challenge)
    }

    fn serialize_announcement(&self, announcement: &Vec<G>) -> Vec<u8> {
        serialize_elements(announcement)
    }

    fn serialize_response(&self, response: &G::Scalar) -> Vec<u8> {
        serialize_scalars(&[*response])
    }

    fn restore_announcement(&self, data: &[u8]) -> Result<Vec<G>, Error> {
        deserialize_elements::<G>(data, self.bases.len())
            .ok_or(Error::InvalidEncoding("discrete-log announcement"))
    }

    fn restore_response(&self, data: &[u8]) -> Result<G::Scalar, Error> {
        deserialize_scalars::<G::Scalar>(data, 1)
            .and_then(|scalars| scalars.into_iter().next())
            .ok_or(Error::InvalidEncoding("discrete-log response"))
    }

    fn protocol_identifier(&self) -> Vec<u8> {
        b"sigma-compose/discrete-log-equality".to_vec()
    }

    fn instance_label(&self) -> Vec<u8> {
        let mut label = serialize_elements(&self.bases);
        label.extend(serialize_elements(&self.images));
        label
    }
}

impl<G: PrimeGroup> SigmaProtocolSimulator for DiscreteLogEquality<G> {
    /// Samples the response first and solves for the announcement
    /// `s * bases[i] - c * images[i]`.
    fn simulate_transcript(
        &self,
        challenge: &G::Scalar,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SigmaProtocolTranscript<Self>, Error> {
        let response = G::Scalar::random(&mut *rng);
        let announcement = self
            .bases
            .iter()
            .zip(&self.images)
            .map(|(base, image)| *base * response - *image * challenge)
            .collect();
        Ok(SigmaProtocolTranscript::new(announcement, *challenge, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::run_honestly;
    use curve25519_dalek::{RistrettoPoint, Scalar};
    use group::Group;
    use rand::rngs::OsRng;

    type G = RistrettoPoint;

    #[test]
    fn constructor_rejects_malformed_statements() {
        let mut rng = OsRng;
        let g = G::random(&mut rng);
        assert!(DiscreteLogEquality::new(vec![g], vec![]).is_err());
        assert!(DiscreteLogEquality::<G>::new(vec![], vec![]).is_err());
        assert!(DiscreteLogEquality::schnorr(G::identity(), g).is_err());
    }

    #[test]
    fn wrong_witness_cannot_announce() {
        let mut rng = OsRng;
        let x = Scalar::random(&mut rng);
        let protocol = DiscreteLogEquality::from_witness(vec![G::generator()], &x).unwrap();
        assert!(matches!(
            protocol.generate_announcement(&(x + Scalar::ONE), &mut rng),
            Err(Error::InvalidInstanceWitnessPair)
        ));
    }

    #[test]
    fn dleq_is_complete() {
        let mut rng = OsRng;
        let x = Scalar::random(&mut rng);
        let protocol =
            DiscreteLogEquality::from_witness(vec![G::generator(), G::random(&mut rng)], &x)
                .unwrap();
        for _ in 0..8 {
            let transcript = run_honestly(&protocol, &x, &mut rng).unwrap();
            assert!(transcript.verify(&protocol));
        }
    }

    #[test]
    fn announcement_and_response_restore() {
        let mut rng = OsRng;
        let x = Scalar::random(&mut rng);
        let protocol =
            DiscreteLogEquality::from_witness(vec![G::generator(), G::random(&mut rng)], &x)
                .unwrap();
        let transcript = run_honestly(&protocol, &x, &mut rng).unwrap();
        let announcement = protocol
            .restore_announcement(&protocol.serialize_announcement(&transcript.announcement))
            .unwrap();
        let response = protocol
            .restore_response(&protocol.serialize_response(&transcript.response))
            .unwrap();
        assert!(protocol.check_transcript(&announcement, &transcript.challenge, &response));
        assert!(protocol.restore_announcement(&[0u8; 32]).is_err());
    }
}
