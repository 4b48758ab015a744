//! Damgård's technique: commit to the announcement, reveal it with the response.
//!
//! The wrapped protocol's announcement is replaced by a commitment to its
//! canonical bytes. The verifier picks its challenge without seeing the real
//! announcement, and the prover cannot change the announcement after seeing the
//! challenge. This turns an honest-verifier zero-knowledge protocol into one that
//! stays zero-knowledge against concurrent, malicious verifiers.

use rand::{CryptoRng, RngCore};
use tracing::instrument;

use crate::commitment::CommitmentScheme;
use crate::errors::Error;
use crate::representation::{frames, FrameReader};
use crate::traits::{Challenge, SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript};

const DAMGARD_TAG: &[u8] = b"sigma-compose/damgard";

/// Wraps `P` with the commitment scheme `C`.
#[derive(Clone, Debug)]
pub struct DamgardTechnique<P, C> {
    protocol: P,
    scheme: C,
}

/// Prover state kept between the commitment and the opening.
pub struct DamgardSecret<P: SigmaProtocol, C: CommitmentScheme> {
    inner_secret: P::AnnouncementSecret,
    inner_announcement: P::Announcement,
    open_value: C::OpenValue,
}

/// Third message: the inner response together with the opened announcement.
pub struct DamgardResponse<P: SigmaProtocol, C: CommitmentScheme> {
    pub inner_response: P::Response,
    pub inner_announcement: P::Announcement,
    pub open_value: C::OpenValue,
}

impl<P: SigmaProtocol, C: CommitmentScheme> Clone for DamgardResponse<P, C> {
    fn clone(&self) -> Self {
        Self {
            inner_response: self.inner_response.clone(),
            inner_announcement: self.inner_announcement.clone(),
            open_value: self.open_value.clone(),
        }
    }
}

impl<P: SigmaProtocol, C: CommitmentScheme> DamgardTechnique<P, C> {
    pub fn new(protocol: P, scheme: C) -> Self {
        Self { protocol, scheme }
    }

    pub fn inner(&self) -> &P {
        &self.protocol
    }

    pub fn scheme(&self) -> &C {
        &self.scheme
    }
}

impl<P: SigmaProtocol, C: CommitmentScheme> SigmaProtocol for DamgardTechnique<P, C> {
    type Space = P::Space;
    type Announcement = C::Commitment;
    type AnnouncementSecret = DamgardSecret<P, C>;
    type Response = DamgardResponse<P, C>;
    type Witness = P::Witness;

    fn challenge_space(&self) -> &P::Space {
        self.protocol.challenge_space()
    }

    #[instrument(skip_all)]
    fn generate_announcement(
        &self,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Announcement, Self::AnnouncementSecret), Error> {
        let (inner_announcement, inner_secret) = self.protocol.generate_announcement(witness, rng)?;
        let message = self.protocol.serialize_announcement(&inner_announcement);
        let (commitment, open_value) = self.scheme.commit(&message, rng);
        Ok((
            commitment,
            DamgardSecret {
                inner_secret,
                inner_announcement,
                open_value,
            },
        ))
    }

    fn generate_response(
        &self,
        secret: Self::AnnouncementSecret,
        challenge: &Challenge<Self>,
    ) -> Result<Self::Response, Error> {
        let inner_response = self.protocol.generate_response(secret.inner_secret, challenge)?;
        Ok(DamgardResponse {
            inner_response,
            inner_announcement: secret.inner_announcement,
            open_value: secret.open_value,
        })
    }

    /// Checks the opening first and only then the inner transcript.
    #[instrument(skip_all)]
    fn check_transcript(
        &self,
        commitment: &Self::Announcement,
        challenge: &Challenge<Self>,
        response: &Self::Response,
    ) -> bool {
        let message = self.protocol.serialize_announcement(&response.inner_announcement);
        if !self.scheme.verify(commitment, &message, &response.open_value) {
            return false;
        }
        self.protocol
            .check_transcript(&response.inner_announcement, challenge, &response.inner_response)
    }

    fn serialize_announcement(&self, commitment: &Self::Announcement) -> Vec<u8> {
        self.scheme.serialize_commitment(commitment)
    }

    fn serialize_response(&self, response: &Self::Response) -> Vec<u8> {
        frames([
            self.protocol.serialize_response(&response.inner_response).as_slice(),
            self.protocol
                .serialize_announcement(&response.inner_announcement)
                .as_slice(),
            self.scheme.serialize_open_value(&response.open_value).as_slice(),
        ])
    }

    fn restore_announcement(&self, data: &[u8]) -> Result<Self::Announcement, Error> {
        self.scheme.restore_commitment(data)
    }

    fn restore_response(&self, data: &[u8]) -> Result<Self::Response, Error> {
        let mut reader = FrameReader::new(data);
        let inner_response = self
            .protocol
            .restore_response(reader.next_frame("Damgard response")?)?;
        let inner_announcement = self
            .protocol
            .restore_announcement(reader.next_frame("Damgard response")?)?;
        let open_value = self
            .scheme
            .restore_open_value(reader.next_frame("Damgard response")?)?;
        reader.finish("Damgard response")?;
        Ok(DamgardResponse {
            inner_response,
            inner_announcement,
            open_value,
        })
    }

    fn protocol_identifier(&self) -> Vec<u8> {
        frames([DAMGARD_TAG, self.protocol.protocol_identifier().as_slice()])
    }

    fn instance_label(&self) -> Vec<u8> {
        self.protocol.instance_label()
    }
}

impl<P: SigmaProtocolSimulator, C: CommitmentScheme> SigmaProtocolSimulator for DamgardTechnique<P, C> {
    /// Simulates the inner protocol and commits to the simulated announcement.
    fn simulate_transcript(
        &self,
        challenge: &Challenge<Self>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SigmaProtocolTranscript<Self>, Error> {
        let inner = self.protocol.simulate_transcript(challenge, rng)?;
        let message = self.protocol.serialize_announcement(&inner.announcement);
        let (commitment, open_value) = self.scheme.commit(&message, rng);
        Ok(SigmaProtocolTranscript::new(
            commitment,
            inner.challenge,
            DamgardResponse {
                inner_response: inner.response,
                inner_announcement: inner.announcement,
                open_value,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::HashCommitmentScheme;
    use crate::modp_protocol::ModPDiscreteLog;
    use crate::traits::run_honestly;
    use num_bigint::BigUint;
    use rand::rngs::OsRng;
    use std::cell::Cell;

    fn wrapped() -> (DamgardTechnique<ModPDiscreteLog, HashCommitmentScheme>, BigUint) {
        let x = BigUint::from(5u32);
        let inner = ModPDiscreteLog::from_witness(
            BigUint::from(23u32),
            BigUint::from(11u32),
            BigUint::from(4u32),
            &x,
        )
        .unwrap();
        (DamgardTechnique::new(inner, HashCommitmentScheme::default()), x)
    }

    #[test]
    fn honest_and_simulated_transcripts_verify() {
        let (protocol, x) = wrapped();
        let transcript = run_honestly(&protocol, &x, &mut OsRng).unwrap();
        assert!(transcript.verify(&protocol));

        let challenge = protocol.generate_challenge(&mut OsRng);
        let simulated = protocol.simulate_transcript(&challenge, &mut OsRng).unwrap();
        assert!(simulated.verify(&protocol));
    }

    /// Delegates to `ModPDiscreteLog` and counts transcript checks.
    struct Counting {
        inner: ModPDiscreteLog,
        checks: Cell<usize>,
    }

    impl SigmaProtocol for Counting {
        type Space = <ModPDiscreteLog as SigmaProtocol>::Space;
        type Announcement = BigUint;
        type AnnouncementSecret = <ModPDiscreteLog as SigmaProtocol>::AnnouncementSecret;
        type Response = BigUint;
        type Witness = BigUint;

        fn challenge_space(&self) -> &Self::Space {
            self.inner.challenge_space()
        }

        fn generate_announcement(
            &self,
            witness: &BigUint,
            rng: &mut (impl RngCore + CryptoRng),
        ) -> Result<(BigUint, Self::AnnouncementSecret), Error> {
            self.inner.generate_announcement(witness, rng)
        }

        fn generate_response(
            &self,
            secret: Self::AnnouncementSecret,
            challenge: &BigUint,
        ) -> Result<BigUint, Error> {
            self.inner.generate_response(secret, challenge)
        }

        fn check_transcript(&self, announcement: &BigUint, challenge: &BigUint, response: &BigUint) -> bool {
            self.checks.set(self.checks.get() + 1);
            self.inner.check_transcript(announcement, challenge, response)
        }

        fn serialize_announcement(&self, announcement: &BigUint) -> Vec<u8> {
            self.inner.serialize_announcement(announcement)
        }

        fn serialize_response(&self, response: &BigUint) -> Vec<u8> {
            self.inner.serialize_response(response)
        }

        fn restore_announcement(&self, data: &[u8]) -> Result<BigUint, Error> {
            self.inner.restore_announcement(data)
        }

        fn restore_response(&self, data: &[u8]) -> Result<BigUint, Error> {
            self.inner.restore_response(data)
        }

        fn protocol_identifier(&self) -> Vec<u8> {
            self.inner.protocol_identifier()
        }

        fn instance_label(&self) -> Vec<u8> {
            self.inner.instance_label()
        }
    }

    #[test]
    fn wrong_opening_is_rejected_before_inner_check() {
        let (plain, x) = wrapped();
        let protocol = DamgardTechnique::new(
            Counting {
                inner: plain.inner().clone(),
                checks: Cell::new(0),
            },
            HashCommitmentScheme::default(),
        );
        let mut transcript = run_honestly(&protocol, &x, &mut OsRng).unwrap();
        assert!(transcript.verify(&protocol));
        assert_eq!(protocol.inner().checks.get(), 1);

        // The inner transcript is still valid; only the opening is broken.
        transcript.response.open_value[3] ^= 0x80;
        assert!(!transcript.verify(&protocol));
        assert_eq!(protocol.inner().checks.get(), 1);
    }
}
